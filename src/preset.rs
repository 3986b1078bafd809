//! Ready-made chains.

use crate::chain::Chain;
use crate::handler::RangeHandler;
use crate::sink::SharedSink;

/// Name reported by the handler for payloads in `0..10`.
pub const HANDLER_A: &str = "Handler A";
/// Name reported by the handler for payloads in `10..20`.
pub const HANDLER_B: &str = "Handler B";

/// The two-handler chain `A → B`.
///
/// A takes `0..10`, B takes `10..20`, anything else falls off the end.
/// Both report to `sink`.
///
/// ```rust
/// use std::sync::Arc;
/// use handoff::{preset, RecordingSink, Request};
///
/// let sink = Arc::new(RecordingSink::new());
/// let chain = preset::reference_chain(sink.clone());
///
/// chain.handle(&Request::new(15));
/// assert_eq!(sink.values(preset::HANDLER_B), vec![15]);
/// ```
pub fn reference_chain(sink: SharedSink) -> Chain {
    Chain::new()
        .then(RangeHandler::new(HANDLER_A, 0..10, sink.clone()))
        .then(RangeHandler::new(HANDLER_B, 10..20, sink))
}
