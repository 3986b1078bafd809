//! # handoff
//!
//! A chain of responsibility. Nothing more. Nothing less.
//!
//! ## The contract
//!
//! A request walks down a chain of handlers. The first handler that accepts
//! it acts on it, once, and the walk stops. A handler that rejects hands the
//! same request to its successor. If nobody accepts, the request is dropped.
//! Dropping is a normal outcome, not an error.
//!
//! - **Handlers** decide and act. See [`Handler`].
//! - **The chain** owns the handlers and the links between them. See [`Chain`].
//! - **Sinks** receive the side effect of acting. See [`Sink`].
//!
//! Routing is a pure function of link order and predicates. Dispatch borrows
//! the chain immutably and keeps no state between calls.
//!
//! ## Quick start
//!
//! ```rust
//! use handoff::{Chain, Dispatch, RangeHandler, Request, TracingSink};
//!
//! let chain = Chain::new()
//!     .then(RangeHandler::new("Handler A", 0..10,  TracingSink))
//!     .then(RangeHandler::new("Handler B", 10..20, TracingSink));
//!
//! let b = chain.successor(chain.entry().unwrap()).unwrap();
//! assert_eq!(chain.handle(&Request::new(12)), Dispatch::Handled { by: b, hops: 2 });
//! assert!(chain.handle(&Request::new(42)).is_dropped());
//! ```

mod chain;
mod error;
mod handler;
mod request;
mod sink;

pub mod preset;

pub use chain::{Chain, Dispatch, HandlerId};
pub use error::{Error, Result};
pub use handler::{BoxedHandler, FnHandler, Handler, RangeHandler, handler_fn};
pub use request::Request;
pub use sink::{RecordingSink, SharedSink, Sink, StdoutSink, TracingSink, WriterSink};
