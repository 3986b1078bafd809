//! Unified error type.
//!
//! Dispatch never fails: a request nobody accepts is dropped, and that is
//! reported through [`Dispatch`](crate::Dispatch), not here. This type only
//! surfaces mistakes made while wiring a chain together.

use thiserror::Error;

use crate::chain::HandlerId;

/// Errors raised while building or relinking a [`Chain`](crate::Chain).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The id was not issued by this chain.
    #[error("unknown handler: {0}")]
    UnknownHandler(HandlerId),
}

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
