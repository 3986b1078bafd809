//! Handler trait and type erasure.
//!
//! # How handlers are stored
//!
//! A [`Chain`](crate::Chain) holds handlers of *different* concrete types in
//! one `Vec`. Rust collections hold one type, so every handler is boxed as a
//! trait object (`dyn Handler`) and the chain stores them uniformly:
//!
//! ```text
//! RangeHandler::new("A", 0..10, sink)        ← caller builds this
//!        ↓ chain.then(handler)
//! Box::new(handler)                          ← BoxedHandler
//!        ↓ stored in the chain's arena
//! handler.accepts(req) / handler.act(req)    ← one vtable call each
//! ```
//!
//! A handler knows nothing about its successor. Links live in the chain, so a
//! handler can be written, tested and reused without a chain around it.

use std::fmt;
use std::ops::Range;

use crate::request::Request;
use crate::sink::Sink;

// ── Public Handler trait ──────────────────────────────────────────────────────

/// One link's worth of behaviour: decide, then act.
///
/// The chain calls [`accepts`](Handler::accepts) first. Only if it returns
/// `true` does it call [`act`](Handler::act), exactly once, and stop walking.
/// Neither method can change the request.
pub trait Handler: Send + Sync {
    /// Short label used in logs and sink notifications.
    fn name(&self) -> &str;

    fn accepts(&self, request: &Request) -> bool;

    fn act(&self, request: &Request);
}

/// A heap-allocated, type-erased handler owned by a chain.
pub type BoxedHandler = Box<dyn Handler>;

impl<H: Handler + ?Sized> Handler for Box<H> {
    fn name(&self) -> &str { (**self).name() }
    fn accepts(&self, request: &Request) -> bool { (**self).accepts(request) }
    fn act(&self, request: &Request) { (**self).act(request) }
}

// ── RangeHandler ──────────────────────────────────────────────────────────────

/// Accepts payloads inside a half-open range and reports them to a sink.
///
/// ```rust
/// use std::sync::Arc;
/// use handoff::{Handler, RangeHandler, RecordingSink, Request};
///
/// let sink = Arc::new(RecordingSink::new());
/// let a = RangeHandler::new("Handler A", 0..10, sink.clone());
///
/// assert!(a.accepts(&Request::new(9)));
/// assert!(!a.accepts(&Request::new(10)));
/// ```
pub struct RangeHandler<S> {
    name: String,
    range: Range<i32>,
    sink: S,
}

impl<S: Sink> RangeHandler<S> {
    pub fn new(name: impl Into<String>, range: Range<i32>, sink: S) -> Self {
        Self { name: name.into(), range, sink }
    }

    pub fn range(&self) -> &Range<i32> { &self.range }
}

impl<S: Sink> Handler for RangeHandler<S> {
    fn name(&self) -> &str { &self.name }

    fn accepts(&self, request: &Request) -> bool {
        self.range.contains(&request.value())
    }

    fn act(&self, request: &Request) {
        self.sink.notify(&self.name, request);
    }
}

impl<S> fmt::Debug for RangeHandler<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeHandler")
            .field("name", &self.name)
            .field("range", &self.range)
            .finish_non_exhaustive()
    }
}

// ── Closure adapter ───────────────────────────────────────────────────────────

/// Builds a handler from a predicate and an action.
///
/// ```rust
/// use handoff::{handler_fn, Handler, Request};
///
/// let evens = handler_fn("evens", |r: &Request| r.value() % 2 == 0, |_| {});
/// assert!(evens.accepts(&Request::new(4)));
/// ```
pub fn handler_fn<P, A>(name: impl Into<String>, accepts: P, act: A) -> FnHandler<P, A>
where
    P: Fn(&Request) -> bool + Send + Sync,
    A: Fn(&Request) + Send + Sync,
{
    FnHandler { name: name.into(), accepts, act }
}

/// Newtype pair of closures implementing [`Handler`]. See [`handler_fn`].
pub struct FnHandler<P, A> {
    name: String,
    accepts: P,
    act: A,
}

impl<P, A> Handler for FnHandler<P, A>
where
    P: Fn(&Request) -> bool + Send + Sync,
    A: Fn(&Request) + Send + Sync,
{
    fn name(&self) -> &str { &self.name }

    fn accepts(&self, request: &Request) -> bool {
        (self.accepts)(request)
    }

    fn act(&self, request: &Request) {
        (self.act)(request)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::sink::RecordingSink;

    #[test]
    fn range_is_half_open() {
        let h = RangeHandler::new("B", 10..20, RecordingSink::new());
        assert_eq!(h.range(), &(10..20));
        assert!(!h.accepts(&Request::new(9)));
        assert!(h.accepts(&Request::new(10)));
        assert!(h.accepts(&Request::new(19)));
        assert!(!h.accepts(&Request::new(20)));
        assert!(!h.accepts(&Request::new(-1)));
    }

    #[test]
    fn range_handler_reports_its_name() {
        let sink = Arc::new(RecordingSink::new());
        let h = RangeHandler::new("Handler A", 0..10, sink.clone());
        h.act(&Request::new(5));
        assert_eq!(sink.events(), vec![("Handler A".to_owned(), 5)]);
    }

    #[test]
    fn accepts_has_no_side_effect() {
        let sink = Arc::new(RecordingSink::new());
        let h = RangeHandler::new("A", 0..10, sink.clone());
        for v in -5..25 {
            let _ = h.accepts(&Request::new(v));
        }
        assert!(sink.is_empty());
    }

    #[test]
    fn closure_handler_runs_both_closures() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let h: BoxedHandler = Box::new(handler_fn(
            "negatives",
            |r: &Request| r.value() < 0,
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            },
        ));

        assert_eq!(h.name(), "negatives");
        assert!(h.accepts(&Request::new(-3)));
        assert!(!h.accepts(&Request::new(0)));
        h.act(&Request::new(-3));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
