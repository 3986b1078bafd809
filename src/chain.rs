//! The handler chain.
//!
//! Handlers live in an arena owned by the [`Chain`]. A successor link is a
//! [`HandlerId`], an index into that arena tagged with the identity of the
//! chain that issued it. Links never own anything, so rebuilding or relinking
//! a chain cannot leave a dangling handler behind, and an id from one chain
//! never resolves to a handler in another.
//!
//! Dispatch walks from a starting handler along successor links until some
//! handler accepts or the links run out:
//!
//! ```text
//! entry ──rejects──▶ successor ──rejects──▶ … ──▶ (no successor) ⇒ Dropped
//!   │                   │
//!   accepts ⇒ act()     accepts ⇒ act()         ⇒ Handled
//! ```
//!
//! # Cycles
//!
//! [`Chain::set_successor`] does not stop you from linking a handler back to
//! one already on its path. Such a chain is a wiring bug. Dispatch will not
//! spin on it: an acyclic walk visits at most [`Chain::len`] handlers, so a
//! longer walk is cut off, logged at `warn` and reported as dropped.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::handler::{BoxedHandler, Handler};
use crate::request::Request;

static NEXT_CHAIN: AtomicU64 = AtomicU64::new(1);

/// Identifies a handler inside the [`Chain`] that issued it.
///
/// Only meaningful to that chain. Every other chain rejects it.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct HandlerId {
    chain: u64,
    index: usize,
}

impl HandlerId {
    /// Position in the issuing chain, in the order handlers were added.
    pub fn index(self) -> usize { self.index }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.chain, self.index)
    }
}

/// What happened to a dispatched request.
///
/// Both variants are normal outcomes. `hops` counts the handlers whose
/// predicate was consulted, including the one that accepted.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Dispatch {
    Handled { by: HandlerId, hops: usize },
    Dropped { hops: usize },
}

impl Dispatch {
    /// The handler that took the request, if any.
    pub fn handled_by(self) -> Option<HandlerId> {
        match self {
            Self::Handled { by, .. } => Some(by),
            Self::Dropped { .. } => None,
        }
    }

    pub fn is_dropped(self) -> bool {
        matches!(self, Self::Dropped { .. })
    }

    pub fn hops(self) -> usize {
        match self {
            Self::Handled { hops, .. } | Self::Dropped { hops } => hops,
        }
    }
}

struct Node {
    handler: BoxedHandler,
    successor: Option<HandlerId>,
}

/// An owned set of handlers plus the successor links between them.
///
/// Build it once, then dispatch as often as you like. Dispatch borrows the
/// chain immutably, so routing is purely a function of the links and the
/// handlers' predicates.
///
/// ```rust
/// use std::sync::Arc;
/// use handoff::{Chain, RangeHandler, RecordingSink, Request};
///
/// let sink = Arc::new(RecordingSink::new());
/// let chain = Chain::new()
///     .then(RangeHandler::new("Handler A", 0..10, sink.clone()))
///     .then(RangeHandler::new("Handler B", 10..20, sink.clone()));
///
/// for v in 0..30 {
///     chain.handle(&Request::new(v));
/// }
/// assert_eq!(sink.count("Handler A"), 10);
/// assert_eq!(sink.count("Handler B"), 10);
/// ```
pub struct Chain {
    id: u64,
    nodes: Vec<Node>,
    entry: Option<HandlerId>,
}

impl Chain {
    pub fn new() -> Self {
        let id = NEXT_CHAIN.fetch_add(1, Ordering::Relaxed);
        Self { id, nodes: Vec::new(), entry: None }
    }

    /// Adds `handler` as the successor of the most recently added one.
    /// Returns `self` so calls chain naturally.
    ///
    /// The first handler becomes the entry.
    pub fn then(mut self, handler: impl Handler + 'static) -> Self {
        let prev = self.nodes.len().checked_sub(1);
        let id = self.add(handler);
        if let Some(prev) = prev {
            self.nodes[prev].successor = Some(id);
        }
        self
    }

    /// Adds `handler` with no successor and no predecessor.
    ///
    /// The first handler added to an empty chain becomes its entry.
    pub fn add(&mut self, handler: impl Handler + 'static) -> HandlerId {
        let id = HandlerId { chain: self.id, index: self.nodes.len() };
        self.nodes.push(Node { handler: Box::new(handler), successor: None });
        if self.entry.is_none() {
            self.entry = Some(id);
        }
        id
    }

    /// Makes `next` the handler tried after `of` rejects.
    ///
    /// Replaces any existing link. Setting the same link twice is a no-op.
    pub fn set_successor(&mut self, of: HandlerId, next: HandlerId) -> Result<()> {
        self.check(next)?;
        self.node_mut(of)?.successor = Some(next);
        Ok(())
    }

    /// Removes the link out of `of`, making it a chain end.
    pub fn clear_successor(&mut self, of: HandlerId) -> Result<()> {
        self.node_mut(of)?.successor = None;
        Ok(())
    }

    pub fn successor(&self, of: HandlerId) -> Option<HandlerId> {
        self.node(of)?.successor
    }

    /// Changes where [`handle`](Chain::handle) starts.
    pub fn set_entry(&mut self, id: HandlerId) -> Result<()> {
        self.check(id)?;
        self.entry = Some(id);
        Ok(())
    }

    pub fn entry(&self) -> Option<HandlerId> { self.entry }

    pub fn name(&self, id: HandlerId) -> Option<&str> {
        self.node(id).map(|n| n.handler.name())
    }

    pub fn len(&self) -> usize { self.nodes.len() }
    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    /// Routes `request` from the entry handler.
    pub fn handle(&self, request: &Request) -> Dispatch {
        match self.entry {
            Some(entry) => self.handle_from(entry, request),
            None => {
                debug!(value = request.value(), "empty chain, request dropped");
                Dispatch::Dropped { hops: 0 }
            }
        }
    }

    /// Routes `request` starting at `start`.
    ///
    /// The first handler that accepts acts once and the walk stops. Running
    /// out of successors drops the request silently. An id this chain never
    /// issued is treated as a chain end.
    pub fn handle_from(&self, start: HandlerId, request: &Request) -> Dispatch {
        let mut current = Some(start);
        let mut hops = 0;

        while let Some(id) = current {
            let Some(node) = self.node(id) else { break };

            if hops == self.nodes.len() {
                warn!(
                    value = request.value(),
                    at = %id,
                    "successor cycle detected, request dropped"
                );
                return Dispatch::Dropped { hops };
            }
            hops += 1;

            if node.handler.accepts(request) {
                debug!(handler = node.handler.name(), value = request.value(), hops, "accepted");
                node.handler.act(request);
                return Dispatch::Handled { by: id, hops };
            }

            trace!(handler = node.handler.name(), value = request.value(), "rejected, forwarding");
            current = node.successor;
        }

        debug!(value = request.value(), hops, "no handler accepted, request dropped");
        Dispatch::Dropped { hops }
    }

    fn check(&self, id: HandlerId) -> Result<()> {
        self.node(id).map(|_| ()).ok_or(Error::UnknownHandler(id))
    }

    fn node(&self, id: HandlerId) -> Option<&Node> {
        if id.chain != self.id {
            return None;
        }
        self.nodes.get(id.index)
    }

    fn node_mut(&mut self, id: HandlerId) -> Result<&mut Node> {
        if id.chain != self.id {
            return Err(Error::UnknownHandler(id));
        }
        self.nodes.get_mut(id.index).ok_or(Error::UnknownHandler(id))
    }
}

impl Default for Chain {
    fn default() -> Self { Self::new() }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let links: Vec<_> = self.nodes.iter()
            .map(|n| (n.handler.name(), n.successor))
            .collect();
        f.debug_struct("Chain")
            .field("entry", &self.entry)
            .field("links", &links)
            .finish()
    }
}
