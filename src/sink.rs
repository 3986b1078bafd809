//! Where an accepting handler reports its work.
//!
//! Handling a request is a side effect: somebody outside the chain gets told
//! that handler `name` took request `value`. A [`Sink`] is that somebody.
//! Sinks are shared between handlers and possibly threads, so every
//! implementation synchronises its own output.

use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::info;

use crate::request::Request;

/// A synchronised destination for handler notifications.
pub trait Sink: Send + Sync {
    fn notify(&self, handler: &str, request: &Request);
}

/// A sink shared by several handlers.
pub type SharedSink = Arc<dyn Sink>;

impl<S: Sink + ?Sized> Sink for Arc<S> {
    fn notify(&self, handler: &str, request: &Request) {
        (**self).notify(handler, request)
    }
}

// ── TracingSink ───────────────────────────────────────────────────────────────

/// Emits one `info` event per handled request.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl Sink for TracingSink {
    fn notify(&self, handler: &str, request: &Request) {
        info!(handler, value = request.value(), "handled request");
    }
}

// ── Line sinks ────────────────────────────────────────────────────────────────

/// One `"<handler>: Handle request <value>"` line. Write errors are ignored.
fn write_line(out: &mut impl Write, handler: &str, request: &Request) {
    let _ = writeln!(out, "{handler}: Handle request {}", request.value());
}

/// Writes one line per handled request to any [`Write`].
///
/// The writer sits behind a `Mutex`, so each line lands whole even when
/// several threads dispatch at once.
#[derive(Debug, Default)]
pub struct WriterSink<W> {
    out: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    /// Gives the writer back, e.g. to inspect a `Vec<u8>` buffer.
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write + Send> Sink for WriterSink<W> {
    fn notify(&self, handler: &str, request: &Request) {
        let mut out = self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        write_line(&mut *out, handler, request);
    }
}

/// The stdout case of [`WriterSink`].
///
/// Uses the process-wide stdout lock instead of a private `Mutex`, so lines
/// never interleave with other stdout writers either.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdoutSink;

impl Sink for StdoutSink {
    fn notify(&self, handler: &str, request: &Request) {
        write_line(&mut std::io::stdout().lock(), handler, request);
    }
}

// ── RecordingSink ─────────────────────────────────────────────────────────────

/// Keeps every notification in memory, in arrival order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<(String, i32)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of everything recorded so far.
    pub fn events(&self) -> Vec<(String, i32)> {
        self.lock().clone()
    }

    /// How many requests `handler` has taken.
    pub fn count(&self, handler: &str) -> usize {
        self.lock().iter().filter(|(name, _)| name == handler).count()
    }

    /// Payloads taken by `handler`, in arrival order.
    pub fn values(&self, handler: &str) -> Vec<i32> {
        self.lock()
            .iter()
            .filter(|(name, _)| name == handler)
            .map(|(_, v)| *v)
            .collect()
    }

    pub fn len(&self) -> usize { self.lock().len() }
    pub fn is_empty(&self) -> bool { self.lock().is_empty() }

    pub fn clear(&self) {
        self.lock().clear();
    }

    // A panicking handler on another thread must not make the log unreadable.
    fn lock(&self) -> MutexGuard<'_, Vec<(String, i32)>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Sink for RecordingSink {
    fn notify(&self, handler: &str, request: &Request) {
        self.lock().push((handler.to_owned(), request.value()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::{self, HANDLER_A, HANDLER_B};

    #[test]
    fn writer_sink_prints_reference_lines() {
        let sink = Arc::new(WriterSink::new(Vec::new()));
        let chain = preset::reference_chain(sink.clone());
        for v in 0..30 {
            chain.handle(&Request::new(v));
        }
        drop(chain);

        let bytes = Arc::try_unwrap(sink).ok().unwrap().into_inner();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        let expected: Vec<String> = (0..10)
            .map(|v| format!("{HANDLER_A}: Handle request {v}"))
            .chain((10..20).map(|v| format!("{HANDLER_B}: Handle request {v}")))
            .collect();
        assert_eq!(lines, expected);
        assert_eq!(lines[0], "Handler A: Handle request 0");
        assert_eq!(lines[19], "Handler B: Handle request 19");
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> { Ok(()) }
    }

    #[test]
    fn tracing_sink_emits_one_event_per_request() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .without_time()
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            TracingSink.notify(HANDLER_A, &Request::new(3));
            TracingSink.notify(HANDLER_B, &Request::new(14));
        });

        let text = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        let events: Vec<&str> = text.lines().filter(|l| l.contains("handled request")).collect();
        assert_eq!(events.len(), 2);
        assert!(events[0].contains(HANDLER_A) && events[0].contains("value=3"));
        assert!(events[1].contains(HANDLER_B) && events[1].contains("value=14"));
    }

    #[test]
    fn recording_sink_keeps_order_and_counts() {
        let sink = RecordingSink::new();
        sink.notify("A", &Request::new(3));
        sink.notify("B", &Request::new(12));
        sink.notify("A", &Request::new(4));

        assert_eq!(sink.len(), 3);
        assert_eq!(sink.count("A"), 2);
        assert_eq!(sink.count("B"), 1);
        assert_eq!(sink.values("A"), vec![3, 4]);
        assert_eq!(sink.events()[1], ("B".to_owned(), 12));

        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn shared_sink_forwards_to_inner() {
        let inner = Arc::new(RecordingSink::new());
        let shared: SharedSink = inner.clone();
        shared.notify("A", &Request::new(1));
        assert_eq!(inner.values("A"), vec![1]);
    }
}
