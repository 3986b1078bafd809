//! The reference chain, driven end to end.
//!
//! Run with:
//!   cargo run --example chain
//!   RUST_LOG=debug cargo run --example chain   # also show routing decisions
//!
//! Payloads 0..30 go in. 0..10 land on Handler A, 10..20 on Handler B, the
//! rest fall off the end. A few boundary values follow.

use std::sync::Arc;

use handoff::{Request, StdoutSink, preset};

fn main() {
    tracing_subscriber::fmt::init();

    let chain = preset::reference_chain(Arc::new(StdoutSink));

    let mut dropped = 0;
    for v in (0..30).chain([-1, i32::MIN, i32::MAX]) {
        if chain.handle(&Request::new(v)).is_dropped() {
            dropped += 1;
        }
    }

    println!("{dropped} requests had no taker");
}
