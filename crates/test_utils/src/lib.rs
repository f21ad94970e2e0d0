// Path: crates/test_utils/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # Whitelist Mint Test Utilities
//!
//! An in-memory stand-in for the wallet and sale contract, plus a settable
//! clock, a recording notifier and assertion macros.

pub mod assertions;
pub mod chain;
pub mod env;

pub use chain::{MockChain, PRESALE_DURATION_SECS};
pub use env::{ManualClock, RecordingNotifier};
