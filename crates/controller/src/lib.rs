// Path: crates/controller/src/lib.rs
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

//! # Whitelist Mint Controller
//!
//! Mediates between the user's wallet and the sale contract. The
//! [`machine`] decides which of the sale phases applies, the [`session`]
//! holds the flags it decides from and publishes every change to
//! renderers, the [`poller`] re-evaluates on a fixed period until the sale
//! reaches its terminal phase, and [`SaleController`] ties them to the
//! user's actions.

pub mod controller;
pub mod machine;
pub mod poller;
pub mod session;

pub use controller::SaleController;
pub use machine::{derive_phase, presale_elapsed, PhaseInputs};
pub use poller::{PollExit, PollStep, PollTarget, Poller, PollerHandle};
pub use session::{BusyGuard, Session, SessionState};
