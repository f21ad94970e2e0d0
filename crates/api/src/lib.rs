// Path: crates/api/src/lib.rs
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
#![deny(missing_docs)]

//! # Whitelist Mint API
//!
//! Defines the seams between the client and its external collaborators:
//! the wallet connector and the provider handle it yields, the sale
//! contract's read and write surfaces, the notifier that interrupts the
//! user, and the wall clock.

/// Wallet connector and provider handle traits.
pub mod wallet;
/// Sale contract read and write traits.
pub mod contract;
/// User notification and time sources.
pub mod env;

pub use contract::{PendingTransaction, SaleReader, SaleWriter};
pub use env::{Clock, Notifier, SystemClock};
pub use wallet::{WalletConnector, WalletProvider};
