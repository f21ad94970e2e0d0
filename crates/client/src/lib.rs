// Path: crates/client/src/lib.rs
//! # Whitelist Mint Client Crate Lints
//!
//! This crate enforces a strict set of lints to ensure high-quality,
//! panic-free code. Panics are disallowed in non-test code to promote
//! robust error handling.
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

//! # Whitelist Mint Client
//!
//! Resolves read-only and signing connections to the configured network and
//! wraps the sale contract in typed read and write facades.

pub mod evm;
pub mod reads;
pub mod resolver;
pub mod writes;

pub use reads::SaleReads;
pub use resolver::{ChainConnection, ConnectionResolver, ReadConnection, SigningConnection};
pub use writes::SaleWrites;
