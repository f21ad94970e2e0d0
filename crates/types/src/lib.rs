// Path: crates/types/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! # Whitelist Mint Types
//!
//! This crate is the foundational library for the whitelist mint client,
//! containing the sale-phase vocabulary, the renderer view model, the
//! configuration object, and the error taxonomy.
//!
//! ## Architectural Role
//!
//! As the base crate, `mint-types` has minimal dependencies and is itself a
//! dependency for every other crate in the workspace. This keeps the seam
//! traits in `mint-api` and the logic in `mint-client` / `mint-controller`
//! free of circular dependencies.

/// Core sale data structures like `SalePhase`, `AccountRole`, and `TxReceipt`.
pub mod app;
/// The client configuration (`SaleConfig`) and its TOML loader.
pub mod config;
/// A unified set of all error types used across the workspace.
pub mod error;
/// The renderer-facing view model and the phase-to-affordance table.
pub mod view;

pub use alloy_primitives::{Address, TxHash, U256};
