// Path: crates/types/src/error/mod.rs
//! Error taxonomy for the whitelist mint client.
//!
//! Every failure is recovered at the boundary where it occurs: reads fall
//! back to the previously known state, writes clear the busy flag, and a
//! network mismatch aborts the operation after notifying the user.

use crate::app::{ChainId, SalePhase, WriteKind};
use alloy_primitives::TxHash;
use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// A raw failure reported by the wallet or the sale contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    /// The RPC transport failed or timed out.
    #[error("Transport error: {0}")]
    Transport(String),
    /// The contract reverted the call.
    #[error("Contract reverted: {0}")]
    Reverted(String),
    /// The user rejected the wallet prompt.
    #[error("Request rejected by the wallet user")]
    Rejected,
    /// The wallet exposes no authorized account.
    #[error("Wallet has no authorized account")]
    NoAccount,
    /// Waiting for block inclusion failed.
    #[error("Confirmation failed: {0}")]
    Confirmation(String),
}

impl ErrorCode for ChainError {
    fn code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "CHAIN_TRANSPORT",
            Self::Reverted(_) => "CHAIN_REVERTED",
            Self::Rejected => "CHAIN_REJECTED",
            Self::NoAccount => "CHAIN_NO_ACCOUNT",
            Self::Confirmation(_) => "CHAIN_CONFIRMATION",
        }
    }
}

/// Errors obtaining a connection to the target network.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The wallet is connected to a different chain than the configured one.
    #[error("Wrong network. Expected chain {expected}, got {actual}")]
    WrongNetwork {
        /// The configured chain id.
        expected: ChainId,
        /// The chain id the connection reported.
        actual: ChainId,
    },
    /// The user declined the wallet authorization prompt.
    #[error("Wallet authorization declined")]
    AuthorizationDeclined,
    /// The wallet or the network could not be reached.
    #[error("Connection unavailable: {0}")]
    Unavailable(ChainError),
}

impl From<ChainError> for ResolveError {
    fn from(e: ChainError) -> Self {
        match e {
            ChainError::Rejected | ChainError::NoAccount => Self::AuthorizationDeclined,
            other => Self::Unavailable(other),
        }
    }
}

impl ErrorCode for ResolveError {
    fn code(&self) -> &'static str {
        match self {
            Self::WrongNetwork { .. } => "RESOLVE_WRONG_NETWORK",
            Self::AuthorizationDeclined => "RESOLVE_AUTHORIZATION_DECLINED",
            Self::Unavailable(_) => "RESOLVE_UNAVAILABLE",
        }
    }
}

/// A transient read failure. Callers keep the prior known state and retry
/// on the next poll tick or user action.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    /// No connection could be resolved.
    #[error("Read aborted: {0}")]
    Resolve(#[from] ResolveError),
    /// The contract query failed.
    #[error("Read of `{method}` failed: {source}")]
    Call {
        /// The contract method that was queried.
        method: &'static str,
        /// The underlying failure.
        source: ChainError,
    },
}

impl ErrorCode for ReadError {
    fn code(&self) -> &'static str {
        match self {
            Self::Resolve(e) => e.code(),
            Self::Call { .. } => "READ_CALL_FAILED",
        }
    }
}

/// A write failure. Busy is cleared, no state change is assumed, and the
/// user must re-trigger the operation manually.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WriteError {
    /// No wallet is connected yet.
    #[error("Wallet not connected")]
    NotConnected,
    /// Another write is already in flight.
    #[error("Another transaction is in flight")]
    Busy,
    /// The current phase does not offer this operation.
    #[error("`{action}` is not available while the sale is {phase}")]
    Unavailable {
        /// The refused operation.
        action: WriteKind,
        /// The phase at the time of the request.
        phase: SalePhase,
    },
    /// No signing connection could be resolved.
    #[error("Write aborted: {0}")]
    Resolve(#[from] ResolveError),
    /// Submitting the transaction failed.
    #[error("Submitting `{method}` failed: {source}")]
    Submit {
        /// The contract method that was called.
        method: &'static str,
        /// The underlying failure.
        source: ChainError,
    },
    /// The transaction was submitted but confirmation failed.
    #[error("Confirming `{method}` failed: {source}")]
    Confirm {
        /// The contract method that was called.
        method: &'static str,
        /// The underlying failure.
        source: ChainError,
    },
    /// The transaction was mined but execution failed.
    #[error("`{method}` reverted in transaction {tx_hash}")]
    Reverted {
        /// The contract method that was called.
        method: &'static str,
        /// The hash of the failed transaction.
        tx_hash: TxHash,
    },
}

impl ErrorCode for WriteError {
    fn code(&self) -> &'static str {
        match self {
            Self::NotConnected => "WRITE_NOT_CONNECTED",
            Self::Busy => "WRITE_BUSY",
            Self::Unavailable { .. } => "WRITE_UNAVAILABLE",
            Self::Resolve(e) => e.code(),
            Self::Submit { .. } => "WRITE_SUBMIT_FAILED",
            Self::Confirm { .. } => "WRITE_CONFIRM_FAILED",
            Self::Reverted { .. } => "WRITE_REVERTED",
        }
    }
}

/// Errors loading or validating `SaleConfig`.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration file is not valid TOML for `SaleConfig`.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A field holds an unusable value.
    #[error("Invalid `{field}`: {reason}")]
    Invalid {
        /// The offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

impl ErrorCode for ConfigError {
    fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "CONFIG_IO",
            Self::Parse(_) => "CONFIG_PARSE",
            Self::Invalid { .. } => "CONFIG_INVALID",
        }
    }
}
