// Path: crates/types/src/view.rs
//! The renderer-facing snapshot of a session and the total mapping from
//! `SalePhase` to the single affordance a renderer shows for it.

use crate::app::{AccountRole, SalePhase, WriteKind};
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// Everything a renderer consumes. Produced by the session on every change.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SessionView {
    /// Whether a wallet connection has been established.
    pub connected: bool,
    /// Whether a write transaction is in flight.
    pub busy: bool,
    /// The connected account's role, if an owner lookup has succeeded.
    pub role: Option<AccountRole>,
    /// The last owner address read from the contract.
    pub owner: Option<Address>,
    /// The current phase.
    pub phase: SalePhase,
    /// Tokens minted so far.
    pub minted: U256,
    /// The fixed collection size, for display only.
    pub collection_size: u64,
}

impl SessionView {
    /// The affordance for the current phase.
    pub fn affordance(&self) -> Affordance {
        Affordance::for_phase(self.phase)
    }

    /// The minted-count line, e.g. `"3/20 have been minted"`.
    pub fn minted_line(&self) -> String {
        format!("{}/{} have been minted", self.minted, self.collection_size)
    }
}

/// The user action an affordance triggers when activated.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UserAction {
    /// Connect the wallet.
    Connect,
    /// Perform a write.
    Write(WriteKind),
}

/// One of the mutually exclusive controls a renderer shows.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Affordance {
    /// "Connect your Wallet" button.
    ConnectButton,
    /// Inert "Loading..." button.
    LoadingButton,
    /// "Start Presale!" button.
    StartPresaleButton,
    /// Inert "Presale has not started yet." notice.
    NotStartedNotice,
    /// Presale banner with a "Presale Mint" button.
    PresaleMint,
    /// Public-sale banner with a "Public Mint" button.
    PublicMint,
}

impl Affordance {
    /// Total over `SalePhase`: every phase renders exactly one affordance.
    pub fn for_phase(phase: SalePhase) -> Self {
        match phase {
            SalePhase::NotConnected => Self::ConnectButton,
            SalePhase::Loading => Self::LoadingButton,
            SalePhase::OwnerCanStart => Self::StartPresaleButton,
            SalePhase::WaitingForStart => Self::NotStartedNotice,
            SalePhase::PresaleOpen => Self::PresaleMint,
            SalePhase::PublicOpen => Self::PublicMint,
        }
    }

    /// The button or notice text.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ConnectButton => "Connect your Wallet",
            Self::LoadingButton => "Loading...",
            Self::StartPresaleButton => "Start Presale!",
            Self::NotStartedNotice => "Presale has not started yet.",
            Self::PresaleMint => "Presale Mint",
            Self::PublicMint => "Public Mint",
        }
    }

    /// The banner shown above the button, if any.
    pub fn banner(&self, collection_name: &str) -> Option<String> {
        match self {
            Self::PresaleMint => Some(format!(
                "Presale has started! If your address is whitelisted, mint a {}!",
                collection_name
            )),
            Self::PublicMint => Some("Presale has ended, and public mint is live!".to_string()),
            _ => None,
        }
    }

    /// What activating the control does. `None` for inert controls.
    pub fn action(&self) -> Option<UserAction> {
        match self {
            Self::ConnectButton => Some(UserAction::Connect),
            Self::StartPresaleButton => Some(UserAction::Write(WriteKind::StartPresale)),
            Self::PresaleMint => Some(UserAction::Write(WriteKind::PresaleMint)),
            Self::PublicMint => Some(UserAction::Write(WriteKind::PublicMint)),
            Self::LoadingButton | Self::NotStartedNotice => None,
        }
    }
}
