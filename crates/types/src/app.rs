// Path: crates/types/src/app.rs
//! Sale-phase vocabulary shared by the client, the controller and renderers.

use alloy_primitives::{Address, TxHash};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A numeric chain identifier as reported by a connection.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ChainId(pub u64);

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// The UI phase of the two-stage sale. Exactly one holds at any instant.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SalePhase {
    /// No wallet has been connected in this session.
    NotConnected,
    /// A write transaction is in flight.
    Loading,
    /// The connected account owns the contract and the sale has not started.
    OwnerCanStart,
    /// The sale has not started and the connected account cannot start it.
    WaitingForStart,
    /// The presale window is open.
    PresaleOpen,
    /// The presale window has elapsed and public minting is live.
    PublicOpen,
}

impl SalePhase {
    /// Every phase, in decision-table order.
    pub const ALL: [SalePhase; 6] = [
        SalePhase::NotConnected,
        SalePhase::Loading,
        SalePhase::OwnerCanStart,
        SalePhase::WaitingForStart,
        SalePhase::PresaleOpen,
        SalePhase::PublicOpen,
    ];

    /// A stable label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotConnected => "not_connected",
            Self::Loading => "loading",
            Self::OwnerCanStart => "owner_can_start",
            Self::WaitingForStart => "waiting_for_start",
            Self::PresaleOpen => "presale_open",
            Self::PublicOpen => "public_open",
        }
    }

    /// True once no further phase change is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::PublicOpen)
    }

    /// True for phases derived from contract reads, as opposed to
    /// `NotConnected` and `Loading`, which are derived from session flags.
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::NotConnected | Self::Loading)
    }
}

impl fmt::Display for SalePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The connected account's relationship to the sale contract's owner.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccountRole {
    /// The connected signer is the contract owner.
    Owner,
    /// The connected signer is any other account.
    NotOwner,
}

impl AccountRole {
    /// Compares the signer against the reported owner. Both are parsed
    /// addresses, so checksum casing in their textual form is irrelevant.
    pub fn of(account: &Address, owner: &Address) -> Self {
        if account == owner {
            Self::Owner
        } else {
            Self::NotOwner
        }
    }
}

/// The state-changing operations a user can trigger.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WriteKind {
    /// `startPresale()`, owner only.
    StartPresale,
    /// `presaleMint()`, payable.
    PresaleMint,
    /// `mint()`, payable.
    PublicMint,
}

impl WriteKind {
    /// The contract method the operation targets.
    pub fn method(&self) -> &'static str {
        match self {
            Self::StartPresale => "startPresale",
            Self::PresaleMint => "presaleMint",
            Self::PublicMint => "mint",
        }
    }

    /// The only phase in which the renderer offers this operation.
    pub fn offered_in(&self) -> SalePhase {
        match self {
            Self::StartPresale => SalePhase::OwnerCanStart,
            Self::PresaleMint => SalePhase::PresaleOpen,
            Self::PublicMint => SalePhase::PublicOpen,
        }
    }

    /// True if the call carries the unit price as payment.
    pub fn is_payable(&self) -> bool {
        !matches!(self, Self::StartPresale)
    }
}

impl fmt::Display for WriteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method())
    }
}

/// The outcome of a mined transaction.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TxReceipt {
    /// The hash of the included transaction.
    pub tx_hash: TxHash,
    /// The block the transaction was included in, if reported.
    pub block_number: Option<u64>,
    /// Whether execution succeeded.
    pub success: bool,
}

/// A user-interrupting message. Only network mismatch and successful mints
/// interrupt the user; everything else is logged.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    /// The wallet is on the wrong network.
    WrongNetwork {
        /// The configured chain id.
        expected: ChainId,
        /// The chain id the wallet reported.
        actual: ChainId,
        /// Human-readable name of the expected network.
        network_name: String,
    },
    /// A mint transaction was confirmed.
    Minted {
        /// Which mint succeeded.
        kind: WriteKind,
        /// The collection name for the message.
        collection_name: String,
    },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongNetwork { network_name, .. } => {
                write!(f, "Change the network to {}", network_name)
            }
            Self::Minted {
                collection_name, ..
            } => write!(f, "You successfully minted a {}!", collection_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn role_comparison_ignores_checksum_casing() {
        let checksummed =
            Address::from_str("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").unwrap();
        let lower = Address::from_str("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
        assert_eq!(AccountRole::of(&lower, &checksummed), AccountRole::Owner);
        assert_eq!(
            AccountRole::of(&Address::ZERO, &checksummed),
            AccountRole::NotOwner
        );
    }

    #[test]
    fn each_write_is_offered_in_exactly_one_phase() {
        for kind in [
            WriteKind::StartPresale,
            WriteKind::PresaleMint,
            WriteKind::PublicMint,
        ] {
            let offered: Vec<_> = SalePhase::ALL
                .iter()
                .filter(|p| **p == kind.offered_in())
                .collect();
            assert_eq!(offered.len(), 1);
            assert!(kind.offered_in().is_settled());
        }
    }

    #[test]
    fn notices_render_user_messages() {
        let n = Notice::WrongNetwork {
            expected: ChainId(11155111),
            actual: ChainId(1),
            network_name: "Sepolia".into(),
        };
        assert_eq!(n.to_string(), "Change the network to Sepolia");
        let m = Notice::Minted {
            kind: WriteKind::PublicMint,
            collection_name: "Crypto Dev".into(),
        };
        assert_eq!(m.to_string(), "You successfully minted a Crypto Dev!");
    }
}
