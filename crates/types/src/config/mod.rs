// Path: crates/types/src/config/mod.rs

//! Configuration for a client session against one deployed sale contract.
use crate::app::ChainId;
use crate::error::ConfigError;
use alloy_primitives::{utils::parse_ether, Address, U256};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Client configuration, loaded from a TOML file.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SaleConfig {
    /// JSON-RPC endpoint used by the command-line wallet.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    /// Hex address of the deployed sale contract.
    pub contract_address: String,
    /// The only chain id the client will operate on.
    pub expected_chain_id: ChainId,
    /// Human-readable name of the expected network, used in notices.
    #[serde(default = "default_network_name")]
    pub network_name: String,
    /// Price of one token in ether, as a decimal string.
    #[serde(default = "default_unit_price")]
    pub unit_price: String,
    /// Seconds between sale-phase polls.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Total supply of the collection, used for display only.
    #[serde(default = "default_collection_size")]
    pub collection_size: u64,
    /// Display name of one token, used in notices and banners.
    #[serde(default = "default_collection_name")]
    pub collection_name: String,
}

fn default_rpc_url() -> String {
    "http://127.0.0.1:8545".to_string()
}
fn default_network_name() -> String {
    "the configured network".to_string()
}
fn default_unit_price() -> String {
    "0.01".to_string()
}
fn default_poll_interval_secs() -> u64 {
    5
}
fn default_collection_size() -> u64 {
    20
}
fn default_collection_name() -> String {
    "NFT".to_string()
}

impl SaleConfig {
    /// Creates a configuration with every optional field at its default.
    pub fn new(contract: Address, expected_chain_id: ChainId) -> Self {
        Self {
            rpc_url: default_rpc_url(),
            contract_address: contract.to_string(),
            expected_chain_id,
            network_name: default_network_name(),
            unit_price: default_unit_price(),
            poll_interval_secs: default_poll_interval_secs(),
            collection_size: default_collection_size(),
            collection_name: default_collection_name(),
        }
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// Rejects values the client cannot operate with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.contract()?;
        self.unit_price_wei()?;
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "poll_interval_secs",
                reason: "must be at least 1".into(),
            });
        }
        if self.collection_size == 0 {
            return Err(ConfigError::Invalid {
                field: "collection_size",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// The parsed contract address.
    pub fn contract(&self) -> Result<Address, ConfigError> {
        Address::from_str(self.contract_address.trim()).map_err(|e| ConfigError::Invalid {
            field: "contract_address",
            reason: e.to_string(),
        })
    }

    /// The unit price converted to wei.
    pub fn unit_price_wei(&self) -> Result<U256, ConfigError> {
        parse_ether(self.unit_price.trim()).map_err(|e| ConfigError::Invalid {
            field: "unit_price",
            reason: e.to_string(),
        })
    }

    /// The poll period.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}
