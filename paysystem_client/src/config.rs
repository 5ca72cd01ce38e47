//! Network configuration and the explicit contexts passed into every
//! dashboard operation.

use schedule_codec::{Address, AmountWidth, RecordLayout};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ClientError, ClientResult};

pub const DEVNET_GATEWAY: &str = "https://devnet-gateway.multiversx.com";
pub const DEVNET_CHAIN_ID: &str = "D";
pub const DEVNET_CONTRACT: &str =
    "erd1qqqqqqqqqqqqqpgq8w3w2kcmwste0q00vqnuqxt6sw4slhgl7mtqpp8txh";

pub const GAS_PRICE: u64 = 1_000_000_000;
pub const GAS_LIMIT: u64 = 60_000_000;
pub const TX_VERSION: u32 = 1;

/// On-disk configuration. Every field is optional and falls back to the
/// devnet deployment.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct DashboardConfig {
    pub gateway: Option<String>,
    pub contract_address: Option<String>,
    pub chain_id: Option<String>,
    pub gas_price: Option<u64>,
    pub gas_limit: Option<u64>,
    pub tx_version: Option<u32>,
    pub amount_width: Option<AmountWidth>,
}

/// Load a TOML config file. A missing file yields the defaults.
pub fn load_config(path: Option<&Path>) -> ClientResult<DashboardConfig> {
    let Some(path) = path else {
        return Ok(DashboardConfig::default());
    };
    if !path.exists() {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        return Ok(DashboardConfig::default());
    }
    let content = fs::read_to_string(path).map_err(|e| ClientError::Config {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    toml::from_str(&content).map_err(|e| ClientError::Config {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Where and how to talk to the contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkContext {
    pub gateway: String,
    pub contract: Address,
    pub chain_id: String,
    pub gas_price: u64,
    pub gas_limit: u64,
    pub tx_version: u32,
    pub layout: RecordLayout,
}

impl NetworkContext {
    pub fn new(gateway: impl Into<String>, contract: Address) -> Self {
        Self {
            gateway: gateway.into(),
            contract,
            chain_id: DEVNET_CHAIN_ID.to_string(),
            gas_price: GAS_PRICE,
            gas_limit: GAS_LIMIT,
            tx_version: TX_VERSION,
            layout: RecordLayout::default(),
        }
    }

    pub fn from_config(config: &DashboardConfig) -> ClientResult<Self> {
        let contract_text = config.contract_address.as_deref().unwrap_or(DEVNET_CONTRACT);
        let contract = Address::from_bech32(contract_text)?;
        Ok(Self {
            gateway: config
                .gateway
                .clone()
                .unwrap_or_else(|| DEVNET_GATEWAY.to_string()),
            contract,
            chain_id: config
                .chain_id
                .clone()
                .unwrap_or_else(|| DEVNET_CHAIN_ID.to_string()),
            gas_price: config.gas_price.unwrap_or(GAS_PRICE),
            gas_limit: config.gas_limit.unwrap_or(GAS_LIMIT),
            tx_version: config.tx_version.unwrap_or(TX_VERSION),
            layout: RecordLayout::new(config.amount_width.unwrap_or_default()),
        })
    }
}

/// The signing account on whose behalf transactions are built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountContext {
    pub address: Address,
    pub nonce: u64,
}

impl AccountContext {
    pub fn new(address: Address, nonce: u64) -> Self {
        Self { address, nonce }
    }
}
