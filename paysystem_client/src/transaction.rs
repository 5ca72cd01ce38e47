use base64::Engine;
use schedule_codec::{Address, ContractCall, TokenAmount};
use serde::{Deserialize, Serialize};

use crate::config::{AccountContext, NetworkContext};
use crate::error::ClientResult;

/// Transaction ready for an external wallet to sign, in the network's JSON
/// shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsignedTransaction {
    pub nonce: u64,
    /// atomic units, decimal
    pub value: String,
    pub receiver: Address,
    pub sender: Address,
    pub gas_price: u64,
    pub gas_limit: u64,
    /// base64 of the call payload
    pub data: String,
    #[serde(rename = "chainID")]
    pub chain_id: String,
    pub version: u32,
}

impl UnsignedTransaction {
    /// Build a contract call. Only `depositFunds` carries value.
    pub fn contract_call(
        network: &NetworkContext,
        account: &AccountContext,
        call: &ContractCall,
        value: TokenAmount,
    ) -> ClientResult<Self> {
        let payload = call.encode()?;
        Ok(Self {
            nonce: account.nonce,
            value: value.atomic().to_string(),
            receiver: network.contract,
            sender: account.address,
            gas_price: network.gas_price,
            gas_limit: network.gas_limit,
            data: base64::engine::general_purpose::STANDARD.encode(payload.as_bytes()),
            chain_id: network.chain_id.clone(),
            version: network.tx_version,
        })
    }

    /// The plain-text call payload.
    pub fn payload(&self) -> Option<String> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.data)
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
    }
}
