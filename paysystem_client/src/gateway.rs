//! Gateway access for contract view calls.
//!
//! Views are executed through the gateway's VM query endpoint:
//! `POST {gateway}/vm-values/query`. Arguments travel as hex, return data
//! comes back as base64.

use async_trait::async_trait;
use base64::Engine;
use schedule_codec::{hex_arg, Address};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ClientError, ClientResult};

pub const VM_QUERY_PATH: &str = "/vm-values/query";

const RETURN_CODE_OK: &str = "ok";

/// A read-only contract call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VmQuery {
    #[serde(rename = "scAddress")]
    pub contract: Address,
    #[serde(rename = "funcName")]
    pub function: String,
    /// hex-encoded arguments
    pub args: Vec<String>,
}

impl VmQuery {
    /// View taking a single address argument, the shape of every dashboard
    /// view (`getSchedules`, `getBalance`, `getTransactionHistory`).
    pub fn for_owner(contract: Address, function: &str, owner: &Address) -> Self {
        Self {
            contract,
            function: function.to_string(),
            args: vec![owner.to_hex()],
        }
    }

    /// View addressing one schedule of an owner by list position
    /// (`getSchedule`).
    pub fn for_owner_index(
        contract: Address,
        function: &str,
        owner: &Address,
        index: u32,
    ) -> Self {
        Self {
            contract,
            function: function.to_string(),
            args: vec![owner.to_hex(), hex_arg(u64::from(index))],
        }
    }
}

/// Executes contract views. Implemented over HTTP by [`HttpGateway`]; tests
/// substitute an in-memory gateway.
#[async_trait]
pub trait ContractGateway: Send + Sync {
    /// Run the view and return its raw return-data entries.
    async fn query(&self, query: &VmQuery) -> ClientResult<Vec<Vec<u8>>>;
}

#[derive(Debug, Deserialize)]
struct GatewayEnvelope {
    data: Option<VmQueryData>,
    #[serde(default)]
    error: String,
    #[serde(default)]
    code: String,
}

#[derive(Debug, Deserialize)]
struct VmQueryData {
    data: Option<VmOutput>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VmOutput {
    #[serde(default)]
    return_data: Option<Vec<Option<String>>>,
    #[serde(default)]
    return_code: String,
    #[serde(default)]
    return_message: String,
}

/// Turn a gateway reply body into raw return-data entries.
///
/// A `null` entry is an empty value; an absent or empty list is not a valid
/// view result.
pub fn parse_query_response(function: &str, body: &str) -> ClientResult<Vec<Vec<u8>>> {
    let envelope: GatewayEnvelope = serde_json::from_str(body)
        .map_err(|e| ClientError::InvalidResponseFormat(format!("{}: {}", function, e)))?;

    if !envelope.error.is_empty() {
        return Err(ClientError::Gateway {
            function: function.to_string(),
            code: envelope.code,
            message: envelope.error,
        });
    }

    let output = envelope
        .data
        .and_then(|d| d.data)
        .ok_or_else(|| ClientError::InvalidResponseFormat(format!("{}: missing data", function)))?;

    if output.return_code != RETURN_CODE_OK {
        return Err(ClientError::Gateway {
            function: function.to_string(),
            code: output.return_code,
            message: output.return_message,
        });
    }

    let entries = output.return_data.unwrap_or_default();
    if entries.is_empty() {
        return Err(ClientError::InvalidResponseFormat(format!(
            "{}: no return data",
            function
        )));
    }

    entries
        .into_iter()
        .map(|entry| match entry {
            Some(encoded) => base64::engine::general_purpose::STANDARD
                .decode(encoded)
                .map_err(|e| ClientError::InvalidResponseFormat(format!("{}: {}", function, e))),
            None => Ok(Vec::new()),
        })
        .collect()
}

/// Gateway over the network's HTTP proxy API.
pub struct HttpGateway {
    base_url: String,
    client: reqwest::Client,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ContractGateway for HttpGateway {
    async fn query(&self, query: &VmQuery) -> ClientResult<Vec<Vec<u8>>> {
        let url = format!("{}{}", self.base_url, VM_QUERY_PATH);
        debug!(%url, function = %query.function, "querying contract");

        let response = self
            .client
            .post(&url)
            .json(query)
            .send()
            .await
            .map_err(|e| ClientError::Transport {
                endpoint: url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| ClientError::Transport {
            endpoint: url.clone(),
            reason: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(ClientError::ApiCallFailed {
                endpoint: url,
                status: status.as_u16(),
                reason: body,
            });
        }

        parse_query_response(&query.function, &body)
    }
}
