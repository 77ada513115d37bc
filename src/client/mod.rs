use log::debug;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    config::Config,
    domain::{address::Address, units::Wei},
    error::{Error, Result},
};

pub const DEFAULT_CHAIN: &str = "ethereum-mainnet";
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Envelope keys some history responses wrap their records under, in lookup order.
const ENVELOPE_KEYS: [&str; 3] = ["data", "transactions", "result"];

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'static str,
    params: (&'a str, &'static str),
    id: u32,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    error: Option<Value>,
}

/// Client for the Tatum RPC gateway and Data API.
pub struct TatumClient {
    http: Client,
    rpc_url: String,
    data_api_url: String,
}

impl TatumClient {
    pub fn new(config: &Config) -> Result<Self> {
        let mut api_key =
            HeaderValue::from_str(&config.api_key).map_err(|e| Error::InvalidConfig {
                key: "TATUM_API_KEY",
                reason: e.to_string(),
            })?;
        api_key.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", api_key);

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            rpc_url: config.rpc_url.clone(),
            data_api_url: config.data_api_url.clone(),
        })
    }

    /// Latest native balance of `address`, via `eth_getBalance`.
    pub async fn balance(&self, address: &Address) -> Result<Wei> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            method: "eth_getBalance",
            params: (address.as_str(), "latest"),
            id: 1,
        };

        debug!("requesting balance of {address} from {}", self.rpc_url);
        let response: RpcResponse = self
            .http
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        balance_from_response(response)
    }

    /// One page of the most recent transactions touching `address`.
    ///
    /// Records are returned undecoded, in provider order.
    pub async fn transaction_history(
        &self,
        address: &Address,
        page_size: u32,
        chain: &str,
    ) -> Result<Vec<Value>> {
        debug!("requesting {page_size} history items of {address} on {chain}");
        let page_size = page_size.to_string();
        let response: Value = self
            .http
            .get(&self.data_api_url)
            .query(&[
                ("chain", chain),
                ("addresses", address.as_str()),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let records = extract_records(response);
        debug!("provider returned {} history items", records.len());
        Ok(records)
    }
}

fn balance_from_response(response: RpcResponse) -> Result<Wei> {
    if let Some(error) = response.error {
        return Err(Error::RpcError(error.to_string()));
    }

    let quantity = response
        .result
        .ok_or_else(|| Error::RpcError("response carries no result".to_string()))?;

    Ok(Wei::from_hex_quantity(&quantity)?)
}

/// Unwrap the history records from whichever envelope the provider used.
///
/// A bare array is taken as is, otherwise the first of `data`,
/// `transactions` or `result` holding an array. Anything else is empty.
pub fn extract_records(response: Value) -> Vec<Value> {
    match response {
        Value::Array(records) => records,
        Value::Object(mut envelope) => ENVELOPE_KEYS
            .iter()
            .find_map(|key| match envelope.remove(*key) {
                Some(Value::Array(records)) => Some(records),
                _ => None,
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}
