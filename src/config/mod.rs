use std::{env, time::Duration};

use crate::error::{Error, Result};

pub const DEFAULT_RPC_URL: &str = "https://ethereum-mainnet.gateway.tatum.io/";
pub const DEFAULT_DATA_API_URL: &str = "https://api.tatum.io/v4/data/transaction/history";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings needed to talk to the data provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: String,
    /// JSON-RPC gateway used for `eth_getBalance`.
    pub rpc_url: String,
    /// REST endpoint serving the transaction history.
    pub data_api_url: String,
    pub timeout: Duration,
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            rpc_url: DEFAULT_RPC_URL.to_string(),
            data_api_url: DEFAULT_DATA_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Build the configuration from the process environment.
    ///
    /// `.env` files must be loaded beforehand, see [`dotenvy::dotenv`].
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup("TATUM_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(Error::MissingApiKey)?;

        let mut config = Self::new(api_key);

        if let Some(url) = lookup("TATUM_RPC_URL") {
            config.rpc_url = url;
        }
        if let Some(url) = lookup("TATUM_DATA_API_URL") {
            config.data_api_url = url;
        }
        if let Some(secs) = lookup("TATUM_TIMEOUT_SECS") {
            let secs = secs.trim().parse().map_err(|e: std::num::ParseIntError| {
                Error::InvalidConfig {
                    key: "TATUM_TIMEOUT_SECS",
                    reason: e.to_string(),
                }
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_the_key_is_set() {
        let config = Config::from_lookup(lookup(&[("TATUM_API_KEY", "t-123")])).unwrap();

        assert_eq!(config, Config::new("t-123"));
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn missing_or_blank_key_is_an_error() {
        assert!(matches!(Config::from_lookup(lookup(&[])), Err(Error::MissingApiKey)));
        assert!(matches!(
            Config::from_lookup(lookup(&[("TATUM_API_KEY", "  ")])),
            Err(Error::MissingApiKey)
        ));
    }

    #[test]
    fn overrides_are_read() {
        let config = Config::from_lookup(lookup(&[
            ("TATUM_API_KEY", "t-123"),
            ("TATUM_RPC_URL", "http://localhost:8545"),
            ("TATUM_DATA_API_URL", "http://localhost:3000/history"),
            ("TATUM_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.rpc_url, "http://localhost:8545");
        assert_eq!(config.data_api_url, "http://localhost:3000/history");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn unparsable_timeout_is_rejected() {
        let result = Config::from_lookup(lookup(&[
            ("TATUM_API_KEY", "t-123"),
            ("TATUM_TIMEOUT_SECS", "soon"),
        ]));

        assert!(matches!(
            result,
            Err(Error::InvalidConfig { key: "TATUM_TIMEOUT_SECS", .. })
        ));
    }
}
