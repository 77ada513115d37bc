use std::fmt;

use serde::Serialize;

use super::error::{Error, Result};

const ADDRESS_LEN: usize = 42;

/// A syntactically valid Ethereum address: `0x` followed by 40 characters.
///
/// Checksums are not verified, the provider rejects unknown addresses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn parse(address: &str) -> Result<Self> {
        let trimmed = address.trim();
        if !trimmed.starts_with("0x") || trimmed.chars().count() != ADDRESS_LEN {
            return Err(Error::InvalidAddress {
                address: address.to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
