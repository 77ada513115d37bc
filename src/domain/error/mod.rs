use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("invalid Ethereum address format: '{address}', expected 42 chars starting with 0x")]
    InvalidAddress { address: String },
    #[error("invalid hex quantity: '{quantity}'")]
    InvalidHexQuantity { quantity: String },
}

pub type Result<T> = std::result::Result<T, Error>;
