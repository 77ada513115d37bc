pub mod address;
pub mod error;
pub mod summary;
pub mod transaction;
pub mod units;
