//! Database module - MySQL implementations using SQLx
//!
//! Rows in these tables are not self-cleaning. Every read filters on
//! `expires_at > now` and the sweeps reclaim the rest.

pub mod connection;
pub mod mysql;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::{MySqlResetTokenStore, MySqlRevocationStore};
