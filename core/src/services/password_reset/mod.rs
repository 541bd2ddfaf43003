//! Password reset token module
//!
//! Issues opaque single-use reset tokens and consumes them atomically.

mod config;
mod service;

#[cfg(test)]
mod tests;

pub use config::PasswordResetConfig;
pub use service::PasswordResetTokenService;
