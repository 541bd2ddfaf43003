//! # Tokenline Core
//!
//! Domain layer for the token lifecycle: signed session tokens, server-side
//! revocation, and single-use password reset tokens. Storage is abstracted
//! behind the [`RevocationStore`] and [`ResetTokenStore`] traits so the same
//! services run against an ephemeral (TTL-native) or a durable (swept) backend.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
