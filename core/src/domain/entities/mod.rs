//! Domain entities representing the token lifecycle.

pub mod reset_token;
pub mod token;
pub mod user;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use reset_token::{ResetToken, RESET_TOKEN_BYTES};
pub use token::{Claims, SessionTokenPair, TokenKind};
pub use user::User;
