pub mod reset_token;
pub mod revocation;
pub mod user;

pub use reset_token::{MemoryResetTokenStore, MemoryResetTokenTable, ResetTokenStore};
pub use revocation::{MemoryRevocationStore, MemoryRevocationTable, RevocationStore};
pub use user::{MemoryUserRepository, UserRepository};
