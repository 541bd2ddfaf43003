//! MySQL implementations of the durable token stores

pub mod reset_token_repository_impl;
pub mod revocation_repository_impl;
pub mod schema;

pub use reset_token_repository_impl::MySqlResetTokenStore;
pub use revocation_repository_impl::MySqlRevocationStore;
