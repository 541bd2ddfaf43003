//! User entity as seen by the token lifecycle.
//!
//! Accounts are owned by the surrounding system; this is the identity
//! snapshot the core needs to derive session claims.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity and authorization flags of a registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Email address
    pub email: String,

    /// Display/login name
    pub username: String,

    /// Whether the user may access staff tooling
    pub is_staff: bool,

    /// Whether the user has every permission
    pub is_superuser: bool,

    /// Whether the user's email address has been verified
    pub is_verified: bool,

    /// Deactivated accounts cannot refresh sessions
    pub is_active: bool,
}

impl User {
    /// Creates a new regular user
    pub fn new(email: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            username: username.into(),
            is_staff: false,
            is_superuser: false,
            is_verified: false,
            is_active: true,
        }
    }

    /// Grants or withdraws staff access
    pub fn set_staff(&mut self, is_staff: bool) {
        self.is_staff = is_staff;
    }

    /// Grants or withdraws superuser access
    pub fn set_superuser(&mut self, is_superuser: bool) {
        self.is_superuser = is_superuser;
    }

    /// Marks the user as verified
    pub fn verify(&mut self) {
        self.is_verified = true;
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }
}
