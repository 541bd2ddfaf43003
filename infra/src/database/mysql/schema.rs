//! Table definitions for the durable token stores
//!
//! Timestamps are `DATETIME(6)` holding UTC. Both tables are indexed on
//! `expires_at` so the sweeps stay range deletes.

pub const CREATE_REVOKED_TOKENS: &str = r#"
    CREATE TABLE IF NOT EXISTS revoked_tokens (
        token_hash CHAR(64) NOT NULL,
        expires_at DATETIME(6) NOT NULL,
        PRIMARY KEY (token_hash),
        INDEX idx_revoked_tokens_expires_at (expires_at)
    ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_bin
"#;

pub const CREATE_PASSWORD_RESET_TOKENS: &str = r#"
    CREATE TABLE IF NOT EXISTS password_reset_tokens (
        token VARCHAR(128) NOT NULL,
        user_id CHAR(36) NOT NULL,
        expires_at DATETIME(6) NOT NULL,
        used BOOLEAN NOT NULL DEFAULT FALSE,
        created_at DATETIME(6) NOT NULL,
        PRIMARY KEY (token),
        INDEX idx_password_reset_tokens_expires_at (expires_at),
        INDEX idx_password_reset_tokens_user_id (user_id)
    ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_bin
"#;
