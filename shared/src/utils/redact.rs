//! Redaction helpers so credentials never reach log output
//!
//! Session tokens and reset tokens are bearer credentials. Anything that is
//! logged must go through [`fingerprint`] instead of the raw value.

use sha2::{Digest, Sha256};

/// Number of hex characters kept from the digest
const FINGERPRINT_LEN: usize = 12;

/// Short, non-reversible identifier for a secret value
///
/// Two log lines that mention the same token share a fingerprint, which is
/// enough to correlate events without leaking a usable credential.
pub fn fingerprint(secret: &str) -> String {
    let digest = Sha256::digest(secret.as_bytes());
    let mut encoded = hex::encode(digest);
    encoded.truncate(FINGERPRINT_LEN);
    encoded
}
