use sha2::{Digest, Sha256};
use std::fmt;

use crate::crypto::digest;

/// Secret login material. Lives on the prover side only and is never sent
/// to the server.
#[derive(Clone)]
pub struct Credential {
    pub username: String,
    pub password: String,
    pub salt: String,
}

impl Credential {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        salt: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            salt: salt.into(),
        }
    }

    /// `username:password:salt`, the preimage shared by the graph seed and
    /// the in-circuit hash check.
    pub fn preimage(&self) -> String {
        format!("{}:{}:{}", self.username, self.password, self.salt)
    }
}

// Keep passwords out of logs
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("salt", &"<redacted>")
            .finish()
    }
}

/// SHA-256 digest of a credential triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserHash([u8; 32]);

impl UserHash {
    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        digest::to_hex(&self.0)
    }

    /// Integer value of the first 16 hex characters, i.e. the first eight
    /// digest bytes read big-endian.
    pub fn seed(&self) -> u64 {
        let mut head = [0u8; 8];
        head.copy_from_slice(&self.0[..8]);
        u64::from_be_bytes(head)
    }
}

impl fmt::Display for UserHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Hash `username:password:salt` with SHA-256.
pub fn hash_credential(credential: &Credential) -> UserHash {
    let digest = Sha256::digest(credential.preimage().as_bytes());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&digest);
    UserHash(bytes)
}
