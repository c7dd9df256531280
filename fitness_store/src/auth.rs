use log::debug;
use sha2::{Digest, Sha256};

/// Length of a hex encoded SHA-256 digest.
pub const PASSWORD_HASH_LEN: usize = 64;

/// One-way hash of a plaintext password, as stored in the record file.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// True if `candidate` looks like something `hash_password` produced.
pub fn is_password_hash(candidate: &str) -> bool {
    candidate.len() == PASSWORD_HASH_LEN
        && candidate
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}

/// Compares a plaintext password against a stored hash.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let matches = hash_password(password) == stored_hash;
    if !matches {
        debug!("Password hash mismatch");
    }
    matches
}
