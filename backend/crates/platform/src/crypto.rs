//! Cryptographic Utilities

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    rand::rng().fill_bytes(&mut bytes);
    bytes
}

/// Random opaque token: `byte_len` random bytes, base64url without padding
pub fn random_token(byte_len: usize) -> String {
    to_base64url(&random_bytes(byte_len))
}

/// Compute SHA-256 hash
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Short, non-reversible tag for a secret value, safe to put in logs
pub fn token_fingerprint(token: &str) -> String {
    sha256(token.as_bytes())[..6]
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// Encode bytes as base64url (no padding)
pub fn to_base64url(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode base64url (no padding)
pub fn from_base64url(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_NO_PAD.decode(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_values() {
        let hash = sha256(b"");
        let expected =
            hex::decode("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855")
                .unwrap();
        assert_eq!(hash.to_vec(), expected);
    }

    #[test]
    fn test_random_token_shape() {
        let token = random_token(32);
        // 32 bytes -> 43 base64url chars without padding
        assert_eq!(token.len(), 43);
        assert!(!token.contains('='));
        assert_eq!(from_base64url(&token).unwrap().len(), 32);
        assert_ne!(token, random_token(32));
    }

    #[test]
    fn test_token_fingerprint_hides_token() {
        let fp = token_fingerprint("super-secret-token");
        assert_eq!(fp.len(), 12);
        assert!(!fp.contains("secret"));
        assert_eq!(fp, token_fingerprint("super-secret-token"));
    }
}
