//! Confirmation codes exchanged for access tokens.
//!
//! A code is 16 random ASCII letters. Only its SHA-256 hex digest is stored,
//! so a database leak does not hand out pending logins.

use rand::Rng;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

pub const CODE_LENGTH: usize = 16;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Generate a fresh random code.
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LENGTH)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// SHA-256 hex digest of a code, as persisted in `users.confirmation_code_hash`.
pub fn hash_code(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Check a submitted code against the stored digest in constant time. No
/// pending code means nothing matches.
pub fn verify_code(submitted: &str, stored_hash: Option<&str>) -> bool {
    match stored_hash {
        Some(stored) => hash_code(submitted)
            .as_bytes()
            .ct_eq(stored.as_bytes())
            .into(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_code_is_sixteen_letters() {
        let code = generate_code();
        assert_eq!(code.len(), CODE_LENGTH);
        assert!(code.chars().all(|c| c.is_ascii_alphabetic()));
    }

    #[test]
    fn consecutive_codes_differ() {
        assert_ne!(generate_code(), generate_code());
    }

    #[test]
    fn hash_is_stable_hex() {
        let hash = hash_code("AbCdEfGhIjKlMnOp");
        assert_eq!(hash, hash_code("AbCdEfGhIjKlMnOp"));
        assert_eq!(hash.len(), 64);
    }

    #[test]
    fn verify_matches_only_the_original_code() {
        let code = generate_code();
        let stored = hash_code(&code);
        assert!(verify_code(&code, Some(&stored)));
        assert!(!verify_code("wrongwrongwrongw", Some(&stored)));
    }

    #[test]
    fn verify_rejects_truncated_or_case_changed_digest() {
        let stored = hash_code("AbCdEfGhIjKlMnOp");
        assert!(!verify_code("AbCdEfGhIjKlMnOp", Some(&stored[..32])));
        assert!(!verify_code("AbCdEfGhIjKlMnOp", Some(&stored.to_uppercase())));
        assert!(!verify_code("AbCdEfGhIjKlMnOp", Some("")));
    }

    #[test]
    fn verify_fails_without_pending_code() {
        assert!(!verify_code("anything", None));
    }
}
