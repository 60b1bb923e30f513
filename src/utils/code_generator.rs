//! Content-addressed short code derivation and validation.
//!
//! Short codes are derived from the target URL itself, so shortening the same
//! URL twice always lands on the same code without a reverse index.

use sha2::{Digest, Sha256};

/// Alphabet the URL digest is first mapped onto.
pub const BASE62_ALPHABET: &[u8; 62] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Length of every derived short code.
pub const CODE_LENGTH: usize = 7;

/// Length of the intermediate base62 token.
const TOKEN_LENGTH: usize = 6;

/// Derives the short code for a target URL.
///
/// Two hashing rounds:
///
/// 1. SHA-256 over the UTF-8 bytes of `target`; the first [`TOKEN_LENGTH`]
///    digest bytes are mapped onto [`BASE62_ALPHABET`] (`byte % 62`).
/// 2. SHA-256 over that token, rendered as lowercase hex and cut to
///    [`CODE_LENGTH`] characters.
///
/// Codes issued by earlier deployments use the same derivation, so existing
/// mappings stay reachable by re-creating their URL.
///
/// Truncation discards most of the digest, so two distinct targets can share a
/// code. Callers treat that as "code already taken" and apply the configured
/// [`CollisionPolicy`](crate::config::CollisionPolicy).
///
/// # Examples
///
/// ```ignore
/// assert_eq!(derive_code("https://example.com/a"), "897c753");
/// ```
pub fn derive_code(target: &str) -> String {
    let digest = Sha256::digest(target.as_bytes());
    let token: String = digest
        .iter()
        .take(TOKEN_LENGTH)
        .map(|b| BASE62_ALPHABET[(*b % 62) as usize] as char)
        .collect();

    let mut code: String = Sha256::digest(token.as_bytes())
        .iter()
        .take(CODE_LENGTH.div_ceil(2))
        .map(|b| format!("{:02x}", b))
        .collect();
    code.truncate(CODE_LENGTH);
    code
}

/// Returns true if `code` has the shape of a derived short code.
///
/// Exactly [`CODE_LENGTH`] ASCII alphanumeric characters.
pub fn is_valid_code(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|b| b.is_ascii_alphanumeric())
}
