//! DHIS2-style identifier generation.
//!
//! Identifiers are 11 characters drawn from `[A-Za-z0-9]`, with the first
//! character restricted to letters. Downstream systems validate this exact
//! format, so both the generator and the validator live here.

use rand::Rng;
use regex::Regex;
use std::sync::OnceLock;

const UID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const UID_LENGTH: usize = 11;

/// Generate a fresh identifier matching `[A-Za-z][A-Za-z0-9]{10}`.
pub fn make_uid() -> String {
    let mut rng = rand::rng();
    let mut uid = String::with_capacity(UID_LENGTH);
    // First character must not be one of the trailing 10 digits
    let first = rng.random_range(0..UID_ALPHABET.len() - 10);
    uid.push(UID_ALPHABET[first] as char);
    for _ in 1..UID_LENGTH {
        let idx = rng.random_range(0..UID_ALPHABET.len());
        uid.push(UID_ALPHABET[idx] as char);
    }
    uid
}

/// Check a string against the host identifier contract.
pub fn is_valid_uid(candidate: &str) -> bool {
    static UID_RE: OnceLock<Regex> = OnceLock::new();
    let re = UID_RE.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9]{10}$").unwrap());
    re.is_match(candidate)
}
