//! Address literal helpers.
//!
//! The target compiler rejects 40-hex-digit literals that are not in
//! EIP-55 mixed-case form, so every address spliced into source goes
//! through [`to_checksum_address`].

use once_cell::sync::Lazy;
use regex::Regex;
use sha3::{Digest, Keccak256};

static ADDRESS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("address pattern compiles"));

/// Strict `0x` + 40 hex digit check.
pub fn is_address(value: &str) -> bool {
    ADDRESS_PATTERN.is_match(value)
}

/// EIP-55 checksum form of a well-formed address.
///
/// Returns `None` when `value` does not match [`is_address`].
pub fn to_checksum_address(value: &str) -> Option<String> {
    if !is_address(value) {
        return None;
    }
    let lower = value[2..].to_ascii_lowercase();
    let digest = hex::encode(Keccak256::digest(lower.as_bytes()));

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (c, h) in lower.chars().zip(digest.chars()) {
        // Letters are upper-cased where the matching hash nibble is >= 8.
        if c.is_ascii_alphabetic() && h.to_digit(16).is_some_and(|n| n >= 8) {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    Some(out)
}
