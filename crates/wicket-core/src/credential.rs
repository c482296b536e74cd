//! Credential identifiers.
//!
//! A credential is the opaque id carried by an RFID card or token. Readers
//! report ids either as a plain token string or as whitespace-separated hex
//! bytes (`"04 a3 f0 11"`); both normalize to one canonical form so that the
//! cache, the schedule store, and the remote service all compare equal keys.

use std::fmt;
use thiserror::Error;

/// Errors raised while normalizing a raw reader id.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("empty credential id")]
    Empty,

    #[error("invalid hex byte '{byte}' in credential id")]
    InvalidByte { byte: String },
}

/// Canonical credential id.
///
/// Comparison and hashing use the canonical string form only; the numeric
/// view is derived on demand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Credential(String);

impl Credential {
    /// Normalize a raw reader id.
    ///
    /// Whitespace-separated ids are treated as hex bytes and canonicalized to
    /// lowercase two-digit bytes joined by single spaces. Ids without
    /// whitespace pass through trimmed.
    pub fn parse(raw: &str) -> Result<Self, CredentialError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CredentialError::Empty);
        }

        if !trimmed.contains(char::is_whitespace) {
            return Ok(Self(trimmed.to_string()));
        }

        let mut bytes = Vec::new();
        for token in trimmed.split_whitespace() {
            let value =
                u8::from_str_radix(token, 16).map_err(|_| CredentialError::InvalidByte {
                    byte: token.to_string(),
                })?;
            bytes.push(value);
        }

        let canonical = bytes
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<Vec<_>>()
            .join(" ");
        Ok(Self(canonical))
    }

    /// Canonical string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric view of a byte-form id: the bytes folded big-endian into a
    /// `u64`. `None` for plain token ids that are not decimal numbers, and
    /// for byte-form ids longer than eight bytes.
    pub fn numeric(&self) -> Option<u64> {
        if !self.0.contains(' ') {
            return self.0.parse::<u64>().ok();
        }

        let tokens: Vec<&str> = self.0.split(' ').collect();
        if tokens.len() > 8 {
            return None;
        }
        let mut num: u64 = 0;
        for token in tokens {
            let byte = u8::from_str_radix(token, 16).ok()?;
            num = (num << 8) + u64::from(byte);
        }
        Some(num)
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
