//! Content-derived message identity.

use super::{SmsDomainError, VendorRecord};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Separator between hashed fields so adjacent values cannot run together.
const FIELD_SEPARATOR: [u8; 1] = [0x1f];

const HASH_LENGTH: usize = 32;

/// SHA-256 digest over a record's date, destination, source and body.
///
/// The console exposes no record id, so identity is content-derived. Two
/// records with the same four fields are indistinguishable.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentHash([u8; HASH_LENGTH]);

impl ContentHash {
    /// Hashes the identity fields of a vendor record.
    #[must_use]
    pub fn of_record(record: &VendorRecord) -> Self {
        Self::of_fields(
            &record.date,
            &record.destination,
            &record.source,
            &record.body,
        )
    }

    /// Hashes identity fields in `date‖destination‖source‖body` order.
    #[must_use]
    pub fn of_fields(date: &str, destination: &str, source: &str, body: &str) -> Self {
        let mut hasher = Sha256::new();
        for (position, field) in [date, destination, source, body].iter().enumerate() {
            if position > 0 {
                hasher.update(FIELD_SEPARATOR);
            }
            hasher.update(field.as_bytes());
        }
        Self(hasher.finalize().into())
    }

    /// Parses a lowercase or uppercase hexadecimal digest.
    ///
    /// # Errors
    ///
    /// Returns [`SmsDomainError::InvalidContentHash`] when the value is not 64
    /// hexadecimal characters.
    pub fn from_hex(value: &str) -> Result<Self, SmsDomainError> {
        let trimmed = value.trim();
        let mut bytes = [0_u8; HASH_LENGTH];
        hex::decode_to_slice(trimmed, &mut bytes)
            .map_err(|_| SmsDomainError::InvalidContentHash(value.to_owned()))?;
        Ok(Self(bytes))
    }

    /// Returns the digest as lowercase hexadecimal.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "ContentHash({})", self.to_hex())
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for ContentHash {
    type Error = SmsDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<ContentHash> for String {
    fn from(value: ContentHash) -> Self {
        value.to_hex()
    }
}
