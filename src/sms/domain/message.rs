//! Normalised SMS message.

use super::{ContentHash, ExtractedOtp, OtpExtractor, VendorRecord, mask_destination};

/// A scraped SMS normalised for notification.
///
/// Messages are transient: once notified only the [`ContentHash`] survives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    timestamp: String,
    source: String,
    destination: String,
    client: String,
    body: String,
    hash: ContentHash,
    otp: Option<ExtractedOtp>,
}

impl Message {
    /// Normalises a vendor record, hashing it and extracting any passcode.
    #[must_use]
    pub fn from_record(record: &VendorRecord, extractor: &OtpExtractor) -> Self {
        Self {
            timestamp: record.date.clone(),
            source: record.source.clone(),
            destination: record.destination.clone(),
            client: record.client.clone(),
            body: record.body.clone(),
            hash: ContentHash::of_record(record),
            otp: extractor.extract(&record.body),
        }
    }

    /// Returns the console receive timestamp.
    #[must_use]
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Returns the source address.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the unmasked destination address.
    #[must_use]
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Returns the destination with its middle span masked.
    #[must_use]
    pub fn masked_destination(&self) -> String {
        mask_destination(&self.destination)
    }

    /// Returns the client or carrier tag.
    #[must_use]
    pub fn client(&self) -> &str {
        &self.client
    }

    /// Returns the raw message body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the content-derived identity.
    #[must_use]
    pub const fn hash(&self) -> ContentHash {
        self.hash
    }

    /// Returns the extracted passcode, if any.
    #[must_use]
    pub const fn otp(&self) -> Option<&ExtractedOtp> {
        self.otp.as_ref()
    }
}
