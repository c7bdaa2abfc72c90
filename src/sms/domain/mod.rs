//! Domain model for scraped SMS records.

mod error;
mod extraction;
mod hash;
mod masking;
mod message;
mod record;

pub use error::SmsDomainError;
pub use extraction::{ExtractedOtp, ExtractionStrategy, OtpExtractor};
pub use hash::ContentHash;
pub use masking::mask_destination;
pub use message::Message;
pub use record::VendorRecord;
