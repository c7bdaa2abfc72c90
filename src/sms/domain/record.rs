//! Vendor console record wire shape.
//!
//! The console answers its report refresh with positional rows. The column
//! indices are fixed by the vendor and must not be reordered.

use serde_json::Value;

/// Column holding the receive timestamp.
pub(crate) const DATE_FIELD: usize = 0;
/// Column holding the destination address.
pub(crate) const DESTINATION_FIELD: usize = 2;
/// Column holding the source address.
pub(crate) const SOURCE_FIELD: usize = 3;
/// Column holding the client or carrier tag.
pub(crate) const CLIENT_FIELD: usize = 4;
/// Column holding the message body.
pub(crate) const BODY_FIELD: usize = 5;

/// Keys under which the console wraps its row array.
const ROW_CONTAINER_KEYS: [&str; 2] = ["aaData", "data"];

/// One raw SMS row as reported by the vendor console.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VendorRecord {
    /// Receive timestamp as rendered by the console.
    pub date: String,
    /// Destination address (the tenant's number).
    pub destination: String,
    /// Source address or sender id.
    pub source: String,
    /// Client or carrier tag.
    pub client: String,
    /// Message body.
    pub body: String,
}

impl VendorRecord {
    /// Maps a positional row into a record.
    ///
    /// Missing trailing cells become empty strings; numeric cells are
    /// stringified.
    #[must_use]
    pub fn from_row(row: &[Value]) -> Self {
        Self {
            date: cell_text(row, DATE_FIELD),
            destination: cell_text(row, DESTINATION_FIELD),
            source: cell_text(row, SOURCE_FIELD),
            client: cell_text(row, CLIENT_FIELD),
            body: cell_text(row, BODY_FIELD),
        }
    }

    /// Extracts candidate records from a captured console payload.
    ///
    /// The payload may be a bare array of rows or an object carrying the rows
    /// under `aaData` or `data`. Non-array rows and non-candidate records are
    /// dropped.
    #[must_use]
    pub fn rows_from_payload(payload: &Value) -> Vec<Self> {
        let rows = payload.as_array().or_else(|| {
            ROW_CONTAINER_KEYS
                .iter()
                .find_map(|key| payload.get(key).and_then(Value::as_array))
        });

        rows.map(|rows| {
            rows.iter()
                .filter_map(Value::as_array)
                .map(|row| Self::from_row(row))
                .filter(Self::is_candidate)
                .collect()
        })
        .unwrap_or_default()
    }

    /// Returns whether the row looks like a real message.
    ///
    /// A candidate has a non-empty body and at least one of source or
    /// destination.
    #[must_use]
    pub fn is_candidate(&self) -> bool {
        !self.body.is_empty() && (!self.source.is_empty() || !self.destination.is_empty())
    }
}

fn cell_text(row: &[Value], index: usize) -> String {
    match row.get(index) {
        Some(Value::String(text)) => text.trim().to_owned(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
