//! Typed field values for the per-record data bag
//!
//! Every stage form submission merges a string-keyed bag of these values
//! into the record. The bag is open (any key) but each value is tagged, so
//! a key written as a date by one stage cannot silently be read as a number
//! by a later one.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// String-keyed, insertion-ordered field bag
///
/// Keys are never removed, only added or overwritten; iteration order is
/// the order keys were first written.
pub type FieldMap = IndexMap<String, FieldValue>;

/// Opaque handle to an attached file
///
/// The core passes attachments through untouched; it never reads or stores
/// their content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentHandle {
    /// Original file name as submitted
    pub file_name: String,
    /// MIME content type reported by the uploader
    pub content_type: String,
    /// Size in bytes reported by the uploader
    pub size_bytes: u64,
}

impl AttachmentHandle {
    /// Create a new attachment handle
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        size_bytes: u64,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            size_bytes,
        }
    }
}

/// One value in the field bag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Free-form text (names, remarks, invoice numbers)
    Text(String),
    /// Numeric value (quantities, rates, amounts)
    Number(f64),
    /// Boolean flag (checkboxes such as `isThirdParty`)
    Flag(bool),
    /// Point in time (delivery dates, payment dates)
    Date(DateTime<Utc>),
    /// Opaque file attachment
    Attachment(AttachmentHandle),
    /// Nested rows, e.g. the line-item table of a quotation
    Items(Vec<FieldMap>),
}

impl FieldValue {
    /// Borrow as text, if this is a `Text` value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Read as a number, if this is a `Number` value
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Read as a flag, if this is a `Flag` value
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    /// Read as a date, if this is a `Date` value
    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Borrow as an attachment handle, if this is an `Attachment` value
    pub fn as_attachment(&self) -> Option<&AttachmentHandle> {
        match self {
            FieldValue::Attachment(a) => Some(a),
            _ => None,
        }
    }

    /// Borrow the nested rows, if this is an `Items` value
    pub fn as_items(&self) -> Option<&[FieldMap]> {
        match self {
            FieldValue::Items(rows) => Some(rows),
            _ => None,
        }
    }

    /// True for text values that are empty or whitespace-only
    pub fn is_blank_text(&self) -> bool {
        matches!(self, FieldValue::Text(s) if s.trim().is_empty())
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Flag(b)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(d: DateTime<Utc>) -> Self {
        FieldValue::Date(d)
    }
}

impl From<AttachmentHandle> for FieldValue {
    fn from(a: AttachmentHandle) -> Self {
        FieldValue::Attachment(a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_match_only_their_variant() {
        let text = FieldValue::from("steel rods");
        assert_eq!(text.as_text(), Some("steel rods"));
        assert_eq!(text.as_number(), None);
        assert_eq!(text.as_flag(), None);

        let qty = FieldValue::from(120.0);
        assert_eq!(qty.as_number(), Some(120.0));
        assert_eq!(qty.as_text(), None);

        let flag = FieldValue::from(true);
        assert_eq!(flag.as_flag(), Some(true));
    }

    #[test]
    fn blank_text_detection() {
        assert!(FieldValue::from("").is_blank_text());
        assert!(FieldValue::from("   ").is_blank_text());
        assert!(!FieldValue::from("x").is_blank_text());
        assert!(!FieldValue::from(0.0).is_blank_text());
    }

    #[test]
    fn attachments_stay_opaque() {
        let handle = AttachmentHandle::new("quotation.pdf", "application/pdf", 52_430);
        let value = FieldValue::from(handle.clone());
        assert_eq!(value.as_attachment(), Some(&handle));
    }

    #[test]
    fn field_map_keeps_insertion_order() {
        let mut map = FieldMap::new();
        map.insert("itemName".to_string(), "bearing".into());
        map.insert("quantity".to_string(), 4.0.into());
        map.insert("itemName".to_string(), "bearing 6204".into());

        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["itemName", "quantity"]);
        assert_eq!(map["itemName"].as_text(), Some("bearing 6204"));
    }

    #[test]
    fn values_round_trip_through_serde() {
        let mut row = FieldMap::new();
        row.insert("rate".to_string(), 99.5.into());
        let value = FieldValue::Items(vec![row]);

        let json = serde_json::to_string(&value).unwrap();
        let back: FieldValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }
}
