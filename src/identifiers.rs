//! Identifier types for records and indents

use crate::errors::WorkflowError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Record ID - globally unique identity of one procurement line item
///
/// Assigned once at creation and never changed. Two records never share an
/// ID for the lifetime of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Create a new random record ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from a UUID
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<RecordId> for Uuid {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl From<&RecordId> for Uuid {
    fn from(id: &RecordId) -> Self {
        id.0
    }
}

/// Indent number - the human-facing number of one line item within an indent
///
/// One stage-1 submission batch shares a single sequence number; each line
/// item within the batch gets its own letter suffix. Renders as
/// `IN-<sequence:3 digits><letter>`, e.g. sequence 5 item 0 is `IN-005A`
/// and item 1 is `IN-005B`. Item indices past 25 continue Excel-style
/// (`AA`, `AB`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndentNumber {
    sequence: u32,
    item: u32,
}

impl IndentNumber {
    /// Create an indent number from a batch sequence and a zero-based item index
    pub fn new(sequence: u32, item: u32) -> Self {
        Self { sequence, item }
    }

    /// The shared batch sequence
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// The zero-based item index within the batch
    pub fn item(&self) -> u32 {
        self.item
    }

    /// The letter suffix for this item (`A`, `B`, ..., `Z`, `AA`, ...)
    pub fn item_letters(&self) -> String {
        let mut n = self.item + 1;
        let mut letters = Vec::new();
        while n > 0 {
            let rem = ((n - 1) % 26) as u8;
            letters.push((b'A' + rem) as char);
            n = (n - 1) / 26;
        }
        letters.iter().rev().collect()
    }
}

impl fmt::Display for IndentNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IN-{:03}{}", self.sequence, self.item_letters())
    }
}

impl FromStr for IndentNumber {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || WorkflowError::MalformedIndentNumber(s.to_string());

        let rest = s.strip_prefix("IN-").ok_or_else(malformed)?;
        let digits_len = rest.chars().take_while(|c| c.is_ascii_digit()).count();
        let (digits, letters) = rest.split_at(digits_len);
        if digits.is_empty() || letters.is_empty() {
            return Err(malformed());
        }

        let sequence: u32 = digits.parse().map_err(|_| malformed())?;

        // Bijective base-26 decode of the letter suffix
        let mut item: u32 = 0;
        for c in letters.chars() {
            if !c.is_ascii_uppercase() {
                return Err(malformed());
            }
            item = item
                .checked_mul(26)
                .and_then(|v| v.checked_add((c as u32 - 'A' as u32) + 1))
                .ok_or_else(malformed)?;
        }

        Ok(Self::new(sequence, item - 1))
    }
}

impl Serialize for IndentNumber {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for IndentNumber {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
