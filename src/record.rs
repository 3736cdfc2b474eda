//! Workflow record - one procurement line item moving through the pipeline

use crate::identifiers::{IndentNumber, RecordId};
use crate::stage::Stage;
use crate::value::{FieldMap, FieldValue};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Data key under which a record's indent number is stored
pub const INDENT_NUMBER_KEY: &str = "indentNumber";

/// Status of a workflow record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordStatus {
    /// Awaiting action at the record's current stage
    Pending,
    /// Finally resolved; the record passed the last working stage
    Completed,
}

/// Audit snapshot appended when a record completes a stage
///
/// Entries are append-only and chronological; their stage values are
/// non-decreasing in traversal order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The stage that was completed
    pub stage: Stage,
    /// When the stage was completed
    pub recorded_at: DateTime<Utc>,
    /// The record's full data bag at that instant
    pub data: FieldMap,
}

/// One trackable procurement line item
///
/// Created at stage 1, advanced stage-by-stage by the transition engine,
/// never deleted. `data` accumulates every stage's form submission; keys
/// are only ever added or overwritten. `history` preserves the value each
/// key had when earlier stages completed, even after later overwrites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowRecord {
    /// Unique identifier, assigned at creation, immutable
    pub id: RecordId,
    /// Current pipeline position; moved forward only by the transition engine
    pub stage: Stage,
    /// Pending at `stage`, or finally completed
    pub status: RecordStatus,
    /// Accumulated field bag across all completed stage forms
    pub data: FieldMap,
    /// Per-stage audit snapshots in traversal order
    pub history: Vec<HistoryEntry>,
    /// When the record was created, immutable
    pub created_at: DateTime<Utc>,
}

impl WorkflowRecord {
    /// Create a new pending record at the given stage
    pub fn new(stage: Stage, data: FieldMap, now: DateTime<Utc>) -> Self {
        Self {
            id: RecordId::new(),
            stage,
            status: RecordStatus::Pending,
            data,
            history: Vec::new(),
            created_at: now,
        }
    }

    /// Shallow-merge fields into the data bag
    ///
    /// New keys are appended, existing keys are overwritten in place. Keys
    /// are never removed.
    pub fn merge_fields(&mut self, updates: FieldMap) {
        for (key, value) in updates {
            self.data.insert(key, value);
        }
    }

    /// Whether the record is awaiting action at the given stage
    pub fn is_pending_at(&self, stage: Stage) -> bool {
        self.stage == stage && self.status == RecordStatus::Pending
    }

    /// Whether any history entry was recorded for the given stage
    pub fn has_completed_stage(&self, stage: Stage) -> bool {
        self.history.iter().any(|entry| entry.stage == stage)
    }

    /// The record's indent number, when the stage-1 form has written one
    pub fn indent_number(&self) -> Option<IndentNumber> {
        match self.data.get(INDENT_NUMBER_KEY) {
            Some(FieldValue::Text(s)) => s.parse().ok(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FieldValue;

    fn fields(pairs: &[(&str, FieldValue)]) -> FieldMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn new_record_is_pending_with_empty_history() {
        let record = WorkflowRecord::new(
            Stage::CreateIndent,
            fields(&[("itemName", "flange".into())]),
            Utc::now(),
        );
        assert_eq!(record.stage, Stage::CreateIndent);
        assert_eq!(record.status, RecordStatus::Pending);
        assert!(record.history.is_empty());
        assert!(record.is_pending_at(Stage::CreateIndent));
    }

    #[test]
    fn merge_accumulates_and_overwrites() {
        let mut record = WorkflowRecord::new(Stage::Approval, FieldMap::new(), Utc::now());

        record.merge_fields(fields(&[("a", 1.0.into())]));
        record.merge_fields(fields(&[("b", 2.0.into())]));
        record.merge_fields(fields(&[("a", 3.0.into())]));

        assert_eq!(record.data.len(), 2);
        assert_eq!(record.data["a"].as_number(), Some(3.0));
        assert_eq!(record.data["b"].as_number(), Some(2.0));
    }

    #[test]
    fn indent_number_reads_the_well_known_key() {
        let mut record = WorkflowRecord::new(Stage::CreateIndent, FieldMap::new(), Utc::now());
        assert_eq!(record.indent_number(), None);

        record.merge_fields(fields(&[(INDENT_NUMBER_KEY, "IN-007B".into())]));
        let number = record.indent_number().unwrap();
        assert_eq!(number.sequence(), 7);
        assert_eq!(number.item(), 1);
    }

    #[test]
    fn record_round_trips_through_serde() {
        let record = WorkflowRecord::new(
            Stage::VendorQuotation,
            fields(&[("vendor1Name", "Acme Forge".into())]),
            Utc::now(),
        );
        let json = serde_json::to_string(&record).unwrap();
        let back: WorkflowRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
