//! In-memory record store
//!
//! Owns the canonical set of workflow records and the shared indent
//! sequence. Listing order is creation order, which callers rely on for
//! deterministic views.

use crate::errors::{WorkflowError, WorkflowResult};
use crate::identifiers::RecordId;
use crate::record::WorkflowRecord;
use crate::stage::Stage;
use crate::value::FieldMap;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use tracing::debug;

/// Canonical record set plus the indent-numbering counter
///
/// Records are never deleted; the store is append-only apart from in-place
/// merges into existing records. No validation happens at this layer - the
/// UI gates what reaches it.
#[derive(Debug, Clone)]
pub struct RecordStore {
    records: IndexMap<RecordId, WorkflowRecord>,
    indent_sequence: u32,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore {
    /// Create an empty store with the indent sequence at 1
    pub fn new() -> Self {
        Self {
            records: IndexMap::new(),
            indent_sequence: 1,
        }
    }

    /// Allocate a new pending record at the given stage
    pub fn create_record(
        &mut self,
        stage: Stage,
        fields: FieldMap,
        now: DateTime<Utc>,
    ) -> RecordId {
        let record = WorkflowRecord::new(stage, fields, now);
        let id = record.id;
        debug!(record_id = %id, stage = %stage, "record created");
        self.records.insert(id, record);
        id
    }

    /// Shallow-merge fields into an existing record's data bag
    ///
    /// Unlike the lenient behavior this replaces, an unknown id is a
    /// checked failure rather than a silent no-op.
    pub fn update_record(&mut self, id: RecordId, fields: FieldMap) -> WorkflowResult<()> {
        let record = self
            .records
            .get_mut(&id)
            .ok_or(WorkflowError::RecordNotFound { id })?;
        debug!(record_id = %id, keys = fields.len(), "record fields merged");
        record.merge_fields(fields);
        Ok(())
    }

    /// Look up a record by id
    pub fn record(&self, id: RecordId) -> Option<&WorkflowRecord> {
        self.records.get(&id)
    }

    /// Look up a record for mutation by the transition engine
    pub fn record_mut(&mut self, id: RecordId) -> WorkflowResult<&mut WorkflowRecord> {
        self.records
            .get_mut(&id)
            .ok_or(WorkflowError::RecordNotFound { id })
    }

    /// All records in creation order
    pub fn records(&self) -> impl Iterator<Item = &WorkflowRecord> {
        self.records.values()
    }

    /// Number of records in the store
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The sequence the next indent batch will use
    pub fn next_indent_sequence(&self) -> u32 {
        self.indent_sequence
    }

    /// Bump the sequence; called once per stage-1 batch, not per item
    pub fn advance_indent_sequence(&mut self) {
        self.indent_sequence += 1;
    }

    /// Reset the sequence, e.g. when a consumer restores persisted state
    pub fn set_indent_sequence(&mut self, sequence: u32) {
        self.indent_sequence = sequence;
    }
}
