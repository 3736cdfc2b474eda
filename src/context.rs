//! Workflow context - the facade every stage UI calls
//!
//! The single mutation/query surface over the record store and the
//! transition engine. The context owns the store exclusively; no other
//! component writes records or the indent sequence. All operations are
//! synchronous and run to completion - the expected caller is a
//! single-threaded UI event loop.

use crate::errors::WorkflowResult;
use crate::events::{EventPublisher, NullEventPublisher, RecordEvent};
use crate::identifiers::{IndentNumber, RecordId};
use crate::record::{WorkflowRecord, INDENT_NUMBER_KEY};
use crate::stage::Stage;
use crate::store::RecordStore;
use crate::transition::{self, Disposition, FollowUpAction, StageAdvance};
use crate::value::{FieldMap, FieldValue};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info};

/// Facade over the record store and transition engine
///
/// Per-stage form validation does not live here: the core accepts whatever
/// field bag it is given and trusts callers to have validated before
/// calling.
pub struct WorkflowContext {
    store: RecordStore,
    publisher: Arc<dyn EventPublisher>,
}

impl Default for WorkflowContext {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowContext {
    /// Create a context with no event subscriber
    pub fn new() -> Self {
        Self::with_publisher(Arc::new(NullEventPublisher))
    }

    /// Create a context that publishes lifecycle events to `publisher`
    pub fn with_publisher(publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            store: RecordStore::new(),
            publisher,
        }
    }

    /// Create a new pending record at the given stage
    ///
    /// Does not advance the record; the caller chains
    /// [`move_to_next_stage`](Self::move_to_next_stage) when it wants to.
    pub fn add_record(&mut self, stage: Stage, fields: FieldMap) -> RecordId {
        let now = Utc::now();
        let id = self.store.create_record(stage, fields, now);
        self.publisher.publish(RecordEvent::RecordCreated {
            record_id: id,
            stage,
            created_at: now,
        });
        id
    }

    /// Shallow-merge fields into a record's data bag
    ///
    /// No stage or status side effects. Unknown ids fail with
    /// `RecordNotFound`.
    pub fn update_record(&mut self, id: RecordId, fields: FieldMap) -> WorkflowResult<()> {
        let keys: Vec<String> = fields.keys().cloned().collect();
        self.store.update_record(id, fields)?;
        self.publisher.publish(RecordEvent::FieldsMerged {
            record_id: id,
            keys,
        });
        Ok(())
    }

    /// Advance a record one logical step through the pipeline
    ///
    /// Appends the audit-history entry (two entries on the single-vendor
    /// skip path) and updates stage and status. Fails with
    /// `RecordNotFound` for unknown ids and `InvalidTransition` for
    /// records that are not pending.
    pub fn move_to_next_stage(&mut self, id: RecordId) -> WorkflowResult<StageAdvance> {
        let now = Utc::now();
        let record = self.store.record_mut(id)?;
        let advance = transition::advance_stage(record, now)?;
        info!(record_id = %id, from = %advance.from, to = %advance.to, "record moved");
        self.publish_advance(id, &advance, now);
        Ok(advance)
    }

    /// Auto-skip a single-vendor record resting at `Negotiation`
    ///
    /// Called by the Negotiation UI on render, before any human input.
    /// Merges the `autoSkipped` flag and advances; returns `Ok(None)` when
    /// the record is not pending at `Negotiation` or a third vendor was
    /// quoted.
    pub fn auto_skip_negotiation(&mut self, id: RecordId) -> WorkflowResult<Option<StageAdvance>> {
        let now = Utc::now();
        let record = self.store.record_mut(id)?;
        let Some(advance) = transition::auto_skip(record, now)? else {
            return Ok(None);
        };
        info!(record_id = %id, "negotiation auto-skipped");
        self.publisher
            .publish(RecordEvent::NegotiationAutoSkipped { record_id: id });
        self.publish_advance(id, &advance, now);
        Ok(Some(advance))
    }

    /// Apply a follow-up submission: merge, then stay or advance per action
    ///
    /// `ScheduleFollowUp` is the self-loop - the record stays pending and
    /// may receive any number of further submissions. `LiftMaterial`
    /// advances it.
    pub fn apply_follow_up(
        &mut self,
        id: RecordId,
        fields: FieldMap,
        action: FollowUpAction,
    ) -> WorkflowResult<Option<StageAdvance>> {
        self.update_record(id, fields)?;
        match action.disposition() {
            Disposition::Stay => {
                debug!(record_id = %id, "follow-up scheduled, record stays");
                Ok(None)
            }
            Disposition::Advance => self.move_to_next_stage(id).map(Some),
        }
    }

    /// Create a stage-1 indent batch, one record per line item
    ///
    /// Every item shares the batch's sequence number and gets its own
    /// letter suffix (`IN-005A`, `IN-005B`, ...), written into the item's
    /// fields under `indentNumber`. Each record is created at
    /// `CreateIndent` and immediately advanced to pending at `Approval`.
    /// The sequence is bumped once per batch; an empty batch creates
    /// nothing and leaves it untouched.
    pub fn create_indent(&mut self, batch: Vec<FieldMap>) -> WorkflowResult<Vec<RecordId>> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let now = Utc::now();
        let sequence = self.store.next_indent_sequence();
        let mut ids = Vec::with_capacity(batch.len());

        for (item, mut fields) in batch.into_iter().enumerate() {
            let number = IndentNumber::new(sequence, item as u32);
            fields.insert(
                INDENT_NUMBER_KEY.to_string(),
                FieldValue::Text(number.to_string()),
            );

            let id = self.store.create_record(Stage::CreateIndent, fields, now);
            self.publisher.publish(RecordEvent::RecordCreated {
                record_id: id,
                stage: Stage::CreateIndent,
                created_at: now,
            });

            let record = self.store.record_mut(id)?;
            let advance = transition::advance_stage(record, now)?;
            self.publish_advance(id, &advance, now);

            info!(record_id = %id, indent = %number, "indent line item created");
            ids.push(id);
        }

        self.store.advance_indent_sequence();
        Ok(ids)
    }

    /// Look up one record
    pub fn record(&self, id: RecordId) -> Option<&WorkflowRecord> {
        self.store.record(id)
    }

    /// All records in creation order
    pub fn records(&self) -> impl Iterator<Item = &WorkflowRecord> {
        self.store.records()
    }

    /// Records awaiting action at the given stage, in creation order
    ///
    /// The "pending" view every stage UI renders as its worklist.
    pub fn pending_at(&self, stage: Stage) -> Vec<&WorkflowRecord> {
        self.store
            .records()
            .filter(|record| record.is_pending_at(stage))
            .collect()
    }

    /// Records whose history contains the given stage, in creation order
    ///
    /// The "history" view a stage UI renders for completed work.
    pub fn with_history_at(&self, stage: Stage) -> Vec<&WorkflowRecord> {
        self.store
            .records()
            .filter(|record| record.has_completed_stage(stage))
            .collect()
    }

    /// The sequence the next indent batch will use
    pub fn indent_sequence(&self) -> u32 {
        self.store.next_indent_sequence()
    }

    /// Reset the indent sequence, e.g. when restoring persisted state
    pub fn set_indent_sequence(&mut self, sequence: u32) {
        self.store.set_indent_sequence(sequence);
    }

    fn publish_advance(&self, id: RecordId, advance: &StageAdvance, now: DateTime<Utc>) {
        self.publisher.publish(RecordEvent::StageCompleted {
            record_id: id,
            stage: advance.from,
            synthetic: false,
            recorded_at: now,
        });
        if let Some(stage) = advance.synthetic {
            self.publisher.publish(RecordEvent::StageCompleted {
                record_id: id,
                stage,
                synthetic: true,
                recorded_at: now,
            });
        }
        if advance.completed {
            self.publisher.publish(RecordEvent::RecordCompleted {
                record_id: id,
                completed_at: now,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MemoryEventPublisher;
    use crate::record::RecordStatus;

    fn fields(pairs: &[(&str, FieldValue)]) -> FieldMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn add_record_creates_pending_with_empty_history() {
        let mut ctx = WorkflowContext::new();
        let id = ctx.add_record(
            Stage::CreateIndent,
            fields(&[("itemName", "flange".into())]),
        );

        let record = ctx.record(id).unwrap();
        assert_eq!(record.stage, Stage::CreateIndent);
        assert_eq!(record.status, RecordStatus::Pending);
        assert!(record.history.is_empty());
    }

    #[test]
    fn facade_publishes_lifecycle_events() {
        let publisher = MemoryEventPublisher::new();
        let mut ctx = WorkflowContext::with_publisher(Arc::new(publisher.clone()));

        let id = ctx.add_record(Stage::Approval, FieldMap::new());
        ctx.update_record(id, fields(&[("approvedBy", "stores head".into())]))
            .unwrap();
        ctx.move_to_next_stage(id).unwrap();

        assert_eq!(
            publisher.event_types(),
            vec!["RecordCreated", "FieldsMerged", "StageCompleted"]
        );
    }

    #[test]
    fn pending_view_filters_by_stage_and_status() {
        let mut ctx = WorkflowContext::new();
        let first = ctx.add_record(Stage::Approval, FieldMap::new());
        let second = ctx.add_record(Stage::Approval, FieldMap::new());
        ctx.move_to_next_stage(first).unwrap();

        let pending: Vec<_> = ctx.pending_at(Stage::Approval);
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, second);

        let done = ctx.with_history_at(Stage::Approval);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].id, first);
    }
}
