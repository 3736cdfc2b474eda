//! Stage transition engine
//!
//! Pure advance logic for workflow records: the default linear rule, the
//! data-driven skip table, the independent auto-skip on entering
//! `Negotiation`, and the explicit action map for the `FollowUp` self-loop.
//! Appends the audit-history entries as a side effect of advancing; nothing
//! else in the crate writes history.

use crate::errors::{WorkflowError, WorkflowResult};
use crate::record::{HistoryEntry, RecordStatus, WorkflowRecord};
use crate::stage::Stage;
use crate::value::{FieldMap, FieldValue};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Data key of the stage-3 checkbox recording whether a third vendor quoted
pub const IS_THIRD_PARTY_KEY: &str = "isThirdParty";

/// Data key of the third vendor's name field on the quotation form
pub const THIRD_VENDOR_NAME_KEY: &str = "vendor3Name";

/// Data key flagged onto records whose `Negotiation` stage was auto-skipped
pub const AUTO_SKIPPED_KEY: &str = "autoSkipped";

/// Data key of the follow-up form's chosen action
pub const FOLLOW_UP_STATUS_KEY: &str = "status";

/// Whether the accumulated data says a third vendor ever quoted
///
/// An explicit `isThirdParty` flag wins; absent the flag, a non-empty
/// `vendor3Name` counts as a third vendor.
pub fn third_vendor_quoted(data: &FieldMap) -> bool {
    if let Some(flag) = data.get(IS_THIRD_PARTY_KEY).and_then(FieldValue::as_flag) {
        return flag;
    }
    data.get(THIRD_VENDOR_NAME_KEY)
        .is_some_and(|value| value.as_text().is_some_and(|s| !s.trim().is_empty()))
}

fn single_vendor(data: &FieldMap) -> bool {
    !third_vendor_quoted(data)
}

/// One row of the skip table: leaving `at` with `applies(data)` true
/// bypasses `bypassed`, landing one stage past it with a synthetic history
/// entry for the bypassed stage.
pub struct SkipRule {
    /// Stage the record is leaving when the rule is consulted
    pub at: Stage,
    /// Stage that is bypassed entirely
    pub bypassed: Stage,
    /// Predicate on the record's accumulated data
    pub applies: fn(&FieldMap) -> bool,
}

/// The skip table. One rule today: a single-vendor indent leaving
/// `VendorQuotation` bypasses `Negotiation` - there is nothing to negotiate
/// between fewer than two quotes.
pub const SKIP_RULES: &[SkipRule] = &[SkipRule {
    at: Stage::VendorQuotation,
    bypassed: Stage::Negotiation,
    applies: single_vendor,
}];

/// What one logical advance will do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvancePlan {
    /// Stage the record lands on
    pub next: Stage,
    /// Bypassed stage whose history entry is appended without a form
    pub synthetic: Option<Stage>,
}

/// Consult the skip table and compute the plan for leaving `stage`
pub fn plan_advance(stage: Stage, data: &FieldMap) -> AdvancePlan {
    for rule in SKIP_RULES {
        if rule.at == stage && (rule.applies)(data) {
            return AdvancePlan {
                next: rule.bypassed.next(),
                synthetic: Some(rule.bypassed),
            };
        }
    }
    AdvancePlan {
        next: stage.next(),
        synthetic: None,
    }
}

/// Outcome of a successful advance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageAdvance {
    /// Stage the record left
    pub from: Stage,
    /// Stage the record landed on
    pub to: Stage,
    /// Bypassed stage that received a synthetic history entry, if any
    pub synthetic: Option<Stage>,
    /// Whether the record is now finally completed
    pub completed: bool,
}

/// Advance a record one logical step
///
/// Appends a history snapshot for the stage being left (and for the
/// bypassed stage when the skip table applies - same snapshot, since the
/// two entries come from one user action), then moves the record to the
/// plan's landing stage. Landing past `FreightPayment` completes the
/// record.
///
/// A record that is not `Pending`, or already terminal, is rejected with
/// `InvalidTransition` rather than double-appending history. Completed
/// records therefore never advance again.
pub fn advance_stage(
    record: &mut WorkflowRecord,
    now: DateTime<Utc>,
) -> WorkflowResult<StageAdvance> {
    let from = record.stage;
    if record.status != RecordStatus::Pending || from.is_terminal() {
        return Err(WorkflowError::InvalidTransition {
            from: from.name().to_string(),
            to: from.next().name().to_string(),
        });
    }

    let plan = plan_advance(from, &record.data);

    record.history.push(HistoryEntry {
        stage: from,
        recorded_at: now,
        data: record.data.clone(),
    });
    if let Some(synthetic) = plan.synthetic {
        record.history.push(HistoryEntry {
            stage: synthetic,
            recorded_at: now,
            data: record.data.clone(),
        });
    }

    record.stage = plan.next;
    let completed = plan.next.is_terminal();
    record.status = if completed {
        RecordStatus::Completed
    } else {
        RecordStatus::Pending
    };

    debug!(
        record_id = %record.id,
        from = %from,
        to = %plan.next,
        synthetic = plan.synthetic.map(|s| s.name()),
        "stage advanced"
    );

    Ok(StageAdvance {
        from,
        to: plan.next,
        synthetic: plan.synthetic,
        completed,
    })
}

/// Auto-skip a record resting at `Negotiation` with no third vendor
///
/// The second, independent skip mechanism: even when a record reaches
/// pending-at-`Negotiation` (the skip table only fires when leaving
/// `VendorQuotation`), a single-vendor record is moved on without human
/// input. Merges `autoSkipped: true` before advancing, so the flag is part
/// of the stage-4 history snapshot. Returns `Ok(None)` when the record is
/// not pending at `Negotiation` or a third vendor exists; records that
/// skipped via the table never rest here, so the two mechanisms cannot
/// both fire.
pub fn auto_skip(
    record: &mut WorkflowRecord,
    now: DateTime<Utc>,
) -> WorkflowResult<Option<StageAdvance>> {
    if !record.is_pending_at(Stage::Negotiation) || third_vendor_quoted(&record.data) {
        return Ok(None);
    }

    record.merge_fields(FieldMap::from_iter([(
        AUTO_SKIPPED_KEY.to_string(),
        FieldValue::Flag(true),
    )]));
    debug!(record_id = %record.id, "negotiation auto-skipped");

    advance_stage(record, now).map(Some)
}

/// Whether a follow-up action keeps the record at `FollowUp` or moves it on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Self-loop: merge the submission, stay pending at the same stage
    Stay,
    /// Advance to the next stage
    Advance,
}

/// The two named actions of the `FollowUp` stage
///
/// Follow-up is the one stage that can receive any number of update-only
/// submissions before its single advancing submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FollowUpAction {
    /// Schedule another follow-up; the record stays pending at `FollowUp`
    ScheduleFollowUp,
    /// Material was lifted; the record advances to `MaterialReceipt`
    LiftMaterial,
}

impl FollowUpAction {
    /// The action→transition map for the `FollowUp` stage
    pub const fn disposition(&self) -> Disposition {
        match self {
            FollowUpAction::ScheduleFollowUp => Disposition::Stay,
            FollowUpAction::LiftMaterial => Disposition::Advance,
        }
    }

    /// Read the chosen action from a submitted field bag
    pub fn from_fields(fields: &FieldMap) -> Option<Self> {
        match fields.get(FOLLOW_UP_STATUS_KEY)?.as_text()? {
            "follow-up" => Some(FollowUpAction::ScheduleFollowUp),
            "lift-material" => Some(FollowUpAction::LiftMaterial),
            _ => None,
        }
    }
}
