//! # procflow
//!
//! Core workflow state machine for a 14-stage procurement pipeline
//! (Create Indent → Approval → Vendor Quotation → ... → Freight Payment).
//!
//! This crate provides the fundamental building blocks the stage UIs
//! compose:
//! - **Stage**: the named pipeline steps and their linear successor rule
//! - **WorkflowRecord**: one procurement line item with its accumulated
//!   field bag and append-only audit history
//! - **RecordStore**: the canonical record set and the shared indent
//!   sequence
//! - **Transition Engine**: the advance rule, the data-driven skip table,
//!   the `Negotiation` auto-skip, and the `FollowUp` self-loop
//! - **WorkflowContext**: the single mutation/query facade every stage UI
//!   calls
//! - **RecordEvent**: lifecycle events for consumers mirroring the audit
//!   trail
//!
//! ## Design Principles
//!
//! 1. **Forward Only**: a record's stage is never decremented; history is
//!    append-only and chronological
//! 2. **Typed Fields**: the open per-record data bag is a tagged union,
//!    not untyped JSON, so key typos fail at compile time in consumers
//! 3. **Table-Driven Branching**: the skip rule lives in a transition
//!    table, testable without any UI
//! 4. **Trusting Core**: per-stage form validation is the callers'
//!    concern; the core accepts any field bag it is given
//! 5. **Synchronous and Owned**: no async I/O, no locking - the facade
//!    exclusively owns all mutable state and every call runs to completion

#![warn(missing_docs)]

mod context;
mod errors;
mod events;
mod identifiers;
mod record;
mod stage;
mod store;
mod transition;
mod value;

// Re-export core types
pub use context::WorkflowContext;
pub use errors::{WorkflowError, WorkflowResult};
pub use events::{EventPublisher, MemoryEventPublisher, NullEventPublisher, RecordEvent};
pub use identifiers::{IndentNumber, RecordId};
pub use record::{HistoryEntry, RecordStatus, WorkflowRecord, INDENT_NUMBER_KEY};
pub use stage::Stage;
pub use store::RecordStore;
pub use transition::{
    advance_stage, auto_skip, plan_advance, third_vendor_quoted, AdvancePlan, Disposition,
    FollowUpAction, SkipRule, StageAdvance, AUTO_SKIPPED_KEY, FOLLOW_UP_STATUS_KEY,
    IS_THIRD_PARTY_KEY, SKIP_RULES, THIRD_VENDOR_NAME_KEY,
};
pub use value::{AttachmentHandle, FieldMap, FieldValue};
