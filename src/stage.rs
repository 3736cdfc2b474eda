//! The 14-stage procurement pipeline
//!
//! Stages are the states of the workflow state machine. Every record is
//! created at [`Stage::CreateIndent`] and moves forward only; `Completed`
//! is the sentinel past the last working stage.

use serde::{Deserialize, Serialize};

/// One named step of the procurement pipeline
///
/// Variant order is pipeline order; the derived `Ord` follows it, with
/// `Completed` sorting after every working stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    /// Stage 1 - raise the purchase indent
    CreateIndent,
    /// Stage 2 - indent approval
    Approval,
    /// Stage 3 - collect vendor quotations
    VendorQuotation,
    /// Stage 4 - negotiate between quoted vendors (skipped for single-vendor indents)
    Negotiation,
    /// Stage 5 - purchase order entry
    PoEntry,
    /// Stage 6 - delivery follow-up (may loop until material is lifted)
    FollowUp,
    /// Stage 7 - material receipt
    MaterialReceipt,
    /// Stage 8 - quality check
    QualityCheck,
    /// Stage 9 - tally entry
    TallyEntry,
    /// Stage 10 - invoice submission
    InvoiceSubmission,
    /// Stage 11 - invoice verification
    Verification,
    /// Stage 12 - vendor payment
    VendorPayment,
    /// Stage 13 - purchase return
    PurchaseReturn,
    /// Stage 14 - freight payment
    FreightPayment,
    /// Terminal marker past the last working stage
    Completed,
}

impl Stage {
    /// The 14 working stages in pipeline order
    pub const ALL: [Stage; 14] = [
        Stage::CreateIndent,
        Stage::Approval,
        Stage::VendorQuotation,
        Stage::Negotiation,
        Stage::PoEntry,
        Stage::FollowUp,
        Stage::MaterialReceipt,
        Stage::QualityCheck,
        Stage::TallyEntry,
        Stage::InvoiceSubmission,
        Stage::Verification,
        Stage::VendorPayment,
        Stage::PurchaseReturn,
        Stage::FreightPayment,
    ];

    /// The 1-based stage number; `Completed` reports one past the last stage
    pub const fn number(&self) -> u8 {
        match self {
            Stage::CreateIndent => 1,
            Stage::Approval => 2,
            Stage::VendorQuotation => 3,
            Stage::Negotiation => 4,
            Stage::PoEntry => 5,
            Stage::FollowUp => 6,
            Stage::MaterialReceipt => 7,
            Stage::QualityCheck => 8,
            Stage::TallyEntry => 9,
            Stage::InvoiceSubmission => 10,
            Stage::Verification => 11,
            Stage::VendorPayment => 12,
            Stage::PurchaseReturn => 13,
            Stage::FreightPayment => 14,
            Stage::Completed => 15,
        }
    }

    /// Look up a working stage by its 1-based number
    pub const fn from_number(number: u8) -> Option<Stage> {
        match number {
            1 => Some(Stage::CreateIndent),
            2 => Some(Stage::Approval),
            3 => Some(Stage::VendorQuotation),
            4 => Some(Stage::Negotiation),
            5 => Some(Stage::PoEntry),
            6 => Some(Stage::FollowUp),
            7 => Some(Stage::MaterialReceipt),
            8 => Some(Stage::QualityCheck),
            9 => Some(Stage::TallyEntry),
            10 => Some(Stage::InvoiceSubmission),
            11 => Some(Stage::Verification),
            12 => Some(Stage::VendorPayment),
            13 => Some(Stage::PurchaseReturn),
            14 => Some(Stage::FreightPayment),
            _ => None,
        }
    }

    /// Human-readable stage title
    pub const fn name(&self) -> &'static str {
        match self {
            Stage::CreateIndent => "Create Indent",
            Stage::Approval => "Approval",
            Stage::VendorQuotation => "Vendor Quotation",
            Stage::Negotiation => "Negotiation",
            Stage::PoEntry => "PO Entry",
            Stage::FollowUp => "Follow-Up",
            Stage::MaterialReceipt => "Material Receipt",
            Stage::QualityCheck => "Quality Check",
            Stage::TallyEntry => "Tally Entry",
            Stage::InvoiceSubmission => "Invoice Submission",
            Stage::Verification => "Verification",
            Stage::VendorPayment => "Vendor Payment",
            Stage::PurchaseReturn => "Purchase Return",
            Stage::FreightPayment => "Freight Payment",
            Stage::Completed => "Completed",
        }
    }

    /// The linear successor; `FreightPayment` completes, `Completed` stays put
    pub const fn next(&self) -> Stage {
        match self {
            Stage::CreateIndent => Stage::Approval,
            Stage::Approval => Stage::VendorQuotation,
            Stage::VendorQuotation => Stage::Negotiation,
            Stage::Negotiation => Stage::PoEntry,
            Stage::PoEntry => Stage::FollowUp,
            Stage::FollowUp => Stage::MaterialReceipt,
            Stage::MaterialReceipt => Stage::QualityCheck,
            Stage::QualityCheck => Stage::TallyEntry,
            Stage::TallyEntry => Stage::InvoiceSubmission,
            Stage::InvoiceSubmission => Stage::Verification,
            Stage::Verification => Stage::VendorPayment,
            Stage::VendorPayment => Stage::PurchaseReturn,
            Stage::PurchaseReturn => Stage::FreightPayment,
            Stage::FreightPayment => Stage::Completed,
            Stage::Completed => Stage::Completed,
        }
    }

    /// Whether this is the terminal marker
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Stage::Completed)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
