//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod draft;
pub mod goal;
mod receipt;
pub mod result;

pub use draft::{
    ImportedTransaction, TransactionDraft, TransactionSource, TransactionType, PURCHASE_NOTE_LABEL,
};
pub use goal::{GoalPlan, GoalPlanInput, GoalPreset};
pub use receipt::{AnalyzeResponse, LineItem, PurchaseDate, ReceiptData};
