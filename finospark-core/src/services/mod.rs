//! Service layer - business logic orchestration
//!
//! The mapper, planner, normalizer and text parser are pure functions over
//! domain types. The import and logging services own their I/O.

pub mod goal_planner;
pub mod import;
pub mod logging;
pub mod normalize;
pub mod ocr_parser;
pub mod purchase_date;
pub mod receipt_mapper;

pub use goal_planner::{plan, plan_for, plan_preset};
pub use import::{ImportResult, ImportService};
pub use logging::{EntryPoint, LogEntry, LogEvent, LoggingService};
pub use normalize::{normalize_payload, normalize_receipt};
pub use ocr_parser::{analyze_text, parse_receipt_text, ParserOptions};
pub use purchase_date::{format_purchase_date, parse_purchase_date};
pub use receipt_mapper::{map_receipt, ReceiptMapper};
