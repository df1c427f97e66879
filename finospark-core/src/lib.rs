//! Finospark Core - receipt ledger and goal planning
//!
//! Hexagonal layout:
//!
//! - **domain**: receipts, transaction drafts, goal plans, errors
//! - **ports**: the `DraftStore` trait
//! - **services**: mapping, normalization, OCR text parsing, planning,
//!   importing and event logging
//! - **adapters**: in-memory and JSON Lines draft stores

pub mod adapters;
pub mod config;
pub mod domain;
mod log_migrations;
pub mod ports;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use adapters::JsonlDraftStore;
use config::Config;
use services::ImportService;

pub use domain::result::{Error, OperationResult};
pub use domain::{
    AnalyzeResponse, GoalPlan, GoalPlanInput, GoalPreset, ImportedTransaction, LineItem,
    PurchaseDate, ReceiptData, TransactionDraft, TransactionType,
};
pub use services::{EntryPoint, ImportResult, LogEntry, LogEvent, LoggingService};

/// Main context for Finospark operations
///
/// Holds the loaded configuration and the services wired to the data
/// directory's draft store.
pub struct FinosparkContext {
    pub data_dir: PathBuf,
    pub config: Config,
    pub import_service: ImportService,
}

impl FinosparkContext {
    /// Create a context rooted at `data_dir`, creating the directory if needed
    pub fn new(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;
        let config = Config::load(data_dir)?;

        let store = Arc::new(JsonlDraftStore::in_dir(data_dir));
        let import_service = ImportService::new(store, config.mapper());

        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            config,
            import_service,
        })
    }

    /// The identity imports run under, if one is configured
    pub fn user_id(&self) -> Option<&str> {
        self.config.user_id.as_deref()
    }
}
