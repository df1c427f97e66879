//! Draft store port - where imported drafts end up
//!
//! The ledger itself lives outside this crate. The import service only
//! needs somewhere to hand accepted drafts and a way to ask whether a
//! receipt was imported before.

use crate::domain::result::Result;
use crate::domain::ImportedTransaction;

/// Persistence collaborator for imported drafts
pub trait DraftStore: Send + Sync {
    /// Persist a batch of drafts, returning what was stored
    fn bulk_insert(&self, records: &[ImportedTransaction]) -> Result<Vec<ImportedTransaction>>;

    /// Persist only drafts whose fingerprint is not yet stored for their
    /// user, checking and writing as one step. Returns the stored drafts and
    /// how many were skipped as duplicates.
    fn insert_new(&self, records: &[ImportedTransaction]) -> Result<(Vec<ImportedTransaction>, usize)>;

    /// Whether a draft with this fingerprint already exists for the user
    fn contains_fingerprint(&self, user_id: &str, fingerprint: &str) -> Result<bool>;

    /// All stored drafts, optionally narrowed to one user, oldest first
    fn list(&self, user_id: Option<&str>) -> Result<Vec<ImportedTransaction>>;
}
