//! JSON Lines draft store
//!
//! One imported draft per line in a plain file. Writers take an exclusive
//! file lock and readers a shared one, so a CLI import racing a listing
//! never sees half a line. `insert_new` holds the exclusive lock across the
//! duplicate check and the append, so concurrent imports of one receipt
//! store it once.

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::domain::result::{Error, Result};
use crate::domain::ImportedTransaction;
use crate::ports::DraftStore;

/// Draft store backed by a `.jsonl` file
#[derive(Debug, Clone)]
pub struct JsonlDraftStore {
    path: PathBuf,
}

impl JsonlDraftStore {
    /// Store at `<data_dir>/drafts.jsonl`
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join("drafts.jsonl"))
    }

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Vec<ImportedTransaction>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        FileExt::lock_shared(&file)?;
        let records = self.parse_lines(&file);
        FileExt::unlock(&file)?;
        records
    }

    fn ensure_parent(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    fn encode(records: &[ImportedTransaction]) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        for record in records {
            serde_json::to_writer(&mut buffer, record)?;
            buffer.push(b'\n');
        }
        Ok(buffer)
    }

    /// Append the records not already present; the caller holds the exclusive lock
    fn append_new(
        &self,
        file: &mut File,
        records: &[ImportedTransaction],
    ) -> Result<(Vec<ImportedTransaction>, usize)> {
        let mut known: HashSet<(String, String)> = self
            .parse_lines(file)?
            .into_iter()
            .map(|r| (r.user_id, r.fingerprint))
            .collect();

        let mut fresh = Vec::new();
        let mut skipped = 0;
        for record in records {
            if known.insert((record.user_id.clone(), record.fingerprint.clone())) {
                fresh.push(record.clone());
            } else {
                skipped += 1;
            }
        }

        if !fresh.is_empty() {
            file.write_all(&Self::encode(&fresh)?)?;
            file.flush()?;
        }
        Ok((fresh, skipped))
    }

    fn parse_lines(&self, file: &File) -> Result<Vec<ImportedTransaction>> {
        let mut records = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(&line).map_err(|e| {
                Error::store(format!("{}:{}: {}", self.path.display(), index + 1, e))
            })?;
            records.push(record);
        }
        Ok(records)
    }
}

impl DraftStore for JsonlDraftStore {
    fn bulk_insert(&self, records: &[ImportedTransaction]) -> Result<Vec<ImportedTransaction>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        self.ensure_parent()?;
        let buffer = Self::encode(records)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.lock_exclusive()?;
        let written = file.write_all(&buffer).and_then(|_| file.flush());
        FileExt::unlock(&file)?;
        written?;

        Ok(records.to_vec())
    }

    fn insert_new(&self, records: &[ImportedTransaction]) -> Result<(Vec<ImportedTransaction>, usize)> {
        if records.is_empty() {
            return Ok((Vec::new(), 0));
        }
        self.ensure_parent()?;

        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)?;
        file.lock_exclusive()?;
        let outcome = self.append_new(&mut file, records);
        FileExt::unlock(&file)?;
        outcome
    }

    fn contains_fingerprint(&self, user_id: &str, fingerprint: &str) -> Result<bool> {
        Ok(self
            .read_all()?
            .iter()
            .any(|r| r.user_id == user_id && r.fingerprint == fingerprint))
    }

    fn list(&self, user_id: Option<&str>) -> Result<Vec<ImportedTransaction>> {
        let records = self.read_all()?;
        Ok(match user_id {
            Some(user) => records.into_iter().filter(|r| r.user_id == user).collect(),
            None => records,
        })
    }
}
