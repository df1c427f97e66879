//! Configuration management
//!
//! Settings live in `settings.json` inside the data directory:
//! ```json
//! {
//!   "receipts": { "fallbackCategory": "Receipt import", "defaultCurrency": "RS", "maxLineItems": 20 },
//!   "userId": "local"
//! }
//! ```
//! Fields this crate does not manage are kept as-is when saving.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::services::ocr_parser::ParserOptions;
use crate::services::receipt_mapper::{ReceiptMapper, FALLBACK_CATEGORY};

/// Environment override for the importing identity
pub const USER_ID_ENV: &str = "FINOSPARK_USER_ID";

const SETTINGS_FILE: &str = "settings.json";
const DEFAULT_USER_ID: &str = "local";
const DEFAULT_CURRENCY: &str = "RS";
const DEFAULT_MAX_LINE_ITEMS: usize = 20;

fn default_fallback_category() -> String {
    FALLBACK_CATEGORY.to_string()
}

fn default_currency() -> Option<String> {
    Some(DEFAULT_CURRENCY.to_string())
}

fn default_max_line_items() -> usize {
    DEFAULT_MAX_LINE_ITEMS
}

fn default_user_id() -> Option<String> {
    Some(DEFAULT_USER_ID.to_string())
}

/// Raw settings.json structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    receipts: ReceiptSettings,
    #[serde(default = "default_user_id")]
    user_id: Option<String>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

impl Default for SettingsFile {
    fn default() -> Self {
        Self {
            receipts: ReceiptSettings::default(),
            user_id: default_user_id(),
            other: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReceiptSettings {
    #[serde(default = "default_fallback_category")]
    fallback_category: String,
    #[serde(default = "default_currency")]
    default_currency: Option<String>,
    #[serde(default = "default_max_line_items")]
    max_line_items: usize,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

impl Default for ReceiptSettings {
    fn default() -> Self {
        Self {
            fallback_category: default_fallback_category(),
            default_currency: default_currency(),
            max_line_items: default_max_line_items(),
            other: HashMap::new(),
        }
    }
}

/// Finospark configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Category for drafts whose receipt has no merchant
    pub fallback_category: String,
    /// Currency the text parser stamps on receipts
    pub default_currency: Option<String>,
    pub max_line_items: usize,
    /// Identity imports are recorded under; `None` means imports are refused
    pub user_id: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_settings(SettingsFile::default(), None)
    }
}

impl Config {
    /// Load config from the data directory
    ///
    /// A missing or malformed settings file yields defaults. The user id
    /// can be overridden with `FINOSPARK_USER_ID`.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let raw = read_settings(data_dir)?;
        Ok(Self::from_settings(raw, std::env::var(USER_ID_ENV).ok()))
    }

    fn from_settings(raw: SettingsFile, user_override: Option<String>) -> Self {
        let user_id = user_override
            .or(raw.user_id)
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());

        Self {
            fallback_category: raw.receipts.fallback_category,
            default_currency: raw
                .receipts
                .default_currency
                .filter(|c| !c.trim().is_empty()),
            max_line_items: raw.receipts.max_line_items,
            user_id,
        }
    }

    /// Save config to the data directory, preserving unmanaged settings
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let mut settings = read_settings(data_dir)?;

        settings.receipts.fallback_category = self.fallback_category.clone();
        settings.receipts.default_currency = self.default_currency.clone();
        settings.receipts.max_line_items = self.max_line_items;
        settings.user_id = self.user_id.clone();

        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;
        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(data_dir.join(SETTINGS_FILE), content)?;
        Ok(())
    }

    /// Options for the OCR text parser
    pub fn parser_options(&self) -> ParserOptions {
        ParserOptions {
            default_currency: self.default_currency.clone(),
            max_line_items: self.max_line_items,
        }
    }

    /// Receipt mapper using the configured fallback category
    pub fn mapper(&self) -> ReceiptMapper {
        ReceiptMapper::new(self.fallback_category.clone())
    }
}

fn read_settings(data_dir: &Path) -> Result<SettingsFile> {
    let settings_path = data_dir.join(SETTINGS_FILE);
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(&settings_path)
        .with_context(|| format!("Failed to read {:?}", settings_path))?;
    Ok(serde_json::from_str(&content).unwrap_or_default())
}
