use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

pub const ENV_UPLOADS_DIR: &str = "NAVFOLIO_UPLOADS_DIR";
pub const ENV_MISSING_DATE_POLICY: &str = "NAVFOLIO_MISSING_DATE_POLICY";
pub const ENV_RETAIN_SKIPPED_ROWS: &str = "NAVFOLIO_RETAIN_SKIPPED_ROWS";
pub const ENV_EXTRA_SECTION_LABELS: &str = "NAVFOLIO_EXTRA_SECTION_LABELS";

/// What to do with a file in which no sheet yielded an as-on date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MissingDatePolicy {
    /// Keep whatever was ingested; the upload keeps its provisional name.
    #[default]
    Commit,
    /// Discard the file as if it had failed.
    Rollback,
}

impl FromStr for MissingDatePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "commit" => Ok(Self::Commit),
            "rollback" => Ok(Self::Rollback),
            other => Err(Error::InvalidConfigValue(format!(
                "{}: expected 'commit' or 'rollback', got '{}'",
                ENV_MISSING_DATE_POLICY, other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IngestionConfig {
    /// Directory canonically named source files are moved into.
    pub uploads_dir: PathBuf,
    pub missing_date_policy: MissingDatePolicy,
    /// Return non-empty skipped rows in the report for manual review.
    pub retain_skipped_rows: bool,
    /// Publisher-specific section labels, appended to the built-in list.
    pub extra_section_labels: Vec<String>,
    /// Keep the source file's extension when it is moved into `uploads_dir`.
    pub canonical_extension: bool,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            uploads_dir: PathBuf::from("./uploads"),
            missing_date_policy: MissingDatePolicy::default(),
            retain_skipped_rows: false,
            extra_section_labels: Vec::new(),
            canonical_extension: true,
        }
    }
}

impl IngestionConfig {
    /// Reads `NAVFOLIO_*` variables, falling back to defaults for unset ones.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`IngestionConfig::from_env`] over an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup(ENV_UPLOADS_DIR).filter(|d| !d.trim().is_empty()) {
            config.uploads_dir = PathBuf::from(dir.trim());
        }
        if let Some(policy) = lookup(ENV_MISSING_DATE_POLICY) {
            config.missing_date_policy = policy.parse()?;
        }
        if let Some(flag) = lookup(ENV_RETAIN_SKIPPED_ROWS) {
            config.retain_skipped_rows = parse_flag(ENV_RETAIN_SKIPPED_ROWS, &flag)?;
        }
        if let Some(labels) = lookup(ENV_EXTRA_SECTION_LABELS) {
            config.extra_section_labels = labels
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        Ok(config)
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(Error::InvalidConfigValue(format!(
            "{}: expected a boolean, got '{}'",
            key, other
        ))),
    }
}
