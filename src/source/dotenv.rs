//! `.env` file repository.
//!
//! Line format is `KEY=VALUE`. Blank lines, `#` comments and lines without
//! `=` are skipped; key and value are trimmed and one pair of matching
//! surrounding quotes is removed from the value.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::{RawSetting, SettingsSource, ValueOrigin, ValueSource};
use crate::error::ConfigError;

/// Conventional file name searched by [`DotEnv::discover`].
pub const DOTENV_FILE_NAME: &str = ".env";

/// Settings loaded from a `.env` file.
#[derive(Debug, Clone)]
pub struct DotEnv {
    path: PathBuf,
    digest: String,
    values: HashMap<String, String>,
}

impl DotEnv {
    /// Load and parse a `.env` file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let bytes = fs::read(path)?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hex::encode(hasher.finalize());

        let contents = String::from_utf8(bytes).map_err(|e| {
            ConfigError::ParseError(format!("Invalid UTF-8 in {}: {}", path.display(), e))
        })?;
        let values = parse_dotenv(&contents);

        tracing::debug!(path = %path.display(), entries = values.len(), "loaded settings file");

        Ok(Self {
            path: path.to_path_buf(),
            digest,
            values,
        })
    }

    /// Search `start` and its ancestors for a `.env` file and load the
    /// nearest one.
    pub fn discover(start: &Path) -> Result<Option<Self>, ConfigError> {
        for dir in start.ancestors() {
            let candidate = dir.join(DOTENV_FILE_NAME);
            if candidate.is_file() {
                return Self::load(&candidate).map(Some);
            }
        }
        tracing::debug!(start = %start.display(), "no settings file found");
        Ok(None)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Hex SHA-256 of the raw file bytes
    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

impl SettingsSource for DotEnv {
    fn lookup(&self, name: &str) -> Result<Option<RawSetting>, ConfigError> {
        let Some(value) = self.values.get(name) else {
            return Ok(None);
        };
        Ok(Some(RawSetting {
            value: value.clone(),
            source: ValueSource {
                origin: ValueOrigin::File,
                key: Some(name.to_string()),
                path: Some(self.path.to_string_lossy().to_string()),
                digest: Some(self.digest.clone()),
            },
        }))
    }
}

/// Parse `.env` contents. Later definitions of a key replace earlier ones.
pub fn parse_dotenv(contents: &str) -> HashMap<String, String> {
    let mut values = HashMap::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        values.insert(key.trim().to_string(), strip_quotes(value.trim()).to_string());
    }
    values
}

fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}
