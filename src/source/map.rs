//! In-memory source.

use std::collections::BTreeMap;

use super::{RawSetting, SettingsSource, ValueOrigin, ValueSource};
use crate::error::ConfigError;

/// Settings held in memory, e.g. values assembled by a caller or a test.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapSource {
    values: BTreeMap<String, String>,
}

impl MapSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.values.remove(name)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapSource {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut source = MapSource::new();
        for (name, value) in iter {
            source.set(name, value);
        }
        source
    }
}

impl SettingsSource for MapSource {
    fn lookup(&self, name: &str) -> Result<Option<RawSetting>, ConfigError> {
        Ok(self.values.get(name).map(|value| RawSetting {
            value: value.clone(),
            source: ValueSource::new(ValueOrigin::Memory),
        }))
    }
}
