//! Environment layered over a settings file.

use std::path::Path;

use super::{DotEnv, Environment, RawSetting, SettingsSource};
use crate::error::ConfigError;

/// Process environment first, then an optional `.env` repository.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    environment: Environment,
    repository: Option<DotEnv>,
}

impl Settings {
    /// Environment only.
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            repository: None,
        }
    }

    pub fn with_repository(mut self, repository: DotEnv) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Environment over the `.env` file at `path`.
    pub fn with_env_file(self, path: &Path) -> Result<Self, ConfigError> {
        Ok(self.with_repository(DotEnv::load(path)?))
    }

    /// Environment over the nearest `.env` found from `start` upwards, if any.
    pub fn discover(environment: Environment, start: &Path) -> Result<Self, ConfigError> {
        let repository = DotEnv::discover(start)?;
        Ok(Self {
            environment,
            repository,
        })
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn repository(&self) -> Option<&DotEnv> {
        self.repository.as_ref()
    }
}

impl SettingsSource for Settings {
    fn lookup(&self, name: &str) -> Result<Option<RawSetting>, ConfigError> {
        if let Some(raw) = self.environment.lookup(name)? {
            return Ok(Some(raw));
        }
        match &self.repository {
            Some(repo) => repo.lookup(name),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ValueOrigin;
    use serial_test::serial;
    use std::env;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    #[serial]
    fn test_environment_wins_over_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "TYPED_ENV_LAYER_A=file\nTYPED_ENV_LAYER_B=file\n").unwrap();

        env::set_var("TYPED_ENV_LAYER_A", "env");
        let settings = Settings::default().with_env_file(&path).unwrap();
        let a = settings.lookup("TYPED_ENV_LAYER_A").unwrap().unwrap();
        let b = settings.lookup("TYPED_ENV_LAYER_B").unwrap().unwrap();
        env::remove_var("TYPED_ENV_LAYER_A");

        assert_eq!(a.value, "env");
        assert_eq!(a.source.origin, ValueOrigin::Environment);
        assert_eq!(b.value, "file");
        assert_eq!(b.source.origin, ValueOrigin::File);
        assert!(settings.lookup("TYPED_ENV_LAYER_C").unwrap().is_none());
    }

    #[test]
    fn test_discover_loads_repository() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".env"), "X=1\n").unwrap();
        let settings = Settings::discover(Environment::new(), dir.path()).unwrap();
        assert!(settings.repository().is_some());
    }
}
