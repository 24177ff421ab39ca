//! Environment variable sources.
//!
//! The loader reads every secret through [`EnvSource`] so the process
//! environment can be swapped for a fixed map in tests.

use std::collections::HashMap;

use crate::config::secret::Secret;

/// A read-only view of environment variables.
pub trait EnvSource {
    /// Raw value of `key`, if set.
    fn var(&self, key: &str) -> Option<String>;

    /// Value of `key` as a secret. Unset and blank variables both yield `None`.
    fn secret(&self, key: &str) -> Option<Secret> {
        self.var(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(Secret::new)
    }
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl ProcessEnv {
    /// Load `.env` from the working directory (or a parent), then read the
    /// process environment. Variables already set take precedence over the file.
    pub fn with_dotenv() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
            Err(e) if e.not_found() => tracing::debug!("No .env file found"),
            Err(e) => tracing::warn!(error = %e, "Ignoring unreadable .env file"),
        }
        Self
    }
}

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// A fixed set of variables.
#[derive(Debug, Clone, Default)]
pub struct MapEnv(HashMap<String, String>);

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl EnvSource for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }
}
