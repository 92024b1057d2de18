//! Persisted `key = value` settings file (TOML's flat subset is exactly this
//! shape), saved on demand and merged under CLI flags at startup.
//!
//! Only a fixed whitelist of keys is honored; anything else is a forward- or
//! backward-compatibility artifact and is skipped with a warning rather than
//! rejected outright, mirroring the teacher's tolerant-parse stance in
//! `core-config`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use toml::Value;

#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("reading {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("writing {path}: {source}")]
    Write { path: PathBuf, source: std::io::Error },
    #[error("parsing {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },
    #[error("serializing config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

macro_rules! whitelist {
    ($($key:literal),+ $(,)?) => {
        const WHITELISTED_KEYS: &[&str] = &[$($key),+];
    };
}

whitelist!(
    "freezecols",
    "border",
    "no_cursor",
    "vertical_cursor",
    "no_scrollbar",
    "no_highlight_search",
    "no_highlight_lines",
    "ignore_case",
    "ignore_lower_case",
    "hide_header_line",
    "highlight_odd_rec",
    "null",
    "watch",
    "quit_if_one_screen",
);

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct PersistedConfig {
    #[serde(flatten)]
    pub values: BTreeMap<String, Value>,
}

impl PersistedConfig {
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.values.get(key).and_then(Value::as_bool)
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.values.get(key).and_then(Value::as_integer)
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    pub fn set(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }
}

/// Platform-conventional discovery: `$XDG_CONFIG_HOME/pgr/pgr.toml` (or the
/// platform equivalent), falling back to a bare relative filename if no
/// config directory is resolvable.
pub fn discover() -> PathBuf {
    match dirs::config_dir() {
        Some(dir) => dir.join("pgr").join("pgr.toml"),
        None => PathBuf::from("pgr.toml"),
    }
}

pub fn load(path: &Path) -> Result<PersistedConfig, ConfigFileError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(PersistedConfig::default()),
        Err(source) => return Err(ConfigFileError::Read { path: path.to_path_buf(), source }),
    };
    let parsed: PersistedConfig =
        toml::from_str(&content).map_err(|source| ConfigFileError::Parse { path: path.to_path_buf(), source })?;
    for key in parsed.values.keys() {
        if !WHITELISTED_KEYS.contains(&key.as_str()) {
            tracing::warn!(target: "config", key, "ignoring unknown persisted config key");
        }
    }
    let mut filtered = PersistedConfig::default();
    for key in WHITELISTED_KEYS {
        if let Some(v) = parsed.values.get(*key) {
            filtered.values.insert((*key).to_string(), v.clone());
        }
    }
    Ok(filtered)
}

pub fn save(path: &Path, config: &PersistedConfig) -> Result<(), ConfigFileError> {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let rendered = toml::to_string_pretty(config)?;
    std::fs::write(path, rendered).map_err(|source| ConfigFileError::Write { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_keys_are_dropped_not_fatal() {
        let dir = std::env::temp_dir().join(format!("pgr-config-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("pgr.toml");
        std::fs::write(&path, "freezecols = 2\nsome_future_key = \"x\"\n").unwrap();
        let cfg = load(&path).unwrap();
        assert_eq!(cfg.get_int("freezecols"), Some(2));
        assert!(!cfg.values.contains_key("some_future_key"));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = load(Path::new("/nonexistent/pgr-config-test/pgr.toml")).unwrap();
        assert!(cfg.values.is_empty());
    }
}
