use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::{Result, SettingsError};
use crate::types::TaskSettings;

/// `~/.tasks`, or `/tmp/.tasks` when `HOME` is unset.
pub fn tasks_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
        .join(".tasks")
}

/// Default location of the user settings file.
pub fn settings_path() -> PathBuf {
    tasks_home().join("settings.json")
}

/// Load from the default path, then apply environment overrides.
pub fn load_settings() -> Result<TaskSettings> {
    load_settings_from_path(&settings_path())
}

/// Load from `path` (deep-merged over defaults), then apply environment
/// overrides. A missing file yields the defaults.
pub fn load_settings_from_path(path: &Path) -> Result<TaskSettings> {
    let defaults = serde_json::to_value(TaskSettings::default())?;

    let merged = match std::fs::read_to_string(path) {
        Ok(raw) => {
            let user: Value = serde_json::from_str(&raw).map_err(|source| SettingsError::Parse {
                path: path.to_owned(),
                source,
            })?;
            debug!(path = %path.display(), "settings file loaded");
            deep_merge(defaults, user)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no settings file, using defaults");
            defaults
        }
        Err(source) => {
            return Err(SettingsError::Read {
                path: path.to_owned(),
                source,
            })
        }
    };

    let mut settings: TaskSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

/// Recursively merge `overlay` into `base`. Objects merge key by key;
/// every other value in `overlay` replaces the one in `base`.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                let merged = match base.remove(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value,
                };
                let _ = base.insert(key, merged);
            }
            Value::Object(base)
        }
        (_, overlay) => overlay,
    }
}

/// Apply `TASKS_*` overrides read through `lookup`.
///
/// Unparsable values are ignored with a warning.
pub fn apply_env_overrides<F>(settings: &mut TaskSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup("TASKS_HOST") {
        settings.server.host = host;
    }
    if let Some(raw) = lookup("TASKS_PORT") {
        match raw.trim().parse::<u16>() {
            Ok(port) => settings.server.port = port,
            Err(e) => warn!(value = %raw, error = %e, "ignoring invalid TASKS_PORT"),
        }
    }
    if let Some(path) = lookup("TASKS_DB_PATH") {
        settings.database.path = PathBuf::from(path);
    }
    if let Some(level) = lookup("TASKS_LOG_LEVEL") {
        settings.logging.level = level;
    }
    if let Some(url) = lookup("TASKS_API_URL") {
        settings.client.base_url = url;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn deep_merge_objects_recursively() {
        let base = json!({"server": {"host": "a", "port": 1}, "x": [1, 2]});
        let overlay = json!({"server": {"port": 2}, "x": [3]});
        let merged = deep_merge(base, overlay);
        assert_eq!(merged["server"]["host"], "a");
        assert_eq!(merged["server"]["port"], 2);
        assert_eq!(merged["x"], json!([3]));
    }

    #[test]
    fn deep_merge_adds_new_keys() {
        let merged = deep_merge(json!({"a": 1}), json!({"b": {"c": 2}}));
        assert_eq!(merged["a"], 1);
        assert_eq!(merged["b"]["c"], 2);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_from_path(&dir.path().join("nope.json")).unwrap();
        let mut expected = TaskSettings::default();
        apply_env_overrides(&mut expected, |key| std::env::var(key).ok());
        assert_eq!(settings, expected);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"database": {"path": "/data/t.db"}, "logging": {"moduleLevels": {"tasks_store": "debug"}}}"#,
        )
        .unwrap();
        let settings = load_settings_from_path(&path).unwrap();
        assert_eq!(
            settings.logging.module_levels.get("tasks_store").map(String::as_str),
            Some("debug")
        );
        assert!(settings.server.permissive_cors);
    }

    #[test]
    fn malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            load_settings_from_path(&path),
            Err(SettingsError::Parse { .. })
        ));
    }

    #[test]
    fn wrong_shape_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"server": {"port": "eighty"}}"#).unwrap();
        assert!(matches!(
            load_settings_from_path(&path),
            Err(SettingsError::Shape(_))
        ));
    }

    #[test]
    fn env_overrides_apply() {
        let mut settings = TaskSettings::default();
        apply_env_overrides(
            &mut settings,
            env(&[
                ("TASKS_HOST", "0.0.0.0"),
                ("TASKS_PORT", "9000"),
                ("TASKS_DB_PATH", "/var/lib/tasks.db"),
                ("TASKS_LOG_LEVEL", "debug"),
                ("TASKS_API_URL", "http://api:9000"),
            ]),
        );
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.database.path, PathBuf::from("/var/lib/tasks.db"));
        assert_eq!(settings.logging.level, "debug");
        assert_eq!(settings.client.base_url, "http://api:9000");
    }

    #[test]
    fn invalid_env_port_is_ignored() {
        let mut settings = TaskSettings::default();
        apply_env_overrides(&mut settings, env(&[("TASKS_PORT", "http")]));
        assert_eq!(settings.server.port, 5266);
    }
}
