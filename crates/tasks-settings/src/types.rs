//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` and `#[serde(default)]`,
//! so a settings file only needs the keys it wants to change.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::loader::tasks_home;

/// Root settings type.
///
/// ```json
/// {
///   "server": { "port": 8080 },
///   "logging": { "level": "debug", "json": false }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskSettings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub logging: LoggingSettings,
    pub client: ClientSettings,
}

/// HTTP listener settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    pub host: String,
    /// 0 binds an ephemeral port.
    pub port: u16,
    /// Allow any origin, so a browser UI served elsewhere can call the API.
    pub permissive_cors: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5266,
            permissive_cors: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatabaseSettings {
    pub path: PathBuf,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: tasks_home().join("tasks.db"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Default level. `RUST_LOG` takes precedence when set.
    pub level: String,
    /// JSON lines when true, human-readable text otherwise.
    pub json: bool,
    /// Per-module overrides, e.g. `{"tasks_store": "debug"}`.
    pub module_levels: BTreeMap<String, String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
            module_levels: BTreeMap::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientSettings {
    /// Base URL of the API the CLI client talks to.
    pub base_url: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5266".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = TaskSettings::default();
        assert_eq!(s.server.host, "127.0.0.1");
        assert_eq!(s.server.port, 5266);
        assert!(s.server.permissive_cors);
        assert_eq!(s.logging.level, "info");
        assert!(s.logging.json);
        assert_eq!(s.client.base_url, "http://localhost:5266");
        assert!(s.database.path.ends_with("tasks.db"));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let s: TaskSettings =
            serde_json::from_str(r#"{"server": {"port": 8080}, "logging": {"json": false}}"#)
                .unwrap();
        assert_eq!(s.server.port, 8080);
        assert_eq!(s.server.host, "127.0.0.1");
        assert!(!s.logging.json);
        assert_eq!(s.logging.level, "info");
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(TaskSettings::default()).unwrap();
        assert!(json["server"].get("permissiveCors").is_some());
        assert!(json["client"].get("baseUrl").is_some());
        assert!(json["logging"].get("moduleLevels").is_some());
    }
}
