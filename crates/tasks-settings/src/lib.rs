//! # tasks-settings
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`TaskSettings::default()`]
//! 2. **User file**: `~/.tasks/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `TASKS_*` overrides (highest priority)
//!
//! Settings are loaded once at startup and passed down explicitly; there is
//! no global instance.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{
    apply_env_overrides, deep_merge, load_settings, load_settings_from_path, settings_path,
    tasks_home,
};
pub use types::*;
