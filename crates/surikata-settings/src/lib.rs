//! # surikata-settings
//!
//! Layered configuration for a Surikata node.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`SurikataSettings::default()`]
//! 2. **Settings file**: `~/.surikata/settings.json` or an explicit path,
//!    deep-merged over the defaults
//! 3. **Environment variables**: `SURIKATA_*` overrides
//!
//! The binary applies CLI flags on top of the loaded value and passes the
//! result down explicitly; there is no global settings instance.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{apply_env_overrides, deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_is_under_dot_surikata() {
        let path = settings_path();
        assert!(path.ends_with(".surikata/settings.json"));
    }
}
