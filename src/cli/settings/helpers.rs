//! Helper functions for settings operations.

use std::error::Error;

use crate::core::config::data::Config;

use super::error::SettingError;
use super::SettingRegistry;

/// Apply one handler operation to the on-disk configuration.
///
/// The handler runs inside `Config::mutate`, so the file is only rewritten
/// when the handler succeeds.
pub fn mutate_config<F>(f: F) -> Result<String, SettingError>
where
    F: FnOnce(&mut Config) -> Result<String, SettingError>,
{
    Config::mutate(|config| f(config).map_err(|err| -> Box<dyn Error> { Box::new(err) }))
        .map_err(|err| match err.downcast::<SettingError>() {
            Ok(setting_err) => *setting_err,
            Err(other) => SettingError::ConfigError(other.to_string()),
        })
}

/// Look up `key` and apply `set` to the stored configuration.
pub fn set_setting(
    registry: &SettingRegistry,
    key: &str,
    args: &[String],
) -> Result<String, SettingError> {
    let handler = registry
        .get(key)
        .ok_or_else(|| SettingError::UnknownKey(key.to_string()))?;
    mutate_config(|config| handler.set(args, config))
}

/// Look up `key` and apply `unset` to the stored configuration.
pub fn unset_setting(
    registry: &SettingRegistry,
    key: &str,
    arg: Option<&str>,
) -> Result<String, SettingError> {
    let handler = registry
        .get(key)
        .ok_or_else(|| SettingError::UnknownKey(key.to_string()))?;
    mutate_config(|config| handler.unset(arg, config))
}

pub fn success_set(key: &str, value: &str) -> String {
    format!("✅ Set {key} to: {value}")
}

pub fn success_unset(key: &str) -> String {
    format!("✅ Unset {key}")
}
