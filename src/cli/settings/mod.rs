//! Settings management for `palaver config set/unset/show`.
//!
//! Each configuration key has a handler that knows how to parse, clear and
//! display its value:
//!
//! - Endpoint settings (`http-endpoint`, `ws-endpoint`)
//! - Simple typed settings (`theme`, `page-size`)
//! - Keyed settings (`user-env`)

pub mod error;
pub mod handlers;
pub mod helpers;
pub mod registry;

pub use error::SettingError;
pub use registry::SettingRegistry;

use crate::core::config::data::Config;

/// Trait for handling a configuration setting.
///
/// Handlers edit a working copy of the configuration; persisting it is left
/// to the caller so the whole edit lands in one atomic write.
pub trait SettingHandler: Send + Sync {
    /// Returns the configuration key this handler manages.
    fn key(&self) -> &'static str;

    /// Set the configuration value from the arguments after the key.
    ///
    /// Returns a success message to display.
    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError>;

    /// Unset (clear) the configuration value.
    ///
    /// `arg` narrows the change for keyed settings (e.g. the variable name for
    /// `user-env`).
    fn unset(&self, arg: Option<&str>, config: &mut Config) -> Result<String, SettingError>;

    /// Format the current value for display in `palaver config show`.
    fn format(&self, config: &Config) -> String;
}

#[cfg(test)]
mod tests;
