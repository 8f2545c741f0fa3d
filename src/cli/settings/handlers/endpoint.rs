//! Endpoint settings backed by an optional URL field.

use crate::cli::settings::error::SettingError;
use crate::cli::settings::helpers::{success_set, success_unset};
use crate::cli::settings::SettingHandler;
use crate::core::config::data::Config;
use crate::utils::url::normalize_base_url;

type FieldAccessor = fn(&mut Config) -> &mut Option<String>;
type FieldReader = fn(&Config) -> Option<&String>;

/// Handler for a URL-valued setting.
pub struct EndpointHandler {
    key: &'static str,
    schemes: &'static [&'static str],
    example: &'static str,
    field: FieldAccessor,
    read: FieldReader,
    fallback: &'static str,
}

pub fn http_endpoint_handler() -> EndpointHandler {
    EndpointHandler {
        key: "http-endpoint",
        schemes: &["http://", "https://"],
        example: "palaver config set http-endpoint https://chat.example.com",
        field: |config| &mut config.http_endpoint,
        read: |config| config.http_endpoint.as_ref(),
        fallback: "default",
    }
}

pub fn ws_endpoint_handler() -> EndpointHandler {
    EndpointHandler {
        key: "ws-endpoint",
        schemes: &["http://", "https://", "ws://", "wss://"],
        example: "palaver config set ws-endpoint wss://chat.example.com",
        field: |config| &mut config.ws_endpoint,
        read: |config| config.ws_endpoint.as_ref(),
        fallback: "falls back to http-endpoint",
    }
}

impl SettingHandler for EndpointHandler {
    fn key(&self) -> &'static str {
        self.key
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let Some(raw) = args.first().map(|arg| arg.trim()) else {
            return Err(SettingError::MissingArgs {
                hint: "To set an endpoint, provide its URL:",
                example: self.example,
            });
        };

        let lowered = raw.to_ascii_lowercase();
        if !self.schemes.iter().any(|scheme| lowered.starts_with(scheme)) {
            return Err(SettingError::InvalidValue {
                key: self.key,
                input: raw.to_string(),
                expected: "a URL starting with one of the supported schemes",
            });
        }

        let value = normalize_base_url(raw);
        *(self.field)(config) = Some(value.clone());
        Ok(success_set(self.key, &value))
    }

    fn unset(&self, _arg: Option<&str>, config: &mut Config) -> Result<String, SettingError> {
        *(self.field)(config) = None;
        Ok(success_unset(self.key))
    }

    fn format(&self, config: &Config) -> String {
        match (self.read)(config) {
            Some(endpoint) => format!("  {}: {endpoint}", self.key),
            None => format!("  {}: (unset, {})", self.key, self.fallback),
        }
    }
}
