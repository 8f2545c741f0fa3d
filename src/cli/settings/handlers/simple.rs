//! Simple setting handlers for single-value settings.

use crate::cli::settings::error::SettingError;
use crate::cli::settings::helpers::{success_set, success_unset};
use crate::cli::settings::SettingHandler;
use crate::core::config::data::Config;
use crate::core::config::defaults::DEFAULT_PAGE_SIZE;
use crate::core::theme::ThemeVariant;

/// Handler for the `theme` setting.
pub struct ThemeHandler;

impl SettingHandler for ThemeHandler {
    fn key(&self) -> &'static str {
        "theme"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let Some(raw) = args.first() else {
            return Err(SettingError::MissingArgs {
                hint: "To set a theme, specify the variant:",
                example: "palaver config set theme light",
            });
        };

        let variant: ThemeVariant = raw.parse().map_err(|_| SettingError::InvalidValue {
            key: "theme",
            input: raw.clone(),
            expected: "'light' or 'dark'",
        })?;
        config.theme = Some(variant);
        Ok(success_set("theme", variant.as_str()))
    }

    fn unset(&self, _arg: Option<&str>, config: &mut Config) -> Result<String, SettingError> {
        config.theme = None;
        Ok(success_unset("theme"))
    }

    fn format(&self, config: &Config) -> String {
        match &config.theme {
            Some(theme) => format!("  theme: {theme}"),
            None => format!("  theme: (unset, default: {})", ThemeVariant::default()),
        }
    }
}

/// Handler for the `page-size` setting.
pub struct PageSizeHandler;

impl SettingHandler for PageSizeHandler {
    fn key(&self) -> &'static str {
        "page-size"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let Some(raw) = args.first() else {
            return Err(SettingError::MissingArgs {
                hint: "To set the conversation page size, provide a number:",
                example: "palaver config set page-size 50",
            });
        };

        let size = raw
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|size| *size > 0)
            .ok_or_else(|| SettingError::InvalidValue {
                key: "page-size",
                input: raw.clone(),
                expected: "a positive whole number",
            })?;
        config.page_size = Some(size);
        Ok(success_set("page-size", &size.to_string()))
    }

    fn unset(&self, _arg: Option<&str>, config: &mut Config) -> Result<String, SettingError> {
        config.page_size = None;
        Ok(success_unset("page-size"))
    }

    fn format(&self, config: &Config) -> String {
        match config.page_size {
            Some(size) => format!("  page-size: {size}"),
            None => format!("  page-size: (unset, default: {DEFAULT_PAGE_SIZE})"),
        }
    }
}
