//! Handler for variables forwarded to the backend with each completion.

use crate::cli::settings::error::SettingError;
use crate::cli::settings::SettingHandler;
use crate::core::config::data::Config;

pub struct UserEnvHandler;

impl SettingHandler for UserEnvHandler {
    fn key(&self) -> &'static str {
        "user-env"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let missing = SettingError::MissingArgs {
            hint: "To set a user environment variable, provide NAME=VALUE:",
            example: "palaver config set user-env OPENAI_API_KEY=sk-...",
        };
        let Some(raw) = args.first() else {
            return Err(missing);
        };
        let Some((name, value)) = raw.split_once('=') else {
            return Err(missing);
        };

        let name = name.trim();
        if name.is_empty() {
            return Err(SettingError::InvalidValue {
                key: "user-env",
                input: raw.clone(),
                expected: "a non-empty variable name before '='",
            });
        }

        config.set_user_env(name.to_string(), value.to_string());
        Ok(format!("✅ Set user-env {name}"))
    }

    fn unset(&self, arg: Option<&str>, config: &mut Config) -> Result<String, SettingError> {
        match arg {
            Some(name) => {
                if config.unset_user_env(name) {
                    Ok(format!("✅ Unset user-env {name}"))
                } else {
                    Ok(format!("ℹ️  user-env {name} was not set"))
                }
            }
            None => {
                config.user_env.clear();
                Ok("✅ Cleared all user-env variables".to_string())
            }
        }
    }

    fn format(&self, config: &Config) -> String {
        if config.user_env.is_empty() {
            return "  user-env: (none set)".to_string();
        }

        let mut names: Vec<&String> = config.user_env.keys().collect();
        names.sort();
        let mut lines = vec!["  user-env:".to_string()];
        lines.extend(names.into_iter().map(|name| format!("    {name}: (set)")));
        lines.join("\n")
    }
}
