use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::core::theme::{ThemeOverrides, ThemeVariant};

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the chat backend (e.g., "https://chat.example.com")
    pub http_endpoint: Option<String>,
    /// Realtime session endpoint; falls back to the HTTP endpoint
    pub ws_endpoint: Option<String>,
    /// UI theme variant ("light" or "dark")
    pub theme: Option<ThemeVariant>,
    /// Per-variant palette overrides
    #[serde(default)]
    pub theme_overrides: ThemeOverrides,
    /// Environment forwarded with completions (API keys and the like)
    #[serde(default)]
    pub user_env: HashMap<String, String>,
    /// Conversations fetched per page
    pub page_size: Option<u32>,
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
///
/// # Examples
/// - Unix: `/home/user/.config/palaver/config.toml` → `~/.config/palaver/config.toml`
/// - Windows: `C:\\Users\\user\\AppData\\Roaming\\palaver\\config.toml` is left as-is
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}

impl Config {
    pub fn set_user_env(&mut self, key: String, value: String) {
        self.user_env.insert(key, value);
    }

    pub fn unset_user_env(&mut self, key: &str) -> bool {
        self.user_env.remove(key).is_some()
    }
}
