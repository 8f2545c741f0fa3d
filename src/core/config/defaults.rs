use crate::core::config::data::Config;
use crate::core::theme::{resolve_palette, Palette, ThemeVariant};

pub const DEFAULT_HTTP_ENDPOINT: &str = "http://localhost:8000";
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const HTTP_ENDPOINT_ENV: &str = "PALAVER_HTTP_ENDPOINT";
pub const WS_ENDPOINT_ENV: &str = "PALAVER_WS_ENDPOINT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub http: String,
    pub ws: String,
}

impl Config {
    /// Resolve endpoints from the process environment, then the file, then
    /// built-in defaults.
    pub fn endpoints(&self) -> Endpoints {
        self.endpoints_with_env(|key| std::env::var(key).ok())
    }

    pub(crate) fn endpoints_with_env<F>(&self, env: F) -> Endpoints
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        let http = non_empty(env(HTTP_ENDPOINT_ENV))
            .or_else(|| non_empty(self.http_endpoint.clone()))
            .unwrap_or_else(|| DEFAULT_HTTP_ENDPOINT.to_string());
        let ws = non_empty(env(WS_ENDPOINT_ENV))
            .or_else(|| non_empty(self.ws_endpoint.clone()))
            .unwrap_or_else(|| http.clone());

        Endpoints { http, ws }
    }

    pub fn theme_variant(&self) -> ThemeVariant {
        self.theme.unwrap_or_default()
    }

    pub fn palette(&self, variant: Option<ThemeVariant>) -> Palette {
        resolve_palette(
            variant.unwrap_or_else(|| self.theme_variant()),
            &self.theme_overrides,
        )
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
            .filter(|size| *size > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }
}
