//! Palette construction and user overrides.
//!
//! Overrides are plain configuration handed in at startup; nothing here reads
//! global state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeVariant {
    Light,
    #[default]
    Dark,
}

impl ThemeVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeVariant::Light => "light",
            ThemeVariant::Dark => "dark",
        }
    }
}

impl fmt::Display for ThemeVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ThemeVariant::Light),
            "dark" => Ok(ThemeVariant::Dark),
            other => Err(format!("unknown theme '{other}' (expected light or dark)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PrimaryOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dark: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ThemeOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paper: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<PrimaryOverride>,
}

impl ThemeOverride {
    pub fn is_empty(&self) -> bool {
        self.background.is_none()
            && self.paper.is_none()
            && self
                .primary
                .as_ref()
                .is_none_or(|p| p.main.is_none() && p.dark.is_none() && p.light.is_none())
    }

    fn colors(&self) -> impl Iterator<Item = (&'static str, &str)> {
        let primary = self.primary.as_ref();
        [
            ("background", self.background.as_deref()),
            ("paper", self.paper.as_deref()),
            ("primary.main", primary.and_then(|p| p.main.as_deref())),
            ("primary.dark", primary.and_then(|p| p.dark.as_deref())),
            ("primary.light", primary.and_then(|p| p.light.as_deref())),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ThemeOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light: Option<ThemeOverride>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dark: Option<ThemeOverride>,
}

impl ThemeOverrides {
    pub fn for_variant(&self, variant: ThemeVariant) -> Option<&ThemeOverride> {
        match variant {
            ThemeVariant::Light => self.light.as_ref(),
            ThemeVariant::Dark => self.dark.as_ref(),
        }
    }

    /// First override color that is not a `#rgb`/`#rrggbb` value, as
    /// `(field path, value)`.
    pub fn first_invalid_color(&self) -> Option<(String, String)> {
        [(ThemeVariant::Light, &self.light), (ThemeVariant::Dark, &self.dark)]
            .into_iter()
            .filter_map(|(variant, entry)| entry.as_ref().map(|e| (variant, e)))
            .flat_map(|(variant, entry)| {
                entry
                    .colors()
                    .map(move |(field, value)| (format!("{variant}.{field}"), value.to_string()))
                    .collect::<Vec<_>>()
            })
            .find(|(_, value)| !is_hex_color(value))
    }
}

pub fn is_hex_color(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryColors {
    pub main: String,
    pub dark: String,
    pub light: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub mode: ThemeVariant,
    pub background_default: String,
    pub background_paper: String,
    pub primary: PrimaryColors,
    pub text_primary: String,
    pub divider: String,
}

pub fn make_palette(variant: ThemeVariant) -> Palette {
    let primary = PrimaryColors {
        main: "#F80061".to_string(),
        dark: "#980039".to_string(),
        light: "#FFE7EB".to_string(),
    };
    match variant {
        ThemeVariant::Light => Palette {
            mode: variant,
            background_default: "#F5F5F5".to_string(),
            background_paper: "#FFFFFF".to_string(),
            primary,
            text_primary: "#212121".to_string(),
            divider: "#E0E0E0".to_string(),
        },
        ThemeVariant::Dark => Palette {
            mode: variant,
            background_default: "#212121".to_string(),
            background_paper: "#171717".to_string(),
            primary,
            text_primary: "#FAFAFA".to_string(),
            divider: "#424242".to_string(),
        },
    }
}

/// Replace only the palette fields the override for `palette.mode` provides.
pub fn apply_overrides(mut palette: Palette, overrides: &ThemeOverrides) -> Palette {
    let Some(entry) = overrides.for_variant(palette.mode) else {
        return palette;
    };

    if let Some(background) = &entry.background {
        palette.background_default = background.clone();
    }
    if let Some(paper) = &entry.paper {
        palette.background_paper = paper.clone();
    }
    if let Some(primary) = &entry.primary {
        if let Some(main) = &primary.main {
            palette.primary.main = main.clone();
        }
        if let Some(dark) = &primary.dark {
            palette.primary.dark = dark.clone();
        }
        if let Some(light) = &primary.light {
            palette.primary.light = light.clone();
        }
    }
    palette
}

pub fn resolve_palette(variant: ThemeVariant, overrides: &ThemeOverrides) -> Palette {
    apply_overrides(make_palette(variant), overrides)
}
