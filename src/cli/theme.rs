//! `palaver theme`: print the resolved palette.

use crate::core::config::data::Config;
use crate::core::theme::{Palette, ThemeVariant};

pub(crate) fn palette_lines(palette: &Palette) -> Vec<String> {
    vec![
        format!("mode: {}", palette.mode),
        format!("background.default: {}", palette.background_default),
        format!("background.paper: {}", palette.background_paper),
        format!("primary.main: {}", palette.primary.main),
        format!("primary.dark: {}", palette.primary.dark),
        format!("primary.light: {}", palette.primary.light),
        format!("text.primary: {}", palette.text_primary),
        format!("divider: {}", palette.divider),
    ]
}

pub fn print_palette(config: &Config, variant: Option<ThemeVariant>) {
    let palette = config.palette(variant);
    for line in palette_lines(&palette) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::theme::{ThemeOverride, ThemeOverrides};

    #[test]
    fn lines_reflect_overrides_for_the_requested_variant() {
        let config = Config {
            theme_overrides: ThemeOverrides {
                light: Some(ThemeOverride {
                    paper: Some("#fafafa".to_string()),
                    ..Default::default()
                }),
                dark: None,
            },
            ..Default::default()
        };

        let light = palette_lines(&config.palette(Some(ThemeVariant::Light)));
        assert_eq!(light[0], "mode: light");
        assert_eq!(light[2], "background.paper: #fafafa");
        assert_eq!(light[3], "primary.main: #F80061");

        let dark = palette_lines(&config.palette(None));
        assert_eq!(dark[0], "mode: dark");
        assert_eq!(dark[2], "background.paper: #171717");
    }
}
