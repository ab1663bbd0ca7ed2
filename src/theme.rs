//! Theme colors for the score screen
//! Defaults can be overridden per color from the `[theme]` table of the config file

use ratatui::style::Color;

use crate::config::ThemeConfig;

/// Theme colors for the UI
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub accent: Color,           // Focused borders, selected button
    pub add: Color,              // "+" buttons
    pub subtract: Color,         // "-" buttons
    pub error: Color,            // Input error, negative score
    pub text: Color,             // Primary text
    pub text_dim: Color,         // Hints, unfocused labels
    pub inactive: Color,         // Unfocused borders
    pub bg_selected: Color,      // Selected button background
    pub header: Color,           // Section titles in help
}

impl Default for Theme {
    fn default() -> Self {
        // Catppuccin-inspired palette
        Self {
            accent: Color::Rgb(250, 179, 135),
            add: Color::Rgb(166, 218, 149),
            subtract: Color::Rgb(243, 139, 168),
            error: Color::Rgb(243, 139, 168),
            text: Color::Rgb(205, 214, 244),
            text_dim: Color::Rgb(147, 153, 178),
            inactive: Color::Rgb(88, 91, 112),
            bg_selected: Color::Rgb(69, 71, 90),
            header: Color::Rgb(245, 194, 231),
        }
    }
}

impl Theme {
    /// Build a theme from config overrides, ignoring values that aren't valid colors
    pub fn from_config(overrides: &ThemeConfig) -> Self {
        let base = Self::default();

        let pick = |value: &Option<String>, fallback: Color| {
            match value.as_deref() {
                Some(raw) => Self::parse_hex_color(raw).unwrap_or_else(|| {
                    tracing::warn!("Ignoring invalid theme color: {}", raw);
                    fallback
                }),
                None => fallback,
            }
        };

        Self {
            accent: pick(&overrides.accent, base.accent),
            add: pick(&overrides.add, base.add),
            subtract: pick(&overrides.subtract, base.subtract),
            error: pick(&overrides.error, base.error),
            text: pick(&overrides.text, base.text),
            text_dim: pick(&overrides.text_dim, base.text_dim),
            ..base
        }
    }

    /// Parse a hex color string (#RRGGBB or #RGB)
    fn parse_hex_color(s: &str) -> Option<Color> {
        let s = s.trim().trim_start_matches('#');

        if !s.is_ascii() {
            return None;
        }

        if s.len() == 6 {
            let r = u8::from_str_radix(&s[0..2], 16).ok()?;
            let g = u8::from_str_radix(&s[2..4], 16).ok()?;
            let b = u8::from_str_radix(&s[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        } else if s.len() == 3 {
            let r = u8::from_str_radix(&s[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&s[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&s[2..3], 16).ok()? * 17;
            Some(Color::Rgb(r, g, b))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(Theme::parse_hex_color("#FFC107"), Some(Color::Rgb(255, 193, 7)));
        assert_eq!(Theme::parse_hex_color("  #fff "), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(Theme::parse_hex_color("0a0b0c"), Some(Color::Rgb(10, 11, 12)));
        assert_eq!(Theme::parse_hex_color("#12345"), None);
        assert_eq!(Theme::parse_hex_color("#zzzzzz"), None);
        assert_eq!(Theme::parse_hex_color("#éé"), None);
    }

    #[test]
    fn test_overrides_applied() {
        let overrides = ThemeConfig {
            add: Some("#00ff00".to_string()),
            error: Some("not a color".to_string()),
            ..Default::default()
        };
        let theme = Theme::from_config(&overrides);
        assert_eq!(theme.add, Color::Rgb(0, 255, 0));
        assert_eq!(theme.error, Theme::default().error);
        assert_eq!(theme.accent, Theme::default().accent);
    }
}
