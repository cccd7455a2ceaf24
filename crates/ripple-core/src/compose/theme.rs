use serde::{Deserialize, Serialize};

pub const DEFAULT_ACCENT: &str = "#3BC5C2";
pub const DEFAULT_ACCENT_ALT: &str = "#2E63B7";
pub const DEFAULT_TEXT_PRIMARY: &str = "#EFF4FF";
pub const DEFAULT_TEXT_SECONDARY: &str = "rgba(215, 226, 241, 0.82)";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    #[default]
    Dark,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextColors {
    pub primary: Option<String>,
    pub secondary: Option<String>,
}

/// The slice of the site theme the compositor reads. Accepts the full theme
/// object; unknown keys are ignored.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemeColors {
    pub mode: ThemeMode,
    pub accent: Option<String>,
    pub accent_alt: Option<String>,
    pub text: TextColors,
}

fn pick(theme: Option<&str>, computed: Option<&str>, fallback: &str) -> String {
    theme
        .filter(|s| !s.is_empty())
        .or(computed.filter(|s| !s.is_empty()))
        .unwrap_or(fallback)
        .to_string()
}

impl ThemeColors {
    pub fn accent(&self) -> &str {
        self.accent.as_deref().unwrap_or(DEFAULT_ACCENT)
    }

    pub fn accent_alt(&self) -> &str {
        self.accent_alt.as_deref().unwrap_or(DEFAULT_ACCENT_ALT)
    }

    /// Kicker color: theme primary text, else the element's computed color.
    pub fn primary_text(&self, computed: Option<&str>) -> String {
        pick(self.text.primary.as_deref(), computed, DEFAULT_TEXT_PRIMARY)
    }

    pub fn secondary_text(&self, computed: Option<&str>) -> String {
        pick(self.text.secondary.as_deref(), computed, DEFAULT_TEXT_SECONDARY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_site_theme_object() {
        let json = r##"{
            "mode": "light",
            "background": "#DDE4E4",
            "text": { "primary": "#001B1A", "secondary": "rgba(0, 27, 26, 0.72)" },
            "accent": "#3CC5C2",
            "accentAlt": "#7BAAD6"
        }"##;
        let t: ThemeColors = serde_json::from_str(json).unwrap();
        assert_eq!(t.mode, ThemeMode::Light);
        assert_eq!(t.accent_alt(), "#7BAAD6");
        assert_eq!(t.primary_text(Some("red")), "#001B1A");
    }

    #[test]
    fn falls_back_to_computed_then_default() {
        let t = ThemeColors::default();
        assert_eq!(t.primary_text(Some("rgb(1, 2, 3)")), "rgb(1, 2, 3)");
        assert_eq!(t.secondary_text(None), DEFAULT_TEXT_SECONDARY);
        assert_eq!(t.accent(), DEFAULT_ACCENT);
    }
}
