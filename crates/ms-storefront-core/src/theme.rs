//! Host theme colours mapped onto CSS custom properties.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ThemeParams {
    #[serde(default)]
    pub bg_color: Option<String>,
    #[serde(default)]
    pub text_color: Option<String>,
    #[serde(default)]
    pub hint_color: Option<String>,
    #[serde(default)]
    pub link_color: Option<String>,
    #[serde(default)]
    pub button_color: Option<String>,
    #[serde(default)]
    pub secondary_bg_color: Option<String>,
}

/// CSS variables for the document root, each falling back to a default
/// colour when the host does not provide one.
pub fn css_variables(params: &ThemeParams) -> Vec<(&'static str, String)> {
    let pick = |value: &Option<String>, fallback: &str| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(fallback)
            .to_owned()
    };

    vec![
        ("--tg-theme-bg-color", pick(&params.bg_color, "#ffffff")),
        ("--tg-theme-text-color", pick(&params.text_color, "#000000")),
        ("--tg-theme-hint-color", pick(&params.hint_color, "#999999")),
        ("--tg-theme-link-color", pick(&params.link_color, "#2481cc")),
        ("--tg-theme-button-color", pick(&params.button_color, "#2481cc")),
        (
            "--tg-theme-secondary-bg-color",
            pick(&params.secondary_bg_color, "#f1f1f1"),
        ),
    ]
}
