//! Theme normalization and caller-supplied theme overrides.

use crate::types::{ColorScheme, Fonts, Theme};
use serde::Deserialize;

/// Normalize a color to 6 uppercase hex digits without a leading `#`.
///
/// 8-digit `rrggbbaa` values keep their color part. Anything else
/// (names, placeholders like `#hexcode`) is rejected.
pub fn normalize_hex(raw: &str) -> Option<String> {
    let hex = raw.trim().trim_start_matches('#');
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        6 => Some(hex.to_ascii_uppercase()),
        8 => Some(hex[..6].to_ascii_uppercase()),
        3 => Some(hex.chars().flat_map(|c| [c, c]).collect::<String>().to_ascii_uppercase()),
        _ => None,
    }
}

/// Normalize `raw` or fall back to `fallback` (assumed already normal).
pub fn resolve_color(raw: Option<&str>, fallback: &str) -> String {
    raw.and_then(normalize_hex)
        .unwrap_or_else(|| fallback.to_string())
}

/// Bring every color into canonical form and fill empty fonts.
pub fn normalize_theme(theme: &mut Theme) {
    let defaults = ColorScheme::default();
    let scheme = &mut theme.color_scheme;
    for (slot, fallback) in [
        (&mut scheme.primary, &defaults.primary),
        (&mut scheme.secondary, &defaults.secondary),
        (&mut scheme.accent, &defaults.accent),
        (&mut scheme.background, &defaults.background),
        (&mut scheme.text, &defaults.text),
    ] {
        let resolved = resolve_color(Some(slot.as_str()), fallback);
        if resolved != *slot {
            log::debug!("Theme color '{}' resolved to {}", slot, resolved);
        }
        *slot = resolved;
    }

    let default_fonts = Fonts::default();
    if theme.fonts.title.trim().is_empty() {
        theme.fonts.title = default_fonts.title;
    }
    if theme.fonts.body.trim().is_empty() {
        theme.fonts.body = default_fonts.body;
    }
}

/// Partial color scheme; present keys override.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ColorOverride {
    pub primary: Option<String>,
    pub secondary: Option<String>,
    pub accent: Option<String>,
    pub background: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FontOverride {
    pub title: Option<String>,
    pub body: Option<String>,
}

/// A caller-supplied partial theme.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeOverride {
    pub color_scheme: Option<ColorOverride>,
    pub fonts: Option<FontOverride>,
}

impl ThemeOverride {
    /// Parse a serialized override. Malformed payloads yield `None`;
    /// they are never partially applied.
    pub fn parse(payload: &str) -> Option<Self> {
        match serde_json::from_str(payload) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                log::warn!("Ignoring unparseable theme override: {}", e);
                None
            }
        }
    }

    /// Shallow-merge into `theme`, key by key.
    ///
    /// Color values that are not valid hex are skipped so the scheme stays
    /// fully populated with usable colors.
    pub fn apply(&self, theme: &mut Theme) {
        if let Some(colors) = &self.color_scheme {
            let scheme = &mut theme.color_scheme;
            for (slot, value) in [
                (&mut scheme.primary, &colors.primary),
                (&mut scheme.secondary, &colors.secondary),
                (&mut scheme.accent, &colors.accent),
                (&mut scheme.background, &colors.background),
                (&mut scheme.text, &colors.text),
            ] {
                let Some(value) = value else { continue };
                match normalize_hex(value) {
                    Some(hex) => *slot = hex,
                    None => log::warn!("Ignoring invalid override color '{}'", value),
                }
            }
        }

        if let Some(fonts) = &self.fonts {
            if let Some(title) = fonts.title.as_ref().filter(|t| !t.trim().is_empty()) {
                theme.fonts.title = title.clone();
            }
            if let Some(body) = fonts.body.as_ref().filter(|b| !b.trim().is_empty()) {
                theme.fonts.body = body.clone();
            }
        }
    }
}

/// Merge an optional serialized override into `theme`.
pub fn merge_override(theme: &mut Theme, payload: Option<&str>) {
    let Some(payload) = payload.filter(|p| !p.trim().is_empty()) else {
        return;
    };
    if let Some(theme_override) = ThemeOverride::parse(payload) {
        theme_override.apply(theme);
    }
}
