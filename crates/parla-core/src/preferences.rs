use std::sync::Arc;

use parla_types::{Customization, LanguageRef, Theme};

use crate::language;
use crate::store::{
    CUSTOMIZATION_KEY, KeyValueStore, SOURCE_LANGUAGE_KEY, TARGET_LANGUAGE_KEY, THEME_KEY,
};

/// (id, display name, font stack)
pub const FONTS: [(&str, &str, &str); 3] = [
    ("inter", "Modern", "Inter, sans-serif"),
    ("playfair", "Elegant", "\"Playfair Display\", serif"),
    ("fira", "Code", "\"Fira Code\", monospace"),
];

/// (id, display name)
pub const TEXT_COLORS: [(&str, &str); 5] = [
    ("default", "Default"),
    ("blue", "Ocean"),
    ("emerald", "Forest"),
    ("violet", "Royal"),
    ("rose", "Rose"),
];

#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    #[error("Unknown font: {0}")]
    UnknownFont(String),

    #[error("Unknown text color: {0}")]
    UnknownColor(String),
}

/// Settings that survive restarts
#[derive(Debug, Clone, PartialEq)]
pub struct Preferences {
    pub source: LanguageRef,
    pub target: LanguageRef,
    pub theme: Theme,
    pub customization: Customization,
}

pub fn default_customization() -> Customization {
    Customization {
        font_family: FONTS[0].2.to_string(),
        text_color: TEXT_COLORS[0].0.to_string(),
    }
}

/// Reads and writes the four preference keys.
///
/// Reads never fail: missing, unknown or malformed values fall back to
/// their defaults. Writes are logged when they fail and otherwise ignored.
pub struct PreferenceStore {
    store: Arc<dyn KeyValueStore>,
}

impl PreferenceStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn load(&self) -> Preferences {
        let source = self
            .read(SOURCE_LANGUAGE_KEY)
            .and_then(|code| language::find_source(code.trim()))
            .unwrap_or_else(language::default_source);

        let target = self
            .read(TARGET_LANGUAGE_KEY)
            .and_then(|code| language::find_target(code.trim()))
            .unwrap_or_else(language::default_target);

        let theme = match self.read(THEME_KEY).as_deref().map(str::trim) {
            Some("light") => Theme::Light,
            _ => Theme::Dark,
        };

        let customization = self
            .read(CUSTOMIZATION_KEY)
            .and_then(|raw| match serde_json::from_str::<Customization>(&raw) {
                Ok(c) => Some(c),
                Err(e) => {
                    tracing::warn!("Ignoring malformed customization: {}", e);
                    None
                }
            })
            .unwrap_or_else(default_customization);

        Preferences {
            source,
            target,
            theme,
            customization,
        }
    }

    pub fn save_languages(&self, source: &LanguageRef, target: &LanguageRef) {
        self.write(SOURCE_LANGUAGE_KEY, &source.code);
        self.write(TARGET_LANGUAGE_KEY, &target.code);
    }

    pub fn save_theme(&self, theme: Theme) {
        self.write(THEME_KEY, theme.as_str());
    }

    pub fn save_customization(&self, customization: &Customization) {
        match serde_json::to_string(customization) {
            Ok(raw) => self.write(CUSTOMIZATION_KEY, &raw),
            Err(e) => tracing::error!("Failed to encode customization: {}", e),
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to read preference {}: {}", key, e);
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            tracing::error!("Failed to save preference {}: {}", key, e);
        }
    }
}

/// Apply a font id, keeping the text color
pub fn with_font(current: &Customization, font_id: &str) -> Result<Customization, PreferenceError> {
    let (_, _, stack) = FONTS
        .iter()
        .find(|(id, _, _)| *id == font_id)
        .ok_or_else(|| PreferenceError::UnknownFont(font_id.to_string()))?;

    Ok(Customization {
        font_family: stack.to_string(),
        text_color: current.text_color.clone(),
    })
}

/// Apply a text color id, keeping the font
pub fn with_text_color(
    current: &Customization,
    color_id: &str,
) -> Result<Customization, PreferenceError> {
    if !TEXT_COLORS.iter().any(|(id, _)| *id == color_id) {
        return Err(PreferenceError::UnknownColor(color_id.to_string()));
    }

    Ok(Customization {
        font_family: current.font_family.clone(),
        text_color: color_id.to_string(),
    })
}
