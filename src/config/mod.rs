use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

use crate::{
    currency::{parse_amount, symbol_for, CurrencyCode},
    errors::CoreError,
    storage::json_backend::{tmp_path, write_atomic},
    utils::paths::{app_data_dir, config_file_in, ensure_dir},
};

pub const FONT_SCALE_MIN: f64 = 0.8;
pub const FONT_SCALE_MAX: f64 = 2.0;
pub const FONT_SCALE_STEP: f64 = 0.1;

/// Per-user preferences. Passed explicitly to whatever needs them; nothing in
/// the crate reads settings from global state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_currency_code")]
    pub currency_code: String,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default)]
    pub limit_on: bool,
    /// Kept as typed by the user; read through [`Settings::monthly_limit`].
    #[serde(default = "default_limit_val")]
    pub limit_val: String,
    #[serde(default)]
    pub accessibility: AccessibilityPrefs,
}

fn default_currency_code() -> String {
    CurrencyCode::default().0
}

fn default_currency_symbol() -> String {
    symbol_for(&default_currency_code())
}

fn default_limit_val() -> String {
    "0".into()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency_code: default_currency_code(),
            currency_symbol: default_currency_symbol(),
            limit_on: false,
            limit_val: default_limit_val(),
            accessibility: AccessibilityPrefs::default(),
        }
    }
}

impl Settings {
    /// The monthly spending limit, present only when enabled and positive.
    pub fn monthly_limit(&self) -> Option<f64> {
        let value = parse_amount(&self.limit_val);
        (self.limit_on && value > 0.0).then_some(value)
    }

    /// Switches the currency. The symbol follows the code unless the user has
    /// set a custom one.
    pub fn set_currency(&mut self, code: &str) {
        let code = CurrencyCode::new(code);
        if self.currency_symbol.is_empty() || self.currency_symbol == symbol_for(&self.currency_code)
        {
            self.currency_symbol = symbol_for(code.as_str());
        }
        self.currency_code = code.0;
    }

    /// Applies a `key = value` update coming from the command line.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        match key {
            "currency_code" | "currency" => self.set_currency(value),
            "currency_symbol" | "symbol" => self.currency_symbol = value.trim().to_string(),
            "limit_on" => self.limit_on = parse_flag(value)?,
            "limit_val" | "limit" => self.limit_val = value.trim().to_string(),
            "high_contrast" => self.accessibility.high_contrast = parse_flag(value)?,
            "speech" => self.accessibility.speech = parse_flag(value)?,
            "font_scale" => self.accessibility.set_font_scale(parse_amount(value)),
            other => {
                return Err(CoreError::InvalidInput(format!(
                    "unknown setting `{}`",
                    other
                )))
            }
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> Result<bool, CoreError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        other => Err(CoreError::InvalidInput(format!(
            "expected on/off, got `{}`",
            other
        ))),
    }
}

/// Display preferences mirrored from the accessibility toolbar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessibilityPrefs {
    #[serde(default)]
    pub high_contrast: bool,
    #[serde(default = "default_font_scale")]
    pub font_scale: f64,
    #[serde(default)]
    pub speech: bool,
}

fn default_font_scale() -> f64 {
    1.0
}

impl Default for AccessibilityPrefs {
    fn default() -> Self {
        Self {
            high_contrast: false,
            font_scale: default_font_scale(),
            speech: false,
        }
    }
}

impl AccessibilityPrefs {
    pub fn toggle_contrast(&mut self) {
        self.high_contrast = !self.high_contrast;
    }

    pub fn increase_font(&mut self) {
        self.set_font_scale(self.font_scale + FONT_SCALE_STEP);
    }

    pub fn decrease_font(&mut self) {
        self.set_font_scale(self.font_scale - FONT_SCALE_STEP);
    }

    pub fn reset_font(&mut self) {
        self.font_scale = default_font_scale();
    }

    /// Clamps to the supported range and rounds to two decimals so repeated
    /// steps do not accumulate float noise.
    pub fn set_font_scale(&mut self, scale: f64) {
        let scale = if scale.is_finite() {
            scale
        } else {
            default_font_scale()
        };
        let clamped = scale.clamp(FONT_SCALE_MIN, FONT_SCALE_MAX);
        self.font_scale = (clamped * 100.0).round() / 100.0;
    }
}

/// Loads and stores [`Settings`] as JSON under the application directory.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, CoreError> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, CoreError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
        })
    }

    /// Stored settings, or defaults when nothing has been saved yet.
    pub fn load(&self) -> Result<Settings, CoreError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Settings::default())
        }
    }

    pub fn save(&self, settings: &Settings) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(settings)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        info!(path = %self.path.display(), "settings saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_backend_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.currency_code, "PLN");
        assert_eq!(settings.currency_symbol, "zł");
        assert!(!settings.limit_on);
        assert_eq!(settings.limit_val, "0");
        assert_eq!(settings.monthly_limit(), None);
    }

    #[test]
    fn limit_requires_flag_and_positive_value() {
        let mut settings = Settings {
            limit_val: "150,5".into(),
            ..Settings::default()
        };
        assert_eq!(settings.monthly_limit(), None);
        settings.limit_on = true;
        assert_eq!(settings.monthly_limit(), Some(150.5));
        settings.limit_val = "-3".into();
        assert_eq!(settings.monthly_limit(), None);
    }

    #[test]
    fn currency_switch_updates_default_symbol_only() {
        let mut settings = Settings::default();
        settings.set_currency("eur");
        assert_eq!(settings.currency_code, "EUR");
        assert_eq!(settings.currency_symbol, "€");

        settings.currency_symbol = "EURO".into();
        settings.set_currency("USD");
        assert_eq!(settings.currency_symbol, "EURO");
    }

    #[test]
    fn apply_rejects_unknown_keys_and_bad_flags() {
        let mut settings = Settings::default();
        settings.apply("limit_on", "on").unwrap();
        settings.apply("limit", "99").unwrap();
        assert_eq!(settings.monthly_limit(), Some(99.0));
        assert!(settings.apply("theme", "dark").is_err());
        assert!(settings.apply("limit_on", "maybe").is_err());
    }

    #[test]
    fn font_scale_is_clamped() {
        let mut prefs = AccessibilityPrefs::default();
        for _ in 0..20 {
            prefs.increase_font();
        }
        assert_eq!(prefs.font_scale, FONT_SCALE_MAX);
        for _ in 0..30 {
            prefs.decrease_font();
        }
        assert_eq!(prefs.font_scale, FONT_SCALE_MIN);
        prefs.reset_font();
        prefs.increase_font();
        assert_eq!(prefs.font_scale, 1.1);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"limit_on": true}"#).unwrap();
        assert!(settings.limit_on);
        assert_eq!(settings.currency_code, "PLN");
        assert_eq!(settings.accessibility.font_scale, 1.0);
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        assert_eq!(manager.load().unwrap(), Settings::default());

        let mut settings = Settings::default();
        settings.accessibility.toggle_contrast();
        settings.apply("currency", "GBP").unwrap();
        manager.save(&settings).unwrap();

        assert_eq!(manager.load().unwrap(), settings);
        assert!(!tmp_path(manager.path()).exists());
    }
}
