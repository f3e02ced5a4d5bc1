//! Settings resolved from the environment and command-line flags.
//!
//! Nothing is persisted. The API key is looked up again on every request so
//! a key exported mid-session takes effect on the next question.

use thiserror::Error;

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";

/// Gemini REST endpoint prefix; the model name and method are appended.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Low temperature keeps answers close to the cited law.
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Environment variables checked for the API key, in order.
pub const API_KEY_VARS: &[&str] = &["API_KEY", "GEMINI_API_KEY"];

const MODEL_VAR: &str = "TAX_ADVISOR_MODEL";
const BASE_URL_VAR: &str = "TAX_ADVISOR_BASE_URL";
const TEMPERATURE_VAR: &str = "TAX_ADVISOR_TEMPERATURE";

#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("Invalid temperature '{0}': expected a number between 0.0 and 2.0")]
    InvalidTemperature(String),
    #[error("Model name must not be empty")]
    EmptyModel,
}

/// Request settings for the tax expert service.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub model: String,
    pub temperature: f32,
    pub base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(model) = non_empty(lookup(MODEL_VAR)) {
            settings.model = model;
        }
        if let Some(base_url) = non_empty(lookup(BASE_URL_VAR)) {
            settings.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(raw) = non_empty(lookup(TEMPERATURE_VAR)) {
            settings.temperature = parse_temperature(&raw)?;
        }

        Ok(settings)
    }

    /// Override the model.
    pub fn with_model(mut self, model: &str) -> Result<Self, SettingsError> {
        let model = model.trim();
        if model.is_empty() {
            return Err(SettingsError::EmptyModel);
        }
        self.model = model.to_string();
        Ok(self)
    }

    /// Override the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Result<Self, SettingsError> {
        if !(0.0..=2.0).contains(&temperature) {
            return Err(SettingsError::InvalidTemperature(temperature.to_string()));
        }
        self.temperature = temperature;
        Ok(self)
    }
}

/// Read the API key from the environment.
pub fn api_key_from_env() -> Option<String> {
    API_KEY_VARS
        .iter()
        .find_map(|key| non_empty(std::env::var(key).ok()))
}

fn parse_temperature(raw: &str) -> Result<f32, SettingsError> {
    match raw.parse::<f32>() {
        Ok(t) if (0.0..=2.0).contains(&t) => Ok(t),
        _ => Err(SettingsError::InvalidTemperature(raw.to_string())),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.model, "gemini-3-pro-preview");
        assert_eq!(settings.temperature, 0.2);
    }

    #[test]
    fn test_overrides_from_lookup() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("TAX_ADVISOR_MODEL", "gemini-2.5-flash"),
            ("TAX_ADVISOR_BASE_URL", "http://localhost:8080/models/"),
            ("TAX_ADVISOR_TEMPERATURE", "0.7"),
        ]))
        .unwrap();

        assert_eq!(settings.model, "gemini-2.5-flash");
        assert_eq!(settings.base_url, "http://localhost:8080/models");
        assert_eq!(settings.temperature, 0.7);
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let settings =
            Settings::from_lookup(lookup_from(&[("TAX_ADVISOR_MODEL", "   ")])).unwrap();
        assert_eq!(settings.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_invalid_temperature() {
        let err = Settings::from_lookup(lookup_from(&[("TAX_ADVISOR_TEMPERATURE", "hot")]))
            .unwrap_err();
        assert_eq!(err, SettingsError::InvalidTemperature("hot".to_string()));

        let err = Settings::default().with_temperature(3.5).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidTemperature(_)));
    }

    #[test]
    fn test_with_model() {
        let settings = Settings::default().with_model(" gemini-2.5-pro ").unwrap();
        assert_eq!(settings.model, "gemini-2.5-pro");
        assert_eq!(
            Settings::default().with_model("").unwrap_err(),
            SettingsError::EmptyModel
        );
    }
}
