//! Configuration management.

mod settings;

pub use settings::{
    api_key_from_env, Settings, SettingsError, API_KEY_VARS, DEFAULT_BASE_URL, DEFAULT_MODEL,
    DEFAULT_TEMPERATURE,
};
