use std::str::FromStr;

use anyhow::{Context, Result};

use crate::matching::settings::EngineSettings;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Server-wide engine defaults. Requests may override them per call.
    pub settings: EngineSettings,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = EngineSettings::default();
        let mut settings = EngineSettings {
            auto_shortlist_threshold: env_or(
                "AUTO_SHORTLIST_THRESHOLD",
                defaults.auto_shortlist_threshold,
            )?,
            confidence_threshold: env_or("CONFIDENCE_THRESHOLD", defaults.confidence_threshold)?,
            bias_reduction_enabled: env_or("BIAS_REDUCTION", defaults.bias_reduction_enabled)?,
            duplicate_detection_enabled: env_or(
                "DUPLICATE_DETECTION",
                defaults.duplicate_detection_enabled,
            )?,
            fuzzy_skill_threshold: env_or("SKILL_FUZZY_THRESHOLD", defaults.fuzzy_skill_threshold)?,
            ..defaults
        };
        settings.experience.floor = env_or("EXPERIENCE_FLOOR", settings.experience.floor)?;
        settings
            .validate()
            .context("engine settings from the environment are out of range")?;

        Ok(Config {
            port: env_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            settings,
        })
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
