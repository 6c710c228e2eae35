//! Main application configuration
//!
//! This module defines the primary configuration structures for the quiz
//! engine, including environment variable and TOML file loading and validation.

use crate::config::rating::RatingSettings;
use crate::config::selection::SelectionSettings;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub rating: RatingSettings,
    pub selection: SelectionSettings,
}

/// Service-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging and metrics
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "adaptive-quiz".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides(|key| env::var(key).ok())?;

        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file; missing keys keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        validate_config(&config)?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in production)
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Service settings
        if let Some(name) = lookup("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Some(log_level) = lookup("LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        // Rating settings
        override_parsed(&lookup, "INITIAL_PLAYER_RATING", &mut self.rating.initial_player_rating)?;
        override_parsed(&lookup, "PLAYER_K_FACTOR", &mut self.rating.player_k_factor)?;
        override_parsed(&lookup, "QUESTION_K_FACTOR", &mut self.rating.question_k_factor)?;
        override_parsed(&lookup, "RATING_CAP", &mut self.rating.rating_cap)?;
        override_parsed(&lookup, "VIRTUAL_RATING_WINDOW", &mut self.rating.virtual_rating_window)?;
        override_parsed(&lookup, "QUESTION_RATING_BASE", &mut self.rating.question_rating_base)?;
        override_parsed(&lookup, "QUESTION_RATING_STEP", &mut self.rating.question_rating_step)?;
        override_parsed(&lookup, "MAX_DIFFICULTY", &mut self.rating.max_difficulty)?;

        // Selection settings
        override_parsed(&lookup, "REPEAT_WINDOW", &mut self.selection.repeat_window)?;
        override_parsed(&lookup, "REPORTABLE_AMOUNT", &mut self.selection.reportable_amount)?;

        Ok(())
    }
}

fn override_parsed<F, T>(lookup: &F, key: &str, target: &mut T) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    if let Some(raw) = lookup(key) {
        *target = raw
            .parse()
            .map_err(|_| anyhow!("Invalid {} value: {}", key, raw))?;
    }
    Ok(())
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.service.name.is_empty() {
        return Err(anyhow!("Service name cannot be empty"));
    }

    // Validate rating settings
    let rating = &config.rating;
    if !(rating.player_k_factor > 0.0 && rating.player_k_factor.is_finite()) {
        return Err(anyhow!("Player K factor must be positive"));
    }
    if !(rating.question_k_factor > 0.0 && rating.question_k_factor.is_finite()) {
        return Err(anyhow!("Question K factor must be positive"));
    }
    if !rating.initial_player_rating.is_finite() || !rating.rating_cap.is_finite() {
        return Err(anyhow!("Ratings must be finite numbers"));
    }
    if rating.virtual_rating_window == 0 {
        return Err(anyhow!("Virtual rating window must be greater than 0"));
    }
    if rating.max_difficulty == 0 {
        return Err(anyhow!("Max difficulty must be at least 1"));
    }

    // Validate selection settings
    if config.selection.repeat_window == 0 {
        return Err(anyhow!("Repeat window must be greater than 0"));
    }

    Ok(())
}
