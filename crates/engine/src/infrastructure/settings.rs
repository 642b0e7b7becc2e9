//! Environment-driven engine settings.
//!
//! Values come from the process environment after `.env.local` and `.env`
//! have been loaded. Anything missing or unparseable falls back to its
//! default.

use std::path::PathBuf;
use std::str::FromStr;

use charsheet_domain::HpMethod;

use super::retry::RetryConfig;

pub const DATA_DIR_VAR: &str = "CHARSHEET_DATA_DIR";
pub const FLUSH_MAX_RETRIES_VAR: &str = "CHARSHEET_FLUSH_MAX_RETRIES";
pub const FLUSH_BASE_DELAY_MS_VAR: &str = "CHARSHEET_FLUSH_BASE_DELAY_MS";
pub const FLUSH_MAX_DELAY_MS_VAR: &str = "CHARSHEET_FLUSH_MAX_DELAY_MS";
pub const HP_METHOD_VAR: &str = "CHARSHEET_HP_METHOD";

#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    /// Root directory of the JSON file store.
    pub data_dir: PathBuf,
    /// Retry policy for persisting records.
    pub flush_retry: RetryConfig,
    /// HP method used when the command-line driver levels a character.
    pub default_hp_method: HpMethod,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            flush_retry: RetryConfig::flush_default(),
            default_hp_method: HpMethod::Fixed,
        }
    }
}

impl EngineSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let data_dir = lookup(DATA_DIR_VAR)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let flush_retry = RetryConfig {
            max_retries: parse_or(&lookup, FLUSH_MAX_RETRIES_VAR, defaults.flush_retry.max_retries),
            base_delay_ms: parse_or(&lookup, FLUSH_BASE_DELAY_MS_VAR, defaults.flush_retry.base_delay_ms),
            max_delay_ms: parse_or(&lookup, FLUSH_MAX_DELAY_MS_VAR, defaults.flush_retry.max_delay_ms),
            ..defaults.flush_retry
        };

        let default_hp_method = match lookup(HP_METHOD_VAR).map(|s| s.trim().to_ascii_lowercase()) {
            None => defaults.default_hp_method,
            Some(value) if value == "fixed" => HpMethod::Fixed,
            Some(value) if value == "roll" => HpMethod::Roll,
            Some(value) => {
                tracing::warn!(var = HP_METHOD_VAR, value = %value, "Unknown HP method, using fixed");
                defaults.default_hp_method
            }
        };

        Self {
            data_dir,
            flush_retry,
            default_hp_method,
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    let Some(raw) = lookup(name) else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(var = name, value = %raw, default = %default, "Invalid setting, using default");
            default
        }
    }
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
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let settings = EngineSettings::from_lookup(|_| None);
        assert_eq!(settings, EngineSettings::default());
        assert_eq!(settings.flush_retry.max_retries, 3);
        assert_eq!(settings.flush_retry.base_delay_ms, 50);
        assert_eq!(settings.flush_retry.max_delay_ms, 2000);
    }

    #[test]
    fn reads_every_variable() {
        let settings = EngineSettings::from_lookup(lookup_from(&[
            (DATA_DIR_VAR, "/tmp/sheets"),
            (FLUSH_MAX_RETRIES_VAR, "5"),
            (FLUSH_BASE_DELAY_MS_VAR, "10"),
            (FLUSH_MAX_DELAY_MS_VAR, "100"),
            (HP_METHOD_VAR, "Roll"),
        ]));
        assert_eq!(settings.data_dir, PathBuf::from("/tmp/sheets"));
        assert_eq!(settings.flush_retry.max_retries, 5);
        assert_eq!(settings.flush_retry.base_delay_ms, 10);
        assert_eq!(settings.flush_retry.max_delay_ms, 100);
        assert_eq!(settings.default_hp_method, HpMethod::Roll);
    }

    #[test]
    fn bad_values_fall_back() {
        let settings = EngineSettings::from_lookup(lookup_from(&[
            (DATA_DIR_VAR, "   "),
            (FLUSH_MAX_RETRIES_VAR, "many"),
            (HP_METHOD_VAR, "average"),
        ]));
        assert_eq!(settings, EngineSettings::default());
    }
}
