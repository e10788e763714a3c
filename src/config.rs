use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use crate::models::{MatchingRules, Priority, ScoringPolicy, DEFAULT_PRIORITY};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default)]
    pub policy: ScoringPolicy,
    #[serde(default = "default_priority")]
    pub default_priority: Priority,
    #[serde(default = "default_fast_track_threshold")]
    pub fast_track_threshold: u8,
    #[serde(default = "default_high_match_threshold")]
    pub high_match_threshold: u8,
    #[serde(default = "default_min_recommended_keywords")]
    pub min_recommended_keywords: usize,
    #[serde(default = "default_limit")]
    pub default_limit: Option<u16>,
    #[serde(default = "default_max_limit")]
    pub max_limit: u16,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            policy: ScoringPolicy::default(),
            default_priority: default_priority(),
            fast_track_threshold: default_fast_track_threshold(),
            high_match_threshold: default_high_match_threshold(),
            min_recommended_keywords: default_min_recommended_keywords(),
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

impl MatchingSettings {
    /// Scoring rules for the matcher, with thresholds kept inside 0..=100
    pub fn rules(&self) -> MatchingRules {
        MatchingRules {
            policy: self.policy,
            default_priority: self.default_priority,
            fast_track_threshold: self.fast_track_threshold.min(100),
            high_match_threshold: self.high_match_threshold.min(100),
            min_recommended_keywords: self.min_recommended_keywords,
        }
    }

    /// Requested limit, falling back to the default and capped at `max_limit`
    pub fn effective_limit(&self, requested: Option<u16>) -> Option<usize> {
        requested
            .or(self.default_limit)
            .map(|limit| limit.min(self.max_limit) as usize)
    }
}

fn default_priority() -> Priority { DEFAULT_PRIORITY }
fn default_fast_track_threshold() -> u8 { 80 }
fn default_high_match_threshold() -> u8 { 80 }
fn default_min_recommended_keywords() -> usize { 3 }
fn default_limit() -> Option<u16> { None }
fn default_max_limit() -> u16 { 500 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreSettings {
    /// JSON file with keywords and parties loaded at startup
    pub seed_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with KEYMATCH_)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., KEYMATCH__MATCHING__POLICY -> matching.policy
            .add_source(
                Environment::with_prefix("KEYMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("KEYMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn test_default_matching_rules() {
        let rules = MatchingSettings::default().rules();
        assert_eq!(rules, MatchingRules::default());
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_parse_matching_section() {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(
                r#"
                [matching]
                policy = "flat"
                default_priority = "required"
                fast_track_threshold = 120
                "#,
                FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        let rules = settings.matching.rules();
        assert_eq!(rules.policy, ScoringPolicy::Flat);
        assert_eq!(rules.default_priority, Priority::Required);
        assert_eq!(rules.fast_track_threshold, 100);
        assert_eq!(settings.server.port, 8080);
    }

    #[test]
    fn test_effective_limit() {
        let settings = MatchingSettings {
            default_limit: Some(20),
            max_limit: 50,
            ..Default::default()
        };

        assert_eq!(settings.effective_limit(None), Some(20));
        assert_eq!(settings.effective_limit(Some(10)), Some(10));
        assert_eq!(settings.effective_limit(Some(300)), Some(50));
        assert_eq!(MatchingSettings::default().effective_limit(None), None);
    }
}
