//! Settings for the default tracing-backed gate

use serde::{Deserialize, Serialize};

/// Severity timing records are emitted at.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    #[default]
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// When false the gate reports disabled no matter what the subscriber wants.
    pub enabled: bool,
    pub level: LogLevel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            level: LogLevel::Debug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn parses_lowercase_levels() {
        let settings: Settings =
            serde_json::from_str(r#"{ "enabled": false, "level": "info" }"#).unwrap();
        assert!(!settings.enabled);
        assert_eq!(settings.level, LogLevel::Info);
    }

    #[test]
    fn serializes_back_to_the_same_shape() {
        let settings = Settings {
            enabled: false,
            level: LogLevel::Warn,
        };
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json, serde_json::json!({ "enabled": false, "level": "warn" }));
        assert_eq!(serde_json::from_value::<Settings>(json).unwrap(), settings);
    }

    #[test]
    fn rejects_unknown_level() {
        assert!(serde_json::from_str::<Settings>(r#"{ "level": "loud" }"#).is_err());
    }
}
