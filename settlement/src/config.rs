//! Configuration for the settlement engine

use serde::{Deserialize, Serialize};
use splitify_ledger::{PaymentMethod, UnknownParticipantPolicy, ValidationConfig};

/// Settlement engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// Boundary validation
    pub validation: ValidationConfig,

    /// Plan output configuration
    pub plan: PlanConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "splitify-settlement".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            validation: ValidationConfig::default(),
            plan: PlanConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Plan output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    /// Payment method for settlements created from a plan
    pub default_payment_method: PaymentMethod,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,

    /// Emit JSON lines instead of human-readable text
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        Config::default().with_env_overrides()
    }

    /// Apply environment variable overrides on top of `self`
    pub fn with_env_overrides(self) -> crate::Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> crate::Result<Self> {
        if let Some(policy) = lookup("SPLITIFY_UNKNOWN_PARTICIPANTS") {
            self.validation.unknown_participants = policy
                .parse::<UnknownParticipantPolicy>()
                .map_err(|e| crate::Error::Config(e.to_string()))?;
        }

        if let Some(method) = lookup("SPLITIFY_PAYMENT_METHOD") {
            self.plan.default_payment_method = method
                .parse::<PaymentMethod>()
                .map_err(|e| crate::Error::Config(e.to_string()))?;
        }

        if let Some(level) = lookup("SPLITIFY_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Some(json) = lookup("SPLITIFY_LOG_JSON") {
            self.logging.json = matches!(
                json.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes"
            );
        }

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use std::sync::Mutex;

    // Serialises tests that touch the process environment
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn overrides(pairs: &[(&str, &str)]) -> crate::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::default().with_overrides(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service_name, "splitify-settlement");
        assert_eq!(
            config.validation.unknown_participants,
            UnknownParticipantPolicy::Reject
        );
        assert_eq!(config.plan.default_payment_method, PaymentMethod::Cash);
        assert!(!config.logging.json);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
service_name = "splitify-test"

[validation]
unknown_participants = "ignore"

[plan]
default_payment_method = "venmo"
"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();

        assert_eq!(config.service_name, "splitify-test");
        assert_eq!(
            config.validation.unknown_participants,
            UnknownParticipantPolicy::Ignore
        );
        assert!(config.validation.check_allocation_totals);
        assert_eq!(config.plan.default_payment_method, PaymentMethod::Venmo);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_from_file_rejects_garbage() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "validation = 42").unwrap();

        assert!(matches!(
            Config::from_file(file.path()),
            Err(crate::Error::Config(_))
        ));
    }

    #[test]
    fn test_overrides_each_variable() {
        let config = overrides(&[
            ("SPLITIFY_UNKNOWN_PARTICIPANTS", "ignore"),
            ("SPLITIFY_PAYMENT_METHOD", "bank_transfer"),
            ("SPLITIFY_LOG_LEVEL", "splitify_settlement=debug"),
            ("SPLITIFY_LOG_JSON", "TRUE"),
        ])
        .unwrap();

        assert_eq!(
            config.validation.unknown_participants,
            UnknownParticipantPolicy::Ignore
        );
        assert_eq!(config.plan.default_payment_method, PaymentMethod::BankTransfer);
        assert_eq!(config.logging.level, "splitify_settlement=debug");
        assert!(config.logging.json);
    }

    #[test]
    fn test_log_json_flag_values() {
        for truthy in ["1", "true", "yes", " Yes "] {
            let config = overrides(&[("SPLITIFY_LOG_JSON", truthy)]).unwrap();
            assert!(config.logging.json, "{:?} should enable JSON", truthy);
        }
        for falsy in ["0", "false", "no", ""] {
            let config = overrides(&[("SPLITIFY_LOG_JSON", falsy)]).unwrap();
            assert!(!config.logging.json, "{:?} should disable JSON", falsy);
        }
    }

    #[test]
    fn test_overrides_reject_bad_values() {
        assert!(matches!(
            overrides(&[("SPLITIFY_UNKNOWN_PARTICIPANTS", "sometimes")]),
            Err(crate::Error::Config(_))
        ));
        assert!(matches!(
            overrides(&[("SPLITIFY_PAYMENT_METHOD", "cheque")]),
            Err(crate::Error::Config(_))
        ));
    }

    #[test]
    fn test_unset_variables_keep_defaults() {
        let config = overrides(&[]).unwrap();
        assert_eq!(
            config.validation.unknown_participants,
            UnknownParticipantPolicy::Reject
        );
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_from_env() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        std::env::set_var("SPLITIFY_UNKNOWN_PARTICIPANTS", "ignore");
        std::env::set_var("SPLITIFY_PAYMENT_METHOD", "paypal");
        std::env::set_var("SPLITIFY_LOG_LEVEL", "warn");
        std::env::set_var("SPLITIFY_LOG_JSON", "1");
        let loaded = Config::from_env();

        std::env::set_var("SPLITIFY_PAYMENT_METHOD", "carrier-pigeon");
        let rejected = Config::default().with_env_overrides();

        for key in [
            "SPLITIFY_UNKNOWN_PARTICIPANTS",
            "SPLITIFY_PAYMENT_METHOD",
            "SPLITIFY_LOG_LEVEL",
            "SPLITIFY_LOG_JSON",
        ] {
            std::env::remove_var(key);
        }

        let config = loaded.unwrap();
        assert_eq!(
            config.validation.unknown_participants,
            UnknownParticipantPolicy::Ignore
        );
        assert_eq!(config.plan.default_payment_method, PaymentMethod::PayPal);
        assert_eq!(config.logging.level, "warn");
        assert!(config.logging.json);
        assert!(matches!(rejected, Err(crate::Error::Config(_))));
    }
}
