//! Backend configuration and sign-in mode.
//!
//! # Responsibility
//! - Carry the project identifier/key bundle required to reach the
//!   hosted backend.
//! - Load it from an environment-supplied JSON blob.
//!
//! # Invariants
//! - Missing or unparseable configuration is fatal to initialization and
//!   reported as a structured error, not a panic.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Environment variable holding the JSON configuration blob.
pub const CONFIG_ENV_VAR: &str = "NIGHTLEDGER_CONFIG";

const SHARED_DOCUMENT_SEGMENT: &str = "public/data/nightingale_ledger/ledger_data";

/// Well-known path of the shared ledger document for one deployment.
pub fn ledger_document_path(app_id: &str) -> String {
    format!("artifacts/{app_id}/{SHARED_DOCUMENT_SEGMENT}")
}

/// How a client signs in against the hosted identity service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    /// Anonymous sign-in.
    #[default]
    Anonymous,
    /// Sign-in via an externally supplied one-time token.
    CustomToken(String),
}

/// Project identifier/key bundle for the hosted backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    pub app_id: String,
    pub project_id: String,
    pub api_key: String,
    #[serde(default)]
    pub auth: AuthMode,
}

/// Configuration load failures.
#[derive(Debug)]
pub enum ConfigError {
    /// The environment variable is absent or not UTF-8.
    MissingEnv(&'static str),
    /// The JSON blob did not parse into a configuration.
    Invalid(serde_json::Error),
    /// A required field was present but empty.
    EmptyField(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingEnv(name) => write!(f, "configuration env var `{name}` is not set"),
            Self::Invalid(err) => write!(f, "invalid configuration JSON: {err}"),
            Self::EmptyField(field) => write!(f, "configuration field `{field}` is empty"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Invalid(value)
    }
}

impl BackendConfig {
    /// Parses and validates a JSON configuration blob.
    pub fn from_json(blob: &str) -> Result<Self, ConfigError> {
        let config: BackendConfig = serde_json::from_str(blob)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads the configuration from `NIGHTLEDGER_CONFIG`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let blob =
            std::env::var(CONFIG_ENV_VAR).map_err(|_| ConfigError::MissingEnv(CONFIG_ENV_VAR))?;
        Self::from_json(&blob)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.app_id.trim().is_empty() {
            return Err(ConfigError::EmptyField("app_id"));
        }
        if self.project_id.trim().is_empty() {
            return Err(ConfigError::EmptyField("project_id"));
        }
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::EmptyField("api_key"));
        }
        Ok(())
    }

    /// Document path for this deployment's shared ledger.
    pub fn document_path(&self) -> String {
        ledger_document_path(&self.app_id)
    }
}

#[cfg(test)]
mod tests {
    use super::{ledger_document_path, AuthMode, BackendConfig, ConfigError};

    #[test]
    fn document_path_embeds_app_id() {
        assert_eq!(
            ledger_document_path("demo"),
            "artifacts/demo/public/data/nightingale_ledger/ledger_data"
        );
    }

    #[test]
    fn from_json_defaults_to_anonymous_auth() {
        let config = BackendConfig::from_json(
            r#"{"app_id":"demo","project_id":"p1","api_key":"k1"}"#,
        )
        .unwrap();
        assert_eq!(config.auth, AuthMode::Anonymous);
    }

    #[test]
    fn from_json_accepts_custom_token() {
        let config = BackendConfig::from_json(
            r#"{"app_id":"demo","project_id":"p1","api_key":"k1","auth":{"custom_token":"t0k"}}"#,
        )
        .unwrap();
        assert_eq!(config.auth, AuthMode::CustomToken("t0k".to_string()));
    }

    #[test]
    fn empty_required_field_is_rejected() {
        let err = BackendConfig::from_json(
            r#"{"app_id":"  ","project_id":"p1","api_key":"k1"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::EmptyField("app_id")));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            BackendConfig::from_json("not json").unwrap_err(),
            ConfigError::Invalid(_)
        ));
    }
}
