//! Application environment flag

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Environment variable consulted by [`AppEnvironment::from_env`]
pub const DEFAULT_ENV_VAR: &str = "VIEWKIT_ENV";

/// Error type for unrecognized environment names
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown environment '{0}' (expected development, testing or production)")]
pub struct EnvironmentParseError(pub String);

/// The environment the host application runs in
///
/// Production degrades failures to log entries; every other environment
/// surfaces them to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    #[default]
    Development,
    Testing,
    Production,
}

impl AppEnvironment {
    /// Whether failures should be swallowed after logging
    pub fn is_production(self) -> bool {
        matches!(self, AppEnvironment::Production)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Testing => "testing",
            AppEnvironment::Production => "production",
        }
    }

    /// Read the environment from the [`DEFAULT_ENV_VAR`] variable
    ///
    /// An unset variable means development.
    pub fn from_env() -> Result<Self, EnvironmentParseError> {
        Self::from_env_var(DEFAULT_ENV_VAR)
    }

    /// Read the environment from the named variable
    pub fn from_env_var(var: &str) -> Result<Self, EnvironmentParseError> {
        match std::env::var(var) {
            Ok(value) => value.parse(),
            Err(_) => Ok(AppEnvironment::default()),
        }
    }
}

impl FromStr for AppEnvironment {
    type Err = EnvironmentParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(AppEnvironment::Development),
            "testing" | "test" => Ok(AppEnvironment::Testing),
            "production" | "prod" => Ok(AppEnvironment::Production),
            _ => Err(EnvironmentParseError(s.to_string())),
        }
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!(
            "production".parse::<AppEnvironment>().unwrap(),
            AppEnvironment::Production
        );
        assert_eq!(
            "Testing".parse::<AppEnvironment>().unwrap(),
            AppEnvironment::Testing
        );
        assert_eq!(
            " dev ".parse::<AppEnvironment>().unwrap(),
            AppEnvironment::Development
        );
    }

    #[test]
    fn test_parse_unknown() {
        let err = "staging".parse::<AppEnvironment>().unwrap_err();
        assert_eq!(err, EnvironmentParseError("staging".to_string()));
        assert!(err.to_string().contains("staging"));
    }

    #[test]
    fn test_only_production_is_production() {
        assert!(AppEnvironment::Production.is_production());
        assert!(!AppEnvironment::Development.is_production());
        assert!(!AppEnvironment::Testing.is_production());
    }

    #[test]
    fn test_unset_var_defaults_to_development() {
        let env = AppEnvironment::from_env_var("VIEWKIT_TEST_SURELY_UNSET_VAR").unwrap();
        assert_eq!(env, AppEnvironment::Development);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&AppEnvironment::Production).unwrap();
        assert_eq!(json, "\"production\"");
        let back: AppEnvironment = serde_json::from_str("\"testing\"").unwrap();
        assert_eq!(back, AppEnvironment::Testing);
    }
}
