//! Configuration Entry Model

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Declared type of a configuration entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum ConfigKind {
    Bool,
    Text,
    Int,
    Float,
}

impl ConfigKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKind::Bool => "bool",
            ConfigKind::Text => "text",
            ConfigKind::Int => "int",
            ConfigKind::Float => "float",
        }
    }
}

/// Typed configuration value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ConfigValue {
    Bool(bool),
    Text(String),
    Int(i64),
    Float(f64),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("value '{raw}' is not a valid {kind}")]
pub struct ConfigValueError {
    pub kind: &'static str,
    pub raw: String,
}

impl ConfigValue {
    pub fn kind(&self) -> ConfigKind {
        match self {
            ConfigValue::Bool(_) => ConfigKind::Bool,
            ConfigValue::Text(_) => ConfigKind::Text,
            ConfigValue::Int(_) => ConfigKind::Int,
            ConfigValue::Float(_) => ConfigKind::Float,
        }
    }

    /// Parse a stored string according to its declared kind.
    pub fn parse(kind: ConfigKind, raw: &str) -> Result<Self, ConfigValueError> {
        let err = || ConfigValueError {
            kind: kind.as_str(),
            raw: raw.to_string(),
        };
        match kind {
            ConfigKind::Bool => Ok(ConfigValue::Bool(crate::util::parse_flag(raw))),
            ConfigKind::Text => Ok(ConfigValue::Text(raw.to_string())),
            ConfigKind::Int => raw.trim().parse().map(ConfigValue::Int).map_err(|_| err()),
            ConfigKind::Float => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(ConfigValue::Float)
                .ok_or_else(err),
        }
    }

    /// Storage representation
    pub fn to_raw(&self) -> String {
        match self {
            ConfigValue::Bool(v) => v.to_string(),
            ConfigValue::Text(v) => v.clone(),
            ConfigValue::Int(v) => v.to_string(),
            ConfigValue::Float(v) => v.to_string(),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ConfigValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_raw())
    }
}

/// Raw configuration row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ConfigEntry {
    pub config_key: String,
    pub config_value: String,
    pub kind: ConfigKind,
    pub description: Option<String>,
    pub updated_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_by_kind() {
        assert_eq!(
            ConfigValue::parse(ConfigKind::Bool, "si").unwrap(),
            ConfigValue::Bool(true)
        );
        assert_eq!(
            ConfigValue::parse(ConfigKind::Int, " 42 ").unwrap(),
            ConfigValue::Int(42)
        );
        assert_eq!(
            ConfigValue::parse(ConfigKind::Float, "2.5").unwrap(),
            ConfigValue::Float(2.5)
        );
        assert_eq!(
            ConfigValue::parse(ConfigKind::Text, "Casa Pepe").unwrap(),
            ConfigValue::Text("Casa Pepe".into())
        );
    }

    #[test]
    fn test_parse_rejects_bad_numbers() {
        let err = ConfigValue::parse(ConfigKind::Int, "abc").unwrap_err();
        assert_eq!(err.kind, "int");
        assert!(ConfigValue::parse(ConfigKind::Float, "NaN").is_err());
    }
}
