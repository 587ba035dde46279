//! Per-type model configuration.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Configuration shared by every instance of a model type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Attribute that mirrors into [`Model::id`](crate::Model::id).
    pub id_attribute: String,
    /// Separator used by nested attribute paths.
    pub path_separator: char,
    /// Buffer capacity of event streams created with [`Model::subscribe`](crate::Model::subscribe).
    pub stream_capacity: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            id_attribute: "id".to_string(),
            path_separator: '.',
            stream_capacity: 1024,
        }
    }
}

impl ModelConfig {
    /// Parse a configuration from JSON text. Missing fields take their defaults.
    pub fn from_json_str(text: &str) -> Result<Self, ValidationError> {
        let cfg: Self = serde_json::from_str(text).map_err(|e| ValidationError::InvalidConfig {
            reason: e.to_string(),
        })?;
        if cfg.id_attribute.trim().is_empty() {
            return Err(ValidationError::InvalidConfig {
                reason: "id_attribute cannot be empty".to_string(),
            });
        }
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = ModelConfig::default();
        assert_eq!(cfg.id_attribute, "id");
        assert_eq!(cfg.path_separator, '.');
        assert_eq!(cfg.stream_capacity, 1024);
    }

    #[test]
    fn test_from_json_partial() {
        let cfg = ModelConfig::from_json_str(r#"{"id_attribute": "_id"}"#).unwrap();
        assert_eq!(cfg.id_attribute, "_id");
        assert_eq!(cfg.path_separator, '.');
    }

    #[test]
    fn test_from_json_separator() {
        let cfg = ModelConfig::from_json_str(r#"{"path_separator": "/"}"#).unwrap();
        assert_eq!(cfg.path_separator, '/');
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = ModelConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidConfig { .. }));
    }

    #[test]
    fn test_from_json_rejects_empty_id_attribute() {
        let err = ModelConfig::from_json_str(r#"{"id_attribute": "  "}"#).unwrap_err();
        assert!(format!("{err}").contains("id_attribute"));
    }
}
