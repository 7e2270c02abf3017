// Parser configuration: the feature list and decoding step budget.
//
// A single immutable value handed to each component's constructor. There is
// no process-wide configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::token::{ATTR_FORM, ATTR_UPOS};

/// Error type for configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("feature list is empty")]
    NoFeatures,
    #[error("feature attribute name is empty")]
    EmptyFeatureName,
    #[error("feature attribute {0:?} listed more than once")]
    DuplicateFeature(String),
    #[error("step_factor must be at least 1")]
    ZeroStepFactor,
}

/// Configuration shared by the oracle, feature extraction and decoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserConfig {
    /// Token attributes fed to the model, in window order.
    pub features: Vec<String>,

    /// Score vectors the model is asked to produce per token. The decoder
    /// never runs more steps than it is given scores for.
    pub step_factor: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            features: vec![ATTR_FORM.to_string(), ATTR_UPOS.to_string()],
            step_factor: 2,
        }
    }
}

impl ParserConfig {
    /// Parse and validate a JSON configuration. Missing fields take their
    /// default values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: ParserConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.features.is_empty() {
            return Err(ConfigError::NoFeatures);
        }
        for (i, name) in self.features.iter().enumerate() {
            if name.is_empty() {
                return Err(ConfigError::EmptyFeatureName);
            }
            if self.features[..i].contains(name) {
                return Err(ConfigError::DuplicateFeature(name.clone()));
            }
        }
        if self.step_factor == 0 {
            return Err(ConfigError::ZeroStepFactor);
        }
        Ok(())
    }

    /// Number of score steps to request for a sentence of `len` tokens.
    pub fn step_budget(&self, len: usize) -> usize {
        self.step_factor.saturating_mul(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = ParserConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.features, vec!["form", "upos"]);
        assert_eq!(config.step_budget(7), 14);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config = ParserConfig::from_json_str(r#"{"features": ["lemma"]}"#).unwrap();
        assert_eq!(config.features, vec!["lemma"]);
        assert_eq!(config.step_factor, 2);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = ParserConfig::from_json_str(r#"{"beam_width": 4}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn validation_errors() {
        assert!(matches!(
            ParserConfig::from_json_str(r#"{"features": []}"#),
            Err(ConfigError::NoFeatures)
        ));
        assert!(matches!(
            ParserConfig::from_json_str(r#"{"features": ["form", ""]}"#),
            Err(ConfigError::EmptyFeatureName)
        ));
        assert!(matches!(
            ParserConfig::from_json_str(r#"{"features": ["form", "form"]}"#),
            Err(ConfigError::DuplicateFeature(name)) if name == "form"
        ));
        assert!(matches!(
            ParserConfig::from_json_str(r#"{"step_factor": 0}"#),
            Err(ConfigError::ZeroStepFactor)
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = ParserConfig::load(Path::new("/nonexistent/arcstd.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
