use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{FormError, Result};

/// Global form-analyzer configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Matching heuristics
    #[serde(default)]
    pub thresholds: Thresholds,

    /// Spreadsheet output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Heuristic constants of the matching cascade and the selectors
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Thresholds {
    /// Similarity ratio a label must exceed to count as a similar match
    pub similarity_threshold: f32,
    /// Fields recognized with lower confidence are flagged uncertain
    pub min_confidence: f64,
    /// Text values longer than this are flagged uncertain
    pub max_certain_text_len: usize,
    /// Labels longer than this are also matched by key containment
    pub part_match_min_label_len: usize,
    /// A single-select with exactly this many undetected options picks the undetected one
    pub single_select_missing_options: usize,
    /// A multi-select with more undetected options than this is flagged uncertain
    pub multi_select_missing_options: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.9,
            min_confidence: 40.0,
            max_certain_text_len: 8,
            part_match_min_label_len: 15,
            single_select_missing_options: 1,
            multi_select_missing_options: 2,
        }
    }
}

impl Thresholds {
    pub fn is_low_confidence(&self, confidence: f64) -> bool {
        confidence < self.min_confidence
    }

    /// Uncertainty of an extracted text value.
    ///
    /// Empty text is never uncertain, overly long text always is.
    pub fn text_uncertainty(&self, text: &str, confidence: f64) -> bool {
        let len = text.chars().count();
        if len == 0 {
            false
        } else if len > self.max_certain_text_len {
            true
        } else {
            self.is_low_confidence(confidence)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Workbook file name, created inside the analyzed folder
    pub file_name: String,
    /// Worksheet name
    pub sheet_name: String,
    /// Shown in uncertain cells that have no value
    pub uncertain_marker: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_name: "result.xlsx".to_string(),
            sheet_name: "Results".to_string(),
            uncertain_marker: "???".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from an explicit file, or the default location
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => {
                if !p.exists() {
                    return Err(FormError::ConfigError(format!(
                        "Config file {} does not exist",
                        p.display()
                    )));
                }
                p.to_path_buf()
            }
            None => Self::config_path()?,
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            config.validate()?;
            tracing::debug!("Loaded configuration from {}", config_path.display());
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<()> {
        let t = &self.thresholds;
        if !(0.0..=1.0).contains(&t.similarity_threshold) {
            return Err(FormError::ConfigError(format!(
                "similarity_threshold must be within [0, 1], got {}",
                t.similarity_threshold
            )));
        }
        if !(0.0..=100.0).contains(&t.min_confidence) {
            return Err(FormError::ConfigError(format!(
                "min_confidence must be within [0, 100], got {}",
                t.min_confidence
            )));
        }
        if self.output.sheet_name.is_empty() || self.output.file_name.is_empty() {
            return Err(FormError::ConfigError(
                "output file_name and sheet_name must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Get the config file path
    ///
    /// Supports FORM_ANALYZER_CONFIG environment variable as an override
    pub fn config_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var("FORM_ANALYZER_CONFIG") {
            return Ok(PathBuf::from(path));
        }
        let dirs = ProjectDirs::from("", "", "form-analyzer")
            .ok_or_else(|| FormError::ConfigError("Could not determine config directory".into()))?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.thresholds.similarity_threshold, 0.9);
        assert_eq!(config.thresholds.min_confidence, 40.0);
        assert_eq!(config.output.file_name, "result.xlsx");
        assert_eq!(config.output.uncertain_marker, "???");
    }

    #[test]
    fn test_partial_override() {
        let config: Config = toml::from_str(
            r#"
            [thresholds]
            min_confidence = 60.0

            [output]
            sheet_name = "Answers"
            "#,
        )
        .unwrap();
        assert_eq!(config.thresholds.min_confidence, 60.0);
        assert_eq!(config.thresholds.max_certain_text_len, 8);
        assert_eq!(config.output.sheet_name, "Answers");
        assert_eq!(config.output.file_name, "result.xlsx");
    }

    #[test]
    fn test_text_uncertainty() {
        let t = Thresholds::default();
        assert!(!t.text_uncertainty("", 10.0));
        assert!(t.text_uncertainty("123456789", 99.0));
        assert!(t.text_uncertainty("abc", 39.9));
        assert!(!t.text_uncertainty("abc", 40.0));
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let mut config = Config::default();
        config.thresholds.similarity_threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_explicit_file() {
        let result = Config::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(matches!(result, Err(FormError::ConfigError(_))));
    }
}
