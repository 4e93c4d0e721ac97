//! Grading configuration
//!
//! Configuration lives in a TOML file (by convention `statgrade.toml`).
//! Every field has a default, so a missing file or an empty table is valid.

pub mod types;

use std::fs;
use std::path::Path;

use crate::error::{GradeError, Result};

pub use types::{
    ExtractionConfig, GradeConfig, RubricConfig, ThresholdConfig, SHOOTING_PCT_TOLERANCE,
    TEAM_TOTAL_TOLERANCE,
};

/// Default configuration file name looked up in the working directory
pub const CONFIG_FILE: &str = "statgrade.toml";

impl GradeConfig {
    /// Look up a named tolerance
    pub fn tolerance(&self, key: &str) -> Result<f64> {
        self.tolerances
            .get(key)
            .copied()
            .ok_or_else(|| GradeError::MissingTolerance {
                key: key.to_string(),
            })
    }

    /// Parse configuration from TOML text and check its values
    pub fn parse(content: &str) -> Result<Self> {
        let config: GradeConfig = toml::from_str(content)?;
        config.check()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| GradeError::io_operation("read config", path.display(), e))?;
        Self::parse(&content)
    }

    /// Load `path` if given, otherwise `statgrade.toml` in `dir` if it exists,
    /// otherwise defaults
    pub fn load_or_default(path: Option<&Path>, dir: &Path) -> Result<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(GradeError::FileNotFound {
                        path: path.to_path_buf(),
                    });
                }
                Self::load(path)
            }
            None => {
                let candidate = dir.join(CONFIG_FILE);
                if candidate.exists() {
                    tracing::debug!(path = %candidate.display(), "loading config");
                    Self::load(&candidate)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| GradeError::Other(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    fn check(&self) -> Result<()> {
        for (key, value) in &self.tolerances {
            if !value.is_finite() || *value < 0.0 {
                crate::bail_invalid!(&format!("tolerance '{}'", key), value);
            }
        }
        if !(1..=5).contains(&self.rubric.pass_threshold) {
            crate::bail_invalid!("rubric pass_threshold", self.rubric.pass_threshold);
        }
        if self.thresholds.top_shooters == 0 {
            crate::bail_invalid!("thresholds top_shooters", 0);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = GradeConfig::default();
        assert_eq!(config.tolerance(SHOOTING_PCT_TOLERANCE).unwrap(), 0.5);
        assert_eq!(config.tolerance(TEAM_TOTAL_TOLERANCE).unwrap(), 0.5);
        assert_eq!(config.rubric.pass_threshold, 3);
        assert_eq!(config.extraction.window_words, 6);
        assert_eq!(config.thresholds.qualified_min_shots, 10);
        assert_eq!(config.thresholds.top_shooters, 3);
    }

    #[test]
    fn test_empty_file_is_default() {
        let config = GradeConfig::parse("").unwrap();
        assert_eq!(config, GradeConfig::default());
    }

    #[test]
    fn test_missing_tolerance_key() {
        let config = GradeConfig::parse("[tolerances]\nteam_total = 1.0\n").unwrap();
        assert_eq!(config.tolerance(TEAM_TOTAL_TOLERANCE).unwrap(), 1.0);
        let err = config.tolerance(SHOOTING_PCT_TOLERANCE).unwrap_err();
        assert!(matches!(err, GradeError::MissingTolerance { ref key } if key == "shooting_pct"));
    }

    #[test]
    fn test_rejects_negative_tolerance() {
        let err = GradeConfig::parse("[tolerances]\nshooting_pct = -1.0\n").unwrap_err();
        assert!(matches!(err, GradeError::InvalidValue { .. }));
    }

    #[test]
    fn test_rejects_out_of_range_threshold() {
        let err = GradeConfig::parse("[rubric]\npass_threshold = 6\n").unwrap_err();
        assert!(err.to_string().contains("pass_threshold"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        let mut config = GradeConfig::default();
        config.rubric.pass_threshold = 4;
        config.tolerances.insert("custom".to_string(), 2.0);
        config.save(&path).unwrap();

        let loaded = GradeConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_or_default_discovers_file() {
        let dir = tempdir().unwrap();
        assert_eq!(
            GradeConfig::load_or_default(None, dir.path()).unwrap(),
            GradeConfig::default()
        );

        fs::write(dir.path().join(CONFIG_FILE), "[extraction]\nwindow_words = 3\n").unwrap();
        let config = GradeConfig::load_or_default(None, dir.path()).unwrap();
        assert_eq!(config.extraction.window_words, 3);
    }

    #[test]
    fn test_load_or_default_explicit_missing_path() {
        let dir = tempdir().unwrap();
        let err = GradeConfig::load_or_default(Some(&dir.path().join("nope.toml")), dir.path())
            .unwrap_err();
        assert!(matches!(err, GradeError::FileNotFound { .. }));
    }
}
