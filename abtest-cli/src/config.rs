//! CLI configuration management

use abtest_core::{CoreError, LeveneCenter, DEFAULT_ALPHA};
use anyhow::{Context as _, Result};
use config::{Config as ConfigLoader, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use validator::{Validate, ValidationError};

use crate::output::OutputFormat;

/// Outcome column analysed when none is configured
pub const DEFAULT_METRIC: &str = "Purchase";

/// Environment variable prefix (`ABTEST_ALPHA`, `ABTEST_METRIC`, ...)
pub const ENV_PREFIX: &str = "ABTEST";

/// Effective settings after layering defaults, files and environment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
#[validate(schema(function = "distinct_labels"))]
pub struct Settings {
    /// Significance level for assumption checks and the final test
    #[validate(range(exclusive_min = 0.0, exclusive_max = 1.0))]
    pub alpha: f64,

    /// Outcome column to compare
    #[validate(length(min = 1))]
    pub metric: String,

    /// Column holding the group label in a combined file
    #[validate(length(min = 1))]
    pub group_column: String,

    /// Group label of the control arm
    #[validate(length(min = 1))]
    pub control_label: String,

    /// Group label of the test arm
    #[validate(length(min = 1))]
    pub test_label: String,

    /// Centre for Levene's test
    pub levene_center: LeveneCenter,

    /// Default output format
    pub output_format: OutputFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            metric: DEFAULT_METRIC.to_string(),
            group_column: "group".to_string(),
            control_label: "control".to_string(),
            test_label: "test".to_string(),
            levene_center: LeveneCenter::Median,
            output_format: OutputFormat::Table,
        }
    }
}

fn distinct_labels(settings: &Settings) -> std::result::Result<(), ValidationError> {
    if settings.control_label == settings.test_label {
        let mut err = ValidationError::new("distinct_labels");
        err.message = Some("control and test labels must differ".into());
        return Err(err);
    }
    Ok(())
}

impl Settings {
    /// Load settings: defaults, user config file, `./abtest.*`, an explicit
    /// file if given, then `ABTEST_*` environment variables.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let defaults = Self::default();

        let mut builder = ConfigLoader::builder()
            .set_default("alpha", defaults.alpha)?
            .set_default("metric", defaults.metric.as_str())?
            .set_default("group_column", defaults.group_column.as_str())?
            .set_default("control_label", defaults.control_label.as_str())?
            .set_default("test_label", defaults.test_label.as_str())?
            .set_default("levene_center", defaults.levene_center.to_string())?
            .set_default("output_format", defaults.output_format.to_string())?;

        if let Some(path) = Self::user_config_path() {
            tracing::debug!("Checking user config at {:?}", path);
            builder = builder.add_source(File::from(path).required(false));
        }

        builder = builder.add_source(File::with_name("abtest").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }

        let loaded = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .context("Failed to assemble configuration")?;

        let settings: Settings = loaded
            .try_deserialize()
            .context("Failed to parse configuration")?;
        settings.check().context("Invalid configuration")?;

        Ok(settings)
    }

    /// Run the field rules; an out-of-range alpha surfaces as `InvalidAlpha`.
    pub fn check(&self) -> Result<()> {
        if self.alpha.is_nan() {
            return Err(CoreError::InvalidAlpha(self.alpha).into());
        }
        self.validate().map_err(|errors| {
            if errors.field_errors().contains_key("alpha") {
                anyhow::Error::new(CoreError::InvalidAlpha(self.alpha))
            } else {
                anyhow::Error::new(errors)
            }
        })
    }

    /// Write these settings as TOML
    pub fn save(&self, path: &Path) -> Result<()> {
        self.check().context("Refusing to write invalid configuration")?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content).with_context(|| format!("Failed to write config to {:?}", path))?;
        Ok(())
    }

    /// Per-user configuration file, if a home directory can be determined
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "bidding-analytics", "abtest")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.metric, "Purchase");
        assert_eq!(settings.alpha, 0.05);
    }

    #[test]
    fn test_same_labels_rejected() {
        let settings = Settings {
            test_label: "control".to_string(),
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_empty_metric_rejected() {
        let settings = Settings {
            metric: String::new(),
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_save_then_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abtest.toml");

        let settings = Settings {
            alpha: 0.01,
            metric: "Earning".to_string(),
            levene_center: LeveneCenter::Mean,
            ..Settings::default()
        };
        settings.save(&path).unwrap();

        let loaded = Settings::load(Some(&path)).unwrap();
        assert_eq!(loaded.alpha, 0.01);
        assert_eq!(loaded.metric, "Earning");
        assert_eq!(loaded.levene_center, LeveneCenter::Mean);
    }

    #[test]
    fn test_load_rejects_out_of_range_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abtest.toml");
        fs::write(&path, "alpha = 1.5\n").unwrap();

        let err = Settings::load(Some(&path)).unwrap_err();
        assert!(matches!(
            err.root_cause().downcast_ref::<CoreError>(),
            Some(CoreError::InvalidAlpha(alpha)) if *alpha == 1.5
        ));
    }

    #[test]
    fn test_save_rejects_out_of_range_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abtest.toml");

        let settings = Settings {
            alpha: 0.0,
            ..Settings::default()
        };
        assert!(settings.save(&path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = Settings::load(Some(&dir.path().join("absent.toml")));
        assert!(result.is_err());
    }
}
