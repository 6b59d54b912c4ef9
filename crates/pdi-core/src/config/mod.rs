//! Configuration loading and validation for pdi-core.
//!
//! Resolution order (highest to lowest priority):
//! 1. `--config <FILE>` (via [`ConfigOptions`])
//! 2. `PDI_CONFIG` environment variable
//! 3. Built-in defaults
//!
//! Files are JSON unless the extension is `.toml`. Individual CLI flags are
//! applied on top of the loaded file by the caller.

use crate::estimate::{
    point_estimate, EstimationError, GammaParams, DEFAULT_GRID_RESOLUTION, DEFAULT_SAMPLE_CAP,
    DEFAULT_SPREAD,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "PDI_CONFIG";

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Invalid JSON in config file {path}: {source}")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid TOML in config file {path}: {source}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("I/O error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Semantic validation failed: {0}")]
    Validation(#[from] EstimationError),
}

/// Where a marginal's initial (shape, rate) comes from.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum InitialEstimate {
    /// Method of moments on the observed sample.
    #[default]
    MethodOfMoments,
    /// A fixed starting point, independent of the data.
    Fixed { shape: f64, rate: f64 },
}

impl InitialEstimate {
    /// Produce the point estimate that centers the prior range.
    pub fn resolve(&self, sample: &[f64]) -> Result<GammaParams, EstimationError> {
        match *self {
            InitialEstimate::MethodOfMoments => point_estimate(sample),
            InitialEstimate::Fixed { shape, rate } => {
                GammaParams::checked(shape, rate, "fixed initial estimate")
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InitialEstimate::MethodOfMoments => "method_of_moments",
            InitialEstimate::Fixed { .. } => "fixed",
        }
    }
}

/// Knobs of the grid search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EstimationConfig {
    /// Number of candidates per prior axis (`N`).
    pub grid_resolution: usize,
    /// Standard-error multiplier for the prior range (`k`).
    pub spread: f64,
    /// Leading observations scored by the likelihood.
    pub sample_cap: usize,
    pub creation_initial: InitialEstimate,
    pub destruction_initial: InitialEstimate,
}

impl Default for EstimationConfig {
    fn default() -> Self {
        EstimationConfig {
            grid_resolution: DEFAULT_GRID_RESOLUTION,
            spread: DEFAULT_SPREAD,
            sample_cap: DEFAULT_SAMPLE_CAP,
            creation_initial: InitialEstimate::default(),
            destruction_initial: InitialEstimate::default(),
        }
    }
}

impl EstimationConfig {
    /// Check every setting before any sample is touched.
    pub fn validate(&self) -> Result<(), EstimationError> {
        if self.grid_resolution == 0 {
            return Err(EstimationError::InvalidSetting {
                field: "grid_resolution",
                message: "must be at least 1".to_string(),
            });
        }
        if !(self.spread.is_finite() && self.spread > 0.0) {
            return Err(EstimationError::InvalidSetting {
                field: "spread",
                message: format!("must be finite and > 0, got {}", self.spread),
            });
        }
        if self.sample_cap == 0 {
            return Err(EstimationError::InvalidSetting {
                field: "sample_cap",
                message: "must be at least 1".to_string(),
            });
        }
        for (field, initial) in [
            ("creation_initial", &self.creation_initial),
            ("destruction_initial", &self.destruction_initial),
        ] {
            if let InitialEstimate::Fixed { shape, rate } = *initial {
                if GammaParams::new(shape, rate).is_err() {
                    return Err(EstimationError::InvalidSetting {
                        field,
                        message: format!("shape and rate must be finite and > 0, got ({shape}, {rate})"),
                    });
                }
            }
        }
        Ok(())
    }

    /// Fixed starting points (7, 0.7) for creation and (8, 1.9) for destruction.
    pub fn with_fixed_initials() -> Self {
        EstimationConfig {
            creation_initial: InitialEstimate::Fixed {
                shape: 7.0,
                rate: 0.7,
            },
            destruction_initial: InitialEstimate::Fixed {
                shape: 8.0,
                rate: 1.9,
            },
            ..EstimationConfig::default()
        }
    }
}

/// Configuration resolution options.
#[derive(Debug, Default)]
pub struct ConfigOptions {
    /// Explicit config file (highest priority).
    pub config_path: Option<PathBuf>,
}

/// A loaded configuration and where it came from.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    pub estimation: EstimationConfig,
    /// Path of the file read (None if using defaults).
    pub source_path: Option<PathBuf>,
}

/// Load configuration with the standard resolution order.
pub fn load_config(options: &ConfigOptions) -> Result<ResolvedConfig, ConfigError> {
    let path = match &options.config_path {
        Some(path) => Some(path.clone()),
        None => std::env::var_os(CONFIG_ENV_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from),
    };

    let Some(path) = path else {
        tracing::debug!("no config file; using defaults");
        return Ok(ResolvedConfig {
            estimation: EstimationConfig::default(),
            source_path: None,
        });
    };

    let estimation = load_config_file(&path)?;
    estimation.validate()?;
    Ok(ResolvedConfig {
        estimation,
        source_path: Some(path),
    })
}

/// Read and parse one config file without validating it.
pub fn load_config_file(path: &Path) -> Result<EstimationConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let is_toml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

    if is_toml {
        toml::from_str(&content).map_err(|e| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source: e,
        })
    } else {
        serde_json::from_str(&content).map_err(|e| ConfigError::ParseJson {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(suffix: &str, body: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = EstimationConfig::default();
        assert_eq!(config.grid_resolution, 10);
        assert_eq!(config.spread, 3.0);
        assert_eq!(config.sample_cap, 100);
        assert_eq!(config.creation_initial, InitialEstimate::MethodOfMoments);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_explicit_json_file() {
        let file = write_temp(
            ".json",
            r#"{"grid_resolution": 7, "destruction_initial": {"method": "fixed", "shape": 8.0, "rate": 1.9}}"#,
        );
        let resolved = load_config(&ConfigOptions {
            config_path: Some(file.path().to_path_buf()),
        })
        .unwrap();
        assert_eq!(resolved.estimation.grid_resolution, 7);
        assert_eq!(resolved.estimation.spread, 3.0);
        assert_eq!(
            resolved.estimation.destruction_initial,
            InitialEstimate::Fixed {
                shape: 8.0,
                rate: 1.9
            }
        );
        assert_eq!(resolved.source_path.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_toml_file() {
        let file = write_temp(
            ".toml",
            "spread = 2.5\nsample_cap = 50\n\n[creation_initial]\nmethod = \"fixed\"\nshape = 7.0\nrate = 0.7\n",
        );
        let config = load_config_file(file.path()).unwrap();
        assert_eq!(config.spread, 2.5);
        assert_eq!(config.sample_cap, 50);
        assert_eq!(config.creation_initial.label(), "fixed");
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(&ConfigOptions {
            config_path: Some(PathBuf::from("/nonexistent/pdi/config.json")),
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_malformed_json() {
        let file = write_temp(".json", "{ not json");
        let err = load_config_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseJson { .. }));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let file = write_temp(".json", r#"{"grid_size": 4}"#);
        let err = load_config_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseJson { .. }));
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let file = write_temp(".json", r#"{"spread": -1.0}"#);
        let err = load_config(&ConfigOptions {
            config_path: Some(file.path().to_path_buf()),
        })
        .unwrap_err();
        match err {
            ConfigError::Validation(EstimationError::InvalidSetting { field, .. }) => {
                assert_eq!(field, "spread")
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_validate_fixed_initials() {
        let mut config = EstimationConfig::with_fixed_initials();
        assert!(config.validate().is_ok());
        config.creation_initial = InitialEstimate::Fixed {
            shape: 0.0,
            rate: 1.0,
        };
        assert!(matches!(
            config.validate(),
            Err(EstimationError::InvalidSetting {
                field: "creation_initial",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_zero_resolution_and_cap() {
        let config = EstimationConfig {
            grid_resolution: 0,
            ..EstimationConfig::default()
        };
        assert!(config.validate().is_err());
        let config = EstimationConfig {
            sample_cap: 0,
            ..EstimationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_initial_estimate_resolution() {
        let sample = [1.0, 2.0, 3.0, 4.0, 5.0];
        let mom = InitialEstimate::MethodOfMoments.resolve(&sample).unwrap();
        assert!((mom.shape() - 4.5).abs() < 1e-12);
        let fixed = InitialEstimate::Fixed {
            shape: 7.0,
            rate: 0.7,
        }
        .resolve(&sample)
        .unwrap();
        assert_eq!(fixed, GammaParams::new(7.0, 0.7).unwrap());
    }
}
