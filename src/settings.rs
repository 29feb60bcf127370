//! # Evaluation settings
//!
//! Thresholds and constants of the benchmark metrics, deserializable from TOML.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::*;

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationSettings {
    /// Low resolution pixels ignored along every image border.
    pub boundary_offset: usize,
    pub bad_pix_threshold: f32,
    pub mse_factor: f64,
    pub bumpiness_clip: f32,
    pub bumpiness_factor: f64,
    pub discontinuity_threshold: f32,
    /// Disparity error above which fine structures count as fattened or thinned.
    pub fine_threshold: f32,
    /// Width in pixels of the band around fine structures checked for fattening.
    pub fattening_dilation: u8,
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl Default for EvaluationSettings {
    fn default() -> Self {
        EvaluationSettings {
            boundary_offset: 15,
            bad_pix_threshold: 0.07,
            mse_factor: 100.0,
            bumpiness_clip: 0.05,
            bumpiness_factor: 100.0,
            discontinuity_threshold: 0.07,
            fine_threshold: 0.15,
            fattening_dilation: 9,
        }
    }
}

impl EvaluationSettings {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let settings = EvaluationSettings::from_toml_str("boundary_offset = 4\n").unwrap();

        assert_eq!(settings.boundary_offset, 4);
        assert_eq!(settings.bad_pix_threshold, 0.07);
        assert_eq!(settings.fattening_dilation, 9);
    }

    #[test]
    fn invalid_file_is_config_error() {
        let err = EvaluationSettings::from_toml_str("boundary_offset = \"wide\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn file_round_trip() {
        let settings = EvaluationSettings {
            boundary_offset: 3,
            fine_threshold: 0.25,
            ..EvaluationSettings::default()
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("evaluation.toml");
        std::fs::write(&path, toml::to_string(&settings).unwrap()).unwrap();

        assert_eq!(EvaluationSettings::from_file(&path).unwrap(), settings);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = EvaluationSettings::from_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
