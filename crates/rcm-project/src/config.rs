//! Condition configuration schema.

use crate::error::{ProjectError, ProjectResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

fn default_comptime_s() -> f64 {
    0.08
}

fn default_derivative_span() -> usize {
    151
}

fn default_noise_threshold() -> f64 {
    100.0
}

/// One condition's nominal parameters and processing knobs, loaded from
/// a YAML file next to the raw data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionConfig {
    pub name: String,
    /// Nominal fill pressure [Torr].
    pub initial_pressure_torr: f64,
    /// Nominal initial temperature [K].
    pub initial_temperature_k: f64,
    /// Species name -> mole fraction (normalized downstream).
    pub composition: BTreeMap<String, f64>,
    /// Chemistry-mechanism file handed to the simulation.
    pub mechanism: PathBuf,
    /// Compression duration counted back from the EOC [s].
    #[serde(default = "default_comptime_s")]
    pub comptime_s: f64,
    /// Samples dropped from the head of each record.
    #[serde(default)]
    pub offset_points: usize,
    /// Fixed low-pass cutoff (fraction of Nyquist); omitted = automatic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cutoff_ratio: Option<f64>,
    /// Moving-average span for the pressure derivative.
    #[serde(default = "default_derivative_span")]
    pub derivative_span: usize,
    /// Noise floor for event detection [bar/s].
    #[serde(default = "default_noise_threshold")]
    pub noise_threshold: f64,
    /// Reactor geometry for the volume-trace builder; carried through
    /// untouched for that collaborator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_trace: Option<VolumeTraceGeometry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeTraceGeometry {
    pub endplug: String,
    pub spacers_in: f64,
    pub shims_mm: f64,
}

impl ConditionConfig {
    pub fn from_yaml_file(path: &Path) -> ProjectResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ProjectError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ConditionConfig =
            serde_yaml::from_str(&text).map_err(|source| ProjectError::Yaml {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        tracing::debug!(name = %config.name, "loaded condition configuration");
        Ok(config)
    }

    pub fn validate(&self) -> ProjectResult<()> {
        if !(self.initial_pressure_torr.is_finite() && self.initial_pressure_torr > 0.0) {
            return Err(ProjectError::Invalid {
                what: "initial pressure must be positive and finite",
            });
        }
        if !(self.initial_temperature_k.is_finite() && self.initial_temperature_k > 0.0) {
            return Err(ProjectError::Invalid {
                what: "initial temperature must be positive and finite",
            });
        }
        if self.composition.is_empty() {
            return Err(ProjectError::Invalid {
                what: "composition must name at least one species",
            });
        }
        if self.derivative_span % 2 == 0 {
            return Err(ProjectError::Invalid {
                what: "derivative smoothing span must be odd",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = "\
name: propane-phi-1
initial_pressure_torr: 1285
initial_temperature_k: 373
composition:
  C3H8: 1.0
  O2: 5.0
  N2: 18.8
mechanism: mechanisms/propane.yaml
";

    #[test]
    fn minimal_document_gets_defaults() {
        let config: ConditionConfig = serde_yaml::from_str(MINIMAL).unwrap();
        config.validate().unwrap();
        assert_eq!(config.comptime_s, 0.08);
        assert_eq!(config.offset_points, 0);
        assert_eq!(config.cutoff_ratio, None);
        assert_eq!(config.derivative_span, 151);
        assert_eq!(config.noise_threshold, 100.0);
        assert!(config.volume_trace.is_none());
    }

    #[test]
    fn overrides_stick() {
        let text = format!(
            "{MINIMAL}comptime_s: 0.05\noffset_points: 200\ncutoff_ratio: 0.08\n\
volume_trace:\n  endplug: flat\n  spacers_in: 1.5\n  shims_mm: 0.0\n"
        );
        let config: ConditionConfig = serde_yaml::from_str(&text).unwrap();
        assert_eq!(config.comptime_s, 0.05);
        assert_eq!(config.offset_points, 200);
        assert_eq!(config.cutoff_ratio, Some(0.08));
        assert_eq!(config.volume_trace.unwrap().endplug, "flat");
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut config: ConditionConfig = serde_yaml::from_str(MINIMAL).unwrap();
        config.initial_pressure_torr = -1.0;
        assert!(config.validate().is_err());

        let mut config: ConditionConfig = serde_yaml::from_str(MINIMAL).unwrap();
        config.composition.clear();
        assert!(config.validate().is_err());

        let mut config: ConditionConfig = serde_yaml::from_str(MINIMAL).unwrap();
        config.derivative_span = 150;
        assert!(config.validate().is_err());
    }
}
