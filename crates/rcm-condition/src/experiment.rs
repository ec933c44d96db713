//! One physical trial: metadata plus its trace derivation chain.

use crate::error::{ConditionError, ConditionResult};
use rcm_core::torr;
use rcm_project::{ConditionConfig, ExperimentName};
use rcm_trace::{
    DetectionOptions, FilterCutoff, IgnitionDelays, PressureTrace, VoltageTrace, read_trace_file,
};
use std::path::{Path, PathBuf};

pub(crate) fn detection_options(config: &ConditionConfig) -> DetectionOptions {
    DetectionOptions {
        noise_threshold: config.noise_threshold,
        derivative_span: config.derivative_span,
        offset_points: config.offset_points,
    }
}

fn cutoff(config: &ConditionConfig) -> FilterCutoff {
    config
        .cutoff_ratio
        .map(FilterCutoff::Ratio)
        .unwrap_or_default()
}

/// One experiment, immutable after construction. The calibration scale
/// and fill pressure come from the parsed file name; processing knobs
/// from the condition configuration.
#[derive(Debug)]
pub struct Experiment {
    pub name: ExperimentName,
    pub path: PathBuf,
    /// Present when the experiment was recorded as a voltage trace.
    pub voltage: Option<VoltageTrace>,
    pub pressure: PressureTrace,
}

impl Experiment {
    /// Build from a raw voltage record.
    pub fn from_voltage_file(path: &Path, config: &ConditionConfig) -> ConditionResult<Self> {
        let name = parse_name(path)?;
        let series = read_trace_file(path)?;
        let voltage = VoltageTrace::new(
            series,
            name.amplifier_factor,
            torr(name.initial_pressure_torr),
            cutoff(config),
        )?;
        let pressure = voltage.to_pressure(detection_options(config))?;
        Ok(Self {
            name,
            path: path.to_path_buf(),
            voltage: Some(voltage),
            pressure,
        })
    }

    /// Build from a record that already stores pressure (no companion
    /// voltage trace exists for these).
    pub fn from_pressure_file(path: &Path, config: &ConditionConfig) -> ConditionResult<Self> {
        let name = parse_name(path)?;
        let series = read_trace_file(path)?;
        let pressure = PressureTrace::from_raw_pressure(
            series,
            torr(name.initial_pressure_torr),
            cutoff(config),
            detection_options(config),
        )?;
        Ok(Self {
            name,
            path: path.to_path_buf(),
            voltage: None,
            pressure,
        })
    }

    pub fn is_reactive(&self) -> bool {
        self.pressure.is_reactive()
    }

    pub fn ignition_delays(&self) -> ConditionResult<IgnitionDelays> {
        Ok(self.pressure.ignition_delays()?)
    }

    pub fn label(&self) -> String {
        self.name.label()
    }
}

fn parse_name(path: &Path) -> ConditionResult<ExperimentName> {
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ConditionError::BadPath {
            path: path.to_path_buf(),
        })?;
    Ok(ExperimentName::parse(file_name)?)
}
