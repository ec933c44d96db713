//! A set of experiments at one nominal operating point.

use crate::error::{ConditionError, ConditionResult};
use crate::experiment::Experiment;
use rcm_core::{Real, bar, k, mean, sample_std_dev};
use rcm_project::ConditionConfig;
use rcm_sim::{
    GasMixture, Mechanism, ReactorConditions, ReactorOptions, ReactorSolver, SimulationResult,
    VolumeProfile,
};
use rcm_thermo::{pressure_from_volume, volume_from_pressure};
use rayon::prelude::*;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

/// Mean and sample scatter of one derived scalar, with the number of
/// experiments that actually defined it.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateStats {
    pub mean: Real,
    pub std_dev: Real,
    pub count: usize,
}

fn aggregate(values: &[Real]) -> Option<AggregateStats> {
    if values.is_empty() {
        return None;
    }
    Some(AggregateStats {
        mean: mean(values),
        std_dev: sample_std_dev(values),
        count: values.len(),
    })
}

/// Per-experiment line of the report.
#[derive(Debug, Clone, Serialize)]
pub struct ExperimentRow {
    pub stem: String,
    pub label: String,
    pub reactive: bool,
    pub eoc_pressure_bar: Real,
    pub overall_delay_s: Option<Real>,
    /// `None` means no first stage was observed, which is distinct from
    /// a measured zero delay.
    pub first_stage_delay_s: Option<Real>,
}

/// Aggregated view of a processed condition.
#[derive(Debug, Clone, Serialize)]
pub struct ConditionSummary {
    pub name: String,
    pub rows: Vec<ExperimentRow>,
    pub eoc_pressure_bar: Option<AggregateStats>,
    pub overall_delay_s: Option<AggregateStats>,
    pub first_stage_delay_s: Option<AggregateStats>,
    pub simulated_eoc_temperature_k: Option<Real>,
    pub simulated_eoc_pressure_bar: Option<Real>,
    /// Overall delay extracted from the simulated pressure trace, when
    /// the simulation shows a post-EOC heat-release peak at all.
    pub simulated_overall_delay_s: Option<Real>,
}

/// Result of checking a derived volume trace against measured pressure.
#[derive(Debug, Clone)]
pub struct VolumeCheck {
    pub reconstructed_pressure_bar: Vec<Real>,
    pub max_abs_error_bar: Real,
}

/// Experiments sharing nominal operating parameters: zero or more
/// reactive trials plus one non-reactive trial that supplies the volume
/// history, and at most one simulation result.
#[derive(Debug)]
pub struct Condition {
    config: ConditionConfig,
    reactive: Vec<Experiment>,
    nonreactive: Option<Experiment>,
    simulation: Option<SimulationResult>,
}

impl Condition {
    pub fn new(config: ConditionConfig) -> Self {
        Self {
            config,
            reactive: Vec::new(),
            nonreactive: None,
            simulation: None,
        }
    }

    pub fn config(&self) -> &ConditionConfig {
        &self.config
    }

    pub fn reactive(&self) -> &[Experiment] {
        &self.reactive
    }

    pub fn nonreactive(&self) -> Option<&Experiment> {
        self.nonreactive.as_ref()
    }

    pub fn simulation(&self) -> Option<&SimulationResult> {
        self.simulation.as_ref()
    }

    /// Route an experiment into the reactive set or the non-reactive
    /// slot. The file-name prefix decides; a trace classification that
    /// disagrees with the name is logged, and the name wins.
    pub fn add_experiment(&mut self, experiment: Experiment) {
        let by_name = experiment.name.non_reactive;
        let by_trace = !experiment.is_reactive();
        if by_name != by_trace {
            warn!(
                stem = %experiment.name.stem,
                name_says_non_reactive = by_name,
                trace_says_non_reactive = by_trace,
                "file name and trace classification disagree"
            );
        }
        if by_name {
            if let Some(previous) = self.nonreactive.replace(experiment) {
                warn!(
                    replaced = %previous.name.stem,
                    "condition already had a non-reactive experiment; keeping the newest"
                );
            }
        } else {
            self.reactive.push(experiment);
        }
    }

    /// Process a batch of voltage-trace files, in parallel. Files that
    /// fail to parse or derive are logged with their name and reason and
    /// skipped; the batch never aborts. Returns the number ingested.
    pub fn ingest_files(&mut self, paths: &[PathBuf]) -> usize {
        let experiments: Vec<Experiment> = paths
            .par_iter()
            .filter_map(
                |path| match Experiment::from_voltage_file(path, &self.config) {
                    Ok(experiment) => Some(experiment),
                    Err(error) => {
                        warn!(path = %path.display(), %error, "skipping experiment");
                        None
                    }
                },
            )
            .collect();

        let count = experiments.len();
        for experiment in experiments {
            self.add_experiment(experiment);
        }
        info!(
            condition = %self.config.name,
            ingested = count,
            skipped = paths.len() - count,
            "batch ingest complete"
        );
        count
    }

    fn gas(&self) -> ConditionResult<GasMixture> {
        let mechanism = Mechanism::from_yaml_file(&self.config.mechanism)?;
        let composition: Vec<(String, Real)> = self
            .config
            .composition
            .iter()
            .map(|(name, fraction)| (name.clone(), *fraction))
            .collect();
        Ok(GasMixture::new(&mechanism, &composition)?)
    }

    /// Derive the volume history from the non-reactive experiment and
    /// run the reactor simulation against it. The result is cached on
    /// the condition; a solver failure is fatal to this comparison only.
    pub fn run_comparison(
        &mut self,
        solver: &dyn ReactorSolver,
    ) -> ConditionResult<&SimulationResult> {
        let nonreactive = self
            .nonreactive
            .as_ref()
            .ok_or(ConditionError::MissingNonReactive)?;
        let gas = self.gas()?;
        let trace = &nonreactive.pressure;
        let t_initial = k(self.config.initial_temperature_k);

        let volume = volume_from_pressure(trace.pressure(), 1.0, t_initial, &gas)?;
        let profile = VolumeProfile::new(trace.time(), &volume)?;
        let result = solver.run(
            &gas,
            ReactorConditions {
                pressure: bar(trace.pressure()[0]),
                temperature: t_initial,
            },
            &profile,
            &ReactorOptions::default(),
        )?;
        info!(
            condition = %self.config.name,
            samples = result.len(),
            eoc_temperature = result.eoc_temperature().unwrap_or(0.0),
            "simulation comparison complete"
        );
        Ok(self.simulation.insert(result))
    }

    /// Round-trip check: rebuild pressure from the volume history the
    /// non-reactive trace implies and measure the worst deviation.
    pub fn validate_volume_trace(&self) -> ConditionResult<VolumeCheck> {
        let nonreactive = self
            .nonreactive
            .as_ref()
            .ok_or(ConditionError::MissingNonReactive)?;
        let gas = self.gas()?;
        let trace = &nonreactive.pressure;
        let t_initial = k(self.config.initial_temperature_k);

        let volume = volume_from_pressure(trace.pressure(), 1.0, t_initial, &gas)?;
        let reconstructed =
            pressure_from_volume(&volume, bar(trace.pressure()[0]), t_initial, &gas)?;
        let max_abs_error_bar = trace
            .pressure()
            .iter()
            .zip(&reconstructed)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0_f64, f64::max);
        Ok(VolumeCheck {
            reconstructed_pressure_bar: reconstructed,
            max_abs_error_bar,
        })
    }

    /// Aggregate the derived scalars. Averages run over the reactive
    /// experiments; the first-stage average includes only experiments
    /// where a first stage was observed, with its own count.
    pub fn summary(&self) -> ConditionSummary {
        let mut rows = Vec::new();
        let mut eoc_pressures = Vec::new();
        let mut overall = Vec::new();
        let mut first_stage = Vec::new();

        for experiment in &self.reactive {
            let delays = match experiment.ignition_delays() {
                Ok(delays) => Some(delays),
                Err(error) => {
                    warn!(stem = %experiment.name.stem, %error, "no ignition delays");
                    None
                }
            };
            let row = ExperimentRow {
                stem: experiment.name.stem.clone(),
                label: experiment.label(),
                reactive: experiment.is_reactive(),
                eoc_pressure_bar: experiment.pressure.eoc_pressure(),
                overall_delay_s: delays.map(|d| d.overall),
                first_stage_delay_s: delays.and_then(|d| d.first_stage),
            };
            eoc_pressures.push(row.eoc_pressure_bar);
            if let Some(v) = row.overall_delay_s {
                overall.push(v);
            }
            if let Some(v) = row.first_stage_delay_s {
                first_stage.push(v);
            }
            rows.push(row);
        }

        if let Some(nonreactive) = &self.nonreactive {
            rows.push(ExperimentRow {
                stem: nonreactive.name.stem.clone(),
                label: nonreactive.label(),
                reactive: false,
                eoc_pressure_bar: nonreactive.pressure.eoc_pressure(),
                overall_delay_s: None,
                first_stage_delay_s: None,
            });
        }

        ConditionSummary {
            name: self.config.name.clone(),
            rows,
            eoc_pressure_bar: aggregate(&eoc_pressures),
            overall_delay_s: aggregate(&overall),
            first_stage_delay_s: aggregate(&first_stage),
            simulated_eoc_temperature_k: self
                .simulation
                .as_ref()
                .and_then(|s| s.eoc_temperature()),
            simulated_eoc_pressure_bar: self.simulation.as_ref().and_then(|s| s.eoc_pressure()),
            simulated_overall_delay_s: self.simulated_delay(),
        }
    }

    /// Run the reactive detection over the simulated pressure series.
    /// A frozen-chemistry run has no post-EOC peak and reports `None`.
    fn simulated_delay(&self) -> Option<Real> {
        let simulation = self.simulation.as_ref()?;
        let series =
            rcm_core::TimeSeries::from_columns(simulation.time.clone(), simulation.pressure.clone())
                .ok()?;
        let options = rcm_trace::DetectionOptions {
            noise_threshold: self.config.noise_threshold,
            derivative_span: self.config.derivative_span.min(
                // simulated output can be shorter than an oscilloscope record
                if series.len() % 2 == 1 {
                    series.len()
                } else {
                    series.len().saturating_sub(1)
                },
            ),
            offset_points: 0,
        };
        let trace =
            rcm_trace::PressureTrace::new(series, bar(simulation.pressure[0]), options).ok()?;
        trace.ignition_delays().ok().map(|d| d.overall)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_of_empty_is_none() {
        assert!(aggregate(&[]).is_none());
    }

    #[test]
    fn aggregate_reports_count_and_scatter() {
        let stats = aggregate(&[2.0, 4.0, 6.0]).unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.mean, 4.0);
        assert!((stats.std_dev - 2.0).abs() < 1e-12);
    }
}
