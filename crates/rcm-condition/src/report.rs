//! Report artifacts: run manifest and tabulated results.

use crate::condition::ConditionSummary;
use crate::error::{ConditionError, ConditionResult};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Identity record written next to the tabulated results. The run id is
/// a content hash of the condition name and the experiment set, so
/// re-processing identical inputs yields the same id.
#[derive(Debug, Clone, Serialize)]
pub struct RunManifest {
    pub run_id: String,
    pub condition: String,
    pub timestamp: String,
    pub tool_version: String,
    pub experiments: Vec<String>,
}

impl RunManifest {
    pub fn new(summary: &ConditionSummary) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(summary.name.as_bytes());
        for row in &summary.rows {
            hasher.update(b"\n");
            hasher.update(row.stem.as_bytes());
        }
        let digest = hasher.finalize();
        let run_id = format!("{digest:x}")[..16].to_string();

        Self {
            run_id,
            condition: summary.name.clone(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            experiments: summary.rows.iter().map(|r| r.stem.clone()).collect(),
        }
    }
}

fn delay_ms(value: Option<f64>) -> String {
    // "--" marks an undefined quantity; a real zero prints as 0.000
    match value {
        Some(v) => format!("{:.3}", v * 1.0e3),
        None => "--".to_string(),
    }
}

/// Render the per-experiment table plus aggregate footer as
/// tab-delimited text.
pub fn format_table(summary: &ConditionSummary) -> String {
    let mut out = String::new();
    out.push_str("experiment\treactive\tp_eoc_bar\ttau_ms\ttau1_ms\n");
    for row in &summary.rows {
        out.push_str(&format!(
            "{}\t{}\t{:.4}\t{}\t{}\n",
            row.stem,
            if row.reactive { "yes" } else { "no" },
            row.eoc_pressure_bar,
            delay_ms(row.overall_delay_s),
            delay_ms(row.first_stage_delay_s),
        ));
    }

    if let Some(stats) = &summary.eoc_pressure_bar {
        out.push_str(&format!(
            "# p_eoc mean {:.4} bar, std {:.4} (n = {})\n",
            stats.mean, stats.std_dev, stats.count
        ));
    }
    if let Some(stats) = &summary.overall_delay_s {
        out.push_str(&format!(
            "# tau mean {:.3} ms, std {:.3} (n = {})\n",
            stats.mean * 1.0e3,
            stats.std_dev * 1.0e3,
            stats.count
        ));
    }
    match &summary.first_stage_delay_s {
        Some(stats) => out.push_str(&format!(
            "# tau1 mean {:.3} ms, std {:.3} (n = {})\n",
            stats.mean * 1.0e3,
            stats.std_dev * 1.0e3,
            stats.count
        )),
        None => out.push_str("# tau1 undefined (no first stage observed)\n"),
    }
    if let Some(t_eoc) = summary.simulated_eoc_temperature_k {
        out.push_str(&format!("# simulated T_eoc {t_eoc:.1} K\n"));
    }
    if let Some(p_eoc) = summary.simulated_eoc_pressure_bar {
        out.push_str(&format!("# simulated p_eoc {p_eoc:.4} bar\n"));
    }
    if let Some(tau) = summary.simulated_overall_delay_s {
        out.push_str(&format!("# simulated tau {:.3} ms\n", tau * 1.0e3));
    }
    out
}

/// Write `<run_id>-results.txt` and `<run_id>-manifest.json` into `dir`.
pub fn write_report(
    dir: &Path,
    summary: &ConditionSummary,
    manifest: &RunManifest,
) -> ConditionResult<()> {
    let io_err = |source| ConditionError::Io {
        path: dir.to_path_buf(),
        source,
    };
    std::fs::create_dir_all(dir).map_err(io_err)?;

    let table_path = dir.join(format!("{}-results.txt", manifest.run_id));
    std::fs::write(&table_path, format_table(summary)).map_err(io_err)?;

    let manifest_path = dir.join(format!("{}-manifest.json", manifest.run_id));
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(&manifest_path, json).map_err(io_err)?;

    tracing::info!(
        run_id = %manifest.run_id,
        dir = %dir.display(),
        "report written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{AggregateStats, ExperimentRow};

    fn sample_summary() -> ConditionSummary {
        ConditionSummary {
            name: "test-condition".into(),
            rows: vec![
                ExperimentRow {
                    stem: "a".into(),
                    label: "19-Jul-1633".into(),
                    reactive: true,
                    eoc_pressure_bar: 30.1,
                    overall_delay_s: Some(5.0e-3),
                    first_stage_delay_s: None,
                },
                ExperimentRow {
                    stem: "b".into(),
                    label: "19-Jul-1701".into(),
                    reactive: false,
                    eoc_pressure_bar: 29.8,
                    overall_delay_s: None,
                    first_stage_delay_s: None,
                },
            ],
            eoc_pressure_bar: Some(AggregateStats {
                mean: 30.1,
                std_dev: 0.0,
                count: 1,
            }),
            overall_delay_s: Some(AggregateStats {
                mean: 5.0e-3,
                std_dev: 0.0,
                count: 1,
            }),
            first_stage_delay_s: None,
            simulated_eoc_temperature_k: Some(651.2),
            simulated_eoc_pressure_bar: None,
            simulated_overall_delay_s: None,
        }
    }

    #[test]
    fn undefined_first_stage_is_dashes_not_zero() {
        let table = format_table(&sample_summary());
        assert!(table.contains("5.000\t--"));
        assert!(table.contains("tau1 undefined"));
        assert!(!table.contains("\t0.000\n"));
    }

    #[test]
    fn manifest_id_is_deterministic_over_inputs() {
        let summary = sample_summary();
        let a = RunManifest::new(&summary);
        let b = RunManifest::new(&summary);
        assert_eq!(a.run_id, b.run_id);
        assert_eq!(a.run_id.len(), 16);
    }

    #[test]
    fn manifest_id_tracks_experiment_set() {
        let summary = sample_summary();
        let a = RunManifest::new(&summary);
        let mut altered = summary.clone();
        altered.rows[0].stem = "c".into();
        let b = RunManifest::new(&altered);
        assert_ne!(a.run_id, b.run_id);
    }
}
