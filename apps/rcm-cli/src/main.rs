use clap::{Parser, Subcommand};
use rcm_condition::{Condition, ConditionError, ConditionResult, RunManifest, format_table,
    write_report};
use rcm_core::torr;
use rcm_project::{ConditionConfig, ExperimentName};
use rcm_sim::FrozenChemistryReactor;
use rcm_trace::{
    DetectionOptions, FilterCutoff, PressureTrace, VoltageTrace, read_trace_file, write_columns,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "rcm-cli")]
#[command(about = "RCM trace analysis - ignition delays from rapid-compression-machine data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process every experiment file of a condition and write the report
    Process {
        /// Path to the condition YAML file
        config_path: PathBuf,
        /// Directory holding the raw experiment .txt files
        data_dir: PathBuf,
        /// Report output directory (default: <data_dir>/results)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Skip the reactor simulation comparison
        #[arg(long)]
        no_sim: bool,
    },
    /// Derive and print the key quantities of a single experiment file
    Inspect {
        /// Path to one experiment .txt file
        file: PathBuf,
        /// Fixed low-pass cutoff (fraction of Nyquist; default automatic)
        #[arg(long)]
        cutoff: Option<f64>,
        /// Derivative noise floor [bar/s]
        #[arg(long, default_value_t = 100.0)]
        threshold: f64,
        /// Derivative smoothing span (odd)
        #[arg(long, default_value_t = 151)]
        span: usize,
    },
    /// Export time, pressure, and smoothed derivative columns
    Export {
        /// Path to one experiment .txt file
        file: PathBuf,
        /// Output file path
        #[arg(short, long)]
        out: PathBuf,
        /// Fixed low-pass cutoff (fraction of Nyquist; default automatic)
        #[arg(long)]
        cutoff: Option<f64>,
        /// Derivative noise floor [bar/s]
        #[arg(long, default_value_t = 100.0)]
        threshold: f64,
        /// Derivative smoothing span (odd)
        #[arg(long, default_value_t = 151)]
        span: usize,
    },
}

fn main() -> ConditionResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            config_path,
            data_dir,
            out,
            no_sim,
        } => cmd_process(&config_path, &data_dir, out.as_deref(), no_sim),
        Commands::Inspect {
            file,
            cutoff,
            threshold,
            span,
        } => cmd_inspect(&file, cutoff, threshold, span),
        Commands::Export {
            file,
            out,
            cutoff,
            threshold,
            span,
        } => cmd_export(&file, &out, cutoff, threshold, span),
    }
}

fn experiment_files(data_dir: &Path) -> ConditionResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(data_dir).map_err(|source| ConditionError::Io {
        path: data_dir.to_path_buf(),
        source,
    })?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ConditionError::Io {
            path: data_dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "txt") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn cmd_process(
    config_path: &Path,
    data_dir: &Path,
    out: Option<&Path>,
    no_sim: bool,
) -> ConditionResult<()> {
    let config = ConditionConfig::from_yaml_file(config_path)?;
    println!("Processing condition: {}", config.name);

    let files = experiment_files(data_dir)?;
    if files.is_empty() {
        println!("No .txt experiment files found in {}", data_dir.display());
        return Ok(());
    }

    let mut condition = Condition::new(config);
    let ingested = condition.ingest_files(&files);
    println!(
        "✓ Ingested {}/{} files ({} reactive, {} non-reactive)",
        ingested,
        files.len(),
        condition.reactive().len(),
        condition.nonreactive().map_or(0, |_| 1)
    );

    if !no_sim {
        match condition.run_comparison(&FrozenChemistryReactor) {
            Ok(result) => println!(
                "✓ Simulation comparison: T_eoc = {:.1} K over {} samples",
                result.eoc_temperature().unwrap_or(0.0),
                result.len()
            ),
            // fatal to the comparison, not to the report
            Err(error) => println!("✗ Simulation comparison failed: {error}"),
        }
    }

    let summary = condition.summary();
    print!("{}", format_table(&summary));

    let manifest = RunManifest::new(&summary);
    let report_dir = out
        .map(Path::to_path_buf)
        .unwrap_or_else(|| data_dir.join("results"));
    write_report(&report_dir, &summary, &manifest)?;
    println!(
        "✓ Report {} written to {}",
        manifest.run_id,
        report_dir.display()
    );
    Ok(())
}

fn derive_single(
    file: &Path,
    cutoff: Option<f64>,
    threshold: f64,
    span: usize,
) -> ConditionResult<(ExperimentName, VoltageTrace, PressureTrace)> {
    let file_name = file
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ConditionError::BadPath {
            path: file.to_path_buf(),
        })?;
    let name = ExperimentName::parse(file_name)?;

    let series = read_trace_file(file)?;
    let filter = cutoff.map(FilterCutoff::Ratio).unwrap_or_default();
    let voltage = VoltageTrace::new(
        series,
        name.amplifier_factor,
        torr(name.initial_pressure_torr),
        filter,
    )?;
    let pressure = voltage.to_pressure(DetectionOptions {
        noise_threshold: threshold,
        derivative_span: span,
        offset_points: 0,
    })?;
    Ok((name, voltage, pressure))
}

fn cmd_inspect(
    file: &Path,
    cutoff: Option<f64>,
    threshold: f64,
    span: usize,
) -> ConditionResult<()> {
    let (name, voltage, pressure) = derive_single(file, cutoff, threshold, span)?;

    println!("Experiment {}", name.stem);
    println!("  Recorded: {}", name.timestamp);
    println!(
        "  Initial: {} Torr, {} K, factor {} bar/V",
        name.initial_pressure_torr, name.initial_temperature_k, name.amplifier_factor
    );
    println!("  Sampling: {:.0} Hz", pressure.frequency());
    println!("  Filter cutoff: {:.4} of Nyquist", voltage.cutoff_ratio());
    println!(
        "  EOC: {:.4} bar at {:.4} s (sample {})",
        pressure.eoc_pressure(),
        pressure.eoc_time(),
        pressure.eoc_index()
    );

    if pressure.is_reactive() {
        let delays = pressure.ignition_delays()?;
        println!("  Overall ignition delay: {:.3} ms", delays.overall * 1.0e3);
        match delays.first_stage {
            Some(tau1) => println!("  First-stage delay: {:.3} ms", tau1 * 1.0e3),
            None => println!("  First-stage delay: undefined (no first stage observed)"),
        }
    } else {
        println!("  Non-reactive: ignition delay undefined");
    }
    Ok(())
}

fn cmd_export(
    file: &Path,
    out: &Path,
    cutoff: Option<f64>,
    threshold: f64,
    span: usize,
) -> ConditionResult<()> {
    let (_, _, pressure) = derive_single(file, cutoff, threshold, span)?;
    write_columns(
        out,
        &[
            pressure.time(),
            pressure.pressure(),
            pressure.smoothed_derivative(),
        ],
    )?;
    println!(
        "✓ Exported {} samples to {}",
        pressure.pressure().len(),
        out.display()
    );
    Ok(())
}
