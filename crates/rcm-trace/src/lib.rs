//! rcm-trace: voltage and pressure trace derivation.
//!
//! One linear pipeline per experiment: a raw voltage record is filtered,
//! smoothed, and calibrated into a pressure trace; the pressure trace's
//! smoothed derivative locates the end of compression, classifies
//! reactivity, and yields ignition-delay times.

pub mod error;
pub mod io;
pub mod pressure;
pub mod voltage;

mod detect;

pub use error::{TraceError, TraceResult};
pub use io::{read_trace_file, write_columns};
pub use pressure::{DetectionOptions, IgnitionDelays, PressureTrace, Reactivity};
pub use voltage::{FilterCutoff, SMOOTHING_SPAN, VoltageTrace};
