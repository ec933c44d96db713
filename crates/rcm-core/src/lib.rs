//! rcm-core: stable foundation for rcmkit.
//!
//! Contains:
//! - units (uom SI scalar types + constructors + RCM unit constants)
//! - numeric (Real + tolerances + float/statistics helpers)
//! - series (validated sampled time series)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod series;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use series::TimeSeries;
pub use units::*;
