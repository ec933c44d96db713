//! rcm-signal: numerical kernels for trace processing.
//!
//! Zero-phase low-pass filtering, moving-window smoothing, numerical
//! differentiation, and polynomial least-squares fitting. These are the
//! only non-trivial numerics in the pipeline; everything downstream
//! composes them.

pub mod derivative;
pub mod error;
pub mod filter;
pub mod fit;
pub mod smooth;

pub use derivative::{derivative, smoothed_derivative};
pub use error::{SignalError, SignalResult};
pub use filter::{Butter2, DEFAULT_CUTOFF_RATIO, optimal_cutoff};
pub use fit::{polyfit, polyval};
pub use smooth::{moving_average, savgol};
