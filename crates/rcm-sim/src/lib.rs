//! rcm-sim: zero-dimensional reactor simulation boundary.
//!
//! Loads chemistry-mechanism thermodynamic data, exposes a gas mixture's
//! gamma(T) to the isentropic transforms, and drives a prescribed-volume
//! reactor integration to produce the comparison pressure trace. The
//! [`ReactorSolver`] trait is the boundary to an external kinetics
//! engine; the built-in implementation integrates frozen (inert)
//! chemistry only.

pub mod error;
pub mod gas;
pub mod mechanism;
pub mod reactor;
pub mod result;
pub mod volume;

pub use error::{SimError, SimResult};
pub use gas::GasMixture;
pub use mechanism::{Mechanism, SpeciesRecord};
pub use reactor::{FrozenChemistryReactor, ReactorConditions, ReactorOptions, ReactorSolver};
pub use result::SimulationResult;
pub use volume::VolumeProfile;
