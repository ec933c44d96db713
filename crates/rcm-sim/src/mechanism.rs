//! Chemistry-mechanism thermodynamic data.
//!
//! A mechanism file carries one record per species: molar mass and NASA
//! seven-coefficient polynomials for the low and high temperature ranges.
//! Only the heat-capacity terms are consumed here; enthalpy/entropy
//! coefficients ride along so standard data can be pasted verbatim.

use crate::error::{SimError, SimResult};
use rcm_core::Real;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_t_mid() -> Real {
    1000.0
}

/// One species' thermodynamic record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesRecord {
    pub name: String,
    /// Molar mass [kg/kmol].
    pub molar_mass: Real,
    /// Switch point between the coefficient ranges [K].
    #[serde(default = "default_t_mid")]
    pub t_mid: Real,
    /// NASA-7 coefficients for T < t_mid.
    pub a_low: [Real; 7],
    /// NASA-7 coefficients for T >= t_mid.
    pub a_high: [Real; 7],
}

impl SpeciesRecord {
    /// Dimensionless cp/R at the given temperature.
    pub fn cp_over_r(&self, temperature_k: Real) -> Real {
        let a = if temperature_k < self.t_mid {
            &self.a_low
        } else {
            &self.a_high
        };
        let t = temperature_k;
        a[0] + a[1] * t + a[2] * t * t + a[3] * t * t * t + a[4] * t * t * t * t
    }
}

/// A loaded chemistry mechanism, addressed by species name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mechanism {
    pub species: Vec<SpeciesRecord>,
}

impl Mechanism {
    /// Load from a YAML file. Both failure modes (I/O, schema) are fatal
    /// to the simulation that requested the mechanism and carry the path.
    pub fn from_yaml_file(path: &Path) -> SimResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| SimError::MechanismIo {
            path: path.to_path_buf(),
            source,
        })?;
        let mechanism: Mechanism =
            serde_yaml::from_str(&text).map_err(|source| SimError::MechanismParse {
                path: path.to_path_buf(),
                source,
            })?;
        mechanism.validate()?;
        tracing::debug!(
            path = %path.display(),
            species = mechanism.species.len(),
            "loaded mechanism"
        );
        Ok(mechanism)
    }

    pub fn from_records(species: Vec<SpeciesRecord>) -> SimResult<Self> {
        let mechanism = Self { species };
        mechanism.validate()?;
        Ok(mechanism)
    }

    fn validate(&self) -> SimResult<()> {
        if self.species.is_empty() {
            return Err(SimError::InvalidArg {
                what: "mechanism has no species",
            });
        }
        for record in &self.species {
            if !(record.molar_mass.is_finite() && record.molar_mass > 0.0) {
                return Err(SimError::NonPhysical {
                    what: "species molar mass must be positive and finite",
                });
            }
        }
        Ok(())
    }

    pub fn species(&self, name: &str) -> Option<&SpeciesRecord> {
        self.species.iter().find(|s| s.name == name)
    }
}

#[cfg(test)]
pub(crate) mod test_data {
    use super::*;

    /// N2/O2/Ar records with standard NASA-7 data, shared across the
    /// crate's tests.
    pub fn air_mechanism() -> Mechanism {
        Mechanism::from_records(vec![
            SpeciesRecord {
                name: "N2".into(),
                molar_mass: 28.0134,
                t_mid: 1000.0,
                a_low: [
                    3.298677,
                    1.4082404e-3,
                    -3.963222e-6,
                    5.641515e-9,
                    -2.444854e-12,
                    -1020.8999,
                    3.950372,
                ],
                a_high: [
                    2.92664,
                    1.4879768e-3,
                    -5.68476e-7,
                    1.0097038e-10,
                    -6.753351e-15,
                    -922.7977,
                    5.980528,
                ],
            },
            SpeciesRecord {
                name: "O2".into(),
                molar_mass: 31.9988,
                t_mid: 1000.0,
                a_low: [
                    3.212936,
                    1.1274864e-3,
                    -5.75615e-7,
                    1.3138773e-9,
                    -8.768554e-13,
                    -1005.249,
                    6.034738,
                ],
                a_high: [
                    3.697578,
                    6.135197e-4,
                    -1.258842e-7,
                    1.775281e-11,
                    -1.1364354e-15,
                    -1233.9301,
                    3.189166,
                ],
            },
            SpeciesRecord {
                name: "Ar".into(),
                molar_mass: 39.948,
                t_mid: 1000.0,
                a_low: [2.5, 0.0, 0.0, 0.0, 0.0, -745.375, 4.366],
                a_high: [2.5, 0.0, 0.0, 0.0, 0.0, -745.375, 4.366],
            },
        ])
        .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcm_core::{Tolerances, nearly_equal};

    #[test]
    fn nitrogen_cp_near_room_temperature() {
        let mechanism = test_data::air_mechanism();
        let n2 = mechanism.species("N2").unwrap();
        // Diatomic gas near 300 K: cp/R about 7/2.
        let tol = Tolerances {
            abs: 0.02,
            rel: 0.01,
        };
        assert!(nearly_equal(n2.cp_over_r(300.0), 3.5, tol));
    }

    #[test]
    fn argon_cp_is_monatomic_everywhere() {
        let mechanism = test_data::air_mechanism();
        let ar = mechanism.species("Ar").unwrap();
        assert_eq!(ar.cp_over_r(300.0), 2.5);
        assert_eq!(ar.cp_over_r(1500.0), 2.5);
    }

    #[test]
    fn unknown_species_is_none() {
        let mechanism = test_data::air_mechanism();
        assert!(mechanism.species("XeF6").is_none());
    }

    #[test]
    fn rejects_empty_mechanism() {
        assert!(matches!(
            Mechanism::from_records(vec![]),
            Err(SimError::InvalidArg { .. })
        ));
    }

    #[test]
    fn yaml_round_trip() {
        let mechanism = test_data::air_mechanism();
        let text = serde_yaml::to_string(&mechanism).unwrap();
        let back: Mechanism = serde_yaml::from_str(&text).unwrap();
        assert_eq!(back.species.len(), 3);
        assert_eq!(back.species("Ar").unwrap().molar_mass, 39.948);
    }
}
