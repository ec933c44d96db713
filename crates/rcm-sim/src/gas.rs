//! Ideal-gas mixture built from mechanism data.

use crate::error::{SimError, SimResult};
use crate::mechanism::Mechanism;
use rcm_core::{GAS_CONSTANT, Real};
use rcm_thermo::{GammaFn, ThermoError, ThermoResult};

/// A gas mixture: mechanism species records paired with normalized mole
/// fractions. This is the gamma(T) source handed to the isentropic
/// transforms and the reactor.
#[derive(Debug, Clone)]
pub struct GasMixture {
    items: Vec<(usize, Real)>,
    mechanism: Mechanism,
}

impl GasMixture {
    /// Build from a composition mapping (species name -> mole fraction).
    ///
    /// Fractions must be finite and non-negative with a positive sum;
    /// they are normalized to sum to one. Species must exist in the
    /// mechanism.
    pub fn new(mechanism: &Mechanism, composition: &[(String, Real)]) -> SimResult<Self> {
        if composition.is_empty() {
            return Err(SimError::InvalidArg {
                what: "empty composition",
            });
        }

        let mut sum = 0.0;
        let mut items = Vec::with_capacity(composition.len());
        for (name, fraction) in composition {
            if !fraction.is_finite() || *fraction < 0.0 {
                return Err(SimError::NonPhysical {
                    what: "mole fractions must be finite and non-negative",
                });
            }
            let index = mechanism
                .species
                .iter()
                .position(|s| &s.name == name)
                .ok_or_else(|| SimError::UnknownSpecies { name: name.clone() })?;
            sum += fraction;
            items.push((index, *fraction));
        }
        if !(sum.is_finite() && sum > 0.0) {
            return Err(SimError::NonPhysical {
                what: "mole fractions sum to zero or non-finite",
            });
        }

        let items: Vec<(usize, Real)> = items
            .into_iter()
            .map(|(i, f)| (i, f / sum))
            .filter(|(_, f)| *f > 1e-15)
            .collect();

        Ok(Self {
            items,
            mechanism: mechanism.clone(),
        })
    }

    /// Mole fraction of a species (0.0 if not present).
    pub fn mole_fraction(&self, name: &str) -> Real {
        self.items
            .iter()
            .find(|(i, _)| self.mechanism.species[*i].name == name)
            .map(|(_, f)| *f)
            .unwrap_or(0.0)
    }

    /// Mixture molar mass [kg/kmol].
    pub fn molar_mass(&self) -> Real {
        self.items
            .iter()
            .map(|(i, f)| self.mechanism.species[*i].molar_mass * f)
            .sum()
    }

    /// Mixture molar heat capacity at constant pressure [J/(mol K)].
    pub fn cp_molar(&self, temperature_k: Real) -> ThermoResult<Real> {
        if !(temperature_k.is_finite() && temperature_k > 0.0) {
            return Err(ThermoError::InvalidArg {
                what: "temperature must be positive and finite",
            });
        }
        let cp_over_r: Real = self
            .items
            .iter()
            .map(|(i, f)| self.mechanism.species[*i].cp_over_r(temperature_k) * f)
            .sum();
        Ok(GAS_CONSTANT * cp_over_r)
    }
}

impl GammaFn for GasMixture {
    fn gamma(&self, temperature_k: Real) -> ThermoResult<Real> {
        let cp = self.cp_molar(temperature_k)?;
        let cv = cp - GAS_CONSTANT;
        if cv <= 0.0 {
            return Err(ThermoError::NonPhysical {
                what: "mixture cv must be positive",
            });
        }
        Ok(cp / cv)
    }
}
