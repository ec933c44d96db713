// rcm-core/src/units.rs

use uom::si::f64::{
    Pressure as UomPressure, ThermodynamicTemperature as UomThermodynamicTemperature,
    Time as UomTime,
};

// Public canonical unit types (SI, f64)
pub type Pressure = UomPressure;
pub type Temperature = UomThermodynamicTemperature;
pub type Time = UomTime;

/// One standard atmosphere in bar.
pub const ONE_ATM_IN_BAR: f64 = 1.013_25;
/// One standard atmosphere in Torr.
pub const ONE_ATM_IN_TORR: f64 = 760.0;
/// One bar in pascal.
pub const ONE_BAR_IN_PA: f64 = 1.0e5;
/// Universal gas constant [J/(mol K)].
pub const GAS_CONSTANT: f64 = 8.314_462_618_153_24;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn bar(v: f64) -> Pressure {
    use uom::si::pressure::bar;
    Pressure::new::<bar>(v)
}

/// Initial RCM fill pressures are recorded in Torr.
#[inline]
pub fn torr(v: f64) -> Pressure {
    bar(v * ONE_ATM_IN_BAR / ONE_ATM_IN_TORR)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

#[inline]
pub fn to_bar(p: Pressure) -> f64 {
    use uom::si::pressure::bar;
    p.get::<bar>()
}

#[inline]
pub fn to_pa(p: Pressure) -> f64 {
    use uom::si::pressure::pascal;
    p.get::<pascal>()
}

#[inline]
pub fn to_kelvin(t: Temperature) -> f64 {
    use uom::si::thermodynamic_temperature::kelvin;
    t.get::<kelvin>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::{Tolerances, nearly_equal};

    #[test]
    fn constructors_smoke() {
        let _p = pa(101_325.0);
        let _b = bar(1.5);
        let _t = k(300.0);
        let _dt = s(0.1);
    }

    #[test]
    fn torr_round_trip() {
        let tol = Tolerances::default();
        // 760 Torr is one atmosphere
        assert!(nearly_equal(to_bar(torr(760.0)), ONE_ATM_IN_BAR, tol));
        // and one bar is 1e5 Pa
        assert!(nearly_equal(to_pa(bar(1.0)), ONE_BAR_IN_PA, tol));
    }
}
