//! Experiment file-name parsing.
//!
//! Two name schemas are in use on the facility, distinguished by pattern:
//!
//! full:  `[NR_]SS_in_HH_mm_TTTK-PPPPt-FFFx-DD-Mon-YY-HHMM.txt`
//! short: `[NR_]TTTK-PPPPt-FFFx-DD-Mon-YY-HHMM.txt`
//!
//! where SS is tenths of inches of spacers, HH millimeters of shims,
//! TTT the initial temperature [K], PPPP the initial fill pressure
//! [Torr], FFF the charge-amplifier factor [bar/V], and the trailing
//! block the experiment timestamp. An `NR_` prefix marks a non-reactive
//! (inert charge) experiment.

use crate::error::{ProjectError, ProjectResult};
use chrono::NaiveDateTime;
use rcm_core::Real;

const TIMESTAMP_FORMAT: &str = "%d-%b-%y-%H%M";

/// Which naming schema a file matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameSchema {
    /// With spacer/shim geometry fields.
    Full,
    /// Conditions and timestamp only.
    Short,
}

/// Metadata parsed from an experiment file name.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentName {
    pub schema: NameSchema,
    pub non_reactive: bool,
    /// Spacer height [in]; full schema only.
    pub spacers_in: Option<Real>,
    /// Shim height [mm]; full schema only.
    pub shims_mm: Option<Real>,
    pub initial_temperature_k: Real,
    pub initial_pressure_torr: Real,
    /// Charge-amplifier scale [bar/V].
    pub amplifier_factor: Real,
    pub timestamp: NaiveDateTime,
    /// The name without directory or `.txt` extension.
    pub stem: String,
}

/// The shared `TTTK-PPPPt-FFFx-<timestamp>` block.
struct ConditionBlock {
    temperature_k: Real,
    pressure_torr: Real,
    factor: Real,
    timestamp: NaiveDateTime,
}

fn numeric_field(field: &str, suffix: char) -> Option<Real> {
    field.strip_suffix(suffix)?.parse::<Real>().ok()
}

fn parse_condition_block(block: &str) -> Option<ConditionBlock> {
    let mut fields = block.splitn(4, '-');
    let temperature_k = numeric_field(fields.next()?, 'K')?;
    let pressure_torr = numeric_field(fields.next()?, 't')?;
    let factor = numeric_field(fields.next()?, 'x')?;
    let timestamp = NaiveDateTime::parse_from_str(fields.next()?, TIMESTAMP_FORMAT).ok()?;
    Some(ConditionBlock {
        temperature_k,
        pressure_torr,
        factor,
        timestamp,
    })
}

impl ExperimentName {
    /// Parse a file name (with or without the `.txt` extension), trying
    /// the full schema first and the short schema second.
    pub fn parse(file_name: &str) -> ProjectResult<Self> {
        let stem = file_name.strip_suffix(".txt").unwrap_or(file_name);
        let (non_reactive, body) = match stem.strip_prefix("NR_") {
            Some(rest) => (true, rest),
            None => (false, stem),
        };

        let parsed = Self::parse_full(body).or_else(|| Self::parse_short(body));
        let Some((schema, spacers_in, shims_mm, block)) = parsed else {
            return Err(ProjectError::NameFormat {
                name: file_name.to_string(),
                reason: "matches neither the full nor the short schema",
            });
        };

        Ok(Self {
            schema,
            non_reactive,
            spacers_in,
            shims_mm,
            initial_temperature_k: block.temperature_k,
            initial_pressure_torr: block.pressure_torr,
            amplifier_factor: block.factor,
            timestamp: block.timestamp,
            stem: stem.to_string(),
        })
    }

    fn parse_full(body: &str) -> Option<(NameSchema, Option<Real>, Option<Real>, ConditionBlock)> {
        let parts: Vec<&str> = body.split('_').collect();
        let [spacers, "in", shims, "mm", rest] = parts.as_slice() else {
            return None;
        };
        // the spacer field is recorded in tenths of an inch
        let spacers_in = spacers.parse::<Real>().ok()? / 10.0;
        let shims_mm = shims.parse::<Real>().ok()?;
        let block = parse_condition_block(rest)?;
        Some((NameSchema::Full, Some(spacers_in), Some(shims_mm), block))
    }

    fn parse_short(body: &str) -> Option<(NameSchema, Option<Real>, Option<Real>, ConditionBlock)> {
        let block = parse_condition_block(body)?;
        Some((NameSchema::Short, None, None, block))
    }

    /// Rebuild the canonical file name (without extension).
    pub fn canonical(&self) -> String {
        let prefix = if self.non_reactive { "NR_" } else { "" };
        let block = format!(
            "{}K-{}t-{}x-{}",
            self.initial_temperature_k,
            self.initial_pressure_torr,
            self.amplifier_factor,
            self.timestamp.format(TIMESTAMP_FORMAT)
        );
        match self.schema {
            NameSchema::Full => format!(
                "{prefix}{:02}_in_{:02}_mm_{block}",
                (self.spacers_in.unwrap_or(0.0) * 10.0).round(),
                self.shims_mm.unwrap_or(0.0).round(),
            ),
            NameSchema::Short => format!("{prefix}{block}"),
        }
    }

    /// Compact label for logs and reports: date plus time of day.
    pub fn label(&self) -> String {
        self.timestamp.format("%d-%b-%H%M").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn parses_full_schema() {
        let name = ExperimentName::parse("00_in_02_mm_373K-1285t-100x-19-Jul-15-1633.txt").unwrap();
        assert_eq!(name.schema, NameSchema::Full);
        assert!(!name.non_reactive);
        assert_eq!(name.spacers_in, Some(0.0));
        assert_eq!(name.shims_mm, Some(2.0));
        assert_eq!(name.initial_temperature_k, 373.0);
        assert_eq!(name.initial_pressure_torr, 1285.0);
        assert_eq!(name.amplifier_factor, 100.0);
        assert_eq!(
            name.timestamp.date(),
            NaiveDate::from_ymd_opt(2015, 7, 19).unwrap()
        );
        assert_eq!(name.timestamp.time().hour(), 16);
        assert_eq!(name.timestamp.time().minute(), 33);
    }

    #[test]
    fn nr_prefix_marks_non_reactive() {
        let name =
            ExperimentName::parse("NR_00_in_02_mm_373K-1285t-100x-19-Jul-15-1633.txt").unwrap();
        assert!(name.non_reactive);
        assert_eq!(name.stem, "NR_00_in_02_mm_373K-1285t-100x-19-Jul-15-1633");
    }

    #[test]
    fn parses_short_schema() {
        let name = ExperimentName::parse("308K-0760t-375x-02-Feb-16-0941.txt").unwrap();
        assert_eq!(name.schema, NameSchema::Short);
        assert_eq!(name.spacers_in, None);
        assert_eq!(name.shims_mm, None);
        assert_eq!(name.initial_temperature_k, 308.0);
        assert_eq!(name.initial_pressure_torr, 760.0);
        assert_eq!(name.amplifier_factor, 375.0);
    }

    #[test]
    fn spacer_field_is_tenths_of_an_inch() {
        let name = ExperimentName::parse("15_in_00_mm_373K-1285t-100x-19-Jul-15-1633").unwrap();
        assert_eq!(name.spacers_in, Some(1.5));
    }

    #[test]
    fn malformed_names_yield_format_error() {
        for bad in [
            "notes.txt",
            "373K-1285t.txt",
            "00_in_02_mm_373X-1285t-100x-19-Jul-15-1633.txt",
            "00_in_02_mm_373K-1285t-100x-19-Jul-15.txt",
            "",
        ] {
            let err = ExperimentName::parse(bad).unwrap_err();
            assert!(
                matches!(err, ProjectError::NameFormat { .. }),
                "{bad:?} should fail as a format error"
            );
        }
    }

    #[test]
    fn canonical_round_trips_both_schemas() {
        for original in [
            "NR_00_in_02_mm_373K-1285t-100x-19-Jul-15-1633",
            "308K-760t-375x-02-Feb-16-0941",
        ] {
            let parsed = ExperimentName::parse(original).unwrap();
            let rebuilt = ExperimentName::parse(&parsed.canonical()).unwrap();
            assert_eq!(parsed.schema, rebuilt.schema);
            assert_eq!(parsed.non_reactive, rebuilt.non_reactive);
            assert_eq!(parsed.initial_pressure_torr, rebuilt.initial_pressure_torr);
            assert_eq!(parsed.timestamp, rebuilt.timestamp);
        }
    }
}
