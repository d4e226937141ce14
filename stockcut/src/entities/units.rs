use std::fmt::Display;
use std::str::FromStr;

use crate::{CutError, Result};

/// Maximum number of decimals figures can be rounded to, the decimal digits an `f64` carries.
pub const MAX_PRECISION: u32 = f64::DIGITS;

/// Recognized length units
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum LengthUnit {
    /// Unitless lengths
    #[default]
    None,
    Millimeters,
    Centimeters,
    Meters,
    Kilometers,
    Inches,
    Feet,
    Miles,
    Yards,
    Nanometers,
    Micrometers,
}

impl LengthUnit {
    pub const ALL: [LengthUnit; 11] = [
        LengthUnit::None,
        LengthUnit::Millimeters,
        LengthUnit::Centimeters,
        LengthUnit::Meters,
        LengthUnit::Kilometers,
        LengthUnit::Inches,
        LengthUnit::Feet,
        LengthUnit::Miles,
        LengthUnit::Yards,
        LengthUnit::Nanometers,
        LengthUnit::Micrometers,
    ];

    /// Number of units in one meter. Unitless lengths are treated as meters.
    pub fn scale_factor(&self) -> f64 {
        match self {
            LengthUnit::None => 1.0,
            LengthUnit::Millimeters => 1000.0,
            LengthUnit::Centimeters => 100.0,
            LengthUnit::Meters => 1.0,
            LengthUnit::Kilometers => 0.001,
            LengthUnit::Inches => 39.3701,
            LengthUnit::Feet => 3.28084,
            LengthUnit::Miles => 0.000621371,
            LengthUnit::Yards => 1.09361,
            LengthUnit::Nanometers => 1e9,
            LengthUnit::Micrometers => 1e6,
        }
    }

    /// Suffix appended to figures expressed in this unit
    pub fn suffix(&self) -> &'static str {
        match self {
            LengthUnit::None => "",
            LengthUnit::Millimeters => "mm",
            LengthUnit::Centimeters => "cm",
            LengthUnit::Meters => "m",
            LengthUnit::Kilometers => "km",
            LengthUnit::Inches => "Inches",
            LengthUnit::Feet => "Feet",
            LengthUnit::Miles => "Miles",
            LengthUnit::Yards => "Yards",
            LengthUnit::Nanometers => "nm",
            LengthUnit::Micrometers => "um",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LengthUnit::None => "NONE",
            LengthUnit::Millimeters => "MILLIMETERS",
            LengthUnit::Centimeters => "CENTIMETERS",
            LengthUnit::Meters => "METERS",
            LengthUnit::Kilometers => "KILOMETERS",
            LengthUnit::Inches => "INCHES",
            LengthUnit::Feet => "FEET",
            LengthUnit::Miles => "MILES",
            LengthUnit::Yards => "YARDS",
            LengthUnit::Nanometers => "NANOMETERS",
            LengthUnit::Micrometers => "MICROMETERS",
        }
    }
}

impl FromStr for LengthUnit {
    type Err = CutError;

    fn from_str(s: &str) -> Result<Self> {
        LengthUnit::ALL
            .into_iter()
            .find(|unit| unit.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let names = LengthUnit::ALL.map(|u| u.name()).join(",");
                CutError::Configuration(format!(
                    "{s} is an invalid length unit. Must be one of {names}"
                ))
            })
    }
}

impl Display for LengthUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// How the figures of a [`Plan`](crate::entities::Plan) are presented when read.
/// Raw lengths are expressed in `source_unit`, reported figures in `target_unit`, rounded to `precision` decimals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct DisplayConfig {
    precision: u32,
    source_unit: LengthUnit,
    target_unit: LengthUnit,
}

impl DisplayConfig {
    pub fn new(precision: u32, source_unit: LengthUnit, target_unit: LengthUnit) -> Result<Self> {
        if precision > MAX_PRECISION {
            return Err(CutError::Configuration(format!(
                "precision {precision} exceeds the maximum of {MAX_PRECISION} decimals"
            )));
        }
        Ok(Self {
            precision,
            source_unit,
            target_unit,
        })
    }

    /// Parses the unit names, failing with [`CutError::Configuration`] on unrecognized names.
    pub fn parse(precision: u32, source_unit: &str, target_unit: &str) -> Result<Self> {
        DisplayConfig::new(precision, source_unit.parse()?, target_unit.parse()?)
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn source_unit(&self) -> LengthUnit {
        self.source_unit
    }

    pub fn target_unit(&self) -> LengthUnit {
        self.target_unit
    }

    /// Factor converting a raw length into the target unit
    pub fn scale_factor(&self) -> f64 {
        self.target_unit.scale_factor() / self.source_unit.scale_factor()
    }

    /// Converts a raw length into the target unit and rounds it to `precision` decimals.
    pub fn scale(&self, value: f64) -> f64 {
        round_to(value * self.scale_factor(), self.precision)
    }
}

/// Rounds half away from zero to the given number of decimals.
pub fn round_to(value: f64, precision: u32) -> f64 {
    let mult = 10f64.powi(precision as i32);
    let rounded = (value * mult).round() / mult;
    //avoid reporting "-0"
    if rounded == 0.0 { 0.0 } else { rounded }
}
