//! Measurement settings: resolution, full-scale range and output units
//!
//! The MSA301 always delivers 16-bit left-justified samples; the range sets
//! the weight of one LSB (`range * 125 / 4096` mg) and the resolution only
//! controls how many of the low bits carry information.

use crate::registers::{FieldValue, ValidationError};

/// Measurement resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resolution {
    /// 8-bit samples
    Bits8,
    /// 10-bit samples
    Bits10,
    /// 12-bit samples
    Bits12,
    /// 14-bit samples (factory default)
    Bits14,
}

impl Resolution {
    /// Number of significant bits
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::Bits8 => 8,
            Self::Bits10 => 10,
            Self::Bits12 => 12,
            Self::Bits14 => 14,
        }
    }
}

impl FieldValue for Resolution {
    const NAME: &'static str = "resolution";
    const WIDTH: u32 = 2;
    const DOMAIN: &'static str = "8, 10, 12, 14 (bits)";
    const TABLE: &'static [(Self, u8)] = &[
        (Self::Bits8, 0b11),
        (Self::Bits10, 0b10),
        (Self::Bits12, 0b01),
        (Self::Bits14, 0b00),
    ];
}

impl TryFrom<u8> for Resolution {
    type Error = ValidationError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        match bits {
            8 => Ok(Self::Bits8),
            10 => Ok(Self::Bits10),
            12 => Ok(Self::Bits12),
            14 => Ok(Self::Bits14),
            _ => Err(ValidationError::new(Self::NAME, Self::DOMAIN)),
        }
    }
}

/// Full-scale measurement range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Range {
    /// ±2g (factory default)
    G2,
    /// ±4g
    G4,
    /// ±8g
    G8,
    /// ±16g
    G16,
}

impl Range {
    /// Full-scale value in g
    #[must_use]
    pub const fn g(self) -> u8 {
        match self {
            Self::G2 => 2,
            Self::G4 => 4,
            Self::G8 => 8,
            Self::G16 => 16,
        }
    }

    /// Weight of one raw LSB in mg
    ///
    /// `range * 125 / 4096`, e.g. 0.061 mg/LSB at ±2g.
    #[must_use]
    pub fn scale_factor(self) -> f64 {
        f64::from(self.g()) * 125.0 / 4096.0
    }
}

impl FieldValue for Range {
    const NAME: &'static str = "range";
    const WIDTH: u32 = 2;
    const DOMAIN: &'static str = "2, 4, 8, 16 (g)";
    const TABLE: &'static [(Self, u8)] = &[
        (Self::G2, 0b00),
        (Self::G4, 0b01),
        (Self::G8, 0b10),
        (Self::G16, 0b11),
    ];
}

impl TryFrom<u8> for Range {
    type Error = ValidationError;

    fn try_from(g: u8) -> Result<Self, Self::Error> {
        match g {
            2 => Ok(Self::G2),
            4 => Ok(Self::G4),
            8 => Ok(Self::G8),
            16 => Ok(Self::G16),
            _ => Err(ValidationError::new(Self::NAME, Self::DOMAIN)),
        }
    }
}

/// Output unit of acceleration readings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Units {
    /// Standard gravity (g)
    #[default]
    G,
    /// SI units (m/s²)
    Si,
}

impl Units {
    /// Factor converting mg into this unit
    #[must_use]
    pub const fn factor(self) -> f64 {
        match self {
            Self::G => 0.001,
            Self::Si => 0.009_806_65,
        }
    }
}

impl core::str::FromStr for Units {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "G" | "g" => Ok(Self::G),
            "SI" | "si" => Ok(Self::Si),
            _ => Err(ValidationError::new("units", "G, SI")),
        }
    }
}
