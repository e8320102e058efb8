//! Motion detection settings: freefall, tap and orientation
//!
//! Numeric thresholds and durations (freefall duration/threshold/hysteresis,
//! activity duration/threshold, tap threshold, orientation hysteresis and
//! z-block threshold) are plain numbers validated by the driver setters.
//! The symbolic settings below each carry a fixed register table.

use crate::registers::{FieldValue, ValidationError};

/// Freefall detection mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FallMode {
    /// Compare each axis against the threshold (factory default)
    Single,
    /// Compare `|x| + |y| + |z|` against the threshold
    Sum,
}

impl FieldValue for FallMode {
    const NAME: &'static str = "fall_mode";
    const WIDTH: u32 = 1;
    const DOMAIN: &'static str = "Single, Sum";
    const TABLE: &'static [(Self, u8)] = &[(Self::Single, 0), (Self::Sum, 1)];
}

/// Tap quiet duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TapQuietDuration {
    /// 20 ms
    Ms20,
    /// 30 ms (factory default)
    Ms30,
}

impl FieldValue for TapQuietDuration {
    const NAME: &'static str = "tap_quiet_duration";
    const WIDTH: u32 = 1;
    const DOMAIN: &'static str = "20, 30 (ms)";
    const TABLE: &'static [(Self, u8)] = &[(Self::Ms20, 1), (Self::Ms30, 0)];
}

impl TryFrom<u16> for TapQuietDuration {
    type Error = ValidationError;

    fn try_from(ms: u16) -> Result<Self, Self::Error> {
        match ms {
            20 => Ok(Self::Ms20),
            30 => Ok(Self::Ms30),
            _ => Err(ValidationError::new(Self::NAME, Self::DOMAIN)),
        }
    }
}

/// Tap shock duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TapShockDuration {
    /// 50 ms (factory default)
    Ms50,
    /// 70 ms
    Ms70,
}

impl FieldValue for TapShockDuration {
    const NAME: &'static str = "tap_shock_duration";
    const WIDTH: u32 = 1;
    const DOMAIN: &'static str = "50, 70 (ms)";
    const TABLE: &'static [(Self, u8)] = &[(Self::Ms50, 0), (Self::Ms70, 1)];
}

impl TryFrom<u16> for TapShockDuration {
    type Error = ValidationError;

    fn try_from(ms: u16) -> Result<Self, Self::Error> {
        match ms {
            50 => Ok(Self::Ms50),
            70 => Ok(Self::Ms70),
            _ => Err(ValidationError::new(Self::NAME, Self::DOMAIN)),
        }
    }
}

/// Window for the second tap of a double tap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub enum TapDuration {
    Ms50,
    Ms100,
    Ms150,
    Ms200,
    Ms250,
    Ms375,
    Ms500,
    Ms700,
}

impl TapDuration {
    /// Duration in milliseconds
    #[must_use]
    pub const fn ms(self) -> u16 {
        match self {
            Self::Ms50 => 50,
            Self::Ms100 => 100,
            Self::Ms150 => 150,
            Self::Ms200 => 200,
            Self::Ms250 => 250,
            Self::Ms375 => 375,
            Self::Ms500 => 500,
            Self::Ms700 => 700,
        }
    }
}

impl FieldValue for TapDuration {
    const NAME: &'static str = "tap_duration";
    const WIDTH: u32 = 3;
    const DOMAIN: &'static str = "50, 100, 150, 200, 250, 375, 500, 700 (ms)";
    const TABLE: &'static [(Self, u8)] = &[
        (Self::Ms50, 0b000),
        (Self::Ms100, 0b001),
        (Self::Ms150, 0b010),
        (Self::Ms200, 0b011),
        (Self::Ms250, 0b100),
        (Self::Ms375, 0b101),
        (Self::Ms500, 0b110),
        (Self::Ms700, 0b111),
    ];
}

impl TryFrom<u16> for TapDuration {
    type Error = ValidationError;

    fn try_from(ms: u16) -> Result<Self, Self::Error> {
        Self::TABLE
            .iter()
            .map(|&(value, _)| value)
            .find(|value| value.ms() == ms)
            .ok_or(ValidationError::new(Self::NAME, Self::DOMAIN))
    }
}

/// Z-axis blocking of orientation changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ZBlockMode {
    /// No blocking
    NoBlock,
    /// Block while |z| exceeds the z-block threshold
    ZAxis,
    /// Block on z-axis or when any axis slope exceeds 0.2g
    ZAxisOrSlope,
}

impl FieldValue for ZBlockMode {
    const NAME: &'static str = "z_block_mode";
    const WIDTH: u32 = 2;
    const DOMAIN: &'static str = "NoBlock, ZAxis, ZAxisOrSlope";
    const TABLE: &'static [(Self, u8)] = &[
        (Self::NoBlock, 0b00),
        (Self::ZAxis, 0b01),
        (Self::ZAxisOrSlope, 0b10),
    ];
}

/// Orientation detection mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OrientMode {
    /// Symmetrical
    Symmetric,
    /// High-asymmetrical
    HighAsymmetric,
    /// Low-asymmetrical
    LowAsymmetric,
}

impl FieldValue for OrientMode {
    const NAME: &'static str = "orient_mode";
    const WIDTH: u32 = 2;
    const DOMAIN: &'static str = "Symmetric, HighAsymmetric, LowAsymmetric";
    const TABLE: &'static [(Self, u8)] = &[
        (Self::Symmetric, 0b00),
        (Self::HighAsymmetric, 0b01),
        (Self::LowAsymmetric, 0b10),
    ];
}
