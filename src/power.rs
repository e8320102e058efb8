//! Power modes and output data rates
//!
//! The MSA301 leaves the factory in **suspend** mode, which produces no
//! samples. Switch to [`PowerMode::Normal`] (or pass it in
//! [`Msa301Config`](crate::Msa301Config)) before reading acceleration.
//!
//! # Example
//!
//! ```ignore
//! # use msa301::{Msa301Driver, PowerMode, OutputDataRate};
//! # let mut accel: Msa301Driver<_> = todo!();
//! accel.set_power_mode(PowerMode::Normal)?;
//! accel.set_output_data_rate(OutputDataRate::Ms8)?;
//! # Ok::<(), msa301::Error<()>>(())
//! ```

use crate::registers::{FieldValue, ValidationError};

/// Power mode selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerMode {
    /// Continuous measurement at the normal-power output data rate
    Normal,
    /// Duty-cycled measurement at the low-power output data rate
    LowPower,
    /// No measurement, registers stay accessible (factory default)
    Suspend,
}

impl FieldValue for PowerMode {
    const NAME: &'static str = "power_mode";
    const WIDTH: u32 = 2;
    const DOMAIN: &'static str = "Normal, LowPower, Suspend";
    const TABLE: &'static [(Self, u8)] = &[
        (Self::Normal, 0b00),
        (Self::LowPower, 0b01),
        (Self::Suspend, 0b10),
    ];

    fn decode(code: u8) -> Option<Self> {
        // 0b11 is also suspend
        match code {
            0b00 => Some(Self::Normal),
            0b01 => Some(Self::LowPower),
            _ => Some(Self::Suspend),
        }
    }
}

impl core::str::FromStr for PowerMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Normal" => Ok(Self::Normal),
            "LowPower" | "LowPwr" => Ok(Self::LowPower),
            "Suspend" | "Suspnd" => Ok(Self::Suspend),
            _ => Err(ValidationError::new(Self::NAME, Self::DOMAIN)),
        }
    }
}

/// Output data rate in normal power mode, named by sample period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub enum OutputDataRate {
    Ms1,
    Ms2,
    Ms4,
    Ms8,
    Ms16,
    Ms32,
    Ms64,
    Ms128,
    Ms256,
    Ms512,
    Ms1024,
}

impl OutputDataRate {
    /// Sample period in milliseconds
    #[must_use]
    pub const fn period_ms(self) -> u16 {
        match self {
            Self::Ms1 => 1,
            Self::Ms2 => 2,
            Self::Ms4 => 4,
            Self::Ms8 => 8,
            Self::Ms16 => 16,
            Self::Ms32 => 32,
            Self::Ms64 => 64,
            Self::Ms128 => 128,
            Self::Ms256 => 256,
            Self::Ms512 => 512,
            Self::Ms1024 => 1024,
        }
    }

    /// Nominal sample rate in Hz
    #[must_use]
    pub fn rate_hz(self) -> f32 {
        1000.0 / f32::from(self.period_ms())
    }
}

impl FieldValue for OutputDataRate {
    const NAME: &'static str = "output_data_rate";
    const WIDTH: u32 = 4;
    const DOMAIN: &'static str = "1, 2, 4, 8, 16, 32, 64, 128, 256, 512, 1024 (ms)";
    const TABLE: &'static [(Self, u8)] = &[
        (Self::Ms1, 0b1010),
        (Self::Ms2, 0b1001),
        (Self::Ms4, 0b1000),
        (Self::Ms8, 0b0111),
        (Self::Ms16, 0b0110),
        (Self::Ms32, 0b0101),
        (Self::Ms64, 0b0100),
        (Self::Ms128, 0b0011),
        (Self::Ms256, 0b0010),
        (Self::Ms512, 0b0001),
        (Self::Ms1024, 0b0000),
    ];

    fn decode(code: u8) -> Option<Self> {
        // Codes 0b1010..=0b1111 all select 1000 Hz
        let code = code.min(0b1010);
        Self::TABLE
            .iter()
            .find(|(_, c)| *c == code)
            .map(|&(value, _)| value)
    }
}

impl TryFrom<u16> for OutputDataRate {
    type Error = ValidationError;

    fn try_from(period_ms: u16) -> Result<Self, Self::Error> {
        Self::TABLE
            .iter()
            .map(|&(value, _)| value)
            .find(|value| value.period_ms() == period_ms)
            .ok_or(ValidationError::new(Self::NAME, Self::DOMAIN))
    }
}

/// Output data rate in low-power mode, named by sample period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub enum LowPowerOutputDataRate {
    Ms2,
    Ms4,
    Ms8,
    Ms16,
    Ms32,
    Ms64,
    Ms128,
    Ms256,
    Ms512,
}

impl LowPowerOutputDataRate {
    /// Sample period in milliseconds
    #[must_use]
    pub const fn period_ms(self) -> u16 {
        match self {
            Self::Ms2 => 2,
            Self::Ms4 => 4,
            Self::Ms8 => 8,
            Self::Ms16 => 16,
            Self::Ms32 => 32,
            Self::Ms64 => 64,
            Self::Ms128 => 128,
            Self::Ms256 => 256,
            Self::Ms512 => 512,
        }
    }
}

impl FieldValue for LowPowerOutputDataRate {
    const NAME: &'static str = "low_power_output_data_rate";
    const WIDTH: u32 = 4;
    const DOMAIN: &'static str = "2, 4, 8, 16, 32, 64, 128, 256, 512 (ms)";
    const TABLE: &'static [(Self, u8)] = &[
        (Self::Ms512, 2),
        (Self::Ms256, 3),
        (Self::Ms128, 4),
        (Self::Ms64, 5),
        (Self::Ms32, 6),
        (Self::Ms16, 7),
        (Self::Ms8, 8),
        (Self::Ms4, 9),
        (Self::Ms2, 10),
    ];

    fn decode(code: u8) -> Option<Self> {
        // Bandwidth codes below 2 share the slowest rate, above 10 the fastest
        let code = code.clamp(2, 10);
        Self::TABLE
            .iter()
            .find(|(_, c)| *c == code)
            .map(|&(value, _)| value)
    }
}

impl TryFrom<u16> for LowPowerOutputDataRate {
    type Error = ValidationError;

    fn try_from(period_ms: u16) -> Result<Self, Self::Error> {
        Self::TABLE
            .iter()
            .map(|&(value, _)| value)
            .find(|value| value.period_ms() == period_ms)
            .ok_or(ValidationError::new(Self::NAME, Self::DOMAIN))
    }
}
