//! High-level driver API for the MSA301
//!
//! This module provides typed accessors over every documented register field,
//! the averaged acceleration read, and status queries. Register access goes
//! through the device generated in [`registers`](crate::registers); only the
//! six-byte output burst talks to the [`RegisterInterface`] directly, so the
//! same driver runs on the bundled [`I2cInterface`](crate::I2cInterface) or
//! on a mock in tests.

use device_driver::RegisterInterface;

use crate::axes::{AxesConfig, AxesConfigUpdate};
use crate::interrupt::{
    InterruptEnable, InterruptEnableUpdate, InterruptLatch, InterruptMap, InterruptMapUpdate,
    InterruptPinConfig, InterruptPinUpdate, MotionInterruptStatus, Orientation,
    OrientationStatus, TapActivityStatus,
};
use crate::motion::{
    FallMode, OrientMode, TapDuration, TapQuietDuration, TapShockDuration, ZBlockMode,
};
use crate::power::{LowPowerOutputDataRate, OutputDataRate, PowerMode};
use crate::registers::{
    FieldValue, Msa301 as RegisterDevice, OFFSET_LSB_MG, REG_ACC_X_LSB, ValidationError,
};
use crate::sensor::{Range, Resolution, Units};
use crate::{Error, PART_ID};

/// Length of the X/Y/Z output burst
const OUTPUT_BLOCK_LEN: usize = 6;

/// Freefall threshold resolution in mg per LSB
const FALL_THRESHOLD_LSB_MG: f64 = 7.8125;
/// Freefall hysteresis resolution in mg per LSB
const FALL_HYSTERESIS_LSB_MG: u16 = 125;
/// Orientation hysteresis and z-block threshold resolution in mg per LSB
const ORIENT_LSB_MG: f64 = 62.5;

/// Accelerometer data (raw 16-bit values)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccelData {
    /// X-axis acceleration (raw)
    pub x: i16,
    /// Y-axis acceleration (raw)
    pub y: i16,
    /// Z-axis acceleration (raw)
    pub z: i16,
}

impl AccelData {
    fn from_le_bytes(buf: &[u8; OUTPUT_BLOCK_LEN]) -> Self {
        Self {
            x: i16::from_le_bytes([buf[0], buf[1]]),
            y: i16::from_le_bytes([buf[2], buf[3]]),
            z: i16::from_le_bytes([buf[4], buf[5]]),
        }
    }
}

/// Acceleration in the configured [`Units`]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Acceleration {
    /// X-axis acceleration
    pub x: f64,
    /// Y-axis acceleration
    pub y: f64,
    /// Z-axis acceleration
    pub z: f64,
}

impl From<Acceleration> for crate::math::Vector3 {
    fn from(a: Acceleration) -> Self {
        Self::new(a.x, a.y, a.z)
    }
}

/// Hardware offset compensation, in mg
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HardwareOffsets {
    /// X-axis offset (mg)
    pub x: f64,
    /// Y-axis offset (mg)
    pub y: f64,
    /// Z-axis offset (mg)
    pub z: f64,
}

/// Sparse update of the hardware offsets, in mg
///
/// Each supplied value must lie in `[-500, 500)` mg. It is truncated toward
/// zero to the 3.90625 mg register resolution.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OffsetsUpdate {
    /// New X-axis offset (mg)
    pub x: Option<f64>,
    /// New Y-axis offset (mg)
    pub y: Option<f64>,
    /// New Z-axis offset (mg)
    pub z: Option<f64>,
}

impl OffsetsUpdate {
    /// Update all three axes
    #[must_use]
    pub const fn all(x: f64, y: f64, z: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            z: Some(z),
        }
    }

    /// `true` when no axis is addressed
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.z.is_none()
    }
}

impl From<HardwareOffsets> for OffsetsUpdate {
    fn from(offsets: HardwareOffsets) -> Self {
        Self::all(offsets.x, offsets.y, offsets.z)
    }
}

/// Driver configuration applied at construction
///
/// Hardware settings left as `None` are not touched, so constructing a
/// driver against an already configured device keeps its configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Msa301Config {
    /// Output unit of [`Msa301Driver::acceleration`]
    pub units: Units,
    /// Raw samples averaged per acceleration read (at least 1)
    pub sample_averaging: u32,
    /// Maximum unsuccessful data-ready polls before giving up
    ///
    /// `None` waits forever: a device that stops producing samples (e.g.
    /// switched to suspend) then blocks [`acceleration`](Msa301Driver::acceleration)
    /// indefinitely.
    pub data_ready_poll_limit: Option<u32>,
    /// Initial power mode
    pub power_mode: Option<PowerMode>,
    /// Initial resolution
    pub resolution: Option<Resolution>,
    /// Initial full-scale range
    pub range: Option<Range>,
    /// Initial normal-mode output data rate
    pub output_data_rate: Option<OutputDataRate>,
}

impl Default for Msa301Config {
    fn default() -> Self {
        Self {
            units: Units::G,
            sample_averaging: 1,
            data_ready_poll_limit: None,
            power_mode: None,
            resolution: None,
            range: None,
            output_data_rate: None,
        }
    }
}

/// Main driver for the MSA301
pub struct Msa301Driver<I> {
    device: RegisterDevice<I>,
    // Derived from the hardware range, mg per raw LSB
    scale_factor: f64,
    units: Units,
    sample_averaging: u32,
    // scale_factor * units.factor() / sample_averaging
    combined_factor: f64,
    // Mirror of INT_SET_1.new_data, avoids a read per sample
    new_data_int_enable: bool,
    data_ready_poll_limit: Option<u32>,
}

fn check_sample_averaging(value: u32) -> Result<(), ValidationError> {
    if value == 0 {
        return Err(ValidationError::new("sample_averaging", "integer >= 1"));
    }
    Ok(())
}

/// Fail unless `min <= value < max` (NaN always fails)
fn check_half_open(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
    domain: &'static str,
) -> Result<(), ValidationError> {
    if value >= min && value < max {
        Ok(())
    } else {
        Err(ValidationError::new(field, domain))
    }
}

/// Truncate a validated non-negative value into a register byte
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn truncate_u8(value: f64) -> u8 {
    value as u8
}

fn encode_offset(field: &'static str, mg: f64) -> Result<i8, ValidationError> {
    check_half_open(field, mg, -500.0, 500.0, "-500 <= mg < 500")?;
    #[allow(clippy::cast_possible_truncation)]
    Ok((mg / OFFSET_LSB_MG) as i8)
}

fn decode_offset(lsb: i8) -> f64 {
    f64::from(lsb) * OFFSET_LSB_MG
}

fn any_addressed(flags: &[Option<bool>]) -> bool {
    flags.iter().any(Option::is_some)
}

impl<I> Msa301Driver<I>
where
    I: RegisterInterface<AddressType = u8>,
{
    /// Create a new MSA301 driver with the default [`Msa301Config`]
    ///
    /// Verifies the `PART_ID` register and reads the current range and
    /// new-data interrupt setting, leaving the hardware untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Communication with the device fails
    /// - The `PART_ID` register contains an unexpected value
    pub fn new(interface: I) -> Result<Self, Error<I::Error>> {
        Self::with_config(interface, Msa301Config::default())
    }

    /// Create a new MSA301 driver and apply `config`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `config.sample_averaging` is zero (nothing is written)
    /// - Communication with the device fails
    /// - The `PART_ID` register contains an unexpected value
    pub fn with_config(interface: I, config: Msa301Config) -> Result<Self, Error<I::Error>> {
        check_sample_averaging(config.sample_averaging).map_err(Error::Validation)?;

        let mut driver = Self {
            device: RegisterDevice::new(interface),
            scale_factor: Range::G2.scale_factor(),
            units: config.units,
            sample_averaging: config.sample_averaging,
            combined_factor: 0.0,
            new_data_int_enable: false,
            data_ready_poll_limit: config.data_ready_poll_limit,
        };

        let part_id = driver.who_am_i()?;
        if part_id != PART_ID {
            #[cfg(feature = "defmt")]
            defmt::warn!("MSA301 not found: PART_ID = {=u8:#x}", part_id);
            return Err(Error::DeviceNotFound(part_id));
        }

        let range = driver.range()?;
        driver.scale_factor = range.scale_factor();
        driver.new_data_int_enable = driver.device.int_set_1().read()?.new_data();
        driver.update_combined_factor();

        if let Some(resolution) = config.resolution {
            driver.set_resolution(resolution)?;
        }
        if let Some(range) = config.range {
            driver.set_range(range)?;
        }
        if let Some(odr) = config.output_data_rate {
            driver.set_output_data_rate(odr)?;
        }
        if let Some(mode) = config.power_mode {
            driver.set_power_mode(mode)?;
        }

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "MSA301 ready: range={}, new_data_int={}",
            range,
            driver.new_data_int_enable
        );

        Ok(driver)
    }

    /// Consume the driver and return the interface
    pub fn release(self) -> I {
        self.device.interface
    }

    /// Get a reference to the underlying register device (for advanced usage)
    pub const fn device(&self) -> &RegisterDevice<I> {
        &self.device
    }

    /// Get a mutable reference to the underlying register device (for advanced usage)
    ///
    /// Writes made through it bypass the cached range and new-data state.
    pub const fn device_mut(&mut self) -> &mut RegisterDevice<I> {
        &mut self.device
    }

    fn encode<T: FieldValue>(value: T) -> Result<u8, Error<I::Error>> {
        value.encode().map_err(Error::Validation)
    }

    fn decode<T: FieldValue>(code: u8) -> Result<T, Error<I::Error>> {
        T::decode(code).ok_or(Error::UnrecognizedFieldValue {
            field: T::NAME,
            bits: code,
        })
    }

    fn update_combined_factor(&mut self) {
        self.combined_factor =
            self.scale_factor * self.units.factor() / f64::from(self.sample_averaging);
    }

    // Factory defaults: range 2g, new-data interrupt off
    fn reset_cached_state(&mut self) {
        self.scale_factor = Range::G2.scale_factor();
        self.new_data_int_enable = false;
        self.update_combined_factor();
    }

    // ==================== Identity and reset ====================

    /// Read the `PART_ID` register (0x13 for a genuine MSA301)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn who_am_i(&mut self) -> Result<u8, Error<I::Error>> {
        Ok(self.device.part_id().read()?.part_id())
    }

    /// Trigger a soft reset
    ///
    /// The device returns to its factory state; cached range and new-data
    /// interrupt state are reset accordingly.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn soft_reset(&mut self) -> Result<(), Error<I::Error>> {
        self.device.soft_reset().write(|w| w.set_soft_reset(true))?;
        self.reset_cached_state();
        #[cfg(feature = "defmt")]
        defmt::info!("MSA301 soft reset");
        Ok(())
    }

    /// Write the factory default of every read/write register
    ///
    /// Read-only registers are not touched. Driver-side settings (units,
    /// averaging, poll limit) are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn reset_all_defaults(&mut self) -> Result<(), Error<I::Error>> {
        // A plain write starts from the register's reset value
        self.device.res_range().write(|_| ())?;
        self.device.odr_axis().write(|_| ())?;
        self.device.pwr_mode_bw().write(|_| ())?;
        self.device.swap_polarity().write(|_| ())?;
        self.device.int_set_0().write(|_| ())?;
        self.device.int_set_1().write(|_| ())?;
        self.device.int_map_0().write(|_| ())?;
        self.device.int_map_1().write(|_| ())?;
        self.device.int_config().write(|_| ())?;
        self.device.int_latch().write(|_| ())?;
        self.device.freefall_dur().write(|_| ())?;
        self.device.freefall_th().write(|_| ())?;
        self.device.freefall_hy().write(|_| ())?;
        self.device.active_dur().write(|_| ())?;
        self.device.active_th().write(|_| ())?;
        self.device.tap_dur().write(|_| ())?;
        self.device.tap_th().write(|_| ())?;
        self.device.orient_hy().write(|_| ())?;
        self.device.z_block().write(|_| ())?;
        self.device.offset_comp_x().write(|_| ())?;
        self.device.offset_comp_y().write(|_| ())?;
        self.device.offset_comp_z().write(|_| ())?;
        self.reset_cached_state();
        #[cfg(feature = "defmt")]
        defmt::info!("MSA301 registers restored to factory defaults");
        Ok(())
    }

    // ==================== Measurement settings ====================

    /// Get the measurement resolution
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn resolution(&mut self) -> Result<Resolution, Error<I::Error>> {
        Self::decode(self.device.res_range().read()?.resolution())
    }

    /// Set the measurement resolution
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_resolution(&mut self, resolution: Resolution) -> Result<(), Error<I::Error>> {
        let code = Self::encode(resolution)?;
        self.device.res_range().modify(|w| w.set_resolution(code))?;
        Ok(())
    }

    /// Get the full-scale range
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn range(&mut self) -> Result<Range, Error<I::Error>> {
        Self::decode(self.device.res_range().read()?.range())
    }

    /// Set the full-scale range and update the scale factor
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_range(&mut self, range: Range) -> Result<(), Error<I::Error>> {
        let code = Self::encode(range)?;
        self.device.res_range().modify(|w| w.set_range(code))?;
        self.scale_factor = range.scale_factor();
        self.update_combined_factor();
        Ok(())
    }

    /// Weight of one raw LSB in mg, derived from the range
    #[must_use]
    pub const fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Output unit of [`acceleration`](Self::acceleration)
    #[must_use]
    pub const fn units(&self) -> Units {
        self.units
    }

    /// Set the output unit
    pub fn set_units(&mut self, units: Units) {
        self.units = units;
        self.update_combined_factor();
    }

    /// Number of raw samples averaged per acceleration read
    #[must_use]
    pub const fn sample_averaging(&self) -> u32 {
        self.sample_averaging
    }

    /// Set the number of raw samples averaged per acceleration read
    ///
    /// # Errors
    ///
    /// Returns a validation error if `samples` is zero.
    pub fn set_sample_averaging(&mut self, samples: u32) -> Result<(), Error<I::Error>> {
        check_sample_averaging(samples).map_err(Error::Validation)?;
        self.sample_averaging = samples;
        self.update_combined_factor();
        Ok(())
    }

    /// Factor converting a raw sample sum into the output unit
    ///
    /// `scale_factor * units_factor / sample_averaging`
    #[must_use]
    pub const fn combined_factor(&self) -> f64 {
        self.combined_factor
    }

    /// Maximum unsuccessful data-ready polls, `None` for unbounded
    #[must_use]
    pub const fn data_ready_poll_limit(&self) -> Option<u32> {
        self.data_ready_poll_limit
    }

    /// Set the data-ready poll limit
    pub const fn set_data_ready_poll_limit(&mut self, limit: Option<u32>) {
        self.data_ready_poll_limit = limit;
    }

    // ==================== Power and data rate ====================

    /// Get the power mode
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn power_mode(&mut self) -> Result<PowerMode, Error<I::Error>> {
        Self::decode(self.device.pwr_mode_bw().read()?.power_mode())
    }

    /// Set the power mode
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_power_mode(&mut self, mode: PowerMode) -> Result<(), Error<I::Error>> {
        let code = Self::encode(mode)?;
        self.device.pwr_mode_bw().modify(|w| w.set_power_mode(code))?;
        Ok(())
    }

    /// Get the normal-mode output data rate
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn output_data_rate(&mut self) -> Result<OutputDataRate, Error<I::Error>> {
        Self::decode(self.device.odr_axis().read()?.odr())
    }

    /// Set the normal-mode output data rate
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_output_data_rate(&mut self, odr: OutputDataRate) -> Result<(), Error<I::Error>> {
        let code = Self::encode(odr)?;
        self.device.odr_axis().modify(|w| w.set_odr(code))?;
        Ok(())
    }

    /// Get the low-power output data rate
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn low_power_output_data_rate(
        &mut self,
    ) -> Result<LowPowerOutputDataRate, Error<I::Error>> {
        Self::decode(self.device.pwr_mode_bw().read()?.low_power_bw())
    }

    /// Set the low-power output data rate
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_low_power_output_data_rate(
        &mut self,
        odr: LowPowerOutputDataRate,
    ) -> Result<(), Error<I::Error>> {
        let code = Self::encode(odr)?;
        self.device.pwr_mode_bw().modify(|w| w.set_low_power_bw(code))?;
        Ok(())
    }

    // ==================== Interrupts ====================

    /// Get the interrupt latch mode
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn interrupt_latch(&mut self) -> Result<InterruptLatch, Error<I::Error>> {
        Self::decode(self.device.int_latch().read()?.latch())
    }

    /// Set the interrupt latch mode
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_interrupt_latch(&mut self, latch: InterruptLatch) -> Result<(), Error<I::Error>> {
        let code = Self::encode(latch)?;
        self.device.int_latch().modify(|w| w.set_latch(code))?;
        Ok(())
    }

    /// Clear all latched interrupts, keeping the latch mode
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn reset_latched_interrupts(&mut self) -> Result<(), Error<I::Error>> {
        self.device.int_latch().modify(|w| w.set_reset_int(true))?;
        Ok(())
    }

    /// Read which interrupt sources are enabled
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn interrupt_enable(&mut self) -> Result<InterruptEnable, Error<I::Error>> {
        let set_0 = self.device.int_set_0().read()?;
        let set_1 = self.device.int_set_1().read()?;

        Ok(InterruptEnable {
            orient: set_0.orient(),
            single_tap: set_0.single_tap(),
            double_tap: set_0.double_tap(),
            active_z: set_0.active_z(),
            active_y: set_0.active_y(),
            active_x: set_0.active_x(),
            new_data: set_1.new_data(),
            freefall: set_1.freefall(),
        })
    }

    /// Enable or disable interrupt sources; `None` fields are left untouched
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn update_interrupt_enable(
        &mut self,
        update: &InterruptEnableUpdate,
    ) -> Result<(), Error<I::Error>> {
        let values = update.values();
        if any_addressed(&values[..6]) {
            self.device.int_set_0().modify(|w| {
                if let Some(v) = update.orient {
                    w.set_orient(v);
                }
                if let Some(v) = update.single_tap {
                    w.set_single_tap(v);
                }
                if let Some(v) = update.double_tap {
                    w.set_double_tap(v);
                }
                if let Some(v) = update.active_z {
                    w.set_active_z(v);
                }
                if let Some(v) = update.active_y {
                    w.set_active_y(v);
                }
                if let Some(v) = update.active_x {
                    w.set_active_x(v);
                }
            })?;
        }
        if any_addressed(&values[6..]) {
            self.device.int_set_1().modify(|w| {
                if let Some(v) = update.new_data {
                    w.set_new_data(v);
                }
                if let Some(v) = update.freefall {
                    w.set_freefall(v);
                }
            })?;
        }

        if let Some(new_data) = update.new_data {
            self.new_data_int_enable = new_data;
        }
        Ok(())
    }

    /// Read which interrupt sources drive the INT pin
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn interrupt_map(&mut self) -> Result<InterruptMap, Error<I::Error>> {
        let map_0 = self.device.int_map_0().read()?;
        let map_1 = self.device.int_map_1().read()?;

        Ok(InterruptMap {
            orient: map_0.orient(),
            single_tap: map_0.single_tap(),
            double_tap: map_0.double_tap(),
            active: map_0.active(),
            freefall: map_0.freefall(),
            new_data: map_1.new_data(),
        })
    }

    /// Route interrupt sources to the INT pin; `None` fields are left untouched
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn update_interrupt_map(&mut self, update: &InterruptMapUpdate) -> Result<(), Error<I::Error>> {
        let values = update.values();
        if any_addressed(&values[..5]) {
            self.device.int_map_0().modify(|w| {
                if let Some(v) = update.orient {
                    w.set_orient(v);
                }
                if let Some(v) = update.single_tap {
                    w.set_single_tap(v);
                }
                if let Some(v) = update.double_tap {
                    w.set_double_tap(v);
                }
                if let Some(v) = update.active {
                    w.set_active(v);
                }
                if let Some(v) = update.freefall {
                    w.set_freefall(v);
                }
            })?;
        }
        if let Some(v) = update.new_data {
            self.device.int_map_1().modify(|w| w.set_new_data(v))?;
        }
        Ok(())
    }

    /// Read the INT pin electrical configuration
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn interrupt_pin_config(&mut self) -> Result<InterruptPinConfig, Error<I::Error>> {
        let reg = self.device.int_config().read()?;
        Ok(InterruptPinConfig {
            open_drain: reg.open_drain(),
            active_high: reg.active_high(),
        })
    }

    /// Update the INT pin electrical configuration
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn update_interrupt_pin(&mut self, update: &InterruptPinUpdate) -> Result<(), Error<I::Error>> {
        if !any_addressed(&update.values()) {
            return Ok(());
        }
        self.device.int_config().modify(|w| {
            if let Some(v) = update.open_drain {
                w.set_open_drain(v);
            }
            if let Some(v) = update.active_high {
                w.set_active_high(v);
            }
        })?;
        Ok(())
    }

    /// Read the motion interrupt status
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn motion_interrupts(&mut self) -> Result<MotionInterruptStatus, Error<I::Error>> {
        let reg = self.device.motion_interrupt().read()?;
        Ok(MotionInterruptStatus {
            orient: reg.orient(),
            single_tap: reg.single_tap(),
            double_tap: reg.double_tap(),
            active: reg.active(),
            freefall: reg.freefall(),
        })
    }

    /// Read the tap and activity detail status
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn tap_activity_status(&mut self) -> Result<TapActivityStatus, Error<I::Error>> {
        let reg = self.device.tap_active_status().read()?;
        Ok(TapActivityStatus {
            tap_negative: reg.tap_sign(),
            tap_first_x: reg.tap_first_x(),
            tap_first_y: reg.tap_first_y(),
            tap_first_z: reg.tap_first_z(),
            active_negative: reg.active_sign(),
            active_first_x: reg.active_first_x(),
            active_first_y: reg.active_first_y(),
            active_first_z: reg.active_first_z(),
        })
    }

    /// Read the orientation status
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn orientation_status(&mut self) -> Result<OrientationStatus, Error<I::Error>> {
        let reg = self.device.orient_status().read()?;
        Ok(OrientationStatus {
            orientation: Orientation::from_ordinal(reg.orient()),
            z_downward: reg.z_down(),
        })
    }

    // ==================== Axes ====================

    /// Read the axis enable, polarity and swap configuration
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn axes_config(&mut self) -> Result<AxesConfig, Error<I::Error>> {
        let odr_axis = self.device.odr_axis().read()?;
        let swap = self.device.swap_polarity().read()?;

        Ok(AxesConfig {
            x_axis_disable: odr_axis.x_axis_disable(),
            y_axis_disable: odr_axis.y_axis_disable(),
            z_axis_disable: odr_axis.z_axis_disable(),
            x_axis_invert: swap.x_axis_invert(),
            y_axis_invert: swap.y_axis_invert(),
            z_axis_invert: swap.z_axis_invert(),
            xy_swap: swap.xy_swap(),
        })
    }

    /// Update the axis configuration; `None` fields are left untouched
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn update_axes_config(&mut self, update: &AxesConfigUpdate) -> Result<(), Error<I::Error>> {
        let values = update.values();
        if any_addressed(&values[..3]) {
            self.device.odr_axis().modify(|w| {
                if let Some(v) = update.x_axis_disable {
                    w.set_x_axis_disable(v);
                }
                if let Some(v) = update.y_axis_disable {
                    w.set_y_axis_disable(v);
                }
                if let Some(v) = update.z_axis_disable {
                    w.set_z_axis_disable(v);
                }
            })?;
        }
        if any_addressed(&values[3..]) {
            self.device.swap_polarity().modify(|w| {
                if let Some(v) = update.x_axis_invert {
                    w.set_x_axis_invert(v);
                }
                if let Some(v) = update.y_axis_invert {
                    w.set_y_axis_invert(v);
                }
                if let Some(v) = update.z_axis_invert {
                    w.set_z_axis_invert(v);
                }
                if let Some(v) = update.xy_swap {
                    w.set_xy_swap(v);
                }
            })?;
        }
        Ok(())
    }

    // ==================== Freefall ====================

    /// Get the freefall duration in ms
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn fall_duration(&mut self) -> Result<u16, Error<I::Error>> {
        let code = self.device.freefall_dur().read()?.duration();
        Ok((u16::from(code) + 1) * 2)
    }

    /// Set the freefall duration, `2 <= ms < 514`, in 2 ms steps
    ///
    /// # Errors
    ///
    /// Returns a validation error for an out-of-range value, or a bus error.
    pub fn set_fall_duration(&mut self, ms: u16) -> Result<(), Error<I::Error>> {
        let invalid = || Error::Validation(ValidationError::new("fall_duration", "2 <= ms < 514"));
        if !(2..514).contains(&ms) {
            return Err(invalid());
        }
        let code = u8::try_from(ms / 2 - 1).map_err(|_| invalid())?;
        self.device.freefall_dur().write(|w| w.set_duration(code))?;
        Ok(())
    }

    /// Get the freefall threshold in mg
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn fall_threshold(&mut self) -> Result<f64, Error<I::Error>> {
        let code = self.device.freefall_th().read()?.threshold();
        Ok(f64::from(code) * FALL_THRESHOLD_LSB_MG)
    }

    /// Set the freefall threshold, `0 <= mg < 2000`, in 7.8125 mg steps
    ///
    /// # Errors
    ///
    /// Returns a validation error for an out-of-range value, or a bus error.
    pub fn set_fall_threshold(&mut self, mg: f64) -> Result<(), Error<I::Error>> {
        check_half_open("fall_threshold", mg, 0.0, 2000.0, "0 <= mg < 2000")
            .map_err(Error::Validation)?;
        let code = truncate_u8(mg / FALL_THRESHOLD_LSB_MG);
        self.device.freefall_th().write(|w| w.set_threshold(code))?;
        Ok(())
    }

    /// Get the freefall hysteresis in mg
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn fall_hysteresis(&mut self) -> Result<u16, Error<I::Error>> {
        let code = self.device.freefall_hy().read()?.hysteresis();
        Ok(u16::from(code) * FALL_HYSTERESIS_LSB_MG)
    }

    /// Set the freefall hysteresis, one of 0, 125, 250 or 375 mg
    ///
    /// # Errors
    ///
    /// Returns a validation error for an out-of-range value, or a bus error.
    pub fn set_fall_hysteresis(&mut self, mg: u16) -> Result<(), Error<I::Error>> {
        let invalid =
            || Error::Validation(ValidationError::new("fall_hysteresis", "0, 125, 250, 375 (mg)"));
        if mg % FALL_HYSTERESIS_LSB_MG != 0 {
            return Err(invalid());
        }
        let code = u8::try_from(mg / FALL_HYSTERESIS_LSB_MG)
            .ok()
            .filter(|code| *code <= 3)
            .ok_or_else(invalid)?;
        self.device.freefall_hy().modify(|w| w.set_hysteresis(code))?;
        Ok(())
    }

    /// Get the freefall detection mode
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn fall_mode(&mut self) -> Result<FallMode, Error<I::Error>> {
        Self::decode(self.device.freefall_hy().read()?.mode())
    }

    /// Set the freefall detection mode
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_fall_mode(&mut self, mode: FallMode) -> Result<(), Error<I::Error>> {
        let code = Self::encode(mode)?;
        self.device.freefall_hy().modify(|w| w.set_mode(code))?;
        Ok(())
    }

    // ==================== Activity ====================

    /// Get the activity duration in ms
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn active_duration(&mut self) -> Result<u8, Error<I::Error>> {
        Ok(self.device.active_dur().read()?.duration() + 1)
    }

    /// Set the activity duration, `1..=4` ms
    ///
    /// # Errors
    ///
    /// Returns a validation error for an out-of-range value, or a bus error.
    pub fn set_active_duration(&mut self, ms: u8) -> Result<(), Error<I::Error>> {
        if !(1..=4).contains(&ms) {
            return Err(Error::Validation(ValidationError::new(
                "active_duration",
                "1, 2, 3, 4 (ms)",
            )));
        }
        self.device.active_dur().modify(|w| w.set_duration(ms - 1))?;
        Ok(())
    }

    /// Get the activity threshold as a fraction of the full-scale range
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn active_threshold(&mut self) -> Result<f64, Error<I::Error>> {
        let code = self.device.active_th().read()?.threshold();
        Ok(f64::from(code) / 512.0)
    }

    /// Set the activity threshold as a fraction of the range, `0 <= v < 0.5`
    ///
    /// # Errors
    ///
    /// Returns a validation error for an out-of-range value, or a bus error.
    pub fn set_active_threshold(&mut self, fraction: f64) -> Result<(), Error<I::Error>> {
        check_half_open("active_threshold", fraction, 0.0, 0.5, "0 <= fraction of range < 0.5")
            .map_err(Error::Validation)?;
        let code = truncate_u8(fraction * 512.0);
        self.device.active_th().write(|w| w.set_threshold(code))?;
        Ok(())
    }

    // ==================== Tap ====================

    /// Get the tap quiet duration
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn tap_quiet_duration(&mut self) -> Result<TapQuietDuration, Error<I::Error>> {
        Self::decode(self.device.tap_dur().read()?.quiet())
    }

    /// Set the tap quiet duration
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_tap_quiet_duration(&mut self, value: TapQuietDuration) -> Result<(), Error<I::Error>> {
        let code = Self::encode(value)?;
        self.device.tap_dur().modify(|w| w.set_quiet(code))?;
        Ok(())
    }

    /// Get the tap shock duration
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn tap_shock_duration(&mut self) -> Result<TapShockDuration, Error<I::Error>> {
        Self::decode(self.device.tap_dur().read()?.shock())
    }

    /// Set the tap shock duration
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_tap_shock_duration(&mut self, value: TapShockDuration) -> Result<(), Error<I::Error>> {
        let code = Self::encode(value)?;
        self.device.tap_dur().modify(|w| w.set_shock(code))?;
        Ok(())
    }

    /// Get the double-tap window
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn tap_duration(&mut self) -> Result<TapDuration, Error<I::Error>> {
        Self::decode(self.device.tap_dur().read()?.duration())
    }

    /// Set the double-tap window
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_tap_duration(&mut self, value: TapDuration) -> Result<(), Error<I::Error>> {
        let code = Self::encode(value)?;
        self.device.tap_dur().modify(|w| w.set_duration(code))?;
        Ok(())
    }

    /// Get the tap threshold as a fraction of the full-scale range
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn tap_threshold(&mut self) -> Result<f64, Error<I::Error>> {
        let code = self.device.tap_th().read()?.threshold();
        Ok(f64::from(code) / 32.0)
    }

    /// Set the tap threshold as a fraction of the range, `0 <= v < 1`
    ///
    /// # Errors
    ///
    /// Returns a validation error for an out-of-range value, or a bus error.
    pub fn set_tap_threshold(&mut self, fraction: f64) -> Result<(), Error<I::Error>> {
        check_half_open("tap_threshold", fraction, 0.0, 1.0, "0 <= fraction of range < 1")
            .map_err(Error::Validation)?;
        let code = truncate_u8(fraction * 32.0);
        self.device.tap_th().modify(|w| w.set_threshold(code))?;
        Ok(())
    }

    // ==================== Orientation ====================

    /// Get the orientation hysteresis in mg
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn orient_hysteresis(&mut self) -> Result<f64, Error<I::Error>> {
        let code = self.device.orient_hy().read()?.hysteresis();
        Ok(f64::from(code) * ORIENT_LSB_MG)
    }

    /// Set the orientation hysteresis, `0 <= mg < 500`, in 62.5 mg steps
    ///
    /// # Errors
    ///
    /// Returns a validation error for an out-of-range value, or a bus error.
    pub fn set_orient_hysteresis(&mut self, mg: f64) -> Result<(), Error<I::Error>> {
        check_half_open("orient_hysteresis", mg, 0.0, 500.0, "0 <= mg < 500")
            .map_err(Error::Validation)?;
        let code = truncate_u8(mg / ORIENT_LSB_MG);
        self.device.orient_hy().modify(|w| w.set_hysteresis(code))?;
        Ok(())
    }

    /// Get the orientation detection mode
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn orient_mode(&mut self) -> Result<OrientMode, Error<I::Error>> {
        Self::decode(self.device.orient_hy().read()?.mode())
    }

    /// Set the orientation detection mode
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_orient_mode(&mut self, mode: OrientMode) -> Result<(), Error<I::Error>> {
        let code = Self::encode(mode)?;
        self.device.orient_hy().modify(|w| w.set_mode(code))?;
        Ok(())
    }

    /// Get the z-blocking mode
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn z_block_mode(&mut self) -> Result<ZBlockMode, Error<I::Error>> {
        Self::decode(self.device.orient_hy().read()?.z_block_mode())
    }

    /// Set the z-blocking mode
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_z_block_mode(&mut self, mode: ZBlockMode) -> Result<(), Error<I::Error>> {
        let code = Self::encode(mode)?;
        self.device.orient_hy().modify(|w| w.set_z_block_mode(code))?;
        Ok(())
    }

    /// Get the z-blocking threshold in mg
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn z_block_threshold(&mut self) -> Result<f64, Error<I::Error>> {
        let code = self.device.z_block().read()?.threshold();
        Ok(f64::from(code) * ORIENT_LSB_MG)
    }

    /// Set the z-blocking threshold, `0 <= mg < 1000`, in 62.5 mg steps
    ///
    /// # Errors
    ///
    /// Returns a validation error for an out-of-range value, or a bus error.
    pub fn set_z_block_threshold(&mut self, mg: f64) -> Result<(), Error<I::Error>> {
        check_half_open("z_block_threshold", mg, 0.0, 1000.0, "0 <= mg < 1000")
            .map_err(Error::Validation)?;
        let code = truncate_u8(mg / ORIENT_LSB_MG);
        self.device.z_block().modify(|w| w.set_threshold(code))?;
        Ok(())
    }

    // ==================== Hardware offsets ====================

    /// Read the hardware offset compensation in mg
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn offsets(&mut self) -> Result<HardwareOffsets, Error<I::Error>> {
        Ok(HardwareOffsets {
            x: decode_offset(self.device.offset_comp_x().read()?.offset()),
            y: decode_offset(self.device.offset_comp_y().read()?.offset()),
            z: decode_offset(self.device.offset_comp_z().read()?.offset()),
        })
    }

    /// Update the hardware offset compensation
    ///
    /// Every supplied axis is validated before any register is written.
    ///
    /// # Errors
    ///
    /// Returns a validation error if any value is outside `[-500, 500)` mg,
    /// or a bus error.
    pub fn set_offsets(&mut self, update: &OffsetsUpdate) -> Result<(), Error<I::Error>> {
        let encode = |field, mg: Option<f64>| mg.map(|mg| encode_offset(field, mg)).transpose();
        let x = encode("x_offset", update.x).map_err(Error::Validation)?;
        let y = encode("y_offset", update.y).map_err(Error::Validation)?;
        let z = encode("z_offset", update.z).map_err(Error::Validation)?;

        if let Some(lsb) = x {
            self.device.offset_comp_x().write(|w| w.set_offset(lsb))?;
        }
        if let Some(lsb) = y {
            self.device.offset_comp_y().write(|w| w.set_offset(lsb))?;
        }
        if let Some(lsb) = z {
            self.device.offset_comp_z().write(|w| w.set_offset(lsb))?;
        }
        Ok(())
    }

    // ==================== Data ====================

    /// Check if a new sample is available
    ///
    /// Always `true` while the new-data interrupt is disabled, since the
    /// status bit is only maintained when it is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn new_data_ready(&mut self) -> Result<bool, Error<I::Error>> {
        if !self.new_data_int_enable {
            return Ok(true);
        }
        Ok(self.device.data_interrupt().read()?.new_data())
    }

    /// Block until [`new_data_ready`](Self::new_data_ready) holds
    ///
    /// Unbounded unless a poll limit is configured.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataReadyTimeout`] when the poll limit is exhausted,
    /// or a bus error.
    pub fn wait_for_data(&mut self) -> Result<(), Error<I::Error>> {
        let mut polls: u32 = 0;
        while !self.new_data_ready()? {
            polls = polls.saturating_add(1);
            if self.data_ready_poll_limit.is_some_and(|limit| polls >= limit) {
                #[cfg(feature = "defmt")]
                defmt::warn!("No new data after {} polls", polls);
                return Err(Error::DataReadyTimeout);
            }
        }
        Ok(())
    }

    /// Read one raw X/Y/Z sample without waiting for data-ready
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_raw(&mut self) -> Result<AccelData, Error<I::Error>> {
        // Read all 6 bytes in one burst to prevent torn samples
        let mut buf = [0u8; OUTPUT_BLOCK_LEN];
        self.device
            .interface
            .read_register(REG_ACC_X_LSB, 48, &mut buf)?;
        Ok(AccelData::from_le_bytes(&buf))
    }

    /// Read the acceleration in the configured units
    ///
    /// Sums [`sample_averaging`](Self::sample_averaging) raw samples, waiting
    /// for data-ready before each one, and scales the sum once by the
    /// combined factor.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails, or
    /// [`Error::DataReadyTimeout`] with a poll limit configured.
    pub fn acceleration(&mut self) -> Result<Acceleration, Error<I::Error>> {
        let mut sum = [0i64; 3];
        for _ in 0..self.sample_averaging {
            self.wait_for_data()?;
            let raw = self.read_raw()?;
            sum[0] += i64::from(raw.x);
            sum[1] += i64::from(raw.y);
            sum[2] += i64::from(raw.z);
        }

        #[allow(clippy::cast_precision_loss)]
        let [x, y, z] = sum.map(|s| s as f64 * self.combined_factor);
        Ok(Acceleration { x, y, z })
    }
}
