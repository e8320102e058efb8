//! Sphere-fit offset calibration
//!
//! Held still, an unbiased accelerometer reads a vector of length 1g in any
//! orientation, so samples from different orientations lie on a unit sphere
//! centered at the origin. A bias moves that center. Sampling four
//! orientations fixes the sphere, and its negated center is the offset to
//! apply.
//!
//! The run:
//! 1. **Configuring**: snapshot the current settings, then switch to 14-bit,
//!    ±2g, 1 ms, normal power, all axes plain, new-data interrupt on, zero
//!    hardware offsets.
//! 2. **Sampling** (×4): wait `settle_ms` for the user to reorient and hold
//!    still, then average 100 raw samples per axis.
//! 3. **Fitting**: solve for the sphere center and propagate the measurement
//!    uncertainty by perturbing each point toward the center.
//! 4. **Reporting**: build the [`CalibrationReport`] and flag axes that are
//!    imprecise or out of the hardware offset range.
//! 5. **Restoring**: reapply the snapshot. This runs even when an earlier
//!    stage failed.
//!
//! # Example
//!
//! ```ignore
//! # use msa301::{Msa301Driver, CalibrationStage, DEFAULT_SETTLE_MS};
//! # let mut accel: Msa301Driver<_> = todo!();
//! # let mut delay = todo!();
//! let report = accel.calibrate_offsets(&mut delay, DEFAULT_SETTLE_MS, |stage| {
//!     if let CalibrationStage::Sampling(i) = stage {
//!         // prompt: "change orientation and hold (step i + 1 of 4)"
//!     }
//! })?;
//!
//! if let Some(offsets) = report.hardware_offsets() {
//!     accel.set_offsets(&offsets)?;
//! }
//! # Ok::<(), msa301::Error<()>>(())
//! ```

use device_driver::RegisterInterface;
use embedded_hal::delay::DelayNs;

use crate::axes::{AxesConfig, AxesConfigUpdate};
use crate::device::{HardwareOffsets, Msa301Driver, OffsetsUpdate};
use crate::interrupt::InterruptEnableUpdate;
use crate::math::{DegenerateGeometry, Vector3, Welford, sphere_center};
use crate::power::{OutputDataRate, PowerMode};
use crate::registers::OFFSET_LSB_MG;
use crate::sensor::{Range, Resolution, Units};
use crate::Error;

/// Default time given to reorient the device before each sampling step
pub const DEFAULT_SETTLE_MS: u32 = 4000;

/// Raw samples averaged per orientation
const SAMPLES_PER_ORIENTATION: u32 = 100;

/// Step used for the numerical derivative of the center, in g
const PERTURBATION: f64 = 1e-4;

/// Hardware offset range in mg, `[min, max)`
const OFFSET_RANGE_MG: core::ops::Range<f64> = -500.0..500.0;

/// Calibration progress, reported to the observer at every transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrationStage {
    /// Not running (reported once the run has finished)
    Idle,
    /// Settings snapshot and calibration setup
    Configuring,
    /// About to sample orientation `n` (0-3); reorient the device now
    Sampling(u8),
    /// Solving for the sphere center
    Fitting,
    /// Building the report
    Reporting,
    /// Reapplying the saved settings
    Restoring,
}

/// Result of a calibration run
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationReport {
    /// Proposed offsets in mg (negated sphere center)
    pub offsets_mg: Vector3,
    /// Propagated uncertainty of the offsets in mg
    pub uncertainty_mg: Vector3,
    /// Standard deviation of the mean of each sampled point, in mg
    pub measurement_uncertainty_mg: [Vector3; 4],
    /// Geometry quality in `[0, 1)`, higher is better
    ///
    /// The fraction of random orientation sets that would calibrate less
    /// precisely than the one used.
    pub score: f64,
    /// How much the geometry magnifies measurement uncertainty
    pub magnification: f64,
    /// Axes whose uncertainty exceeds the 3.90625 mg hardware offset step
    pub imprecise_axes: [bool; 3],
    /// Axes whose offset falls outside the `[-500, 500)` mg hardware range
    pub out_of_range_axes: [bool; 3],
}

impl CalibrationReport {
    /// Fit the sphere through four sampled points and propagate uncertainty
    ///
    /// `points` are the mean readings in g, `variances` the per-axis variance
    /// of those means in g².
    ///
    /// # Errors
    ///
    /// Returns [`DegenerateGeometry`] if the points (or any of the perturbed
    /// point sets) do not define a sphere.
    pub fn from_samples(
        points: &[Vector3; 4],
        variances: &[Vector3; 4],
    ) -> Result<Self, DegenerateGeometry> {
        let center = sphere_center(points)?;

        let mut weighted = Vector3::ZERO;
        let mut unweighted = 0.0;
        for (i, variance) in variances.iter().enumerate() {
            let mut rotated: [Vector3; 4] = core::array::from_fn(|j| points[(j + i) % 4]);
            let direction = (center - rotated[0]).normalize().ok_or(DegenerateGeometry)?;
            let sigma = libm::sqrt(direction.powf(2.0).dot(*variance));

            rotated[0] += direction * PERTURBATION;
            let change = sphere_center(&rotated)? - center;

            unweighted += change.powf(2.0).sum();
            weighted += (change * (sigma / PERTURBATION)).powf(2.0);
        }

        let magnification = libm::sqrt(unweighted / 3.0) / PERTURBATION;
        if !magnification.is_finite() || magnification <= 0.0 {
            return Err(DegenerateGeometry);
        }
        let score = 1.0 - 2.0 / (magnification + 1.0 / magnification);

        let offsets_mg = center * -1000.0;
        let uncertainty_mg = weighted.map(libm::sqrt) * 1000.0;

        Ok(Self {
            offsets_mg,
            uncertainty_mg,
            measurement_uncertainty_mg: variances.map(|u| u.map(libm::sqrt) * 1000.0),
            score,
            magnification,
            imprecise_axes: uncertainty_mg.to_array().map(|u| u > OFFSET_LSB_MG),
            out_of_range_axes: offsets_mg.to_array().map(|o| !OFFSET_RANGE_MG.contains(&o)),
        })
    }

    /// No axis is less precise than the hardware offset step
    #[must_use]
    pub fn is_precise(&self) -> bool {
        !self.imprecise_axes.contains(&true)
    }

    /// Every offset fits the hardware offset registers
    #[must_use]
    pub fn fits_hardware(&self) -> bool {
        !self.out_of_range_axes.contains(&true)
    }

    /// Offsets ready for [`Msa301Driver::set_offsets`], if all fit the hardware
    #[must_use]
    pub fn hardware_offsets(&self) -> Option<OffsetsUpdate> {
        self.fits_hardware().then(|| {
            OffsetsUpdate::all(self.offsets_mg.x, self.offsets_mg.y, self.offsets_mg.z)
        })
    }
}

/// Settings touched by a calibration run
struct SettingsSnapshot {
    units: Units,
    resolution: Resolution,
    range: Range,
    sample_averaging: u32,
    new_data_int: bool,
    output_data_rate: OutputDataRate,
    axes: AxesConfig,
    power_mode: PowerMode,
    offsets: HardwareOffsets,
}

fn notify<F: FnMut(CalibrationStage)>(observer: &mut F, stage: CalibrationStage) {
    #[cfg(feature = "defmt")]
    defmt::debug!("Calibration stage: {}", stage);
    observer(stage);
}

impl<I> Msa301Driver<I>
where
    I: RegisterInterface<AddressType = u8>,
{
    /// Determine offset biases by fitting a sphere to four orientations
    ///
    /// The observer is told about every stage; on [`CalibrationStage::Sampling`]
    /// the device should be moved to a new orientation and held still for the
    /// next `settle_ms` plus the sampling time (100 samples at 1 kHz).
    /// Choose orientations that are as different as possible, e.g. three
    /// faces of a cube plus one corner.
    ///
    /// The returned offsets are not applied; see
    /// [`CalibrationReport::hardware_offsets`]. The driver settings in place
    /// before the call are restored in every case.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - [`Error::DegenerateGeometry`] if the orientations were coplanar
    /// - [`Error::DataReadyTimeout`] if a poll limit is set and exhausted
    /// - a bus error from sampling or from restoring the settings
    pub fn calibrate_offsets<D, F>(
        &mut self,
        delay: &mut D,
        settle_ms: u32,
        mut observer: F,
    ) -> Result<CalibrationReport, Error<I::Error>>
    where
        D: DelayNs,
        F: FnMut(CalibrationStage),
    {
        notify(&mut observer, CalibrationStage::Configuring);
        let snapshot = match self.snapshot_settings() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                notify(&mut observer, CalibrationStage::Idle);
                return Err(e);
            }
        };

        let outcome = self.run_calibration(delay, settle_ms, &mut observer);

        notify(&mut observer, CalibrationStage::Restoring);
        let restored = self.restore_settings(&snapshot);
        notify(&mut observer, CalibrationStage::Idle);

        let report = outcome?;
        restored?;
        Ok(report)
    }

    fn snapshot_settings(&mut self) -> Result<SettingsSnapshot, Error<I::Error>> {
        Ok(SettingsSnapshot {
            units: self.units(),
            resolution: self.resolution()?,
            range: self.range()?,
            sample_averaging: self.sample_averaging(),
            new_data_int: self.interrupt_enable()?.new_data,
            output_data_rate: self.output_data_rate()?,
            axes: self.axes_config()?,
            power_mode: self.power_mode()?,
            offsets: self.offsets()?,
        })
    }

    // Order matters: scale, units and averaging first, so the combined
    // factor is consistent before anything reads data again. Every step is
    // attempted; the first failure is returned at the end.
    fn restore_settings(&mut self, snapshot: &SettingsSnapshot) -> Result<(), Error<I::Error>> {
        let mut first_err = None;
        self.set_units(snapshot.units);
        let steps = [
            self.set_resolution(snapshot.resolution),
            self.set_range(snapshot.range),
            self.set_sample_averaging(snapshot.sample_averaging),
            self.update_interrupt_enable(&InterruptEnableUpdate {
                new_data: Some(snapshot.new_data_int),
                ..Default::default()
            }),
            self.set_output_data_rate(snapshot.output_data_rate),
            self.update_axes_config(&AxesConfigUpdate::from(snapshot.axes)),
            self.set_power_mode(snapshot.power_mode),
            self.set_offsets(&OffsetsUpdate::from(snapshot.offsets)),
        ];
        for result in steps {
            if let Err(e) = result {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    fn apply_calibration_settings(&mut self) -> Result<(), Error<I::Error>> {
        self.set_resolution(Resolution::Bits14)?;
        self.set_range(Range::G2)?;
        self.set_units(Units::G);
        self.set_sample_averaging(1)?;
        self.set_output_data_rate(OutputDataRate::Ms1)?;
        self.set_power_mode(PowerMode::Normal)?;
        self.update_axes_config(&AxesConfigUpdate::identity())?;
        self.update_interrupt_enable(&InterruptEnableUpdate {
            new_data: Some(true),
            ..Default::default()
        })?;
        self.set_offsets(&OffsetsUpdate::all(0.0, 0.0, 0.0))
    }

    fn run_calibration<D, F>(
        &mut self,
        delay: &mut D,
        settle_ms: u32,
        observer: &mut F,
    ) -> Result<CalibrationReport, Error<I::Error>>
    where
        D: DelayNs,
        F: FnMut(CalibrationStage),
    {
        self.apply_calibration_settings()?;
        let factor = self.combined_factor();

        let mut points = [Vector3::ZERO; 4];
        let mut variances = [Vector3::ZERO; 4];
        for (step, (point, variance)) in (0u8..).zip(points.iter_mut().zip(variances.iter_mut())) {
            notify(observer, CalibrationStage::Sampling(step));
            delay.delay_ms(settle_ms);

            let mut stats = [Welford::new(); 3];
            for _ in 0..SAMPLES_PER_ORIENTATION {
                self.wait_for_data()?;
                let raw = self.read_raw()?;
                for (axis, value) in stats.iter_mut().zip([raw.x, raw.y, raw.z]) {
                    axis.update(f64::from(value));
                }
            }

            *point = Vector3::from(stats.map(|s| s.mean().unwrap_or_default())) * factor;
            *variance = Vector3::from(stats.map(|s| s.variance_of_mean().unwrap_or_default()))
                * (factor * factor);
        }

        notify(observer, CalibrationStage::Fitting);
        let report =
            CalibrationReport::from_samples(&points, &variances).map_err(|_| Error::DegenerateGeometry)?;

        notify(observer, CalibrationStage::Reporting);
        #[cfg(feature = "defmt")]
        {
            defmt::info!(
                "Calibration offsets (mg): {}, {}, {}; score {}",
                report.offsets_mg.x,
                report.offsets_mg.y,
                report.offsets_mg.z,
                report.score
            );
            if !report.is_precise() {
                defmt::warn!(
                    "Calibration uncertainty exceeds the 3.90625 mg offset step: {}",
                    report.imprecise_axes
                );
            }
            if !report.fits_hardware() {
                defmt::warn!(
                    "Offset out of the hardware range [-500, 500) mg: {}",
                    report.out_of_range_axes
                );
            }
        }

        Ok(report)
    }
}
