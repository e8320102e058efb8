//! Software offset compensation
//!
//! An alternative to the hardware offset registers when a bias falls outside
//! their `[-500, 500)` mg range, or when finer than 3.90625 mg steps are
//! wanted. Base offsets (in mg, as measured with all axes plain) are kept in
//! an [`OffsetStore`] and adjusted to the current axis configuration:
//!
//! - a disabled axis gets no offset,
//! - an inverted axis gets its offset negated,
//! - with `xy_swap` the X and Y offsets trade places (after the two rules
//!   above).
//!
//! The persisted record is 12 bytes: three little-endian `f32` (x, y, z mg).

use device_driver::RegisterInterface;

use crate::axes::AxesConfig;
use crate::device::{Acceleration, Msa301Driver};
use crate::math::Vector3;
use crate::sensor::Units;
use crate::Error;

/// Size of an encoded offset record
pub const OFFSET_RECORD_LEN: usize = 12;

/// Encode base offsets (mg) as a little-endian `f32` triple
#[must_use]
pub fn encode_offset_record(offsets: &[f32; 3]) -> [u8; OFFSET_RECORD_LEN] {
    let mut record = [0u8; OFFSET_RECORD_LEN];
    for (chunk, value) in record.chunks_exact_mut(4).zip(offsets) {
        chunk.copy_from_slice(&value.to_le_bytes());
    }
    record
}

/// Decode a record written by [`encode_offset_record`]
///
/// Returns `None` unless `bytes` is exactly [`OFFSET_RECORD_LEN`] long.
#[must_use]
pub fn decode_offset_record(bytes: &[u8]) -> Option<[f32; 3]> {
    if bytes.len() != OFFSET_RECORD_LEN {
        return None;
    }
    let mut offsets = [0.0f32; 3];
    for (value, chunk) in offsets.iter_mut().zip(bytes.chunks_exact(4)) {
        *value = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    Some(offsets)
}

/// Persistence for base offsets
pub trait OffsetStore {
    /// Storage error type
    type Error;

    /// Load the stored offsets, `None` if nothing was stored yet
    ///
    /// # Errors
    ///
    /// Returns the storage error if the record exists but cannot be read.
    fn load(&mut self) -> Result<Option<[f32; 3]>, Self::Error>;

    /// Replace the stored offsets
    ///
    /// # Errors
    ///
    /// Returns the storage error if the record cannot be written.
    fn store(&mut self, offsets: &[f32; 3]) -> Result<(), Self::Error>;
}

/// Offset store kept in RAM
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MemoryOffsetStore {
    record: Option<[u8; OFFSET_RECORD_LEN]>,
}

impl MemoryOffsetStore {
    /// Empty store
    #[must_use]
    pub const fn new() -> Self {
        Self { record: None }
    }

    /// Raw record as it would be written to non-volatile memory
    #[must_use]
    pub const fn record(&self) -> Option<&[u8; OFFSET_RECORD_LEN]> {
        self.record.as_ref()
    }
}

impl OffsetStore for MemoryOffsetStore {
    type Error = core::convert::Infallible;

    fn load(&mut self) -> Result<Option<[f32; 3]>, Self::Error> {
        Ok(self.record.as_ref().and_then(|r| decode_offset_record(r)))
    }

    fn store(&mut self, offsets: &[f32; 3]) -> Result<(), Self::Error> {
        self.record = Some(encode_offset_record(offsets));
        Ok(())
    }
}

/// Offset store backed by a file
///
/// A missing file loads as "no offsets"; a file of the wrong size is
/// reported as [`std::io::ErrorKind::InvalidData`].
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct FileOffsetStore {
    path: std::path::PathBuf,
}

#[cfg(feature = "std")]
impl FileOffsetStore {
    /// Store offsets at `path`
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the record
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[cfg(feature = "std")]
impl OffsetStore for FileOffsetStore {
    type Error = std::io::Error;

    fn load(&mut self) -> Result<Option<[f32; 3]>, Self::Error> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        decode_offset_record(&bytes).map(Some).ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "offset record must be 12 bytes",
            )
        })
    }

    fn store(&mut self, offsets: &[f32; 3]) -> Result<(), Self::Error> {
        std::fs::write(&self.path, encode_offset_record(offsets))
    }
}

/// Software offsets applied on top of the driver's acceleration
pub struct SoftwareCalibration<S> {
    store: S,
    base_offsets: [f32; 3],
    axes: AxesConfig,
    units: Units,
    offsets: Vector3,
}

impl<S: OffsetStore> SoftwareCalibration<S> {
    /// Load base offsets from `store` (zeros if none were stored)
    ///
    /// Effective offsets assume plain axes and [`Units::G`] until
    /// [`refresh`](Self::refresh) or [`update`](Self::update) is called.
    ///
    /// # Errors
    ///
    /// Returns the storage error if loading fails.
    pub fn new(mut store: S) -> Result<Self, S::Error> {
        let base_offsets = store.load()?.unwrap_or_default();
        let mut calibration = Self {
            store,
            base_offsets,
            axes: AxesConfig::default(),
            units: Units::G,
            offsets: Vector3::ZERO,
        };
        calibration.recompute();
        Ok(calibration)
    }

    /// Base offsets in mg
    #[must_use]
    pub const fn base_offsets(&self) -> [f32; 3] {
        self.base_offsets
    }

    /// Offsets added to each reading, in the driver's output units
    #[must_use]
    pub const fn offsets(&self) -> Vector3 {
        self.offsets
    }

    /// Replace and persist the base offsets (mg)
    ///
    /// # Errors
    ///
    /// Returns the storage error if persisting fails; the offsets in use are
    /// then left unchanged.
    pub fn set_base_offsets(&mut self, offsets: [f32; 3]) -> Result<(), S::Error> {
        self.store.store(&offsets)?;
        self.base_offsets = offsets;
        self.recompute();
        Ok(())
    }

    /// Recompute the effective offsets for an axis configuration and unit
    pub fn update(&mut self, axes: AxesConfig, units: Units) {
        self.axes = axes;
        self.units = units;
        self.recompute();
    }

    /// Read the axis configuration and units from `driver` and recompute
    ///
    /// Call this after every change of the axis configuration or units.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn refresh<I>(&mut self, driver: &mut Msa301Driver<I>) -> Result<(), Error<I::Error>>
    where
        I: RegisterInterface<AddressType = u8>,
    {
        let axes = driver.axes_config()?;
        self.update(axes, driver.units());
        Ok(())
    }

    /// Averaged acceleration from `driver` with the software offsets added
    ///
    /// # Errors
    ///
    /// Returns an error if reading the acceleration fails.
    pub fn acceleration<I>(
        &self,
        driver: &mut Msa301Driver<I>,
    ) -> Result<Acceleration, Error<I::Error>>
    where
        I: RegisterInterface<AddressType = u8>,
    {
        let a = driver.acceleration()?;
        Ok(Acceleration {
            x: a.x + self.offsets.x,
            y: a.y + self.offsets.y,
            z: a.z + self.offsets.z,
        })
    }

    /// Consume the calibration and return the store
    pub fn release(self) -> S {
        self.store
    }

    fn recompute(&mut self) {
        let factor = self.units.factor();
        let [x, y, z] = self.base_offsets.map(|mg| f64::from(mg) * factor);
        let adjust = |value: f64, disabled: bool, inverted: bool| {
            if disabled {
                0.0
            } else if inverted {
                -value
            } else {
                value
            }
        };
        let axes = &self.axes;
        let mut offsets = Vector3::new(
            adjust(x, axes.x_axis_disable, axes.x_axis_invert),
            adjust(y, axes.y_axis_disable, axes.y_axis_invert),
            adjust(z, axes.z_axis_disable, axes.z_axis_invert),
        );
        if axes.xy_swap {
            core::mem::swap(&mut offsets.x, &mut offsets.y);
        }
        self.offsets = offsets;
    }
}
