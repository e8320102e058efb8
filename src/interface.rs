//! I2C bus interface for the MSA301
//!
//! The MSA301 speaks plain register-addressed I2C: a register read is a
//! write of the address followed by a repeated-start read, a register write
//! is the address byte followed by the data. Multi-byte reads auto-increment
//! the address, which is how the six output bytes are fetched in one burst.

use crate::I2C_ADDRESS_DEFAULT;

use device_driver::RegisterInterface;

/// Longest register write the driver issues (address byte excluded)
const MAX_WRITE_LEN: usize = 6;

/// I2C interface for the MSA301
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cInterface<I2C> {
    /// Create a new I2C interface at the fixed MSA301 address (0x26)
    ///
    /// # Example
    /// ```ignore
    /// let interface = I2cInterface::default(i2c);
    /// let mut accel = Msa301Driver::new(interface)?;
    /// ```
    pub const fn default(i2c: I2C) -> Self {
        Self {
            i2c,
            address: I2C_ADDRESS_DEFAULT,
        }
    }

    /// Create a new I2C interface with a custom device address
    ///
    /// Useful behind address translators or I2C muxes that remap the device.
    pub const fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// 7-bit device address in use
    #[must_use]
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Consume the interface and return the I2C peripheral
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C, E> RegisterInterface for I2cInterface<I2C>
where
    I2C: embedded_hal::i2c::I2c<Error = E>,
{
    type Error = E;
    type AddressType = u8;

    fn read_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.i2c.write_read(self.address, &[address], read_data)
    }

    fn write_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let mut buffer = [0u8; MAX_WRITE_LEN + 1];
        buffer[0] = address;
        debug_assert!(write_data.len() <= MAX_WRITE_LEN);
        let len = write_data.len().min(MAX_WRITE_LEN);
        buffer[1..=len].copy_from_slice(&write_data[..len]);

        self.i2c.write(self.address, &buffer[..=len])
    }
}
