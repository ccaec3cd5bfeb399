//! Transport trait definitions
//!
//! The driver never touches hardware directly. Instead it talks to a
//! [`SensorBus`] for register access and timing, and to a [`ResetPin`] for
//! the reset GPIO. Both traits are object safe, so a front end can select a
//! backend at runtime and hand the driver a `Box<dyn SensorBus>`.
//!
//! Diagnostics are emitted through the `log` facade rather than a hook.
//!
//! ## Example: minimal bus
//!
//! ```ignore
//! impl SensorBus for MySpi {
//!     fn read(&mut self, reg: u8, buf: &mut [u8]) -> Result<()> {
//!         self.transfer(&[reg], buf).map_err(|_| Error::Transport)
//!     }
//!
//!     fn write(&mut self, addr: u8, data: &[u8]) -> Result<()> {
//!         self.transfer_out(addr, data).map_err(|_| Error::Transport)
//!     }
//!
//!     fn delay_ms(&mut self, ms: u32) {
//!         self.timer.sleep_ms(ms)
//!     }
//! }
//! ```

use crate::error::Result;

/// SPI register access plus the delay used by polling loops
pub trait SensorBus {
    /// Bring the bus up
    ///
    /// Called once by the driver before the first transfer.
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    /// Release the bus
    fn deinit(&mut self) -> Result<()> {
        Ok(())
    }

    /// Read `buf.len()` bytes starting at register `reg`
    ///
    /// `reg` is sent on the wire unchanged.
    fn read(&mut self, reg: u8, buf: &mut [u8]) -> Result<()>;

    /// Write `data` to the register addressed by `addr`
    ///
    /// `addr` already carries [`WRITE_FLAG`](crate::registers::WRITE_FLAG).
    fn write(&mut self, addr: u8, data: &[u8]) -> Result<()>;

    /// Block for `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);
}

/// The sensor's active-low reset line
pub trait ResetPin {
    /// Claim the line
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    /// Release the line
    fn deinit(&mut self) -> Result<()> {
        Ok(())
    }

    /// Drive the line high (`true`) or low (`false`)
    fn set_level(&mut self, high: bool) -> Result<()>;
}

impl<T: SensorBus + ?Sized> SensorBus for &mut T {
    fn init(&mut self) -> Result<()> {
        (**self).init()
    }

    fn deinit(&mut self) -> Result<()> {
        (**self).deinit()
    }

    fn read(&mut self, reg: u8, buf: &mut [u8]) -> Result<()> {
        (**self).read(reg, buf)
    }

    fn write(&mut self, addr: u8, data: &[u8]) -> Result<()> {
        (**self).write(addr, data)
    }

    fn delay_ms(&mut self, ms: u32) {
        (**self).delay_ms(ms)
    }
}

impl<T: ResetPin + ?Sized> ResetPin for &mut T {
    fn init(&mut self) -> Result<()> {
        (**self).init()
    }

    fn deinit(&mut self) -> Result<()> {
        (**self).deinit()
    }

    fn set_level(&mut self, high: bool) -> Result<()> {
        (**self).set_level(high)
    }
}

// Blanket impls for boxed transports to allow runtime backend selection
#[cfg(feature = "alloc")]
impl SensorBus for alloc::boxed::Box<dyn SensorBus> {
    fn init(&mut self) -> Result<()> {
        (**self).init()
    }

    fn deinit(&mut self) -> Result<()> {
        (**self).deinit()
    }

    fn read(&mut self, reg: u8, buf: &mut [u8]) -> Result<()> {
        (**self).read(reg, buf)
    }

    fn write(&mut self, addr: u8, data: &[u8]) -> Result<()> {
        (**self).write(addr, data)
    }

    fn delay_ms(&mut self, ms: u32) {
        (**self).delay_ms(ms)
    }
}

#[cfg(feature = "alloc")]
impl ResetPin for alloc::boxed::Box<dyn ResetPin> {
    fn init(&mut self) -> Result<()> {
        (**self).init()
    }

    fn deinit(&mut self) -> Result<()> {
        (**self).deinit()
    }

    fn set_level(&mut self, high: bool) -> Result<()> {
        (**self).set_level(high)
    }
}
