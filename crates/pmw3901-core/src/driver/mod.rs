//! Typestate driver
//!
//! A sensor starts out as a [`Pmw3901Builder`], which only collects the
//! transports. [`Pmw3901Builder::init`] brings the transports up, resets the
//! chip and checks its product ID; only then is a [`Pmw3901`] handed out.
//! Every register operation lives on `Pmw3901`, so talking to a chip that
//! was never identified does not compile:
//!
//! ```compile_fail
//! # use pmw3901_core::{Pmw3901Builder, ResetPin, SensorBus};
//! # fn f<B: SensorBus, R: ResetPin>(sensor: Pmw3901Builder<B, R>) {
//! sensor.burst_read();
//! # }
//! ```
//!
//! [`Pmw3901::deinit`] consumes the driver, so a second deinit cannot be
//! written either:
//!
//! ```compile_fail
//! # use pmw3901_core::{Pmw3901, ResetPin, SensorBus};
//! # fn f<B: SensorBus, R: ResetPin>(sensor: Pmw3901<B, R>) {
//! let _ = sensor.deinit();
//! let _ = sensor.deinit();
//! # }
//! ```

mod capture;

pub use capture::FrameCapture;

use crate::bus::{ResetPin, SensorBus};
use crate::error::{Capability, Error, Result};
use crate::motion::{Displacement, Motion};
use crate::protocol;
use crate::registers;
use crate::units;
use core::fmt;

/// Uninitialized sensor: collects the transports
pub struct Pmw3901Builder<B, R> {
    bus: Option<B>,
    reset: Option<R>,
}

impl<B, R> Default for Pmw3901Builder<B, R> {
    fn default() -> Self {
        Self {
            bus: None,
            reset: None,
        }
    }
}

impl<B: SensorBus, R: ResetPin> Pmw3901Builder<B, R> {
    /// Create a builder with no transports attached
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the SPI bus
    pub fn bus(mut self, bus: B) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Attach the reset line
    pub fn reset(mut self, reset: R) -> Self {
        self.reset = Some(reset);
        self
    }

    /// Bring up the transports, reset the chip and verify its identity
    ///
    /// If anything after the transports came up fails, they are released
    /// again before the error is returned.
    pub fn init(self) -> Result<Pmw3901<B, R>> {
        let mut bus = self
            .bus
            .ok_or(Error::MissingCapability(Capability::Bus))?;
        let mut reset = self
            .reset
            .ok_or(Error::MissingCapability(Capability::ResetLine))?;

        bus.init().map_err(|e| {
            log::error!("pmw3901: spi init failed");
            e
        })?;

        if let Err(e) = reset.init() {
            log::error!("pmw3901: reset line init failed");
            release::<B, R>(&mut bus, None);
            return Err(e);
        }

        match identify(&mut bus, &mut reset) {
            Ok(()) => {
                log::info!("pmw3901: found PMW3901MB");
                Ok(Pmw3901 { bus, reset })
            }
            Err(e) => {
                release(&mut bus, Some(&mut reset));
                Err(e)
            }
        }
    }
}

fn identify<B: SensorBus, R: ResetPin>(bus: &mut B, reset: &mut R) -> Result<()> {
    protocol::pulse_reset(bus, reset)?;
    let found = protocol::read_product_id(bus)?;
    if found != registers::PRODUCT_ID_VALUE {
        log::error!("pmw3901: product id is invalid (0x{:02X})", found);
        return Err(Error::InvalidProductId { found });
    }
    Ok(())
}

fn release<B: SensorBus, R: ResetPin>(bus: &mut B, reset: Option<&mut R>) {
    if let Err(e) = bus.deinit() {
        log::warn!("pmw3901: spi deinit failed: {}", e);
    }
    if let Some(reset) = reset {
        if let Err(e) = reset.deinit() {
            log::warn!("pmw3901: reset line deinit failed: {}", e);
        }
    }
}

/// Result of servicing a motion interrupt
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionEvent {
    /// Decoded burst
    pub motion: Motion,
    /// Displacement, present only for a valid burst
    pub displacement: Option<Displacement>,
}

/// Initialized PMW3901MB sensor
pub struct Pmw3901<B: SensorBus, R: ResetPin> {
    bus: B,
    reset: R,
}

impl<B: SensorBus, R: ResetPin> Pmw3901<B, R> {
    /// Shorthand for building and initializing in one go
    pub fn new(bus: B, reset: R) -> Result<Self> {
        Pmw3901Builder::new().bus(bus).reset(reset).init()
    }

    /// Power down the chip and release the transports
    ///
    /// If the power down command fails, the driver is handed back unchanged
    /// inside [`DeinitError::PowerDown`].
    pub fn deinit(mut self) -> core::result::Result<(B, R), DeinitError<B, R>> {
        if let Err(error) = protocol::shutdown(&mut self.bus) {
            log::error!("pmw3901: power down failed");
            return Err(DeinitError::PowerDown {
                driver: self,
                error,
            });
        }

        let Self { mut bus, mut reset } = self;
        let bus_result = bus.deinit();
        let reset_result = reset.deinit();
        match bus_result.and(reset_result) {
            Ok(()) => Ok((bus, reset)),
            Err(error) => {
                log::error!("pmw3901: transport deinit failed");
                Err(DeinitError::Teardown { bus, reset, error })
            }
        }
    }

    /// Hardware reset, soft reset and motion register drain
    pub fn power_up(&mut self) -> Result<()> {
        protocol::power_up(&mut self.bus, &mut self.reset)
    }

    /// Soft reset
    pub fn reset(&mut self) -> Result<()> {
        protocol::reset(&mut self.bus)
    }

    /// Put the chip into shutdown
    pub fn shutdown(&mut self) -> Result<()> {
        protocol::shutdown(&mut self.bus)
    }

    /// Apply the vendor's optimum performance settings
    pub fn set_optimum_performance(&mut self) -> Result<()> {
        protocol::set_optimum_performance(&mut self.bus)
    }

    /// Read and decode a motion burst
    pub fn burst_read(&mut self) -> Result<Motion> {
        protocol::burst_read(&mut self.bus)
    }

    /// Convert a raw delta into centimetres at the given height
    ///
    /// Does not touch the chip; see [`units::delta_raw_to_delta_cm`].
    pub fn delta_raw_to_delta_cm(&self, raw: i16, height_m: f32) -> f32 {
        units::delta_raw_to_delta_cm(raw, height_m)
    }

    /// Service a motion interrupt
    ///
    /// Reads a burst, converts it when valid and then clears the motion
    /// register. The clear is attempted even if the burst read failed.
    pub fn handle_motion_interrupt(&mut self, height_m: f32) -> Result<MotionEvent> {
        let burst = self.burst_read();
        let clear = self.set_motion(0);
        let motion = burst?;
        clear?;
        Ok(MotionEvent {
            motion,
            displacement: motion.displacement(height_m),
        })
    }

    /// Enter frame capture mode
    ///
    /// Frames can only be read through the returned guard. Dropping the
    /// guard leaves capture mode again.
    pub fn start_frame_capture(&mut self) -> Result<FrameCapture<'_, B, R>> {
        protocol::start_frame_capture(&mut self.bus)?;
        Ok(FrameCapture::new(self))
    }

    // ------------------------------------------------------------------
    // Register accessors
    // ------------------------------------------------------------------

    /// Read the product ID register
    pub fn product_id(&mut self) -> Result<u8> {
        protocol::read_product_id(&mut self.bus)
    }

    /// Read the inverse product ID register
    pub fn inverse_product_id(&mut self) -> Result<u8> {
        protocol::read_register(&mut self.bus, registers::INVERSE_PRODUCT_ID)
    }

    /// Read the revision ID register
    pub fn revision_id(&mut self) -> Result<u8> {
        protocol::read_register(&mut self.bus, registers::REVISION_ID)
    }

    /// Read the motion register
    pub fn motion(&mut self) -> Result<u8> {
        protocol::read_register(&mut self.bus, registers::MOTION)
    }

    /// Write the motion register; any write clears the motion interrupt
    pub fn set_motion(&mut self, value: u8) -> Result<()> {
        protocol::write_register(&mut self.bus, registers::MOTION, value)
    }

    /// Read delta X, low register first
    pub fn delta_x(&mut self) -> Result<i16> {
        protocol::read_delta(&mut self.bus, registers::DELTA_X_L, registers::DELTA_X_H)
    }

    /// Read delta Y, low register first
    pub fn delta_y(&mut self) -> Result<i16> {
        protocol::read_delta(&mut self.bus, registers::DELTA_Y_L, registers::DELTA_Y_H)
    }

    /// Raw read of the motion burst port into `buf`
    pub fn motion_burst(&mut self, buf: &mut [u8]) -> Result<()> {
        protocol::read_registers(&mut self.bus, registers::MOTION_BURST, buf)
    }

    /// Read the surface quality register
    pub fn squal(&mut self) -> Result<u8> {
        protocol::read_register(&mut self.bus, registers::SQUAL)
    }

    /// Read the raw data sum register
    pub fn raw_data_sum(&mut self) -> Result<u8> {
        protocol::read_register(&mut self.bus, registers::RAW_DATA_SUM)
    }

    /// Read the maximum raw data register
    pub fn max_raw_data(&mut self) -> Result<u8> {
        protocol::read_register(&mut self.bus, registers::MAXIMUM_RAW_DATA)
    }

    /// Read the minimum raw data register
    pub fn min_raw_data(&mut self) -> Result<u8> {
        protocol::read_register(&mut self.bus, registers::MINIMUM_RAW_DATA)
    }

    /// Read the 13-bit shutter value
    pub fn shutter(&mut self) -> Result<u16> {
        protocol::read_shutter(&mut self.bus)
    }

    /// Read the observation register
    pub fn observation(&mut self) -> Result<u8> {
        protocol::read_register(&mut self.bus, registers::OBSERVATION)
    }

    /// Write the observation register
    pub fn set_observation(&mut self, value: u8) -> Result<()> {
        protocol::write_register(&mut self.bus, registers::OBSERVATION, value)
    }

    /// Read the grab port once per element of `buf`
    pub fn raw_data_grab(&mut self, buf: &mut [u8]) -> Result<()> {
        for b in buf.iter_mut() {
            *b = protocol::read_register(&mut self.bus, registers::RAW_DATA_GRAB)?;
        }
        Ok(())
    }

    /// Write each element of `data` to the grab port
    pub fn set_raw_data_grab(&mut self, data: &[u8]) -> Result<()> {
        for &b in data {
            protocol::write_register(&mut self.bus, registers::RAW_DATA_GRAB, b)?;
        }
        Ok(())
    }

    /// Read the grab status register
    pub fn raw_data_grab_status(&mut self) -> Result<u8> {
        protocol::read_register(&mut self.bus, registers::RAW_DATA_GRAB_STATUS)
    }

    /// Read `buf.len()` bytes starting at any register
    pub fn read_reg(&mut self, reg: u8, buf: &mut [u8]) -> Result<()> {
        protocol::read_registers(&mut self.bus, reg, buf)
    }

    /// Write `data` to any register
    pub fn write_reg(&mut self, reg: u8, data: &[u8]) -> Result<()> {
        protocol::write_registers(&mut self.bus, reg, data)
    }
}

/// Failure of [`Pmw3901::deinit`]
pub enum DeinitError<B: SensorBus, R: ResetPin> {
    /// The shutdown command failed; the sensor is still initialized
    PowerDown {
        /// The untouched driver
        driver: Pmw3901<B, R>,
        /// Underlying failure
        error: Error,
    },
    /// The chip was shut down but releasing a transport failed
    Teardown {
        /// Released bus
        bus: B,
        /// Released reset line
        reset: R,
        /// Underlying failure
        error: Error,
    },
}

impl<B: SensorBus, R: ResetPin> DeinitError<B, R> {
    /// The underlying error
    pub fn error(&self) -> Error {
        match self {
            Self::PowerDown { error, .. } | Self::Teardown { error, .. } => *error,
        }
    }
}

impl<B: SensorBus, R: ResetPin> fmt::Debug for DeinitError<B, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PowerDown { error, .. } => f.debug_tuple("PowerDown").field(error).finish(),
            Self::Teardown { error, .. } => f.debug_tuple("Teardown").field(error).finish(),
        }
    }
}

impl<B: SensorBus, R: ResetPin> fmt::Display for DeinitError<B, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PowerDown { error, .. } => write!(f, "power down failed: {}", error),
            Self::Teardown { error, .. } => write!(f, "transport release failed: {}", error),
        }
    }
}

#[cfg(feature = "std")]
impl<B: SensorBus, R: ResetPin> std::error::Error for DeinitError<B, R> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Op, ScriptBus, ScriptPin};

    fn ready(bus: &mut ScriptBus) -> Pmw3901<&mut ScriptBus, ScriptPin> {
        bus.answer(registers::PRODUCT_ID, 0x49);
        Pmw3901::new(bus, ScriptPin::default()).unwrap()
    }

    #[test]
    fn test_missing_bus() {
        let result = Pmw3901Builder::<ScriptBus, ScriptPin>::new()
            .reset(ScriptPin::default())
            .init();
        assert_eq!(
            result.err(),
            Some(Error::MissingCapability(Capability::Bus))
        );
    }

    #[test]
    fn test_missing_reset_touches_nothing() {
        let mut bus = ScriptBus::new();
        let result = Pmw3901Builder::<&mut ScriptBus, ScriptPin>::new()
            .bus(&mut bus)
            .init();
        assert_eq!(
            result.err(),
            Some(Error::MissingCapability(Capability::ResetLine))
        );
        assert!(bus.ops.is_empty());
    }

    #[test]
    fn test_init_sequence() {
        let mut bus = ScriptBus::new();
        let driver = ready(&mut bus);
        drop(driver);
        assert_eq!(
            bus.ops,
            [Op::Delay(10), Op::Delay(10), Op::Read(registers::PRODUCT_ID)]
        );
    }

    #[test]
    fn test_wrong_product_id() {
        let mut bus = ScriptBus::new();
        bus.answer(registers::PRODUCT_ID, 0x48);
        let result = Pmw3901::new(&mut bus, ScriptPin::default());
        assert_eq!(result.err(), Some(Error::InvalidProductId { found: 0x48 }));
    }

    #[test]
    fn test_interrupt_clears_motion_after_failed_burst() {
        let mut bus = ScriptBus::new();
        {
            let mut driver = ready(&mut bus);
            driver.bus.fail_read = Some(registers::MOTION_BURST);
            assert_eq!(driver.handle_motion_interrupt(1.0), Err(Error::Transport));
        }
        assert_eq!(bus.writes(), [(registers::MOTION, 0x00)]);
    }

    #[test]
    fn test_interrupt_converts_valid_burst() {
        let mut bus = ScriptBus::new();
        bus.queue(
            registers::MOTION_BURST,
            &[0x80, 0, 100, 0, 0x9C, 0xFF, 0x40, 0, 0, 0, 0, 0],
        );
        let mut driver = ready(&mut bus);
        let event = driver.handle_motion_interrupt(2.0).unwrap();
        let d = event.displacement.unwrap();
        assert!((d.x_cm - 42.6389).abs() < 1e-3);
        assert!((d.y_cm + 42.6389).abs() < 1e-3);
    }

    #[test]
    fn test_deinit_returns_transports() {
        let mut bus = ScriptBus::new();
        let driver = ready(&mut bus);
        let (_bus, pin) = driver.deinit().unwrap();
        assert_eq!(pin.levels, [false, true]);
        assert_eq!(bus.writes(), [(registers::SHUTDOWN, 0xB6)]);
    }
}
