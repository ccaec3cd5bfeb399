//! Power sequencing

use super::access::{read_register, write_register};
use crate::bus::{ResetPin, SensorBus};
use crate::error::{Error, Result};
use crate::registers;

/// Time the reset line is held at each level
pub const RESET_PULSE_MS: u32 = 10;

/// Pulse the reset line low then high, waiting after each edge
pub fn pulse_reset<B, R>(bus: &mut B, reset: &mut R) -> Result<()>
where
    B: SensorBus + ?Sized,
    R: ResetPin + ?Sized,
{
    for level in [false, true] {
        reset.set_level(level).map_err(|_| {
            log::error!("pmw3901: reset line write failed");
            Error::ResetLine
        })?;
        bus.delay_ms(RESET_PULSE_MS);
    }
    Ok(())
}

/// Full power-up: hardware reset, soft reset, then drain the motion registers
///
/// The five motion registers are read once each and discarded so that the
/// first real reading starts from a clean state.
pub fn power_up<B, R>(bus: &mut B, reset: &mut R) -> Result<()>
where
    B: SensorBus + ?Sized,
    R: ResetPin + ?Sized,
{
    pulse_reset(bus, reset)?;
    self::reset(bus)?;
    bus.delay_ms(RESET_PULSE_MS);

    for reg in [
        registers::MOTION,
        registers::DELTA_X_L,
        registers::DELTA_X_H,
        registers::DELTA_Y_L,
        registers::DELTA_Y_H,
    ] {
        read_register(bus, reg)?;
    }

    log::debug!("pmw3901: powered up");
    Ok(())
}

/// Soft reset through the power-up reset register
pub fn reset<B: SensorBus + ?Sized>(bus: &mut B) -> Result<()> {
    write_register(
        bus,
        registers::POWER_UP_RESET,
        registers::POWER_UP_RESET_VALUE,
    )
}

/// Put the chip into shutdown
pub fn shutdown<B: SensorBus + ?Sized>(bus: &mut B) -> Result<()> {
    write_register(bus, registers::SHUTDOWN, registers::SHUTDOWN_VALUE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Op, ScriptBus, ScriptPin};

    #[test]
    fn test_power_up_sequence() {
        let mut bus = ScriptBus::new();
        let mut pin = ScriptPin::default();
        power_up(&mut bus, &mut pin).unwrap();

        assert_eq!(pin.levels, [false, true]);
        assert_eq!(
            bus.ops,
            [
                Op::Delay(10),
                Op::Delay(10),
                Op::Write(0x3A, 0x5A),
                Op::Delay(10),
                Op::Read(0x02),
                Op::Read(0x03),
                Op::Read(0x04),
                Op::Read(0x05),
                Op::Read(0x06),
            ]
        );
    }

    #[test]
    fn test_power_up_read_failure() {
        let mut bus = ScriptBus::new();
        bus.fail_read = Some(0x04);
        let mut pin = ScriptPin::default();
        assert_eq!(power_up(&mut bus, &mut pin), Err(Error::Transport));
        assert_eq!(bus.reads_of(0x05), 0);
    }

    #[test]
    fn test_shutdown_and_reset() {
        let mut bus = ScriptBus::new();
        shutdown(&mut bus).unwrap();
        reset(&mut bus).unwrap();
        assert_eq!(bus.writes(), [(0x3B, 0xB6), (0x3A, 0x5A)]);
    }
}
