//! Optimum performance tuning
//!
//! The vendor tuning routine is mostly a fixed register script, with two
//! pieces that depend on what the chip reports:
//!
//! 1. A handshake: write 0x10 to 0x43 and read 0x47 back until it reads
//!    [`CALIBRATION_READY`], giving up after [`RetryPolicy::CALIBRATION`].
//! 2. An adaptive branch taken only when 0x73 reads exactly zero, which
//!    derives two coefficients from registers 0x70 and 0x71.

use super::access::{read_register, write_register};
use super::retry::{poll, RetryPolicy};
use super::sequence::replay;
use super::tables;
use crate::bus::SensorBus;
use crate::error::{Error, Result};

/// Readback of register 0x47 once the chip accepted the handshake
pub const CALIBRATION_READY: u8 = 0x08;

/// Highest value the first adaptive coefficient may take
const COEFFICIENT_MAX: u8 = 0x3F;

/// Apply the vendor's optimum performance register settings
///
/// Aborts on the first transport failure; registers written up to that
/// point keep their new values.
pub fn set_optimum_performance<B: SensorBus + ?Sized>(bus: &mut B) -> Result<()> {
    replay(bus, tables::PERFORMANCE_PROLOGUE)?;

    let mut readback = 0;
    let ready = poll(bus, RetryPolicy::CALIBRATION, |bus| {
        write_register(bus, 0x43, 0x10)?;
        readback = read_register(bus, 0x47)?;
        Ok((readback == CALIBRATION_READY).then_some(()))
    })?;
    if ready.is_none() {
        log::error!(
            "pmw3901: optimum performance handshake failed (0x47 = 0x{:02X})",
            readback
        );
        return Err(Error::Calibration { readback });
    }

    let mode = if read_register(bus, 0x67)? & 0x80 != 0 {
        0x04
    } else {
        0x02
    };
    write_register(bus, 0x48, mode)?;

    replay(bus, tables::PERFORMANCE_MIDDLE)?;

    if read_register(bus, 0x73)? == 0x00 {
        let c1 = adjust_c1(read_register(bus, 0x70)?);
        let c2 = adjust_c2(read_register(bus, 0x71)?);
        log::debug!("pmw3901: adaptive tuning c1=0x{:02X} c2=0x{:02X}", c1, c2);

        replay(bus, tables::PERFORMANCE_ADAPTIVE_PREFIX)?;
        write_register(bus, 0x70, c1)?;
        write_register(bus, 0x71, c2)?;
    }

    replay(bus, tables::PERFORMANCE_TUNING)?;
    log::debug!("pmw3901: optimum performance applied");
    Ok(())
}

fn adjust_c1(c1: u8) -> u8 {
    let c1 = if c1 <= 28 { c1 + 14 } else { c1.saturating_add(11) };
    c1.min(COEFFICIENT_MAX)
}

fn adjust_c2(c2: u8) -> u8 {
    (c2 as u32 * 45 / 100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Step;
    use crate::testing::ScriptBus;
    use std::vec::Vec;

    fn table_writes(steps: &[Step]) -> Vec<(u8, u8)> {
        steps
            .iter()
            .filter_map(|s| match *s {
                Step::Write(r, v) => Some((r, v)),
                Step::DelayMs(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_coefficients() {
        assert_eq!(adjust_c1(0), 14);
        assert_eq!(adjust_c1(28), 42);
        assert_eq!(adjust_c1(29), 40);
        assert_eq!(adjust_c1(60), 0x3F);
        assert_eq!(adjust_c1(0xFF), 0x3F);
        assert_eq!(adjust_c2(100), 45);
        assert_eq!(adjust_c2(0xFF), 114);
    }

    #[test]
    fn test_full_sequence_with_adaptive_branch() {
        let mut bus = ScriptBus::new();
        bus.answer(0x47, 0x08)
            .answer(0x67, 0x80)
            .answer(0x73, 0x00)
            .answer(0x70, 0x10)
            .answer(0x71, 0x40);
        set_optimum_performance(&mut bus).unwrap();

        let mut expected = table_writes(tables::PERFORMANCE_PROLOGUE);
        expected.push((0x43, 0x10));
        expected.push((0x48, 0x04));
        expected.extend(table_writes(tables::PERFORMANCE_MIDDLE));
        expected.extend(table_writes(tables::PERFORMANCE_ADAPTIVE_PREFIX));
        expected.push((0x70, 0x1E));
        expected.push((0x71, 0x1C));
        expected.extend(table_writes(tables::PERFORMANCE_TUNING));

        assert_eq!(bus.writes(), expected);
        assert_eq!(bus.delays(), [10]);
    }

    #[test]
    fn test_adaptive_branch_skipped() {
        let mut bus = ScriptBus::new();
        bus.answer(0x47, 0x08).answer(0x67, 0x00).answer(0x73, 0x01);
        set_optimum_performance(&mut bus).unwrap();

        assert_eq!(bus.reads_of(0x70), 0);
        assert_eq!(bus.reads_of(0x71), 0);
        assert!(bus.writes().contains(&(0x48, 0x02)));
        assert!(!bus.writes().contains(&(0x51, 0x70)));
    }

    #[test]
    fn test_handshake_retries() {
        let mut bus = ScriptBus::new();
        bus.queue(0x47, &[0x00, 0x00, 0x08]).answer(0x73, 0x01);
        set_optimum_performance(&mut bus).unwrap();
        assert_eq!(bus.reads_of(0x47), 3);
        let handshakes = bus.writes().iter().filter(|w| **w == (0x43, 0x10)).count();
        assert_eq!(handshakes, 3);
    }

    #[test]
    fn test_handshake_exhausted() {
        let mut bus = ScriptBus::new();
        bus.answer(0x47, 0x01);
        assert_eq!(
            set_optimum_performance(&mut bus),
            Err(Error::Calibration { readback: 0x01 })
        );
        assert_eq!(bus.reads_of(0x47), 4);
        assert_eq!(bus.delays(), [100, 100, 100]);
        assert_eq!(bus.reads_of(0x67), 0);
    }
}
