//! Replay of fixed register sequences

use super::access::write_register;
use crate::bus::SensorBus;
use crate::error::Result;

/// One step of a fixed register sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Write `value` to `register`
    Write(u8, u8),
    /// Wait for the given number of milliseconds
    DelayMs(u32),
}

/// Shorthand for a [`Step::Write`]
pub(crate) const fn w(reg: u8, value: u8) -> Step {
    Step::Write(reg, value)
}

/// Execute `steps` in order
///
/// Stops at the first failing write. Steps already applied are not undone.
pub fn replay<B: SensorBus + ?Sized>(bus: &mut B, steps: &[Step]) -> Result<()> {
    for step in steps {
        match *step {
            Step::Write(reg, value) => write_register(bus, reg, value)?,
            Step::DelayMs(ms) => bus.delay_ms(ms),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Op, ScriptBus};

    #[test]
    fn test_replay_order() {
        let mut bus = ScriptBus::new();
        replay(&mut bus, &[w(0x7F, 0x00), Step::DelayMs(10), w(0x40, 0x80)]).unwrap();
        assert_eq!(
            bus.ops,
            [Op::Write(0x7F, 0x00), Op::Delay(10), Op::Write(0x40, 0x80)]
        );
    }

    #[test]
    fn test_replay_empty() {
        let mut bus = ScriptBus::new();
        replay(&mut bus, &[]).unwrap();
        assert!(bus.ops.is_empty());
    }
}
