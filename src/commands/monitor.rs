//! Monitor command implementation
//!
//! Stands in for a motion interrupt line: the motion register is polled and
//! every time it reports motion, the interrupt routine runs.

use std::thread;
use std::time::Duration;

use pmw3901_core::registers::MotionStatus;

use super::read::print_motion;
use crate::transports::Sensor;

/// Service `times` motion events
pub fn run_monitor(
    sensor: &mut Sensor,
    height_m: f32,
    times: u32,
    interval_ms: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    sensor.power_up()?;
    sensor.set_optimum_performance()?;
    log::info!("Waiting for motion...");

    let mut serviced = 0;
    while serviced < times {
        let status = MotionStatus::from_bits_truncate(sensor.motion()?);
        if !status.contains(MotionStatus::MOTION) {
            thread::sleep(Duration::from_millis(interval_ms));
            continue;
        }

        let event = sensor.handle_motion_interrupt(height_m)?;
        log::debug!("Motion event: {:?}", event.displacement);
        print_motion(serviced, &event.motion, height_m);
        serviced += 1;
    }

    Ok(())
}
