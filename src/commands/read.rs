//! Read command implementation

use std::thread;
use std::time::Duration;

use pmw3901_core::{Motion, Validity};

use crate::transports::Sensor;

/// Power up, tune and print `times` decoded motion bursts
pub fn run_read(
    sensor: &mut Sensor,
    height_m: f32,
    times: u32,
    interval_ms: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    sensor.power_up()?;
    sensor.set_optimum_performance()?;
    log::info!("Sensor powered up and tuned");

    for i in 0..times {
        if i > 0 {
            thread::sleep(Duration::from_millis(interval_ms));
        }
        let motion = sensor.burst_read()?;
        print_motion(i, &motion, height_m);
    }

    Ok(())
}

/// Print one decoded burst, with displacement when it is valid
pub(crate) fn print_motion(index: u32, motion: &Motion, height_m: f32) {
    let validity = match motion.validity {
        Validity::Valid => "valid",
        Validity::Invalid => "no motion",
        Validity::InnerError => "low quality",
    };

    print!(
        "[{:4}] dx={:6} dy={:6} squal={:3} shutter=0x{:04X} raw=({},{},{}) obs=0x{:02X} {}",
        index,
        motion.delta_x,
        motion.delta_y,
        motion.surface_quality,
        motion.shutter,
        motion.raw_min,
        motion.raw_average,
        motion.raw_max,
        motion.observation,
        validity
    );
    match motion.displacement(height_m) {
        Some(d) => println!(" -> x={:.3} cm y={:.3} cm", d.x_cm, d.y_cm),
        None => println!(),
    }
}
