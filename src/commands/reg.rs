//! Register self-check command
//!
//! Walks through every register operation the driver offers, printing what
//! it reads back. Useful for bringing up new wiring.

use pmw3901_core::registers::{self, MOTION_BURST_LEN};
use pmw3901_core::Frame;

use crate::transports::Sensor;

/// Test value written to the observation register
const OBSERVATION_PATTERN: u8 = 0x2A;

/// Dump registers and exercise the write paths
pub fn run_reg(sensor: &mut Sensor) -> Result<(), Box<dyn std::error::Error>> {
    sensor.power_up()?;

    println!("Registers:");
    println!("  product_id:         0x{:02X}", sensor.product_id()?);
    println!("  inverse_product_id: 0x{:02X}", sensor.inverse_product_id()?);
    println!("  revision_id:        0x{:02X}", sensor.revision_id()?);
    println!("  motion:             0x{:02X}", sensor.motion()?);
    println!("  delta_x:            {}", sensor.delta_x()?);
    println!("  delta_y:            {}", sensor.delta_y()?);
    println!("  squal:              0x{:02X}", sensor.squal()?);
    println!("  raw_data_sum:       0x{:02X}", sensor.raw_data_sum()?);
    println!("  max_raw_data:       0x{:02X}", sensor.max_raw_data()?);
    println!("  min_raw_data:       0x{:02X}", sensor.min_raw_data()?);
    println!("  shutter:            0x{:04X}", sensor.shutter()?);
    println!("  observation:        0x{:02X}", sensor.observation()?);
    println!("  raw_data_grab_status: 0x{:02X}", sensor.raw_data_grab_status()?);

    let mut burst = [0u8; MOTION_BURST_LEN];
    sensor.motion_burst(&mut burst)?;
    println!("  motion_burst:       {:02X?}", burst);

    let mut grab = [0u8; 1];
    sensor.raw_data_grab(&mut grab)?;
    println!("  raw_data_grab:      0x{:02X}", grab[0]);

    println!();
    println!("Write checks:");
    sensor.set_observation(OBSERVATION_PATTERN)?;
    let observation = sensor.observation()?;
    report("observation", OBSERVATION_PATTERN, observation);

    sensor.set_motion(0x00)?;
    println!("  motion cleared, reads 0x{:02X}", sensor.motion()?);

    let mut scratch = [0u8; 1];
    sensor.write_reg(registers::OBSERVATION, &[0x00])?;
    sensor.read_reg(registers::OBSERVATION, &mut scratch)?;
    report("observation (raw)", 0x00, scratch[0]);

    println!();
    println!("Power state:");
    sensor.reset()?;
    println!("  soft reset:  ok");
    sensor.shutdown()?;
    println!("  shutdown:    ok");
    sensor.power_up()?;
    println!("  power up:    ok (product_id 0x{:02X})", sensor.product_id()?);

    // Frame grab handshake
    let mut capture = sensor.start_frame_capture()?;
    let mut frame = Frame::new();
    capture.get_frame(&mut frame)?;
    capture.stop()?;
    println!("  frame grab:  ok (pixel[0][0] = 0x{:02X})", frame.pixels[0][0]);

    Ok(())
}

fn report(name: &str, expected: u8, actual: u8) {
    if expected == actual {
        println!("  {}: wrote 0x{:02X}, read back 0x{:02X} ok", name, expected, actual);
    } else {
        log::warn!(
            "{}: wrote 0x{:02X}, read back 0x{:02X}",
            name,
            expected,
            actual
        );
    }
}
