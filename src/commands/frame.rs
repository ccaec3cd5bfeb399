//! Frame command implementation

use indicatif::{ProgressBar, ProgressStyle};
use pmw3901_core::Frame;

use crate::transports::Sensor;

/// Capture `times` raw frames and print each as a hex grid
pub fn run_frame(sensor: &mut Sensor, times: u32) -> Result<(), Box<dyn std::error::Error>> {
    sensor.power_up()?;

    let mut capture = sensor.start_frame_capture()?;
    log::info!("Frame capture started");

    let pb = ProgressBar::new(u64::from(times));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} frames")?
            .progress_chars("#>-"),
    );

    let mut frame = Frame::new();
    for i in 0..times {
        capture.get_frame(&mut frame)?;
        pb.suspend(|| print_frame(i, &frame));
        pb.inc(1);
    }
    pb.finish_with_message("Capture complete");

    capture.stop()?;
    Ok(())
}

fn print_frame(index: u32, frame: &Frame) {
    println!("Frame {}:", index);
    for row in frame.rows() {
        let line: Vec<String> = row.iter().map(|p| format!("{:02X}", p)).collect();
        println!("{}", line.join(" "));
    }
    println!();
}
