//! pmw3901 - PixArt PMW3901MB optical flow sensor tool
//!
//! Drives the sensor through a runtime-selected transport and prints what it
//! sees: identification registers, motion bursts, raw frames.
//!
//! # Architecture
//!
//! The driver in `pmw3901-core` is generic over a `SensorBus` and a
//! `ResetPin`. This binary picks the implementations at runtime from the
//! `--transport` string, boxes them, and hands them to the driver:
//! - **dummy** - in-memory emulator, no hardware needed
//! - **linux** - spidev for the bus plus a gpiocdev line for NRESET

mod cli;
mod commands;
mod transports;

use std::process::ExitCode;

use clap::Parser;
use cli::{Cli, Commands};
use transports::with_sensor;

fn main() -> ExitCode {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Set log level based on verbosity
    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(exit_code(e.as_ref()))
        }
    }
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Info => {
            commands::run_info();
            Ok(())
        }
        Commands::Probe { transport } => with_sensor(&transport, commands::run_probe),
        Commands::Read {
            transport,
            height,
            times,
            interval_ms,
        } => with_sensor(&transport, |sensor| {
            commands::run_read(sensor, height, times, interval_ms)
        }),
        Commands::Frame { transport, times } => {
            with_sensor(&transport, |sensor| commands::run_frame(sensor, times))
        }
        Commands::Monitor {
            transport,
            height,
            times,
            interval_ms,
        } => with_sensor(&transport, |sensor| {
            commands::run_monitor(sensor, height, times, interval_ms)
        }),
        Commands::Reg { transport } => with_sensor(&transport, commands::run_reg),
        Commands::ListTransports => {
            commands::list_transports();
            Ok(())
        }
    }
}

/// Process exit status for an error
///
/// Driver errors exit with their stable code, anything else with 1.
fn exit_code(e: &(dyn std::error::Error + 'static)) -> u8 {
    e.downcast_ref::<pmw3901_core::Error>()
        .map_or(1, pmw3901_core::Error::code)
}
