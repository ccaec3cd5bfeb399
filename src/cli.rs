//! CLI argument parsing

use crate::transports;
use clap::{Parser, Subcommand};

/// Generate dynamic help text for the transport argument
fn transport_help() -> String {
    format!(
        "Transport to use [available: {}]",
        transports::transport_names_short()
    )
}

#[derive(Parser)]
#[command(name = "pmw3901")]
#[command(author, version, about = "PMW3901MB optical flow sensor tool", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show chip information (no hardware access)
    Info,

    /// Initialize the sensor and print its ID registers
    Probe {
        /// Transport to use
        #[arg(short, long, help = transport_help())]
        transport: String,
    },

    /// Read motion bursts and print decoded motion
    Read {
        /// Transport to use
        #[arg(short, long, help = transport_help())]
        transport: String,

        /// Height above the surface in metres
        #[arg(long, default_value_t = 1.0)]
        height: f32,

        /// Number of bursts to read
        #[arg(short = 'n', long, default_value_t = 10)]
        times: u32,

        /// Delay between bursts in milliseconds
        #[arg(long, default_value_t = 100)]
        interval_ms: u64,
    },

    /// Capture raw frames and print them as hex grids
    Frame {
        /// Transport to use
        #[arg(short, long, help = transport_help())]
        transport: String,

        /// Number of frames to capture
        #[arg(short = 'n', long, default_value_t = 1)]
        times: u32,
    },

    /// Service motion the way an interrupt handler would
    Monitor {
        /// Transport to use
        #[arg(short, long, help = transport_help())]
        transport: String,

        /// Height above the surface in metres
        #[arg(long, default_value_t = 1.0)]
        height: f32,

        /// Number of motion events to service
        #[arg(short = 'n', long, default_value_t = 10)]
        times: u32,

        /// Delay between polls of the motion register in milliseconds
        #[arg(long, default_value_t = 10)]
        interval_ms: u64,
    },

    /// Dump registers and exercise every register operation
    Reg {
        /// Transport to use
        #[arg(short, long, help = transport_help())]
        transport: String,
    },

    /// List available transports
    ListTransports,
}
