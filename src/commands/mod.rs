//! CLI command implementations
//!
//! Every command except `info` and `list-transports` runs against an
//! initialized [`Sensor`](crate::transports::Sensor) handed in by
//! [`with_sensor`](crate::transports::with_sensor).

mod frame;
mod info;
mod list;
mod monitor;
mod probe;
mod read;
mod reg;

pub use frame::run_frame;
pub use info::run_info;
pub use list::list_transports;
pub use monitor::run_monitor;
pub use probe::run_probe;
pub use read::run_read;
pub use reg::run_reg;
