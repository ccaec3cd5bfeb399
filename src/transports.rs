//! Transport registration and dispatch
//!
//! This module provides a centralized registry for all transports, with
//! support for feature-gated inclusion and dynamic help text generation.

use pmw3901_core::{Pmw3901, Pmw3901Builder, ResetPin, SensorBus};

/// Sensor driven through runtime-selected transports
pub type Sensor = Pmw3901<Box<dyn SensorBus>, Box<dyn ResetPin>>;

/// Information about a transport
pub struct TransportInfo {
    /// Primary name (used for matching)
    pub name: &'static str,
    /// Alternative names/aliases
    pub aliases: &'static [&'static str],
    /// Short description
    pub description: &'static str,
}

/// Get information about all available transports (enabled at compile time)
#[allow(unused_mut, clippy::vec_init_then_push)]
pub fn available_transports() -> Vec<TransportInfo> {
    let mut transports = Vec::new();

    #[cfg(feature = "dummy")]
    transports.push(TransportInfo {
        name: "dummy",
        aliases: &[],
        description: "In-memory PMW3901MB emulator for testing",
    });

    #[cfg(feature = "linux")]
    transports.push(TransportInfo {
        name: "linux",
        aliases: &["linux_spi", "spidev"],
        description:
            "Linux spidev + GPIO reset (dev=/dev/spidevX.Y,spispeed=<kHz>,gpiochip=<N>,reset=<line>)",
    });

    transports
}

/// Generate help text listing all available transports
pub fn transport_help() -> String {
    let transports = available_transports();

    if transports.is_empty() {
        return "No transports available (recompile with transport features enabled)".to_string();
    }

    let mut help = String::from("Available transports:\n");
    for t in &transports {
        help.push_str(&format!("  {:8} - {}\n", t.name, t.description));
    }
    help
}

/// Generate a short list of transport names for CLI help
pub fn transport_names_short() -> String {
    let transports = available_transports();
    let names: Vec<&str> = transports.iter().map(|t| t.name).collect();
    names.join(", ")
}

/// Resolve a transport name or alias to its canonical name
pub fn find_transport(name: &str) -> Option<&'static str> {
    available_transports()
        .into_iter()
        .find(|t| t.name == name || t.aliases.contains(&name))
        .map(|t| t.name)
}

/// Open the bus and reset line named by a transport string
///
/// The transport string can be just the name (e.g., "dummy") or include
/// parameters (e.g., "linux:dev=/dev/spidev0.0,gpiochip=0,reset=25").
#[allow(unused_variables)]
pub fn open_transport(
    transport: &str,
) -> Result<(Box<dyn SensorBus>, Box<dyn ResetPin>), Box<dyn std::error::Error>> {
    let (name, options) = parse_transport_string(transport);

    let canonical_name = match find_transport(name) {
        Some(n) => n,
        None => return Err(unknown_transport_error(name)),
    };

    match canonical_name {
        #[cfg(feature = "dummy")]
        "dummy" => {
            log::info!("Opening dummy sensor...");
            let sensor = pmw3901_dummy::DummySensor::new_default();
            sensor.set_frame(&demo_frame());
            let reset = sensor.reset_pin();
            Ok((Box::new(sensor), Box::new(reset)))
        }

        #[cfg(feature = "linux")]
        "linux" => {
            log::info!("Opening Linux spidev transport...");

            let spi_config = pmw3901_linux_spi::parse_options(&options)
                .map_err(|e| format!("Invalid linux bus parameters: {}", e))?;
            let gpio_config = pmw3901_linux_gpio::parse_options(&options)
                .map_err(|e| format!("Invalid linux reset parameters: {}", e))?;

            let bus = pmw3901_linux_spi::LinuxSpi::open(&spi_config).map_err(|e| {
                format!(
                    "Failed to open Linux SPI device: {}\n\
                     Make sure the device exists and you have read/write permissions.\n\
                     You may need to: sudo usermod -aG spi $USER",
                    e
                )
            })?;
            let reset = pmw3901_linux_gpio::LinuxGpioReset::open(&gpio_config).map_err(|e| {
                format!(
                    "Failed to open reset line: {}\n\
                     Make sure you have access to {} (gpio group or udev rule).",
                    e, gpio_config.device
                )
            })?;

            Ok((Box::new(bus), Box::new(reset)))
        }

        _ => Err(unknown_transport_error(name)),
    }
}

/// Open a transport and initialize the sensor on it
pub fn open_sensor(transport: &str) -> Result<Sensor, Box<dyn std::error::Error>> {
    let (bus, reset) = open_transport(transport)?;
    let sensor = Pmw3901Builder::new().bus(bus).reset(reset).init()?;
    log::info!("Sensor initialized");
    Ok(sensor)
}

/// Execute a function with an initialized sensor
///
/// The sensor is always deinitialized afterwards. The error from `f` wins
/// over a deinit error.
pub fn with_sensor<F>(transport: &str, f: F) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(&mut Sensor) -> Result<(), Box<dyn std::error::Error>>,
{
    let mut sensor = open_sensor(transport)?;
    let result = f(&mut sensor);
    let released = sensor.deinit().map(|_| ()).map_err(|e| e.error());
    result?;
    released?;
    Ok(())
}

/// Parse a transport string into name and options
///
/// Format: "name" or "name:option1=value1,option2=value2"
pub fn parse_transport_string(s: &str) -> (&str, Vec<(&str, &str)>) {
    if let Some((name, opts)) = s.split_once(':') {
        let options: Vec<_> = opts
            .split(',')
            .filter_map(|opt| opt.split_once('='))
            .collect();
        (name, options)
    } else {
        (s, Vec::new())
    }
}

/// Diagonal gradient shown by the dummy transport's frame grabs
#[cfg(feature = "dummy")]
fn demo_frame() -> pmw3901_core::Frame {
    use pmw3901_core::{FRAME_HEIGHT, FRAME_WIDTH};

    let mut frame = pmw3901_core::Frame::new();
    let span = FRAME_WIDTH + FRAME_HEIGHT - 2;
    for (row, pixels) in frame.pixels.iter_mut().enumerate() {
        for (col, pixel) in pixels.iter_mut().enumerate() {
            *pixel = ((row + col) * 255 / span) as u8;
        }
    }
    frame
}

fn unknown_transport_error(name: &str) -> Box<dyn std::error::Error> {
    let mut msg = format!("Unknown transport: {}\n\n", name);
    msg.push_str(&transport_help());
    msg.push_str("\nUse 'pmw3901 list-transports' for more details");
    msg.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transport_string() {
        let (name, options) =
            parse_transport_string("linux:dev=/dev/spidev0.0,spispeed=1000,reset=25");
        assert_eq!(name, "linux");
        assert_eq!(
            options,
            vec![
                ("dev", "/dev/spidev0.0"),
                ("spispeed", "1000"),
                ("reset", "25")
            ]
        );

        let (name, options) = parse_transport_string("dummy");
        assert_eq!(name, "dummy");
        assert!(options.is_empty());
    }

    #[test]
    fn test_unknown_transport() {
        assert!(find_transport("ch341a").is_none());
        assert!(open_transport("ch341a").is_err());
    }

    #[cfg(feature = "linux")]
    #[test]
    fn test_linux_aliases() {
        assert_eq!(find_transport("spidev"), Some("linux"));
        assert_eq!(find_transport("linux_spi"), Some("linux"));
    }

    #[cfg(feature = "dummy")]
    #[test]
    fn test_dummy_session() {
        let mut seen = None;
        with_sensor("dummy", |sensor| {
            seen = Some(sensor.product_id()?);
            Ok(())
        })
        .unwrap();
        assert_eq!(seen, Some(0x49));
    }
}
