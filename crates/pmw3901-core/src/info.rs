//! Static chip information

/// Descriptive record for the supported chip
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChipInfo {
    /// Chip name
    pub chip_name: &'static str,
    /// Manufacturer name
    pub manufacturer_name: &'static str,
    /// Host interface
    pub interface: &'static str,
    /// Minimum supply voltage in volts
    pub supply_voltage_min_v: f32,
    /// Maximum supply voltage in volts
    pub supply_voltage_max_v: f32,
    /// Maximum supply current in milliamps
    pub max_current_ma: f32,
    /// Minimum operating temperature in degrees Celsius
    pub temperature_min: f32,
    /// Maximum operating temperature in degrees Celsius
    pub temperature_max: f32,
    /// Driver version
    pub driver_version: u32,
}

/// PMW3901MB information record
pub const PMW3901MB: ChipInfo = ChipInfo {
    chip_name: "PixArt Imaging PMW3901MB",
    manufacturer_name: "PixArt Imaging",
    interface: "SPI",
    supply_voltage_min_v: 1.8,
    supply_voltage_max_v: 3.6,
    max_current_ma: 70.0,
    temperature_min: -40.0,
    temperature_max: 85.0,
    driver_version: 1000,
};

/// Get the chip information record
///
/// Needs no hardware and no handle.
pub const fn info() -> ChipInfo {
    PMW3901MB
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info() {
        let info = info();
        assert_eq!(info.chip_name, "PixArt Imaging PMW3901MB");
        assert_eq!(info.interface, "SPI");
        assert_eq!(info.driver_version, 1000);
        assert!(info.supply_voltage_min_v < info.supply_voltage_max_v);
    }
}
