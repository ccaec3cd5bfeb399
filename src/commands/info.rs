//! Info command implementation

/// Print the static chip information record
pub fn run_info() {
    let info = pmw3901_core::info();

    println!("Chip information:");
    println!("  Name:         {}", info.chip_name);
    println!("  Manufacturer: {}", info.manufacturer_name);
    println!("  Interface:    {}", info.interface);
    println!(
        "  Supply:       {:.1} V - {:.1} V",
        info.supply_voltage_min_v, info.supply_voltage_max_v
    );
    println!("  Max current:  {:.1} mA", info.max_current_ma);
    println!(
        "  Temperature:  {:.0} C - {:.0} C",
        info.temperature_min, info.temperature_max
    );
    println!(
        "  Driver:       {}.{}",
        info.driver_version / 1000,
        info.driver_version % 1000 / 100
    );
}
