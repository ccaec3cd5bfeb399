//! Probe command implementation

use crate::transports::Sensor;

/// Print the identification registers of an initialized sensor
pub fn run_probe(sensor: &mut Sensor) -> Result<(), Box<dyn std::error::Error>> {
    let product_id = sensor.product_id()?;
    let inverse_product_id = sensor.inverse_product_id()?;
    let revision_id = sensor.revision_id()?;

    println!("Found {}:", pmw3901_core::info().chip_name);
    println!("  Product ID:         0x{:02X}", product_id);
    println!("  Inverse product ID: 0x{:02X}", inverse_product_id);
    println!("  Revision ID:        0x{:02X}", revision_id);

    if inverse_product_id != !product_id {
        log::warn!(
            "Inverse product ID 0x{:02X} does not match product ID 0x{:02X}",
            inverse_product_id,
            product_id
        );
    }

    Ok(())
}
