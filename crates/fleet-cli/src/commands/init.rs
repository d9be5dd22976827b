use std::path::Path;

use fleet_core::FleetConfig;

pub fn init(path: &str) -> anyhow::Result<()> {
    let output = Path::new(path).join("fleet.toml");
    if output.exists() {
        anyhow::bail!("{} already exists", output.display());
    }

    std::fs::write(&output, FleetConfig::scaffold().to_toml_string()?)?;
    println!("✓ Generated {}", output.display());
    Ok(())
}
