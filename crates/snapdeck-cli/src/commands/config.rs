use anyhow::Result;

use snapdeck_core::AppConfig;

pub fn run(config: &AppConfig, init: bool) -> Result<()> {
    let path = AppConfig::config_path();

    if init {
        if path.exists() {
            println!("Config already exists at {}", path.display());
        } else {
            AppConfig::default().save()?;
            println!("Wrote default config to {}", path.display());
        }
        return Ok(());
    }

    let source = if path.exists() { "file" } else { "defaults" };
    println!("# {} ({})", path.display(), source);
    println!("# log file: {}\n", config.log_path().display());
    print!("{}", config.to_toml()?);

    Ok(())
}
