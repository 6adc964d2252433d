use super::config::{BotArgs, ToxbotConfig};

/// Print the resolved configuration
///
/// Read-only: the data directory is not created and the proxy password is
/// never printed.
pub fn execute(args: BotArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = ToxbotConfig::from_env(&args);
    print!("{}", config.to_toml()?);
    Ok(())
}
