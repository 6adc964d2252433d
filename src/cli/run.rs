use super::config::{BotArgs, ToxbotConfig};
use toxbot::tox::{BotConfig, Shutdown, ToxError};
use tracing::info;

/// Run the bot service
///
/// Resolves configuration from flags and environment, makes sure the data
/// directory exists, then runs the bot until SIGINT or SIGTERM. Savedata is
/// checkpointed periodically and once more on the way out.
///
/// Startup fails (non-zero exit) when the data directory cannot be created
/// or the engine cannot be constructed. Bootstrap failures are not fatal.
pub async fn execute(args: BotArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = ToxbotConfig::from_env(&args);
    config.ensure_data_dir()?;
    info!("data dir: {}", config.data_dir.display());

    // Handlers are installed here, before the blocking engine startup, so a
    // signal during bootstrap still ends in a final save
    let shutdown = Shutdown::listen();
    serve(config.bot_config(), &shutdown).await?;

    info!("bye");
    Ok(())
}

#[cfg(feature = "toxcore")]
async fn serve(config: BotConfig, shutdown: &Shutdown) -> Result<(), ToxError> {
    use toxbot::tox::{ToxBot, ToxCore};

    let bot = ToxBot::start(config, ToxCore::open)?;
    bot.serve(shutdown).await;
    Ok(())
}

#[cfg(not(feature = "toxcore"))]
async fn serve(_config: BotConfig, _shutdown: &Shutdown) -> Result<(), ToxError> {
    Err(ToxError::Unavailable)
}
