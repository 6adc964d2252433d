use clap::{Parser, Subcommand};

pub mod config;
pub mod run;
pub mod show_config;
pub mod version;

use config::BotArgs;

#[derive(Parser)]
#[command(name = "toxbot")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Always-on Tox presence and echo bot", long_about = None)]
pub struct Cli {
    /// Log level: trace, debug, info, warn, error [env: TOX_LOG_LEVEL]
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Defaults to `run` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot until SIGINT or SIGTERM
    Run(BotArgs),

    /// Print the resolved configuration as TOML
    ShowConfig(BotArgs),

    /// Display version information
    Version,
}

pub async fn execute(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = cli.log_level;
    let with_level = |args: BotArgs| BotArgs { log_level, ..args };

    match cli.command.unwrap_or_else(|| Commands::Run(BotArgs::default())) {
        Commands::Run(args) => run::execute(with_level(args)).await,
        Commands::ShowConfig(args) => show_config::execute(with_level(args)),
        Commands::Version => {
            version::execute();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_cli_parse_no_command() {
        let cli = Cli::parse_from(["toxbot"]);
        assert!(cli.command.is_none());
        assert!(cli.log_level.is_none());
    }

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::parse_from([
            "toxbot",
            "run",
            "--data-dir",
            "/srv/tox",
            "--name",
            "helper",
            "--bootstrap-nodes",
            "h:1:AB",
            "--save-interval-secs",
            "10",
            "--log-level",
            "debug",
        ]);

        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        match cli.command {
            Some(Commands::Run(args)) => {
                assert_eq!(args.data_dir, Some(PathBuf::from("/srv/tox")));
                assert_eq!(args.name.as_deref(), Some("helper"));
                assert_eq!(args.bootstrap_nodes.as_deref(), Some("h:1:AB"));
                assert_eq!(args.save_interval_secs, Some(10));
                assert!(args.savedata.is_none());
                assert!(args.status.is_none());
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_parse_show_config() {
        let cli = Cli::parse_from(["toxbot", "show-config", "--savedata", "/tmp/x.tox"]);

        match cli.command {
            Some(Commands::ShowConfig(args)) => {
                assert_eq!(args.savedata, Some(PathBuf::from("/tmp/x.tox")));
            }
            _ => panic!("Expected ShowConfig command"),
        }
    }

    #[test]
    fn test_cli_parse_version() {
        let cli = Cli::parse_from(["toxbot", "version"]);
        assert!(matches!(cli.command, Some(Commands::Version)));
    }

    #[test]
    fn test_cli_parse_global_log_level() {
        let cli = Cli::parse_from(["toxbot", "--log-level", "warn"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.log_level.as_deref(), Some("warn"));
    }

    #[test]
    fn test_cli_rejects_bad_interval() {
        let result = Cli::try_parse_from(["toxbot", "run", "--save-interval-secs", "soon"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_rejects_unknown_command() {
        assert!(Cli::try_parse_from(["toxbot", "register"]).is_err());
    }
}
