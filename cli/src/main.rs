//! Vitrine command line
//!
//! Inspects and changes the stored site theme, replays recorded page
//! interactions and watches the OS color scheme.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use vitrine_core::Config;

#[derive(Parser, Debug)]
#[command(name = "vitrine", version, about = "Site theme and page behavior tool")]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Preferences database, overriding the configured path
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the resolved theme and where it came from
    Theme,
    /// Flip the theme and store it as an explicit choice
    Toggle,
    /// Forget the explicit choice and follow the OS again
    Reset,
    /// Apply recorded events to a page and print the resulting document
    Replay {
        /// Page description (JSON)
        page: PathBuf,
        /// Event list (JSON array)
        events: PathBuf,
        /// Pretend the OS prefers dark (or light with `--dark=false`)
        #[arg(long)]
        dark: Option<bool>,
        /// Keep preference changes in memory
        #[arg(long)]
        ephemeral: bool,
    },
    /// Follow OS color scheme changes until interrupted
    Watch,
}

impl Cli {
    fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(database) = &self.database {
            config.database_path = database.clone();
        }

        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    vitrine_core::init_logging();

    let cli = Cli::parse();
    let config = cli.load_config()?;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Command::Theme => commands::theme(&config, &mut out),
        Command::Toggle => commands::toggle(&config, &mut out),
        Command::Reset => commands::reset(&config, &mut out),
        Command::Replay {
            page,
            events,
            dark,
            ephemeral,
        } => commands::replay(&config, &page, &events, dark, ephemeral, &mut out),
        Command::Watch => commands::watch(&config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["vitrine", "toggle", "--database", "/tmp/prefs.db"]);
        assert!(matches!(cli.command, Command::Toggle));

        let config = cli.load_config().unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/prefs.db"));
    }

    #[test]
    fn test_parses_replay() {
        let cli = Cli::parse_from([
            "vitrine",
            "replay",
            "pages/index.json",
            "pages/index-events.json",
            "--dark",
            "true",
            "--ephemeral",
        ]);

        match cli.command {
            Command::Replay {
                page,
                dark,
                ephemeral,
                ..
            } => {
                assert_eq!(page, PathBuf::from("pages/index.json"));
                assert_eq!(dark, Some(true));
                assert!(ephemeral);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
