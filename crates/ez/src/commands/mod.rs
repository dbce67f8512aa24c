//! ez app cli definition and entrypoint.
pub mod chat;
pub mod commit;
pub mod config;

use anyhow::{Context, Result};
use clap::{ArgAction, CommandFactory, Parser, Subcommand, error::ErrorKind};
use ez_core::config::{ConfigKey, ConfigStore, RawConfig};
use ez_core::locale;

use crate::log::setup_logging;

/// ez - a CLI assistant for OpenAI-compatible chat models.
#[derive(Parser, Debug)]
#[command(name = "ez", author, version, about, long_about = None, disable_version_flag = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Show version.
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: Option<bool>,

    /// Show verbose logs.
    #[arg(long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Configure the CLI.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Chat with the AI.
    Chat,
    /// Generate a commit message for staged changes.
    Commit {
        /// Extra context to steer the generated message.
        #[arg(long)]
        context: Option<String>,
        /// Commit without asking for confirmation.
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Set one or more KEY=value pairs.
    Set {
        /// Pairs in KEY=value form, e.g. OPENAI_KEY=sk-...
        #[arg(required = true)]
        pairs: Vec<String>,
    },
    /// Print all config values.
    Get,
    /// Edit the config interactively.
    Ui,
}

fn error_exit_code(err: &clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

/// `ez --help <command>` asks for that command's help, but clap only
/// understands `ez <command> --help`; a leading help flag followed by a known
/// command name is reordered before parsing.
fn reorder_leading_help(mut args: Vec<String>) -> Vec<String> {
    if args.len() >= 3
        && matches!(args[1].as_str(), "--help" | "-h")
        && matches!(args[2].as_str(), "config" | "chat" | "commit")
    {
        let help = args.remove(1);
        args.push(help);
    }
    args
}

/// Runs the main CLI application.
pub async fn run_app() -> Result<()> {
    let args = reorder_leading_help(std::env::args().collect());
    let cli = match Cli::try_parse_from(&args) {
        Ok(cli) => cli,
        Err(err) => {
            // clap prints help/usage itself; help and version exit 0, any
            // invalid invocation exits 1. An unknown command additionally
            // prints the general help.
            let code = error_exit_code(&err);
            let _ = err.print();
            if err.kind() == ErrorKind::InvalidSubcommand {
                let _ = Cli::command().print_help();
            }
            std::process::exit(code);
        }
    };

    if cli.verbose {
        setup_logging().context("Failed to set up logging")?;
    }

    let store = ConfigStore::new(None);

    // Activate the configured language before any user-facing output. A
    // broken config file should not prevent `config` from running, so parse
    // failures fall back to English here.
    let raw = store.read_raw().unwrap_or_default();
    if let Ok(language) =
        ConfigKey::Language.normalize(raw.get(ConfigKey::Language.as_str()).map(String::as_str))
    {
        locale::set_language(&language);
    }

    match &cli.command {
        Commands::Config { action } => config::execute(action, &store).await,
        Commands::Chat => {
            let valid = store.load(&RawConfig::new())?;
            locale::set_language(&valid.language);
            chat::execute(&valid).await
        }
        Commands::Commit { context, yes } => {
            let valid = store.load(&RawConfig::new())?;
            locale::set_language(&valid.language);
            commit::execute(&valid, context.as_deref(), *yes).await
        }
    }
}
