//! Prism CLI - ask Gemini and OpenAI about the same image, side by side.
//!
//! Both providers are queried in parallel; each answer is shown as soon as it
//! arrives, and every comparison is appended to a plain-text history log.
//!
//! # Usage
//!
//! ```bash
//! # Compare answers for one image
//! prism compare cat.png --prompt "What is this?"
//!
//! # Stream outcomes as JSON lines
//! prism compare cat.png -p "Describe the scene" --json
//!
//! # Show past comparisons
//! prism history
//!
//! # Guided mode
//! prism
//! ```

use clap::{CommandFactory, Parser, Subcommand};
use std::io::IsTerminal;

mod cli;
mod logging;

/// Prism - compare two vision models on the same image.
#[derive(Parser, Debug)]
#[command(name = "prism")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask both providers about an image and record the answers
    Compare(cli::compare::CompareArgs),

    /// Show the interaction history log
    History(cli::history::HistoryArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Keys in .env feed the default ${GEMINI_API_KEY}/${OPENAI_API_KEY} references
    let dotenv_path = cli::load_dotenv();

    // Logging isn't initialized yet, so config warnings use eprintln.
    let config = match prism_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `prism config path`."
            );
            prism_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Prism v{}", prism_core::VERSION);
    if let Some(path) = dotenv_path {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    match cli.command {
        Some(Commands::Compare(args)) => cli::compare::execute(args, &config).await,
        Some(Commands::History(args)) => cli::history::execute(args, &config).await,
        Some(Commands::Config(args)) => cli::config::execute(args).await,
        None if std::io::stdin().is_terminal() && std::io::stderr().is_terminal() => {
            cli::interactive::run(&config).await
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_compare_command() {
        let cli = Cli::try_parse_from([
            "prism",
            "compare",
            "cat.png",
            "--prompt",
            "What is this?",
            "--timeout-ms",
            "5000",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Compare(args)) => {
                assert_eq!(args.image, std::path::PathBuf::from("cat.png"));
                assert_eq!(args.prompt, "What is this?");
                assert_eq!(args.timeout_ms, Some(5000));
                assert!(args.json);
                assert!(!args.no_history);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn compare_requires_prompt() {
        assert!(Cli::try_parse_from(["prism", "compare", "cat.png"]).is_err());
    }

    #[test]
    fn parses_set_key() {
        let cli = Cli::try_parse_from(["prism", "config", "set-key", "openai", "sk-1"]).unwrap();
        match cli.command {
            Some(Commands::Config(cli::config::ConfigArgs {
                command: cli::config::ConfigCommand::SetKey { provider, key },
            })) => {
                assert_eq!(provider, cli::config::KeyProvider::Openai);
                assert_eq!(key, "sk-1");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn bare_invocation_has_no_command() {
        let cli = Cli::try_parse_from(["prism", "-v"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.verbose);
    }
}
