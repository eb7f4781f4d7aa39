//! The `prism history` command for viewing past comparisons.

use clap::Args;
use prism_core::{Config, HistoryLog};

/// Arguments for the `history` command.
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Only print the history file path
    #[arg(long)]
    pub path: bool,

    /// Only print the number of recorded comparisons
    #[arg(long, conflicts_with = "path")]
    pub count: bool,
}

/// Execute the history command.
pub async fn execute(args: HistoryArgs, config: &Config) -> anyhow::Result<()> {
    let log = HistoryLog::new(config.history_path());

    if args.path {
        println!("{}", log.path().display());
        return Ok(());
    }

    if args.count {
        println!("{}", log.count_records()?);
        return Ok(());
    }

    let text = log.read_all()?;
    if text.is_empty() {
        tracing::info!("No history yet at {}", log.path().display());
    } else {
        print!("{text}");
    }
    Ok(())
}
