//! The `prism compare` command: one image, one prompt, two answers.

use anyhow::Context;
use clap::Args;
use console::Style;
use prism_core::{
    Comparator, ComparisonReport, ConfigError, Config, ImagePayload, PersistStatus, Prompt,
};
use std::path::{Path, PathBuf};

use super::display::StatusBoard;

/// Arguments for the `compare` command.
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Image to ask about (png, jpg, jpeg, webp, heic, heif)
    #[arg(required = true)]
    pub image: PathBuf,

    /// Question or instruction about the image
    #[arg(short, long)]
    pub prompt: String,

    /// Per-provider timeout in milliseconds (default: wait indefinitely)
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// History log file (overrides the config)
    #[arg(long)]
    pub history: Option<PathBuf>,

    /// Don't append this comparison to the history log
    #[arg(long)]
    pub no_history: bool,

    /// Stream each provider's outcome as a JSON line on stdout
    #[arg(long)]
    pub json: bool,
}

/// Execute the compare command.
pub async fn execute(args: CompareArgs, config: &Config) -> anyhow::Result<()> {
    let config = apply_overrides(config, &args)?;

    let comparator = build_comparator(&config)?;
    let comparator = if args.no_history {
        comparator.without_history()
    } else {
        comparator
    };

    let image = load_image(&args.image, &config).await?;
    let prompt = Prompt::new(args.prompt)?;

    run_comparison(&comparator, image, prompt, args.json).await?;
    Ok(())
}

/// Fold command-line overrides into a copy of the config.
fn apply_overrides(config: &Config, args: &CompareArgs) -> anyhow::Result<Config> {
    let mut config = config.clone();
    if let Some(ms) = args.timeout_ms {
        if ms == 0 {
            anyhow::bail!("--timeout-ms must be > 0");
        }
        config.limits.provider_timeout_ms = Some(ms);
    }
    if let Some(ref path) = args.history {
        config.history.path = path.to_string_lossy().into_owned();
    }
    Ok(config)
}

/// Build the comparator, explaining how to fix missing API keys.
pub(crate) fn build_comparator(config: &Config) -> anyhow::Result<Comparator> {
    match Comparator::from_config(config) {
        Ok(comparator) => Ok(comparator),
        Err(ConfigError::MissingApiKeys(keys)) => {
            report_missing_keys(&keys);
            anyhow::bail!("API key not set: {}", keys.join(", "))
        }
        Err(e) => Err(e.into()),
    }
}

/// Print which keys are missing and how to provide them.
pub(crate) fn report_missing_keys(keys: &[String]) {
    let red = Style::new().for_stderr().red().bold();
    let warn = Style::new().for_stderr().yellow();
    let dim = Style::new().for_stderr().dim();

    eprintln!();
    eprintln!("  {}", red.apply_to("API keys are not configured."));
    for key in keys {
        eprintln!("  {}", warn.apply_to(format!("✗ {key} not found")));
    }
    eprintln!();
    eprintln!("  Add them to a .env file in the working directory:");
    eprintln!("    {}", dim.apply_to("GEMINI_API_KEY=your_gemini_key"));
    eprintln!("    {}", dim.apply_to("OPENAI_API_KEY=your_openai_key"));
    eprintln!("  export them in your shell, or save them with");
    eprintln!("  `prism config set-key <gemini|openai> <KEY>`.");
    eprintln!();
}

/// Read an image from disk, enforcing the configured size limit.
pub(crate) async fn load_image(path: &Path, config: &Config) -> anyhow::Result<ImagePayload> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Cannot read image {}", path.display()))?;
    if !metadata.is_file() {
        anyhow::bail!("Not a file: {}", path.display());
    }

    let max_bytes = config.limits.max_image_size_mb.saturating_mul(1024 * 1024);
    if metadata.len() > max_bytes {
        anyhow::bail!(
            "Image too large: {} ({:.1}MB > {}MB)",
            path.display(),
            metadata.len() as f64 / (1024.0 * 1024.0),
            config.limits.max_image_size_mb
        );
    }

    let image = ImagePayload::from_path(path)
        .await
        .with_context(|| format!("Cannot read image {}", path.display()))?;
    tracing::debug!(
        "Loaded {} ({}, {} bytes)",
        image.file_name(),
        image.mime_type(),
        image.len()
    );
    Ok(image)
}

/// Run a comparison, rendering each answer as it lands, then report whether
/// the interaction was saved.
pub(crate) async fn run_comparison(
    comparator: &Comparator,
    image: ImagePayload,
    prompt: Prompt,
    json: bool,
) -> anyhow::Result<ComparisonReport> {
    let report = if json {
        comparator
            .compare(image, prompt, |outcome| {
                if let Ok(line) = serde_json::to_string(outcome) {
                    println!("{line}");
                }
            })
            .await
    } else {
        let board = StatusBoard::new(comparator.dispatcher());
        let report = comparator
            .compare(image, prompt, |outcome| board.update(outcome))
            .await;
        board.finish();
        report
    };

    match &report.persisted {
        PersistStatus::Saved(path) => {
            let dim = Style::new().for_stderr().dim();
            eprintln!(
                "{}",
                dim.apply_to(format!("Interaction saved to {}", path.display()))
            );
        }
        PersistStatus::Failed(e) => {
            let warn = Style::new().for_stderr().yellow();
            eprintln!("{}", warn.apply_to(format!("Warning: could not save history: {e}")));
        }
        PersistStatus::Skipped => {}
    }

    Ok(report)
}
