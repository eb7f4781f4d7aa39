//! Guided comparison flow.
//!
//! Walks the user through: API keys → image path → question → comparison,
//! then offers to ask another question about the same image.

use crate::cli::compare::{build_comparator, load_image, run_comparison};
use console::Style;
use dialoguer::{Confirm, Input};
use prism_core::types::is_supported_file_name;
use prism_core::{Config, Prompt};
use std::path::PathBuf;

use crate::cli::theme::prism_theme;

/// Walk the user through one or more comparisons on a single image.
pub async fn guided_compare(config: &Config) -> anyhow::Result<()> {
    let theme = prism_theme();
    let warn = Style::new().for_stderr().yellow();

    // ── Step 1: API keys ────────────────────────────────────────────────────

    let Some(config) = super::setup::ensure_keys(config)? else {
        return Ok(());
    };
    let comparator = build_comparator(&config)?;

    // ── Step 2: Image path ──────────────────────────────────────────────────

    let path = loop {
        let Some(raw_path) = super::handle_interrupt(
            Input::<String>::with_theme(&theme)
                .with_prompt("Path to image")
                .interact_text(),
        )?
        else {
            return Ok(());
        };

        let path = PathBuf::from(shellexpand::tilde(raw_path.trim()).into_owned());

        if !path.is_file() {
            eprintln!(
                "  {}",
                warn.apply_to(format!("File not found: {}", path.display()))
            );
            continue;
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if !is_supported_file_name(&name) {
            eprintln!(
                "  {}",
                warn.apply_to("Unrecognized extension; it will be sent as image/jpeg.")
            );
        }

        break path;
    };

    // ── Step 3+: Question and comparison, repeated on request ───────────────

    loop {
        let Some(question) = super::handle_interrupt(
            Input::<String>::with_theme(&theme)
                .with_prompt("Your question about the image")
                .validate_with(|input: &String| -> Result<(), &str> {
                    if input.trim().is_empty() {
                        Err("Please type a question or instruction")
                    } else {
                        Ok(())
                    }
                })
                .interact_text(),
        )?
        else {
            return Ok(());
        };

        let image = load_image(&path, &config).await?;
        let prompt = Prompt::new(question)?;
        eprintln!();
        run_comparison(&comparator, image, prompt, false).await?;
        eprintln!();

        let again = Confirm::with_theme(&theme)
            .with_prompt("Ask another question about this image?")
            .default(false)
            .interact_opt()?;
        if again != Some(true) {
            break;
        }
    }

    Ok(())
}
