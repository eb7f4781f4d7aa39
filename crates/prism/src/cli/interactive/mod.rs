//! Interactive CLI mode, the guided experience for bare `prism` invocation.
//!
//! When `prism` is invoked with no subcommand on a TTY, this module provides
//! a menu-driven interface that delegates to the same comparison logic as the
//! flag-based CLI.

pub mod compare;
pub mod setup;

use crate::cli::compare::report_missing_keys;
use crate::cli::theme;
use console::Style;
use dialoguer::Select;
use prism_core::{Config, HistoryLog, ProviderFactory};

/// Convert a dialoguer result into `Ok(Some(value))` on success, `Ok(None)` on
/// interrupt (Ctrl+C / terminal disconnect), and `Err` for other I/O failures.
fn handle_interrupt<T>(result: dialoguer::Result<T>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(dialoguer::Error::IO(e)) if e.kind() == std::io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Main menu options presented to the user.
const MENU_ITEMS: &[&str] = &[
    "Compare answers for an image",
    "View interaction history",
    "Show configuration",
    "Exit",
];

/// Entry point for interactive mode.
pub async fn run(config: &Config) -> anyhow::Result<()> {
    theme::print_banner(config);

    let missing = missing_keys(config);
    if !missing.is_empty() {
        report_missing_keys(&missing);
    }

    let theme = theme::prism_theme();

    loop {
        let selection = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(MENU_ITEMS)
            .default(0)
            .interact_opt()?;

        match selection {
            Some(0) => {
                // A failed comparison setup returns to the menu
                if let Err(e) = compare::guided_compare(config).await {
                    let err = Style::new().for_stderr().red();
                    eprintln!("  {} {e}", err.apply_to("✗"));
                }
            }
            Some(1) => show_history(config)?,
            Some(2) => show_config(config)?,
            Some(3) | None => break, // Exit or Ctrl+C / Esc
            _ => unreachable!(),
        }
    }

    Ok(())
}

/// API keys that won't resolve with the current config and environment.
fn missing_keys(config: &Config) -> Vec<String> {
    ProviderFactory::missing_keys(&config.providers)
}

/// Print the whole history log between rules.
fn show_history(config: &Config) -> anyhow::Result<()> {
    let dim = Style::new().for_stderr().dim();
    let log = HistoryLog::new(config.history_path());
    let text = log.read_all()?;

    eprintln!();
    if text.is_empty() {
        eprintln!(
            "  {}",
            dim.apply_to(format!("No history yet at {}", log.path().display()))
        );
    } else {
        eprintln!(
            "  {}",
            dim.apply_to(format!(
                "{} interaction(s) in {}",
                prism_core::history::count_records_in(&text),
                log.path().display()
            ))
        );
        eprintln!();
        print!("{text}");
    }
    eprintln!();
    Ok(())
}

/// Interactive config viewer: a summary of current settings plus options to
/// display the full TOML or the config file path.
fn show_config(config: &Config) -> anyhow::Result<()> {
    let theme = theme::prism_theme();
    let dim = Style::new().for_stderr().dim();
    let cyan = Style::new().for_stderr().cyan();
    let label = Style::new().for_stderr().bold();

    loop {
        eprintln!();
        eprintln!("  {}", cyan.apply_to("Current configuration:"));
        eprintln!();

        let config_path = Config::default_path();
        let path_note = if config_path.exists() {
            "(exists)"
        } else {
            "(using defaults)"
        };

        eprintln!(
            "    {:<20} {} {}",
            label.apply_to("Config file:"),
            config_path.display(),
            dim.apply_to(path_note)
        );
        eprintln!(
            "    {:<20} {}",
            label.apply_to("Provider A:"),
            config.providers.gemini.model
        );
        eprintln!(
            "    {:<20} {} (max {} tokens)",
            label.apply_to("Provider B:"),
            config.providers.openai.model,
            config.providers.openai.max_tokens
        );
        eprintln!(
            "    {:<20} {}",
            label.apply_to("History log:"),
            config.history_path().display()
        );
        eprintln!(
            "    {:<20} {}",
            label.apply_to("Timeout:"),
            match config.limits.provider_timeout_ms {
                Some(ms) => format!("{ms}ms per provider"),
                None => "none (wait for both)".to_string(),
            }
        );
        eprintln!(
            "    {:<20} {}",
            label.apply_to("Log level:"),
            config.logging.level
        );
        eprintln!();

        let items = &["View full config (TOML)", "Show config file path", "Back"];

        let selection = Select::with_theme(&theme)
            .with_prompt("Configuration")
            .items(items)
            .default(0)
            .interact_opt()?;

        match selection {
            Some(0) => match config.to_toml() {
                Ok(toml) => {
                    eprintln!();
                    eprintln!("{}", dim.apply_to("─".repeat(50)));
                    eprintln!("{toml}");
                    eprintln!("{}", dim.apply_to("─".repeat(50)));
                    eprintln!();
                }
                Err(e) => {
                    let err = Style::new().for_stderr().red();
                    eprintln!("  {} Failed to serialize config: {e}", err.apply_to("✗"));
                    eprintln!();
                }
            },
            Some(1) => {
                eprintln!();
                eprintln!("  {}", Config::default_path().display());
                eprintln!();
            }
            Some(2) | None => break, // Back or Esc / Ctrl+C
            _ => unreachable!(),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_interrupt_maps_interrupted_to_none() {
        let err = dialoguer::Error::IO(std::io::Error::new(
            std::io::ErrorKind::Interrupted,
            "ctrl-c",
        ));
        let result: anyhow::Result<Option<()>> = handle_interrupt(Err(err));
        assert!(result.unwrap().is_none());
    }

    #[test]
    fn handle_interrupt_passes_values_and_errors() {
        assert_eq!(handle_interrupt(Ok(7)).unwrap(), Some(7));
        let err = dialoguer::Error::IO(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        assert!(handle_interrupt::<()>(Err(err)).is_err());
    }

    #[test]
    fn missing_keys_names_each_unset_variable() {
        let mut config = Config::default();
        config.providers.gemini.api_key = "${PRISM_MENU_TEST_UNSET_GEMINI}".to_string();
        config.providers.openai.api_key = "${PRISM_MENU_TEST_UNSET_OPENAI}".to_string();
        assert_eq!(
            missing_keys(&config),
            vec![
                "PRISM_MENU_TEST_UNSET_GEMINI".to_string(),
                "PRISM_MENU_TEST_UNSET_OPENAI".to_string(),
            ]
        );
    }

    #[test]
    fn missing_keys_tracks_each_role() {
        let mut config = Config::default();
        config.providers.gemini.api_key = "g-key".to_string();
        config.providers.openai.api_key = String::new();
        assert_eq!(
            missing_keys(&config),
            vec!["providers.openai.api_key".to_string()]
        );

        config.providers.openai.api_key = "o-key".to_string();
        assert!(missing_keys(&config).is_empty());
    }
}
