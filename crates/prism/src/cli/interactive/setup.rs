//! API key detection and entry before the first comparison.

use crate::cli::config::{config_has_key, save_key_to_config, KeyProvider};
use console::Style;
use dialoguer::{Password, Select};
use prism_core::providers::resolve_env_var;
use prism_core::Config;

use crate::cli::theme::prism_theme;

/// Make sure both provider keys resolve, asking for any that don't.
///
/// Returns `None` if the user skips a key; the caller should not start a
/// comparison in that case.
pub fn ensure_keys(config: &Config) -> anyhow::Result<Option<Config>> {
    let theme = prism_theme();
    let dim = Style::new().for_stderr().dim();
    let warn = Style::new().for_stderr().yellow();
    let mut config = config.clone();

    for provider in [KeyProvider::Gemini, KeyProvider::Openai] {
        if resolve_env_var(configured_key(&config, provider)).is_some() {
            if !config_has_key(&config, provider) {
                eprintln!(
                    "  {}",
                    dim.apply_to(format!("Using {} from environment", provider.env_var()))
                );
            }
            continue;
        }

        eprintln!("  {}", warn.apply_to(format!("{} not set.", provider.env_var())));

        let key: String = match Password::with_theme(&theme)
            .with_prompt(format!(
                "Enter your {} API key (empty to cancel)",
                provider.section()
            ))
            .allow_empty_password(true)
            .interact()
        {
            Ok(k) if !k.trim().is_empty() => k,
            _ => return Ok(None),
        };

        let save_options = &["Yes, save to config file", "No, use for this session only"];
        let save_choice = Select::with_theme(&theme)
            .with_prompt("Save this key for future sessions?")
            .items(save_options)
            .default(0)
            .interact_opt()?;

        match save_choice {
            Some(0) => {
                let path = Config::default_path();
                match save_key_to_config(&path, provider, &key) {
                    Ok(()) => eprintln!(
                        "  {}",
                        dim.apply_to(format!("Key saved to {}", path.display()))
                    ),
                    Err(e) => {
                        eprintln!(
                            "  {}",
                            warn.apply_to(format!("Could not save to config: {e}"))
                        );
                        eprintln!("  Using key for this session only.");
                    }
                }
            }
            Some(1) => {}
            _ => return Ok(None),
        }

        set_key(&mut config, provider, key);
    }

    Ok(Some(config))
}

fn configured_key(config: &Config, provider: KeyProvider) -> &str {
    match provider {
        KeyProvider::Gemini => &config.providers.gemini.api_key,
        KeyProvider::Openai => &config.providers.openai.api_key,
    }
}

fn set_key(config: &mut Config, provider: KeyProvider, key: String) {
    match provider {
        KeyProvider::Gemini => config.providers.gemini.api_key = key,
        KeyProvider::Openai => config.providers.openai.api_key = key,
    }
}
