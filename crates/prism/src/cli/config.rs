//! The `prism config` command for configuration management.

use clap::{Args, Subcommand, ValueEnum};
use prism_core::Config;
use std::path::Path;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display current configuration
    Show,

    /// Show config file path
    Path,

    /// Initialize a new config file with defaults
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// Save a provider API key to the config file
    SetKey {
        /// Provider the key belongs to
        #[arg(value_enum)]
        provider: KeyProvider,

        /// The API key
        key: String,
    },
}

/// Providers that take an API key.
#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum KeyProvider {
    /// Google Gemini (provider A)
    Gemini,
    /// OpenAI (provider B)
    Openai,
}

impl KeyProvider {
    /// Config table name under `[providers]`.
    pub fn section(self) -> &'static str {
        match self {
            KeyProvider::Gemini => "gemini",
            KeyProvider::Openai => "openai",
        }
    }

    /// Environment variable the default config reads the key from.
    pub fn env_var(self) -> &'static str {
        match self {
            KeyProvider::Gemini => "GEMINI_API_KEY",
            KeyProvider::Openai => "OPENAI_API_KEY",
        }
    }
}

/// Execute the config command.
pub async fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let config = Config::load()?;
            let toml = config.to_toml()?;
            println!("{}", toml);
        }

        ConfigCommand::Path => {
            let path = Config::default_path();
            println!("{}", path.display());
        }

        ConfigCommand::Init { force } => {
            let path = Config::default_path();

            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at: {}\nUse --force to overwrite.",
                    path.display()
                );
            }

            // Ensure parent directory exists
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            // Write default config
            let config = Config::default();
            let toml = config.to_toml()?;
            std::fs::write(&path, toml)?;

            tracing::info!("Config file created at: {}", path.display());
            println!("Configuration initialized at: {}", path.display());
        }

        ConfigCommand::SetKey { provider, key } => {
            let path = Config::default_path();
            save_key_to_config(&path, provider, &key)?;
            println!(
                "Saved {} API key to {}",
                provider.section(),
                path.display()
            );
        }
    }

    Ok(())
}

/// Save an API key to a config file, preserving existing comments and keys.
pub(crate) fn save_key_to_config(
    config_path: &Path,
    provider: KeyProvider,
    key: &str,
) -> anyhow::Result<()> {
    if key.trim().is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    let content = if config_path.exists() {
        std::fs::read_to_string(config_path)?
    } else {
        String::new()
    };

    let mut doc: toml_edit::DocumentMut = content.parse()?;
    let section = provider.section();

    // Ensure [providers] table exists
    if !doc.contains_key("providers") {
        let mut table = toml_edit::Table::new();
        table.set_implicit(true);
        doc["providers"] = toml_edit::Item::Table(table);
    }

    // Ensure [providers.<provider>] table exists
    if !doc["providers"]
        .as_table()
        .is_some_and(|t| t.contains_key(section))
    {
        doc["providers"][section] = toml_edit::Item::Table(toml_edit::Table::new());
    }

    doc["providers"][section]["api_key"] = toml_edit::value(key);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(config_path, doc.to_string())?;

    tracing::debug!("Saved {section} key to {}", config_path.display());
    Ok(())
}

/// Check if the config already has a literal (non-`${VAR}`) key for the provider.
pub(crate) fn config_has_key(config: &Config, provider: KeyProvider) -> bool {
    let key = match provider {
        KeyProvider::Gemini => &config.providers.gemini.api_key,
        KeyProvider::Openai => &config.providers.openai.api_key,
    };
    !key.is_empty() && !key.starts_with("${")
}
