//! Command implementations for the `prism` binary.

pub mod compare;
pub mod config;
pub mod display;
pub mod history;
pub mod interactive;
pub mod theme;

use std::path::{Path, PathBuf};

/// Load `.env` from the working directory or its parents, if there is one.
///
/// Variables already set in the environment are not overridden.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

/// Load a specific env file. Returns false if it is missing or malformed.
pub fn load_dotenv_from(path: &Path) -> bool {
    dotenvy::from_path(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::{Config, ProviderFactory};

    #[test]
    fn env_file_keys_resolve_default_references() {
        let dir = tempfile::tempdir().unwrap();
        let env_file = dir.path().join(".env");
        std::fs::write(
            &env_file,
            "PRISM_DOTENV_TEST_GEMINI=g-from-file\nPRISM_DOTENV_TEST_OPENAI=o-from-file\n",
        )
        .unwrap();

        let mut config = Config::default();
        config.providers.gemini.api_key = "${PRISM_DOTENV_TEST_GEMINI}".to_string();
        config.providers.openai.api_key = "${PRISM_DOTENV_TEST_OPENAI}".to_string();
        assert_eq!(ProviderFactory::missing_keys(&config.providers).len(), 2);

        assert!(load_dotenv_from(&env_file));
        assert!(ProviderFactory::missing_keys(&config.providers).is_empty());
        assert!(ProviderFactory::create_pair(&config.providers).is_ok());
    }

    #[test]
    fn missing_env_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!load_dotenv_from(&dir.path().join("absent.env")));
    }
}
