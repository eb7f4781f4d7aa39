//! One comparison end to end: dispatch to both providers, then record.

use crate::config::Config;
use crate::dispatch::{DispatchOptions, DispatchResults, Dispatcher};
use crate::error::{ConfigError, PersistenceError};
use crate::history::HistoryLog;
use crate::providers::{ProviderFactory, ProviderPair, VisionRequest};
use crate::types::{ImagePayload, InteractionRecord, Prompt, ProviderOutcome};
use std::path::PathBuf;
use std::sync::Arc;

/// What happened to the history record of a comparison.
#[derive(Debug)]
pub enum PersistStatus {
    /// Appended to the log at this path
    Saved(PathBuf),
    /// History is disabled for this comparator
    Skipped,
    /// The append failed; the provider results are still valid
    Failed(PersistenceError),
}

/// Everything a finished comparison produced.
#[derive(Debug)]
pub struct ComparisonReport {
    pub results: DispatchResults,
    pub record: InteractionRecord,
    pub persisted: PersistStatus,
}

/// Runs comparisons and records each one.
pub struct Comparator {
    dispatcher: Dispatcher,
    history: Option<Arc<HistoryLog>>,
}

impl Comparator {
    pub fn new(dispatcher: Dispatcher, history: Option<Arc<HistoryLog>>) -> Self {
        Self {
            dispatcher,
            history,
        }
    }

    /// Build providers, timeout policy and history log from config.
    ///
    /// Fails before any request is made if either API key is missing.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let pair: ProviderPair = ProviderFactory::create_pair(&config.providers)?;
        let options = DispatchOptions {
            timeout: config.provider_timeout(),
        };
        let history = Arc::new(HistoryLog::new(config.history_path()));
        Ok(Self::new(Dispatcher::new(pair, options), Some(history)))
    }

    /// Drop the history log; comparisons are shown but not recorded.
    pub fn without_history(mut self) -> Self {
        self.history = None;
        self
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn history(&self) -> Option<&HistoryLog> {
        self.history.as_deref()
    }

    /// Ask both providers, report each answer through `on_result` as it
    /// lands, then append the interaction to the history log.
    ///
    /// A failed append is reported in `persisted`, never as an error.
    pub async fn compare<F>(
        &self,
        image: ImagePayload,
        prompt: Prompt,
        on_result: F,
    ) -> ComparisonReport
    where
        F: FnMut(&ProviderOutcome),
    {
        let image_name = image.file_name().to_string();
        let prompt_text = prompt.as_str().to_string();

        let results = self
            .dispatcher
            .dispatch(VisionRequest::new(image, prompt), on_result)
            .await;

        let record = InteractionRecord::now(
            image_name,
            prompt_text,
            results.a.result.clone(),
            results.b.result.clone(),
        );

        let persisted = match &self.history {
            None => PersistStatus::Skipped,
            Some(log) => match append_off_runtime(log.clone(), record.clone()).await {
                Ok(()) => PersistStatus::Saved(log.path().to_path_buf()),
                Err(e) => {
                    tracing::warn!("Could not save interaction: {e}");
                    PersistStatus::Failed(e)
                }
            },
        };

        ComparisonReport {
            results,
            record,
            persisted,
        }
    }
}

/// Append on the blocking pool; the log does file I/O under a std mutex.
async fn append_off_runtime(
    log: Arc<HistoryLog>,
    record: InteractionRecord,
) -> Result<(), PersistenceError> {
    let path = log.path().to_path_buf();
    tokio::task::spawn_blocking(move || log.record(&record))
        .await
        .unwrap_or_else(|e| {
            tracing::error!("History append task failed: {e}");
            Err(PersistenceError::WriteAborted(path))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GeminiConfig, OpenAiConfig};
    use crate::error::ProviderError;
    use crate::providers::VisionProvider;
    use crate::types::{ProviderId, ProviderResult};
    use async_trait::async_trait;
    use std::time::Duration;

    struct FixedProvider {
        name: &'static str,
        result: Result<String, String>,
        delay: Duration,
    }

    #[async_trait]
    impl VisionProvider for FixedProvider {
        fn name(&self) -> &str {
            self.name
        }

        fn model(&self) -> &str {
            "fixed"
        }

        async fn invoke(&self, _request: &VisionRequest) -> Result<String, ProviderError> {
            tokio::time::sleep(self.delay).await;
            self.result.clone().map_err(ProviderError::new)
        }
    }

    fn comparator(history: Option<Arc<HistoryLog>>) -> Comparator {
        let pair = ProviderPair {
            a: Arc::new(FixedProvider {
                name: "alpha",
                result: Ok("A cat.".to_string()),
                delay: Duration::from_millis(100),
            }),
            b: Arc::new(FixedProvider {
                name: "beta",
                result: Err("timeout".to_string()),
                delay: Duration::ZERO,
            }),
        };
        Comparator::new(Dispatcher::new(pair, DispatchOptions::default()), history)
    }

    fn inputs() -> (ImagePayload, Prompt) {
        (
            ImagePayload::new("cat.png", vec![1, 2, 3]),
            Prompt::new("What is this?").unwrap(),
        )
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_compare_records_after_both_finish() {
        let dir = tempfile::tempdir().unwrap();
        let log = Arc::new(HistoryLog::new(dir.path().join("history.txt")));
        let c = comparator(Some(log.clone()));

        let (image, prompt) = inputs();
        let mut order = Vec::new();
        let report = c
            .compare(image, prompt, |outcome| {
                // Nothing is on disk while results are still arriving
                assert_eq!(log.count_records().unwrap(), 0);
                order.push(outcome.id);
            })
            .await;

        assert_eq!(order, vec![ProviderId::B, ProviderId::A]);
        assert!(matches!(report.persisted, PersistStatus::Saved(_)));
        assert_eq!(report.record.result_a, ProviderResult::Success("A cat.".into()));
        assert_eq!(report.record.result_b, ProviderResult::Failure("timeout".into()));

        let text = log.read_all().unwrap();
        assert_eq!(log.count_records().unwrap(), 1);
        assert!(text.contains("Image: cat.png"));
        assert!(text.contains("PROVIDER_A:\nA cat."));
        assert!(text.contains("PROVIDER_B:\nERROR: timeout"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_persistence_failure_keeps_results() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened for appending
        let log = Arc::new(HistoryLog::new(dir.path()));
        let c = comparator(Some(log));

        let (image, prompt) = inputs();
        let report = c.compare(image, prompt, |_| {}).await;

        assert!(matches!(report.persisted, PersistStatus::Failed(_)));
        assert_eq!(report.results.a.result, ProviderResult::Success("A cat.".into()));
        assert_eq!(report.results.b.result, ProviderResult::Failure("timeout".into()));
    }

    #[tokio::test]
    async fn test_compare_records_on_current_thread_runtime() {
        let dir = tempfile::tempdir().unwrap();
        let log = Arc::new(HistoryLog::new(dir.path().join("history.txt")));
        let c = comparator(Some(log.clone()));

        for _ in 0..3 {
            let (image, prompt) = inputs();
            let report = c.compare(image, prompt, |_| {}).await;
            assert!(matches!(report.persisted, PersistStatus::Saved(_)));
        }
        assert_eq!(log.count_records().unwrap(), 3);
    }

    #[tokio::test]
    async fn test_append_off_runtime_reports_io_failure() {
        let dir = tempfile::tempdir().unwrap();
        let log = Arc::new(HistoryLog::new(dir.path()));
        let record = InteractionRecord::now(
            "cat.png",
            "What is this?",
            ProviderResult::Success("A cat.".into()),
            ProviderResult::Failure("timeout".into()),
        );
        let err = append_off_runtime(log, record).await.unwrap_err();
        assert!(matches!(err, PersistenceError::Append { .. }));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_without_history_skips_recording() {
        let c = comparator(None);
        let (image, prompt) = inputs();
        let report = c.compare(image, prompt, |_| {}).await;
        assert!(matches!(report.persisted, PersistStatus::Skipped));
        assert!(c.history().is_none());
    }

    #[test]
    fn test_from_config_missing_key_fails_before_dispatch() {
        let mut config = Config::default();
        config.providers.gemini = GeminiConfig {
            api_key: "g-key".to_string(),
            ..GeminiConfig::default()
        };
        config.providers.openai = OpenAiConfig {
            api_key: "${PRISM_TEST_UNSET_OPENAI_KEY_C11}".to_string(),
            ..OpenAiConfig::default()
        };
        match Comparator::from_config(&config) {
            Err(ConfigError::MissingApiKeys(keys)) => {
                assert_eq!(keys, vec!["PRISM_TEST_UNSET_OPENAI_KEY_C11".to_string()]);
            }
            Err(e) => panic!("unexpected error: {e}"),
            Ok(_) => panic!("expected missing key error"),
        }
    }

    #[test]
    fn test_from_config_uses_history_path_and_timeout() {
        let mut config = Config::default();
        config.providers.gemini.api_key = "g-key".to_string();
        config.providers.openai.api_key = "o-key".to_string();
        config.history.path = "/tmp/prism-test-history.txt".to_string();
        config.limits.provider_timeout_ms = Some(1500);

        let c = Comparator::from_config(&config).unwrap();
        assert_eq!(
            c.history().unwrap().path(),
            std::path::Path::new("/tmp/prism-test-history.txt")
        );
        assert_eq!(
            c.dispatcher().options().timeout,
            Some(Duration::from_millis(1500))
        );
        assert_eq!(c.dispatcher().provider_info(ProviderId::A).0, "gemini");
        assert_eq!(c.dispatcher().provider_info(ProviderId::B).0, "openai");
    }
}
