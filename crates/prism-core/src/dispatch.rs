//! Parallel dispatcher for the two vision providers.
//!
//! Each provider call runs in its own tokio task. Tasks are collected in a
//! `JoinSet`, so the observer sees each outcome the moment its call finishes,
//! in true completion order. A provider error, a panic, or an expired timeout
//! inside one task becomes a `Failure` for that provider only.

use crate::providers::{ProviderPair, VisionProvider, VisionRequest};
use crate::types::{ProviderId, ProviderOutcome, ProviderResult};
use futures_util::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

/// Configuration for the dispatcher.
#[derive(Debug, Clone, Default)]
pub struct DispatchOptions {
    /// Per-provider time limit. `None` waits for as long as the call takes.
    pub timeout: Option<Duration>,
}

/// Both outcomes of a dispatch, by fixed role.
#[derive(Debug, Clone)]
pub struct DispatchResults {
    pub a: ProviderOutcome,
    pub b: ProviderOutcome,
}

impl DispatchResults {
    pub fn get(&self, id: ProviderId) -> &ProviderOutcome {
        match id {
            ProviderId::A => &self.a,
            ProviderId::B => &self.b,
        }
    }
}

/// Runs both providers concurrently and reports each completion.
pub struct Dispatcher {
    providers: [(ProviderId, Arc<dyn VisionProvider>); 2],
    options: DispatchOptions,
}

impl Dispatcher {
    pub fn new(pair: ProviderPair, options: DispatchOptions) -> Self {
        Self {
            providers: [(ProviderId::A, pair.a), (ProviderId::B, pair.b)],
            options,
        }
    }

    pub fn options(&self) -> &DispatchOptions {
        &self.options
    }

    /// Name and model of the provider in the given role.
    pub fn provider_info(&self, id: ProviderId) -> (&str, &str) {
        let provider = &self.providers[slot(id)].1;
        (provider.name(), provider.model())
    }

    /// Ask both providers about the same image.
    ///
    /// Spawns one task per provider and calls `on_result` from the calling
    /// task for each outcome as it lands. Returns once both are done; both
    /// entries are always present whatever failed.
    pub async fn dispatch<F>(&self, request: VisionRequest, mut on_result: F) -> DispatchResults
    where
        F: FnMut(&ProviderOutcome),
    {
        let request = Arc::new(request);
        let started = Instant::now();
        let mut tasks = JoinSet::new();

        tracing::debug!(
            "Dispatching '{}' ({}, {} bytes) to {} providers",
            request.image.file_name(),
            request.image.mime_type(),
            request.image.len(),
            self.providers.len()
        );

        for (id, provider) in &self.providers {
            let id = *id;
            let provider = provider.clone();
            let request = request.clone();
            let timeout = self.options.timeout;
            tasks.spawn(async move { invoke_isolated(id, provider, request, timeout, started).await });
        }

        let mut outcomes: [Option<ProviderOutcome>; 2] = [None, None];

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => {
                    match &outcome.result {
                        ProviderResult::Success(_) => tracing::info!(
                            "{} ({}) answered in {:?}",
                            outcome.provider,
                            outcome.id,
                            outcome.elapsed
                        ),
                        ProviderResult::Failure(msg) => tracing::warn!(
                            "{} ({}) failed after {:?}: {msg}",
                            outcome.provider,
                            outcome.id,
                            outcome.elapsed
                        ),
                    }
                    on_result(&outcome);
                    let idx = slot(outcome.id);
                    outcomes[idx] = Some(outcome);
                }
                // Panics are caught inside the task, so this only happens if
                // the runtime is shutting down. The missing slot is filled below.
                Err(e) => tracing::error!("Provider task did not complete: {e}"),
            }
        }

        let [a, b] = outcomes;
        let a = match a {
            Some(outcome) => outcome,
            None => self.lost_outcome(ProviderId::A, started, &mut on_result),
        };
        let b = match b {
            Some(outcome) => outcome,
            None => self.lost_outcome(ProviderId::B, started, &mut on_result),
        };
        DispatchResults { a, b }
    }

    fn lost_outcome<F>(&self, id: ProviderId, started: Instant, on_result: &mut F) -> ProviderOutcome
    where
        F: FnMut(&ProviderOutcome),
    {
        let (name, model) = self.provider_info(id);
        let outcome = ProviderOutcome {
            id,
            provider: name.to_string(),
            model: model.to_string(),
            result: ProviderResult::Failure("Provider task was cancelled".to_string()),
            elapsed: started.elapsed(),
        };
        on_result(&outcome);
        outcome
    }
}

fn slot(id: ProviderId) -> usize {
    match id {
        ProviderId::A => 0,
        ProviderId::B => 1,
    }
}

/// Run one provider call, converting every way it can go wrong into a
/// `Failure` for that provider.
async fn invoke_isolated(
    id: ProviderId,
    provider: Arc<dyn VisionProvider>,
    request: Arc<VisionRequest>,
    timeout: Option<Duration>,
    started: Instant,
) -> ProviderOutcome {
    let call = AssertUnwindSafe(provider.invoke(&request)).catch_unwind();

    let completed = match timeout {
        Some(limit) => tokio::time::timeout(limit, call).await.ok(),
        None => Some(call.await),
    };

    let result = match completed {
        Some(Ok(Ok(text))) => ProviderResult::Success(text),
        Some(Ok(Err(e))) => ProviderResult::Failure(e.to_string()),
        Some(Err(panic)) => ProviderResult::Failure(format!(
            "{} provider panicked: {}",
            provider.name(),
            panic_message(panic.as_ref())
        )),
        None => ProviderResult::Failure(format!(
            "Timeout after {}ms",
            timeout.map(|t| t.as_millis()).unwrap_or_default()
        )),
    };

    ProviderOutcome {
        id,
        provider: provider.name().to_string(),
        model: provider.model().to_string(),
        result,
        elapsed: started.elapsed(),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
