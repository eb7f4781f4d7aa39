//! Terminal rendering of per-provider status: pending, succeeded, failed.
//!
//! Spinners go to stderr; answers go to stdout so they can be piped.

use super::theme;
use console::Style;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use prism_core::{Dispatcher, ProviderId, ProviderOutcome, ProviderResult};
use std::time::Duration;

/// Human-readable label for a provider name.
pub fn provider_label(name: &str) -> &str {
    match name {
        "gemini" => "Gemini",
        "openai" => "OpenAI",
        other => other,
    }
}

/// Rule-framed header line naming the provider, model and latency.
pub fn answer_header(outcome: &ProviderOutcome) -> String {
    let rule = "─".repeat(60);
    format!(
        "{rule}\n{} ({}) · {}\n{rule}",
        provider_label(&outcome.provider),
        outcome.model,
        format_elapsed(outcome.elapsed)
    )
}

fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.1}s", elapsed.as_secs_f64())
}

/// One spinner per provider, resolved as each answer lands.
pub struct StatusBoard {
    multi: MultiProgress,
    bars: [ProgressBar; 2],
}

impl StatusBoard {
    /// Show both providers as pending.
    pub fn new(dispatcher: &Dispatcher) -> Self {
        let multi = MultiProgress::new();
        let bars = ProviderId::ALL.map(|id| {
            let (name, model) = dispatcher.provider_info(id);
            let pb = multi.add(ProgressBar::new_spinner());
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template(&theme::spinner_template(id))
                    .unwrap(),
            );
            pb.set_message(format!("Processing with {} ({model})...", provider_label(name)));
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });
        Self { multi, bars }
    }

    /// Mark one provider as finished and print its answer.
    pub fn update(&self, outcome: &ProviderOutcome) {
        let bar = &self.bars[match outcome.id {
            ProviderId::A => 0,
            ProviderId::B => 1,
        }];
        let label = theme::provider_status_style(outcome.id)
            .apply_to(provider_label(&outcome.provider));
        let status = match &outcome.result {
            ProviderResult::Success(_) => {
                let green = Style::new().for_stderr().green();
                format!("{} {label} answered", green.apply_to("✓"))
            }
            ProviderResult::Failure(_) => {
                let red = Style::new().for_stderr().red();
                format!("{} {label} failed", red.apply_to("✗"))
            }
        };
        bar.set_style(ProgressStyle::default_spinner().template("{msg}").unwrap());
        bar.finish_with_message(format!("{status} in {}", format_elapsed(outcome.elapsed)));

        let header = theme::provider_answer_style(outcome.id).apply_to(answer_header(outcome));
        let body = outcome.result.log_text();
        self.multi.suspend(|| println!("{header}\n{body}\n"));
    }

    /// Stop any spinner still running.
    pub fn finish(&self) {
        for bar in &self.bars {
            if !bar.is_finished() {
                bar.finish_and_clear();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(result: ProviderResult) -> ProviderOutcome {
        ProviderOutcome {
            id: ProviderId::B,
            provider: "openai".to_string(),
            model: "gpt-4o".to_string(),
            result,
            elapsed: Duration::from_millis(2345),
        }
    }

    #[test]
    fn provider_label_known_and_unknown() {
        assert_eq!(provider_label("gemini"), "Gemini");
        assert_eq!(provider_label("openai"), "OpenAI");
        assert_eq!(provider_label("mock"), "mock");
    }

    #[test]
    fn answer_header_names_provider_model_and_latency() {
        let header = answer_header(&outcome(ProviderResult::Success("A cat.".into())));
        let lines: Vec<&str> = header.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "OpenAI (gpt-4o) · 2.3s");
        assert_eq!(lines[0], lines[2]);
    }
}
