//! Provider colours and the dialoguer theme built on them.
//!
//! Provider A is drawn in blue and Provider B in magenta everywhere: spinner,
//! status line, answer header, banner.

use console::{style, Color, Style};
use dialoguer::theme::ColorfulTheme;
use prism_core::{Config, ProviderId};

/// Accent colour of a provider role.
pub fn provider_color(id: ProviderId) -> Color {
    match id {
        ProviderId::A => Color::Blue,
        ProviderId::B => Color::Magenta,
    }
}

/// Bold accent style for stderr (status lines, banner).
pub fn provider_status_style(id: ProviderId) -> Style {
    Style::new().for_stderr().fg(provider_color(id)).bold()
}

/// Bold accent style for stdout (answer headers).
pub fn provider_answer_style(id: ProviderId) -> Style {
    Style::new().fg(provider_color(id)).bold()
}

/// indicatif spinner template coloured for a provider role.
pub fn spinner_template(id: ProviderId) -> String {
    let color = match id {
        ProviderId::A => "blue",
        ProviderId::B => "magenta",
    };
    format!("{{spinner:.{color}}} {{msg}} [{{elapsed}}]")
}

/// Prompt theme: the defaults, with the selection marker in Provider A's colour.
pub fn prism_theme() -> ColorfulTheme {
    let accent = provider_color(ProviderId::A);
    ColorfulTheme {
        prompt_prefix: style("◆".to_string()).for_stderr().fg(accent),
        active_item_prefix: style("▸".to_string()).for_stderr().fg(accent),
        active_item_style: Style::new().for_stderr().fg(accent),
        ..ColorfulTheme::default()
    }
}

/// Banner naming the model behind each role.
pub fn print_banner(config: &Config) {
    let dim = Style::new().for_stderr().dim();
    let models = [
        (ProviderId::A, &config.providers.gemini.model),
        (ProviderId::B, &config.providers.openai.model),
    ];

    eprintln!();
    eprintln!(
        "  {} {}",
        Style::new().for_stderr().bold().apply_to("Prism"),
        dim.apply_to(format!("v{}", prism_core::VERSION))
    );
    for (id, model) in models {
        eprintln!(
            "  {} {model}",
            provider_status_style(id).apply_to(format!("{:<10}", id.heading()))
        );
    }
    eprintln!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_have_distinct_colors() {
        assert_ne!(
            provider_color(ProviderId::A),
            provider_color(ProviderId::B)
        );
    }

    #[test]
    fn spinner_template_uses_role_color() {
        assert_eq!(
            spinner_template(ProviderId::B),
            "{spinner:.magenta} {msg} [{elapsed}]"
        );
        assert!(spinner_template(ProviderId::A).starts_with("{spinner:.blue}"));
    }
}
