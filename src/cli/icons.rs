//! Console output icons and styled labels.

use console::{style, StyledObject};

use crate::analysis::Severity;
use crate::models::Sender;

/// Success checkmark icon (green ✓).
pub fn success() -> StyledObject<&'static str> {
    style("✓").green()
}

/// Info/progress arrow icon (cyan →).
pub fn info() -> StyledObject<&'static str> {
    style("→").cyan()
}

/// Error icon (red ✗).
pub fn error() -> StyledObject<&'static str> {
    style("✗").red()
}

/// Bullet point.
pub fn bullet() -> StyledObject<&'static str> {
    style("•").dim()
}

/// Severity label colored by how serious it is.
pub fn severity(severity: Severity) -> StyledObject<&'static str> {
    let label = style(severity.as_str()).bold();
    match severity {
        Severity::High => label.red(),
        Severity::Medium => label.yellow(),
        Severity::Low => label.green(),
    }
}

/// Speaker label for a chat line.
pub fn speaker(sender: Sender) -> StyledObject<&'static str> {
    match sender {
        Sender::User => style("You").cyan().bold(),
        Sender::Ai => style("Nomiko").magenta().bold(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_keep_text() {
        for s in [Severity::High, Severity::Medium, Severity::Low] {
            assert!(severity(s).to_string().contains(s.as_str()));
        }
        assert!(speaker(Sender::User).to_string().contains("You"));
        let _ = success().to_string();
        let _ = info().to_string();
        let _ = error().to_string();
        let _ = bullet().to_string();
    }
}
