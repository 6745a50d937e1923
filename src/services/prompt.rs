//! Blocking user prompts
//!
//! Destructive actions ask for confirmation and some failures are reported
//! with a blocking alert. Sections reach the user through [`UserPrompt`] so
//! a browser dialog, a terminal or a test script can answer.

use std::sync::Arc;

pub trait UserPrompt: Send + Sync {
    /// Ask a yes/no question; `true` means go ahead
    fn confirm(&self, question: &str) -> bool;

    /// Show a message the user has to acknowledge
    fn alert(&self, message: &str);
}

pub type DynPrompt = Arc<dyn UserPrompt>;

/// Non-interactive prompt: answers every confirmation with `assume_yes` and
/// writes alerts to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogPrompt {
    pub assume_yes: bool,
}

impl UserPrompt for LogPrompt {
    fn confirm(&self, question: &str) -> bool {
        tracing::info!("Confirmation requested: {} -> {}", question, self.assume_yes);
        self.assume_yes
    }

    fn alert(&self, message: &str) {
        tracing::warn!("Alert: {}", message);
    }
}
