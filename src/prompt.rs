//! Interactive selection of total columns.
//!
//! Kept apart from [`crate::processing::classify`], which only ever receives an already-resolved
//! list.

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input};
use tracing::warn;

/// Source of a user-chosen list of columns to total.
pub trait TotalsPrompt: Send + Sync {
    /// Return `Some(names)` to override auto-detection, or `None` to keep it.
    fn explicit_columns(&self, available: &[String]) -> Option<Vec<String>>;
}

/// Asks on the controlling terminal using `dialoguer`.
#[derive(Debug, Default)]
pub struct DialoguerPrompt;

impl TotalsPrompt for DialoguerPrompt {
    fn explicit_columns(&self, available: &[String]) -> Option<Vec<String>> {
        let theme = ColorfulTheme::default();
        let manual = Confirm::with_theme(&theme)
            .with_prompt("Would you like to manually select columns to total?")
            .default(false)
            .interact()
            .unwrap_or_else(|e| {
                warn!(error = %e, "totals prompt unavailable; using auto-detection");
                false
            });
        if !manual {
            return None;
        }

        let line: String = Input::with_theme(&theme)
            .with_prompt(format!(
                "Enter column names to total, separated by commas (available: {})",
                available.join(", ")
            ))
            .allow_empty(true)
            .interact_text()
            .unwrap_or_else(|e| {
                warn!(error = %e, "could not read column list");
                String::new()
            });
        Some(parse_column_list(&line))
    }
}

/// Split a comma-separated answer into trimmed, non-empty names.
pub fn parse_column_list(line: &str) -> Vec<String> {
    line.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}
