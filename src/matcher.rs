//! Action selection.
//!
//! Picks the single rule whose pattern matches the pane's command and
//! expands its keystroke templates. There is no priority between rules: if
//! more than one matches, selection fails instead of guessing.

use crate::config::Rule;
use crate::error::{Key2PaneError, Result};
use crate::interpolate::interpolate_all;
use tracing::debug;

/// Find the one rule matching `command`.
///
/// # Errors
///
/// - [`Key2PaneError::NoActionMatched`] if no rule matches
/// - [`Key2PaneError::AmbiguousAction`] if several rules match
pub fn select_rule<'a>(rules: &'a [Rule], command: &str) -> Result<&'a Rule> {
    let matching: Vec<&Rule> = rules.iter().filter(|r| r.matches(command)).collect();
    debug!(command, matches = matching.len(), "matched rules");

    match matching.as_slice() {
        [] => Err(Key2PaneError::NoActionMatched(command.to_string())),
        [rule] => Ok(*rule),
        _ => Err(Key2PaneError::AmbiguousAction {
            command: command.to_string(),
            patterns: matching.iter().map(|r| r.pattern().to_string()).collect(),
        }),
    }
}

/// Resolve the keystrokes to send for `command`.
///
/// Selects the matching rule with [`select_rule`], then substitutes
/// `positional` into each of its templates.
///
/// # Errors
///
/// Everything [`select_rule`] returns, plus
/// [`Key2PaneError::InsufficientArguments`] when a template refers to a
/// positional argument that was not given.
pub fn select_keys(rules: &[Rule], command: &str, positional: &[String]) -> Result<Vec<String>> {
    let rule = select_rule(rules, command)?;
    interpolate_all(rule.keys(), positional)
}
