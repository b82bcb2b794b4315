//! Positional placeholder substitution for keystroke templates.
//!
//! - `{n}` is replaced by the n-th positional argument, counting from 1
//! - `{}` is replaced by all positional arguments joined with a space
//! - `\{` and `\}` produce literal braces
//!
//! Any other brace text is left as is.
//!
//! # Example
//!
//! ```
//! use key2pane::interpolate::interpolate;
//!
//! let args = vec!["foo".to_string(), "bar".to_string()];
//! assert_eq!(interpolate("echo {2} {1}", &args).unwrap(), "echo bar foo");
//! assert_eq!(interpolate(r"echo \{1\}", &args).unwrap(), "echo {1}");
//! ```

use crate::error::{Key2PaneError, Result};
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Matches an escaped brace (group 1) or a placeholder with an optional index (group 2).
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\([{}])|\{(\d*)\}").expect("placeholder regex is a compile-time constant")
});

/// Substitute positional arguments into a single keystroke template.
///
/// # Errors
///
/// Returns [`Key2PaneError::InsufficientArguments`] if the template refers to
/// an argument that was not supplied.
pub fn interpolate(template: &str, args: &[String]) -> Result<String> {
    let mut result = String::with_capacity(template.len());
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(template) {
        let Some(whole) = caps.get(0) else { continue };
        result.push_str(&template[last..whole.start()]);
        result.push_str(&replacement(template, &caps, args)?);
        last = whole.end();
    }
    result.push_str(&template[last..]);

    Ok(result)
}

/// Substitute positional arguments into every template, preserving order.
pub fn interpolate_all(templates: &[String], args: &[String]) -> Result<Vec<String>> {
    templates.iter().map(|t| interpolate(t, args)).collect()
}

fn replacement(template: &str, caps: &Captures<'_>, args: &[String]) -> Result<String> {
    if let Some(brace) = caps.get(1) {
        return Ok(brace.as_str().to_string());
    }

    let digits = caps.get(2).map_or("", |m| m.as_str());
    if digits.is_empty() {
        return Ok(args.join(" "));
    }

    let insufficient = || Key2PaneError::InsufficientArguments {
        keys: template.to_string(),
        supplied: args.len(),
    };
    // An index too large for usize can never be satisfied either.
    let n: usize = digits.parse().map_err(|_| insufficient())?;
    n.checked_sub(1)
        .and_then(|i| args.get(i))
        .cloned()
        .ok_or_else(insufficient)
}
