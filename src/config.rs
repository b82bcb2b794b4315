//! Configuration types for key2pane.
//!
//! The config file is an open mapping of setting name to value. The known
//! settings are `session`, `window`, `index` and `reset`; the reserved key
//! `actions` holds the rules. Unknown keys are kept but never read.
//!
//! # Config Format
//!
//! ```json
//! {
//!   "reset": true,
//!   "actions": [
//!     { "regex": "bash|zsh|fish", "keys": ["echo {1}", "Enter"] },
//!     { "regex": "n?vim", "keys": [":e {1}", "Enter"] }
//!   ]
//! }
//! ```
//!
//! The same document may be written as TOML when the file ends in `.toml`:
//!
//! ```toml
//! reset = true
//!
//! [[actions]]
//! regex = "bash|zsh|fish"
//! keys = ["echo {1}", "Enter"]
//! ```

use crate::error::ParseError;
use regex::Regex;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Reserved key holding the rule entries.
pub const ACTIONS_KEY: &str = "actions";

/// A single action: keys to send when the pane's command matches `pattern`.
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: String,
    regex: Regex,
    keys: Vec<String>,
}

impl Rule {
    /// Build a rule, compiling `pattern` so that it only matches at the
    /// start of a command.
    pub fn new(pattern: impl Into<String>, keys: Vec<String>) -> Result<Self, regex::Error> {
        let pattern = pattern.into();
        let regex = Regex::new(&format!("^(?:{pattern})"))?;
        Ok(Self {
            pattern,
            regex,
            keys,
        })
    }

    /// The pattern as written in the config.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Keystroke templates, in the order they are sent.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Whether the pattern matches a prefix of `command`.
    pub fn matches(&self, command: &str) -> bool {
        self.regex.is_match(command)
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern && self.keys == other.keys
    }
}

/// One entry of the `actions` array as it appears in the file.
#[derive(Debug, Deserialize)]
struct RuleEntry {
    #[serde(alias = "command")]
    regex: String,
    keys: Vec<String>,
}

/// A parsed config document, unvalidated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawConfig {
    /// File the document was read from.
    pub path: PathBuf,
    /// Top-level settings, exactly as parsed.
    pub values: Map<String, Value>,
}

impl RawConfig {
    /// Parse config contents, picking the format from the path's extension.
    ///
    /// `.toml` files are read as TOML, everything else as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the document is malformed or is not a
    /// mapping at the top level.
    pub fn parse(path: impl AsRef<Path>, contents: &str) -> Result<Self, ParseError> {
        let path = path.as_ref();
        let value: Value = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(contents)?,
            _ => serde_json::from_str(contents)?,
        };
        let Value::Object(values) = value else {
            return Err(ParseError::NotAMapping);
        };
        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }

    /// Read a known setting. Missing and `null` both count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidSetting`] if the value has the wrong type.
    pub fn get<T: DeserializeOwned>(&self, key: &'static str) -> Result<Option<T>, ParseError> {
        match self.values.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => T::deserialize(value)
                .map(Some)
                .map_err(|source| ParseError::InvalidSetting { key, source }),
        }
    }

    /// The configured rules, or `None` when there is no `actions` key.
    ///
    /// Malformed entries (wrong types, invalid regex) are skipped with a
    /// warning.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidSetting`] if `actions` is not an array.
    pub fn rules(&self) -> Result<Option<Vec<Rule>>, ParseError> {
        let Some(entries) = self.get::<Vec<Value>>(ACTIONS_KEY)? else {
            return Ok(None);
        };

        let rules = entries
            .into_iter()
            .enumerate()
            .filter_map(|(i, entry)| {
                let parsed = RuleEntry::deserialize(&entry)
                    .map_err(|e| e.to_string())
                    .and_then(|e| Rule::new(e.regex, e.keys).map_err(|e| e.to_string()));
                match parsed {
                    Ok(rule) => Some(rule),
                    Err(reason) => {
                        warn!(index = i, %reason, "skipping malformed action");
                        None
                    }
                }
            })
            .collect();

        Ok(Some(rules))
    }
}
