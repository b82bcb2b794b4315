//! Layered settings resolution.
//!
//! Settings come from several [`SettingsLayer`]s, ordered from weakest to
//! strongest:
//!
//! 1. built-in defaults ([`SettingsLayer::defaults`])
//! 2. the active pane ([`SettingsLayer::from_pane`])
//! 3. the config file ([`SettingsLayer::from_config`])
//! 4. the command line ([`crate::cli::Cli::overrides`])
//!
//! Every field of a layer is optional. A field left unset in a stronger
//! layer never clears the value from a weaker one.

use crate::config::{RawConfig, Rule};
use crate::error::{Key2PaneError, ParseError, Result};
use crate::tmux::{PaneIdentity, PaneTarget};
use tracing::debug;

/// One source of settings. `None` means "not given here".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsLayer {
    pub session: Option<String>,
    pub window: Option<u32>,
    pub index: Option<u32>,
    pub reset: Option<bool>,
    pub rules: Option<Vec<Rule>>,
    pub positional: Option<Vec<String>>,
}

impl SettingsLayer {
    /// Values used when nothing else provides them.
    pub fn defaults() -> Self {
        Self {
            reset: Some(false),
            ..Self::default()
        }
    }

    /// Fallback pane address taken from the active pane.
    pub fn from_pane(pane: &PaneIdentity) -> Self {
        Self {
            session: Some(pane.target.session.clone()),
            window: Some(pane.target.window),
            index: Some(pane.target.index),
            ..Self::default()
        }
    }

    /// Settings and rules found in a config file.
    ///
    /// Keys outside the known settings are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Key2PaneError::ConfigInvalid`] if a known setting has a
    /// value of the wrong type.
    pub fn from_config(config: &RawConfig) -> Result<Self> {
        Self::read_config(config).map_err(|source| Key2PaneError::ConfigInvalid {
            path: config.path.clone(),
            source,
        })
    }

    fn read_config(config: &RawConfig) -> std::result::Result<Self, ParseError> {
        Ok(Self {
            session: config.get("session")?,
            window: config.get("window")?,
            index: config.get("index")?,
            reset: config.get("reset")?,
            rules: config.rules()?,
            positional: None,
        })
    }

    /// Lay `higher` on top of `self`; fields `higher` leaves unset keep
    /// their current value.
    fn overlay(self, higher: SettingsLayer) -> SettingsLayer {
        SettingsLayer {
            session: higher.session.or(self.session),
            window: higher.window.or(self.window),
            index: higher.index.or(self.index),
            reset: higher.reset.or(self.reset),
            rules: higher.rules.or(self.rules),
            positional: higher.positional.or(self.positional),
        }
    }
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub session: String,
    pub window: u32,
    pub index: u32,
    pub reset: bool,
    pub rules: Vec<Rule>,
    pub positional: Vec<String>,
}

impl Settings {
    /// The pane keys are sent to.
    pub fn target(&self) -> PaneTarget {
        PaneTarget::new(self.session.clone(), self.window, self.index)
    }
}

/// Merge `layers`, weakest first, into complete [`Settings`].
///
/// # Errors
///
/// Returns [`Key2PaneError::SettingsIncomplete`] naming every field that no
/// layer provided.
pub fn resolve(layers: impl IntoIterator<Item = SettingsLayer>) -> Result<Settings> {
    let merged = layers.into_iter().fold(SettingsLayer::default(), |acc, layer| {
        debug!(?layer, "merging settings layer");
        acc.overlay(layer)
    });

    let missing: Vec<&'static str> = [
        ("session", merged.session.is_none()),
        ("window", merged.window.is_none()),
        ("index", merged.index.is_none()),
        ("reset", merged.reset.is_none()),
        ("rules", merged.rules.is_none()),
        ("positional", merged.positional.is_none()),
    ]
    .into_iter()
    .filter_map(|(name, absent)| absent.then_some(name))
    .collect();

    match merged {
        SettingsLayer {
            session: Some(session),
            window: Some(window),
            index: Some(index),
            reset: Some(reset),
            rules: Some(rules),
            positional: Some(positional),
        } => Ok(Settings {
            session,
            window,
            index,
            reset,
            rules,
            positional,
        }),
        _ => Err(Key2PaneError::SettingsIncomplete(missing)),
    }
}
