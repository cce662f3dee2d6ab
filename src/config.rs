use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::StyleError;
use crate::export::model::Physics;
use crate::style::StyleRegistry;
use crate::style::declarative::{StyleSpec, sets_from_specs};

pub const CONFIG_FILE: &str = "codeweb.toml";

/// Configuration loaded from `codeweb.toml` at the scan root.
#[derive(Debug, Deserialize, Default)]
pub struct CodeWebConfig {
    /// Glob patterns to exclude from scanning (beyond .gitignore and hidden files).
    pub exclude: Option<Vec<String>>,
    /// Add unresolved imports as diamond nodes.
    pub include_external: Option<bool>,
    /// Active rule-sets by name. All registered sets when absent.
    pub languages: Option<Vec<String>>,
    /// Physics overrides for the HTML view.
    #[serde(default)]
    pub html: HtmlConfig,
    /// User-defined import styles.
    #[serde(default)]
    pub styles: Vec<StyleSpec>,
}

#[derive(Debug, Deserialize, Default)]
pub struct HtmlConfig {
    pub node_distance: Option<f64>,
    pub central_gravity: Option<f64>,
    pub spring_length: Option<f64>,
    pub spring_strength: Option<f64>,
    pub damping: Option<f64>,
}

impl CodeWebConfig {
    /// Load configuration from `codeweb.toml` in the given root directory.
    ///
    /// Returns a default (empty) configuration if the file does not exist or cannot be parsed.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILE);

        if !config_path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&config_path) {
            Ok(contents) => match toml::from_str::<Self>(&contents) {
                Ok(config) => {
                    debug!(path = %config_path.display(), "loaded config");
                    config
                }
                Err(err) => {
                    warn!("failed to parse {CONFIG_FILE}: {err}. Using defaults.");
                    Self::default()
                }
            },
            Err(err) => {
                warn!("failed to read {CONFIG_FILE}: {err}. Using defaults.");
                Self::default()
            }
        }
    }

    /// Build the active rule-set registry: built-ins plus user styles, narrowed
    /// to `languages` (CLI selection wins over the config file).
    pub fn registry(&self, languages: &[String]) -> Result<StyleRegistry, StyleError> {
        let mut registry = StyleRegistry::builtin();
        for set in sets_from_specs(&self.styles)? {
            registry.register(set);
        }

        let selection: &[String] = if !languages.is_empty() {
            languages
        } else {
            self.languages.as_deref().unwrap_or(&[])
        };

        if selection.is_empty() {
            Ok(registry)
        } else {
            registry.select(selection)
        }
    }

    pub fn include_external(&self, cli_flag: bool) -> bool {
        cli_flag || self.include_external.unwrap_or(false)
    }

    pub fn exclude_patterns(&self) -> Vec<String> {
        self.exclude.clone().unwrap_or_default()
    }

    /// HTML physics with config overrides applied over the defaults.
    pub fn physics(&self) -> Physics {
        let defaults = Physics::default();
        Physics {
            node_distance: self.html.node_distance.unwrap_or(defaults.node_distance),
            central_gravity: self.html.central_gravity.unwrap_or(defaults.central_gravity),
            spring_length: self.html.spring_length.unwrap_or(defaults.spring_length),
            spring_strength: self.html.spring_strength.unwrap_or(defaults.spring_strength),
            damping: self.html.damping.unwrap_or(defaults.damping),
        }
    }
}
