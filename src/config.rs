//! Run configuration, loaded from `csdoc.toml` and overridden by CLI flags.

use crate::diagnostics::Diagnostics;
use crate::error::ConfigError;
use crate::render::{default_template, default_title, KindTable, RenderOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "csdoc.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFolder {
    pub path: PathBuf,
    #[serde(default = "enabled")]
    pub enabled: bool,
}

impl InputFolder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            enabled: true,
        }
    }
}

/// Stored state of one plugin. `settings` is opaque to everything but the
/// plugin itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginConfig {
    pub name: String,
    #[serde(default = "enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub settings: String,
}

fn enabled() -> bool {
    true
}

// Array-of-table fields stay last so the TOML output is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_folder: Option<PathBuf>,
    pub write_title: bool,
    pub generate_toc: bool,
    pub write_attributes: bool,
    pub inline_classes: bool,
    pub kind_order: Vec<String>,
    pub kind_templates: Vec<String>,
    pub kind_titles: Vec<String>,
    pub input_folders: Vec<InputFolder>,
    pub plugins: Vec<PluginConfig>,
}

impl Default for Config {
    fn default() -> Self {
        let options = RenderOptions::default();
        Self {
            output_folder: None,
            write_title: options.write_title,
            generate_toc: options.generate_toc,
            write_attributes: options.write_attributes,
            inline_classes: options.inline_classes,
            kind_order: options.kinds.order,
            kind_templates: options.kinds.templates,
            kind_titles: options.kinds.titles,
            input_folders: Vec::new(),
            plugins: Vec::new(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Regenerate template and title lists that do not line up with
    /// `kind_order`.
    pub fn align_kinds(&mut self, diags: &mut Diagnostics) {
        if self.kind_templates.len() != self.kind_order.len() {
            diags.warn(format!(
                "{} kind templates for {} kinds, regenerating",
                self.kind_templates.len(),
                self.kind_order.len()
            ));
            self.kind_templates = self.kind_order.iter().map(|k| default_template(k)).collect();
        }
        if self.kind_titles.len() != self.kind_order.len() {
            diags.warn(format!(
                "{} kind titles for {} kinds, regenerating",
                self.kind_titles.len(),
                self.kind_order.len()
            ));
            self.kind_titles = self.kind_order.iter().map(|k| default_title(k)).collect();
        }
    }

    /// The two conditions that stop a run before any parsing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled_inputs().next().is_none() {
            return Err(ConfigError::NoInputFolders);
        }
        match &self.output_folder {
            Some(path) if !path.as_os_str().is_empty() => Ok(()),
            _ => Err(ConfigError::NoOutputFolder),
        }
    }

    pub fn enabled_inputs(&self) -> impl Iterator<Item = &Path> {
        self.input_folders
            .iter()
            .filter(|f| f.enabled)
            .map(|f| f.path.as_path())
    }

    pub fn set_plugin_enabled(&mut self, name: &str, enabled: bool) {
        match self.plugins.iter_mut().find(|p| p.name == name) {
            Some(plugin) => plugin.enabled = enabled,
            None => self.plugins.push(PluginConfig {
                name: name.to_string(),
                enabled,
                settings: String::new(),
            }),
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            write_title: self.write_title,
            generate_toc: self.generate_toc,
            write_attributes: self.write_attributes,
            inline_classes: self.inline_classes,
            kinds: KindTable {
                order: self.kind_order.clone(),
                templates: self.kind_templates.clone(),
                titles: self.kind_titles.clone(),
            },
        }
    }
}
