//! Plugin module: tree passes that reclassify items before rendering.
//!
//! Plugins come from a static registry. The pipeline instantiates them in
//! registry order, applies their stored settings and runs the enabled ones
//! one after another over the same project. A plugin may only change item
//! kinds; the tree shape is fixed once the builder is done.

pub mod kind_attribute;

use crate::config::PluginConfig;
use crate::diagnostics::Diagnostics;
use crate::error::PluginError;
use crate::model::DocumentationProject;
use kind_attribute::KindAttributePlugin;
use std::fmt;
use tracing::{debug, info};

/// A tree pass with its own persisted settings.
pub trait Plugin {
    fn name(&self) -> &str;

    /// Mutate item kinds in place.
    fn generate(&mut self, project: &mut DocumentationProject) -> Result<(), PluginError>;

    /// Describe the current settings for a human.
    fn configuration_ui(&mut self, out: &mut dyn fmt::Write) -> fmt::Result;

    fn serialize_settings(&self) -> Result<String, PluginError>;

    fn deserialize_settings(&mut self, settings: &str) -> Result<(), PluginError>;

    /// True when the settings changed since they were last loaded or saved.
    fn is_dirty(&self) -> bool;

    fn clear_dirty(&mut self);
}

pub type PluginFactory = fn() -> Result<Box<dyn Plugin>, PluginError>;

/// A named entry in the plugin registry.
#[derive(Clone, Copy)]
pub struct Registration {
    pub name: &'static str,
    pub create: PluginFactory,
}

/// Every plugin this build knows about, in execution order.
pub fn registry() -> Vec<Registration> {
    vec![Registration {
        name: KindAttributePlugin::NAME,
        create: || Ok(Box::new(KindAttributePlugin::default())),
    }]
}

struct Slot {
    plugin: Box<dyn Plugin>,
    enabled: bool,
    failed: bool,
}

/// Instantiated plugins for one run.
pub struct Pipeline {
    slots: Vec<Slot>,
}

impl Pipeline {
    /// Instantiate `registry` and apply `configs`. A plugin that cannot be
    /// created or configured is reported and left out.
    pub fn load(registry: &[Registration], configs: &[PluginConfig], diags: &mut Diagnostics) -> Self {
        for config in configs {
            if !registry.iter().any(|r| r.name == config.name) {
                diags.warn(format!("unknown plugin in configuration: {}", config.name));
            }
        }

        let mut slots = Vec::new();
        for registration in registry {
            let config = configs.iter().find(|c| c.name == registration.name);
            let created = (registration.create)().and_then(|plugin| {
                if plugin.name() == registration.name {
                    Ok(plugin)
                } else {
                    Err(PluginError::Instantiation {
                        name: registration.name.to_string(),
                        message: format!("plugin reports its name as {}", plugin.name()),
                    })
                }
            });
            let mut plugin = match created {
                Ok(plugin) => plugin,
                Err(e) => {
                    diags.error(format!("plugin {}: {}", registration.name, e));
                    continue;
                }
            };
            if let Some(settings) = config.map(|c| c.settings.as_str()).filter(|s| !s.trim().is_empty()) {
                if let Err(e) = plugin.deserialize_settings(settings) {
                    diags.error(format!("plugin {}: {}", registration.name, e));
                    continue;
                }
            }
            slots.push(Slot {
                plugin,
                enabled: config.map_or(true, |c| c.enabled),
                failed: false,
            });
        }
        Self { slots }
    }

    /// Names of the plugins that will run, in order.
    pub fn active(&self) -> Vec<&str> {
        self.slots
            .iter()
            .filter(|s| s.enabled && !s.failed)
            .map(|s| s.plugin.name())
            .collect()
    }

    /// Run every enabled plugin in order. A plugin that fails is reported and
    /// skipped for the rest of the run.
    pub fn run(&mut self, project: &mut DocumentationProject, diags: &mut Diagnostics) {
        for slot in self.slots.iter_mut().filter(|s| s.enabled && !s.failed) {
            debug!("running plugin {}", slot.plugin.name());
            if let Err(e) = slot.plugin.generate(project) {
                diags.error(format!("plugin {} failed: {}", slot.plugin.name(), e));
                slot.failed = true;
            }
        }
    }

    /// Copy settings of dirty plugins back into `configs`.
    pub fn sync_settings(&mut self, configs: &mut Vec<PluginConfig>, diags: &mut Diagnostics) {
        for slot in self.slots.iter_mut().filter(|s| s.plugin.is_dirty()) {
            let name = slot.plugin.name().to_string();
            let settings = match slot.plugin.serialize_settings() {
                Ok(settings) => settings,
                Err(e) => {
                    diags.error(format!("plugin {}: {}", name, e));
                    continue;
                }
            };
            match configs.iter_mut().find(|c| c.name == name) {
                Some(config) => config.settings = settings,
                None => configs.push(PluginConfig {
                    name: name.clone(),
                    enabled: slot.enabled,
                    settings,
                }),
            }
            slot.plugin.clear_dirty();
            info!("saved settings for plugin {}", name);
        }
    }

    /// Each plugin's name, state and configuration text.
    pub fn describe(&mut self, out: &mut dyn fmt::Write) -> fmt::Result {
        for slot in &mut self.slots {
            let state = if slot.enabled { "enabled" } else { "disabled" };
            writeln!(out, "{} ({})", slot.plugin.name(), state)?;
            slot.plugin.configuration_ui(out)?;
        }
        Ok(())
    }
}
