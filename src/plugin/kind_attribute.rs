//! Reclassifies items that carry a given attribute, e.g. every `field`
//! marked `[Output]` becomes an `output-field`.

use super::Plugin;
use crate::error::PluginError;
use crate::model::{DocumentationItem, DocumentationProject, ItemId};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// One rule: items of `old_kind` carrying `attribute_name` become `new_kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindReplacement {
    pub old_kind: String,
    pub attribute_name: String,
    pub new_kind: String,
}

impl KindReplacement {
    /// Rules without a kind or attribute to look for never match anything.
    fn can_match(&self) -> bool {
        !self.old_kind.is_empty() && !self.attribute_name.is_empty()
    }

    fn matches(&self, item: &DocumentationItem) -> bool {
        item.kind == self.old_kind && item.has_attribute(&self.attribute_name)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Settings {
    #[serde(default)]
    items: Vec<KindReplacement>,
}

#[derive(Debug, Default)]
pub struct KindAttributePlugin {
    replacements: Vec<KindReplacement>,
    dirty: bool,
}

impl KindAttributePlugin {
    pub const NAME: &'static str = "kind-attribute";

    /// Apply the first matching rule. Returns true if the kind changed.
    fn apply(&self, project: &mut DocumentationProject, id: ItemId) -> bool {
        let item = project.item(id);
        match self.replacements.iter().find(|r| r.matches(item)) {
            Some(rule) => {
                debug!(
                    "{}: {} -> {}",
                    project.full_name(id),
                    rule.old_kind,
                    rule.new_kind
                );
                project.set_kind(id, rule.new_kind.clone());
                true
            }
            None => false,
        }
    }
}

impl Plugin for KindAttributePlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn generate(&mut self, project: &mut DocumentationProject) -> Result<(), PluginError> {
        if let Some(rule) = self.replacements.iter().find(|r| r.new_kind.trim().is_empty()) {
            return Err(PluginError::Execution(format!(
                "replacement for {} [{}] has no new kind",
                rule.old_kind, rule.attribute_name
            )));
        }

        let mut pending: Vec<ItemId> = project
            .namespaces()
            .iter()
            .flat_map(|ns| ns.items().iter().copied())
            .collect();
        let mut changed = 0;
        while let Some(id) = pending.pop() {
            if self.apply(project, id) {
                changed += 1;
            }
            pending.extend_from_slice(project.item(id).members());
        }
        debug!("{}: {} items reclassified", Self::NAME, changed);
        Ok(())
    }

    fn configuration_ui(&mut self, out: &mut dyn fmt::Write) -> fmt::Result {
        if self.replacements.is_empty() {
            return writeln!(out, "  no replacements");
        }
        for (i, r) in self.replacements.iter().enumerate() {
            writeln!(
                out,
                "  {}. {} [{}] -> {}",
                i + 1,
                r.old_kind,
                r.attribute_name,
                r.new_kind
            )?;
        }
        Ok(())
    }

    fn serialize_settings(&self) -> Result<String, PluginError> {
        let settings = Settings {
            items: self.replacements.clone(),
        };
        Ok(serde_json::to_string(&settings)?)
    }

    /// Rules that can never match are dropped, which marks the settings dirty.
    fn deserialize_settings(&mut self, settings: &str) -> Result<(), PluginError> {
        let parsed: Settings = serde_json::from_str(settings)?;
        let total = parsed.items.len();
        self.replacements = parsed.items.into_iter().filter(KindReplacement::can_match).collect();
        self.dirty = self.replacements.len() != total;
        if self.dirty {
            warn!(
                "{}: dropped {} replacement(s) without a kind or attribute",
                Self::NAME,
                total - self.replacements.len()
            );
        }
        Ok(())
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}
