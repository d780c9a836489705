//! Markdown page renderer.
//!
//! A page is a top-level item, or a nested type when nested types are not
//! rendered inline. Each page carries the item's own prose, its members
//! grouped by kind, and its nested types (inline or as links).

use super::{naming, prose, RenderOptions};
use crate::diagnostics::Diagnostics;
use crate::model::{Attribute, DocumentationProject, ItemId};
use std::collections::{HashMap, HashSet};

/// One rendered file, without directory or extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub file_name: String,
    pub content: String,
}

pub struct PageWriter<'a> {
    project: &'a DocumentationProject,
    options: &'a RenderOptions,
    diags: &'a mut Diagnostics,
    /// Names taken in the output directory.
    used: HashSet<String>,
    file_names: HashMap<ItemId, String>,
}

impl<'a> PageWriter<'a> {
    /// One writer per output directory, so file names stay unique within it.
    pub fn new(project: &'a DocumentationProject, options: &'a RenderOptions, diags: &'a mut Diagnostics) -> Self {
        Self {
            project,
            options,
            diags,
            used: HashSet::new(),
            file_names: HashMap::new(),
        }
    }

    /// Pages for `id`: its own, then one per nested type unless inlined.
    pub fn pages(&mut self, id: ItemId) -> Vec<Page> {
        self.assign(id, None);
        let mut pages = Vec::new();
        self.collect(id, &mut pages);
        pages
    }

    /// Pick file names for `id` and its linked nested types before any page
    /// is rendered, so TOC links point at the names actually written.
    fn assign(&mut self, id: ItemId, parent_file: Option<&str>) {
        if self.is_blank(id) {
            return;
        }
        let own = naming::file_name(&self.project.item(id).name);
        let wanted = match parent_file {
            Some(parent) => format!("{}-{}", parent, own),
            None => own,
        };
        let file_name = self.unique(id, wanted);
        self.file_names.insert(id, file_name.clone());

        if !self.options.inline_classes {
            for nested in self.nested(id) {
                self.assign(nested, Some(&file_name));
            }
        }
    }

    /// `wanted`, or `wanted-2`, `wanted-3`, ... if another page has it.
    fn unique(&mut self, id: ItemId, wanted: String) -> String {
        if self.used.insert(wanted.clone()) {
            return wanted;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{}-{}", wanted, n);
            if self.used.insert(candidate.clone()) {
                self.diags.error(format!(
                    "{}: {}.md is already taken, writing {}.md",
                    self.project.full_name(id),
                    wanted,
                    candidate
                ));
                return candidate;
            }
            n += 1;
        }
    }

    fn collect(&mut self, id: ItemId, pages: &mut Vec<Page>) {
        if !self.renderable(id) {
            return;
        }
        let Some(file_name) = self.file_names.get(&id).cloned() else {
            return;
        };
        let content = self.page(id);
        pages.push(Page { file_name, content });

        if !self.options.inline_classes {
            for nested in self.nested(id) {
                self.collect(nested, pages);
            }
        }
    }

    fn page(&mut self, id: ItemId) -> String {
        let mut md = String::new();
        let item = self.project.item(id);
        self.anchor(&mut md, &item.kind, &item.name);
        if self.options.write_title {
            md.push_str(&format!("# {}\n\n", self.project.full_name(id)));
        }
        if self.options.generate_toc {
            md.push_str("## Table of Contents\n");
            self.toc(&mut md, id, 0);
            md.push('\n');
        }
        self.body(&mut md, id, 2);
        md
    }

    /// Item prose, member groups and nested types. Groups get `level`
    /// headings, members `level + 1`.
    fn body(&mut self, md: &mut String, id: ItemId, level: usize) {
        let (project, options) = (self.project, self.options);
        let kinds = &options.kinds;
        self.prose(md, id, level);

        let mut current_kind: Option<&str> = None;
        for member in self.leaf_members(id) {
            if !self.renderable(member) {
                continue;
            }
            let item = project.item(member);
            if current_kind != Some(item.kind.as_str()) {
                current_kind = Some(item.kind.as_str());
                if let Some(title) = kinds.title(&item.kind) {
                    md.push_str(&format!("{} {}\n\n", hashes(level), title));
                }
            }
            self.anchor(md, &item.kind, &item.name);
            md.push_str(&format!(
                "{} {}\n\n",
                hashes(level + 1),
                kinds.format_name(&item.name, &item.kind)
            ));
            self.prose(md, member, level + 1);
        }

        if options.inline_classes {
            for nested in self.nested(id) {
                if !self.renderable(nested) {
                    continue;
                }
                let item = project.item(nested);
                self.anchor(md, &item.kind, &item.name);
                md.push_str(&format!(
                    "{} {}\n\n",
                    hashes(level),
                    kinds.format_name(&item.name, &item.kind)
                ));
                self.body(md, nested, level + 1);
            }
        }
    }

    /// Attribute lines and formatted markup. Section headings inside the
    /// markup sit one level below `level`.
    fn prose(&mut self, md: &mut String, id: ItemId, level: usize) {
        let item = self.project.item(id);
        if self.options.write_attributes && !item.attributes.is_empty() {
            for attribute in &item.attributes {
                md.push_str(&format!("*{}*\n", format_attribute(attribute)));
            }
            md.push('\n');
        }
        if !item.base_types.is_empty() {
            let bases: Vec<_> = item.base_types.iter().map(|b| format!("`{}`", b)).collect();
            md.push_str(&format!("Inherits: {}\n\n", bases.join(", ")));
        }

        match prose::render(&item.markup, level) {
            Ok(text) => md.push_str(&text),
            Err(e) => {
                self.diags.error(format!(
                    "malformed documentation on {}: {}",
                    self.project.full_name(id),
                    e
                ));
                md.push_str(&prose::parse_error_block(&e, &item.markup));
            }
        }
    }

    /// Link target for the TOC entry of an item, written only with a TOC.
    fn anchor(&self, md: &mut String, kind: &str, name: &str) {
        if self.options.generate_toc {
            md.push_str(&format!("<a id=\"{}\"></a>\n", anchor_id(kind, name)));
        }
    }

    fn toc(&self, md: &mut String, id: ItemId, depth: usize) {
        let indent = "  ".repeat(depth);
        let item = self.project.item(id);
        md.push_str(&format!("{}- {}\n", indent, toc_link(&item.kind, &item.name)));

        for member in self.leaf_members(id) {
            if self.is_blank(member) {
                continue;
            }
            let member = self.project.item(member);
            md.push_str(&format!("{}  - {}\n", indent, toc_link(&member.kind, &member.name)));
        }

        for nested in self.nested(id) {
            if self.is_blank(nested) {
                continue;
            }
            if self.options.inline_classes {
                self.toc(md, nested, depth + 1);
            } else {
                let Some(target) = self.file_names.get(&nested) else {
                    continue;
                };
                let nested_item = self.project.item(nested);
                md.push_str(&format!(
                    "{}  - [{} {}]({}.md)\n",
                    indent, nested_item.kind, nested_item.name, target
                ));
            }
        }
    }

    /// Non-container members, sorted.
    fn leaf_members(&self, id: ItemId) -> Vec<ItemId> {
        let members: Vec<ItemId> = self
            .project
            .item(id)
            .members()
            .iter()
            .copied()
            .filter(|&m| !self.project.item(m).container)
            .collect();
        self.options.kinds.sort(self.project, &members)
    }

    /// Nested container members, sorted.
    fn nested(&self, id: ItemId) -> Vec<ItemId> {
        let members: Vec<ItemId> = self
            .project
            .item(id)
            .members()
            .iter()
            .copied()
            .filter(|&m| self.project.item(m).container)
            .collect();
        self.options.kinds.sort(self.project, &members)
    }

    fn is_blank(&self, id: ItemId) -> bool {
        let item = self.project.item(id);
        item.name.trim().is_empty() || item.markup.trim().is_empty()
    }

    /// Items with no name or blank markup are skipped with a diagnostic.
    fn renderable(&mut self, id: ItemId) -> bool {
        let item = self.project.item(id);
        if item.name.trim().is_empty() {
            self.diags.error(format!("skipping {} with an empty name", item.kind));
            return false;
        }
        if item.markup.trim().is_empty() {
            self.diags.warn(format!(
                "empty documentation on {}",
                self.project.full_name(id)
            ));
            return false;
        }
        true
    }
}

fn hashes(level: usize) -> String {
    "#".repeat(level.clamp(1, 6))
}

fn anchor_id(kind: &str, name: &str) -> String {
    format!("{}-{}", naming::anchor(kind), naming::anchor(name))
}

fn toc_link(kind: &str, name: &str) -> String {
    format!("[{} {}](#{})", kind, name, anchor_id(kind, name))
}

/// `Range(0, Max = 10)`: positional arguments as their value, named ones as
/// `Name = value`.
fn format_attribute(attribute: &Attribute) -> String {
    if attribute.arguments.is_empty() {
        return attribute.name.clone();
    }
    let arguments: Vec<String> = attribute
        .arguments
        .iter()
        .map(|(name, value)| {
            if name.is_empty() {
                value.clone()
            } else {
                format!("{} = {}", name, value)
            }
        })
        .collect();
    format!("{}({})", attribute.name, arguments.join(", "))
}
