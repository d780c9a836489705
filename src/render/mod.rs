//! Renderer module: options, kind ordering and the output directory layout.

pub mod markdown;
pub mod naming;
pub mod prose;

use crate::diagnostics::Diagnostics;
use crate::model::{DocumentationProject, ItemId};
use markdown::PageWriter;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Index-aligned per-kind tables: ordering, heading templates, group titles.
#[derive(Debug, Clone)]
pub struct KindTable {
    pub order: Vec<String>,
    /// `{0}` is replaced with the member name, `{1}` with its kind.
    pub templates: Vec<String>,
    pub titles: Vec<String>,
}

impl Default for KindTable {
    fn default() -> Self {
        let order = ["enum", "method", "property", "field"];
        Self {
            order: order.iter().map(|k| k.to_string()).collect(),
            templates: order.iter().map(|k| default_template(k)).collect(),
            titles: order.iter().map(|k| default_title(k)).collect(),
        }
    }
}

pub fn default_template(kind: &str) -> String {
    format!("{} {{0}}", kind)
}

/// Plural group heading: `enum` → `Enums`, `property` → `Properties`.
pub fn default_title(kind: &str) -> String {
    let word = naming::capitalize(kind);
    match word.strip_suffix('y') {
        Some(stem) if !stem.ends_with(['a', 'e', 'i', 'o', 'u']) => format!("{}ies", stem),
        _ => format!("{}s", word),
    }
}

impl KindTable {
    pub fn position(&self, kind: &str) -> Option<usize> {
        self.order.iter().position(|k| k == kind)
    }

    /// Group heading for a known kind.
    pub fn title(&self, kind: &str) -> Option<&str> {
        self.position(kind)
            .and_then(|i| self.titles.get(i))
            .map(String::as_str)
    }

    /// Member heading text; the bare name when the kind has no template.
    pub fn format_name(&self, name: &str, kind: &str) -> String {
        match self.position(kind).and_then(|i| self.templates.get(i)) {
            Some(template) => template.replace("{0}", name).replace("{1}", kind),
            None => name.to_string(),
        }
    }

    /// Sort siblings by kind position, then name.
    ///
    /// Kinds missing from `order` go after every known kind, ranked by the
    /// order in which they first appear in `ids`.
    pub fn sort(&self, project: &DocumentationProject, ids: &[ItemId]) -> Vec<ItemId> {
        let mut unknown: Vec<&str> = Vec::new();
        for &id in ids {
            let kind = project.item(id).kind.as_str();
            if self.position(kind).is_none() && !unknown.contains(&kind) {
                unknown.push(kind);
            }
        }
        let rank = |kind: &str| -> usize {
            self.position(kind).unwrap_or_else(|| {
                self.order.len() + unknown.iter().position(|k| *k == kind).unwrap_or(0)
            })
        };

        let mut sorted = ids.to_vec();
        sorted.sort_by(|&a, &b| {
            let (a, b) = (project.item(a), project.item(b));
            rank(&a.kind)
                .cmp(&rank(&b.kind))
                .then_with(|| a.name.cmp(&b.name))
        });
        sorted
    }
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub write_title: bool,
    pub generate_toc: bool,
    pub write_attributes: bool,
    /// Render nested types inside their parent's page instead of separate files.
    pub inline_classes: bool,
    pub kinds: KindTable,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            write_title: true,
            generate_toc: false,
            write_attributes: true,
            inline_classes: false,
            kinds: KindTable::default(),
        }
    }
}

/// Outcome of writing a project to disk.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub pages_written: usize,
    pub write_errors: usize,
}

/// `<root>/<package>/<namespace with dots as path separators>`.
pub fn namespace_dir(root: &Path, package: &str, directory: &str) -> PathBuf {
    let mut dir = root.join(package);
    dir.extend(directory.split('.').filter(|s| !s.is_empty()));
    dir
}

/// Render every namespace of `project` into Markdown files under `root`.
///
/// Write failures are reported and counted; the remaining pages are still
/// written.
pub fn write_project(
    project: &DocumentationProject,
    options: &RenderOptions,
    root: &Path,
    diags: &mut Diagnostics,
) -> RenderReport {
    let mut report = RenderReport::default();

    for ns in project.namespaces() {
        let dir = namespace_dir(root, &ns.package_name, &ns.directory);
        let mut writer = PageWriter::new(project, options, diags);
        let pages: Vec<_> = options
            .kinds
            .sort(project, ns.items())
            .into_iter()
            .flat_map(|id| writer.pages(id))
            .collect();
        if pages.is_empty() {
            continue;
        }

        if let Err(e) = fs::create_dir_all(&dir) {
            diags.error(format!("failed to create {}: {}", dir.display(), e));
            report.write_errors += pages.len();
            continue;
        }
        for page in pages {
            let path = dir.join(format!("{}.md", page.file_name));
            match fs::write(&path, &page.content) {
                Ok(()) => {
                    debug!("wrote {}", path.display());
                    report.pages_written += 1;
                }
                Err(e) => {
                    diags.error(format!("failed to write {}: {}", path.display(), e));
                    report.write_errors += 1;
                }
            }
        }
    }

    info!(
        "{} pages written to {}",
        report.pages_written,
        root.display()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DocumentationItem;
    use tempfile::TempDir;

    #[test]
    fn sort_groups_known_kinds_then_unknown() {
        let mut project = DocumentationProject::new();
        let ns = project.namespace_index("", "P");
        let ids: Vec<ItemId> = [("b1", "B"), ("a2", "A"), ("c1", "C"), ("a1", "A"), ("d1", "D")]
            .iter()
            .map(|(name, kind)| project.add_top_level(ns, DocumentationItem::new(*name, *kind, "x")))
            .collect();
        let table = KindTable {
            order: vec!["A".into(), "B".into()],
            templates: vec![],
            titles: vec![],
        };
        let names: Vec<_> = table
            .sort(&project, &ids)
            .into_iter()
            .map(|id| project.item(id).name.clone())
            .collect();
        assert_eq!(names, vec!["a1", "a2", "b1", "c1", "d1"]);
    }

    #[test]
    fn templates_and_titles() {
        let table = KindTable::default();
        assert_eq!(table.format_name("Run", "method"), "method Run");
        assert_eq!(table.format_name("Run", "output-field"), "Run");
        assert_eq!(table.title("property"), Some("Properties"));
        assert_eq!(table.title("enum"), Some("Enums"));
        assert_eq!(table.title("output-field"), None);

        let custom = KindTable {
            order: vec!["field".into()],
            templates: vec!["{0} ({1})".into()],
            titles: vec!["Fields".into()],
        };
        assert_eq!(custom.format_name("hp", "field"), "hp (field)");
    }

    #[test]
    fn default_titles_pluralize() {
        assert_eq!(default_title("field"), "Fields");
        assert_eq!(default_title("key"), "Keys");
        assert_eq!(default_title("output-field"), "Output-fields");
    }

    #[test]
    fn namespace_dir_splits_dots() {
        let dir = namespace_dir(Path::new("out"), "Assets", "Game.Core");
        assert_eq!(dir, Path::new("out").join("Assets").join("Game").join("Core"));
        assert_eq!(namespace_dir(Path::new("out"), "Assets", ""), Path::new("out").join("Assets"));
    }

    #[test]
    fn writes_one_file_per_page() {
        let mut project = DocumentationProject::new();
        let ns = project.namespace_index("Game.Core", "Assets");
        let player = project.add_top_level(ns, DocumentationItem::new("PlayerState", "class", "<summary>p</summary>"));
        project.add_member(player, DocumentationItem::new("Stats", "struct", "<summary>s</summary>"));

        let out = TempDir::new().unwrap();
        let mut diags = Diagnostics::new();
        let report = write_project(&project, &RenderOptions::default(), out.path(), &mut diags);

        assert_eq!(report, RenderReport { pages_written: 2, write_errors: 0 });
        let dir = out.path().join("Assets/Game/Core");
        assert!(dir.join("Player-State.md").is_file());
        assert!(dir.join("Player-State-Stats.md").is_file());
    }

    #[test]
    fn write_failure_is_counted() {
        let mut project = DocumentationProject::new();
        let ns = project.namespace_index("", "Assets");
        project.add_top_level(ns, DocumentationItem::new("A", "class", "<summary>a</summary>"));

        let out = TempDir::new().unwrap();
        // a file where the package directory should be
        fs::write(out.path().join("Assets"), "").unwrap();
        let mut diags = Diagnostics::new();
        let report = write_project(&project, &RenderOptions::default(), out.path(), &mut diags);

        assert_eq!(report.write_errors, 1);
        assert!(diags.mentions("failed to create"));
    }
}
