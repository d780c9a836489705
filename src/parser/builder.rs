//! Document model builder: turns scanned declarations into the item tree.

use super::comment;
use super::csharp::Declaration;
use crate::diagnostics::Diagnostics;
use crate::model::{DocumentationItem, DocumentationProject, ItemId};
use std::path::Path;
use tracing::debug;

/// Appends declarations from one input folder to a project.
pub struct Builder<'p> {
    project: &'p mut DocumentationProject,
    package: String,
}

impl<'p> Builder<'p> {
    pub fn new(project: &'p mut DocumentationProject, package: impl Into<String>) -> Self {
        Self {
            project,
            package: package.into(),
        }
    }

    /// Add one file's declarations. Returns the number of items created.
    ///
    /// Undocumented declarations are dropped together with everything
    /// declared inside them.
    pub fn add_file(&mut self, path: &Path, decls: &[Declaration], diags: &mut Diagnostics) -> usize {
        // (declaration index, item) for each container still open
        let mut open: Vec<(usize, Option<ItemId>)> = Vec::new();
        let mut created = 0;

        for (index, decl) in decls.iter().enumerate() {
            while open.last().is_some_and(|&(top, _)| Some(top) != decl.parent) {
                open.pop();
            }

            let parent = match (decl.parent, open.last()) {
                (None, _) => None,
                (Some(_), Some(&(_, Some(item)))) => Some(item),
                // inside a dropped container
                (Some(_), Some(&(_, None))) => {
                    if decl.kind.is_container() {
                        open.push((index, None));
                    }
                    continue;
                }
                (Some(p), None) => {
                    diags.warn(format!(
                        "{}: {} {} is declared inside #{} which is not open, skipping",
                        path.display(),
                        decl.kind.as_str(),
                        decl.names.join(", "),
                        p
                    ));
                    continue;
                }
            };

            let markup = comment::normalize(&decl.raw_comment);
            if let Some(existing) = self.earlier_part(decl, parent) {
                debug!(
                    "{}: merging another part of {}",
                    path.display(),
                    self.project.full_name(existing)
                );
                self.project.merge_part(existing, item_for(decl, &decl.names[0], &markup));
                open.push((index, Some(existing)));
                continue;
            }
            if markup.is_empty() {
                if decl.kind.is_container() {
                    open.push((index, None));
                }
                continue;
            }

            let mut first = None;
            for name in &decl.names {
                if name.trim().is_empty() {
                    diags.error(format!(
                        "{}: skipping {} with an empty name",
                        path.display(),
                        decl.kind.as_str()
                    ));
                    continue;
                }
                let item = item_for(decl, name, &markup);
                let id = match parent {
                    Some(parent) => self.project.add_member(parent, item),
                    None => {
                        let ns = self.project.namespace_index(&decl.namespace, &self.package);
                        self.project.add_top_level(ns, item)
                    }
                };
                first.get_or_insert(id);
                created += 1;
            }

            if decl.kind.is_container() {
                open.push((index, first));
            }
        }

        created
    }

    /// A container declared earlier under the same name, e.g. the first
    /// half of a `partial class`.
    fn earlier_part(&self, decl: &Declaration, parent: Option<ItemId>) -> Option<ItemId> {
        if !decl.kind.is_container() {
            return None;
        }
        let name = decl.names.first()?;
        self.project
            .find_container(&decl.namespace, parent, name, decl.kind.as_str())
    }
}

fn item_for(decl: &Declaration, name: &str, markup: &str) -> DocumentationItem {
    let mut item = DocumentationItem::new(name, decl.kind.as_str(), markup);
    item.attributes = decl.attributes.clone();
    item.base_types = decl.base_types.clone();
    item
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::csharp;
    use std::path::PathBuf;

    fn build(sources: &[(&str, &str)]) -> (DocumentationProject, Diagnostics) {
        let mut project = DocumentationProject::new();
        let mut diags = Diagnostics::new();
        for (package, src) in sources {
            let decls = csharp::scan(src).unwrap();
            Builder::new(&mut project, *package).add_file(&PathBuf::from("Test.cs"), &decls, &mut diags);
        }
        (project, diags)
    }

    fn member_names(project: &DocumentationProject, id: ItemId) -> Vec<String> {
        project
            .item(id)
            .members()
            .iter()
            .map(|&m| project.item(m).name.clone())
            .collect()
    }

    #[test]
    fn undocumented_members_are_dropped() {
        let (project, diags) = build(&[(
            "Assets",
            r#"
/// <summary>Test description</summary>
public class Test
{
    // Input description
    [Input] public string TestInput;
    /// <summary>TestVariable description</summary>
    // Comment, not a documentation
    public string TestVariable = "test";
    public void Undocumented() { }
}"#,
        )]);
        let ns = &project.namespaces()[0];
        assert_eq!(ns.name, "");
        let test = ns.items()[0];
        assert_eq!(member_names(&project, test), vec!["TestVariable"]);
        assert!(diags.entries().is_empty());
    }

    #[test]
    fn undocumented_container_drops_descendants() {
        let (project, _) = build(&[(
            "A",
            "/// <summary>o</summary>\nclass Outer {\n  class Hidden {\n    /// <summary>x</summary>\n    public int X;\n  }\n  /// <summary>y</summary>\n  public int Y;\n}",
        )]);
        let outer = project.namespaces()[0].items()[0];
        assert_eq!(member_names(&project, outer), vec!["Y"]);
    }

    #[test]
    fn nested_items_get_parents_and_full_names() {
        let (project, _) = build(&[(
            "A",
            "namespace NamespaceTests {\n/// <summary>m</summary>\npublic class MulticlassTest {\n  /// <summary>i</summary>\n  public class Item {\n    /// <summary>t</summary>\n    public int Test = 999;\n  }\n  /// <summary>v</summary>\n  public string Value2;\n}\n}",
        )]);
        let ns = &project.namespaces()[0];
        assert_eq!(ns.name, "NamespaceTests");
        assert_eq!(ns.package_name, "A");
        let outer = ns.items()[0];
        assert_eq!(member_names(&project, outer), vec!["Item", "Value2"]);
        let item = project.item(outer).members()[0];
        let test = project.item(item).members()[0];
        assert_eq!(project.full_name(test), "MulticlassTest.Item.Test");
        assert_eq!(project.item(test).parent(), Some(item));
        assert!(project.item(item).container);
    }

    #[test]
    fn co_declared_fields_expand() {
        let (project, _) = build(&[(
            "A",
            "/// <summary>c</summary>\nclass C {\n  /// <summary>pair</summary>\n  [Output] public int a, b;\n}",
        )]);
        let c = project.namespaces()[0].items()[0];
        assert_eq!(member_names(&project, c), vec!["a", "b"]);
        for &m in project.item(c).members() {
            let item = project.item(m);
            assert_eq!(item.markup, "<summary>pair</summary>");
            assert!(item.has_attribute("Output"));
        }
    }

    #[test]
    fn folders_merge_namespaces_in_discovery_order() {
        let (project, _) = build(&[
            ("FolderA", "namespace Foo { /// <summary>a</summary>\nclass Alpha { } }"),
            ("FolderB", "namespace Foo { /// <summary>b</summary>\nclass Beta { } }"),
        ]);
        assert_eq!(project.namespaces().len(), 1);
        let ns = &project.namespaces()[0];
        assert_eq!(ns.package_name, "FolderA");
        let names: Vec<_> = ns.items().iter().map(|&i| project.item(i).name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);
    }

    #[test]
    fn empty_names_are_rejected() {
        let mut project = DocumentationProject::new();
        let mut diags = Diagnostics::new();
        let decls = vec![Declaration {
            names: vec![String::new(), "Kept".to_string()],
            kind: csharp::DeclKind::Field,
            raw_comment: "/// <summary>s</summary>".to_string(),
            attributes: Vec::new(),
            base_types: Vec::new(),
            parent: None,
            namespace: String::new(),
        }];
        let created = Builder::new(&mut project, "A").add_file(&PathBuf::from("X.cs"), &decls, &mut diags);
        assert_eq!(created, 1);
        assert!(diags.mentions("empty name"));
        let ns = &project.namespaces()[0];
        assert_eq!(project.item(ns.items()[0]).name, "Kept");
    }

    #[test]
    fn partial_parts_merge_into_one_item() {
        let (project, diags) = build(&[
            (
                "A",
                "namespace Game {\n/// <summary>Part one.</summary>\n[Serializable]\npublic partial class Foo : Base {\n  /// <summary>m1</summary>\n  public void One() { }\n}\n}",
            ),
            (
                "A",
                "namespace Game {\n/// <summary>Part two.</summary>\npublic partial class Foo : IFoo {\n  /// <summary>m2</summary>\n  public void Two() { }\n}\n}",
            ),
            (
                "A",
                "namespace Game {\npublic partial class Foo {\n  /// <summary>m3</summary>\n  public void Three() { }\n}\n}",
            ),
        ]);
        assert!(diags.entries().is_empty());
        let ns = &project.namespaces()[0];
        assert_eq!(ns.items().len(), 1);
        let foo = project.item(ns.items()[0]);
        assert_eq!(foo.markup, "<summary>Part one.</summary>\n<summary>Part two.</summary>");
        assert_eq!(foo.base_types, vec!["Base", "IFoo"]);
        assert!(foo.has_attribute("Serializable"));
        assert_eq!(member_names(&project, ns.items()[0]), vec!["One", "Two", "Three"]);
    }
}
