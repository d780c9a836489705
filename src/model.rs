//! Format-agnostic data model for parsed documentation.
//!
//! Items live in an arena owned by [`DocumentationProject`]. Structure is
//! expressed through `members` (ownership) and `parent` (a non-owning back
//! link used only to compute full names). Once the builder is done the shape
//! is frozen: the only public mutation is [`DocumentationProject::set_kind`].

/// Kinds the builder treats as containers of other declarations.
pub const CONTAINER_KINDS: &[&str] = &["class", "struct", "interface"];

/// Index of an item inside its project's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(usize);

/// Root of one generation run.
#[derive(Debug, Default)]
pub struct DocumentationProject {
    namespaces: Vec<Namespace>,
    items: Vec<DocumentationItem>,
}

/// One namespace scope. Namespaces with the same name from different files
/// or input folders share a single entry.
#[derive(Debug)]
pub struct Namespace {
    /// Dotted name, empty for the global namespace.
    pub name: String,
    /// Input folder that first contributed this namespace.
    pub package_name: String,
    /// Dotted sub-path used for the output directory.
    pub directory: String,
    items: Vec<ItemId>,
}

/// A documented declaration: a type or one of its members.
#[derive(Debug, Clone)]
pub struct DocumentationItem {
    pub name: String,
    pub kind: String,
    /// Normalized tag markup.
    pub markup: String,
    pub attributes: Vec<Attribute>,
    pub base_types: Vec<String>,
    /// Set from the declaration, not from `kind`, so reclassifying a type
    /// keeps it rendering as a container.
    pub container: bool,
    members: Vec<ItemId>,
    parent: Option<ItemId>,
}

/// A metadata attribute such as `[Range(0, Max = 10)]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    /// Argument name (empty for positional) and literal text, in source order.
    pub arguments: Vec<(String, String)>,
}

impl Attribute {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    pub fn with_argument(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.arguments.push((name.into(), value.into()));
        self
    }
}

impl DocumentationItem {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, markup: impl Into<String>) -> Self {
        let kind = kind.into();
        Self {
            name: name.into(),
            container: CONTAINER_KINDS.contains(&kind.as_str()),
            kind,
            markup: markup.into(),
            attributes: Vec::new(),
            base_types: Vec::new(),
            members: Vec::new(),
            parent: None,
        }
    }

    pub fn members(&self) -> &[ItemId] {
        &self.members
    }

    pub fn parent(&self) -> Option<ItemId> {
        self.parent
    }

    /// `Output` and `OutputAttribute` name the same attribute.
    pub fn has_attribute(&self, name: &str) -> bool {
        let wanted = attribute_stem(name);
        self.attributes.iter().any(|a| attribute_stem(&a.name) == wanted)
    }
}

fn attribute_stem(name: &str) -> &str {
    name.strip_suffix("Attribute")
        .filter(|stem| !stem.is_empty())
        .unwrap_or(name)
}

impl Namespace {
    pub fn items(&self) -> &[ItemId] {
        &self.items
    }
}

impl DocumentationProject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn namespaces(&self) -> &[Namespace] {
        &self.namespaces
    }

    pub fn item(&self, id: ItemId) -> &DocumentationItem {
        &self.items[id.0]
    }

    /// Reclassify an item. Name, membership and parent are untouched.
    pub fn set_kind(&mut self, id: ItemId, kind: impl Into<String>) {
        self.items[id.0].kind = kind.into();
    }

    /// Dot-joined chain of ancestor names ending with the item's own name.
    pub fn full_name(&self, id: ItemId) -> String {
        let mut parts = vec![self.item(id).name.as_str()];
        let mut cursor = self.item(id).parent();
        while let Some(parent) = cursor {
            parts.push(self.item(parent).name.as_str());
            cursor = self.item(parent).parent();
        }
        parts.reverse();
        parts.join(".")
    }

    /// Find or create the namespace called `name`.
    pub(crate) fn namespace_index(&mut self, name: &str, package_name: &str) -> usize {
        if let Some(index) = self.namespaces.iter().position(|n| n.name == name) {
            return index;
        }
        self.namespaces.push(Namespace {
            name: name.to_string(),
            package_name: package_name.to_string(),
            directory: name.to_string(),
            items: Vec::new(),
        });
        self.namespaces.len() - 1
    }

    /// Add a top-level item to a namespace.
    pub(crate) fn add_top_level(&mut self, namespace: usize, item: DocumentationItem) -> ItemId {
        let id = self.alloc(item, None);
        self.namespaces[namespace].items.push(id);
        id
    }

    /// Add an item as the last member of `parent`.
    pub(crate) fn add_member(&mut self, parent: ItemId, item: DocumentationItem) -> ItemId {
        let id = self.alloc(item, Some(parent));
        self.items[parent.0].members.push(id);
        id
    }

    /// An existing container called `name` of `kind`, either a member of
    /// `parent` or a top-level item of `namespace`.
    pub(crate) fn find_container(
        &self,
        namespace: &str,
        parent: Option<ItemId>,
        name: &str,
        kind: &str,
    ) -> Option<ItemId> {
        let siblings = match parent {
            Some(parent) => self.item(parent).members(),
            None => self.namespaces.iter().find(|n| n.name == namespace)?.items(),
        };
        siblings.iter().copied().find(|&id| {
            let item = self.item(id);
            item.container && item.name == name && item.kind == kind
        })
    }

    /// Fold another declaration of the same type (a `partial` part) into `id`.
    pub(crate) fn merge_part(&mut self, id: ItemId, part: DocumentationItem) {
        let item = &mut self.items[id.0];
        if !part.markup.is_empty() && part.markup != item.markup {
            if !item.markup.is_empty() {
                item.markup.push('\n');
            }
            item.markup.push_str(&part.markup);
        }
        for attribute in part.attributes {
            if !item.attributes.contains(&attribute) {
                item.attributes.push(attribute);
            }
        }
        for base in part.base_types {
            if !item.base_types.contains(&base) {
                item.base_types.push(base);
            }
        }
    }

    fn alloc(&mut self, mut item: DocumentationItem, parent: Option<ItemId>) -> ItemId {
        item.parent = parent;
        item.members.clear();
        self.items.push(item);
        ItemId(self.items.len() - 1)
    }

    /// Structural fingerprint: every item's name, parent and members, plus
    /// each namespace's top-level items. Kinds are deliberately excluded.
    #[cfg(test)]
    pub fn shape(&self) -> Vec<String> {
        let mut shape: Vec<String> = self
            .namespaces
            .iter()
            .map(|ns| format!("ns {} {:?}", ns.name, ns.items))
            .collect();
        shape.extend(self.items.iter().enumerate().map(|(i, item)| {
            format!(
                "{} {} parent={:?} members={:?}",
                i, item.name, item.parent, item.members
            )
        }));
        shape
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested_project() -> (DocumentationProject, ItemId, ItemId, ItemId) {
        let mut project = DocumentationProject::new();
        let ns = project.namespace_index("Game.Core", "Assets");
        let outer = project.add_top_level(ns, DocumentationItem::new("Outer", "class", "<summary>o</summary>"));
        let inner = project.add_member(outer, DocumentationItem::new("Inner", "class", "<summary>i</summary>"));
        let leaf = project.add_member(inner, DocumentationItem::new("Value", "field", "<summary>v</summary>"));
        (project, outer, inner, leaf)
    }

    #[test]
    fn full_name_follows_parent_chain() {
        let (project, outer, inner, leaf) = nested_project();
        assert_eq!(project.full_name(outer), "Outer");
        assert_eq!(project.full_name(inner), "Outer.Inner");
        assert_eq!(project.full_name(leaf), "Outer.Inner.Value");
    }

    #[test]
    fn set_kind_keeps_full_name_and_shape() {
        let (mut project, _, _, leaf) = nested_project();
        let before = project.shape();
        project.set_kind(leaf, "output-field");
        assert_eq!(project.item(leaf).kind, "output-field");
        assert_eq!(project.full_name(leaf), "Outer.Inner.Value");
        assert_eq!(project.shape(), before);
    }

    #[test]
    fn namespaces_merge_by_name() {
        let mut project = DocumentationProject::new();
        let a = project.namespace_index("Foo", "first");
        let b = project.namespace_index("Foo", "second");
        assert_eq!(a, b);
        assert_eq!(project.namespaces().len(), 1);
        assert_eq!(project.namespaces()[0].package_name, "first");
        assert_eq!(project.namespaces()[0].directory, "Foo");
    }

    #[test]
    fn attribute_suffix_is_optional() {
        let mut item = DocumentationItem::new("Result", "field", "x");
        item.attributes.push(Attribute::new("OutputAttribute"));
        item.attributes.push(Attribute::new("Input"));
        assert!(item.has_attribute("Output"));
        assert!(item.has_attribute("OutputAttribute"));
        assert!(item.has_attribute("InputAttribute"));
        assert!(!item.has_attribute("Attribute"));
    }

    #[test]
    fn container_flag_comes_from_declared_kind() {
        assert!(DocumentationItem::new("A", "struct", "x").container);
        assert!(!DocumentationItem::new("a", "method", "x").container);
    }
}
