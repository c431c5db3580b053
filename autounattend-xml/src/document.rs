use crate::{Architecture, DocumentError, PUBLIC_KEY_TOKEN, Pass, UNATTEND_NAMESPACE};
use std::ops::{Index, IndexMut};
use tracing::trace;

/// Handle to an element owned by a [`Document`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A single XML element. Attribute order is preserved as inserted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<NodeId>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(key, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replace the value of an existing attribute or append a new one.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// The element's text with surrounding whitespace removed, if any remains.
    pub fn trimmed_text(&self) -> Option<&str> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    /// An element is empty when it has no children, no attributes and no
    /// non-whitespace text.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.attributes.is_empty() && self.trimmed_text().is_none()
    }
}

/// An answer file under construction.
///
/// Elements live in an arena and refer to their children by [`NodeId`].
/// Detached elements may remain in the arena after pruning but are never
/// reachable from the root.
#[derive(Clone, Debug)]
pub struct Document {
    nodes: Vec<Element>,
    root: Option<NodeId>,
    architecture: Architecture,
}

impl Document {
    pub fn new(architecture: Architecture) -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
            architecture,
        }
    }

    /// Create an empty document with a namespaced `<unattend>` root.
    pub fn with_root(architecture: Architecture) -> Result<Self, DocumentError> {
        let mut document = Self::new(architecture);
        document.create_root()?;
        Ok(document)
    }

    pub fn architecture(&self) -> Architecture {
        self.architecture
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn create_root(&mut self) -> Result<NodeId, DocumentError> {
        if self.root.is_some() {
            return Err(DocumentError::RootExists);
        }
        let root = self.alloc(Element::new("unattend").with_attribute("xmlns", UNATTEND_NAMESPACE));
        self.root = Some(root);
        Ok(root)
    }

    /// Install an arbitrary element as the root. Used when reading documents
    /// that may not be well formed.
    pub(crate) fn set_root(&mut self, element: Element) -> NodeId {
        let root = self.alloc(element);
        self.root = Some(root);
        root
    }

    pub(crate) fn set_architecture(&mut self, architecture: Architecture) {
        self.architecture = architecture;
    }

    fn alloc(&mut self, element: Element) -> NodeId {
        self.nodes.push(element);
        NodeId(self.nodes.len() - 1)
    }

    fn require_root(&self) -> Result<NodeId, DocumentError> {
        self.root.ok_or(DocumentError::MissingRoot)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self[id].children
    }

    pub(crate) fn set_children(&mut self, id: NodeId, children: Vec<NodeId>) {
        self[id].children = children;
    }

    /// Append `element` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, element: Element) -> NodeId {
        let id = self.alloc(element);
        self[parent].children.push(id);
        id
    }

    /// The first child of `parent` with the given name.
    pub fn find_child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&child| self[child].name == name)
    }

    /// All children of `parent` with the given name, in document order.
    pub fn find_children(&self, parent: NodeId, name: &str) -> Vec<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .filter(|&child| self[child].name == name)
            .collect()
    }

    /// Return the first child named `name`, appending an empty one if absent.
    pub fn get_or_create_child(&mut self, parent: NodeId, name: &str) -> NodeId {
        match self.find_child(parent, name) {
            Some(child) => child,
            None => self.append(parent, Element::new(name)),
        }
    }

    /// Text of the first child named `name`.
    pub fn child_text(&self, parent: NodeId, name: &str) -> Option<&str> {
        self.find_child(parent, name)
            .and_then(|child| self[child].trimmed_text())
    }

    /// Every element below `id` (excluding `id`) in document order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            found.push(next);
            stack.extend(self.children(next).iter().rev());
        }
        found
    }

    /// Every element in the document with the given name.
    pub fn find_all(&self, name: &str) -> Vec<NodeId> {
        match self.root {
            Some(root) => self
                .descendants(root)
                .into_iter()
                .filter(|&id| self[id].name == name)
                .collect(),
            None => Vec::new(),
        }
    }

    /// The `<settings>` blocks directly under the root.
    pub fn settings_blocks(&self) -> Vec<NodeId> {
        match self.root {
            Some(root) => self.find_children(root, "settings"),
            None => Vec::new(),
        }
    }

    /// The `<settings>` block for `pass`, if present.
    pub fn settings(&self, pass: Pass) -> Option<NodeId> {
        self.settings_blocks()
            .into_iter()
            .find(|&id| self[id].attribute("pass") == Some(pass.as_str()))
    }

    /// Return the `<settings pass="...">` block for `pass`, appending it to the
    /// root if it does not exist yet.
    pub fn get_or_create_settings(&mut self, pass: Pass) -> Result<NodeId, DocumentError> {
        let root = self.require_root()?;
        if let Some(existing) = self.settings(pass) {
            return Ok(existing);
        }

        trace!(pass = %pass, "Creating settings block");
        Ok(self.append(
            root,
            Element::new("settings").with_attribute("pass", pass.as_str()),
        ))
    }

    /// The component named `name` within the settings block for `pass`.
    pub fn component(&self, pass: Pass, name: &str) -> Option<NodeId> {
        let settings = self.settings(pass)?;
        self.children(settings)
            .iter()
            .copied()
            .find(|&id| self[id].name == "component" && self[id].attribute("name") == Some(name))
    }

    /// Return the component named `name` within `pass`, creating the settings
    /// block and the component as needed. New components carry the fixed
    /// identity attributes and the document's architecture.
    pub fn get_or_create_component(
        &mut self,
        pass: Pass,
        name: &str,
    ) -> Result<NodeId, DocumentError> {
        let settings = self.get_or_create_settings(pass)?;
        if let Some(existing) = self.component(pass, name) {
            return Ok(existing);
        }

        trace!(pass = %pass, component = name, "Creating component");
        let component = Element::new("component")
            .with_attribute("name", name)
            .with_attribute("processorArchitecture", self.architecture.as_str())
            .with_attribute("publicKeyToken", PUBLIC_KEY_TOKEN)
            .with_attribute("language", "neutral")
            .with_attribute("versionScope", "nonSxS");
        Ok(self.append(settings, component))
    }

    /// Append `<name>value</name>` to `parent`. Absent or whitespace-only
    /// values are skipped and produce no element.
    pub fn add_element<S: AsRef<str>>(
        &mut self,
        parent: NodeId,
        name: &str,
        value: Option<S>,
    ) -> Option<NodeId> {
        let value = value?;
        let value = value.as_ref();
        if value.trim().is_empty() {
            return None;
        }
        Some(self.append(parent, Element::new(name).with_text(value)))
    }

    /// Like [`Document::add_element`] for any displayable value. Booleans
    /// render as `true`/`false`.
    pub fn add_value(
        &mut self,
        parent: NodeId,
        name: &str,
        value: impl std::fmt::Display,
    ) -> Option<NodeId> {
        self.add_element(parent, name, Some(value.to_string()))
    }

    fn same_subtree(&self, id: NodeId, other: &Document, other_id: NodeId) -> bool {
        let (a, b) = (&self[id], &other[other_id]);
        a.name == b.name
            && a.attributes == b.attributes
            && a.trimmed_text() == b.trimmed_text()
            && a.children.len() == b.children.len()
            && a.children
                .iter()
                .zip(b.children.iter())
                .all(|(&x, &y)| self.same_subtree(x, other, y))
    }
}

impl Index<NodeId> for Document {
    type Output = Element;

    fn index(&self, id: NodeId) -> &Element {
        &self.nodes[id.0]
    }
}

impl IndexMut<NodeId> for Document {
    fn index_mut(&mut self, id: NodeId) -> &mut Element {
        &mut self.nodes[id.0]
    }
}

/// Documents are equal when their reachable trees are equal.
impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        match (self.root, other.root) {
            (None, None) => true,
            (Some(a), Some(b)) => self.same_subtree(a, other, b),
            _ => false,
        }
    }
}
