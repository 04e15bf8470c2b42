//! Minimal page document: mount points, injected markup and class lists.
//!
//! Components write markup into mount points and register the few elements
//! they attach behaviour to, so later interactions can find them by class.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;

/// Handle to an element. Never reused within a document.
pub type NodeId = u64;

/// Document shared between components and timers.
pub type SharedDocument = Arc<Mutex<Document>>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    classes: Vec<String>,
    /// Plain text content (escaped when rendered).
    pub text: String,
    inner_html: String,
    parent: Option<NodeId>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Space-separated class attribute.
    pub fn class_name(&self) -> String {
        self.classes.join(" ")
    }

    pub fn inner_html(&self) -> &str {
        &self.inner_html
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

#[derive(Debug, Default)]
pub struct Document {
    nodes: BTreeMap<NodeId, Element>,
    next_id: NodeId,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Document with an empty `<div id=...>` for each mount point.
    pub fn with_mounts(ids: &[&str]) -> Self {
        let mut doc = Self::new();
        for id in ids {
            doc.append(Element::new("div").with_id(id), None);
        }
        doc
    }

    pub fn into_shared(self) -> SharedDocument {
        Arc::new(Mutex::new(self))
    }

    /// Add `element` under `parent` (or the body) and return its handle.
    pub fn append(&mut self, mut element: Element, parent: Option<NodeId>) -> NodeId {
        element.parent = parent.filter(|p| self.nodes.contains_key(p));
        let id = self.next_id;
        self.next_id += 1;
        self.nodes.insert(id, element);
        id
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    pub fn element(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(&node)
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, el)| el.id.as_deref() == Some(id))
            .map(|(node, _)| *node)
    }

    /// Every element carrying `class`, in document order.
    pub fn query_class(&self, class: &str) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, el)| el.has_class(class))
            .map(|(node, _)| *node)
            .collect()
    }

    /// First element carrying `class`.
    pub fn query_first(&self, class: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, el)| el.has_class(class))
            .map(|(node, _)| *node)
    }

    pub fn inner_html(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(&node).map(|el| el.inner_html.as_str())
    }

    /// Replace a node's markup. Previously registered children go away.
    pub fn set_inner_html(&mut self, node: NodeId, html: &str) -> bool {
        if !self.nodes.contains_key(&node) {
            return false;
        }
        for child in self.descendants(node) {
            self.nodes.remove(&child);
        }
        if let Some(el) = self.nodes.get_mut(&node) {
            el.inner_html = html.to_string();
        }
        true
    }

    /// Remove a node and everything under it.
    pub fn remove(&mut self, node: NodeId) -> bool {
        if self.nodes.remove(&node).is_none() {
            return false;
        }
        for child in self.descendants(node) {
            self.nodes.remove(&child);
        }
        true
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes.get(&node).is_some_and(|el| el.has_class(class))
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.nodes.get_mut(&node) {
            if !el.has_class(class) {
                el.classes.push(class.to_string());
            }
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.nodes.get_mut(&node) {
            el.classes.retain(|c| c != class);
        }
    }

    /// Returns whether the class is present afterwards.
    pub fn toggle_class(&mut self, node: NodeId, class: &str) -> bool {
        if self.has_class(node, class) {
            self.remove_class(node, class);
            false
        } else {
            self.add_class(node, class);
            self.has_class(node, class)
        }
    }

    fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut frontier = vec![root];
        while let Some(current) = frontier.pop() {
            for (node, el) in &self.nodes {
                if el.parent == Some(current) {
                    found.push(*node);
                    frontier.push(*node);
                }
            }
        }
        found
    }
}
