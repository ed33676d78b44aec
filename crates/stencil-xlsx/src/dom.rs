//! Owned, mutable XML tree
//!
//! Nodes live in an arena owned by the [`Document`] and are addressed by
//! [`NodeId`] handles. Every structural edit is a splice into the ordered
//! child list of a parent, so handles stay valid for the lifetime of the
//! document even when nodes are moved or detached.

/// Handle of a node inside a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena
    pub fn index(self) -> usize {
        self.0
    }
}

/// The payload of a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The document node; parent of the top-level nodes
    Root,
    /// An element with its qualified tag name and ordered attributes
    Element {
        name: String,
        attributes: Vec<(String, String)>,
    },
    /// Unescaped character data
    Text(String),
    /// Comment body, kept verbatim
    Comment(String),
    /// Processing instruction or doctype, kept verbatim including delimiters
    Raw(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An XML document held as an arena of nodes
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    declaration: Option<String>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document holding only the root node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Root,
                parent: None,
                children: Vec::new(),
            }],
            declaration: None,
        }
    }

    /// The document node
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Body of the `<?xml ...?>` declaration, if the source had one
    pub fn declaration(&self) -> Option<&str> {
        self.declaration.as_deref()
    }

    pub fn set_declaration(&mut self, declaration: Option<String>) {
        self.declaration = declaration;
    }

    /// The top-level element
    pub fn document_element(&self) -> Option<NodeId> {
        self.element_children(self.root()).next()
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    /// Tag name of an element node
    pub fn name(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].kind, NodeKind::Element { .. })
    }

    /// Whether the node is an element with the given tag name
    pub fn has_name(&self, id: NodeId, name: &str) -> bool {
        self.name(id) == Some(name)
    }

    pub fn attributes(&self, id: NodeId) -> &[(String, String)] {
        match &self.nodes[id.0].kind {
            NodeKind::Element { attributes, .. } => attributes,
            _ => &[],
        }
    }

    pub fn attribute(&self, id: NodeId, key: &str) -> Option<&str> {
        self.attributes(id)
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing an existing value in place or appending
    /// a new one. Has no effect on non-element nodes.
    pub fn set_attribute(&mut self, id: NodeId, key: &str, value: impl Into<String>) {
        if let NodeKind::Element { attributes, .. } = &mut self.nodes[id.0].kind {
            let value = value.into();
            match attributes.iter_mut().find(|(k, _)| k == key) {
                Some(slot) => slot.1 = value,
                None => attributes.push((key.to_string(), value)),
            }
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Child nodes that are elements, in document order
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[id.0]
            .children
            .iter()
            .copied()
            .filter(move |&child| self.is_element(child))
    }

    /// First child element with the given tag name
    pub fn child_element(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.element_children(id)
            .find(|&child| self.has_name(child, name))
    }

    /// All child elements with the given tag name
    pub fn children_named(&self, id: NodeId, name: &str) -> Vec<NodeId> {
        self.element_children(id)
            .filter(|&child| self.has_name(child, name))
            .collect()
    }

    /// All descendants of a node in document order, excluding the node itself
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[id.0].children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.nodes[next.0].children.iter().rev().copied());
        }
        out
    }

    /// Descendant elements with the given tag name, in document order
    pub fn descendants_named(&self, id: NodeId, name: &str) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|&node| self.has_name(node, name))
            .collect()
    }

    pub fn first_descendant_named(&self, id: NodeId, name: &str) -> Option<NodeId> {
        let mut stack: Vec<NodeId> = self.nodes[id.0].children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            if self.has_name(next, name) {
                return Some(next);
            }
            stack.extend(self.nodes[next.0].children.iter().rev().copied());
        }
        None
    }

    /// Concatenated text of the node and all its descendants
    pub fn text(&self, id: NodeId) -> String {
        match &self.nodes[id.0].kind {
            NodeKind::Text(text) => text.clone(),
            _ => {
                let mut out = String::new();
                for node in self.descendants(id) {
                    if let NodeKind::Text(text) = &self.nodes[node.0].kind {
                        out.push_str(text);
                    }
                }
                out
            }
        }
    }

    /// Replace all children of the node with a single text node
    /// (no text node at all for an empty string)
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        if let NodeKind::Text(existing) = &mut self.nodes[id.0].kind {
            *existing = text.into();
            return;
        }
        let children = std::mem::take(&mut self.nodes[id.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
        let text = text.into();
        if !text.is_empty() {
            let node = self.create_text(text);
            self.append_child(id, node);
        }
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.push(NodeKind::Element {
            name: name.to_string(),
            attributes: Vec::new(),
        })
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeKind::Text(text.into()))
    }

    pub fn create_comment(&mut self, body: impl Into<String>) -> NodeId {
        self.push(NodeKind::Comment(body.into()))
    }

    pub fn create_raw(&mut self, markup: impl Into<String>) -> NodeId {
        self.push(NodeKind::Raw(markup.into()))
    }

    /// Create a detached element whose only child is the given text
    pub fn create_text_element(&mut self, name: &str, text: impl Into<String>) -> NodeId {
        let element = self.create_element(name);
        self.set_text(element, text);
        element
    }

    /// Remove a node from its parent's child list; the node and its subtree
    /// stay in the arena and can be reinserted
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&child| child != id);
        }
    }

    /// Position of the node in its parent's child list
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.nodes[id.0].parent?;
        self.nodes[parent.0].children.iter().position(|&child| child == id)
    }

    /// Insert a node at `index` among the children of `parent`, moving it
    /// out of its previous position first
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.detach(child);
        let children = &mut self.nodes[parent.0].children;
        let index = index.min(children.len());
        children.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_child(parent, 0, child);
    }

    /// Insert `node` right before `reference`. A detached reference has no
    /// position, so the call leaves the tree unchanged.
    pub fn insert_before(&mut self, reference: NodeId, node: NodeId) {
        self.detach(node);
        if let (Some(parent), Some(index)) = (self.parent(reference), self.index_in_parent(reference)) {
            self.insert_child(parent, index, node);
        }
    }

    /// Insert `node` right after `reference`. A detached reference has no
    /// position, so the call leaves the tree unchanged.
    pub fn insert_after(&mut self, reference: NodeId, node: NodeId) {
        self.detach(node);
        if let (Some(parent), Some(index)) = (self.parent(reference), self.index_in_parent(reference)) {
            self.insert_child(parent, index + 1, node);
        }
    }

    /// Put `new` at the position of `old`, which becomes detached
    pub fn replace(&mut self, old: NodeId, new: NodeId) {
        if old == new {
            return;
        }
        self.detach(new);
        if let (Some(parent), Some(index)) = (self.parent(old), self.index_in_parent(old)) {
            self.nodes[parent.0].children[index] = new;
            self.nodes[new.0].parent = Some(parent);
            self.nodes[old.0].parent = None;
        }
    }

    /// Previous sibling that is an element
    pub fn previous_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        self.nodes[parent.0].children[..index]
            .iter()
            .rev()
            .copied()
            .find(|&node| self.is_element(node))
    }

    /// Next sibling that is an element
    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        self.nodes[parent.0].children[index + 1..]
            .iter()
            .copied()
            .find(|&node| self.is_element(node))
    }

    /// Deep-copy a subtree of another document into this one. The copy is
    /// returned detached.
    pub fn import(&mut self, source: &Document, id: NodeId) -> NodeId {
        let kind = match source.kind(id) {
            NodeKind::Root => NodeKind::Element {
                name: String::new(),
                attributes: Vec::new(),
            },
            other => other.clone(),
        };
        let copy = self.push(kind);
        for &child in source.children(id) {
            let child_copy = self.import(source, child);
            self.append_child(copy, child_copy);
        }
        copy
    }
}
