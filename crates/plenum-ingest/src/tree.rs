//! Minimal read-only element tree built from `quick-xml` events.
//!
//! Plenary protocols need positional queries (siblings following a speech,
//! descendants in document order) that a streaming reader cannot answer, so the
//! whole document is materialised once into an arena of nodes. Adjacent text
//! is merged while building, so every element has at most one text node between
//! two element children.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::borrow::Cow;

/// Malformed document structure.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("XML error at byte {position}: {source}")]
    Xml {
        position: usize,
        #[source]
        source: quick_xml::Error,
    },
    #[error("element <{0}> is never closed")]
    Unclosed(String),
    #[error("document has no root element")]
    NoRoot,
    #[error("element <{0}> found after the root element")]
    TrailingElement(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
enum NodeData {
    Element {
        name: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

/// A parsed XML document.
#[derive(Debug)]
pub struct XmlTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl XmlTree {
    /// Parse a complete document.
    pub fn parse(xml: &str) -> Result<Self, TreeError> {
        let mut reader = Reader::from_str(xml);
        let mut nodes: Vec<Node> = Vec::new();
        let mut open: Vec<NodeId> = Vec::new();
        let mut root: Option<NodeId> = None;

        loop {
            let event = match reader.read_event() {
                Ok(event) => event,
                Err(source) => {
                    return Err(TreeError::Xml {
                        position: reader.buffer_position(),
                        source,
                    })
                }
            };

            match event {
                Event::Start(start) => {
                    let position = reader.buffer_position();
                    let id = open_element(&mut nodes, &open, &mut root, &start, position)?;
                    open.push(id);
                }
                Event::Empty(start) => {
                    let position = reader.buffer_position();
                    open_element(&mut nodes, &open, &mut root, &start, position)?;
                }
                Event::End(_) => {
                    open.pop();
                }
                Event::Text(text) => {
                    let content = text
                        .unescape()
                        .map(Cow::into_owned)
                        .unwrap_or_else(|_| String::from_utf8_lossy(&text).into_owned());
                    push_text(&mut nodes, &open, content);
                }
                Event::CData(data) => {
                    let content = String::from_utf8_lossy(&data).into_owned();
                    push_text(&mut nodes, &open, content);
                }
                Event::Eof => break,
                // Declarations, processing instructions, comments, doctype.
                _ => {}
            }
        }

        if let Some(id) = open.last() {
            let name = match &nodes[id.0].data {
                NodeData::Element { name, .. } => name.clone(),
                NodeData::Text(_) => String::new(),
            };
            return Err(TreeError::Unclosed(name));
        }

        let root = root.ok_or(TreeError::NoRoot)?;
        Ok(Self { nodes, root })
    }

    pub fn root(&self) -> Element<'_> {
        Element {
            tree: self,
            id: self.root,
        }
    }

    fn element(&self, id: NodeId) -> Option<Element<'_>> {
        match self.nodes.get(id.0)?.data {
            NodeData::Element { .. } => Some(Element { tree: self, id }),
            NodeData::Text(_) => None,
        }
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

fn open_element(
    nodes: &mut Vec<Node>,
    open: &[NodeId],
    root: &mut Option<NodeId>,
    start: &BytesStart<'_>,
    position: usize,
) -> Result<NodeId, TreeError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attrs = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|err| TreeError::Xml {
            position,
            source: err.into(),
        })?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map(Cow::into_owned)
            .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
        attrs.push((key, value));
    }

    let id = NodeId(nodes.len());
    let parent = open.last().copied();
    match parent {
        Some(parent) => nodes[parent.0].children.push(id),
        None if root.is_some() => return Err(TreeError::TrailingElement(name)),
        None => *root = Some(id),
    }
    nodes.push(Node {
        parent,
        children: Vec::new(),
        data: NodeData::Element { name, attrs },
    });
    Ok(id)
}

fn push_text(nodes: &mut Vec<Node>, open: &[NodeId], content: String) {
    // Text outside the root element is insignificant.
    let Some(parent) = open.last().copied() else {
        return;
    };
    if content.is_empty() {
        return;
    }

    if let Some(last) = nodes[parent.0].children.last().copied() {
        if let NodeData::Text(existing) = &mut nodes[last.0].data {
            existing.push_str(&content);
            return;
        }
    }

    let id = NodeId(nodes.len());
    nodes.push(Node {
        parent: Some(parent),
        children: Vec::new(),
        data: NodeData::Text(content),
    });
    nodes[parent.0].children.push(id);
}

// ============================================================================
// Element handle
// ============================================================================

/// Borrowed handle to an element of an [`XmlTree`].
#[derive(Clone, Copy)]
pub struct Element<'a> {
    tree: &'a XmlTree,
    id: NodeId,
}

impl std::fmt::Debug for Element<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Element")
            .field("name", &self.name())
            .field("id", &self.id)
            .finish()
    }
}

impl PartialEq for Element<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for Element<'_> {}

impl<'a> Element<'a> {
    pub fn name(&self) -> &'a str {
        match &self.tree.node(self.id).data {
            NodeData::Element { name, .. } => name,
            NodeData::Text(_) => "",
        }
    }

    pub fn is(&self, name: &str) -> bool {
        self.name() == name
    }

    pub fn attr(&self, key: &str) -> Option<&'a str> {
        match &self.tree.node(self.id).data {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
            NodeData::Text(_) => None,
        }
    }

    /// Attribute value, or `""` when absent.
    pub fn attr_or_empty(&self, key: &str) -> &'a str {
        self.attr(key).unwrap_or("")
    }

    pub fn parent(&self) -> Option<Element<'a>> {
        let parent = self.tree.node(self.id).parent?;
        self.tree.element(parent)
    }

    /// Element children in document order.
    pub fn children(&self) -> impl Iterator<Item = Element<'a>> + 'a {
        let tree = self.tree;
        tree.node(self.id)
            .children
            .iter()
            .filter_map(move |id| tree.element(*id))
    }

    pub fn child(&self, name: &str) -> Option<Element<'a>> {
        self.children().find(|c| c.is(name))
    }

    /// Element siblings after this one, in document order.
    pub fn following_siblings(&self) -> impl Iterator<Item = Element<'a>> + 'a {
        let me = *self;
        let siblings: &'a [NodeId] = match self.tree.node(self.id).parent {
            Some(parent) => &self.tree.node(parent).children,
            None => &[],
        };
        let start = siblings
            .iter()
            .position(|id| *id == me.id)
            .map(|pos| pos + 1)
            .unwrap_or(siblings.len());
        siblings[start..]
            .iter()
            .filter_map(move |id| me.tree.element(*id))
    }

    /// All element descendants in document order (pre-order), excluding self.
    pub fn descendants(&self) -> Descendants<'a> {
        let mut stack: Vec<NodeId> = self.tree.node(self.id).children.clone();
        stack.reverse();
        Descendants {
            tree: self.tree,
            stack,
        }
    }

    pub fn descendants_named(&self, name: &'a str) -> impl Iterator<Item = Element<'a>> + 'a {
        self.descendants().filter(move |e| e.is(name))
    }

    pub fn first_descendant(&self, name: &str) -> Option<Element<'a>> {
        self.descendants().find(|e| e.is(name))
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![self.id];
        while let Some(id) = stack.pop() {
            let node = self.tree.node(id);
            match &node.data {
                NodeData::Text(text) => out.push_str(text),
                NodeData::Element { .. } => stack.extend(node.children.iter().rev()),
            }
        }
        out
    }
}

/// Pre-order iterator over element descendants.
pub struct Descendants<'a> {
    tree: &'a XmlTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = Element<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            let node = self.tree.node(id);
            if let NodeData::Element { .. } = node.data {
                self.stack.extend(node.children.iter().rev());
                return Some(Element {
                    tree: self.tree,
                    id,
                });
            }
        }
        None
    }
}
