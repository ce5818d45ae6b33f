//! Generic XML element tree.
//!
//! Documents are parsed once with quick-xml into an arena of elements and are
//! immutable afterwards. Elements are addressed by [`ElementId`]. Tag names are
//! stored without their namespace prefix, so `<pom:version>` and `<version>`
//! both read as `version`.

use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

use pomscope_util::errors::PomscopeError;

/// Index of an element inside its [`XmlDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(u32);

impl ElementId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
struct Node {
    name: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    text: String,
}

/// A parsed XML document.
#[derive(Debug, Clone)]
pub struct XmlDocument {
    nodes: Vec<Node>,
    root: ElementId,
}

impl XmlDocument {
    /// Parse `xml` into an element tree. `path` is only used for error messages.
    pub fn parse(xml: &str, path: &Path) -> miette::Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut nodes: Vec<Node> = Vec::new();
        let mut stack: Vec<ElementId> = Vec::new();
        let mut root: Option<ElementId> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    let id = push_node(&mut nodes, stack.last().copied(), name);
                    if stack.is_empty() {
                        root.get_or_insert(id);
                    }
                    stack.push(id);
                }
                Ok(Event::Empty(ref e)) => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    let id = push_node(&mut nodes, stack.last().copied(), name);
                    if stack.is_empty() {
                        root.get_or_insert(id);
                    }
                }
                Ok(Event::End(_)) => {
                    stack.pop();
                }
                Ok(Event::Text(ref e)) => {
                    if let Some(&current) = stack.last() {
                        let text = e
                            .unescape()
                            .map_err(|err| xml_error(path, err.to_string()))?;
                        nodes[current.index()].text.push_str(text.trim());
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some(&current) = stack.last() {
                        let raw = e.into_inner();
                        let text = String::from_utf8_lossy(&raw);
                        nodes[current.index()].text.push_str(text.trim());
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(xml_error(
                        path,
                        format!("{e} (at byte {})", reader.error_position()),
                    )
                    .into());
                }
                _ => {}
            }
        }

        if let Some(&open) = stack.last() {
            return Err(xml_error(
                path,
                format!("unclosed element <{}>", nodes[open.index()].name),
            )
            .into());
        }

        let root = root.ok_or_else(|| xml_error(path, "document has no root element".into()))?;
        Ok(Self { nodes, root })
    }

    /// The document element.
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Number of elements in the document.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Local tag name of an element.
    pub fn name(&self, id: ElementId) -> &str {
        &self.nodes[id.index()].name
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.nodes[id.index()].parent
    }

    /// Child elements in document order.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        &self.nodes[id.index()].children
    }

    pub fn has_children(&self, id: ElementId) -> bool {
        !self.nodes[id.index()].children.is_empty()
    }

    /// First child element with the given tag name.
    pub fn child(&self, id: ElementId, name: &str) -> Option<ElementId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&c| self.name(c) == name)
    }

    /// Text content directly inside the element, trimmed. Text split by
    /// comments or child elements is concatenated.
    pub fn text(&self, id: ElementId) -> &str {
        &self.nodes[id.index()].text
    }

    /// All elements below `id` in document order, excluding `id` itself.
    pub fn descendants(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut pending: Vec<ElementId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = pending.pop() {
            out.push(next);
            pending.extend(self.children(next).iter().rev().copied());
        }
        out
    }
}

fn push_node(nodes: &mut Vec<Node>, parent: Option<ElementId>, name: String) -> ElementId {
    let id = ElementId(nodes.len() as u32);
    nodes.push(Node {
        name,
        parent,
        children: Vec::new(),
        text: String::new(),
    });
    if let Some(parent) = parent {
        nodes[parent.index()].children.push(id);
    }
    id
}

fn xml_error(path: &Path, message: String) -> PomscopeError {
    PomscopeError::Xml {
        path: path.to_path_buf(),
        message,
    }
}
