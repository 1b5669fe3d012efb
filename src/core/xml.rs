//! Owned, read-only XML element tree and the namespace-tolerant lookup used
//! for every tag in a fiscal document.

use crate::utils::error::ParseError;
use quick_xml::events::Event;
use quick_xml::Reader;

/// 預設的 fiscal namespace，依優先順序
pub const DEFAULT_NAMESPACES: [&str; 2] = [
    "http://www.portalfiscal.inf.br/nfe",
    "www.portalfiscal.inf.br",
];

/// 巢狀層數上限，超過即拒絕解析
pub const MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    pub namespace: Option<String>,
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    namespace: Option<String>,
    name: String,
    attributes: Vec<XmlAttribute>,
    children: Vec<XmlNode>,
}

/// Whole parsed document. Unlike an element, its scope includes the root
/// element itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    root: XmlElement,
}

impl XmlDocument {
    /// Parses text into an owned tree. A `<!DOCTYPE>` is accepted; nesting
    /// deeper than [`MAX_DEPTH`] is rejected before the tree is built.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        if exceeds_depth(text, MAX_DEPTH) {
            return Err(ParseError::TooDeep(MAX_DEPTH));
        }

        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..roxmltree::ParsingOptions::default()
        };
        let doc = roxmltree::Document::parse_with_options(text, options)
            .map_err(|e| ParseError::Malformed(e.to_string()))?;
        Ok(Self {
            root: XmlElement::from_node(doc.root_element()),
        })
    }

    pub fn root(&self) -> &XmlElement {
        &self.root
    }
}

impl XmlElement {
    fn shell(node: roxmltree::Node<'_, '_>) -> Self {
        let attributes = node
            .attributes()
            .map(|attr| XmlAttribute {
                namespace: attr.namespace().map(String::from),
                name: attr.name().to_string(),
                value: attr.value().to_string(),
            })
            .collect();

        Self {
            namespace: node.tag_name().namespace().map(String::from),
            name: node.tag_name().name().to_string(),
            attributes,
            children: Vec::new(),
        }
    }

    /// 不用遞迴複製整棵樹
    fn from_node(node: roxmltree::Node<'_, '_>) -> Self {
        let mut stack = vec![(Self::shell(node), node.children())];
        let mut finished = None;

        while let Some((element, children)) = stack.last_mut() {
            match children.next() {
                Some(child) if child.is_element() => {
                    stack.push((Self::shell(child), child.children()));
                }
                Some(child) => {
                    if let Some(text) = child.text().filter(|_| child.is_text()) {
                        element.children.push(XmlNode::Text(text.to_string()));
                    }
                }
                None => {
                    let Some((done, _)) = stack.pop() else { break };
                    match stack.last_mut() {
                        Some((parent, _)) => parent.children.push(XmlNode::Element(done)),
                        None => finished = Some(done),
                    }
                }
            }
        }

        finished.unwrap_or_else(|| Self::shell(node))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Value of an attribute without a namespace, e.g. `Id`.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.namespace.is_none() && a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|c| match c {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    /// All descendant elements in document order, not including `self`.
    pub fn descendants(&self) -> Descendants<'_> {
        let mut stack: Vec<&XmlElement> = self.child_elements().collect();
        stack.reverse();
        Descendants { stack }
    }

    /// Concatenated text of every descendant text node.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![self.children.iter()];
        while let Some(children) = stack.last_mut() {
            match children.next() {
                Some(XmlNode::Text(t)) => out.push_str(t),
                Some(XmlNode::Element(e)) => stack.push(e.children.iter()),
                None => {
                    stack.pop();
                }
            }
        }
        out
    }

    fn matches(&self, local_name: &str, namespace: Option<&str>) -> bool {
        self.name == local_name && (namespace.is_none() || self.namespace() == namespace)
    }
}

pub struct Descendants<'a> {
    stack: Vec<&'a XmlElement>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlElement;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        let before = self.stack.len();
        self.stack.extend(next.child_elements());
        self.stack[before..].reverse();
        Some(next)
    }
}

/// Streams the text once and reports whether element nesting goes past
/// `limit`. Syntax errors stop the scan; the real parser reports them.
fn exceeds_depth(text: &str, limit: usize) -> bool {
    let mut reader = Reader::from_str(text);
    let mut buf = Vec::new();
    let mut depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(_)) => {
                depth += 1;
                if depth > limit {
                    return true;
                }
            }
            Ok(Event::End(_)) => depth = depth.saturating_sub(1),
            Ok(Event::Eof) | Err(_) => return false,
            Ok(_) => {}
        }
        buf.clear();
    }
}

/// Something whose elements can be searched by tag.
pub trait ElementScope {
    fn elements(&self) -> Box<dyn Iterator<Item = &XmlElement> + '_>;
}

impl ElementScope for XmlDocument {
    fn elements(&self) -> Box<dyn Iterator<Item = &XmlElement> + '_> {
        Box::new(std::iter::once(&self.root).chain(self.root.descendants()))
    }
}

impl ElementScope for XmlElement {
    fn elements(&self) -> Box<dyn Iterator<Item = &XmlElement> + '_> {
        Box::new(self.descendants())
    }
}

/// 先以 namespace 查找，全部落空時再以 local name 查找
///
/// Each namespace is tried in order and the first non-empty match list is
/// returned as is. Only when every qualified search is empty does the
/// namespace-agnostic search run; the two lists are never merged.
pub fn lookup_elements<'a, S, N>(
    scope: &'a S,
    local_name: &str,
    namespaces: &[N],
) -> Vec<&'a XmlElement>
where
    S: ElementScope + ?Sized,
    N: AsRef<str>,
{
    for ns in namespaces {
        let found: Vec<_> = scope
            .elements()
            .filter(|e| e.matches(local_name, Some(ns.as_ref())))
            .collect();
        if !found.is_empty() {
            return found;
        }
    }

    let found: Vec<_> = scope
        .elements()
        .filter(|e| e.matches(local_name, None))
        .collect();
    if !found.is_empty() {
        tracing::debug!(
            "<{}> matched by local name only ({} elements)",
            local_name,
            found.len()
        );
    }
    found
}

pub fn lookup_first<'a, S, N>(
    scope: &'a S,
    local_name: &str,
    namespaces: &[N],
) -> Option<&'a XmlElement>
where
    S: ElementScope + ?Sized,
    N: AsRef<str>,
{
    lookup_elements(scope, local_name, namespaces).into_iter().next()
}
