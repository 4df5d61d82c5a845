//! Arena-backed document tree for the order-confirmation dialect.
//!
//! Nodes are appended while the markup is scanned, so arena order is document
//! order and every subtree occupies a contiguous id range. Queries rely on
//! both properties: sorting ids restores document order, and a node's
//! descendants are exactly `id + 1..subtree_end`.

use crate::markup::selection::Selection;
use crate::markup::selector::Selector;

/// Index into the document arena.
pub type NodeId = usize;

/// Elements that never have content and are never closed explicitly.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements whose content is kept as a single raw text node.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    pub name: String,
    pub attributes: Vec<Attribute>,
    classes: Vec<String>,
}

impl ElementData {
    fn new(name: String, attributes: Vec<Attribute>) -> Self {
        let classes = attributes
            .iter()
            .find(|attr| attr.name == "class")
            .map(|attr| attr.value.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();

        Self {
            name,
            attributes,
            classes,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Document,
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub data: NodeData,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// One past the last descendant id.
    subtree_end: NodeId,
}

impl Node {
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }
}

/// Immutable tree parsed from normalized markup.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    /// Id of the synthetic document node every top-level node hangs from.
    pub const ROOT: NodeId = 0;

    /// Parse markup into a tree. Parsing is total: anything the tokenizer
    /// cannot make sense of ends up as text.
    pub fn parse(markup: &str) -> Self {
        let mut builder = TreeBuilder::new();
        builder.feed(markup);
        let document = builder.finish();
        tracing::trace!("Parsed document with {} nodes", document.len());
        document
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the document holds nothing but its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.node(id).and_then(Node::as_element)
    }

    /// Every element matching `selector`, in document order.
    pub fn query(&self, selector: &Selector) -> Selection<'_> {
        self.root().find(selector)
    }

    pub fn root(&self) -> Selection<'_> {
        Selection::new(self, vec![Self::ROOT])
    }

    pub(crate) fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|node| node.children.as_slice()).unwrap_or(&[])
    }

    pub(crate) fn descendants_of(&self, id: NodeId) -> std::ops::Range<NodeId> {
        match self.node(id) {
            Some(node) => id + 1..node.subtree_end,
            None => 0..0,
        }
    }

    /// Concatenation of every text node below `id`, untrimmed.
    pub(crate) fn raw_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(NodeData::Text(text)) = self.node(id).map(|node| &node.data) {
            out.push_str(text);
        }
        for descendant in self.descendants_of(id) {
            if let NodeData::Text(text) = &self.nodes[descendant].data {
                out.push_str(text);
            }
        }
        out
    }
}

struct TreeBuilder {
    nodes: Vec<Node>,
    open: Vec<NodeId>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            nodes: vec![Node {
                data: NodeData::Document,
                parent: None,
                children: Vec::new(),
                subtree_end: 1,
            }],
            open: vec![Document::ROOT],
        }
    }

    fn current(&self) -> NodeId {
        self.open.last().copied().unwrap_or(Document::ROOT)
    }

    fn append(&mut self, data: NodeData) -> NodeId {
        let id = self.nodes.len();
        let parent = self.current();
        self.nodes.push(Node {
            data,
            parent: Some(parent),
            children: Vec::new(),
            subtree_end: id + 1,
        });
        self.nodes[parent].children.push(id);
        id
    }

    fn text(&mut self, raw: &str) {
        if !raw.is_empty() {
            self.append(NodeData::Text(decode_entities(raw)));
        }
    }

    fn open_element(&mut self, name: String, attributes: Vec<Attribute>, self_closing: bool) {
        let void = self_closing || VOID_ELEMENTS.contains(&name.as_str());
        let id = self.append(NodeData::Element(ElementData::new(name, attributes)));
        if !void {
            self.open.push(id);
        }
    }

    /// Close the innermost open element named `name`, implicitly closing
    /// everything opened inside it. Stray close tags are ignored.
    fn close_element(&mut self, name: &str) {
        let position = self.open.iter().rposition(|&id| {
            matches!(&self.nodes[id].data, NodeData::Element(el) if el.name == name)
        });
        if let Some(position) = position {
            self.open.truncate(position.max(1));
        }
    }

    fn feed(&mut self, input: &str) {
        let mut pos = 0;
        while pos < input.len() {
            let Some(offset) = input[pos..].find('<') else {
                self.text(&input[pos..]);
                break;
            };
            self.text(&input[pos..pos + offset]);
            let start = pos + offset;
            let rest = &input[start..];

            if rest.starts_with("<!--") {
                pos = rest.find("-->").map_or(input.len(), |end| start + end + 3);
            } else if rest.starts_with("<!") || rest.starts_with("<?") {
                pos = rest.find('>').map_or(input.len(), |end| start + end + 1);
            } else if let Some(after) = rest.strip_prefix("</") {
                let end = after.find('>').unwrap_or(after.len());
                let name = after[..end].trim().to_ascii_lowercase();
                self.close_element(&name);
                pos = (start + 2 + end + 1).min(input.len());
            } else if rest[1..].starts_with(|c: char| c.is_ascii_alphabetic()) {
                pos = self.tag(input, start);
            } else {
                self.text("<");
                pos = start + 1;
            }
        }
    }

    /// Handle an opening tag starting at `start`; returns the resume position.
    fn tag(&mut self, input: &str, start: usize) -> usize {
        let rest = &input[start..];
        let end = find_tag_end(rest);
        let inner = &rest[1..end];
        let self_closing = inner.ends_with('/');
        let inner = inner.trim_end_matches('/');

        let name_end = inner
            .find(|c: char| c.is_whitespace() || c == '/')
            .unwrap_or(inner.len());
        let name = inner[..name_end].to_ascii_lowercase();
        let attributes = parse_attributes(&inner[name_end..]);
        let resume = (start + end + 1).min(input.len());

        let raw_text = !self_closing && RAW_TEXT_ELEMENTS.contains(&name.as_str());
        self.open_element(name.clone(), attributes, self_closing);
        if !raw_text {
            return resume;
        }

        // Everything up to the matching close tag is text, markup included.
        let body = &input[resume..];
        let close = format!("</{name}");
        let body_end = body
            .to_ascii_lowercase()
            .find(&close)
            .unwrap_or(body.len());
        if body_end > 0 {
            self.append(NodeData::Text(body[..body_end].to_string()));
        }
        self.close_element(&name);
        let after = resume + body_end;
        input[after..]
            .find('>')
            .map_or(input.len(), |gt| after + gt + 1)
    }

    fn finish(mut self) -> Document {
        for id in (0..self.nodes.len()).rev() {
            let end = self.nodes[id]
                .children
                .last()
                .map_or(id + 1, |&last| self.nodes[last].subtree_end);
            self.nodes[id].subtree_end = end;
        }
        Document { nodes: self.nodes }
    }
}

/// Index of the `>` closing the tag that starts `rest`, skipping quoted
/// attribute values (`alt="<=>"` is common in the dialect).
fn find_tag_end(rest: &str) -> usize {
    let mut quote = None;
    for (index, byte) in rest.bytes().enumerate().skip(1) {
        match (quote, byte) {
            (Some(q), b) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(byte),
            (None, b'>') => return index,
            (None, _) => {}
        }
    }
    rest.len()
}

fn parse_attributes(mut rest: &str) -> Vec<Attribute> {
    let mut attributes = Vec::new();
    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == '/');
        if rest.is_empty() {
            break;
        }

        let name_end = rest
            .find(|c: char| c.is_whitespace() || c == '=' || c == '/')
            .unwrap_or(rest.len());
        let name = rest[..name_end].to_ascii_lowercase();
        rest = rest[name_end..].trim_start();

        let value = match rest.strip_prefix('=') {
            Some(after_eq) => {
                let after_eq = after_eq.trim_start();
                match after_eq.chars().next() {
                    Some(quote @ ('"' | '\'')) => {
                        let body = &after_eq[1..];
                        let close = body.find(quote).unwrap_or(body.len());
                        rest = body.get(close + 1..).unwrap_or("");
                        &body[..close]
                    }
                    _ => {
                        let end = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
                        rest = &after_eq[end..];
                        &after_eq[..end]
                    }
                }
            }
            None => "",
        };

        if !name.is_empty() {
            attributes.push(Attribute {
                name,
                value: decode_entities(value),
            });
        }
    }
    attributes
}

/// Decode the XML predefined entities and numeric character references.
/// Every other entity (`&nbsp;` in particular) is kept verbatim.
pub fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let candidate = &rest[amp..];
        let decoded = candidate
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_entity(&candidate[1..semi]).map(|c| (c, semi)));
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &candidate[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let number = entity.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}
