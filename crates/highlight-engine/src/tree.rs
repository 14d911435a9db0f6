//! Mutable markup tree for the rendered document
//!
//! The highlighter is the only writer of this tree once content has been
//! placed. Nodes live in an arena; replaced nodes are simply unlinked, and
//! serialization walks only what is reachable from the root.

use std::fmt::Write as _;

/// Handle into the container's node arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
pub enum NodeData {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
pub struct ElementData {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
}

impl ElementData {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|list| list.split_whitespace().any(|c| c == class))
    }
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "meta", "link"];
const DOCUMENT_TAG: &str = "#document";

/// The live render target: markup parsed into a mutable tree.
///
/// The generation counter advances every time content is replaced, so
/// references into an older tree can be recognized as stale.
pub struct Container {
    nodes: Vec<Node>,
    root: NodeId,
    generation: u64,
}

impl Container {
    pub fn new() -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            data: NodeData::Element(ElementData {
                tag: DOCUMENT_TAG.to_string(),
                attrs: Vec::new(),
            }),
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
            generation: 0,
        }
    }

    pub fn from_markup(markup: &str) -> Self {
        let mut container = Self::new();
        container.set_content(markup);
        container
    }

    /// Replace the whole tree with freshly parsed markup.
    pub fn set_content(&mut self, markup: &str) {
        self.nodes.truncate(1);
        self.nodes[0].children.clear();
        self.generation += 1;
        self.parse_into(markup);
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn is_empty(&self) -> bool {
        self.nodes[self.root.0].children.is_empty()
    }

    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0].data
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.nodes[id.0].data {
            NodeData::Element(el) => Some(el),
            NodeData::Text(_) => None,
        }
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.tag.as_str())
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].data {
            NodeData::Text(t) => Some(t.as_str()),
            NodeData::Element(_) => None,
        }
    }

    pub fn create_element(&mut self, tag: &str, attrs: Vec<(String, String)>) -> NodeId {
        self.push_node(NodeData::Element(ElementData {
            tag: tag.to_string(),
            attrs,
        }))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push_node(NodeData::Text(text.to_string()))
    }

    fn push_node(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            data,
        });
        id
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Swap `new` into `old`'s place under its parent. `old` is unlinked.
    pub fn replace_node(&mut self, old: NodeId, new: NodeId) {
        let Some(parent) = self.nodes[old.0].parent else {
            return;
        };
        if let Some(slot) = self.nodes[parent.0]
            .children
            .iter()
            .position(|&c| c == old)
        {
            self.nodes[parent.0].children[slot] = new;
            self.nodes[new.0].parent = Some(parent);
            self.nodes[old.0].parent = None;
        }
    }

    /// Concatenated text of the whole subtree under `id`
    pub fn subtree_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id.0].data {
            NodeData::Text(t) => out.push_str(t),
            NodeData::Element(_) => {
                for &child in &self.nodes[id.0].children {
                    self.collect_text(child, out);
                }
            }
        }
    }

    /// All text nodes reachable from the root, in document order
    pub fn text_leaves(&self) -> Vec<NodeId> {
        self.document_order()
            .into_iter()
            .filter(|&id| matches!(self.nodes[id.0].data, NodeData::Text(_)))
            .collect()
    }

    /// Every reachable node in document (depth-first) order
    pub fn document_order(&self) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            for &child in self.nodes[id.0].children.iter().rev() {
                stack.push(child);
            }
        }
        order
    }

    /// Element ancestors of `id`, nearest first
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.nodes[id.0].parent;
        while let Some(node) = current {
            out.push(node);
            current = self.nodes[node.0].parent;
        }
        out
    }

    pub fn is_descendant_of(&self, id: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(id).contains(&ancestor)
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if let NodeData::Element(el) = &mut self.nodes[id.0].data {
            match el.attrs.iter_mut().find(|(k, _)| k == "class") {
                Some((_, value)) => {
                    if !value.split_whitespace().any(|c| c == class) {
                        if !value.is_empty() {
                            value.push(' ');
                        }
                        value.push_str(class);
                    }
                }
                None => el.attrs.push(("class".to_string(), class.to_string())),
            }
        }
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        if let NodeData::Element(el) = &mut self.nodes[id.0].data {
            if let Some((_, value)) = el.attrs.iter_mut().find(|(k, _)| k == "class") {
                *value = value
                    .split_whitespace()
                    .filter(|c| *c != class)
                    .collect::<Vec<_>>()
                    .join(" ");
            }
        }
    }

    /// Merge runs of adjacent text children throughout the tree.
    pub fn merge_adjacent_text(&mut self) {
        let elements: Vec<NodeId> = self
            .document_order()
            .into_iter()
            .filter(|&id| matches!(self.nodes[id.0].data, NodeData::Element(_)))
            .collect();
        for el in elements {
            let children = self.nodes[el.0].children.clone();
            let mut merged: Vec<NodeId> = Vec::new();
            for child in children {
                let text = match &self.nodes[child.0].data {
                    NodeData::Text(t) => Some(t.clone()),
                    NodeData::Element(_) => None,
                };
                match (text, merged.last().copied()) {
                    (Some(t), Some(last)) if matches!(self.nodes[last.0].data, NodeData::Text(_)) => {
                        if let NodeData::Text(existing) = &mut self.nodes[last.0].data {
                            existing.push_str(&t);
                        }
                        self.nodes[child.0].parent = None;
                    }
                    _ => merged.push(child),
                }
            }
            self.nodes[el.0].children = merged;
        }
    }

    pub fn serialize(&self) -> String {
        let mut out = String::new();
        self.serialize_node(self.root, &mut out);
        out
    }

    fn serialize_node(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id.0].data {
            NodeData::Text(t) => out.push_str(t),
            NodeData::Element(el) => {
                let is_document = el.tag == DOCUMENT_TAG;
                if !is_document {
                    out.push('<');
                    out.push_str(&el.tag);
                    for (name, value) in &el.attrs {
                        let _ = write!(out, " {name}=\"{value}\"");
                    }
                    out.push('>');
                    if VOID_TAGS.contains(&el.tag.as_str()) {
                        return;
                    }
                }
                for &child in &self.nodes[id.0].children {
                    self.serialize_node(child, out);
                }
                if !is_document {
                    let _ = write!(out, "</{}>", el.tag);
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Parsing
    // ------------------------------------------------------------------

    fn parse_into(&mut self, markup: &str) {
        let mut stack: Vec<NodeId> = vec![self.root];
        let mut rest = markup;

        while let Some(open) = rest.find('<') {
            let (text, tail) = rest.split_at(open);
            if !text.is_empty() {
                let node = self.create_text(text);
                self.append_child(*stack.last().unwrap(), node);
            }

            let Some(close) = find_tag_end(tail) else {
                let node = self.create_text(tail);
                self.append_child(*stack.last().unwrap(), node);
                return;
            };
            let raw = &tail[..=close];

            if raw.starts_with("</") {
                let name = tag_name(raw);
                if let Some(pos) = stack
                    .iter()
                    .rposition(|&id| self.tag(id) == Some(name.as_str()))
                {
                    if pos > 0 {
                        stack.truncate(pos);
                    }
                }
            } else {
                let (name, attrs) = parse_open_tag(raw);
                if !name.is_empty() {
                    let el = self.create_element(&name, attrs);
                    self.append_child(*stack.last().unwrap(), el);
                    let closes_itself =
                        raw.ends_with("/>") || VOID_TAGS.contains(&name.as_str());
                    if !closes_itself {
                        stack.push(el);
                    }
                }
            }
            rest = &tail[close + 1..];
        }

        if !rest.is_empty() {
            let node = self.create_text(rest);
            self.append_child(*stack.last().unwrap(), node);
        }
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

/// Byte offset of the `>` terminating the tag that starts `tag`, honoring
/// quoted attribute values.
fn find_tag_end(tag: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (idx, ch) in tag.char_indices() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => {}
            None => match ch {
                '"' | '\'' => quote = Some(ch),
                '>' => return Some(idx),
                _ => {}
            },
        }
    }
    None
}

fn tag_name(raw_tag: &str) -> String {
    raw_tag
        .trim_start_matches('<')
        .trim_start_matches('/')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

fn parse_open_tag(raw: &str) -> (String, Vec<(String, String)>) {
    let inner = raw.trim_start_matches('<');
    let inner = inner
        .strip_suffix("/>")
        .or_else(|| inner.strip_suffix('>'))
        .unwrap_or(inner);

    let name_end = inner
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(inner.len());
    let name = inner[..name_end].to_ascii_lowercase();
    (name, parse_attrs(&inner[name_end..]))
}

fn parse_attrs(mut rest: &str) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }
        let name_end = rest
            .find(|c: char| c == '=' || c.is_whitespace())
            .unwrap_or(rest.len());
        if name_end == 0 && !rest.starts_with('=') {
            // Stray character; skip it rather than loop
            let mut chars = rest.chars();
            chars.next();
            rest = chars.as_str();
            continue;
        }
        let name = rest[..name_end].to_string();
        rest = rest[name_end..].trim_start();

        if let Some(after_eq) = rest.strip_prefix('=') {
            let after_eq = after_eq.trim_start();
            match after_eq.chars().next() {
                Some(q @ ('"' | '\'')) => {
                    let body = &after_eq[q.len_utf8()..];
                    match body.find(q) {
                        Some(end) => {
                            attrs.push((name, body[..end].to_string()));
                            rest = &body[end + q.len_utf8()..];
                        }
                        None => {
                            attrs.push((name, body.to_string()));
                            rest = "";
                        }
                    }
                }
                _ => {
                    let end = after_eq
                        .find(char::is_whitespace)
                        .unwrap_or(after_eq.len());
                    attrs.push((name, after_eq[..end].to_string()));
                    rest = &after_eq[end..];
                }
            }
        } else if !name.is_empty() {
            attrs.push((name, String::new()));
        }
    }
    attrs
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_serialize_roundtrip() {
        let markup = r#"<section class="chapter-block" data-chapter="84"><h4 class="position-heading" id="pos-84-13" data-ncm="8413">84.13 Bombas</h4><p>texto com <strong>destaque</strong></p></section>"#;
        let container = Container::from_markup(markup);
        assert_eq!(container.serialize(), markup);
    }

    #[test]
    fn test_attr_and_class_lookup() {
        let container = Container::from_markup(r#"<p class="a b" id="x">y</p>"#);
        let p = container.children(container.root())[0];
        let el = container.element(p).unwrap();
        assert_eq!(el.attr("id"), Some("x"));
        assert!(el.has_class("b"));
        assert!(!el.has_class("c"));
    }

    #[test]
    fn test_text_leaves_in_document_order() {
        let container = Container::from_markup("<p>um <b>dois</b> três</p><p>quatro</p>");
        let texts: Vec<String> = container
            .text_leaves()
            .into_iter()
            .map(|id| container.text(id).unwrap().to_string())
            .collect();
        assert_eq!(texts, vec!["um ", "dois", " três", "quatro"]);
    }

    #[test]
    fn test_replace_node_and_subtree_text() {
        let mut container = Container::from_markup("<p>antes</p>");
        let p = container.children(container.root())[0];
        let leaf = container.children(p)[0];

        let wrapper = container.create_element("span", vec![]);
        let inner = container.create_text("depois");
        container.append_child(wrapper, inner);
        container.replace_node(leaf, wrapper);

        assert_eq!(container.serialize(), "<p><span>depois</span></p>");
        assert_eq!(container.subtree_text(p), "depois");
    }

    #[test]
    fn test_merge_adjacent_text() {
        let mut container = Container::from_markup("<p></p>");
        let p = container.children(container.root())[0];
        for piece in ["a", "b", "c"] {
            let t = container.create_text(piece);
            container.append_child(p, t);
        }
        container.merge_adjacent_text();
        assert_eq!(container.children(p).len(), 1);
        assert_eq!(container.subtree_text(p), "abc");
    }

    #[test]
    fn test_generation_advances_on_content_change() {
        let mut container = Container::from_markup("<p>a</p>");
        let first = container.generation();
        container.set_content("<p>b</p>");
        assert!(container.generation() > first);
    }

    #[test]
    fn test_void_elements_do_not_swallow_siblings() {
        let container = Container::from_markup("<p>a<br>b</p>");
        let p = container.children(container.root())[0];
        assert_eq!(container.children(p).len(), 3);
        assert_eq!(container.serialize(), "<p>a<br>b</p>");
    }

    #[test]
    fn test_class_mutation() {
        let mut container = Container::from_markup(r#"<mark class="search-highlight">x</mark>"#);
        let mark = container.children(container.root())[0];
        container.add_class(mark, "search-highlight-active");
        assert!(container.element(mark).unwrap().has_class("search-highlight-active"));
        container.remove_class(mark, "search-highlight-active");
        assert!(!container.element(mark).unwrap().has_class("search-highlight-active"));
        assert!(container.element(mark).unwrap().has_class("search-highlight"));
    }
}
