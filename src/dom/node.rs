//! Arena-based page model.
//!
//! A [`Document`] holds element and text nodes in a flat arena addressed by
//! [`NodeId`]. Detached nodes stay in the arena but are unreachable from the
//! body, which is how the engine's staleness checks (`is_attached`,
//! `contains`) observe DOM churn between an asynchronous scan and its
//! commit.
//!
//! Layout is modeled with per-element rect overrides: an element without an
//! override takes the nearest ancestor's rect, the way inline wrappers
//! acquire geometry from their surroundings. A zero-area override models an
//! element the renderer gave no box.

use indexmap::IndexMap;

use crate::dom::geometry::Rect;
use crate::dom::style::InlineStyle;

/// Identifier of a node within one [`Document`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Payload of a node: an element or a run of text.
#[derive(Debug, Clone)]
pub enum NodeData {
    /// An element with a tag, attributes, inline style and optional layout.
    Element(ElementData),
    /// A text node.
    Text(String),
}

/// Element-specific data.
#[derive(Debug, Clone)]
pub struct ElementData {
    tag: String,
    attributes: IndexMap<String, String>,
    style: InlineStyle,
    rect: Option<Rect>,
}

impl ElementData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: IndexMap::new(),
            style: InlineStyle::new(),
            rect: None,
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

/// Default body geometry when the host provides none.
const DEFAULT_BODY_RECT: Rect = Rect {
    x: 0.0,
    y: 0.0,
    width: 800.0,
    height: 600.0,
};

/// An in-memory page: node arena, body root, viewport and scroll state.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    body: NodeId,
    viewport_height: f32,
    scroll_y: f32,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document with a `body` root.
    pub fn new() -> Self {
        let mut body_data = ElementData::new("body");
        body_data.rect = Some(DEFAULT_BODY_RECT);
        let body_node = Node {
            parent: None,
            children: Vec::new(),
            data: NodeData::Element(body_data),
        };
        Self {
            nodes: vec![body_node],
            body: NodeId(0),
            viewport_height: DEFAULT_BODY_RECT.height,
            scroll_y: 0.0,
        }
    }

    /// The body root.
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Number of nodes ever created (including detached ones).
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // --- node creation and tree surgery ---

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push_node(NodeData::Element(ElementData::new(tag)))
    }

    /// Create a detached text node.
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

    /// Append `child` as the last child of `parent`.
    ///
    /// Detaches `child` from any previous parent first. Appending to a text
    /// node is a no-op.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.is_element(parent) || parent == child {
            return;
        }
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Remove `node` from its parent's child list. No-op when detached.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != node);
        }
    }

    /// Replace `old_child` with `new_child` under `parent`.
    ///
    /// Returns `false` without touching the tree when `old_child` is not
    /// currently a child of `parent` (the stale-reference guard).
    pub fn replace_child(&mut self, parent: NodeId, new_child: NodeId, old_child: NodeId) -> bool {
        if !self.is_element(parent) {
            return false;
        }
        let Some(pos) = self.nodes[parent.0]
            .children
            .iter()
            .position(|&c| c == old_child)
        else {
            return false;
        };
        self.detach(new_child);
        self.nodes[parent.0].children[pos] = new_child;
        self.nodes[new_child.0].parent = Some(parent);
        self.nodes[old_child.0].parent = None;
        true
    }

    // --- accessors ---

    /// Whether the node is an element.
    pub fn is_element(&self, node: NodeId) -> bool {
        matches!(self.nodes[node.0].data, NodeData::Element(_))
    }

    /// Whether the node is a text node.
    pub fn is_text(&self, node: NodeId) -> bool {
        matches!(self.nodes[node.0].data, NodeData::Text(_))
    }

    /// Element tag name (lowercase), or `None` for text nodes.
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.0].data {
            NodeData::Element(el) => Some(&el.tag),
            NodeData::Text(_) => None,
        }
    }

    /// Text node content, or `None` for elements.
    pub fn text(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.0].data {
            NodeData::Text(t) => Some(t),
            NodeData::Element(_) => None,
        }
    }

    /// The node's parent.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    /// The nearest parent that is an element.
    pub fn parent_element(&self, node: NodeId) -> Option<NodeId> {
        let mut cur = self.nodes[node.0].parent;
        while let Some(p) = cur {
            if self.is_element(p) {
                return Some(p);
            }
            cur = self.nodes[p.0].parent;
        }
        None
    }

    /// Child list in order.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// The sibling immediately before `node`.
    pub fn prev_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.nodes[node.0].parent?;
        let siblings = &self.nodes[parent.0].children;
        let pos = siblings.iter().position(|&c| c == node)?;
        if pos == 0 {
            None
        } else {
            Some(siblings[pos - 1])
        }
    }

    /// The sibling immediately after `node`.
    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.nodes[node.0].parent?;
        let siblings = &self.nodes[parent.0].children;
        let pos = siblings.iter().position(|&c| c == node)?;
        siblings.get(pos + 1).copied()
    }

    /// Whether `node` is reachable from the body.
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut cur = node;
        loop {
            if cur == self.body {
                return true;
            }
            match self.nodes[cur.0].parent {
                Some(p) => cur = p,
                None => return false,
            }
        }
    }

    /// Whether `node` is `ancestor` or a descendant of it.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if n == ancestor {
                return true;
            }
            cur = self.nodes[n.0].parent;
        }
        false
    }

    // --- attributes, classes, style ---

    /// Set an attribute. Setting `style` also parses the inline style.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        if let NodeData::Element(el) = &mut self.nodes[node.0].data {
            if name == "style" {
                el.style = InlineStyle::parse(value);
            }
            el.attributes.insert(name, value.to_string());
        }
    }

    /// Get an attribute value.
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.nodes[node.0].data {
            NodeData::Element(el) => el
                .attributes
                .get(&name.to_ascii_lowercase())
                .map(String::as_str),
            NodeData::Text(_) => None,
        }
    }

    /// Whether the attribute is present (regardless of value).
    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    /// Whether the element's class list contains `class`.
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.attribute(node, "class")
            .map(|c| c.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Append `class` to the element's class list.
    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if self.has_class(node, class) {
            return;
        }
        let merged = match self.attribute(node, "class") {
            Some(existing) if !existing.is_empty() => format!("{} {}", existing, class),
            _ => class.to_string(),
        };
        self.set_attribute(node, "class", &merged);
    }

    /// The element's inline style.
    pub fn style(&self, node: NodeId) -> Option<&InlineStyle> {
        match &self.nodes[node.0].data {
            NodeData::Element(el) => Some(&el.style),
            NodeData::Text(_) => None,
        }
    }

    /// Set a single inline style property.
    pub fn set_style_property(&mut self, node: NodeId, property: &str, value: &str) {
        if let NodeData::Element(el) = &mut self.nodes[node.0].data {
            el.style.set(property, value);
        }
    }

    /// Remove a single inline style property. No-op when absent.
    pub fn remove_style_property(&mut self, node: NodeId, property: &str) {
        if let NodeData::Element(el) = &mut self.nodes[node.0].data {
            el.style.remove(property);
        }
    }

    /// Read a single inline style property.
    pub fn style_property(&self, node: NodeId, property: &str) -> Option<&str> {
        self.style(node).and_then(|s| s.get(property))
    }

    // --- layout ---

    /// Give the element an explicit layout rect (document space).
    ///
    /// A zero-area rect models an element the renderer gave no box.
    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        if let NodeData::Element(el) = &mut self.nodes[node.0].data {
            el.rect = Some(rect);
        }
    }

    /// The element's client rect: its own override, or the nearest
    /// ancestor's. Zero when nothing up the chain has layout.
    pub fn client_rect(&self, node: NodeId) -> Rect {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if let NodeData::Element(el) = &self.nodes[n.0].data {
                if let Some(rect) = el.rect {
                    return rect;
                }
            }
            cur = self.nodes[n.0].parent;
        }
        Rect::zero()
    }

    // --- text aggregation ---

    /// Concatenated text of all descendant text nodes, document order.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        match &self.nodes[node.0].data {
            NodeData::Text(t) => out.push_str(t),
            NodeData::Element(_) => {
                for &child in &self.nodes[node.0].children {
                    self.collect_text(child, out);
                }
            }
        }
    }

    /// Replace an element's children with a single text node holding its
    /// current text content (`innerHTML = textContent`).
    pub fn flatten_to_text(&mut self, node: NodeId) {
        if !self.is_element(node) {
            return;
        }
        let text = self.text_content(node);
        let old_children = std::mem::take(&mut self.nodes[node.0].children);
        for child in old_children {
            self.nodes[child.0].parent = None;
        }
        let text_node = self.create_text(&text);
        self.append_child(node, text_node);
    }

    // --- queries ---

    /// All attached elements, preorder document order.
    pub fn elements(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.preorder(self.body, &mut |doc, n| {
            if doc.is_element(n) {
                out.push(n);
            }
        });
        out
    }

    /// Attached elements carrying `class`, document order.
    pub fn elements_with_class(&self, class: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.preorder(self.body, &mut |doc, n| {
            if doc.has_class(n, class) {
                out.push(n);
            }
        });
        out
    }

    /// Attached elements carrying any of `classes`, document order.
    pub fn elements_with_any_class(&self, classes: &[&str]) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.preorder(self.body, &mut |doc, n| {
            if classes.iter().any(|c| doc.has_class(n, c)) {
                out.push(n);
            }
        });
        out
    }

    fn preorder(&self, node: NodeId, visit: &mut dyn FnMut(&Self, NodeId)) {
        visit(self, node);
        // Children may be mutated by callers between traversals but not
        // during one; clone keeps the borrow checker out of the closure.
        let children = self.nodes[node.0].children.clone();
        for child in children {
            self.preorder(child, visit);
        }
    }

    // --- viewport and scrolling ---

    /// Visible viewport height.
    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    /// Set the visible viewport height.
    pub fn set_viewport_height(&mut self, height: f32) {
        self.viewport_height = height;
    }

    /// Current vertical scroll offset.
    pub fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    /// Set the vertical scroll offset.
    pub fn set_scroll_y(&mut self, y: f32) {
        self.scroll_y = y.max(0.0);
    }

    /// Scroll so the node's rect is vertically centered in the viewport
    /// (block-center behavior).
    pub fn scroll_into_view(&mut self, node: NodeId) {
        let rect = self.client_rect(node);
        self.set_scroll_y(rect.center_y() - self.viewport_height / 2.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn div_with_text(doc: &mut Document, text: &str) -> (NodeId, NodeId) {
        let div = doc.create_element("div");
        let t = doc.create_text(text);
        doc.append_child(div, t);
        let body = doc.body();
        doc.append_child(body, div);
        (div, t)
    }

    #[test]
    fn test_append_and_text_content() {
        let mut doc = Document::new();
        let (div, _) = div_with_text(&mut doc, "hello ");
        let span = doc.create_element("span");
        let t2 = doc.create_text("world");
        doc.append_child(span, t2);
        doc.append_child(div, span);
        assert_eq!(doc.text_content(div), "hello world");
        assert_eq!(doc.text_content(doc.body()), "hello world");
    }

    #[test]
    fn test_replace_child_guards_stale_old_child() {
        let mut doc = Document::new();
        let (div, t) = div_with_text(&mut doc, "x");
        let replacement = doc.create_element("span");
        assert!(doc.replace_child(div, replacement, t));
        assert!(!doc.is_attached(t));
        assert!(doc.is_attached(replacement));
        // Second replace with the already-removed node fails silently
        let other = doc.create_element("span");
        assert!(!doc.replace_child(div, other, t));
        assert_eq!(doc.children(div), &[replacement]);
    }

    #[test]
    fn test_contains_and_attachment() {
        let mut doc = Document::new();
        let (div, t) = div_with_text(&mut doc, "x");
        assert!(doc.contains(div, t));
        assert!(doc.contains(doc.body(), t));
        assert!(!doc.contains(t, div));
        doc.detach(div);
        assert!(doc.contains(div, t)); // still a subtree, just detached
        assert!(!doc.is_attached(t));
    }

    #[test]
    fn test_class_list() {
        let mut doc = Document::new();
        let el = doc.create_element("span");
        doc.set_attribute(el, "class", "blink extra");
        assert!(doc.has_class(el, "blink"));
        assert!(doc.has_class(el, "extra"));
        assert!(!doc.has_class(el, "blink-off"));
        doc.add_class(el, "blink"); // already present
        assert_eq!(doc.attribute(el, "class"), Some("blink extra"));
        doc.add_class(el, "more");
        assert!(doc.has_class(el, "more"));
    }

    #[test]
    fn test_style_attribute_parses_inline_style() {
        let mut doc = Document::new();
        let el = doc.create_element("div");
        doc.set_attribute(el, "style", "display: none; opacity: 0.5");
        assert_eq!(doc.style_property(el, "display"), Some("none"));
        assert_eq!(doc.style(el).unwrap().opacity(), 0.5);
    }

    #[test]
    fn test_client_rect_inherits_from_ancestor() {
        let mut doc = Document::new();
        let (div, t) = div_with_text(&mut doc, "x");
        doc.set_rect(div, Rect::new(0.0, 100.0, 200.0, 20.0));
        let span = doc.create_element("span");
        doc.append_child(div, span);
        assert_eq!(doc.client_rect(span), Rect::new(0.0, 100.0, 200.0, 20.0));
        assert_eq!(doc.client_rect(t), Rect::new(0.0, 100.0, 200.0, 20.0));
        doc.set_rect(span, Rect::zero());
        assert!(!doc.client_rect(span).has_area());
    }

    #[test]
    fn test_flatten_to_text() {
        let mut doc = Document::new();
        let (div, _) = div_with_text(&mut doc, "a ");
        let span = doc.create_element("span");
        doc.set_attribute(span, "class", "blink");
        let t = doc.create_text("b");
        doc.append_child(span, t);
        doc.append_child(div, span);
        doc.flatten_to_text(div);
        assert_eq!(doc.children(div).len(), 1);
        assert_eq!(doc.text_content(div), "a b");
        assert!(doc.elements_with_class("blink").is_empty());
    }

    #[test]
    fn test_document_order_query() {
        let mut doc = Document::new();
        let (div1, _) = div_with_text(&mut doc, "one");
        let (div2, _) = div_with_text(&mut doc, "two");
        doc.add_class(div2, "m");
        doc.add_class(div1, "m");
        // Order follows the tree, not class insertion order
        assert_eq!(doc.elements_with_class("m"), vec![div1, div2]);
    }

    #[test]
    fn test_scroll_into_view_centers_block() {
        let mut doc = Document::new();
        let (div, _) = div_with_text(&mut doc, "x");
        doc.set_rect(div, Rect::new(0.0, 1000.0, 100.0, 20.0));
        doc.set_viewport_height(500.0);
        doc.scroll_into_view(div);
        // center_y = 1010, viewport half = 250
        assert_eq!(doc.scroll_y(), 760.0);
        // Scrolling to a target above the top clamps at zero
        doc.set_rect(div, Rect::new(0.0, 10.0, 100.0, 20.0));
        doc.scroll_into_view(div);
        assert_eq!(doc.scroll_y(), 0.0);
    }

    #[test]
    fn test_sibling_navigation() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        let body = doc.body();
        doc.append_child(body, div);
        let a = doc.create_element("span");
        let t = doc.create_text(" ");
        let b = doc.create_element("span");
        doc.append_child(div, a);
        doc.append_child(div, t);
        doc.append_child(div, b);
        assert_eq!(doc.next_sibling(a), Some(t));
        assert_eq!(doc.next_sibling(t), Some(b));
        assert_eq!(doc.next_sibling(b), None);
        assert_eq!(doc.prev_sibling(b), Some(t));
        assert_eq!(doc.prev_sibling(a), None);
    }
}
