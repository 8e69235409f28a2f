#![forbid(unsafe_code)]

//! In-memory [`RenderTarget`] used by tests, benches, and fuzzing.
//!
//! Nodes live in an arena owned by [`MemoryDom`]; [`NodeId`] is a copyable
//! handle. Detached nodes stay in the arena so stale handles remain valid.
//!
//! # Invariants
//!
//! 1. No arena borrow is held while a listener runs, so listeners may freely
//!    call back into the DOM (and effects they trigger may write to it).
//! 2. A node has at most one parent; appending an attached node moves it.
//! 3. An element's live input value is separate from its `value` attribute,
//!    as in a browser.

use std::cell::RefCell;
use std::fmt;
use std::mem;

use fbind_backend::{Listener, NodeKind, RenderTarget, Result};

use crate::markup::{self, Markup};

/// Handle to a node in a [`MemoryDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// An event delivered to [`MemoryDom`] listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomEvent {
    kind: String,
    value: Option<String>,
}

impl DomEvent {
    /// An event without a value (e.g. `click`).
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: None,
        }
    }

    /// An `input` event carrying the new input value.
    #[must_use]
    pub fn input(value: impl Into<String>) -> Self {
        Self {
            kind: "input".into(),
            value: Some(value.into()),
        }
    }

    /// The event type, matched against listener registrations.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The carried value, for input-style events.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

struct ElementData {
    tag: String,
    attributes: Vec<(String, String)>,
    value: Option<String>,
    children: Vec<NodeId>,
    listeners: Vec<(String, Listener<DomEvent>)>,
}

enum NodeData {
    Element(ElementData),
    Text(String),
    Comment(String),
}

struct Slot {
    data: NodeData,
    parent: Option<NodeId>,
}

/// An arena-backed UI tree implementing [`RenderTarget`].
pub struct MemoryDom {
    slots: RefCell<Vec<Slot>>,
    root: NodeId,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// An empty document whose root is a `<body>` element.
    #[must_use]
    pub fn new() -> Self {
        let body = Slot {
            data: NodeData::Element(ElementData {
                tag: "body".into(),
                attributes: Vec::new(),
                value: None,
                children: Vec::new(),
                listeners: Vec::new(),
            }),
            parent: None,
        };
        Self {
            slots: RefCell::new(vec![body]),
            root: NodeId(0),
        }
    }

    /// A document whose `<body>` holds the parsed `markup`.
    #[must_use]
    pub fn from_markup(markup: &str) -> Self {
        let dom = Self::new();
        dom.set_inner_html(&dom.root, markup);
        dom
    }

    /// The `<body>` element.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes ever allocated (attached or not).
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.slots.borrow().len()
    }

    /// Create a detached element.
    pub fn create_element(&self, tag: &str) -> NodeId {
        let mut slots = self.slots.borrow_mut();
        alloc(&mut slots, element(tag, Vec::new()), None)
    }

    /// Create a detached text node.
    pub fn create_text(&self, text: &str) -> NodeId {
        let mut slots = self.slots.borrow_mut();
        alloc(&mut slots, NodeData::Text(text.to_owned()), None)
    }

    /// Append a single child.
    pub fn append_child(&self, parent: NodeId, child: NodeId) {
        self.append_children(&parent, vec![child]);
    }

    /// Parent of `node`, if attached.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.slots.borrow().get(node.0).and_then(|s| s.parent)
    }

    /// Lower-case tag name of an element.
    #[must_use]
    pub fn tag_name(&self, node: NodeId) -> Option<String> {
        match &self.slots.borrow().get(node.0)?.data {
            NodeData::Element(el) => Some(el.tag.clone()),
            _ => None,
        }
    }

    /// Number of listeners registered on `node` for `kind`.
    #[must_use]
    pub fn listener_count(&self, node: NodeId, kind: &str) -> usize {
        match self.slots.borrow().get(node.0).map(|s| &s.data) {
            Some(NodeData::Element(el)) => el.listeners.iter().filter(|(k, _)| k == kind).count(),
            _ => 0,
        }
    }

    /// Run every listener of `node` registered for the event's kind, in
    /// registration order. The first listener error aborts dispatch.
    ///
    /// Returns the number of listeners that ran.
    pub fn dispatch(&self, node: NodeId, event: &DomEvent) -> Result<usize> {
        let listeners: Vec<Listener<DomEvent>> = match self.slots.borrow().get(node.0).map(|s| &s.data) {
            Some(NodeData::Element(el)) => el
                .listeners
                .iter()
                .filter(|(k, _)| *k == event.kind)
                .map(|(_, l)| l.clone())
                .collect(),
            _ => Vec::new(),
        };
        tracing::trace!(node = node.0, kind = %event.kind, listeners = listeners.len(), "dispatch");
        for listener in &listeners {
            listener(event)?;
        }
        Ok(listeners.len())
    }

    /// Dispatch a `click`.
    pub fn click(&self, node: NodeId) -> Result<usize> {
        self.dispatch(node, &DomEvent::new("click"))
    }

    /// Simulate the user typing: set the input value, then dispatch `input`.
    pub fn type_into(&self, node: NodeId, text: &str) -> Result<usize> {
        self.set_input_value(&node, text);
        self.dispatch(node, &DomEvent::input(text))
    }

    /// Outer markup of `node`.
    #[must_use]
    pub fn to_html(&self, node: NodeId) -> String {
        self.snapshot(node)
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    /// Markup of the children of `node`.
    #[must_use]
    pub fn inner_html(&self, node: NodeId) -> String {
        self.children(&node)
            .into_iter()
            .map(|child| self.to_html(child))
            .collect()
    }

    /// First element matching `selector`, searching below `scope`.
    #[must_use]
    pub fn query_within(&self, scope: NodeId, selector: &str) -> Option<NodeId> {
        let selector = Selector::parse(selector)?;
        let slots = self.slots.borrow();
        let mut stack = vec![scope];
        while let Some(id) = stack.pop() {
            let Some(NodeData::Element(el)) = slots.get(id.0).map(|s| &s.data) else {
                continue;
            };
            if selector.matches(el) {
                return Some(id);
            }
            stack.extend(el.children.iter().rev().copied());
        }
        None
    }

    fn snapshot(&self, node: NodeId) -> Option<Markup> {
        let slots = self.slots.borrow();
        snapshot_in(&slots, node)
    }

    fn detach_children(slots: &mut [Slot], node: NodeId) -> Vec<NodeId> {
        let children = match slots.get_mut(node.0).map(|s| &mut s.data) {
            Some(NodeData::Element(el)) => mem::take(&mut el.children),
            _ => return Vec::new(),
        };
        for child in &children {
            slots[child.0].parent = None;
        }
        children
    }
}

fn element(tag: &str, attributes: Vec<(String, String)>) -> NodeData {
    NodeData::Element(ElementData {
        tag: tag.to_owned(),
        attributes,
        value: None,
        children: Vec::new(),
        listeners: Vec::new(),
    })
}

fn alloc(slots: &mut Vec<Slot>, data: NodeData, parent: Option<NodeId>) -> NodeId {
    let id = NodeId(slots.len());
    slots.push(Slot { data, parent });
    id
}

fn instantiate(slots: &mut Vec<Slot>, markup: Markup, parent: NodeId) -> NodeId {
    match markup {
        Markup::Text(text) => alloc(slots, NodeData::Text(text), Some(parent)),
        Markup::Comment(text) => alloc(slots, NodeData::Comment(text), Some(parent)),
        Markup::Element {
            tag,
            attributes,
            children,
        } => {
            let id = alloc(slots, element(&tag, attributes), Some(parent));
            let ids: Vec<NodeId> = children
                .into_iter()
                .map(|child| instantiate(slots, child, id))
                .collect();
            if let NodeData::Element(el) = &mut slots[id.0].data {
                el.children = ids;
            }
            id
        }
    }
}

fn snapshot_in(slots: &[Slot], node: NodeId) -> Option<Markup> {
    Some(match &slots.get(node.0)?.data {
        NodeData::Text(text) => Markup::Text(text.clone()),
        NodeData::Comment(text) => Markup::Comment(text.clone()),
        NodeData::Element(el) => Markup::Element {
            tag: el.tag.clone(),
            attributes: el.attributes.clone(),
            children: el
                .children
                .iter()
                .filter_map(|&child| snapshot_in(slots, child))
                .collect(),
        },
    })
}

fn text_in(slots: &[Slot], node: NodeId, out: &mut String) {
    match slots.get(node.0).map(|s| &s.data) {
        Some(NodeData::Text(text)) => out.push_str(text),
        Some(NodeData::Element(el)) => {
            for &child in &el.children {
                text_in(slots, child, out);
            }
        }
        Some(NodeData::Comment(_)) | None => {}
    }
}

/// The selector forms understood by [`MemoryDom`]: `#id`, `.class`, `tag`.
enum Selector<'a> {
    Id(&'a str),
    Class(&'a str),
    Tag(&'a str),
}

impl<'a> Selector<'a> {
    fn parse(raw: &'a str) -> Option<Self> {
        let raw = raw.trim();
        let selector = if let Some(id) = raw.strip_prefix('#') {
            Self::Id(id)
        } else if let Some(class) = raw.strip_prefix('.') {
            Self::Class(class)
        } else {
            Self::Tag(raw)
        };
        match selector {
            Self::Id(s) | Self::Class(s) | Self::Tag(s) if s.is_empty() => None,
            other => Some(other),
        }
    }

    fn matches(&self, el: &ElementData) -> bool {
        let attr = |name: &str| {
            el.attributes
                .iter()
                .find_map(|(n, v)| (n == name).then_some(v.as_str()))
        };
        match self {
            Self::Id(id) => attr("id") == Some(*id),
            Self::Class(class) => {
                attr("class").is_some_and(|list| list.split_whitespace().any(|c| c == *class))
            }
            Self::Tag(tag) => el.tag.eq_ignore_ascii_case(tag),
        }
    }
}

impl RenderTarget for MemoryDom {
    type Node = NodeId;
    type Event = DomEvent;

    fn node_kind(&self, node: &NodeId) -> NodeKind {
        match self.slots.borrow().get(node.0).map(|s| &s.data) {
            Some(NodeData::Element(_)) => NodeKind::Element,
            Some(NodeData::Text(_)) => NodeKind::Text,
            Some(NodeData::Comment(_)) | None => NodeKind::Other,
        }
    }

    fn children(&self, node: &NodeId) -> Vec<NodeId> {
        match self.slots.borrow().get(node.0).map(|s| &s.data) {
            Some(NodeData::Element(el)) => el.children.clone(),
            _ => Vec::new(),
        }
    }

    fn take_children(&self, node: &NodeId) -> Vec<NodeId> {
        Self::detach_children(&mut self.slots.borrow_mut(), *node)
    }

    fn append_children(&self, node: &NodeId, children: Vec<NodeId>) {
        let mut slots = self.slots.borrow_mut();
        if !matches!(slots.get(node.0).map(|s| &s.data), Some(NodeData::Element(_))) {
            return;
        }
        for child in children {
            if child.0 >= slots.len() || child == *node {
                continue;
            }
            if let Some(old) = slots[child.0].parent.take()
                && let NodeData::Element(el) = &mut slots[old.0].data
            {
                el.children.retain(|&c| c != child);
            }
            slots[child.0].parent = Some(*node);
            if let NodeData::Element(el) = &mut slots[node.0].data {
                el.children.push(child);
            }
        }
    }

    fn query_selector(&self, selector: &str) -> Option<NodeId> {
        self.query_within(self.root, selector)
    }

    fn attributes(&self, node: &NodeId) -> Vec<(String, String)> {
        match self.slots.borrow().get(node.0).map(|s| &s.data) {
            Some(NodeData::Element(el)) => el.attributes.clone(),
            _ => Vec::new(),
        }
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) {
        if let Some(NodeData::Element(el)) = self.slots.borrow_mut().get_mut(node.0).map(|s| &mut s.data) {
            match el.attributes.iter_mut().find(|(n, _)| n == name) {
                Some((_, v)) => value.clone_into(v),
                None => el.attributes.push((name.to_owned(), value.to_owned())),
            }
        }
    }

    fn remove_attribute(&self, node: &NodeId, name: &str) {
        if let Some(NodeData::Element(el)) = self.slots.borrow_mut().get_mut(node.0).map(|s| &mut s.data) {
            el.attributes.retain(|(n, _)| n != name);
        }
    }

    fn add_event_listener(&self, node: &NodeId, event_type: &str, listener: Listener<DomEvent>) {
        if let Some(NodeData::Element(el)) = self.slots.borrow_mut().get_mut(node.0).map(|s| &mut s.data) {
            el.listeners.push((event_type.to_owned(), listener));
        }
    }

    fn text_content(&self, node: &NodeId) -> String {
        let slots = self.slots.borrow();
        match slots.get(node.0).map(|s| &s.data) {
            Some(NodeData::Comment(text)) => text.clone(),
            _ => {
                let mut out = String::new();
                text_in(&slots, *node, &mut out);
                out
            }
        }
    }

    fn set_text_content(&self, node: &NodeId, text: &str) {
        let mut slots = self.slots.borrow_mut();
        let Some(slot) = slots.get_mut(node.0) else {
            return;
        };
        if let NodeData::Text(t) | NodeData::Comment(t) = &mut slot.data {
            text.clone_into(t);
            return;
        }
        Self::detach_children(&mut slots, *node);
        if !text.is_empty() {
            let child = alloc(&mut slots, NodeData::Text(text.to_owned()), Some(*node));
            if let NodeData::Element(el) = &mut slots[node.0].data {
                el.children.push(child);
            }
        }
    }

    fn set_inner_html(&self, node: &NodeId, markup_text: &str) {
        let mut slots = self.slots.borrow_mut();
        if !matches!(slots.get(node.0).map(|s| &s.data), Some(NodeData::Element(_))) {
            return;
        }
        Self::detach_children(&mut slots, *node);
        let ids: Vec<NodeId> = markup::parse_fragment(markup_text)
            .into_iter()
            .map(|m| instantiate(&mut slots, m, *node))
            .collect();
        if let NodeData::Element(el) = &mut slots[node.0].data {
            el.children = ids;
        }
    }

    fn input_value(&self, node: &NodeId) -> String {
        match self.slots.borrow().get(node.0).map(|s| &s.data) {
            Some(NodeData::Element(el)) => el
                .value
                .clone()
                .or_else(|| {
                    el.attributes
                        .iter()
                        .find_map(|(n, v)| (n == "value").then(|| v.clone()))
                })
                .unwrap_or_default(),
            _ => String::new(),
        }
    }

    fn set_input_value(&self, node: &NodeId, value: &str) {
        if let Some(NodeData::Element(el)) = self.slots.borrow_mut().get_mut(node.0).map(|s| &mut s.data) {
            el.value = Some(value.to_owned());
        }
    }

    fn event_value(&self, event: &DomEvent) -> Option<String> {
        event.value.clone()
    }
}

impl fmt::Debug for MemoryDom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryDom")
            .field("nodes", &self.node_count())
            .field("root", &self.root)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fbind_backend::BindError;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn from_markup_and_serialize() {
        let dom = MemoryDom::from_markup("<div id=\"app\"><span>hi</span></div>");
        assert_eq!(dom.inner_html(dom.root()), "<div id=\"app\"><span>hi</span></div>");
        assert_eq!(dom.text_content(&dom.root()), "hi");
    }

    #[test]
    fn selectors() {
        let dom = MemoryDom::from_markup(
            "<div id=\"a\"><p class=\"x y\">1</p><p class=\"y\">2</p></div>",
        );
        let first = dom.query_selector(".y").unwrap();
        assert_eq!(dom.text_content(&first), "1");
        assert_eq!(dom.tag_name(dom.query_selector("#a").unwrap()).as_deref(), Some("div"));
        assert_eq!(dom.query_selector("P"), Some(first));
        assert_eq!(dom.query_selector("#missing"), None);
        assert_eq!(dom.query_selector("#"), None);
    }

    #[test]
    fn take_and_append_children_preserve_order() {
        let dom = MemoryDom::from_markup("<ul><li>a</li><li>b</li><li>c</li></ul>");
        let ul = dom.query_selector("ul").unwrap();
        let kids = dom.take_children(&ul);
        assert_eq!(kids.len(), 3);
        assert!(dom.children(&ul).is_empty());
        assert_eq!(dom.parent(kids[0]), None);

        dom.append_children(&ul, kids.clone());
        assert_eq!(dom.children(&ul), kids);
        assert_eq!(dom.text_content(&ul), "abc");
    }

    #[test]
    fn append_moves_attached_nodes() {
        let dom = MemoryDom::from_markup("<div id=\"a\"><b>x</b></div><div id=\"b\"></div>");
        let a = dom.query_selector("#a").unwrap();
        let b = dom.query_selector("#b").unwrap();
        let bold = dom.children(&a)[0];
        dom.append_child(b, bold);
        assert!(dom.children(&a).is_empty());
        assert_eq!(dom.parent(bold), Some(b));
    }

    #[test]
    fn set_text_content_replaces_children() {
        let dom = MemoryDom::from_markup("<p><b>old</b> text</p>");
        let p = dom.query_selector("p").unwrap();
        dom.set_text_content(&p, "<i>new</i>");
        assert_eq!(dom.to_html(p), "<p><i>new</i></p>");
        assert_eq!(dom.children(&p).len(), 1);
        assert_eq!(dom.node_kind(&dom.children(&p)[0]), NodeKind::Text);

        dom.set_text_content(&p, "");
        assert!(dom.children(&p).is_empty());
    }

    #[test]
    fn set_inner_html_parses() {
        let dom = MemoryDom::from_markup("<div></div>");
        let div = dom.query_selector("div").unwrap();
        dom.set_inner_html(&div, "<em>x</em>y");
        assert_eq!(dom.children(&div).len(), 2);
        assert_eq!(dom.node_kind(&dom.children(&div)[0]), NodeKind::Element);
    }

    #[test]
    fn attributes_round_trip() {
        let dom = MemoryDom::from_markup("<a href=\"/\" title=\"t\"></a>");
        let a = dom.query_selector("a").unwrap();
        dom.set_attribute(&a, "href", "/next");
        dom.set_attribute(&a, "rel", "x");
        dom.remove_attribute(&a, "title");
        assert_eq!(
            dom.attributes(&a),
            vec![("href".to_owned(), "/next".to_owned()), ("rel".to_owned(), "x".to_owned())]
        );
        assert_eq!(dom.attribute(&a, "rel").as_deref(), Some("x"));
    }

    #[test]
    fn input_value_is_separate_from_attribute() {
        let dom = MemoryDom::from_markup("<input value=\"init\">");
        let input = dom.query_selector("input").unwrap();
        assert_eq!(dom.input_value(&input), "init");
        dom.set_input_value(&input, "typed");
        assert_eq!(dom.input_value(&input), "typed");
        assert_eq!(dom.attribute(&input, "value").as_deref(), Some("init"));
    }

    #[test]
    fn dispatch_runs_listeners_in_order_and_stops_on_error() {
        let dom = MemoryDom::from_markup("<button>go</button>");
        let button = dom.query_selector("button").unwrap();
        let hits = Rc::new(Cell::new(0));

        let h = Rc::clone(&hits);
        dom.add_event_listener(&button, "click", Rc::new(move |_: &DomEvent| {
            h.set(h.get() + 1);
            Ok(())
        }));
        dom.add_event_listener(&button, "click", Rc::new(|_: &DomEvent| Err(BindError::Handler("boom".into()))));
        let h = Rc::clone(&hits);
        dom.add_event_listener(&button, "click", Rc::new(move |_: &DomEvent| {
            h.set(h.get() + 100);
            Ok(())
        }));

        let err = dom.click(button).unwrap_err();
        assert_eq!(err, BindError::Handler("boom".into()));
        assert_eq!(hits.get(), 1);
        assert_eq!(dom.listener_count(button, "click"), 3);
        assert_eq!(dom.dispatch(button, &DomEvent::new("keydown")).unwrap(), 0);
    }

    #[test]
    fn listeners_may_reenter_the_dom() {
        let dom = Rc::new(MemoryDom::from_markup("<input><p></p>"));
        let input = dom.query_selector("input").unwrap();
        let p = dom.query_selector("p").unwrap();

        let weak = Rc::downgrade(&dom);
        dom.add_event_listener(&input, "input", Rc::new(move |event: &DomEvent| {
            if let Some(dom) = weak.upgrade() {
                dom.set_text_content(&p, event.value().unwrap_or_default());
            }
            Ok(())
        }));

        assert_eq!(dom.type_into(input, "hello").unwrap(), 1);
        assert_eq!(dom.text_content(&p), "hello");
        assert_eq!(dom.input_value(&input), "hello");
    }
}
