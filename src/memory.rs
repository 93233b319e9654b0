//! A headless [`Host`] that keeps its node tree in memory and journals every mutation.
//!
//! Useful to exercise components without a browser, and to assert exactly which host operations a render caused.

use crate::{
	data::{Listener, Value},
	host::Host,
};
use core::{any::Any, fmt::Write as _};
use hashbrown::HashMap;
use std::cell::RefCell;
use tracing::{error, trace};

/// Index of a node in a [`MemoryHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// One host-visible mutation, in the order it was applied.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
	CreateElement { node: NodeId, tag: String, svg: bool },
	CreateText { node: NodeId, text: String },
	SetText { node: NodeId, text: String },
	SetStyle { node: NodeId, property: String, value: String },
	SetClass { node: NodeId, class_name: String },
	AddListener { node: NodeId, event: String },
	RemoveListener { node: NodeId, event: String },
	SetProperty { node: NodeId, name: String, value: Option<Value> },
	SetAttribute { node: NodeId, name: String, value: String },
	RemoveAttribute { node: NodeId, name: String },
	Append { parent: NodeId, child: NodeId },
	InsertBefore { parent: NodeId, child: NodeId, reference: NodeId },
	Remove { parent: NodeId, child: NodeId },
}
impl Mutation {
	/// Whether this mutation changes which node is where, as opposed to creating nodes or changing their data.
	#[must_use]
	pub fn is_structural(&self) -> bool {
		matches!(self, Mutation::Append { .. } | Mutation::InsertBefore { .. } | Mutation::Remove { .. })
	}
}

#[derive(Default)]
struct ElementState {
	tag: String,
	svg: bool,
	attributes: HashMap<String, String>,
	properties: HashMap<String, Value>,
	styles: HashMap<String, String>,
	class_name: String,
	listeners: Vec<(String, Listener)>,
}

enum Content {
	Element(ElementState),
	Text(String),
}

struct NodeRecord {
	content: Content,
	parent: Option<NodeId>,
	children: Vec<NodeId>,
	/// Created through [`MemoryHost::create_root`].
	root: bool,
}

#[derive(Default)]
pub struct MemoryHost {
	nodes: RefCell<Vec<NodeRecord>>,
	journal: RefCell<Vec<Mutation>>,
}
impl MemoryHost {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates an element to render into, without journaling it.
	///
	/// Roots stand in for the document: [`Host::query_selector`] only finds nodes attached under one.
	pub fn create_root(&self, tag: &str) -> NodeId {
		let root = self.push(Content::Element(ElementState {
			tag: tag.to_owned(),
			..ElementState::default()
		}));
		self.nodes.borrow_mut()[root.0].root = true;
		root
	}

	fn push(&self, content: Content) -> NodeId {
		let mut nodes = self.nodes.borrow_mut();
		nodes.push(NodeRecord {
			content,
			parent: None,
			children: vec![],
			root: false,
		});
		NodeId(nodes.len() - 1)
	}

	fn record(&self, mutation: Mutation) {
		trace!(?mutation);
		self.journal.borrow_mut().push(mutation)
	}

	fn with_element<T>(&self, node: NodeId, f: impl FnOnce(&mut ElementState) -> T) -> Option<T> {
		match &mut self.nodes.borrow_mut()[node.0].content {
			Content::Element(element) => Some(f(element)),
			Content::Text(_) => {
				error!("Expected element but found text at {:?}.", node);
				None
			}
		}
	}

	fn read_element<T>(&self, node: NodeId, f: impl FnOnce(&ElementState) -> Option<T>) -> Option<T> {
		match &self.nodes.borrow()[node.0].content {
			Content::Element(element) => f(element),
			Content::Text(_) => None,
		}
	}

	fn detach(&self, child: NodeId) {
		let mut nodes = self.nodes.borrow_mut();
		if let Some(parent) = nodes[child.0].parent.take() {
			nodes[parent.0].children.retain(|&c| c != child);
		}
	}

	/// Drains the mutation journal.
	pub fn take_mutations(&self) -> Vec<Mutation> {
		self.journal.take()
	}

	#[must_use]
	pub fn mutations(&self) -> Vec<Mutation> {
		self.journal.borrow().clone()
	}

	#[must_use]
	pub fn node_count(&self) -> usize {
		self.nodes.borrow().len()
	}

	#[must_use]
	pub fn children(&self, node: NodeId) -> Vec<NodeId> {
		self.nodes.borrow()[node.0].children.clone()
	}

	#[must_use]
	pub fn parent(&self, node: NodeId) -> Option<NodeId> {
		self.nodes.borrow()[node.0].parent
	}

	#[must_use]
	pub fn tag(&self, node: NodeId) -> Option<String> {
		self.read_element(node, |element| Some(element.tag.clone()))
	}

	#[must_use]
	pub fn is_svg(&self, node: NodeId) -> bool {
		self.read_element(node, |element| Some(element.svg)).unwrap_or(false)
	}

	#[must_use]
	pub fn text(&self, node: NodeId) -> Option<String> {
		match &self.nodes.borrow()[node.0].content {
			Content::Text(text) => Some(text.clone()),
			Content::Element(_) => None,
		}
	}

	#[must_use]
	pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
		self.read_element(node, |element| element.attributes.get(name).cloned())
	}

	#[must_use]
	pub fn property(&self, node: NodeId, name: &str) -> Option<Value> {
		self.read_element(node, |element| element.properties.get(name).cloned())
	}

	#[must_use]
	pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
		self.read_element(node, |element| element.styles.get(property).cloned())
	}

	#[must_use]
	pub fn class_name(&self, node: NodeId) -> String {
		self.read_element(node, |element| Some(element.class_name.clone())).unwrap_or_default()
	}

	#[must_use]
	pub fn listener_count(&self, node: NodeId, event: &str) -> usize {
		self.read_element(node, |element| Some(element.listeners.iter().filter(|(e, _)| e == event).count()))
			.unwrap_or(0)
	}

	/// Calls each listener bound to `event` on `node` with `payload`.
	///
	/// Listeners may render synchronously; no borrow of the host is held while they run.
	pub fn dispatch(&self, node: NodeId, event: &str, payload: &dyn Any) {
		let listeners: Vec<Listener> = self
			.read_element(node, |element| Some(element.listeners.iter().filter(|(e, _)| e == event).map(|(_, l)| l.clone()).collect()))
			.unwrap_or_default();
		for listener in listeners {
			listener.call(payload)
		}
	}

	/// A compact HTML-like dump of `node` and its descendants.
	///
	/// Attributes (including `class` and `style`) are sorted by name. Properties and listeners are omitted.
	#[must_use]
	pub fn markup(&self, node: NodeId) -> String {
		let mut markup = String::new();
		self.write_markup(node, &mut markup);
		markup
	}

	/// Markup of the children of `node` only.
	#[must_use]
	pub fn inner_markup(&self, node: NodeId) -> String {
		let mut markup = String::new();
		for child in self.children(node) {
			self.write_markup(child, &mut markup)
		}
		markup
	}

	fn write_markup(&self, node: NodeId, markup: &mut String) {
		let children = {
			let nodes = self.nodes.borrow();
			let record = &nodes[node.0];
			match &record.content {
				Content::Text(text) => {
					markup.push_str(text);
					return;
				}
				Content::Element(element) => {
					let mut attributes: Vec<(String, String)> = element.attributes.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
					if !element.class_name.is_empty() {
						attributes.push(("class".to_owned(), element.class_name.clone()));
					}
					if !element.styles.is_empty() {
						let mut styles: Vec<_> = element.styles.iter().collect();
						styles.sort();
						let style = styles.into_iter().fold(String::new(), |mut style, (property, value)| {
							let _ = write!(style, "{}:{};", property, value);
							style
						});
						attributes.push(("style".to_owned(), style));
					}
					attributes.sort();

					markup.push('<');
					markup.push_str(&element.tag);
					for (name, value) in attributes {
						let _ = write!(markup, " {}=\"{}\"", name, value);
					}
					markup.push('>');
				}
			}
			record.children.clone()
		};

		for child in children {
			self.write_markup(child, markup)
		}

		if let Some(tag) = self.tag(node) {
			let _ = write!(markup, "</{}>", tag);
		}
	}
}

impl Host for MemoryHost {
	type Node = NodeId;

	fn create_element(&self, tag: &str, svg: bool) -> NodeId {
		let node = self.push(Content::Element(ElementState {
			tag: tag.to_owned(),
			svg,
			..ElementState::default()
		}));
		self.record(Mutation::CreateElement { node, tag: tag.to_owned(), svg });
		node
	}

	fn create_text(&self, text: &str) -> NodeId {
		let node = self.push(Content::Text(text.to_owned()));
		self.record(Mutation::CreateText { node, text: text.to_owned() });
		node
	}

	fn set_text(&self, node: &NodeId, text: &str) {
		match &mut self.nodes.borrow_mut()[node.0].content {
			Content::Text(data) => text.clone_into(data),
			Content::Element(_) => return error!("Expected text but found element at {:?}.", node),
		}
		self.record(Mutation::SetText { node: *node, text: text.to_owned() })
	}

	fn set_style(&self, node: &NodeId, property: &str, value: &str) {
		self.with_element(*node, |element| {
			if value.is_empty() {
				element.styles.remove(property);
			} else {
				element.styles.insert(property.to_owned(), value.to_owned());
			}
		});
		self.record(Mutation::SetStyle {
			node: *node,
			property: property.to_owned(),
			value: value.to_owned(),
		})
	}

	fn set_class_name(&self, node: &NodeId, class_name: &str) {
		self.with_element(*node, |element| class_name.clone_into(&mut element.class_name));
		self.record(Mutation::SetClass {
			node: *node,
			class_name: class_name.to_owned(),
		})
	}

	fn add_listener(&self, node: &NodeId, event: &str, listener: &Listener) {
		self.with_element(*node, |element| element.listeners.push((event.to_owned(), listener.clone())));
		self.record(Mutation::AddListener { node: *node, event: event.to_owned() })
	}

	fn remove_listener(&self, node: &NodeId, event: &str, listener: &Listener) {
		let removed = self.with_element(*node, |element| {
			match element.listeners.iter().position(|(e, l)| e == event && l == listener) {
				Some(i) => {
					element.listeners.remove(i);
					true
				}
				None => false,
			}
		});
		if removed == Some(true) {
			self.record(Mutation::RemoveListener { node: *node, event: event.to_owned() })
		} else {
			trace!("Listener for {:?} was not bound on {:?}.", event, node)
		}
	}

	fn set_property(&self, node: &NodeId, name: &str, value: Option<&Value>) {
		self.with_element(*node, |element| match value {
			Some(value) => {
				element.properties.insert(name.to_owned(), value.clone());
			}
			None => {
				element.properties.remove(name);
			}
		});
		self.record(Mutation::SetProperty {
			node: *node,
			name: name.to_owned(),
			value: value.cloned(),
		})
	}

	fn set_attribute(&self, node: &NodeId, name: &str, value: &str) {
		self.with_element(*node, |element| element.attributes.insert(name.to_owned(), value.to_owned()));
		self.record(Mutation::SetAttribute {
			node: *node,
			name: name.to_owned(),
			value: value.to_owned(),
		})
	}

	fn remove_attribute(&self, node: &NodeId, name: &str) {
		self.with_element(*node, |element| element.attributes.remove(name));
		self.record(Mutation::RemoveAttribute { node: *node, name: name.to_owned() })
	}

	fn append_child(&self, parent: &NodeId, child: &NodeId) {
		self.detach(*child);
		{
			let mut nodes = self.nodes.borrow_mut();
			nodes[parent.0].children.push(*child);
			nodes[child.0].parent = Some(*parent);
		}
		self.record(Mutation::Append { parent: *parent, child: *child })
	}

	fn insert_before(&self, parent: &NodeId, child: &NodeId, reference: Option<&NodeId>) {
		let reference = match reference {
			None => return self.append_child(parent, child),
			Some(reference) => *reference,
		};
		if reference != *child {
			self.detach(*child);
			let mut nodes = self.nodes.borrow_mut();
			let position = nodes[parent.0].children.iter().position(|&c| c == reference);
			let position = position.unwrap_or_else(|| {
				error!("Reference {:?} is not a child of {:?}. Appending instead.", reference, parent);
				nodes[parent.0].children.len()
			});
			nodes[parent.0].children.insert(position, *child);
			nodes[child.0].parent = Some(*parent);
		}
		self.record(Mutation::InsertBefore {
			parent: *parent,
			child: *child,
			reference,
		})
	}

	fn remove_child(&self, parent: &NodeId, child: &NodeId) {
		if self.parent(*child) != Some(*parent) {
			return error!("{:?} is not a child of {:?}. Not removing it.", child, parent);
		}
		self.detach(*child);
		self.record(Mutation::Remove { parent: *parent, child: *child })
	}

	fn first_child(&self, parent: &NodeId) -> Option<NodeId> {
		self.nodes.borrow()[parent.0].children.first().copied()
	}

	fn previous_sibling(&self, node: &NodeId) -> Option<NodeId> {
		let nodes = self.nodes.borrow();
		let siblings = &nodes[nodes[node.0].parent?.0].children;
		let position = siblings.iter().position(|c| c == node)?;
		siblings.get(position.checked_sub(1)?).copied()
	}

	fn next_sibling(&self, node: &NodeId) -> Option<NodeId> {
		let nodes = self.nodes.borrow();
		let siblings = &nodes[nodes[node.0].parent?.0].children;
		let position = siblings.iter().position(|c| c == node)?;
		siblings.get(position + 1).copied()
	}

	fn query_selector(&self, selector: &str) -> Option<NodeId> {
		let nodes = self.nodes.borrow();
		let is_match = |element: &ElementState| match selector.strip_prefix('#') {
			Some(id) => element.attributes.get("id").map(String::as_str) == Some(id),
			None => element.tag == selector,
		};
		let is_attached = |mut id: usize| loop {
			match nodes[id].parent {
				Some(parent) => id = parent.0,
				None => break nodes[id].root,
			}
		};
		(0..nodes.len())
			.find(|&id| matches!(&nodes[id].content, Content::Element(element) if is_match(element)) && is_attached(id))
			.map(NodeId)
	}
}
