//! The virtual node model and a thin builder for it.
//!
//! A [`VNode`] describes one tree position for one render pass.
//! It is consumed by mounting or patching, after which the reconciler alone tracks the host resources it produced.

use crate::{
	component::{FunctionalDef, StatefulDef},
	data::{Data, Listener, Style, Value, EVENT_PREFIX},
};
use core::fmt::{self, Display};

/// Stable identity of a node among the siblings of one `many` sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
	/// Assigned to unkeyed members of a `many` sequence, from their position.
	Index(usize),
	Int(i64),
	Str(String),
}
impl Display for Key {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Key::Index(i) => write!(f, "|{}", i),
			Key::Int(i) => write!(f, "{}", i),
			Key::Str(s) => write!(f, "{:?}", s),
		}
	}
}
impl From<i64> for Key {
	fn from(i: i64) -> Self {
		Key::Int(i)
	}
}
impl From<i32> for Key {
	fn from(i: i32) -> Self {
		Key::Int(i.into())
	}
}
impl From<&str> for Key {
	fn from(s: &str) -> Self {
		Key::Str(s.to_owned())
	}
}
impl From<String> for Key {
	fn from(s: String) -> Self {
		Key::Str(s)
	}
}

/// Where a portal renders its content.
#[derive(Debug, Clone, PartialEq)]
pub enum PortalTarget<N> {
	/// Resolved through [`Host::query_selector`](`crate::host::Host::query_selector`) on each render.
	Selector(String),
	Node(N),
}
impl<N> From<&str> for PortalTarget<N> {
	fn from(selector: &str) -> Self {
		PortalTarget::Selector(selector.to_owned())
	}
}

#[derive(Debug, Clone)]
pub enum Kind<N> {
	Element { tag: String, svg: bool },
	Text(String),
	Fragment,
	Portal(PortalTarget<N>),
	Stateful(StatefulDef<N>),
	Functional(FunctionalDef<N>),
}
impl<N> Kind<N> {
	#[must_use]
	pub fn name(&self) -> &'static str {
		match self {
			Kind::Element { svg: false, .. } => "element",
			Kind::Element { svg: true, .. } => "SVG element",
			Kind::Text(_) => "text",
			Kind::Fragment => "fragment",
			Kind::Portal(_) => "portal",
			Kind::Stateful(_) => "stateful component",
			Kind::Functional(_) => "functional component",
		}
	}
}

/// Child arity is explicit, since a change between arities selects the patch strategy.
#[derive(Debug, Clone)]
pub enum ChildSpec<N> {
	None,
	Single(Box<VNode<N>>),
	Many(Vec<VNode<N>>),
}
impl<N> Default for ChildSpec<N> {
	fn default() -> Self {
		ChildSpec::None
	}
}
impl<N> ChildSpec<N> {
	/// Empty sequences become [`ChildSpec::None`], one node becomes [`ChildSpec::Single`].
	///
	/// Members of a [`ChildSpec::Many`] without a key are keyed by their position.
	#[must_use]
	pub fn from_nodes(nodes: impl IntoIterator<Item = VNode<N>>) -> Self {
		let mut nodes: Vec<_> = nodes.into_iter().collect();
		match nodes.len() {
			0 => ChildSpec::None,
			1 => ChildSpec::Single(Box::new(nodes.remove(0))),
			_ => {
				assign_positional_keys(&mut nodes);
				ChildSpec::Many(nodes)
			}
		}
	}

	#[must_use]
	pub fn len(&self) -> usize {
		match self {
			ChildSpec::None => 0,
			ChildSpec::Single(_) => 1,
			ChildSpec::Many(nodes) => nodes.len(),
		}
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

pub(crate) fn assign_positional_keys<N>(nodes: &mut [VNode<N>]) {
	for (i, node) in nodes.iter_mut().enumerate() {
		if node.key.is_none() {
			node.key = Some(Key::Index(i));
		}
	}
}

#[derive(Debug, Clone)]
pub struct VNode<N> {
	pub kind: Kind<N>,
	/// Attributes, properties, styles and listeners for elements; props for components.
	pub data: Data,
	pub children: ChildSpec<N>,
	pub key: Option<Key>,
}
impl<N> VNode<N> {
	#[must_use]
	pub fn new(kind: Kind<N>) -> Self {
		Self {
			kind,
			data: Data::new(),
			children: ChildSpec::None,
			key: None,
		}
	}

	#[must_use]
	pub fn element(tag: impl Into<String>) -> Self {
		Self::new(Kind::Element { tag: tag.into(), svg: false })
	}

	/// An element in the SVG namespace. Its descendant elements inherit the namespace.
	#[must_use]
	pub fn svg(tag: impl Into<String>) -> Self {
		Self::new(Kind::Element { tag: tag.into(), svg: true })
	}

	#[must_use]
	pub fn text(text: impl Into<String>) -> Self {
		Self::new(Kind::Text(text.into()))
	}

	#[must_use]
	pub fn fragment(children: impl IntoIterator<Item = VNode<N>>) -> Self {
		Self::new(Kind::Fragment).children(children)
	}

	#[must_use]
	pub fn portal(target: impl Into<PortalTarget<N>>, children: impl IntoIterator<Item = VNode<N>>) -> Self {
		Self::new(Kind::Portal(target.into())).children(children)
	}

	#[must_use]
	pub fn stateful(definition: StatefulDef<N>) -> Self {
		Self::new(Kind::Stateful(definition))
	}

	#[must_use]
	pub fn functional(definition: FunctionalDef<N>) -> Self {
		Self::new(Kind::Functional(definition))
	}

	#[must_use]
	pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.data.insert(key.into(), value.into());
		self
	}

	#[must_use]
	pub fn class(self, class: impl Into<String>) -> Self {
		self.with("class", class.into())
	}

	#[must_use]
	pub fn style<K: Into<String>, V: Into<String>>(self, properties: impl IntoIterator<Item = (K, V)>) -> Self {
		let style: Style = properties.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
		self.with("style", style)
	}

	/// Binds `listener` to `event` (without the `on` prefix).
	#[must_use]
	pub fn on(self, event: &str, listener: Listener) -> Self {
		self.with(format!("{}{}", EVENT_PREFIX, event), listener)
	}

	#[must_use]
	pub fn key(mut self, key: impl Into<Key>) -> Self {
		self.key = Some(key.into());
		self
	}

	#[must_use]
	pub fn child(mut self, child: VNode<N>) -> Self {
		self.children = ChildSpec::Single(Box::new(child));
		self
	}

	#[must_use]
	pub fn children(mut self, children: impl IntoIterator<Item = VNode<N>>) -> Self {
		self.children = ChildSpec::from_nodes(children);
		self
	}

	#[must_use]
	pub fn text_child(self, text: impl Into<String>) -> Self {
		self.child(VNode::text(text))
	}
}
