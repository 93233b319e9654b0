//! Reconciler-owned records of what a [`VNode`](`crate::vnode::VNode`) materialized to.
//!
//! Mounting consumes a virtual node and returns its [`Mounted`] record, which keeps the node's description
//! together with its host handle(s) and runtime state. Patching consumes the previous record and the next virtual node,
//! transplanting handles into the returned record. Author-supplied trees are never written to.

use crate::{
	component::{FunctionalSlot, Instance},
	data::{Data, Value},
	host::Host,
	vnode::Key,
};
use std::{cell::RefCell, rc::Rc};
use tracing::trace_span;

pub(crate) struct Mounted<H: Host> {
	pub key: Option<Key>,
	pub record: Record<H>,
}

pub(crate) enum Record<H: Host> {
	Element {
		node: H::Node,
		tag: String,
		/// The element's own namespace flag, not the inherited context.
		svg: bool,
		data: Data,
		children: Children<H>,
	},
	Text {
		node: H::Node,
		text: String,
	},
	Fragment {
		/// Present exactly while the fragment has no children.
		placeholder: Option<H::Node>,
		children: Children<H>,
	},
	Portal {
		target: H::Node,
		/// Marks the portal's logical position in its container.
		placeholder: H::Node,
		children: Children<H>,
	},
	Stateful(Rc<RefCell<Instance<H>>>),
	Functional(Box<FunctionalSlot<H>>),
}

pub(crate) enum Children<H: Host> {
	None,
	Single(Box<Mounted<H>>),
	/// Never empty.
	Many(Vec<Mounted<H>>),
}
impl<H: Host> Children<H> {
	pub fn iter(&self) -> impl Iterator<Item = &Mounted<H>> {
		let (single, many) = match self {
			Children::None => (None, &[][..]),
			Children::Single(child) => (Some(&**child), &[][..]),
			Children::Many(children) => (None, &children[..]),
		};
		single.into_iter().chain(many)
	}

	pub fn for_each_mut(&mut self, mut f: impl FnMut(&mut Mounted<H>)) {
		match self {
			Children::None => (),
			Children::Single(child) => f(&mut **child),
			Children::Many(children) => children.iter_mut().for_each(f),
		}
	}

	pub fn into_vec(self) -> Vec<Mounted<H>> {
		match self {
			Children::None => vec![],
			Children::Single(child) => vec![*child],
			Children::Many(children) => children,
		}
	}

	pub fn is_empty(&self) -> bool {
		matches!(self, Children::None)
	}
}

impl<H: Host> Mounted<H> {
	/// The host nodes this record placed directly into its container, in document order.
	pub fn host_nodes(&self) -> Vec<H::Node> {
		let mut nodes = vec![];
		self.collect_host_nodes(&mut nodes);
		nodes
	}

	fn collect_host_nodes(&self, nodes: &mut Vec<H::Node>) {
		match &self.record {
			Record::Element { node, .. } | Record::Text { node, .. } | Record::Portal { placeholder: node, .. } => nodes.push(node.clone()),
			Record::Fragment { placeholder, children } => {
				nodes.extend(placeholder.iter().cloned());
				for child in children.iter() {
					child.collect_host_nodes(nodes)
				}
			}
			Record::Stateful(instance) => {
				if let Some(rendered) = &instance.borrow().rendered {
					rendered.collect_host_nodes(nodes)
				}
			}
			Record::Functional(slot) => slot.rendered.collect_host_nodes(nodes),
		}
	}

	/// The representative host handle: an element's or text's own node, a fragment's first child (or its placeholder),
	/// a portal's placeholder, or a component's rendered root.
	pub fn host(&self) -> Option<H::Node> {
		match &self.record {
			Record::Element { node, .. } | Record::Text { node, .. } | Record::Portal { placeholder: node, .. } => Some(node.clone()),
			Record::Fragment { placeholder: Some(placeholder), .. } => Some(placeholder.clone()),
			Record::Fragment { placeholder: None, children } => children.iter().next().and_then(Mounted::host),
			Record::Stateful(instance) => instance.borrow().rendered.as_ref().and_then(Mounted::host),
			Record::Functional(slot) => slot.rendered.host(),
		}
	}

	pub fn last_host(&self) -> Option<H::Node> {
		self.host_nodes().pop()
	}

	/// Releases everything this subtree holds outside of its own host nodes:
	/// event listeners, and portal content living in other containers.
	pub fn release(self, host: &H) {
		match self.record {
			Record::Element { node, tag, data, children, .. } => {
				let span = trace_span!("Releasing element", tag = tag.as_str());
				let _enter = span.enter();
				for (key, value) in &data {
					if let Value::Listener(_) = value {
						crate::data::apply(host, &node, key, Some(value), None)
					}
				}
				for child in children.into_vec() {
					child.release(host)
				}
			}
			Record::Text { .. } => (),
			Record::Fragment { children, .. } => {
				for child in children.into_vec() {
					child.release(host)
				}
			}
			Record::Portal { target, children, .. } => {
				let span = trace_span!("Releasing portal content");
				let _enter = span.enter();
				for child in children.into_vec() {
					child.unmount(host, &target)
				}
			}
			Record::Stateful(instance) => {
				let rendered = instance.borrow_mut().rendered.take();
				if let Some(rendered) = rendered {
					rendered.release(host)
				}
			}
			Record::Functional(slot) => slot.rendered.release(host),
		}
	}

	/// Releases this subtree and removes its host nodes from `parent`.
	pub fn unmount(self, host: &H, parent: &H::Node) {
		let nodes = self.host_nodes();
		self.release(host);
		for node in &nodes {
			host.remove_child(parent, node)
		}
	}

	/// Points components whose rendered roots now live in `parent` at that container.
	pub fn reparent(&mut self, parent: &H::Node) {
		match &mut self.record {
			Record::Element { .. } | Record::Text { .. } | Record::Portal { .. } => (),
			Record::Fragment { children, .. } => children.for_each_mut(|child| child.reparent(parent)),
			Record::Stateful(instance) => {
				let mut instance = instance.borrow_mut();
				instance.container = parent.clone();
				if let Some(rendered) = &mut instance.rendered {
					rendered.reparent(parent)
				}
			}
			Record::Functional(slot) => slot.rendered.reparent(parent),
		}
	}
}
