use crate::{
	data,
	error::ReconcileError,
	host::Host,
	mounted::{Children, Mounted, Record},
	vnode::{ChildSpec, Kind, PortalTarget, VNode},
};
use std::rc::Rc;
use tracing::{trace_span, warn};

/// Shared by every mount and patch of one [`Renderer`](`crate::render::Renderer`), and by its component handles.
pub(crate) struct Context<H: Host> {
	pub host: Rc<H>,
	pub depth_limit: usize,
}
impl<H: Host> Clone for Context<H> {
	fn clone(&self) -> Self {
		Self {
			host: Rc::clone(&self.host),
			depth_limit: self.depth_limit,
		}
	}
}

/// Text payloads and attribute values are only logged with the `dangerous-logging` feature.
pub(crate) fn redacted(text: &str) -> &str {
	if cfg!(feature = "dangerous-logging") {
		text
	} else {
		"[redacted]"
	}
}

impl<H: Host> Context<H> {
	pub(crate) fn descend(&self, depth: usize) -> Result<usize, ReconcileError> {
		depth.checked_sub(1).ok_or(ReconcileError::DepthLimit { limit: self.depth_limit })
	}

	/// Materializes `vnode` into `container`, before `anchor` or at the end.
	///
	/// `svg` is the inherited namespace context.
	pub(crate) fn mount(&self, vnode: VNode<H::Node>, container: &H::Node, svg: bool, anchor: Option<&H::Node>, depth: usize) -> Result<Mounted<H>, ReconcileError> {
		let depth = self.descend(depth)?;
		let host = &*self.host;
		let VNode { kind, data, children, key } = vnode;

		let record = match kind {
			Kind::Element { tag, svg: own_svg } => {
				let span = trace_span!("Mounting element", tag = tag.as_str(), ?key);
				let _enter = span.enter();

				let svg = svg || own_svg;
				let node = host.create_element(&tag, svg);
				for (name, value) in &data {
					data::apply(host, &node, name, None, Some(value))
				}
				let children = self.mount_children(children, &node, svg, None, depth)?;
				host.insert_before(container, &node, anchor);
				Record::Element { node, tag, svg: own_svg, data, children }
			}

			Kind::Text(text) => {
				let span = trace_span!("Mounting text", text = redacted(&text), ?key);
				let _enter = span.enter();

				let node = host.create_text(&text);
				host.insert_before(container, &node, anchor);
				Record::Text { node, text }
			}

			Kind::Fragment => {
				let span = trace_span!("Mounting fragment", children = children.len(), ?key);
				let _enter = span.enter();

				let children = self.mount_children(children, container, svg, anchor, depth)?;
				let placeholder = children.is_empty().then(|| self.mount_placeholder(container, anchor));
				Record::Fragment { placeholder, children }
			}

			Kind::Portal(target) => {
				let span = trace_span!("Mounting portal", ?target, children = children.len(), ?key);
				let _enter = span.enter();

				let target = self.resolve(target)?;
				let children = self.mount_children(children, &target, false, None, depth)?;
				let placeholder = self.mount_placeholder(container, anchor);
				Record::Portal { target, placeholder, children }
			}

			Kind::Stateful(definition) => {
				warn_ignored_children(&children);
				Record::Stateful(self.mount_stateful(definition, data, container, svg, anchor, depth)?)
			}

			Kind::Functional(definition) => {
				warn_ignored_children(&children);
				Record::Functional(Box::new(self.mount_functional(definition, data, container, svg, anchor, depth)?))
			}
		};
		Ok(Mounted { key, record })
	}

	/// Mounts each child in order, before `anchor` or at the end of `parent`.
	pub(crate) fn mount_children(&self, children: ChildSpec<H::Node>, parent: &H::Node, svg: bool, anchor: Option<&H::Node>, depth: usize) -> Result<Children<H>, ReconcileError> {
		Ok(match normalized(children) {
			ChildSpec::None => Children::None,
			ChildSpec::Single(child) => Children::Single(Box::new(self.mount(*child, parent, svg, anchor, depth)?)),
			ChildSpec::Many(children) => {
				crate::keyed::check_unique_keys(children.iter().map(|child| child.key.as_ref()))?;
				Children::Many(
					children
						.into_iter()
						.map(|child| self.mount(child, parent, svg, anchor, depth))
						.collect::<Result<_, _>>()?,
				)
			}
		})
	}

	/// An empty text node standing in for content that is empty or rendered elsewhere.
	pub(crate) fn mount_placeholder(&self, container: &H::Node, anchor: Option<&H::Node>) -> H::Node {
		let placeholder = self.host.create_text("");
		self.host.insert_before(container, &placeholder, anchor);
		placeholder
	}

	pub(crate) fn resolve(&self, target: PortalTarget<H::Node>) -> Result<H::Node, ReconcileError> {
		match target {
			PortalTarget::Node(node) => Ok(node),
			PortalTarget::Selector(selector) => self.host.query_selector(&selector).ok_or(ReconcileError::PortalTargetNotFound { selector }),
		}
	}
}

/// Empty `many` sequences are treated as no children, and unkeyed `many` members are keyed by position.
pub(crate) fn normalized<N>(children: ChildSpec<N>) -> ChildSpec<N> {
	match children {
		ChildSpec::Many(nodes) if nodes.is_empty() => ChildSpec::None,
		ChildSpec::Many(mut nodes) => {
			crate::vnode::assign_positional_keys(&mut nodes);
			ChildSpec::Many(nodes)
		}
		other => other,
	}
}

fn warn_ignored_children<N>(children: &ChildSpec<N>) {
	if !children.is_empty() {
		warn!("Ignoring {} child node(s) of a component. Pass content through props instead.", children.len());
	}
}
