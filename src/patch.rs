use crate::{
	data,
	error::ReconcileError,
	host::Host,
	mount::{normalized, redacted, Context},
	mounted::{Children, Mounted, Record},
	vnode::{ChildSpec, Kind, VNode},
};
use tracing::{trace, trace_span};

impl<H: Host> Context<H> {
	/// Reconciles the previously mounted `previous` with `next`, reusing host nodes where the kinds and identities match.
	///
	/// Mismatches are replaced in place: the old subtree is removed and `next` is mounted where it was.
	#[allow(clippy::too_many_lines)]
	pub(crate) fn patch(&self, previous: Mounted<H>, next: VNode<H::Node>, container: &H::Node, svg: bool, depth: usize) -> Result<Mounted<H>, ReconcileError> {
		let depth = self.descend(depth)?;
		let host = &*self.host;
		let previous_key = previous.key;
		let VNode { kind, data, children, key } = next;

		let record = match (previous.record, kind) {
			(
				Record::Element {
					node,
					tag,
					svg: own_svg,
					data: previous_data,
					children: previous_children,
				},
				Kind::Element { tag: next_tag, svg: next_svg },
			) if tag == next_tag && own_svg == next_svg => {
				let span = trace_span!("Patching element", tag = tag.as_str(), ?key);
				let _enter = span.enter();

				for (name, value) in &data {
					data::apply(host, &node, name, previous_data.get(name), Some(value))
				}
				for (name, value) in &previous_data {
					if value.is_truthy() && !data.contains_key(name) {
						data::apply(host, &node, name, Some(value), None)
					}
				}

				let children = self.patch_children(previous_children, children, &node, svg || own_svg, None, depth)?;
				Record::Element { node, tag, svg: own_svg, data, children }
			}

			(Record::Text { node, text }, Kind::Text(next_text)) => {
				let span = trace_span!("Patching text", text = redacted(&text), next_text = redacted(&next_text), ?key);
				let _enter = span.enter();

				if text == next_text {
					trace!("Text unchanged.");
				} else {
					host.set_text(&node, &next_text)
				}
				Record::Text { node, text: next_text }
			}

			(Record::Fragment { placeholder, children: previous_children }, Kind::Fragment) => {
				let span = trace_span!("Patching fragment", children = children.len(), ?key);
				let _enter = span.enter();
				self.patch_fragment(placeholder, previous_children, children, container, svg, depth)?
			}

			(
				Record::Portal {
					target,
					placeholder,
					children: previous_children,
				},
				Kind::Portal(next_target),
			) => {
				let span = trace_span!("Patching portal", ?next_target, children = children.len(), ?key);
				let _enter = span.enter();

				let next_target = self.resolve(next_target)?;
				let mut children = self.patch_children(previous_children, children, &target, false, None, depth)?;
				if next_target != target {
					trace!("Relocating portal content.");
					children.for_each_mut(|child| {
						for node in child.host_nodes() {
							host.append_child(&next_target, &node)
						}
						child.reparent(&next_target)
					});
				}
				Record::Portal {
					target: next_target,
					placeholder,
					children,
				}
			}

			(Record::Stateful(instance), Kind::Stateful(definition)) if instance.borrow().definition == definition => {
				self.patch_stateful(&instance, data, container, svg, depth)?;
				Record::Stateful(instance)
			}

			(Record::Functional(slot), Kind::Functional(definition)) if slot.definition == definition => {
				Record::Functional(Box::new(self.patch_functional(*slot, data, container, svg, depth)?))
			}

			(record, kind) => {
				return self.replace(
					Mounted { key: previous_key, record },
					VNode { kind, data, children, key },
					container,
					svg,
					depth,
				)
			}
		};
		Ok(Mounted { key, record })
	}

	/// Removes `previous` and mounts `next` at its position.
	fn replace(&self, previous: Mounted<H>, next: VNode<H::Node>, container: &H::Node, svg: bool, depth: usize) -> Result<Mounted<H>, ReconcileError> {
		let span = trace_span!("Replacing", kind = next.kind.name(), key = ?next.key);
		let _enter = span.enter();

		let anchor = previous.last_host().and_then(|last| self.host.next_sibling(&last));
		previous.unmount(&*self.host, container);
		self.mount(next, container, svg, anchor.as_ref(), depth)
	}

	/// Fragments patch their children directly in `container`, in front of whatever followed them.
	fn patch_fragment(
		&self,
		placeholder: Option<H::Node>,
		previous_children: Children<H>,
		children: ChildSpec<H::Node>,
		container: &H::Node,
		svg: bool,
		depth: usize,
	) -> Result<Record<H>, ReconcileError> {
		let host = &*self.host;
		let children = normalized(children);

		if let Some(placeholder) = placeholder {
			if children.is_empty() {
				return Ok(Record::Fragment {
					placeholder: Some(placeholder),
					children: Children::None,
				});
			}
			let children = self.mount_children(children, container, svg, Some(&placeholder), depth)?;
			host.remove_child(container, &placeholder);
			return Ok(Record::Fragment { placeholder: None, children });
		}

		let anchor = previous_children
			.iter()
			.last()
			.and_then(Mounted::last_host)
			.and_then(|last| host.next_sibling(&last));
		let children = self.patch_children(previous_children, children, container, svg, anchor.as_ref(), depth)?;
		let placeholder = children.is_empty().then(|| self.mount_placeholder(container, anchor.as_ref()));
		Ok(Record::Fragment { placeholder, children })
	}

	/// Dispatches on the child arities of both sides.
	///
	/// New children are mounted before `anchor`, or appended to `parent` if there is none.
	pub(crate) fn patch_children(
		&self,
		previous: Children<H>,
		next: ChildSpec<H::Node>,
		parent: &H::Node,
		svg: bool,
		anchor: Option<&H::Node>,
		depth: usize,
	) -> Result<Children<H>, ReconcileError> {
		let host = &*self.host;
		Ok(match (previous, normalized(next)) {
			(Children::None, ChildSpec::None) => Children::None,
			(Children::None, next @ (ChildSpec::Single(_) | ChildSpec::Many(_))) => self.mount_children(next, parent, svg, anchor, depth)?,

			(Children::Single(previous), ChildSpec::None) => {
				previous.unmount(host, parent);
				Children::None
			}
			(Children::Single(previous), ChildSpec::Single(next)) => Children::Single(Box::new(self.patch(*previous, *next, parent, svg, depth)?)),
			(Children::Single(previous), next @ ChildSpec::Many(_)) => {
				previous.unmount(host, parent);
				self.mount_children(next, parent, svg, anchor, depth)?
			}

			(Children::Many(previous), ChildSpec::None) => {
				for previous in previous {
					previous.unmount(host, parent)
				}
				Children::None
			}
			(Children::Many(previous), next @ ChildSpec::Single(_)) => {
				for previous in previous {
					previous.unmount(host, parent)
				}
				self.mount_children(next, parent, svg, anchor, depth)?
			}
			(Children::Many(previous), ChildSpec::Many(next)) => Children::Many(self.diff_keyed(previous, next, parent, svg, anchor, depth)?),
		})
	}
}
