//! Stateful and functional components, and the coordinator that feeds their render output back into mount and patch.
//!
//! A stateful component instance moves one way from unmounted to mounted.
//! Its first update mounts the rendered tree and then calls [`Component::mounted`];
//! every later update patches the previously rendered tree in place.
//! Removal is driven by the reconciler and has no hook.
//!
//! Functional components keep no state beyond their last props and rendered tree,
//! and are re-rendered whenever their parent patches them.

use crate::{
	data::Data,
	error::ReconcileError,
	host::Host,
	mount::Context,
	mounted::{Mounted, Record},
	vnode::VNode,
};
use core::{
	any::TypeId,
	fmt::{self, Debug},
};
use std::{
	cell::RefCell,
	rc::{Rc, Weak},
};
use tracing::{trace, trace_span, warn};

/// User render logic with local state.
///
/// Methods take `&self`, so local state that changes between renders lives in [`Cell`](`core::cell::Cell`)s or [`RefCell`]s.
pub trait Component<N> {
	fn render(&self, props: &Data) -> VNode<N>;

	/// Called once, right after the first rendered tree was mounted.
	///
	/// The `handle` may be stored to re-render this component later.
	fn mounted(&self, handle: &ComponentHandle) {
		let _ = handle;
	}
}

/// Identifies a stateful component type and creates its instances.
pub struct StatefulDef<N> {
	id: TypeId,
	name: &'static str,
	create: fn() -> Rc<dyn Component<N>>,
}
impl<N: 'static> StatefulDef<N> {
	#[must_use]
	pub fn of<C: 'static + Component<N> + Default>() -> Self {
		fn create<C: 'static + Component<N> + Default, N: 'static>() -> Rc<dyn Component<N>> {
			Rc::new(C::default())
		}

		Self {
			id: TypeId::of::<C>(),
			name: core::any::type_name::<C>(),
			create: create::<C, N>,
		}
	}
}
impl<N> StatefulDef<N> {
	#[must_use]
	pub fn name(&self) -> &'static str {
		self.name
	}
}
impl<N> Clone for StatefulDef<N> {
	fn clone(&self) -> Self {
		Self {
			id: self.id,
			name: self.name,
			create: self.create,
		}
	}
}
impl<N> PartialEq for StatefulDef<N> {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}
impl<N> Debug for StatefulDef<N> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("StatefulDef").field(&self.name).finish()
	}
}

/// A render function of props. Two definitions are the same component if they share the function.
pub struct FunctionalDef<N> {
	name: &'static str,
	render: fn(&Data) -> VNode<N>,
}
impl<N> FunctionalDef<N> {
	#[must_use]
	pub fn new(name: &'static str, render: fn(&Data) -> VNode<N>) -> Self {
		Self { name, render }
	}

	#[must_use]
	pub fn name(&self) -> &'static str {
		self.name
	}
}
impl<N> Clone for FunctionalDef<N> {
	fn clone(&self) -> Self {
		Self {
			name: self.name,
			render: self.render,
		}
	}
}
impl<N> PartialEq for FunctionalDef<N> {
	fn eq(&self, other: &Self) -> bool {
		self.render as usize == other.render as usize
	}
}
impl<N> Debug for FunctionalDef<N> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("FunctionalDef").field(&self.name).finish()
	}
}

/// Re-renders one stateful component instance.
///
/// Holds the instance weakly: Once the component is removed, updating does nothing.
#[derive(Clone)]
pub struct ComponentHandle {
	update: Rc<dyn Fn() -> Result<(), ReconcileError>>,
}
impl ComponentHandle {
	/// Synchronously renders the component again and patches its host nodes.
	///
	/// # Errors
	///
	/// Iff the newly rendered tree is malformed, or the component is already updating further up the call stack.
	pub fn update(&self) -> Result<(), ReconcileError> {
		(self.update)()
	}
}
impl Debug for ComponentHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ComponentHandle").finish_non_exhaustive()
	}
}

pub(crate) struct Instance<H: Host> {
	pub definition: StatefulDef<H::Node>,
	pub component: Rc<dyn Component<H::Node>>,
	pub props: Data,
	/// Taken while the instance patches it.
	pub rendered: Option<Mounted<H>>,
	pub mounted: bool,
	pub container: H::Node,
	pub svg: bool,
	/// Remaining depth budget at the instance's position, used by its handle.
	pub depth: usize,
}

pub(crate) struct FunctionalSlot<H: Host> {
	pub definition: FunctionalDef<H::Node>,
	pub props: Data,
	pub rendered: Mounted<H>,
}

impl<H: Host> Context<H> {
	pub(crate) fn mount_stateful(
		&self,
		definition: StatefulDef<H::Node>,
		props: Data,
		container: &H::Node,
		svg: bool,
		anchor: Option<&H::Node>,
		depth: usize,
	) -> Result<Rc<RefCell<Instance<H>>>, ReconcileError> {
		let span = trace_span!("Instantiating stateful component", component = definition.name);
		let _enter = span.enter();

		let component = (definition.create)();
		let instance = Rc::new(RefCell::new(Instance {
			definition,
			component,
			props,
			rendered: None,
			mounted: false,
			container: container.clone(),
			svg,
			depth,
		}));
		self.update_stateful(&instance, anchor, depth)?;
		Ok(instance)
	}

	/// Reuses `instance` for a patch by its parent.
	pub(crate) fn patch_stateful(&self, instance: &Rc<RefCell<Instance<H>>>, props: Data, container: &H::Node, svg: bool, depth: usize) -> Result<(), ReconcileError> {
		{
			let mut instance = instance.borrow_mut();
			instance.props = props;
			instance.container = container.clone();
			instance.svg = svg;
			instance.depth = depth;
		}
		self.update_stateful(instance, None, depth)
	}

	/// Renders `instance` and mounts (first call) or patches (later calls) the output.
	///
	/// No borrow of the instance is held while user code runs.
	pub(crate) fn update_stateful(&self, instance: &Rc<RefCell<Instance<H>>>, anchor: Option<&H::Node>, depth: usize) -> Result<(), ReconcileError> {
		let (component, props, name) = {
			let instance = instance.borrow();
			(Rc::clone(&instance.component), instance.props.clone(), instance.definition.name)
		};
		let span = trace_span!("Updating stateful component", component = name);
		let _enter = span.enter();

		let next = component.render(&props);
		let (mounted, container, svg, previous) = {
			let mut instance = instance.borrow_mut();
			(instance.mounted, instance.container.clone(), instance.svg, instance.rendered.take())
		};

		if mounted {
			let previous = previous.ok_or(ReconcileError::UpdateInProgress { component: name })?;
			let bounds = self.bounds(&previous);
			match self.patch(previous, next, &container, svg, depth) {
				Ok(rendered) => instance.borrow_mut().rendered = Some(rendered),
				Err(error) => {
					warn!(%error, component = name, "Update failed. Clearing the rendered host nodes.");
					let placeholder = self.clear_between(&container, bounds);
					instance.borrow_mut().rendered = Some(Mounted {
						key: None,
						record: Record::Text {
							node: placeholder,
							text: String::new(),
						},
					});
					return Err(error);
				}
			}
		} else {
			let rendered = self.mount(next, &container, svg, anchor, depth)?;
			{
				let mut instance = instance.borrow_mut();
				instance.rendered = Some(rendered);
				instance.mounted = true;
			}
			trace!("Calling `mounted` hook.");
			component.mounted(&self.handle(instance));
		}
		Ok(())
	}

	/// The siblings directly before and after the host nodes of `rendered`.
	///
	/// A patch of `rendered` only ever inserts or removes nodes between the two.
	fn bounds(&self, rendered: &Mounted<H>) -> Option<(Option<H::Node>, Option<H::Node>)> {
		let nodes = rendered.host_nodes();
		let (first, last) = (nodes.first()?, nodes.last()?);
		Some((self.host.previous_sibling(first), self.host.next_sibling(last)))
	}

	/// Removes every node of `container` strictly between `bounds` and leaves an empty text node in their place.
	///
	/// Without bounds, the placeholder is appended and nothing is removed.
	fn clear_between(&self, container: &H::Node, bounds: Option<(Option<H::Node>, Option<H::Node>)>) -> H::Node {
		let host = &*self.host;
		let (before, after) = match bounds {
			Some(bounds) => bounds,
			None => return self.mount_placeholder(container, None),
		};

		let mut current = match &before {
			Some(before) => host.next_sibling(before),
			None => host.first_child(container),
		};
		while let Some(node) = current.filter(|node| Some(node) != after.as_ref()) {
			current = host.next_sibling(&node);
			host.remove_child(container, &node);
		}
		self.mount_placeholder(container, after.as_ref())
	}

	fn handle(&self, instance: &Rc<RefCell<Instance<H>>>) -> ComponentHandle {
		let context = self.clone();
		let instance: Weak<RefCell<Instance<H>>> = Rc::downgrade(instance);
		ComponentHandle {
			update: Rc::new(move || match instance.upgrade() {
				Some(instance) => {
					let depth = instance.borrow().depth;
					context.update_stateful(&instance, None, depth)
				}
				None => {
					trace!("Component no longer mounted. Skipping update.");
					Ok(())
				}
			}),
		}
	}

	pub(crate) fn mount_functional(
		&self,
		definition: FunctionalDef<H::Node>,
		props: Data,
		container: &H::Node,
		svg: bool,
		anchor: Option<&H::Node>,
		depth: usize,
	) -> Result<FunctionalSlot<H>, ReconcileError> {
		let span = trace_span!("Mounting functional component", component = definition.name);
		let _enter = span.enter();

		let rendered = self.mount((definition.render)(&props), container, svg, anchor, depth)?;
		Ok(FunctionalSlot { definition, props, rendered })
	}

	pub(crate) fn patch_functional(&self, slot: FunctionalSlot<H>, props: Data, container: &H::Node, svg: bool, depth: usize) -> Result<FunctionalSlot<H>, ReconcileError> {
		let FunctionalSlot {
			definition,
			props: previous_props,
			rendered,
		} = slot;
		let span = trace_span!("Updating functional component", component = definition.name);
		let _enter = span.enter();
		trace!(props_changed = previous_props != props);

		let next = (definition.render)(&props);
		let rendered = self.patch(rendered, next, container, svg, depth)?;
		Ok(FunctionalSlot { definition, props, rendered })
	}
}
