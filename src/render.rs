use crate::{error::ReconcileError, host::Host, mount::Context, mounted::Mounted, vnode::VNode};
use std::rc::Rc;
use tracing::{debug, instrument, trace};

struct Root<H: Host> {
	container: H::Node,
	tree: Mounted<H>,
}

/// Remembers the currently mounted tree of each container it rendered into.
///
/// # Correct Use
///
/// Containers must not be modified by other means while a tree is mounted into them,
/// except where content is appended after the rendered nodes.
pub struct Renderer<H: Host> {
	context: Context<H>,
	roots: Vec<Root<H>>,
}
impl<H: Host> Renderer<H> {
	/// Maximum nesting of virtual nodes (including components' rendered trees) unless configured otherwise.
	pub const DEFAULT_DEPTH_LIMIT: usize = 256;

	#[must_use]
	pub fn new(host: H) -> Self {
		Self::with_shared_host(Rc::new(host))
	}

	#[must_use]
	pub fn with_shared_host(host: Rc<H>) -> Self {
		Self {
			context: Context {
				host,
				depth_limit: Self::DEFAULT_DEPTH_LIMIT,
			},
			roots: vec![],
		}
	}

	/// Applies to renders started after this call.
	/// Handles of components that are already mounted keep the previous limit.
	#[must_use]
	pub fn with_depth_limit(mut self, depth_limit: usize) -> Self {
		self.context.depth_limit = depth_limit;
		self
	}

	#[must_use]
	pub fn host(&self) -> &Rc<H> {
		&self.context.host
	}

	#[must_use]
	pub fn is_mounted(&self, container: &H::Node) -> bool {
		self.roots.iter().any(|root| &root.container == container)
	}

	/// The representative host node of the tree mounted into `container`.
	#[must_use]
	pub fn root_node(&self, container: &H::Node) -> Option<H::Node> {
		self.roots.iter().find(|root| &root.container == container).and_then(|root| root.tree.host())
	}

	/// Mounts `vnode` into `container`, patches the tree mounted there before, or unmounts it if `vnode` is [`None`].
	///
	/// # Errors
	///
	/// Iff `vnode` is malformed. The container's previous tree is then forgotten, with its host nodes left as they were.
	#[instrument(skip(self, vnode))]
	pub fn render(&mut self, vnode: Option<VNode<H::Node>>, container: &H::Node) -> Result<(), ReconcileError> {
		let depth = self.context.depth_limit;
		let position = self.roots.iter().position(|root| &root.container == container);
		match (position.map(|i| self.roots.swap_remove(i)), vnode) {
			(None, None) => trace!("Nothing mounted. Nothing to do."),
			(None, Some(vnode)) => {
				debug!(kind = vnode.kind.name(), "Mounting.");
				let tree = self.context.mount(vnode, container, false, None, depth)?;
				self.roots.push(Root {
					container: container.clone(),
					tree,
				})
			}
			(Some(Root { tree, .. }), Some(vnode)) => {
				debug!(kind = vnode.kind.name(), "Patching.");
				let tree = self.context.patch(tree, vnode, container, false, depth)?;
				self.roots.push(Root {
					container: container.clone(),
					tree,
				})
			}
			(Some(Root { tree, .. }), None) => {
				debug!("Unmounting.");
				tree.unmount(&*self.context.host, container)
			}
		}
		Ok(())
	}
}
