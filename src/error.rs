use crate::vnode::Key;
use thiserror::Error;

/// A malformed virtual tree, detected synchronously while mounting or patching.
///
/// Structural mismatches between the previous and next tree are not errors; they are resolved by replacing the subtree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
	#[error("duplicate key {key:?} among siblings")]
	DuplicateKey { key: Key },

	#[error("portal target {selector:?} did not resolve to a host node")]
	PortalTargetNotFound { selector: String },

	#[error("depth limit of {limit} reached")]
	DepthLimit { limit: usize },

	/// A component's update was re-entered while it was already patching its rendered tree.
	#[error("component {component} is already updating")]
	UpdateInProgress { component: &'static str },
}
