//! Reconciliation of two keyed child sequences that share one host parent.
//!
//! This is a single forward pass over the next sequence, not a minimal-move diff:
//! A reused child is moved only when its old position is lower than the highest old position matched so far,
//! and it is then placed directly behind the child that precedes it in the next sequence.

use crate::{
	error::ReconcileError,
	host::Host,
	mount::Context,
	mounted::Mounted,
	vnode::{assign_positional_keys, Key, VNode},
};
use hashbrown::{hash_map::Entry, HashMap, HashSet};
use tracing::{trace, trace_span};

/// # Errors
///
/// Iff a key occurs more than once.
pub(crate) fn check_unique_keys<'a>(keys: impl IntoIterator<Item = Option<&'a Key>>) -> Result<(), ReconcileError> {
	let mut seen = HashSet::new();
	for key in keys.into_iter().flatten() {
		if !seen.insert(key) {
			return Err(ReconcileError::DuplicateKey { key: key.clone() });
		}
	}
	Ok(())
}

/// Old position by key.
fn index_keys<H: Host>(previous: &[Mounted<H>]) -> Result<HashMap<Key, usize>, ReconcileError> {
	let mut index = HashMap::with_capacity(previous.len());
	for (j, child) in previous.iter().enumerate() {
		let key = child.key.clone().unwrap_or(Key::Index(j));
		match index.entry(key) {
			Entry::Occupied(occupied) => return Err(ReconcileError::DuplicateKey { key: occupied.key().clone() }),
			Entry::Vacant(vacant) => {
				vacant.insert(j);
			}
		}
	}
	Ok(index)
}

impl<H: Host> Context<H> {
	/// `anchor` is the host node following the whole sequence, if any.
	pub(crate) fn diff_keyed(
		&self,
		previous: Vec<Mounted<H>>,
		mut next: Vec<VNode<H::Node>>,
		parent: &H::Node,
		svg: bool,
		anchor: Option<&H::Node>,
		depth: usize,
	) -> Result<Vec<Mounted<H>>, ReconcileError> {
		let span = trace_span!("Diffing keyed", previous = previous.len(), next = next.len());
		let _enter = span.enter();
		let host = &*self.host;

		assign_positional_keys(&mut next);
		check_unique_keys(next.iter().map(|child| child.key.as_ref()))?;
		let previous_index = index_keys(&previous)?;

		// Where the sequence currently starts. Only consulted before anything was moved or replaced.
		let head = previous.first().and_then(Mounted::host).or_else(|| anchor.cloned());
		let mut previous: Vec<Option<Mounted<H>>> = previous.into_iter().map(Some).collect();
		let mut last_index = 0;
		let mut patched: Vec<Mounted<H>> = Vec::with_capacity(next.len());

		for child in next {
			// Directly behind the previous child of the next sequence.
			let behind_previous = |patched: &[Mounted<H>]| match patched.last() {
				Some(previous) => previous.last_host().and_then(|last| host.next_sibling(&last)),
				None => head.clone(),
			};

			let matched = child
				.key
				.as_ref()
				.and_then(|key| previous_index.get(key))
				.and_then(|&j| previous[j].take().map(|old| (j, old)));

			match matched {
				Some((j, old)) => {
					let reused = self.patch(old, child, parent, svg, depth)?;
					if j < last_index {
						trace!(key = ?reused.key, from = j, "Moving keyed child.");
						let reference = behind_previous(&patched);
						for node in reused.host_nodes() {
							host.insert_before(parent, &node, reference.as_ref())
						}
					} else {
						last_index = j;
					}
					patched.push(reused)
				}
				None => {
					trace!(key = ?child.key, "Mounting new keyed child.");
					let reference = behind_previous(&patched);
					patched.push(self.mount(child, parent, svg, reference.as_ref(), depth)?)
				}
			}
		}

		for removed in previous.into_iter().flatten() {
			trace!(key = ?removed.key, "Removing keyed child.");
			removed.unmount(host, parent)
		}

		Ok(patched)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unique_keys() {
		let a = Key::from("a");
		let b = Key::Int(1);
		assert_eq!(check_unique_keys([Some(&a), Some(&b), None, None]), Ok(()));
		assert_eq!(check_unique_keys([Some(&a), Some(&b), Some(&a)]), Err(ReconcileError::DuplicateKey { key: a.clone() }));
	}
}
