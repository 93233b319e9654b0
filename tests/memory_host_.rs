#![allow(dead_code)]

use std::rc::Rc;
use vdom_reconciler::{
	memory::{MemoryHost, Mutation, NodeId},
	Renderer,
};

pub fn setup() -> (Renderer<MemoryHost>, Rc<MemoryHost>, NodeId) {
	let _ = tracing_subscriber::fmt()
		.with_test_writer()
		.with_max_level(tracing::Level::TRACE)
		.try_init();

	let renderer = Renderer::new(MemoryHost::new());
	let host = Rc::clone(renderer.host());
	let container = host.create_root("main");
	(renderer, host, container)
}

pub fn creations(mutations: &[Mutation]) -> usize {
	mutations
		.iter()
		.filter(|mutation| matches!(mutation, Mutation::CreateElement { .. } | Mutation::CreateText { .. }))
		.count()
}

pub fn removals(mutations: &[Mutation]) -> Vec<NodeId> {
	mutations
		.iter()
		.filter_map(|mutation| match mutation {
			Mutation::Remove { child, .. } => Some(*child),
			_ => None,
		})
		.collect()
}
