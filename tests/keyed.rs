use pretty_assertions::assert_eq;
use vdom_reconciler::{
	memory::{Mutation, NodeId},
	ReconcileError, VNode,
};

mod memory_host_;
use memory_host_::{creations, removals, setup};

fn list(items: &[(i64, &str)]) -> VNode<NodeId> {
	VNode::element("ul").children(items.iter().map(|&(key, label)| VNode::element("li").key(key).text_child(label)))
}

fn moves(mutations: &[Mutation]) -> Vec<NodeId> {
	mutations
		.iter()
		.filter_map(|mutation| match mutation {
			Mutation::Append { child, .. } | Mutation::InsertBefore { child, .. } => Some(*child),
			_ => None,
		})
		.collect()
}

#[test]
fn rotate_right() -> Result<(), ReconcileError> {
	let (mut renderer, host, main) = setup();

	renderer.render(Some(list(&[(1, "A"), (2, "B"), (3, "C")])), &main)?;
	let ul = renderer.root_node(&main).unwrap();
	let [a, b, c]: [NodeId; 3] = host.children(ul).try_into().unwrap();
	host.take_mutations();

	renderer.render(Some(list(&[(3, "C"), (1, "A"), (2, "B")])), &main)?;

	assert_eq!(host.inner_markup(ul), "<li>C</li><li>A</li><li>B</li>");
	assert_eq!(host.children(ul), vec![c, a, b]);
	let mutations = host.take_mutations();
	assert_eq!(creations(&mutations), 0);
	assert_eq!(removals(&mutations), vec![]);
	// C is matched first and stays, so both A and B are placed behind it.
	assert_eq!(moves(&mutations), vec![a, b]);
	Ok(())
}

#[test]
fn rotate_left() -> Result<(), ReconcileError> {
	let (mut renderer, host, main) = setup();

	renderer.render(Some(list(&[(1, "A"), (2, "B"), (3, "C")])), &main)?;
	let ul = renderer.root_node(&main).unwrap();
	let [a, b, c]: [NodeId; 3] = host.children(ul).try_into().unwrap();
	host.take_mutations();

	renderer.render(Some(list(&[(2, "B"), (3, "C"), (1, "A")])), &main)?;

	assert_eq!(host.children(ul), vec![b, c, a]);
	assert_eq!(moves(&host.take_mutations()), vec![a]);
	Ok(())
}

#[test]
fn add_and_remove() -> Result<(), ReconcileError> {
	let (mut renderer, host, main) = setup();

	renderer.render(Some(list(&[(1, "A"), (2, "B")])), &main)?;
	let ul = renderer.root_node(&main).unwrap();
	let [a, b]: [NodeId; 2] = host.children(ul).try_into().unwrap();
	let b_text = host.children(b)[0];
	host.take_mutations();

	renderer.render(Some(list(&[(2, "B"), (4, "D")])), &main)?;

	assert_eq!(host.inner_markup(ul), "<li>B</li><li>D</li>");
	let d = host.children(ul)[1];
	let mutations = host.take_mutations();
	assert_eq!(creations(&mutations), 2);
	assert_eq!(removals(&mutations), vec![a]);
	assert_eq!(mutations.last(), Some(&Mutation::Remove { parent: ul, child: a }));
	assert!(mutations.contains(&Mutation::Append { parent: ul, child: d }));
	for mutation in &mutations {
		let untouched = match mutation {
			Mutation::SetText { node, .. } => *node != b && *node != b_text,
			Mutation::Append { child, .. } | Mutation::InsertBefore { child, .. } | Mutation::Remove { child, .. } => *child != b,
			_ => true,
		};
		assert!(untouched, "{:?} touches B", mutation);
	}
	Ok(())
}

#[test]
fn insert_at_head() -> Result<(), ReconcileError> {
	let (mut renderer, host, main) = setup();

	renderer.render(Some(list(&[(2, "B"), (3, "C")])), &main)?;
	let ul = renderer.root_node(&main).unwrap();
	let b = host.children(ul)[0];
	host.take_mutations();

	renderer.render(Some(list(&[(1, "A"), (2, "B"), (3, "C")])), &main)?;

	assert_eq!(host.inner_markup(ul), "<li>A</li><li>B</li><li>C</li>");
	let a = host.children(ul)[0];
	assert!(host.take_mutations().contains(&Mutation::InsertBefore {
		parent: ul,
		child: a,
		reference: b
	}));
	Ok(())
}

#[test]
fn insert_in_middle() -> Result<(), ReconcileError> {
	let (mut renderer, host, main) = setup();

	renderer.render(Some(list(&[(1, "A"), (3, "C")])), &main)?;
	let ul = renderer.root_node(&main).unwrap();
	renderer.render(Some(list(&[(1, "A"), (2, "B"), (3, "C")])), &main)?;

	assert_eq!(host.inner_markup(ul), "<li>A</li><li>B</li><li>C</li>");
	Ok(())
}

#[test]
fn reverse() -> Result<(), ReconcileError> {
	let (mut renderer, host, main) = setup();

	renderer.render(Some(list(&[(1, "1"), (2, "2"), (3, "3"), (4, "4")])), &main)?;
	let ul = renderer.root_node(&main).unwrap();
	let mut nodes = host.children(ul);
	host.take_mutations();

	renderer.render(Some(list(&[(4, "4"), (3, "3"), (2, "2"), (1, "1")])), &main)?;

	nodes.reverse();
	assert_eq!(host.children(ul), nodes);
	let mutations = host.take_mutations();
	assert_eq!(creations(&mutations), 0);
	assert_eq!(moves(&mutations).len(), 3);
	Ok(())
}

#[test]
fn string_keys_and_replacement() -> Result<(), ReconcileError> {
	let (mut renderer, host, main) = setup();

	renderer.render(
		Some(VNode::element("div").children(vec![VNode::element("p").key("intro"), VNode::element("p").key("body")])),
		&main,
	)?;
	let div = renderer.root_node(&main).unwrap();
	let body = host.children(div)[1];

	renderer.render(
		Some(VNode::element("div").children(vec![VNode::element("p").key("body"), VNode::text("outro").key("intro")])),
		&main,
	)?;

	assert_eq!(host.inner_markup(div), "<p></p>outro");
	assert_eq!(host.children(div)[0], body);
	Ok(())
}

#[test]
fn positional_keys() -> Result<(), ReconcileError> {
	let (mut renderer, host, main) = setup();

	renderer.render(Some(VNode::element("ol").children(vec![VNode::text("a"), VNode::text("b")])), &main)?;
	let ol = renderer.root_node(&main).unwrap();
	let existing = host.children(ol);
	host.take_mutations();

	renderer.render(Some(VNode::element("ol").children(vec![VNode::text("a"), VNode::text("b"), VNode::text("c")])), &main)?;

	assert_eq!(host.inner_markup(ol), "abc");
	assert_eq!(host.children(ol)[..2], existing[..]);
	let mutations = host.take_mutations();
	assert_eq!(creations(&mutations), 1);
	assert_eq!(moves(&mutations).len(), 1);
	Ok(())
}

#[test]
fn duplicate_keys_on_patch() -> Result<(), ReconcileError> {
	let (mut renderer, _host, main) = setup();

	renderer.render(Some(list(&[(1, "A"), (2, "B")])), &main)?;
	assert_eq!(
		renderer.render(Some(list(&[(2, "B"), (2, "B")])), &main),
		Err(ReconcileError::DuplicateKey {
			key: vdom_reconciler::Key::Int(2)
		})
	);
	Ok(())
}
