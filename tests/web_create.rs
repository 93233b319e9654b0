#![cfg(target_arch = "wasm32")]

use vdom_reconciler::{dom::DomHost, Renderer, VNode};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{Element, Node};

wasm_bindgen_test_configure!(run_in_browser);

fn container(host: &DomHost) -> Node {
	let container = host.document().create_element("div").unwrap();
	host.document().body().unwrap().append_child(&container).unwrap();
	container.into()
}

#[wasm_bindgen_test]
fn text() {
	let mut renderer = Renderer::new(DomHost::for_window().unwrap());
	let container = container(renderer.host());

	renderer.render(Some(VNode::text("Hello vdom-reconciler!")), &container).unwrap();

	assert_eq!(container.text_content().as_deref(), Some("Hello vdom-reconciler!"));
}

#[wasm_bindgen_test]
fn element() {
	let mut renderer = Renderer::new(DomHost::for_window().unwrap());
	let container = container(renderer.host());

	renderer
		.render(
			Some(
				VNode::element("p")
					.with("title", "tip")
					.class("note")
					.style([("color", "red")])
					.text_child("content"),
			),
			&container,
		)
		.unwrap();

	let container: &Element = container.unchecked_ref();
	assert_eq!(container.inner_html(), r#"<p class="note" style="color: red;" title="tip">content</p>"#);
}

#[wasm_bindgen_test]
fn svg() {
	let mut renderer = Renderer::new(DomHost::for_window().unwrap());
	let container = container(renderer.host());

	renderer
		.render(Some(VNode::svg("svg").class("icon").child(VNode::element("circle").with("r", "4"))), &container)
		.unwrap();

	let svg = container.first_child().unwrap().dyn_into::<Element>().unwrap();
	assert_eq!(svg.namespace_uri().as_deref(), Some(vdom_reconciler::dom::SVG_NAMESPACE));
	assert_eq!(svg.get_attribute("class").as_deref(), Some("icon"));
	let circle = svg.first_element_child().unwrap();
	assert_eq!(circle.namespace_uri().as_deref(), Some(vdom_reconciler::dom::SVG_NAMESPACE));
}

#[wasm_bindgen_test]
fn portal() {
	let mut renderer = Renderer::new(DomHost::for_window().unwrap());
	let container = container(renderer.host());
	let target = renderer.host().document().create_element("aside").unwrap();
	target.set_id("web-create-portal");
	renderer.host().document().body().unwrap().append_child(&target).unwrap();

	renderer
		.render(Some(VNode::element("div").child(VNode::portal("#web-create-portal", vec![VNode::text("elsewhere")]))), &container)
		.unwrap();

	assert_eq!(target.text_content().as_deref(), Some("elsewhere"));
	renderer.render(None, &container).unwrap();
	assert_eq!(target.text_content().as_deref(), Some(""));
}

#[wasm_bindgen_test]
fn load_existing_content() {
	let mut renderer = Renderer::new(DomHost::for_window().unwrap());
	let source = container(renderer.host());
	let source_element: &Element = source.unchecked_ref();
	source_element.set_inner_html(r#"<ul id="loaded"><li>one</li><li class="second">two</li></ul>text"#);

	let loaded = vdom_reconciler::dom::load::load_child_nodes(&source.child_nodes());
	assert_eq!(loaded.len(), 2);

	let copy = container(renderer.host());
	renderer.render(Some(VNode::fragment(loaded)), &copy).unwrap();
	let copy: &Element = copy.unchecked_ref();
	assert_eq!(copy.inner_html(), source_element.inner_html());
}
