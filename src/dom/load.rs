//! Reads existing DOM content back into virtual nodes.

use super::SVG_NAMESPACE;
use crate::{
	data::{Data, Value},
	vnode::VNode,
};
use tracing::warn;
use wasm_bindgen::JsCast;
use web_sys::{Attr, Element, NamedNodeMap, Node, NodeList, Text};

pub fn load_child_nodes(child_nodes: &NodeList) -> Vec<VNode<Node>> {
	(0..child_nodes.length())
		.filter_map(|i| {
			let child = child_nodes.item(i)?;
			if let Some(element) = child.dyn_ref::<Element>() {
				Some(load_element(element))
			} else if let Some(text) = child.dyn_ref::<Text>() {
				Some(VNode::text(text.data()))
			} else {
				warn!("Skipping unrecognised child node: {:?}", child);
				None
			}
		})
		.collect()
}

pub fn load_element(element: &Element) -> VNode<Node> {
	let node: &Node = element.as_ref();
	let vnode = if element.namespace_uri().as_deref() == Some(SVG_NAMESPACE) {
		VNode::svg(element.local_name())
	} else {
		VNode::element(element.local_name())
	};
	VNode {
		data: load_attributes(&element.attributes()),
		..vnode.children(load_child_nodes(&node.child_nodes()))
	}
}

pub fn load_attributes(attributes: &NamedNodeMap) -> Data {
	(0..attributes.length())
		.filter_map(|i| attributes.item(i))
		.map(|attribute| load_attribute(&attribute))
		.collect()
}

pub fn load_attribute(attribute: &Attr) -> (String, Value) {
	(attribute.local_name(), Value::Text(attribute.value()))
}
