use crate::data::{Listener, Value};
use core::fmt::Debug;

/// The host platform a virtual tree is materialized onto.
///
/// All operations are synchronous and assumed to succeed.
/// Methods take `&self` so that a host can be shared with component update handles.
pub trait Host: 'static {
	/// A handle to one host resource (element or text).
	type Node: Clone + PartialEq + Debug + 'static;

	fn create_element(&self, tag: &str, svg: bool) -> Self::Node;
	fn create_text(&self, text: &str) -> Self::Node;
	fn set_text(&self, node: &Self::Node, text: &str);

	/// An empty `value` clears the style property.
	fn set_style(&self, node: &Self::Node, property: &str, value: &str);
	fn set_class_name(&self, node: &Self::Node, class_name: &str);

	fn add_listener(&self, node: &Self::Node, event: &str, listener: &Listener);
	fn remove_listener(&self, node: &Self::Node, event: &str, listener: &Listener);

	/// [`None`] clears the property.
	fn set_property(&self, node: &Self::Node, name: &str, value: Option<&Value>);
	fn set_attribute(&self, node: &Self::Node, name: &str, value: &str);
	fn remove_attribute(&self, node: &Self::Node, name: &str);

	fn append_child(&self, parent: &Self::Node, child: &Self::Node);
	/// Appends if `reference` is [`None`].
	fn insert_before(&self, parent: &Self::Node, child: &Self::Node, reference: Option<&Self::Node>);
	fn remove_child(&self, parent: &Self::Node, child: &Self::Node);
	fn first_child(&self, parent: &Self::Node) -> Option<Self::Node>;
	fn previous_sibling(&self, node: &Self::Node) -> Option<Self::Node>;
	fn next_sibling(&self, node: &Self::Node) -> Option<Self::Node>;

	/// Resolves a portal target locator.
	fn query_selector(&self, selector: &str) -> Option<Self::Node>;
}
