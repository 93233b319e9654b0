//! A [`Host`] for the browser DOM.

pub mod load;

use crate::{
	data::{Listener, Value},
	host::Host,
	rc_hash_map::{CountSaturatedError, RcHashMap},
};
use core::cell::RefCell;
use tracing::{error, info, trace, warn};
use wasm_bindgen::{closure::Closure, JsCast, JsValue, UnwrapThrowExt};

pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

type ListenerClosure = Closure<dyn Fn(web_sys::Event)>;

/// Materializes virtual nodes as [`web_sys::Node`]s of one [`web_sys::Document`].
///
/// Each distinct [`Listener`] is wrapped in one JavaScript closure, reference-counted across all nodes it is bound to.
/// The closure is dropped once the listener is no longer bound anywhere, so dropping the [`DomHost`] while
/// listeners are still bound makes those listeners throw into JavaScript when their events fire.
pub struct DomHost {
	document: web_sys::Document,
	listeners: RefCell<RcHashMap<usize, u16, ListenerClosure>>,
}
impl DomHost {
	#[must_use]
	pub fn new(document: web_sys::Document) -> Self {
		Self {
			document,
			listeners: RefCell::default(),
		}
	}

	/// The current window's document, if there is one.
	#[must_use]
	pub fn for_window() -> Option<Self> {
		web_sys::window()?.document().map(Self::new)
	}

	#[must_use]
	pub fn document(&self) -> &web_sys::Document {
		&self.document
	}

	/// The number of JavaScript closures currently allocated for listeners.
	#[must_use]
	pub fn listener_closure_count(&self) -> usize {
		self.listeners.borrow().len()
	}

	fn style(node: &web_sys::Node) -> Option<web_sys::CssStyleDeclaration> {
		if let Some(element) = node.dyn_ref::<web_sys::HtmlElement>() {
			Some(element.style())
		} else if let Some(element) = node.dyn_ref::<web_sys::SvgElement>() {
			Some(element.style())
		} else {
			None
		}
	}

	fn element(node: &web_sys::Node) -> Option<&web_sys::Element> {
		let element = node.dyn_ref::<web_sys::Element>();
		if element.is_none() {
			error!("Expected `web_sys::Element` but found {:?}.", node);
		}
		element
	}
}

impl Host for DomHost {
	type Node = web_sys::Node;

	fn create_element(&self, tag: &str, svg: bool) -> web_sys::Node {
		let element = if svg {
			self.document.create_element_ns(Some(SVG_NAMESPACE), tag)
		} else {
			self.document.create_element(tag)
		};
		element.expect_throw("vdom-reconciler: Failed to create element.").into()
	}

	fn create_text(&self, text: &str) -> web_sys::Node {
		self.document.create_text_node(text).into()
	}

	fn set_text(&self, node: &web_sys::Node, text: &str) {
		match node.dyn_ref::<web_sys::CharacterData>() {
			Some(character_data) => character_data.set_data(text),
			None => error!("Expected `web_sys::CharacterData` but found {:?}.", node),
		}
	}

	fn set_style(&self, node: &web_sys::Node, property: &str, value: &str) {
		let style = match Self::style(node) {
			Some(style) => style,
			None => return error!("Can't set style property {:?} on {:?}.", property, node),
		};
		let result = if value.is_empty() {
			style.remove_property(property).map(drop)
		} else {
			style.set_property(property, value)
		};
		if let Err(error) = result {
			error!("Failed to set style property {:?}: {:?}", property, error)
		}
	}

	fn set_class_name(&self, node: &web_sys::Node, class_name: &str) {
		if let Some(element) = node.dyn_ref::<web_sys::HtmlElement>() {
			element.set_class_name(class_name)
		} else if let Some(element) = Self::element(node) {
			// `className` is not a plain string on SVG elements.
			if let Err(error) = element.set_attribute("class", class_name) {
				error!("Failed to set class: {:?}", error)
			}
		}
	}

	fn add_listener(&self, node: &web_sys::Node, event: &str, listener: &Listener) {
		let mut listeners = self.listeners.borrow_mut();
		let closure = listeners.increment_or_insert_with(listener.address(), || {
			trace!(?listener, "Creating listener closure.");
			let listener = listener.clone();
			Closure::wrap(Box::new(move |event: web_sys::Event| listener.call(&event)) as Box<dyn Fn(web_sys::Event)>)
		});
		let closure = match closure {
			Ok(closure) => closure,
			Err(CountSaturatedError) => return error!("Too many (more than 65k) active bindings of the same listener."),
		};
		if let Err(error) = node.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
			error!("Failed to add event listener {:?}: {:?}", event, error)
		}
	}

	fn remove_listener(&self, node: &web_sys::Node, event: &str, listener: &Listener) {
		let mut listeners = self.listeners.borrow_mut();
		match listeners.weak_decrement(&listener.address()) {
			Ok(Some(closure)) => {
				if let Err(error) = node.remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
					error!("Failed to remove event listener {:?}: {:?}", event, error)
				}
			}
			Ok(None) => warn!("Tried to remove event listener {:?} that was never bound.", event),
			Err(CountSaturatedError) => error!("Tried to remove event listener {:?} more often than it was bound.", event),
		}

		let freed = listeners.drain_weak().count();
		if freed > 0 {
			trace!("Freed {} listener closure(s).", freed);
			info!("Listener closure count/cached capacity: {}/{}", listeners.len(), listeners.capacity());
		}
	}

	fn set_property(&self, node: &web_sys::Node, name: &str, value: Option<&Value>) {
		let value = match value {
			None => JsValue::NULL,
			Some(Value::Text(text)) => JsValue::from_str(text),
			Some(&Value::Bool(b)) => JsValue::from_bool(b),
			Some(&Value::Number(n)) => JsValue::from_f64(n),
			Some(other @ (Value::Style(_) | Value::Listener(_))) => return warn!("Can't set property {:?} to {:?}. Ignoring.", name, other),
		};
		if let Err(error) = js_sys::Reflect::set(node, &JsValue::from_str(name), &value) {
			error!("Failed to set property {:?}: {:?}", name, error)
		}
	}

	fn set_attribute(&self, node: &web_sys::Node, name: &str, value: &str) {
		if let Some(element) = Self::element(node) {
			if let Err(error) = element.set_attribute(name, value) {
				error!("Could not set attribute {:?}: {:?}", name, error)
			}
		}
	}

	fn remove_attribute(&self, node: &web_sys::Node, name: &str) {
		if let Some(element) = Self::element(node) {
			if let Err(error) = element.remove_attribute(name) {
				warn!("Could not remove attribute {:?}: {:?}", name, error)
			}
		}
	}

	fn append_child(&self, parent: &web_sys::Node, child: &web_sys::Node) {
		if let Err(error) = parent.append_child(child) {
			error!("Failed to append node: {:?}", error)
		}
	}

	fn insert_before(&self, parent: &web_sys::Node, child: &web_sys::Node, reference: Option<&web_sys::Node>) {
		if let Err(error) = parent.insert_before(child, reference) {
			error!("Failed to insert node: {:?}", error)
		}
	}

	fn remove_child(&self, parent: &web_sys::Node, child: &web_sys::Node) {
		if let Err(error) = parent.remove_child(child) {
			error!("Failed to remove the node: {:?}", error)
		}
	}

	fn first_child(&self, parent: &web_sys::Node) -> Option<web_sys::Node> {
		parent.first_child()
	}

	fn previous_sibling(&self, node: &web_sys::Node) -> Option<web_sys::Node> {
		node.previous_sibling()
	}

	fn next_sibling(&self, node: &web_sys::Node) -> Option<web_sys::Node> {
		node.next_sibling()
	}

	fn query_selector(&self, selector: &str) -> Option<web_sys::Node> {
		match self.document.query_selector(selector) {
			Ok(element) => element.map(Into::into),
			Err(error) => {
				error!("Invalid selector {:?}: {:?}", selector, error);
				None
			}
		}
	}
}
