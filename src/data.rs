//! Per-node data (attributes, properties, styles and event listeners) and the applier that writes it to a host node.

use crate::host::Host;
use core::{any::Any, fmt};
use std::{borrow::Cow, collections::BTreeMap, rc::Rc};
use tracing::{trace, warn};

/// Style property name → value.
pub type Style = BTreeMap<String, String>;

/// Data key → value, iterated in key order.
pub type Data = BTreeMap<String, Value>;

/// Keys that start with this prefix bind event listeners. The remainder names the event.
pub const EVENT_PREFIX: &str = "on";

/// Names that are always written as host properties rather than attributes.
const RESERVED_PROPERTIES: &[&str] = &["value", "checked", "selected", "muted"];

/// An event handler.
///
/// Listeners compare by identity, so cloning one and binding it again is not a change.
#[derive(Clone)]
pub struct Listener(Rc<dyn Fn(&dyn Any)>);
impl Listener {
	pub fn new(handler: impl 'static + Fn(&dyn Any)) -> Self {
		Self(Rc::new(handler))
	}

	pub fn call(&self, event: &dyn Any) {
		(self.0)(event)
	}

	/// Stable for as long as any clone of this [`Listener`] is alive.
	#[must_use]
	pub fn address(&self) -> usize {
		Rc::as_ptr(&self.0).cast::<()>() as usize
	}
}
impl PartialEq for Listener {
	fn eq(&self, other: &Self) -> bool {
		self.address() == other.address()
	}
}
impl Eq for Listener {}
impl fmt::Debug for Listener {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Listener({:#x})", self.address())
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	Text(String),
	Bool(bool),
	Number(f64),
	Style(Style),
	Listener(Listener),
}
impl Value {
	/// `false`, `""` and `0` are falsy. Data that was falsy before is not explicitly removed when its key disappears.
	#[must_use]
	pub fn is_truthy(&self) -> bool {
		match self {
			Value::Text(text) => !text.is_empty(),
			Value::Bool(b) => *b,
			#[allow(clippy::float_cmp)]
			Value::Number(n) => *n != 0.0 && !n.is_nan(),
			Value::Style(_) | Value::Listener(_) => true,
		}
	}

	/// The attribute form of this value, or [`None`] if the attribute should be absent.
	#[must_use]
	pub fn as_attribute(&self) -> Option<Cow<'_, str>> {
		match self {
			Value::Text(text) => Some(Cow::Borrowed(text)),
			Value::Bool(true) => Some(Cow::Borrowed("")),
			Value::Bool(false) => None,
			Value::Number(n) => Some(Cow::Owned(n.to_string())),
			Value::Style(_) | Value::Listener(_) => None,
		}
	}
}
impl From<&str> for Value {
	fn from(text: &str) -> Self {
		Value::Text(text.to_owned())
	}
}
impl From<String> for Value {
	fn from(text: String) -> Self {
		Value::Text(text)
	}
}
impl From<bool> for Value {
	fn from(b: bool) -> Self {
		Value::Bool(b)
	}
}
impl From<f64> for Value {
	fn from(n: f64) -> Self {
		Value::Number(n)
	}
}
impl From<Style> for Value {
	fn from(style: Style) -> Self {
		Value::Style(style)
	}
}
impl From<Listener> for Value {
	fn from(listener: Listener) -> Self {
		Value::Listener(listener)
	}
}

/// Whether `key` is written as a host property: reserved names and anything with non-word characters.
#[must_use]
pub fn is_property_key(key: &str) -> bool {
	RESERVED_PROPERTIES.contains(&key) || key.chars().any(|c| !(c.is_ascii_alphanumeric() || c == '_'))
}

/// Applies the change of one data entry from `previous` to `next` to `node`.
///
/// Mounting passes [`None`] as `previous`, removal passes [`None`] as `next`.
/// Equal values are skipped entirely.
pub fn apply<H: Host + ?Sized>(host: &H, node: &H::Node, key: &str, previous: Option<&Value>, next: Option<&Value>) {
	if previous == next {
		return;
	}

	match key {
		"style" => apply_style(host, node, previous, next),
		"class" => match next {
			Some(Value::Text(class)) => host.set_class_name(node, class),
			Some(other) => warn!("Unsupported `class` value {:?}; Clearing the class name.", other),
			None => host.set_class_name(node, ""),
		},
		_ if key.starts_with(EVENT_PREFIX) => {
			let event = &key[EVENT_PREFIX.len()..];
			if let Some(Value::Listener(previous)) = previous {
				host.remove_listener(node, event, previous);
			}
			match next {
				Some(Value::Listener(next)) => host.add_listener(node, event, next),
				Some(other) => warn!("Expected a listener for {:?} but found {:?}.", key, other),
				None => (),
			}
		}
		_ if is_property_key(key) => host.set_property(node, key, next),
		_ => match next.and_then(Value::as_attribute) {
			Some(value) => host.set_attribute(node, key, &value),
			None => host.remove_attribute(node, key),
		},
	}
}

fn apply_style<H: Host + ?Sized>(host: &H, node: &H::Node, previous: Option<&Value>, next: Option<&Value>) {
	static EMPTY: Style = Style::new();
	let previous_style = match previous {
		Some(Value::Style(style)) => style,
		_ => &EMPTY,
	};

	match next {
		Some(Value::Style(next_style)) => {
			if matches!(previous, Some(Value::Text(_))) {
				host.remove_attribute(node, "style");
			}
			for (property, value) in next_style {
				host.set_style(node, property, value);
			}
			for property in previous_style.keys().filter(|property| !next_style.contains_key(*property)) {
				trace!(property = property.as_str(), "Clearing stale style property.");
				host.set_style(node, property, "");
			}
		}
		Some(Value::Text(raw)) => host.set_attribute(node, "style", raw),
		Some(other) => warn!("Unsupported `style` value {:?}; Ignoring.", other),
		None => {
			if matches!(previous, Some(Value::Text(_))) {
				host.remove_attribute(node, "style");
			}
			for property in previous_style.keys() {
				host.set_style(node, property, "");
			}
		}
	}
}
