#![doc(html_root_url = "https://docs.rs/vdom-reconciler/0.1.0")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Mounts virtual node trees onto a [`Host`](`host::Host`) and patches them in place on later renders.
//!
//! See [`Renderer::render`](`render::Renderer::render`) for the entry point.

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod component;
pub mod data;
pub mod dom;
pub mod error;
pub mod host;
pub mod memory;
pub mod render;
pub mod vnode;

mod keyed;
mod mount;
mod mounted;
mod patch;
mod rc_hash_map;

pub use component::{Component, ComponentHandle, FunctionalDef, StatefulDef};
pub use data::{Data, Listener, Style, Value};
pub use error::ReconcileError;
pub use host::Host;
pub use render::Renderer;
pub use vnode::{ChildSpec, Key, Kind, PortalTarget, VNode};
