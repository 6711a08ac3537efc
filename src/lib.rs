//! Mounts markup-rendering components into a tree of id-addressed nodes,
//! and diffs their re-renders into minimal lists of [`Patch`]es.
//!
//! Rendering ([`Component`]), parsing ([`Parser`]) and resolving nested component tags ([`Registry`]) are pluggable.
//! Applying patches to an actual view is up to the caller.

#![doc(html_root_url = "https://docs.rs/markup-reconcile/0.0.1")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

mod component;
mod diff;
mod dismount;
mod error;
mod markup;
mod mount;
pub mod node;
pub mod parse;
pub mod patch;
mod registry;
pub mod store;
mod table;

pub use component::{coerce, AttributeError, BoxError, Component, ComponentRef};
pub use error::{Error, Result};
pub use markup::{Config, Markup};
pub use node::{Attributes, NodeId};
pub use parse::{HtmlParser, MalformedMarkup, Parser, RawNode};
pub use patch::{Patch, Tag, TagKind};
pub use registry::{Factory, Registry};
