//! Owned snapshots of stored subtrees and the patches carrying them.

use crate::{
	node::{Attributes, NodeId},
	store::NodeStore,
};
use tracing::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
	Text,
	Element,
	Component,
}

/// An owned, detached copy of a stored subtree.
///
/// A [`TagKind::Component`] tag lists the root of its mounted component as only child,
/// or has no children at all if that component was dismounted out from under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
	pub id: NodeId,
	pub kind: TagKind,
	/// Element or component type name. Empty for text.
	pub name: String,
	/// Empty unless this is a text tag.
	pub text: String,
	pub attributes: Attributes,
	pub children: Vec<Tag>,
}
impl Tag {
	#[must_use]
	pub fn is_text(&self) -> bool {
		self.kind == TagKind::Text
	}

	#[must_use]
	pub fn is_component(&self) -> bool {
		self.kind == TagKind::Component
	}

	#[must_use]
	pub fn attribute(&self, name: &str) -> Option<&str> {
		self.attributes.get(name).map(String::as_str)
	}
}

/// One unit of change, addressed by the id of the node the caller last saw.
///
/// With `replace`, `tag` is the complete new subtree that takes the place of `target`.
/// Without it, `tag` carries only the target element's new attributes and no children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
	pub target: NodeId,
	pub replace: bool,
	pub tag: Tag,
}

/// What the differ decided, recorded before any stored node is touched.
///
/// Turned into [`Patch`]es only after commit, so that tags show the converged tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Intent {
	/// `node` is the id that takes `target`'s place, which is `target` itself for in-place replaces.
	Replace { target: NodeId, node: NodeId },
	Attributes { target: NodeId },
}

/// Packages the differ's intents into patches, keeping their order.
///
/// Must run after the corresponding edits were committed.
pub(crate) fn emit(store: &NodeStore, intents: Vec<Intent>) -> Vec<Patch> {
	intents
		.into_iter()
		.filter_map(|intent| {
			let (target, replace, tag) = match intent {
				Intent::Replace { target, node } => (target, true, store.snapshot(node)),
				Intent::Attributes { target } => (target, false, store.shallow_snapshot(target)),
			};
			match tag {
				Some(tag) => Some(Patch { target, replace, tag }),
				None => {
					error!("Patch target {} vanished before emission. Dropping the patch.", target);
					None
				}
			}
		})
		.collect()
}
