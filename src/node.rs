//! Arena node model.
//!
//! All structural references between [`Node`]s are [`NodeId`]s into a [`NodeStore`](`crate::store::NodeStore`),
//! so no node is ever owned by more than one parent.

use core::fmt::{self, Display, Formatter};

/// Attribute mapping of an element or of the markup instantiating a nested component.
pub type Attributes = hashbrown::HashMap<String, String>;

/// Identifies one [`Node`] within a [`NodeStore`](`crate::store::NodeStore`).
///
/// Identifiers are handed out by a counter and are never reused by the same store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u64);
impl NodeId {
	#[must_use]
	pub fn get(self) -> u64 {
		self.0
	}
}
impl Display for NodeId {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
	pub(crate) id: NodeId,
	pub(crate) kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
	Text(String),
	Element {
		name: String,
		attributes: Attributes,
		children: Vec<NodeId>,
	},
	/// A nested component instantiation.
	///
	/// `root` is its single child: the root node produced by mounting that component.
	ComponentRoot { name: String, attributes: Attributes, root: NodeId },
}

impl Node {
	#[must_use]
	pub fn new(id: NodeId, kind: NodeKind) -> Self {
		Self { id, kind }
	}

	#[must_use]
	pub fn id(&self) -> NodeId {
		self.id
	}

	#[must_use]
	pub fn kind(&self) -> &NodeKind {
		&self.kind
	}

	/// The element or component type name. Empty for text.
	#[must_use]
	pub fn name(&self) -> &str {
		match &self.kind {
			NodeKind::Text(_) => "",
			NodeKind::Element { name, .. } | NodeKind::ComponentRoot { name, .. } => name,
		}
	}

	#[must_use]
	pub fn attributes(&self) -> Option<&Attributes> {
		match &self.kind {
			NodeKind::Text(_) => None,
			NodeKind::Element { attributes, .. } | NodeKind::ComponentRoot { attributes, .. } => Some(attributes),
		}
	}

	#[must_use]
	pub fn children(&self) -> &[NodeId] {
		match &self.kind {
			NodeKind::Text(_) => &[],
			NodeKind::Element { children, .. } => children,
			NodeKind::ComponentRoot { root, .. } => core::slice::from_ref(root),
		}
	}
}
