use crate::{
	node::{Node, NodeId, NodeKind},
	patch::{Tag, TagKind},
};
use hashbrown::HashMap;
use tracing::{error, trace};

/// Arena owning every live [`Node`] of one markup tree.
///
/// Performs no validation beyond identifier existence.
/// Tree shape is maintained by the mounter, differ and dismounter.
#[derive(Debug, Default)]
pub struct NodeStore {
	nodes: HashMap<NodeId, Node>,
	next_id: u64,
}
impl NodeStore {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Hands out a fresh identifier without inserting anything.
	///
	/// Identifiers of nodes that never make it into the store are burned, not recycled.
	pub fn allocate(&mut self) -> NodeId {
		self.next_id += 1;
		NodeId(self.next_id)
	}

	/// Inserts `node` under its own id and returns that id.
	///
	/// A node already stored under that id is dropped and reported, which only happens if an id was inserted twice.
	pub fn insert(&mut self, node: Node) -> NodeId {
		let id = node.id;
		if self.nodes.insert(id, node).is_some() {
			error!("Node {} was inserted twice. Keeping the later one.", id);
		}
		id
	}

	#[must_use]
	pub fn get(&self, id: NodeId) -> Option<&Node> {
		self.nodes.get(&id)
	}

	pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
		self.nodes.get_mut(&id)
	}

	/// Removes a single node. Its children stay where they are.
	pub fn remove(&mut self, id: NodeId) -> Option<Node> {
		let removed = self.nodes.remove(&id);
		trace!(%id, found = removed.is_some(), "Removed node.");
		removed
	}

	#[must_use]
	pub fn children_of(&self, id: NodeId) -> Option<&[NodeId]> {
		self.get(id).map(Node::children)
	}

	#[must_use]
	pub fn contains(&self, id: NodeId) -> bool {
		self.nodes.contains_key(&id)
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Copies the subtree below `id` out of the store.
	///
	/// Dangling children, which can only be the roots of independently dismounted components, are skipped.
	#[must_use]
	pub fn snapshot(&self, id: NodeId) -> Option<Tag> {
		let node = self.get(id)?;
		Some(match &node.kind {
			NodeKind::Text(text) => Tag {
				id,
				kind: TagKind::Text,
				name: String::new(),
				text: text.clone(),
				attributes: Default::default(),
				children: Vec::new(),
			},
			NodeKind::Element { name, attributes, children } => Tag {
				id,
				kind: TagKind::Element,
				name: name.clone(),
				text: String::new(),
				attributes: attributes.clone(),
				children: children.iter().filter_map(|&child| self.snapshot(child)).collect(),
			},
			NodeKind::ComponentRoot { name, attributes, root } => Tag {
				id,
				kind: TagKind::Component,
				name: name.clone(),
				text: String::new(),
				attributes: attributes.clone(),
				children: self.snapshot(*root).into_iter().collect(),
			},
		})
	}

	/// Like [`snapshot`](`NodeStore::snapshot`), but without any children.
	pub(crate) fn shallow_snapshot(&self, id: NodeId) -> Option<Tag> {
		let node = self.get(id)?;
		let kind = match &node.kind {
			NodeKind::Text(_) => return self.snapshot(id),
			NodeKind::Element { .. } => TagKind::Element,
			NodeKind::ComponentRoot { .. } => TagKind::Component,
		};
		Some(Tag {
			id,
			kind,
			name: node.name().to_owned(),
			text: String::new(),
			attributes: node.attributes().cloned().unwrap_or_default(),
			children: Vec::new(),
		})
	}
}
