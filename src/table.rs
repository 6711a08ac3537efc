use crate::{
	component::{ComponentKey, ComponentRef},
	node::NodeId,
};
use hashbrown::{hash_map::Entry, HashMap};

pub(crate) struct Mounted {
	pub(crate) component: ComponentRef,
	pub(crate) root: NodeId,
	/// The `ComponentRoot` node that instantiates this component inside its parent, if nested.
	pub(crate) wrapper: Option<NodeId>,
}

/// Bidirectional component/node association.
///
/// Each mounted component is reachable through its root node's id and, if nested, its wrapper's id.
/// The two are indexed separately, as a component whose render is a single component tag has a root that's another's wrapper.
#[derive(Default)]
pub(crate) struct ComponentTable {
	mounted: HashMap<ComponentKey, Mounted>,
	by_root: HashMap<NodeId, ComponentKey>,
	by_wrapper: HashMap<NodeId, ComponentKey>,
}
impl ComponentTable {
	pub(crate) fn len(&self) -> usize {
		self.mounted.len()
	}

	pub(crate) fn contains(&self, key: ComponentKey) -> bool {
		self.mounted.contains_key(&key)
	}

	pub(crate) fn get(&self, key: ComponentKey) -> Option<&Mounted> {
		self.mounted.get(&key)
	}

	/// Prefers the component rooted at `id` over the one it instantiates.
	pub(crate) fn by_node(&self, id: NodeId) -> Option<&Mounted> {
		self.by_root.get(&id).or_else(|| self.by_wrapper.get(&id)).and_then(|key| self.get(*key))
	}

	pub(crate) fn by_wrapper(&self, wrapper: NodeId) -> Option<&Mounted> {
		self.by_wrapper.get(&wrapper).and_then(|key| self.get(*key))
	}

	/// Returns the displaced entry if `mounted.component` was present already, which the callers rule out beforehand.
	pub(crate) fn insert(&mut self, mounted: Mounted) -> Result<(), Mounted> {
		let key = ComponentKey::of(&mounted.component);
		match self.mounted.entry(key) {
			Entry::Occupied(_) => Err(mounted),
			Entry::Vacant(vacant) => {
				self.by_root.insert(mounted.root, key);
				if let Some(wrapper) = mounted.wrapper {
					self.by_wrapper.insert(wrapper, key);
				}
				vacant.insert(mounted);
				Ok(())
			}
		}
	}

	pub(crate) fn remove(&mut self, key: ComponentKey) -> Option<Mounted> {
		let mounted = self.mounted.remove(&key)?;
		self.by_root.remove(&mounted.root);
		if let Some(wrapper) = mounted.wrapper {
			self.by_wrapper.remove(&wrapper);
		}
		Some(mounted)
	}

	/// Removes the component instantiated by the `ComponentRoot` node `wrapper`, if it's still mounted.
	pub(crate) fn remove_by_wrapper(&mut self, wrapper: NodeId) -> Option<Mounted> {
		let key = *self.by_wrapper.get(&wrapper)?;
		self.remove(key)
	}

	/// Re-points `key` at a new root node, returning its wrapper (if any) so that can be re-pointed too.
	pub(crate) fn set_root(&mut self, key: ComponentKey, root: NodeId) -> Option<Option<NodeId>> {
		let mounted = self.mounted.get_mut(&key)?;
		self.by_root.remove(&mounted.root);
		self.by_root.insert(root, key);
		mounted.root = root;
		Some(mounted.wrapper)
	}
}
