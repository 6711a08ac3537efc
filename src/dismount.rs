use crate::{
	component::{ComponentKey, ComponentRef},
	markup::Markup,
	node::{NodeId, NodeKind},
};
use tracing::{debug, instrument, trace, trace_span};

impl Markup {
	/// Removes `component`, its tree and every component nested in it.
	///
	/// Does nothing if `component` isn't mounted.
	///
	/// Dismounting a nested component on its own leaves the `ComponentRoot` node in its parent's tree dangling.
	/// That parent can still be dismounted, but updating it in a way that touches the missing component fails with [`Error::NotMounted`](`crate::Error::NotMounted`).
	#[instrument(skip(self, component))]
	pub fn dismount(&mut self, component: &ComponentRef) {
		let mounted = match self.components.remove(ComponentKey::of(component)) {
			Some(mounted) => mounted,
			None => return trace!("Not mounted. Nothing to do."),
		};

		if let Some(wrapper) = mounted.wrapper {
			trace!(%wrapper, "Dismounting nested component out from under its parent.");
		}

		let removed = self.teardown(mounted.root);
		debug!("Dismounted component, removing {} node(s). {} component(s) are mounted now.", removed, self.len());
	}

	/// Removes the node `id` and everything below it, dismounting nested components on the way.
	///
	/// Nodes that are gone already are skipped. Returns how many nodes were removed.
	pub(crate) fn teardown(&mut self, id: NodeId) -> usize {
		let node = match self.store.remove(id) {
			Some(node) => node,
			None => {
				trace!(%id, "Node is gone already.");
				return 0;
			}
		};

		1 + match node.kind {
			NodeKind::Text(_) => 0,
			NodeKind::Element { children, .. } => children.into_iter().map(|child| self.teardown(child)).sum(),
			NodeKind::ComponentRoot { name, root, .. } => {
				let span = trace_span!("Dismounting nested component", %id, name = name.as_str());
				let _enter = span.enter();
				if self.components.remove_by_wrapper(id).is_none() {
					trace!("Nested component was dismounted already.");
				}
				self.teardown(root)
			}
		}
	}
}
