use crate::{
	component::{ComponentKey, ComponentRef},
	error::{Error, Result},
	markup::{assign, Draft, Edit, Markup, Slot},
	node::{Attributes, NodeId, NodeKind},
	parse::RawNode,
	patch::{self, Intent, Patch},
};
use core::mem;
use tracing::{debug, error, instrument, trace, trace_span, warn};

/// Result of reconciling one stored node against its fresh render.
enum Outcome {
	/// Patches for this node and its descendants, in pre-order. Empty if nothing changed.
	Patched(Vec<Intent>),
	/// A text node changed. Text has no identity callers address, so the enclosing element is replaced instead.
	ReplaceParent,
}

impl Markup {
	/// Re-renders `component` and brings its stored tree up to date.
	///
	/// Returns the patches that bring a view of the previous tree up to date too, in depth-first pre-order.
	/// Identical markup yields no patches at all.
	///
	/// Patches never overlap: an element replaced in place carries its new attributes and its whole subtree, so neither gets patches of its own.
	/// A child that is replaced by a different kind of node is a separate target, though.
	/// If its parent's attributes changed as well, the parent's attribute-only patch is emitted first and the child's replace patch follows it.
	///
	/// Nothing stored is changed unless the whole update succeeds.
	/// Nested components that were assigned new attributes before a failure get their previous ones assigned back.
	///
	/// # Errors
	///
	/// - [`Error::NotMounted`] iff `component` isn't mounted, or a nested component with changed attributes was dismounted independently.
	/// - [`Error::AlreadyMounted`] if a newly instantiated nested component resolves to an instance that is mounted already.
	/// - [`Error::Render`], [`Error::MalformedMarkup`], [`Error::UnregisteredComponent`], [`Error::AttributeAssignment`] or [`Error::DepthLimitExceeded`]
	///   if rendering `component` or any affected nested component fails.
	#[instrument(skip(self, component))]
	pub fn update(&mut self, component: &ComponentRef) -> Result<Vec<Patch>> {
		let mut draft = Draft::default();
		let intents = match self.draft_update(ComponentKey::of(component), &mut draft, 0) {
			Ok(intents) => intents,
			Err(error) => {
				draft.revert();
				return Err(error);
			}
		};
		self.commit(draft);

		let patches = patch::emit(&self.store, intents);
		debug!("Updated component with {} patch(es).", patches.len());
		Ok(patches)
	}

	fn draft_update(&mut self, key: ComponentKey, draft: &mut Draft, depth: usize) -> Result<Vec<Intent>> {
		let (component, root) = match self.components.get(key) {
			Some(mounted) => (mounted.component.clone(), mounted.root),
			None => return Err(Error::NotMounted),
		};

		let raw = self.render_root(&component)?;
		Ok(match self.reconcile(root, raw, Slot::Root(key), draft, depth)? {
			Outcome::Patched(intents) => intents,
			Outcome::ReplaceParent => vec![Intent::Replace { target: root, node: root }],
		})
	}

	fn reconcile(&mut self, old: NodeId, new: RawNode, slot: Slot, draft: &mut Draft, depth: usize) -> Result<Outcome> {
		if depth >= self.config.depth_limit {
			error!("Depth limit reached");
			return Err(Error::DepthLimitExceeded(self.config.depth_limit));
		}

		let kind = match self.store.get(old) {
			Some(node) => node.kind.clone(),
			None => {
				error!("Stored node {} is missing. Treating its owner as dismounted.", old);
				return Err(Error::NotMounted);
			}
		};

		match (kind, new) {
			(NodeKind::Text(text), RawNode::Text(new_text)) => {
				let span = trace_span!("Diffing text node", %old);
				let _enter = span.enter();
				if text == new_text {
					return Ok(Outcome::Patched(Vec::new()));
				}

				if cfg!(feature = "dangerous-logging") {
					trace!("Text changed from {:?} to {:?}.", text, new_text);
				}
				draft.edits.push(Edit::Text { id: old, text: new_text });
				Ok(Outcome::ReplaceParent)
			}

			(
				NodeKind::Element { name, attributes, children },
				RawNode::Element {
					name: new_name,
					attributes: new_attributes,
					children: new_children,
				},
			) if name == new_name => {
				let span = trace_span!("Diffing element", %old, tag = name.as_str());
				let _enter = span.enter();
				self.reconcile_element(old, &attributes, children, new_attributes, new_children, draft, depth)
			}

			(NodeKind::ComponentRoot { name, attributes, .. }, RawNode::Element { name: new_name, attributes: new_attributes, .. }) if name == new_name => {
				let span = trace_span!("Diffing component root", %old, name = name.as_str());
				let _enter = span.enter();
				self.reconcile_component(old, &name, &attributes, new_attributes, draft, depth)
			}

			// Mismatching nodes: Destroy and rebuild.
			(_, new) => {
				let span = trace_span!("Replace mismatching", %old);
				let _enter = span.enter();
				let node = self.draft_node(new, draft, depth)?;
				draft.edits.push(Edit::Replace { slot, old, new: node });
				Ok(Outcome::Patched(vec![Intent::Replace { target: old, node }]))
			}
		}
	}

	#[allow(clippy::too_many_arguments)]
	fn reconcile_element(
		&mut self,
		id: NodeId,
		attributes: &Attributes,
		children: Vec<NodeId>,
		new_attributes: Attributes,
		new_children: Vec<RawNode>,
		draft: &mut Draft,
		depth: usize,
	) -> Result<Outcome> {
		let attributes_changed = *attributes != new_attributes;
		if attributes_changed {
			if cfg!(feature = "dangerous-logging") {
				trace!("Attributes changed from {:?} to {:?}.", attributes, new_attributes);
			} else {
				trace!("Attributes changed.");
			}
			draft.edits.push(Edit::Attributes { id, attributes: new_attributes });
		}

		if children.len() != new_children.len() {
			trace!("Child count changed from {} to {}. Replacing all children.", children.len(), new_children.len());
			let children = new_children
				.into_iter()
				.map(|child| self.draft_node(child, draft, depth + 1))
				.collect::<Result<_>>()?;
			draft.edits.push(Edit::Children { id, children });
			return Ok(Outcome::Patched(vec![Intent::Replace { target: id, node: id }]));
		}

		let mut intents = Vec::new();
		if attributes_changed {
			intents.push(Intent::Attributes { target: id });
		}

		let mut replace = false;
		for (index, (child, new_child)) in children.into_iter().zip(new_children).enumerate() {
			match self.reconcile(child, new_child, Slot::Child { parent: id, index }, draft, depth + 1)? {
				Outcome::Patched(child_intents) => intents.extend(child_intents),
				Outcome::ReplaceParent => replace = true,
			}
		}

		if replace {
			trace!("Text content changed. Replacing the element in place.");
			Ok(Outcome::Patched(vec![Intent::Replace { target: id, node: id }]))
		} else {
			Ok(Outcome::Patched(intents))
		}
	}

	/// Re-assigns changed attributes to a nested component and updates it.
	///
	/// Its patches stand on their own, so none is emitted for the `ComponentRoot` itself.
	fn reconcile_component(&mut self, id: NodeId, name: &str, attributes: &Attributes, new_attributes: Attributes, draft: &mut Draft, depth: usize) -> Result<Outcome> {
		if *attributes == new_attributes {
			trace!("Attributes unchanged. Skipping the nested component.");
			return Ok(Outcome::Patched(Vec::new()));
		}

		let component = match self.components.by_wrapper(id) {
			Some(mounted) => mounted.component.clone(),
			None => {
				warn!("Nested component <{}> at {} was dismounted independently and can't be updated.", name, id);
				return Err(Error::NotMounted);
			}
		};

		draft.reassigned.push((component.clone(), name.to_owned(), attributes.clone()));
		assign(&component, name, &new_attributes)?;
		draft.edits.push(Edit::Attributes { id, attributes: new_attributes });
		self.draft_update(ComponentKey::of(&component), draft, depth + 1).map(Outcome::Patched)
	}

	/// Carries out one committed edit.
	pub(crate) fn apply(&mut self, edit: Edit) {
		match edit {
			Edit::Text { id, text } => match self.store.get_mut(id).map(|node| &mut node.kind) {
				Some(NodeKind::Text(stored)) => *stored = text,
				_ => error!("Expected text node {} to update.", id),
			},

			Edit::Attributes { id, attributes } => match self.store.get_mut(id).map(|node| &mut node.kind) {
				Some(NodeKind::Element { attributes: stored, .. } | NodeKind::ComponentRoot { attributes: stored, .. }) => *stored = attributes,
				_ => error!("Expected element or component root {} to update attributes on.", id),
			},

			Edit::Children { id, children } => {
				let previous = match self.store.get_mut(id).map(|node| &mut node.kind) {
					Some(NodeKind::Element { children: stored, .. }) => mem::replace(stored, children),
					_ => return error!("Expected element {} to replace children of.", id),
				};
				let removed: usize = previous.into_iter().map(|child| self.teardown(child)).sum();
				trace!("Replaced children of {}, removing {} node(s).", id, removed);
			}

			Edit::Replace { slot, old, new } => {
				match slot {
					Slot::Child { parent, index } => match self.store.get_mut(parent).map(|node| &mut node.kind) {
						Some(NodeKind::Element { children, .. }) if children.get(index) == Some(&old) => children[index] = new,
						_ => error!("Expected {} to be child {} of element {}. Inserting its replacement nowhere.", old, index, parent),
					},
					Slot::Root(key) => match self.components.set_root(key, new) {
						Some(Some(wrapper)) => match self.store.get_mut(wrapper).map(|node| &mut node.kind) {
							Some(NodeKind::ComponentRoot { root, .. }) => *root = new,
							_ => error!("Expected component root {} to re-point at {}.", wrapper, new),
						},
						Some(None) => (),
						None => error!("Component with root {} isn't mounted anymore.", old),
					},
				}
				let removed = self.teardown(old);
				trace!("Replaced {} with {}, removing {} node(s).", old, new, removed);
			}
		}
	}
}
