use crate::{
	component::ComponentRef,
	error::{Error, Result},
	markup::{assign, Draft, Markup},
	node::{Node, NodeId, NodeKind},
	parse::RawNode,
	patch::Tag,
	table::Mounted,
};
use tracing::{debug, error, instrument, trace, trace_span, warn};

impl Markup {
	/// Renders `component` and everything nested in it into the tree.
	///
	/// On failure, nothing is left behind.
	///
	/// # Errors
	///
	/// - [`Error::AlreadyMounted`] if `component` is mounted already,
	///   or if the registry resolves a nested component tag to an instance that is mounted already or claimed twice by this render.
	/// - [`Error::Render`], [`Error::MalformedMarkup`], [`Error::UnregisteredComponent`], [`Error::AttributeAssignment`] or [`Error::DepthLimitExceeded`]
	///   if rendering `component` or any nested component fails.
	#[instrument(skip(self, component))]
	pub fn mount(&mut self, component: &ComponentRef) -> Result<Tag> {
		let mut draft = Draft::default();
		self.reserve(component, &mut draft)?;
		let root = self.draft_component(component, None, &mut draft, 0)?;
		self.commit(draft);
		debug!(%root, "Mounted component. {} component(s) are mounted now.", self.len());

		self.store.snapshot(root).ok_or(Error::NotMounted)
	}

	/// Drafts the subtree of a component that isn't mounted yet, and schedules its mount.
	///
	/// `component` must be [`reserve`](`Markup::reserve`)d in `draft` already.
	pub(crate) fn draft_component(&mut self, component: &ComponentRef, wrapper: Option<NodeId>, draft: &mut Draft, depth: usize) -> Result<NodeId> {
		let raw = self.render_root(component)?;
		let root = self.draft_node(raw, draft, depth)?;
		draft.mounts.push(Mounted {
			component: component.clone(),
			root,
			wrapper,
		});
		Ok(root)
	}

	/// Drafts new nodes for `raw` and everything below it, instantiating nested components along the way.
	pub(crate) fn draft_node(&mut self, raw: RawNode, draft: &mut Draft, depth: usize) -> Result<NodeId> {
		if depth >= self.config.depth_limit {
			error!("Depth limit reached");
			return Err(Error::DepthLimitExceeded(self.config.depth_limit));
		}

		let id = self.store.allocate();
		let kind = match raw {
			RawNode::Text(text) => {
				if cfg!(feature = "dangerous-logging") {
					trace!(%id, %text, "Creating text node");
				}
				NodeKind::Text(text)
			}

			RawNode::Element { name, attributes, children } if self.registry.is_component(&name) => {
				let span = trace_span!("Creating component root", %id, name = name.as_str());
				let _enter = span.enter();

				if !children.is_empty() {
					warn!("Ignoring {} child node(s) of component tag <{}>.", children.len(), name);
				}

				let component = self.registry.resolve(&name).ok_or_else(|| Error::UnregisteredComponent(name.clone()))?;
				if let Err(error) = self.reserve(&component, draft) {
					warn!("Registry resolved <{}> to a component instance that is mounted already.", name);
					return Err(error);
				}
				assign(&component, &name, &attributes)?;
				let root = self.draft_component(&component, Some(id), draft, depth + 1)?;
				NodeKind::ComponentRoot { name, attributes, root }
			}

			RawNode::Element { name, attributes, children } => {
				let span = trace_span!("Creating element", %id, name = name.as_str(), "children.len()" = children.len());
				let _enter = span.enter();

				let children = children
					.into_iter()
					.map(|child| self.draft_node(child, draft, depth + 1))
					.collect::<Result<_>>()?;
				NodeKind::Element { name, attributes, children }
			}
		};

		draft.nodes.push(Node { id, kind });
		Ok(id)
	}
}
