use crate::{
	component::{ComponentKey, ComponentRef},
	error::{Error, Result},
	node::{Attributes, Node, NodeId},
	parse::{HtmlParser, MalformedMarkup, Parser, RawNode},
	patch::Tag,
	registry::Registry,
	store::NodeStore,
	table::{ComponentTable, Mounted},
};
use core::fmt;
use hashbrown::HashSet;
use std::rc::Rc;
use tracing::{error, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
	/// How deep rendered markup may nest, counting element and component levels alike.
	///
	/// Mainly guards against components that (indirectly) contain themselves.
	pub depth_limit: usize,
}
impl Default for Config {
	fn default() -> Self {
		Self { depth_limit: 256 }
	}
}

/// A live tree of mounted components.
///
/// # Correct Use
///
/// All calls against one instance must be serialized, as [`update`](`Markup::update`) reads and rewrites the tree in one go.
/// Since components are held as [`Rc`]s, this type is neither [`Send`] nor [`Sync`], which enforces that within safe Rust.
///
/// The registry and the components' render and assignment methods must not call back into the same [`Markup`].
pub struct Markup {
	pub(crate) store: NodeStore,
	pub(crate) components: ComponentTable,
	pub(crate) registry: Rc<dyn Registry>,
	pub(crate) parser: Box<dyn Parser>,
	pub(crate) config: Config,
}
impl Markup {
	/// Creates an empty tree that resolves component tags through `registry` and parses renders with [`HtmlParser`].
	#[must_use]
	pub fn new(registry: Rc<dyn Registry>) -> Self {
		Self {
			store: NodeStore::new(),
			components: ComponentTable::default(),
			registry,
			parser: Box::new(HtmlParser),
			config: Config::default(),
		}
	}

	#[must_use]
	pub fn with_parser(mut self, parser: impl 'static + Parser) -> Self {
		self.parser = Box::new(parser);
		self
	}

	#[must_use]
	pub fn with_config(mut self, config: Config) -> Self {
		self.config = config;
		self
	}

	#[must_use]
	pub fn config(&self) -> &Config {
		&self.config
	}

	/// Read-only access to the node arena, for lookups by [`NodeId`].
	#[must_use]
	pub fn store(&self) -> &NodeStore {
		&self.store
	}

	#[must_use]
	pub fn contains(&self, component: &ComponentRef) -> bool {
		self.components.contains(ComponentKey::of(component))
	}

	/// Snapshots the current tree of `component`.
	///
	/// # Errors
	///
	/// [`Error::NotMounted`] iff `component` isn't mounted.
	pub fn root(&self, component: &ComponentRef) -> Result<Tag> {
		let mounted = self.components.get(ComponentKey::of(component)).ok_or(Error::NotMounted)?;
		self.store.snapshot(mounted.root).ok_or(Error::NotMounted)
	}

	/// Looks up the component owning a node.
	///
	/// `id` can be the root node of any mounted component, or the `ComponentRoot` node instantiating a nested one.
	#[must_use]
	pub fn component(&self, id: NodeId) -> Option<ComponentRef> {
		self.components.by_node(id).map(|mounted| mounted.component.clone())
	}

	/// The number of mounted components, nested ones included.
	#[must_use]
	pub fn len(&self) -> usize {
		self.components.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.components.len() == 0
	}

	/// Renders `component` and parses the result down to its single root element.
	pub(crate) fn render_root(&self, component: &ComponentRef) -> Result<RawNode> {
		let markup = component.borrow().render().map_err(Error::Render)?;
		if cfg!(feature = "dangerous-logging") {
			trace!(%markup, "Rendered.");
		}

		let mut nodes = self.parser.parse(&markup)?.into_iter();
		match (nodes.next(), nodes.next()) {
			(Some(root @ RawNode::Element { .. }), None) => Ok(root),
			(Some(RawNode::Text(_)), None) => Err(MalformedMarkup("The root node is text rather than an element.".to_owned()).into()),
			(None, _) => Err(MalformedMarkup("There is no root node.".to_owned()).into()),
			(Some(_), Some(_)) => Err(MalformedMarkup(format!("Expected one root node but found {}.", 2 + nodes.count())).into()),
		}
	}

	/// Claims `component` for a new mount in `draft`.
	///
	/// # Errors
	///
	/// [`Error::AlreadyMounted`] iff `component` is mounted already or was claimed earlier in the same draft.
	pub(crate) fn reserve(&self, component: &ComponentRef, draft: &mut Draft) -> Result<()> {
		let key = ComponentKey::of(component);
		if self.components.contains(key) || !draft.reserved.insert(key) {
			return Err(Error::AlreadyMounted);
		}
		Ok(())
	}

	/// Writes a fully validated draft into the store and the component table.
	pub(crate) fn commit(&mut self, draft: Draft) {
		let Draft { nodes, mounts, edits, .. } = draft;
		trace!("Committing {} node(s), {} edit(s) and {} mount(s).", nodes.len(), edits.len(), mounts.len());

		for node in nodes {
			self.store.insert(node);
		}
		for edit in edits {
			self.apply(edit);
		}
		for mounted in mounts {
			if let Err(mounted) = self.components.insert(mounted) {
				error!("Drafted component with root {} was mounted already. Keeping the earlier mount.", mounted.root);
			}
		}
	}
}
impl fmt::Debug for Markup {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Markup")
			.field("store", &self.store)
			.field("components.len()", &self.components.len())
			.field("config", &self.config)
			.finish_non_exhaustive()
	}
}

/// Assigns `attributes` onto a (nested) component instantiated as `<name>`.
pub(crate) fn assign(component: &ComponentRef, name: &str, attributes: &Attributes) -> Result<()> {
	component.borrow_mut().assign(attributes).map_err(|source| Error::AttributeAssignment {
		component: name.to_owned(),
		source,
	})
}

/// Nodes, edits and mounts of one top-level call, collected before anything stored is touched.
///
/// Dropping a draft discards it. Only the node ids it allocated are lost.
#[derive(Default)]
pub(crate) struct Draft {
	pub(crate) nodes: Vec<Node>,
	/// Components claimed by this draft, including those whose mount is still being drafted.
	pub(crate) reserved: HashSet<ComponentKey>,
	pub(crate) mounts: Vec<Mounted>,
	pub(crate) edits: Vec<Edit>,
	/// Already mounted components that were assigned new attributes, with their previous ones.
	pub(crate) reassigned: Vec<(ComponentRef, String, Attributes)>,
}
impl Draft {
	/// Discards the draft, restoring the previous attributes of re-assigned components (latest first).
	pub(crate) fn revert(self) {
		for (component, name, attributes) in self.reassigned.into_iter().rev() {
			if let Err(error) = assign(&component, &name, &attributes) {
				error!("Failed to restore the previous attributes of <{}>: {}", name, error);
			}
		}
	}
}

pub(crate) enum Edit {
	Text { id: NodeId, text: String },
	Attributes { id: NodeId, attributes: Attributes },
	/// The previous children are torn down.
	Children { id: NodeId, children: Vec<NodeId> },
	/// `old` is torn down after `new` took its place.
	Replace { slot: Slot, old: NodeId, new: NodeId },
}

/// Where a node hangs in the tree.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Slot {
	Child { parent: NodeId, index: usize },
	/// The root of a mounted component, nested or not.
	Root(ComponentKey),
}
