use crate::component::{Component, ComponentRef};
use core::{cell::RefCell, fmt};
use hashbrown::HashMap;
use std::rc::Rc;

/// Resolves tag names to fresh component instances.
///
/// This is the only way a [`Markup`](`crate::Markup`) learns about component types.
pub trait Registry {
	/// Whether `name` denotes a component rather than a plain element.
	///
	/// A component name that doesn't [`resolve`](`Registry::resolve`) fails the render as unregistered.
	/// By default, these are custom-element-style names containing `-` or namespaced ones containing `.`.
	fn is_component(&self, name: &str) -> bool {
		name.contains('-') || name.contains('.')
	}

	/// Constructs a new, unmounted instance of the component type registered as `name`.
	fn resolve(&self, name: &str) -> Option<ComponentRef>;
}

type Constructor = Box<dyn Fn() -> ComponentRef>;

/// A [`Registry`] backed by a table of constructors.
///
/// Can be shared between any number of [`Markup`](`crate::Markup`)s via [`Rc`].
#[derive(Default)]
pub struct Factory {
	constructors: HashMap<String, Constructor>,
}
impl Factory {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `C` under `name`, constructed through [`Default`].
	///
	/// Returns `true` iff a previous registration was replaced.
	pub fn register<C: 'static + Component + Default>(&mut self, name: impl Into<String>) -> bool {
		self.register_with(name, || -> ComponentRef { Rc::new(RefCell::new(C::default())) })
	}

	/// Returns `true` iff a previous registration was replaced.
	pub fn register_with(&mut self, name: impl Into<String>, constructor: impl 'static + Fn() -> ComponentRef) -> bool {
		self.constructors.insert(name.into(), Box::new(constructor)).is_some()
	}

	#[must_use]
	pub fn contains(&self, name: &str) -> bool {
		self.constructors.contains_key(name)
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.constructors.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.constructors.is_empty()
	}
}
impl Registry for Factory {
	fn resolve(&self, name: &str) -> Option<ComponentRef> {
		self.constructors.get(name).map(|constructor| constructor())
	}
}
impl fmt::Debug for Factory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_set().entries(self.constructors.keys()).finish()
	}
}
