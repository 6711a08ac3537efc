use crate::node::Attributes;
use core::{cell::RefCell, fmt::Display, str::FromStr};
use std::rc::Rc;
use thiserror::Error;

/// Error type of the external render step.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A user-defined piece of markup with state.
///
/// Implementations are external collaborators of [`Markup`](`crate::Markup`):
/// they must not touch the markup tree they are mounted in, and should be side-effect-free with respect to it.
pub trait Component {
	/// Renders the current state into markup text with exactly one root element.
	///
	/// # Errors
	///
	/// Any failure of the template. Reported as [`Error::Render`](`crate::Error::Render`).
	fn render(&self) -> Result<String, BoxError>;

	/// Assigns attributes written by a parent's markup onto this component's fields.
	///
	/// Called once before a nested component is first rendered, and again whenever its parent re-renders with different attributes.
	/// The default implementation accepts no attributes at all.
	///
	/// # Errors
	///
	/// Iff a value can't be coerced into the corresponding field, or an attribute is unknown.
	fn assign(&mut self, attributes: &Attributes) -> Result<(), AttributeError> {
		match attributes.iter().next() {
			Some((name, value)) => Err(AttributeError::unknown(name, value)),
			None => Ok(()),
		}
	}
}

/// Shared handle to a component instance.
///
/// The caller keeps one to mutate state between updates, the [`Markup`](`crate::Markup`) keeps another while it's mounted.
pub type ComponentRef = Rc<RefCell<dyn Component>>;

/// Identity of a component instance: the address of its cell.
///
/// Stable while the instance is mounted, since the mounted component table holds a strong reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ComponentKey(*const ());
impl ComponentKey {
	pub(crate) fn of(component: &ComponentRef) -> Self {
		Self(Rc::as_ptr(component).cast())
	}
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Can't assign {value:?} to attribute `{name}`: {reason}")]
pub struct AttributeError {
	pub name: String,
	pub value: String,
	pub reason: String,
}
impl AttributeError {
	#[must_use]
	pub fn new(name: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			value: value.into(),
			reason: reason.into(),
		}
	}

	#[must_use]
	pub fn unknown(name: impl Into<String>, value: impl Into<String>) -> Self {
		Self::new(name, value, "unknown attribute")
	}
}

/// Coerces one attribute value into a field type.
///
/// # Errors
///
/// Iff `T` can't be parsed from `value`.
///
/// # Example
///
/// ```
/// use markup_reconcile::coerce;
///
/// assert_eq!(coerce::<u32>("count", "3"), Ok(3));
/// assert!(coerce::<bool>("hidden", "maybe").is_err());
/// ```
pub fn coerce<T>(name: &str, value: &str) -> Result<T, AttributeError>
where
	T: FromStr,
	T::Err: Display,
{
	value.parse().map_err(|error: T::Err| AttributeError::new(name, value, error.to_string()))
}
