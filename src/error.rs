use crate::{
	component::{AttributeError, BoxError},
	parse::MalformedMarkup,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
	#[error("Component is already mounted")]
	AlreadyMounted,

	#[error("Component is not mounted")]
	NotMounted,

	#[error("Render failed")]
	Render(#[source] BoxError),

	#[error(transparent)]
	MalformedMarkup(#[from] MalformedMarkup),

	#[error("Component `{0}` is not registered")]
	UnregisteredComponent(String),

	#[error("Assigning attributes to `{component}` failed")]
	AttributeAssignment {
		component: String,
		#[source]
		source: AttributeError,
	},

	/// Markup (usually a component that contains itself) nests deeper than [`Config::depth_limit`](`crate::Config::depth_limit`).
	#[error("Depth limit of {0} reached")]
	DepthLimitExceeded(usize),
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
