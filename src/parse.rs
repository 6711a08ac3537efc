//! Turning markup text into raw node lists.

use crate::node::Attributes;
use std::borrow::Cow;
use thiserror::Error;
use tracing::{instrument, trace, warn};

/// A parsed but not yet mounted node.
///
/// Whether an element is a nested component is only decided while mounting, through the [`Registry`](`crate::Registry`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawNode {
	Text(String),
	Element {
		name: String,
		attributes: Attributes,
		children: Vec<RawNode>,
	},
}
impl RawNode {
	/// Shorthand for an [`RawNode::Element`] without attributes.
	#[must_use]
	pub fn element(name: impl Into<String>, children: Vec<RawNode>) -> Self {
		RawNode::Element {
			name: name.into(),
			attributes: Attributes::new(),
			children,
		}
	}

	#[must_use]
	pub fn text(text: impl Into<String>) -> Self {
		RawNode::Text(text.into())
	}
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Malformed markup: {0}")]
pub struct MalformedMarkup(pub String);

/// Parses markup text into the list of its top-level nodes.
///
/// Implementations only check syntax. Whether there is exactly one root element is checked by the caller.
pub trait Parser {
	/// # Errors
	///
	/// Iff `markup` isn't syntactically valid.
	fn parse(&self, markup: &str) -> Result<Vec<RawNode>, MalformedMarkup>;
}

/// HTML-ish [`Parser`] backed by [`html_parser`].
///
/// - Element and attribute names are kept as written.
///   That includes dotted element names like `<ui.button>`, which `html_parser` can't read on its own.
/// - Attributes without value are read as empty strings.
/// - Comments are dropped.
/// - Text is trimmed, and whitespace-only text is dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlParser;
impl Parser for HtmlParser {
	#[instrument(skip(markup), fields(markup.len = markup.len()))]
	fn parse(&self, markup: &str) -> Result<Vec<RawNode>, MalformedMarkup> {
		let (markup, dotted) = DottedNames::escape(markup);
		if !dotted.names.is_empty() {
			trace!("Escaped {} dotted element name(s).", dotted.names.len());
		}

		let dom = html_parser::Dom::parse(&markup).map_err(|error| MalformedMarkup(error.to_string()))?;
		for error in &dom.errors {
			warn!("Recovered from markup error: {}", error);
		}
		let nodes = load_child_nodes(dom.children, &dotted);
		trace!("Parsed {} top-level node(s).", nodes.len());
		Ok(nodes)
	}
}

/// Dotted element names, swapped out for placeholders `html_parser` accepts.
///
/// Placeholders are `prefix` followed by an index into `names`.
/// `prefix` doesn't occur anywhere in the original markup, so placeholders can't collide with names written there.
#[derive(Debug, Default)]
struct DottedNames {
	prefix: String,
	names: Vec<String>,
}
impl DottedNames {
	fn escape(markup: &str) -> (Cow<'_, str>, Self) {
		let mut dotted = Self::default();
		if !markup.contains('.') {
			return (Cow::Borrowed(markup), dotted);
		}

		dotted.prefix = "dotted-name-".to_owned();
		while markup.contains(dotted.prefix.as_str()) {
			dotted.prefix.insert(0, 'x');
		}

		let mut escaped = String::with_capacity(markup.len());
		let mut rest = markup;
		while let Some(open) = rest.find('<') {
			let (before, tag) = rest.split_at(open + 1);
			escaped.push_str(before);

			let slash = usize::from(tag.starts_with('/'));
			escaped.push_str(&tag[..slash]);
			let tag = &tag[slash..];

			let end = tag
				.find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':')))
				.unwrap_or(tag.len());
			let name = &tag[..end];
			if name.contains('.') && name.starts_with(|c: char| c.is_ascii_alphabetic()) {
				escaped.push_str(&dotted.placeholder(name));
			} else {
				escaped.push_str(name);
			}
			rest = &tag[end..];
		}
		escaped.push_str(rest);

		if dotted.names.is_empty() {
			(Cow::Borrowed(markup), dotted)
		} else {
			(Cow::Owned(escaped), dotted)
		}
	}

	fn placeholder(&mut self, name: &str) -> String {
		let index = match self.names.iter().position(|known| known == name) {
			Some(index) => index,
			None => {
				self.names.push(name.to_owned());
				self.names.len() - 1
			}
		};
		format!("{}{}", self.prefix, index)
	}

	fn restore(&self, name: String) -> String {
		if self.names.is_empty() {
			return name;
		}
		let original = name
			.strip_prefix(self.prefix.as_str())
			.and_then(|index| index.parse::<usize>().ok())
			.and_then(|index| self.names.get(index))
			.cloned();
		original.unwrap_or(name)
	}
}

fn load_child_nodes(child_nodes: Vec<html_parser::Node>, dotted: &DottedNames) -> Vec<RawNode> {
	child_nodes
		.into_iter()
		.filter_map(|child| match child {
			html_parser::Node::Element(element) => Some(load_element(element, dotted)),
			html_parser::Node::Text(text) => {
				let text = text.trim();
				(!text.is_empty()).then(|| RawNode::Text(text.to_owned()))
			}
			html_parser::Node::Comment(_) => None,
		})
		.collect()
}

fn load_element(element: html_parser::Element, dotted: &DottedNames) -> RawNode {
	RawNode::Element {
		attributes: load_attributes(&element),
		name: dotted.restore(element.name),
		children: load_child_nodes(element.children, dotted),
	}
}

/// `html_parser` splits `id` and `class` off into their own fields, so they are folded back in here.
fn load_attributes(element: &html_parser::Element) -> Attributes {
	let mut attributes: Attributes = element
		.attributes
		.iter()
		.map(|(name, value)| (name.clone(), value.clone().unwrap_or_default()))
		.collect();
	if let Some(id) = &element.id {
		attributes.insert("id".to_owned(), id.clone());
	}
	if !element.classes.is_empty() {
		attributes.insert("class".to_owned(), element.classes.join(" "));
	}
	attributes
}
