#![allow(dead_code)]

use markup_reconcile::{coerce, AttributeError, Attributes, BoxError, Component, ComponentRef, Factory, Markup, Patch, Tag};
use std::{
	cell::{Cell, RefCell},
	fmt::Write as _,
	rc::Rc,
};

pub fn init_tracing() {
	let _ = tracing_subscriber::fmt().with_max_level(tracing::Level::TRACE).with_test_writer().try_init();
}

pub fn factory() -> Rc<Factory> {
	let mut factory = Factory::new();
	factory.register::<Foo>("test-foo");
	factory.register::<Bar>("test-bar");
	factory.register::<Bar>("tests.bar");
	factory.register::<World>("test-world");
	factory.register::<Child>("child-compo");
	factory.register::<Shape>("test-shape");
	factory.register::<Recursive>("test-recursive");
	Rc::new(factory)
}

pub fn markup() -> Markup {
	init_tracing();
	Markup::new(factory())
}

/// Returns a typed handle for changing state, and the type-erased one the markup works with.
pub fn share<C: 'static + Component>(component: C) -> (Rc<RefCell<C>>, ComponentRef) {
	let typed = Rc::new(RefCell::new(component));
	let erased: ComponentRef = typed.clone();
	(typed, erased)
}

pub fn same(a: &ComponentRef, b: &ComponentRef) -> bool {
	Rc::as_ptr(a).cast::<()>() == Rc::as_ptr(b).cast::<()>()
}

/// Serializes a tag without its ids, with attributes sorted by name.
pub fn shape(tag: &Tag) -> String {
	let mut shape = String::new();
	write_shape(&mut shape, tag);
	shape
}

fn write_shape(shape: &mut String, tag: &Tag) {
	if tag.is_text() {
		shape.push_str(&tag.text);
		return;
	}

	let mut attributes: Vec<_> = tag.attributes.iter().collect();
	attributes.sort();
	write!(shape, "<{}", tag.name).unwrap();
	for (name, value) in attributes {
		write!(shape, " {}={:?}", name, value).unwrap();
	}
	shape.push('>');
	for child in &tag.children {
		write_shape(shape, child);
	}
	write!(shape, "</{}>", tag.name).unwrap();
}

/// Applies `patches` to a detached view the way a caller would, in order.
///
/// Panics if a target can't be found.
pub fn apply(view: &mut Tag, patches: &[Patch]) {
	for patch in patches {
		let target = find_mut(view, patch).unwrap_or_else(|| panic!("Patch target {} not in view", patch.target));
		if patch.replace {
			*target = patch.tag.clone();
		} else {
			target.attributes = patch.tag.attributes.clone();
		}
	}
}

fn find_mut<'a>(tag: &'a mut Tag, patch: &Patch) -> Option<&'a mut Tag> {
	if tag.id == patch.target {
		return Some(tag);
	}
	tag.children.iter_mut().find_map(|child| find_mut(child, patch))
}

/// Mounts `component` into a fresh tree and returns its shape there.
pub fn fresh_shape<C: 'static + Component>(component: C) -> String {
	let (_, component) = share(component);
	shape(&markup().mount(&component).unwrap())
}

#[derive(Debug, Default)]
pub struct Foo;
impl Component for Foo {
	fn render(&self) -> Result<String, BoxError> {
		Ok("<div><span>foo</span><test-bar></test-bar></div>".to_owned())
	}
}

#[derive(Debug, Default)]
pub struct Bar;
impl Component for Bar {
	fn render(&self) -> Result<String, BoxError> {
		Ok("<p>bar</p>".to_owned())
	}
}

thread_local! {
	pub static WORLD_RENDERS: Cell<usize> = Cell::new(0);
}

pub fn world_renders() -> usize {
	WORLD_RENDERS.with(Cell::get)
}

#[derive(Debug, Default, Clone)]
pub struct World {
	pub name: String,
	pub count: u32,
	pub fail: bool,
}
impl Component for World {
	fn render(&self) -> Result<String, BoxError> {
		WORLD_RENDERS.with(|renders| renders.set(renders.get() + 1));
		if self.fail {
			return Err("world failed to render".into());
		}
		Ok(format!("<div>{}</div>", self.name))
	}

	fn assign(&mut self, attributes: &Attributes) -> Result<(), AttributeError> {
		*self = World::default();
		for (name, value) in attributes {
			match name.as_str() {
				"name" => self.name = value.clone(),
				"count" => self.count = coerce(name, value)?,
				"fail" => self.fail = coerce(name, value)?,
				_ => return Err(AttributeError::unknown(name, value)),
			}
		}
		Ok(())
	}
}

#[derive(Debug, Default, Clone)]
pub struct Hello {
	pub greeting: String,
	pub name: String,
	pub placeholder: String,
	pub text_bye: bool,
	pub tmpl_err: bool,
	pub child_err: bool,
	pub compo_field_err: bool,
}
impl Component for Hello {
	fn render(&self) -> Result<String, BoxError> {
		if self.tmpl_err {
			return Err("unterminated template action".into());
		}

		let greeting = if self.greeting.is_empty() { "Hello" } else { &self.greeting };
		let label = if self.placeholder.is_empty() {
			"<label>Name</label>".to_owned()
		} else {
			format!(r#"<label title="{}">Name</label>"#, self.placeholder)
		};
		let world = if self.name.is_empty() {
			"<span>World</span>".to_owned()
		} else {
			let mut attributes = format!(r#"name="{}""#, self.name);
			if self.child_err {
				attributes.push_str(r#" fail="true""#);
			}
			if self.compo_field_err {
				attributes.push_str(r#" count="many""#);
			}
			format!("<test-world {}></test-world>", attributes)
		};
		let bye = if self.text_bye { "Goodbye" } else { "<span>Good</span><p>bye</p>" };

		Ok(format!("<div><h1>{}</h1>{}<div>{}</div>{}</div>", greeting, label, world, bye))
	}
}

/// Renders `<div><span>A</span><child-compo …></child-compo></div>`.
#[derive(Debug, Default, Clone)]
pub struct Parent {
	pub x: String,
	pub echo: bool,
}
impl Component for Parent {
	fn render(&self) -> Result<String, BoxError> {
		let echo = if self.echo { r#" echo="true""# } else { "" };
		Ok(format!(r#"<div><span>A</span><child-compo x="{}"{}></child-compo></div>"#, self.x, echo))
	}
}

/// Renders `x` as attribute, and also as text if `echo` is set.
#[derive(Debug, Default)]
pub struct Child {
	pub x: String,
	pub echo: bool,
}
impl Component for Child {
	fn render(&self) -> Result<String, BoxError> {
		let text = if self.echo { self.x.as_str() } else { "child" };
		Ok(format!(r#"<p data-x="{}">{}</p>"#, self.x, text))
	}

	fn assign(&mut self, attributes: &Attributes) -> Result<(), AttributeError> {
		self.x = attributes.get("x").cloned().unwrap_or_default();
		self.echo = match attributes.get("echo") {
			Some(echo) => coerce("echo", echo)?,
			None => false,
		};
		Ok(())
	}
}

/// Renders its root as `<tag>`, wrapped in a parent with `nested`.
#[derive(Debug, Clone)]
pub struct Shape {
	pub tag: String,
	pub nested: bool,
}
impl Default for Shape {
	fn default() -> Self {
		Self {
			tag: "div".to_owned(),
			nested: false,
		}
	}
}
impl Component for Shape {
	fn render(&self) -> Result<String, BoxError> {
		if self.nested {
			Ok(format!(r#"<main><test-shape tag="{}"></test-shape></main>"#, self.tag))
		} else {
			Ok(format!("<{0}>shape</{0}>", self.tag))
		}
	}

	fn assign(&mut self, attributes: &Attributes) -> Result<(), AttributeError> {
		for (name, value) in attributes {
			match name.as_str() {
				"tag" => self.tag = value.clone(),
				_ => return Err(AttributeError::unknown(name, value)),
			}
		}
		Ok(())
	}
}

/// Three elements with independent attributes.
#[derive(Debug, Default, Clone)]
pub struct Grid {
	pub a: u32,
	pub b: u32,
	pub c: u32,
}
impl Component for Grid {
	fn render(&self) -> Result<String, BoxError> {
		Ok(format!(r#"<ul data-a="{}"><li data-b="{}">b</li><li data-c="{}">c</li></ul>"#, self.a, self.b, self.c))
	}
}

/// An attribute on the root plus a child whose element kind flips.
#[derive(Debug, Default, Clone)]
pub struct Toggle {
	pub title: String,
	pub strong: bool,
}
impl Component for Toggle {
	fn render(&self) -> Result<String, BoxError> {
		let child = if self.strong { "<strong>x</strong>" } else { "<em>x</em>" };
		Ok(format!(r#"<div title="{}">{}<span>y</span></div>"#, self.title, child))
	}
}

#[derive(Debug, Default)]
pub struct Recursive;
impl Component for Recursive {
	fn render(&self) -> Result<String, BoxError> {
		Ok("<div><test-recursive></test-recursive></div>".to_owned())
	}
}

/// Renders whatever it was constructed with.
#[derive(Debug, Default)]
pub struct Fixed(pub &'static str);
impl Component for Fixed {
	fn render(&self) -> Result<String, BoxError> {
		Ok(self.0.to_owned())
	}
}
