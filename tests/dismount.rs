mod components_;
use components_::*;

#[test]
fn everything() {
	let mut markup = markup();
	let (_, foo) = share(Foo);
	let root = markup.mount(&foo).unwrap();
	let bar = markup.component(root.children[1].id).unwrap();

	markup.dismount(&foo);
	assert!(!markup.contains(&foo));
	assert!(!markup.contains(&bar));
	assert!(markup.is_empty());
	assert!(markup.store().is_empty());
	assert!(markup.component(root.id).is_none());
}

#[test]
fn not_mounted_is_a_no_op() {
	let mut markup = markup();
	let (_, foo) = share(Foo);
	let (_, bar) = share(Bar);
	markup.mount(&foo).unwrap();

	markup.dismount(&bar);
	assert_eq!(markup.len(), 2);
	assert_eq!(markup.store().len(), 6);

	markup.dismount(&foo);
	markup.dismount(&foo);
	assert!(markup.store().is_empty());
}

#[test]
fn only_the_given_component() {
	let mut markup = markup();
	let (_, first) = share(Foo);
	let (_, second) = share(Bar);
	markup.mount(&first).unwrap();
	let second_root = markup.mount(&second).unwrap();

	markup.dismount(&first);
	assert_eq!(markup.len(), 1);
	assert_eq!(markup.root(&second).unwrap(), second_root);
	assert_eq!(markup.store().len(), 2);
}

#[test]
fn nested_then_parent() {
	let mut markup = markup();
	let (_, foo) = share(Foo);
	let root = markup.mount(&foo).unwrap();
	let wrapper = &root.children[1];
	let bar = markup.component(wrapper.id).unwrap();

	markup.dismount(&bar);
	assert_eq!(markup.len(), 1);
	assert!(!markup.store().contains(wrapper.children[0].id));
	// The component tag itself stays behind in the parent, dangling.
	assert!(markup.store().contains(wrapper.id));
	assert_eq!(shape(&markup.root(&foo).unwrap()), "<div><span>foo</span><test-bar></test-bar></div>");
	assert!(markup.component(wrapper.id).is_none());

	markup.dismount(&foo);
	assert!(markup.is_empty());
	assert!(markup.store().is_empty());
}

#[test]
fn remount() {
	let mut markup = markup();
	let (_, foo) = share(Foo);
	let first = markup.mount(&foo).unwrap();
	markup.dismount(&foo);

	let second = markup.mount(&foo).unwrap();
	assert_eq!(shape(&first), shape(&second));
	assert!(second.id > first.id);
	assert!(markup.store().get(first.id).is_none());
}

#[test]
fn replaced_nested_component_is_dismounted() {
	let mut markup = markup();
	let (state, hello) = share(Hello {
		name: "Ferris".to_owned(),
		..Hello::default()
	});
	let root = markup.mount(&hello).unwrap();
	let world = markup.component(root.children[2].children[0].id).unwrap();
	assert_eq!(markup.len(), 2);

	state.borrow_mut().name = String::new();
	markup.update(&hello).unwrap();
	assert!(!markup.contains(&world));
	assert_eq!(markup.len(), 1);

	markup.dismount(&hello);
	assert!(markup.store().is_empty());
}
