//! Tests for shallow and deep label lookup

use rstest::{fixture, rstest};

use multitree::util::testing;
use multitree::MultiTree;

/// Languages
/// ├── Compiled
/// │    └── Java
/// └── Interpreted
///      └── Python
#[fixture]
fn languages() -> MultiTree<String> {
    testing::init_test_setup();
    let mut tree = MultiTree::new("Languages".to_string());
    let ids = tree
        .insert(tree.root(), ["Compiled".to_string(), "Interpreted".to_string()])
        .unwrap();
    tree.insert(ids[0], ["Java".to_string()]).unwrap();
    tree.insert(ids[1], ["Python".to_string()]).unwrap();
    tree
}

fn s(value: &str) -> String {
    value.to_string()
}

// ============================================================
// search_children
// ============================================================

#[rstest]
fn given_direct_child_when_searching_children_then_returns_it(languages: MultiTree<String>) {
    let found = languages.search_children(&s("Compiled")).unwrap();

    assert_eq!(found.value(), "Compiled");
    assert_eq!(found.parent().unwrap().id(), languages.root());
}

#[rstest]
#[case::grandchild("Java")]
#[case::root_itself("Languages")]
#[case::absent("Rust")]
fn given_value_not_among_direct_children_when_searching_children_then_none(
    languages: MultiTree<String>,
    #[case] value: &str,
) {
    assert!(languages.search_children(&s(value)).is_none());
}

#[rstest]
fn given_inner_node_when_searching_its_children_then_only_its_level_is_seen(
    languages: MultiTree<String>,
) {
    let compiled = languages.search_children(&s("Compiled")).unwrap();

    assert_eq!(compiled.search_children(&s("Java")).unwrap().value(), "Java");
    assert!(compiled.search_children(&s("Python")).is_none());
}

// ============================================================
// deep_search
// ============================================================

#[rstest]
fn given_grandchild_when_deep_searching_then_finds_it_with_parent_link(
    languages: MultiTree<String>,
) {
    let java = languages.deep_search(&s("Java")).unwrap();

    assert_eq!(java.value(), "Java");
    assert_eq!(java.parent().unwrap().value(), "Compiled");
}

#[rstest]
fn given_value_of_start_node_when_deep_searching_then_returns_start(
    languages: MultiTree<String>,
) {
    let found = languages.deep_search(&s("Languages")).unwrap();

    assert_eq!(found.id(), languages.root());
}

#[rstest]
fn given_absent_value_when_deep_searching_then_none(languages: MultiTree<String>) {
    assert!(languages.deep_search(&s("Rust")).is_none());
}

#[rstest]
fn given_subtree_when_deep_searching_from_it_then_other_branches_are_invisible(
    languages: MultiTree<String>,
) {
    let compiled = languages.search_children(&s("Compiled")).unwrap();

    assert!(compiled.deep_search(&s("Python")).is_none());
    assert_eq!(compiled.deep_search(&s("Java")).unwrap().value(), "Java");
}

#[test]
fn given_value_on_several_depths_when_deep_searching_then_shallowest_wins() {
    // root
    // ├── a
    // │    └── b
    // │         └── x   (depth 3)
    // └── c
    //      └── x        (depth 2)
    let mut tree = MultiTree::new("root");
    let top = tree.insert(tree.root(), ["a", "c"]).unwrap();
    let b = tree.insert(top[0], ["b"]).unwrap();
    tree.insert(b[0], ["x"]).unwrap();
    let shallow = tree.insert(top[1], ["x"]).unwrap();

    let found = tree.deep_search(&"x").unwrap();

    assert_eq!(found.id(), shallow[0]);
    assert_eq!(found.depth(), 2);
}

#[test]
fn given_value_twice_on_same_depth_when_deep_searching_then_earlier_subtree_wins() {
    let mut tree = MultiTree::new("root");
    let top = tree.insert(tree.root(), ["a", "b"]).unwrap();
    let first = tree.insert(top[0], ["x"]).unwrap();
    tree.insert(top[1], ["x"]).unwrap();

    let found = tree.deep_search(&"x").unwrap();

    assert_eq!(found.id(), first[0]);
    assert_eq!(*found.parent().unwrap().value(), "a");
}

#[test]
fn given_renamed_node_when_deep_searching_then_new_value_is_found() {
    let mut tree = MultiTree::new("root");
    let top = tree.insert(tree.root(), ["a"]).unwrap();
    let leaf = tree.insert(top[0], ["old"]).unwrap();

    tree.set_value(leaf[0], "new").unwrap();

    assert!(tree.deep_search(&"old").is_none());
    assert_eq!(tree.deep_search(&"new").unwrap().id(), leaf[0]);
}
