//! Tests for text rendering and the termtree bridge

use rstest::{fixture, rstest};

use multitree::util::testing;
use multitree::{GlyphSet, MultiTree, RenderOptions, TreeConvert};

#[fixture]
fn languages() -> MultiTree<String> {
    testing::init_test_setup();
    let mut tree = MultiTree::new("Languages".to_string());
    let ids = tree
        .insert(tree.root(), ["Compiled".to_string(), "Interpreted".to_string()])
        .unwrap();
    tree.insert(ids[0], ["Java".to_string()]).unwrap();
    tree
}

// ============================================================
// render
// ============================================================

#[rstest]
fn given_languages_tree_when_rendering_then_matches_expected_layout(
    languages: MultiTree<String>,
) {
    let rendered = languages.render(&RenderOptions::default());

    assert_eq!(
        rendered,
        "Languages\n├── Compiled\n│    └── Java\n└── Interpreted"
    );
}

#[rstest]
fn given_same_tree_when_rendering_twice_then_output_is_identical(
    languages: MultiTree<String>,
) {
    let options = RenderOptions::default();

    assert_eq!(languages.render(&options), languages.render(&options));
    assert_eq!(languages.to_string(), languages.render(&options));
}

#[test]
fn given_single_node_when_rendering_then_only_the_label_is_printed() {
    let tree = MultiTree::new("alone");

    assert_eq!(tree.render(&RenderOptions::default()), "alone");
}

#[test]
fn given_deep_tree_when_rendering_then_closed_levels_are_blank() {
    // The vertical bar only continues below ancestors that have later siblings
    let mut tree = MultiTree::new("r");
    let top = tree.insert(tree.root(), ["a", "b"]).unwrap();
    let a_kids = tree.insert(top[0], ["a1", "a2"]).unwrap();
    tree.insert(a_kids[0], ["a1x"]).unwrap();
    let b_kids = tree.insert(top[1], ["b1"]).unwrap();
    tree.insert(b_kids[0], ["b1x"]).unwrap();

    let expected = [
        "r",
        "├── a",
        "│    ├── a1",
        "│    │    └── a1x",
        "│    └── a2",
        "└── b",
        "     └── b1",
        "          └── b1x",
    ]
    .join("\n");
    assert_eq!(tree.render(&RenderOptions::default()), expected);
}

#[rstest]
fn given_subtree_when_rendering_then_it_is_the_top_line(languages: MultiTree<String>) {
    let compiled = languages.root_node().child_at(0).unwrap();

    assert_eq!(compiled.to_string(), "Compiled\n└── Java");
}

#[rstest]
fn given_ascii_glyphs_when_rendering_then_uses_plain_characters(
    languages: MultiTree<String>,
) {
    let options = RenderOptions::default().with_glyphs(GlyphSet::Ascii);

    assert_eq!(
        languages.render(&options),
        "Languages\n+-- Compiled\n|    `-- Java\n`-- Interpreted"
    );
}

#[test]
fn given_control_characters_in_labels_when_rendering_then_they_are_escaped() {
    let mut tree = MultiTree::new("top\tline".to_string());
    tree.insert(tree.root(), ["two\nlines".to_string(), "cr\r".to_string()])
        .unwrap();

    let rendered = tree.render(&RenderOptions::default());

    assert_eq!(rendered, "top\\tline\n├── two\\nlines\n└── cr\\r");
    assert_eq!(rendered.lines().count(), 3);
}

#[test]
fn given_escape_disabled_when_rendering_then_labels_are_verbatim() {
    let mut tree = MultiTree::new("root".to_string());
    tree.insert(tree.root(), ["a\tb".to_string()]).unwrap();

    let rendered = tree.render(&RenderOptions::default().with_escape(false));

    assert_eq!(rendered, "root\n└── a\tb");
}

#[rstest]
fn given_writer_when_writing_tree_then_output_ends_with_newline(
    languages: MultiTree<String>,
) {
    let mut buffer = Vec::new();

    languages
        .write_to(&mut buffer, &RenderOptions::default())
        .unwrap();

    let written = String::from_utf8(buffer).unwrap();
    assert_eq!(written, format!("{}\n", languages));
}

#[test]
fn given_numeric_payloads_when_rendering_then_display_is_used() {
    let mut tree = MultiTree::new(1);
    tree.insert(tree.root(), [2, 3]).unwrap();

    assert_eq!(tree.to_string(), "1\n├── 2\n└── 3");
}

// ============================================================
// GlyphSet
// ============================================================

#[rstest]
#[case("unicode", GlyphSet::Unicode)]
#[case("ASCII", GlyphSet::Ascii)]
#[case(" ascii ", GlyphSet::Ascii)]
fn given_glyph_name_when_parsing_then_returns_glyph_set(
    #[case] input: &str,
    #[case] expected: GlyphSet,
) {
    assert_eq!(input.parse::<GlyphSet>().unwrap(), expected);
}

#[test]
fn given_unknown_glyph_name_when_parsing_then_fails() {
    assert!("braille".parse::<GlyphSet>().is_err());
}

// ============================================================
// termtree
// ============================================================

#[rstest]
fn given_tree_when_converting_to_termtree_then_shape_is_kept(languages: MultiTree<String>) {
    let converted = languages.to_termtree();

    assert_eq!(converted.root, "Languages");
    assert_eq!(converted.leaves.len(), 2);
    assert_eq!(converted.leaves[0].root, "Compiled");
    assert_eq!(converted.leaves[0].leaves[0].root, "Java");
    assert!(converted.leaves[1].leaves.is_empty());

    let drawn = converted.to_string();
    for label in ["Languages", "Compiled", "Java", "Interpreted"] {
        assert!(drawn.contains(label), "missing {label} in {drawn}");
    }
}

// ============================================================
// Deep trees
// ============================================================

#[test]
fn given_long_chain_on_small_stack_when_rendering_then_every_level_gets_a_line() {
    // Output grows quadratically with depth; a 64 KiB stack keeps the chain short
    let depth = 2_000;
    let mut tree = MultiTree::new(0);
    let mut tip = tree.root();
    for value in 1..depth {
        tip = tree.insert(tip, [value]).unwrap()[0];
    }

    let rendered = std::thread::Builder::new()
        .stack_size(64 * 1024)
        .spawn(move || tree.render(&RenderOptions::default()))
        .unwrap()
        .join()
        .expect("render must not overflow the stack");

    assert_eq!(rendered.lines().count(), depth);
    let last = rendered.lines().last().unwrap();
    assert_eq!(last, format!("{}└── {}", " ".repeat(5 * (depth - 2)), depth - 1));
}

#[test]
fn given_moderately_deep_chain_when_converting_to_termtree_then_depth_is_kept() {
    let mut tree = MultiTree::new(0);
    let mut tip = tree.root();
    for value in 1..200 {
        tip = tree.insert(tip, [value]).unwrap()[0];
    }

    let mut level = tree.to_termtree();
    let mut seen = 1;
    while let Some(next) = level.leaves.pop() {
        level = next;
        seen += 1;
    }

    assert_eq!(seen, 200);
    assert_eq!(level.root, "199");
}
