use rstest::rstest;
use serde_json::{json, Value};

use treestore::tree_traits::ELIDED_LABEL;
use treestore::{DisplayConfig, Settings, TreeBuilder, TreeRender, TreeStore};

fn chain(len: i64) -> Vec<Value> {
    let mut input = vec![json!({"id": 0, "parent": "root"})];
    input.extend((1..len).map(|i| json!({"id": i, "parent": i - 1})));
    input
}

fn small_tree() -> Vec<Value> {
    vec![
        json!({"id": 1, "parent": "root"}),
        json!({"id": 2, "parent": 1}),
        json!({"id": 3, "parent": 1}),
        json!({"id": 4, "parent": 2}),
    ]
}

fn with_display(display: DisplayConfig) -> TreeBuilder {
    TreeBuilder::with_settings(Settings {
        display,
        ..Settings::default()
    })
}

#[test]
fn given_store_when_rendering_then_tree_follows_children_order() {
    let store = TreeStore::from_values(small_tree()).unwrap();

    let rendered = store.to_tree_string().to_string();

    assert_eq!(
        rendered.lines().collect::<Vec<_>>(),
        vec!["1", "├── 2", "│   └── 4", "└── 3"]
    );
}

#[test]
fn given_store_when_rendering_text_then_matches_termtree_output() {
    let store = TreeStore::from_values(small_tree()).unwrap();

    assert_eq!(store.render(), store.to_tree_string().to_string());
}

#[test]
fn given_orphans_when_rendering_then_only_rooted_tree_is_shown() {
    let store = TreeStore::from_values(vec![
        json!({"id": 1, "parent": "root"}),
        json!({"id": 2, "parent": 99}),
    ])
    .unwrap();

    assert_eq!(store.to_tree_string().to_string().lines().collect::<Vec<_>>(), vec!["1"]);
    assert_eq!(store.render(), "1\n");
}

#[test]
fn given_rootless_store_when_rendering_then_uses_configured_label() {
    let store = with_display(DisplayConfig {
        empty_label: "(no root)".into(),
        ..DisplayConfig::default()
    })
    .build_from_values(vec![json!({"id": 1, "parent": 1})])
    .unwrap();

    assert_eq!(store.to_tree_string().to_string().trim_end(), "(no root)");
    assert_eq!(store.render(), "(no root)\n");
}

#[rstest]
#[case(2, vec!["1", "├── 2", "│   └── …", "└── 3"])]
#[case(1, vec!["1", "└── …"])]
#[case(0, vec!["1", "└── …"])]
fn given_max_depth_when_building_tree_then_deeper_levels_are_elided(
    #[case] max_depth: usize,
    #[case] expected: Vec<&str>,
) {
    let store = with_display(DisplayConfig {
        max_depth,
        ..DisplayConfig::default()
    })
    .build_from_values(small_tree())
    .unwrap();

    let rendered = store.to_tree_string().to_string();

    assert_eq!(rendered.lines().collect::<Vec<_>>(), expected);
    // text rendering ignores the cap
    assert_eq!(store.render().lines().count(), 4);
}

#[test]
fn given_chain_within_max_depth_when_building_tree_then_nothing_is_elided() {
    let store = TreeStore::from_values(chain(512)).unwrap();

    let rendered = store.to_tree_string().to_string();

    assert_eq!(rendered.lines().count(), 512);
    assert!(rendered.lines().last().unwrap().ends_with("── 511"));
}

#[test]
fn given_very_deep_chain_when_building_tree_then_depth_is_capped_and_drop_is_safe() {
    let store = TreeStore::from_values(chain(100_000)).unwrap();
    let max_depth = store.settings().display.max_depth;

    let tree = store.to_tree_string();
    let rendered = tree.to_string();
    drop(tree);

    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines[0], "0");
    assert_eq!(lines.len(), max_depth + 1);
    assert!(lines[max_depth - 1].ends_with(&format!("── {}", max_depth - 1)));
    assert!(lines[max_depth].ends_with(ELIDED_LABEL));
}

#[test]
fn given_long_chain_when_rendering_text_then_every_level_is_present() {
    let store = TreeStore::from_values(chain(2_000)).unwrap();

    let rendered = store.render();
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines.len(), 2_000);
    assert_eq!(lines[0], "0");
    assert!(lines[1_999].ends_with("└── 1999"));
    assert!(lines[1_999].starts_with(&" ".repeat(4 * 1_998)));
}
