//! Tests for export-option filtering

use proptest::prelude::*;
use rstest::rstest;

use bookmind::domain::{
    filter_tree, Category, ExportOptions, HierarchyBuilder, HierarchyParams, Node, Record,
    RecordId, FLATTENED_LABEL,
};

fn record(id: usize, title: &str, domain: &str, category: Category) -> Record {
    Record {
        id: RecordId(id),
        title: title.to_string(),
        url: format!("https://{domain}/{id}"),
        category,
        keywords: vec![],
        domain: domain.to_string(),
    }
}

fn options(include_bookmarks: bool, include_folders: bool) -> ExportOptions {
    ExportOptions {
        include_bookmarks,
        include_folders,
    }
}

/// Bookmarks ─┬─ News (2) ─── a, b
///            ├─ Empty
///            └─ Tools (1) ─── c
fn sample_tree() -> Node {
    let a = record(0, "a", "a.org", Category::NewsBlog);
    let b = record(1, "b", "b.org", Category::NewsBlog);
    let c = record(2, "c", "c.org", Category::ToolsUtilities);
    Node::folder(
        "Bookmarks",
        vec![
            Node::folder("News (2)", vec![Node::leaf(&a), Node::leaf(&b)], 2),
            Node::folder("Empty", vec![], 0),
            Node::folder("Tools (1)", vec![Node::leaf(&c)], 1),
        ],
        3,
    )
}

fn all_folders_consistent(node: &Node) -> bool {
    match node {
        Node::Leaf(_) => true,
        Node::Folder(f) => f.child_count == f.children.len() && f.children.iter().all(all_folders_consistent),
    }
}

// ============================================================
// includeFolders = true
// ============================================================

#[test]
fn given_full_options_when_filter_then_empty_folders_dropped_and_order_kept() {
    let tree = sample_tree();

    let filtered = filter_tree(&tree, &options(true, true)).expect("tree survives");

    let labels: Vec<&str> = filtered.children().iter().map(Node::label).collect();
    assert_eq!(labels, vec!["News (2)", "Tools (1)"]);
    assert!(all_folders_consistent(&filtered));
    match &filtered {
        Node::Folder(root) => assert_eq!(root.child_count, 2),
        Node::Leaf(_) => panic!("root must be a folder"),
    }
}

#[test]
fn given_built_tree_when_filter_full_then_child_count_is_direct_children() {
    let records: Vec<Record> = (0..20)
        .map(|i| record(i, &format!("t{i}"), &format!("d{}.org", i % 4), Category::NewsBlog))
        .collect();
    let tree = HierarchyBuilder::new(HierarchyParams::new(3, 3).unwrap()).build(&records);

    let filtered = filter_tree(&tree, &options(true, true)).expect("tree survives");

    assert!(all_folders_consistent(&filtered));
    assert_eq!(filtered.records(), tree.records());
}

#[test]
fn given_folders_only_when_filter_then_nothing_survives() {
    // every folder bottoms out in leaves, so removing leaves empties them all
    let tree = sample_tree();

    assert_eq!(filter_tree(&tree, &options(false, true)), None);
}

// ============================================================
// includeFolders = false
// ============================================================

#[test]
fn given_flattened_export_when_filter_then_folders_replaced_by_wrappers() {
    let tree = sample_tree();

    let filtered = filter_tree(&tree, &options(true, false)).expect("tree survives");

    assert_eq!(filtered.label(), FLATTENED_LABEL);
    let labels: Vec<&str> = filtered.children().iter().map(Node::label).collect();
    assert_eq!(labels, vec![FLATTENED_LABEL, FLATTENED_LABEL]);
    let titles: Vec<&str> = filtered.records().iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["a", "b", "c"]);
    assert!(all_folders_consistent(&filtered));
}

#[rstest]
#[case(false, true)]
#[case(false, false)]
fn given_bookmarks_excluded_when_filter_then_no_tree(
    #[case] include_bookmarks: bool,
    #[case] include_folders: bool,
) {
    let tree = sample_tree();
    assert!(filter_tree(&tree, &options(include_bookmarks, include_folders)).is_none());
}

#[test]
fn given_single_leaf_when_filter_then_leaf_handled_directly() {
    let leaf = Node::leaf(&record(0, "solo", "solo.org", Category::NewsBlog));

    assert_eq!(filter_tree(&leaf, &options(true, false)), Some(leaf.clone()));
    assert_eq!(filter_tree(&leaf, &options(false, true)), None);
}

#[test]
fn given_any_options_when_filter_then_input_tree_unchanged() {
    let tree = sample_tree();
    let before = tree.clone();

    for (b, f) in [(true, true), (true, false), (false, true), (false, false)] {
        let _ = filter_tree(&tree, &options(b, f));
    }

    assert_eq!(tree, before);
}

proptest! {
    #[test]
    fn filtered_tree_keeps_leaf_order_and_has_no_real_folders_when_flattened(
        sizes in prop::collection::vec(1usize..6, 1..8),
    ) {
        let mut id = 0;
        let folders: Vec<Node> = sizes
            .iter()
            .enumerate()
            .map(|(i, &n)| {
                let leaves: Vec<Node> = (0..n)
                    .map(|_| {
                        id += 1;
                        Node::leaf(&record(id, &format!("t{id}"), "x.org", Category::NewsBlog))
                    })
                    .collect();
                Node::folder(format!("F{i}"), leaves, n)
            })
            .collect();
        let count = folders.len();
        let tree = Node::folder("Bookmarks", folders, count);

        let flattened = filter_tree(&tree, &options(true, false)).expect("non-empty");

        prop_assert_eq!(flattened.records(), tree.records());
        fn only_wrappers(node: &Node) -> bool {
            match node {
                Node::Leaf(_) => true,
                Node::Folder(f) => f.label == FLATTENED_LABEL && f.children.iter().all(only_wrappers),
            }
        }
        prop_assert!(only_wrappers(&flattened));
    }
}
