use codeintel_dashboard::path::{directory_label, is_proper_ancestor, prefixes, sanitize, segments};
use codeintel_dashboard::tree::{PathTree, ROOT_ID};
use maplit::btreeset;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashSet};

/// Parent/children/label structure keyed by path, independent of id values
fn shape(tree: &PathTree) -> BTreeSet<(String, Option<String>, String, Vec<String>)> {
    tree.iter()
        .map(|node| {
            let parent = node.parent.map(|p| tree.get(p).unwrap().name.clone());
            let children: Vec<String> = node
                .children
                .iter()
                .map(|&c| tree.get(c).unwrap().name.clone())
                .collect();
            (node.name.clone(), parent, node.display_name.clone(), children)
        })
        .collect()
}

fn assert_well_formed(tree: &PathTree) {
    let roots: Vec<_> = tree.iter().filter(|n| n.parent.is_none()).collect();
    assert_eq!(roots.len(), 1, "exactly one parentless node");
    assert_eq!(roots[0].id, ROOT_ID);
    assert_eq!(roots[0].name, "/");

    for (index, node) in tree.iter().enumerate() {
        assert_eq!(node.id, index, "ids are dense and ordered");

        if let Some(parent) = node.parent {
            let parent = tree.get(parent).expect("parent id present");
            assert!(parent.children.contains(&node.id));
        }

        let mut sorted = node.children.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(node.children, sorted, "children sorted ascending without duplicates");
        for &child in &node.children {
            assert_eq!(tree.get(child).expect("child id present").parent, Some(node.id));
        }

        // No node is its own ancestor
        let mut seen = HashSet::new();
        let mut current = Some(node.id);
        while let Some(id) = current {
            assert!(seen.insert(id), "cycle through node {}", id);
            current = tree.get(id).unwrap().parent;
        }
    }
}

#[test]
fn scenario_siblings_share_unfolded_parent() {
    let tree = PathTree::build(btreeset! {"/a/b", "/a/c"});
    assert_well_formed(&tree);
    assert_eq!(tree.root().children.len(), 1);

    let a = tree.get(tree.root().children[0]).unwrap();
    assert_eq!(a.display_name, "a/");
    let labels: Vec<&str> = a
        .children
        .iter()
        .map(|&c| tree.get(c).unwrap().display_name.as_str())
        .collect();
    assert_eq!(labels, vec!["b/", "c/"]);
}

#[test]
fn scenario_chain_folds_into_single_node() {
    let tree = PathTree::build(btreeset! {"/a/b/c"});
    assert_well_formed(&tree);
    assert_eq!(tree.len(), 2);
    assert_eq!(tree.get(1).unwrap().display_name, "a/b/c/");
}

#[test]
fn scenario_data_keeps_single_child_parent() {
    let tree = PathTree::build(btreeset! {"/a", "/a/b"});
    assert_well_formed(&tree);
    assert_eq!(tree.len(), 3);
    assert_eq!(tree.find("/a").unwrap().display_name, "a/");
    assert_eq!(tree.find("/a/b").unwrap().parent, Some(tree.find("/a").unwrap().id));
}

#[test]
fn scenario_empty_input() {
    let tree = PathTree::build(BTreeSet::<String>::new());
    assert_well_formed(&tree);
    assert_eq!(tree.len(), 1);
    assert!(tree.is_empty());
}

#[test]
fn malformed_inputs_are_normalized() {
    let tree = PathTree::build(["", "//", "a//b", "/a/"]);
    assert_well_formed(&tree);
    assert!(tree.find("/a").is_some());
    let nested = tree.find("/a//b").unwrap();
    assert_eq!(nested.display_name, "b/");
    assert_eq!(nested.parent, Some(tree.find("/a").unwrap().id));
}

fn segment() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["a", "b", "c", "foo", "foobar", "a-b", "x.y", ""]).prop_map(String::from)
}

fn raw_path() -> impl Strategy<Value = String> {
    (prop::collection::vec(segment(), 0..5), any::<bool>(), any::<bool>()).prop_map(
        |(segments, leading, trailing)| {
            let mut path = segments.join("/");
            if leading {
                path.insert(0, '/');
            }
            if trailing {
                path.push('/');
            }
            path
        },
    )
}

proptest! {
    #[test]
    fn prop_tree_is_well_formed(paths in prop::collection::vec(raw_path(), 0..12)) {
        let tree = PathTree::build(&paths);
        assert_well_formed(&tree);
    }

    #[test]
    fn prop_every_input_has_a_node(paths in prop::collection::vec(raw_path(), 0..12)) {
        let tree = PathTree::build(&paths);
        for path in &paths {
            let name = sanitize(path);
            prop_assert!(tree.iter().any(|node| node.name == name), "missing node for {:?}", name);
        }
    }

    #[test]
    fn prop_input_order_does_not_matter(paths in prop::collection::vec(raw_path(), 0..12)) {
        let forward = PathTree::build(&paths);
        let reversed: Vec<String> = paths.iter().rev().cloned().collect();
        let backward = PathTree::build(&reversed);
        prop_assert_eq!(&forward, &backward);
        prop_assert_eq!(shape(&forward), shape(&backward));
    }

    #[test]
    fn prop_folded_directories_are_gone(paths in prop::collection::vec(raw_path(), 0..12)) {
        let tree = PathTree::build(&paths);
        let data: BTreeSet<String> = paths.iter().map(|p| sanitize(p)).collect();
        let all: BTreeSet<String> = data.iter().flat_map(|p| prefixes(p)).collect();

        for name in &all {
            let present = tree.iter().any(|node| &node.name == name);
            let child_count = all
                .iter()
                .filter(|other| {
                    is_proper_ancestor(name, other)
                        && !all.iter().any(|mid| is_proper_ancestor(name, mid) && is_proper_ancestor(mid, other))
                })
                .count();

            if !data.contains(name) && child_count == 1 {
                prop_assert!(!present, "{:?} should have been folded", name);
            } else {
                prop_assert!(present, "{:?} should be kept", name);
            }
        }
    }

    #[test]
    fn prop_labels_concatenate_folded_chain(paths in prop::collection::vec(raw_path(), 0..12)) {
        let tree = PathTree::build(&paths);
        let data: BTreeSet<String> = paths.iter().map(|p| sanitize(p)).collect();
        let all: BTreeSet<String> = data.iter().flat_map(|p| prefixes(p)).collect();

        for node in tree.iter().skip(1) {
            let parent = tree.get(node.parent.unwrap()).unwrap();
            // Sorted order lists the folded chain top-down
            let expected: String = all
                .iter()
                .filter(|k| is_proper_ancestor(&parent.name, k) && (*k == &node.name || is_proper_ancestor(k, &node.name)))
                .map(|k| directory_label(k))
                .collect();
            prop_assert_eq!(&node.display_name, &expected);
        }
    }

    #[test]
    fn prop_parent_is_unique_maximal_ancestor(paths in prop::collection::vec(raw_path(), 0..12)) {
        let data: BTreeSet<String> = paths.iter().map(|p| sanitize(p)).collect();
        let all: BTreeSet<String> = data.iter().flat_map(|p| prefixes(p)).collect();

        for name in &all {
            let ancestors: Vec<&String> = all.iter().filter(|a| is_proper_ancestor(a, name)).collect();
            let longest = ancestors.iter().map(|a| segments(a).len()).max();
            if let Some(longest) = longest {
                let maximal = ancestors.iter().filter(|a| segments(a).len() == longest).count();
                prop_assert_eq!(maximal, 1, "ambiguous parent for {:?}", name);
            }
        }

        // Kept nodes hang under their nearest kept ancestor
        let tree = PathTree::build(&paths);
        for node in tree.iter().skip(1) {
            let parent = tree.get(node.parent.unwrap()).unwrap();
            prop_assert!(is_proper_ancestor(&parent.name, &node.name));
            let between = tree
                .iter()
                .filter(|n| is_proper_ancestor(&parent.name, &n.name) && is_proper_ancestor(&n.name, &node.name))
                .count();
            prop_assert_eq!(between, 0);
        }
    }
}
