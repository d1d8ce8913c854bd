use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::time::Instant;

use crate::path;

/// Id of the synthetic, unrendered root node representing `/`.
pub const ROOT_ID: usize = 0;

/// Represents one directory level of the display tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub id: usize,
    /// Normalized path this node stands for
    pub name: String,
    /// Label shown in the tree; may span several segments after collapsing
    pub display_name: String,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

impl TreeNode {
    /// Create a node with the default directory-style label
    pub fn new(id: usize, name: String, parent: Option<usize>) -> Self {
        Self {
            id,
            display_name: path::directory_label(&name),
            name,
            parent,
            children: Vec::new(),
        }
    }

    /// Create the synthetic root node
    pub fn root() -> Self {
        Self::new(ROOT_ID, path::ROOT.to_string(), None)
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Check if this node has children
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// A directory outline built from a set of paths that carry display data.
///
/// Nodes live in an arena indexed by id: `nodes[i].id == i` for every node,
/// ids are dense from zero, and node zero is the synthetic root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<TreeNode>", try_from = "Vec<TreeNode>")]
pub struct PathTree {
    nodes: Vec<TreeNode>,
}

/// A node list that does not form a valid arena
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeShapeError {
    #[error("tree has no root node")]
    MissingRoot,
    #[error("node at index {index} has id {id}")]
    MisplacedId { index: usize, id: usize },
    #[error("node {id} has an invalid parent")]
    BadParent { id: usize },
    #[error("node {id} lists child {child} that does not point back to it")]
    BadChild { id: usize, child: usize },
}

impl TryFrom<Vec<TreeNode>> for PathTree {
    type Error = TreeShapeError;

    /// Accept a node list only if it satisfies the arena invariants.
    ///
    /// Parents always have smaller ids than their children, which also rules
    /// out cycles.
    fn try_from(nodes: Vec<TreeNode>) -> Result<Self, Self::Error> {
        match nodes.first() {
            Some(root) if root.parent.is_none() => {}
            _ => return Err(TreeShapeError::MissingRoot),
        }

        for (index, node) in nodes.iter().enumerate() {
            if node.id != index {
                return Err(TreeShapeError::MisplacedId { index, id: node.id });
            }
            if index != ROOT_ID {
                match node.parent {
                    Some(parent) if parent < index && nodes[parent].children.contains(&index) => {}
                    _ => return Err(TreeShapeError::BadParent { id: index }),
                }
            }
            for &child in &node.children {
                if nodes.get(child).and_then(|c| c.parent) != Some(index) {
                    return Err(TreeShapeError::BadChild { id: index, child });
                }
            }
        }

        Ok(Self { nodes })
    }
}

impl From<PathTree> for Vec<TreeNode> {
    fn from(tree: PathTree) -> Self {
        tree.nodes
    }
}

impl Default for PathTree {
    fn default() -> Self {
        Self {
            nodes: vec![TreeNode::root()],
        }
    }
}

impl PathTree {
    /// Build the display tree for the given data paths.
    ///
    /// Every input path and every ancestor directory of it gets a node.
    /// Directories without data of their own and with exactly one child are
    /// folded into that child, whose label then carries the folded prefix.
    pub fn build<I, S>(data_paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let start_time = Instant::now();

        let data: BTreeSet<String> = data_paths
            .into_iter()
            .map(|p| path::sanitize(p.as_ref()))
            .collect();

        // Sorted order puts every directory before anything beneath it
        let all_paths: BTreeSet<String> = data.iter().flat_map(|p| path::prefixes(p)).collect();

        let ids_by_path: HashMap<&str, usize> = all_paths
            .iter()
            .enumerate()
            .map(|(index, name)| (name.as_str(), index + 1))
            .collect();

        let mut nodes = Vec::with_capacity(all_paths.len() + 1);
        nodes.push(TreeNode::root());
        for (index, name) in all_paths.iter().enumerate() {
            let parent = parent_of(name, &ids_by_path);
            nodes.push(TreeNode::new(index + 1, name.clone(), Some(parent)));
        }
        for id in 1..nodes.len() {
            if let Some(parent) = nodes[id].parent {
                nodes[parent].children.push(id);
            }
        }

        // One pass in id order. Chains still fold completely because every
        // unlink rewrites the arena that later iterations read.
        let mut unlinked = Vec::new();
        for id in 1..nodes.len() {
            if !data.contains(&nodes[id].name) && try_unlink(&mut nodes, id) {
                unlinked.push(id);
            }
        }

        let tree = Self {
            nodes: renumber(nodes, &unlinked),
        };

        log::debug!(
            "🌲 PathTree::build: {} data paths, {} enumerated, {} collapsed, {} nodes in {:?}",
            data.len(),
            all_paths.len(),
            unlinked.len(),
            tree.nodes.len(),
            start_time.elapsed()
        );

        tree
    }

    pub fn root(&self) -> &TreeNode {
        &self.nodes[ROOT_ID]
    }

    pub fn get(&self, id: usize) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    /// Number of nodes, including the root
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the tree holds nothing but the synthetic root
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn iter(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.iter()
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// Find a node by its normalized path
    pub fn find(&self, name: &str) -> Option<&TreeNode> {
        let name = path::sanitize(name);
        self.nodes.iter().find(|node| node.name == name)
    }

    /// Depth-first walk of every rendered node, paired with its display depth.
    ///
    /// The root is skipped; its children are at depth zero.
    pub fn visible(&self) -> Vec<(&TreeNode, usize)> {
        let mut result = Vec::with_capacity(self.nodes.len().saturating_sub(1));
        let mut stack: Vec<(usize, usize)> = self
            .root()
            .children
            .iter()
            .rev()
            .map(|&id| (id, 0))
            .collect();

        while let Some((id, depth)) = stack.pop() {
            let node = &self.nodes[id];
            result.push((node, depth));
            stack.extend(node.children.iter().rev().map(|&child| (child, depth + 1)));
        }

        result
    }

    /// Ids from the first rendered level down to `id`, inclusive.
    ///
    /// Empty for the root or an unknown id.
    pub fn ancestry(&self, id: usize) -> Vec<usize> {
        let mut chain = Vec::new();
        let mut current = self.get(id);
        while let Some(node) = current {
            if node.is_root() {
                break;
            }
            chain.push(node.id);
            current = node.parent.and_then(|parent| self.get(parent));
        }
        chain.reverse();
        chain
    }

    /// Get statistics about the rendered part of the tree
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        for (node, depth) in self.visible() {
            stats.total_nodes += 1;
            if node.has_children() {
                stats.branches += 1;
            } else {
                stats.leaves += 1;
            }
            stats.max_depth = stats.max_depth.max(depth + 1);
        }
        stats
    }

    /// Render the tree as indented labels, one rendered node per line
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (node, depth) in self.visible() {
            out.push_str(&"  ".repeat(depth));
            out.push_str(&node.display_name);
            out.push('\n');
        }
        out
    }
}

/// Statistics about the rendered nodes of a tree
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub branches: usize,
    pub leaves: usize,
    pub max_depth: usize,
}

// The longest enumerated path that is a proper segment-wise ancestor of
// `name`. Every ancestor is itself enumerated, so walking the prefixes from
// longest to shortest finds it; the root is the fallback.
fn parent_of(name: &str, ids_by_path: &HashMap<&str, usize>) -> usize {
    let segs = path::segments(name);
    for end in (1..segs.len()).rev() {
        let candidate = path::sanitize(&segs[..end].join("/"));
        if let Some(&id) = ids_by_path.get(candidate.as_str()) {
            return id;
        }
    }
    ROOT_ID
}

// Splice a single-child node out of the tree, handing its label to the child.
// Returns true if the node was unlinked.
fn try_unlink(nodes: &mut [TreeNode], id: usize) -> bool {
    let (parent_id, child_id) = match (nodes[id].parent, nodes[id].children.as_slice()) {
        (Some(parent), [child]) => (parent, *child),
        _ => return false,
    };

    nodes[child_id].parent = Some(parent_id);
    for sibling in nodes[parent_id].children.iter_mut() {
        if *sibling == id {
            *sibling = child_id;
        }
    }
    let prefix = nodes[id].display_name.clone();
    nodes[child_id].display_name.insert_str(0, &prefix);

    true
}

// Drop unlinked nodes and close the gaps they leave in the id space.
// `unlinked` must be sorted ascending.
fn renumber(nodes: Vec<TreeNode>, unlinked: &[usize]) -> Vec<TreeNode> {
    let remap = |id: usize| id - unlinked.partition_point(|&removed| removed < id);

    nodes
        .into_iter()
        .filter(|node| unlinked.binary_search(&node.id).is_err())
        .map(|mut node| {
            node.id = remap(node.id);
            node.parent = node.parent.map(remap);
            node.children = node.children.iter().map(|&child| remap(child)).collect();
            node.children.sort_unstable();
            node
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(tree: &PathTree) -> Vec<(&str, usize)> {
        tree.visible()
            .into_iter()
            .map(|(node, depth)| (node.display_name.as_str(), depth))
            .collect()
    }

    #[test]
    fn test_empty_input_yields_root_only() {
        let tree = PathTree::build(Vec::<String>::new());
        assert_eq!(tree.len(), 1);
        assert!(tree.is_empty());
        assert!(tree.root().is_root());
        assert_eq!(tree.root().name, "/");
        assert!(tree.visible().is_empty());
    }

    #[test]
    fn test_root_path_maps_to_synthetic_root() {
        let tree = PathTree::build(["/", "", "//"]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.find("/").map(|n| n.id), Some(ROOT_ID));
    }

    #[test]
    fn test_sibling_directories_keep_shared_parent() {
        let tree = PathTree::build(["/a/b", "/a/c"]);
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.root().children, vec![1]);

        let a = tree.get(1).unwrap();
        assert_eq!(a.display_name, "a/");
        assert_eq!(a.children, vec![2, 3]);
        assert_eq!(tree.get(2).unwrap().display_name, "b/");
        assert_eq!(tree.get(3).unwrap().display_name, "c/");
    }

    #[test]
    fn test_single_child_chain_folds_into_leaf() {
        let tree = PathTree::build(["/a/b/c"]);
        assert_eq!(tree.len(), 2);

        let leaf = tree.get(1).unwrap();
        assert_eq!(leaf.name, "/a/b/c");
        assert_eq!(leaf.display_name, "a/b/c/");
        assert_eq!(leaf.parent, Some(ROOT_ID));
        assert!(leaf.children.is_empty());
        assert_eq!(tree.root().children, vec![1]);
    }

    #[test]
    fn test_directory_with_data_is_never_folded() {
        let tree = PathTree::build(["/a", "/a/b"]);
        assert_eq!(tree.len(), 3);
        assert_eq!(labels(&tree), vec![("a/", 0), ("b/", 1)]);
        assert_eq!(tree.get(2).unwrap().name, "/a/b");
        assert_eq!(tree.get(2).unwrap().parent, Some(1));
    }

    #[test]
    fn test_partial_chain_folds_above_branch() {
        let tree = PathTree::build(["/a/b/c", "/a/b/d", "/x"]);
        assert_eq!(labels(&tree), vec![("a/b/", 0), ("c/", 1), ("d/", 1), ("x/", 0)]);
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn test_chain_stops_at_node_with_data() {
        let tree = PathTree::build(["/a/b/c/d", "/a/b"]);
        // `/a` folds into `/a/b`, `/a/b/c` folds into `/a/b/c/d`
        assert_eq!(labels(&tree), vec![("a/b/", 0), ("c/d/", 1)]);
    }

    #[test]
    fn test_leaf_without_data_is_kept() {
        // Only single-child folding applies; there is no dead-leaf pruning,
        // and an enumerated leaf always came from the input anyway.
        let tree = PathTree::build(["/a/b"]);
        assert_eq!(labels(&tree), vec![("a/b/", 0)]);
    }

    #[test]
    fn test_string_prefix_is_not_ancestry() {
        let tree = PathTree::build(["/foo", "/foobar"]);
        assert_eq!(tree.root().children, vec![1, 2]);
        assert_eq!(tree.find("/foobar").unwrap().parent, Some(ROOT_ID));
    }

    #[test]
    fn test_duplicates_and_unsanitized_inputs_merge() {
        let tree = PathTree::build(["a/b", "/a/b/", "//a/b//"]);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.get(1).unwrap().name, "/a/b");
    }

    #[test]
    fn test_ids_are_dense_after_collapse() {
        let tree = PathTree::build(["/p/q/r", "/p/q/s", "/t/u/v"]);
        for (index, node) in tree.iter().enumerate() {
            assert_eq!(node.id, index);
            for &child in &node.children {
                assert_eq!(tree.get(child).unwrap().parent, Some(node.id));
            }
        }
    }

    #[test]
    fn test_ancestry() {
        let tree = PathTree::build(["/a/b", "/a/c/d"]);
        let d = tree.find("/a/c/d").unwrap();
        let chain = tree.ancestry(d.id);
        let names: Vec<&str> = chain
            .iter()
            .map(|&id| tree.get(id).unwrap().name.as_str())
            .collect();
        // `/a/c` folded into `/a/c/d`
        assert_eq!(names, vec!["/a", "/a/c/d"]);
        assert!(tree.ancestry(ROOT_ID).is_empty());
        assert!(tree.ancestry(99).is_empty());
    }

    #[test]
    fn test_stats() {
        let tree = PathTree::build(["/a/b", "/a/c", "/d"]);
        assert_eq!(
            tree.stats(),
            TreeStats {
                total_nodes: 4,
                branches: 1,
                leaves: 3,
                max_depth: 2,
            }
        );
    }

    #[test]
    fn test_to_text() {
        let tree = PathTree::build(["/a/b", "/a/c"]);
        assert_eq!(tree.to_text(), "a/\n  b/\n  c/\n");
    }

    #[test]
    fn test_deserialize_round_trips_built_tree() {
        let tree = PathTree::build(["/a/b", "/a/c", "/d/e/f"]);
        let json = serde_json::to_string(&tree).unwrap();
        assert_eq!(serde_json::from_str::<PathTree>(&json).unwrap(), tree);
    }

    #[test]
    fn test_deserialize_rejects_broken_arenas() {
        assert!(serde_json::from_str::<PathTree>("[]").is_err());

        let dangling_child = r#"[{ "id": 0, "name": "/", "displayName": "/", "parent": null, "children": [5] }]"#;
        assert!(serde_json::from_str::<PathTree>(dangling_child).is_err());

        let second_root = r#"[
            { "id": 0, "name": "/", "displayName": "/", "parent": null, "children": [] },
            { "id": 1, "name": "/a", "displayName": "a/", "parent": null, "children": [] }
        ]"#;
        assert!(serde_json::from_str::<PathTree>(second_root).is_err());

        let shuffled = r#"[{ "id": 1, "name": "/", "displayName": "/", "parent": null, "children": [] }]"#;
        assert!(serde_json::from_str::<PathTree>(shuffled).is_err());
    }

    #[test]
    fn test_try_from_reports_shape_error() {
        let mut nodes: Vec<TreeNode> = PathTree::build(["/a"]).into();
        nodes[1].id = 7;
        assert_eq!(
            PathTree::try_from(nodes),
            Err(TreeShapeError::MisplacedId { index: 1, id: 7 })
        );
    }

    #[test]
    fn test_serializes_as_node_array() {
        let tree = PathTree::build(["/a"]);
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                { "id": 0, "name": "/", "displayName": "/", "parent": null, "children": [1] },
                { "id": 1, "name": "/a", "displayName": "a/", "parent": 0, "children": [] }
            ])
        );
    }
}
