//! Mandalart goal tree: node type, resolver, and flattening.
//!
//! The tree is at most three levels deep (main goal, sub-goals,
//! sub-sub-goals) and every non-leaf level carries exactly nine child
//! slots, empty ones held as `null`. Node ids are plain strings chosen by
//! the client (e.g. "main", "g1-1") and are the only goal identifiers the
//! API ever exposes; uniqueness within a tree is checked on save.
//!
//! Trees are produced only by whole-document saves, never by linking, so
//! there are no cycles to detect.

use serde::{Deserialize, Serialize};

/// Number of child slots per node (a Mandalart ring).
pub const SLOT_COUNT: usize = 9;

/// Maximum tree depth: main, sub, sub-sub.
pub const MAX_DEPTH: usize = 3;

/// A node in the Mandalart tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalNode {
    /// Node id, unique within the owner's tree.
    pub id: String,
    /// Goal text.
    #[serde(default)]
    pub text: String,
    /// Whether the user marked the goal done.
    #[serde(default)]
    pub completed: bool,
    /// Longer description.
    #[serde(default)]
    pub description: String,
    /// Optional due date (RFC 3339).
    #[serde(default)]
    pub due_date: Option<String>,
    /// Child slots; `None` marks an empty slot.
    #[serde(default)]
    pub sub_goals: Vec<Option<GoalNode>>,
}

impl GoalNode {
    /// Create a leaf node with the given id and text.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            completed: false,
            description: String::new(),
            due_date: None,
            sub_goals: Vec::new(),
        }
    }

    /// Iterate over the non-null children.
    pub fn children(&self) -> impl Iterator<Item = &GoalNode> {
        self.sub_goals.iter().filter_map(Option::as_ref)
    }
}

/// Depth tag for a flattened node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalKind {
    /// The root goal.
    Main,
    /// A direct child of the root.
    Sub,
    /// A grandchild of the root.
    #[serde(rename = "subsub")]
    SubSub,
}

impl GoalKind {
    /// String form used in storage and API payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalKind::Main => "main",
            GoalKind::Sub => "sub",
            GoalKind::SubSub => "subsub",
        }
    }

    fn for_depth(depth: usize) -> GoalKind {
        match depth {
            0 => GoalKind::Main,
            1 => GoalKind::Sub,
            _ => GoalKind::SubSub,
        }
    }
}

/// A node projected out of the tree with its depth tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatGoal {
    /// Node id.
    pub id: String,
    /// Goal text.
    pub text: String,
    /// Depth tag.
    pub kind: GoalKind,
    /// Description, for mapping context.
    pub description: String,
}

/// Find a node by id anywhere in the tree, the root included.
///
/// Depth-first, first match wins. Empty slots are skipped.
pub fn find_node<'a>(root: &'a GoalNode, id: &str) -> Option<&'a GoalNode> {
    if root.id == id {
        return Some(root);
    }
    for child in root.children() {
        if let Some(found) = find_node(child, id) {
            return Some(found);
        }
    }
    None
}

/// Find the parent of the node with the given id, plus the child's slot
/// index within the parent.
///
/// The root has no parent and is never returned as a child.
pub fn find_parent<'a>(root: &'a GoalNode, id: &str) -> Option<(&'a GoalNode, usize)> {
    for (index, slot) in root.sub_goals.iter().enumerate() {
        if let Some(child) = slot {
            if child.id == id {
                return Some((root, index));
            }
            if let Some(found) = find_parent(child, id) {
                return Some(found);
            }
        }
    }
    None
}

/// Flatten the tree into a depth-tagged list, DFS order, root first.
///
/// The result length is always 1 (main) + non-null sub slots + non-null
/// sub-sub slots.
pub fn flatten(root: &GoalNode) -> Vec<FlatGoal> {
    let mut out = Vec::new();
    flatten_into(root, 0, &mut out);
    out
}

fn flatten_into(node: &GoalNode, depth: usize, out: &mut Vec<FlatGoal>) {
    out.push(FlatGoal {
        id: node.id.clone(),
        text: node.text.clone(),
        kind: GoalKind::for_depth(depth),
        description: node.description.clone(),
    });
    for child in node.children() {
        flatten_into(child, depth + 1, out);
    }
}

/// The node's id plus the ids of all its descendants.
///
/// Returns `None` when no node in the tree has the given id.
pub fn subtree_ids(root: &GoalNode, id: &str) -> Option<Vec<String>> {
    let node = find_node(root, id)?;
    let mut ids = Vec::new();
    collect_ids(node, &mut ids);
    Some(ids)
}

fn collect_ids(node: &GoalNode, out: &mut Vec<String>) {
    out.push(node.id.clone());
    for child in node.children() {
        collect_ids(child, out);
    }
}

/// Pad every non-leaf level to nine slots and enforce the depth cap.
///
/// Levels beyond [`MAX_DEPTH`] are dropped; extra slots beyond nine are
/// truncated. Slots are nulled on delete rather than removed, so padding
/// is idempotent.
pub fn normalize(root: &mut GoalNode) {
    normalize_at(root, 0);
}

fn normalize_at(node: &mut GoalNode, depth: usize) {
    if depth + 1 >= MAX_DEPTH {
        // Leaf level: no children allowed.
        node.sub_goals.clear();
        return;
    }
    node.sub_goals.resize(SLOT_COUNT, None);
    for slot in node.sub_goals.iter_mut().flatten() {
        normalize_at(slot, depth + 1);
    }
}

/// Check that every node id appears once. Returns the first duplicate.
pub fn find_duplicate_id(root: &GoalNode) -> Option<String> {
    let mut seen = std::collections::HashSet::new();
    first_duplicate(root, &mut seen)
}

fn first_duplicate(node: &GoalNode, seen: &mut std::collections::HashSet<String>) -> Option<String> {
    if !seen.insert(node.id.clone()) {
        return Some(node.id.clone());
    }
    for child in node.children() {
        if let Some(dup) = first_duplicate(child, seen) {
            return Some(dup);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    /// main -> [g1 -> [g1-1], g2], the rest of the slots empty.
    fn sample_tree() -> GoalNode {
        let mut g1 = GoalNode::new("g1", "Learn Rust");
        g1.sub_goals = vec![Some(GoalNode::new("g1-1", "Read the book"))];
        let g2 = GoalNode::new("g2", "Exercise");

        let mut root = GoalNode::new("main", "Better year");
        root.sub_goals = vec![Some(g1), Some(g2)];
        normalize(&mut root);
        root
    }

    #[test]
    fn test_find_node_matches_any_depth_including_root() {
        let tree = sample_tree();
        assert_eq!(find_node(&tree, "main").unwrap().id, "main");
        assert_eq!(find_node(&tree, "g1").unwrap().text, "Learn Rust");
        assert_eq!(find_node(&tree, "g1-1").unwrap().text, "Read the book");
        assert!(find_node(&tree, "missing").is_none());
    }

    #[test]
    fn test_find_parent_tracks_slot_index() {
        let tree = sample_tree();
        let (parent, index) = find_parent(&tree, "g2").unwrap();
        assert_eq!(parent.id, "main");
        assert_eq!(index, 1);

        let (parent, index) = find_parent(&tree, "g1-1").unwrap();
        assert_eq!(parent.id, "g1");
        assert_eq!(index, 0);

        // The root is never a child.
        assert!(find_parent(&tree, "main").is_none());
        assert!(find_parent(&tree, "missing").is_none());
    }

    #[test]
    fn test_flatten_length_invariant() {
        let tree = sample_tree();
        let flat = flatten(&tree);

        let sub_count = tree.children().count();
        let subsub_count: usize = tree.children().map(|c| c.children().count()).sum();
        assert_eq!(flat.len(), 1 + sub_count + subsub_count);
        assert_eq!(flat.len(), 4);

        assert_eq!(flat[0].id, "main");
        assert_eq!(flat[0].kind, GoalKind::Main);
        assert_eq!(flat[1].kind, GoalKind::Sub);
        assert_eq!(flat[2].id, "g1-1");
        assert_eq!(flat[2].kind, GoalKind::SubSub);
    }

    #[test]
    fn test_flatten_finds_exactly_the_findable_ids() {
        let tree = sample_tree();
        for flat in flatten(&tree) {
            assert!(find_node(&tree, &flat.id).is_some());
        }
    }

    #[test]
    fn test_subtree_ids() {
        let tree = sample_tree();
        assert_eq!(
            subtree_ids(&tree, "g1").unwrap(),
            vec!["g1".to_string(), "g1-1".to_string()]
        );
        assert_eq!(subtree_ids(&tree, "g1-1").unwrap(), vec!["g1-1".to_string()]);
        assert_eq!(subtree_ids(&tree, "main").unwrap().len(), 4);
        assert!(subtree_ids(&tree, "missing").is_none());
    }

    #[test]
    fn test_normalize_pads_to_nine_and_caps_depth() {
        let mut too_deep = GoalNode::new("d3", "too deep");
        too_deep.sub_goals = vec![Some(GoalNode::new("d4", "way too deep"))];
        let mut sub = GoalNode::new("d2", "sub-sub");
        sub.sub_goals = vec![Some(too_deep)];
        let mut child = GoalNode::new("d1", "sub");
        child.sub_goals = vec![Some(sub)];
        let mut root = GoalNode::new("main", "root");
        root.sub_goals = vec![Some(child)];

        normalize(&mut root);

        assert_eq!(root.sub_goals.len(), SLOT_COUNT);
        let child = root.sub_goals[0].as_ref().unwrap();
        assert_eq!(child.sub_goals.len(), SLOT_COUNT);
        // Third level exists but carries no children.
        let sub = child.sub_goals[0].as_ref().unwrap();
        assert!(sub.sub_goals.is_empty());
    }

    #[test]
    fn test_normalize_skips_null_slots_without_panicking() {
        let mut root = GoalNode::new("main", "root");
        root.sub_goals = vec![None, Some(GoalNode::new("g1", "x")), None];
        normalize(&mut root);
        assert_eq!(root.sub_goals.len(), SLOT_COUNT);
        assert_eq!(flatten(&root).len(), 2);
    }

    #[test]
    fn test_find_duplicate_id() {
        let tree = sample_tree();
        assert!(find_duplicate_id(&tree).is_none());

        let mut root = GoalNode::new("main", "root");
        root.sub_goals = vec![Some(GoalNode::new("main", "clash"))];
        assert_eq!(find_duplicate_id(&root), Some("main".to_string()));
    }

    #[test]
    fn test_serde_camel_case_roundtrip() {
        let json = r#"{
            "id": "main",
            "text": "Better year",
            "completed": false,
            "description": "",
            "dueDate": null,
            "subGoals": [null, {"id": "g1", "text": "Learn Rust"}]
        }"#;
        let tree: GoalNode = serde_json::from_str(json).unwrap();
        assert_eq!(tree.sub_goals.len(), 2);
        assert!(tree.sub_goals[0].is_none());
        assert_eq!(tree.sub_goals[1].as_ref().unwrap().id, "g1");

        let out = serde_json::to_string(&tree).unwrap();
        assert!(out.contains("subGoals"));
        assert!(out.contains("dueDate"));
    }
}
