use generational_arena::{Arena, Index};
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, instrument};

use crate::domain::error::{TreeError, TreeResult};
use crate::domain::node::NodeRef;

static NEXT_TREE_TAG: AtomicU64 = AtomicU64::new(0);

fn next_tree_tag() -> u64 {
    NEXT_TREE_TAG.fetch_add(1, Ordering::Relaxed)
}

/// Stable handle to a node inside one [`MultiTree`].
///
/// Handles stay valid for the lifetime of the tree. Every tree, clones and
/// grafted subtrees included, carries its own tag, so a handle taken from one
/// tree is rejected by every other tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    tree: u64,
    index: Index,
}

/// Node storage in the arena.
#[derive(Debug, Clone)]
pub struct TreeNode<T> {
    /// Payload of this node
    pub(crate) value: T,
    /// Parent node in the arena, None for the root
    pub(crate) parent: Option<NodeId>,
    /// Children in insertion order
    pub(crate) children: Vec<NodeId>,
    /// Payloads of the direct children, kept equal to the values of `children`
    pub(crate) labels: HashSet<T>,
}

impl<T> TreeNode<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            parent: None,
            children: Vec::new(),
            labels: HashSet::new(),
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn labels(&self) -> &HashSet<T> {
        &self.labels
    }
}

/// Arena-backed N-ary tree with unique labels among siblings.
///
/// Every node is owned by the arena and reachable from the root, so ownership
/// is strictly parent to child while parent links remain plain [`NodeId`]s.
/// Any node can be viewed as the root of its own subtree through
/// [`MultiTree::node`], which hands out a [`NodeRef`].
///
/// ```
/// use multitree::MultiTree;
///
/// let mut tree = MultiTree::new("Languages".to_string());
/// let ids = tree
///     .insert(tree.root(), ["Compiled".to_string(), "Interpreted".to_string()])
///     .unwrap();
/// tree.insert(ids[0], ["Java".to_string()]).unwrap();
///
/// assert_eq!(
///     tree.to_string(),
///     "Languages\n├── Compiled\n│    └── Java\n└── Interpreted"
/// );
/// ```
pub struct MultiTree<T> {
    /// Arena storage for all nodes
    arena: Arena<TreeNode<T>>,
    /// Index of the root node
    root: NodeId,
    /// Stamped into every NodeId handed out by this tree
    tag: u64,
}

impl<T> MultiTree<T> {
    pub fn new(value: T) -> Self {
        let tag = next_tree_tag();
        let mut arena = Arena::new();
        let root = NodeId {
            tree: tag,
            index: arena.insert(TreeNode::new(value)),
        };
        Self { arena, root, tag }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_node(&self) -> NodeRef<'_, T> {
        NodeRef::new(self, self.root)
    }

    pub fn root_value(&self) -> &T {
        &self[self.root].value
    }

    pub fn get(&self, id: NodeId) -> Option<&TreeNode<T>> {
        if id.tree != self.tag {
            return None;
        }
        self.arena.get(id.index)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.tree == self.tag && self.arena.contains(id.index)
    }

    /// View of the node `id` as the root of its subtree.
    pub fn node(&self, id: NodeId) -> TreeResult<NodeRef<'_, T>> {
        if self.contains(id) {
            Ok(NodeRef::new(self, id))
        } else {
            Err(unknown_node(id))
        }
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// A tree always holds its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> PreOrderIter<'_, T> {
        PreOrderIter::new(self, self.root)
    }

    pub fn iter_postorder(&self) -> PostOrderIter<'_, T> {
        PostOrderIter::new(self, self.root)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.root_node().depth()
    }

    pub fn leaves(&self) -> Vec<NodeRef<'_, T>> {
        self.root_node().leaves()
    }
}

impl<T> MultiTree<T>
where
    T: Eq + Hash + Clone + fmt::Debug,
{
    /// Wraps each value in a fresh node and inserts them under `parent`.
    ///
    /// Same validation as [`MultiTree::insert_trees`].
    pub fn insert<I>(&mut self, parent: NodeId, values: I) -> TreeResult<Vec<NodeId>>
    where
        I: IntoIterator<Item = T>,
    {
        self.insert_trees(parent, values.into_iter().map(MultiTree::new))
    }

    /// Grafts whole subtrees under `parent`, in argument order.
    ///
    /// Fails with [`TreeError::InvalidArgument`] if `parent` is not a node of
    /// this tree and with [`TreeError::DuplicateKey`] if a subtree root's value
    /// is already a label of `parent` or occurs twice in `subtrees`. All checks
    /// run before anything is attached, so a failed call changes nothing.
    ///
    /// Returns the new ids of the subtree roots.
    #[instrument(level = "debug", skip(self, subtrees))]
    pub fn insert_trees<I>(&mut self, parent: NodeId, subtrees: I) -> TreeResult<Vec<NodeId>>
    where
        I: IntoIterator<Item = MultiTree<T>>,
    {
        let subtrees: Vec<MultiTree<T>> = subtrees.into_iter().collect();
        {
            let labels = &self.get(parent).ok_or_else(|| unknown_node(parent))?.labels;
            let mut incoming = HashSet::with_capacity(subtrees.len());
            for subtree in &subtrees {
                let value = subtree.root_value();
                if labels.contains(value) || !incoming.insert(value) {
                    return Err(TreeError::DuplicateKey(format!("{:?}", value)));
                }
            }
        }

        let mut ids = Vec::with_capacity(subtrees.len());
        for subtree in subtrees {
            let label = subtree.root_value().clone();
            self.arena[parent.index].labels.insert(label);
            ids.extend(self.graft(parent, subtree));
        }
        debug!(count = ids.len(), "inserted children");
        Ok(ids)
    }

    /// Replaces the payload of `id` and returns the previous one.
    ///
    /// The parent's labels follow the change. A value already carried by a
    /// sibling is rejected with [`TreeError::DuplicateKey`].
    #[instrument(level = "debug", skip(self, value))]
    pub fn set_value(&mut self, id: NodeId, value: T) -> TreeResult<T> {
        let node = self.get(id).ok_or_else(|| unknown_node(id))?;
        let parent = node.parent;
        let unchanged = node.value == value;

        if let Some(parent) = parent.filter(|_| !unchanged) {
            if self.arena[parent.index].labels.contains(&value) {
                return Err(TreeError::DuplicateKey(format!("{:?}", value)));
            }
        }

        let label = value.clone();
        let old = std::mem::replace(&mut self.arena[id.index].value, value);
        if let Some(parent) = parent.filter(|_| !unchanged) {
            let labels = &mut self.arena[parent.index].labels;
            labels.remove(&old);
            labels.insert(label);
        }
        Ok(old)
    }

    /// Verifies label sets, sibling uniqueness, parent links and reachability.
    #[instrument(level = "debug", skip(self))]
    pub fn check_invariants(&self) -> TreeResult<()> {
        let mut reached = 0;
        for node in self.iter() {
            reached += 1;
            let data = node.data();

            let mut values = HashSet::with_capacity(data.children.len());
            for child in node.children() {
                if child.parent().map(|p| p.id()) != Some(node.id()) {
                    return Err(TreeError::InvariantViolation(format!(
                        "child {:?} of {:?} does not link back to its parent",
                        child.value(),
                        node.value()
                    )));
                }
                if !values.insert(child.value()) {
                    return Err(TreeError::InvariantViolation(format!(
                        "{:?} has several children {:?}",
                        node.value(),
                        child.value()
                    )));
                }
            }

            if values.len() != data.labels.len() || !data.labels.iter().all(|l| values.contains(l)) {
                return Err(TreeError::InvariantViolation(format!(
                    "labels of {:?} do not match its children",
                    node.value()
                )));
            }
        }

        if reached != self.len() {
            return Err(TreeError::InvariantViolation(format!(
                "{} of {} nodes are unreachable from the root",
                self.len() - reached,
                self.len()
            )));
        }
        Ok(())
    }

    /// Moves every node of `subtree` into this arena below `parent`.
    ///
    /// Labels inside the subtree travel with their nodes; the label of the
    /// subtree root on `parent` is the caller's business. Moved nodes get ids
    /// of this tree, the ids the subtree handed out become foreign.
    fn graft(&mut self, parent: NodeId, subtree: MultiTree<T>) -> Option<NodeId> {
        let MultiTree {
            arena: mut source,
            root,
            ..
        } = subtree;

        let mut grafted_root = None;
        let mut stack = vec![(root, parent)];
        while let Some((old_id, new_parent)) = stack.pop() {
            let Some(node) = source.remove(old_id.index) else {
                continue;
            };
            let TreeNode {
                value,
                children,
                labels,
                ..
            } = node;

            let new_id = NodeId {
                tree: self.tag,
                index: self.arena.insert(TreeNode {
                    value,
                    parent: Some(new_parent),
                    children: Vec::with_capacity(children.len()),
                    labels,
                }),
            };
            self.arena[new_parent.index].children.push(new_id);
            grafted_root.get_or_insert(new_id);

            // Push children in reverse order for left-to-right traversal
            for &child in children.iter().rev() {
                stack.push((child, new_id));
            }
        }
        grafted_root
    }
}

fn unknown_node(id: NodeId) -> TreeError {
    TreeError::InvalidArgument(format!("{:?} is not a node of this tree", id))
}

impl<T> ops::Index<NodeId> for MultiTree<T> {
    type Output = TreeNode<T>;

    /// Panics if `id` is not a node of this tree; [`MultiTree::get`] is the
    /// checked variant.
    fn index(&self, id: NodeId) -> &Self::Output {
        match self.get(id) {
            Some(node) => node,
            None => panic!("{:?} is not a node of this tree", id),
        }
    }
}

/// A clone is a separate tree: ids of the original are foreign to it.
impl<T: Clone> Clone for MultiTree<T> {
    fn clone(&self) -> Self {
        let tag = next_tree_tag();
        let retag = |id: NodeId| NodeId {
            tree: tag,
            index: id.index,
        };
        let mut arena = self.arena.clone();
        for (_, node) in arena.iter_mut() {
            node.parent = node.parent.map(retag);
            for child in node.children.iter_mut() {
                *child = retag(*child);
            }
        }
        Self {
            arena,
            root: retag(self.root),
            tag,
        }
    }
}

impl<T: PartialEq> PartialEq for MultiTree<T> {
    fn eq(&self, other: &Self) -> bool {
        self.root_node() == other.root_node()
    }
}

impl<T: Eq> Eq for MultiTree<T> {}

impl<T: Hash> Hash for MultiTree<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.root_node().hash(state);
    }
}

impl<T: fmt::Debug> fmt::Debug for MultiTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiTree")
            .field("len", &self.len())
            .field("root", &self.root_node())
            .finish()
    }
}

impl<T: fmt::Display> fmt::Display for MultiTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.root_node(), f)
    }
}

pub struct PreOrderIter<'a, T> {
    tree: &'a MultiTree<T>,
    stack: Vec<NodeId>,
}

impl<'a, T> PreOrderIter<'a, T> {
    pub(crate) fn new(tree: &'a MultiTree<T>, start: NodeId) -> Self {
        Self {
            tree,
            stack: vec![start],
        }
    }
}

impl<'a, T> Iterator for PreOrderIter<'a, T> {
    type Item = NodeRef<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        let node = self.tree.get(current)?;
        // Push children in reverse order for left-to-right traversal
        self.stack.extend(node.children.iter().rev());
        Some(NodeRef::new(self.tree, current))
    }
}

pub struct PostOrderIter<'a, T> {
    tree: &'a MultiTree<T>,
    stack: Vec<(NodeId, bool)>,
}

impl<'a, T> PostOrderIter<'a, T> {
    pub(crate) fn new(tree: &'a MultiTree<T>, start: NodeId) -> Self {
        Self {
            tree,
            stack: vec![(start, false)],
        }
    }
}

impl<'a, T> Iterator for PostOrderIter<'a, T> {
    type Item = NodeRef<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, visited)) = self.stack.pop() {
            let Some(node) = self.tree.get(current) else {
                continue;
            };
            if visited {
                return Some(NodeRef::new(self.tree, current));
            }
            self.stack.push((current, true));
            for &child in node.children.iter().rev() {
                self.stack.push((child, false));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn languages() -> MultiTree<&'static str> {
        let mut tree = MultiTree::new("Languages");
        let ids = tree.insert(tree.root(), ["Compiled", "Interpreted"]).unwrap();
        tree.insert(ids[0], ["Java", "Go"]).unwrap();
        tree
    }

    #[test]
    fn test_check_invariants_accepts_api_built_tree() {
        assert_eq!(languages().check_invariants(), Ok(()));
    }

    #[test]
    fn test_check_invariants_reports_stale_label() {
        let mut tree = languages();
        let root = tree.root();
        tree.arena[root.index].labels.insert("Esoteric");

        let err = tree.check_invariants().unwrap_err();
        assert!(matches!(err, TreeError::InvariantViolation(_)), "{err}");
    }

    #[test]
    fn test_check_invariants_reports_broken_parent_link() {
        let mut tree = languages();
        let compiled = tree.root_node().child_at(0).unwrap().id();
        let java = tree.node(compiled).unwrap().child_at(0).unwrap().id();
        tree.arena[java.index].parent = Some(tree.root());

        let err = tree.check_invariants().unwrap_err();
        assert!(err.to_string().contains("does not link back"), "{err}");
    }

    #[test]
    fn test_check_invariants_reports_duplicate_children() {
        let mut tree = languages();
        let root = tree.root();
        let first = tree.arena[root.index].children[0];
        tree.arena[root.index].children.push(first);

        let err = tree.check_invariants().unwrap_err();
        assert!(err.to_string().contains("several children"), "{err}");
    }

    #[test]
    fn test_graft_preserves_order_and_labels() {
        let mut tree = MultiTree::new("root");
        let subtree = languages();
        let ids = tree.insert_trees(tree.root(), [subtree]).unwrap();

        let grafted = tree.node(ids[0]).unwrap();
        assert_eq!(*grafted.value(), "Languages");
        let compiled = grafted.child_at(0).unwrap();
        assert_eq!(compiled.labels(), &HashSet::from(["Java", "Go"]));
        let values: Vec<_> = tree.iter().map(|n| *n.value()).collect();
        assert_eq!(
            values,
            vec!["root", "Languages", "Compiled", "Java", "Go", "Interpreted"]
        );
        assert_eq!(tree.check_invariants(), Ok(()));
    }

    #[test]
    fn test_postorder_visits_children_first() {
        let tree = languages();
        let values: Vec<_> = tree.iter_postorder().map(|n| *n.value()).collect();
        assert_eq!(
            values,
            vec!["Java", "Go", "Compiled", "Interpreted", "Languages"]
        );
    }
}
