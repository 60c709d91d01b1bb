//! Borrowed node views.
//!
//! A [`NodeRef`] is a node and, at the same time, the root of the subtree
//! hanging below it. All read-only operations of the tree are available on it.

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::slice;

use crate::domain::arena::{MultiTree, NodeId, PostOrderIter, PreOrderIter, TreeNode};
use crate::domain::error::{TreeError, TreeResult};

pub struct NodeRef<'a, T> {
    tree: &'a MultiTree<T>,
    id: NodeId,
}

// Manual impls: a derive would demand `T: Clone`.
impl<T> Clone for NodeRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NodeRef<'_, T> {}

impl<'a, T> NodeRef<'a, T> {
    /// `id` must belong to `tree`.
    pub(crate) fn new(tree: &'a MultiTree<T>, id: NodeId) -> Self {
        Self { tree, id }
    }

    pub(crate) fn data(&self) -> &'a TreeNode<T> {
        &self.tree[self.id]
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &'a MultiTree<T> {
        self.tree
    }

    pub fn value(&self) -> &'a T {
        &self.data().value
    }

    pub fn parent(&self) -> Option<NodeRef<'a, T>> {
        self.data().parent.map(|id| NodeRef::new(self.tree, id))
    }

    pub fn is_root(&self) -> bool {
        self.data().parent.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.data().children.is_empty()
    }

    pub fn child_count(&self) -> usize {
        self.data().children.len()
    }

    pub fn children(&self) -> Children<'a, T> {
        Children {
            tree: self.tree,
            ids: self.data().children.iter(),
        }
    }

    /// Direct child at `index`, in insertion order.
    pub fn child_at(&self, index: usize) -> TreeResult<NodeRef<'a, T>> {
        self.data()
            .children
            .get(index)
            .map(|&id| NodeRef::new(self.tree, id))
            .ok_or(TreeError::IndexOutOfRange {
                index,
                len: self.child_count(),
            })
    }

    /// Payloads of the direct children.
    pub fn labels(&self) -> &'a HashSet<T> {
        &self.data().labels
    }

    /// Parent, grandparent, ... up to the root of the whole tree.
    pub fn ancestors(&self) -> Ancestors<'a, T> {
        Ancestors {
            next: self.parent(),
        }
    }

    /// Values from the root of the whole tree down to this node.
    pub fn path(&self) -> Vec<&'a T> {
        let mut path: Vec<&'a T> = self.ancestors().map(|a| a.value()).collect();
        path.reverse();
        path.push(self.value());
        path
    }

    /// Number of levels in this subtree; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(*self, 1)];
        while let Some((node, level)) = stack.pop() {
            deepest = deepest.max(level);
            stack.extend(node.children().map(|child| (child, level + 1)));
        }
        deepest
    }

    /// Leaves of this subtree in pre-order.
    pub fn leaves(&self) -> Vec<NodeRef<'a, T>> {
        self.iter().filter(|node| node.is_leaf()).collect()
    }

    /// Number of nodes in this subtree, this node included.
    pub fn subtree_len(&self) -> usize {
        self.iter().count()
    }

    pub fn iter(&self) -> PreOrderIter<'a, T> {
        PreOrderIter::new(self.tree, self.id)
    }

    pub fn iter_postorder(&self) -> PostOrderIter<'a, T> {
        PostOrderIter::new(self.tree, self.id)
    }
}

pub struct Children<'a, T> {
    tree: &'a MultiTree<T>,
    ids: slice::Iter<'a, NodeId>,
}

impl<'a, T> Iterator for Children<'a, T> {
    type Item = NodeRef<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.ids.next().map(|&id| NodeRef::new(self.tree, id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

impl<T> DoubleEndedIterator for Children<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.ids.next_back().map(|&id| NodeRef::new(self.tree, id))
    }
}

impl<T> ExactSizeIterator for Children<'_, T> {}

pub struct Ancestors<'a, T> {
    next: Option<NodeRef<'a, T>>,
}

impl<'a, T> Iterator for Ancestors<'a, T> {
    type Item = NodeRef<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent();
        Some(current)
    }
}

/// Structural equality: same values, same children in the same order.
/// Ids and the position in the enclosing tree are ignored.
impl<'b, T: PartialEq> PartialEq<NodeRef<'b, T>> for NodeRef<'_, T> {
    fn eq(&self, other: &NodeRef<'b, T>) -> bool {
        let mut pending = vec![(*self, *other)];
        while let Some((a, b)) = pending.pop() {
            if a.value() != b.value() || a.child_count() != b.child_count() {
                return false;
            }
            pending.extend(a.children().zip(b.children()));
        }
        true
    }
}

impl<T: Eq> Eq for NodeRef<'_, T> {}

impl<T: Hash> Hash for NodeRef<'_, T> {
    // Pre-order values with child counts pin down the shape
    fn hash<H: Hasher>(&self, state: &mut H) {
        for node in self.iter() {
            node.value().hash(state);
            state.write_usize(node.child_count());
        }
    }
}

/// `Node { value: .., children: [..] }`, written without recursion.
impl<T: fmt::Debug> fmt::Debug for NodeRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        open_debug_node(f, self.value())?;
        let mut stack = vec![(self.children(), true)];
        while let Some((siblings, first)) = stack.last_mut() {
            let Some(child) = siblings.next() else {
                stack.pop();
                f.write_str("] }")?;
                continue;
            };
            if !*first {
                f.write_str(", ")?;
            }
            *first = false;
            open_debug_node(f, child.value())?;
            stack.push((child.children(), true));
        }
        Ok(())
    }
}

fn open_debug_node<T: fmt::Debug>(f: &mut fmt::Formatter<'_>, value: &T) -> fmt::Result {
    f.write_str("Node { value: ")?;
    fmt::Debug::fmt(value, f)?;
    f.write_str(", children: [")
}
