//! Label lookup: shallow (direct children) and deep (whole subtree).

use std::collections::VecDeque;
use std::hash::Hash;

use tracing::{error, instrument, trace};

use crate::domain::arena::MultiTree;
use crate::domain::node::NodeRef;

impl<'a, T: Eq + Hash> NodeRef<'a, T> {
    /// Direct child carrying `value`, never a deeper descendant.
    ///
    /// The label set answers misses in O(1); hits cost a scan of the children.
    pub fn search_children(&self, value: &T) -> Option<NodeRef<'a, T>> {
        if !self.labels().contains(value) {
            return None;
        }
        self.children().find(|child| child.value() == value)
    }

    /// Shallowest node of this subtree carrying `value`.
    ///
    /// Checks this node first, then walks the subtree level by level in
    /// insertion order, consulting each node's label set before its children
    /// are visited. Among matches on the same level the one under the earlier
    /// child wins.
    #[instrument(level = "trace", skip_all, fields(start = ?self.id()))]
    pub fn deep_search(&self, value: &T) -> Option<NodeRef<'a, T>> {
        if self.value() == value {
            return Some(*self);
        }

        let mut queue = VecDeque::from([*self]);
        while let Some(node) = queue.pop_front() {
            if node.labels().contains(value) {
                trace!(parent = ?node.id(), "label hit");
                return node.single_child_matching(value);
            }
            queue.extend(node.children());
        }
        None
    }

    fn single_child_matching(&self, value: &T) -> Option<NodeRef<'a, T>> {
        let mut matches = self.children().filter(|child| child.value() == value);
        let found = matches.next();
        let surplus = matches.count();
        if surplus > 0 {
            error!(
                parent = ?self.id(),
                matches = surplus + 1,
                "several children share one label"
            );
        }
        debug_assert_eq!(surplus, 0, "sibling labels must be unique");
        found
    }
}

impl<T: Eq + Hash> MultiTree<T> {
    /// Direct child of the root carrying `value`.
    pub fn search_children(&self, value: &T) -> Option<NodeRef<'_, T>> {
        self.root_node().search_children(value)
    }

    /// Shallowest node of the whole tree carrying `value`.
    pub fn deep_search(&self, value: &T) -> Option<NodeRef<'_, T>> {
        self.root_node().deep_search(value)
    }
}
