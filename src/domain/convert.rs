/*
Bridge into termtree so callers can hand a subtree to code that already
consumes `termtree::Tree<String>`. termtree draws its own indentation, which
differs from `render`.
 */
use std::fmt;

use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::MultiTree;
use crate::domain::node::NodeRef;
use crate::domain::render::escape_control;

pub trait TreeConvert {
    fn to_termtree(&self) -> Tree<String>;
}

impl<T: fmt::Display> TreeConvert for NodeRef<'_, T> {
    #[instrument(level = "trace", skip_all)]
    fn to_termtree(&self) -> Tree<String> {
        // Bottom-up: a node's finished children are the last entries on `built`
        let mut built: Vec<Tree<String>> = Vec::new();
        for node in self.iter_postorder() {
            let leaves = built.split_off(built.len() - node.child_count());
            built.push(Tree::new(label(node)).with_leaves(leaves));
        }
        built.pop().unwrap_or_else(|| Tree::new(label(*self)))
    }
}

fn label<T: fmt::Display>(node: NodeRef<'_, T>) -> String {
    escape_control(&node.value().to_string()).into_owned()
}

impl<T: fmt::Display> TreeConvert for MultiTree<T> {
    fn to_termtree(&self) -> Tree<String> {
        self.root_node().to_termtree()
    }
}
