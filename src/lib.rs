//! Labeled N-ary trees.
//!
//! A [`MultiTree`] stores every node in one arena. Any node doubles as the
//! root of its own subtree through [`NodeRef`]. Labels are unique among
//! siblings, lookups come in a shallow and a shortest-match deep flavor, and
//! trees render as `tree`-style listings.
//!
//! ```
//! use multitree::MultiTree;
//!
//! let mut tree = MultiTree::new("Languages".to_string());
//! let ids = tree
//!     .insert(tree.root(), ["Compiled".to_string(), "Interpreted".to_string()])
//!     .unwrap();
//! tree.insert(ids[0], ["Java".to_string()]).unwrap();
//!
//! let java = tree.deep_search(&"Java".to_string()).unwrap();
//! assert_eq!(java.parent().unwrap().value(), "Compiled");
//! assert!(tree.deep_search(&"Python".to_string()).is_none());
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;

pub use domain::{
    escape_control, BuildError, DirectoryBuilder, GlyphSet, MultiTree, NodeId, NodeRef,
    OutlineBuilder, RenderOptions, TreeConvert, TreeError, TreeResult,
};
