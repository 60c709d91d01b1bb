//! Domain layer: the tree and everything that reads or builds it
//!
//! This layer is independent of CLI and config concerns.

pub mod arena;
pub mod builder;
pub mod convert;
pub mod error;
pub mod node;
pub mod render;
pub mod search;

pub use arena::{MultiTree, NodeId, PostOrderIter, PreOrderIter, TreeNode};
pub use builder::{DirectoryBuilder, OutlineBuilder};
pub use convert::TreeConvert;
pub use error::{BuildError, BuildResult, TreeError, TreeResult};
pub use node::{Ancestors, Children, NodeRef};
pub use render::{escape_control, GlyphSet, RenderOptions};
