//! Search expression tree and query compilation.
//!
//! This module provides:
//! - Three-valued truth (`TriState`)
//! - Page-set nodes (all pages, subtree of a page)
//! - Content nodes (literal substring, regular expression)
//! - Conjunction of two nodes
//! - Compilation of a query string plus options into a tree

mod collection;
mod compile;
mod content;
mod corpus;
mod node;
mod tri_state;

pub use collection::{AllPagesNode, SubtreePagesNode, SubtreeSession};
pub use compile::{split_and_terms, QueryCompiler, AND_SEPARATOR};
pub use content::{RegexTextNode, SimpleStringNode};
pub use corpus::{DepthLimit, MemoryCorpus, PageCorpus};
pub use node::{ConjunctionNode, SearchNode};
pub use tri_state::TriState;
