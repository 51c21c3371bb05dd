//! Wiki page search and replace library.
//!
//! This crate provides:
//! - Search trees with three-valued page tests (page sets, text criteria, AND)
//! - Compilation of query strings into search trees
//! - Search/replace and page-listing operations with result ordering
//! - Binary packing of operation settings and saved searches on disk
//! - Parallel whole-corpus scans

pub mod error;
pub mod operation;
pub mod persist;
pub mod query;
pub mod saved;
pub mod scan;
pub mod types;

// Re-export main types
pub use error::{Result, SearchError};
pub use operation::{ListPagesOperation, SearchReplaceOperation, SearchSettings};
pub use query::{DepthLimit, MemoryCorpus, PageCorpus, QueryCompiler, SearchNode, TriState};
pub use saved::SavedSearchStore;
pub use scan::{scan_corpus, CorpusOperation, ScanReport};
pub use types::{PageId, PageOrdering, PageText, SearchOutcome, TextMatch, WildcardMode};
