//! Operation façades driving a search tree.
//!
//! - `SearchReplaceOperation`: text search, replacement and corpus-wide tests
//! - `ListPagesOperation`: page membership and ordering only

mod list_pages;
mod ordering;
mod search_replace;
mod settings;

pub use list_pages::ListPagesOperation;
pub use ordering::apply_ordering;
pub use search_replace::SearchReplaceOperation;
pub use settings::SearchSettings;
