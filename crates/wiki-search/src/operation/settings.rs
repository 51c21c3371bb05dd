//! Settings of a search/replace operation.

use crate::query::QueryCompiler;
use crate::types::{PageOrdering, WildcardMode};

/// User-facing settings of a search or replace.
///
/// With `boolean_query` set some settings have no effect: the operation
/// behaves as search-only, never wraps around and works corpus-wide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    pub search: String,
    pub replace: String,
    /// Replace operation rather than search only.
    pub replace_op: bool,
    pub whole_word: bool,
    pub case_sensitive: bool,
    /// Continue from the start of the text when reaching its end.
    pub wrap_around: bool,
    /// The search string may join terms with `" and "`.
    pub boolean_query: bool,
    pub wildcard: WildcardMode,
    /// Operate on the whole corpus instead of the current page.
    pub corpus_wide: bool,
    /// Title for saving; falls back to the search string.
    pub title: Option<String>,
    pub ordering: PageOrdering,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            search: String::new(),
            replace: String::new(),
            replace_op: false,
            whole_word: false,
            case_sensitive: false,
            wrap_around: false,
            boolean_query: false,
            wildcard: WildcardMode::Regex,
            corpus_wide: false,
            title: None,
            ordering: PageOrdering::None,
        }
    }
}

impl SearchSettings {
    pub fn compiler(&self) -> QueryCompiler {
        QueryCompiler {
            whole_word: self.whole_word,
            case_sensitive: self.case_sensitive,
            wildcard: self.wildcard,
            boolean_query: self.boolean_query,
        }
    }

    /// The part of the settings a compiled tree depends on.
    pub(crate) fn compile_key(&self) -> CompileKey {
        CompileKey {
            search: self.search.clone(),
            compiler: self.compiler(),
        }
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.search)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CompileKey {
    search: String,
    compiler: QueryCompiler,
}
