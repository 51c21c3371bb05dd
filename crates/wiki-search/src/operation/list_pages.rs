//! Page listing: membership and ordering only, no text search or replace.

use crate::error::{Result, SearchError};
use crate::persist::{decode_list_settings, encode_list_settings};
use crate::query::{PageCorpus, SearchNode, TriState};
use crate::types::{PageId, PageOrdering};

use super::ordering::apply_ordering;

/// Lists a subset of the corpus, e.g. all pages below some page.
#[derive(Debug, Default)]
pub struct ListPagesOperation {
    tree: SearchNode,
    ordering: PageOrdering,
    session_active: bool,
}

impl ListPagesOperation {
    /// Lists all pages, unordered.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tree(tree: SearchNode, ordering: PageOrdering) -> Self {
        Self {
            tree,
            ordering,
            session_active: false,
        }
    }

    pub fn search_tree(&self) -> &SearchNode {
        &self.tree
    }

    /// Replaces the tree; refused while a corpus session is open.
    pub fn set_search_tree(&mut self, tree: SearchNode) -> Result<()> {
        if self.session_active {
            return Err(SearchError::SessionActive);
        }
        self.tree = tree;
        Ok(())
    }

    pub fn ordering(&self) -> PageOrdering {
        self.ordering
    }

    pub fn set_ordering(&mut self, ordering: PageOrdering) {
        self.ordering = ordering;
    }

    pub fn begin_corpus_search(&mut self, corpus: &dyn PageCorpus) -> Result<()> {
        if self.session_active {
            return Err(SearchError::SessionActive);
        }
        self.tree.begin_search_session(corpus)?;
        self.session_active = true;
        Ok(())
    }

    pub fn end_corpus_search(&mut self) {
        if self.session_active {
            self.tree.end_search_session();
            self.session_active = false;
        }
    }

    pub fn in_corpus_search(&self) -> bool {
        self.session_active
    }

    pub fn session_tree(&self) -> Option<&SearchNode> {
        self.session_active.then_some(&self.tree)
    }

    pub fn tests_page(&self, page_id: &str, text: &str) -> TriState {
        self.tree.test_page(page_id, text)
    }

    pub fn apply_ordering(&self, pages: Vec<PageId>) -> Vec<PageId> {
        apply_ordering(self.ordering, pages, &self.tree)
    }

    /// Ordering and tree as bytes. Only page-set trees can be packed.
    pub fn get_packed_settings(&self) -> Result<Vec<u8>> {
        encode_list_settings(self.ordering, &self.tree)
    }

    pub fn set_packed_settings(&mut self, data: &[u8]) -> Result<()> {
        if self.session_active {
            return Err(SearchError::SessionActive);
        }
        let (ordering, tree) = decode_list_settings(data)?;
        self.ordering = ordering;
        self.tree = tree;
        Ok(())
    }
}
