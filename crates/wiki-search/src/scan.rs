//! Whole-corpus scans.
//!
//! A scan opens one corpus session, tests every page against the session
//! tree in parallel, then orders the hits. The tree is read-only while the
//! pages are tested.

use std::time::Instant;

use rayon::prelude::*;

use crate::error::{Result, SearchError};
use crate::operation::{apply_ordering, ListPagesOperation, SearchReplaceOperation};
use crate::query::{PageCorpus, SearchNode};
use crate::types::{PageId, PageOrdering, PageText};

/// An operation that can be run over a whole corpus.
pub trait CorpusOperation {
    fn begin_corpus_search(&mut self, corpus: &dyn PageCorpus) -> Result<()>;

    fn end_corpus_search(&mut self);

    /// Tree to evaluate while a session is open.
    fn session_tree(&self) -> Option<&SearchNode>;

    fn ordering(&self) -> PageOrdering;
}

impl CorpusOperation for SearchReplaceOperation {
    fn begin_corpus_search(&mut self, corpus: &dyn PageCorpus) -> Result<()> {
        SearchReplaceOperation::begin_corpus_search(self, corpus)
    }

    fn end_corpus_search(&mut self) {
        SearchReplaceOperation::end_corpus_search(self)
    }

    fn session_tree(&self) -> Option<&SearchNode> {
        SearchReplaceOperation::session_tree(self)
    }

    fn ordering(&self) -> PageOrdering {
        SearchReplaceOperation::ordering(self)
    }
}

impl CorpusOperation for ListPagesOperation {
    fn begin_corpus_search(&mut self, corpus: &dyn PageCorpus) -> Result<()> {
        ListPagesOperation::begin_corpus_search(self, corpus)
    }

    fn end_corpus_search(&mut self) {
        ListPagesOperation::end_corpus_search(self)
    }

    fn session_tree(&self) -> Option<&SearchNode> {
        ListPagesOperation::session_tree(self)
    }

    fn ordering(&self) -> PageOrdering {
        ListPagesOperation::ordering(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Matching pages, ordered as the operation asks.
    pub hits: Vec<PageId>,
    /// Number of pages tested.
    pub scanned: usize,
}

/// Runs `op` over `pages`, keeping the pages whose test is definitely true.
///
/// The session is closed before returning, whether or not the scan succeeded.
pub fn scan_corpus<O>(op: &mut O, corpus: &dyn PageCorpus, pages: &[PageText]) -> Result<ScanReport>
where
    O: CorpusOperation + ?Sized,
{
    let started = Instant::now();
    op.begin_corpus_search(corpus)?;
    let hits = collect_hits(&*op, pages);
    op.end_corpus_search();
    let hits = hits?;

    log::info!(
        "corpus scan scanned={} hits={} ordering={} scan_ms={}",
        pages.len(),
        hits.len(),
        op.ordering().as_str(),
        started.elapsed().as_millis(),
    );

    Ok(ScanReport {
        hits,
        scanned: pages.len(),
    })
}

fn collect_hits<O>(op: &O, pages: &[PageText]) -> Result<Vec<PageId>>
where
    O: CorpusOperation + ?Sized,
{
    let tree = op
        .session_tree()
        .ok_or_else(|| SearchError::Corpus("no search tree for the open session".to_string()))?;

    let hits: Vec<PageId> = pages
        .par_iter()
        .filter(|page| tree.test_page(&page.id, &page.text).is_true())
        .map(|page| page.id.clone())
        .collect();

    Ok(apply_ordering(op.ordering(), hits, tree))
}
