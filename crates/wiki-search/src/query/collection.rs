//! Page-set nodes: decide membership by page identity, not by text.

use fnv::FnvHashSet;

use crate::error::Result;
use crate::types::PageId;

use super::corpus::{DepthLimit, PageCorpus};
use super::tri_state::TriState;

/// Matches every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AllPagesNode;

impl AllPagesNode {
    pub const CLASS_TAG: &'static str = "AllPages";

    pub fn test_page(&self, _page_id: &str) -> TriState {
        TriState::True
    }
}

/// Descendant set fetched for one corpus session.
#[derive(Debug, Clone, Default)]
pub struct SubtreeSession {
    ordered: Vec<PageId>,
    members: FnvHashSet<PageId>,
}

impl SubtreeSession {
    fn from_ordered(ordered: Vec<PageId>) -> Self {
        let members = ordered.iter().cloned().collect();
        Self { ordered, members }
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

/// Matches a root page and the pages below it, down to a depth limit.
///
/// The descendant set is fetched from the corpus when a session begins and
/// dropped when it ends. Outside a session the node has no opinion: membership
/// is `Unknown` and natural ordering claims nothing.
#[derive(Debug, Clone)]
pub struct SubtreePagesNode {
    root: PageId,
    depth: DepthLimit,
    session: Option<SubtreeSession>,
}

// Transient session data takes no part in equality.
impl PartialEq for SubtreePagesNode {
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root && self.depth == other.depth
    }
}

impl Eq for SubtreePagesNode {}

impl SubtreePagesNode {
    pub const CLASS_TAG: &'static str = "SubtreePages";

    pub fn new(root: impl Into<PageId>, depth: DepthLimit) -> Self {
        Self {
            root: root.into(),
            depth,
            session: None,
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn depth(&self) -> DepthLimit {
        self.depth
    }

    pub fn session(&self) -> Option<&SubtreeSession> {
        self.session.as_ref()
    }

    pub fn begin_session(&mut self, corpus: &dyn PageCorpus) -> Result<()> {
        let ordered = corpus.descendant_page_ids(&self.root, self.depth)?;
        log::debug!(
            "subtree session root={} depth={:?} pages={}",
            self.root,
            self.depth,
            ordered.len()
        );
        self.session = Some(SubtreeSession::from_ordered(ordered));
        Ok(())
    }

    pub fn end_session(&mut self) {
        self.session = None;
    }

    pub fn test_page(&self, page_id: &str) -> TriState {
        match self.session() {
            Some(session) => TriState::from(session.members.contains(page_id)),
            None => TriState::Unknown,
        }
    }

    /// Claims the pages of `working` in fetch order.
    pub fn order_natural(&self, working: &mut FnvHashSet<PageId>) -> Vec<PageId> {
        let Some(session) = self.session() else {
            return Vec::new();
        };
        session
            .ordered
            .iter()
            .filter(|page| working.remove(page.as_str()))
            .cloned()
            .collect()
    }
}
