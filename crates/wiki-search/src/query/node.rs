//! The search expression tree.

use fnv::FnvHashSet;

use crate::error::Result;
use crate::types::{PageId, TextMatch};

use super::collection::{AllPagesNode, SubtreePagesNode};
use super::content::{RegexTextNode, SimpleStringNode};
use super::corpus::PageCorpus;
use super::tri_state::TriState;

/// A node of a compiled search tree.
///
/// Page-set nodes (`AllPages`, `SubtreePages`) decide membership by page
/// identity and have no opinion on text. Content nodes (`SimpleString`,
/// `RegexText`) decide on text and ignore page identity. `And` combines two
/// children with three-valued conjunction.
#[derive(Debug, Clone)]
pub enum SearchNode {
    AllPages(AllPagesNode),
    SubtreePages(SubtreePagesNode),
    SimpleString(SimpleStringNode),
    RegexText(RegexTextNode),
    And(Box<ConjunctionNode>),
}

/// Two children joined by "and". The left child is evaluated first.
#[derive(Debug, Clone)]
pub struct ConjunctionNode {
    pub left: SearchNode,
    pub right: SearchNode,
}

impl SearchNode {
    pub fn and(left: SearchNode, right: SearchNode) -> Self {
        Self::And(Box::new(ConjunctionNode { left, right }))
    }

    /// Called once before a whole-corpus search; page-set nodes fetch their
    /// membership here.
    ///
    /// On failure every child session opened so far is closed again.
    pub fn begin_search_session(&mut self, corpus: &dyn PageCorpus) -> Result<()> {
        match self {
            Self::SubtreePages(node) => node.begin_session(corpus),
            Self::And(conjunction) => {
                conjunction.left.begin_search_session(corpus)?;
                if let Err(error) = conjunction.right.begin_search_session(corpus) {
                    conjunction.left.end_search_session();
                    return Err(error);
                }
                Ok(())
            }
            Self::AllPages(_) | Self::SimpleString(_) | Self::RegexText(_) => Ok(()),
        }
    }

    pub fn end_search_session(&mut self) {
        match self {
            Self::SubtreePages(node) => node.end_session(),
            Self::And(conjunction) => {
                conjunction.left.end_search_session();
                conjunction.right.end_search_session();
            }
            Self::AllPages(_) | Self::SimpleString(_) | Self::RegexText(_) => {}
        }
    }

    /// Corpus-wide predicate for one page.
    pub fn test_page(&self, page_id: &str, text: &str) -> TriState {
        match self {
            Self::AllPages(node) => node.test_page(page_id),
            Self::SubtreePages(node) => node.test_page(page_id),
            Self::SimpleString(_) | Self::RegexText(_) => self.test_text(text),
            Self::And(conjunction) => conjunction
                .left
                .test_page(page_id, text)
                .and_then(|| conjunction.right.test_page(page_id, text)),
        }
    }

    /// Text-only predicate; page-set nodes answer `Unknown`.
    pub fn test_text(&self, text: &str) -> TriState {
        match self {
            Self::AllPages(_) | Self::SubtreePages(_) => TriState::Unknown,
            Self::SimpleString(node) => node.test_text(text),
            Self::RegexText(node) => node.test_text(text),
            Self::And(conjunction) => conjunction
                .left
                .test_text(text)
                .and_then(|| conjunction.right.test_text(text)),
        }
    }

    /// Returns the pages of `working` this node can order naturally and
    /// removes them from `working`.
    ///
    /// For a conjunction the left child's order has priority; the right child
    /// only sees what the left one left behind.
    pub fn order_natural(&self, working: &mut FnvHashSet<PageId>) -> Vec<PageId> {
        match self {
            Self::SubtreePages(node) => node.order_natural(working),
            Self::And(conjunction) => {
                let mut ordered = conjunction.left.order_natural(working);
                if !working.is_empty() {
                    ordered.extend(conjunction.right.order_natural(working));
                }
                ordered
            }
            Self::AllPages(_) | Self::SimpleString(_) | Self::RegexText(_) => Vec::new(),
        }
    }

    /// First match at or after `start`. Only content nodes can drive a
    /// sequential search; other nodes never match.
    pub fn search_text_from(&self, text: &str, start: usize, wrap_around: bool) -> Option<TextMatch> {
        match self {
            Self::SimpleString(node) => node.search_from(text, start, wrap_around),
            Self::RegexText(node) => node.search_from(text, start, wrap_around),
            Self::AllPages(_) | Self::SubtreePages(_) | Self::And(_) => None,
        }
    }

    /// Span covering `candidate` when it is exactly one match.
    pub fn matches_whole_string(&self, candidate: &str) -> Option<TextMatch> {
        match self {
            Self::SimpleString(node) => node.matches_whole(candidate),
            Self::RegexText(node) => node.matches_whole(candidate),
            Self::AllPages(_) | Self::SubtreePages(_) | Self::And(_) => None,
        }
    }

    /// Text to substitute for `found`, which must come from this node's
    /// `search_text_from` or `matches_whole_string` on the same `text`.
    pub fn build_replacement(&self, text: &str, found: TextMatch, replace: &str) -> Option<String> {
        match self {
            Self::SimpleString(node) => Some(node.replacement(replace)),
            Self::RegexText(node) => node.replacement(text, found, replace),
            Self::AllPages(_) | Self::SubtreePages(_) | Self::And(_) => None,
        }
    }

    /// Class tag under which the node is persisted, if it is persistable.
    pub fn class_tag(&self) -> Option<&'static str> {
        match self {
            Self::AllPages(_) => Some(AllPagesNode::CLASS_TAG),
            Self::SubtreePages(_) => Some(SubtreePagesNode::CLASS_TAG),
            Self::SimpleString(_) | Self::RegexText(_) | Self::And(_) => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::AllPages(_) => "all-pages",
            Self::SubtreePages(_) => "subtree-pages",
            Self::SimpleString(_) => "simple-string",
            Self::RegexText(_) => "regex-text",
            Self::And(_) => "and",
        }
    }
}

impl Default for SearchNode {
    fn default() -> Self {
        Self::AllPages(AllPagesNode)
    }
}

impl From<AllPagesNode> for SearchNode {
    fn from(node: AllPagesNode) -> Self {
        Self::AllPages(node)
    }
}

impl From<SubtreePagesNode> for SearchNode {
    fn from(node: SubtreePagesNode) -> Self {
        Self::SubtreePages(node)
    }
}

impl From<SimpleStringNode> for SearchNode {
    fn from(node: SimpleStringNode) -> Self {
        Self::SimpleString(node)
    }
}

impl From<RegexTextNode> for SearchNode {
    fn from(node: RegexTextNode) -> Self {
        Self::RegexText(node)
    }
}
