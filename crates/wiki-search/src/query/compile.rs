//! Compiles a query string into a search tree.
//!
//! Boolean queries are split on the literal separator `" and "`. There is no
//! escaping: a term cannot itself contain `" and "`, and the keyword is only
//! recognised in lower case with single spaces around it.

use crate::error::Result;
use crate::types::WildcardMode;

use super::content::{RegexTextNode, SimpleStringNode};
use super::node::SearchNode;

/// Separator between the terms of a boolean query.
pub const AND_SEPARATOR: &str = " and ";

/// Options controlling how a query string becomes a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryCompiler {
    pub whole_word: bool,
    pub case_sensitive: bool,
    pub wildcard: WildcardMode,
    pub boolean_query: bool,
}

impl Default for QueryCompiler {
    fn default() -> Self {
        Self {
            whole_word: false,
            case_sensitive: false,
            wildcard: WildcardMode::Regex,
            boolean_query: false,
        }
    }
}

impl QueryCompiler {
    /// True when anything beyond a raw case-sensitive substring is asked for.
    pub fn needs_pattern_matching(&self) -> bool {
        self.wildcard != WildcardMode::None || self.whole_word || !self.case_sensitive
    }

    pub fn compile(&self, query: &str) -> Result<SearchNode> {
        if !self.boolean_query {
            return self.build_criterion(query);
        }

        let terms = split_and_terms(query);
        let Some((last, rest)) = terms.split_last() else {
            return self.build_criterion(query);
        };
        let Some((second_last, leading)) = rest.split_last() else {
            return self.build_criterion(last);
        };

        // Built from the right: a and (b and (c and d)).
        let mut node = SearchNode::and(
            self.build_criterion(second_last)?,
            self.build_criterion(last)?,
        );
        for term in leading.iter().rev() {
            node = SearchNode::and(self.build_criterion(term)?, node);
        }

        log::debug!("compiled boolean query with {} terms", terms.len());
        Ok(node)
    }

    /// Builds the node for a single search term.
    pub fn build_criterion(&self, term: &str) -> Result<SearchNode> {
        if !self.needs_pattern_matching() {
            return Ok(SimpleStringNode::new(term).into());
        }
        let source = self.pattern_source(term);
        let node = if self.whole_word {
            RegexTextNode::whole_word(&source)?
        } else {
            RegexTextNode::new(&source)?
        };
        Ok(node.into())
    }

    /// Regex source for `term`, inline flags included. Word boundaries are
    /// added by the node, not here.
    pub fn pattern_source(&self, term: &str) -> String {
        let body = match self.wildcard {
            WildcardMode::None => regex::escape(term),
            WildcardMode::Regex => term.to_string(),
        };
        // Unicode is on by default in the regex crate.
        let flags = if self.case_sensitive { "m" } else { "mi" };
        format!("(?{flags}){body}")
    }
}

/// Splits a boolean query into its terms.
pub fn split_and_terms(query: &str) -> Vec<&str> {
    query.split(AND_SEPARATOR).collect()
}
