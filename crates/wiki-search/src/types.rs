//! Shared value types for search operations.

use crate::error::{Result, SearchError};

/// Naked wiki word identifying a page.
pub type PageId = String;

/// Byte span of a match inside a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextMatch {
    pub start: usize,
    pub end: usize,
}

impl TextMatch {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Result of a façade call that is only meaningful in some modes.
///
/// `NotApplicable` is returned instead of an error when the operation's
/// current settings rule the call out (for example sequential search while
/// boolean-query mode is on). Callers routinely call first and check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome<T> {
    Matched(T),
    NoMatch,
    NotApplicable,
}

impl<T> SearchOutcome<T> {
    pub fn matched(self) -> Option<T> {
        match self {
            Self::Matched(value) => Some(value),
            Self::NoMatch | Self::NotApplicable => None,
        }
    }

    pub fn is_applicable(&self) -> bool {
        !matches!(self, Self::NotApplicable)
    }
}

impl<T> From<Option<T>> for SearchOutcome<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Matched(value),
            None => Self::NoMatch,
        }
    }
}

/// How the search string is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WildcardMode {
    /// Literal text.
    None,
    /// Regular expression; the replace string may reference groups.
    #[default]
    Regex,
}

impl WildcardMode {
    /// Wire string used by the persisted settings.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "no",
            Self::Regex => "regex",
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "no" => Ok(Self::None),
            "regex" => Ok(Self::Regex),
            other => Err(SearchError::Decode(format!(
                "unknown wildcard mode: {other:?}"
            ))),
        }
    }
}

/// How matching pages are ordered after a corpus search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageOrdering {
    #[default]
    None,
    Ascending,
    Natural,
}

impl PageOrdering {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "no",
            Self::Ascending => "ascending",
            Self::Natural => "natural",
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "no" => Ok(Self::None),
            "ascending" => Ok(Self::Ascending),
            "natural" => Ok(Self::Natural),
            other => Err(SearchError::Decode(format!("unknown ordering: {other:?}"))),
        }
    }
}

/// A page and its full text, as handed to a corpus scan by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    pub id: PageId,
    pub text: String,
}

impl PageText {
    pub fn new(id: impl Into<PageId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}
