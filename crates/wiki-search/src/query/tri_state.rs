//! Three-valued truth for search predicates.

/// Result of a search predicate.
///
/// `Unknown` means the node could not decide from the information it was
/// given, e.g. a page-set node asked about plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriState {
    True,
    False,
    Unknown,
}

impl TriState {
    /// Kleene conjunction.
    pub fn and(self, other: TriState) -> TriState {
        match (self, other) {
            (Self::False, _) | (_, Self::False) => Self::False,
            (Self::True, Self::True) => Self::True,
            _ => Self::Unknown,
        }
    }

    /// Short-circuiting conjunction; `right` is not evaluated when `self` is false.
    pub fn and_then(self, right: impl FnOnce() -> TriState) -> TriState {
        if self == Self::False {
            return Self::False;
        }
        self.and(right())
    }

    pub fn is_true(self) -> bool {
        self == Self::True
    }
}

impl From<bool> for TriState {
    fn from(value: bool) -> Self {
        if value {
            Self::True
        } else {
            Self::False
        }
    }
}
