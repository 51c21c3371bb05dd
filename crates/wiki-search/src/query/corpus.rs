//! Corpus collaborator consumed by page-set nodes.

use std::collections::hash_map::Entry;

use fnv::FnvHashMap;

use crate::error::{Result, SearchError};
use crate::types::PageId;

/// How far below a root page a subtree reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DepthLimit {
    #[default]
    Unbounded,
    /// `Levels(0)` is the root page alone.
    Levels(u32),
}

impl DepthLimit {
    /// Wire value: `-1` for unbounded, otherwise the level count.
    ///
    /// Level counts above `i32::MAX` have no wire value.
    pub fn to_wire(self) -> Result<i32> {
        match self {
            Self::Unbounded => Ok(-1),
            Self::Levels(levels) => i32::try_from(levels).map_err(|_| {
                SearchError::Serialization(format!("depth limit {levels} out of wire range"))
            }),
        }
    }

    pub fn from_wire(raw: i32) -> Result<Self> {
        match raw {
            -1 => Ok(Self::Unbounded),
            levels if levels >= 0 => Ok(Self::Levels(levels as u32)),
            other => Err(SearchError::Decode(format!("invalid depth limit: {other}"))),
        }
    }

    fn allows(self, level: u32) -> bool {
        match self {
            Self::Unbounded => true,
            Self::Levels(max) => level <= max,
        }
    }
}

/// Storage backend that knows how pages hang together.
///
/// Only asked for data while a corpus search session is open.
pub trait PageCorpus {
    /// Returns the root page followed by its descendants down to `depth`,
    /// in the backend's traversal order.
    fn descendant_page_ids(&self, root: &str, depth: DepthLimit) -> Result<Vec<PageId>>;
}

/// In-memory page hierarchy.
///
/// Traversal is depth-first pre-order with children in insertion order;
/// pages reachable along several paths are listed once.
#[derive(Debug, Clone, Default)]
pub struct MemoryCorpus {
    children: FnvHashMap<PageId, Vec<PageId>>,
}

impl MemoryCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_child(&mut self, parent: impl Into<PageId>, child: impl Into<PageId>) {
        self.children
            .entry(parent.into())
            .or_default()
            .push(child.into());
    }

    pub fn with_child(mut self, parent: impl Into<PageId>, child: impl Into<PageId>) -> Self {
        self.add_child(parent, child);
        self
    }
}

impl PageCorpus for MemoryCorpus {
    fn descendant_page_ids(&self, root: &str, depth: DepthLimit) -> Result<Vec<PageId>> {
        let mut ordered = Vec::new();
        // Shallowest level each page was reached at. A page reached again
        // closer to the root is expanded again so the depth limit is applied
        // along its shortest path.
        let mut shallowest: FnvHashMap<PageId, u32> = FnvHashMap::default();
        let mut stack = vec![(root.to_string(), 0u32)];

        while let Some((page, level)) = stack.pop() {
            match shallowest.entry(page.clone()) {
                Entry::Occupied(mut best) => {
                    if *best.get() <= level {
                        continue;
                    }
                    best.insert(level);
                }
                Entry::Vacant(slot) => {
                    slot.insert(level);
                    ordered.push(page.clone());
                }
            }
            if depth.allows(level + 1) {
                if let Some(children) = self.children.get(&page) {
                    stack.extend(
                        children
                            .iter()
                            .rev()
                            .map(|child| (child.clone(), level + 1)),
                    );
                }
            }
        }

        Ok(ordered)
    }
}
