//! Ordering of matched pages.

use fnv::FnvHashSet;

use crate::query::SearchNode;
use crate::types::{PageId, PageOrdering};

/// Orders `pages` as `ordering` asks.
///
/// Natural ordering lists the pages `tree` can place first (in the order the
/// tree defines), followed by the rest sorted ascending. Duplicate page ids
/// collapse into one entry under natural ordering.
pub fn apply_ordering(ordering: PageOrdering, mut pages: Vec<PageId>, tree: &SearchNode) -> Vec<PageId> {
    match ordering {
        PageOrdering::None => pages,
        PageOrdering::Ascending => {
            pages.sort();
            pages
        }
        PageOrdering::Natural => order_natural(pages, tree),
    }
}

fn order_natural(pages: Vec<PageId>, tree: &SearchNode) -> Vec<PageId> {
    let mut working: FnvHashSet<PageId> = pages.into_iter().collect();
    let mut ordered = tree.order_natural(&mut working);

    let mut remaining: Vec<PageId> = working.into_iter().collect();
    remaining.sort();
    ordered.extend(remaining);
    ordered
}
