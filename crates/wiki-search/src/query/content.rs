//! Content nodes: decide whether a piece of text matches.
//!
//! Both nodes share the same four operations:
//! - `test_text`: does the text contain a match at all
//! - `search_from`: first match at or after a byte position, optionally wrapping
//! - `matches_whole`: does a candidate consist of exactly one match
//! - `replacement`: text to put in place of a found match

use memchr::memmem;
use regex::{Captures, Regex};

use crate::error::{Result, SearchError};
use crate::types::TextMatch;

use super::tri_state::TriState;

/// Literal, case-sensitive substring search.
#[derive(Debug, Clone)]
pub struct SimpleStringNode {
    needle: String,
    finder: memmem::Finder<'static>,
}

impl SimpleStringNode {
    pub fn new(needle: impl Into<String>) -> Self {
        let needle = needle.into();
        let finder = memmem::Finder::new(needle.as_bytes()).into_owned();
        Self { needle, finder }
    }

    pub fn needle(&self) -> &str {
        &self.needle
    }

    pub fn test_text(&self, text: &str) -> TriState {
        TriState::from(self.finder.find(text.as_bytes()).is_some())
    }

    pub fn search_from(&self, text: &str, start: usize, wrap_around: bool) -> Option<TextMatch> {
        let start = clamp_to_char_boundary(text, start);
        self.find_at(text, start).or_else(|| {
            if start != 0 && wrap_around {
                self.find_at(text, 0)
            } else {
                None
            }
        })
    }

    pub fn matches_whole(&self, candidate: &str) -> Option<TextMatch> {
        (candidate == self.needle).then(|| TextMatch::new(0, candidate.len()))
    }

    /// The replacement is taken literally.
    pub fn replacement(&self, replace: &str) -> String {
        replace.to_string()
    }

    fn find_at(&self, text: &str, start: usize) -> Option<TextMatch> {
        let offset = self.finder.find(&text.as_bytes()[start..])?;
        let begin = start + offset;
        Some(TextMatch::new(begin, begin + self.needle.len()))
    }
}

/// Regular-expression search.
///
/// Keeps a second copy of the pattern anchored at the end of the haystack.
/// Whole-string checks and replacements use it to find a match with a given
/// span even when the leftmost-first match at that start is shorter or longer.
#[derive(Debug, Clone)]
pub struct RegexTextNode {
    pattern: Regex,
    tail_anchored: Regex,
}

impl RegexTextNode {
    /// Compiles `source`, which must carry its own inline flags.
    pub fn new(source: &str) -> Result<Self> {
        Self::enclosed(source, "", "")
    }

    /// Like [`Self::new`], but matches only between word boundaries.
    pub fn whole_word(source: &str) -> Result<Self> {
        Self::enclosed(source, r"\b(?:", r")\b")
    }

    fn enclosed(source: &str, open: &str, close: &str) -> Result<Self> {
        Regex::new(source)?;
        let pattern = compile_enclosed(open, source, close)?;
        let tail_anchored = compile_enclosed(&format!("(?:{open}"), source, &format!(r"{close})\z"))?;
        Ok(Self {
            pattern,
            tail_anchored,
        })
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn test_text(&self, text: &str) -> TriState {
        TriState::from(self.pattern.is_match(text))
    }

    pub fn search_from(&self, text: &str, start: usize, wrap_around: bool) -> Option<TextMatch> {
        let start = clamp_to_char_boundary(text, start);
        self.find_at(text, start).or_else(|| {
            if start != 0 && wrap_around {
                self.find_at(text, 0)
            } else {
                None
            }
        })
    }

    pub fn matches_whole(&self, candidate: &str) -> Option<TextMatch> {
        self.tail_anchored
            .find(candidate)
            .filter(|found| found.start() == 0)
            .map(|_| TextMatch::new(0, candidate.len()))
    }

    /// Expands `$1` / `${name}` references in `replace` with the groups
    /// captured by the match at `found`.
    ///
    /// Returns `None` when the pattern cannot match exactly that span.
    pub fn replacement(&self, text: &str, found: TextMatch, replace: &str) -> Option<String> {
        if found.start > found.end
            || !text.is_char_boundary(found.start)
            || !text.is_char_boundary(found.end)
        {
            return None;
        }
        let captures = self
            .pattern
            .captures_at(text, found.start)
            .filter(|captures| spans(captures, found))
            .or_else(|| {
                self.tail_anchored
                    .captures_at(&text[..found.end], found.start)
                    .filter(|captures| spans(captures, found))
            })?;

        let mut expanded = String::new();
        captures.expand(replace, &mut expanded);
        Some(expanded)
    }

    fn find_at(&self, text: &str, start: usize) -> Option<TextMatch> {
        self.pattern
            .find_at(text, start)
            .map(|found| TextMatch::new(found.start(), found.end()))
    }
}

fn spans(captures: &Captures<'_>, found: TextMatch) -> bool {
    captures
        .get(0)
        .is_some_and(|whole| whole.start() == found.start && whole.end() == found.end)
}

/// Compiles `source` between `open` and `close`. When the source ends inside
/// a verbose-mode comment, the comment is closed with a line break first.
fn compile_enclosed(open: &str, source: &str, close: &str) -> Result<Regex> {
    Regex::new(&format!("{open}{source}{close}"))
        .or_else(|error| Regex::new(&format!("{open}{source}\n{close}")).map_err(|_| error))
        .map_err(SearchError::from)
}

/// Clamps `position` into `text` and moves it forward onto a char boundary.
fn clamp_to_char_boundary(text: &str, position: usize) -> usize {
    let mut position = position.min(text.len());
    while !text.is_char_boundary(position) {
        position += 1;
    }
    position
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_string_test_text() {
        let node = SimpleStringNode::new("needle");
        assert_eq!(node.test_text("haystack with needle inside"), TriState::True);
        assert_eq!(node.test_text("haystack with Needle inside"), TriState::False);
    }

    #[test]
    fn simple_string_wraps_to_start() {
        let node = SimpleStringNode::new("ab");
        assert_eq!(node.search_from("xxabxx", 3, true), Some(TextMatch::new(2, 4)));
        assert_eq!(node.search_from("xxabxx", 3, false), None);
    }

    #[test]
    fn simple_string_no_wrap_from_zero() {
        let node = SimpleStringNode::new("zz");
        assert_eq!(node.search_from("xxabxx", 0, true), None);
    }

    #[test]
    fn simple_string_finds_after_start() {
        let node = SimpleStringNode::new("ab");
        assert_eq!(node.search_from("abxxab", 1, false), Some(TextMatch::new(4, 6)));
        assert_eq!(node.search_from("abxxab", 0, false), Some(TextMatch::new(0, 2)));
    }

    #[test]
    fn simple_string_start_past_end() {
        let node = SimpleStringNode::new("ab");
        assert_eq!(node.search_from("ab", 10, false), None);
        assert_eq!(node.search_from("ab", 10, true), Some(TextMatch::new(0, 2)));
    }

    #[test]
    fn simple_string_whole_and_replacement() {
        let node = SimpleStringNode::new("foo");
        assert_eq!(node.matches_whole("foo"), Some(TextMatch::new(0, 3)));
        assert_eq!(node.matches_whole("food"), None);
        assert_eq!(node.replacement("$1 stays literal"), "$1 stays literal");
    }

    #[test]
    fn start_inside_multibyte_char_moves_forward() {
        let node = SimpleStringNode::new("b");
        // 'é' occupies bytes 1..3
        assert_eq!(node.search_from("aéb", 2, false), Some(TextMatch::new(3, 4)));
    }

    #[test]
    fn regex_search_and_wrap() {
        let node = RegexTextNode::new(r"(?m)a\d").unwrap();
        assert_eq!(node.search_from("a1 xx a2", 1, false), Some(TextMatch::new(6, 8)));
        assert_eq!(node.search_from("a1 xx", 1, true), Some(TextMatch::new(0, 2)));
        assert_eq!(node.search_from("a1 xx", 1, false), None);
    }

    #[test]
    fn regex_whole_string_requires_full_span() {
        let node = RegexTextNode::new("a|ab").unwrap();
        assert_eq!(node.matches_whole("ab"), Some(TextMatch::new(0, 2)));
        assert_eq!(node.matches_whole("abc"), None);
        assert_eq!(node.matches_whole("xab"), None);
    }

    #[test]
    fn regex_replacement_expands_groups() {
        let node = RegexTextNode::new(r"(\w+)@(\w+)").unwrap();
        let text = "mail bob@example now";
        let found = node.search_from(text, 0, false).unwrap();
        assert_eq!(&text[found.start..found.end], "bob@example");

        let replaced = node.replacement(text, found, "$2 at ${1}").unwrap();
        assert_eq!(replaced, "example at bob");
    }

    #[test]
    fn regex_replacement_named_groups() {
        let node = RegexTextNode::new(r"(?P<user>\w+)@(?P<host>\w+)").unwrap();
        let text = "ann@home";
        let found = node.matches_whole(text).unwrap();
        assert_eq!(
            node.replacement(text, found, "${host}/${user}").as_deref(),
            Some("home/ann")
        );
    }

    #[test]
    fn regex_replacement_rejects_foreign_span() {
        let node = RegexTextNode::new(r"\d+").unwrap();
        assert_eq!(node.replacement("ab 12", TextMatch::new(0, 2), "x"), None);
        assert_eq!(node.replacement("ab 12", TextMatch::new(1, 4), "x"), None);
        assert_eq!(node.replacement("ab 12", TextMatch::new(3, 9), "x"), None);
    }

    #[test]
    fn regex_replacement_of_shorter_prefix_span() {
        let node = RegexTextNode::new(r"\d+").unwrap();
        assert_eq!(
            node.replacement("ab 12", TextMatch::new(3, 4), "<$0>").as_deref(),
            Some("<1>")
        );
    }

    #[test]
    fn whole_match_then_replace_with_lazy_groups() {
        let node = RegexTextNode::new(r"(\w+?)@(\w+?)").unwrap();
        let found = node.matches_whole("ann@box").unwrap();
        assert_eq!(found, TextMatch::new(0, 7));
        assert_eq!(
            node.replacement("ann@box", found, "$2:$1").as_deref(),
            Some("box:ann")
        );
    }

    #[test]
    fn whole_match_then_replace_with_alternation() {
        let node = RegexTextNode::new("a|ab").unwrap();
        let found = node.matches_whole("ab").unwrap();
        assert_eq!(node.replacement("ab", found, "[$0]").as_deref(), Some("[ab]"));
        assert_eq!(node.replacement("xab", TextMatch::new(1, 3), "[$0]").as_deref(), Some("[ab]"));
    }

    #[test]
    fn verbose_pattern_with_trailing_comment() {
        let node = RegexTextNode::new("(?x) a b # two letters").unwrap();
        assert_eq!(node.test_text("xaby"), TriState::True);
        assert_eq!(node.matches_whole("ab"), Some(TextMatch::new(0, 2)));

        let node = RegexTextNode::whole_word("(?x) cat # animal").unwrap();
        assert_eq!(node.test_text("a cat"), TriState::True);
        assert_eq!(node.test_text("concat"), TriState::False);
    }

    #[test]
    fn whole_word_applies_to_every_alternative() {
        let node = RegexTextNode::whole_word("cat|dog").unwrap();
        assert_eq!(node.test_text("hotdog"), TriState::False);
        assert_eq!(node.test_text("the dog"), TriState::True);
        assert_eq!(node.matches_whole("cat"), Some(TextMatch::new(0, 3)));
    }

    #[test]
    fn regex_invalid_pattern_is_error() {
        assert!(RegexTextNode::new("(unclosed").is_err());
    }
}
