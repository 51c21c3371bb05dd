//! Search/replace operation: settings plus the tree compiled from them.

use crate::error::{Result, SearchError};
use crate::persist::{decode_search_settings, encode_search_settings};
use crate::query::{PageCorpus, SearchNode, TriState};
use crate::types::{PageId, PageOrdering, SearchOutcome, TextMatch};

use super::ordering::apply_ordering;
use super::settings::{CompileKey, SearchSettings};

#[derive(Debug)]
struct CompiledTree {
    key: CompileKey,
    tree: SearchNode,
}

/// A search or replace as configured by the user.
///
/// Settings can be changed freely; the search tree is compiled on first use
/// and recompiled whenever the settings it was built from have changed.
#[derive(Debug, Default)]
pub struct SearchReplaceOperation {
    settings: SearchSettings,
    compiled: Option<CompiledTree>,
    session_active: bool,
}

impl Clone for SearchReplaceOperation {
    /// Copies the settings only; the clone compiles its own tree.
    fn clone(&self) -> Self {
        Self::with_settings(self.settings.clone())
    }
}

impl SearchReplaceOperation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: SearchSettings) -> Self {
        Self {
            settings,
            compiled: None,
            session_active: false,
        }
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Mutable access to the settings; the tree is rebuilt on next use.
    pub fn settings_mut(&mut self) -> &mut SearchSettings {
        &mut self.settings
    }

    pub fn set_settings(&mut self, settings: SearchSettings) {
        self.settings = settings;
    }

    pub fn title(&self) -> &str {
        self.settings.title()
    }

    pub fn set_title(&mut self, title: Option<String>) {
        self.settings.title = title;
    }

    pub fn ordering(&self) -> PageOrdering {
        self.settings.ordering
    }

    /// Drops the compiled tree; refused while a corpus session is open.
    pub fn clear_cache(&mut self) -> Result<()> {
        if self.session_active {
            return Err(SearchError::SessionActive);
        }
        self.compiled = None;
        Ok(())
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled
            .as_ref()
            .is_some_and(|compiled| compiled.key == self.settings.compile_key())
    }

    /// Compiles the tree unless the current one matches the settings.
    pub fn compile(&mut self) -> Result<&mut SearchNode> {
        let key = self.settings.compile_key();
        let compiled = match self.compiled.take() {
            Some(current) if current.key == key => current,
            stale => {
                if self.session_active {
                    self.compiled = stale;
                    return Err(SearchError::SessionActive);
                }
                let tree = self.settings.compiler().compile(&self.settings.search)?;
                log::debug!(
                    "compiled search tree kind={} boolean={}",
                    tree.kind(),
                    self.settings.boolean_query
                );
                CompiledTree { key, tree }
            }
        };
        Ok(&mut self.compiled.insert(compiled).tree)
    }

    /// First match in `text` at or after byte `start`.
    ///
    /// Not applicable to boolean queries.
    pub fn find_from(&mut self, text: &str, start: usize) -> Result<SearchOutcome<TextMatch>> {
        if self.settings.boolean_query {
            return Ok(SearchOutcome::NotApplicable);
        }
        let wrap_around = self.settings.wrap_around;
        let tree = self.compile()?;
        Ok(tree.search_text_from(text, start, wrap_around).into())
    }

    /// Span covering `candidate` if it is exactly one match, typically
    /// checked before replacing a selection.
    pub fn matches_exactly(&mut self, candidate: &str) -> Result<SearchOutcome<TextMatch>> {
        if self.settings.boolean_query {
            return Ok(SearchOutcome::NotApplicable);
        }
        let tree = self.compile()?;
        Ok(tree.matches_whole_string(candidate).into())
    }

    /// Text that should replace `found` in `text`.
    ///
    /// Only applicable to replace operations that are not boolean queries.
    pub fn build_replacement_for(
        &mut self,
        text: &str,
        found: TextMatch,
    ) -> Result<SearchOutcome<String>> {
        if self.settings.boolean_query || !self.settings.replace_op {
            return Ok(SearchOutcome::NotApplicable);
        }
        let replace = self.settings.replace.clone();
        let tree = self.compile()?;
        Ok(tree.build_replacement(text, found, &replace).into())
    }

    /// Opens a whole-corpus session.
    ///
    /// Fails with `SessionActive` if one is already open.
    pub fn begin_corpus_search(&mut self, corpus: &dyn PageCorpus) -> Result<()> {
        if self.session_active {
            return Err(SearchError::SessionActive);
        }
        self.compile()?.begin_search_session(corpus)?;
        self.session_active = true;
        log::debug!("corpus search started: {}", self.title());
        Ok(())
    }

    /// Closes the session; a no-op when none is open.
    pub fn end_corpus_search(&mut self) {
        if !self.session_active {
            return;
        }
        if let Some(compiled) = self.compiled.as_mut() {
            compiled.tree.end_search_session();
        }
        self.session_active = false;
        log::debug!("corpus search ended: {}", self.title());
    }

    pub fn in_corpus_search(&self) -> bool {
        self.session_active
    }

    /// Tree of the open session, if any.
    pub fn session_tree(&self) -> Option<&SearchNode> {
        if !self.session_active {
            return None;
        }
        self.compiled.as_ref().map(|compiled| &compiled.tree)
    }

    /// Corpus-wide predicate for one page.
    pub fn tests_page(&mut self, page_id: &str, text: &str) -> Result<TriState> {
        Ok(self.compile()?.test_page(page_id, text))
    }

    /// Orders `pages` according to the ordering setting.
    pub fn apply_ordering(&mut self, pages: Vec<PageId>) -> Result<Vec<PageId>> {
        let ordering = self.settings.ordering;
        Ok(apply_ordering(ordering, pages, self.compile()?))
    }

    /// Persisted settings as bytes (title, ordering and corpus-wide excluded).
    pub fn get_packed_settings(&self) -> Result<Vec<u8>> {
        encode_search_settings(&self.settings)
    }

    /// Restores settings written by [`Self::get_packed_settings`].
    ///
    /// The current settings are kept when `data` cannot be decoded.
    pub fn set_packed_settings(&mut self, data: &[u8]) -> Result<()> {
        if self.session_active {
            return Err(SearchError::SessionActive);
        }
        self.settings = decode_search_settings(data, &self.settings)?;
        self.compiled = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::MemoryCorpus;
    use crate::types::WildcardMode;

    fn operation(search: &str) -> SearchReplaceOperation {
        SearchReplaceOperation::with_settings(SearchSettings {
            search: search.to_string(),
            case_sensitive: true,
            wildcard: WildcardMode::None,
            ..SearchSettings::default()
        })
    }

    #[test]
    fn find_from_wraps_when_enabled() {
        let mut op = operation("ab");
        assert_eq!(op.find_from("xxabxx", 3).unwrap(), SearchOutcome::NoMatch);

        op.settings_mut().wrap_around = true;
        assert_eq!(
            op.find_from("xxabxx", 3).unwrap(),
            SearchOutcome::Matched(TextMatch::new(2, 4))
        );
    }

    #[test]
    fn boolean_mode_rejects_sequential_calls() {
        let mut op = operation("a and b");
        op.settings_mut().boolean_query = true;
        op.settings_mut().replace_op = true;

        assert_eq!(op.find_from("a b", 0).unwrap(), SearchOutcome::NotApplicable);
        assert_eq!(op.matches_exactly("a").unwrap(), SearchOutcome::NotApplicable);
        assert_eq!(
            op.build_replacement_for("a", TextMatch::new(0, 1)).unwrap(),
            SearchOutcome::NotApplicable
        );
        assert_eq!(op.tests_page("P", "b then a").unwrap(), TriState::True);
    }

    #[test]
    fn replacement_requires_replace_op() {
        let mut op = operation("foo");
        op.settings_mut().replace = "bar".to_string();
        assert_eq!(
            op.build_replacement_for("foo", TextMatch::new(0, 3)).unwrap(),
            SearchOutcome::NotApplicable
        );

        op.settings_mut().replace_op = true;
        assert_eq!(
            op.build_replacement_for("foo", TextMatch::new(0, 3)).unwrap(),
            SearchOutcome::Matched("bar".to_string())
        );
    }

    #[test]
    fn regex_replacement_expands_groups() {
        let mut op = SearchReplaceOperation::with_settings(SearchSettings {
            search: r"(\w+)@(\w+)".to_string(),
            replace: "$2:$1".to_string(),
            replace_op: true,
            ..SearchSettings::default()
        });
        let text = "write to bob@host today";
        let found = op.find_from(text, 0).unwrap().matched().unwrap();
        assert_eq!(
            op.build_replacement_for(text, found).unwrap(),
            SearchOutcome::Matched("host:bob".to_string())
        );

        let whole = op.matches_exactly("ann@box").unwrap().matched().unwrap();
        assert_eq!(whole, TextMatch::new(0, 7));
        assert_eq!(
            op.build_replacement_for("ann@box", whole).unwrap(),
            SearchOutcome::Matched("box:ann".to_string())
        );
        assert_eq!(op.matches_exactly("ann@box!").unwrap(), SearchOutcome::NoMatch);
    }

    #[test]
    fn exact_match_then_replace_lazy_and_alternation() {
        let mut op = SearchReplaceOperation::with_settings(SearchSettings {
            search: r"(\w+?)@(\w+?)".to_string(),
            replace: "$2:$1".to_string(),
            replace_op: true,
            ..SearchSettings::default()
        });
        let found = op.matches_exactly("ann@box").unwrap().matched().unwrap();
        assert_eq!(
            op.build_replacement_for("ann@box", found).unwrap(),
            SearchOutcome::Matched("box:ann".to_string())
        );

        op.settings_mut().search = "a|ab".to_string();
        op.settings_mut().replace = "<$0>".to_string();
        let found = op.matches_exactly("ab").unwrap().matched().unwrap();
        assert_eq!(
            op.build_replacement_for("ab", found).unwrap(),
            SearchOutcome::Matched("<ab>".to_string())
        );
    }

    #[test]
    fn settings_change_recompiles() {
        let mut op = operation("Word");
        assert_eq!(op.tests_page("P", "word").unwrap(), TriState::False);
        assert!(op.is_compiled());

        op.settings_mut().case_sensitive = false;
        assert!(!op.is_compiled());
        assert_eq!(op.tests_page("P", "word").unwrap(), TriState::True);
        assert!(op.is_compiled());

        op.settings_mut().replace = "ignored".to_string();
        assert!(op.is_compiled());
    }

    #[test]
    fn invalid_pattern_surfaces_on_use() {
        let mut op = SearchReplaceOperation::with_settings(SearchSettings {
            search: "(".to_string(),
            ..SearchSettings::default()
        });
        assert!(matches!(
            op.find_from("(", 0),
            Err(SearchError::InvalidPattern(_))
        ));
    }

    #[test]
    fn corpus_session_bracket() {
        let corpus = MemoryCorpus::new().with_child("Root", "Child");
        let mut op = operation("x");
        op.begin_corpus_search(&corpus).unwrap();
        assert!(op.in_corpus_search());
        assert!(op.session_tree().is_some());
        assert!(matches!(
            op.begin_corpus_search(&corpus),
            Err(SearchError::SessionActive)
        ));

        op.settings_mut().search = "y".to_string();
        assert!(matches!(op.tests_page("P", "y"), Err(SearchError::SessionActive)));

        assert!(matches!(op.clear_cache(), Err(SearchError::SessionActive)));
        assert!(op.session_tree().is_some());

        op.end_corpus_search();
        op.end_corpus_search();
        assert!(!op.in_corpus_search());
        op.clear_cache().unwrap();
        assert!(!op.is_compiled());
        assert_eq!(op.tests_page("P", "y").unwrap(), TriState::True);
    }

    #[test]
    fn ascending_ordering() {
        let mut op = operation("x");
        op.settings_mut().ordering = PageOrdering::Ascending;
        let ordered = op
            .apply_ordering(vec!["b".to_string(), "a".to_string()])
            .unwrap();
        assert_eq!(ordered, vec!["a", "b"]);
    }

    #[test]
    fn packed_settings_round_trip() {
        let mut op = operation("needle");
        op.settings_mut().whole_word = true;
        op.set_title(Some("Saved needle".to_string()));
        let bytes = op.get_packed_settings().unwrap();

        let mut restored = SearchReplaceOperation::new();
        restored.set_packed_settings(&bytes).unwrap();
        assert_eq!(restored.settings().search, "needle");
        assert!(restored.settings().whole_word);
        assert!(restored.settings().case_sensitive);
        assert_eq!(restored.settings().wildcard, WildcardMode::None);
        assert_eq!(restored.title(), "needle");
    }

    #[test]
    fn bad_packed_settings_keep_current() {
        let mut op = operation("keep");
        assert!(op.set_packed_settings(&[0, 0, 0, 5]).is_err());
        assert_eq!(op.settings().search, "keep");
    }

    #[test]
    fn clone_copies_settings_not_tree() {
        let mut op = operation("x");
        op.compile().unwrap();
        let copy = op.clone();
        assert_eq!(copy.settings(), op.settings());
        assert!(!copy.is_compiled());
    }
}
