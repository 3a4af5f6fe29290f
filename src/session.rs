//! Editor session: the state the deck editor page keeps between edits.
//!
//! Every edit re-runs parse → annotate → aggregate in full. The session only
//! holds what outlives a keystroke: the loaded dictionary and view toggles.

use crate::annotate::{AnnotatedEntry, annotate};
use crate::dictionary::{Dictionary, LoadError};
use crate::export::export;
use crate::parser::parse;
use crate::stats::{DeckStats, aggregate, sort_for_display};
use crate::suggest::{Completion, MatchMode, SuggestError, Suggester, Suggestions, extract_cursor_line};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum LoadState {
    Pending,
    Ready(Arc<Dictionary>),
    Failed(String),
}

/// One analysis pass over the deck text.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis<'d> {
    /// Matched entries in display order.
    pub entries: Vec<AnnotatedEntry<'d>>,
    pub stats: DeckStats,
}

impl<'d> Analysis<'d> {
    pub fn run(text: &str, dictionary: &'d Dictionary) -> Self {
        let mut entries = annotate(&parse(text), dictionary);
        let stats = aggregate(&entries);
        sort_for_display(&mut entries);
        Self { entries, stats }
    }

    pub fn export(&self) -> String {
        export(&self.entries)
    }
}

/// What a presenter gets to render.
pub struct DeckView<'a> {
    pub entries: &'a [AnnotatedEntry<'a>],
    pub stats: &'a DeckStats,
    pub show_curve: bool,
}

pub trait Presenter {
    fn present(&mut self, view: &DeckView<'_>);
}

impl<F: FnMut(&DeckView<'_>)> Presenter for F {
    fn present(&mut self, view: &DeckView<'_>) {
        self(view)
    }
}

pub struct DeckSession {
    state: LoadState,
    // Annotation target while no dictionary is available.
    empty: Dictionary,
    show_curve: bool,
    mode: MatchMode,
}

impl Default for DeckSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DeckSession {
    pub fn new() -> Self {
        Self {
            state: LoadState::Pending,
            empty: Dictionary::new(),
            show_curve: false,
            mode: MatchMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn set_mode(&mut self, mode: MatchMode) {
        self.mode = mode;
    }

    pub fn finish_load(&mut self, result: Result<Dictionary, LoadError>) {
        match result {
            Ok(dictionary) => {
                tracing::debug!(cards = dictionary.len(), "card dictionary loaded");
                self.state = LoadState::Ready(Arc::new(dictionary));
            }
            Err(err) => self.fail_load(err.to_string()),
        }
    }

    /// Record a failed load. Analysis keeps working but matches no cards.
    pub fn fail_load(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::error!(%reason, "card dictionary failed to load");
        self.state = LoadState::Failed(reason);
    }

    pub fn load_state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, LoadState::Ready(_))
    }

    /// The loaded dictionary, or an empty one before/after a failed load.
    pub fn dictionary(&self) -> &Dictionary {
        match &self.state {
            LoadState::Ready(dictionary) => dictionary.as_ref(),
            LoadState::Pending | LoadState::Failed(_) => &self.empty,
        }
    }

    pub fn analyze(&self, text: &str) -> Analysis<'_> {
        Analysis::run(text, self.dictionary())
    }

    /// Analyze and hand the result to a presenter.
    pub fn refresh(&self, text: &str, presenter: &mut impl Presenter) {
        let analysis = self.analyze(text);
        presenter.present(&DeckView {
            entries: &analysis.entries,
            stats: &analysis.stats,
            show_curve: self.show_curve,
        });
    }

    fn suggester(&self) -> Result<Suggester<'_>, SuggestError> {
        match &self.state {
            LoadState::Ready(dictionary) => Ok(Suggester::new(dictionary).with_mode(self.mode)),
            LoadState::Pending | LoadState::Failed(_) => Err(SuggestError::NotReady),
        }
    }

    /// Suggestions for the line under `cursor` (a byte offset).
    pub fn suggest(&self, buffer: &str, cursor: usize) -> Result<Suggestions<'_>, SuggestError> {
        let suggester = self.suggester()?;
        suggester.suggest(extract_cursor_line(buffer, cursor).line)
    }

    pub fn complete<'b>(&self, buffer: &'b str, cursor: usize) -> Result<Completion<'b>, SuggestError> {
        self.suggester()?.complete(buffer, cursor)
    }

    pub fn show_curve(&self) -> bool {
        self.show_curve
    }

    pub fn toggle_curve(&mut self) -> bool {
        self.show_curve = !self.show_curve;
        self.show_curve
    }

    /// Label for the button that toggles the curve chart.
    pub fn curve_toggle_label(&self) -> &'static str {
        if self.show_curve {
            "Hide ManaCurve"
        } else {
            "Show ManaCurve"
        }
    }
}

/// Whether leaving the page would discard work and needs confirmation.
pub fn has_unsaved_work(buffer: &str) -> bool {
    !buffer.is_empty()
}
