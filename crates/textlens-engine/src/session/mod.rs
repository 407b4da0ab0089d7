//! Single-threaded editor session tying the pipeline together.
//!
//! The session owns the document and every derived piece of state. Time is
//! supplied by the caller: edits schedule trailing-edge timers and
//! [`EditorSession::poll`] fires whichever are due. Network calls are not
//! made here; `poll` hands out an [`AnalysisRequest`] and the caller feeds the
//! outcome back through [`EditorSession::complete_analysis`], where the
//! staleness guard decides whether it still applies.

mod debounce;

pub use debounce::Debouncer;

use std::time::{Duration, Instant};

use crate::analysis::{
    AnalysisError, AnalysisResponse, AnalysisResultsData, AnalysisService, AnalysisSummary, IssueId,
    IssueType, UnifiedIssue, unify,
};
use crate::decorations::{DecorationSet, LeafDecoration, RangeRegistry};
use crate::editing::{DocRange, Document, EditError, OffsetMap, RunPath, Selection, Viewport, flatten_visible};
use crate::suggestions::{self, AppliedSuggestions, RevertOutcome, SuggestionError};

pub const APPLIED_NOTICE: &str = "Suggestion applied!";
pub const APPLY_FAILED_NOTICE: &str = "Could not apply suggestion. The original text may have changed.";
pub const UNDONE_NOTICE: &str = "Suggestion undone.";
pub const UNDO_FAILED_NOTICE: &str = "Could not undo suggestion.";

#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    pub change_debounce: Duration,
    pub analysis_debounce: Duration,
    pub decoration_debounce: Duration,
    /// When false, edits never schedule analysis
    pub should_analyze: bool,
    pub filter: Option<IssueType>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            change_debounce: Duration::from_millis(500),
            analysis_debounce: Duration::from_millis(1000),
            decoration_debounce: Duration::from_millis(300),
            should_analyze: true,
            filter: Some(IssueType::Grammar),
        }
    }
}

/// Visible text captured for one analysis round trip
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub text: String,
    pub map: OffsetMap,
}

/// What happened to an analysis outcome handed back to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Updated,
    /// The visible text moved on while the request was in flight
    Stale,
    Failed(String),
    /// The session was shut down
    Ignored,
}

pub struct EditorSession {
    doc: Document,
    viewport: Viewport,
    options: SessionOptions,
    filter: Option<IssueType>,

    last_content: String,
    results: Option<AnalysisResultsData>,
    analysis_map: Option<OffsetMap>,
    is_loading: bool,
    error: Option<String>,

    decorations: DecorationSet,
    registry: RangeRegistry,
    applied: AppliedSuggestions,
    selected: Option<IssueId>,
    notice: Option<String>,

    change_timer: Debouncer,
    analysis_timer: Debouncer,
    decoration_timer: Debouncer,
    shut_down: bool,
}

impl EditorSession {
    pub fn new(doc: Document, options: SessionOptions) -> Self {
        let last_content = doc.text().trim().to_string();
        Self {
            doc,
            viewport: Viewport::all(),
            filter: options.filter,
            last_content,
            results: None,
            analysis_map: None,
            is_loading: false,
            error: None,
            decorations: DecorationSet::default(),
            registry: RangeRegistry::new(),
            applied: AppliedSuggestions::new(),
            selected: None,
            notice: None,
            change_timer: Debouncer::new(options.change_debounce),
            analysis_timer: Debouncer::new(options.analysis_debounce),
            decoration_timer: Debouncer::new(options.decoration_debounce),
            shut_down: false,
            options,
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Run an edit against the document and schedule the change pass
    pub fn edit<T>(
        &mut self,
        now: Instant,
        edit: impl FnOnce(&mut Document) -> Result<T, EditError>,
    ) -> Result<T, EditError> {
        let value = edit(&mut self.doc)?;
        self.document_changed(now);
        Ok(value)
    }

    pub fn set_selection(&mut self, selection: Option<Selection>) {
        self.doc.set_selection(selection);
    }

    pub fn document_changed(&mut self, now: Instant) {
        if self.shut_down {
            return;
        }
        self.change_timer.schedule(now);
    }

    /// Ask for an analysis of the current view without any edit
    pub fn request_analysis(&mut self, now: Instant) {
        if self.shut_down || !self.options.should_analyze {
            return;
        }
        self.is_loading = true;
        self.analysis_timer.schedule(now);
    }

    /// Fire every timer that is due. Returns the request to send, if the
    /// analysis timer fired and there is text worth analyzing.
    pub fn poll(&mut self, now: Instant) -> Option<AnalysisRequest> {
        if self.shut_down {
            return None;
        }
        if self.change_timer.fire_if_due(now) {
            self.run_change_pass(now);
        }
        let request = if self.analysis_timer.fire_if_due(now) {
            self.run_analysis_pass(now)
        } else {
            None
        };
        if self.decoration_timer.fire_if_due(now) {
            self.rebuild_decorations();
        }
        request
    }

    /// Earliest pending timer deadline
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.shut_down {
            return None;
        }
        [
            self.change_timer.deadline(),
            self.analysis_timer.deadline(),
            self.decoration_timer.deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    pub fn complete_analysis(
        &mut self,
        request: AnalysisRequest,
        outcome: Result<AnalysisResponse, AnalysisError>,
        now: Instant,
    ) -> Completion {
        if self.shut_down {
            return Completion::Ignored;
        }
        match outcome {
            Ok(response) => {
                let current = flatten_visible(&self.doc, &self.viewport);
                if current.text != request.text {
                    log::debug!("discarding analysis of outdated text");
                    return Completion::Stale;
                }
                self.results = Some(response.analysis_results);
                self.analysis_map = Some(request.map);
                self.is_loading = false;
                self.error = None;
                self.decoration_timer.schedule(now);
                Completion::Updated
            }
            Err(error) => {
                let message = error.to_string();
                log::warn!("analysis failed: {message}");
                self.is_loading = false;
                self.error = Some(message.clone());
                self.analysis_map = None;
                Completion::Failed(message)
            }
        }
    }

    /// Analyze the visible text right away and refresh decorations.
    ///
    /// Returns `None` when there was nothing to analyze.
    pub fn analyze_blocking<S: AnalysisService + ?Sized>(
        &mut self,
        service: &S,
        now: Instant,
    ) -> Option<Completion> {
        if self.shut_down {
            return None;
        }
        self.analysis_timer.cancel();
        let request = self.run_analysis_pass(now)?;
        let outcome = service.analyze(&request.text);
        let completion = self.complete_analysis(request, outcome, now);
        if self.decoration_timer.is_pending() {
            self.decoration_timer.cancel();
            self.rebuild_decorations();
        }
        Some(completion)
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport, now: Instant) {
        if self.viewport == viewport {
            return;
        }
        self.viewport = viewport;
        if self.options.should_analyze && !self.shut_down {
            self.analysis_timer.schedule(now);
        }
    }

    pub fn filter(&self) -> Option<IssueType> {
        self.filter
    }

    pub fn set_filter(&mut self, filter: Option<IssueType>, now: Instant) {
        self.filter = filter;
        if !self.shut_down {
            self.decoration_timer.schedule(now);
        }
    }

    /// Active issues for the panel: current filter, minus applied ones
    pub fn issues(&self) -> Vec<UnifiedIssue> {
        match &self.results {
            Some(results) => unify(results, self.filter, &self.applied.ids()),
            None => Vec::new(),
        }
    }

    pub fn summary(&self) -> AnalysisSummary {
        match &self.results {
            Some(results) => AnalysisSummary::from_results(results, self.filter, &self.applied.ids()),
            None => AnalysisSummary::default(),
        }
    }

    pub fn results(&self) -> Option<&AnalysisResultsData> {
        self.results.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn decorations(&self) -> &DecorationSet {
        &self.decorations
    }

    pub fn registry(&self) -> &RangeRegistry {
        &self.registry
    }

    pub fn applied(&self) -> &AppliedSuggestions {
        &self.applied
    }

    pub fn leaf_decorations(&self, path: RunPath) -> Vec<LeafDecoration> {
        self.decorations.for_run(path, self.selected.as_ref())
    }

    pub fn selected_issue(&self) -> Option<&IssueId> {
        self.selected.as_ref()
    }

    pub fn select_issue(&mut self, id: Option<IssueId>) {
        self.selected = id;
    }

    /// The latest user-facing message, cleared on read
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    /// Select the live range of an issue in the document.
    ///
    /// Falls back to the whole run the registry last saw the issue in when
    /// its decoration is gone, e.g. after an apply in the same block.
    pub fn scroll_to_issue(&mut self, id: &IssueId) -> Result<DocRange, SuggestionError> {
        self.selected = Some(id.clone());
        let range = self.decorations.find_range(id).or_else(|| {
            let path = self.registry.resolve(id)?.path;
            let len = self.doc.run(path)?.char_len();
            Some(DocRange::new(path, 0, len))
        });
        let Some(range) = range else {
            log::warn!("no range found for issue {id}");
            return Err(SuggestionError::RangeNotFound(id.clone()));
        };
        self.doc.select(range);
        Ok(range)
    }

    pub fn apply_suggestion(&mut self, id: &IssueId, replacement: &str, now: Instant) -> bool {
        match suggestions::apply_suggestion(&mut self.doc, &self.decorations, id, replacement) {
            Ok((_, record)) => {
                // Offsets in the edited block, and in the map for every block
                // after it, no longer match the text until re-analysis
                self.decorations.drop_block(record.range.path.block);
                self.analysis_map = None;
                self.applied.insert(id.clone(), record);
                self.notice = Some(APPLIED_NOTICE.to_string());
                self.document_changed(now);
                true
            }
            Err(error) => {
                log::warn!("failed to apply suggestion: {error}");
                self.notice = Some(APPLY_FAILED_NOTICE.to_string());
                false
            }
        }
    }

    /// Best-effort undo; the issue is unapplied and re-analysis is forced
    pub fn revert_suggestion(&mut self, id: &IssueId, now: Instant) -> bool {
        let record = match self.applied.take(id) {
            Ok(record) => record,
            Err(error) => {
                log::warn!("cannot undo {id}: {error}");
                self.notice = Some(UNDO_FAILED_NOTICE.to_string());
                return false;
            }
        };

        match suggestions::revert_suggestion(&mut self.doc, &record) {
            Ok(RevertOutcome::Restored(_)) => {
                log::debug!("restored original text of {id}");
                self.document_changed(now);
            }
            Ok(RevertOutcome::Reanalyze) => {}
            Err(error) => log::warn!("could not restore original text of {id}: {error}"),
        }

        self.request_analysis(now);
        if !self.shut_down {
            self.decoration_timer.schedule(now);
        }
        self.notice = Some(UNDONE_NOTICE.to_string());
        true
    }

    /// Cancel every timer; later polls and completions are inert
    pub fn shutdown(&mut self) {
        self.change_timer.cancel();
        self.analysis_timer.cancel();
        self.decoration_timer.cancel();
        self.shut_down = true;
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    fn run_change_pass(&mut self, now: Instant) {
        let content = self.doc.text().trim().to_string();
        if content == self.last_content {
            return;
        }
        self.last_content = content;
        self.results = None;
        self.registry.clear();
        self.decoration_timer.schedule(now);
        if self.options.should_analyze {
            self.is_loading = true;
            self.analysis_timer.schedule(now);
        }
    }

    fn run_analysis_pass(&mut self, now: Instant) -> Option<AnalysisRequest> {
        let visible = flatten_visible(&self.doc, &self.viewport);
        if visible.is_blank() {
            self.is_loading = false;
            self.results = None;
            self.analysis_map = None;
            self.error = None;
            self.decoration_timer.schedule(now);
            return None;
        }
        self.is_loading = true;
        Some(AnalysisRequest {
            text: visible.text,
            map: visible.map,
        })
    }

    fn rebuild_decorations(&mut self) {
        self.decorations = match (&self.results, &self.analysis_map) {
            (Some(results), Some(map)) => {
                let issues = unify(results, self.filter, &self.applied.ids());
                DecorationSet::build(&self.doc, map, &issues, &mut self.registry)
            }
            _ => {
                self.registry.clear();
                DecorationSet::default()
            }
        };
    }
}
