use std::cell::RefCell;
use std::fmt::Write;
use std::time::{Duration, Instant};

use insta::assert_snapshot;
use pretty_assertions::assert_eq;
use textlens_engine::analysis::AnalysisResponse;
use textlens_engine::session::APPLY_FAILED_NOTICE;
use textlens_engine::{
    AnalysisError, AnalysisService, Completion, Document, EditorSession, IssueId, IssueType,
    SessionOptions,
};

const TEXT: &str = "Their is a problem with teh chairman's report.\nIt were written quick.";

/// Answers every request with the fixture, or a fixed error status, and
/// records the texts sent
struct FakeService {
    status: Option<u16>,
    requests: RefCell<Vec<String>>,
}

impl FakeService {
    fn canned() -> Self {
        Self {
            status: None,
            requests: RefCell::new(Vec::new()),
        }
    }

    fn failing(status: u16) -> Self {
        Self {
            status: Some(status),
            requests: RefCell::new(Vec::new()),
        }
    }
}

impl AnalysisService for FakeService {
    fn analyze(&self, text: &str) -> Result<AnalysisResponse, AnalysisError> {
        self.requests.borrow_mut().push(text.to_string());
        match self.status {
            Some(status) => Err(AnalysisError::from_status(status)),
            None => Ok(fixture()),
        }
    }

    fn paraphrase(&self, text: &str) -> Result<String, AnalysisError> {
        Ok(text.to_uppercase())
    }
}

fn fixture() -> AnalysisResponse {
    serde_json::from_str(include_str!("fixtures/analysis_response.json")).unwrap()
}

fn analyzed_session(options: SessionOptions) -> (EditorSession, Instant) {
    let now = Instant::now();
    let mut session = EditorSession::new(Document::from_text(TEXT), options);
    let completion = session.analyze_blocking(&FakeService::canned(), now);
    assert_eq!(completion, Some(Completion::Updated));
    (session, now)
}

fn render(session: &EditorSession) -> String {
    let mut out = String::new();
    for (path, run) in session.document().text_runs() {
        for leaf in session.leaf_decorations(path) {
            let text: String = run
                .text
                .chars()
                .skip(leaf.range.start)
                .take(leaf.range.len())
                .collect();
            let types: Vec<_> = leaf.types.iter().map(IssueType::as_str).collect();
            let ids: Vec<_> = leaf.issue_ids.iter().map(IssueId::as_str).collect();
            writeln!(
                out,
                "{path} {:?} {text:?} [{}] ids={}",
                leaf.range,
                types.join(","),
                ids.join(",")
            )
            .unwrap();
        }
    }
    out
}

#[test]
fn grammar_filter_decorates_grammar_issues_only() {
    let (session, _) = analyzed_session(SessionOptions::default());

    let ids: Vec<_> = session.issues().into_iter().map(|issue| issue.id.0).collect();
    assert_eq!(
        ids,
        vec!["grammar-0-8", "grammar-24-3", "grammar-47-7", "grammar-50-4"]
    );
    assert_snapshot!(render(&session), @r#"
    [0, 0] 0..8 "Their is" [grammar] ids=grammar-0-8
    [0, 0] 24..27 "teh" [grammar] ids=grammar-24-3
    [1, 0] 0..7 "It were" [grammar] ids=grammar-47-7,grammar-50-4
    "#);
}

#[test]
fn unfiltered_view_keeps_types_apart() {
    let (mut session, now) = analyzed_session(SessionOptions::default());

    session.set_filter(None, now);
    session.poll(now + Duration::from_millis(300));

    assert_snapshot!(render(&session), @r#"
    [0, 0] 0..46 "Their is a problem with teh chairman's report." [readability] ids=readability-0-46
    [0, 0] 0..8 "Their is" [grammar] ids=grammar-0-8
    [0, 0] 24..27 "teh" [grammar] ids=grammar-24-3
    [0, 0] 28..36 "chairman" [inclusive] ids=inc-chairman
    [1, 0] 0..7 "It were" [grammar] ids=grammar-47-7,grammar-50-4
    [1, 0] 16..21 "quick" [synonym] ids=synonym-63-5
    "#);

    let summary = session.summary();
    assert_eq!(summary.stats.active, 7);
    assert_eq!(summary.stats.count(IssueType::Grammar), 4);
    assert_eq!(summary.tone.as_deref(), Some("neutral"));
    assert_eq!(summary.readability_level.as_deref(), Some("Standard"));
}

#[test]
fn apply_then_reanalyze() {
    let (mut session, now) = analyzed_session(SessionOptions::default());
    let service = FakeService::canned();
    let id = IssueId::from("grammar-24-3");

    assert!(session.apply_suggestion(&id, "the", now));
    assert_eq!(
        session.document().text(),
        "Their is a problem with the chairman's report.\nIt were written quick."
    );
    assert!(session.applied().contains(&id));
    assert!(session.issues().iter().all(|issue| issue.id != id));

    // change pass, then the analysis window
    assert_eq!(session.poll(now + Duration::from_millis(500)), None);
    assert!(session.is_loading());
    let request = session.poll(now + Duration::from_millis(1500)).unwrap();
    assert!(request.text.contains("the chairman"));

    let outcome = service.analyze(&request.text);
    let completion = session.complete_analysis(request, outcome, now + Duration::from_millis(1600));
    assert_eq!(completion, Completion::Updated);
    assert_eq!(service.requests.borrow().len(), 1);
}

#[test]
fn second_apply_in_same_block_waits_for_reanalysis() {
    let (mut session, now) = analyzed_session(SessionOptions::default());
    let later = now + Duration::from_millis(400);

    assert!(session.apply_suggestion(&IssueId::from("grammar-0-8"), "There is", now));
    assert!(!session.apply_suggestion(&IssueId::from("grammar-24-3"), "the", later));
    assert_eq!(session.take_notice().as_deref(), Some(APPLY_FAILED_NOTICE));
    assert_eq!(
        session.document().text(),
        "There is a problem with teh chairman's report.\nIt were written quick."
    );

    // the registry still knows which run the issue was in
    let range = session.scroll_to_issue(&IssueId::from("grammar-24-3")).unwrap();
    assert_eq!((range.path.block, range.start, range.end), (0, 0, 46));

    // other blocks keep their decorations
    assert_snapshot!(render(&session), @r#"
    [1, 0] 0..7 "It were" [grammar] ids=grammar-47-7,grammar-50-4
    "#);
    assert!(session.apply_suggestion(&IssueId::from("grammar-47-7"), "It was", later));
    assert_eq!(
        session.document().text(),
        "There is a problem with teh chairman's report.\nIt was written quick."
    );
}

#[test]
fn apply_inside_merged_group_replaces_whole_group() {
    let (mut session, now) = analyzed_session(SessionOptions::default());

    assert!(session.apply_suggestion(&IssueId::from("grammar-50-4"), "was", now));

    assert_eq!(
        session.document().text(),
        "Their is a problem with teh chairman's report.\nwas written quick."
    );
}

#[test]
fn apply_unknown_issue_changes_nothing() {
    let (mut session, now) = analyzed_session(SessionOptions::default());
    let before = session.document().text();

    assert!(!session.apply_suggestion(&IssueId::from("missing-id"), "x", now));

    assert_eq!(session.document().text(), before);
    assert_eq!(session.take_notice().as_deref(), Some(APPLY_FAILED_NOTICE));
    assert_eq!(session.next_deadline(), None);
}

#[test]
fn revert_restores_untouched_text_and_forces_analysis() {
    let (mut session, now) = analyzed_session(SessionOptions::default());
    let id = IssueId::from("grammar-0-8");

    assert!(session.apply_suggestion(&id, "There is", now));
    assert!(session.revert_suggestion(&id, now));

    assert_eq!(session.document().text(), TEXT);
    assert!(session.applied().is_empty());
    assert!(session.is_loading());
    assert!(!session.revert_suggestion(&id, now));
}

#[test]
fn scroll_to_issue_selects_its_range() {
    let (mut session, _) = analyzed_session(SessionOptions::default());

    let range = session.scroll_to_issue(&IssueId::from("grammar-50-4")).unwrap();

    // the issue lives inside the merged "It were" decoration
    assert_eq!((range.path.block, range.start, range.end), (1, 0, 7));
    assert_eq!(session.document().selection(), Some(range.to_selection()));
    assert!(session.scroll_to_issue(&IssueId::from("nope")).is_err());
}

#[test]
fn response_for_outdated_text_is_discarded() {
    let start = Instant::now();
    let mut session = EditorSession::new(Document::from_text(TEXT), SessionOptions::default());
    session.request_analysis(start);
    let request = session.poll(start + Duration::from_secs(1)).unwrap();

    session
        .edit(start + Duration::from_millis(1100), |doc| {
            doc.insert_text(doc.end(), " Really.")
        })
        .unwrap();

    let completion = session.complete_analysis(request, Ok(fixture()), start + Duration::from_millis(1200));
    assert_eq!(completion, Completion::Stale);
    assert!(session.results().is_none());
    assert!(session.is_loading());
}

#[test]
fn failed_analysis_keeps_document_and_reports() {
    let mut session = EditorSession::new(Document::from_text(TEXT), SessionOptions::default());
    let service = FakeService::failing(400);

    let completion = session.analyze_blocking(&service, Instant::now());

    assert_eq!(
        completion,
        Some(Completion::Failed("API error: Status 400".to_string()))
    );
    assert_eq!(session.error(), Some("API error: Status 400"));
    assert_eq!(session.document().text(), TEXT);
    assert!(session.decorations().is_empty());
}

#[test]
fn blank_document_never_calls_the_service() {
    let service = FakeService::canned();
    let mut session = EditorSession::new(Document::from_text(" \n "), SessionOptions::default());

    assert_eq!(session.analyze_blocking(&service, Instant::now()), None);
    assert!(service.requests.borrow().is_empty());
    assert_eq!(service.paraphrase("abc").unwrap(), "ABC");
}
