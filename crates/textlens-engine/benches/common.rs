// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use std::sync::Arc;

use textlens_engine::analysis::SourceIssue;
use textlens_engine::analysis::types::GrammarIssue;
use textlens_engine::{IssueId, IssueType, UnifiedIssue};

#[allow(dead_code)]
pub fn generate_paragraphs(count: usize) -> String {
    let base = "Teh quick brown fox jump over the lazy dog, and then it were gone.";
    vec![base; count].join("\n")
}

/// Overlapping issues spread over `paragraphs` lines of [`generate_paragraphs`] text
#[allow(dead_code)]
pub fn generate_issues(paragraphs: usize) -> Vec<UnifiedIssue> {
    let line_len = generate_paragraphs(1).chars().count() + 1;
    let kinds = IssueType::ALL;

    let mut issues = Vec::new();
    for line in 0..paragraphs {
        let line_start = line * line_len;
        for (i, &(start, length)) in [(0, 3), (0, 9), (20, 4), (22, 10), (56, 7)].iter().enumerate() {
            let start = line_start + start;
            let issue_type = kinds[(line + i) % kinds.len()];
            issues.push(UnifiedIssue {
                id: IssueId(format!("{issue_type}-{start}-{length}")),
                issue_type,
                start,
                length,
                message: "benchmark issue".to_string(),
                suggestions: vec!["fix".to_string()],
                original: Arc::new(SourceIssue::Grammar(GrammarIssue::default())),
            });
        }
    }
    issues
}
