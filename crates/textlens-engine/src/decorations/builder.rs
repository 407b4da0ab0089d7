//! Projection of unified issues onto the runs of a [`Document`].

use std::collections::BTreeSet;
use std::ops::Range;
use std::sync::Arc;

use crate::analysis::{IssueId, IssueType, SourceIssue, UnifiedIssue};
use crate::decorations::RangeRegistry;
use crate::editing::{Document, OffsetMap, RunPath};

/// One issue clipped to one run, in run-local char offsets
#[derive(Debug, Clone, PartialEq)]
pub struct RawDecoration {
    pub path: RunPath,
    pub range: Range<usize>,
    pub issue_type: IssueType,
    pub message: String,
    pub suggestions: Vec<String>,
    pub issue_id: IssueId,
    pub original: Arc<SourceIssue>,
}

/// Intersection of `issue` with a run, relative to the run start.
///
/// `block_start` is the block's offset in the analyzed text and
/// `run_start_in_block` the run's offset inside its block. Returns `None`
/// when the issue does not touch the run.
pub fn calculate_offsets(
    issue: &UnifiedIssue,
    block_start: usize,
    run_start_in_block: usize,
    run_len: usize,
) -> Option<Range<usize>> {
    let run_start = block_start + run_start_in_block;
    let run_end = run_start + run_len;

    if issue.end() <= run_start || issue.start >= run_end {
        return None;
    }

    let start = issue.start.saturating_sub(run_start);
    let end = (issue.end() - run_start).min(run_len);
    Some(start..end)
}

/// Raw decorations for every run of every analyzed block.
///
/// The registry is rebuilt from scratch: each issue ends up recorded at the
/// last run it touched.
pub fn build_raw_decorations(
    doc: &Document,
    map: &OffsetMap,
    issues: &[UnifiedIssue],
    registry: &mut RangeRegistry,
) -> Vec<RawDecoration> {
    registry.clear();
    let mut decorations = Vec::new();
    let mut skipped_blocks = BTreeSet::new();

    for (path, run) in doc.text_runs() {
        let Some(block_start) = map.get(path.block) else {
            skipped_blocks.insert(path.block);
            continue;
        };
        let Some(run_start) = doc.run_offset_in_block(path) else {
            continue;
        };
        let run_len = run.char_len();

        for issue in issues {
            let Some(range) = calculate_offsets(issue, block_start, run_start, run_len) else {
                continue;
            };
            registry.record(issue.id.clone(), path, Arc::clone(&issue.original));
            decorations.push(RawDecoration {
                path,
                range,
                issue_type: issue.issue_type,
                message: issue.message.clone(),
                suggestions: issue.suggestions.clone(),
                issue_id: issue.id.clone(),
                original: Arc::clone(&issue.original),
            });
        }
    }

    if !skipped_blocks.is_empty() {
        log::debug!(
            "skipped {} blocks outside the analyzed text",
            skipped_blocks.len()
        );
    }

    decorations
}
