//! Coalescing of overlapping raw decorations into compound ones.

use std::ops::Range;
use std::sync::Arc;

use crate::analysis::{IssueId, IssueType, SourceIssue};
use crate::decorations::RawDecoration;
use crate::editing::RunPath;

/// One issue's contribution to a [`MergedDecoration`]
#[derive(Debug, Clone, PartialEq)]
pub struct DecorationMember {
    pub issue_id: IssueId,
    pub issue_type: IssueType,
    pub message: String,
    pub suggestions: Vec<String>,
    pub original: Arc<SourceIssue>,
}

/// A run-local span shared by one or more issues.
///
/// Members are kept in merge order and never repeat an issue id.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedDecoration {
    pub path: RunPath,
    pub range: Range<usize>,
    pub members: Vec<DecorationMember>,
}

impl MergedDecoration {
    fn open(raw: RawDecoration) -> Self {
        Self {
            path: raw.path,
            range: raw.range.clone(),
            members: vec![DecorationMember {
                issue_id: raw.issue_id,
                issue_type: raw.issue_type,
                message: raw.message,
                suggestions: raw.suggestions,
                original: raw.original,
            }],
        }
    }

    /// Distinct types in first-seen order
    pub fn types(&self) -> Vec<IssueType> {
        let mut types = Vec::new();
        for member in &self.members {
            if !types.contains(&member.issue_type) {
                types.push(member.issue_type);
            }
        }
        types
    }

    pub fn issue_ids(&self) -> impl Iterator<Item = &IssueId> + '_ {
        self.members.iter().map(|member| &member.issue_id)
    }

    pub fn contains(&self, id: &IssueId) -> bool {
        self.members.iter().any(|member| &member.issue_id == id)
    }

    pub fn has_type(&self, issue_type: IssueType) -> bool {
        self.members.iter().any(|member| member.issue_type == issue_type)
    }

    fn accepts(&self, next: &RawDecoration) -> bool {
        if self.path != next.path || self.range.end < next.range.start {
            return false;
        }
        let single_type = self
            .members
            .iter()
            .all(|member| member.issue_type == next.issue_type);
        single_type || self.contains(&next.issue_id)
    }

    fn absorb(&mut self, next: RawDecoration) {
        self.range.end = self.range.end.max(next.range.end);
        if self.contains(&next.issue_id) {
            return;
        }
        self.members.push(DecorationMember {
            issue_id: next.issue_id,
            issue_type: next.issue_type,
            message: next.message,
            suggestions: next.suggestions,
            original: next.original,
        });
    }
}

/// Merge raw decorations into compound decorations ordered by run and start.
///
/// Decorations are sorted by (run, start ascending, end descending) and swept
/// once. A decoration joins the open group when it starts at or before the
/// group's end and either every member so far shares its type or its issue id
/// is already a member. Groups never span runs.
pub fn merge_overlapping(mut decorations: Vec<RawDecoration>) -> Vec<MergedDecoration> {
    decorations.sort_by(|a, b| {
        a.path
            .cmp(&b.path)
            .then(a.range.start.cmp(&b.range.start))
            .then(b.range.end.cmp(&a.range.end))
    });

    let mut merged = Vec::new();
    let mut current: Option<MergedDecoration> = None;

    for next in decorations {
        match current.as_mut() {
            Some(group) if group.accepts(&next) => group.absorb(next),
            _ => {
                if let Some(done) = current.replace(MergedDecoration::open(next)) {
                    merged.push(done);
                }
            }
        }
    }
    merged.extend(current);
    merged
}
