//! Applying suggested fixes to the document and undoing them.
//!
//! Apply is exact and atomic. Revert is best-effort: the original text is
//! only written back when nothing has touched the document since the apply.
//! Either way the caller is expected to re-analyze afterwards.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::analysis::IssueId;
use crate::decorations::DecorationSet;
use crate::editing::{DocRange, Document, EditError, Patch};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SuggestionError {
    #[error("Could not apply suggestion {0}: the text may have changed")]
    RangeNotFound(IssueId),

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error("Suggestion was not applied")]
    NotApplied,
}

/// Undo record for one applied suggestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedSuggestion {
    pub original_text: String,
    pub replacement: String,
    /// Where the replacement sits right after the apply
    pub range: DocRange,
    /// Document version right after the apply
    pub version: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RevertOutcome {
    /// The original text was written back in place
    Restored(Patch),
    /// The document moved on; only re-analysis can reconcile it
    Reanalyze,
}

/// Replace the live range of `id` with `replacement`.
///
/// The range comes from the current decorations. Selecting and replacing
/// happen in one batch, so a failure leaves the document untouched.
pub fn apply_suggestion(
    doc: &mut Document,
    decorations: &DecorationSet,
    id: &IssueId,
    replacement: &str,
) -> Result<(Patch, AppliedSuggestion), SuggestionError> {
    let range = decorations
        .find_range(id)
        .ok_or_else(|| SuggestionError::RangeNotFound(id.clone()))?;
    let original_text = doc.text_in_range(range)?;
    let block_start = doc
        .run_offset_in_block(range.path)
        .ok_or(EditError::RunOutOfBounds(range.path))?
        + range.start;

    let patch = doc.without_normalizing(|doc| {
        doc.select(range);
        doc.replace_range(range, replacement)
    })?;

    let replaced = block_start..block_start + replacement.chars().count();
    let applied_range = doc
        .range_in_block(range.path.block, replaced)
        .ok_or(EditError::RunOutOfBounds(range.path))?;

    log::debug!("applied suggestion {id} at {}", range.path);
    let record = AppliedSuggestion {
        original_text,
        replacement: replacement.to_string(),
        range: applied_range,
        version: doc.version(),
    };
    Ok((patch, record))
}

/// Undo an applied suggestion as far as the document allows
pub fn revert_suggestion(
    doc: &mut Document,
    applied: &AppliedSuggestion,
) -> Result<RevertOutcome, SuggestionError> {
    if doc.version() != applied.version {
        log::debug!(
            "document changed since apply (v{} -> v{}), deferring to re-analysis",
            applied.version,
            doc.version()
        );
        return Ok(RevertOutcome::Reanalyze);
    }
    match doc.text_in_range(applied.range) {
        Ok(current) if current == applied.replacement => {}
        _ => return Ok(RevertOutcome::Reanalyze),
    }

    let patch = doc.without_normalizing(|doc| {
        doc.select(applied.range);
        doc.replace_range(applied.range, &applied.original_text)
    })?;
    Ok(RevertOutcome::Restored(patch))
}

/// Applied suggestions by issue id, the UI-side undo state
#[derive(Debug, Clone, Default)]
pub struct AppliedSuggestions {
    records: HashMap<IssueId, AppliedSuggestion>,
}

impl AppliedSuggestions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: IssueId, record: AppliedSuggestion) {
        self.records.insert(id, record);
    }

    pub fn get(&self, id: &IssueId) -> Option<&AppliedSuggestion> {
        self.records.get(id)
    }

    /// Take the record for `id`, marking the issue unapplied
    pub fn take(&mut self, id: &IssueId) -> Result<AppliedSuggestion, SuggestionError> {
        self.records.remove(id).ok_or(SuggestionError::NotApplied)
    }

    pub fn contains(&self, id: &IssueId) -> bool {
        self.records.contains_key(id)
    }

    pub fn ids(&self) -> HashSet<IssueId> {
        self.records.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
