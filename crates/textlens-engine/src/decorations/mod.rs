/*!
 * # Decorations
 *
 * Turns unified issues into highlights attached to document runs.
 *
 * ## Pipeline
 *
 * 1. **`builder`**: clips every issue against every analyzed run and records
 *    where each issue landed in the **`RangeRegistry`**
 * 2. **`merge`**: sorts the raw decorations and coalesces overlapping ones
 *    into **`MergedDecoration`**s
 * 3. **`DecorationSet`**: the merged result, queried by the editor for
 *    rendering (`for_run`) and by suggestion handling (`find_range`)
 *
 * Everything here is recomputed wholesale on each pass; nothing is patched
 * incrementally.
 */

pub mod builder;
pub mod merge;
pub mod registry;

use std::ops::Range;

pub use builder::{RawDecoration, build_raw_decorations, calculate_offsets};
pub use merge::{DecorationMember, MergedDecoration, merge_overlapping};
pub use registry::{RangeRegistry, RegistryEntry};

use crate::analysis::{IssueId, IssueType, UnifiedIssue};
use crate::editing::{DocRange, Document, OffsetMap, RunPath};

/// Render view of one merged decoration inside a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeafDecoration {
    pub range: Range<usize>,
    pub types: Vec<IssueType>,
    pub messages: Vec<String>,
    /// Suggestions of every member, flattened in member order
    pub suggestions: Vec<String>,
    pub issue_ids: Vec<IssueId>,
    pub is_grammar_error: bool,
    pub is_inclusive_language_error: bool,
    pub is_synonym_suggestion: bool,
    pub is_readability_issue: bool,
    pub is_selected: bool,
}

/// The current merged decorations of a document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecorationSet {
    decorations: Vec<MergedDecoration>,
}

impl DecorationSet {
    /// Run a full decoration pass: build, record, merge
    pub fn build(
        doc: &Document,
        map: &OffsetMap,
        issues: &[UnifiedIssue],
        registry: &mut RangeRegistry,
    ) -> Self {
        let raw = build_raw_decorations(doc, map, issues, registry);
        Self {
            decorations: merge_overlapping(raw),
        }
    }

    pub fn from_merged(decorations: Vec<MergedDecoration>) -> Self {
        Self { decorations }
    }

    pub fn iter(&self) -> impl Iterator<Item = &MergedDecoration> + '_ {
        self.decorations.iter()
    }

    pub fn len(&self) -> usize {
        self.decorations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decorations.is_empty()
    }

    /// Forget every decoration inside `block`
    pub fn drop_block(&mut self, block: usize) {
        self.decorations
            .retain(|decoration| decoration.path.block != block);
    }

    /// Live range of the first decoration carrying `id`
    pub fn find_range(&self, id: &IssueId) -> Option<DocRange> {
        self.decorations
            .iter()
            .find(|decoration| decoration.contains(id))
            .map(|decoration| {
                DocRange::new(decoration.path, decoration.range.start, decoration.range.end)
            })
    }

    pub fn for_run(&self, path: RunPath, selected: Option<&IssueId>) -> Vec<LeafDecoration> {
        self.decorations
            .iter()
            .filter(|decoration| decoration.path == path)
            .map(|decoration| LeafDecoration {
                range: decoration.range.clone(),
                types: decoration.types(),
                messages: decoration
                    .members
                    .iter()
                    .map(|member| member.message.clone())
                    .collect(),
                suggestions: decoration
                    .members
                    .iter()
                    .flat_map(|member| member.suggestions.iter().cloned())
                    .collect(),
                issue_ids: decoration.issue_ids().cloned().collect(),
                is_grammar_error: decoration.has_type(IssueType::Grammar),
                is_inclusive_language_error: decoration.has_type(IssueType::Inclusive),
                is_synonym_suggestion: decoration.has_type(IssueType::Synonym),
                is_readability_issue: decoration.has_type(IssueType::Readability),
                is_selected: selected.is_some_and(|id| decoration.contains(id)),
            })
            .collect()
    }
}
