//! Normalization of the four analyzer result shapes into [`UnifiedIssue`]s.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::types::{
    AnalysisResultsData, GrammarIssue, InclusiveIssue, ReadabilityIssue, Section,
    SynonymSuggestion,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
    Grammar,
    Inclusive,
    Synonym,
    Readability,
}

impl IssueType {
    /// Every type, in the order sections are unified
    pub const ALL: [IssueType; 4] = [
        IssueType::Grammar,
        IssueType::Inclusive,
        IssueType::Synonym,
        IssueType::Readability,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::Grammar => "grammar",
            IssueType::Inclusive => "inclusive",
            IssueType::Synonym => "synonym",
            IssueType::Readability => "readability",
        }
    }

    /// Human readable label for panels and badges
    pub fn label(&self) -> &'static str {
        match self {
            IssueType::Grammar => "Grammar",
            IssueType::Inclusive => "Inclusive Language",
            IssueType::Synonym => "Synonym",
            IssueType::Readability => "Readability",
        }
    }

    /// The type following this one, wrapping around
    pub fn next(&self) -> IssueType {
        match self {
            IssueType::Grammar => IssueType::Inclusive,
            IssueType::Inclusive => IssueType::Synonym,
            IssueType::Synonym => IssueType::Readability,
            IssueType::Readability => IssueType::Grammar,
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown issue type: {0}")]
pub struct UnknownIssueType(pub String);

impl FromStr for IssueType {
    type Err = UnknownIssueType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grammar" => Ok(IssueType::Grammar),
            "inclusive" | "inclusive_language" => Ok(IssueType::Inclusive),
            "synonym" | "synonyms" => Ok(IssueType::Synonym),
            "readability" => Ok(IssueType::Readability),
            _ => Err(UnknownIssueType(s.to_string())),
        }
    }
}

/// Identifier of one issue within one analysis response
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IssueId(pub String);

impl IssueId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for IssueId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// The analyzer record an issue was derived from
#[derive(Debug, Clone, PartialEq)]
pub enum SourceIssue {
    Grammar(GrammarIssue),
    Inclusive(InclusiveIssue),
    Synonym(SynonymSuggestion),
    Readability(ReadabilityIssue),
}

impl SourceIssue {
    pub fn issue_type(&self) -> IssueType {
        match self {
            SourceIssue::Grammar(_) => IssueType::Grammar,
            SourceIssue::Inclusive(_) => IssueType::Inclusive,
            SourceIssue::Synonym(_) => IssueType::Synonym,
            SourceIssue::Readability(_) => IssueType::Readability,
        }
    }

    /// Text the analyzer flagged, as it reported it
    pub fn original_segment(&self) -> &str {
        match self {
            SourceIssue::Grammar(issue) => &issue.original_segment,
            SourceIssue::Inclusive(issue) => &issue.term,
            SourceIssue::Synonym(suggestion) => &suggestion.original_word,
            SourceIssue::Readability(issue) => &issue.original_segment,
        }
    }

    pub fn severity(&self) -> Option<&str> {
        let severity = match self {
            SourceIssue::Grammar(issue) => &issue.severity,
            SourceIssue::Readability(issue) => &issue.severity,
            SourceIssue::Inclusive(_) | SourceIssue::Synonym(_) => return None,
        };
        (!severity.is_empty()).then_some(severity.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnifiedIssue {
    pub id: IssueId,
    pub issue_type: IssueType,
    /// Character offset into the analyzed text
    pub start: usize,
    pub length: usize,
    pub message: String,
    pub suggestions: Vec<String>,
    pub original: Arc<SourceIssue>,
}

impl UnifiedIssue {
    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

/// Issues of the active filter that have not been applied yet
pub fn unify(
    results: &AnalysisResultsData,
    filter: Option<IssueType>,
    applied: &HashSet<IssueId>,
) -> Vec<UnifiedIssue> {
    collect_issues(results, filter)
        .into_iter()
        .filter(|issue| !applied.contains(&issue.id))
        .collect()
}

/// Every issue in the response, optionally restricted to one type.
///
/// Sections are visited in [`IssueType::ALL`] order. Ids are unique within
/// the result; a colliding synthetic id gets a `-2`, `-3`, ... suffix.
pub fn collect_issues(results: &AnalysisResultsData, filter: Option<IssueType>) -> Vec<UnifiedIssue> {
    let mut issues = Vec::new();

    for issue_type in IssueType::ALL {
        if filter.is_some_and(|wanted| wanted != issue_type) {
            continue;
        }
        match issue_type {
            IssueType::Grammar => {
                if let Some(data) = section_data("grammar", results.grammar()) {
                    issues.extend(data.issues.into_iter().filter_map(from_grammar));
                }
            }
            IssueType::Inclusive => {
                if let Some(data) = section_data("inclusive_language", results.inclusive_language())
                {
                    issues.extend(data.issues.into_iter().filter_map(from_inclusive));
                }
            }
            IssueType::Synonym => {
                if let Some(data) = section_data("synonyms", results.synonyms()) {
                    issues.extend(data.suggestions.into_iter().filter_map(from_synonym));
                }
            }
            IssueType::Readability => {
                if let Some(data) = section_data("readability", results.readability()) {
                    issues.extend(
                        data.readability_issues
                            .unwrap_or_default()
                            .into_iter()
                            .filter_map(from_readability),
                    );
                }
            }
        }
    }

    dedupe_ids(&mut issues);
    issues
}

fn section_data<T>(name: &str, section: Section<T>) -> Option<T> {
    match section {
        Section::Success(data) => Some(data),
        Section::Error(message) => {
            log::info!("{name} analysis failed: {message}");
            None
        }
        Section::Skipped(message) => {
            log::debug!("{name} analysis skipped: {message}");
            None
        }
        Section::Missing => None,
        Section::Malformed(reason) => {
            log::warn!("ignoring malformed {name} section: {reason}");
            None
        }
    }
}

/// Validated `(start, length)` in chars; `None` for negative starts or empty spans
fn span(start: i64, length: i64) -> Option<(usize, usize)> {
    if start < 0 || length <= 0 {
        log::debug!("dropping issue with invalid span {start}+{length}");
        return None;
    }
    Some((usize::try_from(start).ok()?, usize::try_from(length).ok()?))
}

/// Like [`span`] for records carrying `start..end` char bounds
fn char_span(start: i64, end: i64) -> Option<(usize, usize)> {
    let Some(length) = end.checked_sub(start) else {
        log::debug!("dropping issue with out of range span {start}..{end}");
        return None;
    };
    span(start, length)
}

fn synthetic_id(issue_type: IssueType, start: usize, length: usize) -> IssueId {
    IssueId(format!("{issue_type}-{start}-{length}"))
}

fn from_grammar(issue: GrammarIssue) -> Option<UnifiedIssue> {
    let (start, length) = span(issue.offset, issue.length)?;
    let suggestions = if issue.suggested_segment.is_empty() {
        Vec::new()
    } else {
        vec![issue.suggested_segment.clone()]
    };
    Some(UnifiedIssue {
        id: synthetic_id(IssueType::Grammar, start, length),
        issue_type: IssueType::Grammar,
        start,
        length,
        message: issue.message.clone(),
        suggestions,
        original: Arc::new(SourceIssue::Grammar(issue)),
    })
}

fn from_inclusive(issue: InclusiveIssue) -> Option<UnifiedIssue> {
    let (start, length) = char_span(issue.start_char, issue.end_char)?;
    let id = if issue.id.trim().is_empty() {
        synthetic_id(IssueType::Inclusive, start, length)
    } else {
        IssueId(issue.id.clone())
    };
    Some(UnifiedIssue {
        id,
        issue_type: IssueType::Inclusive,
        start,
        length,
        message: issue.note.clone(),
        suggestions: issue.suggestions.clone(),
        original: Arc::new(SourceIssue::Inclusive(issue)),
    })
}

fn from_synonym(suggestion: SynonymSuggestion) -> Option<UnifiedIssue> {
    let (start, length) = char_span(suggestion.start_char, suggestion.end_char)?;
    Some(UnifiedIssue {
        id: synthetic_id(IssueType::Synonym, start, length),
        issue_type: IssueType::Synonym,
        start,
        length,
        message: format!("Consider a synonym for \"{}\"", suggestion.original_word),
        suggestions: suggestion.suggestions.clone(),
        original: Arc::new(SourceIssue::Synonym(suggestion)),
    })
}

fn from_readability(issue: ReadabilityIssue) -> Option<UnifiedIssue> {
    let (start, length) = span(issue.offset, issue.length)?;
    Some(UnifiedIssue {
        id: synthetic_id(IssueType::Readability, start, length),
        issue_type: IssueType::Readability,
        start,
        length,
        message: issue.message.clone(),
        suggestions: Vec::new(),
        original: Arc::new(SourceIssue::Readability(issue)),
    })
}

fn dedupe_ids(issues: &mut [UnifiedIssue]) {
    let mut seen: HashMap<IssueId, usize> = HashMap::new();
    for issue in issues.iter_mut() {
        let count = {
            let count = seen.entry(issue.id.clone()).or_insert(0);
            *count += 1;
            *count
        };
        if count > 1 {
            let mut n = count;
            let mut candidate = IssueId(format!("{}-{n}", issue.id));
            while seen.contains_key(&candidate) {
                n += 1;
                candidate = IssueId(format!("{}-{n}", issue.id));
            }
            seen.insert(issue.id.clone(), n);
            seen.insert(candidate.clone(), 1);
            issue.id = candidate;
        }
    }
}
