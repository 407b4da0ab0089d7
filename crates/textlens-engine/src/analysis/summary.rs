//! Aggregate figures shown alongside the issue list.

use std::collections::{BTreeMap, HashSet};

use crate::analysis::types::AnalysisResultsData;
use crate::analysis::unify::{IssueId, IssueType, collect_issues};

/// Issue counts per type plus the count left for the active filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueStats {
    /// Unapplied issues of the active filter (all types when unfiltered)
    pub active: usize,
    pub by_type: BTreeMap<IssueType, usize>,
}

impl IssueStats {
    pub fn count(&self, issue_type: IssueType) -> usize {
        self.by_type.get(&issue_type).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisSummary {
    pub stats: IssueStats,
    pub tone: Option<String>,
    pub voice: Option<String>,
    pub passive_ratio: Option<f64>,
    pub readability_level: Option<String>,
}

impl AnalysisSummary {
    pub fn from_results(
        results: &AnalysisResultsData,
        filter: Option<IssueType>,
        applied: &HashSet<IssueId>,
    ) -> Self {
        let all = collect_issues(results, None);

        let mut by_type: BTreeMap<IssueType, usize> =
            IssueType::ALL.iter().map(|&issue_type| (issue_type, 0)).collect();
        for issue in &all {
            *by_type.entry(issue.issue_type).or_insert(0) += 1;
        }

        let active = all
            .iter()
            .filter(|issue| filter.is_none_or(|wanted| wanted == issue.issue_type))
            .filter(|issue| !applied.contains(&issue.id))
            .count();

        let voice = results.voice().success();
        Self {
            stats: IssueStats { active, by_type },
            tone: results.tone().success().map(|data| data.tone),
            passive_ratio: voice.as_ref().map(|data| data.passive_ratio),
            voice: voice.map(|data| data.voice),
            readability_level: results
                .readability()
                .success()
                .map(|data| data.overall_summary.level)
                .filter(|level| !level.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn results() -> AnalysisResultsData {
        serde_json::from_value(json!({
            "grammar": { "status": "success", "data": { "issues": [
                { "offset": 0, "length": 3, "message": "a" },
                { "offset": 5, "length": 2, "message": "b" },
            ]}},
            "synonyms": { "status": "success", "data": { "suggestions": [
                { "original_word": "big", "start_char": 9, "end_char": 12, "suggestions": ["large"] },
            ]}},
            "readability": { "status": "success", "data": {
                "overall_summary": { "level": "Fairly Difficult", "note": "" }
            }},
            "tone": { "status": "success", "data": { "tone": "neutral" } },
            "voice": { "status": "success", "data": { "voice": "Active", "passive_ratio": 0.25 } },
            "inclusive_language": { "status": "error", "message": "down" },
        }))
        .unwrap()
    }

    #[test]
    fn test_summary_counts_before_applied_filter() {
        let applied: HashSet<IssueId> = [IssueId::from("grammar-0-3")].into_iter().collect();
        let summary = AnalysisSummary::from_results(&results(), Some(IssueType::Grammar), &applied);

        assert_eq!(summary.stats.active, 1);
        assert_eq!(summary.stats.count(IssueType::Grammar), 2);
        assert_eq!(summary.stats.count(IssueType::Synonym), 1);
        assert_eq!(summary.stats.count(IssueType::Inclusive), 0);
        assert_eq!(summary.tone.as_deref(), Some("neutral"));
        assert_eq!(summary.voice.as_deref(), Some("Active"));
        assert_eq!(summary.passive_ratio, Some(0.25));
        assert_eq!(summary.readability_level.as_deref(), Some("Fairly Difficult"));
    }

    #[test]
    fn test_summary_of_empty_response() {
        let summary =
            AnalysisSummary::from_results(&AnalysisResultsData::default(), None, &HashSet::new());

        assert_eq!(summary.stats.active, 0);
        assert_eq!(summary.tone, None);
        assert_eq!(summary.readability_level, None);
    }
}
