//! Everything on the analysis side of the pipeline: the wire contract, the
//! HTTP client, and the conversion of analyzer output into unified issues.

pub mod client;
pub mod summary;
pub mod types;
pub mod unify;

pub use client::{API_KEY_HEADER, AnalysisError, AnalysisService, HttpAnalysisService};
pub use summary::{AnalysisSummary, IssueStats};
pub use types::{AnalysisResponse, AnalysisResultsData, Section};
pub use unify::{IssueId, IssueType, SourceIssue, UnifiedIssue, UnknownIssueType, collect_issues, unify};
