pub mod analysis;
pub mod decorations;
pub mod editing;
pub mod io;
pub mod session;
pub mod suggestions;

// Re-export key types for easier usage
pub use analysis::{
    AnalysisError, AnalysisService, AnalysisSummary, HttpAnalysisService, IssueId, IssueType,
    UnifiedIssue,
};
pub use decorations::{DecorationSet, LeafDecoration, RangeRegistry};
pub use editing::{DocRange, Document, EditError, Point, RunPath, Selection, Viewport};
pub use io::*;
pub use session::{AnalysisRequest, Completion, EditorSession, SessionOptions};
pub use suggestions::{AppliedSuggestion, AppliedSuggestions, SuggestionError};
