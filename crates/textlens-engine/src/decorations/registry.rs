use std::collections::HashMap;
use std::sync::Arc;

use crate::analysis::{IssueId, SourceIssue};
use crate::editing::RunPath;

/// Where an issue was last decorated
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryEntry {
    pub path: RunPath,
    pub original: Arc<SourceIssue>,
}

/// Issue id → last known run, rebuilt on every decoration pass.
///
/// This is a derived index only. An id missing from the latest pass has no
/// entry even if it resolved a moment ago. Entries outlive the decorations
/// dropped by an apply, so the session can still scroll to the run an issue
/// was last seen in.
#[derive(Debug, Clone, Default)]
pub struct RangeRegistry {
    entries: HashMap<IssueId, RegistryEntry>,
}

impl RangeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or overwrite) the location of an issue
    pub fn record(&mut self, id: IssueId, path: RunPath, original: Arc<SourceIssue>) {
        self.entries.insert(id, RegistryEntry { path, original });
    }

    pub fn resolve(&self, id: &IssueId) -> Option<&RegistryEntry> {
        self.entries.get(id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::types::GrammarIssue;

    fn source() -> Arc<SourceIssue> {
        Arc::new(SourceIssue::Grammar(GrammarIssue::default()))
    }

    #[test]
    fn test_last_record_wins() {
        let mut registry = RangeRegistry::new();
        let id = IssueId::from("grammar-0-4");

        registry.record(id.clone(), RunPath::new(0, 0), source());
        registry.record(id.clone(), RunPath::new(0, 1), source());

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.resolve(&id).map(|entry| entry.path), Some(RunPath::new(0, 1)));
    }

    #[test]
    fn test_clear_forgets_everything() {
        let mut registry = RangeRegistry::new();
        registry.record(IssueId::from("a"), RunPath::new(2, 0), source());
        registry.clear();

        assert!(registry.is_empty());
        assert!(registry.resolve(&IssueId::from("a")).is_none());
    }
}
