use std::ops::Range;

use crate::editing::Selection;

/// Result of applying an edit
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    /// Block indices touched by the edit, in post-edit coordinates
    pub changed_blocks: Range<usize>,
    pub new_selection: Option<Selection>,
    pub version: u64,
}
