/*!
 * # Editing Core Module
 *
 * The document model the decoration engine works against, and the mapping
 * between that model and the flat text the analysis service sees.
 *
 * ## Architecture Overview
 *
 * ### 1. Block-Structured Document
 * - A **`Document`** is an ordered list of **blocks** (paragraphs), each an
 *   ordered list of **runs** (text sharing one style)
 * - Runs are the unit decorations attach to; blocks are the unit the offset
 *   map tracks
 * - All positions are counted in characters, matching the analysis service
 *
 * ### 2. Validated, All-or-Nothing Edits
 * - Structural edits (`insert_text`, `replace_range`, `split_block`, ...)
 *   check every coordinate before touching the model
 * - `without_normalizing` groups edits into one batch that is normalized once
 *   and rolled back entirely if any step fails
 * - Every successful edit bumps the document **version** and returns a `Patch`
 *
 * ### 3. Flattened Visible Text
 * - `flatten_visible` joins the blocks inside a `Viewport` with `\n`
 * - The accompanying `OffsetMap` records where each visible block starts
 * - Both are snapshots: any edit or scroll invalidates them
 *
 * ## Module Structure
 *
 * - **`document`**: `Document`, `Block`, `Run`, paths, ranges and edits
 * - **`offsets`**: `Viewport`, `OffsetMap`, `VisibleText`, `flatten_visible`
 * - **`patch`**: Edit result metadata
 *
 * ## Usage Pattern
 *
 * ```rust
 * use textlens_engine::editing::*;
 *
 * let mut doc = Document::from_text("Teh quick fox\nsecond line");
 * let visible = flatten_visible(&doc, &Viewport::all());
 * assert_eq!(visible.map.get(1), Some(14));
 *
 * let patch = doc
 *     .replace_range(DocRange::new(RunPath::new(0, 0), 0, 3), "The")
 *     .unwrap();
 * assert_eq!(patch.version, doc.version());
 * assert_eq!(doc.text(), "The quick fox\nsecond line");
 * ```
 */

pub mod document;
pub mod offsets;
pub mod patch;

pub use document::{
    Block, DocRange, Document, EditError, Point, Run, RunPath, RunStyle, Selection,
};
pub use offsets::{OffsetMap, Viewport, VisibleText, flatten_visible};
pub use patch::Patch;
