use std::fmt;
use std::ops::Range;

use crate::editing::Patch;

/// Inline formatting shared by every character of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RunStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

/// A contiguous span of text inside a block sharing one [`RunStyle`].
///
/// Runs are the smallest unit decorations attach to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub style: RunStyle,
}

impl Run {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: RunStyle::default(),
        }
    }

    pub fn styled(text: impl Into<String>, style: RunStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// Length in characters (Unicode scalar values)
    pub fn char_len(&self) -> usize {
        char_len(&self.text)
    }
}

/// A paragraph-level unit of the document.
///
/// A block always owns at least one run; an empty paragraph is a single empty run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub(crate) runs: Vec<Run>,
}

impl Default for Block {
    fn default() -> Self {
        Self {
            runs: vec![Run::plain("")],
        }
    }
}

impl Block {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            runs: vec![Run::plain(text)],
        }
    }

    pub fn from_runs(runs: Vec<Run>) -> Self {
        if runs.is_empty() {
            return Self::default();
        }
        Self { runs }
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    pub fn char_len(&self) -> usize {
        self.runs.iter().map(Run::char_len).sum()
    }
}

/// Location of a run: block index plus run index within that block
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunPath {
    pub block: usize,
    pub run: usize,
}

impl RunPath {
    pub fn new(block: usize, run: usize) -> Self {
        Self { block, run }
    }
}

impl fmt::Display for RunPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.block, self.run)
    }
}

/// A caret position: a run plus a character offset inside it
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point {
    pub path: RunPath,
    pub offset: usize,
}

impl Point {
    pub fn new(path: RunPath, offset: usize) -> Self {
        Self { path, offset }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Point,
    pub focus: Point,
}

impl Selection {
    pub fn caret(point: Point) -> Self {
        Self {
            anchor: point,
            focus: point,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }
}

/// A character range inside a single run, in run-local coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocRange {
    pub path: RunPath,
    pub start: usize,
    pub end: usize,
}

impl DocRange {
    pub fn new(path: RunPath, start: usize, end: usize) -> Self {
        Self { path, start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_selection(&self) -> Selection {
        Selection {
            anchor: Point::new(self.path, self.start),
            focus: Point::new(self.path, self.end),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("Block {0} does not exist")]
    BlockOutOfBounds(usize),
    #[error("Run {0} does not exist")]
    RunOutOfBounds(RunPath),
    #[error("Range {start}..{end} is outside run {path} (length {len})")]
    RangeOutOfBounds {
        path: RunPath,
        start: usize,
        end: usize,
        len: usize,
    },
    #[error("Inline text cannot contain line breaks; split the block instead")]
    LineBreakInText,
    #[error("Cannot remove the only block of a document")]
    LastBlock,
    #[error("Block {0} has no previous block to merge into")]
    NoPreviousBlock(usize),
}

/// Block-structured rich-text document.
///
/// The document is an ordered list of [`Block`]s, each an ordered list of
/// [`Run`]s. Every mutation goes through one of the structural edit methods,
/// which validate their coordinates up front so a failed edit never leaves a
/// partial change behind. After each edit the touched blocks are normalized:
/// adjacent runs with equal style are merged and empty runs dropped (a block
/// keeps one run). [`Document::without_normalizing`] defers normalization to
/// the end of a batch and rolls the whole batch back if it fails.
///
/// ```rust
/// # use textlens_engine::editing::{Document, Point, RunPath};
/// let mut doc = Document::from_text("Hello wrld\nSecond line");
/// doc.insert_text(Point::new(RunPath::new(0, 0), 7), "o").unwrap();
/// assert_eq!(doc.text(), "Hello world\nSecond line");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub(crate) blocks: Vec<Block>,
    pub(crate) selection: Option<Selection>,
    /// Incremented on every successful edit
    pub(crate) version: u64,
    pub(crate) normalizing: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// A document holding a single empty paragraph
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::default()],
            selection: None,
            version: 0,
            normalizing: true,
        }
    }

    /// One block per `\n`-separated line, one plain run per block
    pub fn from_text(text: &str) -> Self {
        Self::from_blocks(text.split('\n').map(Block::from_text).collect())
    }

    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        let blocks = if blocks.is_empty() {
            vec![Block::default()]
        } else {
            blocks
        };
        Self {
            blocks,
            selection: None,
            version: 0,
            normalizing: true,
        }
    }

    /// Block texts joined with `\n`
    pub fn text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn block_text(&self, index: usize) -> Option<String> {
        self.blocks.get(index).map(Block::text)
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn set_selection(&mut self, selection: Option<Selection>) {
        self.selection = selection;
    }

    /// Select a run-local range
    pub fn select(&mut self, range: DocRange) {
        self.selection = Some(range.to_selection());
    }

    pub fn run(&self, path: RunPath) -> Option<&Run> {
        self.blocks.get(path.block)?.runs.get(path.run)
    }

    /// The block that owns the run at `path`
    pub fn parent(&self, path: RunPath) -> Option<&Block> {
        let block = self.blocks.get(path.block)?;
        (path.run < block.runs.len()).then_some(block)
    }

    /// Characters preceding the run at `path` within its block
    pub fn run_offset_in_block(&self, path: RunPath) -> Option<usize> {
        let block = self.parent(path)?;
        Some(block.runs[..path.run].iter().map(Run::char_len).sum())
    }

    /// Every run in document order together with its path
    pub fn text_runs(&self) -> impl Iterator<Item = (RunPath, &Run)> + '_ {
        self.blocks.iter().enumerate().flat_map(|(block, b)| {
            b.runs
                .iter()
                .enumerate()
                .map(move |(run, r)| (RunPath::new(block, run), r))
        })
    }

    /// The single run holding the block-relative char range `range`
    pub fn range_in_block(&self, block: usize, range: Range<usize>) -> Option<DocRange> {
        let runs = &self.blocks.get(block)?.runs;
        let mut offset = 0;
        for (index, run) in runs.iter().enumerate() {
            let end = offset + run.char_len();
            if range.start >= offset && range.end <= end {
                return Some(DocRange::new(
                    RunPath::new(block, index),
                    range.start - offset,
                    range.end - offset,
                ));
            }
            offset = end;
        }
        None
    }

    pub fn start(&self) -> Point {
        Point::new(RunPath::new(0, 0), 0)
    }

    pub fn end(&self) -> Point {
        let block = self.blocks.len() - 1;
        let runs = &self.blocks[block].runs;
        let run = runs.len() - 1;
        Point::new(RunPath::new(block, run), runs[run].char_len())
    }

    /// Text covered by a run-local range
    pub fn text_in_range(&self, range: DocRange) -> Result<String, EditError> {
        let run = self.checked_run(range.path)?;
        check_range(range, run)?;
        Ok(char_slice(&run.text, range.start..range.end).to_string())
    }

    /// Insert inline text at a point
    pub fn insert_text(&mut self, at: Point, text: &str) -> Result<Patch, EditError> {
        self.replace_range(DocRange::new(at.path, at.offset, at.offset), text)
    }

    /// Delete `len` characters starting at a point, within one run
    pub fn delete_text(&mut self, at: Point, len: usize) -> Result<Patch, EditError> {
        self.replace_range(DocRange::new(at.path, at.offset, at.offset + len), "")
    }

    /// Replace the text covered by `range` with `text`.
    ///
    /// The caret ends up directly after the inserted text.
    pub fn replace_range(&mut self, range: DocRange, text: &str) -> Result<Patch, EditError> {
        if text.contains('\n') {
            return Err(EditError::LineBreakInText);
        }
        let run = self.checked_run(range.path)?;
        check_range(range, run)?;

        let run = &mut self.blocks[range.path.block].runs[range.path.run];
        let start = byte_offset(&run.text, range.start);
        let end = byte_offset(&run.text, range.end);
        run.text.replace_range(start..end, text);

        let caret = Point::new(range.path, range.start + char_len(text));
        self.selection = Some(Selection::caret(caret));
        Ok(self.finish_edit(range.path.block..range.path.block + 1))
    }

    /// Insert a block before `index` (`index == block_count()` appends)
    pub fn insert_block(&mut self, index: usize, block: Block) -> Result<Patch, EditError> {
        if index > self.blocks.len() {
            return Err(EditError::BlockOutOfBounds(index));
        }
        self.blocks.insert(index, Block::from_runs(block.runs));
        self.selection = self.selection.map(|selection| Selection {
            anchor: shift_block(selection.anchor, index, 1),
            focus: shift_block(selection.focus, index, 1),
        });
        Ok(self.finish_edit(index..index + 1))
    }

    pub fn remove_block(&mut self, index: usize) -> Result<Patch, EditError> {
        if index >= self.blocks.len() {
            return Err(EditError::BlockOutOfBounds(index));
        }
        if self.blocks.len() == 1 {
            return Err(EditError::LastBlock);
        }
        self.blocks.remove(index);
        let touches_removed = self.selection.is_some_and(|selection| {
            selection.anchor.path.block == index || selection.focus.path.block == index
        });
        self.selection = if touches_removed {
            None
        } else {
            self.selection.map(|selection| Selection {
                anchor: shift_block(selection.anchor, index + 1, -1),
                focus: shift_block(selection.focus, index + 1, -1),
            })
        };
        let at = index.min(self.blocks.len() - 1);
        Ok(self.finish_edit(at..at + 1))
    }

    /// Split a block at a point; the text after the point moves to a new block
    pub fn split_block(&mut self, at: Point) -> Result<Patch, EditError> {
        let run = self.checked_run(at.path)?;
        check_range(DocRange::new(at.path, at.offset, at.offset), run)?;

        let block = &mut self.blocks[at.path.block];
        let mut tail: Vec<Run> = block.runs.split_off(at.path.run + 1);
        let split_run = &mut block.runs[at.path.run];
        let split_at = byte_offset(&split_run.text, at.offset);
        let remainder = split_run.text.split_off(split_at);
        tail.insert(0, Run::styled(remainder, split_run.style));

        let new_index = at.path.block + 1;
        self.blocks.insert(new_index, Block::from_runs(tail));
        self.selection = Some(Selection::caret(Point::new(RunPath::new(new_index, 0), 0)));
        Ok(self.finish_edit(at.path.block..new_index + 1))
    }

    /// Append block `index` to the block before it
    pub fn merge_block(&mut self, index: usize) -> Result<Patch, EditError> {
        if index >= self.blocks.len() {
            return Err(EditError::BlockOutOfBounds(index));
        }
        if index == 0 {
            return Err(EditError::NoPreviousBlock(index));
        }
        let merged = self.blocks.remove(index);
        let previous = &mut self.blocks[index - 1];
        let join = Point::new(
            RunPath::new(index - 1, previous.runs.len() - 1),
            previous.runs[previous.runs.len() - 1].char_len(),
        );
        previous.runs.extend(merged.runs);
        self.selection = Some(Selection::caret(join));
        Ok(self.finish_edit(index - 1..index))
    }

    /// Run `edit` as one batch: normalization happens once at the end, and
    /// an `Err` restores the document exactly as it was before the batch.
    pub fn without_normalizing<T, E>(
        &mut self,
        edit: impl FnOnce(&mut Document) -> Result<T, E>,
    ) -> Result<T, E> {
        let before = self.clone();
        let was_normalizing = std::mem::replace(&mut self.normalizing, false);
        let result = edit(self);
        self.normalizing = was_normalizing;
        match result {
            Ok(value) => {
                if was_normalizing {
                    self.normalize(0..self.blocks.len());
                }
                Ok(value)
            }
            Err(error) => {
                *self = before;
                Err(error)
            }
        }
    }

    fn checked_run(&self, path: RunPath) -> Result<&Run, EditError> {
        let block = self
            .blocks
            .get(path.block)
            .ok_or(EditError::BlockOutOfBounds(path.block))?;
        block.runs.get(path.run).ok_or(EditError::RunOutOfBounds(path))
    }

    fn finish_edit(&mut self, changed_blocks: Range<usize>) -> Patch {
        if self.normalizing {
            self.normalize(changed_blocks.clone());
        }
        self.version += 1;
        Patch {
            changed_blocks,
            new_selection: self.selection,
            version: self.version,
        }
    }

    /// Merge same-style neighbours and drop empty runs, remapping the selection
    fn normalize(&mut self, blocks: Range<usize>) {
        let end = blocks.end.min(self.blocks.len());
        for block_index in blocks.start..end {
            let mut run = 0;
            while run < self.blocks[block_index].runs.len() {
                let runs = &self.blocks[block_index].runs;
                let is_empty = runs[run].text.is_empty() && runs.len() > 1;
                let joins_next = run + 1 < runs.len() && runs[run].style == runs[run + 1].style;

                if is_empty {
                    self.blocks[block_index].runs.remove(run);
                    let runs = &self.blocks[block_index].runs;
                    let fallback = if run < runs.len() {
                        Point::new(RunPath::new(block_index, run), 0)
                    } else {
                        Point::new(RunPath::new(block_index, run - 1), runs[run - 1].char_len())
                    };
                    self.remap_selection(|point| remove_run(point, block_index, run, fallback));
                    // The previous run may now be able to join its new neighbour
                    run = run.saturating_sub(1);
                } else if joins_next {
                    let next = self.blocks[block_index].runs.remove(run + 1);
                    let current = &mut self.blocks[block_index].runs[run];
                    let joined_at = current.char_len();
                    current.text.push_str(&next.text);
                    self.remap_selection(|point| join_runs(point, block_index, run, joined_at));
                } else {
                    run += 1;
                }
            }
        }
    }

    fn remap_selection(&mut self, remap: impl Fn(Point) -> Point) {
        self.selection = self.selection.map(|selection| Selection {
            anchor: remap(selection.anchor),
            focus: remap(selection.focus),
        });
    }
}

fn check_range(range: DocRange, run: &Run) -> Result<(), EditError> {
    let len = run.char_len();
    if range.start > range.end || range.end > len {
        return Err(EditError::RangeOutOfBounds {
            path: range.path,
            start: range.start,
            end: range.end,
            len,
        });
    }
    Ok(())
}

fn shift_block(point: Point, from: usize, delta: isize) -> Point {
    if point.path.block < from {
        return point;
    }
    let block = point.path.block.saturating_add_signed(delta);
    Point::new(RunPath::new(block, point.path.run), point.offset)
}

/// Point remap for removing the empty run `run` of `block`.
///
/// Points on the removed run move to `fallback`.
fn remove_run(point: Point, block: usize, run: usize, fallback: Point) -> Point {
    if point.path.block != block || point.path.run < run {
        return point;
    }
    if point.path.run > run {
        return Point::new(RunPath::new(block, point.path.run - 1), point.offset);
    }
    fallback
}

/// Point remap for appending run `run + 1` onto run `run`
fn join_runs(point: Point, block: usize, run: usize, joined_at: usize) -> Point {
    if point.path.block != block || point.path.run <= run {
        return point;
    }
    if point.path.run == run + 1 {
        return Point::new(RunPath::new(block, run), joined_at + point.offset);
    }
    Point::new(RunPath::new(block, point.path.run - 1), point.offset)
}

pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte index of the `char_offset`-th character, clamped to the string end
pub(crate) fn byte_offset(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map_or(text.len(), |(index, _)| index)
}

pub(crate) fn char_slice(text: &str, range: Range<usize>) -> &str {
    let start = byte_offset(text, range.start);
    let end = byte_offset(text, range.end).max(start);
    &text[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bold() -> RunStyle {
        RunStyle {
            bold: true,
            ..RunStyle::default()
        }
    }

    #[test]
    fn test_from_text_one_block_per_line() {
        let doc = Document::from_text("first\nsecond\n\nfourth");

        assert_eq!(doc.block_count(), 4);
        assert_eq!(doc.block_text(2).unwrap(), "");
        assert_eq!(doc.block(2).unwrap().runs().len(), 1);
        assert_eq!(doc.text(), "first\nsecond\n\nfourth");
    }

    #[test]
    fn test_empty_document_has_one_empty_block() {
        let doc = Document::new();
        assert_eq!(doc.block_count(), 1);
        assert_eq!(doc.text(), "");
        assert_eq!(doc.start(), doc.end());
    }

    #[test]
    fn test_text_runs_and_offsets() {
        let doc = Document::from_blocks(vec![
            Block::from_runs(vec![Run::plain("Hello "), Run::styled("bold", bold()), Run::plain("!")]),
            Block::from_text("next"),
        ]);

        let paths: Vec<RunPath> = doc.text_runs().map(|(path, _)| path).collect();
        assert_eq!(
            paths,
            vec![RunPath::new(0, 0), RunPath::new(0, 1), RunPath::new(0, 2), RunPath::new(1, 0)]
        );
        assert_eq!(doc.run_offset_in_block(RunPath::new(0, 2)), Some(10));
        assert_eq!(doc.run_offset_in_block(RunPath::new(0, 3)), None);
        assert_eq!(doc.parent(RunPath::new(1, 0)).unwrap().text(), "next");
        assert_eq!(doc.end(), Point::new(RunPath::new(1, 0), 4));

        assert_eq!(
            doc.range_in_block(0, 7..9),
            Some(DocRange::new(RunPath::new(0, 1), 1, 3))
        );
        assert_eq!(doc.range_in_block(0, 4..8), None);
        assert_eq!(doc.range_in_block(5, 0..1), None);
    }

    #[test]
    fn test_replace_range_counts_characters_not_bytes() {
        let mut doc = Document::from_text("naïve café teh end");
        let range = DocRange::new(RunPath::new(0, 0), 11, 14);
        assert_eq!(doc.text_in_range(range).unwrap(), "teh");

        let patch = doc.replace_range(range, "the").unwrap();

        assert_eq!(doc.text(), "naïve café the end");
        assert_eq!(patch.version, 1);
        assert_eq!(
            patch.new_selection,
            Some(Selection::caret(Point::new(RunPath::new(0, 0), 14)))
        );
    }

    #[test]
    fn test_invalid_edit_leaves_document_untouched() {
        let mut doc = Document::from_text("short");
        let before = doc.clone();

        let result = doc.replace_range(DocRange::new(RunPath::new(0, 0), 3, 9), "x");

        assert!(matches!(result, Err(EditError::RangeOutOfBounds { len: 5, .. })));
        assert_eq!(doc, before);
        assert_eq!(
            doc.insert_text(Point::new(RunPath::new(4, 0), 0), "x"),
            Err(EditError::BlockOutOfBounds(4))
        );
        assert_eq!(
            doc.insert_text(Point::new(RunPath::new(0, 0), 0), "a\nb"),
            Err(EditError::LineBreakInText)
        );
    }

    #[test]
    fn test_split_and_merge_blocks() {
        let mut doc = Document::from_text("Hello world");

        doc.split_block(Point::new(RunPath::new(0, 0), 5)).unwrap();
        assert_eq!(doc.text(), "Hello\n world");
        assert_eq!(
            doc.selection(),
            Some(Selection::caret(Point::new(RunPath::new(1, 0), 0)))
        );

        doc.merge_block(1).unwrap();
        assert_eq!(doc.text(), "Hello world");
        assert_eq!(doc.block_count(), 1);
        assert_eq!(doc.block(0).unwrap().runs().len(), 1, "same-style runs are merged");
        assert_eq!(
            doc.selection(),
            Some(Selection::caret(Point::new(RunPath::new(0, 0), 5)))
        );
        assert_eq!(doc.merge_block(0), Err(EditError::NoPreviousBlock(0)));
    }

    #[test]
    fn test_split_at_block_end_creates_empty_block() {
        let mut doc = Document::from_text("abc");
        doc.split_block(doc.end()).unwrap();
        assert_eq!(doc.block_count(), 2);
        assert_eq!(doc.block_text(1).unwrap(), "");
        assert_eq!(doc.block(1).unwrap().runs().len(), 1);
    }

    #[test]
    fn test_insert_and_remove_blocks() {
        let mut doc = Document::from_text("one\nthree");
        doc.insert_block(1, Block::from_text("two")).unwrap();
        assert_eq!(doc.text(), "one\ntwo\nthree");

        doc.remove_block(0).unwrap();
        assert_eq!(doc.text(), "two\nthree");
        assert_eq!(doc.insert_block(5, Block::default()), Err(EditError::BlockOutOfBounds(5)));

        doc.remove_block(0).unwrap();
        assert_eq!(doc.remove_block(0), Err(EditError::LastBlock));
    }

    #[test]
    fn test_normalization_drops_emptied_runs() {
        let mut doc = Document::from_blocks(vec![Block::from_runs(vec![
            Run::plain("a "),
            Run::styled("B", bold()),
            Run::plain(" c"),
        ])]);

        doc.delete_text(Point::new(RunPath::new(0, 1), 0), 1).unwrap();

        let runs = doc.block(0).unwrap().runs();
        assert_eq!(runs, &[Run::plain("a  c")]);
    }

    #[test]
    fn test_batch_defers_normalization_and_rolls_back_on_error() {
        let mut doc = Document::from_blocks(vec![Block::from_runs(vec![
            Run::plain("ab"),
            Run::styled("CD", bold()),
        ])]);
        let before = doc.clone();

        let result: Result<(), EditError> = doc.without_normalizing(|doc| {
            doc.delete_text(Point::new(RunPath::new(0, 1), 0), 2)?;
            // Run [0, 1] still exists (empty) because normalization is deferred
            assert_eq!(doc.block(0).unwrap().runs().len(), 2);
            doc.insert_text(Point::new(RunPath::new(0, 1), 5), "x")?;
            Ok(())
        });

        assert!(result.is_err());
        assert_eq!(doc, before, "failed batch restores the document");

        doc.without_normalizing(|doc| doc.delete_text(Point::new(RunPath::new(0, 1), 0), 2))
            .unwrap();
        assert_eq!(doc.block(0).unwrap().runs(), &[Run::plain("ab")]);
    }

    #[test]
    fn test_char_helpers() {
        assert_eq!(char_len("café"), 4);
        assert_eq!(byte_offset("café!", 4), 5);
        assert_eq!(byte_offset("abc", 10), 3);
        assert_eq!(char_slice("naïve", 1..3), "aï");
    }
}
