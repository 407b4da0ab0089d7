//! Conversion between the flattened "visible text" sent for analysis and
//! block coordinates inside the [`Document`].
//!
//! Only the blocks inside the current [`Viewport`] are flattened. The
//! resulting [`OffsetMap`] is a snapshot: it goes stale the moment the
//! document or the viewport changes and must be rebuilt alongside the text.

use std::collections::BTreeMap;
use std::ops::Range;

use crate::editing::Document;
use crate::editing::document::char_len;

/// Range of block indices currently visible to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    blocks: Range<usize>,
}

impl Viewport {
    pub fn new(blocks: Range<usize>) -> Self {
        Self { blocks }
    }

    /// Covers every block regardless of document length
    pub fn all() -> Self {
        Self {
            blocks: 0..usize::MAX,
        }
    }

    /// The visible block range clamped to `block_count`
    pub fn clamp(&self, block_count: usize) -> Range<usize> {
        let end = self.blocks.end.min(block_count);
        self.blocks.start.min(end)..end
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::all()
    }
}

/// Block index → character offset where that block starts in the flattened text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OffsetMap {
    starts: BTreeMap<usize, usize>,
}

impl OffsetMap {
    pub fn get(&self, block: usize) -> Option<usize> {
        self.starts.get(&block).copied()
    }

    pub fn contains(&self, block: usize) -> bool {
        self.starts.contains_key(&block)
    }

    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.starts.iter().map(|(&block, &start)| (block, start))
    }

    /// Reverse mapping: the block containing a flattened offset and the
    /// offset relative to that block's start.
    ///
    /// Offsets landing on a joining newline resolve to the end of the block
    /// before it.
    pub fn locate(&self, offset: usize) -> Option<(usize, usize)> {
        self.starts
            .iter()
            .rev()
            .find(|&(_, &start)| start <= offset)
            .map(|(&block, &start)| (block, offset - start))
    }

    fn insert(&mut self, block: usize, start: usize) {
        self.starts.insert(block, start);
    }
}

/// Flattened visible text and the offset map describing it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibleText {
    pub text: String,
    pub map: OffsetMap,
}

impl VisibleText {
    /// Nothing worth sending for analysis
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Join the visible blocks with `\n` and record where each one starts
pub fn flatten_visible(doc: &Document, viewport: &Viewport) -> VisibleText {
    let mut visible = VisibleText::default();
    let mut offset = 0;

    for index in viewport.clamp(doc.block_count()) {
        if !visible.map.is_empty() {
            visible.text.push('\n');
            offset += 1;
        }
        let text = doc.blocks[index].text();
        visible.map.insert(index, offset);
        offset += char_len(&text);
        visible.text.push_str(&text);
    }

    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::document::char_slice;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_flatten_whole_document() {
        let doc = Document::from_text("Hello\nwörld\n\nend");
        let visible = flatten_visible(&doc, &Viewport::all());

        assert_eq!(visible.text, "Hello\nwörld\n\nend");
        assert_eq!(
            visible.map.iter().collect::<Vec<_>>(),
            vec![(0, 0), (1, 6), (2, 12), (3, 13)]
        );
    }

    #[test]
    fn test_flatten_window_keeps_document_block_indices() {
        let doc = Document::from_text("zero\none\ntwo\nthree");
        let visible = flatten_visible(&doc, &Viewport::new(1..3));

        assert_eq!(visible.text, "one\ntwo");
        assert_eq!(visible.map.get(0), None);
        assert_eq!(visible.map.get(1), Some(0));
        assert_eq!(visible.map.get(2), Some(4));
        assert_eq!(visible.map.get(3), None);
    }

    #[rstest]
    #[case::past_the_end(Viewport::new(10..20))]
    #[case::inverted(Viewport::new(3..1))]
    #[case::zero_width(Viewport::new(1..1))]
    fn test_empty_viewport_yields_nothing_to_analyze(#[case] viewport: Viewport) {
        let doc = Document::from_text("a\nb\nc");
        let visible = flatten_visible(&doc, &viewport);

        assert!(visible.text.is_empty());
        assert!(visible.map.is_empty());
        assert!(visible.is_blank());
    }

    #[rstest]
    #[case("Plain single line")]
    #[case("multi\nline\ndocument")]
    #[case("\n\nleading blanks")]
    #[case("unicode: ünïcödé\n😀 emoji line\n")]
    fn test_round_trip_every_block(#[case] text: &str) {
        let doc = Document::from_text(text);
        let visible = flatten_visible(&doc, &Viewport::all());

        for (index, block) in doc.blocks().iter().enumerate() {
            let start = visible.map.get(index).unwrap();
            let slice = char_slice(&visible.text, start..start + block.char_len());
            assert_eq!(slice, block.text(), "block {index} round trip");
        }
    }

    #[test]
    fn test_locate_reverse_mapping() {
        let doc = Document::from_text("abc\nde\nfgh");
        let visible = flatten_visible(&doc, &Viewport::new(1..3));

        assert_eq!(visible.map.locate(0), Some((1, 0)));
        assert_eq!(visible.map.locate(2), Some((1, 2)));
        assert_eq!(visible.map.locate(3), Some((2, 0)));
        assert_eq!(visible.map.locate(5), Some((2, 2)));
        assert_eq!(OffsetMap::default().locate(0), None);
    }

    #[test]
    fn test_is_blank_for_whitespace_only_text() {
        let doc = Document::from_text("   \n\t");
        assert!(flatten_visible(&doc, &Viewport::all()).is_blank());
    }
}
