//! Text decomposition into character units.

/// One animatable character.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharUnit {
    /// Position in the flattened, newline-free sequence
    pub index: usize,
    /// Glyph shown at rest
    pub glyph: char,
    /// Source line (0-based)
    pub line: usize,
    /// Column within the source line, in chars
    pub column: usize,
}

impl CharUnit {
    #[inline]
    pub fn is_whitespace(&self) -> bool {
        self.glyph.is_whitespace()
    }
}

/// Item of the rendered sequence, in document order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutItem {
    /// The unit with this index
    Unit(usize),
    LineBreak,
}

/// Units of a text plus the line breaks between them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Layout {
    /// Every character, in index order
    pub units: Vec<CharUnit>,
    /// Units interleaved with line breaks, in display order
    pub items: Vec<LayoutItem>,
}

impl Layout {
    #[inline]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Number of source lines (line breaks + 1).
    pub fn line_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item, LayoutItem::LineBreak))
            .count()
            + 1
    }

    /// Longest line, in units.
    pub fn max_columns(&self) -> usize {
        let mut widths = vec![0usize; self.line_count()];
        for unit in &self.units {
            widths[unit.line] = widths[unit.line].max(unit.column + 1);
        }
        widths.into_iter().max().unwrap_or(0)
    }
}

/// Remove every carriage return.
pub fn strip_carriage_returns(text: &str) -> String {
    text.chars().filter(|&c| c != '\r').collect()
}

/// Split `text` into one unit per non-newline character.
///
/// `text` must already be free of `\r`. A line break item separates
/// consecutive source lines; newlines never become units.
///
/// ```rust
/// use kinetic_type::{decompose, LayoutItem};
///
/// let layout = decompose("ab\n\nc");
/// assert_eq!(layout.len(), 3);
/// assert_eq!(
///     layout.items,
///     vec![
///         LayoutItem::Unit(0),
///         LayoutItem::Unit(1),
///         LayoutItem::LineBreak,
///         LayoutItem::LineBreak,
///         LayoutItem::Unit(2),
///     ]
/// );
/// ```
pub fn decompose(text: &str) -> Layout {
    let mut layout = Layout::default();

    for (line, content) in text.split('\n').enumerate() {
        if line > 0 {
            layout.items.push(LayoutItem::LineBreak);
        }
        for (column, glyph) in content.chars().enumerate() {
            let index = layout.units.len();
            layout.units.push(CharUnit {
                index,
                glyph,
                line,
                column,
            });
            layout.items.push(LayoutItem::Unit(index));
        }
    }

    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn single_line() {
        let layout = decompose("Hi there");
        assert_eq!(layout.len(), 8);
        assert_eq!(layout.line_count(), 1);
        assert_eq!(layout.units[2].glyph, ' ');
        assert!(layout.units[2].is_whitespace());
        assert!(layout.items.iter().all(|i| matches!(i, LayoutItem::Unit(_))));
    }

    #[test]
    fn multi_line_positions() {
        let layout = decompose("ab\ncde");
        assert_eq!(layout.len(), 5);
        assert_eq!(layout.line_count(), 2);
        assert_eq!(layout.max_columns(), 3);

        let c = &layout.units[2];
        assert_eq!((c.index, c.glyph, c.line, c.column), (2, 'c', 1, 0));
        assert_eq!(layout.items[2], LayoutItem::LineBreak);
    }

    #[test]
    fn trailing_newline() {
        let layout = decompose("a\n");
        assert_eq!(layout.len(), 1);
        assert_eq!(layout.items, vec![LayoutItem::Unit(0), LayoutItem::LineBreak]);
    }

    #[test]
    fn empty_text() {
        let layout = decompose("");
        assert!(layout.is_empty());
        assert!(layout.items.is_empty());
        assert_eq!(layout.max_columns(), 0);
    }

    #[test]
    fn multibyte_chars() {
        let layout = decompose("né✓");
        assert_eq!(layout.len(), 3);
        assert_eq!(layout.units[2].glyph, '✓');
    }

    #[test]
    fn strip_cr() {
        assert_eq!(strip_carriage_returns("a\r\nb\r"), "a\nb");
    }

    proptest! {
        #[test]
        fn unit_count_matches_chars(text in "[a-zA-Z0-9 \r\n!?é]{0,64}") {
            let clean = strip_carriage_returns(&text);
            let layout = decompose(&clean);
            let expected = text.chars().filter(|c| *c != '\r' && *c != '\n').count();
            prop_assert_eq!(layout.len(), expected);
            prop_assert_eq!(layout.line_count(), clean.matches('\n').count() + 1);
            for (i, unit) in layout.units.iter().enumerate() {
                prop_assert_eq!(unit.index, i);
            }
        }
    }
}
