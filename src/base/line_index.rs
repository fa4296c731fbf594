//! Line/column lookup for byte offsets.

use text_size::TextSize;

/// Maps byte offsets in a source text to 1-based line and column numbers.
///
/// Columns count characters, not bytes, so multi-byte identifiers in
/// strings and comments do not skew positions reported after them.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset of the first character of every line.
    line_starts: Vec<TextSize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::new(0)];
        for (offset, ch) in text.char_indices() {
            if ch == '\n' {
                line_starts.push(TextSize::new(offset as u32 + 1));
            }
        }
        Self { line_starts }
    }

    /// Number of lines in the indexed text.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Convert a byte offset into a `(line, column)` pair, both 1-based.
    pub fn line_col(&self, text: &str, offset: TextSize) -> (u32, u32) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let start = u32::from(self.line_starts[line]) as usize;
        let end = (u32::from(offset) as usize).min(text.len());
        let column = text.get(start..end).map_or(end - start, |s| s.chars().count());
        (line as u32 + 1, column as u32 + 1)
    }
}
