/// A byte range `[start, end)` into the source text.
///
/// Scanned segments store spans rather than copied text, so concatenating the
/// spans of every literal and tag segment reproduces the source exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length in bytes. Uses saturating subtraction for safety.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span is empty (start >= end).
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// True if `pos` lies strictly between `start` and `end`.
    #[must_use]
    pub fn strictly_contains(self, pos: usize) -> bool {
        self.start < pos && pos < self.end
    }

    /// Borrows the spanned text out of `source`.
    pub fn slice(self, source: &str) -> &str {
        &source[self.start..self.end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_and_empty() {
        assert_eq!(Span::new(3, 7).len(), 4);
        assert!(Span::new(5, 5).is_empty());
        // inverted spans saturate rather than underflow
        assert!(Span::new(9, 2).is_empty());
    }

    #[test]
    fn strict_containment_excludes_edges() {
        let sp = Span::new(2, 6);
        assert!(!sp.strictly_contains(2));
        assert!(sp.strictly_contains(3));
        assert!(!sp.strictly_contains(6));
    }

    #[test]
    fn slice_reads_source() {
        assert_eq!(Span::new(1, 4).slice("[tag]"), "tag");
    }
}
