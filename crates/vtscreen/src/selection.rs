/// A text selection range with inclusive semantics and a "busy
/// selecting" latch (set between `begin` and `end`, cleared by `end` or
/// `clear`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub begin: (usize, usize),
    pub end: (usize, usize),
    pub busy: bool,
}

impl Selection {
    #[must_use]
    pub fn starting_at(y: usize, x: usize) -> Self {
        Self { begin: (y, x), end: (y, x), busy: true }
    }

    /// The selection in top-left/bottom-right order regardless of the
    /// direction it was dragged in.
    #[must_use]
    pub fn ordered(&self) -> ((usize, usize), (usize, usize)) {
        if self.begin <= self.end {
            (self.begin, self.end)
        } else {
            (self.end, self.begin)
        }
    }

    /// Whether `(y, x)` falls within the inclusive selected range.
    #[must_use]
    pub fn contains(&self, y: usize, x: usize) -> bool {
        let (lo, hi) = self.ordered();
        (y, x) >= lo && (y, x) <= hi
    }
}
