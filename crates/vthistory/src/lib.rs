#![warn(clippy::pedantic)]

//! Bounded scrollback history.
//!
//! A [`History`] is the sequence of completed lines rolled off the top of
//! a primary [`Screen`](https://docs.rs/vtscreen). Three variants are
//! supported, matching the three `HistoryScroll` subclasses of the Konsole
//! lineage this crate is modeled on: [`History::None`] (discards
//! everything), [`History::Buffered`] (a fixed line count, oldest line
//! evicted on overflow), and [`History::BlockArray`] (a fixed byte budget
//! with variable-length lines, also evicting oldest-first).
//!
//! Unlike the C++ original, whose ring buffer needed an explicit
//! "normalize" pass because of a buggy vector copy-assignment operator,
//! the buffered variant here is a plain [`VecDeque`] ring — eviction is
//! just `pop_front`.

use std::collections::VecDeque;

use vtcell::Cell;

/// One completed line of scrollback.
///
/// `cells` is trimmed of trailing default cells, so `line.cells.len()` is
/// the line's "exact length" as the data model calls it; reads past that
/// length return [`Cell::default`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryLine {
    cells: Vec<Cell>,
    wrapped: bool,
}

impl HistoryLine {
    /// Build a history line from a full row, trimming trailing default
    /// cells and recording whether the row was terminated by auto-wrap
    /// (`wrapped = true`) rather than by an explicit newline.
    #[must_use]
    pub fn from_row(row: &[Cell], wrapped: bool) -> Self {
        let trimmed_len =
            row.iter().rposition(|c| !c.is_default()).map_or(0, |i| i + 1);
        Self { cells: row[..trimmed_len].to_vec(), wrapped }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[must_use]
    pub fn is_wrapped(&self) -> bool {
        self.wrapped
    }

    /// Read `count` cells starting at `col`; positions past the stored
    /// length read as default cells rather than panicking, matching the
    /// data model's "no uninitialised cell state observable" invariant.
    #[must_use]
    pub fn cells(&self, col: usize, count: usize) -> Vec<Cell> {
        (col..col + count)
            .map(|i| self.cells.get(i).copied().unwrap_or_default())
            .collect()
    }

    fn byte_len(&self) -> usize {
        self.cells.len() * std::mem::size_of::<Cell>()
    }
}

/// The common behaviour every history variant provides.
pub trait HistoryOps {
    /// Number of retained lines, `0..=capacity`.
    fn line_count(&self) -> usize;
    /// Exact length (in cells) of a retained line, or `0` if out of range.
    fn line_len(&self, lineno: usize) -> usize;
    /// Read `count` cells of a retained line starting at `colno`.
    fn get_cells(&self, lineno: usize, colno: usize, count: usize) -> Vec<Cell>;
    /// Whether the line was terminated by auto-wrap rather than newline.
    fn is_wrapped(&self, lineno: usize) -> bool;
    /// Append a fully-formed line, possibly evicting the oldest line.
    fn add_line(&mut self, line: HistoryLine);
}

/// Discards everything; reports zero lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoHistory;

impl HistoryOps for NoHistory {
    fn line_count(&self) -> usize {
        0
    }

    fn line_len(&self, _lineno: usize) -> usize {
        0
    }

    fn get_cells(&self, _lineno: usize, _colno: usize, count: usize) -> Vec<Cell> {
        vec![Cell::default(); count]
    }

    fn is_wrapped(&self, _lineno: usize) -> bool {
        false
    }

    fn add_line(&mut self, _line: HistoryLine) {}
}

/// Fixed capacity of `N` lines, circular: the oldest line is dropped on
/// the `(N+1)`-th insertion. Line indices are 0-based from the oldest
/// retained line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferedHistory {
    lines: VecDeque<HistoryLine>,
    capacity: usize,
}

impl BufferedHistory {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self { lines: VecDeque::with_capacity(capacity), capacity }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl HistoryOps for BufferedHistory {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line_len(&self, lineno: usize) -> usize {
        self.lines.get(lineno).map_or(0, HistoryLine::len)
    }

    fn get_cells(&self, lineno: usize, colno: usize, count: usize) -> Vec<Cell> {
        self.lines
            .get(lineno)
            .map_or_else(|| vec![Cell::default(); count], |l| l.cells(colno, count))
    }

    fn is_wrapped(&self, lineno: usize) -> bool {
        self.lines.get(lineno).is_some_and(HistoryLine::is_wrapped)
    }

    fn add_line(&mut self, line: HistoryLine) {
        if self.capacity == 0 {
            return;
        }
        if self.lines.len() >= self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }
}

/// Fixed total byte budget with variable-length lines; newer lines evict
/// older ones on overflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockArrayHistory {
    lines: VecDeque<HistoryLine>,
    byte_budget: usize,
    bytes_used: usize,
}

impl BlockArrayHistory {
    #[must_use]
    pub fn new(byte_budget: usize) -> Self {
        Self { lines: VecDeque::new(), byte_budget, bytes_used: 0 }
    }

    #[must_use]
    pub fn byte_budget(&self) -> usize {
        self.byte_budget
    }
}

impl HistoryOps for BlockArrayHistory {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line_len(&self, lineno: usize) -> usize {
        self.lines.get(lineno).map_or(0, HistoryLine::len)
    }

    fn get_cells(&self, lineno: usize, colno: usize, count: usize) -> Vec<Cell> {
        self.lines
            .get(lineno)
            .map_or_else(|| vec![Cell::default(); count], |l| l.cells(colno, count))
    }

    fn is_wrapped(&self, lineno: usize) -> bool {
        self.lines.get(lineno).is_some_and(HistoryLine::is_wrapped)
    }

    fn add_line(&mut self, line: HistoryLine) {
        self.bytes_used += line.byte_len();
        self.lines.push_back(line);
        while self.bytes_used > self.byte_budget {
            let Some(evicted) = self.lines.pop_front() else { break };
            self.bytes_used -= evicted.byte_len();
        }
    }
}

/// The kind of history to hold, used when constructing a [`History`] or
/// re-targeting an existing one via [`History::retarget`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryKind {
    None,
    Buffered { capacity: usize },
    BlockArray { byte_budget: usize },
}

/// Owning variant of the three history backends. `Screen` holds one of
/// these (primary screen only, per the data model's invariant 6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum History {
    None(NoHistory),
    Buffered(BufferedHistory),
    BlockArray(BlockArrayHistory),
}

impl History {
    #[must_use]
    pub fn new(kind: HistoryKind) -> Self {
        match kind {
            HistoryKind::None => Self::None(NoHistory),
            HistoryKind::Buffered { capacity } => {
                Self::Buffered(BufferedHistory::new(capacity))
            }
            HistoryKind::BlockArray { byte_budget } => {
                Self::BlockArray(BlockArrayHistory::new(byte_budget))
            }
        }
    }

    /// Replace this history with one of a different kind, transferring
    /// the last `N` retained lines into it — truncating the head (the
    /// oldest lines) if the new kind is smaller. This implements the
    /// lifecycle clause: the old instance is dropped once the transfer
    /// completes.
    #[must_use]
    pub fn retarget(self, kind: HistoryKind) -> Self {
        let mut next = Self::new(kind);
        let count = self.line_count();
        let capacity_hint = next.capacity_hint();
        let start = capacity_hint.map_or(0, |cap| count.saturating_sub(cap));
        for lineno in start..count {
            let len = self.line_len(lineno);
            let cells = self.get_cells(lineno, 0, len);
            next.add_line(HistoryLine::from_row(&cells, self.is_wrapped(lineno)));
        }
        next
    }

    fn capacity_hint(&self) -> Option<usize> {
        match self {
            Self::None(_) => Some(0),
            Self::Buffered(b) => Some(b.capacity()),
            Self::BlockArray(_) => None,
        }
    }
}

impl HistoryOps for History {
    fn line_count(&self) -> usize {
        match self {
            Self::None(h) => h.line_count(),
            Self::Buffered(h) => h.line_count(),
            Self::BlockArray(h) => h.line_count(),
        }
    }

    fn line_len(&self, lineno: usize) -> usize {
        match self {
            Self::None(h) => h.line_len(lineno),
            Self::Buffered(h) => h.line_len(lineno),
            Self::BlockArray(h) => h.line_len(lineno),
        }
    }

    fn get_cells(&self, lineno: usize, colno: usize, count: usize) -> Vec<Cell> {
        match self {
            Self::None(h) => h.get_cells(lineno, colno, count),
            Self::Buffered(h) => h.get_cells(lineno, colno, count),
            Self::BlockArray(h) => h.get_cells(lineno, colno, count),
        }
    }

    fn is_wrapped(&self, lineno: usize) -> bool {
        match self {
            Self::None(h) => h.is_wrapped(lineno),
            Self::Buffered(h) => h.is_wrapped(lineno),
            Self::BlockArray(h) => h.is_wrapped(lineno),
        }
    }

    fn add_line(&mut self, line: HistoryLine) {
        match self {
            Self::None(h) => h.add_line(line),
            Self::Buffered(h) => h.add_line(line),
            Self::BlockArray(h) => h.add_line(line),
        }
    }
}
