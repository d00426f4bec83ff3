#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]

//! The character-cell screen model: a fixed-size grid of [`Cell`]s with a
//! cursor, rendition, margins, tab stops, selection, and (on the primary
//! screen only) an attached scrollback [`History`].
//!
//! `Screen` implements the public operation contract directly as inherent
//! methods; it has no knowledge of escape sequences or tokens — those are
//! `vttoken`/`vtinterp`'s concern. A terminal emulator owns two `Screen`s
//! (primary and alternate) and switches which one is "current"; that
//! switching, and the invariant that it resets the alternate screen's
//! selection, lives one layer up in `vtinterp`.

mod cursor;
mod modes;
mod selection;

pub use cursor::{CharsetState, SavedCursor};
pub use modes::ScreenModes;
pub use selection::Selection;

use vtcell::{Cell, ColorSlot, Rendition, RenditionAttrs};
use vthistory::{History, HistoryLine, HistoryOps};

/// Default tab stop spacing for a freshly created screen.
const DEFAULT_TAB_WIDTH: usize = 8;

/// A `lines x columns` grid of cells plus the cursor, rendition, margins,
/// tab stops, and mode state that goes with it.
#[derive(Debug, Clone)]
pub struct Screen {
    lines: usize,
    columns: usize,
    grid: Vec<Cell>,
    cy: usize,
    cx: usize,
    wrap_pending: bool,
    rendition: Rendition,
    margin_top: usize,
    margin_bottom: usize,
    tab_stops: Vec<bool>,
    modes: ScreenModes,
    saved_modes: ScreenModes,
    saved_cursor: Option<SavedCursor>,
    selection: Option<Selection>,
    history: Option<History>,
    hist_cursor: usize,
}

impl Screen {
    /// Create a screen of the given dimensions. `lines` and `columns`
    /// must both be positive; callers (the interpreter) are expected to
    /// reject `BadGeometry` before calling this.
    #[must_use]
    pub fn new(lines: usize, columns: usize) -> Self {
        let lines = lines.max(1);
        let columns = columns.max(1);
        Self {
            lines,
            columns,
            grid: vec![Cell::default(); lines * columns],
            cy: 0,
            cx: 0,
            wrap_pending: false,
            rendition: Rendition::default(),
            margin_top: 0,
            margin_bottom: lines - 1,
            tab_stops: Self::default_tab_stops(columns),
            modes: ScreenModes::initial(),
            saved_modes: ScreenModes::empty(),
            saved_cursor: None,
            selection: None,
            history: None,
            hist_cursor: 0,
        }
    }

    fn default_tab_stops(columns: usize) -> Vec<bool> {
        (0..columns).map(|c| c % DEFAULT_TAB_WIDTH == 0 && c != 0).collect()
    }

    /// Attach a scrollback history (primary screen only).
    #[must_use]
    pub fn with_history(mut self, history: History) -> Self {
        self.history = Some(history);
        self
    }

    pub fn set_history(&mut self, history: Option<History>) {
        self.history = history;
    }

    pub fn history(&self) -> Option<&History> {
        self.history.as_ref()
    }

    pub fn history_mut(&mut self) -> Option<&mut History> {
        self.history.as_mut()
    }

    #[must_use]
    pub fn lines(&self) -> usize {
        self.lines
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// 0-based cursor row/column.
    #[must_use]
    pub fn cursor(&self) -> (usize, usize) {
        (self.cy, self.cx)
    }

    #[must_use]
    pub fn wrap_pending(&self) -> bool {
        self.wrap_pending
    }

    #[must_use]
    pub fn rendition(&self) -> Rendition {
        self.rendition
    }

    #[must_use]
    pub fn margins(&self) -> (usize, usize) {
        (self.margin_top, self.margin_bottom)
    }

    #[must_use]
    pub fn modes(&self) -> ScreenModes {
        self.modes
    }

    #[must_use]
    pub fn hist_cursor(&self) -> usize {
        self.hist_cursor
    }

    pub fn set_hist_cursor(&mut self, n: usize) {
        let max = self.history.as_ref().map_or(0, HistoryOps::line_count);
        self.hist_cursor = n.min(max);
    }

    fn idx(&self, y: usize, x: usize) -> usize {
        y * self.columns + x
    }

    fn put(&mut self, y: usize, x: usize, cell: Cell) {
        let i = self.idx(y, x);
        self.grid[i] = cell;
    }

    fn get(&self, y: usize, x: usize) -> Cell {
        self.grid[self.idx(y, x)]
    }

    fn row(&self, y: usize) -> &[Cell] {
        let start = y * self.columns;
        &self.grid[start..start + self.columns]
    }

    fn push_row_to_history(&mut self, y: usize, wrapped: bool) {
        if let Some(history) = &mut self.history {
            let line = HistoryLine::from_row(self.row(y), wrapped);
            history.add_line(line);
        }
    }

    // ---- operations (spec.md 4.3) -----------------------------------

    /// Place `cp` at the cursor with the current rendition, handling
    /// auto-wrap exactly as documented: a pending wrap first pushes the
    /// completed line to history (marked wrapped) and moves to the next
    /// line before the new character is written; with wrap off the
    /// rightmost column is simply overwritten forever.
    pub fn show_character(&mut self, cp: char) {
        if self.wrap_pending {
            self.push_row_to_history(self.cy, true);
            self.index();
            self.cx = 0;
            self.wrap_pending = false;
        }
        let rendition = self.rendition;
        self.put(self.cy, self.cx, Cell::new(cp, rendition));
        if self.cx + 1 < self.columns {
            self.cx += 1;
        } else if self.modes.contains(ScreenModes::WRAP) {
            self.cx = self.columns;
            self.wrap_pending = true;
        }
        // else: wrap disabled, cx stays pinned at columns - 1.
    }

    pub fn back_space(&mut self) {
        self.wrap_pending = false;
        self.cx = self.cx.saturating_sub(1);
    }

    pub fn tabulate(&mut self) {
        self.wrap_pending = false;
        let next = (self.cx + 1..self.columns).find(|&c| self.tab_stops[c]);
        self.cx = next.unwrap_or(self.columns - 1);
    }

    pub fn new_line(&mut self) {
        if self.modes.contains(ScreenModes::NEW_LINE) {
            self.cx = 0;
        }
        self.index();
    }

    pub fn carriage_return(&mut self) {
        self.wrap_pending = false;
        self.cx = 0;
    }

    /// Move down one line, scrolling the region if the cursor is on the
    /// bottom margin. The outgoing line is discarded, not pushed to
    /// history — only `show_character`'s wrap handling feeds history.
    pub fn index(&mut self) {
        self.wrap_pending = false;
        if self.cy == self.margin_bottom {
            self.scroll_up_region(1);
        } else {
            self.cy = (self.cy + 1).min(self.lines - 1);
        }
    }

    pub fn reverse_index(&mut self) {
        self.wrap_pending = false;
        if self.cy == self.margin_top {
            self.scroll_down_region(1);
        } else {
            self.cy = self.cy.saturating_sub(1);
        }
    }

    pub fn next_line(&mut self) {
        self.carriage_return();
        self.index();
    }

    fn scroll_up_region(&mut self, n: usize) {
        let n = n.min(self.margin_bottom - self.margin_top + 1);
        for y in self.margin_top..=self.margin_bottom - n {
            let src_start = (y + n) * self.columns;
            let dst_start = y * self.columns;
            self.grid.copy_within(src_start..src_start + self.columns, dst_start);
        }
        for y in self.margin_bottom - n + 1..=self.margin_bottom {
            let start = y * self.columns;
            self.grid[start..start + self.columns].fill(Cell::default());
        }
    }

    fn scroll_down_region(&mut self, n: usize) {
        let n = n.min(self.margin_bottom - self.margin_top + 1);
        for y in (self.margin_top + n..=self.margin_bottom).rev() {
            let src_start = (y - n) * self.columns;
            let dst_start = y * self.columns;
            self.grid.copy_within(src_start..src_start + self.columns, dst_start);
        }
        for y in self.margin_top..self.margin_top + n {
            let start = y * self.columns;
            self.grid[start..start + self.columns].fill(Cell::default());
        }
    }

    pub fn insert_chars(&mut self, n: usize) {
        self.wrap_pending = false;
        let n = n.max(1).min(self.columns - self.cx);
        let row_start = self.cy * self.columns;
        let row = &mut self.grid[row_start..row_start + self.columns];
        row.copy_within(self.cx..self.columns - n, self.cx + n);
        row[self.cx..self.cx + n].fill(Cell::default());
    }

    pub fn delete_chars(&mut self, n: usize) {
        self.wrap_pending = false;
        let n = n.max(1).min(self.columns - self.cx);
        let row_start = self.cy * self.columns;
        let row = &mut self.grid[row_start..row_start + self.columns];
        row.copy_within(self.cx + n..self.columns, self.cx);
        let fill_from = self.columns - n;
        row[fill_from..].fill(Cell::default());
    }

    pub fn insert_lines(&mut self, n: usize) {
        if self.cy < self.margin_top || self.cy > self.margin_bottom {
            return;
        }
        let saved_top = self.margin_top;
        self.margin_top = self.cy;
        self.scroll_down_region(n.max(1));
        self.margin_top = saved_top;
    }

    pub fn delete_lines(&mut self, n: usize) {
        if self.cy < self.margin_top || self.cy > self.margin_bottom {
            return;
        }
        let saved_top = self.margin_top;
        self.margin_top = self.cy;
        self.scroll_up_region(n.max(1));
        self.margin_top = saved_top;
    }

    pub fn erase_chars(&mut self, n: usize) {
        let blank = Cell::new(' ', self.rendition);
        let end = (self.cx + n.max(1)).min(self.columns);
        for x in self.cx..end {
            self.put(self.cy, x, blank);
        }
    }

    /// 1-based cursor positioning, honoring origin mode.
    pub fn set_cursor_yx(&mut self, y: usize, x: usize) {
        self.wrap_pending = false;
        self.cy = self.clamp_row(y);
        self.cx = x.saturating_sub(1).min(self.columns - 1);
    }

    /// `CUU`: move the cursor up `n` rows without scrolling. Clamps at
    /// the top margin if the cursor started inside the scrolling region,
    /// otherwise at row 0 — distinct from `reverse_index`, which scrolls
    /// the region when the cursor is already at the top margin.
    pub fn cursor_up(&mut self, n: usize) {
        self.wrap_pending = false;
        let floor = if self.cy >= self.margin_top { self.margin_top } else { 0 };
        self.cy = self.cy.saturating_sub(n.max(1)).max(floor);
    }

    /// `CUD`: move the cursor down `n` rows without scrolling. Clamps at
    /// the bottom margin if the cursor started inside the scrolling
    /// region, otherwise at the last row — distinct from `index`, which
    /// scrolls the region when the cursor is already at the bottom
    /// margin.
    pub fn cursor_down(&mut self, n: usize) {
        self.wrap_pending = false;
        let ceiling = if self.cy <= self.margin_bottom { self.margin_bottom } else { self.lines - 1 };
        self.cy = (self.cy + n.max(1)).min(ceiling);
    }

    pub fn set_cursor_x(&mut self, x: usize) {
        self.wrap_pending = false;
        self.cx = x.saturating_sub(1).min(self.columns - 1);
    }

    pub fn set_cursor_y(&mut self, y: usize) {
        self.wrap_pending = false;
        self.cy = self.clamp_row(y);
    }

    fn clamp_row(&self, y_1based: usize) -> usize {
        let y = y_1based.saturating_sub(1);
        if self.modes.contains(ScreenModes::ORIGIN) {
            (self.margin_top + y).min(self.margin_bottom)
        } else {
            y.min(self.lines - 1)
        }
    }

    /// Set the scrolling region, `1 <= top < bottom <= lines`. Invalid
    /// ranges are silently ignored, matching the non-fatal error policy.
    pub fn set_margins(&mut self, top: usize, bottom: usize) {
        if top == 0 || top >= bottom || bottom > self.lines {
            return;
        }
        self.margin_top = top - 1;
        self.margin_bottom = bottom - 1;
        if self.modes.contains(ScreenModes::ORIGIN) {
            self.cy = self.margin_top;
            self.cx = 0;
            self.wrap_pending = false;
        }
    }

    pub fn set_rendition(&mut self, attr: RenditionAttrs) {
        self.rendition.attrs.insert(attr);
    }

    pub fn reset_rendition(&mut self, attr: RenditionAttrs) {
        self.rendition.attrs.remove(attr);
    }

    pub fn set_default_rendition(&mut self) {
        self.rendition = Rendition::default();
    }

    pub fn set_fore_color(&mut self, idx: u8) {
        self.rendition.fg = ColorSlot::indexed(idx);
    }

    pub fn set_fore_color_default(&mut self) {
        self.rendition.fg = ColorSlot::Default;
    }

    pub fn set_back_color(&mut self, idx: u8) {
        self.rendition.bg = ColorSlot::indexed(idx);
    }

    pub fn set_back_color_default(&mut self) {
        self.rendition.bg = ColorSlot::Default;
    }

    /// Snapshot cursor position, rendition, and the caller-supplied
    /// charset marker.
    pub fn save_cursor(&mut self, charset: CharsetState) {
        self.saved_cursor = Some(SavedCursor {
            cy: self.cy,
            cx: self.cx,
            rendition: self.rendition,
            charset,
        });
    }

    /// Restore position and rendition from the last `save_cursor`,
    /// returning the charset marker stored alongside them. A no-op
    /// (returning the default marker) if nothing was ever saved.
    pub fn restore_cursor(&mut self) -> CharsetState {
        if let Some(saved) = self.saved_cursor {
            self.cy = saved.cy;
            self.cx = saved.cx;
            self.rendition = saved.rendition;
            self.wrap_pending = false;
            saved.charset
        } else {
            CharsetState::default()
        }
    }

    pub fn clear_to_eol(&mut self) {
        for x in self.cx..self.columns {
            self.put(self.cy, x, Cell::default());
        }
    }

    pub fn clear_to_bol(&mut self) {
        for x in 0..=self.cx.min(self.columns - 1) {
            self.put(self.cy, x, Cell::default());
        }
    }

    pub fn clear_entire_line(&mut self) {
        let start = self.cy * self.columns;
        self.grid[start..start + self.columns].fill(Cell::default());
    }

    pub fn clear_to_eos(&mut self) {
        self.clear_to_eol();
        for y in self.cy + 1..self.lines {
            let start = y * self.columns;
            self.grid[start..start + self.columns].fill(Cell::default());
        }
    }

    pub fn clear_to_bos(&mut self) {
        self.clear_to_bol();
        for y in 0..self.cy {
            let start = y * self.columns;
            self.grid[start..start + self.columns].fill(Cell::default());
        }
    }

    pub fn clear_entire_screen(&mut self) {
        self.grid.fill(Cell::default());
    }

    /// `DECALN`: fill the entire screen with `E`, used as a screen
    /// alignment pattern.
    pub fn fill_with_e(&mut self) {
        self.grid.fill(Cell::new('E', Rendition::default()));
    }

    pub fn change_tab_stop(&mut self, set: bool) {
        if self.cx < self.tab_stops.len() {
            self.tab_stops[self.cx] = set;
        }
    }

    pub fn clear_tab_stops(&mut self) {
        self.tab_stops.fill(false);
    }

    pub fn set_mode(&mut self, mask: ScreenModes) {
        self.modes.insert(mask);
    }

    pub fn reset_mode(&mut self, mask: ScreenModes) {
        self.modes.remove(mask);
    }

    pub fn save_mode(&mut self, mask: ScreenModes) {
        self.saved_modes.remove(mask);
        self.saved_modes.insert(self.modes & mask);
    }

    pub fn restore_mode(&mut self, mask: ScreenModes) {
        self.modes.remove(mask);
        self.modes.insert(self.saved_modes & mask);
    }

    pub fn begin_selection(&mut self, y: usize, x: usize) {
        self.selection = Some(Selection::starting_at(y, x));
    }

    pub fn extend_selection(&mut self, y: usize, x: usize) {
        if let Some(sel) = &mut self.selection {
            sel.end = (y, x);
            sel.busy = true;
        }
    }

    pub fn end_selection(&mut self, y: usize, x: usize) {
        if let Some(sel) = &mut self.selection {
            sel.end = (y, x);
            sel.busy = false;
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    #[must_use]
    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Render-ready snapshot: always exactly `lines * columns` cells,
    /// with the cursor cell and any selected cells shown with swapped
    /// (reversed) colors.
    #[must_use]
    pub fn cooked_image(&self) -> Vec<Cell> {
        let mut image = self.grid.clone();
        if let Some(sel) = self.selection {
            for y in 0..self.lines {
                for x in 0..self.columns {
                    if sel.contains(y, x) {
                        let i = self.idx(y, x);
                        image[i].rendition = image[i].rendition.swapped();
                    }
                }
            }
        }
        if self.modes.contains(ScreenModes::CURSOR) {
            let i = self.idx(self.cy, self.cx.min(self.columns - 1));
            image[i].rendition = image[i].rendition.swapped();
        }
        image
    }

    /// Selected text, converting wrapped internal line breaks to spaces
    /// unless `keep_breaks` is set.
    #[must_use]
    pub fn sel_text(&self, keep_breaks: bool) -> String {
        let Some(sel) = self.selection else { return String::new() };
        let (lo, hi) = sel.ordered();
        let mut out = String::new();
        for y in lo.0..=hi.0 {
            let row_start = if y == lo.0 { lo.1 } else { 0 };
            let row_end = if y == hi.0 { hi.1 } else { self.columns - 1 };
            for x in row_start..=row_end.min(self.columns - 1) {
                out.push(self.get(y, x).codepoint);
            }
            if y != hi.0 {
                out.push(if keep_breaks { '\n' } else { ' ' });
            }
        }
        out
    }

    /// Grow or shrink the grid; no reflow, content outside the new
    /// dimensions is dropped. `lines`/`columns` of zero are rejected
    /// (`BadGeometry`).
    pub fn resize(&mut self, lines: usize, columns: usize) -> Result<(), BadGeometry> {
        if lines == 0 || columns == 0 {
            return Err(BadGeometry);
        }
        let mut new_grid = vec![Cell::default(); lines * columns];
        for y in 0..self.lines.min(lines) {
            for x in 0..self.columns.min(columns) {
                new_grid[y * columns + x] = self.get(y, x);
            }
        }
        self.grid = new_grid;
        self.lines = lines;
        self.columns = columns;
        self.cy = self.cy.min(lines - 1);
        self.cx = self.cx.min(columns - 1);
        self.wrap_pending = false;
        self.margin_top = self.margin_top.min(lines - 1);
        self.margin_bottom = self.margin_bottom.min(lines - 1).max(self.margin_top);
        self.tab_stops = Self::default_tab_stops(columns);
        Ok(())
    }
}

/// `resize` was called with a non-positive dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadGeometry;

impl std::fmt::Display for BadGeometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "screen resize requires positive lines and columns")
    }
}

impl std::error::Error for BadGeometry {}
