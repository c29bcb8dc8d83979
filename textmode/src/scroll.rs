//! Line advance and scrolling
//!
//! The write position walks the grid cell by cell. A newline or a write into
//! the last column moves it to the start of the next row; moving past the last
//! row scrolls the grid up one row and lands at the start of the cleared
//! bottom row. The bottom row is therefore always usable in full before a
//! scroll happens.

use crate::io::MemIo;
use crate::screen::*;

/// Where an offset sits relative to the line and screen boundaries.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum LineState {
    /// Inside a row, with room for more characters.
    Writing,
    /// On the last column: the next character written wraps.
    AtRowEnd,
    /// Past the last row: a scroll is due before anything can be written.
    AtScreenBottom,
}

pub fn line_state(offset: Offset) -> LineState {
    if needs_scroll(offset) {
        LineState::AtScreenBottom
    } else if get_col_from_offset(offset) == MAX_COLS - 1 {
        LineState::AtRowEnd
    } else {
        LineState::Writing
    }
}

pub fn needs_scroll(offset: Offset) -> bool {
    get_row_from_offset(offset) >= MAX_ROWS
}

/// Returns the offset of the first column of the row after `offset`'s row.
pub fn move_offset_to_new_line(offset: Offset) -> Offset {
    get_offset(0, get_row_from_offset(offset) + 1)
}

impl<M: MemIo> ScreenBuffer<M> {
    /// Shifts every row up by one, blanks the last row, and returns the offset
    /// of its first column.
    ///
    /// `offset` is the past-the-bottom position that made the scroll
    /// necessary; the result does not depend on it beyond that.
    pub fn scroll_ln(&mut self, offset: Offset) -> Offset {
        debug_assert!(needs_scroll(offset));
        for row in 1..MAX_ROWS {
            self.copy_row(row, row - 1);
        }
        self.clear_row(MAX_ROWS - 1);
        get_offset(0, MAX_ROWS - 1)
    }

    /// Feeds one byte through the write/wrap/scroll state machine and returns
    /// the next write position.
    ///
    /// The character is written before the boundary check, so a character
    /// landing on the last column stays there and only the following write
    /// wraps.
    pub fn advance(&mut self, offset: Offset, byte: u8) -> Offset {
        let offset = if byte == b'\n' {
            move_offset_to_new_line(offset)
        } else {
            self.set_char_at_video_memory(byte, offset);
            offset.next_cell()
        };

        match line_state(offset) {
            LineState::AtScreenBottom => self.scroll_ln(offset),
            LineState::Writing | LineState::AtRowEnd => offset,
        }
    }
}
