//! Teletype-style printing onto the text grid

use core::fmt;

use crate::cursor::CursorController;
use crate::io::{MemIo, PortIo};
use crate::screen::*;
use crate::scroll::{move_offset_to_new_line, needs_scroll};

/// The text console: the grid plus the hardware cursor.
///
/// The hardware cursor is the only record of the write position. Every print
/// starts from it and leaves it just past the last character written.
///
/// Not synchronized. The caller must make sure nothing else (for example an
/// interrupt handler) touches video memory or the cursor registers while a
/// method runs.
pub struct Console<M, P> {
    screen: ScreenBuffer<M>,
    cursor: CursorController<P>,
}

impl<M: MemIo, P: PortIo> Console<M, P> {
    pub fn new(mem: M, ports: P) -> Self {
        Console {
            screen: ScreenBuffer::new(mem),
            cursor: CursorController::new(ports),
        }
    }

    pub fn screen(&self) -> &ScreenBuffer<M> {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut ScreenBuffer<M> {
        &mut self.screen
    }

    pub fn cursor(&self) -> &CursorController<P> {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut CursorController<P> {
        &mut self.cursor
    }

    pub fn into_parts(self) -> (M, P) {
        (self.screen.into_inner(), self.cursor.into_inner())
    }

    /// Prints `string` up to its first NUL, if any. Characters outside ASCII
    /// are shown as `?`.
    pub fn print_string(&mut self, string: &str) {
        let mut offset = self.write_position();
        for c in string.chars().take_while(|&c| c != '\0') {
            let b = if c.is_ascii() { c as u8 } else { b'?' };
            offset = self.screen.advance(offset, b);
        }
        self.cursor.set_cursor(offset);
    }

    /// Prints raw glyph bytes up to the first NUL, if any.
    pub fn print_bytes(&mut self, bytes: &[u8]) {
        let mut offset = self.write_position();
        for &b in bytes.iter().take_while(|&&b| b != 0) {
            offset = self.screen.advance(offset, b);
        }
        self.cursor.set_cursor(offset);
    }

    pub fn print_char(&mut self, character: u8) {
        self.print_bytes(&[character]);
    }

    pub fn print_nl(&mut self) {
        let offset = self.cursor.get_cursor();
        // Below the grid, the newline is the scroll itself.
        let offset = if needs_scroll(offset) {
            self.screen.scroll_ln(offset)
        } else {
            self.screen.advance(offset, b'\n')
        };
        self.cursor.set_cursor(offset);
    }

    /// Moves the cursor to (`col`, `row`) and prints `string` from there.
    ///
    /// # Panics
    ///
    /// If (`col`, `row`) is not on the grid.
    pub fn print_at(&mut self, string: &str, col: usize, row: usize) {
        assert!(row < MAX_ROWS, "row {row} outside the grid");
        self.cursor.set_cursor(get_offset(col, row));
        self.print_string(string);
    }

    /// Steps the cursor back one cell and blanks it. Does nothing at the top
    /// left corner.
    /// A cursor below the grid steps back onto the last cell.
    pub fn print_backspace(&mut self) {
        let mut offset = self.cursor.get_cursor();
        if !offset.is_on_screen() {
            offset = Offset::from_raw(GRID_BYTES);
        }
        if offset == Offset::zero() {
            return;
        }
        let offset = Offset::from_cell_index(offset.cell_index() - 1);
        self.screen.write_cell(Cell::blank(), offset);
        self.cursor.set_cursor(offset);
    }

    /// Blanks the whole grid and homes the cursor.
    pub fn clear_screen(&mut self) {
        self.screen.clear();
        self.cursor.set_cursor(Offset::zero());
    }

    pub fn set_cursor(&mut self, offset: Offset) {
        self.cursor.set_cursor(offset);
    }

    pub fn get_cursor(&mut self) -> Offset {
        self.cursor.get_cursor()
    }

    pub fn set_char_at_video_memory(&mut self, character: u8, offset: Offset) {
        self.screen.set_char_at_video_memory(character, offset);
    }

    pub fn scroll_ln(&mut self, offset: Offset) -> Offset {
        self.screen.scroll_ln(offset)
    }

    pub fn move_offset_to_new_line(&self, offset: Offset) -> Offset {
        move_offset_to_new_line(offset)
    }

    // The hardware may hold a position below the grid (firmware left it
    // there, or someone else programmed it). Treat that like any other
    // bottom-of-screen position.
    fn write_position(&mut self) -> Offset {
        let offset = self.cursor.get_cursor();
        if needs_scroll(offset) {
            self.screen.scroll_ln(offset)
        } else {
            offset
        }
    }
}

impl<M: MemIo, P: PortIo> fmt::Write for Console<M, P> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.print_string(s);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use core::fmt::Write;

    use crate::sim::{SimulatedCrtc, SimulatedMemory};

    use pretty_assertions::assert_eq;

    type TestConsole = Console<SimulatedMemory, SimulatedCrtc>;

    fn console() -> TestConsole {
        Console::new(SimulatedMemory::new(), SimulatedCrtc::new())
    }

    fn padded(text: &[u8], fill: u8) -> [u8; MAX_COLS] {
        let mut row = [fill; MAX_COLS];
        row[..text.len()].copy_from_slice(text);
        row
    }

    #[test]
    fn plain_print() {
        let mut console = console();
        console.print_string("HI\n");

        let screen = console.screen();
        assert_eq!(screen.cell_at(Offset::from_raw(0)), Cell::new(b'H'));
        assert_eq!(screen.cell_at(Offset::from_raw(2)), Cell::new(b'I'));
        assert_eq!(console.get_cursor(), get_offset(0, 1));
    }

    #[test]
    fn print_continues_from_cursor() {
        let mut console = console();
        console.print_string("ab");
        console.print_string("cd");
        assert_eq!(console.screen().mem().row_text(0), padded(b"abcd", 0));
        assert_eq!(console.get_cursor(), get_offset(4, 0));
    }

    #[test]
    fn print_stops_at_nul() {
        let mut console = console();
        console.print_string("ok\0ignored");
        assert_eq!(console.screen().mem().row_text(0), padded(b"ok", 0));
        assert_eq!(console.get_cursor(), get_offset(2, 0));

        console.print_bytes(b"!\0?");
        assert_eq!(console.screen().mem().row_text(0), padded(b"ok!", 0));
    }

    #[test]
    fn print_replaces_non_ascii() {
        let mut console = console();
        console.print_string("a\u{e9}b");
        assert_eq!(console.screen().mem().row_text(0), padded(b"a?b", 0));
    }

    #[test]
    fn print_bytes_passes_glyphs_through() {
        let mut console = console();
        console.print_bytes(&[0xdb, 0xb0]);
        assert_eq!(console.screen().mem().row_text(0), padded(&[0xdb, 0xb0], 0));
    }

    #[test]
    fn wrap_at_end_of_row() {
        let mut console = console();
        console.print_string(&"x".repeat(MAX_COLS + 1));
        assert_eq!(console.screen().mem().row_text(0), [b'x'; MAX_COLS]);
        assert_eq!(console.screen().cell_at(get_offset(0, 1)), Cell::new(b'x'));
        assert_eq!(console.get_cursor(), get_offset(1, 1));
    }

    #[test]
    fn wrap_and_scroll_from_last_row() {
        let mut console = Console::new(
            SimulatedMemory::filled(b'.', WHITE_ON_BLACK),
            SimulatedCrtc::new(),
        );
        console.set_cursor(get_offset(0, 24));
        console.print_string(&"A".repeat(MAX_COLS));

        assert_eq!(console.get_cursor(), get_offset(0, 24));
        assert_eq!(console.screen().mem().row_text(23), [b'A'; MAX_COLS]);
        assert_eq!(console.screen().mem().row_text(24), [b' '; MAX_COLS]);
        assert_eq!(console.screen().mem().row_text(22), [b'.'; MAX_COLS]);
    }

    #[test]
    fn newline_on_last_row_scrolls() {
        let mut console = console();
        console.set_cursor(get_offset(5, 24));
        console.print_nl();
        assert_eq!(console.get_cursor(), get_offset(0, 24));
        assert_eq!(console.screen().mem().row_text(24), [b' '; MAX_COLS]);
    }

    #[test]
    fn print_nl_moves_to_next_row() {
        let mut console = console();
        console.set_cursor(get_offset(17, 6));
        console.print_nl();
        assert_eq!(console.get_cursor(), get_offset(0, 7));
    }

    #[test]
    fn last_row_fills_before_scrolling() {
        let mut console = console();
        console.set_cursor(get_offset(0, 24));
        console.print_string(&"B".repeat(MAX_COLS - 1));
        assert_eq!(console.get_cursor(), get_offset(79, 24));
        assert_eq!(console.screen().mem().row_text(23), [0; MAX_COLS]);
    }

    // Programs the cursor registers with a cell index below the grid.
    fn park_cursor_below_grid(console: &mut TestConsole, index: u16) {
        let crtc = console.cursor_mut().ports_mut();
        crtc.set_register(crate::cursor::VGA_OFFSET_HIGH, (index >> 8) as u8);
        crtc.set_register(crate::cursor::VGA_OFFSET_LOW, (index & 0xff) as u8);
    }

    #[test]
    fn off_grid_cursor_scrolls_first() {
        let mut console = console();
        console.print_string("top");
        park_cursor_below_grid(&mut console, 0x0800);

        console.print_string("z");
        assert_eq!(console.screen().cell_at(get_offset(0, 24)), Cell::new(b'z'));
        assert_eq!(console.get_cursor(), get_offset(1, 24));
    }

    #[test]
    fn newline_below_grid_scrolls_once() {
        let mut console = console();
        console.print_at("keep", 0, 23);
        park_cursor_below_grid(&mut console, 0xffff);

        console.print_nl();
        assert_eq!(console.screen().mem().row_text(22), padded(b"keep", 0));
        assert_eq!(console.screen().mem().row_text(24), [b' '; MAX_COLS]);
        assert_eq!(console.get_cursor(), get_offset(0, 24));
    }

    #[test]
    fn backspace_below_grid_does_not_scroll() {
        let mut console = console();
        console.print_at("keep", 0, 23);
        console.set_char_at_video_memory(b'!', get_offset(79, 24));
        park_cursor_below_grid(&mut console, 0xffff);

        console.print_backspace();
        assert_eq!(console.screen().mem().row_text(23), padded(b"keep", 0));
        assert_eq!(console.screen().cell_at(get_offset(79, 24)), Cell::blank());
        assert_eq!(console.get_cursor(), get_offset(79, 24));
    }

    #[test]
    fn clear_screen_is_idempotent() {
        let mut console = Console::new(
            SimulatedMemory::filled(b'#', 0x4e),
            SimulatedCrtc::new(),
        );
        console.set_cursor(get_offset(33, 12));

        console.clear_screen();
        let once = console.screen().mem().clone();
        for index in 0..MAX_ROWS * MAX_COLS {
            assert_eq!(once.cell(Offset::from_cell_index(index)), Cell::blank());
        }
        assert_eq!(console.get_cursor(), Offset::zero());

        console.clear_screen();
        assert_eq!(console.screen().mem().bytes(), once.bytes());
        assert_eq!(console.get_cursor(), Offset::zero());
    }

    #[test]
    fn print_at_positions_text() {
        let mut console = console();
        console.print_at("here", 10, 5);
        assert_eq!(console.screen().cell_at(get_offset(10, 5)), Cell::new(b'h'));
        assert_eq!(console.get_cursor(), get_offset(14, 5));
    }

    #[test]
    fn backspace() {
        let mut console = console();
        console.print_string("ab");
        console.print_backspace();
        assert_eq!(console.screen().cell_at(get_offset(1, 0)), Cell::blank());
        assert_eq!(console.get_cursor(), get_offset(1, 0));

        console.set_cursor(get_offset(0, 3));
        console.print_backspace();
        assert_eq!(console.get_cursor(), get_offset(79, 2));

        console.set_cursor(Offset::zero());
        console.print_backspace();
        assert_eq!(console.get_cursor(), Offset::zero());
    }

    #[test]
    fn formatted_output() {
        let mut console = console();
        write!(console, "{}+{}={}", 2, 2, 4).unwrap();
        assert_eq!(console.screen().mem().row_text(0), padded(b"2+2=4", 0));
    }

    #[test]
    fn long_output_keeps_last_lines() {
        let mut console = console();
        for i in 0..40 {
            writeln!(console, "line {i}").unwrap();
        }
        // The last line printed sits just above the blank bottom row. Rows
        // first written before any scroll keep the zeroed background; later
        // ones were blanked by a scroll.
        assert_eq!(
            console.screen().mem().row_text(23),
            padded(b"line 39", b' ')
        );
        assert_eq!(console.screen().mem().row_text(0), padded(b"line 16", 0));
        assert_eq!(console.get_cursor(), get_offset(0, 24));
    }
}
