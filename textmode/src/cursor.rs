//! VGA hardware cursor
//!
//! The cursor position lives in two CRT controller registers holding the high
//! and low bytes of a cell index. Each register is reached by writing its
//! number to the control port and then accessing the data port.

use static_assertions::const_assert;

use crate::io::PortIo;
use crate::screen::{Offset, MAX_COLS, MAX_ROWS};

pub const VGA_CTRL_REGISTER: u16 = 0x3d4;
pub const VGA_DATA_REGISTER: u16 = 0x3d5;

pub const VGA_CURSOR_START: u8 = 0x0a;
pub const VGA_CURSOR_END: u8 = 0x0b;
pub const VGA_OFFSET_HIGH: u8 = 0x0e;
pub const VGA_OFFSET_LOW: u8 = 0x0f;

// Cursor start register: bit 5 hides the cursor, bits 0-4 are the first
// scanline.
const CURSOR_DISABLE: u8 = 1 << 5;
const SCANLINE_MASK: u8 = 0x1f;

// Every cell index must fit the 16-bit location register pair.
const_assert!(MAX_ROWS * MAX_COLS <= u16::MAX as usize);

pub struct CursorController<P> {
    ports: P,
}

impl<P: PortIo> CursorController<P> {
    pub fn new(ports: P) -> Self {
        CursorController { ports }
    }

    pub fn ports(&self) -> &P {
        &self.ports
    }

    pub fn ports_mut(&mut self) -> &mut P {
        &mut self.ports
    }

    pub fn into_inner(self) -> P {
        self.ports
    }

    /// Moves the hardware cursor to `offset`. The high byte is sent before the
    /// low byte.
    ///
    /// # Panics
    ///
    /// If `offset` is not on screen.
    pub fn set_cursor(&mut self, offset: Offset) {
        assert!(
            offset.is_on_screen(),
            "cursor offset {} outside the grid",
            offset.as_raw()
        );
        let position = offset.cell_index() as u16;
        self.write_register(VGA_OFFSET_HIGH, (position >> 8) as u8);
        self.write_register(VGA_OFFSET_LOW, (position & 0xff) as u8);
    }

    /// Reads the hardware cursor back as an offset.
    ///
    /// The result comes straight from the hardware and is not guaranteed to be
    /// on screen.
    pub fn get_cursor(&mut self) -> Offset {
        let high = self.read_register(VGA_OFFSET_HIGH) as usize;
        let low = self.read_register(VGA_OFFSET_LOW) as usize;
        Offset::from_cell_index((high << 8) | low)
    }

    /// Shows the cursor as a block spanning scanlines `start..=end` of the
    /// character cell.
    pub fn enable_cursor(&mut self, start: u8, end: u8) {
        let cursor_start = self.read_register(VGA_CURSOR_START);
        self.write_register(
            VGA_CURSOR_START,
            (cursor_start & !(CURSOR_DISABLE | SCANLINE_MASK)) | (start & SCANLINE_MASK),
        );

        let cursor_end = self.read_register(VGA_CURSOR_END);
        self.write_register(
            VGA_CURSOR_END,
            (cursor_end & !SCANLINE_MASK) | (end & SCANLINE_MASK),
        );
    }

    pub fn disable_cursor(&mut self) {
        let cursor_start = self.read_register(VGA_CURSOR_START);
        self.write_register(VGA_CURSOR_START, cursor_start | CURSOR_DISABLE);
    }

    fn write_register(&mut self, index: u8, value: u8) {
        self.ports.write_port(VGA_CTRL_REGISTER, index);
        self.ports.write_port(VGA_DATA_REGISTER, value);
    }

    fn read_register(&mut self, index: u8) -> u8 {
        self.ports.write_port(VGA_CTRL_REGISTER, index);
        self.ports.read_port(VGA_DATA_REGISTER)
    }
}
