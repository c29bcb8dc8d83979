//! The memory-mapped character grid

use static_assertions::const_assert_eq;

use crate::io::MemIo;

/// Physical address of the colour text-mode buffer.
pub const VIDEO_ADDRESS: usize = 0xb8000;
pub const MAX_ROWS: usize = 25;
pub const MAX_COLS: usize = 80;
/// The only attribute byte the driver produces.
pub const WHITE_ON_BLACK: u8 = 0x0f;

pub const BYTES_PER_CELL: usize = 2;
pub const ROW_BYTES: usize = MAX_COLS * BYTES_PER_CELL;
/// Size of the whole grid in bytes.
pub const GRID_BYTES: usize = MAX_ROWS * ROW_BYTES;

const_assert_eq!(GRID_BYTES, 4000);

/// A byte index into the grid. Always even.
///
/// Offsets on rows `0..MAX_ROWS` address a cell. Offsets on row `MAX_ROWS` or
/// beyond are "past the bottom" and only ever exist transiently, to signal
/// that the next write needs a scroll.
#[derive(Clone, Copy, Eq, Ord, PartialEq, PartialOrd, Debug, Hash, Default)]
pub struct Offset(usize);

impl Offset {
    pub const fn from_raw(val: usize) -> Offset {
        assert!(val % BYTES_PER_CELL == 0, "offsets must be cell aligned");
        Offset(val)
    }

    pub const fn zero() -> Offset {
        Offset(0)
    }

    pub const fn as_raw(self) -> usize {
        self.0
    }

    pub const fn from_cell_index(index: usize) -> Offset {
        Offset(index * BYTES_PER_CELL)
    }

    pub const fn cell_index(self) -> usize {
        self.0 / BYTES_PER_CELL
    }

    pub const fn row(self) -> usize {
        get_row_from_offset(self)
    }

    pub const fn col(self) -> usize {
        get_col_from_offset(self)
    }

    /// The offset of the following cell, which may be the first cell of the
    /// next row.
    pub const fn next_cell(self) -> Offset {
        Offset(self.0 + BYTES_PER_CELL)
    }

    pub const fn is_on_screen(self) -> bool {
        self.0 < GRID_BYTES
    }
}

/// Returns the offset of (`col`, `row`).
///
/// `row` may equal `MAX_ROWS`, which yields the first past-the-bottom offset.
///
/// # Panics
///
/// If `col >= MAX_COLS` or `row > MAX_ROWS`.
pub const fn get_offset(col: usize, row: usize) -> Offset {
    assert!(col < MAX_COLS, "column out of range");
    assert!(row <= MAX_ROWS, "row out of range");
    Offset((row * MAX_COLS + col) * BYTES_PER_CELL)
}

pub const fn get_row_from_offset(offset: Offset) -> usize {
    offset.0 / ROW_BYTES
}

pub const fn get_col_from_offset(offset: Offset) -> usize {
    (offset.0 % ROW_BYTES) / BYTES_PER_CELL
}

/// One character position: the glyph byte and its attribute byte.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub struct Cell {
    pub character: u8,
    pub attribute: u8,
}

impl Cell {
    pub const fn new(character: u8) -> Cell {
        Cell {
            character,
            attribute: WHITE_ON_BLACK,
        }
    }

    pub const fn blank() -> Cell {
        Cell::new(b' ')
    }
}

/// Cell-level access to the grid through a [`MemIo`] backend.
///
/// The grid is shared hardware state. Callers must make sure no other
/// execution context (an interrupt handler, say) touches it while a call is
/// in progress; nothing here locks.
pub struct ScreenBuffer<M> {
    mem: M,
}

impl<M: MemIo> ScreenBuffer<M> {
    pub fn new(mem: M) -> Self {
        ScreenBuffer { mem }
    }

    pub fn mem(&self) -> &M {
        &self.mem
    }

    pub fn mem_mut(&mut self) -> &mut M {
        &mut self.mem
    }

    pub fn into_inner(self) -> M {
        self.mem
    }

    /// Writes `character` with the fixed attribute at `offset`.
    ///
    /// # Panics
    ///
    /// If `offset` is not on screen.
    pub fn set_char_at_video_memory(&mut self, character: u8, offset: Offset) {
        self.write_cell(Cell::new(character), offset);
    }

    pub fn write_cell(&mut self, cell: Cell, offset: Offset) {
        assert!(
            offset.is_on_screen(),
            "write to offset {} outside the grid",
            offset.as_raw()
        );
        let address = VIDEO_ADDRESS + offset.as_raw();
        self.mem.write_mem_byte(address, cell.character);
        self.mem.write_mem_byte(address + 1, cell.attribute);
    }

    /// # Panics
    ///
    /// If `offset` is not on screen.
    pub fn cell_at(&self, offset: Offset) -> Cell {
        assert!(
            offset.is_on_screen(),
            "read from offset {} outside the grid",
            offset.as_raw()
        );
        let address = VIDEO_ADDRESS + offset.as_raw();
        Cell {
            character: self.mem.read_mem_byte(address),
            attribute: self.mem.read_mem_byte(address + 1),
        }
    }

    /// Copies row `src` over row `dst`, attributes included.
    pub fn copy_row(&mut self, src: usize, dst: usize) {
        assert!(src < MAX_ROWS && dst < MAX_ROWS);
        let src_base = VIDEO_ADDRESS + get_offset(0, src).as_raw();
        let dst_base = VIDEO_ADDRESS + get_offset(0, dst).as_raw();
        for i in 0..ROW_BYTES {
            let b = self.mem.read_mem_byte(src_base + i);
            self.mem.write_mem_byte(dst_base + i, b);
        }
    }

    pub fn clear_row(&mut self, row: usize) {
        for col in 0..MAX_COLS {
            self.write_cell(Cell::blank(), get_offset(col, row));
        }
    }

    pub fn clear(&mut self) {
        for row in 0..MAX_ROWS {
            self.clear_row(row);
        }
    }
}
