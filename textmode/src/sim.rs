//! In-memory stand-ins for the VGA hardware
//!
//! These let the whole driver run without a machine underneath: unit tests
//! use them, and so can a host-side preview of console output.

use arrayvec::ArrayVec;

use crate::cursor::{VGA_CTRL_REGISTER, VGA_DATA_REGISTER};
use crate::io::{MemIo, PortIo};
use crate::screen::*;

/// The text grid as a plain byte array mapped at [`VIDEO_ADDRESS`].
///
/// Accesses outside the grid panic rather than touching anything else.
#[derive(Clone)]
pub struct SimulatedMemory {
    bytes: [u8; GRID_BYTES],
}

impl SimulatedMemory {
    /// A zeroed grid, like video memory before firmware has written to it.
    pub const fn new() -> Self {
        SimulatedMemory {
            bytes: [0; GRID_BYTES],
        }
    }

    /// A grid where every cell is (`character`, `attribute`).
    pub fn filled(character: u8, attribute: u8) -> Self {
        let mut mem = Self::new();
        for cell in mem.bytes.chunks_exact_mut(BYTES_PER_CELL) {
            cell[0] = character;
            cell[1] = attribute;
        }
        mem
    }

    pub fn bytes(&self) -> &[u8; GRID_BYTES] {
        &self.bytes
    }

    pub fn cell(&self, offset: Offset) -> Cell {
        let i = offset.as_raw();
        Cell {
            character: self.bytes[i],
            attribute: self.bytes[i + 1],
        }
    }

    /// The characters of `row`, without attributes.
    pub fn row_text(&self, row: usize) -> [u8; MAX_COLS] {
        let mut text = [0; MAX_COLS];
        for (col, c) in text.iter_mut().enumerate() {
            *c = self.cell(get_offset(col, row)).character;
        }
        text
    }

    fn index(address: usize) -> usize {
        assert!(
            (VIDEO_ADDRESS..VIDEO_ADDRESS + GRID_BYTES).contains(&address),
            "access to {address:#x} outside video memory"
        );
        address - VIDEO_ADDRESS
    }
}

impl Default for SimulatedMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemIo for SimulatedMemory {
    fn read_mem_byte(&self, address: usize) -> u8 {
        self.bytes[Self::index(address)]
    }

    fn write_mem_byte(&mut self, address: usize, value: u8) {
        self.bytes[Self::index(address)] = value;
    }
}

/// Number of CRT controller registers reachable through the index port.
pub const CRTC_REGISTER_COUNT: usize = 0x19;

const WRITE_LOG_LEN: usize = 32;

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct PortWrite {
    pub port: u16,
    pub value: u8,
}

/// The VGA CRT controller's index/data register pair.
///
/// A write to the index port selects a register; the data port then reads or
/// writes the selected register. The most recent port writes are kept so
/// tests can check the exact sequence.
pub struct SimulatedCrtc {
    index: u8,
    registers: [u8; CRTC_REGISTER_COUNT],
    writes: ArrayVec<PortWrite, WRITE_LOG_LEN>,
}

impl SimulatedCrtc {
    pub fn new() -> Self {
        SimulatedCrtc {
            index: 0,
            registers: [0; CRTC_REGISTER_COUNT],
            writes: ArrayVec::new(),
        }
    }

    pub fn register(&self, index: u8) -> u8 {
        self.registers[index as usize]
    }

    pub fn set_register(&mut self, index: u8, value: u8) {
        self.registers[index as usize] = value;
    }

    /// Port writes in the order they happened, oldest first. Only the last
    /// few are kept.
    pub fn writes(&self) -> &[PortWrite] {
        &self.writes
    }

    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }

    fn record(&mut self, write: PortWrite) {
        if self.writes.is_full() {
            self.writes.remove(0);
        }
        self.writes.push(write);
    }

    fn selected(&mut self) -> &mut u8 {
        let index = self.index as usize;
        assert!(
            index < CRTC_REGISTER_COUNT,
            "CRTC register {index:#x} does not exist"
        );
        &mut self.registers[index]
    }
}

impl Default for SimulatedCrtc {
    fn default() -> Self {
        Self::new()
    }
}

impl PortIo for SimulatedCrtc {
    fn read_port(&mut self, port: u16) -> u8 {
        match port {
            VGA_CTRL_REGISTER => self.index,
            VGA_DATA_REGISTER => *self.selected(),
            _ => panic!("read from unexpected port {port:#x}"),
        }
    }

    fn write_port(&mut self, port: u16, value: u8) {
        self.record(PortWrite { port, value });
        match port {
            VGA_CTRL_REGISTER => self.index = value,
            VGA_DATA_REGISTER => *self.selected() = value,
            _ => panic!("write to unexpected port {port:#x}"),
        }
    }
}
