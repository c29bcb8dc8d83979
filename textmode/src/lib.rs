//! VGA text-mode console driver
//!
//! Drives the 80x25 colour text buffer at physical address `0xb8000` and the
//! CRT controller's hardware cursor. All hardware access goes through the
//! [`io::PortIo`] and [`io::MemIo`] capabilities, so everything here also runs
//! on the host against the devices in [`sim`].
//!
//! The grid and the cursor registers are global hardware state and nothing in
//! this crate locks them. Callers that share a [`console::Console`] between
//! execution contexts must provide the exclusion themselves.
//!
#![deny(unsafe_op_in_unsafe_fn)]
#![cfg_attr(not(test), no_std)]

pub mod console;
pub mod cursor;
pub mod io;
pub mod log;
pub mod screen;
pub mod scroll;
pub mod sim;

pub use console::Console;
pub use cursor::CursorController;
pub use screen::{
    get_col_from_offset, get_offset, get_row_from_offset, Cell, Offset, ScreenBuffer,
};
pub use scroll::move_offset_to_new_line;
