//! Minimal kernel that brings up the VGA text console and logs to it.
//!
//! Boot glue (the multiboot header and entry trampoline) lives outside this
//! crate; it calls `kernel_entry` with the VGA text buffer identity mapped.
#![deny(unsafe_op_in_unsafe_fn)]
#![cfg_attr(not(test), no_std)]

pub mod console;
mod kmain;

pub use kmain::kernel_entry;
