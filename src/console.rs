//! The kernel's console instance and printing macros

use core::fmt::{self, Write};

use lazy_static::lazy_static;
use log::LevelFilter;
use spin::MutexGuard;
use textmode::io::{HardwarePorts, PhysicalMemory};
use textmode::log::LogSink;
use textmode::Console;

/// Virtual address of physical address 0. The VGA buffer is identity mapped.
pub const PHYS_MAP_OFFSET: usize = 0;

pub const LOG_LEVEL: LevelFilter = LevelFilter::Info;

pub type KernelConsole = Console<PhysicalMemory, HardwarePorts>;

/// A console over the real hardware.
///
/// # Safety
///
/// Only one console may drive the hardware at a time, except when panicking.
pub unsafe fn hardware_console() -> KernelConsole {
    unsafe { Console::new(PhysicalMemory::new(PHYS_MAP_OFFSET), HardwarePorts::new()) }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "qemu_debugcon")] {
        use textmode::log::{DebugconWriter, LogTee};

        pub type KernelLogger =
            LogTee<LogSink<DebugconWriter<HardwarePorts>>, LogSink<KernelConsole>>;

        lazy_static! {
            pub static ref LOGGER: KernelLogger = unsafe {
                LogTee(
                    LogSink::new(DebugconWriter::new(HardwarePorts::new()))
                        .with_max_level(LOG_LEVEL),
                    LogSink::new(hardware_console()).with_max_level(LOG_LEVEL),
                )
            };
        }

        fn console_sink() -> &'static LogSink<KernelConsole> {
            &LOGGER.1
        }
    } else {
        pub type KernelLogger = LogSink<KernelConsole>;

        lazy_static! {
            pub static ref LOGGER: KernelLogger =
                unsafe { LogSink::new(hardware_console()).with_max_level(LOG_LEVEL) };
        }

        fn console_sink() -> &'static LogSink<KernelConsole> {
            &LOGGER
        }
    }
}

/// Locks the shared console. Log records wait until the guard is dropped.
pub fn lock() -> MutexGuard<'static, KernelConsole> {
    console_sink().lock()
}

#[doc(hidden)]
pub fn _print(args: fmt::Arguments) {
    let _ = lock().write_fmt(args);
}

#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => ($crate::console::_print(format_args!($($arg)*)));
}

#[macro_export]
macro_rules! println {
    () => ($crate::print!("\n"));
    ($($arg:tt)*) => ($crate::print!("{}\n", format_args!($($arg)*)));
}
