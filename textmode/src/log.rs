//! `log` crate backends that write to the console and the debug port.

use core::fmt::Write;

use log::{Level, LevelFilter, Log, Metadata, Record};
use spin::{Mutex, MutexGuard};

use crate::io::PortIo;

/// Extended `Log` interface for the kernel.
pub trait LogExt {
    /// Check if the logger is locked. If a logging call itself panicked, the
    /// lock is never released; a panic handler checks this and falls back to
    /// writing the message some other way.
    fn is_locked(&self) -> bool;
}

/// Writes one line per record to a `core::fmt::Write` impl, e.g. a
/// [`crate::console::Console`]. Locks internally.
pub struct LogSink<W> {
    writer: Mutex<W>,
    max_level: LevelFilter,
}

impl<W: Write + Send> LogSink<W> {
    pub fn new(writer: W) -> Self {
        LogSink {
            writer: Mutex::new(writer),
            max_level: LevelFilter::Trace,
        }
    }

    /// Drops records less severe than `max_level`.
    pub fn with_max_level(mut self, max_level: LevelFilter) -> Self {
        self.max_level = max_level;
        self
    }

    /// Locks the writer for direct output that must not interleave with log
    /// records.
    pub fn lock(&self) -> MutexGuard<'_, W> {
        self.writer.lock()
    }
}

impl<W: Write + Send> Log for LogSink<W> {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let mut writer = self.writer.lock();
        let _ = writeln!(
            &mut writer,
            "[{}] {}: {}",
            level_as_string(record.level()),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        // Output goes straight to the device.
    }
}

impl<W: Write + Send> LogExt for LogSink<W> {
    fn is_locked(&self) -> bool {
        self.writer.is_locked()
    }
}

fn level_as_string(level: Level) -> &'static str {
    use Level::*;

    match level {
        Error => "ERROR",
        Warn => " WARN",
        Info => " INFO",
        Debug => "DEBUG",
        Trace => "TRACE",
    }
}

/// Forwards each record to two loggers, in order.
pub struct LogTee<L1, L2>(pub L1, pub L2);

impl<L1: Log, L2: Log> Log for LogTee<L1, L2> {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.0.enabled(metadata) || self.1.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        self.0.log(record);
        self.1.log(record);
    }

    fn flush(&self) {
        self.0.flush();
        self.1.flush();
    }
}

impl<L1: LogExt, L2: LogExt> LogExt for LogTee<L1, L2> {
    fn is_locked(&self) -> bool {
        self.0.is_locked() || self.1.is_locked()
    }
}

/// QEMU's `-debugcon` port.
pub const DEBUGCON_PORT: u16 = 0xe9;

/// Writes text to QEMU's debug console, one byte per port write.
pub struct DebugconWriter<P> {
    ports: P,
}

impl<P: PortIo> DebugconWriter<P> {
    pub fn new(ports: P) -> Self {
        DebugconWriter { ports }
    }

    pub fn into_inner(self) -> P {
        self.ports
    }
}

impl<P: PortIo> Write for DebugconWriter<P> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        s.bytes().for_each(|b| self.ports.write_port(DEBUGCON_PORT, b));
        Ok(())
    }
}
