//! Hardware access capabilities
//!
//! Everything above this module talks to the machine only through [`PortIo`]
//! and [`MemIo`]. The kernel plugs in [`HardwarePorts`] and
//! [`PhysicalMemory`]; tests plug in the simulated devices from
//! [`crate::sim`].

use core::ptr::{read_volatile, write_volatile};

/// Byte-wide access to numbered x86 I/O ports.
pub trait PortIo {
    fn read_port(&mut self, port: u16) -> u8;
    fn write_port(&mut self, port: u16, value: u8);
}

/// Byte-wide access to physical memory.
pub trait MemIo {
    fn read_mem_byte(&self, address: usize) -> u8;
    fn write_mem_byte(&mut self, address: usize, value: u8);
}

impl<T: PortIo + ?Sized> PortIo for &mut T {
    fn read_port(&mut self, port: u16) -> u8 {
        (**self).read_port(port)
    }

    fn write_port(&mut self, port: u16, value: u8) {
        (**self).write_port(port, value)
    }
}

impl<T: MemIo + ?Sized> MemIo for &mut T {
    fn read_mem_byte(&self, address: usize) -> u8 {
        (**self).read_mem_byte(address)
    }

    fn write_mem_byte(&mut self, address: usize, value: u8) {
        (**self).write_mem_byte(address, value)
    }
}

/// Real port I/O using `in`/`out` instructions.
#[cfg(target_arch = "x86_64")]
pub struct HardwarePorts {
    _private: (),
}

#[cfg(target_arch = "x86_64")]
impl HardwarePorts {
    /// # Safety
    ///
    /// Caller must ensure every port later passed to this object is safe to
    /// access, and that nothing else drives the same device concurrently.
    pub unsafe fn new() -> Self {
        HardwarePorts { _private: () }
    }
}

#[cfg(target_arch = "x86_64")]
impl PortIo for HardwarePorts {
    fn read_port(&mut self, port: u16) -> u8 {
        let mut port = x86_64::instructions::port::Port::<u8>::new(port);
        // SAFETY: guaranteed by the contract of `HardwarePorts::new`.
        unsafe { port.read() }
    }

    fn write_port(&mut self, port: u16, value: u8) {
        let mut port = x86_64::instructions::port::Port::<u8>::new(port);
        // SAFETY: guaranteed by the contract of `HardwarePorts::new`.
        unsafe { port.write(value) }
    }
}

/// Real memory access through the kernel's mapping of physical memory.
pub struct PhysicalMemory {
    // Virtual address at which physical address 0 is mapped.
    mapping_offset: usize,
}

impl PhysicalMemory {
    /// `mapping_offset` is the virtual address of physical address 0: zero
    /// for an identity mapping, or e.g. `0xFFFF_8000_0000_0000` for a
    /// higher-half direct map.
    ///
    /// # Safety
    ///
    /// Every physical address later passed to this object, translated by
    /// `mapping_offset`, must be mapped and valid for volatile byte access.
    pub unsafe fn new(mapping_offset: usize) -> Self {
        PhysicalMemory { mapping_offset }
    }

    fn virt(&self, address: usize) -> *mut u8 {
        self.mapping_offset.wrapping_add(address) as *mut u8
    }
}

impl MemIo for PhysicalMemory {
    fn read_mem_byte(&self, address: usize) -> u8 {
        // SAFETY: guaranteed by the contract of `PhysicalMemory::new`.
        unsafe { read_volatile(self.virt(address)) }
    }

    fn write_mem_byte(&mut self, address: usize, value: u8) {
        // SAFETY: guaranteed by the contract of `PhysicalMemory::new`.
        unsafe { write_volatile(self.virt(address), value) }
    }
}
