use core::fmt::Write;

use log::info;
use textmode::screen::{MAX_COLS, MAX_ROWS};
use x86_64::instructions::{hlt, interrupts};

use crate::console::{self, LOGGER};
use crate::println;

// Underline-style cursor on the bottom two scanlines of a 16-line cell.
const CURSOR_START: u8 = 14;
const CURSOR_END: u8 = 15;

#[no_mangle]
pub extern "C" fn kernel_entry() -> ! {
    init_logger();

    interrupts::disable();

    {
        let mut console = console::lock();
        console.clear_screen();
        console.cursor_mut().enable_cursor(CURSOR_START, CURSOR_END);
    }

    info!("Console ready, {MAX_COLS}x{MAX_ROWS} cells");

    println!("Hello from the kernel!");
    let _ = writeln!(console::lock(), "Nothing else to do; halting.");

    halt_loop();
}

fn init_logger() {
    log::set_logger(&*LOGGER).expect("logger installed twice");
    log::set_max_level(console::LOG_LEVEL);
}

fn halt_loop() -> ! {
    loop {
        hlt();
    }
}

#[cfg(not(test))]
#[panic_handler]
fn panic(info: &core::panic::PanicInfo<'_>) -> ! {
    use log::error;
    use textmode::log::LogExt;

    interrupts::disable();

    // A panic while the logger was locked means one of its writers is in an
    // unknown state. Bypass it with fresh writers over the hardware.
    if !LOGGER.is_locked() {
        error!("{info}");
    } else {
        #[cfg(feature = "qemu_debugcon")]
        {
            let ports = unsafe { textmode::io::HardwarePorts::new() };
            let mut writer = textmode::log::DebugconWriter::new(ports);
            let _ = writeln!(&mut writer, "{info}");
        }

        let mut console = unsafe { console::hardware_console() };
        console.print_nl();
        let _ = write!(&mut console, "{info}");
    }

    halt_loop();
}
