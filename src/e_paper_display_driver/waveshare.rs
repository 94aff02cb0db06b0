//! FFI to the Waveshare `EPD_7in3e` / `DEV_Config` C library.
//!
//! The color codes are `#define`s in `EPD_7in3e.h` and never reach the
//! linker, so they are mirrored here. Everything else is only compiled with
//! the `vendor` feature, which makes `build.rs` link the library.

pub const EPD_7IN3E_BLACK: u8 = 0x0;
pub const EPD_7IN3E_WHITE: u8 = 0x1;
pub const EPD_7IN3E_YELLOW: u8 = 0x2;
pub const EPD_7IN3E_RED: u8 = 0x3;
pub const EPD_7IN3E_BLUE: u8 = 0x5;
pub const EPD_7IN3E_GREEN: u8 = 0x6;

#[cfg(feature = "vendor")]
pub use self::ffi::WaveshareDriver;

#[cfg(feature = "vendor")]
mod ffi {
    use crate::e_paper_display_driver::VendorDriver;
    use std::marker::PhantomData;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tracing::debug;

    unsafe extern "C" {
        // UBYTE upstream
        fn DEV_Module_Init() -> u8;
        fn DEV_Module_Exit();

        fn EPD_7IN3E_Init();
        fn EPD_7IN3E_Clear(color: u8);
        // declared `UBYTE *Image` upstream but only ever read
        fn EPD_7IN3E_Display(image: *const u8);
        fn EPD_7IN3E_Show();
        fn EPD_7IN3E_Show7Block();
        fn EPD_7IN3E_Sleep();
    }

    static CLAIMED: AtomicBool = AtomicBool::new(false);

    /// Handle on the vendor library's process-wide hardware state.
    ///
    /// Only one exists at a time; it is released again on drop. The raw
    /// pointer marker keeps it on the thread that claimed it, since the C
    /// side has no locking.
    #[derive(Debug)]
    pub struct WaveshareDriver {
        _not_send: PhantomData<*const ()>,
    }

    impl WaveshareDriver {
        /// Claims the vendor driver, or `None` if another handle is alive.
        pub fn take() -> Option<WaveshareDriver> {
            CLAIMED
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .ok()
                .map(|_| WaveshareDriver {
                    _not_send: PhantomData,
                })
        }
    }

    impl Drop for WaveshareDriver {
        fn drop(&mut self) {
            CLAIMED.store(false, Ordering::Release);
        }
    }

    impl VendorDriver for WaveshareDriver {
        fn module_init(&mut self) -> i32 {
            debug!("DEV_Module_Init");
            i32::from(unsafe { DEV_Module_Init() })
        }

        fn module_exit(&mut self) {
            debug!("DEV_Module_Exit");
            unsafe { DEV_Module_Exit() }
        }

        fn panel_init(&mut self) {
            debug!("EPD_7IN3E_Init");
            unsafe { EPD_7IN3E_Init() }
        }

        fn clear(&mut self, color: u8) {
            debug!("EPD_7IN3E_Clear({color:#x})");
            unsafe { EPD_7IN3E_Clear(color) }
        }

        fn display(&mut self, image: &[u8]) {
            debug!("EPD_7IN3E_Display({} bytes)", image.len());
            // the C side reads a full frame from this pointer; EpdDevice checks the length
            unsafe { EPD_7IN3E_Display(image.as_ptr()) }
        }

        fn show(&mut self) {
            debug!("EPD_7IN3E_Show");
            unsafe { EPD_7IN3E_Show() }
        }

        fn show_7block(&mut self) {
            debug!("EPD_7IN3E_Show7Block");
            unsafe { EPD_7IN3E_Show7Block() }
        }

        fn sleep(&mut self) {
            debug!("EPD_7IN3E_Sleep");
            unsafe { EPD_7IN3E_Sleep() }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn only_one_handle_at_a_time() {
            let first = WaveshareDriver::take().expect("first claim");
            assert!(WaveshareDriver::take().is_none());
            drop(first);
            assert!(WaveshareDriver::take().is_some());
        }
    }
}
