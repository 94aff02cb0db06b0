pub mod simulated;
pub mod waveshare;

/// The vendor driver's C entry points, one method each.
///
/// Implementations forward straight to the hardware library (see
/// [`waveshare::WaveshareDriver`]) or stand in for it
/// ([`simulated::SimulatedDriver`]). No argument checking happens at this
/// level; [`crate::e_paper_display::EpdDevice`] validates before calling in.
pub trait VendorDriver {
    /// `DEV_Module_Init`. Zero means the GPIO/SPI layer came up.
    fn module_init(&mut self) -> i32;
    /// `DEV_Module_Exit`
    fn module_exit(&mut self);
    /// `EPD_7IN3E_Init`
    fn panel_init(&mut self);
    /// `EPD_7IN3E_Clear`
    fn clear(&mut self, color: u8);
    /// `EPD_7IN3E_Display`. `image` is always exactly one full frame.
    fn display(&mut self, image: &[u8]);
    /// `EPD_7IN3E_Show`
    fn show(&mut self);
    /// `EPD_7IN3E_Show7Block`
    fn show_7block(&mut self);
    /// `EPD_7IN3E_Sleep`
    fn sleep(&mut self);
}

impl<T: VendorDriver + ?Sized> VendorDriver for &mut T {
    fn module_init(&mut self) -> i32 {
        (**self).module_init()
    }
    fn module_exit(&mut self) {
        (**self).module_exit()
    }
    fn panel_init(&mut self) {
        (**self).panel_init()
    }
    fn clear(&mut self, color: u8) {
        (**self).clear(color)
    }
    fn display(&mut self, image: &[u8]) {
        (**self).display(image)
    }
    fn show(&mut self) {
        (**self).show()
    }
    fn show_7block(&mut self) {
        (**self).show_7block()
    }
    fn sleep(&mut self) {
        (**self).sleep()
    }
}
