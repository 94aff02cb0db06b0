use crate::color::Color;
use crate::display_constants::{BUFFER_SIZE, HEIGHT, WIDTH};
use crate::e_paper_display_driver::VendorDriver;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EpdError {
    #[error("Failed to initialize e-Paper module")]
    ModuleInit { status: i32 },
    #[error("Buffer size mismatch. Expected {expected} bytes")]
    BufferSize { expected: usize, actual: usize },
}

/// Typed wrapper over a [`VendorDriver`].
///
/// Operations forward one-to-one to the vendor routines. The only checks are
/// the module init status and the frame length handed to `display`. If the
/// module was brought up and never torn down, dropping the device calls
/// `exit` so the GPIO/SPI handles are released.
#[derive(Debug)]
pub struct EpdDevice<D>
where
    D: VendorDriver,
{
    driver: D,
    module_up: bool,
}

impl<D> EpdDevice<D>
where
    D: VendorDriver,
{
    pub fn new(driver: D) -> EpdDevice<D> {
        EpdDevice {
            driver,
            module_up: false,
        }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn width(&self) -> usize {
        WIDTH
    }

    pub fn height(&self) -> usize {
        HEIGHT
    }

    pub fn buffer_size(&self) -> usize {
        BUFFER_SIZE
    }

    /// Brings up the GPIO/SPI module, then runs the panel init sequence.
    pub fn init(&mut self) -> Result<(), EpdError> {
        info!("EPD init...");
        let status = self.driver.module_init();
        if status != 0 {
            warn!("e-Paper module init returned {status}");
            return Err(EpdError::ModuleInit { status });
        }
        self.module_up = true;
        self.driver.panel_init();
        info!("EPD init done");
        Ok(())
    }

    pub fn clear(&mut self, color: Color) {
        self.clear_raw(color.code());
    }

    /// Clear with a raw color code. Codes outside the palette go to the driver unchanged.
    pub fn clear_raw(&mut self, color: u8) {
        info!("Clearing display to {color:#x}");
        self.driver.clear(color);
    }

    pub fn display(&mut self, image: &[u8]) -> Result<(), EpdError> {
        if image.len() != BUFFER_SIZE {
            return Err(EpdError::BufferSize {
                expected: BUFFER_SIZE,
                actual: image.len(),
            });
        }
        info!("Sending image...");
        self.driver.display(image);
        info!("Image sent");
        Ok(())
    }

    pub fn show(&mut self) {
        info!("Showing color test pattern");
        self.driver.show();
    }

    pub fn show_7block(&mut self) {
        info!("Showing 7-block test pattern");
        self.driver.show_7block();
    }

    pub fn sleep(&mut self) {
        info!("Sleeping display...");
        self.driver.sleep();
    }

    pub fn exit(&mut self) {
        info!("Releasing e-Paper module");
        self.driver.module_exit();
        self.module_up = false;
    }
}

impl<D> Drop for EpdDevice<D>
where
    D: VendorDriver,
{
    fn drop(&mut self) {
        if self.module_up {
            self.exit();
        }
    }
}
