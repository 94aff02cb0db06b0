use crate::color::Color;
use crate::display_constants::{BUFFER_SIZE, BYTE_WIDTH, HEIGHT};
use crate::e_paper_display_driver::VendorDriver;
use tracing::debug;

/// Calls kept by [`SimulatedDriver`]; older ones are dropped first.
pub const CALL_LOG_LIMIT: usize = 1024;

/// A vendor entry point as seen by [`SimulatedDriver`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DriverCall {
    ModuleInit,
    ModuleExit,
    PanelInit,
    Clear(u8),
    Display { len: usize },
    Show,
    Show7Block,
    Sleep,
}

/// Stand-in for the vendor library when there is no panel attached.
///
/// Calls are recorded in order, keeping the most recent [`CALL_LOG_LIMIT`].
/// The panel contents live in a packed frame, so tests can check what would
/// have been sent and the CLI can render a preview. `show`/`show_7block` only
/// approximate the vendor test patterns: vertical stripes and horizontal
/// bands of the six colors.
#[derive(Debug)]
pub struct SimulatedDriver {
    init_status: i32,
    call_limit: usize,
    calls: Vec<DriverCall>,
    frame: Vec<u8>,
    asleep: bool,
}

impl Default for SimulatedDriver {
    fn default() -> Self {
        SimulatedDriver::new()
    }
}

impl SimulatedDriver {
    pub fn new() -> SimulatedDriver {
        SimulatedDriver::with_init_status(0)
    }

    /// `module_init` will report `status`; anything non-zero is a failed bring-up.
    pub fn with_init_status(init_status: i32) -> SimulatedDriver {
        SimulatedDriver {
            init_status,
            call_limit: CALL_LOG_LIMIT,
            calls: Vec::new(),
            frame: vec![Color::White.packed(); BUFFER_SIZE],
            asleep: false,
        }
    }

    /// Keep at most `limit` calls instead of [`CALL_LOG_LIMIT`].
    pub fn with_call_limit(mut self, limit: usize) -> SimulatedDriver {
        self.call_limit = limit;
        let excess = self.calls.len().saturating_sub(limit);
        self.calls.drain(..excess);
        self
    }

    pub fn calls(&self) -> &[DriverCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<DriverCall> {
        std::mem::take(&mut self.calls)
    }

    /// What the panel would be showing, in the packed 4-bit format.
    pub fn frame(&self) -> &[u8] {
        &self.frame
    }

    pub fn is_asleep(&self) -> bool {
        self.asleep
    }

    fn record(&mut self, call: DriverCall) {
        debug!("simulated {call:?}");
        if self.call_limit == 0 {
            return;
        }
        if self.calls.len() >= self.call_limit {
            let excess = self.calls.len() + 1 - self.call_limit;
            self.calls.drain(..excess);
        }
        self.calls.push(call);
    }

    fn fill_rows(&mut self, rows: std::ops::Range<usize>, color: Color) {
        let start = rows.start * BYTE_WIDTH;
        let end = (rows.end * BYTE_WIDTH).min(self.frame.len());
        self.frame[start..end].fill(color.packed());
    }
}

impl VendorDriver for SimulatedDriver {
    fn module_init(&mut self) -> i32 {
        self.record(DriverCall::ModuleInit);
        self.init_status
    }

    fn module_exit(&mut self) {
        self.record(DriverCall::ModuleExit);
    }

    fn panel_init(&mut self) {
        self.record(DriverCall::PanelInit);
        self.asleep = false;
    }

    fn clear(&mut self, color: u8) {
        self.record(DriverCall::Clear(color));
        let nibble = color & 0x0F;
        self.frame.fill(nibble << 4 | nibble);
    }

    fn display(&mut self, image: &[u8]) {
        self.record(DriverCall::Display { len: image.len() });
        let len = image.len().min(self.frame.len());
        self.frame[..len].copy_from_slice(&image[..len]);
    }

    fn show(&mut self) {
        self.record(DriverCall::Show);
        let stripe = BYTE_WIDTH.div_ceil(Color::ALL.len());
        for row in self.frame.chunks_mut(BYTE_WIDTH) {
            for (i, byte) in row.iter_mut().enumerate() {
                *byte = Color::ALL[i / stripe].packed();
            }
        }
    }

    fn show_7block(&mut self) {
        self.record(DriverCall::Show7Block);
        let bands = [
            Color::Black,
            Color::Yellow,
            Color::Red,
            Color::Blue,
            Color::Green,
            Color::White,
        ];
        let band_height = HEIGHT.div_ceil(bands.len());
        for (i, color) in bands.into_iter().enumerate() {
            self.fill_rows(i * band_height..(i + 1) * band_height, color);
        }
    }

    fn sleep(&mut self) {
        self.record(DriverCall::Sleep);
        self.asleep = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_configured_init_status() {
        let mut driver = SimulatedDriver::with_init_status(-1);
        assert_eq!(driver.module_init(), -1);
        assert_eq!(driver.calls(), &[DriverCall::ModuleInit]);
    }

    #[test]
    fn call_log_keeps_only_the_latest_calls() {
        let mut driver = SimulatedDriver::new().with_call_limit(3);
        driver.module_init();
        driver.panel_init();
        driver.clear(1);
        driver.show();
        driver.sleep();
        assert_eq!(
            driver.calls(),
            &[DriverCall::Clear(1), DriverCall::Show, DriverCall::Sleep]
        );
    }

    #[test]
    fn default_call_log_is_bounded() {
        let mut driver = SimulatedDriver::new();
        for _ in 0..CALL_LOG_LIMIT + 10 {
            driver.show();
        }
        assert_eq!(driver.calls().len(), CALL_LOG_LIMIT);
    }

    #[test]
    fn clear_fills_frame_with_color() {
        let mut driver = SimulatedDriver::new();
        driver.clear(Color::Red.code());
        assert!(driver.frame().iter().all(|b| *b == 0x33));
    }

    #[test]
    fn display_replaces_frame() {
        let mut driver = SimulatedDriver::new();
        let image = vec![0x56; BUFFER_SIZE];
        driver.display(&image);
        assert_eq!(driver.frame(), image.as_slice());
        assert_eq!(driver.take_calls(), vec![DriverCall::Display { len: BUFFER_SIZE }]);
        assert!(driver.calls().is_empty());
    }

    #[test]
    fn show_7block_bands_start_black_and_end_white() {
        let mut driver = SimulatedDriver::new();
        driver.show_7block();
        assert_eq!(driver.frame()[0], Color::Black.packed());
        assert_eq!(driver.frame()[BUFFER_SIZE - 1], Color::White.packed());
    }

    #[test]
    fn show_draws_every_palette_color_on_each_row() {
        let mut driver = SimulatedDriver::new();
        driver.show();
        let row = &driver.frame()[..BYTE_WIDTH];
        for color in Color::ALL {
            assert!(row.contains(&color.packed()), "{color} missing");
        }
    }

    #[test]
    fn sleep_then_panel_init_wakes() {
        let mut driver = SimulatedDriver::new();
        driver.sleep();
        assert!(driver.is_asleep());
        driver.panel_init();
        assert!(!driver.is_asleep());
    }
}
