//! Bindings for the Waveshare 7.3" (E) 7-color e-Paper vendor driver.
//!
//! [`EpdDevice`] is the typed API; [`binding::Binding`] is the dynamic call
//! surface a scripting host drives, and [`binding::script`] speaks it as JSON
//! lines. The hardware itself is reached through a [`VendorDriver`]: the
//! vendor C library behind the `vendor` feature, or [`SimulatedDriver`].

pub mod binding;
pub mod color;
pub mod display_constants;
pub mod e_paper_display;
pub mod e_paper_display_driver;

pub use crate::color::Color;
pub use crate::e_paper_display::{EpdDevice, EpdError};
pub use crate::e_paper_display_driver::simulated::SimulatedDriver;
pub use crate::e_paper_display_driver::VendorDriver;
