//! Dynamic call surface over [`EpdDevice`].
//!
//! A scripting host resolves an exported name and hands over its arguments as
//! [`Value`]s. Each function checks arity and argument types the way the host
//! expects (missing arguments are an error, extra ones are ignored) and then
//! forwards to the typed device API.

pub mod script;
mod value;

pub use self::value::Value;

use crate::color::color_constants;
use crate::e_paper_display::{EpdDevice, EpdError};
use crate::e_paper_display_driver::VendorDriver;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use thiserror::Error;
use tracing::debug;

/// Names of the functions a host sees on the module.
pub const EXPORTED_FUNCTIONS: [&str; 10] = [
    "init",
    "clear",
    "show7Block",
    "show",
    "display",
    "sleep",
    "exit",
    "getWidth",
    "getHeight",
    "getBufferSize",
];

/// Name of the read-only color mapping property.
pub const COLORS_PROPERTY: &str = "Colors";

/// Exception class a [`BindingError`] maps to on the host side.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    TypeError,
    RangeError,
    Error,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ErrorKind::TypeError => "TypeError",
            ErrorKind::RangeError => "RangeError",
            ErrorKind::Error => "Error",
        })
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum BindingError {
    #[error("Wrong number of arguments")]
    WrongArgumentCount { expected: usize, received: usize },
    #[error("Expected {expected}")]
    UnexpectedType {
        expected: &'static str,
        received: &'static str,
    },
    #[error("Color {0} is not an integer in 0-255")]
    ColorOutOfRange(f64),
    #[error("{0} is not a function")]
    UnknownFunction(String),
    #[error(transparent)]
    Device(#[from] EpdError),
}

impl BindingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BindingError::WrongArgumentCount { .. }
            | BindingError::UnexpectedType { .. }
            | BindingError::UnknownFunction(_) => ErrorKind::TypeError,
            BindingError::ColorOutOfRange(_) => ErrorKind::RangeError,
            BindingError::Device(_) => ErrorKind::Error,
        }
    }
}

/// The `Colors` property as an object of name to code.
pub fn colors() -> Value {
    Value::Object(
        color_constants()
            .into_iter()
            .map(|(name, code)| (name.to_string(), Value::from(code)))
            .collect::<BTreeMap<_, _>>(),
    )
}

fn expect_args(args: &[Value], expected: usize) -> Result<(), BindingError> {
    if args.len() < expected {
        return Err(BindingError::WrongArgumentCount {
            expected,
            received: args.len(),
        });
    }
    Ok(())
}

fn byte_arg(value: &Value) -> Result<u8, BindingError> {
    let number = value.as_number().ok_or(BindingError::UnexpectedType {
        expected: "number",
        received: value.type_name(),
    })?;
    if number.fract() != 0.0 || !(0.0..=255.0).contains(&number) {
        return Err(BindingError::ColorOutOfRange(number));
    }
    Ok(number as u8)
}

#[derive(Debug)]
pub struct Binding<D>
where
    D: VendorDriver,
{
    device: EpdDevice<D>,
}

impl<D> Binding<D>
where
    D: VendorDriver,
{
    pub fn new(driver: D) -> Binding<D> {
        Binding {
            device: EpdDevice::new(driver),
        }
    }

    pub fn device(&self) -> &EpdDevice<D> {
        &self.device
    }

    pub fn into_device(self) -> EpdDevice<D> {
        self.device
    }

    /// Invokes the exported function `name`.
    pub fn call(&mut self, name: &str, args: &[Value]) -> Result<Value, BindingError> {
        debug!("call {name} with {} argument(s)", args.len());
        match name {
            "init" => self.init(),
            "clear" => self.clear(args),
            "show7Block" => self.show_7block(),
            "show" => self.show(),
            "display" => self.display(args),
            "sleep" => self.sleep(),
            "exit" => self.exit(),
            "getWidth" => Ok(self.get_width()),
            "getHeight" => Ok(self.get_height()),
            "getBufferSize" => Ok(self.get_buffer_size()),
            _ => Err(BindingError::UnknownFunction(name.to_string())),
        }
    }

    /// Reads an exported property. Functions are not properties.
    pub fn get(&self, name: &str) -> Option<Value> {
        (name == COLORS_PROPERTY).then(colors)
    }

    pub fn init(&mut self) -> Result<Value, BindingError> {
        self.device.init()?;
        Ok(Value::Null)
    }

    pub fn clear(&mut self, args: &[Value]) -> Result<Value, BindingError> {
        expect_args(args, 1)?;
        let color = byte_arg(&args[0])?;
        self.device.clear_raw(color);
        Ok(Value::Null)
    }

    pub fn display(&mut self, args: &[Value]) -> Result<Value, BindingError> {
        expect_args(args, 1)?;
        let buffer = args[0].as_buffer().ok_or(BindingError::UnexpectedType {
            expected: "buffer",
            received: args[0].type_name(),
        })?;
        self.device.display(buffer)?;
        Ok(Value::Null)
    }

    pub fn show(&mut self) -> Result<Value, BindingError> {
        self.device.show();
        Ok(Value::Null)
    }

    pub fn show_7block(&mut self) -> Result<Value, BindingError> {
        self.device.show_7block();
        Ok(Value::Null)
    }

    pub fn sleep(&mut self) -> Result<Value, BindingError> {
        self.device.sleep();
        Ok(Value::Null)
    }

    pub fn exit(&mut self) -> Result<Value, BindingError> {
        self.device.exit();
        Ok(Value::Null)
    }

    pub fn get_width(&self) -> Value {
        self.device.width().into()
    }

    pub fn get_height(&self) -> Value {
        self.device.height().into()
    }

    pub fn get_buffer_size(&self) -> Value {
        self.device.buffer_size().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::e_paper_display_driver::simulated::{DriverCall, SimulatedDriver};

    fn binding() -> Binding<SimulatedDriver> {
        Binding::new(SimulatedDriver::new())
    }

    fn calls(binding: &Binding<SimulatedDriver>) -> &[DriverCall] {
        binding.device().driver().calls()
    }

    #[test]
    fn clear_without_arguments_is_arity_error() {
        let mut b = binding();
        let err = b.call("clear", &[]).unwrap_err();
        assert_eq!(
            err,
            BindingError::WrongArgumentCount {
                expected: 1,
                received: 0
            }
        );
        assert_eq!(err.kind(), ErrorKind::TypeError);
        assert_eq!(err.to_string(), "Wrong number of arguments");
    }

    #[test]
    fn clear_with_string_is_type_error() {
        let mut b = binding();
        let err = b.call("clear", &["red".into()]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeError);
        assert_eq!(err.to_string(), "Expected number");
        assert!(calls(&b).is_empty());
    }

    #[test]
    fn clear_rejects_values_outside_a_byte() {
        let mut b = binding();
        for bad in [256.0, -1.0, 1.5, f64::NAN] {
            let err = b.call("clear", &[Value::Number(bad)]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::RangeError, "{bad}");
        }
        assert!(calls(&b).is_empty());
    }

    #[test]
    fn clear_ignores_extra_arguments() {
        let mut b = binding();
        let out = b
            .call("clear", &[Value::Number(3.0), Value::Bool(true)])
            .unwrap();
        assert_eq!(out, Value::Null);
        assert_eq!(calls(&b), &[DriverCall::Clear(3)]);
    }

    #[test]
    fn display_requires_a_buffer() {
        let mut b = binding();
        let err = b.call("display", &[Value::Number(1.0)]).unwrap_err();
        assert_eq!(err.to_string(), "Expected buffer");
        let err = b.call("display", &[]).unwrap_err();
        assert_eq!(err.to_string(), "Wrong number of arguments");
    }

    #[test]
    fn display_size_mismatch_is_plain_error() {
        let mut b = binding();
        let err = b.call("display", &[vec![0u8; 191_999].into()]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Error);
        assert_eq!(err.to_string(), "Buffer size mismatch. Expected 192000 bytes");
        assert!(calls(&b).is_empty());
    }

    #[test]
    fn display_forwards_full_frame() {
        let mut b = binding();
        b.call("display", &[vec![0x11u8; 192_000].into()]).unwrap();
        assert_eq!(calls(&b), &[DriverCall::Display { len: 192_000 }]);
    }

    #[test]
    fn init_failure_surfaces() {
        let mut b = Binding::new(SimulatedDriver::with_init_status(-1));
        let err = b.call("init", &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Error);
        assert_eq!(err.to_string(), "Failed to initialize e-Paper module");
    }

    #[test]
    fn accessors_return_numbers() {
        let mut b = binding();
        assert_eq!(b.call("getWidth", &[]).unwrap(), Value::Number(800.0));
        assert_eq!(b.call("getHeight", &[]).unwrap(), Value::Number(480.0));
        assert_eq!(b.call("getBufferSize", &[]).unwrap(), Value::Number(192_000.0));
        assert!(calls(&b).is_empty());
    }

    #[test]
    fn unknown_function_is_type_error() {
        let mut b = binding();
        let err = b.call("refresh", &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeError);
        assert_eq!(err.to_string(), "refresh is not a function");
    }

    #[test]
    fn every_export_dispatches() {
        let mut b = binding();
        for name in EXPORTED_FUNCTIONS {
            let err = b.call(name, &[]).err();
            assert!(
                !matches!(err, Some(BindingError::UnknownFunction(_))),
                "{name} not dispatched"
            );
        }
    }

    #[test]
    fn colors_are_stable() {
        let b = binding();
        let first = b.get(COLORS_PROPERTY).unwrap();
        assert_eq!(first, b.get(COLORS_PROPERTY).unwrap());
        let Value::Object(map) = first else {
            panic!("Colors is not an object");
        };
        assert_eq!(map["BLUE"], Value::Number(5.0));
        assert_eq!(map["GREEN"], Value::Number(6.0));
        assert_eq!(map.len(), 6);
        assert_eq!(b.get("clear"), None);
    }
}
