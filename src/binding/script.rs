//! JSON-lines bridge: one request per line in, one response per line out.
//!
//! ```text
//! {"call": "clear", "args": [1]}          -> {"ok":null}
//! {"call": "getWidth"}                    -> {"ok":800}
//! {"get": "Colors"}                       -> {"ok":{"BLACK":0,...}}
//! {"call": "display", "args": [{"$buffer": "<base64>"}]}
//! {"call": "clear"}                       -> {"error":{"kind":"TypeError","message":"Wrong number of arguments"}}
//! ```

use crate::binding::{Binding, BindingError, Value};
use crate::e_paper_display_driver::VendorDriver;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value as Json};
use std::io::{self, BufRead, Write};
use tracing::{debug, info, warn};

const BUFFER_KEY: &str = "$buffer";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Request {
    Call {
        call: String,
        #[serde(default)]
        args: Vec<Json>,
    },
    Get {
        get: String,
    },
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Response {
    Ok(Json),
    Error(ErrorBody),
}

impl Response {
    fn syntax_error(message: impl Into<String>) -> Response {
        Response::Error(ErrorBody {
            kind: "SyntaxError".to_string(),
            message: message.into(),
        })
    }
}

impl From<BindingError> for Response {
    fn from(err: BindingError) -> Self {
        Response::Error(ErrorBody {
            kind: err.kind().to_string(),
            message: err.to_string(),
        })
    }
}

/// Converts a JSON argument into a call value. `{"$buffer": "..."}` is
/// decoded as base64; any other object becomes a plain object.
pub fn json_to_value(json: Json) -> Result<Value, String> {
    Ok(match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(b),
        Json::Number(n) => Value::Number(n.as_f64().ok_or("number out of range")?),
        Json::String(s) => Value::String(s),
        Json::Array(_) => return Err("array arguments are not supported".to_string()),
        Json::Object(map) => {
            if let (1, Some(Json::String(encoded))) = (map.len(), map.get(BUFFER_KEY)) {
                let bytes = STANDARD
                    .decode(encoded)
                    .map_err(|e| format!("invalid {BUFFER_KEY}: {e}"))?;
                return Ok(Value::Buffer(bytes));
            }
            Value::Object(
                map.into_iter()
                    .map(|(k, v)| json_to_value(v).map(|v| (k, v)))
                    .collect::<Result<_, _>>()?,
            )
        }
    })
}

pub fn value_to_json(value: Value) -> Json {
    match value {
        Value::Undefined | Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(b),
        Value::Number(n) => {
            if n.fract() == 0.0 && n.abs() < u32::MAX as f64 {
                Json::Number(Number::from(n as i64))
            } else {
                Number::from_f64(n).map_or(Json::Null, Json::Number)
            }
        }
        Value::String(s) => Json::String(s),
        Value::Buffer(bytes) => {
            let mut map = Map::new();
            map.insert(BUFFER_KEY.to_string(), Json::String(STANDARD.encode(bytes)));
            Json::Object(map)
        }
        Value::Object(entries) => Json::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k, value_to_json(v)))
                .collect(),
        ),
    }
}

/// Handles one request line.
pub fn handle_line<D>(binding: &mut Binding<D>, line: &str) -> Response
where
    D: VendorDriver,
{
    let request = match serde_json::from_str::<Request>(line) {
        Ok(request) => request,
        Err(e) => return Response::syntax_error(e.to_string()),
    };
    match request {
        Request::Call { call, args } => {
            let args = match args.into_iter().map(json_to_value).collect::<Result<Vec<_>, _>>() {
                Ok(args) => args,
                Err(e) => return Response::syntax_error(e),
            };
            match binding.call(&call, &args) {
                Ok(value) => Response::Ok(value_to_json(value)),
                Err(e) => {
                    warn!("{call} failed: {e}");
                    e.into()
                }
            }
        }
        Request::Get { get } => Response::Ok(binding.get(&get).map_or(Json::Null, value_to_json)),
    }
}

/// Serves requests from `reader` until EOF. Blank lines are skipped.
pub fn serve<D, R, W>(binding: &mut Binding<D>, reader: R, mut writer: W) -> io::Result<usize>
where
    D: VendorDriver,
    R: BufRead,
    W: Write,
{
    info!("Bridge ready");
    let mut handled = 0;
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        debug!("request: {line}");
        let response = handle_line(binding, line);
        serde_json::to_writer(&mut writer, &response)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        handled += 1;
    }
    info!("Bridge closed after {handled} request(s)");
    Ok(handled)
}
