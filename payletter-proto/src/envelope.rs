//! Gateway error envelope detection.
//!
//! Successful responses never carry a `code` field. Failures come in two
//! shapes, depending on where in the gateway they originate:
//!
//! ```json
//! { "error": { "code": 500, "message": "internal error" } }
//! { "code": 2002, "message": "invalid billkey" }
//! ```
//!
//! Codes are integers on some endpoints and strings on others, so both are
//! normalized to a string.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error code and message reported by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayErrorBody {
    /// Gateway error code.
    pub code: String,
    /// Gateway error message.
    pub message: String,
}

fn value_to_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

impl GatewayErrorBody {
    /// Creates an error body.
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Extracts the error envelope from a response document, if present.
    ///
    /// Returns `None` for success documents.
    #[must_use]
    pub fn detect(document: &Value) -> Option<Self> {
        let object = document.as_object()?;
        if let Some(Value::Object(error)) = object.get("error") {
            return Some(Self {
                code: value_to_string(error.get("code")),
                message: value_to_string(error.get("message")),
            });
        }
        match object.get("code") {
            None | Some(Value::Null) => None,
            code => Some(Self {
                code: value_to_string(code),
                message: value_to_string(object.get("message")),
            }),
        }
    }
}

impl Display for GatewayErrorBody {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]{}", self.code, self.message)
    }
}
