//! Response value built by handlers and filters.

use std::fmt;
use std::io::{Cursor, Read};

use serde_json::Value;

use crate::headers::ResponseHeaders;

/// The body attached to a [`Response`].
///
/// The tag is decided once, when the body is attached, so the write path never
/// has to probe an opaque value. Stream bodies bypass object serialization
/// entirely and are copied to the wire as-is; value bodies are resolved
/// through the serializer registry when the response is written.
pub enum Body {
    /// No body; only the status code and headers are written.
    Empty,
    /// A byte stream copied verbatim to the client and released (dropped)
    /// exactly once after the copy.
    Reader(Box<dyn Read + Send>),
    /// An arbitrary value handed to the first matching
    /// [`ObjectSerializer`](crate::serializer::ObjectSerializer).
    Value(Value),
}

impl Body {
    /// Wraps an in-memory buffer as a stream body.
    pub fn reader(reader: impl Read + Send + 'static) -> Self {
        Body::Reader(Box::new(reader))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Body::Empty)
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Empty => f.write_str("Body::Empty"),
            Body::Reader(_) => f.write_str("Body::Reader(..)"),
            Body::Value(v) => write!(f, "Body::Value({v})"),
        }
    }
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Body::Empty,
            other => Body::Value(other),
        }
    }
}

impl From<String> for Body {
    fn from(value: String) -> Self {
        Body::Value(Value::String(value))
    }
}

impl From<&str> for Body {
    fn from(value: &str) -> Self {
        Body::Value(Value::String(value.to_string()))
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Body::Reader(Box::new(Cursor::new(bytes)))
    }
}

/// Builds the HTTP response sent back to the client that made the request.
///
/// A fresh response carries status 200, no body, and no headers. The fluent
/// setters consume and return the instance so handlers can build a response
/// in one expression:
///
/// ```
/// use swerve::response::Response;
///
/// let res = Response::new()
///     .with_code(201)
///     .with_header("Location", "/widgets/42")
///     .with_body(serde_json::json!({ "id": 42 }));
/// assert_eq!(res.code(), 201);
/// ```
pub struct Response {
    code: u16,
    body: Body,
    headers: ResponseHeaders,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    /// Creates a response with status 200, no body, and no headers.
    pub fn new() -> Self {
        Self {
            code: 200,
            body: Body::Empty,
            headers: ResponseHeaders::new(),
        }
    }

    /// Sets the HTTP status code.
    pub fn with_code(mut self, code: u16) -> Self {
        self.code = code;
        self
    }

    /// Sets the response body.
    ///
    /// Accepts anything convertible into a [`Body`]: strings and
    /// `serde_json::Value`s become serializable value bodies, `Vec<u8>`
    /// becomes a stream body that bypasses serialization.
    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets the named header to the given value, replacing prior values.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(name, value);
        self
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn headers(&self) -> &ResponseHeaders {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut ResponseHeaders {
        &mut self.headers
    }

    pub(crate) fn into_parts(self) -> (u16, Body, ResponseHeaders) {
        (self.code, self.body, self.headers)
    }

    /// A synthetic 500 response carrying a plain-text message.
    ///
    /// The message rides as a stream body so it reaches the client verbatim
    /// without passing through any registered serializer.
    pub(crate) fn internal_error(message: &str) -> Self {
        Self::new()
            .with_code(500)
            .with_body(message.as_bytes().to_vec())
    }
}
