//! Object serializers turn handler-returned values into response bytes.

use serde_json::Value;

use crate::content_type;

/// Converts a response body value into bytes plus a content type.
///
/// Serializers registered on the server are tested in registration order
/// against each value body; the first one whose [`matches`](Self::matches)
/// returns `true` wins. If none match, the built-in [`DefaultSerializer`]
/// is used. Stream bodies never reach a serializer.
pub trait ObjectSerializer: Send + Sync {
    /// Tests whether this serializer can handle the given body value.
    fn matches(&self, body: &Value) -> bool;

    /// Serializes the body value into the bytes sent to the client.
    fn serialize(&self, body: &Value) -> anyhow::Result<Vec<u8>>;

    /// The `Content-Type` declared for serialized output.
    fn content_type(&self) -> &str;
}

/// The fallback serializer: matches everything and stringifies the value.
///
/// String values are emitted verbatim (no surrounding quotes); everything
/// else is rendered through its JSON display form. Content type is
/// `text/plain`.
pub struct DefaultSerializer;

impl ObjectSerializer for DefaultSerializer {
    fn matches(&self, _body: &Value) -> bool {
        true
    }

    fn serialize(&self, body: &Value) -> anyhow::Result<Vec<u8>> {
        let text = match body {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        Ok(text.into_bytes())
    }

    fn content_type(&self) -> &str {
        content_type::TEXT_PLAIN
    }
}

type MatcherFn = Box<dyn Fn(&Value) -> bool + Send + Sync>;

/// Serializes matching values as JSON with content type `application/json`.
pub struct JsonSerializer {
    matcher: Option<MatcherFn>,
}

impl Default for JsonSerializer {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonSerializer {
    /// A JSON serializer that matches every body value.
    pub fn new() -> Self {
        Self { matcher: None }
    }

    /// A JSON serializer that only matches values the given predicate
    /// accepts.
    pub fn with_matcher(matcher: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Self {
            matcher: Some(Box::new(matcher)),
        }
    }
}

impl ObjectSerializer for JsonSerializer {
    fn matches(&self, body: &Value) -> bool {
        match &self.matcher {
            Some(matcher) => matcher(body),
            None => true,
        }
    }

    fn serialize(&self, body: &Value) -> anyhow::Result<Vec<u8>> {
        Ok(serde_json::to_vec(body)?)
    }

    fn content_type(&self) -> &str {
        content_type::APPLICATION_JSON
    }
}
