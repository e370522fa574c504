//! Per-request scratch state shared between filters and handlers.

use std::any::Any;
use std::collections::HashMap;

/// A map of arbitrary state attached to a [`Request`](crate::request::Request)
/// as it passes through the stages of request handling.
///
/// A filter may stash a value here (an authenticated principal, a request id,
/// a deadline) for a later filter or the handler to pick up. The context is
/// created empty for every incoming request, lives exactly as long as that
/// request, and is never shared across requests.
#[derive(Default)]
pub struct RequestContext {
    entries: HashMap<String, Box<dyn Any + Send>>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tests whether the context contains an entry with the given key.
    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the value stored at the given key, downcast to `T`.
    ///
    /// Returns `None` if the key is absent or the stored value is not a `T`.
    pub fn get<T: 'static>(&self, key: &str) -> Option<&T> {
        self.entries.get(key).and_then(|v| v.downcast_ref())
    }

    /// Stores the given value at the given key, replacing any previous entry.
    pub fn put(&mut self, key: impl Into<String>, value: impl Any + Send) {
        self.entries.insert(key.into(), Box::new(value));
    }

    /// Removes and returns the value stored at the given key.
    pub fn take<T: 'static>(&mut self, key: &str) -> Option<T> {
        let entry = self.entries.remove(key)?;
        match entry.downcast::<T>() {
            Ok(boxed) => Some(*boxed),
            Err(entry) => {
                // Wrong type requested; put the entry back untouched.
                self.entries.insert(key.to_string(), entry);
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
