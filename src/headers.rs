//! Outgoing response header container.

use smallvec::SmallVec;

type ValueList = SmallVec<[String; 2]>;

/// An ordered, multi-valued mapping of header names to values.
///
/// Name lookups are ASCII case-insensitive. Insertion order of names and of
/// values within a name is preserved; the whole container is applied to the
/// transport verbatim when the response is written.
#[derive(Default)]
pub struct ResponseHeaders {
    entries: Vec<(String, ValueList)>,
}

impl ResponseHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(n, _)| n.eq_ignore_ascii_case(name))
    }

    /// Sets the header to the given value, replacing any values previously
    /// set for it.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let mut values = ValueList::new();
        values.push(value.into());
        match self.position(&name) {
            Some(i) => self.entries[i].1 = values,
            None => self.entries.push((name, values)),
        }
    }

    /// Adds a value for the header without replacing any existing values.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        match self.position(&name) {
            Some(i) => self.entries[i].1.push(value.into()),
            None => {
                let mut values = ValueList::new();
                values.push(value.into());
                self.entries.push((name, values));
            }
        }
    }

    /// Adds every value in the iterator for the header.
    pub fn append_all<I, V>(&mut self, name: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let name = name.into();
        for value in values {
            self.append(name.clone(), value);
        }
    }

    /// Returns the first value set for the header.
    pub fn get_first(&self, name: &str) -> Option<&str> {
        self.get_nth(name, 0)
    }

    /// Returns the nth value set for the header.
    pub fn get_nth(&self, name: &str, n: usize) -> Option<&str> {
        self.position(name)
            .and_then(|i| self.entries[i].1.get(n))
            .map(String::as_str)
    }

    /// Returns all values set for the header, or `None` if it was never set.
    pub fn get_all(&self, name: &str) -> Option<&[String]> {
        self.position(name).map(|i| self.entries[i].1.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Calls `f` for every header name with its full value list.
    pub fn for_each(&self, mut f: impl FnMut(&str, &[String])) {
        for (name, values) in &self.entries {
            f(name, values);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(n, v)| (n.as_str(), v.as_slice()))
    }

    /// Number of distinct header names set.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_values() {
        let mut h = ResponseHeaders::new();
        h.append("X-Tag", "a");
        h.append("X-Tag", "b");
        h.set("X-Tag", "c");
        assert_eq!(h.get_all("X-Tag").unwrap(), &["c".to_string()]);
    }

    #[test]
    fn test_append_accumulates() {
        let mut h = ResponseHeaders::new();
        h.append("X-Tag", "a");
        h.append_all("X-Tag", ["b", "c"]);
        assert_eq!(h.get_first("X-Tag"), Some("a"));
        assert_eq!(h.get_nth("X-Tag", 2), Some("c"));
        assert_eq!(h.get_all("X-Tag").unwrap().len(), 3);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut h = ResponseHeaders::new();
        h.set("Content-Type", "text/html");
        assert_eq!(h.get_first("content-type"), Some("text/html"));
        assert!(h.contains("CONTENT-TYPE"));
        // Case-insensitive set replaces rather than duplicating the name.
        h.set("content-type", "text/css");
        assert_eq!(h.len(), 1);
        assert_eq!(h.get_first("Content-Type"), Some("text/css"));
    }

    #[test]
    fn test_absent_header() {
        let h = ResponseHeaders::new();
        assert_eq!(h.get_first("X-Missing"), None);
        assert_eq!(h.get_all("X-Missing"), None);
        assert_eq!(h.get_nth("X-Missing", 0), None);
        assert!(!h.contains("X-Missing"));
    }

    #[test]
    fn test_for_each_sees_all_entries() {
        let mut h = ResponseHeaders::new();
        h.set("A", "1");
        h.append("B", "2");
        h.append("B", "3");
        let mut seen = Vec::new();
        h.for_each(|name, values| seen.push((name.to_string(), values.len())));
        assert_eq!(seen, vec![("A".to_string(), 1), ("B".to_string(), 2)]);
    }
}
