//! Best-effort parsing helpers that keep a record of every dropped entry.
use std::fmt;

use toml::{Table, Value};

/// One entry that was dropped because it had an unexpected shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Skipped {
    /// Dotted location, e.g. `generators.copper.cluster_size`.
    pub path: String,
    pub expected: &'static str,
    pub found: &'static str,
}

impl fmt::Display for Skipped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: expected {}, found {}",
            self.path, self.expected, self.found
        )
    }
}

/// A parsed value together with everything that was skipped on the way.
#[derive(Clone, Debug)]
pub struct Parsed<T> {
    pub value: T,
    pub skipped: Vec<Skipped>,
}

impl<T> Parsed<T> {
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    pub fn skipped_paths(&self) -> Vec<&str> {
        self.skipped.iter().map(|s| s.path.as_str()).collect()
    }

    /// Logs every skipped entry at `warn`, tagged with the source name.
    pub fn log_skipped(&self, source: &str) {
        for s in &self.skipped {
            log::warn!("{}: skipped {}", source, s);
        }
    }
}

#[derive(Default)]
pub(crate) struct Lenient {
    pub(crate) skipped: Vec<Skipped>,
}

impl Lenient {
    pub(crate) fn skip(&mut self, path: String, expected: &'static str, found: &Value) {
        self.skipped.push(Skipped {
            path,
            expected,
            found: found.type_str(),
        });
    }

    pub(crate) fn finish<T>(self, value: T) -> Parsed<T> {
        Parsed {
            value,
            skipped: self.skipped,
        }
    }

    pub(crate) fn table<'v>(&mut self, parent: &'v Table, key: &str, path: &str) -> Option<&'v Table> {
        match parent.get(key)? {
            Value::Table(t) => Some(t),
            other => {
                self.skip(join(path, key), "table", other);
                None
            }
        }
    }

    pub(crate) fn array<'v>(&mut self, parent: &'v Table, key: &str, path: &str) -> Option<&'v [Value]> {
        match parent.get(key)? {
            Value::Array(a) => Some(a.as_slice()),
            other => {
                self.skip(join(path, key), "array", other);
                None
            }
        }
    }

    pub(crate) fn integer(&mut self, parent: &Table, key: &str, path: &str) -> Option<i64> {
        match parent.get(key)? {
            Value::Integer(i) => Some(*i),
            other => {
                self.skip(join(path, key), "integer", other);
                None
            }
        }
    }

    /// String elements of an array; anything else is recorded and dropped.
    pub(crate) fn strings<'v>(&mut self, items: &'v [Value], path: &str) -> Vec<&'v str> {
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            match item {
                Value::String(s) => out.push(s.as_str()),
                other => self.skip(format!("{path}[{i}]"), "string", other),
            }
        }
        out
    }
}

pub(crate) fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else if key.contains('.') || key.contains(' ') {
        format!("{path}.\"{key}\"")
    } else {
        format!("{path}.{key}")
    }
}
