use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::{error::EvalError, vm::value::Value};

/// A column descriptor for sink writes.
///
/// The evaluator writes the root result under [`NoColumn`], whose key is the
/// empty string; hosts projecting named columns implement or reuse the
/// string impls.
pub trait Column {
    /// The column key to write under.
    fn key(&self) -> &str;
}

/// The column descriptor with the empty key.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoColumn;

impl Column for NoColumn {
    fn key(&self) -> &str {
        ""
    }
}

impl Column for str {
    fn key(&self) -> &str {
        self
    }
}

impl Column for &str {
    fn key(&self) -> &str {
        self
    }
}

impl Column for String {
    fn key(&self) -> &str {
        self
    }
}

/// Read access to the row a message or command is evaluated against.
pub trait ContextReader {
    /// Looks up a key, returning `None` when it is not bound.
    fn get(&self, key: &str) -> Option<Value>;
    /// The full current row.
    fn row(&self) -> HashMap<String, Value>;
    /// The timestamp attributed to the row.
    fn ts(&self) -> DateTime<Utc>;
}

/// Write access to a result sink.
pub trait ContextWriter {
    /// Writes a value under a column descriptor.
    ///
    /// `reader` is the back-reference to the row the value was computed
    /// from; sinks that do not correlate writes ignore it.
    ///
    /// # Errors
    /// Fails when the sink rejects the write.
    fn put(&mut self,
           col: &dyn Column,
           reader: Option<&dyn ContextReader>,
           v: Value)
           -> Result<(), EvalError>;

    /// Deletes rows matching the given criteria.
    ///
    /// # Errors
    /// Fails when the sink does not support deletion.
    fn delete(&mut self, row: &HashMap<String, Value>) -> Result<(), EvalError>;
}

/// A sink that buffers a row and can promote it into an appended-row log.
pub trait RowWriter: ContextWriter {
    /// Promotes the buffered row into the committed log and clears the
    /// buffer.
    ///
    /// # Errors
    /// Fails when the sink cannot commit.
    fn commit(&mut self) -> Result<(), EvalError>;
}

/// A cursor over committed rows.
pub trait RowScanner {
    /// Yields the next committed row, or `None` when exhausted.
    fn next_row(&mut self) -> Option<HashMap<String, Value>>;
}

/// An in-memory read/write context.
///
/// The backing store is the current row (a map from column names to values)
/// plus an append-only log of previously committed rows. It implements every
/// context trait, so a single instance can serve as a row source, a result
/// sink, and a scan cursor.
///
/// # Example
/// ```
/// use quell::vm::context::{ContextReader, SimpleContext};
/// use quell::vm::value::Value;
///
/// let mut data = std::collections::HashMap::new();
/// data.insert("age".to_string(), Value::Int(33));
///
/// let ctx = SimpleContext::with_data(data);
/// assert_eq!(ctx.get("age"), Some(Value::Int(33)));
/// assert_eq!(ctx.get("name"), None);
/// ```
#[derive(Debug, Default)]
pub struct SimpleContext {
    /// The current row.
    pub data: HashMap<String, Value>,
    /// The committed-row log.
    pub rows: Vec<HashMap<String, Value>>,
    ts:       DateTime<Utc>,
    cursor:   usize,
}

impl SimpleContext {
    /// Creates an empty context timestamped now.
    #[must_use]
    pub fn new() -> Self {
        Self { data:   HashMap::new(),
               rows:   Vec::new(),
               ts:     Utc::now(),
               cursor: 0, }
    }

    /// Creates a context over an existing row, timestamped now.
    #[must_use]
    pub fn with_data(data: HashMap<String, Value>) -> Self {
        Self { data,
               rows: Vec::new(),
               ts: Utc::now(),
               cursor: 0, }
    }

    /// Creates a context over an existing row with an explicit timestamp.
    #[must_use]
    pub fn with_ts(data: HashMap<String, Value>, ts: DateTime<Utc>) -> Self {
        Self { data,
               rows: Vec::new(),
               ts,
               cursor: 0, }
    }

    /// Appends a row to the committed log directly.
    pub fn insert(&mut self, row: HashMap<String, Value>) {
        self.rows.push(row);
    }

    /// Removes every committed row matching the criteria.
    ///
    /// A row matches when each criterion key is present with an equal
    /// payload. Surviving rows keep their order. Always succeeds.
    pub fn delete_match(&mut self, criteria: &HashMap<String, Value>) {
        self.rows.retain(|row| !row_matches(row, criteria));
    }
}

impl ContextReader for SimpleContext {
    fn get(&self, key: &str) -> Option<Value> {
        self.data.get(key).cloned()
    }

    fn row(&self) -> HashMap<String, Value> {
        self.data.clone()
    }

    fn ts(&self) -> DateTime<Utc> {
        self.ts
    }
}

impl ContextWriter for SimpleContext {
    fn put(&mut self,
           col: &dyn Column,
           _reader: Option<&dyn ContextReader>,
           v: Value)
           -> Result<(), EvalError> {
        self.data.insert(col.key().to_string(), v);
        Ok(())
    }

    /// Removes the first committed row matching the criteria.
    ///
    /// Always succeeds, whether or not a row matched.
    fn delete(&mut self, row: &HashMap<String, Value>) -> Result<(), EvalError> {
        if let Some(i) = self.rows.iter().position(|r| row_matches(r, row)) {
            self.rows.remove(i);
        }
        Ok(())
    }
}

impl RowWriter for SimpleContext {
    fn commit(&mut self) -> Result<(), EvalError> {
        self.rows.push(std::mem::take(&mut self.data));
        Ok(())
    }
}

impl RowScanner for SimpleContext {
    fn next_row(&mut self) -> Option<HashMap<String, Value>> {
        if self.cursor >= self.rows.len() {
            return None;
        }
        self.data = self.rows[self.cursor].clone();
        self.cursor += 1;
        Some(self.data.clone())
    }
}

/// A context over URL form values.
///
/// The backing store maps each key to a list of strings, with URL query
/// semantics: reading yields a `String` for a one-element list and a
/// `Strings` otherwise. Deletion is not supported.
///
/// # Example
/// ```
/// use quell::vm::context::{ContextReader, FormContext};
/// use quell::vm::value::Value;
///
/// let ctx = FormContext::from_query("x=a&x=b&limit=10");
/// assert_eq!(ctx.get("x"),
///            Some(Value::from(vec!["a".to_string(), "b".to_string()])));
/// assert_eq!(ctx.get("limit"), Some(Value::from("10")));
/// ```
#[derive(Debug, Default)]
pub struct FormContext {
    /// The form values.
    pub data: HashMap<String, Vec<String>>,
    ts:       DateTime<Utc>,
}

impl FormContext {
    /// Creates a context over existing form values, timestamped now.
    #[must_use]
    pub fn new(data: HashMap<String, Vec<String>>) -> Self {
        Self { data,
               ts: Utc::now(), }
    }

    /// Creates a context over existing form values with an explicit
    /// timestamp.
    #[must_use]
    pub const fn with_ts(data: HashMap<String, Vec<String>>, ts: DateTime<Utc>) -> Self {
        Self { data, ts }
    }

    /// Parses a query string of the form `x=a&x=b`.
    ///
    /// A leading `?` is tolerated; pairs without `=` bind the empty string.
    /// No percent decoding is performed.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let mut data: HashMap<String, Vec<String>> = HashMap::new();
        for pair in query.trim_start_matches('?').split('&') {
            if pair.is_empty() {
                continue;
            }
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            data.entry(key.to_string()).or_default().push(value.to_string());
        }
        Self::new(data)
    }
}

impl ContextReader for FormContext {
    fn get(&self, key: &str) -> Option<Value> {
        let vals = self.data.get(key)?;
        if vals.len() == 1 {
            Some(Value::from(vals[0].as_str()))
        } else {
            Some(Value::from(vals.clone()))
        }
    }

    fn row(&self) -> HashMap<String, Value> {
        let mut row = HashMap::with_capacity(self.data.len());
        for (key, vals) in &self.data {
            if vals.len() == 1 {
                row.insert(key.clone(), Value::from(vals[0].as_str()));
            } else if vals.len() > 1 {
                row.insert(key.clone(), Value::from(vals.clone()));
            }
        }
        row
    }

    fn ts(&self) -> DateTime<Utc> {
        self.ts
    }
}

impl ContextWriter for FormContext {
    /// Stores `String` and `Number` values as decimal text, replacing the
    /// slot. Other variants are ignored.
    fn put(&mut self,
           col: &dyn Column,
           _reader: Option<&dyn ContextReader>,
           v: Value)
           -> Result<(), EvalError> {
        match &v {
            Value::String(_) | Value::Number(_) => {
                self.data.insert(col.key().to_string(), vec![v.to_string()]);
            },
            other => debug!(kind = %other.kind(), "ignoring form write"),
        }
        Ok(())
    }

    fn delete(&mut self, _row: &HashMap<String, Value>) -> Result<(), EvalError> {
        Err(EvalError::NotImplemented { operation: "delete on form values" })
    }
}

/// Tests a candidate row against deletion criteria.
///
/// Every criterion key must be present in the row with an equal payload.
fn row_matches(row: &HashMap<String, Value>, criteria: &HashMap<String, Value>) -> bool {
    criteria.iter()
            .all(|(key, expected)| row.get(key).is_some_and(|val| val == expected))
}
