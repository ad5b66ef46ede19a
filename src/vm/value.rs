use std::{
    collections::{HashMap, HashSet},
    rc::Rc,
};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::Error as _;
use serde_json::Value as JsonValue;

/// The type tag of a [`Value`].
///
/// Tags drive binary operator dispatch and appear in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// The canonical nil.
    Nil,
    /// 64-bit float.
    Number,
    /// 64-bit signed integer.
    Int,
    /// Boolean.
    Bool,
    /// Instant in time.
    Time,
    /// UTF-8 string.
    String,
    /// Ordered list of strings.
    Strings,
    /// Mapping from string to integer.
    MapInt,
    /// Ordered list of values.
    Slice,
    /// Opaque host object.
    Struct,
    /// Evaluation error carrying a message.
    Error,
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Nil => "nil",
            Self::Number => "number",
            Self::Int => "int",
            Self::Bool => "bool",
            Self::Time => "time",
            Self::String => "string",
            Self::Strings => "strings",
            Self::MapInt => "map[string]int",
            Self::Slice => "slice",
            Self::Struct => "struct",
            Self::Error => "error",
        };
        write!(f, "{name}")
    }
}

/// An opaque host object carried by [`Value::Struct`].
///
/// Hosts implement this for domain objects they want to pass through the
/// engine untouched. Two struct values compare equal only when they are the
/// same allocation.
pub trait HostObject: std::fmt::Debug {
    /// Renders the object for human display.
    fn render(&self) -> String;
    /// Encodes the object as JSON.
    fn as_json(&self) -> JsonValue;
}

/// Represents a runtime value in the engine.
///
/// This enum models every type that can appear in row bindings, operator
/// evaluation, function arguments, and sink writes. Values are cheap to
/// clone: scalars copy and container payloads are reference-counted.
///
/// Values are immutable except the documented append mutators on `Strings`
/// and `Slice`, which are copy-on-write so no other holder observes the
/// mutation.
#[derive(Debug, Clone)]
pub enum Value {
    /// The canonical nil; produced for missing data.
    Nil,
    /// A 64-bit floating-point number.
    Number(f64),
    /// A 64-bit signed integer.
    Int(i64),
    /// A boolean, produced by comparisons and logical operators.
    Bool(bool),
    /// An instant in time; coerces to its Unix seconds.
    Time(DateTime<Utc>),
    /// A UTF-8 string.
    String(Rc<str>),
    /// An ordered list of strings, as produced by form-value rows.
    Strings(Rc<Vec<String>>),
    /// A mapping from string keys to integers.
    MapInt(Rc<HashMap<String, i64>>),
    /// An ordered list of values.
    Slice(Rc<Vec<Value>>),
    /// An opaque host object.
    Struct(Rc<dyn HostObject>),
    /// An error carrying a message.
    Error(Rc<str>),
}

impl Value {
    /// Returns the type tag of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Nil => ValueKind::Nil,
            Self::Number(_) => ValueKind::Number,
            Self::Int(_) => ValueKind::Int,
            Self::Bool(_) => ValueKind::Bool,
            Self::Time(_) => ValueKind::Time,
            Self::String(_) => ValueKind::String,
            Self::Strings(_) => ValueKind::Strings,
            Self::MapInt(_) => ValueKind::MapInt,
            Self::Slice(_) => ValueKind::Slice,
            Self::Struct(_) => ValueKind::Struct,
            Self::Error(_) => ValueKind::Error,
        }
    }

    /// The NaN number singleton.
    #[must_use]
    pub const fn nan() -> Self {
        Self::Number(f64::NAN)
    }

    /// The empty string value.
    #[must_use]
    pub fn empty_string() -> Self {
        Self::String(Rc::from(""))
    }

    /// Creates an error value carrying `msg`.
    #[must_use]
    pub fn error(msg: &str) -> Self {
        Self::Error(Rc::from(msg))
    }

    /// Wraps an opaque host object.
    #[must_use]
    pub fn struct_object(obj: Rc<dyn HostObject>) -> Self {
        Self::Struct(obj)
    }

    /// Reports whether this value is nil or empty.
    ///
    /// `Nil` is the canonical nil; strings, string lists, maps, and slices
    /// additionally report nil when their payload is empty, and a time when
    /// it is the zero instant.
    ///
    /// # Example
    /// ```
    /// use quell::vm::value::Value;
    ///
    /// assert!(Value::Nil.is_nil());
    /// assert!(Value::from("").is_nil());
    /// assert!(!Value::from("x").is_nil());
    /// assert!(!Value::Int(0).is_nil());
    /// ```
    #[must_use]
    pub fn is_nil(&self) -> bool {
        match self {
            Self::Nil => true,
            Self::Time(t) => *t == DateTime::<Utc>::default(),
            Self::String(s) => s.is_empty(),
            Self::Strings(v) => v.is_empty(),
            Self::MapInt(m) => m.is_empty(),
            Self::Slice(v) => v.is_empty(),
            _ => false,
        }
    }

    /// Reports whether this value is the error variant.
    #[must_use]
    pub const fn is_err(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Reports whether this value can be interpreted as a finite float.
    ///
    /// `Int`, `Number`, and `Time` always can. A `String` can when it parses
    /// as a finite float, a `Strings` when it holds exactly one element that
    /// parses. Everything else cannot.
    ///
    /// # Example
    /// ```
    /// use quell::vm::value::Value;
    ///
    /// assert!(Value::from("42").can_coerce_numeric());
    /// assert!(!Value::from("forty-two").can_coerce_numeric());
    /// assert!(Value::Int(7).can_coerce_numeric());
    /// assert!(!Value::Bool(true).can_coerce_numeric());
    /// ```
    #[must_use]
    pub fn can_coerce_numeric(&self) -> bool {
        match self {
            Self::Number(_) | Self::Int(_) | Self::Time(_) => true,
            Self::String(s) => s.parse::<f64>().is_ok_and(f64::is_finite),
            Self::Strings(v) => {
                v.len() == 1 && v[0].parse::<f64>().is_ok_and(f64::is_finite)
            },
            _ => false,
        }
    }

    /// Coerces this value to a float, with NaN as the failure marker.
    ///
    /// `Time` coerces to its Unix seconds. Strings parse with a NaN
    /// fallback; a string list coerces only through a single parseable
    /// element. All other variants yield NaN.
    ///
    /// # Example
    /// ```
    /// use quell::vm::value::Value;
    ///
    /// assert_eq!(Value::from("1.5").number(), 1.5);
    /// assert_eq!(Value::Int(3).number(), 3.0);
    /// assert!(Value::from("abc").number().is_nan());
    /// ```
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn number(&self) -> f64 {
        match self {
            Self::Number(n) => *n,
            Self::Int(i) => *i as f64,
            Self::Time(t) => t.timestamp() as f64,
            Self::String(s) => s.parse().unwrap_or(f64::NAN),
            Self::Strings(v) if v.len() == 1 => v[0].parse().unwrap_or(f64::NAN),
            _ => f64::NAN,
        }
    }

    /// Coerces this value to an integer, with zero as the failure marker.
    ///
    /// `Number` and `Time` truncate; strings parse with a zero fallback.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn int(&self) -> i64 {
        match self {
            Self::Int(i) => *i,
            Self::Number(n) => *n as i64,
            Self::Time(t) => t.timestamp(),
            Self::String(s) => s.parse().unwrap_or(0),
            Self::Strings(v) if v.len() == 1 => v[0].parse().unwrap_or(0),
            _ => 0,
        }
    }

    /// The set of distinct payloads of a `Strings` value.
    ///
    /// Any other variant yields the empty set.
    #[must_use]
    pub fn set(&self) -> HashSet<String> {
        match self {
            Self::Strings(v) => v.iter().cloned().collect(),
            _ => HashSet::new(),
        }
    }

    /// Appends a string to a `Strings` value.
    ///
    /// Copy-on-write: if the payload is shared, it is cloned first so no
    /// other holder observes the change. Returns `false` on any other
    /// variant, which is left untouched.
    pub fn push_str(&mut self, s: &str) -> bool {
        match self {
            Self::Strings(v) => {
                Rc::make_mut(v).push(s.to_string());
                true
            },
            _ => false,
        }
    }

    /// Appends an element to a `Slice` value.
    ///
    /// Copy-on-write, like [`Value::push_str`]. Returns `false` on any
    /// other variant.
    pub fn push(&mut self, item: Self) -> bool {
        match self {
            Self::Slice(v) => {
                Rc::make_mut(v).push(item);
                true
            },
            _ => false,
        }
    }

    /// Encodes this value as a JSON tree.
    ///
    /// `Nil` encodes as JSON null, `Int` as a decimal number through float
    /// widening, `Time` as an RFC3339 string, `Error` as its message
    /// string. A NaN or infinite number encodes as null.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_json(&self) -> JsonValue {
        match self {
            Self::Nil => JsonValue::Null,
            Self::Number(n) => {
                serde_json::Number::from_f64(*n).map_or(JsonValue::Null, JsonValue::Number)
            },
            Self::Int(i) => {
                serde_json::Number::from_f64(*i as f64).map_or(JsonValue::Null, JsonValue::Number)
            },
            Self::Bool(b) => JsonValue::Bool(*b),
            Self::Time(t) => {
                JsonValue::String(t.to_rfc3339_opts(SecondsFormat::Secs, true))
            },
            Self::String(s) => JsonValue::String(s.to_string()),
            Self::Strings(v) => {
                JsonValue::Array(v.iter().cloned().map(JsonValue::String).collect())
            },
            Self::MapInt(m) => {
                JsonValue::Object(m.iter()
                                   .map(|(k, v)| (k.clone(), JsonValue::from(*v)))
                                   .collect())
            },
            Self::Slice(v) => JsonValue::Array(v.iter().map(Self::as_json).collect()),
            Self::Struct(obj) => obj.as_json(),
            Self::Error(msg) => JsonValue::String(msg.to_string()),
        }
    }

    /// The wire encoding of this value.
    ///
    /// Identical to [`Value::as_json`] serialized, except `Nil`, which
    /// encodes as the empty byte sequence; upstream marshalers treat that as
    /// JSON null or an omitted field.
    ///
    /// # Example
    /// ```
    /// use quell::vm::value::Value;
    ///
    /// assert_eq!(Value::from("hi").json(), b"\"hi\"");
    /// assert!(Value::Nil.json().is_empty());
    /// ```
    #[must_use]
    pub fn json(&self) -> Vec<u8> {
        if matches!(self, Self::Nil) {
            return Vec::new();
        }
        serde_json::to_vec(&self.as_json()).unwrap_or_default()
    }

    /// Decodes a value from its wire encoding.
    ///
    /// The inverse of [`Value::json`] up to numeric widening: `Int` and
    /// `Number` both round-trip through `Number`. Empty input and JSON null
    /// decode as `Nil`; arrays of strings decode as `Strings`, other arrays
    /// as `Slice`; objects decode as `MapInt` and fail when any member is
    /// not an integer.
    ///
    /// # Errors
    /// Returns an error for malformed JSON or an object with non-integer
    /// members.
    ///
    /// # Example
    /// ```
    /// use quell::vm::value::Value;
    ///
    /// let v = Value::from(2.5);
    /// assert_eq!(Value::from_json(&v.json()).unwrap(), v);
    /// assert_eq!(Value::from_json(b"").unwrap(), Value::Nil);
    /// ```
    pub fn from_json(data: &[u8]) -> Result<Self, serde_json::Error> {
        if data.is_empty() {
            return Ok(Self::Nil);
        }
        let tree: JsonValue = serde_json::from_slice(data)?;
        Self::from_json_value(tree)
    }

    fn from_json_value(tree: JsonValue) -> Result<Self, serde_json::Error> {
        match tree {
            JsonValue::Null => Ok(Self::Nil),
            JsonValue::Bool(b) => Ok(Self::Bool(b)),
            JsonValue::Number(n) => n.as_i64().map_or_else(
                || Ok(Self::Number(n.as_f64().unwrap_or(f64::NAN))),
                |i| Ok(Self::Int(i)),
            ),
            JsonValue::String(s) => Ok(Self::from(s)),
            JsonValue::Array(items) => {
                if items.iter().all(JsonValue::is_string) {
                    let strings = items.into_iter()
                                       .filter_map(|item| match item {
                                           JsonValue::String(s) => Some(s),
                                           _ => None,
                                       })
                                       .collect::<Vec<_>>();
                    Ok(Self::from(strings))
                } else {
                    let values = items.into_iter()
                                      .map(Self::from_json_value)
                                      .collect::<Result<Vec<_>, _>>()?;
                    Ok(Self::from(values))
                }
            },
            JsonValue::Object(members) => {
                let mut map = HashMap::with_capacity(members.len());
                for (k, v) in members {
                    let Some(i) = v.as_i64() else {
                        return Err(serde_json::Error::custom(format!(
                            "member '{k}' is not an integer"
                        )));
                    };
                    map.insert(k, i);
                }
                Ok(Self::from(map))
            },
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Time(a), Self::Time(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Strings(a), Self::Strings(b)) => a == b,
            (Self::MapInt(a), Self::MapInt(b)) => a == b,
            (Self::Slice(a), Self::Slice(b)) => a == b,
            (Self::Struct(a), Self::Struct(b)) => Rc::ptr_eq(a, b),
            (Self::Error(a), Self::Error(b)) => a == b,
            _ => false,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nil | Self::Error(_) => Ok(()),
            Self::Number(n) => write!(f, "{n}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Time(t) => write!(f, "{}", t.to_rfc3339_opts(SecondsFormat::Secs, true)),
            Self::String(s) => write!(f, "{s}"),
            Self::Strings(v) => write!(f, "{}", v.join(",")),
            Self::MapInt(_) | Self::Slice(_) => {
                let text = serde_json::to_string(&self.as_json()).unwrap_or_default();
                write!(f, "{text}")
            },
            Self::Struct(obj) => write!(f, "{}", obj.render()),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(Rc::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(Rc::from(v.as_str()))
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Self::Strings(Rc::new(v))
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::Slice(Rc::new(v))
    }
}

impl From<HashMap<String, i64>> for Value {
    fn from(v: HashMap<String, i64>) -> Self {
        Self::MapInt(Rc::new(v))
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Time(v)
    }
}
