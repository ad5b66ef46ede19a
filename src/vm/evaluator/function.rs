use tracing::warn;

use crate::{
    ast::{FuncNode, Node},
    vm::{
        evaluator::core::{EvalResult, State, number_value},
        value::Value,
    },
};

/// Type alias for function handlers.
///
/// A handler receives the evaluation state and the reduced argument values.
/// Returning `None` means the function declines to produce a value; the
/// call then reduces non-ok.
pub type FuncHandler = fn(&State, &[Value]) -> Option<Value>;

/// Specifies the allowed number of arguments for a function.
///
/// - `Exact(n)` means the function must receive exactly `n` arguments.
/// - `OneOf(slice)` means the function accepts any arity listed in `slice`.
#[derive(Debug, Clone, Copy)]
pub enum Arity {
    /// Exactly this many arguments.
    Exact(usize),
    /// Any of these argument counts.
    OneOf(&'static [usize]),
}

impl Arity {
    /// Tests whether the given argument count satisfies this constraint.
    #[must_use]
    pub fn check(&self, n: usize) -> bool {
        match self {
            Self::Exact(m) => n == *m,
            Self::OneOf(arr) => arr.contains(&n),
        }
    }
}

/// A registered function: name, arity, and handler.
///
/// Function nodes carry a `&'static FuncDef` resolved at parse time, so
/// evaluation never looks names up. Two descriptors compare equal by name.
#[derive(Debug)]
pub struct FuncDef {
    /// The name the parser resolves.
    pub name:    &'static str,
    /// The accepted argument counts, enforced at parse time.
    pub arity:   Arity,
    /// The handler invoked with reduced arguments.
    pub handler: FuncHandler,
}

impl PartialEq for FuncDef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// Defines the built-in functions by generating the registry and name list.
///
/// Each entry provides a string name, an arity specification, and a handler.
/// The macro produces `FUNC_TABLE` (the static registry `lookup` searches)
/// and `FUNCTIONS` (the public list of registered names).
macro_rules! func_table {
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                handler: $handler:expr $(,)?
            }
        ),* $(,)?
    ) => {
        static FUNC_TABLE: &[FuncDef] = &[
            $(
                FuncDef { name: $name, arity: $arity, handler: $handler },
            )*
        ];
        /// The names of all registered functions.
        pub const FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

func_table! {
    "len"      => { arity: Arity::Exact(1), handler: len },
    "lower"    => { arity: Arity::Exact(1), handler: lower },
    "upper"    => { arity: Arity::Exact(1), handler: upper },
    "contains" => { arity: Arity::Exact(2), handler: contains },
    "now"      => { arity: Arity::Exact(0), handler: now },
}

/// Resolves a function name against the registry.
#[must_use]
pub fn lookup(name: &str) -> Option<&'static FuncDef> {
    FUNC_TABLE.iter().find(|f| f.name == name)
}

impl State<'_> {
    /// Reduces a function call.
    ///
    /// Each argument node is reduced first, in call order: literals become
    /// values; identities are looked up, where a missing key becomes `Nil`
    /// (a legal argument) and a key bound to `Nil` is replaced by the empty
    /// string; nested calls and operators reduce recursively, and any
    /// non-ok among them makes the whole call non-ok without invoking the
    /// handler. A handler that declines also reduces non-ok.
    ///
    /// # Errors
    /// Fatal tree errors from nested reductions.
    pub(crate) fn walk_func(&self, node: &FuncNode) -> EvalResult<Value> {
        let mut args = Vec::with_capacity(node.args.len());
        for arg in &node.args {
            let v = match arg {
                Node::String(s) => Value::from(s.text.as_str()),
                Node::Identity(id) => {
                    if id.is_boolean_identity() {
                        Value::Bool(id.bool_value())
                    } else {
                        match self.reader.get(&id.text) {
                            Some(Value::Nil) => Value::empty_string(),
                            Some(v) => v,
                            None => Value::Nil,
                        }
                    }
                },
                Node::Number(n) => match number_value(n) {
                    Some(v) => v,
                    None => {
                        warn!(text = %n.text, "number argument has no type flag");
                        Value::Nil
                    },
                },
                Node::Func(nested) => {
                    let Some(v) = self.walk_func(nested)? else {
                        return Ok(None);
                    };
                    v
                },
                Node::Unary { op, arg } => {
                    let Some(v) = self.walk_unary(op, arg)? else {
                        return Ok(None);
                    };
                    v
                },
                Node::Binary { op, left, right } => {
                    let Some(v) = self.walk_binary(op, left, right)? else {
                        return Ok(None);
                    };
                    v
                },
            };
            args.push(v);
        }
        Ok((node.func.handler)(self, &args))
    }
}

/// Length of a string, string list, slice, or map, as an integer.
#[allow(clippy::cast_possible_wrap)]
fn len(_state: &State, args: &[Value]) -> Option<Value> {
    let n = match args.first()? {
        Value::String(s) => s.len(),
        Value::Strings(v) => v.len(),
        Value::Slice(v) => v.len(),
        Value::MapInt(m) => m.len(),
        _ => return None,
    };
    Some(Value::Int(n as i64))
}

/// Case conversion over a string argument; declines on anything else.
fn casefold(args: &[Value], fold: fn(&str) -> String) -> Option<Value> {
    match args.first()? {
        Value::String(s) => Some(Value::from(fold(s))),
        _ => None,
    }
}

/// Lowercases a string argument.
fn lower(_state: &State, args: &[Value]) -> Option<Value> {
    casefold(args, str::to_lowercase)
}

/// Uppercases a string argument.
fn upper(_state: &State, args: &[Value]) -> Option<Value> {
    casefold(args, str::to_uppercase)
}

/// Substring test over two string arguments.
fn contains(_state: &State, args: &[Value]) -> Option<Value> {
    match (args.first()?, args.get(1)?) {
        (Value::String(haystack), Value::String(needle)) => {
            Some(Value::Bool(haystack.contains(needle.as_ref())))
        },
        _ => None,
    }
}

/// The timestamp of the row under evaluation.
fn now(state: &State, _args: &[Value]) -> Option<Value> {
    Some(Value::Time(state.reader().ts()))
}
