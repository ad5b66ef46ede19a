use tracing::warn;

use crate::{
    ast::{Node, NumberNode},
    error::EvalError,
    vm::{
        context::{ContextReader, ContextWriter, NoColumn},
        parser::parse_expression,
        value::Value,
    },
};

/// Result type used by the evaluator walk.
///
/// The outer `Result` carries fatal tree errors (`UnknownOp`,
/// `UnknownNodeType`); the inner `Option` is the ok flag of a reduction:
/// `None` means a data-dependent failure that propagates without raising.
pub type EvalResult<T> = Result<Option<T>, EvalError>;

/// A virtual machine for a single parsed expression.
///
/// The tree is walked once per [`Vm::execute`] call; the machine itself is
/// stateless between evaluations and may be reused across rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Vm {
    root: Node,
}

impl Vm {
    /// Parses an expression into a ready-to-run machine.
    ///
    /// # Errors
    /// Returns a [`ParseError`](crate::error::ParseError) when the
    /// expression does not lex or parse.
    ///
    /// # Example
    /// ```
    /// use quell::vm::evaluator::Vm;
    ///
    /// assert!(Vm::new("5 + 3").is_ok());
    /// assert!(Vm::new("5 +").is_err());
    /// ```
    pub fn new(expr: &str) -> Result<Self, crate::error::ParseError> {
        Ok(Self { root: parse_expression(expr)? })
    }

    /// Wraps a host-constructed tree.
    #[must_use]
    pub const fn from_node(root: Node) -> Self {
        Self { root }
    }

    /// The root node of the expression tree.
    #[must_use]
    pub const fn root(&self) -> &Node {
        &self.root
    }

    /// Applies the expression to the given contexts.
    ///
    /// Reduces the tree against `reader` and, on success, writes the value
    /// to `writer` under the empty column key with a back-reference to the
    /// reader. On any failure nothing is written and `ExecuteFailed` is
    /// returned; fatal tree errors are logged before being converted.
    ///
    /// # Errors
    /// `EvalError::ExecuteFailed` when the root reduction does not produce
    /// a value, or the sink's own error when the final write fails.
    ///
    /// # Example
    /// ```
    /// use quell::vm::context::{ContextReader, SimpleContext};
    /// use quell::vm::evaluator::Vm;
    /// use quell::vm::value::Value;
    ///
    /// let vm = Vm::new("5 + 3").unwrap();
    /// let reader = SimpleContext::new();
    /// let mut sink = SimpleContext::new();
    ///
    /// vm.execute(&mut sink, &reader).unwrap();
    /// assert_eq!(sink.get(""), Some(Value::Int(8)));
    /// ```
    pub fn execute(&self,
                   writer: &mut dyn ContextWriter,
                   reader: &dyn ContextReader)
                   -> Result<(), EvalError> {
        let state = State { reader };
        match state.walk(&self.root) {
            Ok(Some(v)) => {
                writer.put(&NoColumn, Some(reader), v)?;
                Ok(())
            },
            Ok(None) => Err(EvalError::ExecuteFailed),
            Err(e) => {
                warn!(error = %e, "evaluation aborted");
                Err(EvalError::ExecuteFailed)
            },
        }
    }
}

/// Per-evaluation state handed to the walk and to function handlers.
///
/// Carries the read context the expression is being evaluated against.
pub struct State<'a> {
    pub(crate) reader: &'a dyn ContextReader,
}

impl State<'_> {
    /// The read context of the current evaluation.
    #[must_use]
    pub const fn reader(&self) -> &dyn ContextReader {
        self.reader
    }

    /// Reduces a node to a value.
    ///
    /// Dispatches on the node shape. Literals reduce directly; identities
    /// resolve against the read context; composites reduce their arguments
    /// strictly left to right, and any non-ok child makes the parent non-ok
    /// without attempting its operation.
    ///
    /// # Errors
    /// Fatal tree errors only; see [`EvalResult`].
    pub fn walk(&self, node: &Node) -> EvalResult<Value> {
        match node {
            Node::Number(n) => match number_value(n) {
                Some(v) => Ok(Some(v)),
                None => {
                    warn!(text = %n.text, "number node has no type flag");
                    Ok(None)
                },
            },
            Node::String(s) => Ok(Some(Value::from(s.text.as_str()))),
            Node::Identity(id) => Ok(self.walk_identity(id)),
            Node::Unary { op, arg } => self.walk_unary(op, arg),
            Node::Binary { op, left, right } => self.walk_binary(op, left, right),
            Node::Func(f) => self.walk_func(f),
        }
    }

    /// Resolves an identity node.
    ///
    /// A boolean identity produces its marked payload; anything else is a
    /// context lookup whose found flag becomes the ok flag.
    fn walk_identity(&self, id: &crate::ast::IdentityNode) -> Option<Value> {
        if id.is_boolean_identity() {
            return Some(Value::Bool(id.bool_value()));
        }
        self.reader.get(&id.text)
    }
}

/// Converts a number node to its value per the node's flags.
///
/// `None` when neither flag is set; callers decide whether that is a warning
/// or a nil argument.
pub(crate) fn number_value(node: &NumberNode) -> Option<Value> {
    if node.is_int {
        Some(Value::Int(node.int_val))
    } else if node.is_float {
        Some(Value::Number(node.float_val))
    } else {
        None
    }
}
