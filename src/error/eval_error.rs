use crate::{lex::token::Token, vm::value::ValueKind};

#[derive(Debug, Clone, PartialEq)]
/// Represents all errors that can occur during evaluation and in context
/// implementations.
///
/// `UnknownOp` and `UnknownNodeType` signal malformed trees, which are
/// programming errors in the host: they abort the walk. The top-level
/// [`execute`](crate::vm::evaluator::Vm::execute) boundary converts them to
/// `ExecuteFailed`. Data-dependent failures (a missing identity, a coercion
/// that yields nothing, a declined function) never surface here; they
/// propagate as a non-ok reduction instead.
pub enum EvalError {
    /// The operator is not handled for the given operand types.
    UnknownOp {
        /// The operator token.
        op:    Token,
        /// Type tag of the left operand.
        left:  ValueKind,
        /// Type tag of the right operand.
        right: ValueKind,
    },
    /// The tree contains a shape the evaluator does not know.
    UnknownNodeType {
        /// Details about the offending node.
        detail: String,
    },
    /// The root reduction did not produce a value.
    ExecuteFailed,
    /// The sink does not support the requested operation.
    NotImplemented {
        /// The unsupported operation.
        operation: &'static str,
    },
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownOp { op, left, right } => {
                write!(f, "Unknown op '{op}' for operands {left} and {right}.")
            },
            Self::UnknownNodeType { detail } => write!(f, "Unknown node type: {detail}."),
            Self::ExecuteFailed => write!(f, "Could not execute expression."),
            Self::NotImplemented { operation } => write!(f, "Not implemented: {operation}."),
        }
    }
}

impl std::error::Error for EvalError {}
