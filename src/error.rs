/// Parsing errors.
///
/// Defines all error types that can occur while tokenizing and parsing an
/// expression: unexpected or leftover tokens, premature end of input, and
/// unresolvable function calls.
pub mod parse_error;
/// Evaluation errors.
///
/// Contains the failure kinds raised during evaluation and by context
/// implementations: unknown operators, unknown node shapes, failed root
/// reductions, and unsupported sink operations.
pub mod eval_error;

pub use eval_error::EvalError;
pub use parse_error::ParseError;
