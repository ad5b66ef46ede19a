use tracing::warn;

use crate::{
    ast::Node,
    error::EvalError,
    lex::token::Token,
    vm::{
        evaluator::core::{EvalResult, State},
        value::Value,
    },
};

impl State<'_> {
    /// Reduces a unary operation.
    ///
    /// `!` flips a boolean and is a fatal tree error on anything else.
    /// Unary `-` negates any numeric-coercible operand into a float and is
    /// non-ok otherwise. An operator token with no unary meaning is logged
    /// and non-ok.
    ///
    /// # Errors
    /// `EvalError::UnknownNodeType` when `!` is applied to a non-boolean.
    pub(crate) fn walk_unary(&self, op: &Token, arg: &Node) -> EvalResult<Value> {
        let Some(val) = self.walk(arg)? else {
            return Ok(None);
        };

        match op {
            Token::Bang => match val {
                Value::Bool(b) => Ok(Some(Value::Bool(!b))),
                other => {
                    Err(EvalError::UnknownNodeType { detail: format!("cannot negate {}",
                                                                     other.kind()), })
                },
            },
            Token::Minus => {
                if val.can_coerce_numeric() {
                    Ok(Some(Value::Number(-val.number())))
                } else {
                    Ok(None)
                }
            },
            other => {
                warn!(op = %other, "unary operator not implemented");
                Ok(None)
            },
        }
    }
}
