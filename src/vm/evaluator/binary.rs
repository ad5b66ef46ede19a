use tracing::debug;

use crate::{
    ast::Node,
    error::EvalError,
    lex::token::Token,
    vm::{
        evaluator::core::{EvalResult, State},
        value::{Value, ValueKind},
    },
};

impl State<'_> {
    /// Reduces a binary operation.
    ///
    /// Both operands are reduced first, left to right, with no
    /// short-circuit; a non-ok operand makes the whole operation non-ok.
    /// Dispatch is a 2-D table over the operand type tags:
    ///
    /// - `Int × Int` runs the integer table.
    /// - Any `Int`/`Number` mix promotes to floats and runs the float table.
    /// - `Bool × Bool` supports only `&&`, `||`/`or`, `==`, and `!=`.
    /// - A numeric-coercible string on the left against a string, int, or
    ///   number coerces both sides to floats and falls through to the float
    ///   table; a non-coercible left string is an unknown op.
    /// - Every other combination is an unknown op.
    ///
    /// # Errors
    /// `EvalError::UnknownOp` for operator/operand combinations outside the
    /// table.
    pub(crate) fn walk_binary(&self, op: &Token, left: &Node, right: &Node) -> EvalResult<Value> {
        let Some(lhs) = self.walk(left)? else {
            return Ok(None);
        };
        let Some(rhs) = self.walk(right)? else {
            return Ok(None);
        };

        match (&lhs, &rhs) {
            (Value::Int(a), Value::Int(b)) => operate_ints(op, *a, *b),
            (Value::Int(_) | Value::Number(_), Value::Int(_) | Value::Number(_)) => {
                operate_numbers(op, lhs.number(), rhs.number()).map(Some)
            },
            (Value::Bool(a), Value::Bool(b)) => {
                let result = match op {
                    Token::LogicAnd => *a && *b,
                    Token::LogicOr | Token::Or => *a || *b,
                    Token::EqualEqual => a == b,
                    Token::BangEqual => a != b,
                    _ => {
                        return Err(unknown_op(op, &lhs, &rhs));
                    },
                };
                Ok(Some(Value::Bool(result)))
            },
            (Value::String(_), Value::String(_) | Value::Int(_) | Value::Number(_)) => {
                if lhs.can_coerce_numeric() {
                    operate_numbers(op, lhs.number(), rhs.number()).map(Some)
                } else {
                    Err(unknown_op(op, &lhs, &rhs))
                }
            },
            _ => Err(unknown_op(op, &lhs, &rhs)),
        }
    }
}

fn unknown_op(op: &Token, left: &Value, right: &Value) -> EvalError {
    EvalError::UnknownOp { op:    op.clone(),
                           left:  left.kind(),
                           right: right.kind(), }
}

/// The integer operator table.
///
/// Arithmetic wraps on overflow. Division and modulus by zero are
/// data-dependent failures, not errors: the reduction becomes non-ok.
/// Comparisons produce booleans; logical operators treat zero as false and
/// accept both or-tokens.
pub(crate) fn operate_ints(op: &Token, a: i64, b: i64) -> EvalResult<Value> {
    let v = match op {
        Token::Plus => Value::Int(a.wrapping_add(b)),
        Token::Star => Value::Int(a.wrapping_mul(b)),
        Token::Minus => Value::Int(a.wrapping_sub(b)),
        Token::Slash => {
            if b == 0 {
                debug!(a, "integer division by zero");
                return Ok(None);
            }
            Value::Int(a.wrapping_div(b))
        },
        Token::Percent => {
            if b == 0 {
                debug!(a, "integer modulus by zero");
                return Ok(None);
            }
            Value::Int(a.wrapping_rem(b))
        },
        Token::EqualEqual => Value::Bool(a == b),
        Token::BangEqual => Value::Bool(a != b),
        Token::Less => Value::Bool(a < b),
        Token::LessEqual => Value::Bool(a <= b),
        Token::Greater => Value::Bool(a > b),
        Token::GreaterEqual => Value::Bool(a >= b),
        Token::LogicOr | Token::Or => Value::Bool(a != 0 || b != 0),
        Token::LogicAnd => Value::Bool(a != 0 && b != 0),
        _ => {
            return Err(EvalError::UnknownOp { op:    op.clone(),
                                              left:  ValueKind::Int,
                                              right: ValueKind::Int, });
        },
    };
    Ok(Some(v))
}

/// The float operator table.
///
/// A NaN operand makes every arithmetic result NaN. Comparisons follow IEEE
/// semantics (so NaN compares unequal to everything, including itself).
/// Logical operators treat zero as false and accept both or-tokens.
pub(crate) fn operate_numbers(op: &Token, a: f64, b: f64) -> Result<Value, EvalError> {
    if a.is_nan() || b.is_nan() {
        if let Token::Plus | Token::Star | Token::Minus | Token::Slash | Token::Percent = op {
            return Ok(Value::nan());
        }
    }

    let v = match op {
        Token::Plus => Value::Number(a + b),
        Token::Star => Value::Number(a * b),
        Token::Minus => Value::Number(a - b),
        Token::Slash => Value::Number(a / b),
        Token::Percent => float_modulus(a, b),
        Token::EqualEqual => Value::Bool(a == b),
        Token::BangEqual => Value::Bool(a != b),
        Token::Less => Value::Bool(a < b),
        Token::LessEqual => Value::Bool(a <= b),
        Token::Greater => Value::Bool(a > b),
        Token::GreaterEqual => Value::Bool(a >= b),
        Token::LogicOr | Token::Or => Value::Bool(a != 0.0 || b != 0.0),
        Token::LogicAnd => Value::Bool(a != 0.0 && b != 0.0),
        _ => {
            return Err(EvalError::UnknownOp { op:    op.clone(),
                                              left:  ValueKind::Number,
                                              right: ValueKind::Number, });
        },
    };
    Ok(v)
}

/// Modulus over floats.
///
/// Both sides truncate toward zero to `i64`, saturating at the bounds. A
/// non-finite operand or a zero truncated divisor yields NaN.
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_precision_loss)]
fn float_modulus(a: f64, b: f64) -> Value {
    if !a.is_finite() || !b.is_finite() {
        return Value::nan();
    }
    let divisor = b as i64;
    if divisor == 0 {
        return Value::nan();
    }
    Value::Number(((a as i64) % divisor) as f64)
}
