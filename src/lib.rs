//! # quell
//!
//! quell is an embeddable expression-evaluation engine for SQL-like query
//! dialects: a lightweight virtual machine that walks arithmetic, logical,
//! comparison, and function-call expressions, reads input bindings from a
//! pluggable context, and writes computed results to a pluggable sink. It is
//! a building block for larger query engines: WHERE-clause evaluation,
//! projection expressions, row transformation.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use crate::vm::{
    context::{ContextReader, ContextWriter, SimpleContext},
    evaluator::Vm,
    value::Value,
};

/// Defines the structure of parsed expressions.
///
/// This module declares the `Node` enum and related types that represent an
/// expression as a tree. The tree is built by the companion parser (or by a
/// host front end) and walked by the evaluator.
///
/// # Responsibilities
/// - Defines the closed set of node shapes the evaluator recognizes.
/// - Carries the parser's boolean-identity marking and resolved function
///   references.
pub mod ast;
/// Provides unified error types for parsing and evaluation.
///
/// This module defines all errors that can be raised while parsing an
/// expression or evaluating it against a context, including the fatal tree
/// errors the evaluator converts at its top-level boundary.
///
/// # Responsibilities
/// - Defines error enums for parse-time and evaluation-time failures.
/// - Distinguishes fatal tree errors from data-dependent non-ok outcomes.
pub mod error;
/// The token vocabulary and dialect descriptors.
///
/// This module declares the closed set of operator and keyword tokens, the
/// expression tokenizer, and the declarative statement/clause grammar an
/// external statement lexer consumes to recognize SQL-like skeletons.
///
/// # Responsibilities
/// - Defines tokens with match strings and multi-word properties.
/// - Derives clause keywords for dialect descriptors.
pub mod lex;
/// The virtual machine: values, contexts, parser, and evaluator.
///
/// This module ties together the dynamic value system, the read/write
/// context abstraction, the expression parser, and the tree-walking
/// evaluator to provide the complete engine.
///
/// # Responsibilities
/// - Defines the `Value` union and its coercion rules.
/// - Couples evaluation to row sources and sinks.
/// - Reduces expression trees to values.
pub mod vm;

/// Evaluates an expression against a read context, writing the result to
/// the sink under the empty column key.
///
/// This is the one-shot entry point; to evaluate the same expression over
/// many rows, build a [`Vm`] once and call
/// [`execute`](vm::evaluator::Vm::execute) per row.
///
/// # Errors
/// Returns an error if the expression does not parse, or if evaluation
/// fails.
///
/// # Examples
/// ```
/// use quell::eval_expression;
/// use quell::vm::context::{ContextReader, SimpleContext};
/// use quell::vm::value::Value;
///
/// let reader = SimpleContext::new();
/// let mut sink = SimpleContext::new();
///
/// eval_expression("5 + 3", &reader, &mut sink).unwrap();
/// assert_eq!(sink.get(""), Some(Value::Int(8)));
///
/// // An unbound identity fails the evaluation.
/// let res = eval_expression("missing + 1", &reader, &mut sink);
/// assert!(res.is_err());
/// ```
pub fn eval_expression(expr: &str,
                       reader: &dyn ContextReader,
                       writer: &mut dyn ContextWriter)
                       -> Result<(), Box<dyn std::error::Error>> {
    let vm = Vm::new(expr)?;
    vm.execute(writer, reader)?;
    Ok(())
}

/// Evaluates an expression against a read context and returns the value.
///
/// Uses a scratch in-memory sink and extracts the value written under the
/// empty column key.
///
/// # Errors
/// Returns an error if the expression does not parse, or if evaluation
/// fails.
///
/// # Examples
/// ```
/// use quell::eval_to_value;
/// use quell::vm::context::SimpleContext;
/// use quell::vm::value::Value;
///
/// let reader = SimpleContext::new();
/// assert_eq!(eval_to_value("2 * 21", &reader).unwrap(), Value::Int(42));
/// ```
pub fn eval_to_value(expr: &str,
                     reader: &dyn ContextReader)
                     -> Result<Value, Box<dyn std::error::Error>> {
    let vm = Vm::new(expr)?;
    let mut sink = SimpleContext::new();
    vm.execute(&mut sink, reader)?;
    Ok(sink.get("").unwrap_or(Value::Nil))
}
