/// The value module defines the dynamic values the engine computes with.
///
/// This module declares the tagged [`Value`](value::Value) union consumed
/// and produced by the evaluator, along with its type tags, string and JSON
/// renderings, nil/error predicates, and the numeric coercion rules binary
/// dispatch relies on.
///
/// # Responsibilities
/// - Defines the `Value` enum and all supported variants.
/// - Implements display, JSON encoding/decoding, and payload equality.
/// - Provides numeric coercion with explicit NaN/zero fallbacks.
pub mod value;
/// The context module couples the evaluator to row sources and sinks.
///
/// Read contexts resolve identifiers to values and expose the current row
/// with its timestamp; write contexts accept computed values under column
/// descriptors and support row deletion. Two reference implementations are
/// provided: an in-memory row store and a URL-form-value adapter.
///
/// # Responsibilities
/// - Declares the reader, writer, row-writer, and row-scanner traits.
/// - Implements `SimpleContext` (in-memory) and `FormContext` (form values).
pub mod context;
/// The parser module builds expression trees from tokens.
///
/// A precedence-climbing parser over the token vocabulary, producing the
/// [`Node`](crate::ast::Node) shapes the evaluator walks. Function calls are
/// resolved against the registry here, at parse time.
pub mod parser;
/// The evaluator module walks expression trees and computes results.
///
/// The evaluator reduces each node to a value, dispatching binary operators
/// over the operand type tags with explicit coercion, and writes the root
/// result to the sink. It is the core execution engine.
///
/// # Responsibilities
/// - Reduces nodes bottom-up with strict left-to-right argument order.
/// - Dispatches operators over (tag, tag) pairs with numeric fall-through.
/// - Distinguishes fatal tree errors from data-dependent failures.
pub mod evaluator;
