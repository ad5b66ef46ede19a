/// Core walk: the `Vm`, its per-evaluation state, and node dispatch.
pub mod core;
/// Binary operator dispatch over (tag, tag) pairs, with the integer and
/// float operator tables.
pub mod binary;
/// Unary operators: logical not and arithmetic negation.
pub mod unary;
/// The function registry, calling convention, and built-in functions.
pub mod function;

pub use core::{EvalResult, State, Vm};
