/// The token module defines the closed token vocabulary.
///
/// Every operator, keyword, and literal shape the engine understands is a
/// variant of the [`Token`](token::Token) enum. Tokens carry their match
/// string and multi-word property, which the dialect descriptor derives its
/// clause keywords from.
///
/// # Responsibilities
/// - Declares the closed set of operator and keyword tokens.
/// - Tokenizes raw expression text into tokens.
/// - Exposes per-token metadata (match string, multi-word flag).
pub mod token;

/// The dialect module describes SQL-like statement skeletons.
///
/// A dialect is a declarative grammar: statements keyed by a keyword token,
/// each carrying an ordered list of clauses with optionality, nesting, and
/// an optional sub-lexer for the clause body. An external statement lexer
/// consumes the descriptor; the expression evaluator does not.
///
/// # Responsibilities
/// - Declares `Dialect`, `Statement`, and `Clause`.
/// - Derives clause keywords and multi-word flags from token metadata.
/// - Ships a reference SQL statement family.
pub mod dialect;
