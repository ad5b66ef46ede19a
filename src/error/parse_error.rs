#[derive(Debug, Clone, PartialEq)]
/// Represents all errors that can occur while parsing an expression.
pub enum ParseError {
    /// The lexer hit input it does not recognize, or the parser found a
    /// token where none of the grammar rules allow one.
    UnexpectedToken {
        /// The offending slice of source text.
        found: String,
    },
    /// The expression ended where more input was required.
    UnexpectedEnd,
    /// A call names a function missing from the registry.
    UnknownFunction {
        /// The name of the function.
        name: String,
    },
    /// A call supplies an argument count the function does not accept.
    WrongArgumentCount {
        /// The name of the function.
        name:  String,
        /// The number of arguments found.
        found: usize,
    },
    /// Tokens remained after the root expression was parsed.
    TrailingInput {
        /// The first leftover token.
        found: String,
    },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedToken { found } => write!(f, "Unexpected token '{found}'."),
            Self::UnexpectedEnd => write!(f, "Unexpected end of expression."),
            Self::UnknownFunction { name } => write!(f, "Unknown function '{name}'."),
            Self::WrongArgumentCount { name, found } => {
                write!(f, "Function '{name}' does not accept {found} argument(s).")
            },
            Self::TrailingInput { found } => {
                write!(f, "Unexpected input after expression, starting at '{found}'.")
            },
        }
    }
}

impl std::error::Error for ParseError {}
