use logos::Logos;

/// Represents a lexical token in an expression or statement.
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// This enum defines all recognized tokens of the engine: literals,
/// operators, punctuation, and the statement keywords referenced by dialect
/// descriptors.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    /// Floating-point literal tokens, such as `3.14`, `.5` or `2.1e-10`.
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?", parse_real)]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", parse_real)]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", parse_real)]
    Real(f64),
    /// Integer literal tokens, such as `42`.
    #[regex(r"[0-9]+", parse_integer)]
    Integer(i64),
    /// Quoted string literals, in single or double quotes.
    #[regex(r#""[^"]*""#, unquote)]
    #[regex(r"'[^']*'", unquote)]
    QuotedString(String),
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=` or `<>`
    #[token("!=")]
    #[token("<>")]
    BangEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>`
    #[token(">")]
    Greater,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `||`
    #[token("||")]
    LogicOr,
    /// `or`
    #[token("or", ignore(ascii_case))]
    Or,
    /// `&&` or `and`
    #[token("&&")]
    #[token("and", ignore(ascii_case))]
    LogicAnd,
    /// `!`
    #[token("!")]
    Bang,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `,`
    #[token(",")]
    Comma,
    /// `SELECT`
    #[token("select", ignore(ascii_case))]
    Select,
    /// `FROM`
    #[token("from", ignore(ascii_case))]
    From,
    /// `WHERE`
    #[token("where", ignore(ascii_case))]
    Where,
    /// `GROUP BY`
    #[regex(r"group[ \t]+by", ignore(ascii_case))]
    GroupBy,
    /// `HAVING`
    #[token("having", ignore(ascii_case))]
    Having,
    /// `ORDER BY`
    #[regex(r"order[ \t]+by", ignore(ascii_case))]
    OrderBy,
    /// `LIMIT`
    #[token("limit", ignore(ascii_case))]
    Limit,
    /// `INSERT`
    #[token("insert", ignore(ascii_case))]
    Insert,
    /// `INTO`
    #[token("into", ignore(ascii_case))]
    Into,
    /// `VALUES`
    #[token("values", ignore(ascii_case))]
    Values,
    /// `UPDATE`
    #[token("update", ignore(ascii_case))]
    Update,
    /// `SET`
    #[token("set", ignore(ascii_case))]
    Set,
    /// `DELETE`
    #[token("delete", ignore(ascii_case))]
    Delete,
    /// Identifier tokens; column or function names such as `age` or `len`.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),
}

impl Token {
    /// Returns the display form this token matches in source text.
    ///
    /// Keywords report their canonical uppercase form (`"GROUP BY"`),
    /// operators their symbol (`"+"`). Payload-carrying tokens (literals and
    /// identifiers) have no fixed match string and report `""`.
    ///
    /// # Example
    /// ```
    /// use quell::lex::token::Token;
    ///
    /// assert_eq!(Token::GroupBy.match_string(), "GROUP BY");
    /// assert_eq!(Token::Plus.match_string(), "+");
    /// assert_eq!(Token::Integer(7).match_string(), "");
    /// ```
    #[must_use]
    pub const fn match_string(&self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::EqualEqual => "==",
            Self::BangEqual => "!=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::LogicOr => "||",
            Self::Or => "OR",
            Self::LogicAnd => "&&",
            Self::Bang => "!",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::Comma => ",",
            Self::Select => "SELECT",
            Self::From => "FROM",
            Self::Where => "WHERE",
            Self::GroupBy => "GROUP BY",
            Self::Having => "HAVING",
            Self::OrderBy => "ORDER BY",
            Self::Limit => "LIMIT",
            Self::Insert => "INSERT",
            Self::Into => "INTO",
            Self::Values => "VALUES",
            Self::Update => "UPDATE",
            Self::Set => "SET",
            Self::Delete => "DELETE",
            Self::Real(_) | Self::Integer(_) | Self::QuotedString(_) | Self::Identifier(_) => "",
        }
    }

    /// Returns `true` if this token spans more than one word in source text.
    #[must_use]
    pub const fn multi_word(&self) -> bool {
        matches!(self, Self::GroupBy | Self::OrderBy)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Real(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::QuotedString(s) | Self::Identifier(s) => write!(f, "{s}"),
            _ => write!(f, "{}", self.match_string()),
        }
    }
}

/// Tokenizes raw text, dropping unrecognizable slices.
///
/// This is the lossy entry point used as a clause sub-lexer by dialect
/// descriptors. The expression parser runs its own lexing loop instead so
/// that unrecognized input surfaces as a parse error.
///
/// # Example
/// ```
/// use quell::lex::token::{Token, tokenize};
///
/// let tokens = tokenize("age >= 21");
/// assert_eq!(tokens,
///            vec![Token::Identifier("age".to_string()),
///                 Token::GreaterEqual,
///                 Token::Integer(21)]);
/// ```
#[must_use]
pub fn tokenize(input: &str) -> Vec<Token> {
    Token::lexer(input).filter_map(Result::ok).collect()
}

fn parse_real(lex: &logos::Lexer<Token>) -> Option<f64> {
    lex.slice().parse().ok()
}

fn parse_integer(lex: &logos::Lexer<Token>) -> Option<i64> {
    lex.slice().parse().ok()
}

fn unquote(lex: &logos::Lexer<Token>) -> String {
    let slice = lex.slice();
    slice[1..slice.len() - 1].to_string()
}
