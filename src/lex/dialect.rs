use crate::lex::token::{Token, tokenize};

/// A sub-lexer for the body of a clause.
///
/// Dialect consumers hand the text between two clause keywords to this
/// function to obtain the clause's token stream.
pub type ClauseLexer = fn(&str) -> Vec<Token>;

/// A declarative description of an SQL-like statement family.
///
/// A dialect names the family and lists the statements an external statement
/// lexer should recognize. The descriptor is purely declarative: it carries
/// no lexing state of its own.
#[derive(Debug, Clone)]
pub struct Dialect {
    /// Name of the statement family, e.g. `"sql"`.
    pub name:       &'static str,
    /// The statements of the family, in match order.
    pub statements: Vec<Statement>,
}

/// A single statement skeleton, keyed by its leading keyword token.
#[derive(Debug, Clone)]
pub struct Statement {
    /// The keyword token that introduces the statement, e.g. `SELECT`.
    pub keyword: Token,
    /// The ordered clauses of the statement.
    pub clauses: Vec<Clause>,
}

/// One clause of a statement skeleton.
///
/// The `keyword` and `multi_word` fields are derived from the clause token
/// during [`Dialect::init`] and are read through the accessors; the remaining
/// fields are supplied by the dialect author.
#[derive(Debug, Clone)]
pub struct Clause {
    keyword:    String,
    multi_word: bool,
    /// Whether the clause may be absent from a statement.
    pub optional: bool,
    /// The keyword token that introduces the clause.
    pub token:    Token,
    /// Optional sub-lexer for the clause body.
    pub lexer:    Option<ClauseLexer>,
    /// Nested sub-clauses, e.g. a sub-select.
    pub clauses:  Vec<Clause>,
}

impl Dialect {
    /// Derives the per-clause keyword strings and multi-word flags.
    ///
    /// Walks every statement and clause, recursing into nested clauses, and
    /// populates each clause's lowercase keyword (from its token's match
    /// string) and multi-word flag (from the token's own property). Must be
    /// called once before handing the dialect to a statement lexer.
    ///
    /// # Example
    /// ```
    /// use quell::lex::dialect::Dialect;
    ///
    /// let mut dialect = Dialect::sql();
    /// dialect.init();
    ///
    /// let select = &dialect.statements[0];
    /// let group_by = &select.clauses[3];
    /// assert_eq!(group_by.keyword(), "group by");
    /// assert!(group_by.is_multi_word());
    /// ```
    pub fn init(&mut self) {
        for statement in &mut self.statements {
            statement.init();
        }
    }

    /// Builds the reference SQL statement family.
    ///
    /// Describes `SELECT`, `INSERT`, `UPDATE`, and `DELETE` skeletons with
    /// their usual clause order. Call [`Dialect::init`] before use.
    #[must_use]
    pub fn sql() -> Self {
        let select = Statement { keyword: Token::Select,
                                 clauses: vec![Clause::new(Token::Select),
                                               Clause::new(Token::From).optional(),
                                               Clause::new(Token::Where).optional()
                                                                        .with_lexer(tokenize),
                                               Clause::new(Token::GroupBy).optional(),
                                               Clause::new(Token::Having).optional(),
                                               Clause::new(Token::OrderBy).optional(),
                                               Clause::new(Token::Limit).optional(),], };
        let insert = Statement { keyword: Token::Insert,
                                 clauses: vec![Clause::new(Token::Insert),
                                               Clause::new(Token::Into),
                                               Clause::new(Token::Values),], };
        let update = Statement { keyword: Token::Update,
                                 clauses: vec![Clause::new(Token::Update),
                                               Clause::new(Token::Set),
                                               Clause::new(Token::Where).optional()
                                                                        .with_lexer(tokenize),], };
        let delete = Statement { keyword: Token::Delete,
                                 clauses: vec![Clause::new(Token::Delete),
                                               Clause::new(Token::From),
                                               Clause::new(Token::Where).optional()
                                                                        .with_lexer(tokenize),], };
        Self { name:       "sql",
               statements: vec![select, insert, update, delete], }
    }
}

impl Statement {
    fn init(&mut self) {
        for clause in &mut self.clauses {
            clause.init();
        }
    }
}

impl Clause {
    /// Creates a required clause for the given keyword token with no
    /// sub-lexer and no nested clauses.
    #[must_use]
    pub fn new(token: Token) -> Self {
        Self { keyword: String::new(),
               multi_word: false,
               optional: false,
               token,
               lexer: None,
               clauses: Vec::new(), }
    }

    /// Marks the clause optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Attaches a sub-lexer for the clause body.
    #[must_use]
    pub fn with_lexer(mut self, lexer: ClauseLexer) -> Self {
        self.lexer = Some(lexer);
        self
    }

    /// Attaches nested sub-clauses.
    #[must_use]
    pub fn with_clauses(mut self, clauses: Vec<Self>) -> Self {
        self.clauses = clauses;
        self
    }

    /// The derived lowercase keyword of this clause.
    ///
    /// Empty until [`Dialect::init`] has run.
    #[must_use]
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// The derived multi-word flag of this clause.
    #[must_use]
    pub const fn is_multi_word(&self) -> bool {
        self.multi_word
    }

    fn init(&mut self) {
        self.keyword = self.token.match_string().to_lowercase();
        self.multi_word = self.token.multi_word();
        for clause in &mut self.clauses {
            clause.init();
        }
    }
}
