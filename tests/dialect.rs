use quell::lex::{
    dialect::{Clause, Dialect, Statement},
    token::{Token, tokenize},
};

#[test]
fn init_derives_keywords_from_tokens() {
    let mut dialect = Dialect::sql();
    dialect.init();

    let select = &dialect.statements[0];
    assert_eq!(select.keyword, Token::Select);

    let keywords: Vec<&str> = select.clauses.iter().map(Clause::keyword).collect();
    assert_eq!(keywords,
               vec!["select", "from", "where", "group by", "having", "order by", "limit"]);
}

#[test]
fn init_derives_multi_word_flags() {
    let mut dialect = Dialect::sql();
    dialect.init();

    let select = &dialect.statements[0];
    for clause in &select.clauses {
        let expected = matches!(clause.token, Token::GroupBy | Token::OrderBy);
        assert_eq!(clause.is_multi_word(), expected, "clause {}", clause.keyword());
    }
}

#[test]
fn init_recurses_into_nested_clauses() {
    let nested = Clause::new(Token::Select).with_clauses(vec![Clause::new(Token::From)]);
    let statement = Statement { keyword: Token::Select,
                                clauses: vec![Clause::new(Token::Where).optional()
                                                                       .with_clauses(vec![nested])], };
    let mut dialect = Dialect { name:       "custom",
                                statements: vec![statement], };
    dialect.init();

    let where_clause = &dialect.statements[0].clauses[0];
    assert_eq!(where_clause.keyword(), "where");
    assert!(where_clause.optional);

    let sub_select = &where_clause.clauses[0];
    assert_eq!(sub_select.keyword(), "select");
    assert_eq!(sub_select.clauses[0].keyword(), "from");
}

#[test]
fn where_clauses_carry_an_expression_sub_lexer() {
    let mut dialect = Dialect::sql();
    dialect.init();

    let select = &dialect.statements[0];
    let where_clause = select.clauses.iter()
                                     .find(|c| c.keyword() == "where")
                                     .unwrap();
    let lexer = where_clause.lexer.expect("where clause should carry a sub-lexer");

    assert_eq!(lexer("age >= 21"),
               vec![Token::Identifier("age".to_string()),
                    Token::GreaterEqual,
                    Token::Integer(21)]);
}

#[test]
fn keywords_lex_case_insensitively() {
    assert_eq!(tokenize("SELECT"), vec![Token::Select]);
    assert_eq!(tokenize("select"), vec![Token::Select]);
    assert_eq!(tokenize("Group  By"), vec![Token::GroupBy]);
    assert_eq!(tokenize("order by"), vec![Token::OrderBy]);
}

#[test]
fn statement_families_cover_the_reference_skeletons() {
    let dialect = Dialect::sql();
    let keywords: Vec<Token> = dialect.statements.iter().map(|s| s.keyword.clone()).collect();
    assert_eq!(keywords,
               vec![Token::Select, Token::Insert, Token::Update, Token::Delete]);
}
