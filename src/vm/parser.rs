use std::iter::Peekable;

use logos::Logos;

use crate::{
    ast::{FuncNode, IdentityNode, Node, NumberNode, StringNode},
    error::ParseError,
    lex::token::Token,
    vm::evaluator::function,
};

/// Result type used by the parser.
pub type ParseResult<T> = Result<T, ParseError>;

/// Parses an expression into the tree the evaluator walks.
///
/// Grammar, loosest binding first; all binary levels are left-associative
/// and the comparison level is non-associative:
///
/// ```text
/// or             := and (("||" | "or") and)*
/// and            := comparison ("&&" comparison)*
/// comparison     := additive (("==" | "!=" | "<" | "<=" | ">" | ">=") additive)?
/// additive       := multiplicative (("+" | "-") multiplicative)*
/// multiplicative := unary (("*" | "/" | "%") unary)*
/// unary          := ("!" | "-") unary | primary
/// primary        := number | string | identity | func "(" args ")" | "(" or ")"
/// ```
///
/// Function names resolve against the registry here, so an unknown function
/// or a wrong argument count is a parse error, not an evaluation failure.
///
/// # Errors
/// Returns a [`ParseError`] for unrecognizable input, a premature end, an
/// unresolvable call, or leftover tokens after the root expression.
///
/// # Example
/// ```
/// use quell::vm::parser::parse_expression;
///
/// assert!(parse_expression("age >= 21 && name == \"alice\"").is_ok());
/// assert!(parse_expression("age >=").is_err());
/// ```
pub fn parse_expression(input: &str) -> ParseResult<Node> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(input);

    while let Some(token) = lexer.next() {
        if let Ok(tok) = token {
            tokens.push(tok);
        } else {
            return Err(ParseError::UnexpectedToken { found: lexer.slice().to_string() });
        }
    }

    let mut iter = tokens.iter().peekable();
    let node = parse_or(&mut iter)?;

    if let Some(extra) = iter.next() {
        return Err(ParseError::TrailingInput { found: extra.to_string() });
    }
    Ok(node)
}

/// Parses or-level expressions: `or := and (("||" | "or") and)*`.
fn parse_or<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token>
{
    let mut left = parse_and(tokens)?;
    while let Some(op) = take_operator(tokens, |t| matches!(t, Token::LogicOr | Token::Or)) {
        let right = parse_and(tokens)?;
        left = Node::Binary { op,
                              left: Box::new(left),
                              right: Box::new(right) };
    }
    Ok(left)
}

/// Parses and-level expressions: `and := comparison ("&&" comparison)*`.
fn parse_and<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token>
{
    let mut left = parse_comparison(tokens)?;
    while let Some(op) = take_operator(tokens, |t| matches!(t, Token::LogicAnd)) {
        let right = parse_comparison(tokens)?;
        left = Node::Binary { op,
                              left: Box::new(left),
                              right: Box::new(right) };
    }
    Ok(left)
}

/// Parses a comparison: at most one relational operator between additive
/// operands.
fn parse_comparison<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token>
{
    let left = parse_additive(tokens)?;
    if let Some(op) = take_operator(tokens, |t| {
                          matches!(t,
                                   Token::EqualEqual
                                   | Token::BangEqual
                                   | Token::Less
                                   | Token::LessEqual
                                   | Token::Greater
                                   | Token::GreaterEqual)
                      })
    {
        let right = parse_additive(tokens)?;
        return Ok(Node::Binary { op,
                                 left: Box::new(left),
                                 right: Box::new(right) });
    }
    Ok(left)
}

/// Parses addition and subtraction:
/// `additive := multiplicative (("+" | "-") multiplicative)*`.
fn parse_additive<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token>
{
    let mut left = parse_multiplicative(tokens)?;
    while let Some(op) = take_operator(tokens, |t| matches!(t, Token::Plus | Token::Minus)) {
        let right = parse_multiplicative(tokens)?;
        left = Node::Binary { op,
                              left: Box::new(left),
                              right: Box::new(right) };
    }
    Ok(left)
}

/// Parses multiplication, division, and modulus:
/// `multiplicative := unary (("*" | "/" | "%") unary)*`.
fn parse_multiplicative<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token>
{
    let mut left = parse_unary(tokens)?;
    while let Some(op) =
        take_operator(tokens, |t| matches!(t, Token::Star | Token::Slash | Token::Percent))
    {
        let right = parse_unary(tokens)?;
        left = Node::Binary { op,
                              left: Box::new(left),
                              right: Box::new(right) };
    }
    Ok(left)
}

/// Parses unary prefixes: `unary := ("!" | "-") unary | primary`.
fn parse_unary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token>
{
    if let Some(op) = take_operator(tokens, |t| matches!(t, Token::Bang | Token::Minus)) {
        let arg = parse_unary(tokens)?;
        return Ok(Node::Unary { op,
                                arg: Box::new(arg) });
    }
    parse_primary(tokens)
}

/// Parses a primary: a literal, an identity, a function call, or a
/// parenthesized expression.
fn parse_primary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token>
{
    match tokens.next() {
        None => Err(ParseError::UnexpectedEnd),
        Some(Token::Integer(i)) => Ok(Node::Number(NumberNode::int(*i))),
        Some(Token::Real(r)) => Ok(Node::Number(NumberNode::float(*r))),
        Some(Token::QuotedString(s)) => Ok(Node::String(StringNode { text: s.clone() })),
        Some(Token::Identifier(name)) => {
            if matches!(tokens.peek(), Some(Token::LParen)) {
                tokens.next();
                return parse_call(name, tokens);
            }
            Ok(Node::Identity(IdentityNode::new(name)))
        },
        Some(Token::LParen) => {
            let node = parse_or(tokens)?;
            match tokens.next() {
                Some(Token::RParen) => Ok(node),
                Some(other) => Err(ParseError::UnexpectedToken { found: other.to_string() }),
                None => Err(ParseError::UnexpectedEnd),
            }
        },
        Some(other) => Err(ParseError::UnexpectedToken { found: other.to_string() }),
    }
}

/// Parses the argument list of a call whose name and `(` are consumed, then
/// resolves the function against the registry.
fn parse_call<'a, I>(name: &str, tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token>
{
    let mut args = Vec::new();

    if matches!(tokens.peek(), Some(Token::RParen)) {
        tokens.next();
    } else {
        loop {
            args.push(parse_or(tokens)?);
            match tokens.next() {
                Some(Token::Comma) => {},
                Some(Token::RParen) => break,
                Some(other) => {
                    return Err(ParseError::UnexpectedToken { found: other.to_string() });
                },
                None => return Err(ParseError::UnexpectedEnd),
            }
        }
    }

    let Some(func) = function::lookup(name) else {
        return Err(ParseError::UnknownFunction { name: name.to_string() });
    };
    if !func.arity.check(args.len()) {
        return Err(ParseError::WrongArgumentCount { name:  name.to_string(),
                                                    found: args.len(), });
    }
    Ok(Node::Func(FuncNode { func, args }))
}

/// Consumes and returns the next token when it satisfies the predicate.
fn take_operator<'a, I>(tokens: &mut Peekable<I>, accept: fn(&Token) -> bool) -> Option<Token>
    where I: Iterator<Item = &'a Token>
{
    if tokens.peek().is_some_and(|t| accept(t)) {
        return tokens.next().cloned();
    }
    None
}
