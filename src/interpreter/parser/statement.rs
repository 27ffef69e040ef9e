use std::{iter::Peekable, rc::Rc};

use crate::{
    ast::{FunctionDef, Node, Program},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            core::{MINIMAL_BINDING_POWER, ParseResult, parse_expression},
            utils::{parse_comma_separated, parse_identifier, skip_newlines},
        },
    },
};

/// Parses a whole program: top-level statements separated by newlines.
///
/// Leading and trailing newlines are skipped. Parsing is all-or-nothing: a
/// syntax error anywhere aborts before anything is evaluated.
///
/// # Parameters
/// - `tokens`: Token iterator containing `(Token, line)` pairs.
///
/// # Returns
/// The parsed [`Program`].
pub fn parse_program<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Program>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let statements = parse_block(tokens, &[])?;
    Ok(Program { statements })
}

/// Parses a single statement.
///
/// A statement begins with one of the keywords `if`, `while`, `for`,
/// `break`, `continue` or `return`; anything else is an expression
/// statement.
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the start of a statement.
///
/// # Returns
/// A parsed [`Node`].
pub fn parse_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    match tokens.peek() {
        Some((Token::If, _)) => parse_if(tokens),
        Some((Token::While, _)) => parse_while(tokens),
        Some((Token::For, _)) => parse_for(tokens),
        Some((Token::Break, line)) => {
            let line = *line;
            tokens.next();
            Ok(Node::Break { line })
        },
        Some((Token::Continue, line)) => {
            let line = *line;
            tokens.next();
            Ok(Node::Continue { line })
        },
        Some((Token::Return, line)) => {
            let line = *line;
            tokens.next();
            let value = parse_expression(tokens, MINIMAL_BINDING_POWER)?;
            Ok(Node::Return { value: Box::new(value),
                              line })
        },
        _ => parse_expression(tokens, MINIMAL_BINDING_POWER),
    }
}

/// Parses the statements of a block until end of input or one of the given
/// terminator tokens (which is left unconsumed).
///
/// Newlines between statements are skipped; after each statement the next
/// token must be a newline, a terminator, or end of input.
fn parse_block<'a, I>(tokens: &mut Peekable<I>, terminators: &[Token]) -> ParseResult<Vec<Node>>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut statements = Vec::new();
    loop {
        skip_newlines(tokens);
        match tokens.peek() {
            None => break,
            Some((tok, _)) if terminators.contains(tok) => break,
            Some(_) => {
                statements.push(parse_statement(tokens)?);
                statement_boundary(tokens, terminators)?;
            },
        }
    }
    Ok(statements)
}

/// Checks that a statement is properly terminated.
///
/// Valid terminations are a newline, end of input, or one of the block
/// terminators of the enclosing construct. Nothing is consumed.
fn statement_boundary<'a, I>(tokens: &mut Peekable<I>, terminators: &[Token]) -> ParseResult<()>
    where I: Iterator<Item = &'a (Token, usize)>
{
    match tokens.peek() {
        None | Some((Token::NewLine, _)) => Ok(()),
        Some((tok, _)) if terminators.contains(tok) => Ok(()),
        Some((tok, line)) => {
            Err(ParseError::UnexpectedToken { token: format!("Expected a newline after the statement, found {tok:?}"),
                                              line:  *line, })
        },
    }
}

/// Consumes the two-token terminator `end <keyword>` of a block statement.
///
/// # Errors
/// - `UnexpectedToken` when `end` is missing or followed by the wrong
///   keyword (e.g. `end` alone, or `end while` closing an `if`).
/// - `UnexpectedEndOfInput` when the input stops first.
fn expect_end<'a, I>(tokens: &mut Peekable<I>, keyword: &Token, name: &str) -> ParseResult<()>
    where I: Iterator<Item = &'a (Token, usize)>
{
    match tokens.next() {
        Some((Token::End, line)) => match tokens.next() {
            Some((tok, _)) if tok == keyword => Ok(()),
            Some((tok, l)) => {
                Err(ParseError::UnexpectedToken { token: format!("Expected \"end {name}\", but got \"end {tok:?}\""),
                                                  line:  *l, })
            },
            None => Err(ParseError::UnexpectedEndOfInput { line: *line }),
        },
        Some((tok, line)) => {
            Err(ParseError::UnexpectedToken { token: format!("Expected \"end {name}\", found {tok:?}"),
                                              line:  *line, })
        },
        None => Err(ParseError::UnexpectedEndOfInput { line: 0 }),
    }
}

/// Parses an `if` statement with optional `elseif` chain and `else` branch.
///
/// Syntax:
/// ```text
///     if <condition> then
///         <statements>
///     elseif <condition> then
///         <statements>
///     else
///         <statements>
///     end if
/// ```
/// Each `elseif` arm is parsed recursively and nests as a single `If` node
/// in the else branch of its predecessor; only the outermost arm of a chain
/// consumes the closing `end if`.
///
/// # Parameters
/// - `tokens`: Token stream positioned at the `if` (or `elseif`) keyword.
///
/// # Returns
/// A [`Node::If`] representing the full conditional.
///
/// # Errors
/// - `UnexpectedToken` if `then` or the closing `end if` is missing.
/// - Propagates any errors from condition or body parsing.
fn parse_if<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let line = match tokens.next() {
        Some((Token::If | Token::ElseIf, line)) => *line,
        Some((tok, line)) => {
            return Err(ParseError::UnexpectedToken { token: format!("Expected \"if\", found {tok:?}"),
                                                     line:  *line, });
        },
        None => return Err(ParseError::UnexpectedEndOfInput { line: 0 }),
    };

    let condition = parse_expression(tokens, MINIMAL_BINDING_POWER)?;
    match tokens.next() {
        Some((Token::Then, _)) => {},
        Some((tok, l)) => {
            return Err(ParseError::UnexpectedToken { token: format!("Expected \"then\" after if condition, found {tok:?}"),
                                                     line:  *l, });
        },
        None => return Err(ParseError::UnexpectedEndOfInput { line }),
    }

    let then_branch = parse_block(tokens, &[Token::ElseIf, Token::Else, Token::End])?;

    let else_branch = match tokens.peek() {
        Some((Token::ElseIf, _)) => vec![parse_if(tokens)?],
        Some((Token::Else, _)) => {
            tokens.next();
            let block = parse_block(tokens, &[Token::End])?;
            expect_end(tokens, &Token::If, "if")?;
            block
        },
        Some((Token::End, _)) => {
            expect_end(tokens, &Token::If, "if")?;
            Vec::new()
        },
        _ => return Err(ParseError::UnexpectedEndOfInput { line }),
    };

    Ok(Node::If { condition: Box::new(condition),
                  then_branch,
                  else_branch,
                  line })
}

/// Parses a `while <condition> [then] ... end while` loop.
fn parse_while<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let line = match tokens.next() {
        Some((Token::While, line)) => *line,
        Some((tok, line)) => {
            return Err(ParseError::UnexpectedToken { token: format!("Expected \"while\", found {tok:?}"),
                                                     line:  *line, });
        },
        None => return Err(ParseError::UnexpectedEndOfInput { line: 0 }),
    };

    let condition = parse_expression(tokens, MINIMAL_BINDING_POWER)?;
    if let Some((Token::Then, _)) = tokens.peek() {
        tokens.next();
    }

    let body = parse_block(tokens, &[Token::End])?;
    expect_end(tokens, &Token::While, "while")?;

    Ok(Node::While { condition: Box::new(condition),
                     body,
                     line })
}

/// Parses a `for <name> in <sequence> [then] ... end for` loop.
fn parse_for<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let line = match tokens.next() {
        Some((Token::For, line)) => *line,
        Some((tok, line)) => {
            return Err(ParseError::UnexpectedToken { token: format!("Expected \"for\", found {tok:?}"),
                                                     line:  *line, });
        },
        None => return Err(ParseError::UnexpectedEndOfInput { line: 0 }),
    };

    let variable = parse_identifier(tokens)?;
    match tokens.next() {
        Some((Token::In, _)) => {},
        Some((tok, l)) => {
            return Err(ParseError::UnexpectedToken { token: format!("Expected \"in\" after the loop variable, found {tok:?}"),
                                                     line:  *l, });
        },
        None => return Err(ParseError::UnexpectedEndOfInput { line }),
    }

    let sequence = parse_expression(tokens, MINIMAL_BINDING_POWER)?;
    if let Some((Token::Then, _)) = tokens.peek() {
        tokens.next();
    }

    let body = parse_block(tokens, &[Token::End])?;
    expect_end(tokens, &Token::For, "for")?;

    Ok(Node::For { variable,
                   sequence: Box::new(sequence),
                   body,
                   line })
}

/// Parses a function literal, after the `function` keyword has been
/// consumed.
///
/// Syntax:
/// ```text
///     function(name1, name2, ...)
///         <statements>
///     end function
/// ```
/// Newlines inside the parameter list are skipped. The definition is
/// shared: every value produced from this literal aliases one
/// [`FunctionDef`].
///
/// # Parameters
/// - `tokens`: Token stream positioned after `function`.
/// - `line`: Line number of the `function` keyword.
///
/// # Returns
/// The shared function definition.
pub fn parse_function_definition<'a, I>(tokens: &mut Peekable<I>,
                                        line: usize)
                                        -> ParseResult<Rc<FunctionDef>>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    match tokens.next() {
        Some((Token::LParen, _)) => {},
        Some((tok, l)) => {
            return Err(ParseError::UnexpectedToken { token: format!("Expected '(' after \"function\", found {tok:?}"),
                                                     line:  *l, });
        },
        None => return Err(ParseError::UnexpectedEndOfInput { line }),
    }

    let arg_names = parse_comma_separated(tokens, parse_identifier, &Token::RParen)?;
    let body = parse_block(tokens, &[Token::End])?;
    expect_end(tokens, &Token::Function, "function")?;

    Ok(Rc::new(FunctionDef { arg_names, body }))
}
