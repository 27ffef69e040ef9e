use std::iter::Peekable;

use crate::{
    ast::{BinaryOperator, Builtin, Node, UnaryOperator},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            statement::parse_function_definition,
            utils::{parse_comma_separated, skip_newlines},
        },
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// The binding power an expression parse starts from: low enough that every
/// operator, including right-associative assignment at `-1`, is consumed.
pub const MINIMAL_BINDING_POWER: i32 = i32::MIN;

/// Parses a full expression with Pratt-style precedence climbing.
///
/// One routine does all the work: it consumes a prefix (a literal, a
/// variable or call head, a parenthesized expression, a list literal, a
/// function literal, or a unary operator applied to a sub-expression), then
/// iteratively consumes postfix and binary forms. A `(` after an expression
/// starts a call of that expression; a `[` starts a slice. A binary
/// operator is consumed only while its left binding power is at least
/// `minimal_binding_power`; its right operand is parsed with the operator's
/// right binding power, which encodes associativity (`^` and the assignment
/// family bind tighter on the left than on the right).
///
/// Parsing stops at end of input, a newline, `:`, `)`, `]`, `,`, `end`,
/// `then`, `elseif` or `else`.
///
/// # Parameters
/// - `tokens`: Token iterator providing `(Token, line)` pairs.
/// - `minimal_binding_power`: Lower bound on the left binding power of
///   operators this call may consume.
///
/// # Returns
/// The parsed expression node. Operator precedence is fully encoded in the
/// tree structure; the evaluator never re-examines it.
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>,
                               minimal_binding_power: i32)
                               -> ParseResult<Node>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let (token, line) = tokens.next()
                              .ok_or(ParseError::UnexpectedEndOfInput { line: 0 })?;
    let line = *line;

    let mut lhs = if let Some((op, binding_power)) = prefix_operator(token) {
        let arg = parse_expression(tokens, binding_power)?;
        Node::UnaryOp { op,
                        arg: Box::new(arg),
                        line }
    } else {
        match token {
            Token::LBracket => parse_list_literal(tokens, line)?,
            Token::LParen => {
                let inner = parse_expression(tokens, MINIMAL_BINDING_POWER)?;
                match tokens.next() {
                    Some((Token::RParen, _)) => inner,
                    _ => return Err(ParseError::ExpectedClosingParen { line }),
                }
            },
            Token::Number(value) => Node::NumberLiteral { value: *value,
                                                          line },
            Token::Str(value) => Node::StringLiteral { value: value.clone(),
                                                       line },
            Token::True => Node::NumberLiteral { value: 1.0,
                                                 line },
            Token::False => Node::NumberLiteral { value: 0.0,
                                                  line },
            Token::Nil => Node::NilLiteral { line },
            Token::Identifier(name) => parse_identifier_head(tokens, name.clone(), line)?,
            Token::Function => {
                let function = parse_function_definition(tokens, line)?;
                Node::FunctionImpl { function, line }
            },
            tok => {
                return Err(ParseError::IncorrectExpression { token: format!("{tok:?}"),
                                                             line });
            },
        }
    };

    loop {
        let Some((operation, op_line)) = tokens.peek() else {
            break;
        };
        let op_line = *op_line;

        match operation {
            Token::NewLine
            | Token::Colon
            | Token::RParen
            | Token::RBracket
            | Token::Comma
            | Token::End
            | Token::Then
            | Token::ElseIf
            | Token::Else => break,
            Token::LParen => {
                tokens.next();
                let args = parse_call_args(tokens)?;
                lhs = Node::UnnamedCall { callee: Box::new(lhs),
                                          args,
                                          line: op_line };
                continue;
            },
            Token::LBracket => {
                tokens.next();
                lhs = parse_slice(tokens, lhs, op_line)?;
                continue;
            },
            _ => {},
        }

        let Some(op) = token_to_binary_operator(operation) else {
            return Err(ParseError::UnknownBinaryOperation { token: format!("{operation:?}"),
                                                            line:  op_line, });
        };
        let (left_binding_power, right_binding_power) = binding_power(op);
        if left_binding_power < minimal_binding_power {
            break;
        }

        tokens.next();
        let rhs = parse_expression(tokens, right_binding_power)?;
        lhs = Node::BinaryOp { op,
                               lhs: Box::new(lhs),
                               rhs: Box::new(rhs),
                               line: op_line };
    }

    Ok(lhs)
}

/// Maps a token to its prefix operator and right binding power, if it can
/// begin a unary expression.
const fn prefix_operator(token: &Token) -> Option<(UnaryOperator, i32)> {
    match token {
        Token::Plus => Some((UnaryOperator::Plus, 17)),
        Token::Minus => Some((UnaryOperator::Negate, 17)),
        Token::Not => Some((UnaryOperator::Not, 17)),
        _ => None,
    }
}

/// Maps a token to its corresponding binary operator.
///
/// Returns `Some(BinaryOperator)` when the token represents a binary
/// operator (arithmetic, comparison, logical, or the assignment family).
/// Returns `None` for all other tokens.
///
/// # Example
/// ```
/// use quill::{
///     ast::BinaryOperator,
///     interpreter::{lexer::Token, parser::core::token_to_binary_operator},
/// };
///
/// assert_eq!(token_to_binary_operator(&Token::Plus),
///            Some(BinaryOperator::Add));
/// assert_eq!(token_to_binary_operator(&Token::Comma), None);
/// ```
#[must_use]
pub const fn token_to_binary_operator(token: &Token) -> Option<BinaryOperator> {
    match token {
        Token::Plus => Some(BinaryOperator::Add),
        Token::Minus => Some(BinaryOperator::Sub),
        Token::Star => Some(BinaryOperator::Mul),
        Token::Slash => Some(BinaryOperator::Div),
        Token::Percent => Some(BinaryOperator::Mod),
        Token::Caret => Some(BinaryOperator::Pow),
        Token::EqualEqual => Some(BinaryOperator::Equal),
        Token::BangEqual => Some(BinaryOperator::NotEqual),
        Token::Less => Some(BinaryOperator::Less),
        Token::Greater => Some(BinaryOperator::Greater),
        Token::LessEqual => Some(BinaryOperator::LessEqual),
        Token::GreaterEqual => Some(BinaryOperator::GreaterEqual),
        Token::And => Some(BinaryOperator::And),
        Token::Or => Some(BinaryOperator::Or),
        Token::Assign => Some(BinaryOperator::Assign),
        Token::PlusAssign => Some(BinaryOperator::AddAssign),
        Token::MinusAssign => Some(BinaryOperator::SubAssign),
        Token::StarAssign => Some(BinaryOperator::MulAssign),
        Token::SlashAssign => Some(BinaryOperator::DivAssign),
        Token::PercentAssign => Some(BinaryOperator::ModAssign),
        Token::CaretAssign => Some(BinaryOperator::PowAssign),
        _ => None,
    }
}

/// The `(left, right)` binding powers of a binary operator.
///
/// Left-associative operators have `left < right`; the assignment family
/// and `^` flip the pair to associate to the right.
const fn binding_power(op: BinaryOperator) -> (i32, i32) {
    use BinaryOperator::{
        Add, AddAssign, And, Assign, Div, DivAssign, Equal, Greater, GreaterEqual, Less,
        LessEqual, Mod, ModAssign, Mul, MulAssign, NotEqual, Or, Pow, PowAssign, Sub, SubAssign,
    };
    match op {
        Assign | AddAssign | SubAssign | MulAssign | DivAssign | ModAssign | PowAssign => (-1, -2),
        Or => (1, 2),
        And => (3, 4),
        Equal | NotEqual => (5, 6),
        Less | LessEqual | Greater | GreaterEqual => (7, 8),
        Add | Sub => (9, 10),
        Mul | Div | Mod => (11, 12),
        Pow => (15, 14),
    }
}

/// Parses the expression head that starts with a bare identifier.
///
/// When the identifier is immediately followed by `(`, the result is a call:
/// a [`Node::GlobalCall`] if the name resolves to a builtin, otherwise a
/// [`Node::FunctionCall`] looked up at run time. Without parentheses the
/// identifier is a [`Node::Variable`].
fn parse_identifier_head<'a, I>(tokens: &mut Peekable<I>,
                                name: String,
                                line: usize)
                                -> ParseResult<Node>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    match tokens.peek() {
        Some((Token::LParen, _)) => {
            tokens.next();
            let args = parse_call_args(tokens)?;
            match Builtin::from_name(&name) {
                Some(builtin) => Ok(Node::GlobalCall { builtin, args, line }),
                None => Ok(Node::FunctionCall { name, args, line }),
            }
        },
        _ => Ok(Node::Variable { name, line }),
    }
}

/// Parses the argument list of a call, after the opening `(` has been
/// consumed. Newlines between arguments are skipped.
fn parse_call_args<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Vec<Node>>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_comma_separated(tokens,
                          |t| parse_expression(t, MINIMAL_BINDING_POWER),
                          &Token::RParen)
}

/// Parses a list literal, after the opening `[` has been consumed.
fn parse_list_literal<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Node>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let elements = parse_comma_separated(tokens,
                                         |t| parse_expression(t, MINIMAL_BINDING_POWER),
                                         &Token::RBracket)?;
    Ok(Node::ListLiteral { elements, line })
}

/// Parses a slice expression `target[...]`, after the opening `[` has been
/// consumed.
///
/// One to three colon-separated index positions are accepted; an omitted
/// position (nothing between two colons, or before the first / after the
/// last) is recorded as `None` and defaulted by the evaluator. `e[]` is an
/// error.
///
/// # Errors
/// - `EmptySliceExpression` for `e[]`.
/// - `SliceIndexCount` for more than three positions.
/// - `UnexpectedToken` when an index is not followed by `:` or `]`.
fn parse_slice<'a, I>(tokens: &mut Peekable<I>, target: Node, line: usize) -> ParseResult<Node>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut indices: Vec<Option<Node>> = Vec::new();
    loop {
        skip_newlines(tokens);
        match tokens.peek() {
            Some((Token::Colon | Token::RBracket, _)) => indices.push(None),
            Some(_) => indices.push(Some(parse_expression(tokens, MINIMAL_BINDING_POWER)?)),
            None => return Err(ParseError::UnexpectedEndOfInput { line }),
        }
        skip_newlines(tokens);
        match tokens.next() {
            Some((Token::Colon, _)) => {},
            Some((Token::RBracket, _)) => break,
            Some((tok, l)) => {
                return Err(ParseError::UnexpectedToken { token: format!("Expected ':' or ']' in slice, found {tok:?}"),
                                                         line:  *l, });
            },
            None => return Err(ParseError::UnexpectedEndOfInput { line }),
        }
    }

    if indices.len() == 1 && indices[0].is_none() {
        return Err(ParseError::EmptySliceExpression { line });
    }
    if indices.len() > 3 {
        return Err(ParseError::SliceIndexCount { count: indices.len(),
                                                 line });
    }

    Ok(Node::Slice { target: Box::new(target),
                     indices,
                     line })
}
