use logos::{FilterResult, Logos};

use crate::error::ParseError;

/// Represents a lexical token in the source input.
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// This enum defines all recognized tokens in the language.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
pub enum Token {
    /// Numeric literal tokens such as `42`, `3.14` or `1e9`.
    ///
    /// The lexeme must consume entirely into a double; something like
    /// `1.2.3` is a lexing error.
    #[regex(r"[0-9][0-9eE.]*", parse_number)]
    Number(f64),
    /// String literal tokens: `"..."` with the escapes `\n`, `\t`, `\r`,
    /// `\"`, `\\` and `\0`; any other `\c` is the literal character `c`.
    /// End of input inside a string is a lexing error.
    #[token("\"", lex_string)]
    Str(String),
    /// `true`
    #[token("true")]
    True,
    /// `false`
    #[token("false")]
    False,
    /// `nil`
    #[token("nil")]
    Nil,
    /// `while`
    #[token("while")]
    While,
    /// `for`
    #[token("for")]
    For,
    /// `function`
    #[token("function")]
    Function,
    /// `break`
    #[token("break")]
    Break,
    /// `continue`
    #[token("continue")]
    Continue,
    /// `end`
    #[token("end")]
    End,
    /// `return`
    #[token("return")]
    Return,
    /// `if`
    #[token("if")]
    If,
    /// `else`
    #[token("else")]
    Else,
    /// `elseif`
    #[token("elseif")]
    ElseIf,
    /// `in`
    #[token("in")]
    In,
    /// `then`
    #[token("then")]
    Then,
    /// `and`
    #[token("and")]
    And,
    /// `or`
    #[token("or")]
    Or,
    /// `not`
    #[token("not")]
    Not,
    /// Identifier tokens; variable or function names such as `x` or
    /// `counter`. Identifiers start with a letter, never a digit or `_`.
    #[regex(r"[a-zA-Z][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),
    /// `// Comments.`
    #[regex(r"//[^\n]*", logos::skip)]
    Comment,
    /// `/* Block comments. */` An unterminated block comment is a lexing
    /// error.
    #[token("/*", skip_block_comment)]
    BlockComment,
    /// `,`
    #[token(",")]
    Comma,
    /// `:`
    #[token(":")]
    Colon,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
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
    /// `^`
    #[token("^")]
    Caret,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `=`
    #[token("=")]
    Assign,
    /// `+=`
    #[token("+=")]
    PlusAssign,
    /// `-=`
    #[token("-=")]
    MinusAssign,
    /// `*=`
    #[token("*=")]
    StarAssign,
    /// `/=`
    #[token("/=")]
    SlashAssign,
    /// `%=`
    #[token("%=")]
    PercentAssign,
    /// `^=`
    #[token("^=")]
    CaretAssign,

    /// Statement separator.
    #[token("\n", |lex| lex.extras.line += 1)]
    NewLine,
    /// Spaces, tabs and feeds.
    #[regex(r"[ \t\r\f]+", logos::skip)]
    Ignored,
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line number for error reporting and diagnostics.
/// Incremented as newlines are processed, including newlines inside string
/// literals and block comments.
#[derive(Default)]
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line: usize,
}

/// Parses a numeric literal from the current token slice.
///
/// The whole lexeme must parse; partial consumption (e.g. `1e`) yields
/// `None`, which surfaces as an error token.
fn parse_number(lex: &logos::Lexer<Token>) -> Option<f64> {
    lex.slice().parse().ok()
}

/// Scans a string literal starting after the opening quote.
///
/// Decodes escape sequences in place and counts embedded newlines. Reaching
/// end of input before the closing quote produces an error token.
fn lex_string(lex: &mut logos::Lexer<Token>) -> FilterResult<String, ()> {
    let remainder = lex.remainder();
    let mut value = String::new();
    let mut chars = remainder.char_indices();
    while let Some((index, c)) = chars.next() {
        match c {
            '"' => {
                lex.bump(index + 1);
                return FilterResult::Emit(value);
            },
            '\\' => match chars.next() {
                Some((_, 'n')) => value.push('\n'),
                Some((_, 't')) => value.push('\t'),
                Some((_, 'r')) => value.push('\r'),
                Some((_, '0')) => value.push('\0'),
                Some((_, other)) => {
                    if other == '\n' {
                        lex.extras.line += 1;
                    }
                    value.push(other);
                },
                None => break,
            },
            '\n' => {
                lex.extras.line += 1;
                value.push('\n');
            },
            other => value.push(other),
        }
    }
    FilterResult::Error(())
}

/// Skips a `/* ... */` comment, counting the newlines it spans.
///
/// An unterminated comment produces an error token at the opening `/*`.
fn skip_block_comment(lex: &mut logos::Lexer<Token>) -> FilterResult<(), ()> {
    let remainder = lex.remainder();
    remainder.find("*/").map_or(FilterResult::Error(()), |close| {
                            lex.extras.line += remainder[..close].matches('\n').count();
                            lex.bump(close + 2);
                            FilterResult::Skip
                        })
}

/// Tokenizes a whole source string.
///
/// Produces the token stream as `(token, line)` pairs, one entry per token
/// in source order. Lexing is total: any position that matches no token
/// terminates the stream with an error describing the failure.
///
/// # Parameters
/// - `source`: The source text to tokenize.
///
/// # Returns
/// The token stream, or the first lexing error.
///
/// # Errors
/// - `UnterminatedString` / `UnterminatedComment` for literals and comments
///   still open at end of input.
/// - `InvalidNumber` for numeric lexemes that do not parse as a double.
/// - `UnknownSymbol` for any other unrecognized character, carrying its
///   byte offset.
///
/// # Example
/// ```
/// use quill::interpreter::lexer::{Token, tokenize};
///
/// let tokens = tokenize("x = 1").unwrap();
/// assert_eq!(tokens[0].0, Token::Identifier("x".to_string()));
/// assert_eq!(tokens[1].0, Token::Assign);
/// assert_eq!(tokens[2].0, Token::Number(1.0));
/// ```
pub fn tokenize(source: &str) -> Result<Vec<(Token, usize)>, ParseError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer_with_extras(source, LexerExtras { line: 1 });

    while let Some(token) = lexer.next() {
        match token {
            Ok(tok) => tokens.push((tok, lexer.extras.line)),
            Err(()) => {
                let offset = lexer.span().start;
                let line = lexer.extras.line;
                let rest = &source[offset..];
                return Err(if rest.starts_with("/*") {
                    ParseError::UnterminatedComment { line }
                } else if rest.starts_with('"') {
                    ParseError::UnterminatedString { line }
                } else if rest.starts_with(|c: char| c.is_ascii_digit()) {
                    ParseError::InvalidNumber { literal: lexer.slice().to_string(),
                                                line }
                } else {
                    ParseError::UnknownSymbol { symbol: rest.chars().next().unwrap_or('\0'),
                                                offset,
                                                line }
                });
            },
        }
    }

    Ok(tokens)
}
