#[derive(Debug)]
/// Represents all errors that can occur during lexing or parsing.
pub enum ParseError {
    /// The lexer hit a character that starts no token.
    UnknownSymbol {
        /// The offending character.
        symbol: char,
        /// Byte offset of the character in the source text.
        offset: usize,
        /// The source line where the error occurred.
        line:   usize,
    },
    /// A string literal was still open at end of input.
    UnterminatedString {
        /// The source line where the string literal started.
        line: usize,
    },
    /// A `/* ... */` comment was still open at end of input.
    UnterminatedComment {
        /// The source line where the comment started.
        line: usize,
    },
    /// A number literal did not parse as a double.
    InvalidNumber {
        /// The offending lexeme.
        literal: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// Found an unexpected token while parsing.
    UnexpectedToken {
        /// Description of what was expected and/or observed.
        token: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// Reached the end of input unexpectedly.
    UnexpectedEndOfInput {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A closing parenthesis `)` was expected but not found.
    ExpectedClosingParen {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A token that cannot start an expression appeared in expression
    /// position.
    IncorrectExpression {
        /// Description of the offending token.
        token: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// A token that is not a binary operator appeared between operands.
    UnknownBinaryOperation {
        /// Description of the offending token.
        token: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// A slice expression `e[...]` contained no indices at all.
    EmptySliceExpression {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A slice expression had more than three indices.
    SliceIndexCount {
        /// The number of indices found.
        count: usize,
        /// The source line where the error occurred.
        line:  usize,
    },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownSymbol { symbol, offset, line } => write!(f,
                                                                   "Error on line {line}: Unknown symbol '{symbol}' at offset {offset}."),

            Self::UnterminatedString { line } => {
                write!(f, "Error on line {line}: Unterminated string literal.")
            },

            Self::UnterminatedComment { line } => {
                write!(f, "Error on line {line}: Unterminated block comment.")
            },

            Self::InvalidNumber { literal, line } => {
                write!(f, "Error on line {line}: Invalid number literal '{literal}'.")
            },

            Self::UnexpectedToken { token, line } => {
                write!(f, "Error on line {line}: Unexpected token: {token}.")
            },

            Self::UnexpectedEndOfInput { line } => {
                write!(f, "Error on line {line}: Unexpected end of input.")
            },

            Self::ExpectedClosingParen { line } => write!(f,
                                                          "Error on line {line}: Expected closing parenthesis ')' but none found."),

            Self::IncorrectExpression { token, line } => {
                write!(f, "Error on line {line}: Incorrect expression: {token}.")
            },

            Self::UnknownBinaryOperation { token, line } => {
                write!(f, "Error on line {line}: Unknown binary operation: {token}.")
            },

            Self::EmptySliceExpression { line } => {
                write!(f, "Error on line {line}: Empty slice expression.")
            },

            Self::SliceIndexCount { count, line } => write!(f,
                                                            "Error on line {line}: Slice expression must have 1, 2, or 3 indices, found {count}."),
        }
    }
}

impl std::error::Error for ParseError {}
