/// Parsing errors.
///
/// Defines all error types that can occur during lexing and parsing of
/// source code. Parse errors include unknown symbols, unterminated literals
/// and comments, unexpected tokens, and malformed slice expressions.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation: type
/// mismatches, unknown names, wrong argument counts, out-of-range indices,
/// invalid argument values, and I/O failures.
pub mod runtime_error;

pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;
