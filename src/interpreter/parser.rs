/// Core expression parsing.
///
/// Contains the Pratt-style precedence-climbing expression parser, the
/// binding-power tables, and the postfix call and slice sub-parsers.
pub mod core;

/// Statement parsing.
///
/// Implements the recursive-descent statement grammar: `if`/`while`/`for`
/// blocks, `break`/`continue`/`return`, function literals, and the
/// newline discipline between statements.
pub mod statement;

/// Utility functions for the parser.
///
/// Provides helpers shared by the expression and statement parsers, such
/// as comma-separated list parsing and newline skipping.
pub mod utils;
