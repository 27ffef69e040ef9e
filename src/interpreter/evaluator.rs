/// Core evaluation logic and runtime state.
///
/// Contains the evaluator, the scope stack, the control-flow outcome type,
/// and the statement/expression dispatch.
pub mod core;

/// Binary operator evaluation logic.
///
/// Handles the assignment family, the short-circuiting logical
/// connectives, and the type-directed arithmetic and comparison
/// operators.
pub mod binary;

/// Unary operator evaluation logic.
///
/// Implements the prefix operators: negation, identity, and logical NOT.
pub mod unary;

/// Loop execution.
///
/// Implements `while` and `for` loops, per-iteration scope frames, and
/// the absorption of `break`/`continue` signals at the loop boundary.
pub mod loops;

/// Function calls.
///
/// Handles named and unnamed calls: callee resolution, arity checking,
/// argument evaluation, and frame management around the function body.
pub mod function;

/// Built-in global functions.
///
/// Implements the named builtins, from I/O and string helpers to list
/// mutators, with their strict arity table.
pub mod builtin;

/// Slice evaluation.
///
/// Implements element access, sublists and substrings, strides, negative
/// index wrapping, and index defaulting for `e[a]`, `e[a:b]` and
/// `e[a:b:c]`.
pub mod slice;
