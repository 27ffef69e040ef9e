//! # quill
//!
//! quill is a tree-walking interpreter for a small imperative scripting
//! language with dynamic typing, first-class functions, nil, IEEE-754
//! numbers, byte strings, and heterogeneous lists. Source text flows
//! through a lexer into a Pratt-style parser, and the resulting syntax
//! tree is evaluated directly against a scope stack.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
)]
#![allow(clippy::missing_errors_doc)]

use std::io::{BufRead, Write};

use crate::interpreter::{
    evaluator::core::Evaluator,
    lexer::tokenize,
    parser::statement::parse_program,
};

/// Defines the structure of parsed code.
///
/// This module declares the `Node` enum and related types that represent
/// the syntactic structure of source code as a tree. The AST is built by
/// the parser and walked by the evaluator.
///
/// # Responsibilities
/// - Defines node types for all language constructs.
/// - Attaches source lines to nodes for error reporting.
/// - Declares the operator enums and the builtin-function table.
pub mod ast;
/// Provides unified error types for parsing and evaluation.
///
/// This module defines all errors that can be raised while lexing,
/// parsing, or evaluating code. It standardizes error reporting and
/// carries the source line of each failure.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, parser, evaluator).
/// - Attaches line numbers and detailed messages for context.
/// - Supports integration with standard error handling traits.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, evaluation, value
/// representations and error handling to provide a complete runtime for
/// script execution.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, evaluator, values.
/// - Provides the entry points for interpreting programs.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;
/// General utilities for safe numeric conversion.
///
/// # Responsibilities
/// - Safely convert the language's doubles into index types.
pub mod util;

/// Interprets a whole script read from `reader`, writing its output (and
/// any error message) to `writer`.
///
/// The reader is consumed to end of input to obtain the source text,
/// then the program is lexed, parsed, and evaluated. Any remaining input
/// on the reader is what the script's `read` builtin consumes; when the
/// source was the whole stream, `read` yields empty lines.
///
/// On any lexer, parser, or evaluator error the human-readable message is
/// written to `writer` followed by a newline.
///
/// # Returns
/// `true` on clean completion, `false` on any error.
///
/// # Examples
/// ```
/// use std::io::Cursor;
///
/// use quill::interpret;
///
/// let mut output = Vec::new();
/// assert!(interpret(Cursor::new("print(2 + 2)"), &mut output));
/// assert_eq!(String::from_utf8(output).unwrap(), "4");
///
/// // An undefined variable aborts with a message.
/// let mut output = Vec::new();
/// assert!(!interpret(Cursor::new("print(x)"), &mut output));
/// ```
pub fn interpret<R: BufRead, W: Write>(mut reader: R, mut writer: W) -> bool {
    let mut source = String::new();
    if let Err(e) = reader.read_to_string(&mut source) {
        let _ = writeln!(writer, "I/O error: {e}.");
        return false;
    }

    match run(&source, &mut reader, &mut writer) {
        Ok(()) => true,
        Err(e) => {
            let _ = writeln!(writer, "{e}");
            false
        },
    }
}

/// Runs a script with distinct source text and input stream.
///
/// This is the lower-level entry point: the program comes from `source`
/// while the `read` builtin consumes lines from `input`. Process glue
/// that loads a script from a file and wires `read` to stdin goes through
/// here.
///
/// # Errors
/// Returns the first lexing, parsing, or runtime error; nothing is
/// written to `output` for the error itself.
///
/// # Examples
/// ```
/// use std::io::Cursor;
///
/// use quill::run;
///
/// let mut input = Cursor::new("world\n");
/// let mut output = Vec::new();
/// run("println(\"hello \" + read())", &mut input, &mut output).unwrap();
/// assert_eq!(String::from_utf8(output).unwrap(), "hello world\n");
/// ```
pub fn run(source: &str,
           input: &mut dyn BufRead,
           output: &mut dyn Write)
           -> Result<(), Box<dyn std::error::Error>> {
    let tokens = tokenize(source)?;
    let program = parse_program(&mut tokens.iter().peekable())?;

    let mut evaluator = Evaluator::new(input, output);
    evaluator.run(&program)?;
    Ok(())
}

/// Runs a script like [`run`], with a fixed seed for the `rnd` builtin.
///
/// Useful when a test needs the pseudo-random sequence to be
/// reproducible.
///
/// # Errors
/// Returns the first lexing, parsing, or runtime error.
pub fn run_seeded(source: &str,
                  input: &mut dyn BufRead,
                  output: &mut dyn Write,
                  seed: u64)
                  -> Result<(), Box<dyn std::error::Error>> {
    let tokens = tokenize(source)?;
    let program = parse_program(&mut tokens.iter().peekable())?;

    let mut evaluator = Evaluator::with_seed(input, output, seed);
    evaluator.run(&program)?;
    Ok(())
}
