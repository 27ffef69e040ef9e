#[derive(Debug)]
/// Represents all errors that can occur during evaluation.
pub enum RuntimeError {
    /// Tried to read an undefined variable.
    UnknownVariable {
        /// The name of the variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Called a name that is not bound to anything.
    UnknownFunction {
        /// The name of the function.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A value had a type incompatible with the operation.
    TypeMismatch {
        /// Details about the type mismatch.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// The wrong number of arguments was supplied to a call.
    ArgumentCountMismatch {
        /// How many arguments the callee accepts.
        expected: usize,
        /// How many arguments were supplied.
        found:    usize,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// Tried to access a list or string element outside the valid range.
    IndexOutOfBounds {
        /// The index that was requested.
        index: i64,
        /// The length of the indexed sequence.
        len:   usize,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// An argument value was invalid for the operation.
    InvalidArgument {
        /// Details about why the argument is invalid.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// A node that is not an expression was evaluated for a value.
    UnknownExpression {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Writing to the output or reading from the input failed.
    Io {
        /// The underlying I/O error message.
        details: String,
    },
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownVariable { name, line } => {
                write!(f, "Error on line {line}: Variable '{name}' not found.")
            },
            Self::UnknownFunction { name, line } => {
                write!(f, "Error on line {line}: Function '{name}' not found.")
            },
            Self::TypeMismatch { details, line } => {
                write!(f, "Error on line {line}: {details}.")
            },
            Self::ArgumentCountMismatch { expected, found, line } => write!(f,
                                                                            "Error on line {line}: Expected {expected} arguments, found {found}."),
            Self::IndexOutOfBounds { index, len, line } => write!(f,
                                                                  "Error on line {line}: Index {index} is out of range for length {len}."),
            Self::InvalidArgument { details, line } => {
                write!(f, "Error on line {line}: Invalid argument: {details}.")
            },
            Self::UnknownExpression { line } => {
                write!(f, "Error on line {line}: Expression is unknown.")
            },
            Self::Io { details } => write!(f, "I/O error: {details}."),
        }
    }
}

impl std::error::Error for RuntimeError {}
