//! Error types for group expression parsing and evaluation.

use thiserror::Error;

/// Broad classification of an [`ExprError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed expression text.
    Syntax,
    /// A `.` suffix that is not in the command table.
    UnknownCommand,
    /// A file literal could not be read.
    Io,
    /// Evaluation was attempted against incomplete fetched data.
    Evaluation,
}

/// Errors that can occur while lexing, parsing or evaluating an expression.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExprError {
    /// No token pattern matches at this position.
    #[error("syntax error at position {position}: unexpected character '{character}'")]
    UnexpectedCharacter {
        /// The offending character.
        character: char,
        /// Byte offset of the character in the input.
        position: usize,
    },

    /// The parser required a token that is not present.
    #[error("syntax error at position {position}: expected {expected}, found {found}")]
    UnexpectedToken {
        /// What the grammar expected at this point.
        expected: String,
        /// Text of the token actually found.
        found: String,
        /// Byte offset of the found token.
        position: usize,
    },

    /// The word after `.` is not a known command.
    #[error("unknown command '{command}' at position {position} (expected followers or following)")]
    UnknownCommand {
        /// The unrecognized command word.
        command: String,
        /// Byte offset of the command word.
        position: usize,
    },

    /// A `<path>` literal named a file that could not be read.
    #[error("cannot read handle file '{path}': {message}")]
    Io {
        /// The path as written in the expression.
        path: String,
        /// The underlying I/O error message.
        message: String,
    },

    /// A line of a `<path>` file is not a valid handle.
    #[error("invalid handle '{handle}' on line {line} of '{path}'")]
    InvalidHandle {
        /// The path as written in the expression.
        path: String,
        /// One-based line number.
        line: usize,
        /// The trimmed line text.
        handle: String,
    },

    /// A primitive's data was not present when the tree was evaluated.
    #[error("no fetched data for '{cache_key}'")]
    UnresolvedPrimitive {
        /// Cache key of the primitive.
        cache_key: String,
    },
}

impl ExprError {
    /// Returns the broad kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExprError::UnexpectedCharacter { .. }
            | ExprError::UnexpectedToken { .. }
            | ExprError::InvalidHandle { .. } => ErrorKind::Syntax,
            ExprError::UnknownCommand { .. } => ErrorKind::UnknownCommand,
            ExprError::Io { .. } => ErrorKind::Io,
            ExprError::UnresolvedPrimitive { .. } => ErrorKind::Evaluation,
        }
    }
}

/// Result type for expression operations.
pub type ExprResult<T> = std::result::Result<T, ExprError>;
