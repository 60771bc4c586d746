use thiserror::Error;

// ─────────────────────────────────────────────────────────────
// Line grammar violations
// ─────────────────────────────────────────────────────────────

/// Why a line is not a `[$name=]func(args);` statement.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Malformed {
    #[error("line does not end with `);`")]
    MissingTerminator,
    #[error("assignment target without `=`")]
    MissingAssignment,
    #[error("invalid assignment target `{0}`")]
    InvalidTarget(String),
    #[error("no `(` after the function name")]
    MissingOpenParen,
    #[error("invalid function name `{0}`")]
    InvalidFunctionName(String),
    #[error("unterminated string literal")]
    UnterminatedString,
}

// ─────────────────────────────────────────────────────────────
// Argument classification failures
// ─────────────────────────────────────────────────────────────

/// Classifier failure, not yet tied to a line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("undefined variable `${0}`")]
    UndefinedVariable(String),
    #[error("`{0}` is not a number")]
    NotANumber(String),
    #[error("unrecognised argument `{0}`")]
    UnknownShape(String),
}

impl ArgumentError {
    pub fn at(self, line: usize) -> ConvertError {
        match self {
            ArgumentError::UndefinedVariable(name) => ConvertError::UndefinedVariable { line, name },
            ArgumentError::NotANumber(token) => ConvertError::NotANumber { line, token },
            ArgumentError::UnknownShape(token) => ConvertError::UnknownArgumentShape { line, token },
        }
    }
}

// ─────────────────────────────────────────────────────────────
// Run-level error
// ─────────────────────────────────────────────────────────────

/// Error that halted a conversion. `line` is the 0-based input line index.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    #[error("line {line}: malformed statement: {reason}")]
    MalformedStatement { line: usize, reason: Malformed },
    #[error("line {line}: undefined variable `${name}`")]
    UndefinedVariable { line: usize, name: String },
    #[error("line {line}: `{token}` is not a number")]
    NotANumber { line: usize, token: String },
    #[error("line {line}: unrecognised argument `{token}`")]
    UnknownArgumentShape { line: usize, token: String },
}

impl ConvertError {
    pub fn line(&self) -> usize {
        match self {
            ConvertError::MalformedStatement { line, .. }
            | ConvertError::UndefinedVariable { line, .. }
            | ConvertError::NotANumber { line, .. }
            | ConvertError::UnknownArgumentShape { line, .. } => *line,
        }
    }

    /// Short machine-friendly name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ConvertError::MalformedStatement { .. } => "malformed_statement",
            ConvertError::UndefinedVariable { .. } => "undefined_variable",
            ConvertError::NotANumber { .. } => "not_a_number",
            ConvertError::UnknownArgumentShape { .. } => "unknown_argument_shape",
        }
    }
}
