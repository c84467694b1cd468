use std::fmt;
use thiserror::Error;

/// Token category a position in a formula requires.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Expected {
    /// A number, a variable or `(`.
    Operand,
    /// One of `+ - * /`, or `)`.
    OperatorOrClose,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Operand => write!(f, "a number, a variable or '('"),
            Expected::OperatorOrClose => write!(f, "an operator or ')'"),
        }
    }
}

/// Raised while building a [`Formula`](crate::Formula). A formula that fails
/// with one of these can never be evaluated, whatever the variable bindings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("formula is empty")]
    Empty,

    #[error("formula contains no tokens")]
    NoTokens,

    #[error("formula cannot start with '{token}': expected a number, a variable or '('")]
    InvalidStart { token: String },

    #[error("formula cannot end with '{token}': expected a number, a variable or ')'")]
    InvalidEnd { token: String },

    #[error("'{token}' at token {position} cannot follow '{previous}': expected {expected}")]
    UnexpectedToken {
        token: String,
        previous: String,
        position: usize,
        expected: Expected,
    },

    #[error("')' at token {position} has no matching '('")]
    UnmatchedClosingParen { position: usize },

    #[error("{count} '(' left unclosed")]
    UnclosedParen { count: usize },

    #[error("invalid variable name '{0}'")]
    InvalidVariable(String),

    #[error("normalizer produced an invalid variable name: '{raw}' became '{normalized}'")]
    InvalidNormalizedVariable { raw: String, normalized: String },

    #[error("variable rejected by validity predicate: '{0}'")]
    RejectedVariable(String),

    #[error("invalid number literal '{0}'")]
    InvalidNumber(String),

    #[error("unrecognized token '{0}'")]
    UnrecognizedToken(String),
}

/// Outcome of an evaluation that could not produce a number. Unlike
/// [`FormatError`], the same formula may succeed under another lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaError {
    #[error("undefined variable '{name}'")]
    UndefinedVariable { name: String },

    #[error("division by zero")]
    DivideByZero,

    #[error("not enough operands for '{operator}'")]
    StackUnderflow { operator: char },

    #[error("mismatched parenthesis")]
    MismatchedParenthesis,

    #[error("malformed result: {operands} operand(s) and {operators} operator(s) left")]
    MalformedResult { operands: usize, operators: usize },
}

impl FormulaError {
    /// Human-readable reason, as shown to the end user of a host application.
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

/// Either failure of the one-shot [`evaluate_expression`](crate::evaluate_expression).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    #[error("evaluation error: {0}")]
    Formula(#[from] FormulaError),
}
