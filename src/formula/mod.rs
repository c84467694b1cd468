use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

mod builder;
mod evaluator;
mod tokenizer;

pub use evaluator::Lookup;
pub use tokenizer::{is_variable_name, tokenize, Lexeme, LexemeKind, Tokenizer};

/// One of the four binary operators.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
        }
    }

    /// `*` and `/` bind tighter than `+` and `-`.
    pub fn is_multiplicative(&self) -> bool {
        matches!(self, Operator::Multiply | Operator::Divide)
    }
}

impl TryFrom<&str> for Operator {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "+" => Ok(Operator::Add),
            "-" => Ok(Operator::Subtract),
            "*" => Ok(Operator::Multiply),
            "/" => Ok(Operator::Divide),
            _ => Err(format!("Unknown operator: {}", value)),
        }
    }
}

/// A canonical token of a validated formula.
///
/// Numbers are always finite and non-negative, variables are stored in their
/// normalized form.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Variable(String),
    Operator(Operator),
    LeftParen,
    RightParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{n}"),
            Token::Variable(name) => write!(f, "{name}"),
            Token::Operator(op) => write!(f, "{}", op.symbol()),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
        }
    }
}

/// An immutable, validated infix arithmetic formula.
///
/// Built once through [`Formula::new`] or [`Formula::with_normalizer`], then
/// evaluated any number of times against a [`Lookup`]. Equality compares the
/// canonical token sequences, so `2.0 + x` and `2.000+x` are the same formula.
#[derive(Debug, Clone)]
pub struct Formula {
    tokens: Vec<Token>,
    canonical: String,
    variables: HashSet<String>,
}

impl Formula {
    /// The canonical tokens, in source order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Every distinct normalized variable name the formula references.
    pub fn variables(&self) -> impl Iterator<Item = &str> + '_ {
        self.variables.iter().map(String::as_str)
    }
}

impl PartialEq for Formula {
    fn eq(&self, other: &Self) -> bool {
        // number tokens compare by value, not by spelling
        self.tokens == other.tokens
    }
}

// Numbers are finite, so token equality is reflexive.
impl Eq for Formula {}

impl Hash for Formula {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}
