use crate::error::{Expected, FormatError};
use crate::formula::tokenizer::{is_variable_name, Lexeme, LexemeKind, Tokenizer};
use crate::formula::{Formula, Operator, Token};
use log::debug;
use std::collections::HashSet;
use std::fmt::Write;
use std::str::FromStr;

impl Formula {
    /// Builds a formula with variables taken as written.
    ///
    /// # Errors
    ///
    /// Returns a [`FormatError`] naming the first violated rule if `text` is
    /// not a well-formed formula.
    pub fn new(text: &str) -> Result<Self, FormatError> {
        Self::with_normalizer(text, |name| name.to_string(), |_| true)
    }

    /// Builds a formula, passing every variable through `normalize` and then
    /// checking it with `is_valid`.
    ///
    /// Both the raw and the normalized name must have the shape of a variable
    /// (a letter or underscore followed by letters, digits or underscores),
    /// and `is_valid` must accept the normalized name. The formula stores and
    /// later looks up the normalized names only.
    pub fn with_normalizer<N, V>(
        text: &str,
        normalize: N,
        is_valid: V,
    ) -> Result<Self, FormatError>
    where
        N: Fn(&str) -> String,
        V: Fn(&str) -> bool,
    {
        debug!("Building formula: {:?}", text);
        if text.is_empty() {
            return Err(FormatError::Empty);
        }

        let lexemes: Vec<Lexeme> = Tokenizer::new(text).collect();
        let (Some(first), Some(last)) = (lexemes.first(), lexemes.last()) else {
            return Err(FormatError::NoTokens);
        };
        if !begins_operand(first.kind) {
            return Err(FormatError::InvalidStart {
                token: first.text.to_string(),
            });
        }
        if !ends_operand(last.kind) {
            return Err(FormatError::InvalidEnd {
                token: last.text.to_string(),
            });
        }

        let mut tokens = Vec::with_capacity(lexemes.len());
        let mut variables = HashSet::new();
        let mut depth = 0usize;
        let mut previous: Option<&Lexeme> = None;

        for (position, lexeme) in lexemes.iter().enumerate() {
            if let Some(previous) = previous {
                check_adjacent(previous, lexeme, position)?;
            }

            let token = match lexeme.kind {
                LexemeKind::LeftParen => {
                    depth += 1;
                    Token::LeftParen
                }
                LexemeKind::RightParen => {
                    depth = depth
                        .checked_sub(1)
                        .ok_or(FormatError::UnmatchedClosingParen { position })?;
                    Token::RightParen
                }
                LexemeKind::Operator => Operator::try_from(lexeme.text)
                    .map(Token::Operator)
                    .map_err(|_| FormatError::UnrecognizedToken(lexeme.text.to_string()))?,
                LexemeKind::Number => Token::Number(parse_number(lexeme.text)?),
                LexemeKind::Identifier => {
                    let name = normalize_variable(lexeme.text, &normalize, &is_valid)?;
                    variables.insert(name.clone());
                    Token::Variable(name)
                }
                LexemeKind::Unrecognized => {
                    return Err(FormatError::UnrecognizedToken(lexeme.text.to_string()));
                }
            };

            tokens.push(token);
            previous = Some(lexeme);
        }

        if depth > 0 {
            return Err(FormatError::UnclosedParen { count: depth });
        }

        let mut canonical = String::with_capacity(text.len());
        for token in &tokens {
            // writing into a String cannot fail
            let _ = write!(canonical, "{token}");
        }
        debug!("Canonical formula: {}", canonical);

        Ok(Formula {
            tokens,
            canonical,
            variables,
        })
    }
}

impl FromStr for Formula {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Formula::new(s)
    }
}

/// Lexemes that can start an operand: a number, a variable or `(`.
fn begins_operand(kind: LexemeKind) -> bool {
    matches!(
        kind,
        LexemeKind::Number | LexemeKind::Identifier | LexemeKind::LeftParen
    )
}

/// Lexemes that can end an operand: a number, a variable or `)`.
fn ends_operand(kind: LexemeKind) -> bool {
    matches!(
        kind,
        LexemeKind::Number | LexemeKind::Identifier | LexemeKind::RightParen
    )
}

fn check_adjacent(previous: &Lexeme, current: &Lexeme, position: usize) -> Result<(), FormatError> {
    // unrecognized lexemes are reported by the main scan instead
    if previous.kind == LexemeKind::Unrecognized || current.kind == LexemeKind::Unrecognized {
        return Ok(());
    }

    let (allowed, expected) = if ends_operand(previous.kind) {
        (
            matches!(current.kind, LexemeKind::Operator | LexemeKind::RightParen),
            Expected::OperatorOrClose,
        )
    } else {
        (begins_operand(current.kind), Expected::Operand)
    };

    if allowed {
        Ok(())
    } else {
        Err(FormatError::UnexpectedToken {
            token: current.text.to_string(),
            previous: previous.text.to_string(),
            position,
            expected,
        })
    }
}

fn parse_number(text: &str) -> Result<f64, FormatError> {
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(FormatError::InvalidNumber(text.to_string())),
    }
}

fn normalize_variable<N, V>(raw: &str, normalize: &N, is_valid: &V) -> Result<String, FormatError>
where
    N: Fn(&str) -> String,
    V: Fn(&str) -> bool,
{
    if !is_variable_name(raw) {
        return Err(FormatError::InvalidVariable(raw.to_string()));
    }

    let normalized = normalize(raw);
    if !is_variable_name(&normalized) {
        return Err(FormatError::InvalidNormalizedVariable {
            raw: raw.to_string(),
            normalized,
        });
    }
    if !is_valid(&normalized) {
        return Err(FormatError::RejectedVariable(normalized));
    }

    Ok(normalized)
}
