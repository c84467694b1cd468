pub mod error;
pub mod formula;

use std::collections::HashMap;

pub use error::{Error, Expected, FormatError, FormulaError};
pub use formula::{is_variable_name, tokenize, Formula, Lookup, Operator, Token};

/// Builds `expression` with variables taken as written and evaluates it once
/// against `context`.
///
/// Prefer building a [`Formula`] and keeping it around when the same
/// expression is evaluated repeatedly.
pub fn evaluate_expression(
    expression: &str,
    context: &HashMap<String, f64>,
) -> Result<f64, Error> {
    let formula = Formula::new(expression)?;
    Ok(formula.evaluate(context)?)
}
