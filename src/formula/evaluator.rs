use crate::error::FormulaError;
use crate::formula::{Formula, Operator, Token};
use log::{debug, trace};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};

/// Resolves a normalized variable name to its value. `None` means the
/// variable is undefined under the current bindings.
pub trait Lookup {
    fn lookup(&self, name: &str) -> Option<f64>;
}

impl<F> Lookup for F
where
    F: Fn(&str) -> Option<f64>,
{
    fn lookup(&self, name: &str) -> Option<f64> {
        self(name)
    }
}

impl Lookup for HashMap<String, f64> {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl Lookup for BTreeMap<String, f64> {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

/// Entries of the operator stack.
#[derive(Debug, Copy, Clone, PartialEq)]
enum Pending {
    Operator(Operator),
    LeftParen,
}

/// Two-stack operator precedence evaluation.
///
/// `*` and `/` are applied as soon as their right operand is known, `+` and
/// `-` when the next `+`, `-` or `)` arrives, so neither stack ever holds more
/// than one pending additive operator per parenthesis level.
struct Evaluator {
    operands: Vec<f64>,
    operators: Vec<Pending>,
}

impl Evaluator {
    fn new() -> Self {
        Self {
            operands: Vec::new(),
            operators: Vec::new(),
        }
    }

    fn run<L: Lookup + ?Sized>(
        mut self,
        tokens: &[Token],
        lookup: &L,
    ) -> Result<f64, FormulaError> {
        for token in tokens {
            trace!(
                "Token {token}, operands {:?}, operators {:?}",
                self.operands,
                self.operators
            );
            match token {
                Token::Number(value) => self.push_value(*value)?,
                Token::Variable(name) => {
                    let value = lookup
                        .lookup(name)
                        .ok_or_else(|| FormulaError::UndefinedVariable { name: name.clone() })?;
                    self.push_value(value)?;
                }
                Token::Operator(op) if op.is_multiplicative() => {
                    if self.operands.is_empty() {
                        return Err(FormulaError::StackUnderflow {
                            operator: op.symbol(),
                        });
                    }
                    self.operators.push(Pending::Operator(*op));
                }
                Token::Operator(op) => {
                    if self.operands.is_empty() {
                        return Err(FormulaError::StackUnderflow {
                            operator: op.symbol(),
                        });
                    }
                    self.collapse_additive()?;
                    self.operators.push(Pending::Operator(*op));
                }
                Token::LeftParen => self.operators.push(Pending::LeftParen),
                Token::RightParen => self.close_paren()?,
            }
        }

        self.finish()
    }

    /// Pushes a value, first applying a pending `*` or `/` to it.
    fn push_value(&mut self, value: f64) -> Result<(), FormulaError> {
        match self.operators.last() {
            Some(&Pending::Operator(op)) if op.is_multiplicative() => {
                self.operators.pop();
                let left = self.pop_operand(op)?;
                let result = apply(op, left, value)?;
                self.operands.push(result);
            }
            _ => self.operands.push(value),
        }
        Ok(())
    }

    /// Applies a pending `+` or `-` on top of the operator stack, if any.
    fn collapse_additive(&mut self) -> Result<(), FormulaError> {
        match self.operators.last() {
            Some(&Pending::Operator(op)) if !op.is_multiplicative() => {
                self.operators.pop();
                self.apply_top(op)
            }
            _ => Ok(()),
        }
    }

    fn close_paren(&mut self) -> Result<(), FormulaError> {
        self.collapse_additive()?;

        match self.operators.pop() {
            Some(Pending::LeftParen) => {}
            _ => return Err(FormulaError::MismatchedParenthesis),
        }

        match self.operators.last() {
            Some(&Pending::Operator(op)) if op.is_multiplicative() => {
                self.operators.pop();
                self.apply_top(op)
            }
            _ => Ok(()),
        }
    }

    /// Pops the right then the left operand and pushes `left op right`.
    fn apply_top(&mut self, op: Operator) -> Result<(), FormulaError> {
        let right = self.pop_operand(op)?;
        let left = self.pop_operand(op)?;
        let result = apply(op, left, right)?;
        self.operands.push(result);
        Ok(())
    }

    fn pop_operand(&mut self, op: Operator) -> Result<f64, FormulaError> {
        self.operands.pop().ok_or(FormulaError::StackUnderflow {
            operator: op.symbol(),
        })
    }

    fn finish(self) -> Result<f64, FormulaError> {
        let malformed = FormulaError::MalformedResult {
            operands: self.operands.len(),
            operators: self.operators.len(),
        };

        match (self.operators.as_slice(), self.operands.as_slice()) {
            ([], &[value]) => Ok(value),
            (&[Pending::Operator(op)], &[left, right]) if !op.is_multiplicative() => {
                apply(op, left, right)
            }
            _ => Err(malformed),
        }
    }
}

fn apply(op: Operator, left: f64, right: f64) -> Result<f64, FormulaError> {
    match op {
        Operator::Add => Ok(left + right),
        Operator::Subtract => Ok(left - right),
        Operator::Multiply => Ok(left * right),
        Operator::Divide => {
            if right == 0.0 {
                Err(FormulaError::DivideByZero)
            } else {
                Ok(left / right)
            }
        }
    }
}

impl Formula {
    /// Evaluates the formula, resolving each variable through `lookup`.
    ///
    /// Never panics: an undefined variable, a division by zero or any
    /// inconsistent stack state is reported as a [`FormulaError`]. The
    /// formula itself is not modified, so the same formula can be evaluated
    /// again under different bindings.
    pub fn evaluate<L: Lookup + ?Sized>(&self, lookup: &L) -> Result<f64, FormulaError> {
        let result = Evaluator::new().run(self.tokens(), lookup);
        debug!("Evaluated {} => {:?}", self, result);
        result
    }

    /// Evaluates the formula once per context, in parallel.
    ///
    /// Results are returned in the order of `contexts`.
    pub fn evaluate_batch<L: Lookup + Sync>(
        &self,
        contexts: &[L],
    ) -> Vec<Result<f64, FormulaError>> {
        contexts
            .par_iter()
            .map(|context| self.evaluate(context))
            .collect()
    }
}
