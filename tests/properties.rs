use formula_rs::{Formula, FormatError, FormulaError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeSet, HashMap};
use std::hash::{Hash, Hasher};

fn hash_of(formula: &Formula) -> u64 {
    let mut hasher = DefaultHasher::new();
    formula.hash(&mut hasher);
    hasher.finish()
}

/// Random well-formed expression over non-zero decimal literals.
fn random_expression(rng: &mut StdRng, depth: u32) -> String {
    if depth == 0 || rng.random_bool(0.3) {
        return format!(
            "{}.{}",
            rng.random_range(1..100),
            rng.random_range(0..10)
        );
    }

    let left = random_expression(rng, depth - 1);
    let right = random_expression(rng, depth - 1);
    let op = ["+", "-", "*", "/"][rng.random_range(0..4)];
    if rng.random_bool(0.4) {
        format!("({left} {op} {right})")
    } else {
        format!("{left} {op} {right}")
    }
}

#[test]
fn test_matches_reference_evaluator() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut compared = 0;

    for _ in 0..500 {
        let text = random_expression(&mut rng, 4);
        let formula = Formula::new(&text).unwrap();

        let ours = match formula.evaluate(&|_: &str| None) {
            Ok(value) => value,
            Err(FormulaError::DivideByZero) => continue,
            Err(e) => panic!("{text}: {e}"),
        };
        let reference = evalexpr::eval_float(&text).unwrap();

        let tolerance = 1e-9 * reference.abs().max(1.0);
        assert!(
            (ours - reference).abs() <= tolerance,
            "{text}: {ours} != {reference}"
        );
        compared += 1;
    }

    assert!(compared > 400);
}

#[test]
fn test_round_trip_random() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let text = random_expression(&mut rng, 5);
        let formula = Formula::new(&text).unwrap();
        let rebuilt = Formula::new(&formula.to_string()).unwrap();
        assert_eq!(formula, rebuilt, "{text}");
        assert_eq!(hash_of(&formula), hash_of(&rebuilt));
    }
}

#[test]
fn test_numeric_spelling_variants() {
    let a = Formula::new("2.0 + x7").unwrap();
    let b = Formula::new("2.000 + x7").unwrap();
    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));
    assert_eq!(a.to_string(), b.to_string());
}

#[test]
fn test_worked_examples() {
    let zero = |_: &str| Some(0.0);
    for (text, expected) in [
        ("2+6*3", 20.0),
        ("2*6+3", 15.0),
        ("(2+6)*3", 24.0),
        ("2+(3+5*9)", 50.0),
        ("2+3*5+(3+4*8)*5+2", 194.0),
    ] {
        assert_eq!(Formula::new(text).unwrap().evaluate(&zero), Ok(expected), "{text}");
    }
}

#[test]
fn test_evaluation_errors_are_values() {
    let formula = Formula::new("5/0").unwrap();
    assert_eq!(
        formula.evaluate(&|_: &str| None),
        Err(FormulaError::DivideByZero)
    );

    let formula = Formula::new("5/d").unwrap();
    let context = HashMap::from([("d".to_string(), 0.0)]);
    assert_eq!(formula.evaluate(&context), Err(FormulaError::DivideByZero));

    let formula = Formula::new("2+X1").unwrap();
    assert!(matches!(
        formula.evaluate(&|_: &str| None),
        Err(FormulaError::UndefinedVariable { name }) if name == "X1"
    ));
}

#[test]
fn test_unbalanced_parentheses() {
    assert!(matches!(
        Formula::new("2+5*7)"),
        Err(FormatError::UnmatchedClosingParen { .. })
    ));
    assert!(matches!(
        Formula::new("(2+3"),
        Err(FormatError::UnclosedParen { .. })
    ));
}

#[test]
fn test_normalization_collapsing() {
    let upper = |s: &str| s.to_uppercase();
    let formula = Formula::with_normalizer("x+X*z", upper, |_| true).unwrap();
    let variables: BTreeSet<&str> = formula.variables().collect();
    assert_eq!(variables, BTreeSet::from(["X", "Z"]));

    let formula = Formula::new("x+X*z").unwrap();
    let variables: BTreeSet<&str> = formula.variables().collect();
    assert_eq!(variables, BTreeSet::from(["X", "x", "z"]));
}

#[test]
fn test_tokenize_for_dependencies() {
    let references: BTreeSet<&str> = formula_rs::tokenize("A1 + B2 * (A1 - C3) / 2")
        .filter(|lexeme| formula_rs::is_variable_name(lexeme))
        .collect();
    assert_eq!(references, BTreeSet::from(["A1", "B2", "C3"]));
}
