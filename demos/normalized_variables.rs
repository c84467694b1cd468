use formula_rs::{is_variable_name, tokenize, Formula};
use std::collections::BTreeMap;

/// Spreadsheet-style cell names: letters followed by digits.
fn is_cell_name(name: &str) -> bool {
    let letters = name.trim_end_matches(|c: char| c.is_ascii_digit());
    !letters.is_empty()
        && letters.len() < name.len()
        && letters.chars().all(|c| c.is_ascii_uppercase())
}

fn main() {
    pretty_env_logger::init();

    let text = "a1 + A1 * (b2 - c3) / 4";

    // dependency discovery needs no validation
    let references: Vec<&str> = tokenize(text).filter(|t| is_variable_name(t)).collect();
    println!("Raw references: {:?}", references);

    let formula = Formula::with_normalizer(text, |s| s.to_uppercase(), is_cell_name).unwrap();
    println!("Canonical form: {}", formula);

    let mut cells: Vec<&str> = formula.variables().collect();
    cells.sort_unstable();
    println!("Cells: {:?}", cells);

    let sheet = BTreeMap::from([
        ("A1".to_string(), 2.0),
        ("B2".to_string(), 10.0),
        ("C3".to_string(), 6.0),
    ]);
    println!("Value: {:?}", formula.evaluate(&sheet));

    match Formula::with_normalizer("A1 + total", |s| s.to_uppercase(), is_cell_name) {
        Ok(formula) => println!("Unexpectedly valid: {formula}"),
        Err(err) => println!("Rejected: {err}"),
    }
}
