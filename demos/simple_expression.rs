use formula_rs::Formula;
use log::debug;
use std::collections::HashMap;

fn main() {
    pretty_env_logger::init();

    let formula = Formula::new("(price - cost) * qty / 2.50").unwrap();
    debug!("variables: {:?}", formula.variables().collect::<Vec<_>>());
    println!("Canonical form: {}", formula);

    let context = HashMap::from([
        ("price".to_string(), 12.0),
        ("cost".to_string(), 7.0),
        ("qty".to_string(), 3.0),
    ]);
    match formula.evaluate(&context) {
        Ok(result) => println!("Result: {}", result),
        Err(err) => println!("Error: {}", err),
    }

    // same formula, unbound variable
    match formula.evaluate(&|_: &str| None) {
        Ok(result) => println!("Result: {}", result),
        Err(err) => println!("Error: {}", err.reason()),
    }

    for text in ["2 + * 3", "(1 + 2", "1 + 2)", "3 ^ 2"] {
        match Formula::new(text) {
            Ok(formula) => println!("{text} => {formula}"),
            Err(err) => println!("{text} => format error: {err}"),
        }
    }
}
