use formula_rs::Formula;
use std::collections::HashMap;

fn main() {
    pretty_env_logger::init();

    let contexts = vec![
        HashMap::from([
            ("price".to_string(), 120.0),
            ("volume".to_string(), 3000.0),
        ]),
        HashMap::from([
            ("price".to_string(), 80.0),
            ("volume".to_string(), 6000.0),
        ]),
        HashMap::from([("price".to_string(), 95.0)]),
    ];

    let formula = Formula::new("price * volume / 1000").unwrap();

    for (i, result) in formula.evaluate_batch(&contexts).iter().enumerate() {
        match result {
            Ok(value) => println!("Result {}: {}", i, value),
            Err(err) => println!("Result {}: error: {}", i, err),
        }
    }
}
