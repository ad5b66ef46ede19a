use std::collections::HashMap;

use clap::Parser;
use quell::{
    eval_to_value,
    vm::{context::SimpleContext, value::Value},
};
use tracing_subscriber::EnvFilter;

/// quell evaluates an SQL-like expression against key=value bindings.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The expression to evaluate, e.g. 'age > 30 && name == "alice"'.
    expression: String,

    /// Row bindings as key=value pairs. Integer, float, and true/false
    /// literals are typed; everything else binds as a string.
    #[arg(short, long)]
    bind: Vec<String>,

    /// Print the JSON encoding of the result instead of its display form.
    #[arg(long)]
    json: bool,
}

fn main() {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env())
                             .init();

    let args = Args::parse();

    let mut data = HashMap::new();
    for binding in &args.bind {
        let Some((key, literal)) = binding.split_once('=') else {
            eprintln!("Invalid binding '{binding}'. Expected key=value.");
            std::process::exit(1);
        };
        data.insert(key.to_string(), parse_literal(literal));
    }

    let reader = SimpleContext::with_data(data);
    match eval_to_value(&args.expression, &reader) {
        Ok(value) => {
            if args.json {
                println!("{}", String::from_utf8_lossy(&value.json()));
            } else {
                println!("{value}");
            }
        },
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        },
    }
}

/// Types a binding literal: integer, float, boolean, or string.
fn parse_literal(literal: &str) -> Value {
    if let Ok(i) = literal.parse::<i64>() {
        return Value::Int(i);
    }
    if let Ok(f) = literal.parse::<f64>() {
        return Value::Number(f);
    }
    match literal {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::from(literal),
    }
}
