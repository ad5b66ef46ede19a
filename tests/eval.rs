use std::collections::HashMap;

use quell::{
    eval_to_value,
    vm::{
        context::{ContextReader, SimpleContext},
        evaluator::Vm,
        value::Value,
    },
};

fn context(bindings: &[(&str, Value)]) -> SimpleContext {
    let data: HashMap<String, Value> = bindings.iter()
                                               .map(|(k, v)| ((*k).to_string(), v.clone()))
                                               .collect();
    SimpleContext::with_data(data)
}

fn assert_eval(expr: &str, ctx: &SimpleContext, expected: Value) {
    match eval_to_value(expr, ctx) {
        Ok(v) => assert_eq!(v, expected, "wrong result for `{expr}`"),
        Err(e) => panic!("`{expr}` failed: {e}"),
    }
}

fn assert_fails(expr: &str, ctx: &SimpleContext) {
    assert!(eval_to_value(expr, ctx).is_err(),
            "`{expr}` succeeded but was expected to fail");
}

#[test]
fn integer_arithmetic() {
    let ctx = SimpleContext::new();
    assert_eval("5 + 3", &ctx, Value::Int(8));
    assert_eval("7 * 9", &ctx, Value::Int(63));
    assert_eval("8 - 5", &ctx, Value::Int(3));
    assert_eval("10 / 2", &ctx, Value::Int(5));
    assert_eval("10 % 3", &ctx, Value::Int(1));
}

#[test]
fn mixed_arithmetic_promotes_to_number() {
    let ctx = SimpleContext::new();
    assert_eval("5 + 3.0", &ctx, Value::Number(8.0));
    assert_eval("2.5 * 2", &ctx, Value::Number(5.0));
    assert_eval("1.0 / 4", &ctx, Value::Number(0.25));
}

#[test]
fn division_identity_holds() {
    let ctx = SimpleContext::new();
    assert_eval("(7 / 2) * 2 + (7 % 2)", &ctx, Value::Int(7));
    assert_eval("(9 / 4) * 4 + (9 % 4)", &ctx, Value::Int(9));
    assert_eval("(100 / 7) * 7 + (100 % 7)", &ctx, Value::Int(100));
}

#[test]
fn division_by_zero_fails() {
    let ctx = SimpleContext::new();
    assert_fails("1 / 0", &ctx);
    assert_fails("1 % 0", &ctx);
}

#[test]
fn comparisons_against_context() {
    let ctx = context(&[("name", Value::from("alice")), ("age", Value::Int(25))]);
    assert_eval("name == \"alice\"", &ctx, Value::Bool(true));
    assert_eval("name != \"bob\"", &ctx, Value::Bool(true));
    assert_eval("age > 30", &ctx, Value::Bool(false));
    assert_eval("age <= 25", &ctx, Value::Bool(true));
}

#[test]
fn unary_operators() {
    let ctx = context(&[("isMember", Value::Bool(true))]);
    assert_eval("!isMember", &ctx, Value::Bool(false));
    assert_eval("!false", &ctx, Value::Bool(true));
    assert_eval("-5", &ctx, Value::Number(-5.0));
    assert_eval("-(2 + 3.5)", &ctx, Value::Number(-5.5));
}

#[test]
fn negating_a_non_boolean_fails() {
    let ctx = context(&[("age", Value::Int(25))]);
    assert_fails("!age", &ctx);
}

#[test]
fn boolean_logic() {
    let ctx = SimpleContext::new();
    assert_eval("true && true", &ctx, Value::Bool(true));
    assert_eval("true && false", &ctx, Value::Bool(false));
    assert_eval("false || true", &ctx, Value::Bool(true));
    assert_eval("true == false", &ctx, Value::Bool(false));
    assert_eval("true != false", &ctx, Value::Bool(true));
}

#[test]
fn numeric_logic_treats_zero_as_false() {
    let ctx = SimpleContext::new();
    assert_eval("1 && 2", &ctx, Value::Bool(true));
    assert_eval("1 && 0", &ctx, Value::Bool(false));
    assert_eval("0 || 0", &ctx, Value::Bool(false));
    assert_eval("2 or 0", &ctx, Value::Bool(true));
    assert_eval("1.5 && 0.1", &ctx, Value::Bool(true));
}

#[test]
fn numeric_strings_coerce() {
    let ctx = context(&[("price", Value::from("10"))]);
    assert_eval("price * 2", &ctx, Value::Number(20.0));
    assert_eval("price > 5", &ctx, Value::Bool(true));
}

#[test]
fn non_numeric_string_arithmetic_fails() {
    let ctx = context(&[("name", Value::from("alice"))]);
    assert_fails("name + 1", &ctx);
}

#[test]
fn nan_propagates_through_arithmetic() {
    let ctx = context(&[("x", Value::nan())]);
    let result = eval_to_value("x + 1", &ctx).unwrap();
    assert!(matches!(result, Value::Number(n) if n.is_nan()));

    let result = eval_to_value("x * 0", &ctx).unwrap();
    assert!(matches!(result, Value::Number(n) if n.is_nan()));
}

#[test]
fn missing_identity_fails_and_sink_is_untouched() {
    let vm = Vm::new("missing + 1").unwrap();
    let reader = SimpleContext::new();
    let mut sink = SimpleContext::new();

    assert!(vm.execute(&mut sink, &reader).is_err());
    assert_eq!(sink.get(""), None);
    assert!(sink.data.is_empty());
}

#[test]
fn logical_operators_do_not_short_circuit() {
    // Both operands are reduced before the operator fires, so an unbound
    // right side fails even when the left side alone would decide.
    let ctx = context(&[("x", Value::Int(5))]);
    assert_fails("x || missing", &ctx);
    assert_fails("0 && missing", &ctx);
}

#[test]
fn function_calls() {
    let ctx = context(&[("name", Value::from("alice"))]);
    assert_eval("len(\"hello\")", &ctx, Value::Int(5));
    assert_eval("upper(name)", &ctx, Value::from("ALICE"));
    assert_eval("lower(\"LOUD\")", &ctx, Value::from("loud"));
    assert_eval("contains(name, \"li\")", &ctx, Value::Bool(true));
    assert_eval("contains(name, \"z\")", &ctx, Value::Bool(false));
}

#[test]
fn function_results_compose() {
    let ctx = context(&[("name", Value::from("alice"))]);
    assert_eval("len(name) + 1", &ctx, Value::Int(6));
    assert_eval("len(upper(name)) == 5", &ctx, Value::Bool(true));
}

#[test]
fn function_declining_fails_the_call() {
    // `len` does not handle integers, and a missing identity argument
    // arrives as nil, which `len` does not handle either.
    let ctx = context(&[("age", Value::Int(25))]);
    assert_fails("len(age)", &ctx);
    assert_fails("len(missing)", &ctx);
}

#[test]
fn now_returns_the_row_timestamp() {
    let ts = chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap();
    let ctx = SimpleContext::with_ts(HashMap::new(), ts);
    assert_eval("now()", &ctx, Value::Time(ts));
}

#[test]
fn parse_errors_are_reported() {
    assert!(Vm::new("5 +").is_err());
    assert!(Vm::new("5 ~ 3").is_err());
    assert!(Vm::new("nosuchfunc(1)").is_err());
    assert!(Vm::new("len(1, 2)").is_err());
    assert!(Vm::new("5 5").is_err());
}

#[test]
fn machines_are_reusable_across_rows() {
    let vm = Vm::new("age > 30").unwrap();

    let over = context(&[("age", Value::Int(40))]);
    let mut sink = SimpleContext::new();
    vm.execute(&mut sink, &over).unwrap();
    assert_eq!(sink.get(""), Some(Value::Bool(true)));

    let under = context(&[("age", Value::Int(20))]);
    let mut sink = SimpleContext::new();
    vm.execute(&mut sink, &under).unwrap();
    assert_eq!(sink.get(""), Some(Value::Bool(false)));
}
