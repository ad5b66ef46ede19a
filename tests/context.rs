use std::collections::HashMap;

use quell::{
    error::EvalError,
    vm::{
        context::{ContextReader, ContextWriter, FormContext, RowScanner, RowWriter,
                  SimpleContext},
        value::Value,
    },
};

fn row(bindings: &[(&str, Value)]) -> HashMap<String, Value> {
    bindings.iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
}

#[test]
fn put_and_get_round_trip() {
    let mut ctx = SimpleContext::new();
    ctx.put(&"name", None, Value::from("alice")).unwrap();

    assert_eq!(ctx.get("name"), Some(Value::from("alice")));
    assert_eq!(ctx.get("other"), None);
    assert_eq!(ctx.row().len(), 1);
}

#[test]
fn commit_promotes_the_buffer_and_clears_it() {
    let mut ctx = SimpleContext::new();
    ctx.put(&"a", None, Value::Int(1)).unwrap();
    ctx.commit().unwrap();

    assert!(ctx.data.is_empty());
    assert_eq!(ctx.rows.len(), 1);
    assert_eq!(ctx.rows[0].get("a"), Some(&Value::Int(1)));
}

#[test]
fn delete_match_removes_all_matching_rows() {
    let mut ctx = SimpleContext::new();
    ctx.put(&"a", None, Value::Int(1)).unwrap();
    ctx.commit().unwrap();
    ctx.put(&"a", None, Value::Int(2)).unwrap();
    ctx.commit().unwrap();

    ctx.delete_match(&row(&[("a", Value::Int(1))]));

    assert_eq!(ctx.rows.len(), 1);
    assert_eq!(ctx.rows[0].get("a"), Some(&Value::Int(2)));
}

#[test]
fn delete_removes_only_the_first_match() {
    let mut ctx = SimpleContext::new();
    ctx.insert(row(&[("a", Value::Int(1)), ("b", Value::Int(10))]));
    ctx.insert(row(&[("a", Value::Int(1)), ("b", Value::Int(20))]));
    ctx.insert(row(&[("a", Value::Int(2))]));

    ctx.delete(&row(&[("a", Value::Int(1))])).unwrap();

    assert_eq!(ctx.rows.len(), 2);
    assert_eq!(ctx.rows[0].get("b"), Some(&Value::Int(20)));
    assert_eq!(ctx.rows[1].get("a"), Some(&Value::Int(2)));
}

#[test]
fn delete_handles_a_match_at_the_head_of_a_single_row_log() {
    let mut ctx = SimpleContext::new();
    ctx.insert(row(&[("a", Value::Int(1))]));

    ctx.delete(&row(&[("a", Value::Int(1))])).unwrap();
    assert!(ctx.rows.is_empty());

    // Deleting from the now-empty log is still a success.
    ctx.delete(&row(&[("a", Value::Int(1))])).unwrap();
    assert!(ctx.rows.is_empty());
}

#[test]
fn delete_ignores_rows_missing_a_criterion_key() {
    let mut ctx = SimpleContext::new();
    ctx.insert(row(&[("a", Value::Int(1))]));

    ctx.delete(&row(&[("a", Value::Int(1)), ("b", Value::Int(2))])).unwrap();
    assert_eq!(ctx.rows.len(), 1);

    ctx.delete_match(&row(&[("b", Value::Int(2))]));
    assert_eq!(ctx.rows.len(), 1);
}

#[test]
fn scanning_yields_committed_rows_then_stops() {
    let mut ctx = SimpleContext::new();
    ctx.insert(row(&[("n", Value::Int(1))]));
    ctx.insert(row(&[("n", Value::Int(2))]));

    let first = ctx.next_row().unwrap();
    assert_eq!(first.get("n"), Some(&Value::Int(1)));
    // The scanned row becomes the current row.
    assert_eq!(ctx.get("n"), Some(Value::Int(1)));

    let second = ctx.next_row().unwrap();
    assert_eq!(second.get("n"), Some(&Value::Int(2)));

    assert!(ctx.next_row().is_none());
    assert!(ctx.next_row().is_none());
}

#[test]
fn form_values_read_one_or_many() {
    let ctx = FormContext::from_query("?x=a&x=b");
    assert_eq!(ctx.get("x"),
               Some(Value::from(vec!["a".to_string(), "b".to_string()])));

    let ctx = FormContext::from_query("x=a");
    assert_eq!(ctx.get("x"), Some(Value::from("a")));
    assert_eq!(ctx.get("y"), None);
}

#[test]
fn form_row_maps_every_key() {
    let ctx = FormContext::from_query("x=a&x=b&limit=10");
    let row = ctx.row();

    assert_eq!(row.len(), 2);
    assert_eq!(row.get("limit"), Some(&Value::from("10")));
    assert!(matches!(row.get("x"), Some(Value::Strings(_))));
}

#[test]
fn form_put_stores_strings_and_numbers_as_text() {
    let mut ctx = FormContext::from_query("");
    ctx.put(&"s", None, Value::from("hello")).unwrap();
    ctx.put(&"n", None, Value::Number(2.5)).unwrap();
    // Unsupported variants are ignored, not errors.
    ctx.put(&"b", None, Value::Bool(true)).unwrap();

    assert_eq!(ctx.get("s"), Some(Value::from("hello")));
    assert_eq!(ctx.get("n"), Some(Value::from("2.5")));
    assert_eq!(ctx.get("b"), None);
}

#[test]
fn form_delete_is_not_implemented() {
    let mut ctx = FormContext::from_query("x=a");
    let err = ctx.delete(&HashMap::new()).unwrap_err();
    assert!(matches!(err, EvalError::NotImplemented { .. }));
}

#[test]
fn timestamps_are_attributed_to_rows() {
    let ts = chrono::DateTime::from_timestamp(1_600_000_000, 0).unwrap();
    let ctx = SimpleContext::with_ts(HashMap::new(), ts);
    assert_eq!(ctx.ts(), ts);

    let form = FormContext::with_ts(HashMap::new(), ts);
    assert_eq!(form.ts(), ts);
}
