use routekey_core::{evaluate, parse_template, EvalError, Record, ResolveError, SyntaxError};
use serde_json::{json, Value};

fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("fixture must be an object, got {other}"),
    }
}

fn resolve_error(result: Result<String, EvalError>) -> ResolveError {
    match result {
        Err(EvalError::Resolve { source, .. }) => source,
        other => panic!("expected a resolve error, got {other:?}"),
    }
}

#[test]
fn nested_object_lookup() {
    let mut rec = record(json!({"a": {"b": 42}}));
    assert_eq!(evaluate(r#"$["a"]["b"]"#, ".", false, &mut rec).unwrap(), "42");
}

#[test]
fn array_index_lookup() {
    let mut rec = record(json!({"a": [10, 20]}));
    assert_eq!(evaluate(r#"$["a"][0]"#, ".", false, &mut rec).unwrap(), "10");
    assert_eq!(evaluate(r#"$["a"][1]"#, ".", false, &mut rec).unwrap(), "20");
}

#[test]
fn literals_and_accessors_are_joined_with_the_delimiter() {
    let mut rec = record(json!({"service": "billing", "level": "error"}));
    let key = evaluate(r#"logs.$["service"].$['level']"#, ".", false, &mut rec).unwrap();
    assert_eq!(key, "logs.billing.error");

    let key = evaluate(r#"logs::$["service"]"#, "::", false, &mut rec).unwrap();
    assert_eq!(key, "logs::billing");
}

#[test]
fn literal_only_template_renders_to_itself() {
    let mut rec = Record::new();
    assert_eq!(evaluate("a.b.c", ".", true, &mut rec).unwrap(), "a.b.c");
}

#[test]
fn scalars_render_in_their_textual_form() {
    let mut rec = record(json!({
        "s": "text",
        "i": -7,
        "f": 1.5,
        "t": true,
        "n": null,
        "arr": [1, "x"],
        "obj": {"k": "v"}
    }));
    let key = evaluate(
        r#"$["s"].$["i"].$["f"].$["t"].$["n"].$["arr"].$["obj"]"#,
        ".",
        false,
        &mut rec,
    )
    .unwrap();
    assert_eq!(key, r#"text.-7.1.5.true.null.[1,"x"].{"k":"v"}"#);
}

#[test]
fn mutate_removes_object_entry() {
    let mut rec = record(json!({"a": 1}));
    assert_eq!(evaluate(r#"$["a"]"#, ".", true, &mut rec).unwrap(), "1");
    assert!(rec.is_empty());
}

#[test]
fn mutate_removes_array_element_and_shifts() {
    let mut rec = record(json!({"arr": [1, 2, 3]}));
    assert_eq!(evaluate(r#"$["arr"][0]"#, ".", true, &mut rec).unwrap(), "1");
    assert_eq!(Value::Object(rec), json!({"arr": [2, 3]}));
}

#[test]
fn mutate_removes_only_the_leaf() {
    let mut rec = record(json!({"user": {"id": 7, "name": "ann"}}));
    assert_eq!(evaluate(r#"$["user"]["id"]"#, ".", true, &mut rec).unwrap(), "7");
    assert_eq!(Value::Object(rec), json!({"user": {"name": "ann"}}));
}

#[test]
fn repeated_accessor_is_memoized_under_mutation() {
    let mut rec = record(json!({"a": 5, "b": 1}));
    let key = evaluate(r#"$["a"].$["a"]"#, ".", true, &mut rec).unwrap();
    assert_eq!(key, "5.5");
    assert_eq!(Value::Object(rec), json!({"b": 1}));
}

#[test]
fn distinct_indices_into_one_array_observe_the_shift() {
    // `[0]` is removed first, so `[1]` then addresses what was originally `[2]`.
    let mut rec = record(json!({"arr": ["x", "y", "z"]}));
    let key = evaluate(r#"$["arr"][0].$["arr"][1]"#, ".", true, &mut rec).unwrap();
    assert_eq!(key, "x.z");
    assert_eq!(Value::Object(rec), json!({"arr": ["y"]}));
}

#[test]
fn index_out_of_bounds() {
    let mut rec = record(json!({"arr": [1]}));
    assert_eq!(
        resolve_error(evaluate(r#"$["arr"][1]"#, ".", false, &mut rec)),
        ResolveError::IndexOutOfBounds { index: 1, len: 1 }
    );
}

#[test]
fn quoted_key_against_array() {
    let mut rec = record(json!({"arr": [1, 2]}));
    assert_eq!(
        resolve_error(evaluate(r#"$["arr"]["x"]"#, ".", false, &mut rec)),
        ResolveError::RecordAccessorOnArray("x".to_string())
    );
}

#[test]
fn bare_index_against_object() {
    let mut rec = record(json!({"a": {"b": 1}}));
    assert_eq!(
        resolve_error(evaluate("$[0]", ".", false, &mut rec)),
        ResolveError::ArrayAccessorOnRecord(0)
    );
    assert_eq!(
        resolve_error(evaluate(r#"$["a"][0]"#, ".", false, &mut rec)),
        ResolveError::ArrayAccessorOnRecord(0)
    );
}

#[test]
fn missing_key() {
    let mut rec = record(json!({"a": {}}));
    let err = evaluate(r#"$["a"]["b"]"#, ".", false, &mut rec).unwrap_err();
    assert_eq!(
        err,
        EvalError::Resolve {
            segment: r#"$["a"]["b"]"#.to_string(),
            source: ResolveError::KeyNotFound("b".to_string()),
        }
    );
    assert!(err.to_string().contains(r#"$["a"]["b"]"#));
}

#[test]
fn scalar_in_the_middle_of_a_path() {
    let mut rec = record(json!({"a": "leaf", "arr": [3]}));
    assert_eq!(
        resolve_error(evaluate(r#"$["a"]["b"]"#, ".", false, &mut rec)),
        ResolveError::NotTraversable(r#"["a"]"#.to_string())
    );
    assert_eq!(
        resolve_error(evaluate(r#"$["arr"][0][0]"#, ".", false, &mut rec)),
        ResolveError::NotTraversable("[0]".to_string())
    );
}

#[test]
fn bare_sigil_is_an_empty_accessor() {
    let mut rec = record(json!({"a": 1}));
    assert_eq!(
        resolve_error(evaluate("x.$", ".", false, &mut rec)),
        ResolveError::EmptyAccessor
    );
}

#[test]
fn malformed_accessor_is_a_syntax_error() {
    let mut rec = record(json!({"a": 1}));
    assert_eq!(
        evaluate("$[a]", ".", false, &mut rec),
        Err(EvalError::Syntax(SyntaxError::InvalidAccessor("$[a]".to_string())))
    );
}

#[test]
fn failure_after_mutation_returns_no_key() {
    let mut rec = record(json!({"a": 1, "b": 2}));
    let result = evaluate(r#"$["a"].$["missing"]"#, ".", true, &mut rec);
    assert_eq!(
        result,
        Err(EvalError::Resolve {
            segment: r#"$["missing"]"#.to_string(),
            source: ResolveError::KeyNotFound("missing".to_string()),
        })
    );
    // Values removed before the failure stay removed.
    assert_eq!(rec, record(json!({"b": 2})));
}

#[test]
fn keys_with_non_ascii_whitespace_resolve() {
    let mut rec = record(json!({"a\u{A0}b": "x", "c\u{0B}d": "y"}));
    assert_eq!(
        evaluate("$[\"a\u{A0}b\"].$['c\u{0B}d']", ".", false, &mut rec).unwrap(),
        "x.y"
    );
}

#[test]
fn evaluation_without_mutation_is_idempotent() {
    let original = record(json!({"a": {"b": [1, {"c": "d"}]}, "e": true}));
    let mut rec = original.clone();
    let template = r#"$["a"]["b"][1]["c"].$["e"].$["a"]["b"][0]"#;
    let first = evaluate(template, ".", false, &mut rec).unwrap();
    let second = evaluate(template, ".", false, &mut rec).unwrap();
    assert_eq!(first, "d.true.1");
    assert_eq!(first, second);
    assert_eq!(rec, original);
}

#[test]
fn compiled_template_matches_raw_evaluation() {
    let template = r#"svc.$["k8s"]["labels"]['app'].$["tags"][1]"#;
    let tpl = parse_template(template, ".").unwrap();
    let fixture = record(json!({
        "k8s": {"labels": {"app": "api"}},
        "tags": ["a", "b", "c"]
    }));

    let mut raw = fixture.clone();
    let mut compiled = fixture;
    assert_eq!(
        tpl.evaluate(&mut compiled, true).unwrap(),
        evaluate(template, ".", true, &mut raw).unwrap()
    );
    assert_eq!(raw, compiled);
}

#[test]
fn integral_floats_render_without_a_fraction() {
    let mut rec = record(json!({"f": 2.0, "g": 1.5, "i": -3}));
    assert_eq!(
        evaluate(r#"$["f"].$["g"].$["i"]"#, ".", false, &mut rec).unwrap(),
        "2.1.5.-3"
    );
}
