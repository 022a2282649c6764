use routekey_core::config::parse_bool;
use routekey_core::{
    load_config_str, ConfigError, ConfigFormat, EvalError, Properties, Record, ResolveError,
    RoutingConfig, RoutingDecision, RoutingError, RoutingPolicy, SyntaxError,
};
use serde_json::json;

fn record(value: serde_json::Value) -> Record {
    value.as_object().cloned().unwrap()
}

#[test]
fn yaml_config_uses_defaults() {
    let loaded = load_config_str::<RoutingConfig>(
        r#"template: 'logs.$["level"]'"#,
        ConfigFormat::Auto,
    )
    .unwrap();
    assert_eq!(loaded.format, ConfigFormat::Yaml);
    assert_eq!(loaded.config.delimiter, ".");
    assert_eq!(loaded.config.default_value, None);
    assert!(!loaded.config.error_on_empty);
    assert!(!loaded.config.remove_values);
}

#[test]
fn json_config_is_detected() {
    let loaded = load_config_str::<RoutingConfig>(
        r#"{ "template": "a|$[\"b\"]", "delimiter": "|", "remove_values": true }"#,
        ConfigFormat::Auto,
    )
    .unwrap();
    assert_eq!(loaded.format, ConfigFormat::Json);
    assert_eq!(loaded.config.delimiter, "|");
    assert!(loaded.config.remove_values);
}

#[test]
fn malformed_config_reports_the_parser_error() {
    let err = load_config_str::<RoutingConfig>("{ not json", ConfigFormat::Json).unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)));
}

#[test]
fn compile_rejects_invalid_templates() {
    let err = RoutingConfig::new(r#"logs.$["a"]x"#).compile().unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Template(SyntaxError::InvalidAccessor(ref s)) if s == r#"$["a"]x"#
    ));
}

#[test]
fn empty_delimiter_falls_back_to_dot() {
    let mut cfg = RoutingConfig::new(r#"a.$["b"]"#);
    cfg.delimiter = String::new();
    let routing = cfg.compile().unwrap();
    assert_eq!(routing.template().delimiter(), ".");
}

#[test]
fn compiled_routing_removes_values_when_configured() {
    let mut cfg = RoutingConfig::new(r#"app.$["svc"]"#);
    cfg.remove_values = true;
    let routing = cfg.compile().unwrap();

    let mut rec = record(json!({"svc": "api", "msg": "hi"}));
    assert_eq!(
        routing.route(&mut rec).unwrap(),
        RoutingDecision::Route("app.api".to_string())
    );
    assert_eq!(rec, record(json!({"msg": "hi"})));
}

#[test]
fn properties_are_read_case_insensitively() {
    let props: Properties = [
        ("routingkey", r#"$["a"]|x"#),
        ("RoutingKeyDelimiter", "|"),
        ("ROUTINGKEYDEFAULTVALUE", "fallback"),
        ("RoutingKeyErrorOnEmpty", "True"),
        ("RemoveRkValuesFromRecord", "0"),
    ]
    .into_iter()
    .collect();

    let cfg = RoutingConfig::from_properties(&props).unwrap();
    assert_eq!(cfg.template, r#"$["a"]|x"#);
    assert_eq!(cfg.delimiter, "|");
    assert_eq!(cfg.default_value.as_deref(), Some("fallback"));
    assert!(cfg.error_on_empty);
    assert!(!cfg.remove_values);
}

#[test]
fn properties_require_a_template_and_valid_flags() {
    let props: Properties = [("RoutingKeyDelimiter", ".")].into_iter().collect();
    assert!(matches!(
        RoutingConfig::from_properties(&props),
        Err(ConfigError::Missing(ref k)) if k == "RoutingKey"
    ));

    let props: Properties = [("RoutingKey", "a"), ("RoutingKeyErrorOnEmpty", "yes")]
        .into_iter()
        .collect();
    assert!(matches!(
        RoutingConfig::from_properties(&props),
        Err(ConfigError::InvalidBool { ref key, ref value })
            if key == "RoutingKeyErrorOnEmpty" && value == "yes"
    ));
}

#[test]
fn bool_spellings() {
    for v in ["1", "t", "T", "TRUE", "true", "True"] {
        assert!(parse_bool("k", v).unwrap());
    }
    for v in ["0", "f", "F", "FALSE", "false", "False"] {
        assert!(!parse_bool("k", v).unwrap());
    }
    assert!(parse_bool("k", "tRuE").is_err());
    assert!(parse_bool("k", "").is_err());
}

fn missing_key() -> EvalError {
    EvalError::Resolve {
        segment: r#"$["a"]"#.to_string(),
        source: ResolveError::KeyNotFound("a".to_string()),
    }
}

#[test]
fn policy_passes_non_empty_keys_through() {
    let policy = RoutingPolicy {
        default_value: Some("default".to_string()),
        error_on_empty: true,
    };
    assert_eq!(
        policy.apply(Ok("key".to_string())).unwrap(),
        RoutingDecision::Route("key".to_string())
    );
}

#[test]
fn policy_substitutes_default_for_empty_and_failed_keys() {
    let policy = RoutingPolicy {
        default_value: Some("default".to_string()),
        error_on_empty: true,
    };
    assert_eq!(
        policy.apply(Ok(String::new())).unwrap(),
        RoutingDecision::Route("default".to_string())
    );
    assert_eq!(
        policy.apply(Err(missing_key())).unwrap(),
        RoutingDecision::Route("default".to_string())
    );
}

#[test]
fn policy_fails_on_empty_when_configured() {
    let policy = RoutingPolicy {
        default_value: None,
        error_on_empty: true,
    };
    assert_eq!(policy.apply(Ok(String::new())), Err(RoutingError::EmptyKey));
    assert_eq!(
        policy.apply(Err(missing_key())),
        Err(RoutingError::Unresolved(missing_key()))
    );
}

#[test]
fn policy_skips_otherwise() {
    let policy = RoutingPolicy::default();
    assert_eq!(
        policy.apply(Ok(String::new())).unwrap(),
        RoutingDecision::Skip { cause: None }
    );
    assert_eq!(
        policy.apply(Err(missing_key())).unwrap(),
        RoutingDecision::Skip {
            cause: Some(missing_key())
        }
    );
}
