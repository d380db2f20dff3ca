use pretty_assertions::assert_eq;
use prettify_core::{Range, RopeDocument};
use prettify_regex::{
    ConfigError, MatchEngine, PatternRule, PrettifyConfig, PrettyCursor, RevealStrategy,
};

#[test]
fn test_parse_full_config() {
    let config = PrettifyConfig::from_json_str(
        r#"{
            "substitutions": [
                { "ugly": "->", "pretty": "→", "pre": "\\s", "post": "\\s" },
                { "ugly": "lambda", "pretty": "λ" }
            ],
            "revealOn": "cursor-inner",
            "adjustCursorMovement": true,
            "prettyCursor": "none",
            "hideTextMethod": "font"
        }"#,
    )
    .unwrap();

    assert_eq!(
        config.substitutions,
        vec![
            PatternRule::new("->", "→").with_pre(r"\s").with_post(r"\s"),
            PatternRule::new("lambda", "λ"),
        ]
    );
    assert_eq!(config.reveal_on, RevealStrategy::CursorInner);
    assert!(config.adjust_cursor_movement);
    assert_eq!(config.pretty_cursor, PrettyCursor::None);
}

#[test]
fn test_defaults() {
    let config = PrettifyConfig::from_json_str("{}").unwrap();
    assert!(config.substitutions.is_empty());
    assert_eq!(config.reveal_on, RevealStrategy::Cursor);
    assert!(!config.adjust_cursor_movement);
    assert_eq!(config.pretty_cursor, PrettyCursor::Boxed);
}

#[test]
fn test_reveal_strategy_names() {
    for (name, expected) in [
        ("cursor", RevealStrategy::Cursor),
        ("cursor-inner", RevealStrategy::CursorInner),
        ("active-line", RevealStrategy::ActiveLine),
        ("selection", RevealStrategy::Selection),
        ("none", RevealStrategy::None),
    ] {
        let json = format!(r#"{{ "revealOn": "{name}" }}"#);
        let config = PrettifyConfig::from_json_str(&json).unwrap();
        assert_eq!(config.reveal_on, expected);
    }
}

#[test]
fn test_malformed_json_is_an_error() {
    let err = PrettifyConfig::from_json_str(r#"{ "revealOn": "sometimes" }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)));
}

#[test]
fn test_missing_file_is_an_error() {
    let err = PrettifyConfig::from_path("/nonexistent/prettify.json").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_rule_set_skips_invalid_substitutions() {
    let config = PrettifyConfig::from_json_str(
        r#"{ "substitutions": [
            { "ugly": "(", "pretty": "?" },
            { "ugly": "x*", "pretty": "?" },
            { "ugly": "->", "pretty": "→" }
        ] }"#,
    )
    .unwrap();

    let rules = config.rule_set();
    assert_eq!(rules.len(), 1);
    assert_eq!(rules.rule(0).map(|r| r.source_index()), Some(2));

    let doc = RopeDocument::from_text("a -> b");
    let mut engine = MatchEngine::new(rules);
    engine.full_scan(&doc);
    assert_eq!(engine.ranges(), &[Range::on_line(0, 2, 4)]);
}
