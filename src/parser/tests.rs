//! Unit tests for the tokenizer and model builder

use crate::config::{CompileOptions, DuplicatePolicy};
use crate::parser::{build, parse_fsm, tokenize, ParseError, Statement};
use crate::validation::{AcceptAll, CIdentifier};

fn tokens_of(source: &str) -> Vec<Vec<String>> {
    tokenize(source)
        .expect("tokenizer never fails")
        .map(|s| s.tokens)
        .collect()
}

fn statement(line: usize, tokens: &[&str]) -> Statement {
    Statement {
        line,
        tokens: tokens.iter().map(|t| t.to_string()).collect(),
    }
}

#[test]
fn test_tokenize_statements_and_comments() {
    let source = "fsm data; # header\n\
                  idle go running start; # first ; not a statement\n\
                  running stop idle;";
    assert_eq!(
        tokens_of(source),
        vec![
            vec!["fsm", "data"],
            vec!["idle", "go", "running", "start"],
            vec!["running", "stop", "idle"],
        ]
    );
}

#[test]
fn test_tokenize_discards_separators_and_empty_statements() {
    let source = "a, b -> c (d);;  ; \n ;e";
    assert_eq!(tokens_of(source), vec![vec!["a", "b", "c", "d"]]);
}

#[test]
fn test_tokenize_multiline_statement_reports_first_line() {
    let source = "\n\n  # comment only\n  s1\n  ev\n  s2;";
    let statements: Vec<_> = tokenize(source).unwrap().collect();
    assert_eq!(statements, vec![statement(4, &["s1", "ev", "s2"])]);
}

#[test]
fn test_tokenize_drops_unterminated_tail() {
    assert_eq!(tokens_of("a b; c d e"), vec![vec!["a", "b"]]);
    assert!(tokens_of("").is_empty());
    assert!(tokens_of("# only a comment").is_empty());
}

#[test]
fn test_tokenize_is_restartable() {
    let source = "x y; a b c;";
    assert_eq!(tokens_of(source), tokens_of(source));
}

#[test]
fn test_build_header_and_transitions() {
    let statements = vec![
        statement(1, &["traffic", "light_t"]),
        statement(2, &["red", "timer", "green", "lamp_off", "lamp_on"]),
        statement(3, &["green", "timer", "red"]),
    ];
    let (fsm, data_type) = build(statements, &CompileOptions::default(), &AcceptAll).unwrap();

    assert_eq!(fsm.name, "traffic");
    assert_eq!(data_type, "light_t");
    assert_eq!(fsm.states().as_slice(), &["red".to_string(), "green".to_string()]);
    let t = fsm.transition("red", "timer").unwrap();
    assert_eq!(t.actions, vec!["lamp_off", "lamp_on"]);
    assert!(fsm.transition("green", "timer").unwrap().actions.is_empty());
}

#[test]
fn test_build_malformed_header() {
    let err = build(vec![statement(3, &["lonely"])], &CompileOptions::default(), &AcceptAll)
        .unwrap_err();
    assert!(matches!(err, ParseError::MalformedHeader { line: 3, found: 1 }));

    let err = build(Vec::<Statement>::new(), &CompileOptions::default(), &AcceptAll).unwrap_err();
    assert!(matches!(err, ParseError::MalformedHeader { found: 0, .. }));
}

#[test]
fn test_short_statement_skipped_when_lenient() {
    let source = "fsm data; a b; a ev c;";
    let (fsm, _) = parse_fsm(source, &CompileOptions::default(), &AcceptAll).unwrap();
    assert_eq!(fsm.transition_count(), 1);
    assert_eq!(fsm.states().len(), 2);
}

#[test]
fn test_short_statement_rejected_when_strict() {
    let source = "fsm data;\na ev c;\na b;";
    let options = CompileOptions {
        strict: true,
        ..CompileOptions::default()
    };
    let err = parse_fsm(source, &options, &AcceptAll).unwrap_err();
    assert!(matches!(err, ParseError::MalformedTransition { line: 3, found: 2 }));
}

#[test]
fn test_duplicate_overwrites_by_default() {
    let source = "fsm data; S e T1 a1; S e T2 a2;";
    let (fsm, _) = parse_fsm(source, &CompileOptions::default(), &AcceptAll).unwrap();
    let t = fsm.transition("S", "e").unwrap();
    assert_eq!(t.target, "T2");
    assert_eq!(t.actions, vec!["a2"]);
    assert_eq!(fsm.transition_count(), 1);
}

#[test]
fn test_duplicate_rejected_on_request() {
    let source = "fsm data;\nS e T1 a1;\nS e T2 a2;";
    let options = CompileOptions {
        duplicates: DuplicatePolicy::Reject,
        ..CompileOptions::default()
    };
    let err = parse_fsm(source, &options, &AcceptAll).unwrap_err();
    match err {
        ParseError::DuplicateTransition { state, event, line } => {
            assert_eq!(state, "S");
            assert_eq!(event, "e");
            assert_eq!(line, 3);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_validator_rejects_token_with_line() {
    let source = "fsm data;\nidle go running;\nrunning stop 2idle;";
    assert!(parse_fsm(source, &CompileOptions::default(), &AcceptAll).is_ok());

    let err = parse_fsm(source, &CompileOptions::default(), &CIdentifier).unwrap_err();
    match err {
        ParseError::InvalidIdentifier { token, line } => {
            assert_eq!(token, "2idle");
            assert_eq!(line, 3);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_validator_checks_header() {
    let source = "switch data; a b c;";
    let err = parse_fsm(source, &CompileOptions::default(), &CIdentifier).unwrap_err();
    assert!(matches!(err, ParseError::InvalidIdentifier { line: 1, .. }));
}
