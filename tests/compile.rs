//! End-to-end tests: DSL text in, generated artifacts out

use cfsmgen::{compile, compile_with_validator, CIdentifier, CodegenTarget, CompileError, CompileOptions};

const TURNSTILE: &str = include_str!("../demos/turnstile.fsm");

#[test]
fn test_turnstile_model() {
    let out = compile(TURNSTILE, &CompileOptions::default()).unwrap();

    assert_eq!(out.fsm.name, "turnstile");
    assert_eq!(out.data_type, "gate_t");
    assert_eq!(out.fsm.states().as_slice(), &["locked".to_string(), "unlocked".to_string()]);
    assert_eq!(out.fsm.events().len(), 3);
    assert_eq!(
        out.fsm.actions().as_slice(),
        &["unlock", "count_coin", "alarm", "lock", "refund"].map(String::from)
    );
    assert_eq!(out.fsm.transition_count(), 5);
}

#[test]
fn test_registration_order_decides_enumeration() {
    let out = compile("m d; A ev1 B; B ev2 A;", &CompileOptions::default()).unwrap();
    let header = out.code.header.unwrap();
    assert!(header.contains("typedef enum m_state {\n    m_A,\n    m_B\n} m_state;"));

    let out = compile("m d; B ev2 A; A ev1 B;", &CompileOptions::default()).unwrap();
    let header = out.code.header.unwrap();
    assert!(header.contains("typedef enum m_state {\n    m_B,\n    m_A\n} m_state;"));
}

#[test]
fn test_reregistration_replaces_transition() {
    let out = compile("m d; S e T1 a1; S e T2 a2;", &CompileOptions::default()).unwrap();
    let source = out.code.source;

    assert!(source.contains("        if (e(data)) {\n            a2(data);\n            ctx->state = m_T2;\n"));
    assert!(!source.contains("a1(data);\n"));
    assert!(!source.contains("ctx->state = m_T1;"));
    assert!(out.graph.contains("S -> T2 [label=\"e\"];"));
    assert!(!out.graph.contains("S -> T1"));
}

#[test]
fn test_sizes_match_model() {
    let out = compile(TURNSTILE, &CompileOptions::default()).unwrap();
    let header = out.code.header.unwrap();
    let source = out.code.source;

    // N states
    assert!(header.contains("#define turnstile_state_count 2\n"));
    assert_eq!(source.matches("    case turnstile_").count(), 2);
    // M events minus `default`
    assert_eq!(header.matches("(const gate_t* data);").count(), 2);
    // K branches: conditionals plus one default
    let conditionals = source.matches("        if (").count();
    assert_eq!(conditionals + 1, 5);
    // one edge per transition
    assert_eq!(out.graph.matches(" -> ").count(), 5);
}

#[test]
fn test_default_fires_after_conditionals() {
    let out = compile(TURNSTILE, &CompileOptions::default()).unwrap();
    let source = out.code.source;

    let case = source.find("    case turnstile_unlocked:").unwrap();
    let tail = &source[case..];
    let push = tail.find("if (push(data))").unwrap();
    let coin = tail.find("if (coin(data))").unwrap();
    assert!(push < coin);
    // unlocked default is a self-loop without actions: nothing but the closing break
    assert!(tail.contains("            refund(data);\n            break;\n        }\n        break;\n    }\n"));
}

#[test]
fn test_rust_target_end_to_end() {
    let options = CompileOptions::default().with_target(CodegenTarget::Rust);
    let out = compile(TURNSTILE, &options).unwrap();

    assert!(out.code.header.is_none());
    syn::parse_file(&out.code.source).expect("generated module parses");
    assert!(out.code.source.contains("pub mod turnstile"));
    assert_eq!(out.code.source.matches("return;").count(), 4);
}

#[test]
fn test_strict_and_validating_errors() {
    let err = compile("just_a_name;", &CompileOptions::default()).unwrap_err();
    assert!(matches!(err, CompileError::Parse(_)));
    assert!(err.to_string().contains("Malformed header"));

    let err = compile("m d;\nA e;\n", &CompileOptions::strict()).unwrap_err();
    assert!(err.to_string().contains("line 2"));

    let err = compile_with_validator("m d;\nA e int;\n", &CompileOptions::default(), &CIdentifier)
        .unwrap_err();
    assert!(err.to_string().contains("'int'"));
}
