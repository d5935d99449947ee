//! Identifier validators
//! Pluggable checks applied to every name read from the DSL

/// Decides whether a DSL name may be used as an identifier.
pub trait IdentifierValidator {
    fn is_valid_identifier(&self, name: &str) -> bool;
}

impl<F> IdentifierValidator for F
where
    F: Fn(&str) -> bool,
{
    fn is_valid_identifier(&self, name: &str) -> bool {
        self(name)
    }
}

/// Accepts every name. This is the default.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl IdentifierValidator for AcceptAll {
    fn is_valid_identifier(&self, _name: &str) -> bool {
        true
    }
}

const C_KEYWORDS: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long", "register",
    "restrict", "return", "short", "signed", "sizeof", "static", "struct", "switch", "typedef",
    "union", "unsigned", "void", "volatile", "while", "_Alignas", "_Alignof", "_Atomic", "_Bool",
    "_Complex", "_Generic", "_Imaginary", "_Noreturn", "_Static_assert", "_Thread_local",
];

/// C identifier grammar: `[A-Za-z_][A-Za-z0-9_]*`, keywords excluded.
///
/// `default` is a C keyword but is reserved by the DSL as an event name, so
/// it is accepted here; the generator never emits it as an identifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct CIdentifier;

impl IdentifierValidator for CIdentifier {
    fn is_valid_identifier(&self, name: &str) -> bool {
        if name == crate::fsm::DEFAULT_EVENT {
            return true;
        }
        let mut chars = name.chars();
        let starts_ok = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
        starts_ok
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            && !C_KEYWORDS.contains(&name)
    }
}

/// Rust identifier grammar as understood by `syn`, keywords excluded
#[derive(Debug, Clone, Copy, Default)]
pub struct RustIdentifier;

impl IdentifierValidator for RustIdentifier {
    fn is_valid_identifier(&self, name: &str) -> bool {
        name == crate::fsm::DEFAULT_EVENT || syn::parse_str::<syn::Ident>(name).is_ok()
    }
}
