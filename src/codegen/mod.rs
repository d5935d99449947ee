//! Code generation
//! Turns an FSM model into dispatch code for the selected target language

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::fsm::FsmDefinition;

mod c;
mod rust;

pub use c::generate_c_code;
pub use rust::generate_rust_code;


#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("Transition {state} --{event}--> {target} points to an unknown state")]
    UnknownTransitionTarget {
        state: String,
        event: String,
        target: String,
    },
    #[error("'{0}' is not a valid identifier for the target language")]
    InvalidIdentifier(String),
    #[error("Generated code does not parse: {0}")]
    Syntax(#[from] syn::Error),
}

pub type CodegenResult<T> = Result<T, CodegenError>;

/// Language of the generated dispatch code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodegenTarget {
    /// `<fsm>.h` + `<fsm>.c`
    #[default]
    C,
    /// a single `<fsm>.rs` module
    Rust,
}

impl CodegenTarget {
    pub fn source_extension(self) -> &'static str {
        match self {
            CodegenTarget::C => "c",
            CodegenTarget::Rust => "rs",
        }
    }

    pub fn header_extension(self) -> Option<&'static str> {
        match self {
            CodegenTarget::C => Some("h"),
            CodegenTarget::Rust => None,
        }
    }
}

impl FromStr for CodegenTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "c" => Ok(CodegenTarget::C),
            "rust" | "rs" => Ok(CodegenTarget::Rust),
            other => Err(format!("unknown target '{other}' (expected 'c' or 'rust')")),
        }
    }
}

impl fmt::Display for CodegenTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodegenTarget::C => write!(f, "c"),
            CodegenTarget::Rust => write!(f, "rust"),
        }
    }
}

/// Generated artifacts. `header` is only produced for targets that have one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedCode {
    pub header: Option<String>,
    pub source: String,
}

/// Generate dispatch code for `target`
pub fn generate_code_with_target(
    fsm: &FsmDefinition,
    data_type: &str,
    target: CodegenTarget,
) -> CodegenResult<GeneratedCode> {
    match target {
        CodegenTarget::C => generate_c_code(fsm, data_type),
        CodegenTarget::Rust => Ok(GeneratedCode {
            header: None,
            source: generate_rust_code(fsm, data_type)?,
        }),
    }
}
