//! Compiler configuration

use serde::{Deserialize, Serialize};

use crate::codegen::CodegenTarget;

/// What to do when a `(state, event)` pair is registered twice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Last registration wins (a warning is logged)
    #[default]
    Overwrite,
    /// Fail with `ParseError::DuplicateTransition`
    Reject,
}

/// Options for one compilation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Reject transition statements with fewer than three tokens
    /// instead of skipping them
    pub strict: bool,
    pub duplicates: DuplicatePolicy,
    pub target: CodegenTarget,
}

impl CompileOptions {
    pub fn strict() -> Self {
        Self {
            strict: true,
            duplicates: DuplicatePolicy::Reject,
            ..Self::default()
        }
    }

    pub fn with_target(mut self, target: CodegenTarget) -> Self {
        self.target = target;
        self
    }
}
