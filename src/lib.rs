//! cfsmgen - FSM compiler
//! A tiny transition-table DSL compiled to C or Rust dispatch code and Graphviz graphs

pub mod codegen;
pub mod config;
pub mod fsm;
pub mod graph;
pub mod parser;
pub mod render;
pub mod validation;

pub use codegen::{
    generate_c_code, generate_code_with_target, generate_rust_code, CodegenTarget, GeneratedCode,
};
pub use config::{CompileOptions, DuplicatePolicy};
pub use fsm::*;
pub use graph::to_graph;
pub use parser::{parse_fsm, tokenize};
pub use validation::{AcceptAll, CIdentifier, IdentifierValidator, RustIdentifier};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] parser::ParseError),
    #[error(transparent)]
    Codegen(#[from] codegen::CodegenError),
}

/// Everything produced from one DSL source
#[derive(Debug, Clone)]
pub struct Compilation {
    pub fsm: FsmDefinition,
    pub data_type: String,
    pub code: GeneratedCode,
    pub graph: String,
}

/// Run the whole pipeline with the default (permissive) name validator
pub fn compile(source: &str, options: &CompileOptions) -> Result<Compilation, CompileError> {
    compile_with_validator(source, options, &AcceptAll)
}

/// Run the whole pipeline: tokenize, build the model, generate code and graph
pub fn compile_with_validator(
    source: &str,
    options: &CompileOptions,
    validator: &dyn IdentifierValidator,
) -> Result<Compilation, CompileError> {
    let (fsm, data_type) = parse_fsm(source, options, validator)?;
    let code = generate_code_with_target(&fsm, &data_type, options.target)?;
    let graph = to_graph(&fsm);
    Ok(Compilation {
        fsm,
        data_type,
        code,
        graph,
    })
}
