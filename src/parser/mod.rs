//! FSM Parser Module
//! Splits DSL text into statements and replays them into an FSM model

use pest::iterators::{Pair, Pairs};
use pest::Parser;
use pest_derive::Parser;
use thiserror::Error;

use crate::config::CompileOptions;
use crate::fsm::FsmDefinition;
use crate::validation::IdentifierValidator;

mod builder;

pub use builder::build;

#[cfg(test)]
mod tests;

#[derive(Parser)]
#[grammar = "parser/fsm.pest"]
pub struct FsmParser;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Parse error: {0}")]
    Grammar(#[from] pest::error::Error<Rule>),
    #[error("Malformed header at line {line}: expected `<fsm name> <data type>;`, found {found} token(s)")]
    MalformedHeader { line: usize, found: usize },
    #[error("Invalid identifier '{token}' at line {line}")]
    InvalidIdentifier { token: String, line: usize },
    #[error("Malformed transition at line {line}: expected `<state> <event> <next state> [actions...];`, found {found} token(s)")]
    MalformedTransition { line: usize, found: usize },
    #[error("Duplicate transition for state '{state}' on event '{event}' at line {line}")]
    DuplicateTransition {
        state: String,
        event: String,
        line: usize,
    },
}

pub type ParseResult<T> = Result<T, ParseError>;

/// One `;`-terminated statement of the DSL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// 1-based line of the first token
    pub line: usize,
    pub tokens: Vec<String>,
}

/// Statements of a source text, in file order. Empty statements are skipped.
pub struct Statements<'i> {
    pairs: Option<Pairs<'i, Rule>>,
}

impl Iterator for Statements<'_> {
    type Item = Statement;

    fn next(&mut self) -> Option<Statement> {
        let pairs = self.pairs.as_mut()?;
        for pair in pairs.by_ref() {
            match pair.as_rule() {
                Rule::statement => {
                    if let Some(statement) = collect_statement(pair) {
                        return Some(statement);
                    }
                }
                Rule::trailing => {
                    if let Some(rest) = collect_statement(pair) {
                        log::warn!(
                            "ignoring {} token(s) after line {} without a terminating ';'",
                            rest.tokens.len(),
                            rest.line
                        );
                    }
                }
                _ => {}
            }
        }
        None
    }
}

fn collect_statement(pair: Pair<'_, Rule>) -> Option<Statement> {
    let mut line = 0;
    let tokens: Vec<String> = pair
        .into_inner()
        .filter(|p| p.as_rule() == Rule::word)
        .map(|word| {
            if line == 0 {
                line = word.line_col().0;
            }
            word.as_str().to_string()
        })
        .collect();

    if tokens.is_empty() {
        None
    } else {
        Some(Statement { line, tokens })
    }
}

/// Tokenize DSL source into statements
pub fn tokenize(source: &str) -> ParseResult<Statements<'_>> {
    let mut pairs = FsmParser::parse(Rule::file, source)?;
    Ok(Statements {
        pairs: pairs.next().map(Pair::into_inner),
    })
}

/// Parse FSM DSL source into a model and the user data type name
pub fn parse_fsm(
    source: &str,
    options: &CompileOptions,
    validator: &dyn IdentifierValidator,
) -> ParseResult<(FsmDefinition, String)> {
    build(tokenize(source)?, options, validator)
}
