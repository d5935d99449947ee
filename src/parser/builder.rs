//! Model builder
//! Replays tokenized statements into an `FsmDefinition`

use super::{ParseError, ParseResult, Statement};
use crate::config::{CompileOptions, DuplicatePolicy};
use crate::fsm::FsmDefinition;
use crate::validation::IdentifierValidator;

/// Build a model from statements.
///
/// The first statement is the header `<fsm name> <data type>`; every other
/// statement is `<state> <event> <next state> [actions...]`. Returns the
/// model and the user data type name.
pub fn build<I>(
    statements: I,
    options: &CompileOptions,
    validator: &dyn IdentifierValidator,
) -> ParseResult<(FsmDefinition, String)>
where
    I: IntoIterator<Item = Statement>,
{
    let mut statements = statements.into_iter();

    let header = statements
        .next()
        .ok_or(ParseError::MalformedHeader { line: 1, found: 0 })?;
    if header.tokens.len() < 2 {
        return Err(ParseError::MalformedHeader {
            line: header.line,
            found: header.tokens.len(),
        });
    }
    check_names(&header.tokens[..2], header.line, validator)?;

    let mut fsm = FsmDefinition::new(header.tokens[0].clone());
    let data_type = header.tokens[1].clone();

    for statement in statements {
        add_statement(&mut fsm, &statement, options, validator)?;
    }

    log::debug!(
        "built FSM '{}': {} states, {} events, {} actions, {} transitions",
        fsm.name,
        fsm.states().len(),
        fsm.events().len(),
        fsm.actions().len(),
        fsm.transition_count()
    );

    Ok((fsm, data_type))
}

fn add_statement(
    fsm: &mut FsmDefinition,
    statement: &Statement,
    options: &CompileOptions,
    validator: &dyn IdentifierValidator,
) -> ParseResult<()> {
    let tokens = &statement.tokens;
    if tokens.len() < 3 {
        if options.strict {
            return Err(ParseError::MalformedTransition {
                line: statement.line,
                found: tokens.len(),
            });
        }
        log::warn!(
            "skipping statement at line {}: {} token(s), need at least 3",
            statement.line,
            tokens.len()
        );
        return Ok(());
    }
    check_names(tokens, statement.line, validator)?;

    let (state, event, target) = (&tokens[0], &tokens[1], &tokens[2]);
    let actions = &tokens[3..];

    if options.duplicates == DuplicatePolicy::Reject && fsm.transition(state, event).is_some() {
        return Err(ParseError::DuplicateTransition {
            state: state.clone(),
            event: event.clone(),
            line: statement.line,
        });
    }

    log::debug!("line {}: {} --{}--> {} {:?}", statement.line, state, event, target, actions);
    if let Some(previous) = fsm.add_transition(state, event, target, actions) {
        log::warn!(
            "line {}: transition {} --{}--> {} replaces earlier one to {}",
            statement.line,
            state,
            event,
            target,
            previous.target
        );
    }
    Ok(())
}

fn check_names(
    tokens: &[String],
    line: usize,
    validator: &dyn IdentifierValidator,
) -> ParseResult<()> {
    match tokens.iter().find(|t| !validator.is_valid_identifier(t)) {
        Some(token) => Err(ParseError::InvalidIdentifier {
            token: token.clone(),
            line,
        }),
        None => Ok(()),
    }
}
