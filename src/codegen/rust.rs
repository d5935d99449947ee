//! Rust backend
//! Emits a self-contained module with the same dispatch semantics as the C output

use proc_macro2::{Ident, TokenStream};
use quote::quote;

use super::{CodegenError, CodegenResult};
use crate::fsm::{FsmDefinition, Transition};

fn ident(name: &str) -> CodegenResult<Ident> {
    syn::parse_str::<Ident>(name).map_err(|_| CodegenError::InvalidIdentifier(name.to_string()))
}

/// Generate a formatted Rust module `pub mod <fsm> { ... }`
pub fn generate_rust_code(fsm: &FsmDefinition, data_type: &str) -> CodegenResult<String> {
    let tokens = generate_module(fsm, data_type)?;
    let file: syn::File = syn::parse2(tokens)?;
    log::debug!("generated Rust dispatch for '{}'", fsm.name);
    Ok(prettyplease::unparse(&file))
}

fn generate_module(fsm: &FsmDefinition, data_type: &str) -> CodegenResult<TokenStream> {
    let module = ident(&fsm.name)?;
    let data = ident(data_type)?;

    let state_enum = generate_state_enum(fsm)?;
    let actions = fsm
        .actions()
        .iter()
        .map(|action| {
            let name = ident(action)?;
            Ok(quote! {
                pub fn #name(data: &mut #data) {
                    let _ = data;
                }
            })
        })
        .collect::<CodegenResult<Vec<_>>>()?;
    let predicates = fsm
        .predicate_events()
        .map(|event| {
            let name = ident(event)?;
            Ok(quote! {
                pub fn #name(data: &#data) -> bool {
                    let _ = data;
                    false
                }
            })
        })
        .collect::<CodegenResult<Vec<_>>>()?;
    let step = generate_step(fsm)?;

    Ok(quote! {
        pub mod #module {
            #![allow(non_camel_case_types, non_snake_case, dead_code, unused_variables)]

            #state_enum

            #[derive(Debug, Default)]
            pub struct #data {}

            pub struct Context<'a> {
                pub state: State,
                pub data: &'a mut #data,
            }

            #(#actions)*

            #(#predicates)*

            #step
        }
    })
}

fn generate_state_enum(fsm: &FsmDefinition) -> CodegenResult<TokenStream> {
    let variants = fsm
        .states()
        .iter()
        .map(|s| ident(s))
        .collect::<CodegenResult<Vec<_>>>()?;
    let names = fsm.states().as_slice();
    let count = names.len();

    Ok(quote! {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum State {
            #(#variants,)*
        }

        pub const STATE_COUNT: usize = #count;

        pub const STATE_NAMES: [&str; #count] = [#(#names),*];

        impl State {
            pub fn name(self) -> &'static str {
                match self {
                    #(State::#variants => #names,)*
                }
            }
        }
    })
}

fn generate_step(fsm: &FsmDefinition) -> CodegenResult<TokenStream> {
    let mut arms = Vec::new();
    for state in fsm.states() {
        let variant = ident(state)?;
        let (conditional, fallback) = fsm.dispatch_order(state);

        let mut branches = Vec::new();
        for transition in conditional {
            let predicate = ident(&transition.event)?;
            let body = fire(fsm, transition)?;
            branches.push(quote! {
                if #predicate(data) {
                    #body
                    return;
                }
            });
        }
        if let Some(transition) = fallback {
            branches.push(fire(fsm, transition)?);
        }

        arms.push(quote! {
            State::#variant => {
                #(#branches)*
            }
        });
    }

    // an empty model has an uninhabited State; `match` on it needs no arms
    Ok(quote! {
        pub fn step(ctx: &mut Context<'_>) {
            let data = &mut *ctx.data;
            match ctx.state {
                #(#arms)*
            }
        }
    })
}

fn fire(fsm: &FsmDefinition, transition: &Transition) -> CodegenResult<TokenStream> {
    if fsm.state_index(&transition.target).is_none() {
        return Err(CodegenError::UnknownTransitionTarget {
            state: transition.source.clone(),
            event: transition.event.clone(),
            target: transition.target.clone(),
        });
    }

    let actions = transition
        .actions
        .iter()
        .map(|a| ident(a))
        .collect::<CodegenResult<Vec<_>>>()?;
    let update = if transition.is_self_loop() {
        quote! {}
    } else {
        let target = ident(&transition.target)?;
        quote! { ctx.state = State::#target; }
    };

    Ok(quote! {
        #(#actions(data);)*
        #update
    })
}
