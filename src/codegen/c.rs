//! C backend
//! Emits a header/source pair implementing the FSM as one dispatch function

use super::{CodegenError, CodegenResult, GeneratedCode};
use crate::fsm::{FsmDefinition, Transition};

const INDENT: &str = "    ";

/// `prefix_name_postfix`, skipping empty parts
fn cprefix(prefix: &str, name: &str, postfix: &str) -> String {
    let mut ret = name.to_string();
    if !prefix.is_empty() {
        ret = format!("{prefix}_{ret}");
    }
    if !postfix.is_empty() {
        ret = format!("{ret}_{postfix}");
    }
    ret
}

fn func_signature(name: &str, return_type: &str, params: &[(&str, &str)]) -> String {
    let params: Vec<String> = params
        .iter()
        .map(|(name, ty)| format!("{ty} {name}"))
        .collect();
    format!("{return_type} {name}({})", params.join(", "))
}

fn func_decl(name: &str, return_type: &str, params: &[(&str, &str)]) -> String {
    format!("{};\n", func_signature(name, return_type, params))
}

fn func_impl(name: &str, return_type: &str, params: &[(&str, &str)], body: &str) -> String {
    format!(
        "{}\n{{\n{}}}\n",
        func_signature(name, return_type, params),
        body
    )
}

fn enum_decl(name: &str, members: &[String]) -> String {
    let mut ret = format!("typedef enum {name} {{\n");
    ret += &members
        .iter()
        .map(|m| format!("{INDENT}{m}"))
        .collect::<Vec<_>>()
        .join(",\n");
    ret += &format!("\n}} {name};\n");
    ret += &format!("#define {name}_count {}\n", members.len());
    ret
}

fn string_array(name: &str, strings: &[String]) -> String {
    let mut ret = format!("const char* {name}[] = {{\n");
    ret += &strings
        .iter()
        .map(|s| format!("{INDENT}\"{s}\""))
        .collect::<Vec<_>>()
        .join(",\n");
    ret += "\n};\n";
    ret
}

fn struct_forward_decl(name: &str) -> String {
    format!("typedef struct {name} {name};\n")
}

fn struct_decl(name: &str, members: &[(&str, String)]) -> String {
    let mut ret = format!("struct {name} {{\n");
    for (field, ty) in members {
        ret += &format!("{INDENT}{ty} {field};\n");
    }
    ret += "};\n";
    ret
}

fn include_guard(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect();
    format!("{stem}_H")
}

/// Identifiers derived from the FSM and data type names
struct Names {
    fsm: String,
    data: String,
    ctx: String,
    state_enum: String,
    state_names: String,
    step: String,
}

impl Names {
    fn new(fsm: &FsmDefinition, data_type: &str) -> Self {
        Self {
            fsm: fsm.name.clone(),
            data: data_type.to_string(),
            ctx: cprefix(&fsm.name, "ctx", "t"),
            state_enum: cprefix(&fsm.name, "state", ""),
            state_names: cprefix(&fsm.name, "state_names", ""),
            step: cprefix(&fsm.name, "step", ""),
        }
    }

    fn state(&self, state: &str) -> String {
        cprefix(&self.fsm, state, "")
    }

    fn data_ptr(&self) -> String {
        format!("{}*", self.data)
    }

    fn const_data_ptr(&self) -> String {
        format!("const {}*", self.data)
    }

    fn ctx_ptr(&self) -> String {
        format!("{}*", self.ctx)
    }
}

/// Generate `<fsm>.h` and `<fsm>.c`
pub fn generate_c_code(fsm: &FsmDefinition, data_type: &str) -> CodegenResult<GeneratedCode> {
    let names = Names::new(fsm, data_type);
    let header = generate_header(fsm, &names);
    let source = generate_source(fsm, &names)?;
    Ok(GeneratedCode {
        header: Some(header),
        source,
    })
}

fn generate_header(fsm: &FsmDefinition, names: &Names) -> String {
    let guard = include_guard(&fsm.name);
    let states: Vec<String> = fsm.states().iter().map(|s| names.state(s)).collect();
    let data_ptr = names.data_ptr();
    let const_data_ptr = names.const_data_ptr();
    let ctx_ptr = names.ctx_ptr();

    let mut out = format!("#ifndef {guard}\n#define {guard}\n\n");

    out += &enum_decl(&names.state_enum, &states);
    out += "\n";
    out += &format!("extern const char* {}[];\n\n", names.state_names);

    out += &struct_forward_decl(&names.data);
    out += &struct_forward_decl(&names.ctx);
    out += "\n";
    out += &struct_decl(
        &names.ctx,
        &[("state", names.state_enum.clone()), ("data", data_ptr.clone())],
    );
    out += "\n";

    for action in fsm.actions() {
        out += &func_decl(action, "void", &[("data", data_ptr.as_str())]);
    }
    if !fsm.actions().is_empty() {
        out += "\n";
    }

    let mut has_predicates = false;
    for event in fsm.predicate_events() {
        out += &func_decl(event, "int", &[("data", const_data_ptr.as_str())]);
        has_predicates = true;
    }
    if has_predicates {
        out += "\n";
    }

    out += &func_decl(&names.step, "void", &[("ctx", ctx_ptr.as_str())]);
    out += &format!("\n#endif /* {guard} */\n");
    out
}

fn generate_source(fsm: &FsmDefinition, names: &Names) -> CodegenResult<String> {
    let data_ptr = names.data_ptr();

    let mut out = format!("#include \"{}.h\"\n\n", fsm.name);
    out += &string_array(&names.state_names, fsm.states().as_slice());
    out += "\n";

    for action in fsm.actions() {
        let body = format!(
            "{INDENT}(void)data;\n{INDENT}/* TODO: Add implementation here... */\n"
        );
        out += &func_impl(action, "void", &[("data", data_ptr.as_str())], &body);
        out += "\n";
    }

    let body = step_body(fsm, names)?;
    out += &func_impl(&names.step, "void", &[("ctx", names.ctx_ptr().as_str())], &body);

    log::debug!("generated C dispatch for '{}'", fsm.name);
    Ok(out)
}

fn step_body(fsm: &FsmDefinition, names: &Names) -> CodegenResult<String> {
    let case_indent = INDENT;
    let branch_indent = INDENT.repeat(2);

    let mut body = format!("{INDENT}const {} state = ctx->state;\n", names.state_enum);
    body += &format!("{INDENT}{} data = ctx->data;\n", names.data_ptr());
    body += &format!("{INDENT}switch (state) {{\n");

    for state in fsm.states() {
        body += &format!("{case_indent}case {}:\n", names.state(state));
        let (conditional, fallback) = fsm.dispatch_order(state);

        for transition in conditional {
            body += &format!("{branch_indent}if ({}(data)) {{\n", transition.event);
            body += &fire(fsm, transition, names, &INDENT.repeat(3))?;
            body += &format!("{}break;\n", INDENT.repeat(3));
            body += &format!("{branch_indent}}}\n");
        }
        if let Some(transition) = fallback {
            body += &fire(fsm, transition, names, &branch_indent)?;
        }
        body += &format!("{branch_indent}break;\n");
    }

    body += &format!("{INDENT}}}\n");
    Ok(body)
}

/// Action calls plus the state update, skipped for self-loops
fn fire(
    fsm: &FsmDefinition,
    transition: &Transition,
    names: &Names,
    indent: &str,
) -> CodegenResult<String> {
    if fsm.state_index(&transition.target).is_none() {
        return Err(CodegenError::UnknownTransitionTarget {
            state: transition.source.clone(),
            event: transition.event.clone(),
            target: transition.target.clone(),
        });
    }

    let mut out = String::new();
    for action in &transition.actions {
        out += &format!("{indent}{action}(data);\n");
    }
    if !transition.is_self_loop() {
        out += &format!("{indent}ctx->state = {};\n", names.state(&transition.target));
    }
    Ok(out)
}
