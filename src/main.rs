//! cfsmgen CLI
//! Reads an FSM description, writes the generated code, graph and image

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

use cfsmgen::render::{DotCommand, GraphRenderer};
use cfsmgen::{
    compile_with_validator, AcceptAll, CIdentifier, CodegenTarget, Compilation, CompileOptions,
    DuplicatePolicy, IdentifierValidator, RustIdentifier,
};

#[derive(Parser, Debug)]
#[command(name = "cfsmgen")]
#[command(about = "Compile an FSM description into dispatch code and a Graphviz diagram")]
#[command(arg_required_else_help = true)]
struct Cli {
    /// FSM description file
    fsmfile: PathBuf,

    /// Language of the generated code: c or rust [default: c]
    #[arg(long)]
    target: Option<CodegenTarget>,

    /// JSON file with compile options; flags given on the command line win
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for generated files
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Fail on transition statements with fewer than three tokens
    #[arg(long)]
    strict: bool,

    /// Fail when a (state, event) pair is defined twice
    #[arg(long)]
    reject_duplicates: bool,

    /// Reject names that are not identifiers of the target language
    #[arg(long)]
    validate_names: bool,

    /// Write the parsed model as JSON next to the generated code
    #[arg(long)]
    dump_model: bool,

    /// Do not run the graph renderer
    #[arg(long)]
    no_render: bool,

    /// Graph rendering program
    #[arg(long, default_value = "dot")]
    dot_program: PathBuf,

    /// Image format passed to the renderer
    #[arg(long, default_value = "png")]
    format: String,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn load_options(&self) -> Result<CompileOptions> {
        let base: CompileOptions = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("Could not read config '{}'", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("Invalid config '{}'", path.display()))?
            }
            None => CompileOptions::default(),
        };
        Ok(self.apply_flags(base))
    }

    fn apply_flags(&self, mut options: CompileOptions) -> CompileOptions {
        options.strict |= self.strict;
        if self.reject_duplicates {
            options.duplicates = DuplicatePolicy::Reject;
        }
        if let Some(target) = self.target {
            options.target = target;
        }
        options
    }

    fn validator(&self, target: CodegenTarget) -> Box<dyn IdentifierValidator> {
        match (self.validate_names, target) {
            (false, _) => Box::new(AcceptAll),
            (true, CodegenTarget::C) => Box::new(CIdentifier),
            (true, CodegenTarget::Rust) => Box::new(RustIdentifier),
        }
    }
}

/// Write code, graph and optionally the model; returns the written paths
fn write_artifacts(
    compilation: &Compilation,
    target: CodegenTarget,
    out_dir: &Path,
    dump_model: bool,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Could not create '{}'", out_dir.display()))?;

    let stem = &compilation.fsm.name;
    let mut files: Vec<(PathBuf, Vec<u8>)> = Vec::new();

    if let (Some(header), Some(ext)) = (&compilation.code.header, target.header_extension()) {
        files.push((out_dir.join(format!("{stem}.{ext}")), header.clone().into_bytes()));
    }
    files.push((
        out_dir.join(format!("{stem}.{}", target.source_extension())),
        compilation.code.source.clone().into_bytes(),
    ));
    files.push((out_dir.join(format!("{stem}.dot")), compilation.graph.clone().into_bytes()));
    if dump_model {
        let json = serde_json::to_vec_pretty(&compilation.fsm)
            .context("Could not serialize the FSM model")?;
        files.push((out_dir.join(format!("{stem}.json")), json));
    }

    let mut written = Vec::new();
    for (path, contents) in files {
        fs::write(&path, contents)
            .with_context(|| format!("Could not write '{}'", path.display()))?;
        log::debug!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

fn render_image(
    renderer: &dyn GraphRenderer,
    compilation: &Compilation,
    out_dir: &Path,
    format: &str,
) -> Result<PathBuf> {
    let image = renderer.render(&compilation.graph)?;
    let path = out_dir.join(format!("{}.{format}", compilation.fsm.name));
    fs::write(&path, image).with_context(|| format!("Could not write '{}'", path.display()))?;
    Ok(path)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let source = fs::read_to_string(&cli.fsmfile)
        .with_context(|| format!("Could not read file '{}'", cli.fsmfile.display()))?;

    let options = cli.load_options()?;
    log::debug!("compile options: {options:?}");
    let validator = cli.validator(options.target);
    let compilation = compile_with_validator(&source, &options, validator.as_ref())
        .with_context(|| format!("Failed to compile '{}'", cli.fsmfile.display()))?;

    println!(
        "FSM '{}': {} states, {} events, {} actions, {} transitions",
        compilation.fsm.name,
        compilation.fsm.states().len(),
        compilation.fsm.events().len(),
        compilation.fsm.actions().len(),
        compilation.fsm.transition_count()
    );

    for path in write_artifacts(&compilation, options.target, &cli.out_dir, cli.dump_model)? {
        println!("  wrote {}", path.display());
    }

    if !cli.no_render {
        let renderer = DotCommand::new(&cli.dot_program, cli.format.as_str());
        match render_image(&renderer, &compilation, &cli.out_dir, &cli.format) {
            Ok(path) => println!("  wrote {}", path.display()),
            Err(e) => log::warn!("graph not rendered: {e:#}"),
        }
    }

    Ok(())
}
