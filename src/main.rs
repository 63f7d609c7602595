//=====================================================
// File: main.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: cub-stdlib CLI entry point
// Objective: Assemble the stdlib prologue, list builtins, and call builtins
//            from the command line with JSON arguments
//=====================================================

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Args as ClapArgs, Parser, Subcommand};

use cub_stdlib::{
    BuiltinOptions, EmbedConfig, EmbeddedProvider, HostRegistry, ResourceProvider, StdLibAssembler,
    Value, logging, register_builtins,
};

#[derive(Parser, Debug)]
#[command(name = "cub-stdlib", about = "Cub embedding boundary tools")]
pub struct Args {
    /// Configuration file (defaults to the user config, if present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the assembled stdlib prologue.
    Assemble(AssembleArgs),
    /// List registered builtins with their documentation.
    List,
    /// Call a builtin with positional JSON arguments and print the result.
    Call(CallArgs),
}

#[derive(ClapArgs, Debug, Clone)]
pub struct AssembleArgs {
    /// Resource directory holding `<Module>.cub` files.
    #[arg(long, conflicts_with = "embedded")]
    pub root: Option<PathBuf>,

    /// Use the sources compiled into this binary.
    #[arg(long)]
    pub embedded: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct CallArgs {
    /// Builtin name, e.g. `dateByAdding`.
    pub name: String,

    /// Arguments as JSON literals: `1`, `"day"`, `[1,2]`, `{"x":1}`.
    pub arguments: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init("cub-stdlib", args.verbose);

    let config = load_config(args.config.as_ref())?;
    match args.command {
        Command::Assemble(assemble) => run_assemble(&config, assemble),
        Command::List => run_list(&config),
        Command::Call(call) => run_call(&config, call),
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<EmbedConfig> {
    match path {
        Some(path) => EmbedConfig::load(path)
            .with_context(|| format!("loading configuration {}", path.display())),
        None => EmbedConfig::load_or_default().context("loading user configuration"),
    }
}

fn run_assemble(config: &EmbedConfig, args: AssembleArgs) -> Result<()> {
    let mut config = config.clone();
    if let Some(root) = args.root {
        config.stdlib.root = Some(root);
    }
    let provider: Box<dyn ResourceProvider> = if args.embedded {
        Box::new(EmbeddedProvider)
    } else {
        Box::new(config.provider())
    };
    let prologue = StdLibAssembler::with_modules(provider, config.stdlib.modules.clone())
        .assemble()
        .context("assembling stdlib")?;
    print!("{prologue}");
    Ok(())
}

fn registry_for(config: &EmbedConfig) -> HostRegistry {
    let mut registry = HostRegistry::new();
    let options = BuiltinOptions::new(config.calendar(), config.capabilities());
    register_builtins(&mut registry, &options);
    registry
}

fn run_list(config: &EmbedConfig) -> Result<()> {
    let registry = registry_for(config);
    for name in registry.names() {
        let Some(descriptor) = registry.descriptor(&name) else {
            continue;
        };
        let mut signature = descriptor.argument_names.join(", ");
        if descriptor.variadic {
            signature.push_str(", ...");
        }
        println!("{name}({signature})");
        for line in descriptor.documentation.lines() {
            println!("    {line}");
        }
        println!();
    }
    Ok(())
}

fn run_call(config: &EmbedConfig, args: CallArgs) -> Result<()> {
    let registry = registry_for(config);
    let arguments = args
        .arguments
        .iter()
        .map(|raw| {
            serde_json::from_str::<Value>(raw)
                .map_err(|err| anyhow!("argument {raw} is not a script value: {err}"))
        })
        .collect::<Result<Vec<_>>>()?;
    let result = registry
        .call_blocking(&args.name, arguments)
        .with_context(|| format!("calling {}", args.name))?;
    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
