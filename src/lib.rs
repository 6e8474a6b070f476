// src/lib.rs

pub mod cli;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod library;
pub mod logging;
pub mod program;
pub mod script;
pub mod targets;
pub mod types;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::cli::{parse_target_calls, CliArgs};
use crate::dag::{plan, TargetCall, TargetGraph};
use crate::engine::{BuildContext, BuildOutcome, ExecutionEngine, LoggingListener};
use crate::errors::Result;
use crate::fs::{FileSystem, RealFileSystem};
use crate::library::{LibraryNamespaces, LibraryRegistry, TaskCatalog};
use crate::program::Program;
use crate::script::{load_program, read_script};
use crate::targets::{help, reflect, TargetDescriptor};
use crate::types::EXIT_SUCCESS;

/// A build script read from disk, with its libraries registered and its
/// targets reflected.
#[derive(Debug)]
pub struct LoadedScript {
    pub path: PathBuf,
    pub registry: LibraryRegistry,
    pub program: Program,
    pub descriptors: Vec<TargetDescriptor>,
}

impl LoadedScript {
    /// Directory targets run relative to.
    pub fn base_dir(&self) -> PathBuf {
        script_base_dir(&self.path)
    }

    /// Fresh build context wired to this script's libraries.
    pub fn context(&self, fs: Arc<dyn FileSystem>, catalog: TaskCatalog) -> BuildContext {
        let namespaces = LibraryNamespaces::register(&self.registry, Arc::new(catalog));
        BuildContext::new(self.base_dir(), Arc::new(namespaces), fs)
    }

    pub fn engine(&self) -> ExecutionEngine {
        ExecutionEngine::new(self.descriptors.clone(), self.program.default_target.clone())
    }
}

/// Read the script once, scan its library directives, then parse and reflect.
///
/// The registry is complete before the program is built, so members can
/// refer to any declared library.
pub fn load_script(fs: &dyn FileSystem, path: &Path) -> Result<LoadedScript> {
    let text = read_script(fs, path)?;
    info!("Buildfile: {}", path.display());

    let registry = LibraryRegistry::from_script(&text);
    let program = load_program(&text, &registry, &program_name(path))?;
    let descriptors = reflect(&program);

    Ok(LoadedScript {
        path: path.to_path_buf(),
        registry,
        program,
        descriptors,
    })
}

/// Load and run a script with the built-in task catalog.
pub async fn execute_script(
    fs: Arc<dyn FileSystem>,
    path: &Path,
    calls: &[TargetCall],
    user_properties: &[(String, String)],
) -> Result<BuildOutcome> {
    let script = load_script(fs.as_ref(), path)?;
    let mut ctx = script.context(fs, TaskCatalog::builtin());
    for (key, value) in user_properties {
        ctx.set_user_property(key.clone(), value.clone());
    }
    ctx.add_listener(Box::new(LoggingListener::new()));

    let mut engine = script.engine();
    Ok(engine.run(&mut ctx, calls).await)
}

/// High-level entry point used by `main.rs`. Returns the process exit status.
pub async fn run(args: CliArgs) -> Result<i32> {
    let script_path = PathBuf::from(&args.script);
    let calls = parse_target_calls(&args.targets)?;
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);

    if args.projecthelp || args.dry_run {
        let script = load_script(fs.as_ref(), &script_path)?;
        if args.projecthelp {
            print!(
                "{}",
                help::render(&args.script, &help::entries(&script.descriptors))
            );
        } else {
            print_dry_run(&script, &calls)?;
        }
        return Ok(EXIT_SUCCESS);
    }

    let outcome = execute_script(fs, &script_path, &calls, &args.define).await?;
    Ok(outcome.exit_code())
}

/// Targets run relative to the script's directory; a bare file name means
/// the current working directory.
fn script_base_dir(script_path: &Path) -> PathBuf {
    match script_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

fn program_name(script_path: &Path) -> String {
    script_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "build".to_string())
}

/// Dry-run output: libraries, targets and the order that would run.
fn print_dry_run(script: &LoadedScript, calls: &[TargetCall]) -> Result<()> {
    let graph = TargetGraph::build(script.descriptors.clone())?;
    let plan = plan(&graph, calls, script.program.default_target.as_deref())?;

    println!("scriptdag dry-run");
    println!("  script = {}", script.path.display());
    if let Some(default) = &script.program.default_target {
        println!("  default = {default}");
    }
    println!();

    let catalog = TaskCatalog::builtin();
    println!("libraries ({}):", script.registry.entries().len());
    for entry in script.registry.entries() {
        println!("  - {} = {}", entry.symbol, entry.resource);
        match catalog.load(&entry.resource) {
            Some(library) => println!("      tasks: {}", library.task_names().join(", ")),
            None => println!("      tasks: (not available)"),
        }
    }
    println!();

    println!("targets ({}):", graph.descriptors().len());
    for descriptor in graph.descriptors() {
        println!("  - {}", descriptor.name());
        if !descriptor.dependencies().is_empty() {
            println!("      depends: {:?}", descriptor.dependencies());
        }
        for param in descriptor.parameters() {
            match param.default() {
                Some(default) => println!("      param: {} = {}", param.name(), default.source()),
                None => println!("      param: {} (required)", param.name()),
            }
        }
        if let types::Owner::Library(symbol) = descriptor.owner() {
            println!("      from: {symbol}");
        }
    }
    println!();

    println!("execution order:");
    for (i, name) in plan.target_names().iter().enumerate() {
        println!("  {}. {name}", i + 1);
    }

    debug!("dry-run complete (no execution)");
    Ok(())
}
