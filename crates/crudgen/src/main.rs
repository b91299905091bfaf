//! Crudgen CLI - CRUD and module scaffolding for entity-backed applications

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use crudgen_core::tui::{CrudArgs, ModuleArgs};
use crudgen_core::ProductConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Crudgen product configuration
#[derive(Clone)]
pub struct CrudgenConfig;

impl ProductConfig for CrudgenConfig {
    fn name(&self) -> &'static str {
        "crudgen"
    }

    fn display_name(&self) -> &'static str {
        "Crudgen"
    }

    fn manifest_env(&self) -> &'static str {
        "CRUDGEN_MANIFEST"
    }

    fn skeleton_dir_env(&self) -> &'static str {
        "CRUDGEN_SKELETON_DIR"
    }
}

#[derive(Parser, Debug)]
#[command(name = "crudgen")]
#[command(about = "CLI for scaffolding CRUD controllers, views, tests and routing for entities")]
#[command(version)]
pub struct Args {
    /// Print diagnostic logs (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a CRUD controller, views, test and routing for an entity
    Crud(CliCrudArgs),
    /// Generate a new module skeleton
    Module(CliModuleArgs),
}

#[derive(Parser, Debug)]
pub struct CliCrudArgs {
    /// Entity shortcut name (e.g. BlogModule:Post or BlogModule:Admin/Post)
    #[arg(short, long)]
    pub entity: Option<String>,

    /// Module receiving the generated files (defaults to the entity's module)
    #[arg(long = "to-module")]
    pub to_module: Option<String>,

    /// Configuration format (yml, xml, php or annotation)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Also generate the new, edit and delete actions
    #[arg(short, long = "with-write")]
    pub with_write: bool,

    /// Replace an existing controller
    #[arg(long)]
    pub overwrite: bool,

    /// Route prefix (defaults to the entity link name)
    #[arg(long = "route-prefix")]
    pub route_prefix: Option<String>,

    /// Project manifest (defaults to $CRUDGEN_MANIFEST, then ./crudgen.yaml)
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,

    /// Local directory with skeleton overrides
    #[arg(long = "skeleton-dir")]
    pub skeleton_dir: Option<PathBuf>,

    /// Print the plan without writing anything
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Never prompt (non-interactive mode)
    #[arg(short = 'n', long = "no-interaction")]
    pub no_interaction: bool,
}

impl From<CliCrudArgs> for CrudArgs {
    fn from(args: CliCrudArgs) -> Self {
        CrudArgs {
            manifest: args.manifest,
            entity: args.entity,
            to_module: args.to_module,
            format: args.format,
            // Absent flag means "ask" in interactive mode
            with_write: args.with_write.then_some(true),
            overwrite: args.overwrite,
            route_prefix: args.route_prefix,
            skeleton_dir: args.skeleton_dir,
            dry_run: args.dry_run,
            no_interaction: args.no_interaction,
        }
    }
}

#[derive(Parser, Debug)]
pub struct CliModuleArgs {
    /// Module namespace (e.g. Acme/BlogModule)
    #[arg(long)]
    pub namespace: Option<String>,

    /// Directory the module is created under
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Configuration format (yml, xml, php or annotation)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Also create the optional resource directories
    #[arg(long)]
    pub structure: bool,

    /// Local directory with skeleton overrides
    #[arg(long = "skeleton-dir")]
    pub skeleton_dir: Option<PathBuf>,

    /// Print the plan without writing anything
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Never prompt (non-interactive mode)
    #[arg(short = 'n', long = "no-interaction")]
    pub no_interaction: bool,
}

impl From<CliModuleArgs> for ModuleArgs {
    fn from(args: CliModuleArgs) -> Self {
        ModuleArgs {
            namespace: args.namespace,
            dir: args.dir,
            format: args.format,
            structure: args.structure.then_some(true),
            skeleton_dir: args.skeleton_dir,
            dry_run: args.dry_run,
            no_interaction: args.no_interaction,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: Args) -> Result<()> {
    let config = CrudgenConfig;
    tracing::debug!(product = config.name(), "starting");

    match args.command {
        Command::Crud(crud_args) => crudgen_core::run_crud(&config, crud_args.into()),
        Command::Module(module_args) => crudgen_core::run_module(&config, module_args.into()),
    }
}

fn main() {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    init_tracing(args.verbose);

    let result = run(args);

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
