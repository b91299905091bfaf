//! Charm-style CLI prompts using cliclack
//!
//! Prompts only collect answers. Each flow ends in one immutable request,
//! and nothing is planned or written until every answer is in.

use crate::format::ConfigFormat;
use crate::naming::{derive_link_name, EntityRef};
use crate::plan::{GenerationRequest, ModulePlanBuilder, ModuleRequest, Plan, PlanBuilder};
use crate::product::ProductConfig;
use crate::project::{LocalFilesystem, ModuleRegistry, ProjectManifest};
use crate::templates::{execute_plan, print_plan, SkeletonRenderer, SkeletonSource, Skeletons};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Arguments for the CRUD generation flow
#[derive(Debug, Clone, Default)]
pub struct CrudArgs {
    /// Project manifest describing modules and entities
    pub manifest: Option<PathBuf>,

    /// Entity shortcut name (`BlogModule:Post`)
    pub entity: Option<String>,

    /// Module receiving the generated files
    pub to_module: Option<String>,

    /// Configuration format (yml, xml, php, annotation)
    pub format: Option<String>,

    /// Generate the write actions
    pub with_write: Option<bool>,

    /// Replace an existing controller
    pub overwrite: bool,

    /// Route prefix
    pub route_prefix: Option<String>,

    /// Directory with skeleton overrides
    pub skeleton_dir: Option<PathBuf>,

    /// Print the plan instead of writing files
    pub dry_run: bool,

    /// Never prompt; missing required answers are an error
    pub no_interaction: bool,
}

/// Arguments for the module scaffolding flow
#[derive(Debug, Clone, Default)]
pub struct ModuleArgs {
    /// Module namespace (`Acme/BlogModule`)
    pub namespace: Option<String>,

    /// Directory the module is created under
    pub dir: Option<PathBuf>,

    pub format: Option<String>,

    /// Also create the optional resource directories
    pub structure: Option<bool>,

    pub skeleton_dir: Option<PathBuf>,

    pub dry_run: bool,

    pub no_interaction: bool,
}

/// Run the CRUD generation flow
pub fn run_crud<C: ProductConfig>(config: &C, args: CrudArgs) -> Result<()> {
    cliclack::intro(format!("{} CRUD generator", config.display_name()))?;

    // Step 1: Load the project manifest
    let manifest = load_manifest(config, &args.manifest)?;
    let defaults = manifest.defaults().clone();

    // Step 2: Entity
    let entity = select_entity(&manifest, &args)?;

    // Step 3: Target module
    let to_module = select_target_module(&manifest, &entity, &args)?;

    // Step 4: Look up modules and metadata
    let request = GenerationRequest::resolve(entity, Some(&to_module), &manifest, &manifest)?;

    // Step 5: Write actions
    let with_write = match args.with_write {
        Some(value) => value,
        None if args.no_interaction => defaults.with_write.unwrap_or(false),
        None => cliclack::confirm("Do you want to generate the \"write\" actions?")
            .initial_value(defaults.with_write.unwrap_or(false))
            .interact()?,
    };

    // Step 6: Format
    let format = select_format(args.format.as_deref(), defaults.format.as_deref(), args.no_interaction)?;

    // Step 7: Route prefix
    let route_prefix = match &args.route_prefix {
        Some(prefix) => prefix.clone(),
        None if args.no_interaction => String::new(),
        None => {
            let suggested = format!("/{}", derive_link_name(request.entity()));
            cliclack::input("Routes prefix")
                .placeholder(&suggested)
                .default_input(&suggested)
                .interact()?
        }
    };

    let request = request
        .with_write_actions(with_write)
        .with_format(format)
        .with_route_prefix(route_prefix)
        .force_overwrite(args.overwrite);

    // Step 8: Plan
    let plan = PlanBuilder::new(&LocalFilesystem).build(&request)?;
    if plan.format_fell_back {
        cliclack::log::warning(format!(
            "Unknown format '{}', using {}",
            request.format(), plan.format
        ))?;
    }

    cliclack::note(
        "Summary",
        format!(
            "Generating a CRUD controller for \"{}\" in {}\nusing the \"{}\" format, {} job(s).",
            request.entity(),
            request.target_module().name,
            plan.format,
            plan.len()
        ),
    )?;

    // Step 9: Confirm, then execute
    let skeleton_dir = args.skeleton_dir.clone().or_else(|| manifest.skeleton_dir());
    finish(config, plan, skeleton_dir, &request.target_module().root_path, args.dry_run, args.no_interaction)
}

/// Run the module scaffolding flow
pub fn run_module<C: ProductConfig>(config: &C, args: ModuleArgs) -> Result<()> {
    cliclack::intro(format!("{} module generator", config.display_name()))?;

    let namespace = match &args.namespace {
        Some(namespace) => namespace.clone(),
        None if args.no_interaction => {
            anyhow::bail!("The --namespace option is required in non-interactive mode.")
        }
        None => cliclack::input("Module namespace")
            .placeholder("Acme/BlogModule")
            .interact()?,
    };

    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let dir = match &args.dir {
        Some(dir) => dir.clone(),
        None if args.no_interaction => PathBuf::from("src"),
        None => {
            let input: String = cliclack::input("Target directory")
                .placeholder("src")
                .default_input("src")
                .interact()?;
            PathBuf::from(input)
        }
    };
    let dir = if dir.is_absolute() {
        dir
    } else {
        current_dir.join(dir)
    };

    let format = select_format(args.format.as_deref(), None, args.no_interaction)?;

    let structure = match args.structure {
        Some(value) => value,
        None if args.no_interaction => false,
        None => cliclack::confirm("Do you want to generate the whole directory structure?")
            .initial_value(false)
            .interact()?,
    };

    let request = ModuleRequest::new(namespace, dir)
        .with_format(format)
        .with_structure(structure);
    let module = request.module()?;
    let plan = ModulePlanBuilder::new(&LocalFilesystem).build(&request)?;

    cliclack::note(
        "Summary",
        format!(
            "Generating module {} in {}\nusing the \"{}\" format, {} job(s).",
            module.name,
            module.root_path.display(),
            plan.format,
            plan.len()
        ),
    )?;

    finish(config, plan, args.skeleton_dir.clone(), &current_dir, args.dry_run, args.no_interaction)
}

fn load_manifest<C: ProductConfig>(config: &C, explicit: &Option<PathBuf>) -> Result<ProjectManifest> {
    let path = explicit
        .clone()
        .or_else(|| std::env::var_os(config.manifest_env()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(config.default_manifest()));

    let manifest = ProjectManifest::load(&path)
        .with_context(|| format!("Failed to load project manifest {}", path.display()))?;
    cliclack::log::info(format!("Using project manifest {}", path.display()))?;
    Ok(manifest)
}

fn select_entity(manifest: &ProjectManifest, args: &CrudArgs) -> Result<EntityRef> {
    if let Some(shorthand) = &args.entity {
        return Ok(EntityRef::parse(shorthand)?);
    }
    if args.no_interaction {
        anyhow::bail!("The --entity option is required in non-interactive mode.");
    }

    let known: Vec<String> = manifest
        .module_names()
        .into_iter()
        .flat_map(|module| {
            manifest
                .entity_names(&module)
                .into_iter()
                .map(move |entity| format!("{}:{}", module, entity))
        })
        .collect();

    let shorthand: String = if known.is_empty() {
        cliclack::input("The Entity shortcut name")
            .placeholder("BlogModule:Post")
            .interact()?
    } else {
        let mut select = cliclack::select("Select an entity");
        for name in &known {
            select = select.item(name.clone(), name, "");
        }
        select.interact()?
    };

    Ok(EntityRef::parse(&shorthand)?)
}

fn select_target_module(
    manifest: &ProjectManifest,
    entity: &EntityRef,
    args: &CrudArgs,
) -> Result<String> {
    if let Some(module) = &args.to_module {
        return Ok(module.clone());
    }

    let source = entity.module_part().to_string();
    let mut names = manifest.module_names();
    if args.no_interaction || names.len() <= 1 {
        return Ok(source);
    }

    // Source module first so it is the default choice
    names.retain(|name| name != &source);
    names.insert(0, source);

    let mut select = cliclack::select("Module receiving the generated files");
    for name in &names {
        select = select.item(name.clone(), name, "");
    }
    Ok(select.interact()?)
}

fn select_format(
    explicit: Option<&str>,
    default: Option<&str>,
    no_interaction: bool,
) -> Result<String> {
    if let Some(format) = explicit {
        return Ok(format.to_string());
    }
    let default = default.unwrap_or(ConfigFormat::Annotation.as_str());
    if no_interaction {
        return Ok(default.to_string());
    }

    let (initial, _) = ConfigFormat::normalize(default);
    let mut select = cliclack::select("Configuration format");
    for format in ConfigFormat::ALL {
        select = select.item(format, format.as_str(), format.display_name());
    }
    let format: ConfigFormat = select.initial_value(initial).interact()?;
    Ok(format.as_str().to_string())
}

fn finish<C: ProductConfig>(
    config: &C,
    plan: Plan,
    skeleton_dir: Option<PathBuf>,
    base: &Path,
    dry_run: bool,
    no_interaction: bool,
) -> Result<()> {
    if dry_run {
        print_plan(&plan, base);
        println!();
        print!("{}", plan.to_yaml().context("Failed to serialize plan")?);
        cliclack::outro("Dry run, nothing written.")?;
        return Ok(());
    }

    if !no_interaction {
        let confirm: bool = cliclack::confirm("Do you confirm generation?")
            .initial_value(true)
            .interact()?;
        if !confirm {
            anyhow::bail!("Generation cancelled.");
        }
    }

    let source = SkeletonSource::from_config(config, skeleton_dir);
    let skeletons = Skeletons::load(&source)?;
    if !skeletons.overridden().is_empty() {
        cliclack::log::info(format!(
            "Skeleton overrides: {}",
            skeletons.overridden().join(", ")
        ))?;
    }

    let spinner = cliclack::spinner();
    spinner.start("Generating files...");
    let mut renderer = SkeletonRenderer::new(skeletons);
    match execute_plan(&plan, &mut renderer) {
        Ok(written) => spinner.stop(format!("Generated {} file(s) and directories", written.len())),
        Err(e) => {
            spinner.stop("Generation failed");
            cliclack::log::error(format!("{}", e))?;
            cliclack::log::warning("Files written before the failure were kept.")?;
            return Err(e.into());
        }
    }

    print_next_steps(config, &plan)
}

fn print_next_steps<C: ProductConfig>(config: &C, plan: &Plan) -> Result<()> {
    let steps = config.next_steps(plan);

    if !steps.is_empty() {
        println!();
        println!("  Next steps");
        println!();

        for (i, step) in steps.iter().enumerate() {
            println!("  {}.  {}", i + 1, step);
        }
    }

    cliclack::outro("Everything is OK! Now get to work :).")?;

    Ok(())
}
