//! meshfilter CLI - list, describe and apply mesh filters.
//!
//! Usage: meshfilter <COMMAND> [OPTIONS]
//!
//! Run `meshfilter --help` for available commands. Set `RUST_LOG=debug` for
//! execution logs.

use std::collections::BTreeMap;
use std::io::Write;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use meshfilter::filter::{FilterCatalog, FilterClass, FilterId, ParameterSet, Progress};
use meshfilter::io;
use meshfilter::mesh::update::{refresh, UpdateOptions};
use meshfilter::mesh::MeshModel;

#[derive(Parser)]
#[command(name = "meshfilter")]
#[command(author, version, about = "Mesh filter CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available filters grouped by class
    List,

    /// Show a filter's description, parameters and invalidated attributes
    Describe {
        /// Filter key (e.g. move_vertex)
        filter: String,
    },

    /// Apply a filter to a mesh file
    Apply {
        /// Filter key (e.g. move_vertex)
        filter: String,

        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Parameter override as name=value; unset parameters start from values
        /// fitted to the input mesh
        #[arg(short, long = "param", value_name = "NAME=VALUE")]
        params: Vec<String>,

        /// Use single-threaded attribute refresh
        #[arg(long)]
        sequential: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = FilterCatalog::with_builtin();

    match cli.command {
        Commands::List => cmd_list(&catalog)?,
        Commands::Describe { filter } => cmd_describe(&catalog, &filter)?,
        Commands::Apply {
            filter,
            input,
            output,
            params,
            sequential,
        } => cmd_apply(&catalog, &filter, &input, &output, &params, sequential)?,
    }

    Ok(())
}

/// Create a progress reporter that displays a progress bar on the terminal.
fn create_progress<'a>() -> Progress<'a> {
    Progress::new(|percent, message| {
        let bar_width = 30;
        let filled = (usize::from(percent) * bar_width) / 100;
        let empty = bar_width - filled;

        let bar = "=".repeat(filled);
        let space = " ".repeat(empty);

        // Use carriage return to overwrite the line
        eprint!("\r[{}{}] {:3}% {}", bar, space, percent, message);
        let _ = std::io::stderr().flush();

        if percent >= 100 {
            eprintln!();
        }
        ControlFlow::Continue(())
    })
}

fn cmd_list(catalog: &FilterCatalog) -> Result<(), Box<dyn std::error::Error>> {
    let mut groups: BTreeMap<FilterClass, Vec<FilterId>> = BTreeMap::new();
    for id in catalog.filters() {
        groups.entry(catalog.classify(id)?).or_default().push(id);
    }

    for (class, ids) in groups {
        println!("{}:", class);
        for id in ids {
            println!("  {:<16} {}", id.key(), catalog.name(id)?);
        }
    }
    Ok(())
}

fn cmd_describe(catalog: &FilterCatalog, filter: &str) -> Result<(), Box<dyn std::error::Error>> {
    let id = catalog.resolve(filter)?;
    let schema = catalog.parameter_schema(id)?;

    println!("{} ({})", catalog.name(id)?, id.key());
    println!("Class: {}", catalog.classify(id)?);
    let dialog = if catalog.auto_dialog(id)? { "generated" } else { "custom" };
    println!("Dialog: {}", dialog);
    println!("{}", catalog.description(id)?);
    println!();
    println!("Parameters:");
    for spec in schema.iter() {
        let default = spec
            .default
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());
        let required = if spec.required { "required" } else { "optional" };
        println!(
            "  {:<10} {:<7} {:<9} default={:<12} {}",
            spec.name, spec.ty, required, default, spec.tooltip
        );
    }
    println!();
    println!("Invalidates: {}", catalog.invalidation_mask(id)?);
    Ok(())
}

fn parse_params(
    catalog: &FilterCatalog,
    id: FilterId,
    mesh: &MeshModel,
    overrides: &[String],
) -> Result<ParameterSet, Box<dyn std::error::Error>> {
    let schema = catalog.parameter_schema(id)?;
    let mut params = catalog.init_parameters(id, mesh)?;

    for entry in overrides {
        let (name, text) = entry
            .split_once('=')
            .ok_or_else(|| format!("parameter `{}` must be written as name=value", entry))?;
        let spec = schema
            .get(name)
            .ok_or_else(|| format!("filter {} has no parameter `{}`", id, name))?;
        params.set(name, spec.ty.parse(name, text)?);
    }
    Ok(params)
}

fn cmd_apply(
    catalog: &FilterCatalog,
    filter: &str,
    input: &Path,
    output: &Path,
    overrides: &[String],
    sequential: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let id = catalog.resolve(filter)?;

    let mut mesh = io::load(input)?;
    println!("Loaded: {} vertices, {} faces", mesh.num_vertices(), mesh.num_faces());
    let params = parse_params(catalog, id, &mesh, overrides)?;

    let summary: Vec<String> = params.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
    println!("Applying {} ({})...", catalog.name(id)?, summary.join(", "));

    let start = Instant::now();
    {
        let mut progress = create_progress();
        catalog.execute(id, &mut mesh, &params, &mut progress)?;
    }

    let mask = catalog.invalidation_mask(id)?;
    let options = UpdateOptions::default().with_parallel(!sequential);
    refresh(&mut mesh, mask, &options);
    let elapsed = start.elapsed();

    println!("Refreshed: {}", mask);
    io::save(&mesh, output)?;
    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    Ok(())
}
