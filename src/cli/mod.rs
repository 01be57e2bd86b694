//! CB-006: CLI subcommands: init, validate, summary, parse, entries, serve.

use crate::core::{normalize, parser, types, Registry};
use clap::Subcommand;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a starter cookbook.yaml
    Init {
        /// Directory to initialize (default: current)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Validate cookbook.yaml and check every recipe expands cleanly
    Validate {
        /// Path to cookbook.yaml
        #[arg(short, long, default_value = "cookbook.yaml")]
        file: PathBuf,
    },

    /// Show total cook time and base ingredients for an entry
    Summary {
        /// Entry name
        name: String,

        /// Path to cookbook.yaml
        #[arg(short, long, default_value = "cookbook.yaml")]
        file: PathBuf,

        /// Override settings.max_depth
        #[arg(long)]
        max_depth: Option<usize>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Normalize a free-text name
    Parse {
        /// Raw input, e.g. "meatball_-_sub"
        input: String,
    },

    /// List entries in a cookbook
    Entries {
        /// Path to cookbook.yaml
        #[arg(short, long, default_value = "cookbook.yaml")]
        file: PathBuf,
    },

    /// Serve the HTTP API (/parse, /entry, /summary)
    #[cfg(feature = "server")]
    Serve {
        /// Path to a seed cookbook.yaml (optional)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Listen address (default: settings.bind)
        #[arg(long)]
        bind: Option<String>,
    },
}

/// Dispatch a CLI command.
pub fn dispatch(cmd: Commands) -> Result<(), String> {
    match cmd {
        Commands::Init { path } => cmd_init(&path),
        Commands::Validate { file } => cmd_validate(&file),
        Commands::Summary {
            name,
            file,
            max_depth,
            json,
        } => cmd_summary(&file, &name, max_depth, json),
        Commands::Parse { input } => cmd_parse(&input),
        Commands::Entries { file } => cmd_entries(&file),
        #[cfg(feature = "server")]
        Commands::Serve { file, bind } => cmd_serve(file.as_deref(), bind),
    }
}

const TEMPLATE: &str = r#"version: "1.0"
name: my-cookbook
description: "Managed by cookbook"

settings:
  max_depth: 1024
  bind: "127.0.0.1:8080"

entries:
  - type: ingredient
    name: Egg
    cookTime: 5
  - type: ingredient
    name: Flour
    cookTime: 2
  - type: recipe
    name: Pancake
    requiredItems:
      - { name: Egg, quantity: 2 }
      - { name: Flour, quantity: 1 }
"#;

fn cmd_init(path: &Path) -> Result<(), String> {
    let cookbook_path = path.join("cookbook.yaml");
    if cookbook_path.exists() {
        return Err(format!("{} already exists", cookbook_path.display()));
    }

    std::fs::create_dir_all(path)
        .map_err(|e| format!("cannot create {}: {}", path.display(), e))?;
    std::fs::write(&cookbook_path, TEMPLATE)
        .map_err(|e| format!("cannot write {}: {}", cookbook_path.display(), e))?;

    println!("Initialized cookbook at {}", path.display());
    println!("  Created: {}", cookbook_path.display());
    Ok(())
}

fn cmd_validate(file: &Path) -> Result<(), String> {
    let cookbook = parse_and_validate(file)?;
    let registry = parser::load_registry(&cookbook)?;
    let problems = check_recipes(&registry);
    if !problems.is_empty() {
        for p in &problems {
            eprintln!("  ERROR: {}", p);
        }
        return Err(format!("{} recipe(s) cannot be summarized", problems.len()));
    }

    let recipes = registry
        .entries()
        .iter()
        .filter(|e| e.kind() == types::EntryKind::Recipe)
        .count();
    println!(
        "OK: {} ({} ingredients, {} recipes)",
        cookbook.name,
        registry.len() - recipes,
        recipes
    );
    Ok(())
}

/// Summarize every recipe; returns one message per failure.
fn check_recipes(registry: &Registry) -> Vec<String> {
    registry
        .entries()
        .iter()
        .filter(|e| e.kind() == types::EntryKind::Recipe)
        .filter_map(|e| {
            registry
                .summarize(e.name())
                .err()
                .map(|err| format!("recipe '{}': {}", e.name(), err))
        })
        .collect()
}

fn cmd_summary(
    file: &Path,
    name: &str,
    max_depth: Option<usize>,
    json: bool,
) -> Result<(), String> {
    let mut cookbook = parse_and_validate(file)?;
    if let Some(depth) = max_depth {
        cookbook.settings.max_depth = depth;
    }
    let registry = parser::load_registry(&cookbook)?;

    let result = registry.summarize(name).map_err(|e| e.to_string())?;
    let report = types::SummaryReport::new(name, &result);
    if json {
        let out = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("JSON serialize error: {}", e))?;
        println!("{}", out);
    } else {
        print!("{}", format_report(&report));
    }
    Ok(())
}

fn format_report(report: &types::SummaryReport) -> String {
    let mut out = format!("{}: cook time {}\n", report.name, report.cook_time);
    for item in &report.ingredients {
        out.push_str(&format!("  {:>6} × {}\n", item.quantity, item.name));
    }
    out
}

fn cmd_parse(input: &str) -> Result<(), String> {
    let name = normalize::normalize_name(input).map_err(|e| e.to_string())?;
    println!("{}", name);
    Ok(())
}

fn cmd_entries(file: &Path) -> Result<(), String> {
    let cookbook = parse_and_validate(file)?;
    let registry = parser::load_registry(&cookbook)?;

    for entry in registry.entries() {
        match &entry {
            types::Entry::Ingredient(i) => {
                println!("  ingredient  {} (cook time {})", i.name, i.cook_time);
            }
            types::Entry::Recipe(r) => {
                println!("  recipe      {} ({} items)", r.name, r.required_items.len());
            }
        }
    }
    println!("{} entries", registry.len());
    Ok(())
}

#[cfg(feature = "server")]
fn cmd_serve(file: Option<&Path>, bind: Option<String>) -> Result<(), String> {
    let (registry, settings) = match file {
        Some(path) => {
            let cookbook = parse_and_validate(path)?;
            let registry = parser::load_registry(&cookbook)?;
            info!(entries = registry.len(), file = %path.display(), "loaded cookbook");
            (registry, cookbook.settings)
        }
        None => (Registry::new(), types::Settings::default()),
    };
    let addr = bind.unwrap_or(settings.bind);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("cannot start runtime: {}", e))?;
    runtime.block_on(crate::server::serve(registry, &addr))
}

fn parse_and_validate(file: &Path) -> Result<types::CookbookFile, String> {
    let cookbook = parser::parse_cookbook_file(file)?;
    let errors = parser::validate_cookbook(&cookbook);
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("  ERROR: {}", e);
        }
        return Err(format!("{} validation error(s)", errors.len()));
    }
    info!(name = %cookbook.name, entries = cookbook.entries.len(), "parsed cookbook");
    Ok(cookbook)
}
