//! CLI for the rewrite-dsl tool.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use rewrite_dsl::prelude::*;
use rewrite_dsl::recipe;
use rewrite_dsl::tree::{ClassDeclaration, Statement};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rewrite")]
#[command(author, version, about = "Lossless Java rewriting tool", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Migrate @Rule fields to an @AfterEach close call
    Run {
        /// Path to the project
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Migration config (YAML or JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Preview changes without applying
        #[arg(long)]
        dry_run: bool,

        /// Print a diff of the changes
        #[arg(long)]
        diff: bool,

        /// Do not upgrade build file dependencies
        #[arg(long)]
        skip_dependencies: bool,

        /// Print a JSON report instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show available recipes
    Recipes,

    /// Show the declarations of a Java file with their resolved types
    Print {
        /// Java source file
        file: PathBuf,

        /// Print the re-printed source instead of an outline
        #[arg(long)]
        source: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run {
            path,
            config,
            dry_run,
            diff,
            skip_dependencies,
            json,
        } => cmd_run(path, config, dry_run, diff, skip_dependencies, json),
        Commands::Recipes => cmd_recipes(),
        Commands::Print { file, source } => cmd_print(&file, source),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_recipe(config: Option<&Path>) -> Result<RuleToLifecycleMethod> {
    match config {
        Some(path) => {
            let config = RuleMigrationConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?;
            RuleToLifecycleMethod::new(config).context("Invalid migration config")
        }
        None => update_mock_web_server().context("Failed to build recipe"),
    }
}

#[derive(Serialize)]
struct Report<'a> {
    dry_run: bool,
    files: Vec<&'a Path>,
    summary: &'a DiffSummary,
    actions: &'a [ActionReport],
    diagnostics: &'a [Diagnostic],
}

fn cmd_run(
    path: PathBuf,
    config: Option<PathBuf>,
    dry_run: bool,
    diff: bool,
    skip_dependencies: bool,
    json: bool,
) -> Result<()> {
    let mut rewrite = Rewrite::in_repo(&path).recipe(load_recipe(config.as_deref())?);
    if dry_run {
        rewrite = rewrite.dry_run();
    }
    if skip_dependencies {
        rewrite = rewrite.skip_dependencies();
    }

    let result = rewrite.run().context("Rewrite failed")?;

    if json {
        let report = Report {
            dry_run,
            files: result
                .all_changes()
                .map(|c| c.path.strip_prefix(&result.root).unwrap_or(&c.path))
                .collect(),
            summary: &result.summary,
            actions: &result.actions,
            diagnostics: &result.diagnostics,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if dry_run || diff {
        println!("{}", result.colorized_diff());
        println!("\n{}", result.summary);
    } else {
        println!("Modified {} file(s)", result.files_modified());
    }

    for action in &result.actions {
        match &action.error {
            Some(error) => eprintln!("warning: {}: {}", action.action, error),
            None if !action.changes.is_empty() => {
                println!("{}: {} file(s)", action.action, action.changes.len());
            }
            None => {}
        }
    }
    for diagnostic in &result.diagnostics {
        eprintln!("warning: {diagnostic}");
    }

    Ok(())
}

fn cmd_recipes() -> Result<()> {
    println!("Available recipes:");
    for recipe in recipe::builtin().context("Failed to build recipes")? {
        println!("  {} - {}", recipe.name(), recipe.display_name());
        println!("      {}", recipe.description());
        for action in recipe.recipe_list() {
            println!("      then: {}", action.describe());
        }
    }
    Ok(())
}

fn cmd_print(file: &Path, source: bool) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let recipe = update_mock_web_server().context("Failed to build recipe")?;
    let cu = JavaParser::new()
        .classpath(recipe.classpath())
        .parse(&text, file)
        .context("Failed to parse")?;

    if source {
        print!("{cu}");
        return Ok(());
    }

    if !cu.package_name().is_empty() {
        println!("package {}", cu.package_name());
    }
    for import in &cu.imports {
        println!("import {}", import.qualid);
    }
    for class in cu.classes() {
        print_class(class, 0);
    }
    Ok(())
}

fn type_name(ty: Option<&JavaType>) -> String {
    ty.map(JavaType::to_string)
        .unwrap_or_else(|| "?".to_string())
}

fn print_class(class: &ClassDeclaration, depth: usize) {
    let indent = "  ".repeat(depth);
    println!(
        "{indent}{} {} : {}",
        class.kind.keyword(),
        class.name.simple_name,
        type_name(class.ty.as_ref())
    );
    for statement in &class.body.statements {
        match statement {
            Statement::Variables(vd) => {
                let annotations: Vec<_> = vd
                    .leading_annotations
                    .iter()
                    .map(|a| format!("@{}", type_name(a.name.ty.as_ref())))
                    .collect();
                for variable in &vd.variables {
                    println!(
                        "{indent}  field {} : {} {}",
                        variable.name.simple_name,
                        type_name(vd.type_expr.ty.as_ref()),
                        annotations.join(" ")
                    );
                }
            }
            Statement::Method(md) => {
                let annotations: Vec<_> = md
                    .leading_annotations
                    .iter()
                    .map(|a| format!("@{}", type_name(a.name.ty.as_ref())))
                    .collect();
                let thrown: Vec<_> = md
                    .thrown_types()
                    .iter()
                    .map(|t| type_name(t.ty.as_ref()))
                    .collect();
                println!(
                    "{indent}  method {}{} : {} throws [{}] {}",
                    md.name.simple_name,
                    md.parameters,
                    type_name(md.return_type.ty.as_ref()),
                    thrown.join(", "),
                    annotations.join(" ")
                );
            }
            Statement::Class(inner) => print_class(inner, depth + 1),
            Statement::Invocation(_) | Statement::Raw(_) => {}
        }
    }
}
