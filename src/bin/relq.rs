//! relq — compile JSON query descriptors from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Show the SQL for a descriptor
//! relq user '{"where": ["status", "$eq", ":active"], "params": {"active": true}}' --dry-run
//!
//! # Read the descriptor from a file and execute it
//! relq user @query.json --schema user=app_user --database-url postgres://localhost/app
//! ```

use std::collections::HashMap;
use std::fs;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use relq::prelude::*;

#[derive(Parser)]
#[command(name = "relq")]
#[command(version)]
#[command(about = "Compile declarative JSON query descriptors into relational queries", long_about = None)]
#[command(after_help = "EXAMPLES:
    relq user '{\"where\": [\"status\", \"$eq\", \":active\"], \"params\": {\"active\": true}}' --dry-run
    relq user @query.json --schema user=app_user
    relq order '{\"relations\": [\"items\"], \"limit\": 10}' --database-url sqlite://app.db")]
struct Cli {
    /// The entity to query
    entity: Option<String>,

    /// The descriptor: inline JSON, or @path to read a file
    descriptor: Option<String>,

    /// Entity to canonical-name mappings (entity=table)
    #[arg(short, long, value_delimiter = ',')]
    schema: Vec<String>,

    /// Don't execute, just show the generated SQL
    #[arg(short, long)]
    dry_run: bool,

    /// Database connection URL
    #[arg(long, env = "RELQ_DATABASE_URL")]
    database_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the default operator table
    Operators,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Operators) => show_operators(),
        None => match (&cli.entity, &cli.descriptor) {
            (Some(entity), Some(descriptor)) => {
                if let Err(e) = run(entity, descriptor, &cli).await {
                    eprintln!("{} {}", "Error:".red().bold(), e);
                    std::process::exit(1);
                }
            }
            _ => {
                println!("{}", "relq — declarative query descriptors, compiled".cyan().bold());
                println!();
                println!("Usage: relq <ENTITY> <DESCRIPTOR> [OPTIONS]");
                println!();
                println!("Try: relq --help");
            }
        },
    }
}

async fn run(entity: &str, descriptor_arg: &str, cli: &Cli) -> Result<()> {
    let raw = match descriptor_arg.strip_prefix('@') {
        Some(path) => fs::read_to_string(path).with_context(|| format!("reading {path}"))?,
        None => descriptor_arg.to_string(),
    };
    let descriptor = QueryDescriptor::from_json(&raw)?;

    if cli.verbose {
        println!("{} {}", "Entity:".dimmed(), entity.yellow());
        println!("{} {}", "Descriptor:".dimmed(), raw.trim().yellow());
    }

    let schema = build_schema(entity, &cli.schema)?;
    let ctx = ExecutionContext::new(&schema);
    let builder = relq::compile(entity, &descriptor, &ctx, None)?;
    let sql = builder.to_sql();

    if cli.dry_run || cli.database_url.is_none() {
        println!("{}", "Generated SQL:".green().bold());
        println!("{}", sql.white());

        if !builder.params().is_empty() {
            println!();
            println!("{}", "Bindings:".cyan());
            let mut names: Vec<&String> = builder.params().keys().collect();
            names.sort_unstable();
            for name in names {
                println!("  :{} = {}", name, builder.params()[name].to_string().yellow());
            }
        }

        if cli.database_url.is_none() && !cli.dry_run {
            println!();
            println!(
                "{}",
                "No database URL. Use --database-url or set RELQ_DATABASE_URL".yellow()
            );
        }
        return Ok(());
    }

    let url = cli
        .database_url
        .as_ref()
        .ok_or_else(|| anyhow!("missing database URL"))?;
    if cli.verbose {
        println!("{} {}", "Connecting to:".dimmed(), url);
    }

    let db = QueryDb::connect(url).await?;
    let results = db.fetch_all(&builder).await?;
    format_output(&results, &cli.format);

    Ok(())
}

/// Parse `entity=table` pairs; an entity with no mapping resolves to itself.
fn build_schema(entity: &str, pairs: &[String]) -> Result<StaticSchema> {
    let mut schema = StaticSchema::new().entity(entity, entity);
    for pair in pairs {
        let (id, canonical) = pair
            .split_once('=')
            .ok_or_else(|| anyhow!("invalid schema mapping '{pair}', expected entity=table"))?;
        schema = schema.entity(id, canonical);
    }
    Ok(schema)
}

fn format_output(results: &[HashMap<String, serde_json::Value>], format: &OutputFormat) {
    if results.is_empty() {
        println!("{}", "(no results)".dimmed());
        return;
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(results).unwrap_or_default());
        }
        OutputFormat::Table => {
            let columns: Vec<&String> = results[0].keys().collect();

            let mut widths: HashMap<&String, usize> = columns.iter().map(|c| (*c, c.len())).collect();
            for row in results {
                for (col, val) in row {
                    let len = val_to_string(val).len();
                    if let Some(w) = widths.get_mut(col) {
                        *w = (*w).max(len);
                    }
                }
            }

            let header: Vec<String> = columns
                .iter()
                .map(|c| format!("{:width$}", c, width = widths[*c]))
                .collect();
            println!("{}", header.join(" │ ").white().bold());

            let sep: Vec<String> = columns.iter().map(|c| "─".repeat(widths[*c])).collect();
            println!("{}", sep.join("─┼─").dimmed());

            for row in results {
                let cells: Vec<String> = columns
                    .iter()
                    .map(|c| {
                        let val = row.get(*c).map(val_to_string).unwrap_or_default();
                        format!("{:width$}", val, width = widths[*c])
                    })
                    .collect();
                println!("{}", cells.join(" │ "));
            }

            println!();
            println!("{} row(s) returned", results.len().to_string().cyan());
        }
    }
}

fn val_to_string(val: &serde_json::Value) -> String {
    match val {
        serde_json::Value::Null => "NULL".to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.clone(),
        _ => val.to_string(),
    }
}

fn show_operators() {
    println!("{}", "relq Operator Reference".cyan().bold());
    println!();

    let table = OperatorTable::default();
    println!(
        "{:14} {}",
        "Token".white().bold(),
        "Renders as".white().bold()
    );
    println!("{}", "─".repeat(32).dimmed());

    for token in table.tokens() {
        let syntax = table.get(token).unwrap_or_default();
        println!("{:14} {}", token.cyan().bold(), syntax.white());
    }
}
