//! The clausekit command-line tool.
//!
//! # Usage
//!
//! ```bash
//! # List the tables of a schema file
//! clausekit --schema schema.toml tables
//!
//! # Build a SELECT from filters
//! clausekit --schema schema.toml select users --where 'lastname~Do%' --order id:desc --limit 10
//!
//! # Compile a serialized tree
//! clausekit compile tree.json --format json
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use tracing_subscriber::EnvFilter;

use clausekit::parser::{parse_assignment, parse_filter, parse_order};
use clausekit::prelude::*;

#[derive(Parser)]
#[command(name = "clausekit")]
#[command(version)]
#[command(about = "Compile SQL clause trees to parameterized SQL", long_about = None)]
#[command(after_help = "EXAMPLES:
    clausekit --schema schema.toml select users --where 'id>=10' --order lastname
    clausekit --schema schema.toml update users --set lastname=Doe --where id=7
    clausekit --dialect postgres compile tree.json")]
struct Cli {
    /// Configuration file (default: <config dir>/clausekit/config.toml)
    #[arg(short, long, env = "CLAUSEKIT_CONFIG")]
    config: Option<PathBuf>,

    /// Schema file describing the tables
    #[arg(short, long, env = "CLAUSEKIT_SCHEMA")]
    schema: Option<PathBuf>,

    /// Identifier quoting dialect: generic, sqlite, postgres, mysql
    #[arg(short, long)]
    dialect: Option<Dialect>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tables and columns of the schema
    Tables,
    /// Build a SELECT statement
    Select {
        table: String,
        /// Alias the table (`users AS u`)
        #[arg(long = "as")]
        alias: Option<String>,
        /// Columns to select (default: all)
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,
        /// Filter `col<op>value`, op is one of = != < <= > >= ~
        #[arg(short, long = "where")]
        filters: Vec<String>,
        /// Order term `col`, `col:asc` or `col:desc`
        #[arg(short, long)]
        order: Vec<String>,
        #[arg(long)]
        limit: Option<u64>,
        #[arg(long)]
        offset: Option<u64>,
        #[arg(long)]
        distinct: bool,
    },
    /// Build an INSERT statement
    Insert {
        table: String,
        /// Value `col=value` (default: every column)
        #[arg(long = "set")]
        values: Vec<String>,
    },
    /// Build an UPDATE statement
    Update {
        table: String,
        #[arg(long = "set")]
        values: Vec<String>,
        #[arg(short, long = "where")]
        filters: Vec<String>,
    },
    /// Build a DELETE statement
    Delete {
        table: String,
        #[arg(short, long = "where")]
        filters: Vec<String>,
    },
    /// Compile a clause tree stored as JSON
    Compile {
        /// Path to the JSON file, `-` for stdin
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    init_tracing(&config, cli.verbose);

    if let Some(dialect) = cli.dialect {
        config.dialect = dialect;
        config.quoting = None;
    }
    let compiler = config.compiler();
    let schema = cli.schema.clone().or_else(|| config.schema.clone());

    let element: ClauseElement = match &cli.command {
        Commands::Tables => {
            show_tables(&load_catalog(schema.as_deref())?);
            return Ok(());
        }
        Commands::Select {
            table,
            alias,
            columns,
            filters,
            order,
            limit,
            offset,
            distinct,
        } => {
            let catalog = load_catalog(schema.as_deref())?;
            let table = catalog.table(table)?;
            let from: TableRef = match alias {
                Some(name) => table.alias(name.as_str())?.into(),
                None => table.into(),
            };
            let mut select = if columns.is_empty() {
                from.select()
            } else {
                from.select_columns(columns.as_slice())?
            };
            for f in filters {
                select = select.where_(parse_filter(f)?.to_clause(&from)?);
            }
            for term in order {
                let (name, direction) = parse_order(term)?;
                let col = from.c(&name)?;
                select = select.order_by(match direction {
                    Some(Operator::Desc) => col.desc(),
                    Some(_) => col.asc(),
                    None => col.into(),
                });
            }
            if let Some(n) = limit {
                select = select.limit(*n);
            }
            if let Some(n) = offset {
                select = select.offset(*n);
            }
            if *distinct {
                select = select.distinct();
            }
            select.into()
        }
        Commands::Insert { table, values } => {
            let catalog = load_catalog(schema.as_deref())?;
            let mut insert = catalog.table(table)?.insert();
            if !values.is_empty() {
                insert = insert.values(parse_assignments(values)?);
            }
            insert.into()
        }
        Commands::Update {
            table,
            values,
            filters,
        } => {
            let catalog = load_catalog(schema.as_deref())?;
            let table = catalog.table(table)?;
            let mut update = table.update();
            if !values.is_empty() {
                update = update.values(parse_assignments(values)?);
            }
            for f in filters {
                update = update.where_(parse_filter(f)?.to_clause(table)?);
            }
            update.into()
        }
        Commands::Delete { table, filters } => {
            let catalog = load_catalog(schema.as_deref())?;
            let table = catalog.table(table)?;
            let mut delete = table.delete();
            for f in filters {
                delete = delete.where_(parse_filter(f)?.to_clause(table)?);
            }
            delete.into()
        }
        Commands::Compile { file } => {
            let json = if file.as_os_str() == "-" {
                std::io::read_to_string(std::io::stdin())?
            } else {
                std::fs::read_to_string(file)
                    .with_context(|| format!("reading {}", file.display()))?
            };
            ClauseElement::from_json(&json)?
        }
    };

    if cli.verbose {
        eprintln!("{} {}", "Element:".dimmed(), element.kind().yellow());
    }

    let compiled = compiler.compile(&element)?;
    print_compiled(&compiled, cli.format)?;
    Ok(())
}

fn init_tracing(config: &Config, verbose: bool) {
    let level = if verbose { "debug" } else { config.log_level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    let Some(path) = path else {
        bail!("no schema file; pass --schema or set `schema` in the config file");
    };
    Catalog::load(path).with_context(|| format!("loading schema {}", path.display()))
}

fn parse_assignments(raw: &[String]) -> Result<Vec<(String, Value)>> {
    raw.iter()
        .map(|s| parse_assignment(s).map_err(anyhow::Error::from))
        .collect()
}

fn print_compiled(compiled: &Compiled, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(compiled)?);
        }
        OutputFormat::Text => {
            println!("{}", compiled.sql().white().bold());
            if !compiled.params().is_empty() {
                println!();
                println!("{}", "Params:".cyan());
                for (key, value) in compiled.params().iter() {
                    println!("  :{} = {}", key, value.to_string().yellow());
                }
            }
        }
    }
    Ok(())
}

fn show_tables(catalog: &Catalog) {
    if catalog.is_empty() {
        println!("{}", "(no tables)".dimmed());
        return;
    }
    for table in catalog.tables() {
        println!("{}", table.name().cyan().bold());
        for col in table.columns() {
            let mut ty = col.sql_type.to_string();
            if let Some(len) = col.options.length {
                ty = format!("{}({})", ty, len);
            }
            let mut notes = Vec::new();
            if col.options.primary_key {
                notes.push("primary key".to_string());
            }
            if col.options.auto_increment {
                notes.push("auto increment".to_string());
            }
            if !col.options.nullable && !col.options.primary_key {
                notes.push("not null".to_string());
            }
            if let Some(fk) = &col.options.foreign_key {
                notes.push(format!("-> {}", fk));
            }
            println!(
                "  {:20} {:14} {}",
                col.name.white(),
                ty.yellow(),
                notes.join(", ").dimmed()
            );
        }
    }
}
