//! Command-line interface for the snowduck bridge.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use snowduck::{create_querier, Config, MetadataAdapter, Querier, SchemaDescription};

#[derive(Parser)]
#[command(
    name = "snowduck",
    about = "Dual-engine SQL bridge: Snowflake-authored SQL on DuckDB or Snowflake",
    version
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.yaml", global = true)]
    config: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, default_value = "info", global = true)]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every .sql file in a directory, in lexical order
    Deploy {
        /// Directory containing the .sql files
        dir: PathBuf,

        /// List the files without executing them
        #[arg(long)]
        dry_run: bool,
    },

    /// Show how a declared schema converts for the embedded engine
    Preview {
        /// YAML schema description
        schema: PathBuf,
    },

    /// Execute one statement and print the result table
    Query {
        /// Inline SQL text
        #[arg(long, conflicts_with = "file")]
        sql: Option<String>,

        /// SQL file, resolved against the configured sql_root
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.verbosity)),
        )
        .with_target(false)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err.format_detailed());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> snowduck::Result<()> {
    match cli.command {
        Commands::Deploy { dir, dry_run } => {
            let config = Config::load(&cli.config)?;
            let querier = create_querier(&config)?;
            deploy(querier.as_ref(), &dir, dry_run)
        }
        Commands::Preview { schema } => preview(&schema),
        Commands::Query { sql, file } => {
            let config = Config::load(&cli.config)?;
            let querier = create_querier(&config)?;
            query(querier.as_ref(), sql, file)
        }
    }
}

fn deploy(querier: &dyn Querier, dir: &Path, dry_run: bool) -> snowduck::Result<()> {
    let mut scripts: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "sql") {
            scripts.push(path);
        }
    }
    scripts.sort();

    if scripts.is_empty() {
        info!(dir = %dir.display(), "no .sql files found");
        return Ok(());
    }

    for script in &scripts {
        if dry_run {
            info!(script = %script.display(), "would execute");
            continue;
        }
        info!(script = %script.display(), "executing");
        querier.execute_from_source(script)?;
    }
    info!(count = scripts.len(), "deployment finished");
    Ok(())
}

fn preview(schema_path: &Path) -> snowduck::Result<()> {
    let contents = fs::read_to_string(schema_path)?;
    let schema: SchemaDescription = serde_yaml::from_str(&contents)?;

    let adapter = MetadataAdapter::new();
    let adapted = adapter.adapt(&schema);
    let report = adapter.summarize(&schema, &adapted);
    print!("{report}");

    for table in schema.tables() {
        println!("\n{};", adapter.preview_ddl(table));
    }
    Ok(())
}

fn query(
    querier: &dyn Querier,
    sql: Option<String>,
    file: Option<PathBuf>,
) -> snowduck::Result<()> {
    let result = match (sql, file) {
        (Some(text), _) => querier.execute(&text)?,
        (None, Some(path)) => querier.execute_from_source(&path)?,
        (None, None) => {
            return Err(snowduck::BridgeError::config(
                "query needs either --sql or --file",
            ))
        }
    };
    print!("{result}");
    Ok(())
}
