use std::fs;
use std::path::PathBuf;

use argbind_core::ParseError;
use argbind_schema::{Record, SchemaFile};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt};

const LOG_ENV: &str = "ARGBIND_LOG";

/// Output format for bound records.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "argbind")]
#[command(about = "Bind command-line tokens against declarative argument schemas")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Bind tokens (given after `--`) against a schema and print the record.
    Parse(ParseArgs),
    /// Check that one or more schema files compile.
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Schema file (.json, .yml or .yaml).
    #[arg(long)]
    schema: PathBuf,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
    /// Write the record to this file instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Tokens to bind.
    #[arg(last = true)]
    tokens: Vec<String>,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Schema files to check.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Validate(args) => run_validate(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn run_parse(args: ParseArgs) -> Result<(), String> {
    let schema = SchemaFile::load(&args.schema)
        .map_err(|err| format!("Failed to load '{}': {err}", args.schema.display()))?;
    let definition = schema
        .compile()
        .map_err(|err| format!("Invalid schema '{}': {err}", args.schema.display()))?;
    debug!(tokens = args.tokens.len(), "binding tokens");

    let record = definition
        .parse(args.tokens.as_slice())
        .map_err(|err: ParseError| {
            debug!(kind = ?err.kind(), "binding failed");
            err.to_string()
        })?;
    let rendered = render(&record, args.format)?;

    match &args.output {
        Some(path) => {
            fs::write(path, rendered)
                .map_err(|err| format!("Failed to write '{}': {err}", path.display()))?;
            info!(path = %path.display(), "wrote record");
        }
        None => println!("{}", rendered.trim_end()),
    }
    Ok(())
}

fn render(record: &Record, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(record)
            .map_err(|err| format!("Failed to serialize record: {err}")),
        OutputFormat::Yaml => serde_yaml::to_string(record)
            .map_err(|err| format!("Failed to serialize record: {err}")),
    }
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let mut failures = 0;
    for path in &args.inputs {
        match SchemaFile::load(path).and_then(|schema| schema.compile().map(|_| schema)) {
            Ok(schema) => println!("ok: {} ({} fields)", path.display(), schema.fields.len()),
            Err(err) => {
                failures += 1;
                println!("invalid: {}: {err}", path.display());
            }
        }
    }

    if failures > 0 {
        return Err(format!(
            "{failures} of {} schema file(s) failed validation",
            args.inputs.len()
        ));
    }
    println!("Validated {} schema file(s).", args.inputs.len());
    Ok(())
}
