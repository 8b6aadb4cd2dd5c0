//! Table profiling CLI.
//!
//! Reads table snapshots (or schema maps) from JSON files, runs the
//! profiling engine, and writes profile JSON. All algorithmic content lives
//! in `tableprof-core`; this binary is file plumbing around it.

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tableprof_core::{
    ProfileError, Result, SchemaMap, TableProfiler, TableSnapshot, init_logging,
    initialize_snapshot_validator, relationship_edges, resolve_foreign_keys,
    validate_and_parse_snapshot,
};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "tableprof")]
#[command(about = "Table snapshot profiler and relationship resolver")]
#[command(version)]
#[command(long_about = "
tableprof - data quality profiling for table snapshots

Profiles in-memory table snapshots collected from SQLite-like databases:
- Semantic type classification per column
- Completeness, consistency, validity, and uniqueness scoring
- Statistical and business-rule anomaly detection
- Foreign-key relationship inference, per table and schema-wide

EXAMPLES:
  tableprof profile --input users.snapshot.json
  tableprof profile --input tables.json --schema all_schemas.json --pretty
  tableprof resolve --input all_schemas.json -o resolved.json
")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Profile one or more table snapshots
    Profile(ProfileArgs),
    /// Resolve foreign keys across a multi-table schema map
    Resolve(ResolveArgs),
}

#[derive(Args)]
struct ProfileArgs {
    /// Snapshot JSON file (one snapshot object or an array of them)
    #[arg(short, long)]
    input: PathBuf,

    /// Cross-table schema map for relationship confirmation
    #[arg(long)]
    schema: Option<PathBuf>,

    /// Output file path (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the output JSON
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct ResolveArgs {
    /// Schema map JSON file (qualified table name -> {columns, foreign_keys})
    #[arg(short, long)]
    input: PathBuf,

    /// Output file path (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the output JSON
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct GlobalArgs {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.global.verbose, cli.global.quiet)?;

    initialize_snapshot_validator()
        .map_err(|e| ProfileError::configuration(format!("validator setup failed: {}", e)))?;

    match cli.command {
        Command::Profile(args) => run_profile(&args),
        Command::Resolve(args) => run_resolve(&args),
    }
}

/// Profiles every snapshot in the input file.
///
/// Rejected snapshots become `{"error", "table"}` objects in the output, in
/// position, so one bad table never costs the caller the rest of the batch.
fn run_profile(args: &ProfileArgs) -> Result<()> {
    let raw = read_file(&args.input)?;
    let value: serde_json::Value = serde_json::from_str(&raw)
        .map_err(|e| ProfileError::serialization("parsing snapshot input", e))?;

    let cross_schema = match &args.schema {
        Some(path) => Some(read_schema_map(path)?),
        None => None,
    };

    let profiler = TableProfiler::new();
    let single_input = value.is_object();
    let snapshots: Vec<serde_json::Value> = match value {
        serde_json::Value::Array(items) => items,
        other => vec![other],
    };

    info!("profiling {} snapshot(s)", snapshots.len());

    let mut outputs = Vec::with_capacity(snapshots.len());
    for snapshot_value in snapshots {
        outputs.push(profile_one(&profiler, &snapshot_value, cross_schema.as_ref()));
    }

    let result = if single_input {
        outputs.into_iter().next().unwrap_or(serde_json::Value::Null)
    } else {
        serde_json::Value::Array(outputs)
    };

    write_output(&result, args.output.as_deref(), args.pretty)
}

/// Profiles one snapshot value, degrading failures to an error object.
fn profile_one(
    profiler: &TableProfiler,
    snapshot_value: &serde_json::Value,
    cross_schema: Option<&SchemaMap>,
) -> serde_json::Value {
    let table_name = snapshot_value
        .get("table_name")
        .and_then(|v| v.as_str())
        .unwrap_or("<unknown>")
        .to_string();

    let parsed: std::result::Result<TableSnapshot, String> =
        match serde_json::to_string(snapshot_value) {
            Ok(raw) => validate_and_parse_snapshot(&raw).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

    let profile = match parsed {
        Ok(snapshot) => profiler
            .profile(&snapshot, cross_schema)
            .map_err(|e| e.to_string()),
        Err(message) => Err(message),
    };

    match profile {
        Ok(profile) => {
            info!(
                "profiled table '{}': quality {:.3}",
                profile.table_name, profile.table_quality_score
            );
            serde_json::to_value(&profile).unwrap_or_else(|e| {
                error_object(&table_name, &format!("profile serialization failed: {}", e))
            })
        }
        Err(message) => {
            warn!("profiling failed for table '{}': {}", table_name, message);
            error_object(&table_name, &message)
        }
    }
}

fn error_object(table: &str, message: &str) -> serde_json::Value {
    serde_json::json!({ "error": message, "table": table })
}

/// Resolves foreign keys across the schema map and emits diagram edges.
fn run_resolve(args: &ResolveArgs) -> Result<()> {
    let mut schema = read_schema_map(&args.input)?;

    resolve_foreign_keys(&mut schema);
    let edges = relationship_edges(&schema);

    let total_keys: usize = schema.values().map(|meta| meta.foreign_keys.len()).sum();
    info!(
        "resolved {} foreign key(s) across {} table(s), {} edge(s)",
        total_keys,
        schema.len(),
        edges.len()
    );

    let result = serde_json::json!({ "schema": schema, "edges": edges });
    write_output(&result, args.output.as_deref(), args.pretty)
}

fn read_schema_map(path: &Path) -> Result<SchemaMap> {
    let raw = read_file(path)?;
    serde_json::from_str(&raw)
        .map_err(|e| ProfileError::serialization("parsing schema map", e))
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| ProfileError::io(format!("failed to read {}", path.display()), e))
}

fn write_output(
    value: &serde_json::Value,
    output: Option<&Path>,
    pretty: bool,
) -> Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| ProfileError::serialization("rendering output", e))?;

    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .map_err(|e| ProfileError::io(format!("failed to write {}", path.display()), e))?;
            info!("output written to {}", path.display());
        }
        None => println!("{}", rendered),
    }

    Ok(())
}
