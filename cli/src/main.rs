mod input;
mod logging;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use config_conformance_core::{
    CompiledSchema, DEFAULT_BASE_PATH, ErrorAggregator, KeySet, TypeDecl, ValidateOptions,
    ValidationSummary, flush_aggregator, route_message, type_label, validate_structure,
    warn_keys_once,
};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::input::{load_document, load_schema};

/// CLI output format.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "conformance-check")]
#[command(about = "Check configuration files against a schema description")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check configuration files and report every finding.
    Validate(ValidateArgs),
    /// Print the types declared by a schema description.
    Describe(DescribeArgs),
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Schema description (JSON or YAML).
    #[arg(long)]
    schema: PathBuf,
    /// Treat advisory findings (unknown or deprecated keys) as failures.
    #[arg(long)]
    strict: bool,
    /// Output format.
    #[arg(long, default_value = "text")]
    format: CliOutputFormat,
    /// Configuration files to check (JSON, or YAML by extension).
    #[arg(required = true)]
    configs: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct DescribeArgs {
    /// Schema description (JSON or YAML).
    #[arg(long)]
    schema: PathBuf,
    /// Output format.
    #[arg(long, default_value = "text")]
    format: CliOutputFormat,
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let result = match cli.command {
        Command::Validate(args) => run_validate(args),
        Command::Describe(args) => run_describe(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let schema = load_schema(&args.schema)?;
    info!(
        schema = %args.schema.display(),
        root = schema.root.name(),
        configs = args.configs.len(),
        strict = args.strict,
        "validating"
    );

    let mut summary = ValidationSummary::new(args.strict);
    let mut aggregator = ErrorAggregator::new();

    for path in &args.configs {
        let value: Value = match load_document(path) {
            Ok(value) => value,
            Err(err) => {
                warn!(config = %path.display(), "skipping unreadable config");
                route_message(err, true, args.strict, &mut summary);
                summary.record_outcome(false);
                continue;
            }
        };
        let name = path.display().to_string();
        check_config(&name, &value, &schema, args.strict, &mut summary, &mut aggregator)?;
    }

    flush_aggregator(&mut summary, &mut aggregator);

    match args.format {
        CliOutputFormat::Text => print_summary(&summary),
        CliOutputFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)
                .map_err(|err| format!("Failed to serialize summary: {err}"))?;
            println!("{json}");
        }
    }

    if summary.valid {
        Ok(())
    } else {
        Err(format!(
            "validation failed: {} error(s), {} strict warning(s)",
            summary.errors.len(),
            summary.strict_warnings.len()
        ))
    }
}

/// Runs the deprecated-key rules, then the schema walk, for one document.
fn check_config(
    name: &str,
    value: &Value,
    schema: &CompiledSchema,
    strict: bool,
    summary: &mut ValidationSummary,
    aggregator: &mut ErrorAggregator,
) -> Result<(), String> {
    let context = format!("in {name}");
    let mut prewarn = KeySet::new();
    if let Some(map) = value.as_object() {
        for rule in &schema.deprecated {
            let (ok, found) =
                warn_keys_once(rule, map, &context, strict, summary, Some(&mut *aggregator));
            summary.record_outcome(ok);
            prewarn.extend(found);
        }
    }
    debug!(config = name, prewarn = prewarn.len(), "deprecated keys collected");

    let options = ValidateOptions {
        prewarn: Some(&prewarn),
        ignore_keys: None,
        field_path: Some(DEFAULT_BASE_PATH),
        field_examples: Some(&schema.examples),
    };
    let ok = validate_structure(&context, value, &schema.root, strict, summary, &options)
        .map_err(|err| err.to_string())?;
    summary.record_outcome(ok);
    Ok(())
}

fn print_summary(summary: &ValidationSummary) {
    for (label, messages) in [
        ("error", &summary.errors),
        ("strict warning", &summary.strict_warnings),
        ("warning", &summary.warnings),
    ] {
        for message in messages {
            println!("{label}: {}", message.replace('\n', "\n    "));
        }
    }

    println!(
        "{}: {} error(s), {} strict warning(s), {} warning(s)",
        if summary.valid { "valid" } else { "invalid" },
        summary.errors.len(),
        summary.strict_warnings.len(),
        summary.warnings.len()
    );
}

/// One declared type as printed by `describe`.
#[derive(Debug, Serialize)]
struct TypeDescription {
    name: String,
    root: bool,
    fields: IndexMap<String, FieldDescription>,
}

#[derive(Debug, Serialize)]
struct FieldDescription {
    #[serde(rename = "type")]
    label: String,
    optional: bool,
}

fn run_describe(args: DescribeArgs) -> Result<(), String> {
    let schema = load_schema(&args.schema)?;
    let descriptions = describe_schema(&schema);

    match args.format {
        CliOutputFormat::Text => {
            for ty in &descriptions {
                let marker = if ty.root { " (root)" } else { "" };
                println!("{}{marker}", ty.name);
                for (field, desc) in &ty.fields {
                    let optional = if desc.optional { "?" } else { "" };
                    println!("  {field}{optional}: {}", desc.label);
                }
            }
        }
        CliOutputFormat::Json => {
            let json = serde_json::to_string_pretty(&descriptions)
                .map_err(|err| format!("Failed to serialize schema description: {err}"))?;
            println!("{json}");
        }
    }
    Ok(())
}

fn describe_schema(schema: &CompiledSchema) -> Vec<TypeDescription> {
    schema
        .types
        .iter()
        .map(|(name, ty)| TypeDescription {
            name: name.clone(),
            root: ty.name() == schema.root.name(),
            fields: ty
                .fields()
                .into_iter()
                .flatten()
                .map(|(field, decl)| {
                    (
                        field.clone(),
                        FieldDescription {
                            label: type_label(decl),
                            optional: matches!(decl, TypeDecl::Optional(_)),
                        },
                    )
                })
                .collect(),
        })
        .collect()
}
