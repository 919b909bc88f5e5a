//! typed-env CLI
//!
//! Entry point for the `typed-env` command-line tool.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use typed_env_config::{
    extra, is_ignored, CastTable, ConfigError, ConfigInstance, ConfigLoader, Environment, FieldDefault,
    Requirement, Schema, Settings, TypeTag,
};

#[derive(Parser)]
#[command(name = "typed-env")]
#[command(about = "Resolve typed configuration from the environment", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a schema against the environment and print the values
    Check {
        /// Path to the schema file
        #[arg(long, short = 's')]
        schema: PathBuf,

        /// Read settings from this .env file (environment still wins)
        #[arg(long, conflicts_with = "discover")]
        env_file: Option<PathBuf>,

        /// Search the current directory and its parents for a .env file
        #[arg(long)]
        discover: bool,

        /// Prefix prepended to every field name when reading the environment
        #[arg(long)]
        prefix: Option<String>,

        /// Additional names to skip (comma-separated)
        #[arg(long, value_delimiter = ',')]
        ignore: Vec<String>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,

        /// Print secret-looking values instead of redacting them
        #[arg(long)]
        show_secrets: bool,
    },

    /// Describe how each field of a schema would be resolved
    Explain {
        /// Path to the schema file
        #[arg(long, short = 's')]
        schema: PathBuf,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            schema,
            env_file,
            discover,
            prefix,
            ignore,
            json,
            show_secrets,
        } => {
            run_check(schema, env_file, discover, prefix, ignore, json, show_secrets);
        }
        Commands::Explain { schema, json } => {
            run_explain(schema, json);
        }
    }
}

/// Casts available to schema files beyond the builtin tags.
fn cli_casts() -> CastTable {
    CastTable::new()
        .with(TypeTag::custom(extra::PATH_TAG), extra::path)
        .with(TypeTag::custom(extra::BASE64_TAG), extra::base64)
}

fn load_schema(path: &Path) -> Schema {
    match Schema::from_file(path) {
        Ok(schema) => schema,
        Err(e) => {
            eprintln!("Error loading schema {}: {}", path.display(), e);
            process::exit(1);
        }
    }
}

fn run_check(
    schema_path: PathBuf,
    env_file: Option<PathBuf>,
    discover: bool,
    prefix: Option<String>,
    ignore: Vec<String>,
    json_output: bool,
    show_secrets: bool,
) {
    let schema = load_schema(&schema_path);

    let environment = match prefix {
        Some(p) => Environment::with_prefix(p),
        None => Environment::new(),
    };

    let settings = if let Some(path) = env_file {
        Settings::new(environment).with_env_file(&path)
    } else if discover {
        std::env::current_dir()
            .map_err(ConfigError::from)
            .and_then(|dir| Settings::discover(environment, &dir))
    } else {
        Ok(Settings::new(environment))
    };

    let settings = match settings {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading settings: {}", e);
            process::exit(1);
        }
    };

    if let Some(repo) = settings.repository() {
        tracing::info!(path = %repo.path().display(), digest = %repo.digest(), "using settings file");
    }

    let result = ConfigLoader::new(schema)
        .casts(cli_casts())
        .ignore(ignore)
        .source(settings)
        .load();

    let config = match result {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    };

    if json_output {
        let rendered = if show_secrets {
            config.to_json_unredacted()
        } else {
            config.to_json()
        };
        match rendered {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else {
        print_human(&config, show_secrets);
    }
}

fn print_human(config: &ConfigInstance, show_secrets: bool) {
    println!("Configuration resolved: {} values", config.len());
    println!();

    let (redacted, _) = config.redacted();
    for (name, value) in config.iter() {
        let shown = if show_secrets {
            value
        } else {
            redacted.get(name).unwrap_or(value)
        };
        let origin = config
            .source(name)
            .map(|s| s.origin.to_string())
            .unwrap_or_default();
        println!("  {} = {}  ({})", name, shown, origin);
    }
}

fn run_explain(schema_path: PathBuf, json_output: bool) {
    let schema = load_schema(&schema_path);
    let casts = cli_casts();

    let mut rows = Vec::new();
    for field in schema.fields() {
        let ignored = is_ignored(&field.name, schema.ignored());
        let resolution = if ignored {
            "ignored".to_string()
        } else {
            match field.requirement() {
                Requirement::Required => "required".to_string(),
                Requirement::Optional => "optional (default None)".to_string(),
                Requirement::Defaulted => match &field.default {
                    FieldDefault::Raw(raw) => format!("default {:?}", raw),
                    FieldDefault::Value(value) => format!("default {}", value),
                    FieldDefault::Unset => "required".to_string(),
                },
            }
        };
        let supported = ignored || casts.resolve(&field.tag).is_ok();
        rows.push((field, resolution, supported));
    }

    if json_output {
        let output: Vec<serde_json::Value> = rows
            .iter()
            .map(|(field, resolution, supported)| {
                serde_json::json!({
                    "name": field.name,
                    "type": field.tag.to_string(),
                    "resolution": resolution,
                    "supported": supported,
                })
            })
            .collect();

        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else {
        println!("Schema: {} ({} fields)", schema_path.display(), schema.len());
        println!();
        for (field, resolution, supported) in &rows {
            let marker = if *supported { "" } else { "  [unsupported type]" };
            println!("  {}: {}  {}{}", field.name, field.tag, resolution, marker);
        }
    }

    if rows.iter().any(|(_, _, supported)| !supported) {
        process::exit(1);
    }
}
