use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use log::debug;

use schemagen_core::config::{self, CONFIG_FILE_NAME, GeneratorId, SchemagenConfig};
use schemagen_core::emit::{Formatter, NoopFormatter, write_staged};
use schemagen_core::ir::{SchemaNode, group_by_tag_and_version};
use schemagen_core::naming::{tag_key, version_key};
use schemagen_core::source::SchemaSource;
use schemagen_core::{CodeGenerator, stage};
use schemagen_react_query::ReactQueryGenerator;
use schemagen_socketio::SocketIoGenerator;
use schemagen_zod::{EntitiesGenerator, RefStyle, to_ts_type};

#[derive(Parser)]
#[command(name = "schemagen", about = "Typed TypeScript clients from OpenAPI, AsyncAPI and JSON Schema", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the client modules
    Generate {
        #[command(flatten)]
        paths: PathArgs,

        /// Output directory, overrides `out_dir`
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Only run these generators (repeatable)
        #[arg(long, value_delimiter = ',')]
        only: Vec<GeneratorId>,

        /// Write output without running the formatter
        #[arg(long)]
        no_format: bool,
    },

    /// Parse and resolve every input document without writing anything
    Validate {
        #[command(flatten)]
        paths: PathArgs,
    },

    /// Print the intermediate model of one generator's inputs
    Inspect {
        #[command(flatten)]
        paths: PathArgs,

        /// Which inputs to inspect
        #[arg(short, long)]
        target: GeneratorId,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// Initialize a new schemagen configuration
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(clap::Args)]
struct PathArgs {
    /// Config file [default: schemagen.yaml when present]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Schema directory, overrides `schema_dir`
    #[arg(short, long)]
    schema_dir: Option<PathBuf>,
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            paths,
            out_dir,
            only,
            no_format,
        } => cmd_generate(paths, out_dir, only, no_format),

        Commands::Validate { paths } => cmd_validate(paths),

        Commands::Inspect {
            paths,
            target,
            format,
        } => cmd_inspect(paths, target, format),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "schemagen", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Load the config file and apply command-line overrides.
///
/// An explicit `--config` must exist; the default file is optional.
fn load_config(paths: &PathArgs) -> Result<SchemagenConfig> {
    let (config_path, explicit) = match &paths.config {
        Some(path) => (path.clone(), true),
        None => (PathBuf::from(CONFIG_FILE_NAME), false),
    };
    let mut cfg = match config::load_config(&config_path)? {
        Some(cfg) => {
            debug!("loaded config from {}", config_path.display());
            cfg
        }
        None if explicit => anyhow::bail!("config file {} does not exist", config_path.display()),
        None => SchemagenConfig::default(),
    };
    if let Some(dir) = &paths.schema_dir {
        cfg.schema_dir = dir.clone();
    }
    Ok(cfg)
}

/// Look up a generator by its ID.
fn get_generator(id: GeneratorId) -> Box<dyn CodeGenerator> {
    match id {
        GeneratorId::Entities => Box::new(EntitiesGenerator),
        GeneratorId::Api => Box::new(ReactQueryGenerator),
        GeneratorId::Sockets => Box::new(SocketIoGenerator),
    }
}

fn cmd_generate(
    paths: PathArgs,
    out_dir: Option<PathBuf>,
    only: Vec<GeneratorId>,
    no_format: bool,
) -> Result<()> {
    let mut cfg = load_config(&paths)?;
    if let Some(dir) = out_dir {
        cfg.out_dir = dir;
    }
    let selected = if only.is_empty() { cfg.generators.clone() } else { only };
    if selected.is_empty() {
        eprintln!("No generators configured. Add a `generators` list to your config.");
        return Ok(());
    }

    let source = SchemaSource::new(&cfg.schema_dir);
    let formatter: Box<dyn Formatter> = if no_format {
        Box::new(NoopFormatter)
    } else {
        cfg.formatter.build()
    };

    // Stage everything first so a failing generator or formatter writes nothing.
    let mut staged = Vec::new();
    for id in GeneratorId::ALL.into_iter().filter(|id| selected.contains(id)) {
        eprintln!("Generating {id} → {}", cfg.out_dir.display());
        let generator = get_generator(id);
        let files = stage(generator.as_ref(), &source, &cfg, formatter.as_ref())
            .with_context(|| format!("{id} generation failed"))?;
        staged.extend(files);
    }

    write_staged(&staged)?;
    for file in &staged {
        eprintln!("  wrote {}", file.path.display());
    }
    eprintln!("Generated {} files in {}", staged.len(), cfg.out_dir.display());
    Ok(())
}

fn cmd_validate(paths: PathArgs) -> Result<()> {
    let cfg = load_config(&paths)?;
    let source = SchemaSource::new(&cfg.schema_dir);

    let entities = source.load_entities()?;
    let names = source.entity_names()?;
    let operations = source.load_operations(&names)?;
    let namespaces = source.load_namespaces(&names)?;

    eprintln!("Valid inputs in {}", cfg.schema_dir.display());
    eprintln!("  Entities: {}", entities.len());
    eprintln!("  Operations: {}", operations.len());
    for ns in &namespaces {
        eprintln!("  Namespace {}: {} channels", ns.namespace, ns.channels.len());
    }
    eprintln!("Validation successful.");
    Ok(())
}

fn cmd_inspect(paths: PathArgs, target: GeneratorId, format: InspectFormat) -> Result<()> {
    let cfg = load_config(&paths)?;
    let source = SchemaSource::new(&cfg.schema_dir);

    let summary = match target {
        GeneratorId::Entities => inspect_entities(&source)?,
        GeneratorId::Api => inspect_api(&source)?,
        GeneratorId::Sockets => inspect_sockets(&source)?,
    };

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn node_kind(node: &SchemaNode) -> &'static str {
    match node {
        SchemaNode::Reference(_) => "reference",
        SchemaNode::Object(obj) if obj.is_free_form() => "record",
        SchemaNode::Object(_) => "object",
        SchemaNode::Array(_) => "array",
        SchemaNode::Union(_) => "union",
        SchemaNode::Primitive(kind) => kind.as_str(),
    }
}

fn describe(node: Option<&SchemaNode>) -> serde_json::Value {
    match node {
        Some(node) => serde_json::json!({
            "kind": node_kind(node),
            "type": to_ts_type(node, RefStyle::Bare),
        }),
        None => serde_json::Value::Null,
    }
}

fn inspect_entities(source: &SchemaSource) -> Result<serde_json::Value> {
    let entities: Vec<serde_json::Value> = source
        .load_entities()?
        .iter()
        .map(|e| {
            serde_json::json!({
                "name": e.name,
                "source": e.source_name,
                "kind": node_kind(&e.schema),
                "references": e.schema.references(),
            })
        })
        .collect();
    Ok(serde_json::json!({ "entities": entities }))
}

fn inspect_api(source: &SchemaSource) -> Result<serde_json::Value> {
    let names = source.entity_names()?;
    let operations = source.load_operations(&names)?;
    let groups = group_by_tag_and_version(&operations);

    let summarize = |indices: &[usize]| -> Vec<serde_json::Value> {
        indices
            .iter()
            .map(|&i| {
                let op = &operations[i];
                serde_json::json!({
                    "name": op.name.name,
                    "versioned": op.name.versioned,
                    "method": op.method.as_str(),
                    "path": op.path,
                    "parameters": op.parameters.iter().map(|p| &p.name).collect::<Vec<_>>(),
                    "body": describe(op.request_body.as_ref()),
                    "response": describe(op.response.as_ref()),
                })
            })
            .collect()
    };

    let tags: Vec<serde_json::Value> = groups
        .iter()
        .map(|group| {
            let versions: serde_json::Map<String, serde_json::Value> = group
                .versions
                .iter()
                .map(|(version, indices)| (version_key(version), summarize(indices).into()))
                .collect();
            serde_json::json!({
                "tag": group.tag,
                "key": tag_key(&group.tag),
                "operations": summarize(&group.unversioned),
                "versions": versions,
            })
        })
        .collect();

    Ok(serde_json::json!({
        "operations": operations.len(),
        "tags": tags,
    }))
}

fn inspect_sockets(source: &SchemaSource) -> Result<serde_json::Value> {
    let names = source.entity_names()?;
    let namespaces: Vec<serde_json::Value> = source
        .load_namespaces(&names)?
        .iter()
        .map(|ns| {
            let channels: Vec<serde_json::Value> = ns
                .channels
                .iter()
                .map(|ch| {
                    serde_json::json!({
                        "address": ch.address,
                        "event": ch.event,
                        "ack": ch.ack,
                        "receive": ch.receive.as_ref().map(|op| describe(op.payload.as_ref())),
                        "send": ch.send.as_ref().map(|op| describe(op.payload.as_ref())),
                    })
                })
                .collect();
            serde_json::json!({
                "namespace": ns.namespace,
                "title": ns.title,
                "channels": channels,
            })
        })
        .collect();
    Ok(serde_json::json!({ "namespaces": namespaces }))
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
