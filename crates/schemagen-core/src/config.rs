use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::emit::{CommandFormatter, Formatter, NoopFormatter};
use crate::error::ConfigError;

/// Project configuration loaded from `schemagen.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SchemagenConfig {
    /// Directory holding `openapi.json`, `entities/` and `asyncapi/`.
    pub schema_dir: PathBuf,
    /// Directory generated files are written to.
    pub out_dir: PathBuf,
    pub generators: Vec<GeneratorId>,
    pub formatter: FormatterConfig,
    pub entities: EntitiesConfig,
    pub api: ApiConfig,
    pub sockets: SocketsConfig,
}

impl Default for SchemagenConfig {
    fn default() -> Self {
        Self {
            schema_dir: PathBuf::from("../backend/schemas"),
            out_dir: PathBuf::from("src/api"),
            generators: GeneratorId::ALL.to_vec(),
            formatter: FormatterConfig::default(),
            entities: EntitiesConfig::default(),
            api: ApiConfig::default(),
            sockets: SocketsConfig::default(),
        }
    }
}

impl SchemagenConfig {
    /// Make relative directories relative to `base` (the config file's directory).
    pub fn resolve_paths(&mut self, base: &Path) {
        if self.schema_dir.is_relative() {
            self.schema_dir = base.join(&self.schema_dir);
        }
        if self.out_dir.is_relative() {
            self.out_dir = base.join(&self.out_dir);
        }
    }
}

/// The available generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorId {
    Entities,
    Api,
    Sockets,
}

impl GeneratorId {
    /// Run order: the entity module first, the modules importing it after.
    pub const ALL: [GeneratorId; 3] = [GeneratorId::Entities, GeneratorId::Api, GeneratorId::Sockets];

    pub fn as_str(&self) -> &'static str {
        match self {
            GeneratorId::Entities => "entities",
            GeneratorId::Api => "api",
            GeneratorId::Sockets => "sockets",
        }
    }
}

impl fmt::Display for GeneratorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeneratorId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GeneratorId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| format!("unknown generator `{s}` (expected entities, api or sockets)"))
    }
}

/// `formatter: none`, `formatter: prettier`, or an explicit command.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FormatterConfig {
    Preset(FormatterPreset),
    Command {
        command: String,
        #[serde(default)]
        args: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatterPreset {
    None,
    Prettier,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        FormatterConfig::Preset(FormatterPreset::Prettier)
    }
}

impl FormatterConfig {
    pub fn build(&self) -> Box<dyn Formatter> {
        match self {
            FormatterConfig::Preset(FormatterPreset::None) => Box::new(NoopFormatter),
            FormatterConfig::Preset(FormatterPreset::Prettier) => Box::new(CommandFormatter::new(
                "npx",
                ["prettier", "--stdin-filepath", "{file}"]
                    .into_iter()
                    .map(String::from)
                    .collect(),
            )),
            FormatterConfig::Command { command, args } => {
                Box::new(CommandFormatter::new(command.clone(), args.clone()))
            }
        }
    }
}

/// Entity-schema module options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EntitiesConfig {
    pub output: String,
}

impl Default for EntitiesConfig {
    fn default() -> Self {
        Self {
            output: "schemas.ts".to_string(),
        }
    }
}

/// HTTP-API module options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub output: String,
    /// Module specifier the entity validators are imported from.
    pub schemas_import: String,
    /// Expression the default client's base URL is read from.
    pub base_url: String,
    /// Import statement making `base_url` available. Empty for none.
    pub base_url_import: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            output: "api.ts".to_string(),
            schemas_import: "@/api/schemas".to_string(),
            base_url: "env.VITE_BACKEND".to_string(),
            base_url_import: r#"import { env } from "@/env";"#.to_string(),
        }
    }
}

/// Socket module options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SocketsConfig {
    /// Files are named `<output_prefix>-<namespace>.ts`.
    pub output_prefix: String,
    pub schemas_import: String,
}

impl Default for SocketsConfig {
    fn default() -> Self {
        Self {
            output_prefix: "sockets".to_string(),
            schemas_import: "./schemas".to_string(),
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = "schemagen.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
///
/// Relative directories in the file are resolved against the file's directory.
pub fn load_config(path: &Path) -> Result<Option<SchemagenConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config: SchemagenConfig =
        serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
    if let Some(base) = path.parent() {
        config.resolve_paths(base);
    }
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# schemagen configuration
schema_dir: ../backend/schemas   # openapi.json, entities/, asyncapi/
out_dir: src/api

generators: [entities, api, sockets]

formatter: prettier              # prettier | none
# formatter:
#   command: npx
#   args: [prettier, --config, .prettierrc, --stdin-filepath, "{file}"]

entities:
  output: schemas.ts

api:
  output: api.ts
  schemas_import: "@/api/schemas"
  base_url: env.VITE_BACKEND
  base_url_import: 'import { env } from "@/env";'

sockets:
  output_prefix: sockets           # sockets-<namespace>.ts
  schemas_import: ./schemas
"#
}
