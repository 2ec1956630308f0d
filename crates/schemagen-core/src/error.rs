use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported OpenAPI version: {0}")]
    UnsupportedVersion(String),

    #[error("unsupported AsyncAPI version: {0}")]
    UnsupportedAsyncApiVersion(String),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("unsupported $ref: {0}")]
    UnsupportedRef(String),

    #[error("reference target not found: {0}")]
    RefTargetNotFound(String),

    #[error("circular reference detected: {0}")]
    CircularRef(String),

    #[error("`{0}` does not name a generated entity")]
    UnknownEntity(String),

    #[error("unsupported schema shape: {0}")]
    UnsupportedSchema(String),

    #[error("invalid document at {pointer}: {source}")]
    InvalidNode {
        pointer: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised while reading input documents from the schema directory.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("failed to resolve {}: {source}", path.display())]
    Resolve {
        path: PathBuf,
        #[source]
        source: ResolveError,
    },
}

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to run formatter `{command}`: {source}")]
    FormatterSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("formatter `{command}` rejected {}: {stderr}", path.display())]
    FormatterFailed {
        command: String,
        path: PathBuf,
        stderr: String,
    },

    #[error("formatter `{command}` produced non UTF-8 output")]
    FormatterOutput { command: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },
}
