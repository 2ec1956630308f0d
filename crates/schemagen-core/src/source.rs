use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use log::debug;

use crate::error::{ResolveError, SourceError};
use crate::ir::{ApiOperation, Entity, SocketNamespace};
use crate::naming::entity_name;
use crate::parse::{self, schema::Schema, schema::SchemaOrRef};
use crate::transform::{RefContext, SchemaConverter, collect_channels, collect_operations};

pub const OPENAPI_FILE: &str = "openapi.json";
pub const ENTITIES_DIR: &str = "entities";
pub const ASYNCAPI_DIR: &str = "asyncapi";
pub const ENTITY_SUFFIX: &str = ".schema.json";

/// The schema directory: `openapi.json`, `entities/*.schema.json` and
/// `asyncapi/*.json`. Every accessor re-reads from disk.
#[derive(Debug, Clone)]
pub struct SchemaSource {
    root: PathBuf,
}

impl SchemaSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn openapi_path(&self) -> PathBuf {
        self.root.join(OPENAPI_FILE)
    }

    /// Entity files sorted by file name. A missing directory yields none.
    pub fn entity_files(&self) -> Result<Vec<PathBuf>, SourceError> {
        list_files(&self.root.join(ENTITIES_DIR), |name| name.ends_with(ENTITY_SUFFIX))
    }

    /// AsyncAPI documents sorted by file name. A missing directory yields none.
    pub fn asyncapi_files(&self) -> Result<Vec<PathBuf>, SourceError> {
        list_files(&self.root.join(ASYNCAPI_DIR), |name| name.ends_with(".json"))
    }

    /// Declaration names of all entities, in file order.
    pub fn entity_names(&self) -> Result<IndexSet<String>, SourceError> {
        Ok(self
            .entity_files()?
            .iter()
            .map(|path| entity_name(&entity_stem(path)))
            .collect())
    }

    pub fn load_entities(&self) -> Result<Vec<Entity>, SourceError> {
        let files = self.entity_files()?;
        let names: IndexSet<String> = files.iter().map(|p| entity_name(&entity_stem(p))).collect();

        let mut entities = Vec::with_capacity(files.len());
        for path in files {
            let content = read(&path)?;
            let root = parse::entity_from_json(&content).map_err(|source| SourceError::Parse {
                path: path.clone(),
                source,
            })?;

            let empty = Schema::default();
            let defs_root = match &root {
                SchemaOrRef::Schema(schema) => schema.as_ref(),
                SchemaOrRef::Ref { .. } => &empty,
            };
            let schema = SchemaConverter::new(&names, RefContext::Entity { root: defs_root })
                .convert(&root)
                .map_err(|source| resolve_error(&path, source))?;

            let source_name = entity_stem(&path);
            let name = entity_name(&source_name);
            debug!("entity {} -> {name}", path.display());
            entities.push(Entity {
                source_name,
                name,
                schema,
            });
        }
        Ok(entities)
    }

    pub fn load_operations(&self, entities: &IndexSet<String>) -> Result<Vec<ApiOperation>, SourceError> {
        let path = self.openapi_path();
        let content = read(&path)?;
        let spec = parse::from_json(&content).map_err(|source| SourceError::Parse {
            path: path.clone(),
            source,
        })?;
        collect_operations(&spec, entities).map_err(|source| resolve_error(&path, source))
    }

    pub fn load_namespaces(&self, entities: &IndexSet<String>) -> Result<Vec<SocketNamespace>, SourceError> {
        let mut out = Vec::new();
        for path in self.asyncapi_files()? {
            let content = read(&path)?;
            let parsed = parse::asyncapi_from_json(&content).map_err(|source| SourceError::Parse {
                path: path.clone(),
                source,
            })?;
            let namespace = namespace_of(&path);
            let ns = collect_channels(&parsed, &namespace, entities)
                .map_err(|source| resolve_error(&path, source))?;
            out.push(ns);
        }
        Ok(out)
    }
}

/// The namespace of an AsyncAPI file: its name up to the first `.`.
pub fn namespace_of(path: &Path) -> String {
    let name = file_name(path);
    match name.split_once('.') {
        Some((head, _)) => head.to_string(),
        None => name,
    }
}

fn entity_stem(path: &Path) -> String {
    let name = file_name(path);
    match name.strip_suffix(ENTITY_SUFFIX) {
        Some(stem) => stem.to_string(),
        None => name,
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn list_files(dir: &Path, keep: impl Fn(&str) -> bool) -> Result<Vec<PathBuf>, SourceError> {
    if !dir.is_dir() {
        debug!("{} does not exist, skipping", dir.display());
        return Ok(Vec::new());
    }
    let entries = fs::read_dir(dir).map_err(|source| SourceError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| SourceError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && keep(&file_name(&path)) {
            files.push(path);
        }
    }
    files.sort_by_key(|p| file_name(p));
    Ok(files)
}

fn read(path: &Path) -> Result<String, SourceError> {
    fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn resolve_error(path: &Path, source: ResolveError) -> SourceError {
    SourceError::Resolve {
        path: path.to_path_buf(),
        source,
    }
}
