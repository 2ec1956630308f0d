use indexmap::IndexMap;
use serde::Deserialize;

use super::operation::Operation;
use super::parameter::ParameterOrRef;
use crate::error::ResolveError;
use crate::ir::HttpMethod;

/// Info object describing the API. Only the title is rendered.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Info {
    #[serde(default)]
    pub title: String,
}

/// A path item. Method keys are kept in document order, which is the order
/// operations are emitted in.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct PathItem {
    #[serde(default)]
    pub parameters: Vec<ParameterOrRef>,

    #[serde(flatten)]
    pub entries: IndexMap<String, serde_json::Value>,
}

impl PathItem {
    /// The operations of this path in document order, skipping keys that are
    /// not one of the supported verbs.
    pub fn operations(&self, path: &str) -> Result<Vec<(HttpMethod, Operation)>, ResolveError> {
        let mut out = Vec::new();
        for (key, value) in &self.entries {
            let Some(method) = HttpMethod::from_key(key) else {
                continue;
            };
            let op: Operation = serde_json::from_value(value.clone()).map_err(|source| {
                ResolveError::InvalidNode {
                    pointer: format!("#/paths/{}/{key}", escape_pointer(path)),
                    source,
                }
            })?;
            out.push((method, op));
        }
        Ok(out)
    }
}

/// Top-level OpenAPI 3.x document. Only the parts the generator reads are modelled.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OpenApiSpec {
    pub openapi: String,

    pub info: Info,

    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
}

/// Escape a key for use as a JSON pointer segment.
pub fn escape_pointer(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}
