use indexmap::IndexMap;
use serde::Deserialize;

use super::spec::{Info, escape_pointer};
use crate::error::ResolveError;

/// A `{ "$ref": ... }` object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Reference {
    #[serde(rename = "$ref")]
    pub ref_path: String,
}

/// A channel. Messages are kept raw; they are `$ref`s or inline message objects.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct AsyncChannel {
    pub address: Option<String>,

    #[serde(default)]
    pub messages: IndexMap<String, serde_json::Value>,
}

/// Direction of an operation, seen from the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Client → server.
    Receive,
    /// Server → client.
    Send,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AsyncOperation {
    pub action: Action,

    pub channel: Reference,

    #[serde(default)]
    pub messages: Vec<serde_json::Value>,

    pub bindings: Option<serde_json::Value>,
}

impl AsyncOperation {
    /// The `x-socketio.ack` binding.
    pub fn is_ack(&self) -> bool {
        self.bindings
            .as_ref()
            .and_then(|b| b.get("x-socketio"))
            .and_then(|b| b.get("ack"))
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false)
    }
}

/// Top-level AsyncAPI 3.x document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AsyncApiDocument {
    pub asyncapi: String,

    pub info: Info,

    #[serde(default)]
    pub channels: IndexMap<String, AsyncChannel>,

    #[serde(default)]
    pub operations: IndexMap<String, AsyncOperation>,
}

/// A parsed AsyncAPI document together with its raw JSON, used to follow
/// `$ref` pointers into any part of the document.
#[derive(Debug, Clone)]
pub struct ParsedAsyncApi {
    pub document: AsyncApiDocument,
    pub raw: serde_json::Value,
}

impl ParsedAsyncApi {
    /// The `$ref` a channel is referred to by from its operations.
    pub fn channel_ref(key: &str) -> String {
        format!("#/channels/{}", escape_pointer(key))
    }

    /// Follow a local `$ref` chain until a non-reference node is reached.
    pub fn resolve<'a>(&'a self, node: &'a serde_json::Value) -> Result<&'a serde_json::Value, ResolveError> {
        let mut current = node;
        let mut seen: Vec<&str> = Vec::new();
        while let Some(ref_path) = current.get("$ref").and_then(serde_json::Value::as_str) {
            if seen.contains(&ref_path) {
                return Err(ResolveError::CircularRef(ref_path.to_string()));
            }
            seen.push(ref_path);
            let pointer = ref_path
                .strip_prefix('#')
                .ok_or_else(|| ResolveError::UnsupportedRef(ref_path.to_string()))?;
            current = self
                .raw
                .pointer(pointer)
                .ok_or_else(|| ResolveError::RefTargetNotFound(ref_path.to_string()))?;
        }
        Ok(current)
    }
}
