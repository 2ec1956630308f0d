use indexmap::IndexMap;
use serde::Deserialize;

use super::media_type::{MediaType, JSON_MEDIA_TYPE};

/// A request body definition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

impl RequestBody {
    pub fn json(&self) -> Option<&MediaType> {
        self.content.get(JSON_MEDIA_TYPE)
    }
}

/// A reference or inline request body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RequestBodyOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    RequestBody(RequestBody),
}
