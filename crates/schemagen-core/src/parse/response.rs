use indexmap::IndexMap;
use serde::Deserialize;

use super::media_type::{MediaType, JSON_MEDIA_TYPE};

/// A response definition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

impl Response {
    pub fn json(&self) -> Option<&MediaType> {
        self.content.get(JSON_MEDIA_TYPE)
    }
}

/// A reference or inline response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ResponseOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Response(Response),
}
