use indexmap::IndexMap;
use serde::Deserialize;

use super::parameter::ParameterOrRef;
use super::request_body::RequestBodyOrRef;
use super::response::ResponseOrRef;

/// An API operation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Operation {
    #[serde(rename = "operationId")]
    pub operation_id: Option<String>,

    pub summary: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub parameters: Vec<ParameterOrRef>,

    #[serde(rename = "requestBody")]
    pub request_body: Option<RequestBodyOrRef>,

    #[serde(default)]
    pub responses: IndexMap<String, ResponseOrRef>,
}
