use serde::Deserialize;

use super::schema::SchemaOrRef;

pub const JSON_MEDIA_TYPE: &str = "application/json";

/// A media type object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MediaType {
    pub schema: Option<SchemaOrRef>,
}
