pub mod asyncapi;
pub mod media_type;
pub mod operation;
pub mod parameter;
pub mod request_body;
pub mod response;
pub mod schema;
pub mod spec;

use crate::error::ParseError;
use asyncapi::ParsedAsyncApi;
use schema::SchemaOrRef;
use spec::OpenApiSpec;

/// Parse an OpenAPI document from JSON.
pub fn from_json(input: &str) -> Result<OpenApiSpec, ParseError> {
    let spec: OpenApiSpec = serde_json::from_str(input)?;
    validate_version(&spec)?;
    Ok(spec)
}

/// Parse an AsyncAPI document from JSON, keeping the raw tree for pointer lookups.
pub fn asyncapi_from_json(input: &str) -> Result<ParsedAsyncApi, ParseError> {
    let raw: serde_json::Value = serde_json::from_str(input)?;
    let document: asyncapi::AsyncApiDocument = serde_json::from_value(raw.clone())?;
    if !document.asyncapi.starts_with("3.") {
        return Err(ParseError::UnsupportedAsyncApiVersion(document.asyncapi));
    }
    Ok(ParsedAsyncApi { document, raw })
}

/// Parse a standalone JSON-Schema entity file.
pub fn entity_from_json(input: &str) -> Result<SchemaOrRef, ParseError> {
    Ok(serde_json::from_str(input)?)
}

fn validate_version(spec: &OpenApiSpec) -> Result<(), ParseError> {
    if !spec.openapi.starts_with("3.") {
        return Err(ParseError::UnsupportedVersion(spec.openapi.clone()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotations_are_not_read() {
        // Documentation keywords never reach the output, so their shape is not checked.
        let spec = from_json(
            r#"{
                "openapi": "3.1.0",
                "info": {"title": "Demo", "version": 3, "description": ["x"]},
                "paths": {"/items/{id}": {"put": {
                    "operationId": "putItem",
                    "description": {"long": true},
                    "parameters": [{"name": "id", "in": "path", "required": true, "description": 1,
                                    "schema": {"type": "string", "description": null}}],
                    "requestBody": {"description": 7, "required": "yes",
                                    "content": {"application/json": {"schema": {"type": "string"}, "example": [1, 2]}}},
                    "responses": {"200": {"description": 200}}
                }}}
            }"#,
        )
        .unwrap();
        assert_eq!(spec.info.title, "Demo");
        assert_eq!(spec.paths.len(), 1);
    }
}
