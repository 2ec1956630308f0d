use indexmap::IndexSet;
use log::debug;

use crate::error::ResolveError;
use crate::ir::{ApiOperation, ApiParameter, HttpMethod, OperationName, PrimitiveKind, SchemaNode};
use crate::parse::operation::Operation;
use crate::parse::parameter::ParameterOrRef;
use crate::parse::request_body::RequestBodyOrRef;
use crate::parse::response::ResponseOrRef;
use crate::parse::spec::OpenApiSpec;

use super::schema_converter::{RefContext, SchemaConverter};

const ROOT_TAG: &str = "root";
const SUCCESS_STATUS: &str = "200";

/// Collect every supported operation of the document, in path order and then
/// method order as written.
pub fn collect_operations(
    spec: &OpenApiSpec,
    entities: &IndexSet<String>,
) -> Result<Vec<ApiOperation>, ResolveError> {
    let mut out = Vec::new();

    for (path, item) in &spec.paths {
        for (method, op) in item.operations(path)? {
            let operation = build_operation(path, method, &op, &item.parameters, entities)?;
            debug!(
                "operation {} {} -> {} (tag `{}`)",
                method.as_str(),
                path,
                operation.name.versioned,
                operation.tag
            );
            out.push(operation);
        }
    }

    Ok(out)
}

fn build_operation(
    path: &str,
    method: HttpMethod,
    op: &Operation,
    path_params: &[ParameterOrRef],
    entities: &IndexSet<String>,
) -> Result<ApiOperation, ResolveError> {
    let mut converter = SchemaConverter::new(entities, RefContext::Components);

    let tag = op
        .tags
        .first()
        .cloned()
        .or_else(|| path.split('/').find(|s| !s.is_empty()).map(str::to_string))
        .unwrap_or_else(|| ROOT_TAG.to_string());

    let mut parameters: Vec<ApiParameter> = Vec::new();
    for p in path_params.iter().chain(&op.parameters) {
        let ParameterOrRef::Parameter(param) = p else {
            continue;
        };
        let schema = match &param.schema {
            Some(s) => converter.convert(s)?,
            None => SchemaNode::Primitive(PrimitiveKind::Unknown),
        };
        let parameter = ApiParameter {
            name: param.name.clone(),
            schema,
            required: param.required,
        };
        // Operation-level parameters override path-level ones of the same name.
        match parameters.iter_mut().find(|existing| existing.name == parameter.name) {
            Some(existing) => *existing = parameter,
            None => parameters.push(parameter),
        }
    }

    let request_body = match &op.request_body {
        Some(RequestBodyOrRef::RequestBody(body)) => body
            .json()
            .and_then(|mt| mt.schema.as_ref())
            .map(|s| converter.convert(s))
            .transpose()?,
        _ => None,
    };

    let response = match op.responses.get(SUCCESS_STATUS) {
        Some(ResponseOrRef::Response(resp)) => resp
            .json()
            .and_then(|mt| mt.schema.as_ref())
            .map(|s| converter.convert(s))
            .transpose()?,
        _ => None,
    };

    Ok(ApiOperation {
        tag,
        method,
        path: path.to_string(),
        name: OperationName::derive(op.operation_id.as_deref(), method, path),
        summary: op.summary.clone(),
        parameters,
        request_body,
        response,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn spec(paths: &str) -> OpenApiSpec {
        parse::from_json(&format!(
            r#"{{"openapi":"3.1.0","info":{{"title":"t","version":"1"}},"paths":{paths}}}"#
        ))
        .unwrap()
    }

    #[test]
    fn test_tag_fallbacks() {
        let spec = spec(
            r#"{
                "/items/{id}": {"get": {"responses": {}}},
                "/": {"get": {"responses": {}}},
                "/health": {"get": {"tags": ["ops", "misc"], "responses": {}}}
            }"#,
        );
        let ops = collect_operations(&spec, &IndexSet::new()).unwrap();
        let tags: Vec<&str> = ops.iter().map(|o| o.tag.as_str()).collect();
        assert_eq!(tags, vec!["items", "root", "ops"]);
    }

    #[test]
    fn test_method_order_follows_document() {
        let spec = spec(
            r#"{
                "/items": {
                    "post": {"operationId": "createItem", "responses": {}},
                    "summary": "ignored",
                    "get": {"operationId": "listItems", "responses": {}},
                    "options": {"operationId": "skipped", "responses": {}}
                }
            }"#,
        );
        let ops = collect_operations(&spec, &IndexSet::new()).unwrap();
        let names: Vec<&str> = ops.iter().map(|o| o.name.name.as_str()).collect();
        assert_eq!(names, vec!["createItem", "listItems"]);
        assert_eq!(ops[0].method, HttpMethod::Post);
    }

    #[test]
    fn test_parameters_and_payloads() {
        let entities: IndexSet<String> = ["Item".to_string()].into_iter().collect();
        let spec = spec(
            r##"{
                "/items/{id}": {
                    "parameters": [
                        {"name": "id", "in": "path", "required": true, "schema": {"type": "string"}},
                        {"$ref": "#/components/parameters/Trace"}
                    ],
                    "put": {
                        "operationId": "updateItem_v2",
                        "parameters": [{"name": "dry_run", "in": "query", "schema": {"type": "boolean"}}],
                        "requestBody": {"content": {"application/json": {"schema": {"$ref": "#/components/schemas/Item"}}}},
                        "responses": {
                            "200": {"description": "ok", "content": {"application/json": {"schema": {"type": "array", "items": {"type": "string"}}}}},
                            "404": {"description": "missing"}
                        }
                    }
                }
            }"##,
        );
        let ops = collect_operations(&spec, &entities).unwrap();
        let op = &ops[0];
        let params: Vec<(&str, bool)> = op
            .parameters
            .iter()
            .map(|p| (p.name.as_str(), p.required))
            .collect();
        assert_eq!(params, vec![("id", true), ("dry_run", false)]);
        assert_eq!(op.request_body, Some(SchemaNode::Reference("Item".to_string())));
        assert_eq!(
            op.response,
            Some(SchemaNode::Array(Box::new(SchemaNode::Primitive(PrimitiveKind::String))))
        );
        assert_eq!(op.name.versioned, "UpdateItem2");
    }

    #[test]
    fn test_referenced_body_and_response_are_absent() {
        let spec = spec(
            r##"{
                "/auth/token": {
                    "post": {
                        "requestBody": {"$ref": "#/components/requestBodies/Token"},
                        "responses": {"200": {"$ref": "#/components/responses/Token"}}
                    }
                }
            }"##,
        );
        let ops = collect_operations(&spec, &IndexSet::new()).unwrap();
        assert_eq!(ops[0].request_body, None);
        assert_eq!(ops[0].response, None);
        assert_eq!(ops[0].name.name, "postToken");
    }
}
