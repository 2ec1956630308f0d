use super::schema::SchemaNode;
use crate::naming::{binding_name, split_version, synthesize_operation_name, to_pascal};

/// HTTP method of an operation. Only these five verbs are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Lowercase method name, as used by path item keys and axios calls.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
            HttpMethod::Delete => "delete",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "get" => Some(HttpMethod::Get),
            "post" => Some(HttpMethod::Post),
            "put" => Some(HttpMethod::Put),
            "patch" => Some(HttpMethod::Patch),
            "delete" => Some(HttpMethod::Delete),
            _ => None,
        }
    }

    /// GET operations become query hooks, everything else a mutation hook.
    pub fn is_query(&self) -> bool {
        matches!(self, HttpMethod::Get)
    }
}

/// Names derived for one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationName {
    /// Display name with any `_vN` marker stripped.
    pub name: String,
    pub version: Option<String>,
    /// Pascal name plus Pascal version, the prefix of every synthesized declaration.
    pub versioned: String,
}

impl OperationName {
    pub fn derive(operation_id: Option<&str>, method: HttpMethod, path: &str) -> Self {
        let raw = match operation_id {
            Some(id) => id.to_string(),
            None => synthesize_operation_name(method.as_str(), path),
        };
        let (name, version) = split_version(&raw);
        let versioned = match &version {
            Some(v) => format!("{}{}", to_pascal(&name), to_pascal(v)),
            None => to_pascal(&name),
        };
        Self {
            versioned: binding_name(&versioned),
            name,
            version,
        }
    }
}

/// A query/path/header parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiParameter {
    pub name: String,
    pub schema: SchemaNode,
    pub required: bool,
}

/// One HTTP endpoint.
#[derive(Debug, Clone)]
pub struct ApiOperation {
    pub tag: String,
    pub method: HttpMethod,
    pub path: String,
    pub name: OperationName,
    pub summary: Option<String>,
    pub parameters: Vec<ApiParameter>,
    /// JSON request body; `Reference` when the body is a raw `$ref`.
    pub request_body: Option<SchemaNode>,
    /// JSON schema of the `200` response.
    pub response: Option<SchemaNode>,
}

impl ApiOperation {
    /// Names of the `{param}` placeholders in the path template, in order.
    pub fn path_placeholders(&self) -> Vec<&str> {
        let mut out = Vec::new();
        let mut rest = self.path.as_str();
        while let Some(start) = rest.find('{') {
            let after = &rest[start + 1..];
            match after.find('}') {
                Some(end) => {
                    out.push(&after[..end]);
                    rest = &after[end + 1..];
                }
                None => break,
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versioned_name() {
        let n = OperationName::derive(Some("getExample_v1"), HttpMethod::Get, "/example");
        assert_eq!(n.name, "getExample");
        assert_eq!(n.version.as_deref(), Some("1"));
        assert_eq!(n.versioned, "GetExample1");
    }

    #[test]
    fn test_unversioned_name() {
        let n = OperationName::derive(Some("validate_token"), HttpMethod::Get, "/auth/validate");
        assert_eq!(n.name, "validate_token");
        assert_eq!(n.version, None);
        assert_eq!(n.versioned, "ValidateToken");
    }

    #[test]
    fn test_synthesized_name() {
        let n = OperationName::derive(None, HttpMethod::Delete, "/items/{id}");
        assert_eq!(n.name, "deleteByidBy");
        assert_eq!(n.versioned, "DeleteByidBy");
    }

    #[test]
    fn test_path_placeholders() {
        let op = ApiOperation {
            tag: "items".to_string(),
            method: HttpMethod::Get,
            path: "/items/{item_id}/tags/{tag}".to_string(),
            name: OperationName::derive(Some("getTag"), HttpMethod::Get, "/"),
            summary: None,
            parameters: Vec::new(),
            request_body: None,
            response: None,
        };
        assert_eq!(op.path_placeholders(), vec!["item_id", "tag"]);
    }
}
