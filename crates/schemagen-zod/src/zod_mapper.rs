use schemagen_core::ir::{ObjectNode, PrimitiveKind, SchemaNode};
use schemagen_core::naming::quote;

/// How a reference to an entity is spelled in the module being generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefStyle<'a> {
    /// The entity is imported by name (`Status`).
    Bare,
    /// Inside the entity module itself. Validators defer the lookup
    /// (`z.lazy(() => Status)`) so declaration order doesn't matter.
    Lazy,
    /// The entity module is imported as a namespace (`schemas.Status`).
    Namespace(&'a str),
}

/// Render the zod validator expression for `node`.
pub fn to_validator(node: &SchemaNode, style: RefStyle<'_>) -> String {
    match node {
        SchemaNode::Reference(name) => match style {
            RefStyle::Bare => name.clone(),
            RefStyle::Lazy => format!("z.lazy(() => {name})"),
            RefStyle::Namespace(ns) => format!("{ns}.{name}"),
        },
        SchemaNode::Object(obj) => object_validator(obj, style),
        SchemaNode::Array(items) => format!("z.array({})", to_validator(items, style)),
        SchemaNode::Union(members) => match members.as_slice() {
            [] => "z.unknown()".to_string(),
            [single] => to_validator(single, style),
            _ => {
                let parts: Vec<String> = members.iter().map(|m| to_validator(m, style)).collect();
                format!("z.union([{}])", parts.join(", "))
            }
        },
        SchemaNode::Primitive(kind) => format!("z.{}()", kind.as_str()),
    }
}

fn object_validator(obj: &ObjectNode, style: RefStyle<'_>) -> String {
    if obj.is_free_form() {
        let value = match &obj.additional {
            Some(value) => to_validator(value, style),
            None => "z.unknown()".to_string(),
        };
        return format!("z.record(z.string(), {value})");
    }
    let entries: Vec<String> = obj
        .properties
        .iter()
        .map(|(key, value)| {
            let optional = if obj.is_required(key) { "" } else { ".optional()" };
            format!("  {}: {}{optional}", quote(key), to_validator(value, style))
        })
        .collect();
    format!("z.object({{\n{}\n}})", entries.join(",\n"))
}

/// Render the TypeScript type `node` validates to.
pub fn to_ts_type(node: &SchemaNode, style: RefStyle<'_>) -> String {
    match node {
        SchemaNode::Reference(name) => match style {
            RefStyle::Bare | RefStyle::Lazy => name.clone(),
            RefStyle::Namespace(ns) => format!("{ns}.{name}"),
        },
        SchemaNode::Object(obj) => {
            if obj.is_free_form() {
                let value = match &obj.additional {
                    Some(value) => to_ts_type(value, style),
                    None => PrimitiveKind::Unknown.as_str().to_string(),
                };
                return format!("Record<string, {value}>");
            }
            let fields: Vec<String> = obj
                .properties
                .iter()
                .map(|(key, value)| {
                    let marker = if obj.is_required(key) { "" } else { "?" };
                    format!("{}{marker}: {}", quote(key), to_ts_type(value, style))
                })
                .collect();
            format!("{{ {} }}", fields.join("; "))
        }
        SchemaNode::Array(items) => match items.as_ref() {
            SchemaNode::Union(members) if members.len() > 1 => {
                format!("({})[]", to_ts_type(items, style))
            }
            _ => format!("{}[]", to_ts_type(items, style)),
        },
        SchemaNode::Union(members) => match members.as_slice() {
            [] => PrimitiveKind::Unknown.as_str().to_string(),
            [single] => to_ts_type(single, style),
            _ => members
                .iter()
                .map(|m| to_ts_type(m, style))
                .collect::<Vec<_>>()
                .join(" | "),
        },
        SchemaNode::Primitive(kind) => kind.as_str().to_string(),
    }
}
