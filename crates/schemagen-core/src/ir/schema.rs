use indexmap::{IndexMap, IndexSet};

/// Scalar shapes a [`SchemaNode`] can bottom out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    String,
    Number,
    Boolean,
    Null,
    Void,
    Unknown,
}

impl PrimitiveKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Number => "number",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Null => "null",
            PrimitiveKind::Void => "void",
            PrimitiveKind::Unknown => "unknown",
        }
    }
}

/// Structural description of a value shape.
///
/// A `Reference` always names a generated entity; references are never
/// expanded, so cycles between entities are fine.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Reference(String),
    Object(ObjectNode),
    Array(Box<SchemaNode>),
    Union(Vec<SchemaNode>),
    Primitive(PrimitiveKind),
}

/// An object shape. No properties means a string-keyed record whose values
/// are `additional`, or `unknown` when that is absent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectNode {
    pub properties: IndexMap<String, SchemaNode>,
    pub required: IndexSet<String>,
    /// Value shape of keys outside `properties`. Only read for records.
    pub additional: Option<Box<SchemaNode>>,
}

impl ObjectNode {
    pub fn is_free_form(&self) -> bool {
        self.properties.is_empty()
    }

    /// A record with values of shape `value`.
    pub fn record(value: SchemaNode) -> Self {
        Self {
            additional: Some(Box::new(value)),
            ..Self::default()
        }
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.contains(name)
    }
}

impl SchemaNode {
    pub fn free_form_object() -> Self {
        SchemaNode::Object(ObjectNode::default())
    }

    /// Entity names referenced anywhere below this node, in first-seen order.
    pub fn references(&self) -> IndexSet<String> {
        let mut out = IndexSet::new();
        self.collect_references(&mut out);
        out
    }

    fn collect_references(&self, out: &mut IndexSet<String>) {
        match self {
            SchemaNode::Reference(name) => {
                out.insert(name.clone());
            }
            SchemaNode::Object(obj) => {
                for prop in obj.properties.values() {
                    prop.collect_references(out);
                }
                if let Some(value) = &obj.additional {
                    value.collect_references(out);
                }
            }
            SchemaNode::Array(items) => items.collect_references(out),
            SchemaNode::Union(members) => {
                for m in members {
                    m.collect_references(out);
                }
            }
            SchemaNode::Primitive(_) => {}
        }
    }
}

/// A named entity declared in the entity-schema module.
#[derive(Debug, Clone)]
pub struct Entity {
    /// File stem, e.g. `arc_width_payload`.
    pub source_name: String,
    /// Pascal-cased declaration name, e.g. `ArcWidthPayload`.
    pub name: String,
    pub schema: SchemaNode,
}
