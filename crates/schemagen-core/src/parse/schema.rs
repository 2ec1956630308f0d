use indexmap::IndexMap;
use serde::Deserialize;

/// A JSON Schema type keyword value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
    #[serde(other)]
    Unsupported,
}

/// The `type` field can be a single type or an array of types.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TypeSet {
    Single(SchemaType),
    Multiple(Vec<SchemaType>),
}

/// A reference or inline schema.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SchemaOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Schema(Box<Schema>),
}

/// The subset of a JSON Schema object the generator understands.
///
/// Keywords outside this set (`format`, `enum`, constraints, ...) are accepted
/// and ignored.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Schema {
    #[serde(rename = "type")]
    pub schema_type: Option<TypeSet>,

    pub title: Option<String>,

    #[serde(default)]
    pub properties: IndexMap<String, SchemaOrRef>,

    #[serde(default)]
    pub required: Vec<String>,

    #[serde(rename = "additionalProperties")]
    pub additional_properties: Option<AdditionalProperties>,

    pub items: Option<Box<SchemaOrRef>>,

    #[serde(rename = "allOf", default)]
    pub all_of: Vec<SchemaOrRef>,

    #[serde(rename = "oneOf", default)]
    pub one_of: Vec<SchemaOrRef>,

    #[serde(rename = "anyOf", default)]
    pub any_of: Vec<SchemaOrRef>,

    // Local definitions of standalone entity files
    #[serde(rename = "$defs", default)]
    pub defs: IndexMap<String, SchemaOrRef>,

    #[serde(default)]
    pub definitions: IndexMap<String, SchemaOrRef>,
}

/// `additionalProperties` can be a boolean or a schema.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<SchemaOrRef>),
}

impl Schema {
    /// Whether the schema carries no shape keyword at all (`{}`).
    pub fn is_untyped(&self) -> bool {
        self.schema_type.is_none()
            && self.properties.is_empty()
            && self.items.is_none()
            && self.all_of.is_empty()
            && self.one_of.is_empty()
            && self.any_of.is_empty()
    }
}
