use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};

use crate::error::ResolveError;
use crate::ir::{ObjectNode, PrimitiveKind, SchemaNode};
use crate::naming::entity_name;
use crate::parse::schema::{AdditionalProperties, Schema, SchemaOrRef, SchemaType, TypeSet};

const COMPONENTS_PREFIX: &str = "#/components/schemas/";
const DEFS_PREFIXES: [&str; 2] = ["#/$defs/", "#/definitions/"];

/// Where a schema being converted lives, which decides the `$ref` forms it may
/// use and what an untyped schema means.
#[derive(Debug, Clone, Copy)]
pub enum RefContext<'a> {
    /// Inside an OpenAPI document. Untyped schemas carry no value (`void`).
    Components,
    /// Inside a standalone entity file whose root holds the local definitions.
    Entity { root: &'a Schema },
}

/// Converts parsed JSON-Schema into [`SchemaNode`]s.
///
/// References always resolve to entity names; a reference to something that
/// is not a known entity is an error.
pub struct SchemaConverter<'a> {
    entities: &'a IndexSet<String>,
    context: RefContext<'a>,
    visiting: HashSet<String>,
}

impl<'a> SchemaConverter<'a> {
    pub fn new(entities: &'a IndexSet<String>, context: RefContext<'a>) -> Self {
        Self {
            entities,
            context,
            visiting: HashSet::new(),
        }
    }

    pub fn convert(&mut self, schema_or_ref: &SchemaOrRef) -> Result<SchemaNode, ResolveError> {
        match schema_or_ref {
            SchemaOrRef::Ref { ref_path } => self.convert_ref(ref_path),
            SchemaOrRef::Schema(schema) => self.convert_schema(schema),
        }
    }

    pub fn convert_schema(&mut self, schema: &Schema) -> Result<SchemaNode, ResolveError> {
        if !schema.all_of.is_empty() {
            return Err(ResolveError::UnsupportedSchema(describe(schema, "allOf")));
        }
        if !schema.any_of.is_empty() {
            return self.convert_union(&schema.any_of);
        }
        if !schema.one_of.is_empty() {
            return self.convert_union(&schema.one_of);
        }

        match &schema.schema_type {
            Some(TypeSet::Single(t)) => self.convert_typed(t, schema),
            Some(TypeSet::Multiple(types)) => {
                let members = types
                    .iter()
                    .map(|t| self.convert_typed(t, schema))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(SchemaNode::Union(members))
            }
            None if !schema.properties.is_empty() || typed_additional(schema).is_some() => {
                self.convert_object(schema)
            }
            None => Ok(SchemaNode::Primitive(self.untyped_kind())),
        }
    }

    fn convert_typed(&mut self, t: &SchemaType, schema: &Schema) -> Result<SchemaNode, ResolveError> {
        let node = match t {
            SchemaType::String => SchemaNode::Primitive(PrimitiveKind::String),
            SchemaType::Number | SchemaType::Integer => SchemaNode::Primitive(PrimitiveKind::Number),
            SchemaType::Boolean => SchemaNode::Primitive(PrimitiveKind::Boolean),
            SchemaType::Null => SchemaNode::Primitive(PrimitiveKind::Null),
            SchemaType::Array => {
                let items = match &schema.items {
                    Some(items) => self.convert(items)?,
                    None => SchemaNode::Primitive(PrimitiveKind::Unknown),
                };
                SchemaNode::Array(Box::new(items))
            }
            SchemaType::Object => self.convert_object(schema)?,
            SchemaType::Unsupported => {
                return Err(ResolveError::UnsupportedSchema(describe(schema, "type")));
            }
        };
        Ok(node)
    }

    fn convert_object(&mut self, schema: &Schema) -> Result<SchemaNode, ResolveError> {
        let mut properties = IndexMap::new();
        for (name, prop) in &schema.properties {
            properties.insert(name.clone(), self.convert(prop)?);
        }
        let required = schema
            .required
            .iter()
            .filter(|name| properties.contains_key(name.as_str()))
            .cloned()
            .collect();
        let additional = match typed_additional(schema) {
            Some(value) => Some(Box::new(self.convert(value)?)),
            None => None,
        };
        Ok(SchemaNode::Object(ObjectNode {
            properties,
            required,
            additional,
        }))
    }

    fn convert_union(&mut self, members: &[SchemaOrRef]) -> Result<SchemaNode, ResolveError> {
        let members = members
            .iter()
            .map(|m| self.convert(m))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SchemaNode::Union(members))
    }

    fn convert_ref(&mut self, ref_path: &str) -> Result<SchemaNode, ResolveError> {
        match self.context {
            RefContext::Components => {
                let name = ref_path
                    .strip_prefix(COMPONENTS_PREFIX)
                    .ok_or_else(|| ResolveError::UnsupportedRef(ref_path.to_string()))?;
                self.entity_reference(name)
            }
            RefContext::Entity { root } => {
                let (name, defs) = DEFS_PREFIXES
                    .iter()
                    .zip([&root.defs, &root.definitions])
                    .find_map(|(prefix, defs)| ref_path.strip_prefix(*prefix).map(|n| (n, defs)))
                    .ok_or_else(|| ResolveError::UnsupportedRef(ref_path.to_string()))?;

                let entity = entity_name(name);
                if self.entities.contains(&entity) {
                    return Ok(SchemaNode::Reference(entity));
                }

                // Not an entity of its own: expand the local definition.
                let target = defs
                    .get(name)
                    .ok_or_else(|| ResolveError::RefTargetNotFound(ref_path.to_string()))?;
                if !self.visiting.insert(ref_path.to_string()) {
                    return Err(ResolveError::CircularRef(ref_path.to_string()));
                }
                let node = self.convert(target);
                self.visiting.remove(ref_path);
                node
            }
        }
    }

    fn entity_reference(&self, name: &str) -> Result<SchemaNode, ResolveError> {
        let entity = entity_name(name);
        if self.entities.contains(&entity) {
            Ok(SchemaNode::Reference(entity))
        } else {
            Err(ResolveError::UnknownEntity(name.to_string()))
        }
    }

    fn untyped_kind(&self) -> PrimitiveKind {
        match self.context {
            RefContext::Components => PrimitiveKind::Void,
            RefContext::Entity { .. } => PrimitiveKind::Unknown,
        }
    }
}

/// The `additionalProperties` schema, unless it leaves values unconstrained
/// (absent, a boolean or `{}`).
fn typed_additional(schema: &Schema) -> Option<&SchemaOrRef> {
    match &schema.additional_properties {
        Some(AdditionalProperties::Schema(value)) => match value.as_ref() {
            SchemaOrRef::Schema(inner) if inner.is_untyped() => None,
            other => Some(other),
        },
        _ => None,
    }
}

fn describe(schema: &Schema, keyword: &str) -> String {
    match &schema.title {
        Some(title) => format!("`{keyword}` in schema `{title}`"),
        None => format!("`{keyword}`"),
    }
}
