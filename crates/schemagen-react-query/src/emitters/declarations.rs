use std::collections::HashSet;

use schemagen_core::GeneratorError;
use schemagen_core::ir::{ApiOperation, ObjectNode, SchemaNode};
use schemagen_core::naming::hook_name;
use schemagen_zod::{RefStyle, to_validator};

/// Everything the hook emitter needs to know about one operation, plus the
/// declarations it synthesized.
#[derive(Debug, Clone)]
pub struct OperationPlan<'a> {
    pub op: &'a ApiOperation,
    pub hook: String,
    /// `<V>Params`, when the operation has parameters.
    pub params_type: Option<String>,
    /// Request body type, when there is a JSON body.
    pub body_type: Option<String>,
    /// Response type, `void` without a JSON `200` response.
    pub response_type: String,
    /// Validator applied to the response data.
    pub parse_fn: Option<String>,
    pub declarations: Vec<String>,
}

/// Tracks every `const`/`type` name emitted into the module.
#[derive(Debug, Default)]
pub struct DeclaredNames {
    names: HashSet<String>,
}

impl DeclaredNames {
    /// Start with the imported entity names, which are already bound.
    pub fn with_imports<'a>(imports: impl IntoIterator<Item = &'a String>) -> Self {
        Self {
            names: imports.into_iter().cloned().collect(),
        }
    }

    fn claim(&mut self, name: &str) -> Result<(), GeneratorError> {
        if self.names.insert(name.to_string()) {
            Ok(())
        } else {
            Err(GeneratorError::DuplicateDeclaration(name.to_string()))
        }
    }
}

pub fn plan_operation<'a>(
    op: &'a ApiOperation,
    declared: &mut DeclaredNames,
) -> Result<OperationPlan<'a>, GeneratorError> {
    let versioned = &op.name.versioned;
    let mut declarations = Vec::new();

    let params_type = if op.parameters.is_empty() {
        None
    } else {
        let mut obj = ObjectNode::default();
        for param in &op.parameters {
            obj.properties.insert(param.name.clone(), param.schema.clone());
            if param.required {
                obj.required.insert(param.name.clone());
            }
        }
        let name = format!("{versioned}Params");
        declarations.push(declare(&name, &SchemaNode::Object(obj), declared)?);
        Some(name)
    };

    let body_type = match &op.request_body {
        Some(SchemaNode::Reference(entity)) => Some(entity.clone()),
        Some(node) => {
            let name = format!("{versioned}Body");
            declarations.push(declare(&name, node, declared)?);
            Some(name)
        }
        None => None,
    };

    let (response_type, parse_fn) = match &op.response {
        Some(SchemaNode::Reference(entity)) => (entity.clone(), Some(format!("{entity}.parse"))),
        Some(node) => {
            let name = format!("{versioned}Resp");
            declarations.push(declare(&name, node, declared)?);
            let parse = format!("{name}.parse");
            (name, Some(parse))
        }
        None => ("void".to_string(), None),
    };

    Ok(OperationPlan {
        op,
        hook: hook_name(&op.name.name),
        params_type,
        body_type,
        response_type,
        parse_fn,
        declarations,
    })
}

fn declare(name: &str, node: &SchemaNode, declared: &mut DeclaredNames) -> Result<String, GeneratorError> {
    declared.claim(name)?;
    Ok(format!(
        "const {name} = {};\ntype {name} = z.infer<typeof {name}>;",
        to_validator(node, RefStyle::Bare)
    ))
}
