use std::collections::{HashMap, HashSet};

use minijinja::context;
use schemagen_core::GeneratorError;
use schemagen_core::emit::GENERATED_MARKER;
use schemagen_core::ir::Entity;

use crate::template::render;
use crate::zod_mapper::{RefStyle, to_ts_type, to_validator};

/// Emit the fragments of the entity module: the preamble, then one validator
/// and type per entity.
///
/// An entity that can reach itself through references gets its type spelled
/// out and the validator annotated with it, since `z.infer` cannot see
/// through a self-referential `z.lazy`.
pub fn emit_schemas(entities: &[Entity]) -> Result<Vec<String>, GeneratorError> {
    let preamble = render(
        "schemas.ts.j2",
        include_str!("../../templates/schemas.ts.j2"),
        context! { marker => GENERATED_MARKER },
    )?;

    let recursive = recursive_entities(entities);
    let mut fragments = vec![preamble];
    fragments.extend(
        entities
            .iter()
            .map(|entity| emit_entity(entity, recursive.contains(entity.name.as_str()))),
    );
    Ok(fragments)
}

fn emit_entity(entity: &Entity, recursive: bool) -> String {
    let name = &entity.name;
    let validator = to_validator(&entity.schema, RefStyle::Lazy);
    if recursive {
        format!(
            "export type {name} = {};\nexport const {name}: z.ZodType<{name}> = {validator};\n",
            to_ts_type(&entity.schema, RefStyle::Lazy)
        )
    } else {
        format!("export const {name} = {validator};\nexport type {name} = z.infer<typeof {name}>;\n")
    }
}

/// Names of the entities that lie on a reference cycle.
fn recursive_entities(entities: &[Entity]) -> HashSet<&str> {
    let edges: HashMap<&str, Vec<String>> = entities
        .iter()
        .map(|e| (e.name.as_str(), e.schema.references().into_iter().collect()))
        .collect();

    entities
        .iter()
        .map(|e| e.name.as_str())
        .filter(|&start| {
            let mut seen = HashSet::new();
            let mut stack: Vec<&str> = edges
                .get(start)
                .into_iter()
                .flatten()
                .map(String::as_str)
                .collect();
            while let Some(name) = stack.pop() {
                if name == start {
                    return true;
                }
                if seen.insert(name) {
                    if let Some(next) = edges.get(name) {
                        stack.extend(next.iter().map(String::as_str));
                    }
                }
            }
            false
        })
        .collect()
}
