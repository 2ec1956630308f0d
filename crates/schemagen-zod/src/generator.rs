use std::collections::HashMap;
use std::path::PathBuf;

use log::debug;
use schemagen_core::config::{GeneratorId, SchemagenConfig};
use schemagen_core::source::SchemaSource;
use schemagen_core::{CodeGenerator, GeneratedFile, GeneratorError};

use crate::emitters;

/// Entity-schema generator: one zod validator per `entities/*.schema.json`.
pub struct EntitiesGenerator;

impl CodeGenerator for EntitiesGenerator {
    fn id(&self) -> GeneratorId {
        GeneratorId::Entities
    }

    fn generate(
        &self,
        source: &SchemaSource,
        config: &SchemagenConfig,
    ) -> Result<Vec<GeneratedFile>, GeneratorError> {
        let entities = source.load_entities()?;

        // Two files may Pascal-case to the same declaration name.
        let mut seen: HashMap<&str, &str> = HashMap::new();
        for entity in &entities {
            if let Some(previous) = seen.insert(&entity.name, &entity.source_name) {
                return Err(GeneratorError::DuplicateDeclaration(format!(
                    "{} (from `{previous}` and `{}`)",
                    entity.name, entity.source_name
                )));
            }
        }
        debug!("emitting {} entities", entities.len());

        Ok(vec![GeneratedFile {
            path: PathBuf::from(&config.entities.output),
            fragments: emitters::schemas::emit_schemas(&entities)?,
        }])
    }
}
