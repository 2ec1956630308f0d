use std::path::PathBuf;

use log::debug;
use minijinja::context;
use schemagen_core::config::{ApiConfig, GeneratorId, SchemagenConfig};
use schemagen_core::emit::GENERATED_MARKER;
use schemagen_core::ir::{TagGroup, group_by_tag_and_version};
use schemagen_core::source::SchemaSource;
use schemagen_core::{CodeGenerator, GeneratedFile, GeneratorError};
use schemagen_zod::template::render;

use crate::emitters::declarations::{DeclaredNames, OperationPlan, plan_operation};
use crate::emitters::module::emit_api_object;

/// HTTP-API generator: TanStack Query hook factories over a shared axios client.
pub struct ReactQueryGenerator;

impl CodeGenerator for ReactQueryGenerator {
    fn id(&self) -> GeneratorId {
        GeneratorId::Api
    }

    fn generate(
        &self,
        source: &SchemaSource,
        config: &SchemagenConfig,
    ) -> Result<Vec<GeneratedFile>, GeneratorError> {
        let entities = source.entity_names()?;
        let operations = source.load_operations(&entities)?;
        let groups = group_by_tag_and_version(&operations);
        debug!(
            "{} operations in {} tags",
            operations.len(),
            groups.len()
        );

        let mut declared = DeclaredNames::with_imports(&entities);
        let mut plans: Vec<Option<OperationPlan<'_>>> = vec![None; operations.len()];
        for index in discovery_order(&groups) {
            plans[index] = Some(plan_operation(&operations[index], &mut declared)?);
        }
        let plans: Vec<OperationPlan<'_>> = plans.into_iter().flatten().collect();

        let mut fragments = vec![emit_preamble(&config.api, entities.iter().map(String::as_str).collect())?];
        for index in discovery_order(&groups) {
            fragments.extend(plans[index].declarations.iter().cloned());
        }
        fragments.push(emit_api_object(&groups, &plans)?);

        Ok(vec![GeneratedFile {
            path: PathBuf::from(&config.api.output),
            fragments,
        }])
    }
}

/// Operation indices tag by tag, each tag's operations in document order.
fn discovery_order(groups: &[TagGroup]) -> Vec<usize> {
    groups
        .iter()
        .flat_map(|group| {
            let mut indices: Vec<usize> = group
                .unversioned
                .iter()
                .chain(group.versions.values().flatten())
                .copied()
                .collect();
            indices.sort_unstable();
            indices
        })
        .collect()
}

fn emit_preamble(config: &ApiConfig, entities: Vec<&str>) -> Result<String, GeneratorError> {
    render(
        "preamble.ts.j2",
        include_str!("../templates/preamble.ts.j2"),
        context! {
            marker => GENERATED_MARKER,
            base_url_import => config.base_url_import.trim(),
            base_url => &config.base_url,
            schemas_import => &config.schemas_import,
            entities => entities,
        },
    )
}
