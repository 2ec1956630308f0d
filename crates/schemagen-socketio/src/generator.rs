use std::path::PathBuf;

use log::debug;
use schemagen_core::config::{GeneratorId, SchemagenConfig};
use schemagen_core::source::SchemaSource;
use schemagen_core::{CodeGenerator, GeneratedFile, GeneratorError};

use crate::emitters::client::emit_client;

/// Socket generator: one typed socket.io client per `asyncapi/*.json`.
pub struct SocketIoGenerator;

impl CodeGenerator for SocketIoGenerator {
    fn id(&self) -> GeneratorId {
        GeneratorId::Sockets
    }

    fn generate(
        &self,
        source: &SchemaSource,
        config: &SchemagenConfig,
    ) -> Result<Vec<GeneratedFile>, GeneratorError> {
        let entities = source.entity_names()?;
        let namespaces = source.load_namespaces(&entities)?;

        let mut files = Vec::with_capacity(namespaces.len());
        for ns in &namespaces {
            debug!("namespace `{}`: {} channels", ns.namespace, ns.channels.len());
            files.push(GeneratedFile {
                path: PathBuf::from(format!("{}-{}.ts", config.sockets.output_prefix, ns.namespace)),
                fragments: vec![emit_client(ns, &config.sockets.schemas_import)?],
            });
        }
        Ok(files)
    }
}
