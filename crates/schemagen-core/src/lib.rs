pub mod config;
pub mod emit;
pub mod error;
pub mod ir;
pub mod naming;
pub mod parse;
pub mod source;
pub mod transform;

use std::path::PathBuf;

use thiserror::Error;

use config::{GeneratorId, SchemagenConfig};
use emit::{Formatter, Processor, StagedFile, render_output};
use error::{EmitError, ParseError, ResolveError, SourceError};
use source::SchemaSource;

/// A generated file: its path relative to the output directory and the text
/// fragments that make it up.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub fragments: Vec<String>,
}

impl GeneratedFile {
    /// Unformatted content, fragments joined with newlines.
    pub fn content(&self) -> String {
        self.fragments.join("\n")
    }
}

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Emit(#[from] EmitError),

    #[error("template rendering failed: {0}")]
    Render(String),

    #[error("duplicate declaration `{0}`")]
    DuplicateDeclaration(String),
}

/// A generator producing output files from the schema directory.
pub trait CodeGenerator {
    fn id(&self) -> GeneratorId;

    fn generate(
        &self,
        source: &SchemaSource,
        config: &SchemagenConfig,
    ) -> Result<Vec<GeneratedFile>, GeneratorError>;

    /// Post-processing applied to this generator's files after formatting.
    fn processors(&self) -> Vec<Processor> {
        Vec::new()
    }
}

/// Generate and format every file of `generator` under `config.out_dir`
/// without touching the disk. Write the result with [`emit::write_staged`]
/// once every selected generator has been staged.
pub fn stage(
    generator: &dyn CodeGenerator,
    source: &SchemaSource,
    config: &SchemagenConfig,
    formatter: &dyn Formatter,
) -> Result<Vec<StagedFile>, GeneratorError> {
    let processors = generator.processors();
    generator
        .generate(source, config)?
        .into_iter()
        .map(|file| -> Result<StagedFile, GeneratorError> {
            let path = config.out_dir.join(&file.path);
            let content = render_output(&path, &file.fragments, formatter, &processors)?;
            Ok(StagedFile { path, content })
        })
        .collect()
}
