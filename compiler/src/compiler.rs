use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::{
    error::DtoError,
    extractor::extract,
    gen_go::render,
    parser::parse_source_file,
    tokenizer::tokenize_source,
    types::{RenderContext, SourceFile},
};

/// Tokenize and parse Go source text.
pub fn parse_source(text: &str) -> Result<SourceFile, DtoError> {
    let tokens = tokenize_source(text)?;
    debug!(tokens = tokens.len(), "tokenized source");
    let file = parse_source_file(&tokens)?;
    debug!(package = %file.package, decls = file.decls.len(), "parsed type declarations");
    Ok(file)
}

/// Builds the render context for `type_name` without rendering it.
/// `file` only labels the `StructNotFound` error.
pub fn extract_context(text: &str, type_name: &str, file: &str) -> Result<RenderContext, DtoError> {
    let source = parse_source(text)?;
    let extracted = extract(&source, type_name).ok_or_else(|| DtoError::StructNotFound {
        name: type_name.to_string(),
        file: file.to_string(),
    })?;
    Ok(RenderContext::for_struct(type_name, extracted))
}

/// Compile Go source into `(RenderContext, generated source)` for the
/// struct named `type_name`.
pub fn compile_dto(text: &str, type_name: &str, file: &str) -> Result<(RenderContext, String), DtoError> {
    let ctx = extract_context(text, type_name, file)?;
    let code = render(&ctx);
    Ok((ctx, code))
}

/// Creates or truncates `path` and writes `code` to it.
pub fn write_dto(path: &Path, code: &str) -> Result<(), DtoError> {
    let mut out = BufWriter::new(File::create(path)?);
    out.write_all(code.as_bytes())?;
    out.flush()?;
    Ok(())
}
