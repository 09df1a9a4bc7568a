//! dto-gen
//!
//! Library entry points for generating Go DTOs from struct declarations.
//!
//! - `generate_dto_file`: read a Go file, render the DTO, write it out
//! - `extract_to_json` / `context_to_json`: the render context as JSON
//! - Re-exports of the compiler's types and error

use std::fs;
use std::path::Path;

use tracing::info;

pub use dto_gen_compiler::error::DtoError;
pub use dto_gen_compiler::types::{FieldDescriptor, RenderContext};
pub use dto_gen_compiler::{compile_dto, render};

/// Reads `input`, renders the DTO for `type_name` and writes it to `output`.
pub fn generate_dto_file(input: &Path, output: &Path, type_name: &str) -> Result<RenderContext, DtoError> {
    let text = fs::read_to_string(input)?;
    let (ctx, code) = compile_dto(&text, type_name, &input.display().to_string())?;
    dto_gen_compiler::write_dto(output, &code)?;
    info!(
        input = %input.display(),
        output = %output.display(),
        fields = ctx.fields.len(),
        "wrote {}",
        ctx.dto_name
    );
    Ok(ctx)
}

/// Extract `type_name` from Go source and return its render context as
/// pretty-printed JSON.
pub fn extract_to_json(text: &str, type_name: &str) -> Result<String, DtoError> {
    let ctx = dto_gen_compiler::extract_context(text, type_name, "<input>")?;
    context_to_json(&ctx)
}

pub fn context_to_json(ctx: &RenderContext) -> Result<String, DtoError> {
    Ok(serde_json::to_string_pretty(ctx)?)
}

pub mod error {
    pub use dto_gen_compiler::error::DtoError;
}

pub mod types {
    pub use dto_gen_compiler::types::{FieldDescriptor, RenderContext};
}
