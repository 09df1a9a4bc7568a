//! dto-gen-compiler
//!
//! This crate implements:
//!  1) A tokenizer + declaration parser for Go source files,
//!  2) The schema extractor (struct lookup, field type resolution),
//!  3) The DTO renderer (`render` → `String`),
//!  4) Error types (`DtoError`) and the `TypeDeclSource` trait.

pub mod error;
pub mod types;
pub mod utils;
pub mod tokenizer;
pub mod parser;
pub mod extractor;
pub mod compiler;
pub mod gen_go;
pub mod traits;

pub use compiler::compile_dto;
pub use compiler::extract_context;
pub use compiler::parse_source;
pub use compiler::write_dto;
pub use extractor::extract;
pub use gen_go::render;
