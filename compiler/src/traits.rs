use crate::types::{SourceFile, TypeDecl};

/// Anything that can list a file's package name and its top-level type
/// declarations in source order.
pub trait TypeDeclSource {
    fn package_name(&self) -> &str;
    fn type_decls(&self) -> &[TypeDecl];
}

impl TypeDeclSource for SourceFile {
    fn package_name(&self) -> &str {
        &self.package
    }

    fn type_decls(&self) -> &[TypeDecl] {
        &self.decls
    }
}
