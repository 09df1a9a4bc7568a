use tracing::{debug, trace, warn};

use crate::{
    traits::TypeDeclSource,
    types::{ExtractedStruct, FieldDescriptor, OpaqueShape, TypeExpr},
};

impl OpaqueShape {
    /// Placeholder text emitted for a field type that cannot be spelled out.
    /// These are the syntax-node names Go's own `go/ast` reports for the shape.
    pub fn tag(&self) -> &'static str {
        match self {
            OpaqueShape::Map       => "*ast.MapType",
            OpaqueShape::Chan      => "*ast.ChanType",
            OpaqueShape::Func      => "*ast.FuncType",
            OpaqueShape::Interface => "*ast.InterfaceType",
            OpaqueShape::Paren     => "*ast.ParenExpr",
            OpaqueShape::Index     => "*ast.IndexExpr",
            OpaqueShape::IndexList => "*ast.IndexListExpr",
        }
    }
}

/// Renders a type expression back into Go source text.
///
/// Identifiers, qualified names, pointers and sequences are spelled out;
/// every other shape collapses to its tag, so `*map[K]V` becomes
/// `**ast.MapType`. Array lengths are dropped: `[4]int` becomes `[]int`.
pub fn resolve_type(ty: &TypeExpr) -> String {
    match ty {
        TypeExpr::Ident(name) => name.clone(),
        TypeExpr::Selector { base, name } => format!("{}.{}", resolve_type(base), name),
        TypeExpr::Pointer(elem) => format!("*{}", resolve_type(elem)),
        TypeExpr::Sequence(elem) => format!("[]{}", resolve_type(elem)),
        TypeExpr::Struct(_) => "*ast.StructType".to_string(),
        TypeExpr::Opaque(shape) => shape.tag().to_string(),
    }
}

fn is_fallback(ty: &TypeExpr) -> bool {
    match ty {
        TypeExpr::Ident(_) => false,
        TypeExpr::Selector { base, .. } => is_fallback(base),
        TypeExpr::Pointer(elem) | TypeExpr::Sequence(elem) => is_fallback(elem),
        TypeExpr::Struct(_) | TypeExpr::Opaque(_) => true,
    }
}

/// Finds the struct declaration named `type_name` and lists its fields.
///
/// Same-named declarations whose type is not a struct are skipped. When
/// more than one struct matches, the last one wins. Returns `None` when
/// nothing matches.
pub fn extract<S: TypeDeclSource>(source: &S, type_name: &str) -> Option<ExtractedStruct> {
    let mut found: Option<Vec<FieldDescriptor>> = None;

    for decl in source.type_decls() {
        if decl.name != type_name {
            continue;
        }
        let field_decls = match &decl.ty {
            TypeExpr::Struct(fields) => fields,
            _ => {
                debug!(name = %decl.name, line = decl.line, "skipping non-struct declaration");
                continue;
            }
        };
        if found.is_some() {
            warn!(name = %decl.name, line = decl.line, "struct declared more than once; using the later declaration");
        }

        let mut fields = Vec::new();
        for field in field_decls {
            let type_str = resolve_type(&field.ty);
            if is_fallback(&field.ty) {
                warn!(
                    line = field.line,
                    column = field.column,
                    type_name = %type_str,
                    "unsupported field type shape"
                );
            }
            for name in &field.names {
                trace!(field = %name, ty = %type_str, source_tag = ?field.tag, "extracted field");
                fields.push(FieldDescriptor {
                    name:      name.clone(),
                    type_name: type_str.clone(),
                    tag_name:  name.to_lowercase(),
                });
            }
        }
        debug!(
            name = %decl.name,
            line = decl.line,
            alias = decl.is_alias,
            fields = fields.len(),
            "matched struct declaration"
        );
        found = Some(fields);
    }

    found.map(|fields| ExtractedStruct {
        package_name: source.package_name().to_string(),
        fields,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FieldDecl, SourceFile, TypeDecl};

    fn ident(name: &str) -> TypeExpr {
        TypeExpr::Ident(name.to_string())
    }

    fn field(names: &[&str], ty: TypeExpr) -> FieldDecl {
        FieldDecl {
            names:  names.iter().map(|n| n.to_string()).collect(),
            line:   0,
            column: 0,
            ty,
            tag:    None,
        }
    }

    fn decl(name: &str, ty: TypeExpr) -> TypeDecl {
        TypeDecl { name: name.to_string(), line: 0, column: 0, is_alias: false, ty }
    }

    fn descriptor(name: &str, ty: &str, tag: &str) -> FieldDescriptor {
        FieldDescriptor {
            name:      name.to_string(),
            type_name: ty.to_string(),
            tag_name:  tag.to_string(),
        }
    }

    #[test]
    fn test_resolve_compound_types() {
        let qualified = TypeExpr::Selector { base: Box::new(ident("pkg")), name: "Baz".to_string() };
        assert_eq!(resolve_type(&ident("int")), "int");
        assert_eq!(resolve_type(&TypeExpr::Pointer(Box::new(ident("Foo")))), "*Foo");
        assert_eq!(resolve_type(&TypeExpr::Sequence(Box::new(ident("Bar")))), "[]Bar");
        assert_eq!(resolve_type(&qualified), "pkg.Baz");
        assert_eq!(
            resolve_type(&TypeExpr::Sequence(Box::new(TypeExpr::Pointer(Box::new(qualified))))),
            "[]*pkg.Baz"
        );
        assert_eq!(resolve_type(&TypeExpr::Opaque(OpaqueShape::Map)), "*ast.MapType");
        assert_eq!(
            resolve_type(&TypeExpr::Pointer(Box::new(TypeExpr::Opaque(OpaqueShape::Map)))),
            "**ast.MapType"
        );
        assert_eq!(resolve_type(&TypeExpr::Opaque(OpaqueShape::Index)), "*ast.IndexExpr");
        assert_eq!(resolve_type(&TypeExpr::Opaque(OpaqueShape::IndexList)), "*ast.IndexListExpr");
        assert_eq!(resolve_type(&TypeExpr::Struct(vec![])), "*ast.StructType");
    }

    #[test]
    fn test_extract_in_order_with_shared_types() {
        let file = SourceFile {
            package: "models".to_string(),
            decls:   vec![
                decl("Other", TypeExpr::Struct(vec![field(&["Z"], ident("int"))])),
                decl(
                    "Point",
                    TypeExpr::Struct(vec![
                        field(&["X", "Y"], ident("float64")),
                        field(&[], ident("Embedded")),
                        field(&["Label"], ident("string")),
                    ]),
                ),
            ],
        };
        let got = extract(&file, "Point").unwrap();
        assert_eq!(got.package_name, "models");
        assert_eq!(
            got.fields,
            vec![
                descriptor("X", "float64", "x"),
                descriptor("Y", "float64", "y"),
                descriptor("Label", "string", "label"),
            ]
        );
    }

    #[test]
    fn test_extract_is_case_sensitive() {
        let file = SourceFile {
            package: "p".to_string(),
            decls:   vec![decl("User", TypeExpr::Struct(vec![]))],
        };
        assert!(extract(&file, "user").is_none());
        assert_eq!(extract(&file, "User").unwrap().fields, vec![]);
    }

    #[test]
    fn test_last_matching_struct_wins() {
        let file = SourceFile {
            package: "p".to_string(),
            decls:   vec![
                decl("T", TypeExpr::Struct(vec![field(&["First"], ident("int"))])),
                decl("T", ident("int")),
                decl("T", TypeExpr::Struct(vec![field(&["Second"], ident("string"))])),
            ],
        };
        let got = extract(&file, "T").unwrap();
        assert_eq!(got.fields, vec![descriptor("Second", "string", "second")]);
    }
}
