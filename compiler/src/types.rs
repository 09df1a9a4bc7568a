use serde::Serialize;

/// A parsed Go source file, reduced to what the extractor needs.
#[derive(Debug, PartialEq, Serialize)]
pub struct SourceFile {
    pub package: String,
    pub decls:   Vec<TypeDecl>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeDecl {
    pub name:     String,
    pub line:     usize,
    pub column:   usize,
    /// Kept for diagnostics; an alias to a struct literal still matches.
    pub is_alias: bool,
    pub ty:       TypeExpr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDecl {
    /// Empty for embedded fields.
    pub names:  Vec<String>,
    pub line:   usize,
    pub column: usize,
    pub ty:     TypeExpr,
    /// Raw source tag, kept for diagnostics. Never copied into the DTO.
    pub tag:    Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TypeExpr {
    Ident(String),
    Selector {
        base: Box<TypeExpr>,
        name: String,
    },
    Pointer(Box<TypeExpr>),
    /// Slices and arrays alike; array lengths are not kept.
    Sequence(Box<TypeExpr>),
    Struct(Vec<FieldDecl>),
    Opaque(OpaqueShape),
}

/// Type shapes the extractor cannot spell out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OpaqueShape {
    Map,
    Chan,
    Func,
    Interface,
    Paren,
    /// Generic instantiation with one type argument, `List[int]`.
    Index,
    /// Generic instantiation with several type arguments, `Map[K, V]`.
    IndexList,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    pub name:      String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(rename = "tagName")]
    pub tag_name:  String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedStruct {
    pub package_name: String,
    pub fields:       Vec<FieldDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderContext {
    pub package_name:         String,
    pub dto_name:             String,
    pub original_name:        String,
    pub mapper_function_name: String,
    pub fields:               Vec<FieldDescriptor>,
}

impl RenderContext {
    /// Builds the context for `original_name`, naming the DTO `<Name>DTO`
    /// and the mapper `To<Name>DTO`.
    pub fn for_struct(original_name: &str, extracted: ExtractedStruct) -> Self {
        RenderContext {
            package_name:         extracted.package_name,
            dto_name:             format!("{}DTO", original_name),
            original_name:        original_name.to_string(),
            mapper_function_name: format!("To{}DTO", original_name),
            fields:               extracted.fields,
        }
    }
}
