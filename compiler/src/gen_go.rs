use crate::types::{FieldDescriptor, RenderContext};

fn struct_field_line(field: &FieldDescriptor) -> String {
    format!("\t{} {} `json:\"{}\"`", field.name, field.type_name, field.tag_name)
}

fn mapper_assignment_line(field: &FieldDescriptor) -> String {
    format!("\t\t{}: in.{},", field.name, field.name)
}

/// Renders the DTO struct and its mapper function as Go source.
///
/// Output is tab-indented with single spaces between field name, type and
/// tag; it is not run through a formatter. Fields keep their input order.
pub fn render(ctx: &RenderContext) -> String {
    let mut go_code: Vec<String> = Vec::new();

    go_code.push(format!("package {}", ctx.package_name));
    go_code.push("".to_string());

    go_code.push(format!("type {} struct {{", ctx.dto_name));
    go_code.extend(ctx.fields.iter().map(struct_field_line));
    go_code.push("}".to_string());
    go_code.push("".to_string());

    go_code.push(format!(
        "func {}(in {}) {} {{",
        ctx.mapper_function_name, ctx.original_name, ctx.dto_name
    ));
    go_code.push(format!("\treturn {}{{", ctx.dto_name));
    go_code.extend(ctx.fields.iter().map(mapper_assignment_line));
    go_code.push("\t}".to_string());
    go_code.push("}".to_string());
    go_code.push("".to_string());

    go_code.join("\n")
}
