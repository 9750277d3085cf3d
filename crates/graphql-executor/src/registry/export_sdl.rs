use std::fmt::Write;

use super::{Field, InputValue, Scalar, Type};
use crate::{schema::Schema, value::Value};

pub(crate) fn export_sdl(schema: &Schema) -> String {
    let mut sdl = String::new();

    for directive in schema.directives() {
        if let Some(description) = &directive.description {
            export_description(&mut sdl, description, "");
        }
        write!(sdl, "directive @{}", directive.name).ok();
        export_arguments(&mut sdl, directive.arguments.values());
        if directive.is_repeatable {
            sdl.push_str(" repeatable");
        }
        let locations = directive
            .locations
            .iter()
            .map(|location| location.as_str())
            .collect::<Vec<_>>()
            .join(" | ");
        writeln!(sdl, " on {locations}\n").ok();
    }

    for ty in schema.types() {
        if Scalar::is_builtin(ty.name()) {
            continue;
        }

        if let Some(description) = ty.description() {
            export_description(&mut sdl, description, "");
        }

        match ty {
            Type::Scalar(scalar) => {
                writeln!(sdl, "scalar {}", scalar.name).ok();
            }
            Type::Object(object) => {
                write!(sdl, "type {}", object.name).ok();
                if !object.implements.is_empty() {
                    write!(sdl, " implements {}", object.implements.join(" & ")).ok();
                }
                writeln!(sdl, " {{").ok();
                export_fields(&mut sdl, object.fields.values());
                writeln!(sdl, "}}").ok();
            }
            Type::Interface(interface) => {
                writeln!(sdl, "interface {} {{", interface.name).ok();
                export_fields(&mut sdl, interface.fields.values());
                writeln!(sdl, "}}").ok();
            }
            Type::Union(union) => {
                writeln!(sdl, "union {} = {}", union.name, union.possible_types.join(" | ")).ok();
            }
            Type::Enum(enum_type) => {
                writeln!(sdl, "enum {} {{", enum_type.name).ok();
                for item in enum_type.items.values() {
                    if let Some(description) = &item.description {
                        export_description(&mut sdl, description, "\t");
                    }
                    writeln!(sdl, "\t{}", item.name).ok();
                }
                writeln!(sdl, "}}").ok();
            }
            Type::InputObject(input_object) => {
                writeln!(sdl, "input {} {{", input_object.name).ok();
                for field in input_object.fields.values() {
                    if let Some(description) = &field.description {
                        export_description(&mut sdl, description, "\t");
                    }
                    writeln!(sdl, "\t{}", export_input_value(field)).ok();
                }
                writeln!(sdl, "}}").ok();
            }
        }
        sdl.push('\n');
    }

    let query = schema.query_type().name();
    let mutation = schema.mutation_type().map(|object| object.name());
    let subscription = schema.subscription_type().map(|object| object.name());

    if query != "Query" || mutation.is_some_and(|name| name != "Mutation") || subscription.is_some_and(|name| name != "Subscription") {
        writeln!(sdl, "schema {{").ok();
        writeln!(sdl, "\tquery: {query}").ok();
        if let Some(mutation) = mutation {
            writeln!(sdl, "\tmutation: {mutation}").ok();
        }
        if let Some(subscription) = subscription {
            writeln!(sdl, "\tsubscription: {subscription}").ok();
        }
        writeln!(sdl, "}}").ok();
    }

    sdl
}

fn export_description(sdl: &mut String, description: &str, indent: &str) {
    writeln!(
        sdl,
        "{indent}\"\"\"\n{indent}{}\n{indent}\"\"\"",
        description.replace('\n', &format!("\n{indent}"))
    )
    .ok();
}

fn export_fields<'a>(sdl: &mut String, fields: impl Iterator<Item = &'a Field>) {
    for field in fields {
        if let Some(description) = &field.description {
            export_description(sdl, description, "\t");
        }
        write!(sdl, "\t{}", field.name).ok();
        export_arguments(sdl, field.arguments.values());
        writeln!(sdl, ": {}", field.ty).ok();
    }
}

fn export_arguments<'a>(sdl: &mut String, arguments: impl ExactSizeIterator<Item = &'a InputValue>) {
    if arguments.len() == 0 {
        return;
    }
    let arguments = arguments.map(export_input_value).collect::<Vec<_>>();
    write!(sdl, "({})", arguments.join(", ")).ok();
}

fn export_input_value(input_value: &InputValue) -> String {
    match &input_value.default_value {
        Some(default) => format!("{}: {} = {}", input_value.name, input_value.ty, graphql_literal(default)),
        None => format!("{}: {}", input_value.name, input_value.ty),
    }
}

fn graphql_literal(value: &Value) -> String {
    match value {
        Value::Null | Value::Method(_) => "null".to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("{s:?}"),
        Value::List(items) => format!("[{}]", items.iter().map(graphql_literal).collect::<Vec<_>>().join(", ")),
        Value::Object(map) => format!(
            "{{{}}}",
            map.iter()
                .map(|(key, value)| format!("{key}: {}", graphql_literal(value)))
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}
