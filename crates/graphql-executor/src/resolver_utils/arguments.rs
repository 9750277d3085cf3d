use async_graphql_parser::{types::Field as FieldNode, Positioned};
use async_graphql_value::Value as AstValue;

use crate::{
    registry::Field,
    value::{Arguments, Value, Variables},
};

/// Turn the arguments written on a field node into plain values.
///
/// Arguments that end up undefined are left out, and declared defaults fill
/// the gaps. Arguments the field does not declare are passed along as well.
pub(crate) fn coerce_argument_values(field: &Field, node: &Positioned<FieldNode>, variables: &Variables) -> Arguments {
    let mut arguments = Arguments::default();

    for (name, value) in &node.node.arguments {
        if let Some(value) = value_from_ast(&value.node, variables) {
            arguments.insert(name.node.to_string(), value);
        }
    }

    for argument in field.arguments() {
        if arguments.contains(argument.name()) {
            continue;
        }
        if let Some(default) = argument.default() {
            arguments.insert(argument.name().to_string(), default.clone());
        }
    }

    arguments
}

/// Convert one AST value. `None` stands for undefined.
///
/// Enum literals become their name; mapping names to internal values is left
/// to the enum type.
pub(crate) fn value_from_ast(value: &AstValue, variables: &Variables) -> Option<Value> {
    Some(match value {
        AstValue::Variable(name) => return variables.get(name.as_str()).cloned(),
        AstValue::Null => Value::Null,
        AstValue::Number(number) => Value::Number(number.clone()),
        AstValue::String(string) => Value::String(string.clone()),
        AstValue::Boolean(boolean) => Value::Boolean(*boolean),
        AstValue::Enum(name) => Value::String(name.to_string()),
        AstValue::List(items) => Value::List(
            items
                .iter()
                .map(|item| value_from_ast(item, variables).unwrap_or_default())
                .collect(),
        ),
        AstValue::Object(fields) => Value::Object(
            fields
                .iter()
                .filter_map(|(name, value)| Some((name.to_string(), value_from_ast(value, variables)?)))
                .collect(),
        ),
        _ => return None,
    })
}
