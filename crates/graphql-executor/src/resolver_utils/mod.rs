mod arguments;
mod collect;
mod container;
mod field;
mod list;

use async_graphql_parser::{types::Field as FieldNode, Positioned};
use futures_util::{future::BoxFuture, FutureExt};

pub(crate) use self::{
    arguments::coerce_argument_values,
    collect::{collect_fields, CollectedFields},
    container::resolve_container,
    field::panic_message,
};
use crate::{
    context::ExecutionContext,
    error::{GraphqlError, GraphqlResult, Location},
    path::QueryPath,
    registry::{Field, Object, ResolveInfo, Type, TypeRef},
    value::Value,
};

/// The field whose value is being completed.
pub(crate) struct FieldContext<'a> {
    pub parent_type: &'a str,
    pub field: &'a Field,
    pub nodes: &'a [&'a Positioned<FieldNode>],
    pub info: &'a ResolveInfo<'a>,
}

impl FieldContext<'_> {
    pub fn locations(&self) -> Vec<Location> {
        self.nodes.iter().map(|node| Location::from(node.pos)).collect()
    }

    pub fn error(&self, message: impl Into<String>, path: QueryPath) -> GraphqlError {
        GraphqlError::new(message)
            .with_locations(self.locations())
            .with_path(path)
    }

    fn coordinate(&self) -> String {
        format!("{}.{}", self.parent_type, self.field.name())
    }
}

/// Catch the error of a nullable position.
///
/// Errors at a nullable position are recorded and replaced by `null`. Under a
/// non-null type they keep propagating, so the nearest nullable ancestor ends
/// up `null` instead.
pub(crate) fn handle_field_error(
    ctx: &ExecutionContext<'_>,
    ty: &TypeRef,
    result: GraphqlResult<serde_json::Value>,
) -> GraphqlResult<serde_json::Value> {
    match result {
        Err(error) if !ty.is_non_null() => {
            ctx.add_error(error);
            Ok(serde_json::Value::Null)
        }
        result => result,
    }
}

/// Turn a resolved value into its response form according to `ty`.
pub(crate) fn complete_value<'a>(
    ctx: &'a ExecutionContext<'a>,
    field: &'a FieldContext<'a>,
    ty: &'a TypeRef,
    path: QueryPath,
    value: Value,
) -> BoxFuture<'a, GraphqlResult<serde_json::Value>> {
    async move {
        match ty {
            TypeRef::NonNull(inner) => {
                let completed = complete_value(ctx, field, inner, path.clone(), value).await?;
                if completed.is_null() {
                    return Err(field.error(
                        format!("Cannot return null for non-nullable field {}.", field.coordinate()),
                        path,
                    ));
                }
                Ok(completed)
            }
            _ if value.is_null() => Ok(serde_json::Value::Null),
            TypeRef::List(inner) => list::complete_list(ctx, field, inner, path, value).await,
            TypeRef::Named(name) => match ctx.schema.get_type(name) {
                Some(Type::Scalar(scalar)) => scalar
                    .serialize(&value)
                    .map_err(|error| error.into_graphql_error(field.locations(), path)),
                Some(Type::Enum(enum_type)) => enum_type
                    .serialize(&value)
                    .map_err(|error| error.into_graphql_error(field.locations(), path)),
                Some(Type::Object(object)) => complete_object_value(ctx, field, object, path, value).await,
                Some(abstract_type @ (Type::Interface(_) | Type::Union(_))) => {
                    complete_abstract_value(ctx, field, abstract_type, path, value).await
                }
                _ => value
                    .into_json()
                    .map_err(|error| error.into_graphql_error(field.locations(), path)),
            },
        }
    }
    .boxed()
}

async fn complete_object_value<'a>(
    ctx: &'a ExecutionContext<'a>,
    field: &'a FieldContext<'a>,
    object: &'a Object,
    path: QueryPath,
    value: Value,
) -> GraphqlResult<serde_json::Value> {
    if field
        .nodes
        .iter()
        .all(|node| node.node.selection_set.node.items.is_empty())
    {
        return Err(field.error(
            format!(
                "Field \"{}\" of type \"{}\" must have a selection of subfields.",
                field.field.name(),
                field.field.ty()
            ),
            path,
        ));
    }

    let fields = collect::collect_subfields(ctx.document, field.nodes);
    resolve_container(ctx, object, &value, fields, &path, true).await
}

async fn complete_abstract_value<'a>(
    ctx: &'a ExecutionContext<'a>,
    field: &'a FieldContext<'a>,
    abstract_type: &'a Type,
    path: QueryPath,
    value: Value,
) -> GraphqlResult<serde_json::Value> {
    let resolve_type = match abstract_type {
        Type::Interface(interface) => interface.resolve_type.as_ref(),
        Type::Union(union) => union.resolve_type.as_ref(),
        _ => None,
    };

    let type_name = match resolve_type {
        Some(resolve_type) => resolve_type(&value, ctx.data, field.info),
        None => value.get("__typename").and_then(Value::as_str).map(str::to_string),
    };

    let Some(object) = type_name
        .as_deref()
        .and_then(|name| ctx.schema.get_type(name))
        .and_then(Type::as_object)
    else {
        return Err(field.error(
            format!(
                "Abstract type \"{name}\" must resolve to an Object type at runtime for field \"{coordinate}\". \
                 Either the \"{name}\" type should provide a \"resolveType\" function or each possible type should \
                 provide a \"__typename\" member.",
                name = abstract_type.name(),
                coordinate = field.coordinate(),
            ),
            path,
        ));
    };

    if !ctx.schema.is_possible_type(abstract_type, object) {
        return Err(field.error(
            format!(
                "Runtime Object type \"{}\" is not a possible type for \"{}\".",
                object.name(),
                abstract_type.name()
            ),
            path,
        ));
    }

    complete_object_value(ctx, field, object, path, value).await
}
