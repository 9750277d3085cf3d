use std::{any::Any, panic::AssertUnwindSafe};

use async_graphql_parser::{types::Field as FieldNode, Positioned};
use futures_util::{future, FutureExt};

use super::{coerce_argument_values, complete_value, handle_field_error, FieldContext};
use crate::{
    context::ExecutionContext,
    error::GraphqlResult,
    path::QueryPath,
    registry::{FieldFuture, Object, ResolveInfo, ResolverContext},
    value::Value,
};

/// Resolve and complete the field behind one response key.
///
/// Returns `None` for fields the object type does not define, which are left
/// out of the response.
pub(super) async fn resolve_field<'a>(
    ctx: &'a ExecutionContext<'a>,
    object: &'a Object,
    parent_value: &'a Value,
    nodes: &'a [&'a Positioned<FieldNode>],
    path: QueryPath,
) -> Option<GraphqlResult<serde_json::Value>> {
    let node = nodes.first()?;
    let field_name = node.node.name.node.as_str();

    if field_name == "__typename" {
        return Some(Ok(serde_json::Value::String(object.name().to_string())));
    }

    let Some(field) = object.get_field(field_name) else {
        tracing::trace!("Field `{field_name}` is not defined on `{}`, skipping", object.name());
        return None;
    };

    tracing::trace!("Where: {}.{}", object.name(), field_name);

    let arguments = coerce_argument_values(field, node, &ctx.variables);
    let info = ResolveInfo {
        field_name,
        field_nodes: nodes,
        return_type: field.ty(),
        parent_type: object.name(),
        path: &path,
        schema: ctx.schema,
        operation: ctx.operation,
        root_value: ctx.root_value,
        variables: &ctx.variables,
    };
    let resolver_ctx = ResolverContext {
        parent_value,
        args: &arguments,
        info: &info,
        data: ctx.data,
    };

    let field_ctx = FieldContext {
        parent_type: object.name(),
        field,
        nodes,
        info: &info,
    };

    // Completion runs user code too (type resolution, scalar serialization).
    let resolution = async {
        let resolved = match &field.resolver {
            Some(resolver) => resolver(resolver_ctx).await,
            None => default_resolver(resolver_ctx).await,
        };
        match resolved {
            Ok(value) => complete_value(ctx, &field_ctx, field.ty(), path.clone(), value).await,
            Err(error) => Err(error.into_graphql_error(field_ctx.locations(), path.clone())),
        }
    };

    let result = match AssertUnwindSafe(resolution).catch_unwind().await {
        Ok(result) => result,
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            tracing::warn!("Resolver of `{}.{field_name}` panicked: {message}", object.name());
            Err(field_ctx.error(format!("Resolver panicked: {message}"), path.clone()))
        }
    };

    Some(handle_field_error(ctx, field.ty(), result))
}

/// Resolver of fields that do not bring their own.
///
/// Without a parent value the field is `null`. Otherwise the parent's member
/// of the same name is the field value, and a callable member is invoked to
/// produce it.
fn default_resolver(ctx: ResolverContext<'_>) -> FieldFuture<'_> {
    match ctx.parent_value.get(ctx.info.field_name) {
        Some(Value::Method(method)) => method.call(ctx),
        Some(value) => future::ready(Ok(value.clone())).boxed(),
        None => future::ready(Ok(Value::Null)).boxed(),
    }
}

pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_payloads() {
        assert_eq!(panic_message(&"boom"), "boom");
        assert_eq!(panic_message(&"boom".to_string()), "boom");
        assert_eq!(panic_message(&1), "unknown panic");
    }
}
