use std::panic::AssertUnwindSafe;

use async_graphql_parser::types::OperationType;
use futures_util::{stream::BoxStream, FutureExt};

use crate::{
    context::ExecutionContext,
    error::{GraphqlError, Location},
    execute::{get_operation, missing_root_error, operation_kind},
    path::QueryPath,
    registry::{ResolveInfo, ResolverContext},
    request::Request,
    resolver_utils::{coerce_argument_values, collect_fields, panic_message},
    response::Response,
    schema::Schema,
};

/// Start a subscription.
///
/// The operation must select exactly one root field, and that field must
/// have a `subscribe` function. Its stream is returned untouched; turning
/// events into responses is up to the function, typically by executing the
/// operation again with the event as root value.
pub(crate) async fn subscribe(schema: &Schema, request: Request) -> Result<BoxStream<'static, Response>, Response> {
    let operation = get_operation(&request.document, request.operation_name.as_deref()).map_err(Response::from)?;

    if operation.node.ty != OperationType::Subscription {
        return Err(Response::from(
            GraphqlError::new(format!(
                "Expected a subscription operation, found a {} operation.",
                operation_kind(operation.node.ty)
            ))
            .with_location(operation.pos),
        ));
    }

    let Some(root) = schema.subscription_type() else {
        return Err(Response::from(missing_root_error(operation)));
    };

    let ctx = ExecutionContext::new(schema, &request, &operation.node);
    let fields = collect_fields(ctx.document, &operation.node.selection_set);

    let mut fields = fields.into_iter();
    let (response_key, nodes) = match (fields.next(), fields.next()) {
        (Some(field), None) => field,
        _ => {
            return Err(Response::from(
                GraphqlError::new("Subscription must have exactly one root field.").with_location(operation.pos),
            ))
        }
    };

    let Some(node) = nodes.first() else {
        return Err(Response::from(GraphqlError::new(
            "Subscription must have exactly one root field.",
        )));
    };
    let field_name = node.node.name.node.as_str();
    let locations = nodes.iter().map(|node| Location::from(node.pos)).collect::<Vec<_>>();

    let Some((field, subscriber)) = root
        .get_field(field_name)
        .and_then(|field| Some((field, field.subscriber.as_ref()?)))
    else {
        return Err(Response::from(
            GraphqlError::new(format!("Subscription field \"{field_name}\" has no subscribe function."))
                .with_locations(locations),
        ));
    };

    let path = QueryPath::empty().child(response_key);
    let arguments = coerce_argument_values(field, node, &ctx.variables);
    let info = ResolveInfo {
        field_name,
        field_nodes: &nodes,
        return_type: field.ty(),
        parent_type: root.name(),
        path: &path,
        schema,
        operation: &operation.node,
        root_value: ctx.root_value,
        variables: &ctx.variables,
    };
    let resolver_ctx = ResolverContext {
        parent_value: ctx.root_value,
        args: &arguments,
        info: &info,
        data: ctx.data,
    };

    tracing::debug!("Subscribing to `{field_name}`");

    match AssertUnwindSafe(async { subscriber(resolver_ctx).await }).catch_unwind().await {
        Ok(Ok(stream)) => Ok(stream),
        Ok(Err(error)) => Err(Response::from(error.into_graphql_error(locations, path))),
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            tracing::warn!("Subscribe function of `{field_name}` panicked: {message}");
            Err(Response::from(
                GraphqlError::new(format!("Resolver panicked: {message}"))
                    .with_locations(locations)
                    .with_path(path),
            ))
        }
    }
}
