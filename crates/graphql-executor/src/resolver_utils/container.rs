use super::{field::resolve_field, CollectedFields};
use crate::{context::ExecutionContext, error::GraphqlResult, path::QueryPath, registry::Object, value::Value};

/// Resolve the collected fields of a selection set against `object`.
///
/// With `parallel` the fields are resolved concurrently, otherwise one after
/// the other, each field completing before the next one starts and an error
/// propagating out of a field stopping the rest. Either way the response keys
/// keep their collection order.
pub(crate) async fn resolve_container<'a>(
    ctx: &'a ExecutionContext<'a>,
    object: &'a Object,
    parent_value: &'a Value,
    fields: CollectedFields<'a>,
    path: &QueryPath,
    parallel: bool,
) -> GraphqlResult<serde_json::Value> {
    tracing::trace!("Where: {}", object.name());

    let futures = fields
        .iter()
        .map(|(response_key, nodes)| async move {
            let result = resolve_field(ctx, object, parent_value, nodes, path.child(*response_key)).await;
            (*response_key, result)
        })
        .collect::<Vec<_>>();

    let mut map = serde_json::Map::with_capacity(futures.len());

    if parallel {
        for (response_key, result) in futures_util::future::join_all(futures).await {
            if let Some(result) = result {
                map.insert(response_key.to_string(), result?);
            }
        }
    } else {
        for future in futures {
            let (response_key, result) = future.await;
            if let Some(result) = result {
                map.insert(response_key.to_string(), result?);
            }
        }
    }

    Ok(serde_json::Value::Object(map))
}
