use super::{complete_value, handle_field_error, FieldContext};
use crate::{
    context::ExecutionContext,
    error::GraphqlResult,
    path::QueryPath,
    registry::TypeRef,
    value::Value,
};

/// Complete every item of a list concurrently, keeping the input order.
pub(super) async fn complete_list<'a>(
    ctx: &'a ExecutionContext<'a>,
    field: &'a FieldContext<'a>,
    item_type: &'a TypeRef,
    path: QueryPath,
    value: Value,
) -> GraphqlResult<serde_json::Value> {
    let Value::List(items) = value else {
        return Err(field.error(
            format!(
                "Expected a list, but did not find one for field \"{}\".",
                field.coordinate()
            ),
            path,
        ));
    };

    let futures = items.into_iter().enumerate().map(|(index, item)| {
        let item_path = path.child(index);
        async move {
            let result = complete_value(ctx, field, item_type, item_path, item).await;
            handle_field_error(ctx, item_type, result)
        }
    });

    let items = futures_util::future::join_all(futures)
        .await
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(serde_json::Value::Array(items))
}
