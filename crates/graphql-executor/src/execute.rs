use async_graphql_parser::{
    types::{DocumentOperations, ExecutableDocument, OperationDefinition, OperationType},
    Positioned,
};

use crate::{
    context::ExecutionContext,
    error::GraphqlError,
    path::QueryPath,
    request::Request,
    resolver_utils::{collect_fields, resolve_container},
    response::Response,
    schema::Schema,
};

/// Pick the operation to run.
///
/// A name selects the named operation. Without a name the document must hold
/// exactly one operation.
pub(crate) fn get_operation<'a>(
    document: &'a ExecutableDocument,
    operation_name: Option<&str>,
) -> Result<&'a Positioned<OperationDefinition>, GraphqlError> {
    match (operation_name, &document.operations) {
        (Some(name), DocumentOperations::Multiple(operations)) => operations
            .get(name)
            .ok_or_else(|| GraphqlError::new(format!("Unknown operation named \"{name}\"."))),
        (Some(name), DocumentOperations::Single(_)) => {
            Err(GraphqlError::new(format!("Unknown operation named \"{name}\".")))
        }
        (None, DocumentOperations::Single(operation)) => Ok(operation),
        (None, DocumentOperations::Multiple(operations)) => {
            let mut operations = operations.values();
            match (operations.next(), operations.next()) {
                (Some(operation), None) => Ok(operation),
                _ => Err(GraphqlError::new(
                    "Must provide operation name if query contains multiple operations.",
                )),
            }
        }
    }
}

pub(crate) fn operation_kind(ty: OperationType) -> &'static str {
    match ty {
        OperationType::Query => "query",
        OperationType::Mutation => "mutation",
        OperationType::Subscription => "subscription",
    }
}

pub(crate) fn missing_root_error(operation: &Positioned<OperationDefinition>) -> GraphqlError {
    GraphqlError::new(format!(
        "Schema is not configured to execute {} operation.",
        operation_kind(operation.node.ty)
    ))
    .with_location(operation.pos)
}

/// Execute the request's operation.
///
/// Mutation root fields run one after the other, everything else
/// concurrently. A subscription operation is executed like a query, which is
/// how a single subscription event is mapped to a response.
pub(crate) async fn execute(schema: &Schema, request: Request) -> Response {
    let operation = match get_operation(&request.document, request.operation_name.as_deref()) {
        Ok(operation) => operation,
        Err(error) => {
            tracing::debug!("Operation selection failed: {error}");
            return Response::from(error);
        }
    };

    let Some(root) = schema.root_type(operation.node.ty) else {
        tracing::debug!("No root type for {} operations", operation_kind(operation.node.ty));
        return Response::from(missing_root_error(operation));
    };

    let ctx = ExecutionContext::new(schema, &request, &operation.node);
    let fields = collect_fields(ctx.document, &operation.node.selection_set);
    let parallel = operation.node.ty != OperationType::Mutation;

    let result = resolve_container(&ctx, root, ctx.root_value, fields, &QueryPath::empty(), parallel).await;
    let mut errors = ctx.into_errors();

    match result {
        Ok(data) => Response::new(data).with_errors(errors),
        Err(error) => {
            tracing::debug!("Root field failed, no data: {error}");
            errors.push(error);
            Response::from_errors(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use async_graphql_parser::parse_query;

    use super::*;

    fn selected(query: &str, name: Option<&str>) -> Result<String, String> {
        let document = parse_query(query).unwrap();
        get_operation(&document, name)
            .map(|operation| operation.node.selection_set.node.items.len().to_string())
            .map_err(|error| error.message)
    }

    #[test]
    fn operation_selection() {
        assert_eq!(selected("{ a }", None), Ok("1".to_string()));
        assert_eq!(selected("query A { a } query B { a b }", Some("B")), Ok("2".to_string()));
        assert_eq!(selected("query A { a b }", None), Ok("2".to_string()));
        assert_eq!(
            selected("query A { a } query B { a b }", None),
            Err("Must provide operation name if query contains multiple operations.".to_string())
        );
        assert_eq!(
            selected("query A { a }", Some("C")),
            Err("Unknown operation named \"C\".".to_string())
        );
        assert_eq!(
            selected("{ a }", Some("A")),
            Err("Unknown operation named \"A\".".to_string())
        );
    }
}
