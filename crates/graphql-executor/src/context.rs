use std::sync::{Mutex, PoisonError};

use async_graphql_parser::types::{ExecutableDocument, OperationDefinition};

use crate::{
    data::Data,
    error::GraphqlError,
    request::Request,
    schema::Schema,
    value::{Value, Variables},
};

/// Per-request execution state, shared by every field of the operation.
///
/// Everything but the collected errors is read-only for the lifetime of the
/// request.
pub(crate) struct ExecutionContext<'a> {
    pub schema: &'a Schema,
    pub document: &'a ExecutableDocument,
    pub operation: &'a OperationDefinition,
    pub root_value: &'a Value,
    pub data: &'a Data,
    /// Request variables, with the operation's variable defaults filled in.
    pub variables: Variables,
    errors: Mutex<Vec<GraphqlError>>,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(schema: &'a Schema, request: &'a Request, operation: &'a OperationDefinition) -> Self {
        let mut variables = request.variables.clone();
        for definition in &operation.variable_definitions {
            let name = definition.node.name.node.as_str();
            if variables.contains_key(name) {
                continue;
            }
            if let Some(default) = &definition.node.default_value {
                variables.insert(name, Value::from(&default.node));
            }
        }

        ExecutionContext {
            schema,
            document: &request.document,
            operation,
            root_value: &request.root_value,
            data: &request.data,
            variables,
            errors: Mutex::new(Vec::new()),
        }
    }

    /// Record an error caught at a nullable position.
    pub fn add_error(&self, error: GraphqlError) {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(error);
    }

    pub fn into_errors(self) -> Vec<GraphqlError> {
        self.errors.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}
