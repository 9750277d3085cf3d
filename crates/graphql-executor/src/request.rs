use std::fmt::{self, Debug, Formatter};

use async_graphql_parser::{parse_query, types::ExecutableDocument};
use serde::Deserialize;

use crate::{
    data::Data,
    value::{Value, Variables},
};

/// An operation to execute against a [`Schema`](crate::Schema).
pub struct Request {
    pub document: ExecutableDocument,
    pub operation_name: Option<String>,
    pub variables: Variables,
    /// Source value of the root fields.
    pub root_value: Value,
    /// Per-request data handed to every resolver.
    pub data: Data,
}

impl Request {
    pub fn new(document: ExecutableDocument) -> Self {
        Request {
            document,
            operation_name: None,
            variables: Variables::default(),
            root_value: Value::Null,
            data: Data::default(),
        }
    }

    /// Parse `query` into a request.
    pub fn from_query(query: &str) -> Result<Self, async_graphql_parser::Error> {
        parse_query(query).map(Request::new)
    }

    #[must_use]
    pub fn operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn variables(mut self, variables: Variables) -> Self {
        self.variables = variables;
        self
    }

    #[must_use]
    pub fn root_value(mut self, root_value: impl Into<Value>) -> Self {
        self.root_value = root_value.into();
        self
    }

    #[must_use]
    pub fn data<D: std::any::Any + Send + Sync>(mut self, data: D) -> Self {
        self.data.insert(data);
        self
    }
}

impl From<ExecutableDocument> for Request {
    fn from(document: ExecutableDocument) -> Self {
        Request::new(document)
    }
}

impl Debug for Request {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("operation_name", &self.operation_name)
            .field("variables", &self.variables)
            .field("root_value", &self.root_value)
            .finish_non_exhaustive()
    }
}

/// A request in the usual JSON shape: `{"query", "operationName", "variables"}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRequest {
    pub query: String,
    #[serde(default)]
    pub operation_name: Option<String>,
    #[serde(default)]
    pub variables: Variables,
}

impl TryFrom<RawRequest> for Request {
    type Error = async_graphql_parser::Error;

    fn try_from(raw: RawRequest) -> Result<Self, Self::Error> {
        let mut request = Request::from_query(&raw.query)?.variables(raw.variables);
        request.operation_name = raw.operation_name;
        Ok(request)
    }
}
