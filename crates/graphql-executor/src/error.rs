use std::{
    any::Any,
    fmt::{self, Debug, Display, Formatter},
    sync::Arc,
};

use async_graphql_parser::Pos;
use indexmap::IndexMap;
use serde::Serialize;

use crate::path::QueryPath;

pub type ErrorExtensions = IndexMap<String, serde_json::Value>;

pub type FieldResult<T> = Result<T, Error>;

pub type GraphqlResult<T> = Result<T, GraphqlError>;

/// An error returned by a resolver.
///
/// Any type implementing `Display` converts into it, so `?` works on whatever
/// error a resolver runs into. The converted value is kept as `source`.
#[derive(Clone)]
pub struct Error {
    pub message: String,
    pub source: Option<Arc<dyn Any + Send + Sync>>,
    pub extensions: Option<ErrorExtensions>,
}

impl Error {
    pub fn new(message: impl Into<String>) -> Self {
        Error {
            message: message.into(),
            source: None,
            extensions: None,
        }
    }

    #[must_use]
    pub fn extend_with(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.extensions
            .get_or_insert_with(Default::default)
            .insert(key.into(), value.into());
        self
    }

    /// Attach the position of the failing field.
    ///
    /// An error that was raised from a [`GraphqlError`] keeps its message and
    /// extensions and only fills in what it is missing.
    pub(crate) fn into_graphql_error(self, locations: Vec<Location>, path: QueryPath) -> GraphqlError {
        if let Some(error) = self
            .source
            .as_ref()
            .and_then(|source| source.downcast_ref::<GraphqlError>())
        {
            let mut error = error.clone();
            if error.locations.is_empty() {
                error.locations = locations;
            }
            if error.path.is_none() {
                error.path = Some(path);
            }
            return error;
        }

        GraphqlError {
            message: self.message,
            locations,
            path: Some(path),
            extensions: self.extensions,
            source: self.source,
        }
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("message", &self.message)
            .field("extensions", &self.extensions)
            .finish_non_exhaustive()
    }
}

impl<T: Display + Send + Sync + 'static> From<T> for Error {
    fn from(error: T) -> Self {
        Error {
            message: error.to_string(),
            source: Some(Arc::new(error)),
            extensions: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl From<Pos> for Location {
    fn from(pos: Pos) -> Self {
        Location {
            line: pos.line,
            column: pos.column,
        }
    }
}

/// An error as it appears in the `errors` list of a response.
#[derive(Clone, Serialize)]
pub struct GraphqlError {
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<QueryPath>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<ErrorExtensions>,
    /// The value this error was converted from, if any.
    #[serde(skip)]
    pub source: Option<Arc<dyn Any + Send + Sync>>,
}

impl GraphqlError {
    pub fn new(message: impl Into<String>) -> Self {
        GraphqlError {
            message: message.into(),
            locations: Vec::new(),
            path: None,
            extensions: None,
            source: None,
        }
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<Location>) -> Self {
        self.locations.push(location.into());
        self
    }

    #[must_use]
    pub fn with_locations<I>(mut self, locations: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Location>,
    {
        self.locations.extend(locations.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: QueryPath) -> Self {
        self.path = Some(path);
        self
    }

    #[must_use]
    pub fn with_extension(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.extensions
            .get_or_insert_with(Default::default)
            .insert(key.into(), value.into());
        self
    }

    /// Downcast the original error, if this one wraps a value of type `T`.
    pub fn source<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.source.as_ref().and_then(|source| source.downcast_ref::<T>())
    }
}

impl Debug for GraphqlError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphqlError")
            .field("message", &self.message)
            .field("locations", &self.locations)
            .field("path", &self.path)
            .field("extensions", &self.extensions)
            .finish_non_exhaustive()
    }
}

impl PartialEq for GraphqlError {
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message
            && self.locations == other.locations
            && self.path == other.path
            && self.extensions == other.extensions
    }
}

impl Display for GraphqlError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for GraphqlError {}

/// Problems found while assembling a [`Schema`](crate::Schema).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("Type \"{0}\" is defined more than once.")]
    DuplicateType(String),
    #[error("Type \"{name}\" referenced by \"{referenced_by}\" is not registered.")]
    UnknownType { name: String, referenced_by: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Denied;

    impl Display for Denied {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            f.write_str("denied")
        }
    }

    #[test]
    fn foreign_errors_keep_their_source() {
        let error = Error::from(Denied).into_graphql_error(Vec::new(), QueryPath::empty().child("secret"));

        assert_eq!(error.message, "denied");
        assert!(error.source::<Denied>().is_some());
        assert_eq!(error.path, Some(QueryPath::empty().child("secret")));
    }

    #[test]
    fn structured_errors_are_not_wrapped_twice() {
        let inner = GraphqlError::new("forbidden").with_extension("code", "FORBIDDEN");
        let error = Error::from(inner).into_graphql_error(
            vec![Location { line: 1, column: 3 }],
            QueryPath::empty().child("secret"),
        );

        insta::assert_json_snapshot!(error, @r###"
        {
          "message": "forbidden",
          "locations": [
            {
              "line": 1,
              "column": 3
            }
          ],
          "path": [
            "secret"
          ],
          "extensions": {
            "code": "FORBIDDEN"
          }
        }
        "###);
    }
}
