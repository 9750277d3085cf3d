use serde::Serialize;

use crate::error::GraphqlError;

/// Result of executing an operation.
///
/// `data` is absent when execution could not start or when a non-null root
/// field failed, and `null` inside it marks fields whose errors were caught.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphqlError>,
}

impl Response {
    pub fn new(data: serde_json::Value) -> Self {
        Response {
            data: Some(data),
            errors: Vec::new(),
        }
    }

    pub fn from_errors(errors: Vec<GraphqlError>) -> Self {
        Response { data: None, errors }
    }

    #[must_use]
    pub fn with_errors(mut self, errors: Vec<GraphqlError>) -> Self {
        self.errors.extend(errors);
        self
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_err(&self) -> bool {
        !self.is_ok()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

impl From<GraphqlError> for Response {
    fn from(error: GraphqlError) -> Self {
        Response::from_errors(vec![error])
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn absent_parts_are_not_serialized() {
        assert_eq!(Response::new(json!({"a": 1})).to_json(), json!({"data": {"a": 1}}));
        assert_eq!(
            Response::from(GraphqlError::new("boom")).to_json(),
            json!({"errors": [{"message": "boom"}]})
        );
        assert_eq!(Response::new(serde_json::Value::Null).to_json(), json!({"data": null}));
    }
}
