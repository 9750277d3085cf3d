use std::{
    fmt::{self, Debug, Formatter},
    sync::Arc,
};

use async_graphql_value::ConstValue;
use serde_json::Number;

use crate::{
    error::{Error, FieldResult},
    value::Value,
};

type SerializeFn = Arc<dyn Fn(&Value) -> FieldResult<serde_json::Value> + Send + Sync>;
type ParseValueFn = Arc<dyn Fn(&serde_json::Value) -> FieldResult<Value> + Send + Sync>;
type ParseLiteralFn = Arc<dyn Fn(&ConstValue) -> FieldResult<Value> + Send + Sync>;

/// A leaf type with its three coercion functions.
///
/// - `serialize`: internal value to response value
/// - `parse_value`: variable value (JSON) to internal value
/// - `parse_literal`: query literal to internal value
#[derive(Clone)]
pub struct Scalar {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    serialize: SerializeFn,
    parse_value: ParseValueFn,
    parse_literal: ParseLiteralFn,
}

impl Scalar {
    /// A custom scalar that passes values through unchanged until told
    /// otherwise.
    pub fn new(name: impl Into<String>) -> Self {
        Scalar {
            name: name.into(),
            description: None,
            serialize: Arc::new(|value| value.clone().into_json()),
            parse_value: Arc::new(|value| Ok(Value::from(value.clone()))),
            parse_literal: Arc::new(|value| Ok(Value::from(value))),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_serialize<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> FieldResult<serde_json::Value> + Send + Sync + 'static,
    {
        self.serialize = Arc::new(f);
        self
    }

    #[must_use]
    pub fn with_parse_value<F>(mut self, f: F) -> Self
    where
        F: Fn(&serde_json::Value) -> FieldResult<Value> + Send + Sync + 'static,
    {
        self.parse_value = Arc::new(f);
        self
    }

    #[must_use]
    pub fn with_parse_literal<F>(mut self, f: F) -> Self
    where
        F: Fn(&ConstValue) -> FieldResult<Value> + Send + Sync + 'static,
    {
        self.parse_literal = Arc::new(f);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn serialize(&self, value: &Value) -> FieldResult<serde_json::Value> {
        (self.serialize)(value)
    }

    pub fn parse_value(&self, value: &serde_json::Value) -> FieldResult<Value> {
        (self.parse_value)(value)
    }

    pub fn parse_literal(&self, value: &ConstValue) -> FieldResult<Value> {
        (self.parse_literal)(value)
    }

    pub fn is_builtin(name: &str) -> bool {
        matches!(name, "Int" | "Float" | "String" | "Boolean" | "ID")
    }

    pub(crate) fn builtins() -> [Scalar; 5] {
        [
            Scalar::int(),
            Scalar::float(),
            Scalar::string(),
            Scalar::boolean(),
            Scalar::id(),
        ]
    }

    /// 32-bit signed integer.
    pub fn int() -> Self {
        Scalar::new("Int")
            .description("The `Int` scalar type represents non-fractional signed whole numeric values.")
            .with_serialize(|value| {
                let int = match value {
                    Value::Boolean(b) => i64::from(*b),
                    Value::Number(n) => match n.as_i64() {
                        Some(int) => int,
                        None => match n.as_f64() {
                            Some(float) if float.fract() == 0.0 && float.abs() <= f64::from(i32::MAX) => float as i64,
                            _ => return Err(Error::new(format!("Int cannot represent non-integer value: {n}"))),
                        },
                    },
                    Value::String(s) => s
                        .parse::<i64>()
                        .map_err(|_| Error::new(format!("Int cannot represent non-integer value: {s:?}")))?,
                    other => return Err(Error::new(format!("Int cannot represent value: {other:?}"))),
                };
                checked_int(int).map(|int| serde_json::Value::Number(int.into()))
            })
            .with_parse_value(|value| match value {
                serde_json::Value::Number(n) => int_from_number(n),
                other => Err(Error::new(format!("Int cannot represent non-integer value: {other}"))),
            })
            .with_parse_literal(|value| match value {
                ConstValue::Number(n) => int_from_number(n),
                other => Err(Error::new(format!("Int cannot represent non-integer value: {other}"))),
            })
    }

    /// Double-precision floating point.
    pub fn float() -> Self {
        Scalar::new("Float")
            .description("The `Float` scalar type represents signed double-precision fractional values.")
            .with_serialize(|value| {
                let float = match value {
                    Value::Boolean(b) => {
                        if *b {
                            1.0
                        } else {
                            0.0
                        }
                    }
                    Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
                    Value::String(s) => s.parse::<f64>().unwrap_or(f64::NAN),
                    other => return Err(Error::new(format!("Float cannot represent value: {other:?}"))),
                };
                Number::from_f64(float)
                    .map(serde_json::Value::Number)
                    .ok_or_else(|| Error::new(format!("Float cannot represent non numeric value: {value:?}")))
            })
            .with_parse_value(|value| match value {
                serde_json::Value::Number(n) => Ok(Value::Number(n.clone())),
                other => Err(Error::new(format!("Float cannot represent non numeric value: {other}"))),
            })
            .with_parse_literal(|value| match value {
                ConstValue::Number(n) => Ok(Value::Number(n.clone())),
                other => Err(Error::new(format!("Float cannot represent non numeric value: {other}"))),
            })
    }

    pub fn string() -> Self {
        Scalar::new("String")
            .description("The `String` scalar type represents textual data, represented as UTF-8 character sequences.")
            .with_serialize(|value| match value {
                Value::String(s) => Ok(serde_json::Value::String(s.clone())),
                Value::Boolean(b) => Ok(serde_json::Value::String(b.to_string())),
                Value::Number(n) => Ok(serde_json::Value::String(n.to_string())),
                other => Err(Error::new(format!("String cannot represent value: {other:?}"))),
            })
            .with_parse_value(|value| match value {
                serde_json::Value::String(s) => Ok(Value::String(s.clone())),
                other => Err(Error::new(format!("String cannot represent a non string value: {other}"))),
            })
            .with_parse_literal(|value| match value {
                ConstValue::String(s) => Ok(Value::String(s.clone())),
                other => Err(Error::new(format!("String cannot represent a non string value: {other}"))),
            })
    }

    pub fn boolean() -> Self {
        Scalar::new("Boolean")
            .description("The `Boolean` scalar type represents `true` or `false`.")
            .with_serialize(|value| match value {
                Value::Boolean(b) => Ok(serde_json::Value::Bool(*b)),
                Value::Number(n) => Ok(serde_json::Value::Bool(n.as_f64().is_some_and(|n| n != 0.0))),
                other => Err(Error::new(format!("Boolean cannot represent a non boolean value: {other:?}"))),
            })
            .with_parse_value(|value| match value {
                serde_json::Value::Bool(b) => Ok(Value::Boolean(*b)),
                other => Err(Error::new(format!("Boolean cannot represent a non boolean value: {other}"))),
            })
            .with_parse_literal(|value| match value {
                ConstValue::Boolean(b) => Ok(Value::Boolean(*b)),
                other => Err(Error::new(format!("Boolean cannot represent a non boolean value: {other}"))),
            })
    }

    /// Serialized as a string; accepts strings and integers as input.
    pub fn id() -> Self {
        Scalar::new("ID")
            .description("The `ID` scalar type represents a unique identifier.")
            .with_serialize(|value| match value {
                Value::String(s) => Ok(serde_json::Value::String(s.clone())),
                Value::Number(n) if n.is_i64() || n.is_u64() => Ok(serde_json::Value::String(n.to_string())),
                other => Err(Error::new(format!("ID cannot represent value: {other:?}"))),
            })
            .with_parse_value(|value| match value {
                serde_json::Value::String(s) => Ok(Value::String(s.clone())),
                serde_json::Value::Number(n) if n.is_i64() || n.is_u64() => Ok(Value::String(n.to_string())),
                other => Err(Error::new(format!("ID cannot represent value: {other}"))),
            })
            .with_parse_literal(|value| match value {
                ConstValue::String(s) => Ok(Value::String(s.clone())),
                ConstValue::Number(n) if n.is_i64() || n.is_u64() => Ok(Value::String(n.to_string())),
                other => Err(Error::new(format!("ID cannot represent value: {other}"))),
            })
    }
}

impl Debug for Scalar {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scalar").field("name", &self.name).finish_non_exhaustive()
    }
}

fn checked_int(int: i64) -> FieldResult<i32> {
    i32::try_from(int).map_err(|_| Error::new(format!("Int cannot represent non 32-bit signed integer value: {int}")))
}

fn int_from_number(n: &Number) -> FieldResult<Value> {
    match n.as_i64() {
        Some(int) => checked_int(int).map(Value::from),
        None => Err(Error::new(format!("Int cannot represent non-integer value: {n}"))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn int_rejects_out_of_range_values() {
        let int = Scalar::int();

        assert_eq!(int.serialize(&Value::from(7)).unwrap(), json!(7));
        assert_eq!(int.serialize(&Value::from(3.0)).unwrap(), json!(3));
        assert_eq!(int.serialize(&Value::from(true)).unwrap(), json!(1));
        assert!(int.serialize(&Value::from(1.5)).is_err());
        assert!(int.serialize(&Value::from(i64::from(i32::MAX) + 1)).is_err());
        assert!(int.parse_value(&json!(2_147_483_648_i64)).is_err());
    }

    #[test]
    fn id_accepts_integers() {
        let id = Scalar::id();

        assert_eq!(id.serialize(&Value::from(12)).unwrap(), json!("12"));
        assert_eq!(id.parse_value(&json!(12)).unwrap(), Value::from("12"));
        assert_eq!(
            id.parse_literal(&ConstValue::Number(12.into())).unwrap(),
            Value::from("12")
        );
        assert!(id.parse_value(&json!(true)).is_err());
    }

    #[test]
    fn string_coerces_other_leaves_on_output_only() {
        let string = Scalar::string();

        assert_eq!(string.serialize(&Value::from(false)).unwrap(), json!("false"));
        assert!(string.parse_value(&json!(1)).is_err());
    }

    #[test]
    fn serialized_values_parse_back() {
        let cases = [
            (Scalar::int(), vec![Value::from(7), Value::from(-3), Value::from(i32::MAX)]),
            (Scalar::float(), vec![Value::from(2.5), Value::from(-0.25)]),
            (Scalar::string(), vec![Value::from(""), Value::from("héllo")]),
            (Scalar::boolean(), vec![Value::from(true), Value::from(false)]),
            (Scalar::id(), vec![Value::from("user:1")]),
            (
                Scalar::new("Json"),
                vec![Value::from(json!({"a": [1, "x", null], "b": {"c": true}})), Value::from(4)],
            ),
        ];

        for (scalar, values) in cases {
            for value in values {
                let serialized = scalar.serialize(&value).unwrap();
                let literal = ConstValue::from_json(serialized.clone()).unwrap();

                assert_eq!(scalar.parse_value(&serialized).unwrap(), value, "{}", scalar.name());
                assert_eq!(scalar.parse_literal(&literal).unwrap(), value, "{}", scalar.name());
            }
        }
    }
}
