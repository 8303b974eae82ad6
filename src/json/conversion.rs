use crate::value::{Extensions, Value};
use serde::{Serialize, Serializer};
use serde_json::{Map as JSMap, Number, Value as JSValue};

/// Trait for converting composer values to [serde_json::Value]s.
pub trait ValueToJson {
    fn to_json(&self) -> JSValue;
}

impl ValueToJson for Value {
    /// Enum values become strings. Floats that JSON can't represent become `null`.
    fn to_json(&self) -> JSValue {
        match self {
            Value::Null => JSValue::Null,
            Value::Int(value) => (*value).into(),
            Value::Float(value) => Number::from_f64(*value)
                .map(JSValue::Number)
                .unwrap_or(JSValue::Null),
            Value::String(value) | Value::Enum(value) => value.as_str().into(),
            Value::Boolean(value) => (*value).into(),
            Value::List(values) => values
                .iter()
                .map(ValueToJson::to_json)
                .collect::<Vec<JSValue>>()
                .into(),
            Value::Object(fields) => fields.to_json(),
        }
    }
}

impl ValueToJson for Extensions {
    #[inline]
    fn to_json(&self) -> JSValue {
        self.iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect::<JSMap<String, JSValue>>()
            .into()
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Int(value) => serializer.serialize_i64(*value),
            Value::Float(value) => serializer.serialize_f64(*value),
            Value::String(value) | Value::Enum(value) => serializer.serialize_str(value),
            Value::Boolean(value) => serializer.serialize_bool(*value),
            Value::List(values) => serializer.collect_seq(values),
            Value::Object(fields) => serializer.collect_map(fields),
        }
    }
}
