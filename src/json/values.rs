use crate::composer::{NamedType, SchemaComposer, TypeRef};
use crate::error::{Error, Result};
use crate::value::{Extensions, Value};
use indexmap::IndexMap;
use serde_json::{Number, Value as JSValue};

fn json_kind(value: &JSValue) -> &'static str {
    match value {
        JSValue::Null => "null",
        JSValue::Bool(_) => "a boolean",
        JSValue::Number(_) => "a number",
        JSValue::String(_) => "a string",
        JSValue::Array(_) => "a list",
        JSValue::Object(_) => "an object",
    }
}

fn mismatch(value: &JSValue, type_name: &str) -> Error {
    Error::invalid(format!(
        "Received {} for type `{}`.",
        json_kind(value),
        type_name
    ))
}

/// Convert a [serde_json::Value] to a [Value] given an input type of a composer.
///
/// Single values are wrapped for list types, input object fields fall back to their default
/// values, and enum values are checked against the enum's definition. Values of custom scalars
/// are converted without casting.
pub fn value_from_json(
    composer: &SchemaComposer,
    value: &JSValue,
    of_type: &TypeRef,
) -> Result<Value> {
    match (of_type, value) {
        (TypeRef::Deferred(deferred), value) => {
            value_from_json(composer, value, &deferred.resolve(composer)?)
        }

        (TypeRef::NonNull(_), JSValue::Null) => Err(Error::invalid(
            "Received null for non-nullable type",
        )),

        (_, JSValue::Null) => Ok(Value::Null),

        (TypeRef::NonNull(inner), value) => value_from_json(composer, value, inner.of_type()),

        (TypeRef::List(inner), JSValue::Array(list)) => list
            .iter()
            .map(|value| value_from_json(composer, value, inner.of_type()))
            .collect::<Result<Vec<Value>>>()
            .map(Value::List),

        (TypeRef::List(inner), value) => Ok(Value::List(vec![value_from_json(
            composer,
            value,
            inner.of_type(),
        )?])),

        (TypeRef::Named(id), value) => {
            named_from_json(composer, composer.registry().node(*id)?, value)
        }
    }
}

fn named_from_json(composer: &SchemaComposer, node: &NamedType, value: &JSValue) -> Result<Value> {
    match (node, value) {
        (NamedType::Scalar(scalar), value) => scalar_from_json(scalar.name(), value),

        (NamedType::Enum(enum_type), JSValue::String(name)) => {
            if enum_type.has_value(name) {
                Ok(Value::Enum(name.clone()))
            } else {
                Err(Error::invalid(format!(
                    "Value `{}` does not exist on enum `{}`.",
                    name,
                    enum_type.name()
                )))
            }
        }

        (NamedType::InputObject(input), JSValue::Object(object)) => {
            if let Some(unknown) = object.keys().find(|name| !input.has_field(name)) {
                return Err(Error::invalid(format!(
                    "Field `{}` does not exist on input type `{}`.",
                    unknown,
                    input.name()
                )));
            }
            let mut fields = IndexMap::with_capacity(input.fields().len());
            for (name, field) in input.fields().iter() {
                match (object.get(name), &field.default_value) {
                    (Some(value), _) => {
                        fields.insert(name.clone(), value_from_json(composer, value, &field.ty)?);
                    }
                    (None, Some(default_value)) => {
                        fields.insert(name.clone(), default_value.clone());
                    }
                    (None, None) if field.ty.is_non_null() => {
                        return Err(Error::invalid(format!(
                            "Missing required field `{}` of input type `{}`.",
                            name,
                            input.name()
                        )))
                    }
                    (None, None) => {}
                }
            }
            Ok(Value::Object(fields))
        }

        (node, value) if node.is_input_type() => Err(mismatch(value, node.name())),

        (node, _) => Err(Error::invalid(format!(
            "Type `{}` is {} and can't receive input values.",
            node.name(),
            node.kind()
        ))),
    }
}

fn scalar_from_json(name: &str, value: &JSValue) -> Result<Value> {
    match (name, value) {
        ("Boolean", JSValue::Bool(x)) => Ok(Value::Boolean(*x)),

        ("Boolean", JSValue::Number(num)) => Ok(Value::Boolean(num.as_u64().unwrap_or(0) != 0)),

        ("Int", JSValue::Number(num)) => num
            .as_i64()
            .map(Value::Int)
            .ok_or_else(|| Error::invalid("Received Float for Int type")),

        ("Float", JSValue::Number(num)) => match num.as_f64() {
            Some(float) if float.is_finite() => Ok(Value::Float(float)),
            _ => Err(Error::invalid("Received non-finite Float for Float type")),
        },

        ("ID" | "String", JSValue::String(str)) => Ok(Value::String(str.clone())),

        ("ID" | "String", JSValue::Number(num)) => Ok(Value::String(num.to_string())),

        ("Boolean" | "Int" | "Float" | "ID" | "String", value) => Err(mismatch(value, name)),

        (_, value) => Ok(value_from_json_untyped(value)),
    }
}

/// Convert a [serde_json::Value] to a [Value] without casting it to a type.
///
/// Strings always become string values since JSON can't tell them apart from enum values.
pub fn value_from_json_untyped(value: &JSValue) -> Value {
    match value {
        JSValue::Array(list) => Value::List(list.iter().map(value_from_json_untyped).collect()),
        JSValue::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| (key.clone(), value_from_json_untyped(value)))
                .collect(),
        ),
        JSValue::Number(num) => number_value(num),
        JSValue::Bool(x) => Value::Boolean(*x),
        JSValue::String(str) => Value::String(str.clone()),
        JSValue::Null => Value::Null,
    }
}

fn number_value(num: &Number) -> Value {
    num.as_i64().map(Value::Int).unwrap_or_else(|| {
        Value::Float(num.as_f64().filter(|x| x.is_finite()).unwrap_or(0.0))
    })
}

/// Convert a JSON object to an [Extensions] map.
pub fn extensions_from_json(value: &JSValue) -> Result<Extensions> {
    match value {
        JSValue::Object(map) => Ok(map
            .iter()
            .map(|(key, value)| (key.clone(), value_from_json_untyped(value)))
            .collect()),
        value => Err(Error::invalid(format!(
            "Extensions expected but received {}",
            json_kind(value)
        ))),
    }
}
