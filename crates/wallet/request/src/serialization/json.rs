use serde_json::{Map, Number, Value};

use super::{DecodeError, DeserializationContext, Deserializer, Result, Serializer};
use crate::serialization::error::element_path;

/// Reads fields from a JSON object.
///
/// Fields are looked up by label and removed as they are read. `null` counts as absent.
/// Byte arrays travel as hex strings.
#[derive(Debug, Clone)]
pub struct JsonDeserializer {
    object: Map<String, Value>,
    context: DeserializationContext,
}

impl JsonDeserializer {
    /// Creates a deserializer over an already parsed JSON object.
    pub fn new(object: Map<String, Value>, context: DeserializationContext) -> Self {
        Self { object, context }
    }

    /// Creates a deserializer over a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::MalformedDocument`] if the value is not an object.
    pub fn from_value(value: Value, context: DeserializationContext) -> Result<Self> {
        match value {
            Value::Object(object) => Ok(Self::new(object, context)),
            other => Err(DecodeError::document(format!(
                "expected a JSON object, found {}",
                kind(&other)
            ))),
        }
    }

    /// Parses `bytes` as a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::MalformedDocument`] if the input is not valid JSON or not an
    /// object.
    pub fn from_slice(bytes: &[u8], context: DeserializationContext) -> Result<Self> {
        let value = serde_json::from_slice(bytes)
            .map_err(|e| DecodeError::document(format!("invalid JSON: {e}")))?;
        Self::from_value(value, context)
    }

    fn take(&mut self, label: &str) -> Option<Value> {
        self.object.remove(label).filter(|value| !value.is_null())
    }

    fn nested(&self, object: Map<String, Value>) -> Self {
        Self::new(object, self.context)
    }
}

impl Deserializer for JsonDeserializer {
    fn context(&self) -> &DeserializationContext {
        &self.context
    }

    fn read_optional_int(&mut self, label: &str) -> Result<Option<i32>> {
        const EXPECTED: &str = "32-bit integer";

        let Some(value) = self.take(label) else {
            return Ok(None);
        };
        let number = value.as_i64().ok_or_else(|| {
            DecodeError::malformed(label, EXPECTED, format!("found {}", kind(&value)))
        })?;
        i32::try_from(number)
            .map(Some)
            .map_err(|_| DecodeError::malformed(label, EXPECTED, "value out of range"))
    }

    fn read_optional_u64(&mut self, label: &str) -> Result<Option<u64>> {
        const EXPECTED: &str = "non-negative integer";

        let Some(value) = self.take(label) else {
            return Ok(None);
        };
        match value.as_u64() {
            Some(number) => Ok(Some(number)),
            None if value.as_i64().is_some() => {
                Err(DecodeError::malformed(label, EXPECTED, "value is negative"))
            },
            None => Err(DecodeError::malformed(label, EXPECTED, format!("found {}", kind(&value)))),
        }
    }

    fn read_optional_string(&mut self, label: &str) -> Result<Option<String>> {
        match self.take(label) {
            None => Ok(None),
            Some(Value::String(text)) => Ok(Some(text)),
            Some(other) => {
                Err(DecodeError::malformed(label, "string", format!("found {}", kind(&other))))
            },
        }
    }

    fn read_optional_bytes(&mut self, label: &str) -> Result<Option<Vec<u8>>> {
        const EXPECTED: &str = "hex string";

        match self.take(label) {
            None => Ok(None),
            Some(Value::String(text)) => const_hex::decode(text)
                .map(Some)
                .map_err(|e| DecodeError::malformed(label, EXPECTED, e.to_string())),
            Some(other) => {
                Err(DecodeError::malformed(label, EXPECTED, format!("found {}", kind(&other))))
            },
        }
    }

    fn read_optional_object<T, F>(&mut self, label: &str, read: F) -> Result<Option<T>>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        match self.take(label) {
            None => Ok(None),
            Some(Value::Object(object)) => {
                let mut nested = self.nested(object);
                read(&mut nested).map(Some).map_err(|e| e.within(label))
            },
            Some(other) => {
                Err(DecodeError::malformed(label, "object", format!("found {}", kind(&other))))
            },
        }
    }

    fn read_optional_object_array<T, F>(&mut self, label: &str, mut read: F) -> Result<Option<Vec<T>>>
    where
        F: FnMut(&mut Self) -> Result<T>,
    {
        let elements = match self.take(label) {
            None => return Ok(None),
            Some(Value::Array(elements)) => elements,
            Some(other) => {
                return Err(DecodeError::malformed(
                    label,
                    "array of objects",
                    format!("found {}", kind(&other)),
                ));
            },
        };

        let mut items = Vec::with_capacity(elements.len());
        for (index, element) in elements.into_iter().enumerate() {
            let object = match element {
                Value::Object(object) => object,
                other => {
                    return Err(DecodeError::malformed(
                        element_path(label, index),
                        "object",
                        format!("found {}", kind(&other)),
                    ));
                },
            };
            let mut nested = self.nested(object);
            items.push(read(&mut nested).map_err(|e| e.within_element(label, index))?);
        }

        Ok(Some(items))
    }
}

/// Writes fields into a JSON object.
///
/// Absent optional fields are omitted. Byte arrays are written as lowercase hex strings.
#[derive(Debug, Clone, Default)]
pub struct JsonSerializer {
    object: Map<String, Value>,
}

impl JsonSerializer {
    /// Creates an empty serializer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the written object.
    pub fn into_object(self) -> Map<String, Value> {
        self.object
    }

    /// Returns the written object as a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.object)
    }

    fn insert(&mut self, label: &str, value: Value) {
        self.object.insert(label.to_owned(), value);
    }
}

impl Serializer for JsonSerializer {
    fn write_int(&mut self, label: &str, value: i32) {
        self.insert(label, Value::Number(Number::from(value)));
    }

    fn write_u64(&mut self, label: &str, value: u64) {
        self.insert(label, Value::Number(Number::from(value)));
    }

    fn write_string(&mut self, label: &str, value: &str) {
        self.insert(label, Value::String(value.to_owned()));
    }

    fn write_bytes(&mut self, label: &str, value: &[u8]) {
        self.insert(label, Value::String(const_hex::encode(value)));
    }

    fn write_object<F>(&mut self, label: &str, write: F)
    where
        F: FnOnce(&mut Self),
    {
        let mut nested = Self::new();
        write(&mut nested);
        self.insert(label, nested.into_value());
    }

    fn write_object_array<T, F>(&mut self, label: &str, items: &[T], mut write: F)
    where
        F: FnMut(&mut Self, &T),
    {
        let elements = items
            .iter()
            .map(|item| {
                let mut nested = Self::new();
                write(&mut nested, item);
                nested.into_value()
            })
            .collect();
        self.insert(label, Value::Array(elements));
    }

    fn write_absent(&mut self, _label: &str) {}
}

/// Names the JSON type of `value` for error messages without echoing the value.
fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(number) if number.is_f64() => "floating point number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn deserializer(value: Value) -> JsonDeserializer {
        JsonDeserializer::from_value(value, DeserializationContext::default()).unwrap()
    }

    #[test]
    fn null_is_absent() {
        let mut document = deserializer(json!({ "issuer": null }));

        assert_eq!(document.read_optional_string("issuer").unwrap(), None);
        assert_eq!(document.read_string("issuer").unwrap_err(), DecodeError::missing("issuer"));
    }

    #[test]
    fn integers_are_range_checked() {
        let mut document = deserializer(json!({
            "big": 2_147_483_648_i64,
            "text": "12",
            "fraction": 1.5,
        }));

        let error = document.read_int("big").unwrap_err();
        assert_eq!(
            error.to_string(),
            "malformed field `big`: expected 32-bit integer, value out of range"
        );

        let error = document.read_int("text").unwrap_err();
        assert_eq!(error.to_string(), "malformed field `text`: expected 32-bit integer, found string");

        let error = document.read_int("fraction").unwrap_err();
        assert_eq!(error.field(), Some("fraction"));
    }

    #[test]
    fn negative_u64_is_malformed() {
        let mut document = deserializer(json!({ "fee": -1 }));

        let error = document.read_u64("fee").unwrap_err();

        assert_eq!(
            error.to_string(),
            "malformed field `fee`: expected non-negative integer, value is negative"
        );
    }

    #[test]
    fn reading_consumes_the_field() {
        let mut document = deserializer(json!({ "wallet": "savings" }));

        assert_eq!(document.read_string("wallet").unwrap(), "savings");
        assert_eq!(document.read_optional_string("wallet").unwrap(), None);
    }

    #[test]
    fn non_object_documents_are_rejected() {
        let error = JsonDeserializer::from_value(json!([1, 2]), DeserializationContext::default())
            .unwrap_err();
        assert_eq!(error.to_string(), "malformed document: expected a JSON object, found array");

        let error =
            JsonDeserializer::from_slice(b"{ not json", DeserializationContext::default()).unwrap_err();
        assert!(matches!(error, DecodeError::MalformedDocument(_)));
    }

    #[test]
    fn array_elements_must_be_objects() {
        let mut document = deserializer(json!({ "addedCosignatories": [{}, "TB..."] }));

        let error = document
            .read_object_array("addedCosignatories", |element| {
                element.read_optional_string("address")
            })
            .unwrap_err();

        assert_eq!(error.field(), Some("addedCosignatories[1]"));
    }

    #[test]
    fn serializer_nests_objects_and_omits_absent_fields() {
        let mut serializer = JsonSerializer::new();
        serializer.write_int("type", 3);
        serializer.write_absent("issuer");
        serializer.write_object("innerHash", |object| object.write_bytes("data", &[0xab, 0x01]));
        serializer.write_object_array("removedCosignatories", &["a", "b"], |element, item| {
            element.write_string("address", item);
        });

        assert_eq!(
            serializer.into_value(),
            json!({
                "type": 3,
                "innerHash": { "data": "ab01" },
                "removedCosignatories": [{ "address": "a" }, { "address": "b" }],
            })
        );
    }
}
