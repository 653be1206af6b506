use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::{DecodeError, DeserializationContext, Deserializer, Result, Serializer};
use crate::serialization::error::element_path;

/// Length prefix marking an absent value.
const NULL_LENGTH: i32 = -1;

const I32_SIZE: usize = size_of::<i32>();
const U64_SIZE: usize = size_of::<u64>();

/// Reads fields from the positional binary format.
///
/// Fields are read in call order and labels only name fields in errors. Integers are
/// little endian. Strings, byte arrays and objects carry a 4 byte length prefix, where a
/// length of `-1` marks an absent value. Object arrays carry a 4 byte element count
/// followed by each element as a length-prefixed object.
///
/// Running out of input exactly at a field boundary means the field is absent. Input left
/// over after the last field is rejected by [`Deserializer::finish`], and input left over
/// inside an object payload is malformed.
#[derive(Debug, Clone)]
pub struct BinaryDeserializer {
    buffer: Bytes,
    context: DeserializationContext,
}

impl BinaryDeserializer {
    /// Creates a deserializer over `buffer`.
    pub fn new(buffer: impl Into<Bytes>, context: DeserializationContext) -> Self {
        Self { buffer: buffer.into(), context }
    }

    /// Returns the number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.buffer.remaining()
    }

    fn read_optional_i32(&mut self, label: &str, expected: &'static str) -> Result<Option<i32>> {
        if !self.buffer.has_remaining() {
            return Ok(None);
        }
        if self.buffer.remaining() < I32_SIZE {
            return Err(truncated(label, expected, I32_SIZE, self.buffer.remaining()));
        }
        Ok(Some(self.buffer.get_i32_le()))
    }

    /// Reads a length prefix. `None` means the value is absent.
    fn read_length(&mut self, label: &str, expected: &'static str) -> Result<Option<usize>> {
        match self.read_optional_i32(label, expected)? {
            None | Some(NULL_LENGTH) => Ok(None),
            Some(length) => usize::try_from(length).map(Some).map_err(|_| {
                DecodeError::malformed(label, expected, format!("invalid length prefix {length}"))
            }),
        }
    }

    fn read_length_prefixed(&mut self, label: &str, expected: &'static str) -> Result<Option<Bytes>> {
        let Some(length) = self.read_length(label, expected)? else {
            return Ok(None);
        };
        if self.buffer.remaining() < length {
            return Err(truncated(label, expected, length, self.buffer.remaining()));
        }
        Ok(Some(self.buffer.split_to(length)))
    }

    fn nested(&self, buffer: Bytes) -> Self {
        Self::new(buffer, self.context)
    }

    /// Rejects object payloads that hold more than their fields.
    fn ensure_object_consumed(&self, path: &str) -> Result<()> {
        match self.buffer.remaining() {
            0 => Ok(()),
            trailing => Err(DecodeError::malformed(
                path,
                "object",
                format!("{trailing} trailing bytes after the last field"),
            )),
        }
    }
}

impl Deserializer for BinaryDeserializer {
    fn context(&self) -> &DeserializationContext {
        &self.context
    }

    fn read_optional_int(&mut self, label: &str) -> Result<Option<i32>> {
        self.read_optional_i32(label, "32-bit integer")
    }

    fn read_optional_u64(&mut self, label: &str) -> Result<Option<u64>> {
        if !self.buffer.has_remaining() {
            return Ok(None);
        }
        if self.buffer.remaining() < U64_SIZE {
            return Err(truncated(
                label,
                "non-negative integer",
                U64_SIZE,
                self.buffer.remaining(),
            ));
        }
        Ok(Some(self.buffer.get_u64_le()))
    }

    fn read_optional_string(&mut self, label: &str) -> Result<Option<String>> {
        const EXPECTED: &str = "string";

        let Some(payload) = self.read_length_prefixed(label, EXPECTED)? else {
            return Ok(None);
        };
        String::from_utf8(payload.to_vec())
            .map(Some)
            .map_err(|_| DecodeError::malformed(label, EXPECTED, "invalid UTF-8"))
    }

    fn read_optional_bytes(&mut self, label: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.read_length_prefixed(label, "byte array")?.map(|payload| payload.to_vec()))
    }

    fn read_optional_object<T, F>(&mut self, label: &str, read: F) -> Result<Option<T>>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        let Some(payload) = self.read_length_prefixed(label, "object")? else {
            return Ok(None);
        };
        let mut nested = self.nested(payload);
        let value = read(&mut nested).map_err(|e| e.within(label))?;
        nested.ensure_object_consumed(label)?;
        Ok(Some(value))
    }

    fn read_optional_object_array<T, F>(&mut self, label: &str, mut read: F) -> Result<Option<Vec<T>>>
    where
        F: FnMut(&mut Self) -> Result<T>,
    {
        let Some(count) = self.read_length(label, "array of objects")? else {
            return Ok(None);
        };

        // The count is untrusted, so the vector grows as elements arrive.
        let mut items = Vec::new();
        for index in 0..count {
            let path = element_path(label, index);
            let payload = self
                .read_length_prefixed(&path, "object")?
                .ok_or_else(|| DecodeError::malformed(path.clone(), "object", "element is absent"))?;
            let mut nested = self.nested(payload);
            items.push(read(&mut nested).map_err(|e| e.within_element(label, index))?);
            nested.ensure_object_consumed(&path)?;
        }

        Ok(Some(items))
    }

    fn finish(&self) -> Result<()> {
        match self.buffer.remaining() {
            0 => Ok(()),
            trailing => Err(DecodeError::document(format!(
                "{trailing} trailing bytes after the last field"
            ))),
        }
    }
}

/// Writes fields in the positional binary format read by [`BinaryDeserializer`].
///
/// # Panics
///
/// Writing a string, byte array, object or array longer than `i32::MAX` panics, since the
/// format cannot represent its length.
#[derive(Debug, Clone, Default)]
pub struct BinarySerializer {
    buffer: BytesMut,
}

impl BinarySerializer {
    /// Creates an empty serializer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the written bytes.
    pub fn into_bytes(self) -> Bytes {
        self.buffer.freeze()
    }

    fn put_length(&mut self, length: usize) {
        let length = i32::try_from(length).expect("length prefix must fit in an i32");
        self.buffer.put_i32_le(length);
    }

    fn put_length_prefixed(&mut self, payload: &[u8]) {
        self.put_length(payload.len());
        self.buffer.put_slice(payload);
    }
}

impl Serializer for BinarySerializer {
    fn write_int(&mut self, _label: &str, value: i32) {
        self.buffer.put_i32_le(value);
    }

    fn write_u64(&mut self, _label: &str, value: u64) {
        self.buffer.put_u64_le(value);
    }

    fn write_string(&mut self, _label: &str, value: &str) {
        self.put_length_prefixed(value.as_bytes());
    }

    fn write_bytes(&mut self, _label: &str, value: &[u8]) {
        self.put_length_prefixed(value);
    }

    fn write_object<F>(&mut self, _label: &str, write: F)
    where
        F: FnOnce(&mut Self),
    {
        let mut nested = Self::new();
        write(&mut nested);
        self.put_length_prefixed(&nested.buffer);
    }

    fn write_object_array<T, F>(&mut self, _label: &str, items: &[T], mut write: F)
    where
        F: FnMut(&mut Self, &T),
    {
        self.put_length(items.len());
        for item in items {
            let mut nested = Self::new();
            write(&mut nested, item);
            self.put_length_prefixed(&nested.buffer);
        }
    }

    /// Writes the `-1` length marker. Only length-prefixed fields can be absent.
    fn write_absent(&mut self, _label: &str) {
        self.buffer.put_i32_le(NULL_LENGTH);
    }
}

fn truncated(label: &str, expected: &'static str, needed: usize, available: usize) -> DecodeError {
    DecodeError::malformed(
        label,
        expected,
        format!("needed {needed} bytes, only {available} remain"),
    )
}
