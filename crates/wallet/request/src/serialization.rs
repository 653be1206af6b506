//! Field-keyed document access.
//!
//! Requests are decoded through the [`Deserializer`] trait and encoded through the
//! [`Serializer`] trait. Each wire format implements the primitive operations once:
//!
//! - [`JsonDeserializer`] / [`JsonSerializer`] read and write JSON objects, looking fields up
//!   by label.
//! - [`BinaryDeserializer`] / [`BinarySerializer`] read and write the positional binary
//!   format, where labels only name fields in error messages.
//!
//! The typed readers and writers for domain values (addresses, amounts, hashes, wallet
//! credentials) live in [`DeserializerExt`] and [`SerializerExt`] and work on top of any
//! format.

mod binary;
mod context;
mod error;
mod field;
mod json;

pub use self::{
    binary::{BinaryDeserializer, BinarySerializer},
    context::{DeserializationContext, RequestLimits},
    error::{DecodeError, Result},
    field::{DeserializerExt, SerializerExt},
    json::{JsonDeserializer, JsonSerializer},
};

/// Reads named fields from a document.
///
/// The `read_optional_*` operations return `Ok(None)` when the field is absent and an
/// error when it is present but unreadable. The provided `read_*` operations turn an
/// absent field into [`DecodeError::MissingField`].
pub trait Deserializer: Sized {
    /// Returns the context the document is read in.
    fn context(&self) -> &DeserializationContext;

    /// Reads a signed 32-bit integer.
    fn read_optional_int(&mut self, label: &str) -> Result<Option<i32>>;

    /// Reads an unsigned 64-bit integer.
    fn read_optional_u64(&mut self, label: &str) -> Result<Option<u64>>;

    /// Reads a UTF-8 string.
    fn read_optional_string(&mut self, label: &str) -> Result<Option<String>>;

    /// Reads a byte array.
    fn read_optional_bytes(&mut self, label: &str) -> Result<Option<Vec<u8>>>;

    /// Reads a nested object with `read`.
    ///
    /// Errors raised by `read` are reported with the field path prefixed by `label`.
    fn read_optional_object<T, F>(&mut self, label: &str, read: F) -> Result<Option<T>>
    where
        F: FnOnce(&mut Self) -> Result<T>;

    /// Reads an array of nested objects, calling `read` once per element in order.
    ///
    /// Reading stops at the first element that fails.
    fn read_optional_object_array<T, F>(&mut self, label: &str, read: F) -> Result<Option<Vec<T>>>
    where
        F: FnMut(&mut Self) -> Result<T>;

    /// Checks that nothing is left after the last field read.
    ///
    /// Positional formats reject trailing input. Keyed formats ignore fields that were
    /// never read, which is what the default does.
    fn finish(&self) -> Result<()> {
        Ok(())
    }

    /// Reads a required signed 32-bit integer.
    fn read_int(&mut self, label: &str) -> Result<i32> {
        self.read_optional_int(label)?.ok_or_else(|| DecodeError::missing(label))
    }

    /// Reads a required unsigned 64-bit integer.
    fn read_u64(&mut self, label: &str) -> Result<u64> {
        self.read_optional_u64(label)?.ok_or_else(|| DecodeError::missing(label))
    }

    /// Reads a required UTF-8 string.
    fn read_string(&mut self, label: &str) -> Result<String> {
        self.read_optional_string(label)?.ok_or_else(|| DecodeError::missing(label))
    }

    /// Reads a required byte array.
    fn read_bytes(&mut self, label: &str) -> Result<Vec<u8>> {
        self.read_optional_bytes(label)?.ok_or_else(|| DecodeError::missing(label))
    }

    /// Reads a required nested object.
    fn read_object<T, F>(&mut self, label: &str, read: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        self.read_optional_object(label, read)?.ok_or_else(|| DecodeError::missing(label))
    }

    /// Reads a required array of nested objects. An empty array is valid.
    fn read_object_array<T, F>(&mut self, label: &str, read: F) -> Result<Vec<T>>
    where
        F: FnMut(&mut Self) -> Result<T>,
    {
        self.read_optional_object_array(label, read)?.ok_or_else(|| DecodeError::missing(label))
    }
}

/// Writes named fields to a document.
///
/// Fields must be written in the order the matching decoder reads them; the binary
/// format depends on it.
pub trait Serializer: Sized {
    /// Writes a signed 32-bit integer.
    fn write_int(&mut self, label: &str, value: i32);

    /// Writes an unsigned 64-bit integer.
    fn write_u64(&mut self, label: &str, value: u64);

    /// Writes a UTF-8 string.
    fn write_string(&mut self, label: &str, value: &str);

    /// Writes a byte array.
    fn write_bytes(&mut self, label: &str, value: &[u8]);

    /// Writes a nested object produced by `write`.
    fn write_object<F>(&mut self, label: &str, write: F)
    where
        F: FnOnce(&mut Self);

    /// Writes an array of nested objects, calling `write` once per item.
    fn write_object_array<T, F>(&mut self, label: &str, items: &[T], write: F)
    where
        F: FnMut(&mut Self, &T);

    /// Marks an optional field as absent.
    fn write_absent(&mut self, label: &str);
}
