use std::borrow::Cow;

use crate::request::InconsistencyError;

/// Result type returned by decoding operations.
pub type Result<T, E = DecodeError> = core::result::Result<T, E>;

/// Errors that can occur while decoding a request from a document.
///
/// Decoding stops at the first error, so each error describes exactly one field or rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// A required field is absent from the document.
    #[error("missing required field `{field}`")]
    MissingField {
        /// Path of the missing field, e.g. `addedCosignatories[1].address`.
        field: String,
    },

    /// A field is present but cannot be read as the expected type.
    ///
    /// This covers wrong shapes, bad address checksums, addresses of another network,
    /// wrong hash lengths and out of range numbers.
    #[error("malformed field `{field}`: expected {expected}, {reason}")]
    MalformedField {
        /// Path of the malformed field.
        field: String,
        /// Human-readable name of the expected type.
        expected: &'static str,
        /// Why the value was rejected. Never contains the rejected value itself.
        reason: Cow<'static, str>,
    },

    /// Every field decoded but the fields contradict each other.
    #[error("inconsistent request: {0}")]
    SemanticInconsistency(#[from] InconsistencyError),

    /// The input is not a well-formed document, or binary input continues past the last
    /// field.
    #[error("malformed document: {0}")]
    MalformedDocument(Cow<'static, str>),
}

impl DecodeError {
    /// Creates a [`DecodeError::MissingField`] error.
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField { field: field.into() }
    }

    /// Creates a [`DecodeError::MalformedField`] error.
    pub fn malformed<R>(field: impl Into<String>, expected: &'static str, reason: R) -> Self
    where
        Cow<'static, str>: From<R>,
    {
        Self::MalformedField { field: field.into(), expected, reason: reason.into() }
    }

    pub(crate) fn document<R>(reason: R) -> Self
    where
        Cow<'static, str>: From<R>,
    {
        Self::MalformedDocument(reason.into())
    }

    /// Returns the path of the offending field, if the error concerns a single field.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingField { field } | Self::MalformedField { field, .. } => {
                Some(field.as_str())
            },
            Self::SemanticInconsistency(_) | Self::MalformedDocument(_) => None,
        }
    }

    /// Prefixes the field path with the object field it was read from.
    pub(crate) fn within(self, parent: &str) -> Self {
        self.map_field(|field| format!("{parent}.{field}"))
    }

    /// Prefixes the field path with the array element it was read from.
    pub(crate) fn within_element(self, parent: &str, index: usize) -> Self {
        self.map_field(|field| format!("{}.{field}", element_path(parent, index)))
    }

    fn map_field<F>(self, f: F) -> Self
    where
        F: FnOnce(String) -> String,
    {
        match self {
            Self::MissingField { field } => Self::MissingField { field: f(field) },
            Self::MalformedField { field, expected, reason } => {
                Self::MalformedField { field: f(field), expected, reason }
            },
            other => other,
        }
    }
}

pub(crate) fn element_path(parent: &str, index: usize) -> String {
    format!("{parent}[{index}]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_paths_are_prefixed() {
        let error = DecodeError::missing("address").within_element("addedCosignatories", 2);
        assert_eq!(error.field(), Some("addedCosignatories[2].address"));

        let error = DecodeError::malformed("data", "32 byte hash", "got 31 bytes").within("innerHash");
        assert_eq!(error.field(), Some("innerHash.data"));
        assert_eq!(
            error.to_string(),
            "malformed field `innerHash.data`: expected 32 byte hash, got 31 bytes"
        );
    }

    #[test]
    fn document_errors_have_no_field() {
        let error = DecodeError::document("expected a JSON object, found array").within("outer");

        assert_eq!(error.field(), None);
        assert_eq!(error.to_string(), "malformed document: expected a JSON object, found array");
    }
}
