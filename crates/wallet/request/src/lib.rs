//! Decoding of multisig wallet requests.
//!
//! This crate turns untyped, field-keyed documents supplied by a transport layer into
//! validated [`request::MultisigModificationRequest`] and
//! [`request::MultisigSignatureRequest`] values. Documents are read through the
//! [`serialization::Deserializer`] trait, which is implemented for JSON and for the
//! positional binary format; the request types only depend on the trait.
//!
//! Decoding reads fields in a fixed order and stops at the first missing, malformed or
//! inconsistent field, so a request value either exists fully validated or not at all.

pub mod config;
pub mod serialization;

mod types;

pub use ncc_multisig_domain as domain;

pub use self::types::request;
