//! Domain types for multisig wallet requests.
//!
//! This crate provides the leaf value types that multisig requests are built from:
//! account addresses, amounts, transaction hashes, wallet credentials, and the
//! cosignatory/threshold modifications applied to a multisig account. Every type
//! validates itself on construction, so holding a value means holding a valid one.

pub mod address;
pub mod modification;
pub mod primitive;
pub mod wallet;

pub use self::{
    address::{Address, AddressEncoding, AddressError, NetworkVersion},
    modification::{
        CosignatoryModification, MinCosignatoriesModification, ModificationKind,
        ModificationType,
    },
    primitive::{Amount, Hash, HashError, HoursDue, HoursDueError},
    wallet::{WalletName, WalletPassword, WalletValueError},
};
