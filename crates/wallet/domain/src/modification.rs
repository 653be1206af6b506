//! Multisig account modifications.

use core::fmt;

use strum::{Display, IntoStaticStr};

use crate::Address;

/// Whether a cosignatory is added to or removed from a multisig account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ModificationKind {
    /// The cosignatory is added.
    Add,
    /// The cosignatory is removed.
    Remove,
}

/// A single instruction adding or removing one cosignatory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CosignatoryModification {
    kind: ModificationKind,
    cosignatory: Address,
}

/// A relative change of the minimum number of cosignatories required to sign.
///
/// The change may be negative, positive or zero. Whether the resulting threshold is
/// attainable is decided by the ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MinCosignatoriesModification(i32);

/// The integer tag naming the kind of aggregate modification a request asks for.
///
/// Every tag is kept as sent, so tags this crate has no name for still travel through
/// decoding and encoding unchanged. Deciding which tags are supported is left to the
/// transaction builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModificationType(i32);

impl CosignatoryModification {
    /// Creates a cosignatory modification.
    pub fn new(kind: ModificationKind, cosignatory: Address) -> Self {
        Self { kind, cosignatory }
    }

    /// Returns whether the cosignatory is added or removed.
    pub fn kind(&self) -> ModificationKind {
        self.kind
    }

    /// Returns the cosignatory address.
    pub fn cosignatory(&self) -> &Address {
        &self.cosignatory
    }
}

impl MinCosignatoriesModification {
    /// Creates a threshold modification from a relative change.
    pub const fn new(relative_change: i32) -> Self {
        Self(relative_change)
    }

    /// Returns the relative change.
    pub const fn relative_change(self) -> i32 {
        self.0
    }

    /// Returns `true` when the modification leaves the threshold untouched.
    pub const fn is_noop(self) -> bool {
        self.0 == 0
    }
}

impl ModificationType {
    /// The tag of a multisig aggregate modification.
    pub const MULTISIG_AGGREGATE: ModificationType = ModificationType(3);

    /// Creates a modification type from its wire tag.
    pub const fn new(tag: i32) -> Self {
        Self(tag)
    }

    /// Returns the integer tag used on the wire.
    pub const fn tag(self) -> i32 {
        self.0
    }

    /// Returns `true` for [`ModificationType::MULTISIG_AGGREGATE`].
    pub const fn is_multisig_aggregate(self) -> bool {
        self.0 == Self::MULTISIG_AGGREGATE.0
    }
}

impl From<i32> for ModificationType {
    fn from(tag: i32) -> Self {
        Self(tag)
    }
}

impl From<ModificationType> for i32 {
    fn from(modification_type: ModificationType) -> Self {
        modification_type.tag()
    }
}

impl fmt::Display for ModificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_multisig_aggregate() {
            f.write_str("multisig_aggregate")
        } else {
            write!(f, "tag {}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modification_type_keeps_any_tag() {
        for tag in [i32::MIN, -1, 0, 1, 3, 7, 4097] {
            assert_eq!(i32::from(ModificationType::from(tag)), tag);
        }

        assert!(ModificationType::from(3).is_multisig_aggregate());
        assert!(!ModificationType::new(7).is_multisig_aggregate());
        assert_eq!(ModificationType::MULTISIG_AGGREGATE.tag(), 3);
    }

    #[test]
    fn threshold_change_keeps_sign() {
        assert_eq!(MinCosignatoriesModification::new(-2).relative_change(), -2);
        assert!(MinCosignatoriesModification::default().is_noop());
        assert!(!MinCosignatoriesModification::new(1).is_noop());
    }

    #[test]
    fn kinds_display_in_snake_case() {
        assert_eq!(ModificationKind::Add.to_string(), "add");
        assert_eq!(<&'static str>::from(ModificationKind::Remove), "remove");
    }

    #[test]
    fn modification_types_display_their_name_or_tag() {
        assert_eq!(ModificationType::MULTISIG_AGGREGATE.to_string(), "multisig_aggregate");
        assert_eq!(ModificationType::new(7).to_string(), "tag 7");
    }
}
