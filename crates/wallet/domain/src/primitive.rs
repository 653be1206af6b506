//! Amounts, hashes and validity windows.

use core::{fmt, num::NonZeroU32, str::FromStr};

/// A non-negative quantity of the smallest currency unit (micro units).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Amount(u64);

/// A 32 byte transaction hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde_with::SerializeDisplay, serde_with::DeserializeFromStr)
)]
pub struct Hash([u8; Hash::SIZE]);

/// The validity window of a transaction, in hours.
///
/// Always positive and small enough to travel as a signed 32-bit integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HoursDue(NonZeroU32);

/// Error returned for hour counts that are not a valid [`HoursDue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("hours due must be between 1 and 2147483647, got {0}")]
pub struct HoursDueError(pub i64);

/// Errors that can occur when constructing a [`Hash`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HashError {
    /// The input does not have exactly 32 bytes.
    #[error("invalid hash length: expected 32 bytes, got {0}")]
    InvalidLength(usize),

    /// The input is not valid hex.
    #[error("invalid hash hex: {0}")]
    InvalidHex(#[from] const_hex::FromHexError),
}

impl Amount {
    /// The zero amount.
    pub const ZERO: Amount = Amount(0);

    /// The number of micro units in one whole unit.
    pub const MICRO_UNITS_PER_UNIT: u64 = 1_000_000;

    /// Creates an amount from a number of micro units.
    pub const fn from_micro(micro_units: u64) -> Self {
        Self(micro_units)
    }

    /// Creates an amount from a number of whole units, or `None` on overflow.
    pub const fn from_whole(units: u64) -> Option<Self> {
        match units.checked_mul(Self::MICRO_UNITS_PER_UNIT) {
            Some(micro_units) => Some(Self(micro_units)),
            None => None,
        }
    }

    /// Returns the amount in micro units.
    pub const fn as_micro(self) -> u64 {
        self.0
    }
}

impl From<u64> for Amount {
    fn from(micro_units: u64) -> Self {
        Self(micro_units)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl HoursDue {
    /// Creates a validity window of `hours` hours.
    ///
    /// # Errors
    ///
    /// Returns [`HoursDueError`] for zero or for counts above `i32::MAX`.
    pub fn new(hours: u32) -> Result<Self, HoursDueError> {
        i32::try_from(hours)
            .ok()
            .and_then(|_| NonZeroU32::new(hours))
            .map(Self)
            .ok_or(HoursDueError(i64::from(hours)))
    }

    /// Returns the number of hours.
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<i32> for HoursDue {
    type Error = HoursDueError;

    fn try_from(hours: i32) -> Result<Self, Self::Error> {
        u32::try_from(hours)
            .map_err(|_| HoursDueError(i64::from(hours)))
            .and_then(Self::new)
    }
}

impl From<HoursDue> for i32 {
    fn from(hours_due: HoursDue) -> Self {
        // `HoursDue::new` caps the value at `i32::MAX`.
        hours_due.0.get().try_into().unwrap_or(i32::MAX)
    }
}

impl fmt::Display for HoursDue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Hash {
    /// The number of bytes in a hash.
    pub const SIZE: usize = 32;

    /// Creates a hash from its raw bytes.
    pub const fn new(bytes: [u8; Self::SIZE]) -> Self {
        Self(bytes)
    }

    /// Returns the raw hash bytes.
    pub fn as_bytes(&self) -> &[u8; Self::SIZE] {
        &self.0
    }
}

impl TryFrom<&[u8]> for Hash {
    type Error = HashError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        bytes.try_into().map(Self).map_err(|_| HashError::InvalidLength(bytes.len()))
    }
}

impl FromStr for Hash {
    type Err = HashError;

    /// Parses lowercase or uppercase hex, with or without a `0x` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = const_hex::decode(s.trim())?;
        Self::try_from(bytes.as_slice())
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&const_hex::encode(self.0))
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH_HEX: &str = "8a4d7c3b9f2e1d0c6b5a4f3e2d1c0b9a8f7e6d5c4b3a291807f6e5d4c3b2a190";

    #[test]
    fn hash_parses_hex_with_and_without_prefix() {
        let hash: Hash = HASH_HEX.parse().unwrap();

        assert_eq!(hash.to_string(), HASH_HEX);
        assert_eq!(format!("0x{HASH_HEX}").parse::<Hash>().unwrap(), hash);
        assert_eq!(HASH_HEX.to_uppercase().parse::<Hash>().unwrap(), hash);
        assert_eq!(hash.as_bytes()[0], 0x8a);
        assert_eq!(hash.as_bytes()[31], 0x90);
    }

    #[test]
    fn hash_rejects_wrong_length() {
        assert_eq!("abcd".parse::<Hash>(), Err(HashError::InvalidLength(2)));
        assert_eq!(Hash::try_from(&[0u8; 33][..]), Err(HashError::InvalidLength(33)));
        assert!(matches!("zz".repeat(32).parse::<Hash>(), Err(HashError::InvalidHex(_))));
    }

    #[test]
    fn hours_due_must_be_positive_and_fit_the_wire() {
        assert_eq!(HoursDue::new(24).unwrap().get(), 24);
        assert_eq!(HoursDue::try_from(1).unwrap().get(), 1);
        assert_eq!(HoursDue::new(0), Err(HoursDueError(0)));
        assert_eq!(HoursDue::try_from(-3), Err(HoursDueError(-3)));
        assert_eq!(HoursDue::new(u32::MAX), Err(HoursDueError(i64::from(u32::MAX))));
        assert_eq!(i32::from(HoursDue::new(12).unwrap()), 12);
    }

    #[test]
    fn amount_converts_whole_units() {
        assert_eq!(Amount::from_whole(5), Some(Amount::from_micro(5_000_000)));
        assert_eq!(Amount::from_whole(u64::MAX), None);
        assert_eq!(Amount::from(42).as_micro(), 42);
        assert_eq!(Amount::ZERO.to_string(), "0");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_transparently() {
        let hash: Hash = HASH_HEX.parse().unwrap();

        assert_eq!(serde_json::to_string(&Amount::from_micro(100_000)).unwrap(), "100000");
        assert_eq!(serde_json::to_string(&hash).unwrap(), format!("\"{HASH_HEX}\""));
    }
}
