//! Account addresses and the networks they belong to.

use core::{fmt, str::FromStr};
use std::borrow::Cow;

use data_encoding::BASE32;
use ripemd::{Digest, Ripemd160};
use sha3::Keccak256;
use strum::{Display, EnumString, IntoStaticStr};

/// The network an address belongs to.
///
/// The network is encoded in the first decoded byte of every address, which is also what
/// gives each network its recognizable leading character (`N`, `T` or `M`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(
    feature = "serde",
    derive(serde_with::SerializeDisplay, serde_with::DeserializeFromStr)
)]
pub enum NetworkVersion {
    /// The main public network.
    Mainnet,
    /// The public test network.
    Testnet,
    /// Private (mijin) networks.
    Mijin,
}

/// The textual encodings an [`Address`] can be rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressEncoding {
    /// The 40 character base32 form, e.g. `TALICEROONSJCPHC63F52V6FY3SDMSVAEUGHMB7C`.
    #[default]
    Compressed,
    /// The compressed form split into dash separated groups of six characters.
    HumanReadable,
}

/// A validated account address.
///
/// The address is held in its decoded form: a network version byte, the 20 byte
/// RIPEMD-160 hash of the Keccak-256 hash of the account public key, and a 4 byte
/// checksum. Both the compressed and the human-readable textual encodings parse into
/// the same value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde_with::SerializeDisplay, serde_with::DeserializeFromStr)
)]
pub struct Address {
    network: NetworkVersion,
    bytes: [u8; Address::DECODED_SIZE],
}

/// Errors that can occur when parsing or checking an [`Address`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    /// The textual address does not have 40 significant characters.
    #[error("invalid encoded address length: expected 40 characters, got {0}")]
    InvalidEncodedLength(usize),

    /// The decoded address does not have 25 bytes.
    #[error("invalid decoded address length: expected 25 bytes, got {0}")]
    InvalidDecodedLength(usize),

    /// The textual address is not valid base32.
    #[error("invalid address encoding: {0}")]
    InvalidEncoding(Cow<'static, str>),

    /// The version byte does not belong to any known network.
    #[error("unknown network version byte: {0:#04x}")]
    UnknownNetwork(u8),

    /// The checksum does not match the address body.
    #[error("address checksum mismatch")]
    ChecksumMismatch,

    /// The address belongs to a different network than the one expected.
    #[error("address belongs to {actual}, expected {expected}")]
    NetworkMismatch {
        /// The network the address was expected to belong to.
        expected: NetworkVersion,
        /// The network the address actually belongs to.
        actual: NetworkVersion,
    },
}

impl NetworkVersion {
    /// Returns the version byte that prefixes addresses of this network.
    pub const fn version_byte(self) -> u8 {
        match self {
            NetworkVersion::Mainnet => 0x68,
            NetworkVersion::Testnet => 0x98,
            NetworkVersion::Mijin => 0x60,
        }
    }

    /// Returns the network identified by the given address version byte, if any.
    pub const fn from_version_byte(byte: u8) -> Option<Self> {
        match byte {
            0x68 => Some(NetworkVersion::Mainnet),
            0x98 => Some(NetworkVersion::Testnet),
            0x60 => Some(NetworkVersion::Mijin),
            _ => None,
        }
    }
}

impl Address {
    /// The number of bytes in a decoded address.
    pub const DECODED_SIZE: usize = 25;

    /// The number of characters in a compressed address.
    pub const ENCODED_SIZE: usize = 40;

    const BODY_SIZE: usize = 21;
    const GROUP_SIZE: usize = 6;

    /// Derives the address of an account public key on the given network.
    pub fn from_public_key(network: NetworkVersion, public_key: &[u8]) -> Self {
        let public_key_hash = Ripemd160::digest(Keccak256::digest(public_key));

        let mut bytes = [0; Self::DECODED_SIZE];
        bytes[0] = network.version_byte();
        bytes[1..Self::BODY_SIZE].copy_from_slice(&public_key_hash);

        let checksum = checksum(&bytes[..Self::BODY_SIZE]);
        bytes[Self::BODY_SIZE..].copy_from_slice(&checksum);

        Self { network, bytes }
    }

    /// Returns the network this address belongs to.
    pub fn network(&self) -> NetworkVersion {
        self.network
    }

    /// Returns the 20 byte public key hash embedded in this address.
    pub fn public_key_hash(&self) -> &[u8] {
        &self.bytes[1..Self::BODY_SIZE]
    }

    /// Returns the decoded address bytes, checksum included.
    pub fn as_bytes(&self) -> &[u8; Self::DECODED_SIZE] {
        &self.bytes
    }

    /// Renders the address in the requested encoding.
    pub fn encode(&self, encoding: AddressEncoding) -> String {
        let compressed = BASE32.encode(&self.bytes);

        match encoding {
            AddressEncoding::Compressed => compressed,
            AddressEncoding::HumanReadable => {
                let mut grouped =
                    String::with_capacity(Self::ENCODED_SIZE + Self::ENCODED_SIZE / Self::GROUP_SIZE);

                for (i, c) in compressed.chars().enumerate() {
                    if i > 0 && i % Self::GROUP_SIZE == 0 {
                        grouped.push('-');
                    }
                    grouped.push(c);
                }

                grouped
            },
        }
    }

    /// Checks that this address belongs to `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::NetworkMismatch`] when the networks differ.
    pub fn ensure_network(&self, expected: NetworkVersion) -> Result<(), AddressError> {
        if self.network == expected {
            return Ok(());
        }

        Err(AddressError::NetworkMismatch { expected, actual: self.network })
    }
}

fn checksum(body: &[u8]) -> [u8; 4] {
    let digest = Keccak256::digest(body);
    [digest[0], digest[1], digest[2], digest[3]]
}

impl TryFrom<&[u8]> for Address {
    type Error = AddressError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; Self::DECODED_SIZE] = bytes
            .try_into()
            .map_err(|_| AddressError::InvalidDecodedLength(bytes.len()))?;

        let network = NetworkVersion::from_version_byte(bytes[0])
            .ok_or(AddressError::UnknownNetwork(bytes[0]))?;

        if checksum(&bytes[..Self::BODY_SIZE]) != bytes[Self::BODY_SIZE..] {
            return Err(AddressError::ChecksumMismatch);
        }

        Ok(Self { network, bytes })
    }
}

impl Address {
    /// Returns whether `text` splits into full groups followed by the shorter final group.
    fn is_grouped(text: &str) -> bool {
        let groups: Vec<&str> = text.split('-').collect();
        let Some((last, full)) = groups.split_last() else {
            return false;
        };

        groups.len() == Self::ENCODED_SIZE.div_ceil(Self::GROUP_SIZE)
            && full.iter().all(|group| group.len() == Self::GROUP_SIZE)
            && last.len() == Self::ENCODED_SIZE - full.len() * Self::GROUP_SIZE
    }
}

impl FromStr for Address {
    type Err = AddressError;

    /// Parses either the compressed or the human-readable encoding.
    ///
    /// Parsing is case-insensitive and ignores surrounding whitespace. Dashes are only
    /// accepted between the groups of the human-readable form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.contains('-') && !Self::is_grouped(text) {
            return Err(AddressError::InvalidEncoding("misplaced group separator".into()));
        }

        let compressed: String = text
            .chars()
            .filter(|&c| c != '-')
            .map(|c| c.to_ascii_uppercase())
            .collect();

        if compressed.len() != Self::ENCODED_SIZE {
            return Err(AddressError::InvalidEncodedLength(compressed.len()));
        }

        let decoded = BASE32
            .decode(compressed.as_bytes())
            .map_err(|e| AddressError::InvalidEncoding(e.to_string().into()))?;

        Self::try_from(decoded.as_slice())
    }
}

impl fmt::Display for Address {
    /// Formats the compressed encoding, or the human-readable one with `{:#}`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoding = if f.alternate() {
            AddressEncoding::HumanReadable
        } else {
            AddressEncoding::Compressed
        };

        f.write_str(&self.encode(encoding))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Address").field(&self.encode(AddressEncoding::Compressed)).finish()
    }
}
