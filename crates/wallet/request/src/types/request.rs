//! Request types for multisig wallet operations.

mod error;

use std::collections::HashSet;

use bon::Builder;
use dissolve_derive::Dissolve;
use ncc_multisig_domain::{
    Address, Amount, CosignatoryModification, Hash, HoursDue, MinCosignatoriesModification,
    ModificationKind, ModificationType, WalletName, WalletPassword,
};

pub use self::error::InconsistencyError;
use crate::serialization::{
    DecodeError, Deserializer, DeserializerExt, RequestLimits, Result, Serializer, SerializerExt,
};

const WALLET: &str = "wallet";
const PASSWORD: &str = "password";
const ACCOUNT: &str = "account";
const FEE: &str = "fee";

/// Request to add or remove cosignatories of a multisig account, or to change its
/// minimum number of cosignatories.
///
/// Built with [`MultisigModificationRequest::builder`] for in-process use or read from a
/// document with [`MultisigModificationRequest::decode`]. Decoding additionally enforces
/// [`MultisigModificationRequest::ensure_consistent`].
#[derive(Debug, Clone, PartialEq, Eq, Builder, Dissolve)]
pub struct MultisigModificationRequest {
    /// Wallet holding the signing key
    wallet_name: WalletName,

    /// Whether the account is converted or an existing multisig account is modified
    modification_type: ModificationType,

    /// Password unlocking the wallet
    password: WalletPassword,

    /// The multisig account being modified
    multisig_address: Address,

    /// Account issuing the transaction. `None` leaves the choice to the wallet.
    issuer_address: Option<Address>,

    /// Cosignatories to add, in request order
    #[builder(default)]
    added_cosignatories: Vec<Address>,

    /// Cosignatories to remove, in request order
    #[builder(default)]
    removed_cosignatories: Vec<Address>,

    /// Change to the minimum number of cosignatories, if any
    min_cosignatories_modification: Option<MinCosignatoriesModification>,

    /// Hours until the transaction expires
    hours_due: HoursDue,

    /// Fee of the inner modification transaction
    fee: Amount,

    /// Fee of the multisig wrapper transaction
    multisig_fee: Amount,
}

/// Request to cosign a pending multisig transaction.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Dissolve)]
pub struct MultisigSignatureRequest {
    /// Wallet holding the signing key
    wallet_name: WalletName,

    /// Password unlocking the wallet
    password: WalletPassword,

    /// The multisig account the pending transaction belongs to
    sender_address: Address,

    /// Hash of the pending inner transaction
    inner_transaction_hash: Hash,

    /// Hours until the signature transaction expires
    hours_due: HoursDue,

    /// Fee of the signature transaction
    fee: Amount,
}

impl MultisigModificationRequest {
    const MODIFICATION_TYPE: &'static str = "type";
    const ISSUER: &'static str = "issuer";
    const ADDED_COSIGNATORIES: &'static str = "addedCosignatories";
    const REMOVED_COSIGNATORIES: &'static str = "removedCosignatories";
    const MIN_COSIGNATORIES: &'static str = "minCosignatories";
    const HOURS_DUE: &'static str = "hoursDue";
    const MULTISIG_FEE: &'static str = "multisigFee";

    /// Reads a request from `deserializer`.
    ///
    /// Fields are read in wire order and decoding stops at the first failure. Once every
    /// field is read the request is checked with [`Self::ensure_consistent`] against the
    /// deserializer's limits.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::MissingField`] or [`DecodeError::MalformedField`] for the
    /// first unreadable field, [`DecodeError::MalformedDocument`] for binary input left over
    /// after the last field and [`DecodeError::SemanticInconsistency`] for requests that
    /// contradict themselves.
    #[tracing::instrument(skip_all)]
    pub fn decode<D: Deserializer>(deserializer: &mut D) -> Result<Self> {
        Self::decode_fields(deserializer)
            .inspect(|request| {
                tracing::debug!(
                    wallet = %request.wallet_name,
                    multisig = %request.multisig_address,
                    modification_type = %request.modification_type,
                    added = request.added_cosignatories.len(),
                    removed = request.removed_cosignatories.len(),
                    "decoded multisig modification request",
                );
            })
            .inspect_err(|e| tracing::warn!("failed to decode multisig modification request: {e}"))
    }

    fn decode_fields<D: Deserializer>(deserializer: &mut D) -> Result<Self> {
        let request = Self::builder()
            .wallet_name(deserializer.read_wallet_name(WALLET)?)
            .modification_type(deserializer.read_modification_type(Self::MODIFICATION_TYPE)?)
            .password(deserializer.read_wallet_password(PASSWORD)?)
            .multisig_address(deserializer.read_address(ACCOUNT)?)
            .maybe_issuer_address(deserializer.read_optional_address(Self::ISSUER)?)
            .added_cosignatories(deserializer.read_address_array(Self::ADDED_COSIGNATORIES)?)
            .removed_cosignatories(deserializer.read_address_array(Self::REMOVED_COSIGNATORIES)?)
            .maybe_min_cosignatories_modification(
                deserializer.read_min_cosignatories(Self::MIN_COSIGNATORIES)?,
            )
            .hours_due(read_hours_due(deserializer, Self::HOURS_DUE)?)
            .fee(deserializer.read_amount(FEE)?)
            .multisig_fee(deserializer.read_amount(Self::MULTISIG_FEE)?)
            .build();
        deserializer.finish()?;

        request.ensure_consistent(deserializer.context().limits())?;

        Ok(request)
    }

    /// Writes the request to `serializer` in the order [`Self::decode`] reads it.
    pub fn encode<S: Serializer>(&self, serializer: &mut S) {
        serializer.write_wallet_name(WALLET, &self.wallet_name);
        serializer.write_modification_type(Self::MODIFICATION_TYPE, self.modification_type);
        serializer.write_wallet_password(PASSWORD, &self.password);
        serializer.write_address(ACCOUNT, &self.multisig_address);
        serializer.write_optional_address(Self::ISSUER, self.issuer_address.as_ref());
        serializer.write_address_array(Self::ADDED_COSIGNATORIES, &self.added_cosignatories);
        serializer.write_address_array(Self::REMOVED_COSIGNATORIES, &self.removed_cosignatories);
        serializer
            .write_min_cosignatories(Self::MIN_COSIGNATORIES, self.min_cosignatories_modification);
        serializer.write_int(Self::HOURS_DUE, self.hours_due.into());
        serializer.write_amount(FEE, self.fee);
        serializer.write_amount(Self::MULTISIG_FEE, self.multisig_fee);
    }

    /// Checks the fields against each other and against `limits`.
    ///
    /// The first violated rule is reported, checked in this order: the validity window,
    /// the number of modifications, duplicates within either list, addresses in both lists,
    /// and the multisig account adding itself.
    ///
    /// # Errors
    ///
    /// Returns the [`InconsistencyError`] of the first violated rule.
    pub fn ensure_consistent(
        &self,
        limits: &RequestLimits,
    ) -> core::result::Result<(), InconsistencyError> {
        ensure_hours_due_within(self.hours_due, limits)?;

        let count = self.added_cosignatories.len() + self.removed_cosignatories.len();
        let limit = limits.max_cosignatory_modifications();
        if count > limit {
            return Err(InconsistencyError::TooManyModifications { count, limit });
        }

        let mut added = HashSet::with_capacity(self.added_cosignatories.len());
        for cosignatory in &self.added_cosignatories {
            if !added.insert(cosignatory) {
                return Err(InconsistencyError::DuplicateCosignatory(*cosignatory));
            }
        }

        let mut removed = HashSet::with_capacity(self.removed_cosignatories.len());
        for cosignatory in &self.removed_cosignatories {
            if !removed.insert(cosignatory) {
                return Err(InconsistencyError::DuplicateCosignatory(*cosignatory));
            }
            if added.contains(cosignatory) {
                return Err(InconsistencyError::CosignatoryAddedAndRemoved(*cosignatory));
            }
        }

        if added.contains(&self.multisig_address) {
            return Err(InconsistencyError::SelfCosignatory(self.multisig_address));
        }

        Ok(())
    }

    /// Returns the wallet name.
    pub fn wallet_name(&self) -> &WalletName {
        &self.wallet_name
    }

    /// Returns the modification type.
    pub fn modification_type(&self) -> ModificationType {
        self.modification_type
    }

    /// Returns the wallet password.
    pub fn password(&self) -> &WalletPassword {
        &self.password
    }

    /// Returns the multisig account address.
    pub fn multisig_address(&self) -> &Address {
        &self.multisig_address
    }

    /// Returns the issuer address, if one was given.
    pub fn issuer_address(&self) -> Option<&Address> {
        self.issuer_address.as_ref()
    }

    /// Returns the cosignatories to add.
    pub fn added_cosignatories(&self) -> &[Address] {
        &self.added_cosignatories
    }

    /// Returns the cosignatories to remove.
    pub fn removed_cosignatories(&self) -> &[Address] {
        &self.removed_cosignatories
    }

    /// Returns the minimum cosignatories change, if any.
    pub fn min_cosignatories_modification(&self) -> Option<MinCosignatoriesModification> {
        self.min_cosignatories_modification
    }

    /// Returns the validity window.
    pub fn hours_due(&self) -> HoursDue {
        self.hours_due
    }

    /// Returns the inner transaction fee.
    pub fn fee(&self) -> Amount {
        self.fee
    }

    /// Returns the multisig wrapper fee.
    pub fn multisig_fee(&self) -> Amount {
        self.multisig_fee
    }

    /// Returns the cosignatory changes, additions first, each list in request order.
    pub fn modifications(&self) -> impl Iterator<Item = CosignatoryModification> + '_ {
        let added = self
            .added_cosignatories
            .iter()
            .map(|address| CosignatoryModification::new(ModificationKind::Add, *address));
        let removed = self
            .removed_cosignatories
            .iter()
            .map(|address| CosignatoryModification::new(ModificationKind::Remove, *address));
        added.chain(removed)
    }
}

impl MultisigSignatureRequest {
    const INNER_HASH: &'static str = "innerHash";
    const HOURS_DUE: &'static str = "hours_due";

    /// Reads a request from `deserializer`.
    ///
    /// # Errors
    ///
    /// Returns the first missing or malformed field, [`DecodeError::MalformedDocument`] for
    /// binary input left over after the last field, or
    /// [`DecodeError::SemanticInconsistency`] if the validity window exceeds the
    /// deserializer's limit.
    #[tracing::instrument(skip_all)]
    pub fn decode<D: Deserializer>(deserializer: &mut D) -> Result<Self> {
        Self::decode_fields(deserializer)
            .inspect(|request| {
                tracing::debug!(
                    wallet = %request.wallet_name,
                    sender = %request.sender_address,
                    inner_hash = %request.inner_transaction_hash,
                    "decoded multisig signature request",
                );
            })
            .inspect_err(|e| tracing::warn!("failed to decode multisig signature request: {e}"))
    }

    fn decode_fields<D: Deserializer>(deserializer: &mut D) -> Result<Self> {
        let request = Self::builder()
            .wallet_name(deserializer.read_wallet_name(WALLET)?)
            .password(deserializer.read_wallet_password(PASSWORD)?)
            .sender_address(deserializer.read_address(ACCOUNT)?)
            .inner_transaction_hash(deserializer.read_hash(Self::INNER_HASH)?)
            .hours_due(read_hours_due(deserializer, Self::HOURS_DUE)?)
            .fee(deserializer.read_amount(FEE)?)
            .build();
        deserializer.finish()?;

        ensure_hours_due_within(request.hours_due, deserializer.context().limits())?;

        Ok(request)
    }

    /// Writes the request to `serializer` in the order [`Self::decode`] reads it.
    pub fn encode<S: Serializer>(&self, serializer: &mut S) {
        serializer.write_wallet_name(WALLET, &self.wallet_name);
        serializer.write_wallet_password(PASSWORD, &self.password);
        serializer.write_address(ACCOUNT, &self.sender_address);
        serializer.write_hash(Self::INNER_HASH, &self.inner_transaction_hash);
        serializer.write_int(Self::HOURS_DUE, self.hours_due.into());
        serializer.write_amount(FEE, self.fee);
    }

    /// Returns the wallet name.
    pub fn wallet_name(&self) -> &WalletName {
        &self.wallet_name
    }

    /// Returns the wallet password.
    pub fn password(&self) -> &WalletPassword {
        &self.password
    }

    /// Returns the multisig account address.
    pub fn sender_address(&self) -> &Address {
        &self.sender_address
    }

    /// Returns the hash of the transaction being cosigned.
    pub fn inner_transaction_hash(&self) -> &Hash {
        &self.inner_transaction_hash
    }

    /// Returns the validity window.
    pub fn hours_due(&self) -> HoursDue {
        self.hours_due
    }

    /// Returns the signature transaction fee.
    pub fn fee(&self) -> Amount {
        self.fee
    }
}

/// Reads a validity window. Zero and negative values are inconsistent rather than
/// malformed.
fn read_hours_due<D: Deserializer>(deserializer: &mut D, label: &str) -> Result<HoursDue> {
    let hours = deserializer.read_int(label)?;
    HoursDue::try_from(hours)
        .map_err(|_| DecodeError::from(InconsistencyError::NonPositiveHoursDue(hours)))
}

fn ensure_hours_due_within(
    hours_due: HoursDue,
    limits: &RequestLimits,
) -> core::result::Result<(), InconsistencyError> {
    let limit = limits.max_hours_due().get();
    if hours_due.get() > limit {
        return Err(InconsistencyError::HoursDueExceedsLimit { hours_due: hours_due.get(), limit });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use ncc_multisig_domain::NetworkVersion;

    use super::*;

    fn address(seed: u8) -> Address {
        Address::from_public_key(NetworkVersion::Testnet, &[seed; 32])
    }

    fn request(added: Vec<Address>, removed: Vec<Address>) -> MultisigModificationRequest {
        MultisigModificationRequest::builder()
            .wallet_name(WalletName::new("savings").unwrap())
            .modification_type(ModificationType::MULTISIG_AGGREGATE)
            .password(WalletPassword::new("hunter2").unwrap())
            .multisig_address(address(0))
            .added_cosignatories(added)
            .removed_cosignatories(removed)
            .hours_due(HoursDue::new(12).unwrap())
            .fee(Amount::from_micro(1_000))
            .multisig_fee(Amount::from_micro(2_000))
            .build()
    }

    #[test]
    fn modifications_list_additions_before_removals() {
        let request = request(vec![address(1), address(2)], vec![address(3)]);

        let kinds: Vec<_> = request
            .modifications()
            .map(|modification| (modification.kind(), *modification.cosignatory()))
            .collect();

        assert_eq!(
            kinds,
            vec![
                (ModificationKind::Add, address(1)),
                (ModificationKind::Add, address(2)),
                (ModificationKind::Remove, address(3)),
            ]
        );
    }

    #[test]
    fn consistency_rules_report_the_first_violation() {
        let limits = RequestLimits::default();

        assert_eq!(request(vec![address(1)], vec![address(2)]).ensure_consistent(&limits), Ok(()));
        assert_eq!(
            request(vec![address(1), address(1)], vec![]).ensure_consistent(&limits),
            Err(InconsistencyError::DuplicateCosignatory(address(1)))
        );
        assert_eq!(
            request(vec![address(1)], vec![address(2), address(1)]).ensure_consistent(&limits),
            Err(InconsistencyError::CosignatoryAddedAndRemoved(address(1)))
        );
        assert_eq!(
            request(vec![address(0)], vec![]).ensure_consistent(&limits),
            Err(InconsistencyError::SelfCosignatory(address(0)))
        );
    }

    #[test]
    fn limits_are_checked_before_the_lists() {
        let limits = RequestLimits::builder()
            .max_hours_due(core::num::NonZeroU32::new(6).unwrap())
            .build();

        assert_eq!(
            request(vec![address(1), address(1)], vec![]).ensure_consistent(&limits),
            Err(InconsistencyError::HoursDueExceedsLimit { hours_due: 12, limit: 6 })
        );

        let limits = RequestLimits::builder().max_cosignatory_modifications(1).build();

        assert_eq!(
            request(vec![address(1)], vec![address(2)]).ensure_consistent(&limits),
            Err(InconsistencyError::TooManyModifications { count: 2, limit: 1 })
        );
    }

    #[test]
    fn password_is_redacted_in_debug_output() {
        let rendered = format!("{:?}", request(vec![], vec![]));

        assert!(!rendered.contains("hunter2"));
    }
}
