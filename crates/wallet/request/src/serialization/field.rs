use ncc_multisig_domain::{
    Address, Amount, Hash, MinCosignatoriesModification, ModificationType, WalletName,
    WalletPassword,
};

use super::{DecodeError, Deserializer, Result, Serializer};

const ADDRESS_FIELD: &str = "address";
const HASH_DATA_FIELD: &str = "data";
const RELATIVE_CHANGE_FIELD: &str = "relativeChange";

/// Typed readers for the domain values carried by requests.
///
/// Implemented for every [`Deserializer`].
pub trait DeserializerExt: Deserializer {
    /// Reads an optional address.
    ///
    /// When the context names a network, addresses of any other network are malformed.
    fn read_optional_address(&mut self, label: &str) -> Result<Option<Address>> {
        let Some(text) = self.read_optional_string(label)? else {
            return Ok(None);
        };

        let address = text
            .parse::<Address>()
            .map_err(|e| DecodeError::malformed(label, "address", e.to_string()))?;

        if let Some(network) = self.context().network() {
            address
                .ensure_network(network)
                .map_err(|e| DecodeError::malformed(label, "address", e.to_string()))?;
        }

        Ok(Some(address))
    }

    /// Reads a required address.
    fn read_address(&mut self, label: &str) -> Result<Address> {
        self.read_optional_address(label)?.ok_or_else(|| DecodeError::missing(label))
    }

    /// Reads an array of `{ "address": ... }` objects.
    fn read_address_array(&mut self, label: &str) -> Result<Vec<Address>> {
        self.read_object_array(label, |element| element.read_address(ADDRESS_FIELD))
    }

    /// Reads an amount of micro units.
    fn read_amount(&mut self, label: &str) -> Result<Amount> {
        self.read_u64(label).map(Amount::from_micro)
    }

    /// Reads a `{ "data": ... }` hash object.
    fn read_hash(&mut self, label: &str) -> Result<Hash> {
        self.read_object(label, |object| {
            let data = object.read_bytes(HASH_DATA_FIELD)?;
            Hash::try_from(data.as_slice())
                .map_err(|e| DecodeError::malformed(HASH_DATA_FIELD, "32 byte hash", e.to_string()))
        })
    }

    /// Reads a wallet name.
    fn read_wallet_name(&mut self, label: &str) -> Result<WalletName> {
        let name = self.read_string(label)?;
        WalletName::new(name).map_err(|e| DecodeError::malformed(label, "wallet name", e.to_string()))
    }

    /// Reads a wallet password.
    fn read_wallet_password(&mut self, label: &str) -> Result<WalletPassword> {
        let password = self.read_string(label)?;
        WalletPassword::new(password)
            .map_err(|e| DecodeError::malformed(label, "wallet password", e.to_string()))
    }

    /// Reads an optional `{ "relativeChange": ... }` object.
    fn read_min_cosignatories(
        &mut self,
        label: &str,
    ) -> Result<Option<MinCosignatoriesModification>> {
        self.read_optional_object(label, |object| {
            object.read_int(RELATIVE_CHANGE_FIELD).map(MinCosignatoriesModification::new)
        })
    }

    /// Reads an integer modification type tag. Every tag is accepted.
    fn read_modification_type(&mut self, label: &str) -> Result<ModificationType> {
        self.read_int(label).map(ModificationType::from)
    }
}

impl<D: Deserializer> DeserializerExt for D {}

/// Typed writers mirroring [`DeserializerExt`].
///
/// Implemented for every [`Serializer`].
pub trait SerializerExt: Serializer {
    /// Writes an address in its compressed form.
    fn write_address(&mut self, label: &str, address: &Address) {
        self.write_string(label, &address.to_string());
    }

    /// Writes an address, or marks the field absent.
    fn write_optional_address(&mut self, label: &str, address: Option<&Address>) {
        match address {
            Some(address) => self.write_address(label, address),
            None => self.write_absent(label),
        }
    }

    /// Writes an array of `{ "address": ... }` objects.
    fn write_address_array(&mut self, label: &str, addresses: &[Address]) {
        self.write_object_array(label, addresses, |element, address| {
            element.write_address(ADDRESS_FIELD, address);
        });
    }

    /// Writes an amount of micro units.
    fn write_amount(&mut self, label: &str, amount: Amount) {
        self.write_u64(label, amount.as_micro());
    }

    /// Writes a `{ "data": ... }` hash object.
    fn write_hash(&mut self, label: &str, hash: &Hash) {
        self.write_object(label, |object| object.write_bytes(HASH_DATA_FIELD, hash.as_bytes()));
    }

    /// Writes a wallet name.
    fn write_wallet_name(&mut self, label: &str, name: &WalletName) {
        self.write_string(label, name.as_str());
    }

    /// Writes a wallet password.
    fn write_wallet_password(&mut self, label: &str, password: &WalletPassword) {
        self.write_string(label, password.expose_secret());
    }

    /// Writes a `{ "relativeChange": ... }` object, or marks the field absent.
    fn write_min_cosignatories(
        &mut self,
        label: &str,
        modification: Option<MinCosignatoriesModification>,
    ) {
        match modification {
            Some(modification) => self.write_object(label, |object| {
                object.write_int(RELATIVE_CHANGE_FIELD, modification.relative_change());
            }),
            None => self.write_absent(label),
        }
    }

    /// Writes an integer modification type tag.
    fn write_modification_type(&mut self, label: &str, modification_type: ModificationType) {
        self.write_int(label, modification_type.tag());
    }
}

impl<S: Serializer> SerializerExt for S {}

#[cfg(test)]
mod tests {
    use ncc_multisig_domain::NetworkVersion;
    use serde_json::json;

    use super::*;
    use crate::serialization::{DeserializationContext, JsonDeserializer};

    fn testnet_address() -> Address {
        Address::from_public_key(NetworkVersion::Testnet, &[7; 32])
    }

    #[test]
    fn address_of_another_network_is_malformed() {
        let mainnet = Address::from_public_key(NetworkVersion::Mainnet, &[7; 32]);
        let context = DeserializationContext::builder().network(NetworkVersion::Testnet).build();
        let mut document =
            JsonDeserializer::from_value(json!({ "account": mainnet.to_string() }), context)
                .unwrap();

        let error = document.read_address("account").unwrap_err();

        assert!(matches!(
            error,
            DecodeError::MalformedField { ref field, expected: "address", .. } if field == "account"
        ));
    }

    #[test]
    fn human_readable_address_is_accepted() {
        let address = testnet_address();
        let mut document = JsonDeserializer::from_value(
            json!({ "account": format!("{address:#}").to_lowercase() }),
            DeserializationContext::default(),
        )
        .unwrap();

        assert_eq!(document.read_address("account").unwrap(), address);
    }

    #[test]
    fn bad_array_element_reports_its_index() {
        let address = testnet_address().to_string();
        let mut document = JsonDeserializer::from_value(
            json!({ "addedCosignatories": [{ "address": address }, { "address": 5 }] }),
            DeserializationContext::default(),
        )
        .unwrap();

        let error = document.read_address_array("addedCosignatories").unwrap_err();

        assert_eq!(error.field(), Some("addedCosignatories[1].address"));
    }

    #[test]
    fn short_hash_is_malformed() {
        let mut document = JsonDeserializer::from_value(
            json!({ "innerHash": { "data": "00ff" } }),
            DeserializationContext::default(),
        )
        .unwrap();

        let error = document.read_hash("innerHash").unwrap_err();

        assert!(matches!(
            error,
            DecodeError::MalformedField { ref field, expected: "32 byte hash", .. }
                if field == "innerHash.data"
        ));
    }

    #[test]
    fn blank_password_is_malformed_without_echoing_it() {
        let mut document = JsonDeserializer::from_value(
            json!({ "password": "   " }),
            DeserializationContext::default(),
        )
        .unwrap();

        let error = document.read_wallet_password("password").unwrap_err();

        assert_eq!(
            error.to_string(),
            "malformed field `password`: expected wallet password, wallet password must not be blank"
        );
    }

    #[test]
    fn any_modification_type_tag_is_read() {
        let mut document = JsonDeserializer::from_value(
            json!({ "first": 1, "second": 7 }),
            DeserializationContext::default(),
        )
        .unwrap();

        assert_eq!(document.read_modification_type("first").unwrap().tag(), 1);
        assert_eq!(document.read_modification_type("second").unwrap().tag(), 7);
    }

    #[test]
    fn malformed_relative_change_names_the_nested_field() {
        let mut document = JsonDeserializer::from_value(
            json!({ "minCosignatories": { "relativeChange": "x" } }),
            DeserializationContext::default(),
        )
        .unwrap();

        let error = document.read_min_cosignatories("minCosignatories").unwrap_err();

        assert_eq!(error.field(), Some("minCosignatories.relativeChange"));
    }

    #[test]
    fn absent_min_cosignatories_is_none() {
        let mut document =
            JsonDeserializer::from_value(json!({}), DeserializationContext::default()).unwrap();

        assert_eq!(document.read_min_cosignatories("minCosignatories").unwrap(), None);
    }
}
