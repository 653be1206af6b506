//! Test utilities for multisig request decoding.
//!
//! This crate provides random keys, addresses and hashes along with ready-made request
//! documents for integration tests across this workspace.

use ncc_multisig_domain::{Address, Hash, NetworkVersion};
use rand::Rng;
use serde_json::{Value, json};

// RANDOM VALUES
// ================================================================================================

/// Returns a random 32 byte public key.
pub fn random_public_key() -> [u8; 32] {
    rand::rng().random()
}

/// Returns the address of a random public key on `network`.
pub fn random_address(network: NetworkVersion) -> Address {
    Address::from_public_key(network, &random_public_key())
}

/// Returns `count` distinct random addresses on `network`.
pub fn random_addresses(network: NetworkVersion, count: usize) -> Vec<Address> {
    let mut addresses = Vec::with_capacity(count);
    while addresses.len() < count {
        let address = random_address(network);
        if !addresses.contains(&address) {
            addresses.push(address);
        }
    }
    addresses
}

/// Returns a random transaction hash.
pub fn random_hash() -> Hash {
    Hash::new(rand::rng().random())
}

/// Returns the compressed form of `address` with one checksum character altered.
pub fn corrupt_checksum(address: &Address) -> String {
    let mut encoded: Vec<char> = address.to_string().chars().collect();
    if let Some(last) = encoded.last_mut() {
        *last = if *last == 'A' { 'B' } else { 'A' };
    }
    encoded.into_iter().collect()
}

// DOCUMENTS
// ================================================================================================

/// Returns a JSON document for a modification request of `multisig` on the testnet.
///
/// The document converts `multisig` and adds `added` as cosignatories. Tests remove or
/// replace fields to build the case they need.
pub fn modification_document(multisig: &Address, added: &[Address]) -> Value {
    json!({
        "wallet": "multisig-wallet",
        "type": 3,
        "password": "correct horse battery staple",
        "account": multisig.to_string(),
        "issuer": multisig.to_string(),
        "addedCosignatories": address_objects(added),
        "removedCosignatories": [],
        "minCosignatories": { "relativeChange": 2 },
        "hoursDue": 12,
        "fee": 10_000_000,
        "multisigFee": 6_000_000,
    })
}

/// Returns a JSON document for a signature request cosigning `inner_hash`.
pub fn signature_document(sender: &Address, inner_hash: &Hash) -> Value {
    json!({
        "wallet": "cosigner-wallet",
        "password": "correct horse battery staple",
        "account": sender.to_string(),
        "innerHash": { "data": inner_hash.to_string() },
        "hours_due": 24,
        "fee": 100_000,
    })
}

/// Wraps each address in an `{ "address": ... }` object.
pub fn address_objects(addresses: &[Address]) -> Value {
    addresses.iter().map(|address| json!({ "address": address.to_string() })).collect()
}
