//! Collection address derivation
//!
//! Every class is backed by one collection whose address depends on nothing
//! but the class id, so the same class id always resolves to the same
//! collection no matter who first sent it here.
//!
//! # Layout
//! `"nft1" || hex(keccak256("nft-bridge/collection" || class_id)[0..20])`

use cosmwasm_std::Addr;
use tiny_keccak::{Hasher, Keccak};

/// Domain separator mixed into every collection address
const COLLECTION_DOMAIN: &[u8] = b"nft-bridge/collection";

/// Human readable prefix of collection addresses
pub const COLLECTION_PREFIX: &str = "nft1";

/// Compute keccak256 hash of arbitrary data
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

/// Derive the collection address for a class id.
pub fn collection_address(class_id: &str) -> Addr {
    let mut data = Vec::with_capacity(COLLECTION_DOMAIN.len() + class_id.len());
    data.extend_from_slice(COLLECTION_DOMAIN);
    data.extend_from_slice(class_id.as_bytes());
    let hash = keccak256(&data);
    Addr::unchecked(format!("{}{}", COLLECTION_PREFIX, hex::encode(&hash[..20])))
}
