//! Class registry.
//!
//! Derives the class id a token carries on this chain, records which classes
//! exist here and where they came from, and maps every class to its backing
//! collection.
//!
//! # Class ids
//! A native class id is chosen by its creator and never contains `/`. A class
//! that arrives over channel `C` on port `P` is stored as `P/C/{incoming id}`.
//! Every inbound hop adds one more prefix; nothing is ever collapsed, so a
//! class id names the exact path the class travelled.
//!
//! # Provenance
//! Provenance is scoped to a channel. A packet only counts as a return of a
//! token we sent out if the counterparty's prefix pops off its class id AND
//! the escrow ledger holds that token for the very channel the packet arrived
//! on. Anything else is a new class on this chain, even when the popped id
//! happens to name a class escrowed on some other channel.

use cosmwasm_std::{Addr, IbcEndpoint, StdResult, Storage};

use crate::error::ContractError;
use crate::escrow;
use crate::hash::collection_address;
use crate::state::{ClassOrigin, NftClass, CLASSES, CONTRACT_TO_CLASS};

/// Upper bound on native class id length
pub const MAX_NATIVE_CLASS_ID_LEN: usize = 128;

/// Gets the class id prefix for an IBC endpoint: `{port}/{channel}/`.
pub fn endpoint_prefix(endpoint: &IbcEndpoint) -> String {
    format!("{}/{}/", endpoint.port_id, endpoint.channel_id)
}

/// Class id a class arriving on `dest` is known by on this chain.
pub fn derive_inbound_class_id(dest: &IbcEndpoint, source_class_id: &str) -> String {
    format!("{}{}", endpoint_prefix(dest), source_class_id)
}

/// Strips the sending endpoint's prefix from a class id, if present.
///
/// The class id comes from a foreign chain, so this must hold up against
/// empty and non-ASCII input.
pub fn try_pop_source_prefix<'a>(source: &IbcEndpoint, class_id: &'a str) -> Option<&'a str> {
    class_id.strip_prefix(&endpoint_prefix(source))
}

pub fn load_class(storage: &dyn Storage, class_id: &str) -> Result<NftClass, ContractError> {
    CLASSES
        .may_load(storage, class_id)?
        .ok_or_else(|| ContractError::ClassNotFound {
            class_id: class_id.to_string(),
        })
}

pub fn class_for_contract(storage: &dyn Storage, contract: &Addr) -> StdResult<Option<String>> {
    CONTRACT_TO_CLASS.may_load(storage, contract)
}

/// Register a class created on this chain by `creator`.
pub fn create_native_class(
    storage: &mut dyn Storage,
    class_id: &str,
    class_uri: Option<String>,
    creator: &Addr,
) -> Result<NftClass, ContractError> {
    validate_native_class_id(class_id)?;
    if CLASSES.has(storage, class_id) {
        return Err(ContractError::ClassAlreadyExists {
            class_id: class_id.to_string(),
        });
    }

    let class = NftClass {
        class_id: class_id.to_string(),
        class_uri,
        contract: collection_address(class_id),
        minter: creator.clone(),
        origin: ClassOrigin::Native,
    };
    save_class(storage, &class)?;
    Ok(class)
}

/// Look up a wrapped class, creating it on first receipt.
///
/// An existing class is returned untouched; in particular the class uri of a
/// later packet is not applied to it.
pub fn resolve_or_create_class(
    storage: &mut dyn Storage,
    class_id: &str,
    class_uri: Option<String>,
    channel_id: &str,
    bridge: &Addr,
) -> StdResult<(NftClass, bool)> {
    if let Some(class) = CLASSES.may_load(storage, class_id)? {
        return Ok((class, false));
    }

    let class = NftClass {
        class_id: class_id.to_string(),
        class_uri,
        contract: collection_address(class_id),
        minter: bridge.clone(),
        origin: ClassOrigin::Wrapped {
            channel_id: channel_id.to_string(),
        },
    };
    save_class(storage, &class)?;
    Ok((class, true))
}

/// Whether `class` was minted here by an inbound hop on exactly `channel_id`.
/// Sending such a class back over that channel returns it home, so the local
/// representation is burned instead of escrowed.
pub fn is_wrapped_on(class: &NftClass, channel_id: &str) -> bool {
    matches!(&class.origin, ClassOrigin::Wrapped { channel_id: origin } if origin == channel_id)
}

/// Receive side provenance check. Returns the local class id when the token
/// is coming back over the channel we escrowed it for.
pub fn returning_to_source(
    storage: &dyn Storage,
    source: &IbcEndpoint,
    dest_channel: &str,
    class_id: &str,
    token_id: &str,
) -> StdResult<Option<String>> {
    let Some(local_class_id) = try_pop_source_prefix(source, class_id) else {
        return Ok(None);
    };
    let escrowed_here = escrow::escrowed_on(storage, local_class_id, token_id)?
        .map_or(false, |channel_id| channel_id == dest_channel);
    Ok(escrowed_here.then(|| local_class_id.to_string()))
}

fn save_class(storage: &mut dyn Storage, class: &NftClass) -> StdResult<()> {
    CLASSES.save(storage, &class.class_id, class)?;
    CONTRACT_TO_CLASS.save(storage, &class.contract, &class.class_id)
}

fn validate_native_class_id(class_id: &str) -> Result<(), ContractError> {
    if class_id.is_empty() {
        return Err(ContractError::InvalidClassId {
            reason: "class id must not be empty".to_string(),
        });
    }
    if class_id.len() > MAX_NATIVE_CLASS_ID_LEN {
        return Err(ContractError::InvalidClassId {
            reason: format!("class id longer than {} bytes", MAX_NATIVE_CLASS_ID_LEN),
        });
    }
    // '/' is reserved for channel prefixes
    if class_id.contains('/') {
        return Err(ContractError::InvalidClassId {
            reason: "class id must not contain '/'".to_string(),
        });
    }
    Ok(())
}
