//! Escrow ledger.
//!
//! Tracks tokens held by the bridge on behalf of their owners while a
//! representation of them exists on another chain. A record is keyed by
//! (class id, token id) and remembers the channel the token left on; only a
//! packet arriving on that same channel, or a refund of the send, can release
//! it.

use cosmwasm_std::{Addr, StdResult, Storage};

use crate::error::ContractError;
use crate::nft;
use crate::state::{EscrowRecord, ESCROWS};

/// Move a token from `owner` into bridge custody for `channel_id`.
pub fn escrow(
    storage: &mut dyn Storage,
    bridge: &Addr,
    class_id: &str,
    token_id: &str,
    channel_id: &str,
    owner: &Addr,
) -> Result<EscrowRecord, ContractError> {
    if ESCROWS.has(storage, (class_id, token_id)) {
        return Err(ContractError::AlreadyEscrowed {
            class_id: class_id.to_string(),
            token_id: token_id.to_string(),
        });
    }

    nft::transfer(storage, class_id, token_id, owner, bridge)?;

    let record = EscrowRecord {
        class_id: class_id.to_string(),
        token_id: token_id.to_string(),
        channel_id: channel_id.to_string(),
        original_owner: owner.clone(),
    };
    ESCROWS.save(storage, (class_id, token_id), &record)?;
    Ok(record)
}

/// Release a token escrowed for exactly `channel_id` to `recipient`.
pub fn unlock(
    storage: &mut dyn Storage,
    bridge: &Addr,
    class_id: &str,
    token_id: &str,
    channel_id: &str,
    recipient: &Addr,
) -> Result<EscrowRecord, ContractError> {
    let record = ESCROWS
        .may_load(storage, (class_id, token_id))?
        .filter(|record| record.channel_id == channel_id)
        .ok_or_else(|| ContractError::NotEscrowed {
            class_id: class_id.to_string(),
            token_id: token_id.to_string(),
            channel_id: channel_id.to_string(),
        })?;

    ESCROWS.remove(storage, (class_id, token_id));
    nft::transfer(storage, class_id, token_id, bridge, recipient)?;
    Ok(record)
}

/// Channel a token is escrowed for, if any.
pub fn escrowed_on(
    storage: &dyn Storage,
    class_id: &str,
    token_id: &str,
) -> StdResult<Option<String>> {
    Ok(ESCROWS
        .may_load(storage, (class_id, token_id))?
        .map(|record| record.channel_id))
}

pub fn is_escrowed_here(storage: &dyn Storage, class_id: &str, token_id: &str) -> bool {
    ESCROWS.has(storage, (class_id, token_id))
}

pub fn load_escrow(
    storage: &dyn Storage,
    class_id: &str,
    token_id: &str,
) -> StdResult<Option<EscrowRecord>> {
    ESCROWS.may_load(storage, (class_id, token_id))
}
