//! Outgoing transfer handler.
//!
//! A send either escrows the tokens (they belong here, or came from a
//! different channel than the one they leave on) or burns them (they are the
//! local representation of tokens that originated across this very channel).
//! Either way a pending record is written so the ack or timeout can finish
//! the job.

use std::collections::BTreeSet;

use common::NonFungibleTokenPacketData;
use cosmwasm_std::{DepsMut, Empty, Env, IbcMsg, IbcTimeout, MessageInfo, Response, Timestamp};

use crate::channel;
use crate::error::ContractError;
use crate::escrow;
use crate::execute::validate_timeout_seconds;
use crate::nft;
use crate::registry;
use crate::state::{
    Custody, PacketStatus, PendingPacket, CONFIG, MAX_TIMEOUT_SECONDS, PENDING_PACKETS,
    UNRESOLVED_PACKETS,
};

/// Send tokens of one class to `receiver` on the other side of `channel_id`.
#[allow(clippy::too_many_arguments)]
pub fn execute_send_nft(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    class_id: String,
    token_ids: Vec<String>,
    receiver: String,
    channel_id: String,
    timeout_seconds: Option<u64>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if config.paused {
        return Err(ContractError::BridgePaused);
    }

    let mut channel_info = channel::require_open(deps.storage, &channel_id)?;

    if token_ids.is_empty() {
        return Err(ContractError::NoTokens);
    }
    let mut seen = BTreeSet::new();
    for token_id in &token_ids {
        if !seen.insert(token_id.as_str()) {
            return Err(ContractError::DuplicateTokenId {
                token_id: token_id.clone(),
            });
        }
    }

    let timeout_seconds = timeout_seconds.unwrap_or(config.default_timeout_seconds);
    validate_timeout_seconds(timeout_seconds)?;

    let class = registry::load_class(deps.storage, &class_id)?;
    let custody = if registry::is_wrapped_on(&class, &channel_id) {
        Custody::Burned
    } else {
        Custody::Escrowed
    };

    let bridge = env.contract.address.clone();
    let mut token_uris = Vec::with_capacity(token_ids.len());
    for token_id in &token_ids {
        let token = nft::ensure_owner(deps.storage, &class_id, token_id, &info.sender)?;
        match custody {
            Custody::Escrowed => {
                escrow::escrow(
                    deps.storage,
                    &bridge,
                    &class_id,
                    token_id,
                    &channel_id,
                    &info.sender,
                )?;
            }
            Custody::Burned => {
                nft::burn(deps.storage, &class_id, token_id)?;
            }
        }
        token_uris.push(token.token_uri);
    }

    let sequence = channel::next_sequence(deps.storage, &mut channel_info)?;
    let timeout_timestamp = timeout_after(env.block.time, timeout_seconds)?;

    let pending = PendingPacket {
        sequence,
        channel_id: channel_id.clone(),
        class_id: class_id.clone(),
        token_ids: token_ids.clone(),
        token_uris: token_uris.clone(),
        custody,
        sender: info.sender.clone(),
        receiver: receiver.clone(),
        timeout_timestamp,
        status: PacketStatus::Pending,
    };
    PENDING_PACKETS.save(deps.storage, (channel_id.as_str(), sequence), &pending)?;
    UNRESOLVED_PACKETS.save(deps.storage, (channel_id.as_str(), sequence), &Empty {})?;

    let data = NonFungibleTokenPacketData {
        class_id: class_id.clone(),
        class_uri: class.class_uri,
        token_ids,
        token_uris,
        sender: info.sender.to_string(),
        receiver: receiver.clone(),
    };

    let send_packet = IbcMsg::SendPacket {
        channel_id: channel_id.clone(),
        data: data.encode()?,
        timeout: IbcTimeout::with_timestamp(timeout_timestamp),
    };

    Ok(Response::new()
        .add_message(send_packet)
        .add_attribute("method", "send_nft")
        .add_attribute("class_id", class_id)
        .add_attribute("token_count", data.token_ids.len().to_string())
        .add_attribute("custody", custody_str(custody))
        .add_attribute("sender", info.sender)
        .add_attribute("receiver", receiver)
        .add_attribute("channel_id", channel_id)
        .add_attribute("sequence", sequence.to_string()))
}

/// `now + seconds`, failing instead of overflowing.
fn timeout_after(now: Timestamp, seconds: u64) -> Result<Timestamp, ContractError> {
    seconds
        .checked_mul(1_000_000_000)
        .and_then(|nanos| now.nanos().checked_add(nanos))
        .map(Timestamp::from_nanos)
        .ok_or(ContractError::InvalidTimeout {
            max: MAX_TIMEOUT_SECONDS,
        })
}

fn custody_str(custody: Custody) -> &'static str {
    match custody {
        Custody::Escrowed => "escrowed",
        Custody::Burned => "burned",
    }
}
