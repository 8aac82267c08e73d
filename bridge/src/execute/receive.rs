//! Incoming packet handler.
//!
//! Runs inside a storage transaction: either every token in the packet is
//! delivered or nothing the packet touched changes.

use common::NonFungibleTokenPacketData;
use cosmwasm_std::{Addr, Api, Env, IbcPacket, Storage};

use crate::channel;
use crate::error::ContractError;
use crate::escrow;
use crate::nft;
use crate::registry;
use crate::state::CONFIG;
use crate::transaction::transactional;

/// How the tokens of a received packet were delivered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// Tokens came home and were released from escrow.
    Unlocked,
    /// Tokens are new here and were minted into a wrapped class.
    Minted,
}

impl Delivery {
    pub fn as_str(&self) -> &'static str {
        match self {
            Delivery::Unlocked => "unlocked",
            Delivery::Minted => "minted",
        }
    }
}

/// Summary of a successfully received packet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Received {
    /// Class id of the tokens on this chain
    pub class_id: String,
    pub delivery: Delivery,
    pub receiver: Addr,
    pub token_count: usize,
    /// Whether this packet created the wrapped class
    pub class_created: bool,
}

/// Apply an incoming packet. On error no storage write is kept.
pub fn receive_packet(
    storage: &mut dyn Storage,
    api: &dyn Api,
    env: &Env,
    packet: &IbcPacket,
) -> Result<Received, ContractError> {
    transactional(storage, |tx| apply_packet(tx, api, env, packet))
}

fn apply_packet(
    storage: &mut dyn Storage,
    api: &dyn Api,
    env: &Env,
    packet: &IbcPacket,
) -> Result<Received, ContractError> {
    if CONFIG.load(storage)?.paused {
        return Err(ContractError::BridgePaused);
    }

    let dest_channel = packet.dest.channel_id.as_str();
    channel::require_open(storage, dest_channel)?;

    let data = NonFungibleTokenPacketData::decode(&packet.data)?;
    data.validate()?;
    let receiver = api.addr_validate(&data.receiver)?;
    let bridge = &env.contract.address;

    match returning_class(storage, packet, &data)? {
        Some(local_class_id) => {
            for token_id in &data.token_ids {
                escrow::unlock(
                    storage,
                    bridge,
                    &local_class_id,
                    token_id,
                    dest_channel,
                    &receiver,
                )?;
            }
            Ok(Received {
                class_id: local_class_id,
                delivery: Delivery::Unlocked,
                receiver,
                token_count: data.token_ids.len(),
                class_created: false,
            })
        }
        None => {
            let class_id = registry::derive_inbound_class_id(&packet.dest, &data.class_id);
            let (class, class_created) = registry::resolve_or_create_class(
                storage,
                &class_id,
                data.class_uri.clone(),
                dest_channel,
                bridge,
            )?;
            for (token_id, token_uri) in data.tokens() {
                nft::mint(storage, &class.class_id, token_id, &receiver, token_uri.clone())?;
            }
            Ok(Received {
                class_id: class.class_id,
                delivery: Delivery::Minted,
                receiver,
                token_count: data.token_ids.len(),
                class_created,
            })
        }
    }
}

/// Decide once for the whole packet whether its tokens are coming home.
/// Every token must agree.
fn returning_class(
    storage: &dyn Storage,
    packet: &IbcPacket,
    data: &NonFungibleTokenPacketData,
) -> Result<Option<String>, ContractError> {
    let mut decision: Option<Option<String>> = None;
    for token_id in &data.token_ids {
        let local = registry::returning_to_source(
            storage,
            &packet.src,
            &packet.dest.channel_id,
            &data.class_id,
            token_id,
        )?;
        match &decision {
            None => decision = Some(local),
            Some(previous) if previous.is_some() != local.is_some() => {
                return Err(ContractError::InvalidTransferBothActions);
            }
            Some(_) => {}
        }
    }
    Ok(decision.flatten())
}
