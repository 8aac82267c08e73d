//! Query handlers for the NFT bridge contract.
//!
//! This module contains all query message handlers for retrieving contract state.

use common::Ack;
use cosmwasm_std::{Addr, Deps, Env, Order, StdResult};
use cw_storage_plus::Bound;

use crate::escrow;
use crate::msg::{
    ChannelResponse, ChannelsResponse, ClassResponse, ClassesResponse, ConfigResponse,
    EscrowResponse, NftInfoResponse, OwnerOfResponse, PendingPacketResponse,
    PendingPacketsResponse,
};
use crate::registry;
use crate::state::{
    ChannelInfo, EscrowRecord, NftClass, PendingPacket, CHANNELS, CLASSES, CONFIG, LAST_ACK,
    PENDING_PACKETS, TOKENS,
};

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 50;

// ============================================================================
// Core Queries
// ============================================================================

/// Query contract configuration.
pub fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        admin: config.admin,
        paused: config.paused,
        default_timeout_seconds: config.default_timeout_seconds,
    })
}

// ============================================================================
// Token Queries
// ============================================================================

pub fn query_owner_of(
    deps: Deps,
    env: Env,
    class_id: String,
    token_id: String,
) -> StdResult<OwnerOfResponse> {
    let token = TOKENS.load(deps.storage, (class_id.as_str(), token_id.as_str()))?;
    let escrowed = token.owner == env.contract.address
        && escrow::is_escrowed_here(deps.storage, &class_id, &token_id);
    Ok(OwnerOfResponse {
        owner: token.owner,
        escrowed,
    })
}

pub fn query_nft_info(
    deps: Deps,
    class_id: String,
    token_id: String,
) -> StdResult<NftInfoResponse> {
    let token = TOKENS.load(deps.storage, (class_id.as_str(), token_id.as_str()))?;
    Ok(NftInfoResponse {
        token_uri: token.token_uri,
    })
}

// ============================================================================
// Class Queries
// ============================================================================

/// Collection backing a class.
pub fn query_nft_contract(deps: Deps, class_id: String) -> StdResult<Option<Addr>> {
    Ok(CLASSES
        .may_load(deps.storage, &class_id)?
        .map(|class| class.contract))
}

pub fn query_class_id_for_nft_contract(deps: Deps, contract: String) -> StdResult<Option<String>> {
    // Collection addresses are derived, not bech32, so no addr_validate here.
    registry::class_for_contract(deps.storage, &Addr::unchecked(contract))
}

/// Class level metadata.
pub fn query_metadata(deps: Deps, class_id: String) -> StdResult<Option<String>> {
    Ok(CLASSES
        .may_load(deps.storage, &class_id)?
        .and_then(|class| class.class_uri))
}

pub fn query_class(deps: Deps, class_id: String) -> StdResult<ClassResponse> {
    let class = CLASSES.load(deps.storage, &class_id)?;
    Ok(class_response(class))
}

pub fn query_classes(
    deps: Deps,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<ClassesResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.as_deref().map(|id| Bound::exclusive(id));

    let classes = CLASSES
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| item.map(|(_, class)| class_response(class)))
        .collect::<StdResult<Vec<_>>>()?;

    Ok(ClassesResponse { classes })
}

fn class_response(class: NftClass) -> ClassResponse {
    ClassResponse {
        class_id: class.class_id,
        class_uri: class.class_uri,
        contract: class.contract,
        minter: class.minter,
        origin: class.origin,
    }
}

// ============================================================================
// Escrow & Channel Queries
// ============================================================================

pub fn query_escrow(
    deps: Deps,
    class_id: String,
    token_id: String,
) -> StdResult<Option<EscrowResponse>> {
    Ok(escrow::load_escrow(deps.storage, &class_id, &token_id)?.map(escrow_response))
}

fn escrow_response(record: EscrowRecord) -> EscrowResponse {
    EscrowResponse {
        class_id: record.class_id,
        token_id: record.token_id,
        channel_id: record.channel_id,
        original_owner: record.original_owner,
    }
}

pub fn query_channel(deps: Deps, channel_id: String) -> StdResult<ChannelResponse> {
    let info = CHANNELS.load(deps.storage, &channel_id)?;
    Ok(channel_response(info))
}

pub fn query_channels(
    deps: Deps,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<ChannelsResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.as_deref().map(|id| Bound::exclusive(id));

    let channels = CHANNELS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| item.map(|(_, info)| channel_response(info)))
        .collect::<StdResult<Vec<_>>>()?;

    Ok(ChannelsResponse { channels })
}

fn channel_response(info: ChannelInfo) -> ChannelResponse {
    ChannelResponse {
        channel_id: info.id,
        port: info.port,
        counterparty_channel_id: info.counterparty_id,
        counterparty_port: info.counterparty_port,
        connection_id: info.connection_id,
        state: info.state,
        next_sequence: info.next_sequence,
    }
}

// ============================================================================
// Packet Queries
// ============================================================================

pub fn query_pending_packet(
    deps: Deps,
    channel_id: String,
    sequence: u64,
) -> StdResult<PendingPacketResponse> {
    let packet = PENDING_PACKETS.load(deps.storage, (channel_id.as_str(), sequence))?;
    Ok(packet_response(packet))
}

pub fn query_pending_packets(
    deps: Deps,
    channel_id: String,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<PendingPacketsResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.map(|sequence| Bound::exclusive(sequence));

    let packets = PENDING_PACKETS
        .prefix(channel_id.as_str())
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| item.map(|(_, packet)| packet_response(packet)))
        .collect::<StdResult<Vec<_>>>()?;

    Ok(PendingPacketsResponse { packets })
}

fn packet_response(packet: PendingPacket) -> PendingPacketResponse {
    PendingPacketResponse {
        sequence: packet.sequence,
        channel_id: packet.channel_id,
        class_id: packet.class_id,
        token_ids: packet.token_ids,
        custody: packet.custody,
        sender: packet.sender,
        receiver: packet.receiver,
        timeout_timestamp: packet.timeout_timestamp,
        status: packet.status,
    }
}

pub fn query_last_ack(deps: Deps) -> StdResult<Option<Ack>> {
    LAST_ACK.may_load(deps.storage)
}
