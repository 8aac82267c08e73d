//! NFT Bridge Contract - Entry Points
//!
//! Instantiate, execute, query and migrate. The IBC entry points live in
//! `ibc`. Handlers are split into:
//! - `execute/` - Execute message handlers and the packet state machine
//! - `query` - Query message handlers

use cosmwasm_std::{
    entry_point, to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult,
};
use cw2::set_contract_version;

use crate::error::ContractError;
use crate::execute::{
    execute_close_channel, execute_create_class, execute_mint, execute_pause, execute_send_nft,
    execute_set_default_timeout, execute_transfer_nft, execute_unpause, validate_timeout_seconds,
};
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query::{
    query_channel, query_channels, query_class, query_class_id_for_nft_contract, query_classes,
    query_config, query_escrow, query_last_ack, query_metadata, query_nft_contract,
    query_nft_info, query_owner_of, query_pending_packet, query_pending_packets,
};
use crate::state::{Config, CONFIG, CONTRACT_NAME, CONTRACT_VERSION, DEFAULT_TIMEOUT_SECONDS};

// ============================================================================
// Instantiate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let admin = deps.api.addr_validate(&msg.admin)?;

    let default_timeout_seconds = msg
        .default_timeout_seconds
        .unwrap_or(DEFAULT_TIMEOUT_SECONDS);
    validate_timeout_seconds(default_timeout_seconds)?;

    let config = Config {
        admin,
        paused: false,
        default_timeout_seconds,
    };
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("admin", config.admin)
        .add_attribute(
            "default_timeout_seconds",
            default_timeout_seconds.to_string(),
        ))
}

// ============================================================================
// Execute
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        // Collections
        ExecuteMsg::CreateClass {
            class_id,
            class_uri,
        } => execute_create_class(deps, info, class_id, class_uri),
        ExecuteMsg::Mint {
            class_id,
            token_id,
            token_uri,
            owner,
        } => execute_mint(deps, info, class_id, token_id, token_uri, owner),
        ExecuteMsg::TransferNft {
            class_id,
            token_id,
            recipient,
        } => execute_transfer_nft(deps, info, class_id, token_id, recipient),

        // Bridging
        ExecuteMsg::SendNft {
            class_id,
            token_ids,
            receiver,
            channel_id,
            timeout_seconds,
        } => execute_send_nft(
            deps,
            env,
            info,
            class_id,
            token_ids,
            receiver,
            channel_id,
            timeout_seconds,
        ),

        // Admin
        ExecuteMsg::CloseChannel { channel_id } => {
            execute_close_channel(deps, env, info, channel_id)
        }
        ExecuteMsg::Pause {} => execute_pause(deps, info),
        ExecuteMsg::Unpause {} => execute_unpause(deps, info),
        ExecuteMsg::SetDefaultTimeout { seconds } => {
            execute_set_default_timeout(deps, info, seconds)
        }
    }
}

// ============================================================================
// Query
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),

        // Tokens & classes
        QueryMsg::OwnerOf { class_id, token_id } => {
            to_json_binary(&query_owner_of(deps, env, class_id, token_id)?)
        }
        QueryMsg::NftInfo { class_id, token_id } => {
            to_json_binary(&query_nft_info(deps, class_id, token_id)?)
        }
        QueryMsg::NftContract { class_id } => to_json_binary(&query_nft_contract(deps, class_id)?),
        QueryMsg::ClassIdForNftContract { contract } => {
            to_json_binary(&query_class_id_for_nft_contract(deps, contract)?)
        }
        QueryMsg::Metadata { class_id } => to_json_binary(&query_metadata(deps, class_id)?),
        QueryMsg::Class { class_id } => to_json_binary(&query_class(deps, class_id)?),
        QueryMsg::Classes { start_after, limit } => {
            to_json_binary(&query_classes(deps, start_after, limit)?)
        }

        // Escrow & channels
        QueryMsg::Escrow { class_id, token_id } => {
            to_json_binary(&query_escrow(deps, class_id, token_id)?)
        }
        QueryMsg::Channel { channel_id } => to_json_binary(&query_channel(deps, channel_id)?),
        QueryMsg::Channels { start_after, limit } => {
            to_json_binary(&query_channels(deps, start_after, limit)?)
        }

        // Packets
        QueryMsg::PendingPacket {
            channel_id,
            sequence,
        } => to_json_binary(&query_pending_packet(deps, channel_id, sequence)?),
        QueryMsg::PendingPackets {
            channel_id,
            start_after,
            limit,
        } => to_json_binary(&query_pending_packets(
            deps,
            channel_id,
            start_after,
            limit,
        )?),
        QueryMsg::LastAck {} => to_json_binary(&query_last_ack(deps)?),
    }
}

// ============================================================================
// Migrate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("method", "migrate")
        .add_attribute("version", CONTRACT_VERSION))
}
