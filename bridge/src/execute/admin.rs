//! Admin operations handlers.
//!
//! This module handles:
//! - Pause/unpause of sends and receives
//! - Default packet timeout
//! - Closing a channel from this side

use cosmwasm_std::{DepsMut, Env, IbcMsg, MessageInfo, Response};

use crate::channel;
use crate::error::ContractError;
use crate::state::{Config, CONFIG, MAX_TIMEOUT_SECONDS};

/// Packet timeouts must be positive and at most `MAX_TIMEOUT_SECONDS`.
pub fn validate_timeout_seconds(seconds: u64) -> Result<(), ContractError> {
    if seconds == 0 || seconds > MAX_TIMEOUT_SECONDS {
        return Err(ContractError::InvalidTimeout {
            max: MAX_TIMEOUT_SECONDS,
        });
    }
    Ok(())
}

fn ensure_admin(config: &Config, info: &MessageInfo) -> Result<(), ContractError> {
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized);
    }
    Ok(())
}

// ============================================================================
// Pause/Unpause
// ============================================================================

/// Pause the bridge. Sends fail and received packets are answered with an
/// error ack. Acks and timeouts of packets already in flight still resolve.
pub fn execute_pause(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;

    config.paused = true;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new().add_attribute("method", "pause"))
}

/// Unpause the bridge.
pub fn execute_unpause(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;

    config.paused = false;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new().add_attribute("method", "unpause"))
}

// ============================================================================
// Configuration
// ============================================================================

pub fn execute_set_default_timeout(
    deps: DepsMut,
    info: MessageInfo,
    seconds: u64,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;

    validate_timeout_seconds(seconds)?;
    config.default_timeout_seconds = seconds;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "set_default_timeout")
        .add_attribute("seconds", seconds.to_string()))
}

// ============================================================================
// Channel Close
// ============================================================================

/// Start closing a channel. Pending packets on it are refunded right away
/// and the host is asked to run the close handshake.
pub fn execute_close_channel(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    channel_id: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;

    let drained = channel::request_close(deps.storage, &env.contract.address, &channel_id)?;

    Ok(Response::new()
        .add_message(IbcMsg::CloseChannel {
            channel_id: channel_id.clone(),
        })
        .add_attribute("method", "close_channel")
        .add_attribute("channel_id", channel_id)
        .add_attributes(drained.attributes()))
}
