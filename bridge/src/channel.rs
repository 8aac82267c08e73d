//! Channel lifecycle manager.
//!
//! Keeps the table of channels this bridge has connected and walks each one
//! through OPEN -> CLOSING -> CLOSED. Closing a channel drains it: every
//! packet still pending on it is refunded, since no ack or timeout for those
//! packets can be trusted to arrive once the channel is gone.

use cosmwasm_std::{Addr, Attribute, IbcChannel, IbcOrder, Order, StdResult, Storage};

use crate::error::ContractError;
use crate::execute::{load_pending, resolve_packet};
use crate::state::{
    ChannelInfo, ChannelState, PacketOutcome, CHANNELS, IBC_VERSION, UNRESOLVED_PACKETS,
};
use crate::transaction::transactional;

// ============================================================================
// Handshake
// ============================================================================

/// Check the channel parameters proposed during the handshake.
pub fn validate_order_and_version(
    channel: &IbcChannel,
    counterparty_version: Option<&str>,
) -> Result<(), ContractError> {
    if channel.order != IbcOrder::Unordered {
        return Err(ContractError::OrderedChannel);
    }

    if channel.version != IBC_VERSION {
        return Err(ContractError::InvalidVersion {
            actual: channel.version.clone(),
            expected: IBC_VERSION.to_string(),
        });
    }

    if let Some(version) = counterparty_version {
        if version != IBC_VERSION {
            return Err(ContractError::InvalidVersion {
                actual: version.to_string(),
                expected: IBC_VERSION.to_string(),
            });
        }
    }

    Ok(())
}

/// Record a channel whose handshake just completed.
///
/// Channel ids are never reused, so a connect for an id we already know is
/// refused rather than resurrecting a closed channel.
pub fn open(storage: &mut dyn Storage, channel: &IbcChannel) -> Result<ChannelInfo, ContractError> {
    validate_order_and_version(channel, None)?;

    let id = channel.endpoint.channel_id.as_str();
    if CHANNELS.has(storage, id) {
        return Err(ContractError::ChannelAlreadyExists {
            channel_id: id.to_string(),
        });
    }

    let info = ChannelInfo {
        id: id.to_string(),
        port: channel.endpoint.port_id.clone(),
        counterparty_id: channel.counterparty_endpoint.channel_id.clone(),
        counterparty_port: channel.counterparty_endpoint.port_id.clone(),
        connection_id: channel.connection_id.clone(),
        state: ChannelState::Open,
        next_sequence: 1,
    };
    CHANNELS.save(storage, id, &info)?;
    Ok(info)
}

// ============================================================================
// Lookups
// ============================================================================

pub fn load(storage: &dyn Storage, channel_id: &str) -> Result<ChannelInfo, ContractError> {
    CHANNELS
        .may_load(storage, channel_id)?
        .ok_or_else(|| ContractError::UnknownChannel {
            channel_id: channel_id.to_string(),
        })
}

/// Load a channel that can carry new packets.
pub fn require_open(storage: &dyn Storage, channel_id: &str) -> Result<ChannelInfo, ContractError> {
    let info = load(storage, channel_id)?;
    match info.state {
        ChannelState::Open => Ok(info),
        ChannelState::Closing => Err(ContractError::ChannelNotOpen {
            channel_id: channel_id.to_string(),
        }),
        ChannelState::Closed => Err(ContractError::ChannelClosed {
            channel_id: channel_id.to_string(),
        }),
    }
}

/// Take the sequence the host will assign to the next packet sent on
/// `info`, and advance the counter.
pub fn next_sequence(storage: &mut dyn Storage, info: &mut ChannelInfo) -> StdResult<u64> {
    let sequence = info.next_sequence;
    info.next_sequence += 1;
    CHANNELS.save(storage, &info.id, info)?;
    Ok(sequence)
}

// ============================================================================
// Close
// ============================================================================

/// Outcome of draining a channel.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Drained {
    /// Sequences refunded by this drain
    pub refunded: Vec<u64>,
    /// Sequences whose refund failed. They stay `Pending` and can still be
    /// resolved by a later ack or timeout.
    pub stuck: Vec<u64>,
}

impl Drained {
    /// `refunded` count, plus `refund_failed` listing stuck sequences if any.
    pub fn attributes(&self) -> Vec<Attribute> {
        let mut attrs = vec![Attribute::new("refunded", self.refunded.len().to_string())];
        if !self.stuck.is_empty() {
            let stuck: Vec<String> = self.stuck.iter().map(u64::to_string).collect();
            attrs.push(Attribute::new("refund_failed", stuck.join(",")));
        }
        attrs
    }
}

/// Move an open channel to CLOSING and refund everything pending on it.
pub fn request_close(
    storage: &mut dyn Storage,
    bridge: &Addr,
    channel_id: &str,
) -> Result<Drained, ContractError> {
    let mut info = load(storage, channel_id)?;
    match info.state {
        ChannelState::Closed => return Ok(Drained::default()),
        ChannelState::Closing => {}
        ChannelState::Open => {
            info.state = ChannelState::Closing;
            CHANNELS.save(storage, channel_id, &info)?;
        }
    }
    drain(storage, bridge, channel_id)
}

/// Mark a channel CLOSED, draining it first if that has not happened yet.
pub fn confirm_close(
    storage: &mut dyn Storage,
    bridge: &Addr,
    channel_id: &str,
) -> Result<Drained, ContractError> {
    let drained = request_close(storage, bridge, channel_id)?;

    let mut info = load(storage, channel_id)?;
    if info.state != ChannelState::Closed {
        info.state = ChannelState::Closed;
        CHANNELS.save(storage, channel_id, &info)?;
    }
    Ok(drained)
}

/// Refund every unresolved packet on the channel. Each refund runs in its own
/// transaction so one that can not be applied does not block the rest.
fn drain(
    storage: &mut dyn Storage,
    bridge: &Addr,
    channel_id: &str,
) -> Result<Drained, ContractError> {
    let sequences: Vec<u64> = UNRESOLVED_PACKETS
        .prefix(channel_id)
        .keys(storage, None, None, Order::Ascending)
        .collect::<StdResult<_>>()?;

    let mut drained = Drained::default();
    for sequence in sequences {
        let packet = load_pending(storage, channel_id, sequence)?;
        let refund = transactional(storage, |tx| {
            resolve_packet(tx, bridge, packet, PacketOutcome::Failed)
        });
        match refund {
            Ok(_) => drained.refunded.push(sequence),
            Err(_) => drained.stuck.push(sequence),
        }
    }
    Ok(drained)
}
