//! IBC entry points.
//!
//! Channel handshake and close callbacks feed the channel lifecycle manager;
//! packet callbacks feed the bridge state machine. `ibc_packet_receive` never
//! fails: every problem with an incoming packet is answered with an error
//! acknowledgement and leaves storage untouched.

use common::{Ack, NonFungibleTokenPacketData};
use cosmwasm_std::{
    entry_point, Binary, DepsMut, Env, IbcBasicResponse, IbcChannelCloseMsg, IbcChannelConnectMsg,
    IbcChannelOpenMsg, IbcChannelOpenResponse, IbcPacket, IbcPacketAckMsg, IbcPacketReceiveMsg,
    IbcPacketTimeoutMsg, IbcReceiveResponse,
};

use crate::ack;
use crate::channel;
use crate::error::{ContractError, Never};
use crate::execute::receive_packet;
use crate::state::CHANNELS;

/// Sent when an ack can not be serialized. Never expected in practice.
const ACK_ERROR_FALLBACK: &[u8] =
    br#"{"result":"error","message":"failed to encode acknowledgement"}"#;

// ============================================================================
// Channel Handshake
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn ibc_channel_open(
    _deps: DepsMut,
    _env: Env,
    msg: IbcChannelOpenMsg,
) -> Result<IbcChannelOpenResponse, ContractError> {
    channel::validate_order_and_version(msg.channel(), msg.counterparty_version())?;
    Ok(None)
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn ibc_channel_connect(
    deps: DepsMut,
    _env: Env,
    msg: IbcChannelConnectMsg,
) -> Result<IbcBasicResponse, ContractError> {
    channel::validate_order_and_version(msg.channel(), msg.counterparty_version())?;
    let info = channel::open(deps.storage, msg.channel())?;

    Ok(IbcBasicResponse::new()
        .add_attribute("method", "ibc_channel_connect")
        .add_attribute("channel_id", info.id)
        .add_attribute("port", info.port)
        .add_attribute("counterparty_channel_id", info.counterparty_id)
        .add_attribute("connection_id", info.connection_id))
}

// ============================================================================
// Channel Close
// ============================================================================

/// Both close callbacks drain and close the channel. On CloseInit the host is
/// closing a channel we did not ask to close; on CloseConfirm the counterparty
/// did. Either way nothing pending on it can complete any more.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn ibc_channel_close(
    deps: DepsMut,
    env: Env,
    msg: IbcChannelCloseMsg,
) -> Result<IbcBasicResponse, ContractError> {
    let phase = match &msg {
        IbcChannelCloseMsg::CloseInit { .. } => "close_init",
        IbcChannelCloseMsg::CloseConfirm { .. } => "close_confirm",
        _ => "close",
    };
    let channel_id = msg.channel().endpoint.channel_id.clone();

    // handshake never completed
    if !CHANNELS.has(deps.storage, &channel_id) {
        return Ok(IbcBasicResponse::new()
            .add_attribute("method", "ibc_channel_close")
            .add_attribute("phase", phase)
            .add_attribute("channel_id", channel_id));
    }

    let drained = channel::confirm_close(deps.storage, &env.contract.address, &channel_id)?;

    Ok(IbcBasicResponse::new()
        .add_attribute("method", "ibc_channel_close")
        .add_attribute("phase", phase)
        .add_attribute("channel_id", channel_id)
        .add_attributes(drained.attributes()))
}

// ============================================================================
// Packets
// ============================================================================

/// Checks the host applies to a packet before application logic sees it.
/// Only the envelope is inspected here.
pub fn validate_transport_envelope(packet: &IbcPacket) -> Result<(), ContractError> {
    if let Ok(data) = NonFungibleTokenPacketData::decode(&packet.data) {
        if data.class_id.is_empty() {
            return Err(ContractError::TransportRejected {
                reason: "empty class id".to_string(),
            });
        }
    }
    Ok(())
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn ibc_packet_receive(
    deps: DepsMut,
    env: Env,
    msg: IbcPacketReceiveMsg,
) -> Result<IbcReceiveResponse, Never> {
    let packet = msg.packet;
    let result = validate_transport_envelope(&packet)
        .and_then(|_| receive_packet(deps.storage, deps.api, &env, &packet));

    let response = match result {
        Ok(received) => IbcReceiveResponse::new()
            .set_ack(ack_binary(&Ack::Success))
            .add_attribute("method", "ibc_packet_receive")
            .add_attribute("channel_id", packet.dest.channel_id)
            .add_attribute("sequence", packet.sequence.to_string())
            .add_attribute("class_id", received.class_id)
            .add_attribute("delivery", received.delivery.as_str())
            .add_attribute("class_created", received.class_created.to_string())
            .add_attribute("receiver", received.receiver)
            .add_attribute("token_count", received.token_count.to_string()),
        Err(err) => IbcReceiveResponse::new()
            .set_ack(ack_binary(&Ack::error(err.to_string())))
            .add_attribute("method", "ibc_packet_receive")
            .add_attribute("channel_id", packet.dest.channel_id)
            .add_attribute("sequence", packet.sequence.to_string())
            .add_attribute("error", err.to_string()),
    };
    Ok(response)
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn ibc_packet_ack(
    deps: DepsMut,
    env: Env,
    msg: IbcPacketAckMsg,
) -> Result<IbcBasicResponse, ContractError> {
    let packet = msg.original_packet;
    let response = IbcBasicResponse::new()
        .add_attribute("method", "ibc_packet_ack")
        .add_attribute("channel_id", packet.src.channel_id.clone())
        .add_attribute("sequence", packet.sequence.to_string());

    match ack::on_ack(
        deps.storage,
        &env.contract.address,
        &packet,
        &msg.acknowledgement.data,
    ) {
        Ok((ack, resolution)) => {
            let response = response
                .add_attribute("ack", ack.kind())
                .add_attribute("result", resolution.as_str());
            Ok(match ack {
                Ack::Error { message } => response.add_attribute("ack_error", message),
                Ack::Success => response,
            })
        }
        Err(err @ ContractError::UnknownPacket { .. }) => {
            Ok(response.add_attribute("error", err.to_string()))
        }
        Err(err) => Err(err),
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn ibc_packet_timeout(
    deps: DepsMut,
    env: Env,
    msg: IbcPacketTimeoutMsg,
) -> Result<IbcBasicResponse, ContractError> {
    let packet = msg.packet;
    let response = IbcBasicResponse::new()
        .add_attribute("method", "ibc_packet_timeout")
        .add_attribute("channel_id", packet.src.channel_id.clone())
        .add_attribute("sequence", packet.sequence.to_string());

    match ack::on_timeout(deps.storage, &env.contract.address, &packet) {
        Ok(resolution) => Ok(response.add_attribute("result", resolution.as_str())),
        Err(err @ ContractError::UnknownPacket { .. }) => {
            Ok(response.add_attribute("error", err.to_string()))
        }
        Err(err) => Err(err),
    }
}

fn ack_binary(ack: &Ack) -> Binary {
    ack.encode()
        .unwrap_or_else(|_| Binary::from(ACK_ERROR_FALLBACK.to_vec()))
}
