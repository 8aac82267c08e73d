//! Ack processor.
//!
//! Correlates acknowledgements and timeouts with our pending packets by
//! (source channel, sequence) and hands them to the resolver. Anything the
//! counterparty writes that is not a success envelope is treated as a
//! failure, so a garbled ack refunds the sender instead of stranding the
//! tokens.

use common::{Ack, NonFungibleTokenPacketData};
use cosmwasm_std::{Addr, Binary, IbcPacket, Storage};

use crate::error::ContractError;
use crate::execute::{ensure_matches, load_pending, resolve_packet, Resolution};
use crate::state::{PacketOutcome, PendingPacket, LAST_ACK};

/// Decode an acknowledgement envelope, mapping undecodable data to an error
/// ack.
pub fn decode_ack(data: &Binary) -> Ack {
    Ack::decode(data).unwrap_or_else(|err| Ack::error(format!("undecodable ack: {}", err)))
}

/// Handle the acknowledgement of one of our packets.
pub fn on_ack(
    storage: &mut dyn Storage,
    bridge: &Addr,
    packet: &IbcPacket,
    ack_data: &Binary,
) -> Result<(Ack, Resolution), ContractError> {
    let ack = decode_ack(ack_data);
    LAST_ACK.save(storage, &ack)?;

    let pending = matching_pending(storage, packet)?;
    let outcome = if ack.is_success() {
        PacketOutcome::Delivered
    } else {
        PacketOutcome::Failed
    };
    let resolution = resolve_packet(storage, bridge, pending, outcome)?;
    Ok((ack, resolution))
}

/// Handle the timeout of one of our packets.
pub fn on_timeout(
    storage: &mut dyn Storage,
    bridge: &Addr,
    packet: &IbcPacket,
) -> Result<Resolution, ContractError> {
    let pending = matching_pending(storage, packet)?;
    resolve_packet(storage, bridge, pending, PacketOutcome::Failed)
}

fn matching_pending(
    storage: &dyn Storage,
    packet: &IbcPacket,
) -> Result<PendingPacket, ContractError> {
    let pending = load_pending(storage, &packet.src.channel_id, packet.sequence)?;
    let data = NonFungibleTokenPacketData::decode(&packet.data).map_err(|_| {
        ContractError::PacketMismatch {
            channel_id: packet.src.channel_id.clone(),
            sequence: packet.sequence,
        }
    })?;
    ensure_matches(&pending, &data)?;
    Ok(pending)
}
