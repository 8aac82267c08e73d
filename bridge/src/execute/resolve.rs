//! Resolution of outgoing packets: commit on a success ack, refund on an
//! error ack, a timeout, or a channel close.

use common::NonFungibleTokenPacketData;
use cosmwasm_std::{Addr, Storage};

use crate::error::ContractError;
use crate::escrow;
use crate::nft;
use crate::state::{
    Custody, PacketOutcome, PacketStatus, PendingPacket, PENDING_PACKETS, UNRESOLVED_PACKETS,
};

/// What resolving a packet did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Committed,
    Refunded,
    /// The packet had already been resolved; nothing changed.
    AlreadyResolved(PacketStatus),
}

impl Resolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::Committed => "committed",
            Resolution::Refunded => "refunded",
            Resolution::AlreadyResolved(_) => "already_resolved",
        }
    }
}

/// Load the pending record for one of our packets.
pub fn load_pending(
    storage: &dyn Storage,
    channel_id: &str,
    sequence: u64,
) -> Result<PendingPacket, ContractError> {
    PENDING_PACKETS
        .may_load(storage, (channel_id, sequence))?
        .ok_or_else(|| ContractError::UnknownPacket {
            channel_id: channel_id.to_string(),
            sequence,
        })
}

/// Check that a packet handed back by the host is the one we recorded under
/// its sequence.
pub fn ensure_matches(
    pending: &PendingPacket,
    data: &NonFungibleTokenPacketData,
) -> Result<(), ContractError> {
    if pending.class_id != data.class_id || pending.token_ids != data.token_ids {
        return Err(ContractError::PacketMismatch {
            channel_id: pending.channel_id.clone(),
            sequence: pending.sequence,
        });
    }
    Ok(())
}

/// Apply `outcome` to a pending packet. The first outcome wins; later ones
/// are ignored.
pub fn resolve_packet(
    storage: &mut dyn Storage,
    bridge: &Addr,
    mut pending: PendingPacket,
    outcome: PacketOutcome,
) -> Result<Resolution, ContractError> {
    let Some(next) = pending.status.resolve(outcome) else {
        return Ok(Resolution::AlreadyResolved(pending.status));
    };

    if next == PacketStatus::Refunded {
        refund(storage, bridge, &pending)?;
    }

    pending.status = next;
    let key = (pending.channel_id.as_str(), pending.sequence);
    PENDING_PACKETS.save(storage, key, &pending)?;
    UNRESOLVED_PACKETS.remove(storage, key);

    Ok(match next {
        PacketStatus::Refunded => Resolution::Refunded,
        _ => Resolution::Committed,
    })
}

/// Undo what the send did: release escrowed tokens, or re-mint burned ones,
/// back to the sender.
fn refund(
    storage: &mut dyn Storage,
    bridge: &Addr,
    pending: &PendingPacket,
) -> Result<(), ContractError> {
    match pending.custody {
        Custody::Escrowed => {
            for token_id in &pending.token_ids {
                escrow::unlock(
                    storage,
                    bridge,
                    &pending.class_id,
                    token_id,
                    &pending.channel_id,
                    &pending.sender,
                )?;
            }
        }
        Custody::Burned => {
            for (token_id, token_uri) in pending.token_ids.iter().zip(&pending.token_uris) {
                nft::mint(
                    storage,
                    &pending.class_id,
                    token_id,
                    &pending.sender,
                    token_uri.clone(),
                )?;
            }
        }
    }
    Ok(())
}
