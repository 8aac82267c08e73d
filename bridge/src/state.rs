//! State definitions for the NFT bridge contract
//!
//! This module defines all storage structures and state maps: configuration,
//! the channel table, the class registry, the token store, the escrow ledger
//! and the pending packet table.

use common::Ack;
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Empty, Timestamp};
use cw_storage_plus::{Item, Map};

// ============================================================================
// Core Configuration
// ============================================================================

/// Contract configuration
#[cw_serde]
pub struct Config {
    /// Admin address for contract management
    pub admin: Addr,
    /// Whether sends and receives are currently paused
    pub paused: bool,
    /// Timeout applied to outgoing packets when the sender does not give one
    pub default_timeout_seconds: u64,
}

// ============================================================================
// Channels
// ============================================================================

/// Lifecycle of a channel. Moves forward only.
#[cw_serde]
#[derive(Copy, Eq)]
pub enum ChannelState {
    Open,
    Closing,
    Closed,
}

/// A connected IBC channel and its counterparty.
#[cw_serde]
pub struct ChannelInfo {
    /// Local channel id
    pub id: String,
    /// Local port id
    pub port: String,
    pub counterparty_id: String,
    pub counterparty_port: String,
    pub connection_id: String,
    pub state: ChannelState,
    /// Sequence the host will assign to the next packet we send on this
    /// channel. The contract is the only sender on its port.
    pub next_sequence: u64,
}

// ============================================================================
// Class Registry
// ============================================================================

/// Where a class comes from.
#[cw_serde]
pub enum ClassOrigin {
    /// Created on this chain.
    Native,
    /// Minted by an inbound hop on `channel_id`.
    Wrapped { channel_id: String },
}

/// A token class and the collection backing it.
#[cw_serde]
pub struct NftClass {
    pub class_id: String,
    pub class_uri: Option<String>,
    /// Collection address, derived from the class id alone
    pub contract: Addr,
    /// Only the minter may mint into the collection. For wrapped classes
    /// this is the bridge itself.
    pub minter: Addr,
    pub origin: ClassOrigin,
}

/// A single NFT in a collection.
#[cw_serde]
pub struct TokenInfo {
    pub owner: Addr,
    pub token_uri: Option<String>,
}

// ============================================================================
// Escrow Ledger
// ============================================================================

/// A token held by the bridge while its representation lives elsewhere.
#[cw_serde]
pub struct EscrowRecord {
    pub class_id: String,
    pub token_id: String,
    /// Local channel the token was sent out on
    pub channel_id: String,
    pub original_owner: Addr,
}

// ============================================================================
// Pending Packets
// ============================================================================

/// What the send did with the tokens, and therefore what a refund undoes.
#[cw_serde]
#[derive(Copy, Eq)]
pub enum Custody {
    Escrowed,
    Burned,
}

#[cw_serde]
#[derive(Copy, Eq)]
pub enum PacketStatus {
    Pending,
    Committed,
    Refunded,
}

/// How an outgoing packet ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PacketOutcome {
    /// The counterparty acknowledged success.
    Delivered,
    /// Error ack, timeout, or channel close.
    Failed,
}

impl PacketStatus {
    /// Transition table for outgoing packets. `None` means the packet has
    /// already been resolved and the outcome must be ignored.
    pub fn resolve(self, outcome: PacketOutcome) -> Option<PacketStatus> {
        match (self, outcome) {
            (PacketStatus::Pending, PacketOutcome::Delivered) => Some(PacketStatus::Committed),
            (PacketStatus::Pending, PacketOutcome::Failed) => Some(PacketStatus::Refunded),
            (PacketStatus::Committed, _) | (PacketStatus::Refunded, _) => None,
        }
    }
}

/// An outgoing packet awaiting ack or timeout.
#[cw_serde]
pub struct PendingPacket {
    pub sequence: u64,
    pub channel_id: String,
    pub class_id: String,
    pub token_ids: Vec<String>,
    pub token_uris: Vec<Option<String>>,
    pub custody: Custody,
    pub sender: Addr,
    pub receiver: String,
    pub timeout_timestamp: Timestamp,
    pub status: PacketStatus,
}

// ============================================================================
// Constants
// ============================================================================

/// Contract name for cw2 migration info
pub const CONTRACT_NAME: &str = "crates.io:nft-bridge";

/// Contract version for cw2 migration info
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// IBC application version spoken on every channel
pub const IBC_VERSION: &str = "ics721-1";

/// Default packet timeout in seconds (10 minutes)
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 600;

/// Longest packet timeout accepted, in seconds (30 days)
pub const MAX_TIMEOUT_SECONDS: u64 = 30 * 24 * 60 * 60;

// ============================================================================
// Storage
// ============================================================================

pub const CONFIG: Item<Config> = Item::new("config");

/// Key: local channel id
pub const CHANNELS: Map<&str, ChannelInfo> = Map::new("channels");

/// Key: class id
pub const CLASSES: Map<&str, NftClass> = Map::new("classes");

/// Reverse lookup for `NftClass::contract`
pub const CONTRACT_TO_CLASS: Map<&Addr, String> = Map::new("contract_to_class");

/// Key: (class id, token id)
pub const TOKENS: Map<(&str, &str), TokenInfo> = Map::new("tokens");

/// Key: (class id, token id)
pub const ESCROWS: Map<(&str, &str), EscrowRecord> = Map::new("escrows");

/// Key: (local channel id, sequence)
pub const PENDING_PACKETS: Map<(&str, u64), PendingPacket> = Map::new("pending_packets");

/// Key: (local channel id, sequence). Only packets still in `Pending`, so a
/// channel close visits those without scanning its resolved history.
pub const UNRESOLVED_PACKETS: Map<(&str, u64), Empty> = Map::new("unresolved_packets");

/// Most recent acknowledgement processed for one of our packets
pub const LAST_ACK: Item<Ack> = Item::new("last_ack");
