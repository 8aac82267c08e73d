//! Message types for the NFT bridge contract
//!
//! This module defines all messages for instantiation, execution, and queries.
//! Packet payloads and acknowledgements live in the `common` package.

use common::Ack;
use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Timestamp};

use crate::state::{ChannelState, ClassOrigin, Custody, PacketStatus};

// ============================================================================
// Instantiate & Migrate
// ============================================================================

/// Migrate message
#[cw_serde]
pub struct MigrateMsg {}

/// Instantiate message
#[cw_serde]
pub struct InstantiateMsg {
    /// Admin address for contract management
    pub admin: String,
    /// Timeout for outgoing packets when a send does not specify one.
    /// Defaults to 10 minutes.
    pub default_timeout_seconds: Option<u64>,
}

// ============================================================================
// Execute Messages
// ============================================================================

/// Execute messages
#[cw_serde]
pub enum ExecuteMsg {
    // ========================================================================
    // Collections
    // ========================================================================
    /// Create a native class on this chain. The sender becomes its minter.
    CreateClass {
        /// Must be non-empty and must not contain '/'
        class_id: String,
        class_uri: Option<String>,
    },

    /// Mint a token. Class minter only.
    Mint {
        class_id: String,
        token_id: String,
        token_uri: Option<String>,
        owner: String,
    },

    /// Transfer a token to another account on this chain
    TransferNft {
        class_id: String,
        token_id: String,
        recipient: String,
    },

    // ========================================================================
    // Bridging
    // ========================================================================
    /// Send tokens of one class over an IBC channel.
    ///
    /// Tokens that originally arrived over `channel_id` are burned; all
    /// others are escrowed. Resolved later by the ack or timeout.
    SendNft {
        class_id: String,
        token_ids: Vec<String>,
        /// Receiver on the counterparty chain
        receiver: String,
        channel_id: String,
        /// Overrides the configured default timeout
        timeout_seconds: Option<u64>,
    },

    // ========================================================================
    // Admin Operations
    // ========================================================================
    /// Close a channel. Refunds everything pending on it (admin only)
    CloseChannel { channel_id: String },

    /// Pause sends and receives (admin only)
    Pause {},

    /// Unpause (admin only)
    Unpause {},

    /// Set the default packet timeout (admin only)
    SetDefaultTimeout { seconds: u64 },
}

// ============================================================================
// Query Messages
// ============================================================================

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},

    // ========================================================================
    // Tokens & Classes
    // ========================================================================
    /// Owner of a token
    #[returns(OwnerOfResponse)]
    OwnerOf { class_id: String, token_id: String },

    /// Metadata of a token
    #[returns(NftInfoResponse)]
    NftInfo { class_id: String, token_id: String },

    /// Collection address backing a class. `None` if the class is unknown.
    #[returns(Option<Addr>)]
    NftContract { class_id: String },

    /// Class backed by a collection address. `None` if unknown.
    #[returns(Option<String>)]
    ClassIdForNftContract { contract: String },

    /// Class level metadata uri
    #[returns(Option<String>)]
    Metadata { class_id: String },

    #[returns(ClassResponse)]
    Class { class_id: String },

    #[returns(ClassesResponse)]
    Classes {
        start_after: Option<String>,
        limit: Option<u32>,
    },

    // ========================================================================
    // Escrow & Channels
    // ========================================================================
    /// Escrow record of a token, if it is held by the bridge
    #[returns(Option<EscrowResponse>)]
    Escrow { class_id: String, token_id: String },

    #[returns(ChannelResponse)]
    Channel { channel_id: String },

    #[returns(ChannelsResponse)]
    Channels {
        start_after: Option<String>,
        limit: Option<u32>,
    },

    // ========================================================================
    // Packets
    // ========================================================================
    #[returns(PendingPacketResponse)]
    PendingPacket { channel_id: String, sequence: u64 },

    /// Outgoing packets on a channel, in sequence order
    #[returns(PendingPacketsResponse)]
    PendingPackets {
        channel_id: String,
        start_after: Option<u64>,
        limit: Option<u32>,
    },

    /// Most recent acknowledgement received for one of our packets
    #[returns(Option<Ack>)]
    LastAck {},
}

// ============================================================================
// Query Responses
// ============================================================================

#[cw_serde]
pub struct ConfigResponse {
    pub admin: Addr,
    pub paused: bool,
    pub default_timeout_seconds: u64,
}

#[cw_serde]
pub struct OwnerOfResponse {
    pub owner: Addr,
    /// Whether the owner is the bridge holding the token in escrow
    pub escrowed: bool,
}

#[cw_serde]
pub struct NftInfoResponse {
    pub token_uri: Option<String>,
}

#[cw_serde]
pub struct ClassResponse {
    pub class_id: String,
    pub class_uri: Option<String>,
    pub contract: Addr,
    pub minter: Addr,
    pub origin: ClassOrigin,
}

#[cw_serde]
pub struct ClassesResponse {
    pub classes: Vec<ClassResponse>,
}

#[cw_serde]
pub struct EscrowResponse {
    pub class_id: String,
    pub token_id: String,
    pub channel_id: String,
    pub original_owner: Addr,
}

#[cw_serde]
pub struct ChannelResponse {
    pub channel_id: String,
    pub port: String,
    pub counterparty_channel_id: String,
    pub counterparty_port: String,
    pub connection_id: String,
    pub state: ChannelState,
    pub next_sequence: u64,
}

#[cw_serde]
pub struct ChannelsResponse {
    pub channels: Vec<ChannelResponse>,
}

#[cw_serde]
pub struct PendingPacketResponse {
    pub sequence: u64,
    pub channel_id: String,
    pub class_id: String,
    pub token_ids: Vec<String>,
    pub custody: Custody,
    pub sender: Addr,
    pub receiver: String,
    pub timeout_timestamp: Timestamp,
    pub status: PacketStatus,
}

#[cw_serde]
pub struct PendingPacketsResponse {
    pub packets: Vec<PendingPacketResponse>,
}
