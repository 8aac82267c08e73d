//! Error types for the NFT bridge contract

use common::PacketError;
use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Invalid packet: {0}")]
    Packet(#[from] PacketError),

    // ========================================================================
    // Authorization Errors
    // ========================================================================

    #[error("Unauthorized: only admin can perform this action")]
    Unauthorized,

    #[error("Unauthorized: only the class minter can mint {class_id}")]
    NotMinter { class_id: String },

    #[error("Unauthorized: {sender} does not own token {token_id} of {class_id}")]
    NotTokenOwner {
        class_id: String,
        token_id: String,
        sender: String,
    },

    // ========================================================================
    // Bridge State Errors
    // ========================================================================

    #[error("Bridge is paused")]
    BridgePaused,

    #[error("Invalid timeout: must be between 1 and {max} seconds")]
    InvalidTimeout { max: u64 },

    // ========================================================================
    // Channel Errors
    // ========================================================================

    #[error("Unknown channel: {channel_id}")]
    UnknownChannel { channel_id: String },

    #[error("Channel {channel_id} is not open")]
    ChannelNotOpen { channel_id: String },

    #[error("Channel {channel_id} is closed")]
    ChannelClosed { channel_id: String },

    #[error("Channel {channel_id} already exists and can not be reopened")]
    ChannelAlreadyExists { channel_id: String },

    #[error("Only unordered channels are supported")]
    OrderedChannel,

    #[error("Invalid IBC version: expected {expected}, got {actual}")]
    InvalidVersion { actual: String, expected: String },

    // ========================================================================
    // Class Registry Errors
    // ========================================================================

    #[error("Class not found: {class_id}")]
    ClassNotFound { class_id: String },

    #[error("Class already exists: {class_id}")]
    ClassAlreadyExists { class_id: String },

    #[error("Invalid class id: {reason}")]
    InvalidClassId { reason: String },

    // ========================================================================
    // Token Errors
    // ========================================================================

    #[error("Token {token_id} of {class_id} not found")]
    TokenNotFound { class_id: String, token_id: String },

    #[error("Token {token_id} of {class_id} already exists")]
    TokenAlreadyExists { class_id: String, token_id: String },

    #[error("No token ids given")]
    NoTokens,

    #[error("Token id must not be empty")]
    EmptyTokenId,

    #[error("Duplicate token id: {token_id}")]
    DuplicateTokenId { token_id: String },

    // ========================================================================
    // Escrow Ledger Errors
    // ========================================================================

    #[error("Token {token_id} of {class_id} is already escrowed")]
    AlreadyEscrowed { class_id: String, token_id: String },

    #[error("Token {token_id} of {class_id} is not escrowed on channel {channel_id}")]
    NotEscrowed {
        class_id: String,
        token_id: String,
        channel_id: String,
    },

    // ========================================================================
    // Packet Lifecycle Errors
    // ========================================================================

    #[error("Unknown packet: sequence {sequence} on channel {channel_id}")]
    UnknownPacket { channel_id: String, sequence: u64 },

    #[error("Packet {sequence} on channel {channel_id} does not match the pending record")]
    PacketMismatch { channel_id: String, sequence: u64 },

    #[error("Packet mixes tokens returning home with tokens new to this chain")]
    InvalidTransferBothActions,

    #[error("Transport rejected packet: {reason}")]
    TransportRejected { reason: String },
}

/// Error type for entry points that must not fail, such as
/// `ibc_packet_receive`. Has no values.
#[derive(Error, Debug)]
pub enum Never {}
