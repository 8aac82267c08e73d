//! NFT Bridge Contract - ICS-721 style NFT transfers over IBC
//!
//! Moves non-fungible tokens between chains over unordered IBC channels
//! speaking `ics721-1`. Every chain runs its own instance of this contract;
//! instances only coordinate through packets, acks and timeouts.
//!
//! # Outgoing Flow
//! 1. Owner calls `SendNft` naming a connected channel
//! 2. Tokens native to this side of the channel are escrowed; wrapped tokens
//!    that originally came over that channel are burned
//! 3. A pending packet record is written and the packet is handed to IBC
//! 4. A success ack commits the record; an error ack, a timeout or a channel
//!    close refunds the owner
//!
//! # Incoming Flow
//! 1. Relayer delivers a packet to `ibc_packet_receive`
//! 2. If the class id carries the sender's prefix and the tokens are escrowed
//!    here for this exact channel, they are released to the receiver
//! 3. Otherwise the tokens are minted into the wrapped class
//!    `{port}/{channel}/{class id}`, created on first use
//! 4. Any failure answers with an error ack and leaves state untouched
//!
//! # Security
//! - Provenance is channel-scoped; a class id that is valid on some other
//!   channel never releases escrow
//! - Acks and timeouts resolve a packet at most once
//! - Closing a channel refunds everything still pending on it
//! - Emergency pause of sends and receives

pub mod ack;
pub mod channel;
pub mod contract;
pub mod error;
pub mod escrow;
mod execute;
pub mod hash;
pub mod ibc;
pub mod msg;
pub mod nft;
mod query;
pub mod registry;
pub mod state;
pub mod transaction;

pub use crate::error::ContractError;
pub use crate::execute::{Delivery, Received, Resolution};
pub use crate::hash::{collection_address, keccak256};
