//! Common - Wire Types Shared by NFT Bridge Contracts
//!
//! This package provides the packet payload and acknowledgement envelope that
//! travel between bridge instances on either end of an IBC channel.

pub mod ack;
pub mod packet;

pub use ack::Ack;
pub use packet::{NonFungibleTokenPacketData, PacketError};
