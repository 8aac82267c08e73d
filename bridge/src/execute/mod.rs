//! Execute handlers for the NFT bridge contract.
//!
//! This module contains the message handlers and the packet state machine,
//! organized by category:
//! - `transfer` - Outgoing NFT transfers (escrow or burn, then SendPacket)
//! - `receive` - Incoming packets (unlock or mint)
//! - `resolve` - Ack and timeout resolution of outgoing packets
//! - `collection` - Native classes, minting and local transfers
//! - `admin` - Pause, unpause, timeout and channel close

mod admin;
mod collection;
mod receive;
mod resolve;
mod transfer;

pub use admin::*;
pub use collection::*;
pub use receive::*;
pub use resolve::*;
pub use transfer::*;
