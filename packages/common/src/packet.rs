//! NFT transfer packet payload.
//!
//! The payload is JSON with camelCase field names so that it matches what
//! other ICS-721 implementations put on the wire. Parsing is lenient (unknown
//! fields are ignored) because the data arrives from a foreign chain.

use std::collections::BTreeSet;

use cosmwasm_std::{from_json, to_json_binary, Binary, StdResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Packet data carried by every NFT transfer.
#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NonFungibleTokenPacketData {
    /// Class the tokens belong to, as seen on the sending chain.
    pub class_id: String,
    /// Collection level metadata. Not validated.
    #[serde(default)]
    pub class_uri: Option<String>,
    /// Tokens being transferred. Must be non-empty and free of duplicates.
    pub token_ids: Vec<String>,
    /// `token_uris[i]` is the metadata of `token_ids[i]`.
    pub token_uris: Vec<Option<String>>,
    /// Sender on the sending chain.
    pub sender: String,
    /// Receiver on the receiving chain, in that chain's address format.
    pub receiver: String,
}

/// Wire-level validation failures.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PacketError {
    #[error("Packet carries no token ids")]
    NoTokens,

    #[error("Token id must not be empty")]
    EmptyTokenId,

    #[error("Duplicate token id in packet: {token_id}")]
    DuplicateTokenId { token_id: String },

    #[error("Token uri count {uris} does not match token id count {ids}")]
    TokenUriLengthMismatch { ids: usize, uris: usize },
}

impl NonFungibleTokenPacketData {
    pub fn encode(&self) -> StdResult<Binary> {
        to_json_binary(self)
    }

    pub fn decode(data: &Binary) -> StdResult<Self> {
        from_json(data)
    }

    /// Application level validation. The class id is not checked; an empty
    /// class id is a valid class as far as the bridge is concerned.
    pub fn validate(&self) -> Result<(), PacketError> {
        if self.token_ids.is_empty() {
            return Err(PacketError::NoTokens);
        }
        if self.token_uris.len() != self.token_ids.len() {
            return Err(PacketError::TokenUriLengthMismatch {
                ids: self.token_ids.len(),
                uris: self.token_uris.len(),
            });
        }

        let mut seen = BTreeSet::new();
        for token_id in &self.token_ids {
            if token_id.is_empty() {
                return Err(PacketError::EmptyTokenId);
            }
            if !seen.insert(token_id.as_str()) {
                return Err(PacketError::DuplicateTokenId {
                    token_id: token_id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Pairs every token id with its metadata uri.
    pub fn tokens(&self) -> impl Iterator<Item = (&String, &Option<String>)> {
        self.token_ids.iter().zip(self.token_uris.iter())
    }
}
