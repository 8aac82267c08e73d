//! Acknowledgement envelope written by the receiving bridge.
//!
//! `{"result":"success"}` or `{"result":"error","message":"..."}`.

use cosmwasm_std::{from_json, to_json_binary, Binary, StdResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Ack {
    Success,
    Error { message: String },
}

impl Ack {
    pub fn error(message: impl Into<String>) -> Self {
        Ack::Error {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Ack::Success)
    }

    /// "success" or "error".
    pub fn kind(&self) -> &'static str {
        match self {
            Ack::Success => "success",
            Ack::Error { .. } => "error",
        }
    }

    pub fn encode(&self) -> StdResult<Binary> {
        to_json_binary(self)
    }

    pub fn decode(data: &Binary) -> StdResult<Self> {
        from_json(data)
    }
}
