//! Collection handlers.
//!
//! This module handles:
//! - Native class creation
//! - Minting by the class minter
//! - Plain transfers between local accounts

use cosmwasm_std::{DepsMut, MessageInfo, Response};

use crate::error::ContractError;
use crate::nft;
use crate::registry;

// ============================================================================
// Classes
// ============================================================================

/// Create a native class. The caller becomes its minter.
pub fn execute_create_class(
    deps: DepsMut,
    info: MessageInfo,
    class_id: String,
    class_uri: Option<String>,
) -> Result<Response, ContractError> {
    let class = registry::create_native_class(deps.storage, &class_id, class_uri, &info.sender)?;

    Ok(Response::new()
        .add_attribute("method", "create_class")
        .add_attribute("class_id", class.class_id)
        .add_attribute("contract", class.contract)
        .add_attribute("minter", class.minter))
}

// ============================================================================
// Tokens
// ============================================================================

/// Mint a token of a class. Only the class minter may call this, which for
/// wrapped classes is the bridge alone.
pub fn execute_mint(
    deps: DepsMut,
    info: MessageInfo,
    class_id: String,
    token_id: String,
    token_uri: Option<String>,
    owner: String,
) -> Result<Response, ContractError> {
    let class = registry::load_class(deps.storage, &class_id)?;
    if info.sender != class.minter {
        return Err(ContractError::NotMinter { class_id });
    }
    if token_id.is_empty() {
        return Err(ContractError::EmptyTokenId);
    }

    let owner = deps.api.addr_validate(&owner)?;
    nft::mint(deps.storage, &class_id, &token_id, &owner, token_uri)?;

    Ok(Response::new()
        .add_attribute("method", "mint")
        .add_attribute("class_id", class_id)
        .add_attribute("token_id", token_id)
        .add_attribute("owner", owner))
}

/// Transfer a token to another local account.
pub fn execute_transfer_nft(
    deps: DepsMut,
    info: MessageInfo,
    class_id: String,
    token_id: String,
    recipient: String,
) -> Result<Response, ContractError> {
    let recipient = deps.api.addr_validate(&recipient)?;
    nft::transfer(deps.storage, &class_id, &token_id, &info.sender, &recipient)?;

    Ok(Response::new()
        .add_attribute("method", "transfer_nft")
        .add_attribute("class_id", class_id)
        .add_attribute("token_id", token_id)
        .add_attribute("sender", info.sender)
        .add_attribute("recipient", recipient))
}
