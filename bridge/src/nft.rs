//! Collection token store.
//!
//! The asset capability the bridge builds on: mint, burn, transfer and
//! ownership lookups for tokens of every class known to this chain. Callers
//! are responsible for authorization.

use cosmwasm_std::{Addr, Storage};

use crate::error::ContractError;
use crate::state::{TokenInfo, TOKENS};

/// Load a token, failing if it does not exist.
pub fn load_token(
    storage: &dyn Storage,
    class_id: &str,
    token_id: &str,
) -> Result<TokenInfo, ContractError> {
    TOKENS
        .may_load(storage, (class_id, token_id))?
        .ok_or_else(|| ContractError::TokenNotFound {
            class_id: class_id.to_string(),
            token_id: token_id.to_string(),
        })
}

/// Create a new token owned by `owner`.
pub fn mint(
    storage: &mut dyn Storage,
    class_id: &str,
    token_id: &str,
    owner: &Addr,
    token_uri: Option<String>,
) -> Result<(), ContractError> {
    if TOKENS.has(storage, (class_id, token_id)) {
        return Err(ContractError::TokenAlreadyExists {
            class_id: class_id.to_string(),
            token_id: token_id.to_string(),
        });
    }
    TOKENS.save(
        storage,
        (class_id, token_id),
        &TokenInfo {
            owner: owner.clone(),
            token_uri,
        },
    )?;
    Ok(())
}

/// Destroy a token, returning what it was.
pub fn burn(
    storage: &mut dyn Storage,
    class_id: &str,
    token_id: &str,
) -> Result<TokenInfo, ContractError> {
    let token = load_token(storage, class_id, token_id)?;
    TOKENS.remove(storage, (class_id, token_id));
    Ok(token)
}

/// Move a token from `from` to `to`. Fails unless `from` is the owner.
pub fn transfer(
    storage: &mut dyn Storage,
    class_id: &str,
    token_id: &str,
    from: &Addr,
    to: &Addr,
) -> Result<(), ContractError> {
    let mut token = ensure_owner(storage, class_id, token_id, from)?;
    token.owner = to.clone();
    TOKENS.save(storage, (class_id, token_id), &token)?;
    Ok(())
}

/// Load a token and check that `sender` owns it.
pub fn ensure_owner(
    storage: &dyn Storage,
    class_id: &str,
    token_id: &str,
    sender: &Addr,
) -> Result<TokenInfo, ContractError> {
    let token = load_token(storage, class_id, token_id)?;
    if token.owner != *sender {
        return Err(ContractError::NotTokenOwner {
            class_id: class_id.to_string(),
            token_id: token_id.to_string(),
            sender: sender.to_string(),
        });
    }
    Ok(token)
}
