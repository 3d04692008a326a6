//! Deterministic entity identifiers.
//!
//! Every id is derived from lower-case `0x`-prefixed hex addresses, so the
//! same on-chain participants always map to the same records.

use alloy_primitives::Address;

/// Id of an Account, Token or Portfolio: the lower-case hex address.
pub fn address_id(address: Address) -> String {
    format!("{address:#x}")
}

/// Id of the Project belonging to `token`.
pub fn project_id(token: Address) -> String {
    format!("project-{token:#x}")
}

/// Id of the MarketData belonging to `token`.
pub fn market_id(token: Address) -> String {
    format!("market-{token:#x}")
}

/// Id of the TokenBalance of `owner` in `token`.
pub fn balance_id(owner: Address, token: Address) -> String {
    format!("{owner:#x}-{token:#x}")
}

/// Id of the Approval granted by `owner` to `spender` on `token`.
pub fn approval_id(owner: Address, spender: Address, token: Address) -> String {
    format!("{owner:#x}-{spender:#x}-{token:#x}")
}
