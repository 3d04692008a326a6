//! Contract bindings for the token contracts the indexer reads from.
//!
//! The indexer only needs the ERC20 surface: the `Transfer` and `Approval`
//! events it reconciles, and the metadata view calls used when a token is
//! first seen. Bindings are generated using alloy's `sol!` macro.

pub mod token;

pub use token::IERC20;
