//! ERC20 token contract bindings.

use alloy_sol_types::sol;

sol! {
    /// ERC20 surface consumed by the indexer.
    ///
    /// `name`, `symbol` and `decimals` are optional in EIP-20, so callers must
    /// expect any of the metadata reads to revert.
    #[sol(rpc)]
    interface IERC20 {
        /// Emitted when tokens are moved, minted (`from == 0x0`) or burned (`to == 0x0`)
        event Transfer(
            address indexed from,
            address indexed to,
            uint256 value
        );

        /// Emitted when an allowance is set; `value` replaces the previous allowance
        event Approval(
            address indexed owner,
            address indexed spender,
            uint256 value
        );

        /// Get token name
        function name() external view returns (string memory);

        /// Get token symbol
        function symbol() external view returns (string memory);

        /// Get token decimals
        function decimals() external view returns (uint8);

        /// Get total supply
        function totalSupply() external view returns (uint256);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{b256, Address, U256};
    use alloy_sol_types::SolEvent;

    #[test]
    fn test_event_signatures() {
        // keccak256("Transfer(address,address,uint256)")
        assert_eq!(
            IERC20::Transfer::SIGNATURE_HASH,
            b256!("ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef")
        );
        // keccak256("Approval(address,address,uint256)")
        assert_eq!(
            IERC20::Approval::SIGNATURE_HASH,
            b256!("8c5be1e5ebec7d5bd14f71427d1e84f3dd0314c0f7b2291e5b200ac8c7c3b925")
        );
    }

    #[test]
    fn test_metadata_calls_only() {
        use alloy_sol_types::{SolCall, SolInterface};

        assert_eq!(<IERC20::IERC20Calls as SolInterface>::COUNT, 4);
        assert_eq!(IERC20::nameCall::SELECTOR, [0x06, 0xfd, 0xde, 0x03]);
        assert_eq!(IERC20::symbolCall::SELECTOR, [0x95, 0xd8, 0x9b, 0x41]);
        assert_eq!(IERC20::decimalsCall::SELECTOR, [0x31, 0x3c, 0xe5, 0x67]);
        assert_eq!(IERC20::totalSupplyCall::SELECTOR, [0x18, 0x16, 0x0d, 0xdd]);
    }

    #[test]
    fn test_transfer_log_roundtrip() {
        let event = IERC20::Transfer {
            from: Address::ZERO,
            to: Address::from([0xaa; 20]),
            value: U256::from(1_000),
        };

        let data = event.encode_log_data();
        assert_eq!(data.topics().len(), 3);

        let decoded = IERC20::Transfer::decode_log_data(&data).unwrap();
        assert_eq!(decoded.to, event.to);
        assert_eq!(decoded.value, event.value);
    }
}
