//! Interchain token service ABI definitions
//!
//! Uses alloy's sol! macro to generate type-safe bindings for the Axelar
//! interchain token service and the interchain token contracts it manages.

#![allow(clippy::too_many_arguments)]

use alloy::sol;

sol! {
    /// Interchain token service (the subset used for outbound transfers)
    #[sol(rpc)]
    contract InterchainTokenService {
        /// Send `amount` of `tokenId` to `destinationAddress` on `destinationChain`.
        /// `gasValue` is paid to the gas service for cross-chain execution.
        function interchainTransfer(
            bytes32 tokenId,
            string destinationChain,
            bytes destinationAddress,
            uint256 amount,
            bytes metadata,
            uint256 gasValue
        ) external payable;
    }
}

sol! {
    /// Interchain ERC20 token
    #[sol(rpc)]
    contract InterchainToken {
        function interchainTokenId() external view returns (bytes32);
        function decimals() external view returns (uint8);
    }
}
