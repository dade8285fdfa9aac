//! Contract bindings and EIP-712 typed data.
//!
//! The relayer only needs the view functions it reads and the server-side
//! `requestWithdrawal` entrypoints it calls; the full contract ABIs live
//! with the contracts themselves.
//!
//! Two faucet generations are supported:
//! - `ClassicFaucet` / `ClassicFaucetServer`: one withdrawal per address,
//!   authorized by an EIP-712 signature over the expected message.
//! - `DevFaucet` / `DevFaucetServer`: up to eight withdrawals per rolling
//!   24h window, each authorized by an EIP-712 signature plus a
//!   proof-of-work nonce that the contract verifies on-chain.

use alloy::primitives::{Address, U256};
use alloy::sol;
use alloy::sol_types::Eip712Domain;
use std::borrow::Cow;

sol! {
    /// Classic single-shot faucet (view surface used by the relayer).
    #[sol(rpc)]
    contract ClassicFaucet {
        function get_balance() external view returns (uint256);
        function time_until_next_withdrawal() external view returns (uint256);
        function get_withdrawal_count(address user) external view returns (uint256);
        function get_expected_message(address user) external view returns (string);
        function get_nonce(address user) external view returns (uint256);
        function owner() external view returns (address);
    }

    /// Backend contract the relayer calls for classic withdrawals.
    #[sol(rpc)]
    contract ClassicFaucetServer {
        function requestWithdrawal(
            address _faucet,
            address _user,
            uint8 _v,
            bytes32 _r,
            bytes32 _s,
            string _message
        ) external;
        function owner() external view returns (address);
    }

    /// Proof-of-work dev faucet (view surface used by the relayer).
    #[sol(rpc)]
    contract DevFaucet {
        function withdrawal_count(address user) external view returns (uint256);
        function first_request_time(address user) external view returns (uint256);
        function nonce(address user) external view returns (uint256);
        function get_withdrawal_amount(uint256 index) external view returns (uint256);
        function get_expected_message(uint256 index) external view returns (string);
        function get_difficulty_target(uint256 index) external view returns (uint256);
        function owner() external view returns (address);
    }

    /// Backend contract the relayer calls for proof-of-work withdrawals.
    #[sol(rpc)]
    contract DevFaucetServer {
        function requestWithdrawal(
            address _faucet,
            address _user,
            bytes32 _chosen_block_hash,
            uint256 _withdrawal_index,
            bytes32 _ip_address,
            uint256 _pow_nonce,
            string _message,
            uint256 _v,
            bytes32 _r,
            bytes32 _s
        ) external;
        function owner() external view returns (address);
    }
}

/// Typed data for the classic faucet. The struct and field names are part
/// of the EIP-712 type hash and must match the contract exactly.
pub mod classic {
    use alloy::sol;

    sol! {
        struct WithdrawalRequest {
            address recipient;
            uint256 nonce;
            string message;
        }
    }
}

/// Typed data for the proof-of-work dev faucet. `nonce` is the contract's
/// anti-replay counter, not the mining nonce.
pub mod pow {
    use alloy::sol;

    sol! {
        struct WithdrawalRequest {
            address recipient;
            bytes32 chosenBlockHash;
            uint256 withdrawalIndex;
            bytes32 ipAddress;
            uint256 nonce;
            string message;
        }
    }
}

/// EIP-712 domain for the classic faucet.
pub fn classic_domain(chain_id: u64, faucet: Address) -> Eip712Domain {
    Eip712Domain::new(
        Some(Cow::Borrowed("Faucet")),
        Some(Cow::Borrowed("1")),
        Some(U256::from(chain_id)),
        Some(faucet),
        None,
    )
}

/// EIP-712 domain for the proof-of-work dev faucet.
pub fn pow_domain(chain_id: u64, faucet: Address) -> Eip712Domain {
    Eip712Domain::new(
        Some(Cow::Borrowed("DevFaucet")),
        Some(Cow::Borrowed("1")),
        Some(U256::from(chain_id)),
        Some(faucet),
        None,
    )
}
