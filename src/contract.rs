//! Bindings for the deployed `MerkleAirdrop` contract and its EIP-712 claim type.

use alloy::{
    primitives::{Address, B256, U256},
    sol,
    sol_types::{Eip712Domain, SolStruct, eip712_domain},
};

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract MerkleAirdrop {
        event Claimed(address account, uint256 amount);
        event MerkleRootUpdated(bytes32 newMerkleRoot);

        error MerkleAirdrop__AlreadyClaimed();
        error MerkleAirdrop__InvalidProof();
        error MerkleAirdrop__InvalidSignature();

        function claim(address account, uint256 amount, bytes32[] calldata merkleProof, uint8 v, bytes32 r, bytes32 s) external;
        function getMerkleRoot() external view returns (bytes32);
        function getAirdropToken() external view returns (address);
        function getMessageHash(address account, uint256 amount) external view returns (bytes32);
    }
}

sol! {
    struct AirdropClaim {
        address account;
        uint256 amount;
    }
}

/// Returns the EIP-712 domain the airdrop contract verifies claims against.
#[must_use]
pub const fn domain(chain_id: u64, verifying_contract: Address) -> Eip712Domain {
    eip712_domain!(
        name: "Merkle Airdrop",
        version: "1.0.0",
        chain_id: chain_id,
        verifying_contract: verifying_contract,
    )
}

/// The digest a wallet signs for `AirdropClaim { account, amount }`.
pub fn claim_signing_hash(account: Address, amount: U256, domain: &Eip712Domain) -> B256 {
    AirdropClaim { account, amount }.eip712_signing_hash(domain)
}
