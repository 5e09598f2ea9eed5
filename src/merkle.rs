//! Sorted-pair keccak256 Merkle tree over allowlist leaves.
//!
//! The layout follows what OpenZeppelin's `MerkleProof.verify` expects:
//! leaves are sorted before the tree is built, every pair is sorted before it
//! is hashed, and an odd node at the end of a level is promoted to the next
//! level unchanged. A promoted node contributes no sibling to a proof.

use crate::error::MerkleError;
use alloy::primitives::{Address, B256, U256, keccak256};

/// Computes `keccak256(abi.encode(account, amount))`.
pub fn leaf(account: Address, amount: U256) -> B256 {
    let mut encoded = [0u8; 64];
    encoded[12..32].copy_from_slice(account.as_slice());
    encoded[32..64].copy_from_slice(&amount.to_be_bytes::<32>());
    keccak256(encoded)
}

/// Hashes two siblings after ordering them by their bytes.
pub fn hash_pair(a: B256, b: B256) -> B256 {
    let (left, right) = if a <= b { (a, b) } else { (b, a) };
    let mut concatenated = [0u8; 64];
    concatenated[..32].copy_from_slice(left.as_slice());
    concatenated[32..].copy_from_slice(right.as_slice());
    keccak256(concatenated)
}

/// Replays `proof` from `leaf` and checks that it reduces to `root`.
pub fn verify(proof: &[B256], leaf: B256, root: B256) -> bool {
    proof.iter().fold(leaf, |node, sibling| hash_pair(node, *sibling)) == root
}

/// An immutable tree, stored as its levels from the sorted leaves up to the root.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    layers: Vec<Vec<B256>>,
}

impl MerkleTree {
    pub fn new(leaves: impl IntoIterator<Item = B256>) -> Result<Self, MerkleError> {
        let mut level: Vec<B256> = leaves.into_iter().collect();
        if level.is_empty() {
            return Err(MerkleError::Empty);
        }
        level.sort_unstable();

        let mut layers = vec![level];
        while let Some(current) = layers.last().filter(|level| level.len() > 1) {
            let next = current
                .chunks(2)
                .map(|pair| match pair {
                    [left, right] => hash_pair(*left, *right),
                    [odd] => *odd,
                    _ => unreachable!("chunks(2) yields one or two nodes"),
                })
                .collect();
            layers.push(next);
        }

        Ok(Self { layers })
    }

    pub fn root(&self) -> B256 {
        // The constructor guarantees a non-empty top level.
        self.layers[self.layers.len() - 1][0]
    }

    pub fn leaf_count(&self) -> usize {
        self.layers[0].len()
    }

    pub fn depth(&self) -> usize {
        self.layers.len() - 1
    }

    /// Sibling hashes from `leaf` up to the root, or `None` if the leaf is not in the tree.
    pub fn proof(&self, leaf: &B256) -> Option<Vec<B256>> {
        let mut index = self.layers[0].binary_search(leaf).ok()?;
        let mut proof = Vec::with_capacity(self.depth());

        for level in &self.layers[..self.layers.len() - 1] {
            let sibling = index ^ 1;
            if let Some(node) = level.get(sibling) {
                proof.push(*node);
            }
            index /= 2;
        }

        Some(proof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::{primitives::address, sol_types::SolValue};

    fn sorted_leaves(count: u8) -> Vec<B256> {
        let mut leaves: Vec<B256> = (1..=count).map(|i| keccak256([i])).collect();
        leaves.sort();
        leaves
    }

    #[test]
    fn test_leaf_matches_abi_encoding() {
        let account = address!("1234567890abcdef1234567890abcdef12345678");
        let amount = U256::from(100u64) * U256::from(10u64).pow(U256::from(18u64));
        assert_eq!(leaf(account, amount), keccak256((account, amount).abi_encode()));
    }

    #[test]
    fn test_leaf_depends_on_amount() {
        let account = address!("1234567890abcdef1234567890abcdef12345678");
        assert_ne!(leaf(account, U256::from(1u64)), leaf(account, U256::from(2u64)));
    }

    #[test]
    fn test_hash_pair_is_order_independent() {
        let a = keccak256([1u8]);
        let b = keccak256([2u8]);
        assert_eq!(hash_pair(a, b), hash_pair(b, a));
        assert_ne!(hash_pair(a, b), hash_pair(a, a));
    }

    #[test]
    fn test_empty_tree_is_rejected() {
        assert_eq!(MerkleTree::new(Vec::new()).unwrap_err(), MerkleError::Empty);
    }

    #[test]
    fn test_single_leaf_tree() {
        let only = keccak256([7u8]);
        let tree = MerkleTree::new([only]).unwrap();
        assert_eq!(tree.root(), only);
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.proof(&only).unwrap(), Vec::<B256>::new());
        assert!(verify(&[], only, tree.root()));
    }

    #[test]
    fn test_two_leaf_tree() {
        let leaves = sorted_leaves(2);
        let tree = MerkleTree::new(leaves.clone()).unwrap();
        assert_eq!(tree.root(), hash_pair(leaves[0], leaves[1]));
        assert_eq!(tree.proof(&leaves[0]).unwrap(), vec![leaves[1]]);
        assert_eq!(tree.proof(&leaves[1]).unwrap(), vec![leaves[0]]);
    }

    #[test]
    fn test_odd_node_is_promoted_not_duplicated() {
        let [a, b, c] = <[B256; 3]>::try_from(sorted_leaves(3)).unwrap();
        let tree = MerkleTree::new([c, a, b]).unwrap();

        let ab = hash_pair(a, b);
        assert_eq!(tree.root(), hash_pair(ab, c));
        assert_ne!(tree.root(), hash_pair(ab, hash_pair(c, c)));

        assert_eq!(tree.proof(&a).unwrap(), vec![b, c]);
        assert_eq!(tree.proof(&b).unwrap(), vec![a, c]);
        assert_eq!(tree.proof(&c).unwrap(), vec![ab]);
    }

    #[test]
    fn test_five_leaf_tree_proof_lengths() {
        let leaves = sorted_leaves(5);
        let tree = MerkleTree::new(leaves.clone()).unwrap();
        assert_eq!(tree.depth(), 3);

        let lengths: Vec<usize> = leaves
            .iter()
            .map(|leaf| tree.proof(leaf).unwrap().len())
            .collect();
        assert_eq!(lengths, vec![3, 3, 3, 3, 1]);

        let top_left = hash_pair(
            hash_pair(leaves[0], leaves[1]),
            hash_pair(leaves[2], leaves[3]),
        );
        assert_eq!(tree.proof(&leaves[4]).unwrap(), vec![top_left]);
        assert_eq!(tree.root(), hash_pair(top_left, leaves[4]));
    }

    #[test]
    fn test_every_proof_verifies() {
        for count in 1..=17u8 {
            let leaves = sorted_leaves(count);
            let tree = MerkleTree::new(leaves.clone()).unwrap();
            for leaf in &leaves {
                let proof = tree.proof(leaf).unwrap();
                assert!(verify(&proof, *leaf, tree.root()), "count {count}");
            }
        }
    }

    #[test]
    fn test_leaf_order_does_not_change_root() {
        let leaves = sorted_leaves(6);
        let mut reversed = leaves.clone();
        reversed.reverse();
        assert_eq!(
            MerkleTree::new(leaves).unwrap().root(),
            MerkleTree::new(reversed).unwrap().root()
        );
    }

    #[test]
    fn test_unknown_leaf_has_no_proof() {
        let tree = MerkleTree::new(sorted_leaves(4)).unwrap();
        assert!(tree.proof(&keccak256([42u8])).is_none());
    }

    #[test]
    fn test_tampered_proof_fails() {
        let leaves = sorted_leaves(4);
        let tree = MerkleTree::new(leaves.clone()).unwrap();
        let mut proof = tree.proof(&leaves[0]).unwrap();
        proof[0] = keccak256([99u8]);
        assert!(!verify(&proof, leaves[0], tree.root()));
        assert!(!verify(&tree.proof(&leaves[0]).unwrap(), leaves[1], tree.root()));
    }
}
