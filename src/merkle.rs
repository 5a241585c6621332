//! Merkle tree implementation for whitelist membership proofs.
//!
//! This module provides a complete binary Merkle tree over BN254 scalars
//! using the Poseidon [`compress`] function for internal nodes. Trees
//! are immutable: rotating the whitelist means building a new tree.

use std::collections::HashMap;
use std::fmt;

use log::debug;
use ark_bn254::Fr;

use crate::error::{Result, WhitelistError};
use crate::hash::compress;
use crate::utils::{field_to_bytes, field_to_hex};

/// A Merkle proof for leaf inclusion.
///
/// `path_elements[i]` is the sibling at level `i` (leaf level first) and
/// `path_indices[i]` is 0 when the known node is the left child at that level
/// and 1 when it is the right child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleProof {
    pub leaf: Fr,
    pub root: Fr,
    pub path_elements: Vec<Fr>,
    pub path_indices: Vec<u8>,
    pub index: usize,
}

impl MerkleProof {
    /// Number of levels between the leaf and the root.
    #[must_use]
    pub fn height(&self) -> usize {
        self.path_elements.len()
    }

    /// Recombines `leaf` with the path, leaf to root.
    ///
    /// # Errors
    /// Propagates [`compress`] failures.
    pub fn compute_root(&self, leaf: Fr) -> Result<Fr> {
        self.path_elements
            .iter()
            .zip(&self.path_indices)
            .try_fold(leaf, |current, (sibling, &bit)| {
                if bit == 0 {
                    compress(current, *sibling)
                } else {
                    compress(*sibling, current)
                }
            })
    }
}

/// A complete binary Merkle tree.
///
/// Stores every level from the leaves (level 0) up to the single root, plus
/// an index from leaf commitment to position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    levels: Vec<Vec<Fr>>,
    positions: HashMap<[u8; 32], usize>,
}

impl MerkleTree {
    /// Builds a tree from an ordered list of leaf commitments.
    ///
    /// # Errors
    /// * [`WhitelistError::InvalidTreeSize`] if the leaf count is zero or not
    ///   a power of two.
    /// * [`WhitelistError::DuplicateLeaf`] if a commitment occurs twice.
    pub fn new(leaves: Vec<Fr>) -> Result<Self> {
        if leaves.is_empty() || !leaves.len().is_power_of_two() {
            return Err(WhitelistError::InvalidTreeSize {
                leaves: leaves.len(),
            });
        }

        let mut positions = HashMap::with_capacity(leaves.len());
        for (i, leaf) in leaves.iter().enumerate() {
            if let Some(first) = positions.insert(field_to_bytes(leaf), i) {
                return Err(WhitelistError::DuplicateLeaf {
                    commitment: field_to_hex(leaf),
                    first,
                    second: i,
                });
            }
        }

        let mut levels = vec![leaves];
        while let Some(level) = levels.last().filter(|level| level.len() > 1) {
            let next: Vec<Fr> = level
                .chunks_exact(2)
                .map(|pair| compress(pair[0], pair[1]))
                .collect::<Result<_>>()?;
            levels.push(next);
        }

        let tree = MerkleTree { levels, positions };
        debug!(
            "Built Merkle tree: {} leaves, height {}, root {}",
            tree.len(),
            tree.height(),
            field_to_hex(&tree.root())
        );
        Ok(tree)
    }

    /// The root node.
    #[must_use]
    pub fn root(&self) -> Fr {
        self.levels[self.levels.len() - 1][0]
    }

    /// Leaves in insertion order.
    #[must_use]
    pub fn leaves(&self) -> &[Fr] {
        &self.levels[0]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.levels[0].len()
    }

    /// Always false: trees have at least one leaf.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels[0].is_empty()
    }

    /// Number of levels above the leaves; `log2(len)`.
    #[must_use]
    pub fn height(&self) -> usize {
        self.levels.len() - 1
    }

    /// Position of the leaf holding `commitment`, if any.
    #[must_use]
    pub fn index_of(&self, commitment: &Fr) -> Option<usize> {
        self.positions.get(&field_to_bytes(commitment)).copied()
    }

    /// Generate a Merkle proof for the leaf at the given index.
    ///
    /// Returns `None` if the index is out of range.
    #[must_use]
    pub fn generate_proof(&self, leaf_index: usize) -> Option<MerkleProof> {
        if leaf_index >= self.len() {
            return None;
        }

        let height = self.height();
        let mut path_elements = Vec::with_capacity(height);
        let mut path_indices = Vec::with_capacity(height);
        let mut index = leaf_index;

        for level in &self.levels[..height] {
            let is_right = index % 2 == 1;
            let sibling_index = if is_right { index - 1 } else { index + 1 };
            path_elements.push(level[sibling_index]);
            path_indices.push(u8::from(is_right));
            index /= 2;
        }

        Some(MerkleProof {
            leaf: self.levels[0][leaf_index],
            root: self.root(),
            path_elements,
            path_indices,
            index: leaf_index,
        })
    }

    /// Derives the inclusion path for `commitment`.
    ///
    /// # Errors
    /// Returns [`WhitelistError::LeafNotFound`] if no leaf holds the commitment.
    pub fn prove_membership(&self, commitment: &Fr) -> Result<MerkleProof> {
        self.index_of(commitment)
            .and_then(|index| self.generate_proof(index))
            .ok_or_else(|| WhitelistError::LeafNotFound {
                commitment: field_to_hex(commitment),
            })
    }

    /// Verify a Merkle proof against this tree's root.
    #[must_use]
    pub fn verify_proof(&self, proof: &MerkleProof) -> bool {
        proof.root == self.root()
            && proof.path_elements.len() == self.height()
            && proof.path_indices.len() == self.height()
            && matches!(proof.compute_root(proof.leaf), Ok(root) if root == self.root())
    }
}

impl fmt::Display for MerkleProof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MerkleProof:\n  Leaf: {}\n  Root: {}\n  Index: {}\n  Siblings: {}",
            field_to_hex(&self.leaf),
            field_to_hex(&self.root),
            self.index,
            self.path_elements.len()
        )
    }
}
