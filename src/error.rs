//! Error taxonomy for the whitelist commitment pipeline.

use thiserror::Error;

use crate::prover::ProverError;

/// Errors surfaced by tree construction, serialization and proof-input assembly.
///
/// Every variant is returned to the caller; none are logged and swallowed.
#[derive(Debug, Error)]
pub enum WhitelistError {
    /// A value does not fit the fixed width required at a hash or encoding boundary.
    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Invalid tree size: {leaves} leaves (leaf count must be a non-zero power of two)")]
    InvalidTreeSize { leaves: usize },

    /// The tree does not have the height the circuit was compiled for.
    #[error("Tree height mismatch: circuit expects height {expected}, tree has height {actual}")]
    HeightMismatch { expected: usize, actual: usize },

    /// The commitment is not a leaf of the tree. This is the normal rejection
    /// path for addresses that are not whitelisted.
    #[error("Leaf not found: commitment {commitment} is not in the tree")]
    LeafNotFound { commitment: String },

    #[error("Duplicate leaf: commitment {commitment} appears at indices {first} and {second}")]
    DuplicateLeaf {
        commitment: String,
        first: usize,
        second: usize,
    },

    #[error("Poseidon error: {0}")]
    Hash(#[from] light_poseidon::PoseidonError),

    #[error("Malformed storage form: {0}")]
    MalformedStorageForm(String),

    #[error("Malformed prover output: {0}")]
    MalformedProverOutput(String),

    #[error("External prover failure: {0}")]
    ExternalProver(#[from] ProverError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = WhitelistError> = std::result::Result<T, E>;
