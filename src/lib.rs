//! ZK Whitelist
//!
//! Commits a set of 20-byte addresses into a Poseidon Merkle tree and turns a
//! whitelisted address into verifier calldata through an external prover.
//!
//! # Components
//!
//! - [`MerkleTree`]: complete binary tree of address commitments
//! - [`MerkleProof`]: authentication path and direction bits for one leaf
//! - [`WhitelistTree`]: a tree together with the addresses it commits to
//! - [`ProofPipeline`]: address → circuit input → prover → calldata
//! - [`ProverBackend`]: seam for witness generation, proving and calldata export
//! - [`Signal`]: normalized form of prover JSON output
//!
//! # Example
//!
//! ```
//! use num_bigint::BigUint;
//! use zk_whitelist::{build_circuit_input, WhitelistTree};
//!
//! let addresses: Vec<BigUint> = (1..=4u32).map(BigUint::from).collect();
//! let whitelist = WhitelistTree::from_addresses(addresses).unwrap();
//! let input = build_circuit_input(whitelist.tree(), &BigUint::from(3u32)).unwrap();
//! assert_eq!(input.path_indices, vec![0, 1]);
//! ```

pub mod command_prover;
pub mod config;
pub mod error;
pub mod ethereum;
pub mod hash;
pub mod merkle;
pub mod pipeline;
pub mod prover;
pub mod signals;
pub mod storage;
pub mod types;
pub mod utils;
pub mod whitelist;


pub use command_prover::CommandProver;
pub use config::Config;
pub use error::{Result, WhitelistError};
pub use hash::{commit, compress};
pub use merkle::{MerkleProof, MerkleTree};
pub use pipeline::{build_circuit_input, PipelineConfig, ProofPipeline};
pub use prover::{ProverBackend, ProverError};
pub use signals::Signal;
pub use storage::{from_storage_string, to_storage_string};
pub use types::{CallDataOutput, CircuitInput};
pub use whitelist::WhitelistTree;
