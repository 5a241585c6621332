//! Type definitions exchanged with the circuit and written as artifacts.

use log::debug;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ethereum::{format_address, ADDRESS_HEX_LENGTH};
use crate::merkle::MerkleProof;
use crate::utils::{field_to_hex, validate_and_strip_hex, validate_hex_string, FIELD_BYTES};

/// Input of the membership circuit.
///
/// Serializes to exactly the four signals the circuit declares: `root`,
/// `pathIndices`, `pathElements` and `address`. Field elements are written as
/// `0x`-prefixed 32-byte hex and the address as 20-byte hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitInput {
    pub root: String,
    pub path_indices: Vec<u8>,
    pub path_elements: Vec<String>,
    pub address: String,
}

impl CircuitInput {
    /// Assembles the input from a membership proof and the claimed address.
    ///
    /// # Errors
    /// Returns an encoding error if the address does not fit in 20 bytes.
    pub fn from_proof(proof: &MerkleProof, address: &BigUint) -> Result<Self> {
        Ok(Self {
            root: field_to_hex(&proof.root),
            path_indices: proof.path_indices.clone(),
            path_elements: proof.path_elements.iter().map(field_to_hex).collect(),
            address: format_address(address)?,
        })
    }

    /// Tree height the input was derived for.
    #[must_use]
    pub fn height(&self) -> usize {
        self.path_elements.len()
    }
}

/// Proof artifact written by the `prover` binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallDataOutput {
    /// Merkle root the proof was generated against (32-byte hex).
    pub root: String,
    /// Claimed address (20-byte hex).
    pub address: String,
    /// Index of the address in the whitelist
    pub leaf_index: usize,
    /// Proof-only calldata segment for the verifier
    pub calldata: String,
    /// Unix timestamp when proof was generated
    pub timestamp: u64,
}

impl CallDataOutput {
    const TIMESTAMP_TOLERANCE_SECS: u64 = 30;

    /// Checks field widths and that the timestamp is not in the future.
    ///
    /// # Errors
    /// Returns an error naming the first field that fails validation.
    pub fn validate(&self) -> anyhow::Result<()> {
        debug!("Validating calldata output for leaf {}", self.leaf_index);

        validate_and_strip_hex(&self.root, FIELD_BYTES * 2)
            .map_err(|e| anyhow::anyhow!("Invalid root '{}': {e}", self.root))?;
        validate_and_strip_hex(&self.address, ADDRESS_HEX_LENGTH)
            .map_err(|e| anyhow::anyhow!("Invalid address '{}': {e}", self.address))?;

        if !self.calldata.starts_with("0x") || !validate_hex_string(&self.calldata) {
            return Err(anyhow::anyhow!(
                "Calldata must be 0x-prefixed hex, got '{}'",
                self.calldata
            ));
        }

        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .map_err(|e| anyhow::anyhow!("System clock unavailable: {}", e))?;
        if self.timestamp > now + Self::TIMESTAMP_TOLERANCE_SECS {
            return Err(anyhow::anyhow!(
                "Timestamp is too far in the future: {} (current: {})",
                self.timestamp,
                now
            ));
        }

        Ok(())
    }
}
