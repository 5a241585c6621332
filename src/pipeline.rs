//! Proof-input pipeline: address → circuit input → prover → verifier calldata.

use log::{debug, info};
use num_bigint::BigUint;

use crate::error::{Result, WhitelistError};
use crate::hash::commit;
use crate::merkle::MerkleTree;
use crate::prover::{CircuitProgram, ProverBackend, ProvingKey};
use crate::signals::Signal;
use crate::types::CircuitInput;
use crate::utils::validate_hex_string;

/// Settings the pipeline needs from the deployment configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Height the circuit was compiled for; trees must have `2^tree_height` leaves.
    pub tree_height: usize,
}

/// Builds the circuit input for `address`.
///
/// The address is committed and looked up before anything else happens, so a
/// non-member fails here with [`WhitelistError::LeafNotFound`].
///
/// # Errors
/// * [`WhitelistError::Encoding`] if the address does not fit in 20 bytes.
/// * [`WhitelistError::LeafNotFound`] if the address is not whitelisted.
pub fn build_circuit_input(tree: &MerkleTree, address: &BigUint) -> Result<CircuitInput> {
    let commitment = commit(address)?;
    let proof = tree.prove_membership(&commitment)?;
    debug!("Address found at leaf {}", proof.index);
    CircuitInput::from_proof(&proof, address)
}

/// Keeps only the proof argument of exported calldata.
///
/// Calldata exporters return every verifier argument joined by commas; the
/// verifier entry point used here takes the proof alone.
///
/// # Errors
/// Returns [`WhitelistError::MalformedProverOutput`] if the first argument is
/// not `0x`-prefixed hex.
pub fn extract_proof_segment(call_data: &str) -> Result<String> {
    let segment = call_data
        .split(',')
        .next()
        .unwrap_or_default()
        .trim()
        .trim_matches('"');
    if !segment.starts_with("0x") || !validate_hex_string(segment) {
        return Err(WhitelistError::MalformedProverOutput(format!(
            "calldata proof segment is not 0x-prefixed hex: '{segment}'"
        )));
    }
    Ok(segment.to_string())
}

/// Drives a [`ProverBackend`] to turn a whitelisted address into calldata.
pub struct ProofPipeline<P> {
    backend: P,
    config: PipelineConfig,
}

impl<P: ProverBackend> ProofPipeline<P> {
    pub fn new(backend: P, config: PipelineConfig) -> Self {
        Self { backend, config }
    }

    pub fn backend(&self) -> &P {
        &self.backend
    }

    /// Like [`build_circuit_input`], additionally checking the tree height
    /// against the configured circuit height.
    ///
    /// # Errors
    /// [`WhitelistError::HeightMismatch`] plus the errors of [`build_circuit_input`].
    pub fn circuit_input(&self, tree: &MerkleTree, address: &BigUint) -> Result<CircuitInput> {
        if tree.height() != self.config.tree_height {
            return Err(WhitelistError::HeightMismatch {
                expected: self.config.tree_height,
                actual: tree.height(),
            });
        }
        build_circuit_input(tree, address)
    }

    /// Generates the proof-only verifier calldata for `address`.
    ///
    /// Membership is resolved locally first; the backend is only invoked for
    /// whitelisted addresses. Backend failures are returned unchanged as
    /// [`WhitelistError::ExternalProver`] and never retried.
    ///
    /// # Errors
    /// Any error of [`Self::circuit_input`], [`WhitelistError::ExternalProver`],
    /// or [`WhitelistError::MalformedProverOutput`] if the prover output does
    /// not normalize.
    pub async fn generate_proof_call_data(
        &self,
        tree: &MerkleTree,
        address: &BigUint,
        program: &CircuitProgram,
        proving_key: &ProvingKey,
    ) -> Result<String> {
        let input = self.circuit_input(tree, address)?;

        info!("Calculating witness for height-{} tree", input.height());
        let witness = self.backend.calculate_witness(program, &input).await?;
        debug!("Witness size: {} bytes", witness.0.len());

        info!("Generating proof (this may take a while)...");
        let raw = self.backend.prove(proving_key, &witness).await?;

        let proof = Signal::normalize(&raw.proof)?;
        let public_signals = Signal::normalize(&raw.public_signals)?;

        let call_data = self
            .backend
            .export_call_data(&proof, &public_signals)
            .await?;
        debug!("Exported calldata: {} bytes", call_data.len());

        extract_proof_segment(&call_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_proof_segment_keeps_first_argument() {
        let exported = "0xdeadbeef,[\"0x01\",\"0x02\"]";
        assert_eq!(extract_proof_segment(exported).unwrap(), "0xdeadbeef");
    }

    #[test]
    fn test_extract_proof_segment_trims_whitespace_and_quotes() {
        assert_eq!(extract_proof_segment(" \"0xabc\" , [1]\n").unwrap(), "0xabc");
    }

    #[test]
    fn test_extract_proof_segment_without_commas() {
        assert_eq!(extract_proof_segment("0x00ff").unwrap(), "0x00ff");
    }

    #[test]
    fn test_extract_proof_segment_rejects_non_hex() {
        assert!(matches!(
            extract_proof_segment("[\"0x01\"],[\"0x02\"]"),
            Err(WhitelistError::MalformedProverOutput(_))
        ));
        assert!(extract_proof_segment("").is_err());
    }
}
