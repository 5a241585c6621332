//! The external proving capability.
//!
//! Witness generation, proving and calldata export are performed by an
//! external toolchain. [`ProverBackend`] is the seam: the pipeline only ever
//! talks to this trait, so tests can substitute a deterministic fake for the
//! real prover.

use serde_json::Value;
use thiserror::Error;

use crate::signals::Signal;
use crate::types::CircuitInput;

/// Errors reported by a prover backend.
#[derive(Debug, Error)]
pub enum ProverError {
    #[error("Witness generation failed: {0}")]
    Witness(String),

    #[error("Proof generation failed: {0}")]
    Proof(String),

    #[error("Calldata export failed: {0}")]
    Export(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Compiled circuit program handed to the witness generator (e.g. wasm bytes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitProgram(pub Vec<u8>);

/// Proving key handed to the prover (e.g. a zkey file).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvingKey(pub Vec<u8>);

/// Opaque witness blob produced by the witness generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Witness(pub Vec<u8>);

/// Raw prover output before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawProof {
    pub proof: Value,
    pub public_signals: Value,
}

/// Trait for the external witness generator, prover and calldata exporter.
///
/// Each operation is a single suspend point that either completes or fails;
/// there are no partial results. Implementations must not retry on their own.
pub trait ProverBackend: Send + Sync {
    /// Runs the circuit program on the input and returns the witness.
    fn calculate_witness(
        &self,
        program: &CircuitProgram,
        input: &CircuitInput,
    ) -> impl core::future::Future<Output = Result<Witness, ProverError>>;

    /// Produces a proof and its public signals from a witness.
    fn prove(
        &self,
        proving_key: &ProvingKey,
        witness: &Witness,
    ) -> impl core::future::Future<Output = Result<RawProof, ProverError>>;

    /// Renders normalized proof and public signals as verifier calldata.
    ///
    /// The result is a comma-separated list of call arguments.
    fn export_call_data(
        &self,
        proof: &Signal,
        public_signals: &Signal,
    ) -> impl core::future::Future<Output = Result<String, ProverError>>;
}
