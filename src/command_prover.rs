//! Prover backend that shells out to a snarkjs-compatible CLI.

use std::path::{Path, PathBuf};

use log::debug;
use serde_json::Value;
use tokio::process::Command;

use crate::config::ProverConfig;
use crate::prover::{
    CircuitProgram, ProverBackend, ProverError, ProvingKey, RawProof, Witness,
};
use crate::signals::Signal;
use crate::types::CircuitInput;

const CIRCUIT_FILE: &str = "circuit.wasm";
const INPUT_FILE: &str = "input.json";
const WITNESS_FILE: &str = "witness.wtns";
const KEY_FILE: &str = "circuit.zkey";
const PROOF_FILE: &str = "proof.json";
const PUBLIC_FILE: &str = "public.json";

/// CommandProver generates proofs by running an external prover CLI.
///
/// This prover:
/// 1. Writes the circuit program and input JSON to the work directory
/// 2. Runs `wtns calculate` to generate the witness
/// 3. Runs `plonk prove` to produce `proof.json` and `public.json`
/// 4. Runs `zkey export soliditycalldata` on the normalized output
///
/// Calls share one work directory, so a single instance must not prove
/// concurrently.
pub struct CommandProver {
    program: PathBuf,
    work_dir: PathBuf,
}

impl CommandProver {
    pub fn new(program: PathBuf, work_dir: PathBuf) -> Self {
        Self { program, work_dir }
    }

    pub fn from_config(config: &ProverConfig) -> Self {
        Self::new(config.program.clone(), config.work_dir.clone())
    }

    fn path(&self, file: &str) -> PathBuf {
        self.work_dir.join(file)
    }

    async fn write(&self, file: &str, contents: impl AsRef<[u8]>) -> Result<PathBuf, ProverError> {
        tokio::fs::create_dir_all(&self.work_dir).await?;
        let path = self.path(file);
        tokio::fs::write(&path, contents).await?;
        Ok(path)
    }

    async fn read_json(&self, file: &str) -> Result<Value, ProverError> {
        let contents = tokio::fs::read(self.path(file)).await?;
        serde_json::from_slice(&contents)
            .map_err(|e| ProverError::Serialization(format!("{file}: {e}")))
    }

    /// Runs the prover CLI with `args` and returns its stdout.
    ///
    /// A non-zero exit is reported through `stage` with the tool's stderr.
    async fn run(
        &self,
        stage: fn(String) -> ProverError,
        args: &[&Path],
    ) -> Result<String, ProverError> {
        debug!("Running {} {:?}", self.program.display(), args);
        let output = Command::new(&self.program)
            .args(args)
            .current_dir(&self.work_dir)
            .output()
            .await?;

        if !output.status.success() {
            return Err(stage(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl ProverBackend for CommandProver {
    async fn calculate_witness(
        &self,
        program: &CircuitProgram,
        input: &CircuitInput,
    ) -> Result<Witness, ProverError> {
        let input_json = serde_json::to_vec(input)
            .map_err(|e| ProverError::Serialization(format!("circuit input: {e}")))?;
        let wasm = self.write(CIRCUIT_FILE, &program.0).await?;
        let input_path = self.write(INPUT_FILE, input_json).await?;
        let witness_path = self.path(WITNESS_FILE);

        self.run(
            ProverError::Witness,
            &[
                Path::new("wtns"),
                Path::new("calculate"),
                wasm.as_path(),
                input_path.as_path(),
                witness_path.as_path(),
            ],
        )
        .await?;

        Ok(Witness(tokio::fs::read(&witness_path).await?))
    }

    async fn prove(
        &self,
        proving_key: &ProvingKey,
        witness: &Witness,
    ) -> Result<RawProof, ProverError> {
        let key_path = self.write(KEY_FILE, &proving_key.0).await?;
        let witness_path = self.write(WITNESS_FILE, &witness.0).await?;
        let proof_path = self.path(PROOF_FILE);
        let public_path = self.path(PUBLIC_FILE);

        self.run(
            ProverError::Proof,
            &[
                Path::new("plonk"),
                Path::new("prove"),
                key_path.as_path(),
                witness_path.as_path(),
                proof_path.as_path(),
                public_path.as_path(),
            ],
        )
        .await?;

        Ok(RawProof {
            proof: self.read_json(PROOF_FILE).await?,
            public_signals: self.read_json(PUBLIC_FILE).await?,
        })
    }

    async fn export_call_data(
        &self,
        proof: &Signal,
        public_signals: &Signal,
    ) -> Result<String, ProverError> {
        let proof_path = self.write(PROOF_FILE, proof.to_json().to_string()).await?;
        let public_path = self
            .write(PUBLIC_FILE, public_signals.to_json().to_string())
            .await?;

        self.run(
            ProverError::Export,
            &[
                Path::new("zkey"),
                Path::new("export"),
                Path::new("soliditycalldata"),
                public_path.as_path(),
                proof_path.as_path(),
            ],
        )
        .await
    }
}
