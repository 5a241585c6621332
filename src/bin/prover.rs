use anyhow::{Context, Result};
use clap::Parser;
use ethers::signers::{LocalWallet, Signer};
use log::info;
use num_bigint::BigUint;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use zk_whitelist::{
    config::Config,
    ethereum::{address_to_biguint, format_address, parse_address, validate_private_key},
    prover::{CircuitProgram, ProvingKey},
    utils::field_to_hex,
    whitelist::load_tree,
    CallDataOutput, CommandProver, MerkleTree, ProofPipeline, WhitelistTree,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate whitelist membership calldata", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, default_value = "whitelist.toml")]
    config: PathBuf,

    /// Tree file written by gen_tree: the source CSV or the storage-form keys file
    #[arg(short, long)]
    tree: PathBuf,

    /// Address to prove membership for
    #[arg(short, long, conflicts_with = "private_key")]
    address: Option<String>,

    /// Private key whose address is proven
    #[arg(long, env = "ZKP_PRIVATE_KEY", hide_env_values = true)]
    private_key: Option<String>,

    #[arg(short, long, default_value = "proof.json")]
    output: PathBuf,
}

fn claimed_address(args: &Args) -> Result<BigUint> {
    if let Some(address) = &args.address {
        return Ok(parse_address(address)?);
    }
    let private_key = args
        .private_key
        .as_deref()
        .context("Either --address or --private-key (ZKP_PRIVATE_KEY) is required")?;
    validate_private_key(private_key)?;
    let wallet: LocalWallet = private_key
        .parse()
        .context("Failed to parse private key")?;
    Ok(address_to_biguint(&wallet.address()))
}

fn read_tree(path: &Path, max_file_size: u64) -> Result<MerkleTree> {
    let metadata = fs::metadata(path)
        .with_context(|| format!("Failed to read tree file metadata: {}", path.display()))?;
    if metadata.len() > max_file_size {
        return Err(anyhow::anyhow!(
            "Tree file too large: {} bytes (max {} bytes)",
            metadata.len(),
            max_file_size
        ));
    }

    let tree = if path.extension().is_some_and(|ext| ext == "csv") {
        WhitelistTree::read_source_csv(path)?.tree().clone()
    } else {
        load_tree(path)?
    };
    Ok(tree)
}

fn read_artifact(path: &Path, what: &str) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read {what}: {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = Config::load_from_file_or_default(&args.config)?;
    config.validate()?;

    let address = claimed_address(&args)?;
    let address_hex = format_address(&address)?;
    info!("Prover address: {}", address_hex);

    info!("Loading tree from: {}", args.tree.display());
    let tree = read_tree(&args.tree, config.files.max_file_size)?;
    let root = field_to_hex(&tree.root());
    info!("Merkle root: {}", root);

    let pipeline = ProofPipeline::new(CommandProver::from_config(&config.prover), config.pipeline());
    let input = pipeline
        .circuit_input(&tree, &address)
        .with_context(|| format!("Address {address_hex} cannot be proven against this tree"))?;
    let leaf_index = input
        .path_indices
        .iter()
        .rev()
        .fold(0usize, |index, bit| (index << 1) | usize::from(*bit));
    info!("Found address at leaf {}", leaf_index);

    let program = CircuitProgram(read_artifact(&config.prover.circuit_wasm, "circuit")?);
    let proving_key = ProvingKey(read_artifact(&config.prover.proving_key, "proving key")?);

    let calldata = pipeline
        .generate_proof_call_data(&tree, &address, &program, &proving_key)
        .await
        .context("Failed to generate proof calldata")?;

    let output = CallDataOutput {
        root,
        address: address_hex,
        leaf_index,
        calldata,
        timestamp: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .context("System clock is before the Unix epoch")?
            .as_secs(),
    };
    output.validate()?;

    info!("Writing calldata to: {}", args.output.display());
    let json_output =
        serde_json::to_string_pretty(&output).context("Failed to serialize calldata to JSON")?;
    fs::write(&args.output, json_output).context("Failed to write calldata file")?;

    println!("{}", output.calldata);

    Ok(())
}
