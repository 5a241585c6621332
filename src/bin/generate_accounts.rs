use anyhow::{Context, Result};
use clap::Parser;
use ethers::signers::{LocalWallet, Signer};
use log::{debug, info};
use sha3::{Digest, Sha3_256};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use zk_whitelist::ethereum::validate_address;

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate Ethereum accounts for a whitelist", long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 16)]
    count: usize,

    /// Addresses are written one per line
    #[arg(short, long, default_value = "accounts.txt")]
    output: PathBuf,

    /// Derive keys deterministically from this seed instead of the OS RNG
    #[arg(short, long)]
    seed: Option<String>,

    /// Also write `address|private_key` lines to this file
    #[arg(short, long)]
    keys_file: Option<PathBuf>,
}

/// Wallet number `counter` of the seeded sequence, or `None` when the hash is
/// not a valid secp256k1 scalar.
fn seeded_wallet(seed: &str, counter: u64) -> Option<LocalWallet> {
    let mut hasher = Sha3_256::new();
    hasher.update(format!("{seed}_{counter:020}").as_bytes());
    LocalWallet::from_bytes(&hasher.finalize()).ok()
}

fn generate_wallets(count: usize, seed: Option<&str>) -> Vec<LocalWallet> {
    match seed {
        Some(seed) => (0u64..)
            .filter_map(|counter| seeded_wallet(seed, counter))
            .take(count)
            .collect(),
        None => (0..count)
            .map(|_| LocalWallet::new(&mut rand::thread_rng()))
            .collect(),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    info!("Generating {} Ethereum accounts...", args.count);
    let wallets = generate_wallets(args.count, args.seed.as_deref());
    let addresses: Vec<String> = wallets
        .iter()
        .map(|wallet| format!("{:?}", wallet.address()))
        .collect();

    if !addresses.iter().all(|addr| validate_address(addr)) {
        return Err(anyhow::anyhow!("Generated invalid addresses"));
    }
    let unique: HashSet<_> = addresses.iter().collect();
    if unique.len() != addresses.len() {
        return Err(anyhow::anyhow!("Generated duplicate addresses"));
    }

    let mut out = BufWriter::new(
        File::create(&args.output)
            .with_context(|| format!("Failed to create {}", args.output.display()))?,
    );
    for address in &addresses {
        writeln!(out, "{address}")?;
    }
    out.flush()?;

    if let Some(keys_file) = &args.keys_file {
        let mut keys = BufWriter::new(
            File::create(keys_file)
                .with_context(|| format!("Failed to create {}", keys_file.display()))?,
        );
        for (address, wallet) in addresses.iter().zip(&wallets) {
            writeln!(keys, "{}|{}", address, hex::encode(wallet.signer().to_bytes()))?;
        }
        keys.flush()?;
        info!("Private keys saved to: {}", keys_file.display());
    }

    for (i, address) in addresses.iter().take(5).enumerate() {
        debug!("  {}: {}", i, address);
    }
    info!(
        "Wrote {} addresses to {}",
        addresses.len(),
        args.output.display()
    );

    Ok(())
}
