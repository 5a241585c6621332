use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use zk_whitelist::{
    config::Config,
    ethereum::{format_address, parse_addresses_batch},
    utils::field_to_hex,
    WhitelistTree,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Build a whitelist Merkle tree", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, default_value = "whitelist.toml")]
    config: PathBuf,

    /// Overrides `[tree] height` from the config file
    #[arg(long)]
    height: Option<usize>,

    /// Addresses to whitelist, one per line; remaining leaves are random
    #[arg(short, long)]
    accounts_file: Option<PathBuf>,

    /// Overrides `[files] output_dir`
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Overrides `[files] prefix`
    #[arg(short, long)]
    prefix: Option<String>,
}

fn read_accounts(path: &Path, max_file_size: u64) -> Result<Vec<String>> {
    let metadata = fs::metadata(path)
        .with_context(|| format!("Failed to read accounts file metadata: {}", path.display()))?;

    if metadata.len() > max_file_size {
        return Err(anyhow::anyhow!(
            "Accounts file too large: {} bytes (max {} bytes)",
            metadata.len(),
            max_file_size
        ));
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read accounts file: {}", path.display()))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = Config::load_from_file_or_default(&args.config)?;
    if let Some(height) = args.height {
        config.tree.height = height;
    }
    if let Some(output_dir) = args.output_dir {
        config.files.output_dir = output_dir;
    }
    if let Some(prefix) = args.prefix {
        config.files.prefix = prefix;
    }
    config.validate()?;

    let addresses = match &args.accounts_file {
        Some(path) => {
            let lines = read_accounts(path, config.files.max_file_size)?;
            info!("Loaded {} addresses from {}", lines.len(), path.display());
            parse_addresses_batch(&lines)
                .with_context(|| format!("Invalid address in {}", path.display()))?
        }
        None => Vec::new(),
    };

    let num_leaves = config.num_leaves();
    info!(
        "Building height-{} tree with {} leaves ({} given, {} random)",
        config.tree.height,
        num_leaves,
        addresses.len(),
        num_leaves.saturating_sub(addresses.len())
    );
    let whitelist =
        WhitelistTree::with_random_fill(addresses, num_leaves, &mut rand::thread_rng())
            .context("Failed to build whitelist tree")?;

    let (csv_path, keys_path) = whitelist
        .save(&config.files.output_dir, &config.files.prefix)
        .context("Failed to save whitelist tree")?;

    if let Some(first) = whitelist.address_at(0) {
        info!("First address: {}", format_address(first)?);
    }
    info!("Source CSV: {}", csv_path.display());
    info!("Storage form: {}", keys_path.display());

    println!("{}", field_to_hex(&whitelist.tree().root()));

    Ok(())
}
