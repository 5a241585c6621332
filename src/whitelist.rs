//! A whitelist tree together with the addresses it was built from.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use num_bigint::BigUint;
use rand::Rng;

use crate::error::{Result, WhitelistError};
use crate::ethereum::ADDRESS_BYTES;
use crate::hash::commit;
use crate::merkle::MerkleTree;
use crate::storage::{from_storage_string, parse_source_csv, to_source_csv, to_storage_string};

/// Draws a uniformly random 20-byte address.
pub fn random_address<R: Rng + ?Sized>(rng: &mut R) -> BigUint {
    let mut bytes = [0u8; ADDRESS_BYTES];
    rng.fill_bytes(&mut bytes);
    BigUint::from_bytes_le(&bytes)
}

/// A Merkle tree of address commitments and the ordered addresses behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhitelistTree {
    tree: MerkleTree,
    addresses: Vec<BigUint>,
}

impl WhitelistTree {
    /// Commits every address in order and builds the tree.
    ///
    /// # Errors
    /// Encoding errors for oversized addresses, and the tree construction
    /// errors of [`MerkleTree::new`].
    pub fn from_addresses(addresses: Vec<BigUint>) -> Result<Self> {
        let leaves = addresses.iter().map(commit).collect::<Result<Vec<_>>>()?;
        let tree = MerkleTree::new(leaves)?;
        Ok(Self { tree, addresses })
    }

    /// A whitelist of `num_leaves` random addresses.
    ///
    /// # Errors
    /// [`WhitelistError::InvalidTreeSize`] unless `num_leaves` is a power of two.
    pub fn random<R: Rng + ?Sized>(num_leaves: usize, rng: &mut R) -> Result<Self> {
        Self::with_random_fill(Vec::new(), num_leaves, rng)
    }

    /// The given addresses first, then random addresses up to `num_leaves`.
    ///
    /// # Errors
    /// [`WhitelistError::InvalidTreeSize`] if more addresses than leaves are
    /// given or `num_leaves` is not a power of two.
    pub fn with_random_fill<R: Rng + ?Sized>(
        mut addresses: Vec<BigUint>,
        num_leaves: usize,
        rng: &mut R,
    ) -> Result<Self> {
        if addresses.len() > num_leaves {
            return Err(WhitelistError::InvalidTreeSize {
                leaves: addresses.len(),
            });
        }
        let given = addresses.len();
        addresses.extend((given..num_leaves).map(|_| random_address(rng)));
        Self::from_addresses(addresses)
    }

    #[must_use]
    pub fn tree(&self) -> &MerkleTree {
        &self.tree
    }

    #[must_use]
    pub fn addresses(&self) -> &[BigUint] {
        &self.addresses
    }

    #[must_use]
    pub fn address_at(&self, index: usize) -> Option<&BigUint> {
        self.addresses.get(index)
    }

    /// Leaf index of `address`, if whitelisted.
    #[must_use]
    pub fn index_of(&self, address: &BigUint) -> Option<usize> {
        commit(address)
            .ok()
            .and_then(|commitment| self.tree.index_of(&commitment))
    }

    /// Writes `<prefix>mt_<n>.csv` and `<prefix>mt_keys_<n>.txt` into `dir`.
    ///
    /// Returns the CSV path and the storage-string path.
    ///
    /// # Errors
    /// IO errors, or encoding errors for oversized addresses.
    pub fn save(&self, dir: &Path, prefix: &str) -> Result<(PathBuf, PathBuf)> {
        fs::create_dir_all(dir)?;
        let n = self.tree.len();

        let csv_path = dir.join(format!("{prefix}mt_{n}.csv"));
        fs::write(&csv_path, to_source_csv(&self.tree, &self.addresses)?)?;

        let keys_path = dir.join(format!("{prefix}mt_keys_{n}.txt"));
        fs::write(&keys_path, to_storage_string(&self.tree))?;

        info!(
            "Saved {} leaves to {} and {}",
            n,
            csv_path.display(),
            keys_path.display()
        );
        Ok((csv_path, keys_path))
    }

    /// Rebuilds a whitelist from a source CSV written by [`Self::save`].
    ///
    /// # Errors
    /// IO errors, [`WhitelistError::MalformedStorageForm`] for bad rows, and
    /// tree construction errors.
    pub fn read_source_csv(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let (addresses, leaves) = parse_source_csv(&contents)?;
        let tree = MerkleTree::new(leaves)?;
        Ok(Self { tree, addresses })
    }
}

/// Loads a tree from a storage-string file written by [`WhitelistTree::save`].
///
/// # Errors
/// IO errors and [`WhitelistError::MalformedStorageForm`].
pub fn load_tree(path: &Path) -> Result<MerkleTree> {
    let contents = fs::read_to_string(path)?;
    from_storage_string(&contents)
}
