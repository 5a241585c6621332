//! Canonical text encodings of a tree.
//!
//! Two layouts are supported:
//!
//! - The storage string: the root followed by every leaf in index order, each
//!   a `0x`-prefixed 32-byte hex field element, separated by commas.
//! - The source CSV: an `address,commitment` header followed by one row per
//!   leaf, pairing each whitelisted address with its commitment.
//!
//! Decoding always rebuilds the tree from the leaves and checks the result
//! against what was stored.

use num_bigint::BigUint;
use ark_bn254::Fr;

use crate::error::{Result, WhitelistError};
use crate::ethereum::{format_address, parse_address};
use crate::hash::commit;
use crate::merkle::MerkleTree;
use crate::utils::{field_from_str, field_to_hex};

/// Header row of the source CSV.
pub const CSV_HEADER: &str = "address,commitment";

const DELIMITER: char = ',';

/// Encodes a tree as `root,leaf0,leaf1,...`.
#[must_use]
pub fn to_storage_string(tree: &MerkleTree) -> String {
    std::iter::once(tree.root())
        .chain(tree.leaves().iter().copied())
        .map(|field| field_to_hex(&field))
        .collect::<Vec<_>>()
        .join(",")
}

/// Decodes a storage string and rebuilds the tree.
///
/// # Errors
/// Returns [`WhitelistError::MalformedStorageForm`] if the input is empty,
/// holds a non-numeric token, has a leaf count the tree cannot be built from,
/// or records a root that differs from the rebuilt one.
pub fn from_storage_string(data: &str) -> Result<MerkleTree> {
    let data = data.trim();
    if data.is_empty() {
        return Err(malformed("storage string is empty"));
    }

    let fields = data
        .split(DELIMITER)
        .enumerate()
        .map(|(i, token)| {
            field_from_str(token)
                .map_err(|e| malformed(format!("field {i} ('{}'): {e}", token.trim())))
        })
        .collect::<Result<Vec<Fr>>>()?;

    let (stored_root, leaves) = fields
        .split_first()
        .ok_or_else(|| malformed("storage string has no root"))?;
    if leaves.is_empty() {
        return Err(malformed("storage string has a root but no leaves"));
    }

    let tree = MerkleTree::new(leaves.to_vec()).map_err(|e| malformed(e.to_string()))?;
    if tree.root() != *stored_root {
        return Err(malformed(format!(
            "stored root {} does not match rebuilt root {}",
            field_to_hex(stored_root),
            field_to_hex(&tree.root())
        )));
    }
    Ok(tree)
}

/// Encodes the address/commitment pairs of a whitelist as CSV.
///
/// # Errors
/// Returns [`WhitelistError::Encoding`] if an address does not fit in 20
/// bytes, or [`WhitelistError::MalformedStorageForm`] if the address count
/// differs from the leaf count.
pub fn to_source_csv(tree: &MerkleTree, addresses: &[BigUint]) -> Result<String> {
    if addresses.len() != tree.len() {
        return Err(malformed(format!(
            "{} addresses for {} leaves",
            addresses.len(),
            tree.len()
        )));
    }

    let mut csv = String::with_capacity(CSV_HEADER.len() + 1 + tree.len() * 112);
    csv.push_str(CSV_HEADER);
    csv.push('\n');
    for (address, leaf) in addresses.iter().zip(tree.leaves()) {
        csv.push_str(&format_address(address)?);
        csv.push(DELIMITER);
        csv.push_str(&field_to_hex(leaf));
        csv.push('\n');
    }
    Ok(csv)
}

/// Parses a source CSV into its addresses and leaf commitments.
///
/// Rows with fewer than two columns are skipped, so trailing blank lines are
/// harmless. Every commitment is checked against the commitment of its
/// address.
///
/// # Errors
/// Returns [`WhitelistError::MalformedStorageForm`] on a missing header,
/// non-numeric cells, or a commitment that does not match its address.
pub fn parse_source_csv(contents: &str) -> Result<(Vec<BigUint>, Vec<Fr>)> {
    let mut lines = contents.lines();
    match lines.next() {
        Some(header) if header.trim() == CSV_HEADER => {}
        Some(header) => {
            return Err(malformed(format!(
                "expected header '{CSV_HEADER}', found '{}'",
                header.trim()
            )))
        }
        None => return Err(malformed("source CSV is empty")),
    }

    let mut addresses = Vec::new();
    let mut leaves = Vec::new();
    for (row, line) in lines.enumerate() {
        let tokens: Vec<&str> = line.split(DELIMITER).collect();
        if tokens.len() < 2 {
            continue;
        }
        let line_no = row + 2;
        let address = parse_address(tokens[0])
            .map_err(|e| malformed(format!("line {line_no}: {e}")))?;
        let commitment = field_from_str(tokens[1])
            .map_err(|e| malformed(format!("line {line_no}: {e}")))?;
        if commit(&address)? != commitment {
            return Err(malformed(format!(
                "line {line_no}: commitment does not match address {}",
                tokens[0].trim()
            )));
        }
        addresses.push(address);
        leaves.push(commitment);
    }
    Ok((addresses, leaves))
}

fn malformed(message: impl Into<String>) -> WhitelistError {
    WhitelistError::MalformedStorageForm(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_tree() -> MerkleTree {
        let leaves = (1..=4u64).map(Fr::from).collect();
        MerkleTree::new(leaves).unwrap()
    }

    #[test]
    fn test_storage_string_layout() {
        let tree = dummy_tree();
        let encoded = to_storage_string(&tree);
        let tokens: Vec<&str> = encoded.split(',').collect();
        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[0], field_to_hex(&tree.root()));
        assert_eq!(tokens[1], format!("0x{:0>64}", "1"));
        assert!(tokens.iter().all(|t| t.len() == 66));
    }

    #[test]
    fn test_storage_round_trip_is_textually_stable() {
        let tree = dummy_tree();
        let first = to_storage_string(&tree);
        let rebuilt = from_storage_string(&first).unwrap();
        assert_eq!(rebuilt.root(), tree.root());
        assert_eq!(rebuilt.leaves(), tree.leaves());
        assert_eq!(to_storage_string(&rebuilt), first);
    }

    #[test]
    fn test_storage_accepts_decimal_and_unpadded_tokens() {
        let tree = dummy_tree();
        let root = crate::utils::field_to_biguint(&tree.root());
        let loose = format!("{root}, 0x1,2 ,0x03,4\n");
        let rebuilt = from_storage_string(&loose).unwrap();
        assert_eq!(to_storage_string(&rebuilt), to_storage_string(&tree));
    }

    #[test]
    fn test_storage_rejects_empty() {
        assert!(matches!(
            from_storage_string("  "),
            Err(WhitelistError::MalformedStorageForm(_))
        ));
    }

    #[test]
    fn test_storage_rejects_root_only() {
        let tree = dummy_tree();
        let root_only = field_to_hex(&tree.root());
        assert!(matches!(
            from_storage_string(&root_only),
            Err(WhitelistError::MalformedStorageForm(_))
        ));
    }

    #[test]
    fn test_storage_rejects_non_numeric_token() {
        let encoded = to_storage_string(&dummy_tree()).replacen("0x", "zz", 2);
        assert!(matches!(
            from_storage_string(&encoded),
            Err(WhitelistError::MalformedStorageForm(_))
        ));
    }

    #[test]
    fn test_storage_rejects_truncated_leaf_list() {
        let encoded = to_storage_string(&dummy_tree());
        let truncated = &encoded[..encoded.rfind(',').unwrap()];
        assert!(matches!(
            from_storage_string(truncated),
            Err(WhitelistError::MalformedStorageForm(_))
        ));
    }

    #[test]
    fn test_storage_rejects_wrong_root() {
        let tree = dummy_tree();
        let leaves: Vec<String> = tree.leaves().iter().map(field_to_hex).collect();
        let forged = format!("0x01,{}", leaves.join(","));
        let err = from_storage_string(&forged).unwrap_err();
        assert!(err.to_string().contains("does not match"));
    }

    #[test]
    fn test_source_csv_round_trip() {
        let addresses: Vec<BigUint> = (1..=4u32).map(BigUint::from).collect();
        let leaves = addresses.iter().map(|a| commit(a).unwrap()).collect();
        let tree = MerkleTree::new(leaves).unwrap();

        let csv = to_source_csv(&tree, &addresses).unwrap();
        assert!(csv.starts_with("address,commitment\n"));
        assert_eq!(csv.lines().count(), 5);

        let (parsed_addresses, parsed_leaves) = parse_source_csv(&csv).unwrap();
        assert_eq!(parsed_addresses, addresses);
        assert_eq!(parsed_leaves, tree.leaves());
    }

    #[test]
    fn test_source_csv_skips_short_rows() {
        let address = BigUint::from(9u32);
        let csv = format!(
            "address,commitment\n{},{}\n\n",
            format_address(&address).unwrap(),
            field_to_hex(&commit(&address).unwrap())
        );
        let (addresses, _) = parse_source_csv(&csv).unwrap();
        assert_eq!(addresses.len(), 1);
    }

    #[test]
    fn test_source_csv_rejects_mismatched_commitment() {
        let csv = format!(
            "address,commitment\n{},{}\n",
            format_address(&BigUint::from(9u32)).unwrap(),
            field_to_hex(&Fr::from(9u64))
        );
        assert!(matches!(
            parse_source_csv(&csv),
            Err(WhitelistError::MalformedStorageForm(_))
        ));
    }

    #[test]
    fn test_source_csv_requires_header() {
        assert!(parse_source_csv("0x01,0x02\n").is_err());
        assert!(parse_source_csv("").is_err());
    }

    #[test]
    fn test_source_csv_rejects_address_count_mismatch() {
        let tree = dummy_tree();
        assert!(to_source_csv(&tree, &[BigUint::from(1u32)]).is_err());
    }
}
