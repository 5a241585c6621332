//! Ethereum address parsing and formatting.
//!
//! Addresses are handled as unsigned integers so that width violations are
//! detected explicitly instead of being masked by a fixed-size byte array.

use ethers::types::Address;
use num_bigint::BigUint;

use crate::error::{Result, WhitelistError};
use crate::utils::{parse_numeric_string, to_hex, validate_and_strip_hex};

/// Ethereum addresses are 20 bytes.
pub const ADDRESS_BYTES: usize = 20;

/// Expected length of an Ethereum address in hex characters (excluding 0x prefix)
pub const ADDRESS_HEX_LENGTH: usize = ADDRESS_BYTES * 2;

/// Expected length of an Ethereum private key in hex characters (excluding 0x prefix)
pub const PRIVATE_KEY_HEX_LENGTH: usize = 64;

/// Parses an address given as `0x` hex (any padding) or decimal.
///
/// Uppercase `0X` prefixes and surrounding whitespace are accepted.
///
/// # Errors
///
/// Returns [`WhitelistError::Encoding`] if the string is not numeric or the
/// value does not fit in 20 bytes.
///
/// # Examples
///
/// ```
/// use zk_whitelist::ethereum::{format_address, parse_address};
///
/// let address = parse_address("0x742d35Cc6634C0532925a3b844Bc454e4438f44e").unwrap();
/// assert_eq!(
///     format_address(&address).unwrap(),
///     "0x742d35cc6634c0532925a3b844bc454e4438f44e"
/// );
/// ```
pub fn parse_address(address: &str) -> Result<BigUint> {
    let trimmed = address.trim();
    let canonical = match trimmed.strip_prefix("0X") {
        Some(digits) => format!("0x{digits}"),
        None => trimmed.to_string(),
    };
    let value = parse_numeric_string(&canonical).ok_or_else(|| {
        WhitelistError::Encoding(format!("'{address}' is not a valid address"))
    })?;
    if value.bits() > (ADDRESS_BYTES * 8) as u64 {
        return Err(WhitelistError::Encoding(format!(
            "address '{address}' does not fit in {ADDRESS_BYTES} bytes"
        )));
    }
    Ok(value)
}

/// Formats an address as `0x`-prefixed 20-byte hex.
///
/// # Errors
///
/// Returns [`WhitelistError::Encoding`] if the value does not fit in 20 bytes.
pub fn format_address(address: &BigUint) -> Result<String> {
    to_hex(address, ADDRESS_BYTES)
}

/// Converts an `ethers` address into its integer value.
#[must_use]
pub fn address_to_biguint(address: &Address) -> BigUint {
    BigUint::from_bytes_be(address.as_bytes())
}

/// Parses a batch of addresses, reporting the 1-based line of the first failure.
///
/// # Errors
///
/// Returns an error if any address is invalid.
pub fn parse_addresses_batch(addresses: &[String]) -> Result<Vec<BigUint>> {
    addresses
        .iter()
        .enumerate()
        .map(|(i, addr)| {
            parse_address(addr).map_err(|e| {
                WhitelistError::Encoding(format!("line {}: {}", i + 1, e))
            })
        })
        .collect()
}

/// Validates a single Ethereum address.
///
/// An address is considered valid if it is exactly 42 characters, starts with
/// "0x", the remaining characters are hex digits and it is not the zero address.
///
/// # Examples
///
/// ```
/// use zk_whitelist::ethereum::validate_address;
///
/// assert!(validate_address("0x742d35Cc6634C0532925a3b844Bc454e4438f44e"));
/// assert!(!validate_address("0x0000000000000000000000000000000000000000"));
/// assert!(!validate_address("invalid"));
/// ```
#[must_use]
pub fn validate_address(address: &str) -> bool {
    address.len() == ADDRESS_HEX_LENGTH + 2
        && address.starts_with("0x")
        && address[2..].chars().all(|c| c.is_ascii_hexdigit())
        && !address[2..].chars().all(|c| c == '0')
}

/// Validates an Ethereum private key.
///
/// # Errors
///
/// Returns an error if the key is not 64 hex characters or is all zeros.
pub fn validate_private_key(private_key: &str) -> Result<()> {
    let stripped = validate_and_strip_hex(private_key, PRIVATE_KEY_HEX_LENGTH)?;

    if stripped.chars().all(|c| c == '0') {
        return Err(WhitelistError::Encoding(
            "Private key cannot be all zeros. Please provide a valid private key.".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address_hex_and_decimal() {
        assert_eq!(parse_address("0x10").unwrap(), BigUint::from(16u32));
        assert_eq!(parse_address("0X10").unwrap(), BigUint::from(16u32));
        assert_eq!(parse_address(" 16 ").unwrap(), BigUint::from(16u32));
    }

    #[test]
    fn test_parse_address_accepts_word_padded_hex() {
        let padded = format!("0x{:0>64}", "742d35cc6634c0532925a3b844bc454e4438f44e");
        let short = "0x742d35cc6634c0532925a3b844bc454e4438f44e";
        assert_eq!(parse_address(&padded).unwrap(), parse_address(short).unwrap());
    }

    #[test]
    fn test_parse_address_rejects_wide_values() {
        let wide = format!("0x1{}", "0".repeat(ADDRESS_HEX_LENGTH));
        assert!(matches!(
            parse_address(&wide),
            Err(WhitelistError::Encoding(_))
        ));
    }

    #[test]
    fn test_parse_address_rejects_garbage() {
        assert!(parse_address("0xzz").is_err());
        assert!(parse_address("").is_err());
    }

    #[test]
    fn test_format_address_pads_to_twenty_bytes() {
        let formatted = format_address(&BigUint::from(1u32)).unwrap();
        assert_eq!(formatted.len(), 42);
        assert!(formatted.ends_with("01"));
    }

    #[test]
    fn test_address_to_biguint_is_big_endian() {
        let address: Address = "0x0000000000000000000000000000000000000102"
            .parse()
            .unwrap();
        assert_eq!(address_to_biguint(&address), BigUint::from(0x0102u32));
    }

    #[test]
    fn test_parse_addresses_batch_reports_line() {
        let addresses = vec!["0x01".to_string(), "bogus".to_string()];
        let err = parse_addresses_batch(&addresses).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_validate_address() {
        assert!(validate_address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"));
        assert!(!validate_address("0x123456"));
        assert!(!validate_address("1234567890123456789012345678901234567890"));
        assert!(!validate_address("0x0000000000000000000000000000000000000000"));
    }

    #[test]
    fn test_validate_private_key() {
        assert!(validate_private_key(
            "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318"
        )
        .is_ok());
        assert!(validate_private_key(
            "0x0000000000000000000000000000000000000000000000000000000000000000"
        )
        .is_err());
    }
}
