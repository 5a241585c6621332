//! Utility functions for hex validation, numeric strings and field conversions.

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};
use num_bigint::BigUint;
use num_traits::Num;

use crate::error::{Result, WhitelistError};

/// Width in bytes of a serialized field element.
pub const FIELD_BYTES: usize = 32;

fn is_valid_hex_string(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_hexdigit())
}

fn strip_hex_prefix(input: &str) -> &str {
    input
        .trim()
        .strip_prefix("0x")
        .or_else(|| input.trim().strip_prefix("0X"))
        .unwrap_or_else(|| input.trim())
}

/// Validates and strips hex prefix from a string.
///
/// # Errors
/// Returns [`WhitelistError::Encoding`] if the stripped string has the wrong
/// length or contains non-hex characters.
///
/// # Examples
///
/// ```
/// use zk_whitelist::utils::validate_and_strip_hex;
///
/// let result = validate_and_strip_hex("0x1234abcd", 8).unwrap();
/// assert_eq!(result, "1234abcd");
/// ```
pub fn validate_and_strip_hex(input: &str, expected_len: usize) -> Result<String> {
    let stripped = strip_hex_prefix(input);

    if stripped.len() != expected_len {
        return Err(WhitelistError::Encoding(format!(
            "Invalid hex string: must be {} characters (got {})",
            expected_len,
            stripped.len()
        )));
    }

    if !is_valid_hex_string(stripped) {
        return Err(WhitelistError::Encoding(
            "Invalid hex string: contains non-hex characters".to_string(),
        ));
    }

    Ok(stripped.to_string())
}

/// Returns true if the string is non-empty hex, with or without prefix.
#[must_use]
pub fn validate_hex_string(input: &str) -> bool {
    let stripped = strip_hex_prefix(input);

    if stripped.is_empty() {
        return false;
    }

    is_valid_hex_string(stripped)
}

/// Parses a numeric string in one of the two forms emitted by provers:
/// pure decimal (`^[0-9]+$`) or lowercase-prefixed hex (`^0x[0-9a-fA-F]+$`).
///
/// Returns `None` for anything else, including surrounding whitespace.
///
/// ```
/// use num_bigint::BigUint;
/// use zk_whitelist::utils::parse_numeric_string;
///
/// assert_eq!(parse_numeric_string("255"), Some(BigUint::from(255u32)));
/// assert_eq!(parse_numeric_string("0xff"), Some(BigUint::from(255u32)));
/// assert_eq!(parse_numeric_string("plonk"), None);
/// ```
#[must_use]
pub fn parse_numeric_string(s: &str) -> Option<BigUint> {
    if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) {
        return BigUint::from_str_radix(s, 10).ok();
    }
    match s.strip_prefix("0x") {
        Some(digits) if !digits.is_empty() && is_valid_hex_string(digits) => {
            BigUint::from_str_radix(digits, 16).ok()
        }
        _ => None,
    }
}

/// Formats `value` as `0x`-prefixed, zero-padded hex of exactly `width` bytes.
///
/// # Errors
/// Returns [`WhitelistError::Encoding`] if the value needs more than `width` bytes.
pub fn to_hex(value: &BigUint, width: usize) -> Result<String> {
    let digits = value.to_str_radix(16);
    if digits.len() > width * 2 {
        return Err(WhitelistError::Encoding(format!(
            "value 0x{digits} does not fit in {width} bytes"
        )));
    }
    Ok(format!("0x{digits:0>pad$}", pad = width * 2))
}

/// Converts a field element to its canonical integer value.
#[must_use]
pub fn field_to_biguint(field: &Fr) -> BigUint {
    BigUint::from_bytes_le(&field.into_bigint().to_bytes_le())
}

fn field_modulus() -> BigUint {
    BigUint::from_bytes_le(&Fr::MODULUS.to_bytes_le())
}

/// Converts an integer to a BN254 scalar.
///
/// # Errors
/// Returns [`WhitelistError::Encoding`] if the value is not below the field modulus.
pub fn biguint_to_field(value: &BigUint) -> Result<Fr> {
    if *value >= field_modulus() {
        return Err(WhitelistError::Encoding(format!(
            "value {value} is not below the field modulus"
        )));
    }
    Ok(Fr::from_le_bytes_mod_order(&value.to_bytes_le()))
}

/// Formats a field element as `0x`-prefixed 32-byte big-endian hex.
#[must_use]
pub fn field_to_hex(field: &Fr) -> String {
    format!("0x{}", hex::encode(field.into_bigint().to_bytes_be()))
}

/// Parses a decimal or `0x` hex string into a field element.
///
/// # Errors
/// Returns [`WhitelistError::Encoding`] for non-numeric input or values
/// outside the field.
pub fn field_from_str(s: &str) -> Result<Fr> {
    let value = parse_numeric_string(s.trim())
        .ok_or_else(|| WhitelistError::Encoding(format!("'{s}' is not a numeric string")))?;
    biguint_to_field(&value)
}

/// Little-endian canonical representation of a field element.
#[inline]
#[must_use]
pub fn field_to_bytes(field: &Fr) -> [u8; FIELD_BYTES] {
    let mut bytes = [0u8; FIELD_BYTES];
    bytes.copy_from_slice(&field.into_bigint().to_bytes_le());
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_and_strip_hex_valid() {
        let result = validate_and_strip_hex("0x1234abcd", 8);
        assert_eq!(result.unwrap(), "1234abcd");
    }

    #[test]
    fn test_validate_and_strip_hex_uppercase_prefix() {
        let result = validate_and_strip_hex("0X1234ABCD", 8);
        assert_eq!(result.unwrap(), "1234ABCD");
    }

    #[test]
    fn test_validate_and_strip_hex_with_whitespace() {
        let result = validate_and_strip_hex("  0x1234abcd  ", 8);
        assert_eq!(result.unwrap(), "1234abcd");
    }

    #[test]
    fn test_validate_and_strip_hex_wrong_length() {
        let result = validate_and_strip_hex("0x1234abcd", 10);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("must be 10 characters"));
    }

    #[test]
    fn test_validate_and_strip_hex_invalid_characters() {
        let result = validate_and_strip_hex("0x1234xyzw", 8);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("non-hex characters"));
    }

    #[test]
    fn test_validate_hex_string() {
        assert!(validate_hex_string("0x1234abcd"));
        assert!(validate_hex_string("1234abcd"));
        assert!(!validate_hex_string("0x1234xyzw"));
        assert!(!validate_hex_string(""));
    }

    #[test]
    fn test_parse_numeric_string_forms() {
        assert_eq!(parse_numeric_string("0"), Some(BigUint::from(0u32)));
        assert_eq!(
            parse_numeric_string("0xDeadBeef"),
            Some(BigUint::from(0xdead_beefu32))
        );
        assert_eq!(parse_numeric_string(""), None);
        assert_eq!(parse_numeric_string("0x"), None);
        assert_eq!(parse_numeric_string("0X10"), None);
        assert_eq!(parse_numeric_string("-1"), None);
        assert_eq!(parse_numeric_string(" 12"), None);
        assert_eq!(parse_numeric_string("bn128"), None);
    }

    #[test]
    fn test_parse_numeric_string_exceeds_u64() {
        let big = "21888242871839275222246405745257275088548364400416034343698204186575808495617";
        let parsed = parse_numeric_string(big).unwrap();
        assert_eq!(parsed.to_str_radix(10), big);
    }

    #[test]
    fn test_to_hex_pads_to_width() {
        assert_eq!(to_hex(&BigUint::from(1u32), 4).unwrap(), "0x00000001");
        assert_eq!(
            to_hex(&BigUint::from(0u32), 20).unwrap(),
            format!("0x{}", "0".repeat(40))
        );
    }

    #[test]
    fn test_to_hex_rejects_overflow() {
        let value = BigUint::from(0x1_0000u32);
        assert!(matches!(
            to_hex(&value, 2),
            Err(WhitelistError::Encoding(_))
        ));
    }

    #[test]
    fn test_field_hex_round_trip() {
        let field = Fr::from(0x1234u64);
        let hex = field_to_hex(&field);
        assert_eq!(hex.len(), 2 + 64);
        assert!(hex.ends_with("1234"));
        assert_eq!(field_from_str(&hex).unwrap(), field);
        assert_eq!(field_from_str("4660").unwrap(), field);
    }

    #[test]
    fn test_biguint_to_field_rejects_modulus() {
        let modulus = BigUint::from_str_radix(
            "21888242871839275222246405745257275088548364400416034343698204186575808495617",
            10,
        )
        .unwrap();
        assert_eq!(field_modulus(), modulus);
        assert!(biguint_to_field(&(modulus.clone() - 1u32)).is_ok());
        assert!(biguint_to_field(&modulus).is_err());
    }

    #[test]
    fn test_biguint_to_field_rejects_pallas_sized_values() {
        // Pallas base field modulus, larger than the BN254 scalar modulus
        let pallas = BigUint::from_str_radix(
            "40000000000000000000000000000000224698fc094cf91b992d30ed00000001",
            16,
        )
        .unwrap();
        assert!(matches!(
            biguint_to_field(&(pallas - 1u32)),
            Err(WhitelistError::Encoding(_))
        ));
    }

    #[test]
    fn test_field_from_str_rejects_garbage() {
        assert!(field_from_str("not-a-number").is_err());
    }
}
