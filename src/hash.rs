//! Hash primitives shared with the membership circuit.
//!
//! Both primitives are circomlib-compatible Poseidon over the BN254 scalar
//! field, the same instances the circom circuit calls as `Poseidon(1)` and
//! `Poseidon(2)`. The two arities use different permutation widths, so a leaf
//! commitment can never collide with an internal node by construction.

use ark_bn254::Fr;
use ark_ff::PrimeField;
use light_poseidon::{Poseidon, PoseidonHasher};
use num_bigint::BigUint;

use crate::error::{Result, WhitelistError};
use crate::ethereum::ADDRESS_BYTES;

/// Encodes `value` as exactly `width` little-endian bytes.
///
/// # Errors
/// Returns [`WhitelistError::Encoding`] if the value needs more than `width`
/// bytes. The value is never truncated.
pub fn encode_le(value: &BigUint, width: usize) -> Result<Vec<u8>> {
    let mut bytes = value.to_bytes_le();
    if bytes.len() > width {
        return Err(WhitelistError::Encoding(format!(
            "value 0x{} exceeds the {}-byte width",
            value.to_str_radix(16),
            width
        )));
    }
    bytes.resize(width, 0);
    Ok(bytes)
}

fn poseidon(inputs: &[Fr]) -> Result<Fr> {
    let mut hasher = Poseidon::<Fr>::new_circom(inputs.len())?;
    Ok(hasher.hash(inputs)?)
}

/// Commitment to an address: `Poseidon(1)` over the address read as a field
/// element from its 20-byte little-endian encoding.
///
/// # Errors
/// Returns [`WhitelistError::Encoding`] if the address does not fit in 20 bytes.
///
/// # Example
///
/// ```
/// use num_bigint::BigUint;
/// use zk_whitelist::hash::commit;
///
/// let address = BigUint::from(0xdead_beefu64);
/// assert_eq!(commit(&address).unwrap(), commit(&address).unwrap());
/// ```
pub fn commit(address: &BigUint) -> Result<Fr> {
    let encoded = encode_le(address, ADDRESS_BYTES)?;
    // 160-bit values are always below the 254-bit modulus
    poseidon(&[Fr::from_le_bytes_mod_order(&encoded)])
}

/// Two-to-one compression used for every internal tree node.
///
/// # Errors
/// Only fails if the Poseidon parameters cannot be instantiated.
#[inline]
pub fn compress(left: Fr, right: Fr) -> Result<Fr> {
    poseidon(&[left, right])
}
