// Binary (square-and-multiply) modular exponentiation.
//
// Every other part of the crate goes through `mod_exp`: the primality rounds,
// encryption, both halves of CRT decryption and the Wiener candidate check.
// The exponent is walked from its least significant bit upwards. At each step
// the running base is squared, and when the current bit is set it's folded
// into the accumulator:
//
//   g = (g_n ... g_1 g_0)_2
//   a^g = a^(g_0) * (a^2)^(g_1) * (a^4)^(g_2) * ...
//
// so only O(log g) multiplications are needed, each reduced modulo N to keep
// the operands no larger than N^2.

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::{Error, Result};

/// Compute `base ^ exponent mod modulus`.
///
/// Panics if `modulus` is zero, in the same way `BigUint::modpow` does. Use
/// [try_mod_exp] for a checked version.
pub fn mod_exp(base: &BigUint, exponent: &BigUint, modulus: &BigUint) -> BigUint {
    assert!(!modulus.is_zero(), "modulus must be non-zero");

    // Reducing here means 'a^0 mod 1' gives 0 rather than 1.
    let mut d = BigUint::one() % modulus;
    let mut x = base % modulus;
    for i in 0..exponent.bits() {
        if exponent.bit(i) {
            d = (&d * &x) % modulus;
        }
        x = (&x * &x) % modulus;
    }
    d
}

pub fn try_mod_exp(base: &BigUint, exponent: &BigUint, modulus: &BigUint) -> Result<BigUint> {
    if modulus.is_zero() {
        return Err(Error::InvalidInput("modulus must be non-zero".to_string()));
    }
    Ok(mod_exp(base, exponent, modulus))
}
