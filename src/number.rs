// Number-theoretic helpers shared by key generation: random sampling, Euclid's
// algorithm and modular inverses.

use log::warn;
use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};

use crate::{Error, Result};

/// Uniformly random odd integer with exactly `n_bits` bits (top bit set).
pub fn random_n_bit(n_bits: u64, rng: &mut impl RandBigInt) -> Result<BigUint> {
    if n_bits < 2 {
        return Err(Error::InvalidInput(format!(
            "cannot sample an odd {n_bits}-bit integer with its top bit set"
        )));
    }
    let mut x = rng.gen_biguint(n_bits);
    x.set_bit(n_bits - 1, true);
    x.set_bit(0, true);
    Ok(x)
}

pub fn gcd(mut a: BigUint, mut b: BigUint) -> BigUint {
    let zero = BigUint::zero();
    while b != zero {
        let r = &a % &b;
        a = b;
        b = r;
    }
    a
}

/// Random value in [1, x) that is coprime to x.
pub fn pick_coprime(
    x: &BigUint,
    max_attempts: Option<u64>,
    rng: &mut impl RandBigInt,
) -> Result<BigUint> {
    let one = BigUint::one();
    if x <= &one {
        return Err(Error::InvalidInput(format!("no value in [1, {x}) to pick")));
    }

    let mut attempts = 0u64;
    loop {
        if max_attempts.is_some_and(|max| attempts >= max) {
            warn!("no value coprime to {x} found in {attempts} attempts");
            return Err(Error::NoCoprimeFound);
        }
        attempts += 1;

        let candidate = rng.gen_biguint_range(&one, x);
        if gcd(candidate.clone(), x.clone()).is_one() {
            return Ok(candidate);
        }
    }
}

/// The x in [0, m) with a * x = 1 mod m.
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Result<BigUint> {
    if m.is_zero() {
        return Err(Error::InvalidInput("modulus must be non-zero".to_string()));
    }
    if m.is_one() {
        return Ok(BigUint::zero());
    }
    a.modinv(m).ok_or(Error::NoInverseExists)
}
