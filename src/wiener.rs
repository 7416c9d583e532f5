// Wiener's attack on RSA with a small private exponent
//
// Since e * d = 1 mod phi(N), there's some k with e * d - k * phi(N) = 1.
// Dividing through by d * N gives
//
//   e / N - k / d = 1 / (d * N) + k * (N - phi(N)) / (d * N)
//
// and the right-hand side is tiny when d is small. Legendre's theorem then
// says that, for d < N^(1/4) / 3, k / d must be one of the convergents of
// the continued fraction of e / N. So we walk the convergents and test each
// denominator as a candidate private exponent.
//
// A candidate c is correct if it undoes encryption, and the cheapest check
// for that is whether (2^e)^c = 2 mod N. If no convergent passes, the
// private exponent was too large for the attack to work and we give up.

use log::{debug, info};
use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::{mod_exp, PublicKey};

/// Partial quotients of the continued fraction of x / y.
pub fn partial_quotients(x: &BigUint, y: &BigUint) -> Vec<BigUint> {
    let mut quotients = Vec::new();
    if y.is_zero() {
        return quotients;
    }

    let mut x = x.clone();
    let mut y = y.clone();
    loop {
        quotients.push(&x / &y);
        let remainder = &x % &y;
        if remainder.is_zero() {
            return quotients;
        }
        x = y;
        y = remainder;
    }
}

/// Denominators of the convergents built from the given partial quotients.
///
/// Uses the recurrence
///   d_0 = 1, d_1 = a_1, d_i = a_i * d_(i-1) + d_(i-2)
pub fn convergent_denominators(quotients: &[BigUint]) -> Vec<BigUint> {
    let mut denominators: Vec<BigUint> = Vec::with_capacity(quotients.len());
    for (i, a) in quotients.iter().enumerate() {
        let d = match i {
            0 => BigUint::one(),
            1 => a.clone(),
            _ => a * &denominators[i - 1] + &denominators[i - 2],
        };
        denominators.push(d);
    }
    denominators
}

/// Try to recover the private exponent for the public key (n, e).
///
/// Returns `None` if none of the convergents of e / n give an exponent that
/// decrypts correctly.
pub fn wiener_attack(n: &BigUint, e: &BigUint) -> Option<BigUint> {
    let two = BigUint::from(2u64);
    if n <= &two {
        return None;
    }

    let denominators = convergent_denominators(&partial_quotients(e, n));
    for (tried, candidate) in denominators.iter().skip(1).enumerate() {
        if mod_exp(&two, &(e * candidate), n) == two {
            info!("recovered private exponent after {} convergents", tried + 1);
            return Some(candidate.clone());
        }
    }

    debug!(
        "no private exponent found in {} convergents",
        denominators.len().saturating_sub(1)
    );
    None
}

impl PublicKey {
    pub fn wiener_attack(&self) -> Option<BigUint> {
        wiener_attack(&self.n, &self.e)
    }
}
