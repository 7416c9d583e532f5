// Functions related to identification and generation of prime numbers.
//
// Two probabilistic tests are available. Miller-Rabin is the default; Fermat
// is kept for comparison. Both run a configurable number of independent
// rounds with a fresh random witness each round, and bail out on the first
// round that proves the candidate composite.
//
// Note that the Fermat test is fooled by Carmichael numbers (e.g. 561) for
// any witness coprime to them. It only rejects a Carmichael number if it
// happens to draw a witness sharing a factor with it, which the large round
// count makes likely but not certain. This is a property of the test, not
// something to fix here.

use log::{debug, warn};
use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};

use crate::{mod_exp, random_n_bit, Error, Result};

/// Error probability <= 4^-40 for Miller-Rabin.
pub const MILLER_RABIN_ROUNDS: u32 = 40;
pub const FERMAT_ROUNDS: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimalityTest {
    MillerRabin,
    Fermat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimalityConfig {
    pub test: PrimalityTest,
    pub rounds: u32,
}

impl PrimalityConfig {
    pub fn miller_rabin() -> Self {
        Self {
            test: PrimalityTest::MillerRabin,
            rounds: MILLER_RABIN_ROUNDS,
        }
    }

    pub fn fermat() -> Self {
        Self {
            test: PrimalityTest::Fermat,
            rounds: FERMAT_ROUNDS,
        }
    }

    /// Set the number of rounds. At least one round is always run, since
    /// zero rounds would accept every odd candidate.
    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds.max(1);
        self
    }
}

impl Default for PrimalityConfig {
    fn default() -> Self {
        Self::miller_rabin()
    }
}

pub fn is_probably_prime(
    candidate: &BigUint,
    config: &PrimalityConfig,
    rng: &mut impl RandBigInt,
) -> bool {
    let one = BigUint::one();
    let three = BigUint::from(3u64);
    if candidate <= &one {
        return false;
    }
    if candidate <= &three {
        return true;
    }
    if !candidate.bit(0) {
        return false;
    }

    match config.test {
        PrimalityTest::MillerRabin => {
            let (k, q) = split_power_of_two(candidate);
            (0..config.rounds.max(1)).all(|_| miller_rabin_round(candidate, k, &q, rng))
        }
        PrimalityTest::Fermat => {
            (0..config.rounds.max(1)).all(|_| fermat_round(candidate, rng))
        }
    }
}

/// As [is_probably_prime], but treats n <= 1 as a caller error.
pub fn try_is_probably_prime(
    candidate: &BigUint,
    config: &PrimalityConfig,
    rng: &mut impl RandBigInt,
) -> Result<bool> {
    if candidate <= &BigUint::one() {
        return Err(Error::InvalidInput(format!(
            "cannot test {candidate} for primality"
        )));
    }
    Ok(is_probably_prime(candidate, config, rng))
}

/// Find k, q such that n - 1 = 2^k * q with q odd. Requires n odd and n > 1.
fn split_power_of_two(n: &BigUint) -> (u64, BigUint) {
    let n_minus_one = n - 1u32;
    let k = n_minus_one.trailing_zeros().unwrap_or(0);
    (k, n_minus_one >> k)
}

/// Returns false if the candidate is definitely composite.
fn miller_rabin_round(n: &BigUint, k: u64, q: &BigUint, rng: &mut impl RandBigInt) -> bool {
    let one = BigUint::one();
    let n_minus_one = n - &one;

    let a = random_witness(n, rng);
    let mut x = mod_exp(&a, q, n);
    if x == one || x == n_minus_one {
        return true;
    }
    // Look for a^(2^j * q) = -1 mod n for some 0 < j < k.
    let two = BigUint::from(2u64);
    for _ in 1..k {
        x = mod_exp(&x, &two, n);
        if x == n_minus_one {
            return true;
        }
    }
    false
}

fn fermat_round(n: &BigUint, rng: &mut impl RandBigInt) -> bool {
    let a = random_witness(n, rng);
    mod_exp(&a, &(n - 1u32), n).is_one()
}

/// Uniform witness in [2, n - 2]. Requires n >= 5.
fn random_witness(n: &BigUint, rng: &mut impl RandBigInt) -> BigUint {
    rng.gen_biguint_range(&BigUint::from(2u64), &(n - 1u32))
}

/// Draw random odd `n_bits` integers until one passes the primality test.
///
/// `max_attempts` caps the number of candidates drawn; `None` keeps drawing
/// until a prime turns up.
pub fn generate_prime(
    n_bits: u64,
    config: &PrimalityConfig,
    max_attempts: Option<u64>,
    rng: &mut impl RandBigInt,
) -> Result<BigUint> {
    generate_distinct_prime(n_bits, &BigUint::zero(), config, max_attempts, rng)
}

/// As [generate_prime], but never returns `exclude`.
pub fn generate_distinct_prime(
    n_bits: u64,
    exclude: &BigUint,
    config: &PrimalityConfig,
    max_attempts: Option<u64>,
    rng: &mut impl RandBigInt,
) -> Result<BigUint> {
    if n_bits < 2 {
        return Err(Error::InvalidInput(format!(
            "cannot generate a {n_bits}-bit prime"
        )));
    }

    let mut attempts = 0u64;
    loop {
        if max_attempts.is_some_and(|max| attempts >= max) {
            warn!("no {n_bits}-bit prime found in {attempts} candidates");
            return Err(Error::AttemptsExhausted {
                what: "prime",
                attempts,
            });
        }
        attempts += 1;

        let candidate = random_n_bit(n_bits, rng)?;
        if &candidate != exclude && is_probably_prime(&candidate, config, rng) {
            debug!("found {n_bits}-bit prime after {attempts} candidates");
            return Ok(candidate);
        }
    }
}
