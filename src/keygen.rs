// CRT-RSA key generation.
//
// Two distinct primes of the requested length are drawn, and the public
// exponent is picked at random from [1, phi(N)) until it's coprime to phi(N).
// The private exponent and the three CRT parameters are all derived up front:
//
//   d  = e^-1 mod phi(N)
//   dp = e^-1 mod (p - 1)
//   dq = e^-1 mod (q - 1)
//   iq = q^-1 mod p
//
// so decryption never has to recompute anything per message.

use log::debug;
use num_bigint::{BigUint, RandBigInt};
use num_traits::One;

use crate::{
    gcd, generate_distinct_prime, generate_prime, mod_inverse, pick_coprime, Error,
    PrimalityConfig, Result,
};

/// Smallest prime length that admits two distinct odd primes (5 and 7).
pub const MIN_PRIME_BITS: u64 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyGenConfig {
    pub primality: PrimalityConfig,
    /// Cap on candidates drawn by each sampling loop; `None` means unbounded.
    pub max_attempts: Option<u64>,
}

impl Default for KeyGenConfig {
    fn default() -> Self {
        Self {
            primality: PrimalityConfig::default(),
            max_attempts: Some(100_000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    pub n: BigUint,
    pub e: BigUint,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrtRsaKey {
    pub p: BigUint,
    pub q: BigUint,
    pub e: BigUint,
    pub d: BigUint,
    pub n: BigUint,
    pub dp: BigUint,
    pub dq: BigUint,
    pub iq: BigUint,
}

impl CrtRsaKey {
    /// Derive the full key bundle from chosen primes and public exponent.
    ///
    /// Both primes must be odd: with p = 2, dp = e^-1 mod 1 = 0 and CRT
    /// decryption loses every even plaintext.
    pub fn from_primes(p: BigUint, q: BigUint, e: BigUint) -> Result<Self> {
        let one = BigUint::one();
        if p == q {
            return Err(Error::InvalidInput("p and q must be distinct".to_string()));
        }
        let three = BigUint::from(3u64);
        if p < three || q < three {
            return Err(Error::InvalidInput(
                "p and q must be odd primes of at least 3".to_string(),
            ));
        }

        let p_minus_one = &p - &one;
        let q_minus_one = &q - &one;
        let totient = &p_minus_one * &q_minus_one;
        if !gcd(e.clone(), totient.clone()).is_one() {
            return Err(Error::NoCoprimeFound);
        }

        let d = mod_inverse(&e, &totient)?;
        let dp = mod_inverse(&e, &p_minus_one)?;
        let dq = mod_inverse(&e, &q_minus_one)?;
        let iq = mod_inverse(&q, &p)?;
        let n = &p * &q;
        Ok(Self {
            p,
            q,
            e,
            d,
            n,
            dp,
            dq,
            iq,
        })
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            n: self.n.clone(),
            e: self.e.clone(),
        }
    }

    pub fn totient(&self) -> BigUint {
        (&self.p - 1u32) * (&self.q - 1u32)
    }
}

/// Generate a CRT-RSA key whose primes each have `prime_bits` bits.
pub fn generate_crt_rsa_key(
    prime_bits: u64,
    config: &KeyGenConfig,
    rng: &mut impl RandBigInt,
) -> Result<CrtRsaKey> {
    if prime_bits < MIN_PRIME_BITS {
        return Err(Error::InvalidInput(format!(
            "primes must have at least {MIN_PRIME_BITS} bits, got {prime_bits}"
        )));
    }

    let p = generate_prime(prime_bits, &config.primality, config.max_attempts, rng)?;
    let q = generate_distinct_prime(prime_bits, &p, &config.primality, config.max_attempts, rng)?;
    let totient = (&p - 1u32) * (&q - 1u32);
    let e = pick_coprime(&totient, config.max_attempts, rng)?;
    debug!(
        "generated {}-bit modulus from two {prime_bits}-bit primes",
        (&p * &q).bits()
    );

    CrtRsaKey::from_primes(p, q, e)
}
