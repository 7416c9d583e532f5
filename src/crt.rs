// Textbook RSA encryption and CRT decryption.
//
// Messages are encrypted one unit at a time with no padding: c = m^e mod N.
// Decryption splits the work across the two prime factors of N:
//
//   mp = c^dp mod p
//   mq = c^dq mod q
//   h  = iq * (mp - mq) mod p
//   m  = mq + q * h
//
// Both exponentiations run on half-length moduli with half-length exponents,
// which is roughly four times cheaper than computing c^d mod N directly.

use num_bigint::BigUint;
use rayon::prelude::*;

use crate::{mod_exp, CrtRsaKey};

pub fn encrypt_unit(m: &BigUint, e: &BigUint, n: &BigUint) -> BigUint {
    mod_exp(m, e, n)
}

pub fn encrypt(plaintext: &[BigUint], e: &BigUint, n: &BigUint) -> Vec<BigUint> {
    plaintext.iter().map(|m| encrypt_unit(m, e, n)).collect()
}

/// Encrypt text one `char` at a time, using each char's scalar value.
pub fn encrypt_text(message: &str, e: &BigUint, n: &BigUint) -> Vec<BigUint> {
    message
        .chars()
        .map(|ch| encrypt_unit(&BigUint::from(u32::from(ch)), e, n))
        .collect()
}

/// Map decrypted units back to chars. Returns `None` if any unit isn't a
/// valid Unicode scalar value, which usually means the wrong key was used.
pub fn decode_units(units: &[BigUint]) -> Option<String> {
    units
        .iter()
        .map(|unit| {
            let digits = unit.to_u32_digits();
            match digits.as_slice() {
                [] => Some('\0'),
                [x] => char::from_u32(*x),
                _ => None,
            }
        })
        .collect()
}

pub fn decrypt_unit(
    c: &BigUint,
    p: &BigUint,
    q: &BigUint,
    dp: &BigUint,
    dq: &BigUint,
    iq: &BigUint,
) -> BigUint {
    let mp = mod_exp(c, dp, p);
    let mq = mod_exp(c, dq, q);
    // mq < q may exceed p, and mp - mq may be negative, so take the
    // difference of the representatives mod p.
    let diff = (&mp + p - (&mq % p)) % p;
    let h = (iq * diff) % p;
    mq + q * h
}

/// Decrypt each unit in turn; the output is in the same order as the input.
pub fn decrypt(
    ciphertext: &[BigUint],
    p: &BigUint,
    q: &BigUint,
    dp: &BigUint,
    dq: &BigUint,
    iq: &BigUint,
) -> Vec<BigUint> {
    ciphertext
        .iter()
        .map(|c| decrypt_unit(c, p, q, dp, dq, iq))
        .collect()
}

/// As [decrypt], with the units spread across the rayon thread pool.
pub fn par_decrypt(
    ciphertext: &[BigUint],
    p: &BigUint,
    q: &BigUint,
    dp: &BigUint,
    dq: &BigUint,
    iq: &BigUint,
) -> Vec<BigUint> {
    ciphertext
        .par_iter()
        .map(|c| decrypt_unit(c, p, q, dp, dq, iq))
        .collect()
}

/// Plain c^d mod N, without the CRT speed-up.
pub fn decrypt_unit_direct(c: &BigUint, d: &BigUint, n: &BigUint) -> BigUint {
    mod_exp(c, d, n)
}

impl CrtRsaKey {
    pub fn encrypt(&self, plaintext: &[BigUint]) -> Vec<BigUint> {
        encrypt(plaintext, &self.e, &self.n)
    }

    pub fn decrypt_unit(&self, c: &BigUint) -> BigUint {
        decrypt_unit(c, &self.p, &self.q, &self.dp, &self.dq, &self.iq)
    }

    pub fn decrypt(&self, ciphertext: &[BigUint]) -> Vec<BigUint> {
        decrypt(ciphertext, &self.p, &self.q, &self.dp, &self.dq, &self.iq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use num_bigint::RandBigInt;
    use rand::{rngs::StdRng, SeedableRng};
    use rstest::rstest;

    use crate::{generate_crt_rsa_key, KeyGenConfig};

    fn textbook_key() -> CrtRsaKey {
        CrtRsaKey::from_primes(
            BigUint::from(61u64),
            BigUint::from(53u64),
            BigUint::from(17u64),
        )
        .unwrap()
    }

    #[test]
    fn encrypt_unit_matches_textbook_example() {
        let key = textbook_key();

        let c = encrypt_unit(&BigUint::from(65u64), &key.e, &key.n);

        assert_eq!(c, BigUint::from(2790u64));
    }

    #[test]
    fn decrypt_unit_matches_textbook_example() {
        let key = textbook_key();

        let m = key.decrypt_unit(&BigUint::from(2790u64));

        assert_eq!(m, BigUint::from(65u64));
    }

    #[test]
    fn crt_decryption_inverts_encryption_for_every_unit_below_modulus() {
        let key = textbook_key();

        for m in 0..3233u64 {
            let m = BigUint::from(m);
            let c = encrypt_unit(&m, &key.e, &key.n);

            assert_eq!(key.decrypt_unit(&c), m);
        }
    }

    #[test]
    fn crt_decryption_handles_q_larger_than_p() {
        // mq can exceed p here, so the difference must be taken mod p.
        let key = CrtRsaKey::from_primes(
            BigUint::from(11u64),
            BigUint::from(61u64),
            BigUint::from(7u64),
        )
        .unwrap();

        for m in 0..671u64 {
            let m = BigUint::from(m);
            let c = encrypt_unit(&m, &key.e, &key.n);

            assert_eq!(key.decrypt_unit(&c), m);
        }
    }

    #[rstest]
    #[case(64)]
    #[case(256)]
    fn crt_decryption_matches_direct_decryption(#[case] prime_bits: u64) {
        let mut rng = StdRng::from_seed([44; 32]);
        let key = generate_crt_rsa_key(prime_bits, &KeyGenConfig::default(), &mut rng).unwrap();

        for _ in 0..20 {
            let m = rng.gen_biguint_below(&key.n);
            let c = encrypt_unit(&m, &key.e, &key.n);

            assert_eq!(key.decrypt_unit(&c), decrypt_unit_direct(&c, &key.d, &key.n));
            assert_eq!(key.decrypt_unit(&c), m);
        }
    }

    #[test]
    fn decryption_is_deterministic() {
        let key = textbook_key();
        let c = BigUint::from(1234u64);

        let first = key.decrypt_unit(&c);
        let second = key.decrypt_unit(&c);

        assert_eq!(first, second);
    }

    #[test]
    fn text_round_trips_through_generated_key() {
        let mut rng = StdRng::from_seed([12; 32]);
        let key = generate_crt_rsa_key(128, &KeyGenConfig::default(), &mut rng).unwrap();
        let message = "Hope that encrypting the message letter by letter is the right way of doing it.";

        let ciphertext = encrypt_text(message, &key.e, &key.n);
        let plaintext = key.decrypt(&ciphertext);

        assert_eq!(ciphertext.len(), message.chars().count());
        assert_eq!(decode_units(&plaintext).unwrap(), message);
    }

    #[test]
    fn par_decrypt_preserves_order() {
        let mut rng = StdRng::from_seed([12; 32]);
        let key = generate_crt_rsa_key(64, &KeyGenConfig::default(), &mut rng).unwrap();
        let ciphertext = encrypt_text("Factoring is hard.", &key.e, &key.n);

        let sequential = key.decrypt(&ciphertext);
        let parallel = par_decrypt(&ciphertext, &key.p, &key.q, &key.dp, &key.dq, &key.iq);

        assert_eq!(sequential, parallel);
    }

    #[test]
    fn decrypts_known_ciphertext_with_private_exponent() {
        let c: Vec<BigUint> = [
            3203u64, 909, 3143, 5255, 5343, 3203, 909, 9958, 5278, 5343, 9958, 5278, 4674, 909,
            9958, 792, 909, 4132, 3143, 9958, 3203, 5343, 792, 3143, 4443,
        ]
        .into_iter()
        .map(BigUint::from)
        .collect();
        let d = BigUint::from(1179u64);
        let n = BigUint::from(11413u64);

        let units: Vec<BigUint> = c.iter().map(|x| decrypt_unit_direct(x, &d, &n)).collect();

        assert_eq!(decode_units(&units).unwrap(), "welcowe to the real world");
    }

    #[test]
    fn decode_units_rejects_values_outside_char_range() {
        let units = [BigUint::from(72u64), BigUint::from(0xD800u64)];

        assert_eq!(decode_units(&units), None);
    }
}
