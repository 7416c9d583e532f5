mod crt;
mod error;
mod keygen;
mod modexp;
mod number;
mod prime;
mod wiener;

pub use crt::{
    decode_units, decrypt, decrypt_unit, decrypt_unit_direct, encrypt, encrypt_text,
    encrypt_unit, par_decrypt,
};
pub use error::{Error, Result};
pub use keygen::{generate_crt_rsa_key, CrtRsaKey, KeyGenConfig, PublicKey, MIN_PRIME_BITS};
pub use modexp::{mod_exp, try_mod_exp};
pub use number::{gcd, mod_inverse, pick_coprime, random_n_bit};
pub use prime::{
    generate_distinct_prime, generate_prime, is_probably_prime, try_is_probably_prime,
    PrimalityConfig, PrimalityTest, FERMAT_ROUNDS, MILLER_RABIN_ROUNDS,
};
pub use wiener::{convergent_denominators, partial_quotients, wiener_attack};
