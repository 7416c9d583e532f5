use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("no value coprime to the totient was found")]
    NoCoprimeFound,

    #[error("no modular inverse exists")]
    NoInverseExists,

    #[error("gave up searching for {what} after {attempts} attempts")]
    AttemptsExhausted { what: &'static str, attempts: u64 },
}
