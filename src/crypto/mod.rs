pub mod password;

pub use password::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Iteration count must be at least 1")]
    InvalidIterations,

    #[error("Password must not be empty")]
    EmptyPassword,
}
