use thiserror::Error;

/// Fatal error taxonomy for a PSI-SUM session.
///
/// Every variant is fatal: on any `Error`, the caller must tear down the
/// session (secrets are zeroized by the owning types' `Drop` impls) and
/// surface the failure. There is no partial result and no in-session retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid curve point: {reason}")]
    InvalidPoint { reason: &'static str },

    #[error("invalid ciphertext: {reason}")]
    InvalidCiphertext { reason: &'static str },

    #[error("protocol violation: {reason}")]
    ProtocolViolation { reason: &'static str },

    #[error("cryptographic primitive failure: {reason}")]
    CryptoFailure { reason: &'static str },

    #[error("configured n * vmax exceeds the safety margin below the plaintext modulus")]
    OverflowRisk,
}

impl Error {
    pub(crate) fn invalid_point(reason: &'static str) -> Self {
        Error::InvalidPoint { reason }
    }

    pub(crate) fn invalid_ciphertext(reason: &'static str) -> Self {
        Error::InvalidCiphertext { reason }
    }

    pub(crate) fn protocol_violation(reason: &'static str) -> Self {
        Error::ProtocolViolation { reason }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
