use crate::{
    cavage::{signature_string, ParseError, SafetyCheckError},
    sign::SignOptionsBuilderError,
    verify::AuthorizationVerifierBuilderError,
    BoxError,
};
use miette::Diagnostic;
use std::time::SystemTimeError;
use thiserror::Error;

/// Signing/verification error
#[derive(Debug, Diagnostic, Error)]
pub enum Error {
    /// The signer, the verifier, or the function resolving the verifier failed
    ///
    /// The capability's own error is passed through untouched
    #[error(transparent)]
    Capability(BoxError),

    /// Outgoing header value contains invalid characters
    #[error(transparent)]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),

    /// Assembling the outgoing request failed
    #[error(transparent)]
    Http(#[from] http::Error),

    /// `Authorization` header couldn't be parsed as a `Signature` header
    #[error(transparent)]
    #[diagnostic(transparent)]
    MalformedAuthorization(#[from] ParseError),

    /// Request doesn't carry an `Authorization` header
    #[error("Missing authorization header")]
    MissingAuthorization,

    /// Signature verified but the verifier's policy rejected it
    #[error(transparent)]
    #[diagnostic(transparent)]
    SafetyCheck(#[from] SafetyCheckError),

    /// Required sign option wasn't set
    #[error(transparent)]
    SignOptions(#[from] SignOptionsBuilderError),

    /// Signature string construction failure (missing header or pseudo-header value)
    #[error(transparent)]
    #[diagnostic(transparent)]
    SignatureString(#[from] signature_string::Error),

    /// Verifier rejected the signature
    #[error("Signature verification failed")]
    SignatureVerificationFailed,

    /// Timestamp lies before the UNIX epoch
    #[error(transparent)]
    Timestamp(#[from] SystemTimeError),

    /// Verifier configuration is incomplete
    #[error(transparent)]
    VerifierOptions(#[from] AuthorizationVerifierBuilderError),
}
