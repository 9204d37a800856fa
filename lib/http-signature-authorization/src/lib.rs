//!
//! HTTP message signatures carried in the `Authorization` header
//!
//! Signs requests over a canonical signature string built from selected request components
//! and verifies incoming requests by rebuilding that string from the request itself.
//! The signature algorithm is opaque to this crate. Signing and verification are delegated
//! to [`Signer`] and [`Verifier`] implementations supplied by the caller.
//!

#![deny(missing_docs)]

pub use self::error::Error;
pub use self::sign::{
    authorization_header_value, sign, AuthorizationOptions, SignOptions, SignOptionsBuilder,
    SignOptionsBuilderError,
};
pub use self::timestamp::{InvalidTimestamp, UnixTimestamp};
pub use self::verify::{
    verify_authorization, AuthorizationVerifier, AuthorizationVerifierBuilder,
    AuthorizationVerifierBuilderError, VerifiedAuthorization,
};

pub mod base64url;
pub mod cavage;
pub mod crypto;
pub mod did;

mod error;
mod request;
mod sign;
mod timestamp;
mod verify;

pub use self::crypto::{Signer, Verifier};
pub use self::request::SigningRequest;

type BoxError = Box<dyn std::error::Error + Send + Sync>;
type Result<T, E = Error> = std::result::Result<T, E>;
