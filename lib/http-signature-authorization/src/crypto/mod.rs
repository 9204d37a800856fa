//!
//! Signing and verification capabilities
//!
//! The signature algorithm is opaque to the rest of the crate. Anything implementing [`Signer`]
//! or [`Verifier`] can be plugged in, the `ring`-backed implementations in here are merely
//! the batteries.
//!

mod sign;
mod verify;

pub mod parse;

pub use self::sign::{KeyPairSigner, PrivateKey, Signer, SigningKey};
pub use self::verify::{PublicKeyVerifier, Verifier};
