//!
//! Parse PEM-encoded keys into signers and verifiers
//!

use super::{KeyPairSigner, PrivateKey, PublicKeyVerifier};
use const_oid::{
    db::{
        rfc5912::{ID_EC_PUBLIC_KEY, RSA_ENCRYPTION, SECP_256_R_1},
        rfc8410::ID_ED_25519,
    },
    ObjectIdentifier,
};
use miette::Diagnostic;
use pkcs8::{
    spki::AlgorithmIdentifierRef, Document, PrivateKeyInfo, SecretDocument, SubjectPublicKeyInfoRef,
};
use ring::{
    rand::SystemRandom,
    signature::{
        EcdsaKeyPair, Ed25519KeyPair, RsaKeyPair, UnparsedPublicKey, VerificationAlgorithm,
        ECDSA_P256_SHA256_ASN1, ECDSA_P256_SHA256_ASN1_SIGNING, ED25519,
        RSA_PKCS1_2048_8192_SHA256,
    },
};
use thiserror::Error;

/// Key parsing error
#[derive(Debug, Diagnostic, Error)]
pub enum Error {
    /// Malformed DER structure
    #[error(transparent)]
    Der(#[from] pkcs8::der::Error),

    /// Key rejected
    #[error(transparent)]
    KeyRejected(#[from] ring::error::KeyRejected),

    /// Malformed key
    #[error("Malformed key")]
    MalformedKey,

    /// Elliptic curve other than P-256
    #[error("Unsupported curve")]
    UnsupportedCurve,

    /// Unknown key type
    #[error("Unknown key type")]
    UnknownKeyType,
}

#[derive(Clone, Copy)]
enum KeyType {
    Ecdsa,
    Ed25519,
    Rsa,
}

impl TryFrom<AlgorithmIdentifierRef<'_>> for KeyType {
    type Error = Error;

    fn try_from(algorithm: AlgorithmIdentifierRef<'_>) -> Result<Self, Self::Error> {
        if algorithm.oid == RSA_ENCRYPTION {
            Ok(Self::Rsa)
        } else if algorithm.oid == ID_ED_25519 {
            Ok(Self::Ed25519)
        } else if algorithm.oid == ID_EC_PUBLIC_KEY {
            let curve: ObjectIdentifier = algorithm
                .parameters_oid()
                .map_err(|_| Error::MalformedKey)?;

            if curve == SECP_256_R_1 {
                Ok(Self::Ecdsa)
            } else {
                Err(Error::UnsupportedCurve)
            }
        } else {
            Err(Error::UnknownKeyType)
        }
    }
}

/// Parse a public key from its SPKI PEM form into a verifier
///
/// Currently supported algorithms:
///
/// - RSA (PKCS#1 v1.5, SHA-256)
/// - Ed25519
/// - ECDSA (P-256, SHA-256)
#[inline]
pub fn public_key(pem: &str) -> Result<PublicKeyVerifier<Vec<u8>>, Error> {
    let (_pem_tag, document) = Document::from_pem(pem)?;
    let spki: SubjectPublicKeyInfoRef<'_> = document.decode_msg()?;

    let algorithm: &'static dyn VerificationAlgorithm = match KeyType::try_from(spki.algorithm)? {
        KeyType::Ecdsa => &ECDSA_P256_SHA256_ASN1,
        KeyType::Ed25519 => &ED25519,
        KeyType::Rsa => &RSA_PKCS1_2048_8192_SHA256,
    };

    let raw_bytes = spki
        .subject_public_key
        .as_bytes()
        .ok_or(Error::MalformedKey)?
        .to_vec();

    Ok(PublicKeyVerifier::new(UnparsedPublicKey::new(
        algorithm, raw_bytes,
    )))
}

/// Parse a private key from its PKCS#8 PEM form
///
/// The PEM decoding is constant-time and temporary allocations are zeroized.
/// Supports the same algorithms as [`public_key`].
#[inline]
pub fn private_key(pem: &str) -> Result<PrivateKey, Error> {
    let (_tag_line, document) = SecretDocument::from_pem(pem)?;
    let private_key_info: PrivateKeyInfo<'_> = document.decode_msg()?;
    let der = document.as_bytes();

    let private_key = match KeyType::try_from(private_key_info.algorithm)? {
        KeyType::Ecdsa => PrivateKey::Ecdsa(EcdsaKeyPair::from_pkcs8(
            &ECDSA_P256_SHA256_ASN1_SIGNING,
            der,
            &SystemRandom::new(),
        )?),
        KeyType::Ed25519 => PrivateKey::Ed25519(Ed25519KeyPair::from_pkcs8_maybe_unchecked(der)?),
        KeyType::Rsa => PrivateKey::Rsa(RsaKeyPair::from_pkcs8(der)?),
    };

    Ok(private_key)
}

/// Parse a private key and publish it under the given key ID
#[inline]
pub fn signer(id: impl Into<String>, pem: &str) -> Result<KeyPairSigner<PrivateKey>, Error> {
    private_key(pem).map(|key| KeyPairSigner::new(id, key))
}
