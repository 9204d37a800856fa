use crate::BoxError;
use ring::{
    error::Unspecified,
    rand::SystemRandom,
    signature::{EcdsaKeyPair, Ed25519KeyPair, RsaKeyPair, Signature, RSA_PKCS1_SHA256},
};
use std::future::Future;

/// Asynchronous signing capability
///
/// Its ID is emitted as the `keyId` parameter of the signature
pub trait Signer {
    /// Signature bytes
    type Output: AsRef<[u8]>;

    /// Error the signer fails with. Passed through to the caller untouched
    type Error: Into<BoxError>;

    /// Identifier of the key, usually a DID URL pointing at a verification method
    fn id(&self) -> &str;

    /// Sign a message
    fn sign(&self, msg: &[u8]) -> impl Future<Output = Result<Self::Output, Self::Error>> + Send;
}

/// Synchronous signing key
pub trait SigningKey {
    /// Type the signature algorithm outputs
    type Output: AsRef<[u8]>;

    /// Sign a message
    fn sign(&self, msg: &[u8]) -> Result<Self::Output, Unspecified>;
}

impl SigningKey for Ed25519KeyPair {
    type Output = Signature;

    #[inline]
    fn sign(&self, msg: &[u8]) -> Result<Self::Output, Unspecified> {
        Ok(self.sign(msg))
    }
}

impl SigningKey for EcdsaKeyPair {
    type Output = Signature;

    #[inline]
    fn sign(&self, msg: &[u8]) -> Result<Self::Output, Unspecified> {
        self.sign(&SystemRandom::new(), msg)
    }
}

impl SigningKey for RsaKeyPair {
    type Output = Vec<u8>;

    #[inline]
    fn sign(&self, msg: &[u8]) -> Result<Self::Output, Unspecified> {
        let mut buf = vec![0; self.public().modulus_len()];
        self.sign(&RSA_PKCS1_SHA256, &SystemRandom::new(), msg, &mut buf)?;

        Ok(buf)
    }
}

/// Enum dispatch over various signing keys
#[non_exhaustive]
pub enum PrivateKey {
    /// ECDSA P-256 with SHA-256
    Ecdsa(EcdsaKeyPair),

    /// Ed25519
    Ed25519(Ed25519KeyPair),

    /// RSA PKCS#1 v1.5 with SHA-256
    Rsa(RsaKeyPair),
}

impl SigningKey for PrivateKey {
    type Output = Vec<u8>;

    fn sign(&self, msg: &[u8]) -> Result<Self::Output, Unspecified> {
        let signature = match self {
            Self::Ecdsa(key) => SigningKey::sign(key, msg)?.as_ref().to_vec(),
            Self::Ed25519(key) => SigningKey::sign(key, msg)?.as_ref().to_vec(),
            Self::Rsa(key) => SigningKey::sign(key, msg)?,
        };

        Ok(signature)
    }
}

/// [`Signer`] backed by a local signing key
pub struct KeyPairSigner<K> {
    id: String,
    key: K,
}

impl<K> KeyPairSigner<K>
where
    K: SigningKey,
{
    /// Pair a signing key with the ID it is published under
    pub fn new(id: impl Into<String>, key: K) -> Self {
        Self {
            id: id.into(),
            key,
        }
    }

    /// Signing key
    pub fn key(&self) -> &K {
        &self.key
    }
}

impl<K> Signer for KeyPairSigner<K>
where
    K: SigningKey + Sync,
{
    type Output = K::Output;
    type Error = Unspecified;

    fn id(&self) -> &str {
        &self.id
    }

    async fn sign(&self, msg: &[u8]) -> Result<Self::Output, Self::Error> {
        self.key.sign(msg)
    }
}
