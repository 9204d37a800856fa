use crate::BoxError;
use ring::signature::UnparsedPublicKey;
use std::{convert::Infallible, future::Future};

/// Asynchronous verification capability
pub trait Verifier {
    /// Error the verifier fails with. Passed through to the caller untouched
    type Error: Into<BoxError>;

    /// Check whether `signature` is a valid signature of `msg`
    fn verify(
        &self,
        msg: &[u8],
        signature: &[u8],
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;
}

/// [`Verifier`] backed by a public key
pub struct PublicKeyVerifier<B> {
    key: UnparsedPublicKey<B>,
}

impl<B> PublicKeyVerifier<B>
where
    B: AsRef<[u8]>,
{
    /// Wrap a public key
    pub fn new(key: UnparsedPublicKey<B>) -> Self {
        Self { key }
    }
}

impl<B> From<UnparsedPublicKey<B>> for PublicKeyVerifier<B>
where
    B: AsRef<[u8]>,
{
    fn from(key: UnparsedPublicKey<B>) -> Self {
        Self::new(key)
    }
}

impl<B> Verifier for PublicKeyVerifier<B>
where
    B: AsRef<[u8]> + Sync,
{
    type Error = Infallible;

    async fn verify(&self, msg: &[u8], signature: &[u8]) -> Result<bool, Self::Error> {
        Ok(self.key.verify(msg, signature).is_ok())
    }
}
