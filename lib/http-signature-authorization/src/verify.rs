//!
//! Verify signatures of incoming requests
//!

use crate::{
    cavage::{self, ParseError, ParsedAuthorization},
    did::{DidUrl, InvalidDidUrl},
    BoxError, Error, Result, SigningRequest, UnixTimestamp, Verifier,
};
use derive_builder::Builder;
use http::{header::AUTHORIZATION, Request};
use std::{
    future::Future,
    time::{Duration, SystemTime},
};
use tracing::{debug, instrument};

/// Clock difference tolerated when checking the signature's validity window
const DEFAULT_CLOCK_SKEW: Duration = Duration::from_secs(5 * 60);

/// Successfully verified `Authorization` header
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifiedAuthorization {
    /// Identifier of the key the request was signed with
    pub key_id: String,

    /// Names of the signed components, in signing order
    pub signed_parameters: Vec<String>,

    /// Raw signature bytes
    pub signature: Vec<u8>,

    /// Creation time of the signature
    pub created: Option<UnixTimestamp>,

    /// Expiry time of the signature
    pub expires: Option<UnixTimestamp>,
}

impl VerifiedAuthorization {
    /// Interpret the key ID as a DID URL
    pub fn did_url(&self) -> Result<DidUrl<'_>, InvalidDidUrl> {
        DidUrl::parse(&self.key_id)
    }
}

/// Verifier of `Authorization` headers
///
/// Without further configuration it only checks the signature itself. Expiry isn't checked
/// unless `check_expiration` is enabled. Checks on top of that run after the signature was verified.
#[derive(Builder, Clone, Debug)]
pub struct AuthorizationVerifier {
    /// Components every signature has to cover (e.g. `(request-target)` or `host`)
    #[builder(default, setter(custom))]
    required_components: Vec<String>,

    /// Reject signatures whose `created`/`expires` window doesn't contain the current time
    #[builder(default)]
    check_expiration: bool,

    /// Clock difference tolerated when checking the validity window
    #[builder(default = "DEFAULT_CLOCK_SKEW")]
    clock_skew: Duration,
}

impl Default for AuthorizationVerifier {
    fn default() -> Self {
        Self {
            required_components: Vec::new(),
            check_expiration: false,
            clock_skew: DEFAULT_CLOCK_SKEW,
        }
    }
}

impl AuthorizationVerifierBuilder {
    /// Components every signature has to cover
    pub fn required_components<I, T>(&mut self, components: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.required_components = Some(components.into_iter().map(Into::into).collect());
        self
    }
}

impl AuthorizationVerifier {
    /// Return a builder for the verifier
    #[must_use]
    pub fn builder() -> AuthorizationVerifierBuilder {
        AuthorizationVerifierBuilder::default()
    }

    /// Verify the `Authorization` header of a request
    ///
    /// The signature string is rebuilt from the request and checked by the verifier
    /// `get_verifier` resolves for the claimed key ID
    #[instrument(skip_all)]
    pub async fn verify<'r, F, Fut, V, E>(
        &self,
        request: impl Into<SigningRequest<'r>>,
        get_verifier: F,
    ) -> Result<VerifiedAuthorization>
    where
        F: FnOnce(&str) -> Fut,
        Fut: Future<Output = Result<V, E>>,
        V: Verifier,
        E: Into<BoxError>,
    {
        let request = request.into();
        let Some(header) = request.headers.get(AUTHORIZATION) else {
            debug!("missing 'Authorization' header");
            return Err(Error::MissingAuthorization);
        };

        let header = header
            .to_str()
            .map_err(|_| ParseError::InvalidCharacters)
            .inspect_err(|error| debug!(%error, "invalid 'Authorization' header"))?;

        let ParsedAuthorization {
            params,
            signing_string,
        } = cavage::parse_request(header, &request)
            .inspect_err(|error| debug!(%error, "invalid 'Authorization' header"))?;

        let verifier = get_verifier(params.key_id)
            .await
            .map_err(|error| Error::Capability(error.into()))?;

        let is_valid = verifier
            .verify(signing_string.as_bytes(), &params.signature)
            .await
            .map_err(|error| Error::Capability(error.into()))?;

        if !is_valid {
            debug!(key_id = params.key_id, "signature verification failed");
            return Err(Error::SignatureVerificationFailed);
        }

        let clock_skew = self.check_expiration.then_some(self.clock_skew);
        cavage::is_safe(
            &params,
            &self.required_components,
            clock_skew,
            SystemTime::now(),
        )
        .inspect_err(|error| debug!(%error, key_id = params.key_id, "signature rejected"))?;

        Ok(VerifiedAuthorization {
            key_id: params.key_id.to_owned(),
            signed_parameters: params.headers.map(str::to_owned).collect(),
            signature: params.signature,
            created: params.created,
            expires: params.expires,
        })
    }
}

/// Verify the `Authorization` header of a request with the default verifier
///
/// Only the signature itself is checked. `created` and `expires` are **not** compared against
/// the current time, so an expired signature verifies. Use [`AuthorizationVerifier::builder`]
/// with `check_expiration(true)` to reject signatures outside their validity window.
#[inline]
pub async fn verify_authorization<B, F, Fut, V, E>(
    request: &Request<B>,
    get_verifier: F,
) -> Result<VerifiedAuthorization>
where
    F: FnOnce(&str) -> Fut,
    Fut: Future<Output = Result<V, E>>,
    V: Verifier,
    E: Into<BoxError>,
{
    AuthorizationVerifier::default()
        .verify(request, get_verifier)
        .await
}
