//!
//! Attach signatures to outgoing requests
//!

use crate::{
    base64url,
    cavage::{self, signature_string, SignatureHeader, CREATED},
    Error, Result, Signer, SigningRequest, UnixTimestamp,
};
use derive_builder::Builder;
use http::{
    header::{InvalidHeaderValue, AUTHORIZATION, DATE, HOST},
    HeaderMap, HeaderValue, Method, Request, Uri,
};
use std::time::{Duration, SystemTime};
use tracing::{debug, instrument};

/// Validity window applied when no `expires` timestamp was given
const DEFAULT_VALIDITY: Duration = Duration::from_secs(30);

/// Options for [`sign`]
#[derive(Builder)]
#[builder(pattern = "owned")]
pub struct SignOptions<'a, S> {
    /// Signer producing the signature. Its ID is used as the `keyId` parameter
    signer: &'a S,

    /// Request URL
    url: Uri,

    /// HTTP method
    #[builder(default = "Method::GET")]
    method: Method,

    /// Headers sent with the request
    #[builder(default)]
    headers: HeaderMap,

    /// Ordered names of the components covered by the signature
    #[builder(setter(custom))]
    include_headers: Vec<String>,

    /// Creation time of the signature. Defaults to now
    #[builder(default, setter(strip_option))]
    created: Option<SystemTime>,

    /// Expiry time of the signature. Defaults to 30 seconds from now
    #[builder(default, setter(strip_option))]
    expires: Option<SystemTime>,
}

impl<'a, S> SignOptions<'a, S> {
    /// Return a builder for the sign options
    #[must_use]
    pub fn builder() -> SignOptionsBuilder<'a, S> {
        SignOptionsBuilder::default()
    }
}

impl<S> SignOptionsBuilder<'_, S> {
    /// Ordered names of the components covered by the signature
    ///
    /// Besides header names this accepts the `(request-target)`, `(created)`, `(expires)`
    /// and `(key-id)` pseudo-headers
    #[must_use]
    pub fn include_headers<I, T>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.include_headers = Some(names.into_iter().map(Into::into).collect());
        self
    }
}

/// Options for [`authorization_header_value`]
#[derive(Clone, Copy)]
pub struct AuthorizationOptions<'a, S, H> {
    /// Signer producing the signature. Its ID is used as the `keyId` parameter
    pub signer: &'a S,

    /// Request URI
    pub uri: &'a Uri,

    /// HTTP method
    pub method: &'a Method,

    /// Request headers
    pub headers: &'a HeaderMap,

    /// Ordered names of the components covered by the signature
    pub include_headers: &'a [H],

    /// Creation time of the signature
    pub created: SystemTime,

    /// Expiry time of the signature
    pub expires: Option<SystemTime>,
}

fn includes<H>(include_headers: &[H], name: &str) -> bool
where
    H: AsRef<str>,
{
    include_headers
        .iter()
        .any(|included| included.as_ref().eq_ignore_ascii_case(name))
}

/// `Host` header value for the URL, mirroring the host of a WHATWG URL
///
/// Ports are kept unless they are the default port of the scheme
fn host_header(uri: &Uri) -> Result<Option<HeaderValue>, InvalidHeaderValue> {
    let Some(authority) = uri.authority() else {
        return Ok(None);
    };

    let default_port = match uri.scheme_str() {
        Some("http") => Some(80),
        Some("https") => Some(443),
        _ => None,
    };

    let host = match authority.port_u16() {
        Some(port) if Some(port) != default_port => format!("{}:{port}", authority.host()),
        _ => authority.host().to_owned(),
    };

    HeaderValue::from_str(&host).map(Some)
}

/// Build the `Authorization` header value for a request
///
/// Fails with a signature string error before the signer is invoked if a selected component
/// can't be resolved
#[instrument(skip_all, fields(key_id = options.signer.id()))]
pub async fn authorization_header_value<S, H>(
    options: AuthorizationOptions<'_, S, H>,
) -> Result<String>
where
    S: Signer,
    H: AsRef<str>,
{
    let request = SigningRequest {
        method: options.method,
        uri: options.uri,
        headers: options.headers,
    };

    let signature_header = SignatureHeader {
        key_id: options.signer.id(),
        headers: options.include_headers.iter().map(|name| name.as_ref()),
        signature: (),
        created: Some(UnixTimestamp::from_system_time(options.created)?),
        expires: options
            .expires
            .map(UnixTimestamp::from_system_time)
            .transpose()?,
    };

    let signature_string = signature_string::construct(&request, &signature_header)
        .inspect_err(|error| debug!(%error, "failed to construct signature string"))?;

    let signature = options
        .signer
        .sign(signature_string.as_bytes())
        .await
        .map_err(|error| Error::Capability(error.into()))?;
    let encoded_signature = base64url::encode(signature);

    Ok(cavage::serialise(SignatureHeader {
        key_id: signature_header.key_id,
        headers: signature_header.headers,
        signature: encoded_signature.as_str(),
        created: signature_header.created,
        expires: signature_header.expires,
    }))
}

/// Sign an HTTP request and attach the signature as its `Authorization` header
///
/// - `host` is filled in from the URL if it is signed but wasn't provided
/// - `date` is filled in from an explicitly passed `created` timestamp if `(created)` is signed but no `date` was provided
///
/// The `Authorization` header is inserted last and replaces any caller-provided value
#[instrument(skip_all, fields(url = %options.url))]
pub async fn sign<S, B>(options: SignOptions<'_, S>, body: B) -> Result<Request<B>>
where
    S: Signer,
{
    let SignOptions {
        signer,
        url,
        method,
        mut headers,
        include_headers,
        created,
        expires,
    } = options;

    let now = SystemTime::now();

    if includes(&include_headers, HOST.as_str()) && !headers.contains_key(HOST) {
        if let Some(host) = host_header(&url)? {
            headers.insert(HOST, host);
        }
    }

    if includes(&include_headers, CREATED) && !headers.contains_key(DATE) {
        if let Some(created) = created {
            let date = HeaderValue::from_str(&httpdate::fmt_http_date(created))?;
            headers.insert(DATE, date);
        }
    }

    let authorization = authorization_header_value(AuthorizationOptions {
        signer,
        uri: &url,
        method: &method,
        headers: &headers,
        include_headers: &include_headers,
        created: created.unwrap_or(now),
        expires: Some(expires.unwrap_or(now + DEFAULT_VALIDITY)),
    })
    .await?;

    let mut request = Request::builder().method(method).uri(url).body(body)?;
    *request.headers_mut() = headers;
    request
        .headers_mut()
        .insert(AUTHORIZATION, HeaderValue::from_str(&authorization)?);

    Ok(request)
}
