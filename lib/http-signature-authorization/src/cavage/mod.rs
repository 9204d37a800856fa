//!
//! Cavage-style HTTP signatures carried in the `Authorization` header
//!

use crate::{base64url, request::SigningRequest, UnixTimestamp};
use std::str::SplitWhitespace;

mod parse;
mod safety_check;
mod serialise;

pub mod signature_string;

pub use self::parse::{parse, ParseError};
pub use self::safety_check::{is_safe, SafetyCheckError};
pub use self::serialise::serialise;

/// Authentication scheme of the `Authorization` header
pub const SCHEME: &str = "Signature";

/// Lowercased method and path of the request
pub const REQUEST_TARGET: &str = "(request-target)";

/// Creation timestamp of the signature
pub const CREATED: &str = "(created)";

/// Expiry timestamp of the signature
pub const EXPIRES: &str = "(expires)";

/// Identifier of the key the signature was created with
pub const KEY_ID: &str = "(key-id)";

/// Parameters of a signature header
///
/// `I` iterates over the names of the signed components. `S` is the signature itself, either
/// absent (`()`) while the signature string is built, encoded (`&str`) or decoded (`Vec<u8>`).
#[derive(Clone, Debug)]
pub struct SignatureHeader<'a, I, S> {
    /// Identifier of the key the request was signed with
    pub key_id: &'a str,

    /// Ordered names of the signed components
    pub headers: I,

    /// Signature over the signature string
    pub signature: S,

    /// `created` parameter
    pub created: Option<UnixTimestamp>,

    /// `expires` parameter
    pub expires: Option<UnixTimestamp>,
}

/// Signature header parsed from a request alongside the signature string rebuilt from it
#[derive(Debug)]
pub struct ParsedAuthorization<'a> {
    /// Parameters with the decoded signature
    pub params: SignatureHeader<'a, SplitWhitespace<'a>, Vec<u8>>,

    /// Signature string reconstructed from the request
    pub signing_string: String,
}

/// Parse an `Authorization` header value and rebuild the signature string from the request
///
/// The signature string is derived from the request at hand rather than taken from the signer,
/// so it only matches when both sides saw the same component values.
#[inline]
pub fn parse_request<'a>(
    header_value: &'a str,
    request: &SigningRequest<'_>,
) -> Result<ParsedAuthorization<'a>, crate::Error> {
    let header = parse(header_value)?;
    let signing_string = signature_string::construct(request, &header)?;
    let signature = base64url::decode(header.signature).map_err(ParseError::from)?;

    Ok(ParsedAuthorization {
        params: SignatureHeader {
            key_id: header.key_id,
            headers: header.headers,
            signature,
            created: header.created,
            expires: header.expires,
        },
        signing_string,
    })
}

#[cfg(test)]
mod test {
    use super::{parse_request, signature_string, ParseError};
    use crate::{Error, SigningRequest};
    use http::{HeaderMap, HeaderValue, Method, Uri};

    fn headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("host", HeaderValue::from_static("example.com"));
        headers
    }

    #[test]
    fn rebuilds_signature_string() {
        let uri = Uri::from_static("https://example.com/inbox");
        let headers = headers();
        let request = SigningRequest {
            method: &Method::POST,
            uri: &uri,
            headers: &headers,
        };

        let parsed = parse_request(
            r#"Signature keyId="did:example:123#key-1",created="1700000000",headers="(request-target) host (created) (key-id)",signature="AQID""#,
            &request,
        )
        .unwrap();

        assert_eq!(
            parsed.signing_string,
            "(request-target): post /inbox\nhost: example.com\n(created): 1700000000\n(key-id): did:example:123#key-1"
        );
        assert_eq!(parsed.params.signature, [1, 2, 3]);
        assert_eq!(parsed.params.key_id, "did:example:123#key-1");
        assert_eq!(
            parsed.params.headers.collect::<Vec<_>>(),
            ["(request-target)", "host", "(created)", "(key-id)"]
        );
    }

    #[test]
    fn missing_header_is_reported() {
        let uri = Uri::from_static("https://example.com/inbox");
        let headers = headers();
        let request = SigningRequest {
            method: &Method::POST,
            uri: &uri,
            headers: &headers,
        };

        let error = parse_request(
            r#"Signature keyId="k",headers="(request-target) digest",signature="AQID""#,
            &request,
        )
        .unwrap_err();

        assert!(matches!(
            error,
            Error::SignatureString(signature_string::Error::MissingHeader(ref name)) if name == "digest"
        ));
    }

    #[test]
    fn undecodable_signature_is_malformed() {
        let uri = Uri::from_static("/");
        let headers = headers();
        let request = SigningRequest {
            method: &Method::GET,
            uri: &uri,
            headers: &headers,
        };

        let error = parse_request(
            r#"Signature keyId="k",headers="host",signature="not base64!""#,
            &request,
        )
        .unwrap_err();

        assert!(matches!(
            error,
            Error::MalformedAuthorization(ParseError::InvalidSignatureEncoding(..))
        ));
    }
}
