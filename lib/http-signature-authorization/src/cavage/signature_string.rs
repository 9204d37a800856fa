//!
//! Utilities for handling signature strings
//!

use super::{SignatureHeader, CREATED, EXPIRES, KEY_ID, REQUEST_TARGET};
use crate::SigningRequest;
use miette::Diagnostic;
use std::fmt::Write;
use thiserror::Error;

/// Signature string error
#[derive(Debug, Diagnostic, Error)]
pub enum Error {
    /// No components were selected
    #[error("Signature doesn't cover any components")]
    EmptyComponents,

    /// Header had an invalid value (non-visible ASCII value)
    #[error(transparent)]
    InvalidHeaderValue(#[from] http::header::ToStrError),

    /// Header is missing from the request
    #[error("Missing header \"{0}\"")]
    MissingHeader(String),

    /// Pseudo-header was selected but its parameter wasn't provided
    #[error("Missing value for \"{0}\"")]
    MissingValue(&'static str),
}

/// Construct a new signature string from a signature header and an HTTP request
///
/// Every component yields one `name: value` line, in the order the header lists them.
/// Header names are lowercased, values of repeated headers are joined with `, `.
#[inline]
pub fn construct<'a, I, S>(
    request: &SigningRequest<'_>,
    signature_header: &SignatureHeader<'_, I, S>,
) -> Result<String, Error>
where
    I: Iterator<Item = &'a str> + Clone,
{
    let mut signature_string = String::new();
    for name in signature_header.headers.clone() {
        let name = name.to_ascii_lowercase();
        match name.as_str() {
            REQUEST_TARGET => {
                let method = request.method.as_str().to_lowercase();
                let path_and_query = request.path_and_query();

                let _ = writeln!(signature_string, "{name}: {method} {path_and_query}");
            }
            CREATED => {
                let created = signature_header
                    .created
                    .ok_or(Error::MissingValue(CREATED))?;
                let _ = writeln!(signature_string, "{name}: {created}");
            }
            EXPIRES => {
                let expires = signature_header
                    .expires
                    .ok_or(Error::MissingValue(EXPIRES))?;
                let _ = writeln!(signature_string, "{name}: {expires}");
            }
            KEY_ID => {
                let _ = writeln!(signature_string, "{name}: {}", signature_header.key_id);
            }
            header => {
                let mut values = request.headers.get_all(header).iter().peekable();
                if values.peek().is_none() {
                    return Err(Error::MissingHeader(header.to_owned()));
                }

                let _ = write!(signature_string, "{header}: ");
                for (idx, value) in values.enumerate() {
                    if idx > 0 {
                        signature_string.push_str(", ");
                    }
                    signature_string.push_str(value.to_str()?.trim());
                }
                signature_string.push('\n');
            }
        }
    }

    if signature_string.is_empty() {
        return Err(Error::EmptyComponents);
    }

    // Remove the last new-line
    signature_string.pop();

    Ok(signature_string)
}

#[cfg(test)]
mod test {
    use super::Error;
    use crate::{cavage::SignatureHeader, SigningRequest, UnixTimestamp};
    use http::{header::HeaderName, HeaderMap, HeaderValue, Method, Uri};

    const BASIC_SIGNATURE_STRING: &str = "(request-target): get /foo?param=value&pet=dog\nhost: example.com\ndate: Sun, 05 Jan 2014 21:31:40 GMT";
    const ALL_COMPONENTS_SIGNATURE_STRING: &str = "(request-target): post /foo?param=value&pet=dog\n(created): 1402170695\n(expires): 1402170699\n(key-id): did:example:123#key-1\nhost: example.com\ndate: Sun, 05 Jan 2014 21:31:40 GMT\ncontent-type: application/json\ndigest: SHA-256=X48E9qOokqqrvdts8nOJRJN3OWDUoyWxBf7kbu9DBPE=\ncontent-length: 18";

    fn headers() -> HeaderMap {
        [
            ("host", "example.com"),
            ("date", "Sun, 05 Jan 2014 21:31:40 GMT"),
            ("content-type", "application/json"),
            (
                "digest",
                "SHA-256=X48E9qOokqqrvdts8nOJRJN3OWDUoyWxBf7kbu9DBPE=",
            ),
            ("content-length", "18"),
        ]
        .into_iter()
        .map(|(name, value)| {
            (
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            )
        })
        .collect()
    }

    fn header<'a>(
        headers: &'a [&'a str],
    ) -> SignatureHeader<'a, impl Iterator<Item = &'a str> + Clone, ()> {
        SignatureHeader {
            key_id: "did:example:123#key-1",
            headers: headers.iter().copied(),
            signature: (),
            created: Some(UnixTimestamp::new(1_402_170_695)),
            expires: Some(UnixTimestamp::new(1_402_170_699)),
        }
    }

    fn construct(method: Method, headers: &HeaderMap, names: &[&str]) -> Result<String, Error> {
        let uri = Uri::from_static("https://example.com/foo?param=value&pet=dog");
        let request = SigningRequest {
            method: &method,
            uri: &uri,
            headers,
        };

        super::construct(&request, &header(names))
    }

    #[test]
    fn basic_signature_string() {
        let signature_string = construct(
            Method::GET,
            &headers(),
            &["(request-target)", "host", "date"],
        )
        .unwrap();

        assert_eq!(signature_string, BASIC_SIGNATURE_STRING);
    }

    #[test]
    fn all_components_signature_string() {
        let signature_string = construct(
            Method::POST,
            &headers(),
            &[
                "(request-target)",
                "(created)",
                "(expires)",
                "(key-id)",
                "host",
                "date",
                "content-type",
                "digest",
                "content-length",
            ],
        )
        .unwrap();

        assert_eq!(signature_string, ALL_COMPONENTS_SIGNATURE_STRING);
    }

    #[test]
    fn header_names_are_lowercased() {
        let signature_string =
            construct(Method::GET, &headers(), &["Host", "Content-Type"]).unwrap();
        assert_eq!(
            signature_string,
            "host: example.com\ncontent-type: application/json"
        );
    }

    #[test]
    fn pseudo_headers_ignore_case() {
        let signature_string = construct(
            Method::POST,
            &headers(),
            &["(Request-Target)", "(CREATED)", "(Expires)", "(Key-ID)"],
        )
        .unwrap();

        assert_eq!(
            signature_string,
            "(request-target): post /foo?param=value&pet=dog\n(created): 1402170695\n(expires): 1402170699\n(key-id): did:example:123#key-1"
        );
    }

    #[test]
    fn repeated_headers_are_joined() {
        let mut headers = HeaderMap::new();
        headers.append("cache-control", HeaderValue::from_static(" max-age=60 "));
        headers.append("cache-control", HeaderValue::from_static("must-revalidate"));

        let signature_string = construct(Method::GET, &headers, &["cache-control"]).unwrap();
        assert_eq!(signature_string, "cache-control: max-age=60, must-revalidate");
    }

    #[test]
    fn missing_header() {
        let error = construct(Method::GET, &headers(), &["(request-target)", "x-missing"])
            .unwrap_err();
        assert!(matches!(error, Error::MissingHeader(ref name) if name == "x-missing"));
    }

    #[test]
    fn missing_expires() {
        let uri = Uri::from_static("/");
        let headers = headers();
        let request = SigningRequest {
            method: &Method::GET,
            uri: &uri,
            headers: &headers,
        };
        let header = SignatureHeader {
            expires: None,
            ..header(&["(created)", "(expires)"])
        };

        let error = super::construct(&request, &header).unwrap_err();
        assert!(matches!(error, Error::MissingValue("(expires)")));
    }

    #[test]
    fn no_components() {
        let error = construct(Method::GET, &headers(), &[]).unwrap_err();
        assert!(matches!(error, Error::EmptyComponents));
    }

    #[test]
    fn is_deterministic() {
        let names = ["(request-target)", "(created)", "host", "digest"];
        let first = construct(Method::POST, &headers(), &names).unwrap();
        let second = construct(Method::POST, &headers(), &names).unwrap();

        assert_eq!(first, second);
    }
}
