use http::{request::Parts, uri::PathAndQuery, HeaderMap, Method, Request, Uri};
use std::borrow::Cow;

/// Borrowed view of the request components a signature string is built from
#[derive(Clone, Copy, Debug)]
pub struct SigningRequest<'a> {
    /// HTTP method
    pub method: &'a Method,

    /// Request URI. Only the path and query end up in the signature string
    pub uri: &'a Uri,

    /// Request headers
    pub headers: &'a HeaderMap,
}

impl<'a> SigningRequest<'a> {
    /// Path and query as it appears in the `(request-target)` pseudo-header
    pub(crate) fn path_and_query(&self) -> Cow<'a, str> {
        match self.uri.path_and_query().map(PathAndQuery::as_str) {
            Some(path_and_query) if path_and_query.starts_with('/') => {
                Cow::Borrowed(path_and_query)
            }
            _ => match self.uri.query() {
                Some(query) => Cow::Owned(format!("{}?{query}", self.uri.path())),
                None => Cow::Borrowed(self.uri.path()),
            },
        }
    }
}

impl<'a> From<&'a Parts> for SigningRequest<'a> {
    fn from(parts: &'a Parts) -> Self {
        Self {
            method: &parts.method,
            uri: &parts.uri,
            headers: &parts.headers,
        }
    }
}

impl<'a, B> From<&'a Request<B>> for SigningRequest<'a> {
    fn from(request: &'a Request<B>) -> Self {
        Self {
            method: request.method(),
            uri: request.uri(),
            headers: request.headers(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::SigningRequest;
    use http::{HeaderMap, Method, Uri};

    fn path_and_query(uri: &'static str) -> String {
        let uri = Uri::from_static(uri);
        let headers = HeaderMap::new();
        let request = SigningRequest {
            method: &Method::GET,
            uri: &uri,
            headers: &headers,
        };

        request.path_and_query().into_owned()
    }

    #[test]
    fn strips_scheme_and_authority() {
        assert_eq!(
            path_and_query("https://example.com:8443/inbox?page=2"),
            "/inbox?page=2"
        );
    }

    #[test]
    fn empty_path_is_root() {
        assert_eq!(path_and_query("https://example.com"), "/");
    }

    #[test]
    fn query_without_path() {
        assert_eq!(path_and_query("https://example.com?page=2"), "/?page=2");
    }

    #[test]
    fn origin_form_is_kept() {
        assert_eq!(path_and_query("/foo?param=value&pet=dog"), "/foo?param=value&pet=dog");
    }
}
