use http::{HeaderMap, Method, Uri};
use http_signature_authorization::{
    authorization_header_value,
    cavage::{self, signature_string},
    sign, verify_authorization, AuthorizationOptions, Error, SignOptions, SigningRequest,
};
use std::{convert::Infallible, future};


#[tokio::test]
async fn fixed_signature_header() {
    let signer = self::data::FixedSigner::new([0xfb; 64]);
    let uri = Uri::from_static("https://example.com/inbox");
    let headers = HeaderMap::new();

    let value = authorization_header_value(AuthorizationOptions {
        signer: &signer,
        uri: &uri,
        method: &Method::GET,
        headers: &headers,
        include_headers: &["(request-target)", "(created)", "(key-id)"],
        created: self::data::created(),
        expires: None,
    })
    .await
    .unwrap();

    let expected = format!(
        r#"Signature keyId="did:example:123#key-1",created="1700000000",headers="(request-target) (created) (key-id)",signature="{}-w""#,
        "-_v7".repeat(21)
    );
    assert_eq!(value, expected);
    assert_eq!(signer.calls(), 1);
}

#[tokio::test]
async fn signature_string_matches_signed_request() {
    let signer = self::data::signer();
    let options = SignOptions::builder()
        .signer(&signer)
        .url(Uri::from_static("https://example.com/inbox?page=2"))
        .method(Method::POST)
        .headers(self::data::headers())
        .include_headers(["(request-target)", "(created)", "(key-id)", "Content-Type"])
        .created(self::data::created())
        .build()
        .unwrap();
    let request = sign(options, ()).await.unwrap();

    let header = request.headers()[http::header::AUTHORIZATION].to_str().unwrap();
    let parsed = cavage::parse_request(header, &SigningRequest::from(&request)).unwrap();

    assert_eq!(
        parsed.signing_string,
        "(request-target): post /inbox?page=2\n\
         (created): 1700000000\n\
         (key-id): did:example:123#key-1\n\
         content-type: application/activity+json"
    );
}

#[tokio::test]
async fn rejecting_verifier() {
    let signer = self::data::signer();
    let options = SignOptions::builder()
        .signer(&signer)
        .url(Uri::from_static("https://example.com/inbox"))
        .method(Method::POST)
        .headers(self::data::headers())
        .include_headers(["(request-target)", "(created)", "host"])
        .build()
        .unwrap();
    let request = sign(options, ()).await.unwrap();

    let result = verify_authorization(&request, |_key_id| {
        future::ready(Ok::<_, Infallible>(self::data::ConstVerifier(false)))
    })
    .await;

    assert!(matches!(result, Err(Error::SignatureVerificationFailed)));
}

#[tokio::test]
async fn missing_digest() {
    let signer = self::data::FixedSigner::new([0; 64]);
    let uri = Uri::from_static("https://example.com/inbox");
    let headers = HeaderMap::new();

    let result = authorization_header_value(AuthorizationOptions {
        signer: &signer,
        uri: &uri,
        method: &Method::POST,
        headers: &headers,
        include_headers: &["(request-target)", "digest"],
        created: self::data::created(),
        expires: None,
    })
    .await;

    assert!(matches!(
        result,
        Err(Error::SignatureString(signature_string::Error::MissingHeader(ref name))) if name == "digest"
    ));
    assert_eq!(signer.calls(), 0);
}
