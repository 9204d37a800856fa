//!
//! DID URLs used as key identifiers
//!
//! Only the syntax is handled here. Resolving DID documents is left to the caller.
//!

use miette::Diagnostic;
use std::fmt;
use thiserror::Error;

/// Key ID isn't a DID URL
#[derive(Debug, Diagnostic, Error, PartialEq, Eq)]
pub enum InvalidDidUrl {
    /// Doesn't start with `did:`
    #[error("Missing \"did:\" prefix")]
    MissingPrefix,

    /// Method name is empty or contains characters other than lowercase letters and digits
    #[error("Invalid DID method")]
    InvalidMethod,

    /// Method-specific identifier is empty or contains illegal characters
    #[error("Invalid method-specific identifier")]
    InvalidIdentifier,
}

/// Borrowed DID URL of the form `did:<method>:<method-specific-id>[#<fragment>]`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DidUrl<'a> {
    did: &'a str,
    method: &'a str,
    method_specific_id: &'a str,
    fragment: Option<&'a str>,
}

fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | ':' | '%')
}

impl<'a> DidUrl<'a> {
    /// Parse a DID URL. Paths and queries are not supported
    pub fn parse(input: &'a str) -> Result<Self, InvalidDidUrl> {
        let (did, fragment) = match input.split_once('#') {
            Some((did, fragment)) => (did, Some(fragment)),
            None => (input, None),
        };

        let rest = did.strip_prefix("did:").ok_or(InvalidDidUrl::MissingPrefix)?;
        let (method, method_specific_id) =
            rest.split_once(':').ok_or(InvalidDidUrl::InvalidIdentifier)?;

        if method.is_empty()
            || !method
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            return Err(InvalidDidUrl::InvalidMethod);
        }

        if method_specific_id.is_empty()
            || method_specific_id.ends_with(':')
            || !method_specific_id.chars().all(is_id_char)
        {
            return Err(InvalidDidUrl::InvalidIdentifier);
        }

        Ok(Self {
            did,
            method,
            method_specific_id,
            fragment,
        })
    }

    /// DID without the fragment
    #[must_use]
    pub fn did(&self) -> &'a str {
        self.did
    }

    /// DID method, e.g. `key` or `web`
    #[must_use]
    pub fn method(&self) -> &'a str {
        self.method
    }

    /// Method-specific identifier
    #[must_use]
    pub fn method_specific_id(&self) -> &'a str {
        self.method_specific_id
    }

    /// Fragment selecting the verification method
    #[must_use]
    pub fn fragment(&self) -> Option<&'a str> {
        self.fragment
    }
}

impl fmt::Display for DidUrl<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.did)?;
        if let Some(fragment) = self.fragment {
            write!(f, "#{fragment}")?;
        }

        Ok(())
    }
}

/// Key ID of a verification method within a DID document
#[must_use]
pub fn verification_method_id(did: &str, fragment: &str) -> String {
    format!("{did}#{fragment}")
}

/// Key ID of a `did:key` identifier's only verification method
///
/// `did:key:<key>#<key>` where `<key>` is the multibase-encoded public key
#[must_use]
pub fn did_key_verification_method_id(multibase_key: &str) -> String {
    verification_method_id(&format!("did:key:{multibase_key}"), multibase_key)
}
