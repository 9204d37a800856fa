use super::SignatureHeader;
use miette::Diagnostic;
use std::time::{Duration, SystemTime};
use thiserror::Error;

/// Verified signature was rejected by policy
#[derive(Debug, Diagnostic, Error)]
pub enum SafetyCheckError {
    /// `created` lies further in the future than the clock skew allows
    #[error("Signature was created in the future")]
    CreatedInFuture,

    /// `expires` lies in the past
    #[error("Signature expired")]
    Expired,

    /// A component the verifier requires isn't covered by the signature
    #[error("Required component \"{0}\" isn't signed")]
    MissingRequiredComponent(String),
}

/// Check a verified signature header against the verifier's policy
///
/// - every entry of `required_components` has to be part of the signed components
/// - if `clock_skew` is set, the `created`/`expires` window has to contain `now`, give or take the skew
pub fn is_safe<'a, I, S>(
    signature_header: &SignatureHeader<'_, I, S>,
    required_components: &[String],
    clock_skew: Option<Duration>,
    now: SystemTime,
) -> Result<(), SafetyCheckError>
where
    I: Iterator<Item = &'a str> + Clone,
{
    if let Some(missing) = required_components.iter().find(|required| {
        !signature_header
            .headers
            .clone()
            .any(|signed| signed.eq_ignore_ascii_case(required))
    }) {
        return Err(SafetyCheckError::MissingRequiredComponent(missing.clone()));
    }

    let Some(clock_skew) = clock_skew else {
        return Ok(());
    };

    // Timestamps come straight from the header, so compare in saturating integer seconds
    let now = now
        .duration_since(SystemTime::UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs());
    let clock_skew = clock_skew.as_secs();

    if let Some(created) = signature_header.created {
        if created.to_number() > now.saturating_add(clock_skew) {
            return Err(SafetyCheckError::CreatedInFuture);
        }
    }

    if let Some(expires) = signature_header.expires {
        if expires.to_number().saturating_add(clock_skew) < now {
            return Err(SafetyCheckError::Expired);
        }
    }

    Ok(())
}
