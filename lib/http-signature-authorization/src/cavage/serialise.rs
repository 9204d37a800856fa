use super::{SignatureHeader, SCHEME};
use std::fmt::Write;

/// Serialise a signature header into an `Authorization` header value
///
/// Parameters are always emitted in the order `keyId`, `created`, `expires`, `headers`, `signature`.
/// Absent timestamps are omitted.
#[inline]
pub fn serialise<'a, I>(header: SignatureHeader<'_, I, &str>) -> String
where
    I: Iterator<Item = &'a str>,
{
    let mut buffer = String::new();

    let _ = write!(buffer, "{SCHEME} keyId=\"{}\"", header.key_id);

    if let Some(created) = header.created {
        let _ = write!(buffer, ",created=\"{created}\"");
    }

    if let Some(expires) = header.expires {
        let _ = write!(buffer, ",expires=\"{expires}\"");
    }

    buffer.push_str(",headers=\"");
    for item in itertools::intersperse(header.headers, " ") {
        buffer.push_str(item);
    }
    buffer.push('"');

    let _ = write!(buffer, ",signature=\"{}\"", header.signature);

    buffer
}
