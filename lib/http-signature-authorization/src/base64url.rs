//!
//! Transport encoding of signature bytes
//!
//! Signatures are emitted in the URL-safe alphabet without padding.
//! Decoding tolerates trailing `=` padding since some signers keep it.
//!

/// Encode bytes as unpadded base64url
#[inline]
#[must_use]
pub fn encode<D>(data: D) -> String
where
    D: AsRef<[u8]>,
{
    base64_simd::URL_SAFE_NO_PAD.encode_to_string(data.as_ref())
}

/// Decode base64url with or without padding
#[inline]
pub fn decode(encoded: &str) -> Result<Vec<u8>, base64_simd::Error> {
    base64_simd::URL_SAFE_NO_PAD.decode_to_vec(encoded.trim_end_matches('='))
}

#[cfg(test)]
mod test {
    const BYTES: &[u8] = &[0xfb, 0xff, 0xbf, 0x00, 0x10];

    #[test]
    fn uses_url_safe_alphabet() {
        let encoded = super::encode(BYTES);
        assert_eq!(encoded, "-_-_ABA");
        assert_eq!(super::decode(&encoded).unwrap(), BYTES);
    }

    #[test]
    fn accepts_padding() {
        assert_eq!(super::decode("-_-_ABA=").unwrap(), BYTES);
    }

    #[test]
    fn rejects_standard_alphabet() {
        assert!(super::decode("+/+/ABA").is_err());
    }
}
