use encoding_rs::UTF_8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBody {
    pub text: String,
    pub encoding_label: String,
    /// Malformed sequences were replaced with U+FFFD.
    pub had_errors: bool,
}

/// Decode an upstream body as text. The declared charset is ignored; a BOM
/// still selects UTF-16 when present. Decoding never fails.
pub fn decode_body(bytes: &[u8]) -> DecodedBody {
    let (text, encoding, had_errors) = UTF_8.decode(bytes);
    DecodedBody {
        text: text.into_owned(),
        encoding_label: encoding.name().to_string(),
        had_errors,
    }
}

#[cfg(test)]
mod tests {
    use super::decode_body;

    #[test]
    fn utf8_bom_is_stripped() {
        let decoded = decode_body(b"\xEF\xBB\xBF<p>hi</p>");
        assert_eq!(decoded.text, "<p>hi</p>");
        assert_eq!(decoded.encoding_label, "UTF-8");
        assert!(!decoded.had_errors);
    }

    #[test]
    fn utf16_bom_switches_encoding() {
        let decoded = decode_body(b"\xFF\xFE<\x00p\x00>\x00");
        assert_eq!(decoded.text, "<p>");
        assert_eq!(decoded.encoding_label, "UTF-16LE");
    }

    #[test]
    fn invalid_bytes_are_replaced() {
        let decoded = decode_body(b"caf\xE9");
        assert_eq!(decoded.text, "caf\u{FFFD}");
        assert!(decoded.had_errors);
    }
}
