use bytes::Bytes;
use csp_forge::{rewrite_script_tags, NonceGenerator, RequestNonce};
use std::collections::HashSet;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonce_length_and_charset() {
        let generator = NonceGenerator::default();
        let nonce = generator.generate();
        assert_eq!(nonce.len(), 32);
        assert!(nonce.bytes().all(|b| b.is_ascii_hexdigit()));
    }

    #[test]
    fn test_nonce_generation_uniqueness() {
        let generator = NonceGenerator::default();
        let nonce1 = generator.generate();
        let nonce2 = generator.generate();
        let nonce3 = generator.generate();
        assert_ne!(nonce1, nonce2);
        assert_ne!(nonce2, nonce3);
        assert_ne!(nonce1, nonce3);
    }

    #[test]
    fn test_custom_byte_length() {
        let generator = NonceGenerator::new(8);
        assert_eq!(generator.byte_length(), 8);
        assert_eq!(generator.generate().len(), 16);

        generator.set_byte_length(24);
        assert_eq!(generator.generate().len(), 48);
    }

    #[test]
    fn test_pooled_generator_stays_unique() {
        let generator = NonceGenerator::with_capacity(16, 16);
        let nonces: HashSet<String> = (0..100).map(|_| generator.generate()).collect();
        assert_eq!(nonces.len(), 100);
    }

    #[test]
    fn test_cloned_generators_share_pool() {
        let generator = NonceGenerator::with_capacity(4, 16);
        let clone = generator.clone();
        assert_ne!(generator.generate(), clone.generate());
    }

    #[test]
    fn test_request_nonce_derefs_to_string() {
        let nonce = RequestNonce("abc123".to_owned());
        assert_eq!(&*nonce, "abc123");
        assert_eq!(nonce.len(), 6);
    }

    #[test]
    fn test_rewrite_stamps_external_script() {
        let body = Bytes::from_static(b"<html><script src=\"/app.js\"></script></html>");
        let out = rewrite_script_tags(body, "abc123");
        assert_eq!(
            out,
            Bytes::from_static(b"<html><script nonce=\"abc123\" src=\"/app.js\"></script></html>")
        );
    }

    #[test]
    fn test_rewrite_stamps_inline_script_with_attributes() {
        let body = Bytes::from_static(b"<script type=\"module\">let a = 1;</script>");
        let out = rewrite_script_tags(body, "abc123");
        assert_eq!(
            out,
            Bytes::from_static(b"<script nonce=\"abc123\" type=\"module\">let a = 1;</script>")
        );
    }

    #[test]
    fn test_rewrite_leaves_bare_script_alone() {
        let body = Bytes::from_static(b"<script>var x = 1;</script>");
        let out = rewrite_script_tags(body.clone(), "abc123");
        assert_eq!(out, body);
    }

    #[test]
    fn test_rewrite_handles_every_tag() {
        let body = Bytes::from_static(
            b"<script src=\"a.js\"></script><p>text</p><script defer src=\"b.js\"></script>",
        );
        let out = rewrite_script_tags(body, "n1");
        assert_eq!(
            out,
            Bytes::from_static(
                b"<script nonce=\"n1\" src=\"a.js\"></script><p>text</p><script nonce=\"n1\" defer src=\"b.js\"></script>"
            )
        );
    }

    #[test]
    fn test_rewrite_spans_newlines() {
        let body = Bytes::from_static(b"<script type=\"module\">\nlet a = 1;\nlet b = 2;\n</script>");
        let out = rewrite_script_tags(body, "n1");
        assert_eq!(
            out,
            Bytes::from_static(
                b"<script nonce=\"n1\" type=\"module\">\nlet a = 1;\nlet b = 2;\n</script>"
            )
        );
    }

    #[test]
    fn test_rewrite_is_case_insensitive() {
        let body = Bytes::from_static(b"<SCRIPT SRC=\"/app.js\"></SCRIPT>");
        let out = rewrite_script_tags(body, "n1");
        assert_eq!(
            out,
            Bytes::from_static(b"<SCRIPT nonce=\"n1\" SRC=\"/app.js\"></SCRIPT>")
        );
    }

    #[test]
    fn test_rewrite_preserves_script_content() {
        let body = Bytes::from_static(
            b"<script type=\"text/javascript\">if (a < b) { run(\"<script>\"); }</script>",
        );
        let out = rewrite_script_tags(body, "n1");
        let text = std::str::from_utf8(&out).unwrap();
        assert!(text.starts_with("<script nonce=\"n1\" type=\"text/javascript\">"));
        assert!(text.contains("if (a < b)"));
    }

    #[test]
    fn test_rewrite_ignores_unclosed_tag() {
        let body = Bytes::from_static(b"<script src=\"/app.js\">");
        let out = rewrite_script_tags(body.clone(), "n1");
        assert_eq!(out, body);
    }

    #[test]
    fn test_rewrite_passes_non_utf8_through() {
        let body = Bytes::from_static(&[0x3c, 0x73, 0x63, 0xff, 0xfe, 0x00]);
        let out = rewrite_script_tags(body.clone(), "n1");
        assert_eq!(out, body);
    }

    #[test]
    fn test_rewrite_empty_body() {
        let out = rewrite_script_tags(Bytes::new(), "n1");
        assert!(out.is_empty());
    }
}
