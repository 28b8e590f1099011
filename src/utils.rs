//! Escaping of the inline markup sentinel characters.
//!
//! Every inline markup form is delimited by `<`/`>`, so entity-encoding
//! those (and the `&` that the encoding itself introduces) leaves nothing
//! the tokenizer grammar can match. The tokenizer runs [`unescape`] over
//! every literal span; [`escape`] is the inverse pass callers apply when
//! flattening a message back to text.

/// Encodes `&`, `<` and `>` so the result contains no parseable markup.
pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Reverses [`escape`]. Sequences that are not one of the three entities
/// pass through unchanged.
pub fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_hides_markup() {
        assert_eq!(escape("<@42>"), "&lt;@42&gt;");
        assert_eq!(escape("a&b"), "a&amp;b");
    }

    #[test]
    fn unescape_reverses_escape() {
        for s in ["", "plain", "<@42> hi", "a&b", "&amp;&lt;"] {
            assert_eq!(unescape(&escape(s)), s);
        }
    }

    #[test]
    fn unknown_sequences_pass_through() {
        assert_eq!(unescape("a&nbsp;b"), "a&nbsp;b");
        assert_eq!(unescape("1 < 2"), "1 < 2");
    }
}
