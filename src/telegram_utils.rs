/// Escapes text interpolated into messages sent with HTML parse mode.
/// Covers quotes too, so the result is safe inside attribute values.
pub fn html_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }

    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_html_entities() {
        assert_eq!(
            html_escape("Smith & Wesson <vs.> Jones"),
            "Smith &amp; Wesson &lt;vs.&gt; Jones"
        );
    }

    #[test]
    fn escapes_quotes_for_attribute_values() {
        assert_eq!(
            html_escape("https://example.com/?a=\"1\"&b=2"),
            "https://example.com/?a=&quot;1&quot;&amp;b=2"
        );
    }

    #[test]
    fn plain_text_unchanged() {
        assert_eq!(
            html_escape("UFC 300: Pereira vs Hill"),
            "UFC 300: Pereira vs Hill"
        );
    }
}
