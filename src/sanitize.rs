use once_cell::sync::Lazy;
use regex::Regex;

static NON_ALPHA: Lazy<Regex> = Lazy::new(|| Regex::new("[^A-Za-z]").unwrap());

static ROLE_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[/\\]").unwrap());

/// Collapses every character outside `[A-Za-z]` to `_`, for use as a Cypher
/// node variable. Not collision-free: two names differing only in
/// non-alphabetic characters map to the same token.
pub fn identifier(s: &str) -> String {
    NON_ALPHA.replace_all(s, "_").into_owned()
}

/// Drops every character outside `[A-Za-z]`, for use as a label suffix.
pub fn label(s: &str) -> String {
    NON_ALPHA.replace_all(s, "").into_owned()
}

/// Wraps a string in double quotes, escaping embedded backslashes and
/// quotes. Backslashes are escaped first so the escapes added for quotes
/// are not themselves re-escaped.
pub fn quote(s: &str) -> String {
    let escaped = s.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

/// Splits a character-name field on `/` and `\` into trimmed parts, order
/// preserved. A field with no separator yields a single-element list.
pub fn split_characters(raw: &str) -> Vec<String> {
    ROLE_SEPARATOR
        .split(raw)
        .map(|part| part.trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_replaces_non_alphabetic() {
        assert_eq!(identifier("O'Brien-Smith"), "O_Brien_Smith");
        assert_eq!(identifier("Martin Lawrence"), "Martin_Lawrence");
        assert_eq!(identifier("R2-D2"), "R__D_");
    }

    #[test]
    fn identifier_preserves_case() {
        assert_eq!(identifier("McQueen"), "McQueen");
    }

    #[test]
    fn identifier_of_non_alphabetic_name_is_all_underscores() {
        assert_eq!(identifier("1234"), "____");
        assert!(identifier("1234").trim_matches('_').is_empty());
    }

    #[test]
    fn label_drops_non_alphabetic() {
        assert_eq!(label("Science Fiction"), "ScienceFiction");
        assert_eq!(label("Sci-Fi & Fantasy"), "SciFiFantasy");
        assert_eq!(label("1917"), "");
    }

    #[test]
    fn quote_plain_string() {
        assert_eq!(quote("The Matrix"), "\"The Matrix\"");
    }

    #[test]
    fn quote_escapes_embedded_quotes() {
        assert_eq!(quote(r#"He said "hi""#), r#""He said \"hi\"""#);
    }

    #[test]
    fn quote_escapes_backslash_before_quote() {
        // A literal backslash-quote pair must come out as \\\" and not \\\\"
        assert_eq!(quote(r#"a\"b"#), r#""a\\\"b""#);
        assert_eq!(quote(r"back\slash"), r#""back\\slash""#);
    }

    #[test]
    fn quote_round_trips_through_a_parser() {
        // The emitted literal uses the same escape rules as JSON strings, so
        // parsing it back must yield the original.
        for original in [r#"He said "hi""#, r"a\b", "plain", r#"\""#] {
            let literal = quote(original);
            let parsed: String = serde_json::from_str(&literal).unwrap();
            assert_eq!(parsed, original);
        }
    }

    #[test]
    fn split_characters_on_slash() {
        assert_eq!(
            split_characters("Big Momma / Malcolm Turner"),
            vec!["Big Momma", "Malcolm Turner"]
        );
    }

    #[test]
    fn split_characters_on_backslash() {
        assert_eq!(
            split_characters(r"Neo \ Thomas Anderson"),
            vec!["Neo", "Thomas Anderson"]
        );
    }

    #[test]
    fn split_characters_single_role() {
        assert_eq!(split_characters("Trinity"), vec!["Trinity"]);
    }

    #[test]
    fn split_characters_preserves_order() {
        assert_eq!(split_characters("a/b/c"), vec!["a", "b", "c"]);
    }
}
