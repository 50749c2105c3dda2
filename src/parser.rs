//! Credential input parsing.
//!
//! Operators paste keys separated by commas, newlines, or any mixture of
//! both. The parser normalizes that blob into an ordered credential list;
//! reporting an empty list back to the user is the caller's job.

/// Split raw input into candidate credentials.
///
/// Splits on both newlines and commas, trims surrounding whitespace, and
/// drops empty tokens. Order of first appearance is preserved and
/// duplicates are kept: each occurrence is verified independently.
pub fn parse(raw: &str) -> Vec<String> {
    raw.split(['\n', ','])
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_commas_and_newlines() {
        assert_eq!(parse("a,b\nc"), vec!["a", "b", "c"]);
    }

    #[test]
    fn trims_whitespace_and_drops_empty_tokens() {
        assert_eq!(parse("  k1 , ,\n\n k2\t\n"), vec!["k1", "k2"]);
        assert!(parse("").is_empty());
        assert!(parse(" , \n , ").is_empty());
    }

    #[test]
    fn handles_crlf_input() {
        assert_eq!(parse("k1\r\nk2\r\n"), vec!["k1", "k2"]);
    }

    #[test]
    fn preserves_order_and_duplicates() {
        assert_eq!(parse("b,a,b"), vec!["b", "a", "b"]);
    }
}
