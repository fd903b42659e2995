use regex::Regex;
use std::sync::OnceLock;
use url::Url;

/// Shortest `list=` value accepted as a playlist id.
const MIN_LIST_LEN: usize = 6;

fn bare_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]{10,}$").expect("valid regex"))
}

fn list_param_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[?&]list=([^&]*)").expect("valid regex"))
}

/// Extract a playlist id from a pasted link or bare id.
///
/// Accepts full playlist/watch URLs (`...?list=PL...`), bare ids, and fragments
/// that aren't valid URLs but still carry a `list=` parameter
/// (e.g. `watch?v=xyz&list=PL...`).
pub fn parse_playlist_id(input: &str) -> Option<String> {
    let raw = input.trim();
    if raw.is_empty() {
        return None;
    }

    if let Some(id) = from_url(raw) {
        return Some(id);
    }

    if bare_id_pattern().is_match(raw) {
        return Some(raw.to_string());
    }

    from_fragment(raw)
}

fn from_url(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "list")
        .map(|(_, value)| value.into_owned())
        .filter(|value| value.len() >= MIN_LIST_LEN)
}

fn from_fragment(raw: &str) -> Option<String> {
    let captures = list_param_pattern().captures(raw)?;
    let value = captures.get(1)?.as_str();
    let decoded = urlencoding::decode(value).ok()?;
    let decoded = decoded.trim();

    if decoded.len() >= MIN_LIST_LEN {
        Some(decoded.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playlist_url() {
        assert_eq!(
            parse_playlist_id("https://www.youtube.com/playlist?list=PLrAXtmErZgOeiKm4sgNOknGvNjby9efdf"),
            Some("PLrAXtmErZgOeiKm4sgNOknGvNjby9efdf".to_string())
        );
    }

    #[test]
    fn test_watch_url_with_list() {
        assert_eq!(
            parse_playlist_id("https://youtube.com/watch?v=dQw4w9WgXcQ&list=PL123456&index=3"),
            Some("PL123456".to_string())
        );
    }

    #[test]
    fn test_url_with_surrounding_whitespace() {
        assert_eq!(
            parse_playlist_id("   https://www.youtube.com/playlist?list=PLabcdef\n"),
            Some("PLabcdef".to_string())
        );
    }

    #[test]
    fn test_short_list_param_is_rejected() {
        assert_eq!(parse_playlist_id("https://www.youtube.com/playlist?list=abc"), None);
        assert_eq!(parse_playlist_id("https://www.youtube.com/playlist?list=abcde"), None);
        assert_eq!(
            parse_playlist_id("https://www.youtube.com/playlist?list=abcdef"),
            Some("abcdef".to_string())
        );
    }

    #[test]
    fn test_url_without_list() {
        assert_eq!(parse_playlist_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"), None);
    }

    #[test]
    fn test_bare_id() {
        assert_eq!(
            parse_playlist_id("PLrAXtmErZgOeiKm4sgNOknGvNjby9efdf"),
            Some("PLrAXtmErZgOeiKm4sgNOknGvNjby9efdf".to_string())
        );
        assert_eq!(parse_playlist_id("a_b-c_d-e_"), Some("a_b-c_d-e_".to_string()));
    }

    #[test]
    fn test_short_bare_token() {
        assert_eq!(parse_playlist_id("PL12345"), None);
        assert_eq!(parse_playlist_id("abcdefghi"), None);
    }

    #[test]
    fn test_bare_token_with_invalid_chars() {
        assert_eq!(parse_playlist_id("PLabc def ghij"), None);
        assert_eq!(parse_playlist_id("PLabc.defghij"), None);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_playlist_id(""), None);
        assert_eq!(parse_playlist_id("   \t\n"), None);
    }

    #[test]
    fn test_partial_query_string() {
        assert_eq!(
            parse_playlist_id("watch?v=dQw4w9WgXcQ&list=PLxyz12345&index=2"),
            Some("PLxyz12345".to_string())
        );
        assert_eq!(
            parse_playlist_id("youtube.com/playlist?list=PLxyz12345"),
            Some("PLxyz12345".to_string())
        );
    }

    #[test]
    fn test_partial_query_string_is_percent_decoded() {
        assert_eq!(
            parse_playlist_id("www.youtube.com/playlist?list=PL%2Dabc%5Fdef"),
            Some("PL-abc_def".to_string())
        );
    }

    #[test]
    fn test_partial_query_string_too_short() {
        assert_eq!(parse_playlist_id("watch?v=x&list=ab&foo=bar"), None);
    }
}
