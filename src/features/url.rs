//! URL feature builder.
//!
//! Pure string analysis - no DNS, no fetching. The URL is first normalized
//! (scheme, `www.` prefix and one trailing slash stripped), then decomposed
//! into authority, path and query for lexical counts, structural flags,
//! entropy and keyword/TLD indicators.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::entropy::text_entropy;
use crate::features::set::FeatureSet;

/// Dotted-quad IPv4 authority, e.g. `192.168.0.1`.
static IPV4_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,3}\.){3}\d{1,3}$").expect("static IPv4 pattern"));

/// Punctuation characters counted individually, with their feature names.
const PUNCTUATION: &[(char, &str)] = &[
    ('.', "count_dot"),
    ('-', "count_hyphen"),
    ('_', "count_underscore"),
    ('/', "count_slash"),
    ('?', "count_question"),
    ('=', "count_equal"),
    ('@', "count_at"),
    ('&', "count_ampersand"),
    ('!', "count_exclamation"),
    (' ', "count_space"),
    ('~', "count_tilde"),
    (',', "count_comma"),
    ('+', "count_plus"),
    ('*', "count_asterisk"),
    ('#', "count_hash"),
    ('$', "count_dollar"),
    ('%', "count_percent"),
];

/// Substrings that phishing pages use to look legitimate.
const SUSPICIOUS_KEYWORDS: &[&str] = &[
    "login", "verify", "secure", "account", "password", "update", "banking", "confirm",
    "signin", "admin",
];

const COMMON_TLDS: &[&str] = &["com", "org", "net", "edu", "gov", "mil", "int", "info", "io"];

/// TLDs with free registration, heavily abused in phishing campaigns.
const SUSPICIOUS_TLDS: &[&str] = &["tk", "ml", "ga", "cf", "gq", "xyz", "top", "buzz", "click", "work"];

const SHORTENER_HOSTS: &[&str] = &[
    "bit.ly", "goo.gl", "tinyurl.com", "t.co", "ow.ly", "is.gd", "buff.ly", "cutt.ly",
    "rb.gy", "shorte.st",
];

/// Normalize a URL: strip a leading `http://`/`https://`, an optional
/// `www.`, and a single trailing slash. Idempotent.
pub fn normalize(url: &str) -> String {
    let mut rest = url.trim();
    for scheme in ["http://", "https://"] {
        if let Some(stripped) = rest.strip_prefix(scheme) {
            rest = stripped;
            break;
        }
    }
    rest = rest.strip_prefix("www.").unwrap_or(rest);
    rest = rest.strip_suffix('/').unwrap_or(rest);
    rest.to_string()
}

/// Decomposed normalized URL.
struct UrlParts {
    authority: String,
    path: String,
    query: String,
}

/// Split a normalized URL (no scheme) into authority / path / query.
fn split_parts(normalized: &str) -> UrlParts {
    let (before_query, query) = match normalized.split_once('?') {
        Some((b, q)) => (b, q),
        None => (normalized, ""),
    };
    let (authority, path) = match before_query.split_once('/') {
        Some((a, p)) => (a, format!("/{}", p)),
        None => (before_query, String::new()),
    };
    UrlParts {
        authority: authority.to_string(),
        path,
        query: query.to_string(),
    }
}

/// Host without a trailing port component.
fn host_of(authority: &str) -> &str {
    match authority.rsplit_once(':') {
        Some((host, port)) if !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()) => host,
        _ => authority,
    }
}

/// Split a hostname into (subdomain, registered domain, suffix).
///
/// Plain label split: the last label is the suffix, the one before it the
/// registered domain, anything left the subdomain. An IPv4 host has no
/// suffix and counts entirely as the domain.
fn split_host(host: &str) -> (String, String, String) {
    if IPV4_RE.is_match(host) {
        return (String::new(), host.to_string(), String::new());
    }
    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    match labels.len() {
        0 => (String::new(), String::new(), String::new()),
        1 => (String::new(), labels[0].to_string(), String::new()),
        n => (
            labels[..n - 2].join("."),
            labels[n - 2].to_string(),
            labels[n - 1].to_string(),
        ),
    }
}

/// Extract the URL feature set. Returns the normalized URL (echoed in the
/// verdict) alongside the features.
pub fn build(url: &str) -> (String, FeatureSet) {
    let raw = url.trim();
    let normalized = normalize(raw);
    let parts = split_parts(&normalized);
    let host = host_of(&parts.authority);
    let (subdomain, domain, tld) = split_host(host);

    let mut features = FeatureSet::with_capacity(64);

    // Lexical lengths.
    features.insert("url_length", normalized.chars().count() as f64);
    features.insert("domain_length", domain.chars().count() as f64);
    features.insert("subdomain_length", subdomain.chars().count() as f64);
    features.insert("tld_length", tld.chars().count() as f64);
    features.insert("path_length", parts.path.chars().count() as f64);

    // Punctuation counts over the normalized URL.
    for &(ch, name) in PUNCTUATION {
        let count = normalized.chars().filter(|&c| c == ch).count();
        features.insert(name, count as f64);
    }

    let digits = normalized.chars().filter(|c| c.is_ascii_digit()).count();
    let letters = normalized.chars().filter(|c| c.is_ascii_alphabetic()).count();
    features.insert("count_digits", digits as f64);
    features.insert("count_letters", letters as f64);
    features.insert("digit_letter_ratio", digits as f64 / (letters as f64 + 1.0));

    // Structural flags.
    features.insert_flag("has_ip_address", IPV4_RE.is_match(host));
    features.insert_flag("is_abnormal", is_abnormal(raw));
    let query_params = if parts.query.is_empty() {
        0
    } else {
        parts.query.split('&').count()
    };
    features.insert("query_param_count", query_params as f64);
    features.insert(
        "path_segment_count",
        parts.path.chars().filter(|&c| c == '/').count() as f64,
    );
    features.insert_flag("uses_https", raw.to_ascii_lowercase().starts_with("https://"));
    features.insert_flag(
        "is_shortened",
        SHORTENER_HOSTS.iter().any(|&s| host.eq_ignore_ascii_case(s)),
    );

    // Entropy.
    features.insert("url_entropy", text_entropy(&normalized));
    features.insert("domain_entropy", text_entropy(&parts.authority));
    features.insert("path_entropy", text_entropy(&parts.path));

    // Keyword indicators, case-insensitive substring match on the whole URL.
    let lowered = normalized.to_ascii_lowercase();
    for &keyword in SUSPICIOUS_KEYWORDS {
        features.insert_flag(&format!("contains_{}", keyword), lowered.contains(keyword));
    }

    // TLD indicators.
    let tld_lower = tld.to_ascii_lowercase();
    for &name in COMMON_TLDS {
        features.insert_flag(&format!("tld_{}", name), tld_lower == name);
    }
    for &name in SUSPICIOUS_TLDS {
        features.insert_flag(&format!("tld_{}", name), tld_lower == name);
    }
    features.insert_flag(
        "has_uncommon_tld",
        !tld_lower.is_empty() && !COMMON_TLDS.contains(&tld_lower.as_str()),
    );
    features.insert_flag(
        "has_country_code_tld",
        tld_lower.len() == 2 && tld_lower.chars().all(|c| c.is_ascii_alphabetic()),
    );

    (normalized, features)
}

/// `@` anywhere, or a second `//` after the scheme separator.
fn is_abnormal(raw: &str) -> bool {
    if raw.contains('@') {
        return true;
    }
    let after_scheme = match raw.find("://") {
        Some(pos) => &raw[pos + 3..],
        None => raw,
    };
    after_scheme.contains("//")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_scheme_www_and_slash() {
        assert_eq!(normalize("https://www.example.com/"), "example.com");
        assert_eq!(normalize("http://example.com/a/b/"), "example.com/a/b");
        assert_eq!(normalize("example.com"), "example.com");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for url in [
            "https://www.example.com/path/",
            "http://192.168.0.1/login",
            "bit.ly/2Vxn3ad",
            "https://sub.domain.co.uk/a?b=c",
        ] {
            let once = normalize(url);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn test_ip_address_scenario() {
        let (normalized, features) = build("http://192.168.0.1/login");
        assert_eq!(normalized, "192.168.0.1/login");
        assert_eq!(features.get("has_ip_address"), Some(1.0));
        assert_eq!(features.get("contains_login"), Some(1.0));
        assert_eq!(features.get("uses_https"), Some(0.0));
    }

    #[test]
    fn test_shortener_scenario() {
        let (_, features) = build("https://bit.ly/2Vxn3ad");
        assert_eq!(features.get("is_shortened"), Some(1.0));
        assert_eq!(features.get("uses_https"), Some(1.0));
        assert_eq!(features.get("has_ip_address"), Some(0.0));
    }

    #[test]
    fn test_host_split() {
        let (sub, dom, tld) = split_host("mail.secure.example.com");
        assert_eq!(sub, "mail.secure");
        assert_eq!(dom, "example");
        assert_eq!(tld, "com");

        let (sub, dom, tld) = split_host("localhost");
        assert_eq!(sub, "");
        assert_eq!(dom, "localhost");
        assert_eq!(tld, "");
    }

    #[test]
    fn test_lengths_and_counts() {
        let (_, features) = build("https://a.example.com/one/two?x=1&y=2");
        assert_eq!(features.get("domain_length"), Some(7.0));
        assert_eq!(features.get("subdomain_length"), Some(1.0));
        assert_eq!(features.get("tld_length"), Some(3.0));
        assert_eq!(features.get("path_length"), Some(8.0));
        assert_eq!(features.get("query_param_count"), Some(2.0));
        assert_eq!(features.get("path_segment_count"), Some(2.0));
        assert_eq!(features.get("count_equal"), Some(2.0));
        assert_eq!(features.get("count_ampersand"), Some(1.0));
    }

    #[test]
    fn test_digit_letter_ratio_never_divides_by_zero() {
        let (_, features) = build("1234.56");
        assert_eq!(features.get("count_letters"), Some(0.0));
        assert_eq!(features.get("digit_letter_ratio"), Some(6.0));
    }

    #[test]
    fn test_abnormal_flags() {
        let (_, features) = build("http://user@evil.com/paypal");
        assert_eq!(features.get("is_abnormal"), Some(1.0));

        let (_, features) = build("http://example.com//redirect");
        assert_eq!(features.get("is_abnormal"), Some(1.0));

        let (_, features) = build("http://example.com/ok");
        assert_eq!(features.get("is_abnormal"), Some(0.0));
    }

    #[test]
    fn test_tld_indicators() {
        let (_, features) = build("http://free-prizes.tk/win");
        assert_eq!(features.get("tld_tk"), Some(1.0));
        assert_eq!(features.get("tld_com"), Some(0.0));
        assert_eq!(features.get("has_uncommon_tld"), Some(1.0));
        assert_eq!(features.get("has_country_code_tld"), Some(1.0));

        let (_, features) = build("http://example.com");
        assert_eq!(features.get("tld_com"), Some(1.0));
        assert_eq!(features.get("has_uncommon_tld"), Some(0.0));
        assert_eq!(features.get("has_country_code_tld"), Some(0.0));
    }

    #[test]
    fn test_entropy_features_present() {
        let (_, features) = build("https://example.com/abcdef");
        assert!(features.get("url_entropy").is_some_and(|e| e > 0.0));
        assert!(features.get("domain_entropy").is_some_and(|e| e > 0.0));
        assert!(features.get("path_entropy").is_some_and(|e| e > 0.0));
    }
}
