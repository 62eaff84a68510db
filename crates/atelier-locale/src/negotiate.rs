//! `Accept-Language` parsing and quality-weighted negotiation.

use std::cmp::Ordering;

use atelier_core::Locale;

/// One entry of an `Accept-Language` header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LanguageRange<'a> {
    /// Language tag as sent, e.g. `ar-EG` or `*`.
    pub tag: &'a str,
    /// Quality weight in `(0.0, 1.0]`.
    pub quality: f32,
}

/// Parse an `Accept-Language` header into ranges ordered by quality,
/// highest first. Equal weights keep header order.
///
/// Entries with a malformed tag or weight are dropped, as are entries with
/// `q=0`, which mark a language as not acceptable.
pub fn parse_accept_language(header: &str) -> Vec<LanguageRange<'_>> {
    let mut ranges: Vec<LanguageRange<'_>> = header
        .split(',')
        .filter_map(parse_range)
        .filter(|r| r.quality > 0.0)
        .collect();

    // sort_by is stable, so ties stay in header order.
    ranges.sort_by(|a, b| b.quality.partial_cmp(&a.quality).unwrap_or(Ordering::Equal));
    ranges
}

fn parse_range(entry: &str) -> Option<LanguageRange<'_>> {
    let mut parts = entry.split(';');
    let tag = parts.next()?.trim();
    if !is_valid_tag(tag) {
        return None;
    }

    let mut quality = 1.0_f32;
    for param in parts {
        let param = param.trim();
        let Some((key, value)) = param.split_once('=') else {
            continue;
        };
        if key.trim().eq_ignore_ascii_case("q") {
            let q: f32 = value.trim().parse().ok()?;
            if !(0.0..=1.0).contains(&q) {
                return None;
            }
            quality = q;
        }
    }

    Some(LanguageRange { tag, quality })
}

fn is_valid_tag(tag: &str) -> bool {
    if tag == "*" {
        return true;
    }
    !tag.is_empty()
        && tag.len() <= 35
        && tag
            .split('-')
            .all(|sub| !sub.is_empty() && sub.len() <= 8 && sub.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// Pick the best supported locale for an `Accept-Language` header.
///
/// Walks the ranges by quality. Each range matches a supported locale by
/// exact tag first, then by its primary subtag (`ar-EG` matches `ar`). A
/// wildcard matches `default`. Returns `None` when nothing matches, including
/// for an absent or unparseable header.
pub fn negotiate(header: Option<&str>, supported: &[Locale], default: Locale) -> Option<Locale> {
    let header = header?;
    for range in parse_accept_language(header) {
        if range.tag == "*" {
            return Some(default);
        }
        if let Some(locale) = match_supported(range.tag, supported) {
            return Some(locale);
        }
        let primary = range.tag.split('-').next().unwrap_or(range.tag);
        if let Some(locale) = match_supported(primary, supported) {
            return Some(locale);
        }
    }
    None
}

fn match_supported(tag: &str, supported: &[Locale]) -> Option<Locale> {
    Locale::from_tag(tag).filter(|l| supported.contains(l))
}
