// Text Processing Service
// Headline normalization ahead of classification

use regex::Regex;
use std::sync::OnceLock;

use super::stopwords::StopwordSet;

fn url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"http\S+").expect("valid url regex"))
}

fn non_alpha_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z\s]").expect("valid non-alpha regex"))
}

/// Whitespace for headline purposes: Unicode whitespace plus the ASCII
/// information separators U+001C..=U+001F, which `char::is_whitespace` and
/// regex `\s` leave out.
pub fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// True when the text has nothing but separators (or nothing at all)
pub fn is_blank(text: &str) -> bool {
    text.chars().all(is_separator)
}

/// Normalize a raw headline into the token string the classifier was fitted on.
///
/// Lowercases, drops anything starting with `http` up to the next whitespace,
/// keeps only `a-z` and whitespace, removes stopwords and joins the remaining
/// tokens with single spaces. Order matters: URLs are removed before
/// punctuation so that `https://x.co` does not leave `httpsxco` behind.
pub fn clean_text(text: &str, stopwords: &StopwordSet) -> String {
    if text.is_empty() {
        return String::new();
    }

    // separators become plain spaces so the regexes and the split agree on them
    let lowered: String = text
        .to_lowercase()
        .chars()
        .map(|c| if is_separator(c) { ' ' } else { c })
        .collect();
    let without_urls = url_re().replace_all(&lowered, "");
    let letters_only = non_alpha_re().replace_all(&without_urls, "");

    letters_only
        .split_whitespace()
        .filter(|w| !stopwords.contains(w))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Shorten text for log lines and terminal previews
pub fn preview(s: &str, max_chars: usize) -> String {
    let mut out: String = s.chars().take(max_chars).collect();
    if s.chars().count() > max_chars {
        out.push_str("...");
    }
    out.replace('\n', " ")
}
