use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use url::Url;

/// Title shown when an annotation offers nothing readable
pub const PLACEHOLDER_TITLE: &str = "(no text)";

/// How a deal's display title is derived when the annotation has none
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TitleFallback {
    /// Title attribute, then visible text, then the placeholder
    Plain,
    /// As `Plain`, but try the humanized last URL path segment before the placeholder
    #[default]
    HumanizedUrl,
}

/// Resolve the display title for an annotation
pub fn resolve_title(
    title: Option<&str>,
    visible_text: Option<&str>,
    href: &str,
    fallback: TitleFallback,
) -> String {
    if let Some(title) = non_empty(title) {
        return title.to_string();
    }
    if let Some(text) = non_empty(visible_text) {
        return text.to_string();
    }
    if fallback == TitleFallback::HumanizedUrl {
        if let Some(humanized) = humanize_url(href) {
            return humanized;
        }
    }
    PLACEHOLDER_TITLE.to_string()
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Turn the last path segment of a URL into a readable title.
///
/// `https://x.test/deals/some-great-deal.html` becomes `Some Great Deal`.
pub fn humanize_url(href: &str) -> Option<String> {
    let url = Url::parse(href).ok()?;
    let segment = url
        .path_segments()?
        .filter(|s| !s.is_empty())
        .next_back()?;

    let decoded = percent_decode_str(segment).decode_utf8_lossy();
    let stem = strip_extension(&decoded);

    let words: Vec<String> = stem
        .split(|c: char| c == '-' || c == '_' || c == '+' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect();

    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

fn strip_extension(segment: &str) -> &str {
    match segment.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && !ext.is_empty()
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            stem
        }
        _ => segment,
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_attribute_wins() {
        let title = resolve_title(
            Some("  Spring Sale "),
            Some("click here"),
            "https://x.test/a",
            TitleFallback::HumanizedUrl,
        );
        assert_eq!(title, "Spring Sale");
    }

    #[test]
    fn test_visible_text_when_no_title() {
        let title = resolve_title(
            Some("   "),
            Some(" 50% off\n"),
            "https://x.test/a",
            TitleFallback::Plain,
        );
        assert_eq!(title, "50% off");
    }

    #[test]
    fn test_humanized_url_fallback() {
        let title = resolve_title(
            None,
            Some(""),
            "https://x.test/some-great-deal",
            TitleFallback::HumanizedUrl,
        );
        assert_eq!(title, "Some Great Deal");
    }

    #[test]
    fn test_plain_fallback_uses_placeholder() {
        let title = resolve_title(
            None,
            None,
            "https://x.test/some-great-deal",
            TitleFallback::Plain,
        );
        assert_eq!(title, PLACEHOLDER_TITLE);
    }

    #[test]
    fn test_humanize_url_variants() {
        assert_eq!(
            humanize_url("https://x.test/deals/summer_bundle.html?ref=pdf").as_deref(),
            Some("Summer Bundle")
        );
        assert_eq!(
            humanize_url("https://x.test/offers/caf%C3%A9-deal/").as_deref(),
            Some("Café Deal")
        );
        assert_eq!(humanize_url("https://x.test/"), None);
        assert_eq!(humanize_url("not a url"), None);
        assert_eq!(humanize_url("mailto:sales@x.test"), None);
    }

    #[test]
    fn test_blank_title_and_text_are_skipped() {
        let title = resolve_title(Some(" \t"), Some("\n"), "mailto:a@x.test", TitleFallback::Plain);
        assert_eq!(title, PLACEHOLDER_TITLE);
    }

    #[test]
    fn test_humanized_placeholder_when_url_has_no_path() {
        let title = resolve_title(None, None, "https://x.test/", TitleFallback::HumanizedUrl);
        assert_eq!(title, PLACEHOLDER_TITLE);
    }
}
