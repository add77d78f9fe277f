use crate::results::Deal;
use regex::Regex;

/// Link filter that uses regex patterns to decide which deals to keep
#[derive(Debug, Default)]
pub struct DealFilter {
    include_regexes: Vec<Regex>,
    exclude_regexes: Vec<Regex>,
}

impl DealFilter {
    /// Compile include and exclude patterns
    pub fn new(
        include_patterns: &[String],
        exclude_patterns: &[String],
    ) -> Result<Self, regex::Error> {
        let mut include_regexes = Vec::with_capacity(include_patterns.len());
        for pattern in include_patterns {
            include_regexes.push(Regex::new(pattern)?);
        }

        let mut exclude_regexes = Vec::with_capacity(exclude_patterns.len());
        for pattern in exclude_patterns {
            exclude_regexes.push(Regex::new(pattern)?);
        }

        Ok(Self {
            include_regexes,
            exclude_regexes,
        })
    }

    /// Returns true if the filter keeps every link
    pub fn is_empty(&self) -> bool {
        self.include_regexes.is_empty() && self.exclude_regexes.is_empty()
    }

    /// Determine if a link should be kept. Exclusions take precedence.
    pub fn accepts(&self, href: &str) -> bool {
        if self.exclude_regexes.iter().any(|regex| regex.is_match(href)) {
            return false;
        }

        // If include patterns are specified, at least one must match
        self.include_regexes.is_empty()
            || self.include_regexes.iter().any(|regex| regex.is_match(href))
    }

    /// Keep the accepted deals, preserving their order
    pub fn apply<P>(&self, deals: Vec<Deal<P>>) -> Vec<Deal<P>> {
        if self.is_empty() {
            return deals;
        }

        let before = deals.len();
        let kept: Vec<_> = deals.into_iter().filter(|deal| self.accepts(&deal.href)).collect();
        ::log::debug!("Link filter kept {} of {} deals", kept.len(), before);
        kept
    }
}

/// Case-insensitive substring match of a title against a search term.
///
/// Surrounding whitespace in the term is ignored; an empty term matches everything.
pub fn matches_keyword(title: &str, term: &str) -> bool {
    let term = term.trim();
    term.is_empty() || title.to_lowercase().contains(&term.to_lowercase())
}
