//! Provider filters shared by discovery queries and storage adapters.

use super::Provider;

/// Case-insensitive free-text query.
///
/// Construction trims the input; blank input yields `None` so an empty query
/// is treated as "no text filter".
///
/// # Examples
/// ```
/// use marketplace::domain::SearchText;
///
/// assert!(SearchText::parse("   ").is_none());
/// let text = SearchText::parse(" Plumb ").expect("non-blank query");
/// assert_eq!(text.as_str(), "Plumb");
/// assert!(text.matches("Master plumber"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchText {
    raw: String,
    folded: String,
}

impl SearchText {
    /// Parse a user-supplied query.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            raw: trimmed.to_owned(),
            folded: trimmed.to_lowercase(),
        })
    }

    /// The trimmed query as supplied.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether `haystack` contains the query, ignoring case.
    ///
    /// The query is a literal: characters such as `.` or `%` carry no
    /// pattern meaning.
    pub fn matches(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.folded)
    }
}

/// Predicates applied to provider candidates.
///
/// Every provider query only sees providers whose `availability` flag is set;
/// the remaining predicates are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderFilter {
    /// Case-insensitive substring match on the category label.
    pub category: Option<SearchText>,
    /// Case-insensitive substring match on name, category, or address.
    pub text: Option<SearchText>,
}

impl ProviderFilter {
    /// A filter that keeps every available provider.
    pub fn available() -> Self {
        Self::default()
    }

    /// Restrict to a single category.
    #[must_use]
    pub fn with_category(mut self, category: SearchText) -> Self {
        self.category = Some(category);
        self
    }

    /// Restrict to providers matching a free-text query.
    #[must_use]
    pub fn with_text(mut self, text: SearchText) -> Self {
        self.text = Some(text);
        self
    }

    /// Evaluate the filter against an in-memory provider.
    ///
    /// Storage adapters that push predicates down must agree with this
    /// method.
    pub fn matches(&self, provider: &Provider) -> bool {
        if !provider.availability {
            return false;
        }
        if let Some(category) = &self.category
            && !category.matches(&provider.category)
        {
            return false;
        }
        self.text.as_ref().is_none_or(|text| {
            text.matches(&provider.name)
                || text.matches(&provider.category)
                || text.matches(&provider.address)
        })
    }
}
