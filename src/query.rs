//! Search query construction
//!
//! Holds the catalogue of puzzle types the club publishes and builds the
//! listing URL for a type and publication date range.

use crate::config::SiteConfig;
use chrono::NaiveDate;

/// Date format the listing filter expects (`dd/mm/yyyy`)
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Known puzzle type codes and their display names
pub const PUZZLE_TYPES: &[(&str, &str)] = &[
    ("1", "Quick Cryptic"),
    ("2", "Times Cryptic"),
    ("3", "Sunday Times Cryptic"),
    ("4", "Times Cryptic Jumbo"),
    ("5", "Times Concise"),
    ("6", "Sunday Times Concise"),
    ("7", "Times Concise Jumbo"),
    ("8", "Mephisto"),
    ("9", "General Knowledge Jumbo"),
    ("10", "O Tempora! (Latin)"),
    ("11", "The Listener"),
    ("12", "Monthly Club Special"),
    ("SPECIALIST", "Specialist"),
    ("CRYPTIC", "Cryptic"),
];

/// Returns the display name of a known puzzle type code
pub fn puzzle_type_name(code: &str) -> Option<&'static str> {
    PUZZLE_TYPES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, name)| *name)
}

/// Parses a `dd/mm/yyyy` date
pub fn parse_date(input: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
}

/// A puzzle type plus publication date range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Puzzle type code, free-form
    pub puzzle_type: String,
    /// Start date, `dd/mm/yyyy`
    pub from: String,
    /// End date, `dd/mm/yyyy`
    pub to: String,
}

impl SearchQuery {
    pub fn new(
        puzzle_type: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self {
            puzzle_type: puzzle_type.into(),
            from: from.into(),
            to: to.into(),
        }
    }

    /// Builds the listing URL for this query
    ///
    /// The values are interpolated verbatim; the site expects the date
    /// slashes and filter brackets unescaped.
    ///
    /// # Example
    ///
    /// ```
    /// use crossword_fetch::config::SiteConfig;
    /// use crossword_fetch::query::SearchQuery;
    ///
    /// let site = SiteConfig {
    ///     base_url: "https://example.com".to_string(),
    ///     listing_path: "/list".to_string(),
    ///     ..SiteConfig::default()
    /// };
    /// let url = SearchQuery::new("8", "01/01/2020", "31/01/2020").search_url(&site);
    /// assert_eq!(
    ///     url,
    ///     "https://example.com/list?search=&filter[puzzle_type]=8&filter[publish_at][from]=01/01/2020&filter[publish_at][to]=31/01/2020"
    /// );
    /// ```
    pub fn search_url(&self, site: &SiteConfig) -> String {
        format!(
            "{}{}?search=&filter[puzzle_type]={}&filter[publish_at][from]={}&filter[publish_at][to]={}",
            site.base_url, site.listing_path, self.puzzle_type, self.from, self.to
        )
    }

    /// Returns true if the puzzle type is in the catalogue
    pub fn has_known_type(&self) -> bool {
        puzzle_type_name(&self.puzzle_type).is_some()
    }
}
