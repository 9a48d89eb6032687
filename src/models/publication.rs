//! Publication model for one row of the profile listing.

use serde::{Deserialize, Serialize};

/// A single publication as listed on the profile page
///
/// Field order matches the serialized document, so `publications.json` reads
/// title first and link last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationRecord {
    /// Publication title (never empty)
    pub title: String,

    /// Author line as displayed, possibly truncated with "..."
    pub authors: String,

    /// Venue line as displayed
    pub venue: String,

    /// Year text; usually four digits but not guaranteed
    pub year: String,

    /// Citation count, 0 when the row shows none
    pub citations: u64,

    /// Deep link to the citation detail view
    pub link: Option<String>,
}

impl PublicationRecord {
    /// Create a record with only a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            authors: String::new(),
            venue: String::new(),
            year: String::new(),
            citations: 0,
            link: None,
        }
    }

    pub fn authors(mut self, authors: impl Into<String>) -> Self {
        self.authors = authors.into();
        self
    }

    pub fn venue(mut self, venue: impl Into<String>) -> Self {
        self.venue = venue.into();
        self
    }

    pub fn year(mut self, year: impl Into<String>) -> Self {
        self.year = year.into();
        self
    }

    pub fn citations(mut self, citations: u64) -> Self {
        self.citations = citations;
        self
    }

    pub fn link(mut self, link: Option<String>) -> Self {
        self.link = link;
        self
    }
}
