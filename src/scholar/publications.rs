//! Publication rows from the profile listing.

use scraper::{ElementRef, Html, Selector};

use super::{element_text, parse_count, selector, ProfileUrls, RowError, ScrapeError};
use crate::models::PublicationRecord;

/// Compiled selectors for one listing row
#[derive(Debug, Clone)]
struct RowSelectors {
    row: Selector,
    title: Selector,
    gray: Selector,
    year: Selector,
    citations: Selector,
}

impl RowSelectors {
    fn new() -> Result<Self, ScrapeError> {
        Ok(Self {
            row: selector(".gsc_a_tr")?,
            title: selector(".gsc_a_at")?,
            gray: selector(".gs_gray")?,
            year: selector(".gsc_a_y span")?,
            citations: selector(".gsc_a_c a")?,
        })
    }
}

/// Publications read from one listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    /// Valid rows in page order
    pub publications: Vec<PublicationRecord>,

    /// Number of `.gsc_a_tr` rows on the page, skipped rows included
    pub rows: usize,
}

/// Extracts [`PublicationRecord`]s from the markup of a listing page
#[derive(Debug, Clone)]
pub struct PublicationExtractor {
    urls: ProfileUrls,
    selectors: RowSelectors,
}

impl PublicationExtractor {
    pub fn new(urls: ProfileUrls) -> Result<Self, ScrapeError> {
        Ok(Self {
            urls,
            selectors: RowSelectors::new()?,
        })
    }

    /// Extract every valid row in page order.
    ///
    /// A row that fails to parse is logged and skipped; the remaining rows are
    /// still extracted. A page without a single valid row is an error.
    pub fn extract(&self, html: &str) -> Result<Vec<PublicationRecord>, ScrapeError> {
        self.extract_listing(html).map(|listing| listing.publications)
    }

    /// Like [`extract`](Self::extract), but also reports how many rows the
    /// page had before invalid ones were skipped.
    pub fn extract_listing(&self, html: &str) -> Result<Listing, ScrapeError> {
        let document = Html::parse_document(html);
        let mut publications = Vec::new();
        let mut rows = 0usize;
        let mut skipped = 0usize;

        for (index, row) in document.select(&self.selectors.row).enumerate() {
            rows += 1;
            match self.parse_row(&row) {
                Ok(publication) => publications.push(publication),
                Err(e) => {
                    skipped += 1;
                    tracing::warn!(row = index, "Could not parse a publication row: {}", e);
                }
            }
        }

        tracing::debug!(
            rows,
            parsed = publications.len(),
            skipped,
            "Parsed publication listing"
        );

        if publications.is_empty() {
            return Err(ScrapeError::NoPublications);
        }

        Ok(Listing { publications, rows })
    }

    /// Parse a single `.gsc_a_tr` row
    fn parse_row(&self, row: &ElementRef) -> Result<PublicationRecord, RowError> {
        let title_elem = row
            .select(&self.selectors.title)
            .next()
            .ok_or(RowError::MissingTitle)?;

        let title = element_text(&title_elem);
        if title.is_empty() {
            return Err(RowError::EmptyTitle);
        }

        // First gray line is the author list, the second one the venue.
        let mut gray = row.select(&self.selectors.gray);
        let authors = gray.next().map(|e| element_text(&e)).unwrap_or_default();
        let venue = gray.next().map(|e| element_text(&e)).unwrap_or_default();

        let year = row
            .select(&self.selectors.year)
            .next()
            .map(|e| element_text(&e))
            .unwrap_or_default();

        let citations = row
            .select(&self.selectors.citations)
            .next()
            .and_then(|e| parse_count(&element_text(&e)).ok())
            .unwrap_or(0);

        let link = title_elem
            .value()
            .attr("data-href")
            .or_else(|| title_elem.value().attr("href"))
            .and_then(|href| self.urls.citation_link(href));

        Ok(PublicationRecord::new(title)
            .authors(authors)
            .venue(venue)
            .year(year)
            .citations(citations)
            .link(link))
    }
}
