//! Citation statistics from the profile sidebar.

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use super::{element_text, parse_count, selector, ScrapeError};
use crate::models::MetricsRecord;

/// Statistic labels in the order they are stored in a [`MetricsRecord`]
pub const STAT_LABELS: [&str; 3] = ["citations", "h-index", "i10-index"];

const STAT_CELL: &str = ".gsc_rsb_std";
const STAT_ROW: &str = "#gsc_rsb_st tbody tr";
const STAT_LABEL_CELL: &str = ".gsc_rsb_sc1";

/// How the three statistics are located on the profile page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatLookup {
    /// Read the first three `.gsc_rsb_std` cells as citations, h-index and
    /// i10-index, in that order.
    ///
    /// This follows the sidebar's layout rather than its labels. On a page
    /// with both an "All" and a "Since" column the cells interleave, so the
    /// second value read is the recent citation count.
    #[default]
    Positional,

    /// Match the statistics table rows by their label and read the "All"
    /// column.
    ///
    /// Labels are only recognized in English. A row with any other label is
    /// taken by its position in the table body (citations, h-index,
    /// i10-index), so pages served with another `hl` still work.
    Labeled,
}

impl StatLookup {
    /// Read the statistics as `[citations, h_index, i10_index]`.
    pub fn read(self, document: &Html) -> Result<[u64; 3], ScrapeError> {
        match self {
            StatLookup::Positional => read_positional(document),
            StatLookup::Labeled => read_labeled(document),
        }
    }
}

fn read_positional(document: &Html) -> Result<[u64; 3], ScrapeError> {
    let cell = selector(STAT_CELL)?;
    let cells: Vec<String> = document.select(&cell).map(|c| element_text(&c)).collect();

    if cells.len() < STAT_LABELS.len() {
        return Err(ScrapeError::Structure(format!(
            "found {} statistic elements, expected at least {}",
            cells.len(),
            STAT_LABELS.len()
        )));
    }

    Ok([
        stat_at(&cells, 0)?,
        stat_at(&cells, 1)?,
        stat_at(&cells, 2)?,
    ])
}

fn stat_at(cells: &[String], index: usize) -> Result<u64, ScrapeError> {
    let text = cells.get(index).ok_or_else(|| {
        ScrapeError::Structure(format!("missing statistic '{}'", STAT_LABELS[index]))
    })?;

    parse_count(text).map_err(|e| {
        ScrapeError::Number(format!("{} ({})", STAT_LABELS[index], e))
    })
}

fn read_labeled(document: &Html) -> Result<[u64; 3], ScrapeError> {
    let row = selector(STAT_ROW)?;
    let label = selector(STAT_LABEL_CELL)?;
    let cell = selector(STAT_CELL)?;

    let mut values: [Option<u64>; 3] = [None; 3];

    for (position, stat_row) in document.select(&row).enumerate() {
        let index = match row_label_index(&stat_row, &label) {
            Some(index) => index,
            None if position < STAT_LABELS.len() => position,
            None => continue,
        };
        if values[index].is_some() {
            continue;
        }

        let text = stat_row
            .select(&cell)
            .next()
            .map(|c| element_text(&c))
            .ok_or_else(|| {
                ScrapeError::Structure(format!(
                    "statistic row '{}' has no value",
                    STAT_LABELS[index]
                ))
            })?;

        let value = parse_count(&text)
            .map_err(|e| ScrapeError::Number(format!("{} ({})", STAT_LABELS[index], e)))?;
        values[index] = Some(value);
    }

    match values {
        [Some(citations), Some(h_index), Some(i10_index)] => Ok([citations, h_index, i10_index]),
        _ => {
            let missing: Vec<&str> = STAT_LABELS
                .iter()
                .zip(values.iter())
                .filter(|(_, v)| v.is_none())
                .map(|(label, _)| *label)
                .collect();
            Err(ScrapeError::Structure(format!(
                "missing statistics: {}",
                missing.join(", ")
            )))
        }
    }
}

fn row_label_index(row: &ElementRef, label: &Selector) -> Option<usize> {
    let text = row.select(label).next().map(|l| element_text(&l))?;
    let text = text.to_lowercase();
    STAT_LABELS.iter().position(|known| *known == text)
}

/// Extracts a [`MetricsRecord`] from the markup of a profile page
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsExtractor {
    lookup: StatLookup,
}

impl MetricsExtractor {
    pub fn new(lookup: StatLookup) -> Self {
        Self { lookup }
    }

    /// Extract all three statistics, or fail without a partial record.
    pub fn extract(&self, html: &str) -> Result<MetricsRecord, ScrapeError> {
        let document = Html::parse_document(html);
        let [citations, h_index, i10_index] = self.lookup.read(&document)?;

        tracing::debug!(
            citations,
            h_index,
            i10_index,
            lookup = ?self.lookup,
            "Parsed profile statistics"
        );

        Ok(MetricsRecord::new(citations, h_index, i10_index))
    }
}
