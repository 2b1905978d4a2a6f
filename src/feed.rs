//! Warehouse stock feed: download, unzip, and parse the supplier spreadsheet.

use crate::error::{Error, Result};
use calamine::{Data, Range, Reader, Xls};
use std::io::{Cursor, Read};

/// Supplier stock feed (zipped .xls)
const FEED_URL: &str = "https://timeworld.ru/upload/files/ostatki.zip";

/// Rows of preamble before the header row in the supplier spreadsheet
const PREAMBLE_ROWS: usize = 17;

const CODE_COLUMN: &str = "Код";
const QUANTITY_COLUMN: &str = "Количество";
const PRICE_COLUMN: &str = "Цена";

/// One row of the warehouse snapshot; all fields as the supplier wrote them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRecord {
    /// Product code, shared with the marketplace catalogs
    pub code: String,
    /// Raw quantity text ("7", ">10", "1", ...)
    pub quantity: String,
    /// Raw price text ("5'990.00 руб.", ...)
    pub price: String,
}

/// Downloads and parses the supplier stock feed.
pub struct StockFeed {
    client: reqwest::Client,
    url: String,
}

impl Default for StockFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl StockFeed {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            url: FEED_URL.to_string(),
        }
    }

    /// Point the feed at a different URL (tests use a mock server).
    #[cfg(test)]
    pub fn with_url(url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.to_string(),
        }
    }

    /// Fetch and parse the current warehouse snapshot.
    ///
    /// The archive is unpacked in memory; nothing touches the filesystem.
    pub async fn fetch(&self) -> Result<Vec<FeedRecord>> {
        log::info!("Downloading stock feed from {}", self.url);
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(Error::Status(response.status()));
        }

        let archive = response.bytes().await?;
        let spreadsheet = extract_spreadsheet(&archive)?;

        let mut workbook = Xls::new(Cursor::new(spreadsheet))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(Error::NoSpreadsheet)??;

        let records = records_from_range(&range)?;
        log::info!("Parsed {} feed records", records.len());
        Ok(records)
    }
}

/// Pull the first .xls entry out of the downloaded archive.
fn extract_spreadsheet(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        if entry.name().ends_with(".xls") {
            log::debug!("Extracting {} ({} bytes)", entry.name(), entry.size());
            let mut contents = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut contents)?;
            return Ok(contents);
        }
    }
    Err(Error::NoSpreadsheet)
}

/// Map spreadsheet rows onto feed records.
///
/// The supplier file carries 17 rows of preamble, then a header row naming
/// the columns, then the data. Rows without a product code are skipped.
fn records_from_range(range: &Range<Data>) -> Result<Vec<FeedRecord>> {
    let mut rows = range.rows().skip(PREAMBLE_ROWS);
    let header = rows.next().ok_or(Error::MissingColumn(CODE_COLUMN))?;

    let code_col = column_index(header, CODE_COLUMN)?;
    let quantity_col = column_index(header, QUANTITY_COLUMN)?;
    let price_col = column_index(header, PRICE_COLUMN)?;

    let mut records = Vec::new();
    for row in rows {
        let code = cell_text(row, code_col);
        if code.is_empty() {
            continue;
        }
        records.push(FeedRecord {
            code,
            quantity: cell_text(row, quantity_col),
            price: cell_text(row, price_col),
        });
    }
    Ok(records)
}

fn column_index(header: &[Data], name: &'static str) -> Result<usize> {
    header
        .iter()
        .position(|cell| cell.to_string().trim() == name)
        .ok_or(Error::MissingColumn(name))
}

/// Render a cell the way it reads: integral floats without the ".0" tail.
fn cell_text(row: &[Data], index: usize) -> String {
    match row.get(index) {
        Some(Data::Empty) | None => String::new(),
        Some(cell) => cell.to_string().trim().to_string(),
    }
}

#[cfg(test)]
#[path = "feed_tests.rs"]
mod tests;
