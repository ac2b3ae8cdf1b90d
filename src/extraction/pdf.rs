// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! PDF text extraction

use std::io::Write;

use pdf_oxide::PdfDocument;
use tracing::debug;

use super::ExtractionError;

/// Extracts the text of every page in document order.
///
/// The parser reads from disk, so the upload is staged in a temporary file
/// that is removed when this function returns. Pages without text contribute
/// an empty string; a page that fails to parse fails the whole document.
/// Pages are concatenated without a separator.
pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut staged = tempfile::Builder::new()
        .prefix("upload-")
        .suffix(".pdf")
        .tempfile()?;
    staged.write_all(bytes)?;
    staged.flush()?;

    let path = staged
        .path()
        .to_str()
        .ok_or_else(|| ExtractionError::Pdf("temporary path is not valid UTF-8".to_string()))?;

    let mut doc = PdfDocument::open(path).map_err(|e| ExtractionError::Pdf(e.to_string()))?;
    let page_count = doc
        .page_count()
        .map_err(|e| ExtractionError::Pdf(e.to_string()))?;

    let mut pages = Vec::with_capacity(page_count);
    for page_index in 0..page_count {
        let text = doc
            .extract_text(page_index)
            .map_err(|e| ExtractionError::Pdf(format!("page {}: {}", page_index + 1, e)))?;
        pages.push(page_text(text));
    }

    debug!("Extracted {} PDF pages", page_count);
    Ok(join_pages(pages))
}

/// Drops the line terminator the parser closes each page with; a page that
/// is only whitespace has no text.
fn page_text(raw: String) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }
    let end = raw.trim_end_matches(['\r', '\n']).len();
    let mut text = raw;
    text.truncate(end);
    text
}

fn join_pages<I>(pages: I) -> String
where
    I: IntoIterator<Item = String>,
{
    pages.into_iter().collect()
}
