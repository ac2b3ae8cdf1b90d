// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Document text extraction
//!
//! Uploaded documents are classified by filename suffix and handed to the
//! matching extractor. Extractors are pure functions from document bytes to
//! plain text and do not touch the network.
//!
//! - PDF: page texts concatenated in page order with no separator
//! - DOCX: body paragraph texts joined with `\n`

pub mod docx;
pub mod pdf;

use thiserror::Error;

/// Document type resolved from an uploaded filename
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Unsupported,
}

impl DocumentFormat {
    /// Classifies a filename by case-insensitive suffix.
    ///
    /// Content is never sniffed: `notes.PDF` is a PDF even if its bytes are
    /// not, and a name with no suffix is unsupported.
    pub fn from_filename(filename: &str) -> Self {
        let lower = filename.to_lowercase();
        if lower.ends_with(".pdf") {
            DocumentFormat::Pdf
        } else if lower.ends_with(".docx") {
            DocumentFormat::Docx
        } else {
            DocumentFormat::Unsupported
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, DocumentFormat::Unsupported)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
            DocumentFormat::Unsupported => "unsupported",
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while turning document bytes into text
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The PDF could not be opened or a page could not be read
    #[error("{0}")]
    Pdf(String),

    /// The DOCX archive or its document part is malformed
    #[error("{0}")]
    Docx(String),

    /// No extractor exists for the document format
    #[error("unsupported document format")]
    UnsupportedFormat,

    /// Staging the upload for the parser failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Extracts plain text from `bytes` using the extractor for `format`.
pub fn extract_text(format: DocumentFormat, bytes: &[u8]) -> Result<String, ExtractionError> {
    match format {
        DocumentFormat::Pdf => pdf::extract_text(bytes),
        DocumentFormat::Docx => docx::extract_text(bytes),
        DocumentFormat::Unsupported => Err(ExtractionError::UnsupportedFormat),
    }
}
