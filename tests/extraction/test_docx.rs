// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use doc_embed_service::extraction::{docx, extract_text, DocumentFormat, ExtractionError};
use docx_rs::{Docx, Paragraph, Run, Table, TableCell, TableRow};
use std::io::Cursor;

use crate::common::build_docx;

fn pack(docx: Docx) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    docx.build().pack(&mut buf).unwrap();
    buf.into_inner()
}

#[test]
fn test_paragraphs_joined_in_order() {
    let bytes = build_docx(&["P1", "P2", "P3"]);
    assert_eq!(docx::extract_text(&bytes).unwrap(), "P1\nP2\nP3");
}

#[test]
fn test_single_paragraph_has_no_separator() {
    let bytes = build_docx(&["only one"]);
    assert_eq!(docx::extract_text(&bytes).unwrap(), "only one");
}

#[test]
fn test_zero_paragraphs_is_empty() {
    let bytes = build_docx(&[]);
    assert_eq!(docx::extract_text(&bytes).unwrap(), "");
}

#[test]
fn test_empty_paragraphs_keep_their_separators() {
    let bytes = build_docx(&["a", "", "b"]);
    assert_eq!(docx::extract_text(&bytes).unwrap(), "a\n\nb");
}

#[test]
fn test_runs_within_paragraph_concatenate() {
    let doc = Docx::new().add_paragraph(
        Paragraph::new()
            .add_run(Run::new().add_text("Hello, "))
            .add_run(Run::new().add_text("world")),
    );
    assert_eq!(docx::extract_text(&pack(doc)).unwrap(), "Hello, world");
}

#[test]
fn test_table_paragraphs_are_not_body_paragraphs() {
    let table = Table::new(vec![TableRow::new(vec![TableCell::new()
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text("in a cell")))])]);
    let doc = Docx::new()
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text("before")))
        .add_table(table)
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text("after")));

    assert_eq!(docx::extract_text(&pack(doc)).unwrap(), "before\nafter");
}

#[test]
fn test_dispatch_by_format() {
    let bytes = build_docx(&["dispatched"]);
    assert_eq!(
        extract_text(DocumentFormat::Docx, &bytes).unwrap(),
        "dispatched"
    );
}

#[test]
fn test_pdf_bytes_are_not_docx() {
    let bytes = crate::common::build_pdf(&["hello"]);
    let result = docx::extract_text(&bytes);
    assert!(matches!(result, Err(ExtractionError::Docx(_))));
}
