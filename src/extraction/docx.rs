// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! DOCX text extraction

use docx_rs::{
    read_docx, Break, BreakType, DocumentChild, Paragraph, ParagraphChild, Run, RunChild,
};
use tracing::debug;

use super::ExtractionError;

/// Extracts body paragraph texts joined with `\n`.
///
/// Only top-level body paragraphs are read; paragraphs nested in tables are
/// skipped. A document without paragraphs yields an empty string.
pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let docx = read_docx(bytes).map_err(|e| ExtractionError::Docx(e.to_string()))?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(paragraph) => Some(paragraph_text(paragraph)),
            _ => None,
        })
        .collect();

    debug!("Extracted {} DOCX paragraphs", paragraphs.len());
    Ok(paragraphs.join("\n"))
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    push_children_text(&paragraph.children, &mut text);
    text
}

fn push_children_text(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => push_run_text(run, out),
            ParagraphChild::Hyperlink(link) => push_children_text(&link.children, out),
            _ => {}
        }
    }
}

fn push_run_text(run: &Run, out: &mut String) {
    for child in &run.children {
        match child {
            RunChild::Text(t) => out.push_str(&t.text),
            RunChild::Tab(_) | RunChild::PTab(_) => out.push('\t'),
            RunChild::Break(br) if !is_layout_break(br) => out.push('\n'),
            RunChild::CarriageReturn(_) => out.push('\n'),
            _ => {}
        }
    }
}

/// Page and column breaks move text without adding a line to it
fn is_layout_break(br: &Break) -> bool {
    *br == Break::new(BreakType::Page) || *br == Break::new(BreakType::Column)
}
