use printpdf::{BuiltinFont, Mm, PdfDocument, PdfLayerReference};

use super::{ReportDocument, ReportEncoder};
use crate::error::ReportError;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const LINE_HEIGHT_MM: f32 = 7.0;
const HEADING_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 11.0;
const LAYER_NAME: &str = "report";

/// Windows-1252 code points outside Latin-1 that the built-in fonts can draw.
const WIN_ANSI_EXTRAS: [char; 27] = [
    '€', '‚', 'ƒ', '„', '…', '†', '‡', 'ˆ', '‰', 'Š', '‹', 'Œ', 'Ž', '‘', '’', '“', '”', '•', '–',
    '—', '˜', '™', 'š', '›', 'œ', 'ž', 'Ÿ',
];

/// A4 portrait PDF using the built-in Helvetica faces.
///
/// The built-in faces only cover Windows-1252, so text outside it is
/// rejected with `ReportError::UnsupportedText` rather than dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfReportEncoder;

impl ReportEncoder for PdfReportEncoder {
    fn mime_type(&self) -> &'static str {
        "application/pdf"
    }

    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn encode(&self, document: &ReportDocument) -> Result<Vec<u8>, ReportError> {
        let lines = document.lines();
        for line in &lines {
            ensure_drawable(&line.text)?;
        }

        let (doc, page, layer) = PdfDocument::new(
            document.title.as_str(),
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            LAYER_NAME,
        );
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(encoding_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(encoding_error)?;

        let mut current: PdfLayerReference = doc.get_page(page).get_layer(layer);
        let mut y = PAGE_HEIGHT_MM - MARGIN_MM;

        for line in lines {
            if y < MARGIN_MM {
                let (page, layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER_NAME);
                current = doc.get_page(page).get_layer(layer);
                y = PAGE_HEIGHT_MM - MARGIN_MM;
            }
            let (font, size) = if line.heading {
                (&bold, HEADING_SIZE)
            } else {
                (&regular, BODY_SIZE)
            };
            current.use_text(line.text, size, Mm(MARGIN_MM), Mm(y), font);
            y -= LINE_HEIGHT_MM;
        }

        doc.save_to_bytes().map_err(encoding_error)
    }
}

fn ensure_drawable(text: &str) -> Result<(), ReportError> {
    match text.chars().find(|&c| !is_win_ansi(c)) {
        Some(character) => Err(ReportError::UnsupportedText {
            character,
            text: text.to_owned(),
        }),
        None => Ok(()),
    }
}

fn is_win_ansi(c: char) -> bool {
    matches!(c, ' '..='~' | '\u{A0}'..='\u{FF}') || WIN_ANSI_EXTRAS.contains(&c)
}

fn encoding_error(err: printpdf::Error) -> ReportError {
    ReportError::Encoding(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ChapterBlock;
    use quiz_core::time::fixed_now;

    fn document(chapters: usize) -> ReportDocument {
        document_for("Kim", chapters)
    }

    fn document_for(user_name: &str, chapters: usize) -> ReportDocument {
        ReportDocument {
            title: "Quiz Progress Report".into(),
            user_name: user_name.into(),
            generated_at: fixed_now(),
            chapters: (0..chapters)
                .map(|i| ChapterBlock {
                    chapter: format!("Ch{i}"),
                    completed: i % 2 == 0,
                    score: 1,
                    total_questions: 2,
                    percentage: 50.0,
                    started_at: fixed_now(),
                    completed_at: None,
                })
                .collect(),
        }
    }

    #[test]
    fn encodes_a_pdf_header() {
        let bytes = PdfReportEncoder.encode(&document(0)).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn long_reports_paginate() {
        let bytes = PdfReportEncoder.encode(&document(40)).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn accented_latin_names_are_accepted() {
        let bytes = PdfReportEncoder.encode(&document_for("José Müller", 1)).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn non_latin_name_is_rejected_instead_of_dropped() {
        let err = PdfReportEncoder.encode(&document_for("김민수", 0)).unwrap_err();
        match err {
            ReportError::UnsupportedText { character, text } => {
                assert_eq!(character, '김');
                assert!(text.contains("김민수"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_latin_chapter_label_is_rejected() {
        let mut doc = document(1);
        doc.chapters[0].chapter = "/ʃ/ sounds".into();
        assert!(matches!(
            PdfReportEncoder.encode(&doc),
            Err(ReportError::UnsupportedText { character: 'ʃ', .. })
        ));
    }
}
