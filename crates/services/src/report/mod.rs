//! Printable progress reports.

mod builder;
mod json;
mod pdf;

pub use builder::{ChapterBlock, ReportBuilder, ReportDocument, ReportLine};
pub use json::JsonReportEncoder;
pub use pdf::PdfReportEncoder;

use crate::error::ReportError;

/// Turns a report document into bytes of a particular file format.
pub trait ReportEncoder: Send + Sync {
    fn mime_type(&self) -> &'static str;

    /// File extension without the dot.
    fn extension(&self) -> &'static str;

    /// # Errors
    ///
    /// Returns `ReportError` if the document cannot be encoded.
    fn encode(&self, document: &ReportDocument) -> Result<Vec<u8>, ReportError>;
}

/// An encoded report ready to be offered as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFile {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ReportFile {
    /// Encode `document` and name the file `{user}_quiz_report.{ext}`.
    ///
    /// # Errors
    ///
    /// Returns the encoder's `ReportError`.
    pub fn encode(
        document: &ReportDocument,
        encoder: &dyn ReportEncoder,
    ) -> Result<Self, ReportError> {
        let bytes = encoder.encode(document)?;
        log::info!(
            "generated {} report for {} ({} bytes)",
            encoder.extension(),
            document.user_name,
            bytes.len()
        );
        Ok(Self {
            file_name: format!(
                "{}_quiz_report.{}",
                file_stem(&document.user_name),
                encoder.extension()
            ),
            mime_type: encoder.mime_type(),
            bytes,
        })
    }
}

/// Keeps letters, digits, `-` and `_`; everything else becomes `_`.
fn file_stem(user_name: &str) -> String {
    user_name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
