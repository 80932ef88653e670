use super::{ReportDocument, ReportEncoder};
use crate::error::ReportError;

/// Machine-readable report, pretty-printed.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReportEncoder;

impl ReportEncoder for JsonReportEncoder {
    fn mime_type(&self) -> &'static str {
        "application/json"
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn encode(&self, document: &ReportDocument) -> Result<Vec<u8>, ReportError> {
        Ok(serde_json::to_vec_pretty(document)?)
    }
}
