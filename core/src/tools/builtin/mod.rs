//! Built-in tools

pub mod pdf_extract;
pub mod pdf_report;

pub use pdf_extract::{PdfExtractTool, PdfExtractToolFactory};
pub use pdf_report::{ExtractionReport, ReportImage};
