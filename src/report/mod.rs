//! PDF report rendering.
//!
//! [`ReportDocument`] owns the output file and appends one page per product.
//! Pages are drawn by plotters through [`canvas::PdfCanvas`], which writes PDF
//! vector operators directly.

pub mod canvas;
pub mod chart;
pub mod document;

pub use chart::PAGE_SIZE;
pub use document::ReportDocument;
